use super::listing::{criteria, print_items, show_listing};
use super::{Console, print_record, write_export};
use crate::cli::{HistoryAction, OutputOptions};
use crate::error::Result;
use crate::gateway::{HISTORY_PAGE_SIZE, HistoriqueFilter};

pub async fn cmd_history(action: HistoryAction) -> Result<()> {
    let console = Console::connect()?;
    let history = console.gateway().history();

    match action {
        HistoryAction::Ls { list, filter } => {
            let filter = HistoriqueFilter::from(&filter);
            let (page, size) = match list.server_page {
                Some(page) => (
                    page.saturating_sub(1) as u32,
                    list.page_size.map_or(HISTORY_PAGE_SIZE, |s| s as u32),
                ),
                None => (0, HISTORY_PAGE_SIZE),
            };
            let items = console.settle(history.filtered(&filter, page, size).await)?;
            show_listing(&console, &list, items, criteria(&list)?)
        }
        HistoryAction::For { reclamation, json } => {
            let entries = console.settle(history.for_reclamation(reclamation).await)?;
            print_items(&entries, OutputOptions::new(json))
        }
        HistoryAction::Stats { from, to, json } => {
            let stats = console.settle(history.stats(from.as_deref(), to.as_deref()).await)?;
            print_record(&stats, OutputOptions::new(json))
        }
        HistoryAction::Export { filter, export } => {
            let filter = HistoriqueFilter::from(&filter);
            let bytes = console.settle(history.export(&filter).await)?;
            write_export(&bytes, &export, "historique.xlsx")
        }
    }
}
