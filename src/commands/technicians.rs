use super::listing::{criteria, fetch_listing, print_items, show_listing};
use super::{Console, print_record};
use crate::cli::{OutputOptions, TechnicianAction};
use crate::error::Result;
use crate::gateway::Query;

pub async fn cmd_technicians(action: TechnicianAction) -> Result<()> {
    let console = Console::connect()?;
    let technicians = console.gateway().technicians();

    match action {
        TechnicianAction::Ls { list, active } => {
            let items = if active {
                console.settle(technicians.active().await)?
            } else {
                fetch_listing(&console, technicians, &list, &Query::new()).await?
            };
            show_listing(&console, &list, items, criteria(&list)?)
        }
        TechnicianAction::Search { text, json } => {
            let found = console.settle(technicians.search_text(&text).await)?;
            print_items(&found, OutputOptions::new(json))
        }
        TechnicianAction::Show { id, json } => {
            let technicien = console.settle(technicians.get(&id).await)?;
            print_record(&technicien, OutputOptions::new(json))
        }
    }
}
