//! Interactive paginated view over one collection.
//!
//! One `tokio::select!` loop multiplexes operator lines from stdin, settled
//! search terms from the debounced trigger, completed reloads, and session
//! changes. Reloads are tagged by a [`RequestSequencer`]; an answer that is not
//! the latest issued is discarded.

use owo_colors::OwoColorize;
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::task::JoinSet;
use tracing::{debug, warn};

use super::Console;
use crate::cli::BrowseTarget;
use crate::display::{TableRow, page_footer, render_selectable};
use crate::error::{ConsoleError, Result};
use crate::gateway::{Query, RestResource};
use crate::models::{
    Asset, Category, Entity, HistoriqueEntry, Intervention, Notification, Reclamation,
    ServiceDirection, Technicien, User,
};
use crate::view::{
    CollectionView, Constraint, RequestSequencer, RequestTicket, SearchTrigger,
};

const HELP: &str = "\
  n / p          next / previous page
  g N            go to page N
  /TEXT          search (empty to clear)
  s FIELD        sort by FIELD (again to flip)
  f FIELD=VALUE  filter on FIELD (f FIELD to drop it)
  c              clear filters and search
  x ID           toggle selection of ID
  a              select / unselect the whole page
  u              clear selection
  d              delete the selected records
  r              reload from the backend
  size N         rows per page
  ?              this help
  q              quit";

pub async fn cmd_browse(target: BrowseTarget, search: Option<String>) -> Result<()> {
    let console = Console::connect()?;
    match target {
        BrowseTarget::Assets => browse::<Asset>(&console, search).await,
        BrowseTarget::Categories => browse::<Category>(&console, search).await,
        BrowseTarget::Services => browse::<ServiceDirection>(&console, search).await,
        BrowseTarget::Interventions => browse::<Intervention>(&console, search).await,
        BrowseTarget::Reclamations => browse::<Reclamation>(&console, search).await,
        BrowseTarget::Technicians => browse::<Technicien>(&console, search).await,
        BrowseTarget::Users => browse::<User>(&console, search).await,
        BrowseTarget::Notifications => browse::<Notification>(&console, search).await,
        BrowseTarget::History => browse::<HistoriqueEntry>(&console, search).await,
    }
}

/// One line typed by the operator.
#[derive(Debug, Clone, PartialEq)]
enum BrowseCommand {
    Show,
    Next,
    Previous,
    Page(usize),
    Search(String),
    Sort(String),
    Filter(String, String),
    Unfilter(String),
    ClearFilters,
    Toggle(String),
    SelectPage,
    Unselect,
    DeleteSelected,
    Reload,
    PageSize(usize),
    Help,
    Quit,
}

fn parse_command(line: &str) -> std::result::Result<BrowseCommand, String> {
    let line = line.trim();
    if let Some(term) = line.strip_prefix('/') {
        return Ok(BrowseCommand::Search(term.trim().to_string()));
    }
    let (word, rest) = match line.split_once(char::is_whitespace) {
        Some((word, rest)) => (word, rest.trim()),
        None => (line, ""),
    };
    let number = |what: &str| -> std::result::Result<usize, String> {
        match rest.parse::<usize>() {
            Ok(n) if n >= 1 => Ok(n),
            _ => Err(format!("{what} needs a number of at least 1")),
        }
    };
    let argument = |what: &str| -> std::result::Result<String, String> {
        if rest.is_empty() {
            Err(format!("{what} needs an argument"))
        } else {
            Ok(rest.to_string())
        }
    };

    match word {
        "" => Ok(BrowseCommand::Show),
        "n" | "next" => Ok(BrowseCommand::Next),
        "p" | "prev" => Ok(BrowseCommand::Previous),
        "g" | "page" => number("g").map(BrowseCommand::Page),
        "s" | "sort" => argument("s").map(BrowseCommand::Sort),
        "f" | "filter" => {
            let arg = argument("f")?;
            match arg.split_once('=') {
                Some((field, value)) => Ok(BrowseCommand::Filter(
                    field.trim().to_string(),
                    value.trim().to_string(),
                )),
                None => Ok(BrowseCommand::Unfilter(arg)),
            }
        }
        "c" | "clear" => Ok(BrowseCommand::ClearFilters),
        "x" => argument("x").map(BrowseCommand::Toggle),
        "a" => Ok(BrowseCommand::SelectPage),
        "u" => Ok(BrowseCommand::Unselect),
        "d" | "delete" => Ok(BrowseCommand::DeleteSelected),
        "r" | "reload" => Ok(BrowseCommand::Reload),
        "size" => number("size").map(BrowseCommand::PageSize),
        "?" | "h" | "help" => Ok(BrowseCommand::Help),
        "q" | "quit" | "exit" => Ok(BrowseCommand::Quit),
        other => Err(format!("unknown command '{other}', type ? for help")),
    }
}

/// What the loop has to do after a command was applied to the view.
#[derive(Debug, Clone, PartialEq)]
enum Step {
    Render,
    Say(String),
    Search(String),
    Reload,
    Delete,
    Help,
    Quit,
}

/// Apply a command that only touches local state.
fn apply<E: Entity>(view: &mut CollectionView<E>, command: BrowseCommand) -> Result<Step> {
    let step = match command {
        BrowseCommand::Show => Step::Render,
        BrowseCommand::Next => {
            if view.next_page() {
                Step::Render
            } else {
                Step::Say("already on the last page".to_string())
            }
        }
        BrowseCommand::Previous => {
            if view.previous_page() {
                Step::Render
            } else {
                Step::Say("already on the first page".to_string())
            }
        }
        BrowseCommand::Page(n) => {
            if view.set_page(n) {
                Step::Render
            } else {
                Step::Say(format!("no page {n} (1-{})", view.total_pages()))
            }
        }
        BrowseCommand::Search(term) => Step::Search(term),
        BrowseCommand::Sort(field) => {
            view.sort_by(&field)?;
            Step::Render
        }
        BrowseCommand::Filter(field, value) => {
            let constraint = if value.contains("..") {
                Constraint::parse_range(&value)?
            } else {
                Constraint::Equals(value)
            };
            view.set_filter(field, constraint);
            Step::Render
        }
        BrowseCommand::Unfilter(field) => {
            view.remove_filter(&field);
            Step::Render
        }
        BrowseCommand::ClearFilters => {
            view.clear_filters();
            Step::Render
        }
        BrowseCommand::Toggle(raw) => {
            let id = view
                .items()
                .iter()
                .filter_map(<E as Entity>::id)
                .find(|id| id.to_string() == raw);
            match id {
                Some(id) => {
                    view.toggle_selection(id);
                    Step::Render
                }
                None => Step::Say(format!("no {} with id {raw}", E::LABEL)),
            }
        }
        BrowseCommand::SelectPage => {
            view.select_all_visible();
            Step::Render
        }
        BrowseCommand::Unselect => {
            view.clear_selection();
            Step::Render
        }
        BrowseCommand::DeleteSelected => {
            if view.selection_len() == 0 {
                Step::Say("nothing selected".to_string())
            } else {
                Step::Delete
            }
        }
        BrowseCommand::Reload => Step::Reload,
        BrowseCommand::PageSize(size) => {
            view.set_page_size(size);
            Step::Render
        }
        BrowseCommand::Help => Step::Help,
        BrowseCommand::Quit => Step::Quit,
    };
    Ok(step)
}

fn render<E: TableRow>(view: &CollectionView<E>) -> String {
    let mut out = String::new();
    if view.filtered_len() == 0 {
        out.push_str(&format!("{}", format!("No {}s found", E::LABEL).dimmed()));
    } else {
        let page = view.page();
        out.push_str(&render_selectable(&page, |item| {
            item.id().is_some_and(|id| view.is_selected(&id))
        }));
        out.push('\n');
        out.push_str(&page_footer(view));
        let numbers = view
            .page_numbers()
            .into_iter()
            .map(|n| {
                if n == view.current_page() {
                    format!("[{n}]").bold().to_string()
                } else {
                    n.to_string()
                }
            })
            .collect::<Vec<_>>()
            .join(" ");
        out.push_str(&format!("\n{numbers}"));
    }

    let criteria = view.criteria();
    if !criteria.is_empty() {
        let mut active = Vec::new();
        if !criteria.search().is_empty() {
            active.push(format!("search '{}'", criteria.search()));
        }
        for (field, constraint) in criteria.constraints() {
            active.push(format!("{field}: {}", describe(constraint)));
        }
        out.push_str(&format!("\n{}", format!("Filters: {}", active.join(", ")).dimmed()));
    }
    out
}

fn describe(constraint: &Constraint) -> String {
    match constraint {
        Constraint::Equals(v) => format!("= {v}"),
        Constraint::Contains(v) => format!("~ {v}"),
        Constraint::DateRange { from, to } => format!(
            "{}..{}",
            from.map(|t| t.to_string()).unwrap_or_default(),
            to.map(|t| t.to_string()).unwrap_or_default()
        ),
        Constraint::NumberRange { min, max } => format!(
            "{}..{}",
            min.map(|n| n.to_string()).unwrap_or_default(),
            max.map(|n| n.to_string()).unwrap_or_default()
        ),
    }
}

type Reload<E> = (RequestTicket, Result<Vec<E>>);

fn spawn_reload<E: RestResource>(
    console: &Console,
    sequencer: &mut RequestSequencer,
    tasks: &mut JoinSet<Reload<E>>,
) {
    let ticket = sequencer.issue();
    let gateway = console.gateway().clone();
    debug!(entity = E::LABEL, ?ticket, "reload issued");
    tasks.spawn(async move {
        let result = gateway.resource::<E>().list(&Query::new()).await;
        (ticket, result)
    });
}

async fn browse<E: TableRow + RestResource>(console: &Console, search: Option<String>) -> Result<()> {
    let mut view: CollectionView<E> =
        CollectionView::new(console.config.view.page_size, console.config.view.shrink_policy);
    if let Some(term) = search {
        view.set_search(term);
    }

    let mut sequencer = RequestSequencer::new();
    let mut reloads: JoinSet<Reload<E>> = JoinSet::new();
    let mut trigger = SearchTrigger::spawn(console.config.search_debounce());
    let mut session = console.session().subscribe();
    let mut lines = BufReader::new(tokio::io::stdin()).lines();

    println!("{}", format!("Loading {}s... (? for help)", E::LABEL).dimmed());
    spawn_reload(console, &mut sequencer, &mut reloads);

    loop {
        tokio::select! {
            line = lines.next_line() => {
                let Some(line) = line? else {
                    break;
                };
                let step = match parse_command(&line) {
                    Ok(command) => match apply(&mut view, command) {
                        Ok(step) => step,
                        Err(e) => Step::Say(e.to_string()),
                    },
                    Err(message) => Step::Say(message),
                };
                match step {
                    Step::Render => println!("{}", render(&view)),
                    Step::Say(message) => eprintln!("{}", message.yellow()),
                    Step::Search(term) => trigger.push(term),
                    Step::Reload => spawn_reload(console, &mut sequencer, &mut reloads),
                    Step::Delete => {
                        delete_selected(console, &mut view).await?;
                        println!("{}", render(&view));
                    }
                    Step::Help => println!("{HELP}"),
                    Step::Quit => break,
                }
            }
            Some(term) = trigger.next() => {
                debug!(term = %term, "applying search");
                view.set_search(term);
                println!("{}", render(&view));
            }
            Some(joined) = reloads.join_next() => {
                let (ticket, result) = match joined {
                    Ok(done) => done,
                    Err(e) => {
                        warn!("reload task failed: {e}");
                        continue;
                    }
                };
                match apply_reload(&mut view, &sequencer, ticket, result, |r| console.settle(r)) {
                    Ok(true) => println!("{}", render(&view)),
                    Ok(false) => warn!(entity = E::LABEL, ?ticket, "discarding stale reload"),
                    Err(e) => eprintln!("{}", e.to_string().red()),
                }
            }
            Ok(()) = session.changed() => {
                if !console.session().has_token() {
                    return Err(ConsoleError::Unauthenticated);
                }
            }
        }
    }

    reloads.abort_all();
    Ok(())
}

/// Load a finished reload into the view if no newer one was issued since.
///
/// A stale answer is dropped before `settle` sees it and leaves the view
/// untouched; `Ok(false)` reports that case.
fn apply_reload<E: Entity>(
    view: &mut CollectionView<E>,
    sequencer: &RequestSequencer,
    ticket: RequestTicket,
    result: Result<Vec<E>>,
    settle: impl FnOnce(Result<Vec<E>>) -> Result<Vec<E>>,
) -> Result<bool> {
    if !sequencer.is_current(ticket) {
        return Ok(false);
    }
    view.replace_all(settle(result)?);
    Ok(true)
}

/// Delete the selected records one by one; stop at the first failure.
async fn delete_selected<E: RestResource>(console: &Console, view: &mut CollectionView<E>) -> Result<()> {
    let resource = console.gateway().resource::<E>();
    let mut deleted = 0;
    for id in view.selected_ids() {
        if let Err(e) = console.settle(resource.delete(&id).await) {
            if matches!(e, ConsoleError::Unauthenticated) {
                return Err(e);
            }
            eprintln!("{}", format!("could not delete {} {id}: {e}", E::LABEL).red());
            break;
        }
        view.remove(&id);
        deleted += 1;
    }
    println!("Deleted {deleted} {}(s)", E::LABEL);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::view::ShrinkPolicy;

    fn category(id: i64, code: &str, actif: bool) -> Category {
        Category {
            id: Some(id),
            nom: format!("Category {code}"),
            code: code.to_string(),
            actif,
            ..Default::default()
        }
    }

    fn view() -> CollectionView<Category> {
        let mut view = CollectionView::new(2, ShrinkPolicy::Clamp);
        view.replace_all(vec![
            category(1, "INFO", true),
            category(2, "TOPO", false),
            category(3, "VEHI", true),
        ]);
        view
    }

    #[test]
    fn test_parse_command() {
        assert_eq!(parse_command("n").unwrap(), BrowseCommand::Next);
        assert_eq!(parse_command("g 3").unwrap(), BrowseCommand::Page(3));
        assert_eq!(
            parse_command("/ gps ").unwrap(),
            BrowseCommand::Search("gps".to_string())
        );
        assert_eq!(parse_command("/").unwrap(), BrowseCommand::Search(String::new()));
        assert_eq!(
            parse_command("f etat=EN_PANNE").unwrap(),
            BrowseCommand::Filter("etat".to_string(), "EN_PANNE".to_string())
        );
        assert_eq!(
            parse_command("f etat").unwrap(),
            BrowseCommand::Unfilter("etat".to_string())
        );
        assert_eq!(parse_command("").unwrap(), BrowseCommand::Show);
        assert!(parse_command("g 0").is_err());
        assert!(parse_command("x").is_err());
        assert!(parse_command("launch").is_err());
    }

    #[test]
    fn test_apply_paging() {
        let mut view = view();
        assert_eq!(apply(&mut view, BrowseCommand::Next).unwrap(), Step::Render);
        assert_eq!(view.current_page(), 2);
        assert!(matches!(
            apply(&mut view, BrowseCommand::Next).unwrap(),
            Step::Say(_)
        ));
        assert!(matches!(
            apply(&mut view, BrowseCommand::Page(7)).unwrap(),
            Step::Say(_)
        ));
    }

    #[test]
    fn test_apply_filter_returns_to_first_page() {
        let mut view = view();
        view.set_page(2);
        apply(
            &mut view,
            BrowseCommand::Filter("actif".to_string(), "true".to_string()),
        )
        .unwrap();
        assert_eq!(view.current_page(), 1);
        assert_eq!(view.filtered_len(), 2);
    }

    #[test]
    fn test_apply_selection_and_delete_step() {
        let mut view = view();
        assert!(matches!(
            apply(&mut view, BrowseCommand::DeleteSelected).unwrap(),
            Step::Say(_)
        ));
        apply(&mut view, BrowseCommand::Toggle("3".to_string())).unwrap();
        assert!(view.is_selected(&3));
        assert_eq!(
            apply(&mut view, BrowseCommand::DeleteSelected).unwrap(),
            Step::Delete
        );
        assert!(matches!(
            apply(&mut view, BrowseCommand::Toggle("42".to_string())).unwrap(),
            Step::Say(_)
        ));
    }

    #[test]
    fn test_apply_unknown_sort_field_is_an_error() {
        let mut view = view();
        assert!(apply(&mut view, BrowseCommand::Sort("colour".to_string())).is_err());
    }

    #[test]
    fn test_stale_reload_leaves_view_unchanged() {
        let mut view = view();
        let mut sequencer = RequestSequencer::new();
        let older = sequencer.issue();
        let newer = sequencer.issue();

        let applied = apply_reload(
            &mut view,
            &sequencer,
            older,
            Ok(vec![category(9, "OLD", true)]),
            |r| r,
        )
        .unwrap();
        assert!(!applied);
        assert_eq!(view.total_len(), 3);
        assert!(view.items().iter().all(|c| c.code != "OLD"));

        let applied = apply_reload(
            &mut view,
            &sequencer,
            newer,
            Ok(vec![category(4, "MOBI", true)]),
            |r| r,
        )
        .unwrap();
        assert!(applied);
        assert_eq!(view.total_len(), 1);
        assert_eq!(view.items()[0].code, "MOBI");
    }

    #[test]
    fn test_stale_reload_error_is_not_settled() {
        let mut view = view();
        let mut sequencer = RequestSequencer::new();
        let older = sequencer.issue();
        sequencer.issue();

        let mut settled = false;
        let applied = apply_reload(
            &mut view,
            &sequencer,
            older,
            Err(ConsoleError::Unauthenticated),
            |r| {
                settled = true;
                r
            },
        )
        .unwrap();
        assert!(!applied);
        assert!(!settled);
        assert_eq!(view.total_len(), 3);
    }

    #[test]
    fn test_current_reload_error_keeps_items() {
        let mut view = view();
        let mut sequencer = RequestSequencer::new();
        let ticket = sequencer.issue();

        let err = apply_reload(
            &mut view,
            &sequencer,
            ticket,
            Err(ConsoleError::Unauthenticated),
            |r| r,
        )
        .unwrap_err();
        assert!(matches!(err, ConsoleError::Unauthenticated));
        assert_eq!(view.total_len(), 3);
    }

    #[test]
    fn test_render_marks_selection_and_filters() {
        let mut view = view();
        view.toggle_selection(1);
        view.set_search("info");
        let out = render(&view);
        assert!(out.contains("[x]"));
        assert!(out.contains("search 'info'"));
    }
}
