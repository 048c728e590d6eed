//! Shared plumbing of the `ls` commands: fetch, local view, print.

use std::fmt::Display;

use owo_colors::OwoColorize;
use serde_json::json;

use super::{Console, print_json};
use crate::cli::{ListArgs, OutputOptions};
use crate::config::Config;
use crate::display::{TableRow, page_footer, render_table};
use crate::error::{ConsoleError, Result};
use crate::gateway::{PageRequest, Query, Resource, RestResource};
use crate::models::Entity;
use crate::view::{CollectionView, Constraint, FilterCriteria, SortDirection};

/// Criteria from the generic `ls` flags.
pub fn criteria(args: &ListArgs) -> Result<FilterCriteria> {
    let mut criteria = FilterCriteria::new();
    if let Some(term) = &args.search {
        criteria.set_search(term.as_str());
    }
    for arg in &args.equals {
        criteria.set(arg.field.as_str(), Constraint::Equals(arg.value.clone()));
    }
    for arg in &args.contains {
        criteria.set(arg.field.as_str(), Constraint::Contains(arg.value.clone()));
    }
    for arg in &args.between {
        criteria.set(arg.field.as_str(), Constraint::parse_range(&arg.value)?);
    }
    Ok(criteria)
}

/// Add a typed flag such as `--status` as an exact-match constraint.
pub fn with_equals<V: Display>(criteria: &mut FilterCriteria, field: &str, value: Option<V>) {
    if let Some(value) = value {
        criteria.set(field, Constraint::Equals(value.to_string()));
    }
}

fn sort_direction(args: &ListArgs) -> SortDirection {
    if args.desc {
        SortDirection::Desc
    } else {
        SortDirection::Asc
    }
}

fn page_size(config: &Config, args: &ListArgs) -> usize {
    args.page_size.unwrap_or(config.view.page_size)
}

/// The whole collection, or the single server page asked for with
/// `--server-page`.
pub async fn fetch_listing<E: RestResource>(
    console: &Console,
    resource: Resource<'_, E>,
    args: &ListArgs,
    filters: &Query,
) -> Result<Vec<E>> {
    let result = match args.server_page {
        Some(page) => {
            let size = page_size(&console.config, args) as u32;
            let mut request = PageRequest::new(page.saturating_sub(1) as u32, size);
            if let Some(field) = &args.sort {
                request = request.sorted(field.as_str(), sort_direction(args));
            }
            resource.page(&request, filters).await.map(|page| page.content)
        }
        None => resource.list(filters).await,
    };
    console.settle(result)
}

/// Load `items` into a view configured from the flags.
pub fn build_view<E: Entity>(
    config: &Config,
    args: &ListArgs,
    items: Vec<E>,
    criteria: FilterCriteria,
) -> Result<CollectionView<E>> {
    let size = if args.all {
        items.len().max(1)
    } else {
        page_size(config, args)
    };
    let mut view = CollectionView::new(size, config.view.shrink_policy);
    view.replace_all(items);
    view.set_criteria(criteria);
    if let Some(field) = &args.sort {
        view.set_sort(field, sort_direction(args))?;
    }
    if view.filtered_len() > 0 && !view.set_page(args.page) {
        return Err(ConsoleError::InvalidInput(format!(
            "page {} is out of range (1-{})",
            args.page,
            view.total_pages()
        )));
    }
    Ok(view)
}

/// Print the current page of a view, or the page as JSON.
pub fn print_view<E: TableRow>(view: &CollectionView<E>, output: OutputOptions) -> Result<()> {
    if output.json {
        return print_json(&json!({
            "page": view.current_page(),
            "total_pages": view.total_pages(),
            "filtered": view.filtered_len(),
            "total": view.total_len(),
            "items": view.page(),
        }));
    }

    if view.filtered_len() == 0 {
        println!("{}", format!("No {}s found", E::LABEL).dimmed());
        return Ok(());
    }
    println!("{}", render_table(&view.page()));
    println!("{}", page_footer(view));
    Ok(())
}

/// Filter, sort and page `items` per the flags, then print.
pub fn show_listing<E: TableRow>(
    console: &Console,
    args: &ListArgs,
    items: Vec<E>,
    criteria: FilterCriteria,
) -> Result<()> {
    let view = build_view(&console.config, args, items, criteria)?;
    print_view(&view, OutputOptions::new(args.json))
}

/// Print a plain backend result list (overdue, search hits, ...).
pub fn print_items<E: TableRow>(items: &[E], output: OutputOptions) -> Result<()> {
    if output.json {
        return print_json(&serde_json::to_value(items)?);
    }
    if items.is_empty() {
        println!("{}", format!("No {}s found", E::LABEL).dimmed());
        return Ok(());
    }
    let rows: Vec<&E> = items.iter().collect();
    println!("{}", render_table(&rows));
    println!("{}", format!("{} {}(s)", items.len(), E::LABEL).dimmed());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cli::FieldArg;
    use crate::models::{Asset, AssetStatus};

    fn args() -> ListArgs {
        ListArgs {
            search: None,
            equals: Vec::new(),
            contains: Vec::new(),
            between: Vec::new(),
            sort: None,
            desc: false,
            page: 1,
            page_size: None,
            all: false,
            server_page: None,
            json: false,
        }
    }

    fn field(field: &str, value: &str) -> FieldArg {
        FieldArg {
            field: field.to_string(),
            value: value.to_string(),
        }
    }

    fn asset(id: i64, etat: AssetStatus, valeur: f64) -> Asset {
        Asset {
            id: Some(id),
            nom: format!("asset {id}"),
            etat: Some(etat),
            valeur: Some(valeur),
            ..Default::default()
        }
    }

    fn assets() -> Vec<Asset> {
        (1..=23)
            .map(|id| {
                let etat = if id % 2 == 0 {
                    AssetStatus::EnPanne
                } else {
                    AssetStatus::EnService
                };
                asset(id, etat, id as f64 * 100.0)
            })
            .collect()
    }

    #[test]
    fn test_criteria_from_flags() {
        let mut args = args();
        args.search = Some("gps".to_string());
        args.equals.push(field("etat", "EN_PANNE"));
        args.between.push(field("valeur", "100..500"));
        let criteria = criteria(&args).unwrap();
        assert_eq!(criteria.search(), "gps");
        assert_eq!(
            criteria.get("etat"),
            Some(&Constraint::Equals("EN_PANNE".to_string()))
        );
        assert!(matches!(
            criteria.get("valeur"),
            Some(Constraint::NumberRange { .. })
        ));
    }

    #[test]
    fn test_criteria_rejects_bad_range() {
        let mut args = args();
        args.between.push(field("valeur", "100-500"));
        assert!(criteria(&args).is_err());
    }

    #[test]
    fn test_build_view_filters_sorts_and_pages() {
        let mut args = args();
        args.sort = Some("valeur".to_string());
        args.desc = true;
        args.page = 2;
        args.page_size = Some(5);
        let mut criteria = FilterCriteria::new();
        with_equals(&mut criteria, "etat", Some(AssetStatus::EnPanne));

        let view = build_view(&Config::default(), &args, assets(), criteria).unwrap();
        assert_eq!(view.filtered_len(), 11);
        assert_eq!(view.current_page(), 2);
        let ids: Vec<_> = view.page().iter().map(|a| a.id.unwrap()).collect();
        assert_eq!(ids, vec![12, 10, 8, 6, 4]);
    }

    #[test]
    fn test_build_view_all_shows_one_page() {
        let mut args = args();
        args.all = true;
        let view = build_view(&Config::default(), &args, assets(), FilterCriteria::new()).unwrap();
        assert_eq!(view.total_pages(), 1);
        assert_eq!(view.page().len(), 23);
    }

    #[test]
    fn test_build_view_page_out_of_range() {
        let mut args = args();
        args.page = 4;
        let err = build_view(&Config::default(), &args, assets(), FilterCriteria::new())
            .unwrap_err();
        assert_eq!(err.to_string(), "invalid input: page 4 is out of range (1-3)");
    }

    #[test]
    fn test_build_view_empty_collection_is_not_an_error() {
        let mut args = args();
        args.page = 3;
        let view = build_view::<Asset>(&Config::default(), &args, Vec::new(), FilterCriteria::new())
            .unwrap();
        assert_eq!(view.filtered_len(), 0);
    }

    #[test]
    fn test_build_view_unknown_sort_field() {
        let mut args = args();
        args.sort = Some("colour".to_string());
        assert!(build_view(&Config::default(), &args, assets(), FilterCriteria::new()).is_err());
    }
}
