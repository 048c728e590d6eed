use owo_colors::OwoColorize;
use serde::Serialize;
use serde_json::Value;
use tabled::Tabled;
use tabled::builder::Builder;
use tabled::settings::Style;

use crate::error::Result;
use crate::models::{Entity, parse_instant};
use crate::view::CollectionView;

mod badges;
mod rows;

pub use badges::{Badge, active_badge, opt_badge};
pub use rows::TableRow;

/// Render entities as a rounded table.
pub fn render_table<E: TableRow>(items: &[&E]) -> String {
    let mut builder = Builder::default();
    builder.push_record(header_cells::<E>());
    for item in items {
        builder.push_record(row_cells(*item));
    }
    let mut table = builder.build();
    table.with(Style::rounded());
    table.to_string()
}

/// Render entities with a leading selection column.
pub fn render_selectable<E, F>(items: &[&E], is_selected: F) -> String
where
    E: TableRow,
    F: Fn(&E) -> bool,
{
    let mut builder = Builder::default();
    let mut header = vec![String::new()];
    header.extend(header_cells::<E>());
    builder.push_record(header);
    for item in items {
        let mark = if is_selected(*item) { "[x]" } else { "[ ]" };
        let mut record = vec![mark.to_string()];
        record.extend(row_cells(*item));
        builder.push_record(record);
    }
    let mut table = builder.build();
    table.with(Style::rounded());
    table.to_string()
}

fn header_cells<E: TableRow>() -> Vec<String> {
    <E::Row as Tabled>::headers()
        .into_iter()
        .map(|cell| cell.into_owned())
        .collect()
}

fn row_cells<E: TableRow>(item: &E) -> Vec<String> {
    item.row()
        .fields()
        .into_iter()
        .map(|cell| cell.into_owned())
        .collect()
}

/// `Page 2/5, 43 of 120 assets` style summary under a listing.
pub fn page_footer<E: Entity>(view: &CollectionView<E>) -> String {
    let mut footer = format!(
        "Page {}/{}, {} of {} {}(s)",
        view.current_page(),
        view.total_pages(),
        view.filtered_len(),
        view.total_len(),
        E::LABEL
    );
    if view.selection_len() > 0 {
        footer.push_str(&format!(", {} selected", view.selection_len()));
    }
    footer.dimmed().to_string()
}

/// Date part of a backend timestamp, `-` when absent.
pub fn short_date(raw: Option<&str>) -> String {
    let Some(raw) = raw.filter(|r| !r.trim().is_empty()) else {
        return "-".to_string();
    };
    match parse_instant(raw) {
        Some(ts) => ts.strftime("%Y-%m-%d").to_string(),
        None => raw.get(..10).unwrap_or(raw).to_string(),
    }
}

pub fn dash(value: Option<&str>) -> String {
    match value {
        Some(v) if !v.is_empty() => v.to_string(),
        _ => "-".to_string(),
    }
}

pub fn format_amount(value: Option<f64>) -> String {
    match value {
        Some(v) => format!("{v:.2}"),
        None => "-".to_string(),
    }
}

/// Render any record as aligned `key: value` lines.
///
/// Nested objects are flattened into dotted keys and null fields are skipped.
pub fn render_record<T: Serialize>(record: &T) -> Result<String> {
    let value = serde_json::to_value(record)?;
    let mut lines = Vec::new();
    flatten("", &value, &mut lines);
    let width = lines.iter().map(|(k, _)| k.len()).max().unwrap_or(0);
    Ok(lines
        .into_iter()
        .map(|(key, value)| format!("{:width$}  {}", key.cyan(), value))
        .collect::<Vec<_>>()
        .join("\n"))
}

fn flatten(prefix: &str, value: &Value, out: &mut Vec<(String, String)>) {
    match value {
        Value::Object(map) => {
            for (key, inner) in map {
                let key = if prefix.is_empty() {
                    key.clone()
                } else {
                    format!("{prefix}.{key}")
                };
                flatten(&key, inner, out);
            }
        }
        Value::Null => {}
        Value::String(s) => out.push((prefix.to_string(), s.clone())),
        Value::Array(items) if items.iter().all(|v| !v.is_object()) => {
            let joined = items
                .iter()
                .map(|v| match v {
                    Value::String(s) => s.clone(),
                    other => other.to_string(),
                })
                .collect::<Vec<_>>()
                .join(", ");
            out.push((prefix.to_string(), joined));
        }
        other => out.push((prefix.to_string(), other.to_string())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Category, ServiceDirection};
    use crate::view::ShrinkPolicy;
    use serde_json::json;

    fn category(id: i64, code: &str) -> Category {
        Category {
            id: Some(id),
            nom: format!("Category {code}"),
            code: code.to_string(),
            actif: true,
            ..Default::default()
        }
    }

    #[test]
    fn test_short_date() {
        assert_eq!(short_date(Some("2024-03-01T08:30:00Z")), "2024-03-01");
        assert_eq!(short_date(Some("2024-03-01")), "2024-03-01");
        assert_eq!(short_date(Some("soon")), "soon");
        assert_eq!(short_date(None), "-");
        assert_eq!(short_date(Some("  ")), "-");
    }

    #[test]
    fn test_render_table_has_headers_and_rows() {
        let a = category(1, "INFO");
        let b = category(2, "TOPO");
        let table = render_table(&[&a, &b]);
        assert!(table.contains("Code"));
        assert!(table.contains("INFO"));
        assert!(table.contains("TOPO"));
    }

    #[test]
    fn test_render_selectable_marks_rows() {
        let a = category(1, "INFO");
        let b = category(2, "TOPO");
        let table = render_selectable(&[&a, &b], |c| c.id == Some(2));
        assert_eq!(table.matches("[x]").count(), 1);
        assert_eq!(table.matches("[ ]").count(), 1);
    }

    #[test]
    fn test_page_footer_counts() {
        let mut view = CollectionView::new(1, ShrinkPolicy::Clamp);
        view.replace_all(vec![category(1, "A"), category(2, "B")]);
        let footer = page_footer(&view);
        assert!(footer.contains("Page 1/2"));
        assert!(footer.contains("2 of 2 category(s)"));
    }

    #[test]
    fn test_render_record_flattens_nested() {
        let service = ServiceDirection {
            id: Some(4),
            service_name: Some("Cadastre".to_string()),
            ..Default::default()
        };
        let rendered = render_record(&json!({"id": 9, "service": service, "tags": ["a", "b"]}))
            .unwrap();
        assert!(rendered.contains("service.serviceName"));
        assert!(rendered.contains("Cadastre"));
        assert!(rendered.contains("a, b"));
        assert!(!rendered.contains("service.code"));
    }
}
