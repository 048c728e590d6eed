use owo_colors::OwoColorize;
use serde_json::json;

use super::listing::{criteria, fetch_listing, print_items, show_listing, with_equals};
use super::{CommandOutput, Console, print_done, print_json, print_record, write_export};
use crate::cli::{AssetAction, AssetFields, OutputOptions};
use crate::display::render_record;
use crate::error::{ConsoleError, Result};
use crate::gateway::Query;
use crate::models::{Asset, AssetInput};

pub async fn cmd_assets(action: AssetAction) -> Result<()> {
    let console = Console::connect()?;
    let assets = console.gateway().assets();

    match action {
        AssetAction::Ls {
            list,
            status,
            category,
            service,
        } => {
            let items = match service {
                Some(id) => console.settle(assets.by_service(id).await)?,
                None => fetch_listing(&console, assets, &list, &Query::new()).await?,
            };
            let mut criteria = criteria(&list)?;
            with_equals(&mut criteria, "etat", status);
            with_equals(&mut criteria, "categorie", category);
            show_listing(&console, &list, items, criteria)
        }
        AssetAction::Search { text, filter, json } => {
            let result = if filter.is_empty() {
                match text {
                    Some(text) => assets.search_text(&text).await,
                    None => {
                        return Err(ConsoleError::InvalidInput(
                            "give a search text or at least one filter".to_string(),
                        ));
                    }
                }
            } else {
                assets.search(&filter.to_filter(text).to_query()).await
            };
            let found = console.settle(result)?;
            print_items(&found, OutputOptions::new(json))
        }
        AssetAction::Show { id, json } => {
            let asset = console.settle(assets.get(&id).await)?;
            print_record(&asset, OutputOptions::new(json))
        }
        AssetAction::Create { name, fields, json } => {
            let mut input = AssetInput {
                nom: name,
                ..Default::default()
            };
            apply_fields(&fields, &mut input);
            let created = console.settle(assets.create(&input).await)?;
            print_done(
                "created",
                "asset",
                id_or_name(&created),
                OutputOptions::new(json),
            )
        }
        AssetAction::Update {
            id,
            name,
            fields,
            json,
        } => {
            let existing = console.settle(assets.get(&id).await)?;
            let mut input = AssetInput::from(&existing);
            if let Some(name) = name {
                input.nom = name;
            }
            apply_fields(&fields, &mut input);
            console.settle(assets.update(&id, &input).await)?;
            print_done("updated", "asset", id, OutputOptions::new(json))
        }
        AssetAction::Delete { id, json } => {
            console.settle(assets.delete(&id).await)?;
            print_done("deleted", "asset", id, OutputOptions::new(json))
        }
        AssetAction::SetStatus { status, ids, json } => {
            let updated = console.settle(assets.bulk_status(&ids, status).await)?;
            CommandOutput::new(json!({
                "action": "bulk_status",
                "status": status,
                "ids": ids,
                "updated": updated.len(),
            }))
            .with_text(format!(
                "Set {} asset(s) to {}",
                ids.len(),
                status.as_str().cyan()
            ))
            .print(OutputOptions::new(json))
        }
        AssetAction::BulkDelete { ids, json } => {
            console.settle(assets.bulk_delete(&ids).await)?;
            CommandOutput::new(json!({ "action": "bulk_delete", "ids": ids }))
                .with_text(format!("Deleted {} asset(s)", ids.len()))
                .print(OutputOptions::new(json))
        }
        AssetAction::Trail { id, json } => {
            let entries = console.settle(assets.history(id).await)?;
            if json {
                return print_json(&serde_json::Value::Array(entries));
            }
            if entries.is_empty() {
                println!("{}", format!("No history for asset {id}").dimmed());
                return Ok(());
            }
            let blocks = entries
                .iter()
                .map(render_record)
                .collect::<Result<Vec<_>>>()?;
            println!("{}", blocks.join("\n\n"));
            Ok(())
        }
        AssetAction::Stats { json } => {
            let stats = console.settle(assets.stats().await)?;
            print_record(&stats, OutputOptions::new(json))
        }
        AssetAction::Export { ids, export } => {
            let bytes = if ids.is_empty() {
                console.settle(assets.export(None).await)?
            } else {
                let all = console.settle(assets.list(&Query::new()).await)?;
                let chosen = pick(all, &ids)?;
                console.settle(assets.export(Some(&chosen)).await)?
            };
            write_export(&bytes, &export, "assets.xlsx")
        }
    }
}

fn apply_fields(fields: &AssetFields, input: &mut AssetInput) {
    let fields = fields.clone();
    if fields.reference.is_some() {
        input.reference = fields.reference;
    }
    if fields.description.is_some() {
        input.description = fields.description;
    }
    if fields.category.is_some() {
        input.categorie = fields.category;
    }
    if fields.status.is_some() {
        input.etat = fields.status;
    }
    if fields.acquired.is_some() {
        input.date_acquisition = fields.acquired;
    }
    if fields.value.is_some() {
        input.valeur = fields.value;
    }
    if fields.serial.is_some() {
        input.numero_serie = fields.serial;
    }
    if fields.location.is_some() {
        input.localisation = fields.location;
    }
    if fields.service.is_some() {
        input.service_id = fields.service;
    }
}

fn id_or_name(asset: &Asset) -> String {
    asset
        .id
        .map(|id| id.to_string())
        .unwrap_or_else(|| asset.nom.clone())
}

/// The assets with the given ids, in the order asked.
fn pick(all: Vec<Asset>, ids: &[i64]) -> Result<Vec<Asset>> {
    ids.iter()
        .map(|id| {
            all.iter()
                .find(|a| a.id == Some(*id))
                .cloned()
                .ok_or_else(|| ConsoleError::NotFound {
                    entity: "asset",
                    id: id.to_string(),
                })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{AssetCategory, AssetStatus};

    #[test]
    fn test_apply_fields_only_overrides_given_flags() {
        let mut input = AssetInput {
            nom: "GPS".to_string(),
            reference: Some("GPS-01".to_string()),
            etat: Some(AssetStatus::EnService),
            ..Default::default()
        };
        let fields = AssetFields {
            status: Some(AssetStatus::EnPanne),
            category: Some(AssetCategory::Topographique),
            ..Default::default()
        };
        apply_fields(&fields, &mut input);
        assert_eq!(input.reference.as_deref(), Some("GPS-01"));
        assert_eq!(input.etat, Some(AssetStatus::EnPanne));
        assert_eq!(input.categorie, Some(AssetCategory::Topographique));
    }

    #[test]
    fn test_pick_keeps_requested_order_and_reports_missing() {
        let all: Vec<Asset> = (1..=3)
            .map(|id| Asset {
                id: Some(id),
                ..Default::default()
            })
            .collect();
        let picked = pick(all.clone(), &[3, 1]).unwrap();
        assert_eq!(picked[0].id, Some(3));
        assert_eq!(picked[1].id, Some(1));

        let err = pick(all, &[9]).unwrap_err();
        assert_eq!(err.to_string(), "asset '9' not found");
    }
}
