use owo_colors::OwoColorize;
use serde_json::json;

use super::listing::{criteria, fetch_listing, print_items, show_listing};
use super::{CommandOutput, Console, print_done, print_record, write_export};
use crate::cli::{CategoryAction, CategoryFields, OutputOptions};
use crate::error::{ConsoleError, Result};
use crate::gateway::{CategoryFilter, Query};
use crate::models::{Category, CategoryInput};

pub async fn cmd_categories(action: CategoryAction) -> Result<()> {
    let console = Console::connect()?;
    let categories = console.gateway().categories();

    match action {
        CategoryAction::Ls { list, active } => {
            let items = if active {
                console.settle(categories.active().await)?
            } else {
                fetch_listing(&console, categories, &list, &Query::new()).await?
            };
            show_listing(&console, &list, items, criteria(&list)?)
        }
        CategoryAction::Search {
            name,
            active,
            from,
            to,
            json,
        } => {
            let filter = CategoryFilter {
                nom: name,
                actif: active,
                date_creation_debut: from,
                date_creation_fin: to,
            };
            let found = console.settle(categories.search(&filter.to_query()).await)?;
            print_items(&found, OutputOptions::new(json))
        }
        CategoryAction::Show { id, json } => {
            let category = console.settle(categories.get(&id).await)?;
            print_record(&category, OutputOptions::new(json))
        }
        CategoryAction::Create {
            name,
            code,
            fields,
            json,
        } => {
            ensure_code_free(&console, &code, None).await?;
            let mut input = CategoryInput {
                nom: name,
                code,
                actif: true,
                ..Default::default()
            };
            apply_fields(&fields, &mut input);
            let created = console.settle(categories.create(&input).await)?;
            print_done(
                "created",
                "category",
                label(&created),
                OutputOptions::new(json),
            )
        }
        CategoryAction::Update {
            id,
            name,
            code,
            fields,
            json,
        } => {
            let existing = console.settle(categories.get(&id).await)?;
            let mut input = CategoryInput::from(&existing);
            if let Some(name) = name {
                input.nom = name;
            }
            if let Some(code) = code
                && code != existing.code
            {
                ensure_code_free(&console, &code, Some(id)).await?;
                input.code = code;
            }
            apply_fields(&fields, &mut input);
            console.settle(categories.update(&id, &input).await)?;
            print_done("updated", "category", id, OutputOptions::new(json))
        }
        CategoryAction::Delete { id, json } => {
            console.settle(categories.delete(&id).await)?;
            print_done("deleted", "category", id, OutputOptions::new(json))
        }
        CategoryAction::Toggle { id, json } => {
            let category = console.settle(categories.toggle_status(id).await)?;
            let state = if category.actif { "active" } else { "inactive" };
            CommandOutput::new(json!({
                "action": "toggle",
                "id": id,
                "actif": category.actif,
            }))
            .with_text(format!("Category {} is now {}", id.to_string().cyan(), state))
            .print(OutputOptions::new(json))
        }
        CategoryAction::CheckCode {
            code,
            exclude,
            json,
        } => {
            let exists = console.settle(categories.code_exists(&code, exclude).await)?;
            let text = if exists {
                format!("Code {} is already used", code.yellow())
            } else {
                format!("Code {} is available", code.green())
            };
            CommandOutput::new(json!({ "code": code, "exists": exists }))
                .with_text(text)
                .print(OutputOptions::new(json))
        }
        CategoryAction::Stats { json } => {
            let stats = console.settle(categories.statistics().await)?;
            print_record(&stats, OutputOptions::new(json))
        }
        CategoryAction::Export { ids, export } => {
            let ids = if ids.is_empty() {
                console
                    .settle(categories.list(&Query::new()).await)?
                    .iter()
                    .filter_map(|c| c.id)
                    .collect()
            } else {
                ids
            };
            let bytes = console.settle(categories.export(&ids).await)?;
            write_export(&bytes, &export, "categories.xlsx")
        }
    }
}

async fn ensure_code_free(console: &Console, code: &str, exclude: Option<i64>) -> Result<()> {
    let taken = console.settle(console.gateway().categories().code_exists(code, exclude).await)?;
    if taken {
        return Err(ConsoleError::InvalidInput(format!(
            "category code '{code}' is already used"
        )));
    }
    Ok(())
}

fn apply_fields(fields: &CategoryFields, input: &mut CategoryInput) {
    let fields = fields.clone();
    if fields.description.is_some() {
        input.description = fields.description;
    }
    if fields.color.is_some() {
        input.couleur = fields.color;
    }
    if fields.icon.is_some() {
        input.icone = fields.icon;
    }
    if let Some(active) = fields.active {
        input.actif = active;
    }
}

fn label(category: &Category) -> String {
    match category.id {
        Some(id) => format!("{id} ({})", category.code),
        None => category.code.clone(),
    }
}
