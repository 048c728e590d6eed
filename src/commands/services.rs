use owo_colors::OwoColorize;
use serde_json::json;

use super::listing::{criteria, fetch_listing, print_items, show_listing};
use super::{CommandOutput, Console, print_done, print_record};
use crate::cli::{OutputOptions, ServiceAction, ServiceFields};
use crate::error::Result;
use crate::gateway::Query;
use crate::models::ServiceInput;

pub async fn cmd_services(action: ServiceAction) -> Result<()> {
    let console = Console::connect()?;
    let services = console.gateway().services();

    match action {
        ServiceAction::Ls { list, active } => {
            let items = if active {
                console.settle(services.active().await)?
            } else {
                fetch_listing(&console, services, &list, &Query::new()).await?
            };
            show_listing(&console, &list, items, criteria(&list)?)
        }
        ServiceAction::Search { text, json } => {
            let found = console.settle(services.search_text(&text).await)?;
            print_items(&found, OutputOptions::new(json))
        }
        ServiceAction::Show { id, json } => {
            let service = console.settle(services.get(&id).await)?;
            print_record(&service, OutputOptions::new(json))
        }
        ServiceAction::Create { name, fields, json } => {
            let mut input = ServiceInput {
                nom: name,
                ..Default::default()
            };
            apply_fields(&fields, &mut input);
            let created = console.settle(services.create(&input).await)?;
            print_done(
                "created",
                "service",
                created
                    .id
                    .map(|id| id.to_string())
                    .unwrap_or_else(|| input.nom.clone()),
                OutputOptions::new(json),
            )
        }
        ServiceAction::Update {
            id,
            name,
            fields,
            json,
        } => {
            let existing = console.settle(services.get(&id).await)?;
            let mut input = ServiceInput::from(&existing);
            if let Some(name) = name {
                input.nom = name;
            }
            apply_fields(&fields, &mut input);
            console.settle(services.update(&id, &input).await)?;
            print_done("updated", "service", id, OutputOptions::new(json))
        }
        ServiceAction::Delete { id, json } => {
            console.settle(services.delete(&id).await)?;
            print_done("deleted", "service", id, OutputOptions::new(json))
        }
        ServiceAction::Toggle { id, json } => {
            let service = console.settle(services.toggle(id).await)?;
            let active = service.actif.unwrap_or(false);
            CommandOutput::new(json!({ "action": "toggle", "id": id, "actif": active }))
                .with_text(format!(
                    "Service {} is now {}",
                    id.to_string().cyan(),
                    if active { "active" } else { "inactive" }
                ))
                .print(OutputOptions::new(json))
        }
    }
}

fn apply_fields(fields: &ServiceFields, input: &mut ServiceInput) {
    let fields = fields.clone();
    if fields.code.is_some() {
        input.code = fields.code;
    }
    if fields.description.is_some() {
        input.description = fields.description;
    }
    if fields.head.is_some() {
        input.responsable = fields.head;
    }
    if fields.email.is_some() {
        input.email = fields.email;
    }
    if fields.phone.is_some() {
        input.telephone = fields.phone;
    }
    if fields.active.is_some() {
        input.actif = fields.active;
    }
}
