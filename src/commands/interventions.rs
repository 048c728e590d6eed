use owo_colors::OwoColorize;
use serde_json::json;

use super::listing::{criteria, fetch_listing, print_items, show_listing, with_equals};
use super::{CommandOutput, Console, print_done, print_record, write_export};
use crate::cli::{InterventionAction, InterventionFields, OutputOptions};
use crate::display::Badge;
use crate::error::Result;
use crate::gateway::{BulkInterventionUpdate, InterventionFilter, PageRequest, Query};
use crate::models::{Intervention, InterventionInput};

pub async fn cmd_interventions(action: InterventionAction) -> Result<()> {
    let console = Console::connect()?;
    let interventions = console.gateway().interventions();

    match action {
        InterventionAction::Ls {
            list,
            status,
            priority,
            kind,
            technician,
        } => {
            let items = fetch_listing(&console, interventions, &list, &Query::new()).await?;
            let mut criteria = criteria(&list)?;
            with_equals(&mut criteria, "statut", status);
            with_equals(&mut criteria, "priorite", priority);
            with_equals(&mut criteria, "typeIntervention", kind);
            with_equals(&mut criteria, "technicienId", technician);
            show_listing(&console, &list, items, criteria)
        }
        InterventionAction::Search {
            filter,
            server_page,
            json,
        } => {
            let filter = InterventionFilter::from(&filter);
            let result = match server_page {
                Some(page) => {
                    let request = PageRequest::new(
                        page.saturating_sub(1) as u32,
                        console.config.view.page_size as u32,
                    );
                    interventions
                        .search_page(&filter, &request)
                        .await
                        .map(|page| page.content)
                }
                None => interventions.search_all(&filter).await,
            };
            let found = console.settle(result)?;
            print_items(&found, OutputOptions::new(json))
        }
        InterventionAction::Show { id, json } => {
            let intervention = console.settle(interventions.get(&id).await)?;
            print_record(&intervention, OutputOptions::new(json))
        }
        InterventionAction::Create {
            title,
            fields,
            json,
        } => {
            let mut input = InterventionInput {
                titre: title,
                ..Default::default()
            };
            apply_fields(&fields, &mut input);
            let created = console.settle(interventions.create(&input).await)?;
            print_done(
                "created",
                "intervention",
                created
                    .id
                    .map(|id| id.to_string())
                    .unwrap_or_else(|| input.titre.clone()),
                OutputOptions::new(json),
            )
        }
        InterventionAction::Update {
            id,
            title,
            fields,
            json,
        } => {
            let existing = console.settle(interventions.get(&id).await)?;
            let mut input = InterventionInput::from(&existing);
            if let Some(title) = title {
                input.titre = title;
            }
            apply_fields(&fields, &mut input);
            console.settle(interventions.update(&id, &input).await)?;
            print_done("updated", "intervention", id, OutputOptions::new(json))
        }
        InterventionAction::Delete { id, json } => {
            console.settle(interventions.delete(&id).await)?;
            print_done("deleted", "intervention", id, OutputOptions::new(json))
        }
        InterventionAction::Status { id, status, json } => {
            let updated = console.settle(interventions.set_status(id, status).await)?;
            print_transition(&updated, OutputOptions::new(json))
        }
        InterventionAction::Start { id, json } => {
            let updated = console.settle(interventions.start(id).await)?;
            print_transition(&updated, OutputOptions::new(json))
        }
        InterventionAction::Complete { id, duration, json } => {
            let updated = console.settle(interventions.complete(id, duration).await)?;
            print_transition(&updated, OutputOptions::new(json))
        }
        InterventionAction::Validate { id, json } => {
            let updated = console.settle(interventions.validate(id).await)?;
            print_transition(&updated, OutputOptions::new(json))
        }
        InterventionAction::Suspend { id, reason, json } => {
            let updated = console.settle(interventions.suspend(id, reason.as_deref()).await)?;
            print_transition(&updated, OutputOptions::new(json))
        }
        InterventionAction::Cancel { id, reason, json } => {
            let updated = console.settle(interventions.cancel(id, reason.as_deref()).await)?;
            print_transition(&updated, OutputOptions::new(json))
        }
        InterventionAction::Assign {
            id,
            technician,
            json,
        } => {
            let updated = console.settle(interventions.assign(id, technician).await)?;
            let name = updated
                .technicien_assigne
                .as_ref()
                .map(|t| t.full_name())
                .unwrap_or_else(|| technician.to_string());
            CommandOutput::new(json!({
                "action": "assign",
                "id": id,
                "technicien_id": technician,
            }))
            .with_text(format!(
                "Assigned intervention {} to {}",
                id.to_string().cyan(),
                name
            ))
            .print(OutputOptions::new(json))
        }
        InterventionAction::Unassign { id, json } => {
            console.settle(interventions.unassign(id).await)?;
            print_done("unassigned", "intervention", id, OutputOptions::new(json))
        }
        InterventionAction::Overdue { json } => {
            let found = console.settle(interventions.overdue().await)?;
            print_items(&found, OutputOptions::new(json))
        }
        InterventionAction::Critical { json } => {
            let found = console.settle(interventions.critical().await)?;
            print_items(&found, OutputOptions::new(json))
        }
        InterventionAction::Upcoming { days, json } => {
            let found = console.settle(interventions.upcoming(days).await)?;
            print_items(&found, OutputOptions::new(json))
        }
        InterventionAction::For { owner, id, json } => {
            let found = console.settle(interventions.owned_by(owner, id).await)?;
            print_items(&found, OutputOptions::new(json))
        }
        InterventionAction::Stats { from, to, json } => {
            let result = match (from, to) {
                (Some(from), Some(to)) => interventions.stats_for_period(&from, &to).await,
                _ => interventions.stats().await,
            };
            let stats = console.settle(result)?;
            print_record(&stats, OutputOptions::new(json))
        }
        InterventionAction::Export {
            format,
            filter,
            export,
        } => {
            let filter = InterventionFilter::from(&filter);
            let bytes = console.settle(interventions.export(format, &filter).await)?;
            let default_name = format!("interventions.{}", format.extension());
            write_export(&bytes, &export, &default_name)
        }
        InterventionAction::BulkStatus { status, ids, json } => {
            console.settle(
                interventions
                    .bulk_update(&ids, BulkInterventionUpdate::Status(status))
                    .await,
            )?;
            CommandOutput::new(json!({ "action": "bulk_status", "status": status, "ids": ids }))
                .with_text(format!(
                    "Set {} intervention(s) to {}",
                    ids.len(),
                    status.badge()
                ))
                .print(OutputOptions::new(json))
        }
        InterventionAction::BulkAssign {
            technician,
            ids,
            json,
        } => {
            console.settle(
                interventions
                    .bulk_update(&ids, BulkInterventionUpdate::Assign(technician))
                    .await,
            )?;
            CommandOutput::new(json!({
                "action": "bulk_assign",
                "technicien_id": technician,
                "ids": ids,
            }))
            .with_text(format!(
                "Assigned {} intervention(s) to technician {}",
                ids.len(),
                technician.to_string().cyan()
            ))
            .print(OutputOptions::new(json))
        }
        InterventionAction::BulkDelete { ids, json } => {
            console.settle(interventions.bulk_delete(&ids).await)?;
            CommandOutput::new(json!({ "action": "bulk_delete", "ids": ids }))
                .with_text(format!("Deleted {} intervention(s)", ids.len()))
                .print(OutputOptions::new(json))
        }
    }
}

fn print_transition(intervention: &Intervention, output: OutputOptions) -> Result<()> {
    let id = intervention.id.map(|id| id.to_string()).unwrap_or_default();
    let status = intervention
        .statut
        .map(|s| s.badge())
        .unwrap_or_else(|| "-".to_string());
    CommandOutput::new(json!({
        "action": "status",
        "id": id,
        "statut": intervention.statut,
    }))
    .with_text(format!("Intervention {} is now {}", id.cyan(), status))
    .print(output)
}

fn apply_fields(fields: &InterventionFields, input: &mut InterventionInput) {
    let fields = fields.clone();
    if fields.description.is_some() {
        input.description = fields.description;
    }
    if fields.kind.is_some() {
        input.type_intervention = fields.kind;
    }
    if fields.priority.is_some() {
        input.priorite = fields.priority;
    }
    if fields.status.is_some() {
        input.statut = fields.status;
    }
    if fields.due.is_some() {
        input.date_echeance = fields.due;
    }
    if fields.estimate.is_some() {
        input.duree_estimee = fields.estimate;
    }
    if fields.cost.is_some() {
        input.cout = fields.cost;
    }
    if fields.asset.is_some() {
        input.asset_id = fields.asset;
    }
    if fields.technician.is_some() {
        input.technicien_id = fields.technician;
    }
    if fields.service.is_some() {
        input.service_id = fields.service;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{InterventionStatus, Priority};

    #[test]
    fn test_apply_fields_keeps_unset_values() {
        let mut input = InterventionInput {
            titre: "Calibrate theodolite".to_string(),
            priorite: Some(Priority::Basse),
            technicien_id: Some(3),
            ..Default::default()
        };
        apply_fields(
            &InterventionFields {
                priority: Some(Priority::Critique),
                status: Some(InterventionStatus::Planifiee),
                ..Default::default()
            },
            &mut input,
        );
        assert_eq!(input.priorite, Some(Priority::Critique));
        assert_eq!(input.statut, Some(InterventionStatus::Planifiee));
        assert_eq!(input.technicien_id, Some(3));
    }
}
