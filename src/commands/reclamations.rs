use owo_colors::OwoColorize;
use serde_json::json;

use super::listing::{criteria, fetch_listing, print_items, show_listing, with_equals};
use super::{CommandOutput, Console, print_done, print_record, write_export};
use crate::cli::{OutputOptions, ReclamationAction, ReclamationFields};
use crate::display::{Badge, short_date};
use crate::error::Result;
use crate::gateway::{PageRequest, Query, ReclamationFilter};
use crate::models::{Commentaire, Reclamation, ReclamationInput};

pub async fn cmd_reclamations(action: ReclamationAction) -> Result<()> {
    let console = Console::connect()?;
    let reclamations = console.gateway().reclamations();

    match action {
        ReclamationAction::Ls {
            list,
            status,
            priority,
            kind,
        } => {
            let items = fetch_listing(&console, reclamations, &list, &Query::new()).await?;
            let mut criteria = criteria(&list)?;
            with_equals(&mut criteria, "statut", status);
            with_equals(&mut criteria, "priorite", priority);
            with_equals(&mut criteria, "typeReclamation", kind);
            show_listing(&console, &list, items, criteria)
        }
        ReclamationAction::Search {
            filter,
            server_page,
            json,
        } => {
            let filter = ReclamationFilter::from(&filter);
            let result = match server_page {
                Some(page) => {
                    let request = PageRequest::new(
                        page.saturating_sub(1) as u32,
                        console.config.view.page_size as u32,
                    );
                    reclamations
                        .search_page(&filter, &request)
                        .await
                        .map(|page| page.content)
                }
                None => reclamations.search_all(&filter).await,
            };
            let found = console.settle(result)?;
            print_items(&found, OutputOptions::new(json))
        }
        ReclamationAction::Show { id, json } => {
            let reclamation = console.settle(reclamations.get(&id).await)?;
            print_record(&reclamation, OutputOptions::new(json))
        }
        ReclamationAction::Create {
            subject,
            fields,
            json,
        } => {
            let mut input = ReclamationInput {
                objet: subject,
                ..Default::default()
            };
            apply_fields(&fields, &mut input);
            let created = console.settle(reclamations.create(&input).await)?;
            print_done("created", "reclamation", label(&created), OutputOptions::new(json))
        }
        ReclamationAction::Update {
            id,
            subject,
            fields,
            json,
        } => {
            let existing = console.settle(reclamations.get(&id).await)?;
            let mut input = ReclamationInput::from(&existing);
            if let Some(subject) = subject {
                input.objet = subject;
            }
            apply_fields(&fields, &mut input);
            console.settle(reclamations.update(&id, &input).await)?;
            print_done("updated", "reclamation", id, OutputOptions::new(json))
        }
        ReclamationAction::Delete { id, json } => {
            console.settle(reclamations.delete(&id).await)?;
            print_done("deleted", "reclamation", id, OutputOptions::new(json))
        }
        ReclamationAction::Status { id, status, json } => {
            let updated = console.settle(reclamations.set_status(id, status).await)?;
            print_transition(&updated, OutputOptions::new(json))
        }
        ReclamationAction::Assign {
            id,
            technician,
            json,
        } => {
            console.settle(reclamations.assign(id, technician).await)?;
            CommandOutput::new(json!({
                "action": "assign",
                "id": id,
                "technicien_id": technician,
            }))
            .with_text(format!(
                "Assigned reclamation {} to technician {}",
                id.to_string().cyan(),
                technician.to_string().cyan()
            ))
            .print(OutputOptions::new(json))
        }
        ReclamationAction::Resolve {
            id,
            resolution,
            cost,
            json,
        } => {
            let updated = console.settle(reclamations.resolve(id, &resolution, cost).await)?;
            print_transition(&updated, OutputOptions::new(json))
        }
        ReclamationAction::Close {
            id,
            satisfaction,
            json,
        } => {
            let updated = console.settle(reclamations.close(id, satisfaction).await)?;
            print_transition(&updated, OutputOptions::new(json))
        }
        ReclamationAction::Comments { id, json } => {
            let comments = console.settle(reclamations.comments(id).await)?;
            CommandOutput::new(serde_json::to_value(&comments)?)
                .with_text(comments_text(id, &comments))
                .print(OutputOptions::new(json))
        }
        ReclamationAction::Comment { id, text, json } => {
            let comment = console.settle(reclamations.add_comment(id, &text).await)?;
            CommandOutput::new(serde_json::to_value(&comment)?)
                .with_text(format!(
                    "Commented on reclamation {}",
                    id.to_string().cyan()
                ))
                .print(OutputOptions::new(json))
        }
        ReclamationAction::Overdue { json } => {
            let found = console.settle(reclamations.overdue().await)?;
            print_items(&found, OutputOptions::new(json))
        }
        ReclamationAction::Stats { json } => {
            let stats = console.settle(reclamations.stats().await)?;
            print_record(&stats, OutputOptions::new(json))
        }
        ReclamationAction::Export {
            format,
            filter,
            export,
        } => {
            let filter = ReclamationFilter::from(&filter);
            let bytes = console.settle(reclamations.export(format, &filter).await)?;
            let default_name = format!("reclamations.{}", format.extension());
            write_export(&bytes, &export, &default_name)
        }
    }
}

fn label(reclamation: &Reclamation) -> String {
    match (reclamation.id, reclamation.numero.as_deref()) {
        (Some(id), Some(numero)) => format!("{id} ({numero})"),
        (Some(id), None) => id.to_string(),
        (None, _) => reclamation.objet.clone(),
    }
}

/// One block per comment: author, kind and date, then the text.
fn comments_text(id: i64, comments: &[Commentaire]) -> String {
    if comments.is_empty() {
        return format!("No comments on reclamation {id}").dimmed().to_string();
    }
    comments
        .iter()
        .map(|c| {
            let mut header = c.auteur.clone().unwrap_or_else(|| "anonymous".to_string());
            if let Some(kind) = c.type_auteur {
                header.push_str(&format!(" ({kind})"));
            }
            format!(
                "{} {}\n  {}",
                header.cyan(),
                short_date(c.date_creation.as_deref()).dimmed(),
                c.contenu
            )
        })
        .collect::<Vec<_>>()
        .join("\n\n")
}

fn print_transition(reclamation: &Reclamation, output: OutputOptions) -> Result<()> {
    let status = reclamation
        .statut
        .map(|s| s.badge())
        .unwrap_or_else(|| "-".to_string());
    CommandOutput::new(json!({
        "action": "status",
        "id": reclamation.id,
        "statut": reclamation.statut,
    }))
    .with_text(format!(
        "Reclamation {} is now {}",
        label(reclamation).cyan(),
        status
    ))
    .print(output)
}

fn apply_fields(fields: &ReclamationFields, input: &mut ReclamationInput) {
    let fields = fields.clone();
    if fields.description.is_some() {
        input.description = fields.description;
    }
    if fields.kind.is_some() {
        input.type_reclamation = fields.kind;
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
    if fields.claimant_name.is_some() {
        input.reclamant_nom = fields.claimant_name;
    }
    if fields.claimant_email.is_some() {
        input.reclamant_email = fields.claimant_email;
    }
    if fields.claimant_phone.is_some() {
        input.reclamant_telephone = fields.claimant_phone;
    }
    if fields.service.is_some() {
        input.service_id = fields.service;
    }
    if fields.asset.is_some() {
        input.asset_id = fields.asset;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::AuthorKind;

    #[test]
    fn test_label_uses_number_when_known() {
        let mut reclamation = Reclamation {
            id: Some(8),
            objet: "Printer jammed".to_string(),
            ..Default::default()
        };
        assert_eq!(label(&reclamation), "8");
        reclamation.numero = Some("REC-2024-008".to_string());
        assert_eq!(label(&reclamation), "8 (REC-2024-008)");
        reclamation.id = None;
        assert_eq!(label(&reclamation), "Printer jammed");
    }

    #[test]
    fn test_comments_text() {
        let comments = vec![
            Commentaire {
                id: Some(1),
                contenu: "Toner vide".to_string(),
                auteur: Some("Awa Ndiaye".to_string()),
                type_auteur: Some(AuthorKind::Reclamant),
                date_creation: Some("2024-06-01T09:00:00".to_string()),
            },
            Commentaire {
                contenu: "Remplacé".to_string(),
                ..Default::default()
            },
        ];
        let text = comments_text(8, &comments);
        assert!(text.contains("Awa Ndiaye"));
        assert!(text.contains("(RECLAMANT)"));
        assert!(text.contains("2024-06-01"));
        assert!(text.contains("  Toner vide"));
        assert!(text.contains("anonymous"));
        assert!(comments_text(8, &[]).contains("No comments on reclamation 8"));
    }
}
