use owo_colors::OwoColorize;
use serde_json::json;

use super::listing::{criteria, show_listing, with_equals};
use super::{CommandOutput, Console, print_done, print_record};
use crate::cli::{NotificationAction, OutputOptions};
use crate::error::Result;
use crate::gateway::WALK_PAGE_SIZE;
use crate::models::{NotificationInput, NotificationStatus};

pub async fn cmd_notifications(action: NotificationAction) -> Result<()> {
    let console = Console::connect()?;
    let notifications = console.gateway().notifications();

    match action {
        NotificationAction::Ls {
            list,
            user,
            status,
            unread,
        } => {
            let result = match (user, list.server_page) {
                (Some(user), _) => notifications.for_user(user, status).await,
                (None, Some(page)) => {
                    let size = list.page_size.unwrap_or(console.config.view.page_size);
                    notifications
                        .list_page(page.saturating_sub(1) as u32, size as u32)
                        .await
                }
                (None, None) => notifications.list_page(0, WALK_PAGE_SIZE).await,
            };
            let items = console.settle(result)?;
            let mut criteria = criteria(&list)?;
            if unread {
                with_equals(&mut criteria, "statut", Some(NotificationStatus::NonLue));
            }
            show_listing(&console, &list, items, criteria)
        }
        NotificationAction::Read { id, json } => {
            console.settle(notifications.mark_read(id).await)?;
            CommandOutput::new(json!({ "action": "mark_read", "id": id }))
                .with_text(format!("Marked notification {} as read", id.to_string().cyan()))
                .print(OutputOptions::new(json))
        }
        NotificationAction::ReadAll { user, json } => {
            console.settle(notifications.mark_all_read(user).await)?;
            CommandOutput::new(json!({ "action": "mark_all_read", "user": user }))
                .with_text(format!(
                    "Marked all notifications of user {} as read",
                    user.to_string().cyan()
                ))
                .print(OutputOptions::new(json))
        }
        NotificationAction::Archive { id, json } => {
            console.settle(notifications.archive(id).await)?;
            print_done("archived", "notification", id, OutputOptions::new(json))
        }
        NotificationAction::Delete { id, json } => {
            console.settle(notifications.delete(&id).await)?;
            print_done("deleted", "notification", id, OutputOptions::new(json))
        }
        NotificationAction::Send {
            user,
            title,
            message,
            kind,
            priority,
            reclamation,
            json,
        } => {
            let input = NotificationInput {
                titre: title,
                message,
                kind,
                priorite: priority,
                utilisateur_id: user,
                reclamation_id: reclamation,
            };
            let sent = console.settle(notifications.send(&input).await)?;
            print_done(
                "sent",
                "notification",
                sent.id.map(|id| id.to_string()).unwrap_or_else(|| input.titre.clone()),
                OutputOptions::new(json),
            )
        }
        NotificationAction::Stats { user, json } => {
            let stats = console.settle(notifications.stats(user).await)?;
            print_record(&stats, OutputOptions::new(json))
        }
        NotificationAction::Watch => {
            let arrived = console.settle(notifications.realtime().await)?;
            for notification in arrived {
                println!("{} {}", notification.titre.bold(), notification.message);
            }
            Ok(())
        }
    }
}
