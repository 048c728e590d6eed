use owo_colors::OwoColorize;
use secrecy::ExposeSecret;
use serde_json::json;

use super::listing::{criteria, fetch_listing, print_items, show_listing};
use super::{CommandOutput, Console, print_done, print_record, read_secret};
use crate::cli::{OutputOptions, UserAction};
use crate::error::Result;
use crate::gateway::Query;
use crate::models::UserInput;

pub async fn cmd_users(action: UserAction) -> Result<()> {
    let console = Console::connect()?;
    let users = console.gateway().users();

    match action {
        UserAction::Ls { list, role, active } => {
            let items = match (role, active) {
                (Some(role), _) => console.settle(users.by_role(role).await)?,
                (None, true) => console.settle(users.active().await)?,
                (None, false) => fetch_listing(&console, users, &list, &Query::new()).await?,
            };
            show_listing(&console, &list, items, criteria(&list)?)
        }
        UserAction::Search { text, json } => {
            let found = console.settle(users.search_text(&text).await)?;
            print_items(&found, OutputOptions::new(json))
        }
        UserAction::Show { id, json } => {
            let user = console.settle(users.get(&id).await)?;
            print_record(&user, OutputOptions::new(json))
        }
        UserAction::Create {
            first_name,
            last_name,
            email,
            role,
            password,
            json,
        } => {
            let password = read_secret(password, "Password")?;
            let input = UserInput {
                first_name: Some(first_name),
                last_name: Some(last_name),
                email: Some(email.clone()),
                password: Some(password.expose_secret().to_string()),
                role: Some(role),
                is_active: Some(true),
            };
            let created = console.settle(users.create(&input).await)?;
            print_done("created", "user", created.id.unwrap_or(email), OutputOptions::new(json))
        }
        UserAction::Update {
            id,
            first_name,
            last_name,
            email,
            role,
            json,
        } => {
            let input = UserInput {
                first_name,
                last_name,
                email,
                role,
                ..Default::default()
            };
            console.settle(users.update(&id, &input).await)?;
            print_done("updated", "user", id, OutputOptions::new(json))
        }
        UserAction::Delete { id, json } => {
            console.settle(users.delete(&id).await)?;
            print_done("deleted", "user", id, OutputOptions::new(json))
        }
        UserAction::Activate { id, json } => {
            console.settle(users.activate(&id).await)?;
            print_done("activated", "user", id, OutputOptions::new(json))
        }
        UserAction::Deactivate { id, json } => {
            console.settle(users.deactivate(&id).await)?;
            print_done("deactivated", "user", id, OutputOptions::new(json))
        }
        UserAction::Passwd {
            id,
            current,
            new,
            json,
        } => {
            let current = read_secret(current, "Current password")?;
            let new = read_secret(new, "New password")?;
            console.settle(users.change_password(&id, &current, &new).await)?;
            CommandOutput::new(json!({ "action": "change_password", "id": id, "success": true }))
                .with_text(format!("Changed password of user {}", id.cyan()))
                .print(OutputOptions::new(json))
        }
        UserAction::ResetPassword { id, json } => {
            let temporary = console.settle(users.reset_password(&id).await)?;
            CommandOutput::new(json!({
                "action": "reset_password",
                "id": id,
                "temporary_password": temporary.expose_secret(),
            }))
            .with_text(format!(
                "Temporary password for user {}: {}",
                id.cyan(),
                temporary.expose_secret().bold()
            ))
            .print(OutputOptions::new(json))
        }
        UserAction::Stats { json } => {
            let stats = console.settle(users.stats().await)?;
            print_record(&stats, OutputOptions::new(json))
        }
    }
}
