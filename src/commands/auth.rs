//! Session commands: login, logout, whoami, refresh, register and password
//! recovery.

use owo_colors::OwoColorize;
use serde_json::json;

use super::{CommandOutput, Console, read_secret};
use crate::cli::{OutputOptions, PasswordAction};
use crate::error::{ConsoleError, Result};
use crate::gateway::RegisterRequest;
use crate::models::UserRole;
use crate::session::SessionContext;

/// Log in and persist the session.
pub async fn cmd_login(email: &str, password: Option<String>, output: OutputOptions) -> Result<()> {
    let console = Console::open()?;
    let password = read_secret(password, "Password")?;
    let response = console.gateway().auth().login(email, &password).await?;
    console.persist()?;

    let session = console.session();
    let name = session
        .current_user()
        .map(|u| u.display_name())
        .unwrap_or_else(|| email.to_string());
    let role = session.role_name();

    CommandOutput::new(json!({
        "action": "login",
        "email": email,
        "role": role,
        "user": response.user,
    }))
    .with_text(format!(
        "Logged in as {} ({})",
        name.cyan(),
        role.as_deref().unwrap_or("no role")
    ))
    .print(output)
}

/// Tell the backend and forget the stored session.
pub async fn cmd_logout(output: OutputOptions) -> Result<()> {
    let console = Console::open()?;
    let had_session = console.session().has_token();
    console.gateway().auth().logout().await?;
    console.persist()?;

    let text = if had_session {
        "Logged out".to_string()
    } else {
        "Not logged in".dimmed().to_string()
    };
    CommandOutput::new(json!({ "action": "logout", "success": true }))
        .with_text(text)
        .print(output)
}

/// Show who the stored session belongs to.
pub fn cmd_whoami(output: OutputOptions) -> Result<()> {
    let console = Console::open()?;
    let session = console.session();
    session.guard()?;

    CommandOutput::new(whoami_json(session))
        .with_text(whoami_text(session))
        .print(output)
}

fn whoami_json(session: &SessionContext) -> serde_json::Value {
    let claims = session.claims();
    let permissions: serde_json::Map<String, serde_json::Value> = session
        .permissions()
        .entries()
        .iter()
        .map(|(name, allowed)| (name.to_string(), json!(allowed)))
        .collect();
    json!({
        "user": session.current_user(),
        "role": session.role_name(),
        "subject": claims.as_ref().and_then(|c| c.subject.clone()),
        "expires_at": claims.as_ref().and_then(|c| c.expiry()).map(|t| t.to_string()),
        "permissions": permissions,
    })
}

fn whoami_text(session: &SessionContext) -> String {
    let mut text = format!("{}\n\n", "Session:".cyan().bold());

    let user = session.current_user();
    let name = user
        .as_ref()
        .map(|u| u.display_name())
        .or_else(|| session.claims().and_then(|c| c.subject))
        .unwrap_or_else(|| "unknown".to_string());
    text.push_str(&format!("{}: {}\n", "user".cyan(), name));
    if let Some(email) = user.as_ref().and_then(|u| u.email.as_deref()) {
        text.push_str(&format!("{}: {}\n", "email".cyan(), email));
    }
    text.push_str(&format!(
        "{}: {}\n",
        "role".cyan(),
        session.role_name().as_deref().unwrap_or("-")
    ));
    if let Some(expiry) = session.claims().and_then(|c| c.expiry()) {
        text.push_str(&format!(
            "{}: {}\n",
            "expires".cyan(),
            expiry.strftime("%Y-%m-%d %H:%M UTC")
        ));
    }

    text.push_str(&format!("\n{}:\n", "permissions".cyan()));
    for (name, allowed) in session.permissions().entries() {
        let mark = if allowed {
            "yes".green().to_string()
        } else {
            "no".dimmed().to_string()
        };
        text.push_str(&format!("  {name}: {mark}\n"));
    }
    text.trim_end().to_string()
}

/// Exchange the current token for a fresh one.
pub async fn cmd_refresh(output: OutputOptions) -> Result<()> {
    let console = Console::open()?;
    if !console.session().has_token() {
        return Err(ConsoleError::Unauthenticated);
    }
    let result = console.gateway().auth().refresh().await;
    console.settle(result)?;
    console.persist()?;

    let expiry = console
        .session()
        .claims()
        .and_then(|c| c.expiry())
        .map(|t| t.strftime("%Y-%m-%d %H:%M UTC").to_string());
    CommandOutput::new(json!({ "action": "refresh", "expires_at": expiry }))
        .with_text(match expiry {
            Some(expiry) => format!("Session refreshed, valid until {}", expiry.cyan()),
            None => "Session refreshed".to_string(),
        })
        .print(output)
}

/// Create an account, logging in when the backend hands back a token.
pub async fn cmd_register(
    first_name: String,
    last_name: String,
    email: String,
    password: Option<String>,
    role: Option<UserRole>,
    output: OutputOptions,
) -> Result<()> {
    let console = Console::open()?;
    let request = RegisterRequest {
        first_name,
        last_name,
        email,
        password: read_secret(password, "Password")?,
        role,
    };
    let response = console.gateway().auth().register(&request).await?;
    let logged_in = response.has_token();
    if logged_in {
        console.persist()?;
    }

    let mut text = format!("Registered {}", request.email.cyan());
    if logged_in {
        text.push_str(" and logged in");
    }
    CommandOutput::new(json!({
        "action": "register",
        "email": request.email,
        "logged_in": logged_in,
        "user": response.user,
    }))
    .with_text(text)
    .print(output)
}

pub async fn cmd_password(action: PasswordAction) -> Result<()> {
    match action {
        PasswordAction::Change { current, new, json } => {
            let console = Console::connect()?;
            let current = read_secret(current, "Current password")?;
            let new = read_secret(new, "New password")?;
            let result = console.gateway().auth().change_password(&current, &new).await;
            let message = console.settle(result)?;
            print_message(
                "change_password",
                message,
                "Password changed",
                OutputOptions::new(json),
            )
        }
        PasswordAction::Forgot { email, json } => {
            let console = Console::open()?;
            let message = console.gateway().auth().forgot_password(&email).await?;
            print_message(
                "forgot_password",
                message,
                &format!("Reset instructions sent to {email}"),
                OutputOptions::new(json),
            )
        }
        PasswordAction::Reset { token, new, json } => {
            let console = Console::open()?;
            let new = read_secret(new, "New password")?;
            let message = console.gateway().auth().reset_password(&token, &new).await?;
            print_message(
                "reset_password",
                message,
                "Password reset",
                OutputOptions::new(json),
            )
        }
        PasswordAction::Check { token, json } => {
            let console = Console::open()?;
            let valid = console.gateway().auth().validate_reset_token(&token).await?;
            let text = if valid {
                "Reset token is valid".green().to_string()
            } else {
                "Reset token is invalid or expired".red().to_string()
            };
            CommandOutput::new(json!({ "action": "validate_reset_token", "valid": valid }))
                .with_text(text)
                .print(OutputOptions::new(json))
        }
    }
}

fn print_message(
    action: &str,
    message: Option<String>,
    fallback: &str,
    output: OutputOptions,
) -> Result<()> {
    let text = message
        .filter(|m| !m.trim().is_empty())
        .unwrap_or_else(|| fallback.to_string());
    CommandOutput::new(json!({ "action": action, "message": text, "success": true }))
        .with_text(text)
        .print(output)
}
