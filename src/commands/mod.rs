//! Command implementations behind the CLI.
//!
//! Every command opens a [`Console`] (configuration, stored session and
//! gateway), does its work and prints through [`CommandOutput`] so that
//! `--json` and human output come from the same data.

mod assets;
mod auth;
mod browse;
mod categories;
mod config;
mod history;
mod interventions;
mod listing;
mod notifications;
mod reclamations;
mod services;
mod technicians;
mod users;

pub use assets::cmd_assets;
pub use auth::{cmd_login, cmd_logout, cmd_password, cmd_refresh, cmd_register, cmd_whoami};
pub use browse::cmd_browse;
pub use categories::cmd_categories;
pub use config::{cmd_config_get, cmd_config_set, cmd_config_show};
pub use history::cmd_history;
pub use interventions::cmd_interventions;
pub use notifications::cmd_notifications;
pub use reclamations::cmd_reclamations;
pub use services::cmd_services;
pub use technicians::cmd_technicians;
pub use users::cmd_users;

use std::fs;
use std::io::{self, BufRead, IsTerminal, Write};
use std::path::PathBuf;

use owo_colors::OwoColorize;
use secrecy::SecretString;
use serde::Serialize;
use serde_json::{Value, json};
use tracing::debug;

use crate::cli::{ExportArgs, OutputOptions};
use crate::config::Config;
use crate::display::render_record;
use crate::error::{ConsoleError, Result};
use crate::gateway::Gateway;
use crate::session::{SessionContext, SessionStore};

/// A command result, printed as JSON or as text.
pub struct CommandOutput {
    json: Value,
    text: Option<String>,
}

impl CommandOutput {
    pub fn new(json: Value) -> Self {
        CommandOutput { json, text: None }
    }

    pub fn with_text(mut self, text: impl Into<String>) -> Self {
        self.text = Some(text.into());
        self
    }

    pub fn print(self, output: OutputOptions) -> Result<()> {
        match self.text {
            Some(text) if !output.json => {
                println!("{text}");
                Ok(())
            }
            _ => print_json(&self.json),
        }
    }
}

pub fn print_json(value: &Value) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

/// Print one record as aligned fields, or as JSON.
pub fn print_record<T: Serialize>(record: &T, output: OutputOptions) -> Result<()> {
    CommandOutput::new(serde_json::to_value(record)?)
        .with_text(render_record(record)?)
        .print(output)
}

/// Confirmation line of a mutation, e.g. `Deleted asset 12`.
pub fn print_done(
    action: &str,
    label: &str,
    id: impl ToString,
    output: OutputOptions,
) -> Result<()> {
    let id = id.to_string();
    CommandOutput::new(json!({
        "action": action,
        "entity": label,
        "id": id,
        "success": true,
    }))
    .with_text(format!("{} {} {}", capitalize(action), label, id.cyan()))
    .print(output)
}

fn capitalize(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

/// Configuration, stored session and gateway of one invocation.
pub struct Console {
    pub config: Config,
    store: SessionStore,
    gateway: Gateway,
}

impl Console {
    /// Load configuration and the persisted session, logged in or not.
    pub fn open() -> Result<Self> {
        let config = Config::load()?;
        let store = SessionStore::default();
        let session = SessionContext::restore(store.load()?);
        let gateway = Gateway::new(&config, session)?;
        debug!(base_url = gateway.base_url(), "console opened");
        Ok(Console {
            config,
            store,
            gateway,
        })
    }

    /// Like [`Console::open`], but fail unless the session is authenticated.
    pub fn connect() -> Result<Self> {
        let console = Self::open()?;
        console.session().guard()?;
        Ok(console)
    }

    pub fn gateway(&self) -> &Gateway {
        &self.gateway
    }

    pub fn session(&self) -> &SessionContext {
        self.gateway.session()
    }

    /// Write the session back, or remove the file once it holds no token.
    pub fn persist(&self) -> Result<()> {
        if self.session().has_token() {
            self.store.save(&self.session().snapshot())
        } else {
            self.store.clear()
        }
    }

    /// Persist whatever a failed call did to the session (a 401 clears it).
    pub fn settle<T>(&self, result: Result<T>) -> Result<T> {
        if let Err(ConsoleError::Unauthenticated) = &result {
            self.session().clear();
            self.persist()?;
        }
        result
    }
}

/// Write a downloaded file and report where it went.
pub fn write_export(bytes: &[u8], export: &ExportArgs, default_name: &str) -> Result<()> {
    let path = export
        .output
        .clone()
        .unwrap_or_else(|| PathBuf::from(default_name));
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)?;
    }
    fs::write(&path, bytes)?;
    CommandOutput::new(json!({
        "action": "export",
        "path": path.to_string_lossy(),
        "bytes": bytes.len(),
    }))
    .with_text(format!(
        "Wrote {} bytes to {}",
        bytes.len(),
        path.display().cyan()
    ))
    .print(OutputOptions::new(export.json))
}

/// A password from its flag, or one line of stdin.
///
/// The prompt goes to stderr and only when stdin is a terminal.
pub fn read_secret(flag: Option<String>, prompt: &str) -> Result<SecretString> {
    let value = match flag {
        Some(value) => value,
        None => {
            let stdin = io::stdin();
            if stdin.is_terminal() {
                eprint!("{prompt}: ");
                io::stderr().flush()?;
            }
            let mut line = String::new();
            stdin.lock().read_line(&mut line)?;
            line.trim_end_matches(['\r', '\n']).to_string()
        }
    };
    if value.is_empty() {
        return Err(ConsoleError::InvalidInput(format!(
            "{} cannot be empty",
            prompt.to_lowercase()
        )));
    }
    Ok(SecretString::from(value))
}
