#![allow(dead_code)]

use std::path::{Path, PathBuf};
use std::process::{Command, Output};

use base64::Engine;
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use serde_json::Value;
use tempfile::TempDir;

/// Path of the console binary built for this test run.
pub fn gactifs_binary() -> &'static str {
    env!("CARGO_BIN_EXE_gactifs")
}

/// Build an unsigned bearer token carrying `payload` as its claims.
pub fn token_with(payload: &Value) -> String {
    let header = URL_SAFE_NO_PAD.encode(br#"{"alg":"HS256","typ":"JWT"}"#);
    let body = URL_SAFE_NO_PAD.encode(payload.to_string());
    format!("{header}.{body}.signature")
}

/// Runs gactifs commands against an isolated state directory.
pub struct ConsoleTest {
    pub temp_dir: TempDir,
    api_url: Option<String>,
}

impl ConsoleTest {
    pub fn new() -> Self {
        let temp_dir = TempDir::new().expect("Failed to create temp directory");
        ConsoleTest {
            temp_dir,
            api_url: None,
        }
    }

    /// Point every command at a backend (usually a local mock server).
    pub fn with_api(mut self, url: impl Into<String>) -> Self {
        self.api_url = Some(url.into());
        self
    }

    pub fn root(&self) -> PathBuf {
        self.temp_dir.path().join(".gactifs")
    }

    pub fn session_file(&self) -> PathBuf {
        self.root().join("session.json")
    }

    pub fn run(&self, args: &[&str]) -> Output {
        self.run_with_stdin(args, None)
    }

    pub fn run_with_stdin(&self, args: &[&str], stdin: Option<&str>) -> Output {
        use std::io::Write;
        use std::process::Stdio;

        let mut command = Command::new(gactifs_binary());
        command
            .args(args)
            .current_dir(self.temp_dir.path())
            .env("GACTIFS_ROOT", self.root())
            .env_remove("GACTIFS_LOG")
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped());
        match &self.api_url {
            Some(url) => command.env("GACTIFS_API_URL", url),
            None => command.env_remove("GACTIFS_API_URL"),
        };

        let mut child = command.spawn().expect("Failed to execute gactifs command");
        if let Some(input) = stdin
            && let Some(mut pipe) = child.stdin.take()
        {
            pipe.write_all(input.as_bytes())
                .expect("Failed to write to gactifs stdin");
        }
        child.wait_with_output().expect("Failed to wait for gactifs")
    }

    pub fn run_success(&self, args: &[&str]) -> String {
        let output = self.run(args);
        if !output.status.success() {
            panic!(
                "Command {:?} failed with status {:?}\nstdout: {}\nstderr: {}",
                args,
                output.status,
                String::from_utf8_lossy(&output.stdout),
                String::from_utf8_lossy(&output.stderr)
            );
        }
        String::from_utf8_lossy(&output.stdout).to_string()
    }

    pub fn run_failure(&self, args: &[&str]) -> String {
        let output = self.run(args);
        assert!(
            !output.status.success(),
            "Expected command {:?} to fail, but it succeeded",
            args
        );
        String::from_utf8_lossy(&output.stderr).to_string()
    }

    pub fn write_session(&self, content: &str) {
        write_file(&self.session_file(), content);
    }

    pub fn read_session(&self) -> Option<String> {
        std::fs::read_to_string(self.session_file()).ok()
    }
}

fn write_file(path: &Path, content: &str) {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent).expect("Failed to create state directory");
    }
    std::fs::write(path, content).expect("Failed to write state file");
}
