mod common;

use std::process::Command;

use common::{ConsoleTest, token_with};
use serde_json::json;

fn stored_session(exp: i64) -> String {
    json!({
        "token": token_with(&json!({ "sub": "ada@example.org", "role": "TECHNICIEN", "exp": exp })),
        "role": "TECHNICIEN",
        "user": { "id": "u-7", "email": "ada@example.org", "firstName": "Ada", "lastName": "Lovelace" },
    })
    .to_string()
}

// ============================================================================
// Completions
// ============================================================================

#[test]
fn test_completions_bash() {
    let output = Command::new(common::gactifs_binary())
        .args(["completions", "bash"])
        .output()
        .expect("Failed to execute command");

    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("_gactifs"));
}

#[test]
fn test_completions_zsh() {
    let output = Command::new(common::gactifs_binary())
        .args(["completions", "zsh"])
        .output()
        .expect("Failed to execute command");

    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("#compdef gactifs"));
}

// ============================================================================
// Session guard
// ============================================================================

#[test]
fn test_commands_require_a_session() {
    let console = ConsoleTest::new().with_api("http://127.0.0.1:9/api");

    let stderr = console.run_failure(&["assets", "ls"]);
    assert!(stderr.contains("gactifs login"));

    let stderr = console.run_failure(&["whoami"]);
    assert!(stderr.contains("gactifs login"));
}

#[test]
fn test_expired_session_is_refused() {
    let console = ConsoleTest::new().with_api("http://127.0.0.1:9/api");
    console.write_session(&stored_session(1_000_000_000));

    let stderr = console.run_failure(&["categories", "ls"]);
    assert!(stderr.contains("session expired or invalid"));
}

#[test]
fn test_whoami_reads_the_stored_session() {
    let console = ConsoleTest::new();
    console.write_session(&stored_session(2_000_000_000));

    let output = console.run_success(&["whoami"]);
    assert!(output.contains("Ada Lovelace"));
    assert!(output.contains("ada@example.org"));
    assert!(output.contains("TECHNICIEN"));
    assert!(output.contains("2033-05-18"));

    let output = console.run_success(&["whoami", "--json"]);
    let json: serde_json::Value = serde_json::from_str(&output).expect("output should be JSON");
    assert_eq!(json["role"], "TECHNICIEN");
    assert_eq!(json["subject"], "ada@example.org");
}

#[test]
fn test_logout_without_session() {
    let console = ConsoleTest::new();

    let output = console.run_success(&["logout"]);
    assert!(output.contains("Not logged in"));
    assert!(console.read_session().is_none());
}

// ============================================================================
// Argument validation
// ============================================================================

#[test]
fn test_invalid_enum_value_lists_choices() {
    let console = ConsoleTest::new();

    let stderr = console.run_failure(&["assets", "ls", "--status", "BROKEN"]);
    assert!(stderr.contains("Invalid asset status. Must be one of:"));
    assert!(stderr.contains("EN_PANNE"));
}

#[test]
fn test_desc_requires_sort() {
    let console = ConsoleTest::new();

    let stderr = console.run_failure(&["categories", "ls", "--desc"]);
    assert!(stderr.contains("--sort"));
}

#[test]
fn test_page_must_be_positive() {
    let console = ConsoleTest::new();

    let stderr = console.run_failure(&["services", "ls", "--page", "0"]);
    assert!(stderr.contains("at least 1"));
}

#[test]
fn test_register_rejects_malformed_email() {
    let console = ConsoleTest::new();

    let stderr = console.run_failure(&[
        "register",
        "--first-name",
        "Ada",
        "--last-name",
        "Lovelace",
        "--email",
        "not-an-email",
        "--password",
        "s3cret",
    ]);
    assert!(stderr.to_lowercase().contains("email"));
}
