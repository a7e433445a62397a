//! CLI integration tests for the `ghnotes` binary.
//!
//! These tests spawn the binary as a subprocess against a temporary database
//! to verify exit behaviour and the JSON written to stdout. No scenario here
//! references a pull request, so GitHub is never contacted.

mod support;

use std::path::Path;
use std::process::{Command, Output};

use rstest::rstest;
use serde_json::Value;

use support::create_temp_dir;

fn run_ghnotes(workdir: &Path, args: &[&str]) -> Output {
    let mut command = Command::new(env!("CARGO_BIN_EXE_ghnotes"));
    command.args(args).current_dir(workdir);

    // Keep runs hermetic even if the developer has ghnotes settings.
    command
        .env("HOME", workdir)
        .env("XDG_CONFIG_HOME", workdir)
        .env_remove("GHNOTES_DATABASE_URL")
        .env_remove("GHNOTES_MIGRATE_DB")
        .env_remove("GHNOTES_USER")
        .env_remove("GHNOTES_COMMAND")
        .env_remove("GHNOTES_GITHUB_TOKEN")
        .env_remove("RUST_LOG");

    command
        .output()
        .unwrap_or_else(|error| panic!("failed to execute binary: {error}"))
}

fn assert_success(output: &Output) {
    assert!(
        output.status.success(),
        "expected successful exit, got: {:?}\nstderr: {}",
        output.status,
        String::from_utf8_lossy(&output.stderr)
    );
}

fn stdout_json(output: &Output) -> Value {
    serde_json::from_slice(&output.stdout).unwrap_or_else(|error| {
        panic!(
            "stdout should be JSON ({error}): {}",
            String::from_utf8_lossy(&output.stdout)
        )
    })
}

#[test]
fn migrate_db_creates_the_database_and_emits_telemetry() {
    let temp_dir = create_temp_dir();
    let db_path = temp_dir.path().join("ghnotes.sqlite");
    let db_url = db_path.to_string_lossy().to_string();

    let output = run_ghnotes(temp_dir.path(), &["--migrate-db", "--database-url", &db_url]);

    assert_success(&output);
    assert!(db_path.exists(), "database file should be created");
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(
        stderr.contains("\"schema_version_recorded\""),
        "expected schema telemetry on stderr, got: {stderr}"
    );
}

#[rstest]
#[case::missing_command(&["--database-url", "notes.sqlite", "--user", "alice"], "a command is required")]
#[case::unknown_command(&["--command", "archive"], "unknown command 'archive'")]
#[case::missing_database_url(&["--command", "list", "--user", "alice"], "database URL is required")]
#[case::missing_user(&["--command", "list", "--database-url", "notes.sqlite"], "user is required")]
fn invalid_invocations_fail_with_a_message(#[case] args: &[&str], #[case] expected: &str) {
    let temp_dir = create_temp_dir();

    let output = run_ghnotes(temp_dir.path(), args);

    assert!(!output.status.success(), "expected failure exit status");
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(
        stderr.contains(expected),
        "expected stderr to contain {expected:?}, got: {stderr}"
    );
}

#[test]
fn note_commands_round_trip_through_the_binary() {
    let temp_dir = create_temp_dir();
    let db_url = temp_dir
        .path()
        .join("ghnotes.sqlite")
        .to_string_lossy()
        .to_string();
    let workdir = temp_dir.path();
    let base = ["--database-url", db_url.as_str(), "--user", "alice"];
    let with_base = |extra: &[&str]| -> Vec<String> {
        base.iter()
            .chain(extra)
            .map(|arg| (*arg).to_owned())
            .collect()
    };
    let run = |args: Vec<String>| {
        let borrowed: Vec<&str> = args.iter().map(String::as_str).collect();
        run_ghnotes(workdir, &borrowed)
    };

    assert_success(&run(with_base(&["--migrate-db"])));

    let created = run(with_base(&[
        "--command",
        "create",
        "--title",
        "Release checklist",
        "--content",
        "Tag after CI",
    ]));
    assert_success(&created);
    let note = stdout_json(&created);
    let note_id = note
        .get("id")
        .and_then(Value::as_str)
        .unwrap_or_else(|| panic!("created note should have an id: {note}"))
        .to_owned();
    assert_eq!(
        note.get("pull_requests").and_then(Value::as_array).map(Vec::len),
        Some(0)
    );

    let listed = run(with_base(&["--command", "list", "--search", "checklist"]));
    assert_success(&listed);
    assert_eq!(
        stdout_json(&listed).get("total").and_then(Value::as_u64),
        Some(1)
    );

    let deleted = run(with_base(&["--command", "delete", "--note-id", &note_id]));
    assert_success(&deleted);
    assert_eq!(
        stdout_json(&deleted).get("deleted").and_then(Value::as_str),
        Some(note_id.as_str())
    );

    let shown = run(with_base(&["--command", "show", "--note-id", &note_id]));
    assert!(!shown.status.success(), "deleted note should not be shown");
}

#[test]
fn linking_without_a_profile_token_is_refused() {
    let temp_dir = create_temp_dir();
    let db_url = temp_dir
        .path()
        .join("ghnotes.sqlite")
        .to_string_lossy()
        .to_string();
    assert_success(&run_ghnotes(
        temp_dir.path(),
        &["--migrate-db", "--database-url", &db_url],
    ));

    let output = run_ghnotes(
        temp_dir.path(),
        &[
            "--database-url",
            &db_url,
            "--user",
            "alice",
            "--command",
            "create",
            "--title",
            "Review",
            "--repo-owner",
            "acme",
            "--repo-name",
            "widgets",
            "--pr-number",
            "42",
        ],
    );

    assert!(!output.status.success(), "expected failure exit status");
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(
        stderr.contains("remote credential required"),
        "expected a credential error, got: {stderr}"
    );
}
