//! End-to-end tests for the sq binary
//!
//! These run without a storage server: every case fails or finishes before
//! a select request would be sent.

use std::path::Path;
use std::process::{Command, Output};

use clap::Parser;
use sq_cli::commands::{Cli, Commands};
use tempfile::TempDir;

/// Run sq with an isolated config directory
fn run_sq(args: &[&str], config_dir: &Path) -> Output {
    Command::new(env!("CARGO_BIN_EXE_sq"))
        .args(args)
        .env("SQ_CONFIG_DIR", config_dir)
        .env_remove("RUST_LOG")
        .output()
        .expect("Failed to execute sq command")
}

fn stderr(output: &Output) -> String {
    String::from_utf8_lossy(&output.stderr).into_owned()
}

#[test]
fn test_parse_query_command() {
    let cli = Cli::try_parse_from([
        "sq",
        "query",
        "local/foobarbaz/users.ndjson",
        "SELECT s.name FROM S3Object s",
        "--document-type",
        "JSON",
        "--delimiter",
        "\n",
        "--stream",
        "--json",
    ])
    .unwrap();

    assert!(cli.json);
    assert!(matches!(cli.command, Commands::Query(_)));
}

#[test]
fn test_query_requires_path_and_expression() {
    assert!(Cli::try_parse_from(["sq", "query"]).is_err());
    assert!(Cli::try_parse_from(["sq", "query", "local/b/k"]).is_err());
}

#[test]
fn test_request_file_needs_alias() {
    assert!(Cli::try_parse_from(["sq", "query", "--request", "req.json"]).is_err());
    assert!(
        Cli::try_parse_from(["sq", "query", "--request", "req.json", "--alias", "local"]).is_ok()
    );
}

#[test]
fn test_unknown_document_type_exits_with_usage_error() {
    let config = TempDir::new().unwrap();
    let output = run_sq(
        &[
            "query",
            "local/mybucket/foo.json",
            "SELECT * FROM S3Object s",
            "--document-type",
            "csv",
            "--delimiter",
            "\n",
        ],
        config.path(),
    );

    assert_eq!(output.status.code(), Some(2));
    assert!(stderr(&output).contains("Unknown documentType `csv`"));
}

#[test]
fn test_delimiter_length_exits_with_usage_error() {
    let config = TempDir::new().unwrap();
    let output = run_sq(
        &[
            "query",
            "local/mybucket/foo.json",
            "SELECT * FROM S3Object s",
            "--document-type",
            "NDJSON",
            "--delimiter",
            "$$",
            "--json",
        ],
        config.path(),
    );

    assert_eq!(output.status.code(), Some(2));
    let err: serde_json::Value = serde_json::from_str(stderr(&output).trim()).unwrap();
    assert_eq!(err["error"], "Delimiter must have length `1`, found 2");
}

#[test]
fn test_request_file_validation() {
    let config = TempDir::new().unwrap();
    let request = config.path().join("request.json");
    std::fs::write(&request, r#"{"bucket": "mybucket"}"#).unwrap();

    let output = run_sq(
        &[
            "query",
            "--request",
            request.to_str().unwrap(),
            "--alias",
            "local",
        ],
        config.path(),
    );

    assert_eq!(output.status.code(), Some(2));
    assert!(stderr(&output).contains("Key `undefined` should be a string"));
}

#[test]
fn test_unknown_alias_exits_not_found() {
    let config = TempDir::new().unwrap();
    let output = run_sq(
        &["query", "missing/mybucket/foo.json", "SELECT * FROM S3Object s"],
        config.path(),
    );

    assert_eq!(output.status.code(), Some(5));
    assert!(stderr(&output).contains("Alias 'missing' not found"));
}

#[test]
fn test_alias_lifecycle() {
    let config = TempDir::new().unwrap();

    let output = run_sq(
        &[
            "alias",
            "set",
            "local",
            "http://localhost:9000",
            "accesskey",
            "secretkey",
        ],
        config.path(),
    );
    assert!(output.status.success(), "{}", stderr(&output));
    assert!(config.path().join("config.toml").exists());

    let output = run_sq(&["alias", "list", "--json"], config.path());
    assert!(output.status.success());
    let list: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(list["aliases"][0]["name"], "local");
    assert!(list["aliases"][0].get("secret_key").is_none());

    let output = run_sq(&["alias", "remove", "local"], config.path());
    assert!(output.status.success());

    let output = run_sq(&["alias", "remove", "local"], config.path());
    assert_eq!(output.status.code(), Some(5));
}

#[test]
fn test_alias_set_rejects_bad_endpoint() {
    let config = TempDir::new().unwrap();
    let output = run_sq(
        &["alias", "set", "local", "localhost:9000", "a", "b"],
        config.path(),
    );

    assert!(!output.status.success());
    assert!(!config.path().join("config.toml").exists());
}

#[test]
fn test_alias_set_reports_update() {
    let config = TempDir::new().unwrap();
    let set = ["alias", "set", "local", "http://localhost:9000", "a", "b"];

    let output = run_sq(&set, config.path());
    assert!(String::from_utf8_lossy(&output.stdout).contains("Alias 'local' added"));

    let output = run_sq(&set, config.path());
    assert!(output.status.success());
    assert!(String::from_utf8_lossy(&output.stdout).contains("Alias 'local' updated"));
}

#[test]
fn test_alias_set_rejects_unknown_lookup() {
    let config = TempDir::new().unwrap();
    let output = run_sq(
        &[
            "alias",
            "set",
            "local",
            "http://localhost:9000",
            "a",
            "b",
            "--bucket-lookup",
            "virtual",
        ],
        config.path(),
    );

    assert_eq!(output.status.code(), Some(2));
    assert!(stderr(&output).contains("expected auto, path or dns"));
    assert!(!config.path().join("config.toml").exists());
}
