//! Local `tenant-cli` subcommands, run as a subprocess.

use std::io::Write;
use std::process::Command;

use serde_json::Value;
use tempfile::NamedTempFile;

fn tenant_cli(args: &[&str]) -> (bool, Value) {
    let output = Command::new(env!("CARGO_BIN_EXE_tenant-cli"))
        .args(args)
        .env_remove("TENANT_ROUTER_ENV")
        .output()
        .expect("tenant-cli did not run");
    let json = serde_json::from_slice(&output.stdout).unwrap_or(Value::Null);
    (output.status.success(), json)
}

fn config_file(content: &str) -> NamedTempFile {
    let mut file = NamedTempFile::new().unwrap();
    file.write_all(content.as_bytes()).unwrap();
    file
}

#[test]
fn test_slugify_with_default_tables() {
    let (ok, json) = tenant_cli(&["slugify", "Acme Co."]);
    assert!(ok);
    assert_eq!(json["slug"], "acme-co");
    assert_eq!(json["valid"], true);

    let (_, json) = tenant_cli(&["slugify", "Dashboard"]);
    assert_eq!(json["valid"], false);
}

#[test]
fn test_slugify_honors_configured_tables() {
    let file = config_file("[tenancy]\npersonal_routes = [\"inbox\"]\nreserved_segments = [\"acme-co\"]\n");
    let path = file.path().to_str().unwrap();

    let (ok, json) = tenant_cli(&["slugify", "Acme Co.", "--config", path]);
    assert!(ok);
    assert_eq!(json["slug"], "acme-co");
    assert_eq!(json["valid"], false);

    let (_, json) = tenant_cli(&["slugify", "Inbox", "--config", path]);
    assert_eq!(json["valid"], false);

    // "dashboard" is no longer a personal route under this config
    let (_, json) = tenant_cli(&["slugify", "Dashboard", "--config", path]);
    assert_eq!(json["valid"], true);
}

#[test]
fn test_resolve_uses_config_file() {
    let file = config_file("[tenancy]\npersonal_routes = [\"inbox\"]\n");
    let path = file.path().to_str().unwrap();

    let (ok, json) = tenant_cli(&["resolve", "/inbox", "--config", path]);
    assert!(ok);
    assert_eq!(json["decision"]["path"], "/app/personal/inbox");
}
