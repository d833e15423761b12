// expiry-check/tests/cli_integration.rs

use assert_cmd::Command;
use chrono::{Duration as ChronoDuration, SecondsFormat, Utc};
use predicates::prelude::*;
use tempfile::TempDir;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

/// Command with an isolated home/config environment so no local config leaks in.
fn isolated_cmd(home: &TempDir) -> Command {
    let mut cmd = Command::cargo_bin("expiry-check").unwrap();
    cmd.current_dir(home.path())
        .env("HOME", home.path())
        .env("XDG_CONFIG_HOME", home.path())
        .env_remove("EC_CONFIG")
        .env_remove("EC_OUTPUT")
        .env_remove("EC_TIMEOUT")
        .env_remove("EC_BOOTSTRAP_URL")
        .env_remove("RUST_LOG");
    cmd
}

/// Serve a bootstrap document mapping `com` to this server, and an RDAP
/// record for example.com expiring `days` from now.
async fn start_rdap_stub(days: i64) -> MockServer {
    let server = MockServer::start().await;

    let bootstrap = serde_json::json!({
        "version": "1.0",
        "services": [[["com"], [format!("{}/", server.uri())]]]
    });
    Mock::given(method("GET"))
        .and(path("/dns.json"))
        .respond_with(ResponseTemplate::new(200).set_body_json(bootstrap))
        .mount(&server)
        .await;

    let expiry = (Utc::now() + ChronoDuration::days(days)).to_rfc3339_opts(SecondsFormat::Secs, true);
    Mock::given(method("GET"))
        .and(path("/domain/example.com"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "objectClassName": "domain",
            "ldhName": "example.com",
            "entities": [{
                "roles": ["registrar"],
                "vcardArray": ["vcard", [["fn", {}, "text", "Example Registrar"]]]
            }],
            "events": [{"eventAction": "expiration", "eventDate": expiry}]
        })))
        .mount(&server)
        .await;

    server
}

#[test]
fn test_help_lists_check_command() {
    let mut cmd = Command::cargo_bin("expiry-check").unwrap();
    cmd.arg("--help");

    cmd.assert()
        .success()
        .stdout(predicate::str::contains("check"))
        .stdout(predicate::str::contains("Check domain expiration"));
}

#[test]
fn test_check_help_shows_flags() {
    let mut cmd = Command::cargo_bin("expiry-check").unwrap();
    cmd.args(["check", "--help"]);

    cmd.assert()
        .success()
        .stdout(predicate::str::contains("--domain"))
        .stdout(predicate::str::contains("--env"))
        .stdout(predicate::str::contains("--output"));
}

#[test]
fn test_no_arguments_shows_help() {
    let mut cmd = Command::cargo_bin("expiry-check").unwrap();

    cmd.assert()
        .success()
        .stdout(predicate::str::contains("Usage"))
        .stdout(predicate::str::contains("check"));
}

#[test]
fn test_no_domains_is_fatal_without_output() {
    let home = TempDir::new().unwrap();
    let mut cmd = isolated_cmd(&home);
    cmd.arg("check").write_stdin("\n");

    cmd.assert()
        .failure()
        .code(1)
        .stdout(predicate::str::is_empty())
        .stderr(predicate::str::contains("Enter domain names (comma-separated):"))
        .stderr(predicate::str::contains("no domain names provided"));
}

#[test]
fn test_empty_env_variable_falls_back_to_prompt() {
    let home = TempDir::new().unwrap();
    let mut cmd = isolated_cmd(&home);
    cmd.args(["c", "-e", "EXPIRY_CHECK_CLI_EMPTY"])
        .env("EXPIRY_CHECK_CLI_EMPTY", "")
        .write_stdin("");

    cmd.assert()
        .failure()
        .stderr(predicate::str::contains("no domain names provided"));
}

#[test]
fn test_invalid_output_format_rejected() {
    let mut cmd = Command::cargo_bin("expiry-check").unwrap();
    cmd.args(["check", "-d", "example.com", "-o", "yaml"]);

    cmd.assert().failure();
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn test_json_output_skips_unknown_tld() {
    let server = start_rdap_stub(10).await;
    let home = TempDir::new().unwrap();
    let bootstrap_url = format!("{}/dns.json", server.uri());

    let output = tokio::task::spawn_blocking(move || {
        let mut cmd = isolated_cmd(&home);
        cmd.args([
            "check",
            "-d",
            "example.zz,example.com",
            "-o",
            "json",
            "--bootstrap-url",
            bootstrap_url.as_str(),
        ]);
        cmd.output().unwrap()
    })
    .await
    .unwrap();

    assert!(output.status.success());

    let results: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    let results = results.as_array().unwrap();
    assert_eq!(results.len(), 1);
    assert_eq!(results[0]["domain_name"], "example.com");
    assert_eq!(results[0]["registrar"], "Example Registrar");
    assert_eq!(results[0]["failed"], false);
    let days = results[0]["days_to_expire"].as_f64().unwrap();
    assert!((days - 10.0).abs() < 0.01, "days_to_expire was {}", days);

    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("example.zz"));
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn test_text_output_from_env_variable() {
    let server = start_rdap_stub(45).await;
    let home = TempDir::new().unwrap();
    let bootstrap_url = format!("{}/dns.json", server.uri());

    let output = tokio::task::spawn_blocking(move || {
        let mut cmd = isolated_cmd(&home);
        cmd.args(["check", "--env", "EXPIRY_CHECK_CLI_DOMAINS"])
            .env("EXPIRY_CHECK_CLI_DOMAINS", "example.com")
            .env("EC_BOOTSTRAP_URL", &bootstrap_url);
        cmd.output().unwrap()
    })
    .await
    .unwrap();

    assert!(output.status.success());

    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.starts_with("Domain: example.com\nRegistrar: Example Registrar\nExpiry Date: "));
    assert!(stdout.contains("Days to Expire: 4"));
    assert!(stdout.ends_with("\n\n"));
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn test_unavailable_directory_skips_every_domain() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;

    let home = TempDir::new().unwrap();
    let bootstrap_url = format!("{}/dns.json", server.uri());

    let output = tokio::task::spawn_blocking(move || {
        let mut cmd = isolated_cmd(&home);
        cmd.args(["check", "-d", "example.com", "--bootstrap-url", bootstrap_url.as_str()]);
        cmd.output().unwrap()
    })
    .await
    .unwrap();

    assert!(output.status.success());
    assert!(output.stdout.is_empty());

    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("service directory unavailable"));
}

#[test]
fn test_invalid_config_file_is_fatal() {
    let home = TempDir::new().unwrap();
    std::fs::write(
        home.path().join("expiry-check.toml"),
        "[defaults]\noutput = \"csv\"\n",
    )
    .unwrap();

    let mut cmd = isolated_cmd(&home);
    cmd.args(["check", "--config", "expiry-check.toml", "-d", "example.com"]);

    cmd.assert()
        .failure()
        .stderr(predicate::str::contains("Configuration error"));
}
