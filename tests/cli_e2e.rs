//! End-to-end CLI tests for the tubefetch binary.

use std::path::Path;

use assert_cmd::Command;
use predicates::prelude::*;
use serde_json::{Value, json};
use tempfile::TempDir;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

const VIDEO_ID: &str = "dQw4w9WgXcQ";

/// Binary isolated from the user's real config file and `RUST_LOG`.
fn tubefetch(config_home: &Path) -> Command {
    let mut cmd = Command::cargo_bin("tubefetch").unwrap();
    cmd.env("XDG_CONFIG_HOME", config_home).env_remove("RUST_LOG");
    cmd
}

fn write_config(config_home: &Path, contents: &str) {
    let dir = config_home.join("tubefetch");
    std::fs::create_dir_all(&dir).unwrap();
    std::fs::write(dir.join("config.toml"), contents).unwrap();
}

fn stdout_json(output: &std::process::Output) -> Value {
    serde_json::from_slice(&output.stdout).expect("stdout should be JSON")
}

#[test]
fn test_binary_help_displays_usage() {
    let config = TempDir::new().unwrap();
    tubefetch(config.path())
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("Fetch video metadata"))
        .stdout(predicate::str::contains("download"));
}

#[test]
fn test_binary_version_displays_version() {
    let config = TempDir::new().unwrap();
    tubefetch(config.path())
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains("tubefetch"));
}

#[test]
fn test_binary_missing_subcommand_fails() {
    let config = TempDir::new().unwrap();
    tubefetch(config.path()).assert().failure();
}

#[test]
fn test_binary_invalid_flag_returns_error() {
    let config = TempDir::new().unwrap();
    tubefetch(config.path())
        .args(["info", VIDEO_ID, "--invalid-flag"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("error"));
}

#[test]
fn test_invalid_url_prints_error_json() {
    let config = TempDir::new().unwrap();
    let output = tubefetch(config.path())
        .args(["-q", "info", "definitely not a video"])
        .output()
        .unwrap();

    assert_eq!(output.status.code(), Some(1));
    let body = stdout_json(&output);
    let message = body["error"].as_str().unwrap();
    assert!(message.contains("invalid URL"), "{message}");
}

#[test]
fn test_invalid_quality_prints_error_json() {
    let config = TempDir::new().unwrap();
    let output = tubefetch(config.path())
        .args(["-q", "download", VIDEO_ID, "--quality", "ultra"])
        .output()
        .unwrap();

    assert_eq!(output.status.code(), Some(1));
    assert!(stdout_json(&output)["error"].as_str().unwrap().contains("ultra"));
}

#[test]
fn test_unknown_config_key_prints_error_json() {
    let config = TempDir::new().unwrap();
    write_config(config.path(), "parallelism = 4\n");

    let output = tubefetch(config.path())
        .args(["-q", "info", VIDEO_ID])
        .output()
        .unwrap();

    assert_eq!(output.status.code(), Some(1));
    let message = stdout_json(&output)["error"].as_str().unwrap().to_string();
    assert!(message.contains("Unknown configuration key"), "{message}");
}

#[tokio::test(flavor = "multi_thread")]
async fn test_info_prints_metadata_json_from_configured_endpoint() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/player"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "playabilityStatus": { "status": "OK" },
            "videoDetails": { "videoId": VIDEO_ID, "title": "Mock Clip", "author": "Tester", "lengthSeconds": "42" },
            "streamingData": { "formats": [
                { "itag": 18, "url": "https://cdn.example/18", "mimeType": "video/mp4", "qualityLabel": "360p" }
            ] }
        })))
        .expect(1)
        .mount(&server)
        .await;

    let config = TempDir::new().unwrap();
    write_config(
        config.path(),
        &format!("player_endpoint = \"{}/player\"\n", server.uri()),
    );
    let config_home = config.path().to_path_buf();

    let output = tokio::task::spawn_blocking(move || {
        tubefetch(&config_home)
            .args(["-q", "info", &format!("https://youtu.be/{VIDEO_ID}")])
            .output()
            .unwrap()
    })
    .await
    .unwrap();

    assert!(output.status.success(), "stderr: {}", String::from_utf8_lossy(&output.stderr));
    let body = stdout_json(&output);
    assert_eq!(body["id"], VIDEO_ID);
    assert_eq!(body["title"], "Mock Clip");
    assert_eq!(body["duration"], 42);
    assert_eq!(body["profile"], "ANDROID");
    assert_eq!(body["formats"][0]["itag"], 18);
    assert_eq!(body["formats"][0]["hasAudio"], true);
}
