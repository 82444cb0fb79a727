//! End-to-end tests for the nupkg-fetch binary

mod common;

use common::*;
use std::path::Path;
use std::process::{Command, Output};
use tempfile::TempDir;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

/// Run the CLI with config lookup pointed at an empty directory.
fn run_cli(args: &[&str], config_home: &Path) -> Output {
    Command::new(env!("CARGO_BIN_EXE_nupkg-fetch"))
        .args(args)
        .env("XDG_CONFIG_HOME", config_home)
        .env("XDG_CONFIG_DIRS", config_home)
        .env_remove("NUPKG_REGISTRY")
        .env_remove("NUPKG_HTTP_TIMEOUT")
        .output()
        .expect("Failed to execute nupkg-fetch")
}

#[test]
fn test_help_exits_zero() {
    let home = TempDir::new().unwrap();
    let output = run_cli(&["--help"], home.path());

    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("TARGET_DIR"));
    assert!(stdout.contains("Examples:"));
}

#[test]
fn test_missing_arguments_exit_one() {
    let home = TempDir::new().unwrap();
    let output = run_cli(&["only-a-directory"], home.path());
    assert_eq!(output.status.code(), Some(1));
}

#[test]
fn test_too_many_arguments_exit_one() {
    let home = TempDir::new().unwrap();
    let output = run_cli(&["dir", "Pkg", "1.0", "extra"], home.path());
    assert_eq!(output.status.code(), Some(1));
}

#[test]
fn test_invalid_package_name_exits_one() {
    let home = TempDir::new().unwrap();
    let out = TempDir::new().unwrap();
    let output = run_cli(
        &[out.path().to_str().unwrap(), "../escape"],
        home.path(),
    );

    assert_eq!(output.status.code(), Some(1));
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("invalid"));
}

#[test]
fn test_missing_target_directory_exits_one() {
    let home = TempDir::new().unwrap();
    let out = TempDir::new().unwrap();
    let missing = out.path().join("missing");
    let output = run_cli(
        &[
            missing.to_str().unwrap(),
            "Foo",
            "--registry",
            "http://127.0.0.1:9/pkg",
        ],
        home.path(),
    );

    assert_eq!(output.status.code(), Some(1));
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("not found"));
    assert!(!missing.exists());
}

#[test]
fn test_invalid_config_file_exits_one() {
    let home = TempDir::new().unwrap();
    let cfg_dir = home.path().join("nupkg-fetch");
    std::fs::create_dir_all(&cfg_dir).unwrap();
    std::fs::write(cfg_dir.join("config.toml"), "registry = [").unwrap();
    let out = TempDir::new().unwrap();

    let output = run_cli(&[out.path().to_str().unwrap(), "Foo"], home.path());

    assert_eq!(output.status.code(), Some(1));
    assert!(String::from_utf8_lossy(&output.stderr).contains("invalid TOML"));
}

#[tokio::test]
async fn test_downloads_package_tree() {
    let server = MockServer::start().await;
    let root = pkg("Root", Some("1.0.0"));
    let dep = pkg("Dep", None);

    Mock::given(method("GET"))
        .and(path("/pkg/Root/1.0.0"))
        .respond_with(ResponseTemplate::new(200).set_body_bytes(nupkg(&root, &[&dep])))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/pkg/Dep"))
        .respond_with(ResponseTemplate::new(200).set_body_bytes(nupkg(&dep, &[&root])))
        .expect(1)
        .mount(&server)
        .await;

    let home = TempDir::new().unwrap();
    let out = TempDir::new().unwrap();
    let registry = format!("{}/pkg", server.uri());
    let output = run_cli(
        &[
            out.path().to_str().unwrap(),
            "Root",
            "1.0.0",
            "--registry",
            &registry,
        ],
        home.path(),
    );

    assert!(
        output.status.success(),
        "stderr: {}",
        String::from_utf8_lossy(&output.stderr)
    );
    assert_eq!(files_in(out.path()), vec!["Dep.nupkg", "Root_1.0.0.nupkg"]);
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("already downloaded"));
}

#[tokio::test]
async fn test_download_failure_exits_one() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&server)
        .await;

    let home = TempDir::new().unwrap();
    let out = TempDir::new().unwrap();
    let registry = format!("{}/pkg", server.uri());
    let output = run_cli(
        &[out.path().to_str().unwrap(), "Missing", "--quiet", "--registry", &registry],
        home.path(),
    );

    assert_eq!(output.status.code(), Some(1));
    assert!(String::from_utf8_lossy(&output.stderr).contains("404"));
    assert!(String::from_utf8_lossy(&output.stdout).is_empty());
    assert!(files_in(out.path()).is_empty());
}
