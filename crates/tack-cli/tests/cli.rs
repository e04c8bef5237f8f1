//! End-to-end tests for the `tack` binary.

// assert_cmd::cargo_bin is deprecated but still works
#![allow(deprecated)]

use assert_cmd::prelude::*;
use predicates::prelude::*;
use std::fs;
use std::path::Path;
use std::process::Command;
use tempfile::TempDir;

const TEMPLATE: &str = r#"<!DOCTYPE html>
<html>
  <head><title>{{ title }}</title></head>
  <body>
    <div id="root"></div>
  </body>
</html>
"#;

const TACK_TOML: &str = r#"
entry = "./src/index.js"

[output]
path = "dist"
filename = "app.js"

[profiles.production]
mode = "production"
devtool = "source-map"
"#;

fn project() -> TempDir {
    let dir = TempDir::new().expect("tempdir");
    fs::create_dir_all(dir.path().join("src/components")).expect("mkdir");
    fs::write(dir.path().join("src/index.js"), "import App from './components/App';").unwrap();
    fs::write(dir.path().join("src/components/App.jsx"), "export default 1;").unwrap();
    fs::write(dir.path().join("src/index.html"), TEMPLATE).unwrap();
    dir
}

fn tack(dir: &Path) -> Command {
    let mut cmd = Command::cargo_bin("tack").expect("tack binary");
    cmd.current_dir(dir)
        .env("NO_COLOR", "1")
        .env_remove("RUST_LOG")
        .env_remove("TACK_DEVTOOL")
        .env_remove("TACK_OUTPUT__PUBLIC_PATH");
    cmd
}

fn show_json(cmd: &mut Command) -> serde_json::Value {
    let output = cmd.output().expect("run tack show");
    assert!(output.status.success(), "{}", String::from_utf8_lossy(&output.stderr));
    serde_json::from_slice(&output.stdout).expect("json on stdout")
}

#[test]
fn check_passes_for_html_preset() -> Result<(), Box<dyn std::error::Error>> {
    let project = project();
    tack(project.path())
        .args(["check", "--preset", "html"])
        .assert()
        .success()
        .stderr(predicate::str::contains("All checks passed"));
    Ok(())
}

#[test]
fn check_without_entry_fails() -> Result<(), Box<dyn std::error::Error>> {
    let dir = TempDir::new()?;
    tack(dir.path())
        .arg("check")
        .assert()
        .failure()
        .stderr(predicate::str::contains("entry not found"));
    Ok(())
}

#[test]
fn check_rejects_unknown_devtool() -> Result<(), Box<dyn std::error::Error>> {
    let project = project();
    fs::write(project.path().join("tack.toml"), "devtool = \"fancy-map\"\n")?;
    tack(project.path())
        .arg("check")
        .assert()
        .failure()
        .stderr(predicate::str::contains("fancy-map"));
    Ok(())
}

#[test]
fn check_schema_only_skips_filesystem() -> Result<(), Box<dyn std::error::Error>> {
    let dir = TempDir::new()?;
    tack(dir.path())
        .args(["check", "--preset", "basic", "--schema-only"])
        .assert()
        .success();
    Ok(())
}

#[test]
fn show_prints_config_file_as_json() {
    let project = project();
    fs::write(project.path().join("tack.toml"), TACK_TOML).unwrap();

    let config = show_json(tack(project.path()).arg("show"));
    assert_eq!(config["output"]["filename"], "app.js");
    assert_eq!(config["mode"], "development");
}

#[test]
fn show_applies_profile() {
    let project = project();
    fs::write(project.path().join("tack.toml"), TACK_TOML).unwrap();

    let config = show_json(tack(project.path()).args(["show", "--profile", "production"]));
    assert_eq!(config["mode"], "production");
    assert_eq!(config["devtool"], "source-map");
    assert_eq!(config["output"]["filename"], "app.js");
}

#[test]
fn show_unknown_profile_fails() {
    let project = project();
    fs::write(project.path().join("tack.toml"), TACK_TOML).unwrap();

    tack(project.path())
        .args(["show", "--profile", "staging"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("staging"));
}

#[test]
fn show_applies_environment_overrides() {
    let project = project();
    let config = show_json(
        tack(project.path())
            .args(["show", "--preset", "basic"])
            .env("TACK_OUTPUT__PUBLIC_PATH", "/cdn/"),
    );
    assert_eq!(config["output"]["publicPath"], "/cdn/");

    let config = show_json(
        tack(project.path())
            .args(["show", "--preset", "basic", "--no-env"])
            .env("TACK_OUTPUT__PUBLIC_PATH", "/cdn/"),
    );
    assert_eq!(config["output"]["publicPath"], "");
}

#[test]
fn show_toml_round_trips_preset() {
    let project = project();
    tack(project.path())
        .args(["show", "--preset", "basic", "--format", "toml"])
        .assert()
        .success()
        .stdout(predicate::str::contains("devtool = \"cheap-module-eval-source-map\""));
}

#[test]
fn resolve_tries_configured_extensions() {
    let project = project();
    tack(project.path())
        .args(["resolve", "./components/App", "--from", "src", "--preset", "loaders"])
        .assert()
        .success()
        .stdout(predicate::str::contains("App.jsx"));
}

#[test]
fn resolve_reports_unresolvable_requests() {
    let project = project();
    tack(project.path())
        .args(["resolve", "./components/Missing", "--from", "src", "--preset", "loaders"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("cannot resolve"));
}

#[test]
fn rules_lists_loader_order() {
    let project = project();
    tack(project.path())
        .args(["rules", "src/app.css", "node_modules/lib/index.js", "--preset", "loaders"])
        .assert()
        .success()
        .stdout(predicate::str::contains("loaders: css-loader"))
        .stdout(predicate::str::contains("-> style-loader"))
        .stdout(predicate::str::contains("no matching rule"));
}

#[test]
fn emit_writes_bundle_chunks_and_html() {
    let project = project();
    let build = project.path().join("build");
    fs::create_dir_all(&build).unwrap();
    fs::write(build.join("main.js"), "console.log('main');").unwrap();
    fs::write(build.join("lazy.js"), "/* lazy */").unwrap();

    tack(project.path())
        .args(["emit", "--bundle", "build/main.js", "--chunk", "0=build/lazy.js"])
        .assert()
        .success();

    let dist = project.path().join("dist");
    assert_eq!(fs::read_to_string(dist.join("bundle.js")).unwrap(), "console.log('main');");
    assert_eq!(fs::read_to_string(dist.join("0.js")).unwrap(), "/* lazy */");
    let html = fs::read_to_string(dist.join("index.html")).unwrap();
    assert_eq!(html.matches(r#"<script src="bundle.js"></script>"#).count(), 1);
}

#[test]
fn emit_inlines_small_images_and_writes_large_ones() {
    let project = project();
    let build = project.path().join("build");
    fs::create_dir_all(&build).unwrap();
    fs::write(build.join("main.js"), "x").unwrap();
    fs::write(project.path().join("src/icon.png"), vec![1u8; 100]).unwrap();
    fs::write(project.path().join("src/hero.png"), vec![2u8; 9000]).unwrap();

    tack(project.path())
        .args([
            "emit", "--bundle", "build/main.js", "--asset", "src/icon.png", "--asset",
            "src/hero.png",
        ])
        .assert()
        .success()
        .stderr(predicate::str::contains("inlined"));

    let images = project.path().join("dist/images");
    assert!(images.join("hero.png").is_file());
    assert!(!images.join("icon.png").exists());
}

#[test]
fn emit_no_overwrite_refuses_existing_output() {
    let project = project();
    fs::create_dir_all(project.path().join("build")).unwrap();
    fs::write(project.path().join("build/main.js"), "x").unwrap();

    tack(project.path())
        .args(["emit", "--preset", "basic", "--bundle", "build/main.js"])
        .assert()
        .success();
    tack(project.path())
        .args(["emit", "--preset", "basic", "--bundle", "build/main.js", "--no-overwrite"])
        .assert()
        .failure();
}

#[test]
fn emit_missing_bundle_fails_before_writing() {
    let project = project();
    tack(project.path())
        .args(["emit", "--bundle", "build/missing.js"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("File not found"));
    assert!(!project.path().join("dist/bundle.js").exists());
}
