//! Integration tests for the FlavorFinder CLI

use std::process::Command;

fn flavorfinder() -> Command {
    let mut command = Command::new(env!("CARGO_BIN_EXE_flavorfinder"));
    // keep a developer's config file out of the picture
    command.args(["--config", "/nonexistent/flavorfinder.toml"]);
    command
}

#[test]
fn test_cli_help() {
    let output = flavorfinder()
        .arg("--help")
        .output()
        .expect("Failed to execute command");

    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("nearby"));
    assert!(stdout.contains("recipes"));
    assert!(stdout.contains("exchange"));
    assert!(stdout.contains("serve"));
}

#[test]
fn test_nearby_rejects_unknown_distance() {
    let output = flavorfinder()
        .args(["nearby", "--default-location", "--distance", "750"])
        .output()
        .expect("Failed to execute command");

    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("Unsupported distance 750m"), "got: {stderr}");
}

#[test]
fn test_nearby_requires_both_coordinates() {
    let output = flavorfinder()
        .args(["nearby", "--lat", "6.5"])
        .output()
        .expect("Failed to execute command");

    assert!(!output.status.success());
}

#[test]
fn test_blank_recipe_query_needs_no_network() {
    let output = flavorfinder()
        .args(["recipes", "   "])
        .output()
        .expect("Failed to execute command");

    assert!(output.status.success());
    assert!(String::from_utf8_lossy(&output.stdout).contains("No recipes found"));
}

#[test]
fn test_short_recipe_query_needs_no_network() {
    let output = flavorfinder()
        .args(["recipes", " ab "])
        .output()
        .expect("Failed to execute command");

    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("at least 3 characters"), "got: {stdout}");
}
