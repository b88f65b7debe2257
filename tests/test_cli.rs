use std::fs;
use std::path::Path;
use std::process::{Command, Output};

use tempfile::tempdir;

fn bin() -> &'static str {
    env!("CARGO_BIN_EXE_test-select")
}

fn write_file(path: &Path, content: &str) {
    fs::write(path, content).expect("failed to write test file");
}

fn run(args: &[&str]) -> Output {
    Command::new(bin())
        .args(args)
        .env_remove("TEST_SELECT_FILTER")
        .env_remove("RUST_LOG")
        .output()
        .expect("command should run")
}

fn stdout(output: &Output) -> String {
    String::from_utf8_lossy(&output.stdout).into_owned()
}

fn stderr(output: &Output) -> String {
    String::from_utf8_lossy(&output.stderr).into_owned()
}

const CATALOG: &str = r#"{
    types: { "Acme.Tests.Smoke": { assembly: "Acme.Tests" } },
    tests: [
        { id: "s", name: "Smoke", type: "Acme.Tests.Smoke", metadata: { Category: "Smoke" },
          children: [ { id: "s.1", name: "Boots", member: "Boots" } ] },
        { id: "o", name: "Other", children: [ { id: "o.1", name: "Idles" } ] },
    ],
}"#;

#[test]
fn test_parse_prints_canonical_form() {
    let output = run(&["parse", "Type:Fixture1 exclude Name:/slow/i"]);
    assert!(output.status.success(), "stderr: {}", stderr(&output));
    assert_eq!(
        stdout(&output).trim(),
        "Type: 'Fixture1' exclude Name: /slow/i"
    );
}

#[test]
fn test_parse_error_reports_position_and_fails() {
    let output = run(&["parse", "Name:\"abc"]);
    assert!(!output.status.success());
    let err = stderr(&output);
    assert!(err.starts_with("error:"), "stderr: {err}");
    assert!(err.contains("position 9"), "stderr: {err}");
}

#[test]
fn test_parse_json_includes_rules() {
    let output = run(&["--format", "json", "parse", "--tree", "Name:a"]);
    assert!(output.status.success(), "stderr: {}", stderr(&output));
    let value: serde_json::Value =
        serde_json::from_str(&stdout(&output)).expect("stdout should be JSON");
    assert_eq!(value["expression"], "Name: 'a'");
    assert_eq!(value["rules"][0]["type"], "inclusion");
    assert!(value["tree"].is_string());
}

#[test]
fn test_tokens_json() {
    let output = run(&["tokens", "-F", "json", "a and 'b'"]);
    assert!(output.status.success(), "stderr: {}", stderr(&output));
    let value: serde_json::Value =
        serde_json::from_str(&stdout(&output)).expect("stdout should be JSON");
    let kinds: Vec<&str> = value
        .as_array()
        .expect("array of tokens")
        .iter()
        .filter_map(|token| token["kind"].as_str())
        .collect();
    assert_eq!(kinds, vec!["UnquotedWord", "And", "QuotedWord"]);
}

#[test]
fn test_select_with_filter_flag() {
    let dir = tempdir().expect("temp dir");
    let catalog = dir.path().join("catalog.json5");
    write_file(&catalog, CATALOG);

    let output = run(&[
        "--color",
        "never",
        "-f",
        "Category:Smoke",
        "select",
        catalog.to_str().expect("utf8 path"),
    ]);
    assert!(output.status.success(), "stderr: {}", stderr(&output));
    let out = stdout(&output);
    assert!(out.contains("Boots"), "stdout:\n{out}");
    assert!(!out.contains("Idles"), "stdout:\n{out}");
    assert!(out.contains("2 of 4 tests selected"), "stdout:\n{out}");
}

#[test]
fn test_select_reads_filter_from_environment_and_config() {
    let dir = tempdir().expect("temp dir");
    let catalog = dir.path().join("catalog.json5");
    let config = dir.path().join("profile.toml");
    write_file(&catalog, CATALOG);
    write_file(
        &config,
        "profile_name = \"local\"\nfilter_set = \"exclude Name:Other\"\n",
    );

    let from_config = run(&[
        "-F",
        "json",
        "-c",
        config.to_str().expect("utf8 path"),
        "select",
        catalog.to_str().expect("utf8 path"),
    ]);
    assert!(from_config.status.success(), "stderr: {}", stderr(&from_config));
    let value: serde_json::Value = serde_json::from_str(&stdout(&from_config)).expect("JSON");
    assert_eq!(value["selected"], 2);

    let from_env = Command::new(bin())
        .args([
            "-F",
            "json",
            "-c",
            config.to_str().expect("utf8 path"),
            "select",
            "--all",
            catalog.to_str().expect("utf8 path"),
        ])
        .env("TEST_SELECT_FILTER", "Name:Idles")
        .output()
        .expect("command should run");
    assert!(from_env.status.success(), "stderr: {}", stderr(&from_env));
    let value: serde_json::Value = serde_json::from_str(&stdout(&from_env)).expect("JSON");
    assert_eq!(value["selected"], 1);
    assert_eq!(value["tests"].as_array().map(Vec::len), Some(4));
    assert_eq!(value["tests"][3]["id"], "o.1");
    assert_eq!(value["tests"][3]["decision"], "include");
}

#[test]
fn test_select_missing_catalog_fails() {
    let dir = tempdir().expect("temp dir");
    let missing = dir.path().join("missing.json");
    let output = run(&["select", missing.to_str().expect("utf8 path")]);
    assert!(!output.status.success());
    assert!(stderr(&output).contains("missing.json"), "stderr: {}", stderr(&output));
}

#[test]
fn test_deeply_nested_filter_is_rejected_cleanly() {
    let expression = format!("{}*{}", "(".repeat(5_000), ")".repeat(5_000));
    let output = run(&["parse", &expression]);
    assert_eq!(output.status.code(), Some(1), "stderr: {}", stderr(&output));
    let err = stderr(&output);
    assert!(err.contains("nested too deeply"), "stderr: {err}");
}
