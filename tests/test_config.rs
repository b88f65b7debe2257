use std::fs;

use tempfile::tempdir;
use test_select::config::{ConfigError, default_config, load_config, load_config_from_path};
use test_select::filter::FilterRuleType;

#[test]
fn test_profile_file_round_trips_filter_set() {
    let dir = tempdir().expect("temp dir");
    let path = dir.path().join("ci.toml");
    fs::write(
        &path,
        r#"
profile_name = "ci"
filter_set = "Category: Smoke exclude Category: Flaky"

[output]
show_unselected = true
show_ids = false
"#,
    )
    .expect("write config");

    let cfg = load_config(Some(&path)).expect("config should load");
    assert_eq!(cfg.profile_name, "ci");
    assert!(cfg.output.show_unselected);
    assert!(!cfg.output.show_ids);

    let set = cfg.filter_set().expect("filter set should parse");
    assert_eq!(set.len(), 2);
    assert_eq!(set.rules()[1].rule_type, FilterRuleType::Exclusion);
    assert_eq!(set.to_string(), "Category: 'Smoke' exclude Category: 'Flaky'");
}

#[test]
fn test_missing_file_is_a_read_error() {
    let dir = tempdir().expect("temp dir");
    let err = load_config_from_path(&dir.path().join("absent.toml")).unwrap_err();
    assert!(matches!(err, ConfigError::Read { .. }), "got {err:?}");
    assert!(err.to_string().contains("absent.toml"));
}

#[test]
fn test_malformed_toml_is_a_parse_error() {
    let dir = tempdir().expect("temp dir");
    let path = dir.path().join("broken.toml");
    fs::write(&path, "profile_name = [").expect("write config");
    let err = load_config_from_path(&path).unwrap_err();
    assert!(matches!(err, ConfigError::Parse { .. }), "got {err:?}");
}

#[test]
fn test_bad_filter_set_reports_profile_and_position() {
    let dir = tempdir().expect("temp dir");
    let path = dir.path().join("bad.toml");
    fs::write(
        &path,
        "profile_name = \"nightly\"\nfilter_set = \"Category:'open\"\n",
    )
    .expect("write config");

    let err = load_config_from_path(&path)
        .expect("toml itself is valid")
        .filter_set()
        .unwrap_err();
    let message = err.to_string();
    assert!(message.contains("nightly"), "message: {message}");
    assert!(message.contains("position 14"), "message: {message}");
}

#[test]
fn test_default_config_is_shared() {
    assert!(std::ptr::eq(default_config(), default_config()));
    assert!(default_config().filter_set.is_none());
}
