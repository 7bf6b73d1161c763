//! Config loading error-message and fallback tests.

use assert_fs::prelude::*;
use predicates::prelude::predicate;
use strata_core::{config, ComposeConfig, ConfigError};

// ---------------------------------------------------------------------------
// 1. Load error messages
// ---------------------------------------------------------------------------

#[test]
fn load_missing_config_returns_not_found() {
    let dir = assert_fs::TempDir::new().expect("tempdir");
    let path = dir.path().join("strata.yaml");
    let err = config::load_at(&path).unwrap_err();
    assert!(matches!(err, ConfigError::NotFound { .. }), "got: {err}");
    assert!(err.to_string().contains("config not found"));
    assert!(err.to_string().contains("strata.yaml"));
}

#[test]
fn load_corrupt_yaml_returns_parse_error_with_path() {
    let dir = assert_fs::TempDir::new().expect("tempdir");
    let file = dir.child("strata.yaml");
    file.write_str(": : corrupt : yaml : !!!\n  - broken: [unclosed")
        .expect("write");

    let err = config::load_at(file.path()).unwrap_err();
    assert!(matches!(err, ConfigError::Parse { .. }), "got: {err}");
    assert!(err.to_string().contains("strata.yaml"));
}

#[test]
fn load_unknown_field_is_a_parse_error() {
    let dir = assert_fs::TempDir::new().expect("tempdir");
    let file = dir.child("strata.yaml");
    file.write_str("layout_namespace: typo\n").expect("write");

    let err = config::load_at(file.path()).unwrap_err();
    assert!(matches!(err, ConfigError::Parse { .. }), "got: {err}");
}

// ---------------------------------------------------------------------------
// 2. Successful loads
// ---------------------------------------------------------------------------

#[test]
fn load_full_config() {
    let dir = assert_fs::TempDir::new().expect("tempdir");
    let file = dir.child("strata.yaml");
    file.write_str(
        "layouts_namespace: shells\ndefault_layout: application\nmax_depth: 4\ntemplate_dir: views\n",
    )
    .expect("write");
    file.assert(predicate::path::is_file());

    let config = config::load_at(file.path()).expect("load");
    assert_eq!(config.layouts_namespace, "shells");
    assert_eq!(config.default_layout.as_deref(), Some("application"));
    assert_eq!(config.max_depth, 4);
    assert_eq!(
        config.resolve_template_dir(dir.path()),
        Some(dir.path().join("views"))
    );
}

#[test]
fn load_or_default_falls_back_when_absent() {
    let dir = assert_fs::TempDir::new().expect("tempdir");
    let config = config::load_or_default_at(&dir.path().join("nope.yaml")).expect("load");
    assert_eq!(config, ComposeConfig::default());
}

#[test]
fn load_or_default_still_reports_parse_errors() {
    let dir = assert_fs::TempDir::new().expect("tempdir");
    let file = dir.child("strata.yaml");
    file.write_str("max_depth: [not, a, number]\n").expect("write");

    let err = config::load_or_default_at(file.path()).unwrap_err();
    assert!(matches!(err, ConfigError::Parse { .. }), "got: {err}");
}
