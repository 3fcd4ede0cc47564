//! Configuration resolution and loading tests
//!
//! Note: Uses serial_test crate to prevent ENV variable race conditions.
//! Tests that manipulate MORPHSEG_CONFIG are marked with #[serial].

use morphseg_common::config::{load_toml_config, resolve_config_path, LoggingConfig, CONFIG_ENV_VAR};
use morphseg_common::UiStrings;
use serde::Deserialize;
use serial_test::serial;
use std::env;
use std::io::Write;
use std::path::{Path, PathBuf};

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct SampleConfig {
    backend_url: Option<String>,
    logging: LoggingConfig,
    ui: UiStrings,
}

fn write_config(content: &str) -> tempfile::NamedTempFile {
    let mut file = tempfile::NamedTempFile::new().expect("create temp file");
    file.write_all(content.as_bytes()).expect("write temp file");
    file
}

#[test]
#[serial]
fn test_cli_argument_wins_over_env() {
    env::set_var(CONFIG_ENV_VAR, "/tmp/from-env.toml");

    let resolved = resolve_config_path(Some(Path::new("/tmp/from-cli.toml")), "annotator");
    assert_eq!(resolved, Some(PathBuf::from("/tmp/from-cli.toml")));

    env::remove_var(CONFIG_ENV_VAR);
}

#[test]
#[serial]
fn test_env_var_used_without_cli_argument() {
    env::set_var(CONFIG_ENV_VAR, "/tmp/from-env.toml");

    let resolved = resolve_config_path(None, "annotator");
    assert_eq!(resolved, Some(PathBuf::from("/tmp/from-env.toml")));

    env::remove_var(CONFIG_ENV_VAR);
}

#[test]
#[serial]
fn test_blank_env_var_is_ignored() {
    env::set_var(CONFIG_ENV_VAR, "   ");

    let resolved = resolve_config_path(None, "morphseg-test-module-without-file");
    assert_eq!(resolved, None);

    env::remove_var(CONFIG_ENV_VAR);
}

#[test]
fn test_missing_file_yields_defaults() {
    let config: SampleConfig =
        load_toml_config(Some(Path::new("/nonexistent/morphseg/annotator.toml"))).unwrap();
    assert!(config.backend_url.is_none());
    assert_eq!(config.logging.level, "info");
    assert_eq!(config.ui, UiStrings::default());
}

#[test]
fn test_no_path_yields_defaults() {
    let config: SampleConfig = load_toml_config(None).unwrap();
    assert!(config.backend_url.is_none());
}

#[test]
fn test_file_values_are_loaded() {
    let file = write_config(
        r#"
backend_url = "http://annotate.example:8080"

[logging]
level = "debug"

[ui]
thanks = "Kiitos avustasi!"
"#,
    );

    let config: SampleConfig = load_toml_config(Some(file.path())).unwrap();
    assert_eq!(config.backend_url.as_deref(), Some("http://annotate.example:8080"));
    assert_eq!(config.logging.level, "debug");
    assert_eq!(config.ui.thanks, "Kiitos avustasi!");
    assert_eq!(config.ui.skipped, UiStrings::default().skipped);
}

#[test]
fn test_malformed_file_is_an_error() {
    let file = write_config("backend_url = [unterminated");

    let result: morphseg_common::Result<SampleConfig> = load_toml_config(Some(file.path()));
    assert!(matches!(result, Err(morphseg_common::Error::Config(_))));
}
