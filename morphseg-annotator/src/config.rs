//! Annotator configuration
//!
//! Priority: command line, then environment (`MORPHSEG_BACKEND_URL`), then
//! the TOML file, then built-in defaults.

use crate::session::SessionConfig;
use morphseg_common::config::{env_override, load_toml_config, resolve_config_path, LoggingConfig};
use morphseg_common::{Result, UiStrings};
use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::info;

/// Module name used for the per-user config file
pub const MODULE_NAME: &str = "annotator";

pub const BACKEND_URL_ENV_VAR: &str = "MORPHSEG_BACKEND_URL";

/// Settings read from the TOML file
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct TomlConfig {
    pub backend_url: Option<String>,
    pub email: Option<String>,
    pub display_width: u32,
    pub request_timeout_secs: u64,
    pub preselect_stem: bool,
    pub logging: LoggingConfig,
    /// Overrides of the message catalogue
    pub ui: UiStrings,
}

impl Default for TomlConfig {
    fn default() -> Self {
        Self {
            backend_url: None,
            email: None,
            display_width: default_display_width(),
            request_timeout_secs: default_request_timeout_secs(),
            preselect_stem: true,
            logging: LoggingConfig::default(),
            ui: UiStrings::default(),
        }
    }
}

fn default_backend_url() -> String {
    "http://127.0.0.1:5740".to_string()
}

fn default_display_width() -> u32 {
    1280
}

fn default_request_timeout_secs() -> u64 {
    30
}

/// Command-line overrides
#[derive(Debug, Clone, Default)]
pub struct ConfigOverrides {
    pub backend_url: Option<String>,
    pub email: Option<String>,
    pub display_width: Option<u32>,
}

/// Resolved annotator configuration
#[derive(Debug, Clone)]
pub struct AnnotatorConfig {
    pub backend_url: String,
    pub email: Option<String>,
    pub display_width: u32,
    pub request_timeout: Duration,
    pub preselect_stem: bool,
    pub logging: LoggingConfig,
    pub ui: UiStrings,
    /// File the settings came from, if any
    pub source: Option<PathBuf>,
}

impl AnnotatorConfig {
    /// Resolve the config file and apply overrides
    pub fn load(config_arg: Option<&Path>, overrides: ConfigOverrides) -> Result<Self> {
        let source = resolve_config_path(config_arg, MODULE_NAME);
        let toml_config: TomlConfig = load_toml_config(source.as_deref())?;
        Ok(Self::resolve(toml_config, overrides, source))
    }

    fn resolve(toml_config: TomlConfig, overrides: ConfigOverrides, source: Option<PathBuf>) -> Self {
        let backend_url = if let Some(url) = overrides.backend_url {
            info!("Backend URL: {} (from command line)", url);
            url
        } else if let Some(url) = env_override(BACKEND_URL_ENV_VAR) {
            info!("Backend URL: {} (from {})", url, BACKEND_URL_ENV_VAR);
            url
        } else {
            toml_config.backend_url.unwrap_or_else(default_backend_url)
        };

        Self {
            backend_url,
            email: overrides.email.or(toml_config.email),
            display_width: overrides.display_width.unwrap_or(toml_config.display_width),
            request_timeout: Duration::from_secs(toml_config.request_timeout_secs),
            preselect_stem: toml_config.preselect_stem,
            logging: toml_config.logging,
            ui: toml_config.ui,
            source,
        }
    }

    pub fn session_config(&self) -> SessionConfig {
        SessionConfig {
            display_width: self.display_width,
            preselect_stem: self.preselect_stem,
            strings: self.ui.clone(),
        }
    }
}
