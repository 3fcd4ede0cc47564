//! Dev server configuration
//!
//! Priority: command line / environment (`MORPHSEG_BIND`, `MORPHSEG_CORPUS`),
//! then the TOML file, then built-in defaults.

use morphseg_common::config::{load_toml_config, resolve_config_path, LoggingConfig};
use morphseg_common::{Error, Result};
use serde::Deserialize;
use std::path::{Path, PathBuf};

pub const MODULE_NAME: &str = "devserver";

/// Settings read from the TOML file
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct TomlConfig {
    pub bind: String,
    pub corpus: Option<PathBuf>,
    pub logging: LoggingConfig,
}

impl Default for TomlConfig {
    fn default() -> Self {
        Self {
            bind: default_bind(),
            corpus: None,
            logging: LoggingConfig::default(),
        }
    }
}

fn default_bind() -> String {
    "127.0.0.1:5740".to_string()
}

/// Command-line (or environment) overrides
#[derive(Debug, Clone, Default)]
pub struct ConfigOverrides {
    pub bind: Option<String>,
    pub corpus: Option<PathBuf>,
}

/// Resolved dev server configuration
#[derive(Debug, Clone)]
pub struct DevServerConfig {
    pub bind: String,
    pub corpus: PathBuf,
    pub logging: LoggingConfig,
}

impl DevServerConfig {
    pub fn load(config_arg: Option<&Path>, overrides: ConfigOverrides) -> Result<Self> {
        let source = resolve_config_path(config_arg, MODULE_NAME);
        let toml_config: TomlConfig = load_toml_config(source.as_deref())?;
        Self::resolve(toml_config, overrides)
    }

    fn resolve(toml_config: TomlConfig, overrides: ConfigOverrides) -> Result<Self> {
        let corpus = overrides
            .corpus
            .or(toml_config.corpus)
            .ok_or_else(|| Error::Config("No corpus file given (--corpus or MORPHSEG_CORPUS)".to_string()))?;

        Ok(Self {
            bind: overrides.bind.unwrap_or(toml_config.bind),
            corpus,
            logging: toml_config.logging,
        })
    }
}
