//! Configuration loader (file + env + CLI merge).

use std::path::Path;

use figment::providers::{Env, Format, Serialized, Toml};
use figment::Figment;
use thiserror::Error;

use toolbox_types::{DiagnosticError, ErrorKind, ToolboxError};

use crate::schema::ToolboxConfig;

/// Prefix of structured environment overrides, e.g. `TOOLBOX_SERVER__PORT`.
pub const ENV_PREFIX: &str = "TOOLBOX_";

/// Errors from configuration loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// An explicitly requested config file does not exist.
    #[error("config file not found: {path}")]
    NotFound { path: String },
    /// Failed to load or merge configuration.
    #[error("configuration error: {0}")]
    Load(String),
}

impl From<ConfigError> for ToolboxError {
    fn from(e: ConfigError) -> Self {
        ToolboxError::new(ErrorKind::Config, e.to_string())
    }
}

impl DiagnosticError for ConfigError {
    fn hint(&self) -> Option<String> {
        match self {
            Self::NotFound { .. } => Some("The path given to --config does not exist.".into()),
            Self::Load(_) => Some(
                "A value in the config file or a TOOLBOX_* variable has the wrong type or name."
                    .into(),
            ),
        }
    }

    fn fix(&self) -> Option<String> {
        match self {
            Self::NotFound { .. } => Some("Check the path, or omit --config to use defaults.".into()),
            Self::Load(_) => Some(
                "Valid sections are [server], [session], [fetch], [search] and [logging].".into(),
            ),
        }
    }
}

/// Builds the layered figment without extracting it.
///
/// Layers, later wins:
/// 1. Default values
/// 2. Config file (if given)
/// 3. Conventional variables `PORT`, `GOOGLE_API_KEY`, `GOOGLE_CX`
/// 4. Environment variables (`TOOLBOX_` prefix, `__` separates sections)
pub fn figment(config_path: Option<&Path>) -> Figment {
    let mut figment = Figment::from(Serialized::defaults(ToolboxConfig::default()));

    if let Some(path) = config_path {
        figment = figment.merge(Toml::file(path));
    }

    figment
        .merge(Env::raw().only(&["PORT"]).map(|_| "server.port".into()))
        .merge(
            Env::raw()
                .only(&["GOOGLE_API_KEY"])
                .map(|_| "search.google_api_key".into()),
        )
        .merge(
            Env::raw()
                .only(&["GOOGLE_CX"])
                .map(|_| "search.google_cx".into()),
        )
        .merge(Env::prefixed(ENV_PREFIX).split("__"))
}

/// Loads configuration by merging all layers.
///
/// # Errors
///
/// Returns `ConfigError::NotFound` if `config_path` does not exist and
/// `ConfigError::Load` if a layer holds invalid values.
pub fn load_config(config_path: Option<&Path>) -> Result<ToolboxConfig, ConfigError> {
    if let Some(path) = config_path {
        if !path.exists() {
            return Err(ConfigError::NotFound {
                path: path.display().to_string(),
            });
        }
    }

    figment(config_path)
        .extract()
        .map_err(|e| ConfigError::Load(e.to_string()))
}
