//! Fill configuration files (YAML or JSON).
//!
//! A config file holds any subset of the fill parameters plus the
//! post-processing settings; command-line flags override it.
//!
//! ```yaml
//! pattern: crosshatch
//! spacing: 1.5
//! angle: 30
//! inset: 0.5
//! simplify: 0.05
//! order: color
//! color_order: ["#000000", "#ff0000"]
//! ```

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use plotfill::{FillParams, OrderStrategy, ParamsError};

/// Error type for loading a config file.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("failed to read config {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid YAML in {path}: {source}")]
    Yaml {
        path: PathBuf,
        #[source]
        source: serde_yaml::Error,
    },

    #[error("invalid JSON in {path}: {source}")]
    Json {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("config {0} must end in .yaml, .yml or .json")]
    UnknownFormat(PathBuf),

    #[error(transparent)]
    Params(#[from] ParamsError),
}

/// Everything `plotfill fill` can take from a file.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct FillConfig {
    #[serde(flatten)]
    pub params: FillParams,
    /// RDP tolerance; no simplification when absent
    pub simplify: Option<f64>,
    pub order: OrderStrategy,
    /// Colour sequence for the `color` order strategy
    pub color_order: Vec<String>,
}

impl FillConfig {
    /// Load and validate a config file, picking the format by extension.
    pub fn load(path: &Path) -> Result<FillConfig, ConfigError> {
        let text = fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;

        let ext = path
            .extension()
            .and_then(|e| e.to_str())
            .map(str::to_lowercase);
        let config: FillConfig = match ext.as_deref() {
            Some("yaml" | "yml") => serde_yaml::from_str(&text).map_err(|source| ConfigError::Yaml {
                path: path.to_path_buf(),
                source,
            })?,
            Some("json") => serde_json::from_str(&text).map_err(|source| ConfigError::Json {
                path: path.to_path_buf(),
                source,
            })?,
            _ => return Err(ConfigError::UnknownFormat(path.to_path_buf())),
        };

        config.params.validate()?;
        tracing::debug!(path = %path.display(), pattern = %config.params.pattern, "loaded config");
        Ok(config)
    }
}
