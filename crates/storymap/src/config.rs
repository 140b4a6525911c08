//! Configuration file support.
//!
//! Settings that rarely change between runs can live in a YAML file, either
//! passed with `--config` or found as `storymap.yaml` in the working
//! directory:
//!
//! ```yaml
//! organization: https://dev.azure.com/contoso
//! project: Shop
//! id-column: ID
//! delimiter: ","
//! renderer:
//!   dot-binary: /usr/local/bin/dot
//!   direction: tb
//!   splines: polyline
//!   format: svg
//! ```
//!
//! Command line flags and environment variables take precedence over the
//! file. The personal access token is never read from it.

use crate::error::{Error, Result};
use crate::output::OutputFormat;
use crate::render::{Direction, Splines};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tokio::fs;

/// Name of the configuration file looked up in the working directory.
pub const CONFIG_FILE_NAME: &str = "storymap.yaml";

/// Contents of a configuration file.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case", deny_unknown_fields)]
pub struct StorymapConfig {
    /// Organization URL
    pub organization: Option<String>,

    /// Project scoping WIQL queries
    pub project: Option<String>,

    /// CSV column holding work item ids
    pub id_column: Option<String>,

    /// CSV field delimiter
    pub delimiter: Option<char>,

    /// Rendering defaults
    #[serde(default)]
    pub renderer: RendererConfig,
}

/// Rendering section of the configuration file.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case", deny_unknown_fields)]
pub struct RendererConfig {
    /// Graphviz binary
    pub dot_binary: Option<PathBuf>,

    /// Layout orientation
    pub direction: Option<Direction>,

    /// Edge drawing mode
    pub splines: Option<Splines>,

    /// Output format
    pub format: Option<OutputFormat>,
}

impl StorymapConfig {
    /// Parse configuration from YAML text.
    ///
    /// # Errors
    ///
    /// Returns `Error::Config` if the text is not a valid configuration.
    pub fn from_yaml(content: &str) -> Result<Self> {
        if content.trim().is_empty() {
            return Ok(Self::default());
        }
        serde_yaml::from_str(content).map_err(|e| Error::Config(e.to_string()))
    }

    /// Load configuration from a file.
    ///
    /// # Errors
    ///
    /// Returns `Error::Io` if the file cannot be read and `Error::Config` if
    /// it cannot be parsed.
    pub async fn load(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path).await?;
        Self::from_yaml(&content).map_err(|e| match e {
            Error::Config(message) => Error::Config(format!("{}: {message}", path.display())),
            other => other,
        })
    }

    /// Load an explicit file, or `storymap.yaml` in `working_dir` if present.
    ///
    /// A missing default file yields the default configuration; a missing
    /// explicit file is an error.
    ///
    /// # Errors
    ///
    /// Returns `Error::Io` or `Error::Config` as [`StorymapConfig::load`].
    pub async fn discover(explicit: Option<&Path>, working_dir: &Path) -> Result<Self> {
        if let Some(path) = explicit {
            tracing::debug!(path = %path.display(), "Loading configuration");
            return Self::load(path).await;
        }

        let default_path = working_dir.join(CONFIG_FILE_NAME);
        if fs::try_exists(&default_path).await? {
            tracing::debug!(path = %default_path.display(), "Loading configuration");
            Self::load(&default_path).await
        } else {
            Ok(Self::default())
        }
    }
}
