//! Output of story map results.
//!
//! The diagram (or graph JSON) is the only thing written to stdout, so the
//! command can be piped. Human-oriented messages go to stderr.

pub mod color;

use crate::domain::Graph;
use crate::error::Result;
use crate::render::ImageFormat;
use serde::{Deserialize, Serialize};
use std::env;
use std::fmt;
use std::path::Path;
use tokio::io::AsyncWriteExt;

/// What the command emits.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// SVG rendered by Graphviz
    #[default]
    Svg,
    /// PNG rendered by Graphviz
    Png,
    /// Graphviz DOT source
    Dot,
    /// The graph as JSON
    Json,
}

impl OutputFormat {
    /// The image format to request from the layout engine, if any.
    pub fn image_format(self) -> Option<ImageFormat> {
        match self {
            Self::Svg => Some(ImageFormat::Svg),
            Self::Png => Some(ImageFormat::Png),
            Self::Dot | Self::Json => None,
        }
    }
}

impl fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Svg => write!(f, "svg"),
            Self::Png => write!(f, "png"),
            Self::Dot => write!(f, "dot"),
            Self::Json => write!(f, "json"),
        }
    }
}

/// Settings for messages printed to the terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OutputConfig {
    /// Whether to use colors in messages.
    pub use_colors: bool,
}

impl OutputConfig {
    /// Create a new `OutputConfig` with explicit values.
    pub fn new(use_colors: bool) -> Self {
        Self { use_colors }
    }

    /// Create an `OutputConfig` by reading from environment variables.
    ///
    /// Colors are disabled when `NO_COLOR` is set or `STORYMAP_COLOR` is
    /// `0`/`false`.
    pub fn from_env() -> Self {
        // Respect NO_COLOR standard (https://no-color.org/)
        let use_colors = env::var_os("NO_COLOR").is_none()
            && env::var("STORYMAP_COLOR")
                .map(|v| v != "0" && !v.eq_ignore_ascii_case("false"))
                .unwrap_or(true);
        Self { use_colors }
    }
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self { use_colors: true }
    }
}

/// Serialize a graph as pretty-printed JSON.
///
/// # Errors
///
/// Returns `Error::Json` if serialization fails.
pub fn graph_to_json(graph: &Graph) -> Result<String> {
    Ok(serde_json::to_string_pretty(graph)?)
}

/// One-line description of a finished build.
pub fn summary_line(graph: &Graph, config: &OutputConfig) -> String {
    let items = if graph.nodes.len() == 1 { "work item" } else { "work items" };
    let links = if graph.edges.len() == 1 { "link" } else { "links" };
    format!(
        "{} {} {items}, {} {links}",
        color::success("Story map:", config),
        color::info(&graph.nodes.len().to_string(), config),
        color::info(&graph.edges.len().to_string(), config),
    )
}

/// Message shown when a build produced no work items.
pub fn empty_notice(config: &OutputConfig) -> String {
    color::warning("No work items matched; the story map is empty.", config)
}

/// Write the command's result to `path`, or to stdout when `path` is `None`.
///
/// # Errors
///
/// Returns `Error::Io` if writing fails.
pub async fn write_output(bytes: &[u8], path: Option<&Path>) -> Result<()> {
    match path {
        Some(path) => {
            tokio::fs::write(path, bytes).await?;
            tracing::debug!(path = %path.display(), bytes = bytes.len(), "Wrote output file");
        }
        None => {
            let mut stdout = tokio::io::stdout();
            stdout.write_all(bytes).await?;
            if !bytes.ends_with(b"\n") && std::str::from_utf8(bytes).is_ok() {
                stdout.write_all(b"\n").await?;
            }
            stdout.flush().await?;
        }
    }
    Ok(())
}
