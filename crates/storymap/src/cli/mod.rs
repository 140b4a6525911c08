//! CLI argument parsing and command dispatch.
//!
//! # Commands
//!
//! - `story-map`: Build a story map from a query, a CSV export or an id list
//!
//! # Global Flags
//!
//! - `--org` / `AZURE_BASE_URL`: organization URL
//! - `--pat` / `AZURE_PERSONAL_ACCESS_TOKEN`: personal access token
//! - `--project`: project scoping WIQL queries
//! - `--config`: configuration file (default: `./storymap.yaml` if present)
//! - `--no-color`: plain stderr messages
//!
//! # Example
//!
//! ```bash
//! azsm story-map --query "SELECT [System.Id] FROM WorkItems WHERE [System.AreaPath] UNDER 'Shop'" > map.svg
//! azsm story-map --csv backlog.csv --id-column "Work Item ID" --format png --output map.png
//! azsm story-map --ids 12,34,56 --format dot --direction tb
//! ```

mod args;
mod execute;
mod types;
mod validators;

use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

pub use args::StoryMapArgs;
pub use execute::{RunSettings, STDIN_MARKER, read_source};
pub use types::{DirectionArg, FormatArg, SplinesArg};
pub use validators::{validate_delimiter, validate_id_column, validate_id_list, validate_org_url};

/// Azure DevOps story maps
///
/// Draws work items and their successor and parent/child links as a
/// Graphviz diagram.
#[derive(Parser, Debug)]
#[command(name = "azsm")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Organization URL, e.g. https://dev.azure.com/contoso
    #[arg(short, long, global = true, env = "AZURE_BASE_URL", value_parser = validate_org_url)]
    pub org: Option<String>,

    /// Personal access token with work item read scope
    #[arg(
        short = 'P',
        long,
        global = true,
        env = "AZURE_PERSONAL_ACCESS_TOKEN",
        hide_env_values = true
    )]
    pub pat: Option<String>,

    /// Project scoping WIQL queries
    #[arg(short, long, global = true)]
    pub project: Option<String>,

    /// Configuration file
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Disable colored messages
    #[arg(long, global = true)]
    pub no_color: bool,

    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Commands,
}

/// Available commands
#[derive(Subcommand, Debug, Clone)]
pub enum Commands {
    /// Build a story map
    ///
    /// Resolves work item ids from exactly one of --query, --csv or --ids,
    /// fetches the items with their relations and writes the diagram to
    /// stdout (or --output). Only links between the selected items are drawn.
    StoryMap(StoryMapArgs),
}

impl Cli {
    /// Parse command-line arguments.
    pub fn parse_args() -> Self {
        <Self as Parser>::parse()
    }

    /// Parse arguments from an iterator (useful for testing).
    ///
    /// # Errors
    ///
    /// Returns a clap error if the arguments are invalid.
    pub fn try_parse_from<I, T>(iter: I) -> std::result::Result<Self, clap::Error>
    where
        I: IntoIterator<Item = T>,
        T: Into<std::ffi::OsString> + Clone,
    {
        <Self as Parser>::try_parse_from(iter)
    }

    /// Execute the parsed command.
    ///
    /// # Errors
    ///
    /// Returns an error if any stage of the command fails.
    pub async fn execute(&self) -> Result<()> {
        match &self.command {
            Commands::StoryMap(args) => execute::execute_story_map(self, args).await,
        }
    }
}
