//! CLI argument structs.

use clap::{ArgGroup, Parser};
use std::path::PathBuf;

use super::types::{DirectionArg, FormatArg, SplinesArg};
use super::validators::{validate_delimiter, validate_id_column, validate_id_list};

/// Arguments for the `story-map` command
#[derive(Parser, Debug, Clone)]
#[command(group(
    ArgGroup::new("input")
        .required(true)
        .args(["query", "csv", "ids"])
))]
pub struct StoryMapArgs {
    /// WIQL query selecting the work items
    ///
    /// Pass `-` to read the query from stdin.
    #[arg(short, long)]
    pub query: Option<String>,

    /// CSV export containing work item ids
    #[arg(short, long)]
    pub csv: Option<PathBuf>,

    /// Work item ids (comma-separated)
    ///
    /// Entries that are not positive integers are skipped.
    #[arg(short, long, value_parser = validate_id_list)]
    pub ids: Option<String>,

    /// CSV column holding the ids [default: ID]
    #[arg(long, value_parser = validate_id_column, conflicts_with_all = ["query", "ids"])]
    pub id_column: Option<String>,

    /// CSV field delimiter [default: ,]
    #[arg(long, value_parser = validate_delimiter, conflicts_with_all = ["query", "ids"])]
    pub delimiter: Option<char>,

    /// Output format [default: svg]
    #[arg(short, long, value_enum)]
    pub format: Option<FormatArg>,

    /// Layout direction [default: lr]
    #[arg(short, long, value_enum)]
    pub direction: Option<DirectionArg>,

    /// Edge drawing mode [default: ortho]
    #[arg(short, long, value_enum)]
    pub splines: Option<SplinesArg>,

    /// Graphviz binary used for svg and png output [default: dot]
    #[arg(long)]
    pub dot_binary: Option<PathBuf>,

    /// Write the result to a file instead of stdout
    #[arg(long)]
    pub output: Option<PathBuf>,
}
