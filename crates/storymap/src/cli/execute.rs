//! Command execution logic.

use anyhow::{Context, Result, bail};
use std::io::IsTerminal;
use std::path::PathBuf;
use tokio::io::{AsyncRead, AsyncReadExt};

use super::Cli;
use super::args::StoryMapArgs;
use super::validators::validate_org_url;
use crate::app::App;
use crate::config::StorymapConfig;
use crate::output::{self, OutputConfig, OutputFormat, color};
use crate::render::{DEFAULT_DOT_BINARY, DiagramOptions, GraphvizRenderer};
use crate::resolver::{TabularSource, WorkItemSource, parse_id_list};
use crate::tracker::ConnectionSettings;

/// `--query` value that reads the query from stdin.
pub const STDIN_MARKER: &str = "-";

/// Settings for one story-map run, merged from flags, environment and the
/// configuration file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunSettings {
    /// Organization URL, if known
    pub organization: Option<String>,
    /// Project scoping WIQL queries
    pub project: Option<String>,
    /// CSV column and delimiter
    pub tabular: TabularSource,
    /// What to emit
    pub format: OutputFormat,
    /// Layout settings
    pub diagram: DiagramOptions,
    /// Graphviz binary
    pub dot_binary: PathBuf,
}

impl RunSettings {
    /// Merge parsed arguments over a configuration file.
    ///
    /// Flags (and the environment variables clap reads for them) win over
    /// the file, which wins over built-in defaults.
    ///
    /// # Errors
    ///
    /// Returns an error if the configured organization URL is invalid.
    pub fn resolve(cli: &Cli, args: &StoryMapArgs, config: &StorymapConfig) -> Result<Self> {
        let organization = match (&cli.org, &config.organization) {
            (Some(org), _) => Some(org.clone()),
            (None, Some(org)) => Some(
                validate_org_url(org)
                    .map_err(anyhow::Error::msg)
                    .context("Invalid organization in configuration file")?,
            ),
            (None, None) => None,
        };

        let mut tabular = TabularSource::default();
        if let Some(column) = args.id_column.as_ref().or(config.id_column.as_ref()) {
            tabular.id_column.clone_from(column);
        }
        if let Some(delimiter) = args.delimiter.or(config.delimiter) {
            tabular.delimiter = delimiter;
        }

        let renderer = &config.renderer;
        let defaults = DiagramOptions::default();
        let diagram = DiagramOptions {
            direction: args
                .direction
                .map(Into::into)
                .or(renderer.direction)
                .unwrap_or(defaults.direction),
            splines: args
                .splines
                .map(Into::into)
                .or(renderer.splines)
                .unwrap_or(defaults.splines),
        };

        Ok(Self {
            organization,
            project: cli.project.clone().or_else(|| config.project.clone()),
            tabular,
            format: args
                .format
                .map(Into::into)
                .or(renderer.format)
                .unwrap_or_default(),
            diagram,
            dot_binary: args
                .dot_binary
                .clone()
                .or_else(|| renderer.dot_binary.clone())
                .unwrap_or_else(|| PathBuf::from(DEFAULT_DOT_BINARY)),
        })
    }

    /// Connection settings for this run.
    pub fn connection(&self, personal_access_token: Option<&str>) -> ConnectionSettings {
        ConnectionSettings::new(
            self.organization.clone().unwrap_or_default(),
            personal_access_token.unwrap_or_default(),
        )
        .with_project(self.project.clone())
    }
}

/// Turn the input arguments into a work item source.
///
/// `stdin` is read only for `--query -`.
///
/// # Errors
///
/// Returns an error if the query is empty, stdin or the CSV file cannot be
/// read, or no input was given.
pub async fn read_source<R>(
    args: &StoryMapArgs,
    tabular: TabularSource,
    mut stdin: R,
) -> Result<WorkItemSource>
where
    R: AsyncRead + Unpin,
{
    if let Some(query) = &args.query {
        let query = if query == STDIN_MARKER {
            let mut text = String::new();
            stdin
                .read_to_string(&mut text)
                .await
                .context("Failed to read the query from stdin")?;
            text
        } else {
            query.clone()
        };

        if query.trim().is_empty() {
            bail!("The WIQL query is empty");
        }
        return Ok(WorkItemSource::Query(query.trim().to_string()));
    }

    if let Some(path) = &args.csv {
        let content = tokio::fs::read_to_string(path)
            .await
            .with_context(|| format!("Failed to read {}", path.display()))?;
        return Ok(WorkItemSource::Csv {
            content,
            source: tabular,
        });
    }

    if let Some(ids) = &args.ids {
        return Ok(WorkItemSource::Ids(parse_id_list(ids)));
    }

    bail!("One of --query, --csv or --ids is required")
}

/// Execute the story-map command
pub async fn execute_story_map(cli: &Cli, args: &StoryMapArgs) -> Result<()> {
    let working_dir = std::env::current_dir()?;
    let config = StorymapConfig::discover(cli.config.as_deref(), &working_dir).await?;
    let output_config = if cli.no_color {
        OutputConfig::new(false)
    } else {
        OutputConfig::from_env()
    };

    let settings = RunSettings::resolve(cli, args, &config)?;
    tracing::debug!(?settings, "Resolved run settings");

    if args.query.as_deref() == Some(STDIN_MARKER) && std::io::stdin().is_terminal() {
        bail!("--query - expects the WIQL query on stdin");
    }
    let source = read_source(args, settings.tabular.clone(), tokio::io::stdin()).await?;

    let app = App::connect(
        &settings.connection(cli.pat.as_deref()),
        GraphvizRenderer::new(&settings.dot_binary),
    )?;
    let graph = app.build(&source).await?;
    let bytes = app
        .render(&graph, settings.format, &settings.diagram)
        .await?;

    output::write_output(&bytes, args.output.as_deref()).await?;

    if graph.is_empty() {
        eprintln!("{}", output::empty_notice(&output_config));
    } else {
        eprintln!("{}", output::summary_line(&graph, &output_config));
    }
    if let Some(path) = &args.output {
        eprintln!(
            "{}",
            color::dimmed(&format!("Wrote {}", path.display()), &output_config)
        );
    }

    Ok(())
}
