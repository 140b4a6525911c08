//! Storymap CLI binary.

use anyhow::Result;
use storymap::cli::Cli;
use tracing_subscriber::EnvFilter;

/// Main entry point for the `azsm` CLI.
///
/// The diagram is the only thing written to stdout, so logs go to stderr.
#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    // Example: RUST_LOG=storymap=debug azsm story-map --ids 1,2
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("storymap=info")),
        )
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();

    tracing::debug!("Starting azsm");

    let cli = Cli::parse_args();
    cli.execute().await?;

    tracing::debug!("azsm completed successfully");
    Ok(())
}
