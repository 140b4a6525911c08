//! Graphviz process adapter.

use super::ImageFormat;
use crate::error::{Error, Result};
use std::path::{Path, PathBuf};
use std::process::Stdio;
use tokio::io::AsyncWriteExt;
use tokio::process::Command;

/// Default layout engine binary.
pub const DEFAULT_DOT_BINARY: &str = "dot";

/// Renders DOT source by piping it through a Graphviz binary.
#[derive(Debug, Clone)]
pub struct GraphvizRenderer {
    binary: PathBuf,
}

impl Default for GraphvizRenderer {
    fn default() -> Self {
        Self::new(DEFAULT_DOT_BINARY)
    }
}

impl GraphvizRenderer {
    /// Create a renderer invoking `binary`.
    pub fn new(binary: impl Into<PathBuf>) -> Self {
        Self {
            binary: binary.into(),
        }
    }

    /// The binary this renderer invokes.
    pub fn binary(&self) -> &Path {
        &self.binary
    }

    /// Render `source` and return the engine's output verbatim.
    ///
    /// # Errors
    ///
    /// - `Error::RendererUnavailable` if the binary cannot be started
    /// - `Error::Render` if it exits unsuccessfully
    /// - `Error::Io` if the source cannot be written to it
    pub async fn render(&self, source: &str, format: ImageFormat) -> Result<Vec<u8>> {
        tracing::debug!(binary = %self.binary.display(), format = format.graphviz_name(), "Rendering diagram");

        let mut child = Command::new(&self.binary)
            .arg(format!("-T{}", format.graphviz_name()))
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true)
            .spawn()
            .map_err(|source| Error::RendererUnavailable {
                binary: self.binary.clone(),
                source,
            })?;

        let mut stdin = child
            .stdin
            .take()
            .ok_or_else(|| Error::Io(std::io::Error::other("renderer stdin was not captured")))?;
        let input = source.as_bytes().to_vec();
        let write = async move {
            stdin.write_all(&input).await?;
            stdin.shutdown().await
        };

        let (written, output) = tokio::join!(write, child.wait_with_output());
        let output = output?;

        if !output.status.success() {
            return Err(Error::Render {
                status: output.status.to_string(),
                stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
            });
        }
        written?;

        tracing::debug!(bytes = output.stdout.len(), "Rendered diagram");
        Ok(output.stdout)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_missing_binary_is_unavailable() {
        let renderer = GraphvizRenderer::new("/nonexistent/storymap-dot");
        let result = renderer.render("digraph {}", ImageFormat::Svg).await;
        match result {
            Err(Error::RendererUnavailable { binary, .. }) => {
                assert_eq!(binary, PathBuf::from("/nonexistent/storymap-dot"));
            }
            other => panic!("expected RendererUnavailable, got {other:?}"),
        }
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_failing_engine_reports_exit_status() {
        // `sh -Tsvg` rejects the unknown option and exits non-zero.
        let renderer = GraphvizRenderer::new("sh");
        let result = renderer.render("digraph {}", ImageFormat::Svg).await;
        assert!(matches!(result, Err(Error::Render { .. })), "{result:?}");
    }

    #[test]
    fn test_default_binary() {
        assert_eq!(GraphvizRenderer::default().binary(), Path::new("dot"));
    }
}
