//! Error types for storymap operations.

use crate::domain::WorkItemId;
use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// The error type for storymap operations.
///
/// Any of these aborts the whole build; no partial graph or diagram is
/// produced once one is returned.
#[derive(Debug, Error)]
pub enum Error {
    /// The query response is missing a field its result type requires.
    #[error("Missing result data: {0}")]
    MissingResultData(String),

    /// A tabular import could not be read.
    ///
    /// `row` is the 1-based data row; row 0 refers to the header.
    #[error("Malformed input at row {row}: {message}")]
    MalformedInput {
        /// Data row the problem was found in.
        row: usize,
        /// What was wrong with it.
        message: String,
    },

    /// A fetched work item lacks mandatory data.
    #[error("Invalid work item record{}: {reason}", .id.map(|id| format!(" {id}")).unwrap_or_default())]
    InvalidWorkItemRecord {
        /// Id of the record, when it had one.
        id: Option<WorkItemId>,
        /// What was missing.
        reason: String,
    },

    /// The tracking backend answered with a non-success status.
    #[error("Backend returned HTTP {status}: {message}")]
    Backend {
        /// HTTP status code.
        status: u16,
        /// Response body or reason phrase.
        message: String,
    },

    /// The request never produced a usable response.
    #[error("Transport error: {0}")]
    Transport(String),

    /// The layout engine could not be started.
    #[error("Renderer '{}' could not be started: {source}", .binary.display())]
    RendererUnavailable {
        /// Binary that was invoked.
        binary: PathBuf,
        /// Underlying spawn error.
        #[source]
        source: io::Error,
    },

    /// The layout engine ran but rejected its input.
    #[error("Renderer exited with {status}: {stderr}")]
    Render {
        /// Exit status as reported by the OS.
        status: String,
        /// Captured standard error.
        stderr: String,
    },

    /// Configuration error.
    #[error("Configuration error: {0}")]
    Config(String),

    /// IO error occurred.
    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    /// JSON parsing or serialization error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// A specialized Result type for storymap operations.
pub type Result<T> = std::result::Result<T, Error>;
