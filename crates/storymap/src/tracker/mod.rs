//! Work-item tracking backends.
//!
//! The graph pipeline only talks to the [`WorkItemTracker`] trait. Two
//! implementations are provided:
//!
//! - **Azure DevOps**: the REST API, authenticated with a personal access token
//! - **In-memory**: canned query results and work items, for tests and offline use
//!
//! # Example
//!
//! ```no_run
//! use storymap::tracker::{ConnectionSettings, connect};
//!
//! #[tokio::main(flavor = "current_thread")]
//! async fn main() -> anyhow::Result<()> {
//!     let settings = ConnectionSettings::new("https://dev.azure.com/contoso", "pat");
//!     let tracker = connect(&settings)?;
//!     let result = tracker.query_by_wiql("SELECT [System.Id] FROM WorkItems").await?;
//!     println!("{result:?}");
//!     Ok(())
//! }
//! ```

use crate::domain::{QueryResult, WorkItem, WorkItemExpand, WorkItemId};
use crate::error::{Error, Result};
use async_trait::async_trait;
use futures::future::try_join_all;
use std::future::Future;
use std::time::Duration;

pub mod azure;
pub mod in_memory;

pub use azure::AzureDevOpsClient;
pub use in_memory::InMemoryTracker;

/// Query and fetch operations of a work-item tracking service.
///
/// Implementations perform no retries; a failed call fails the build.
#[async_trait]
pub trait WorkItemTracker: Send + Sync {
    /// Evaluate a WIQL query.
    ///
    /// # Errors
    ///
    /// Returns `Error::Backend` if the service rejects the query and
    /// `Error::Transport` if no response could be obtained.
    async fn query_by_wiql(&self, query: &str) -> Result<QueryResult>;

    /// Fetch full records for `ids`.
    ///
    /// Records come back in the order of `ids`. An unknown id fails the
    /// whole call.
    ///
    /// # Errors
    ///
    /// Returns `Error::Backend` if the service rejects the request and
    /// `Error::Transport` if no response could be obtained.
    async fn get_work_items(
        &self,
        ids: &[WorkItemId],
        expand: WorkItemExpand,
    ) -> Result<Vec<WorkItem>>;
}

/// Default HTTP timeout for backend calls.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// How to reach an Azure DevOps organization.
#[derive(Clone)]
pub struct ConnectionSettings {
    /// Organization URL, e.g. `https://dev.azure.com/contoso`
    pub organization_url: String,

    /// Project used to scope WIQL queries, if any
    pub project: Option<String>,

    /// Personal access token
    pub personal_access_token: String,

    /// Per-request timeout
    pub timeout: Duration,
}

impl std::fmt::Debug for ConnectionSettings {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ConnectionSettings")
            .field("organization_url", &self.organization_url)
            .field("project", &self.project)
            .field("personal_access_token", &"<redacted>")
            .field("timeout", &self.timeout)
            .finish()
    }
}

impl ConnectionSettings {
    /// Settings for an organization with the default timeout and no project.
    pub fn new(organization_url: impl Into<String>, personal_access_token: impl Into<String>) -> Self {
        Self {
            organization_url: organization_url.into(),
            project: None,
            personal_access_token: personal_access_token.into(),
            timeout: DEFAULT_TIMEOUT,
        }
    }

    /// Scope WIQL queries to a project.
    #[must_use]
    pub fn with_project(mut self, project: Option<String>) -> Self {
        self.project = project;
        self
    }
}

/// Create a tracker for the given connection settings.
///
/// # Errors
///
/// Returns `Error::Config` if the organization URL or token is empty.
pub fn connect(settings: &ConnectionSettings) -> Result<Box<dyn WorkItemTracker>> {
    if settings.organization_url.trim().is_empty() {
        return Err(Error::Config(
            "organization URL is not set (use --org or AZURE_BASE_URL)".to_string(),
        ));
    }
    if settings.personal_access_token.trim().is_empty() {
        return Err(Error::Config(
            "personal access token is not set (use --pat or AZURE_PERSONAL_ACCESS_TOKEN)"
                .to_string(),
        ));
    }
    Ok(Box::new(AzureDevOpsClient::new(settings)))
}

/// Fetch `ids` in chunks of at most `batch_size`, all chunks concurrently.
///
/// Results are concatenated in chunk order, so the output matches a single
/// sequential fetch.
pub(crate) async fn fetch_in_batches<F, Fut>(
    ids: &[WorkItemId],
    batch_size: usize,
    fetch: F,
) -> Result<Vec<WorkItem>>
where
    F: Fn(Vec<WorkItemId>) -> Fut,
    Fut: Future<Output = Result<Vec<WorkItem>>>,
{
    let batches = ids.chunks(batch_size.max(1)).map(|chunk| fetch(chunk.to_vec()));
    let results = try_join_all(batches).await?;
    Ok(results.into_iter().flatten().collect())
}
