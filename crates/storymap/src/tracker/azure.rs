//! Azure DevOps REST backend.
//!
//! Requests are made with a blocking `ureq` agent on tokio's blocking pool.
//! Work item fetches are split into batches the API accepts and the batches
//! are issued concurrently; results keep the order of the requested ids.

use super::{ConnectionSettings, WorkItemTracker, fetch_in_batches};
use crate::domain::{QueryResult, WorkItem, WorkItemExpand, WorkItemId};
use crate::error::{Error, Result};
use async_trait::async_trait;
use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use serde::Deserialize;
use serde::de::DeserializeOwned;

/// REST API version sent with every request.
pub const API_VERSION: &str = "7.1";

/// Maximum number of ids the work items endpoint accepts per call.
pub const MAX_BATCH_SIZE: usize = 200;

/// Response envelope of the work items endpoint.
#[derive(Debug, Deserialize)]
struct WorkItemBatch {
    #[serde(default)]
    value: Vec<WorkItem>,
}

/// Client for the work item tracking REST API of one organization.
#[derive(Clone)]
pub struct AzureDevOpsClient {
    agent: ureq::Agent,
    organization_url: String,
    project: Option<String>,
    authorization: String,
}

impl std::fmt::Debug for AzureDevOpsClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AzureDevOpsClient")
            .field("organization_url", &self.organization_url)
            .field("project", &self.project)
            .finish_non_exhaustive()
    }
}

impl AzureDevOpsClient {
    /// Create a client from connection settings.
    pub fn new(settings: &ConnectionSettings) -> Self {
        let agent = ureq::AgentBuilder::new().timeout(settings.timeout).build();
        Self {
            agent,
            organization_url: settings.organization_url.trim_end_matches('/').to_string(),
            project: settings
                .project
                .as_deref()
                .map(str::trim)
                .filter(|p| !p.is_empty())
                .map(str::to_string),
            authorization: basic_auth_header(&settings.personal_access_token),
        }
    }

    fn wiql_url(&self) -> String {
        match &self.project {
            Some(project) => format!(
                "{}/{}/_apis/wit/wiql?api-version={API_VERSION}",
                self.organization_url, project
            ),
            None => format!(
                "{}/_apis/wit/wiql?api-version={API_VERSION}",
                self.organization_url
            ),
        }
    }

    fn work_items_url(&self, ids: &[WorkItemId], expand: WorkItemExpand) -> String {
        let ids = ids
            .iter()
            .map(ToString::to_string)
            .collect::<Vec<_>>()
            .join(",");
        format!(
            "{}/_apis/wit/workitems?ids={ids}&$expand={}&api-version={API_VERSION}",
            self.organization_url,
            expand.as_query_value()
        )
    }

    async fn fetch_batch(&self, ids: Vec<WorkItemId>, expand: WorkItemExpand) -> Result<Vec<WorkItem>> {
        let request = self
            .agent
            .get(&self.work_items_url(&ids, expand))
            .set("Authorization", &self.authorization);

        tracing::debug!(count = ids.len(), "Fetching work item batch");
        let batch: WorkItemBatch = run_blocking(move || call_json(request.call())).await?;
        Ok(batch.value)
    }
}

#[async_trait]
impl WorkItemTracker for AzureDevOpsClient {
    async fn query_by_wiql(&self, query: &str) -> Result<QueryResult> {
        let request = self
            .agent
            .post(&self.wiql_url())
            .set("Authorization", &self.authorization);
        let body = serde_json::json!({ "query": query });

        tracing::debug!(query, "Running WIQL query");
        run_blocking(move || call_json(request.send_json(body))).await
    }

    async fn get_work_items(
        &self,
        ids: &[WorkItemId],
        expand: WorkItemExpand,
    ) -> Result<Vec<WorkItem>> {
        fetch_in_batches(ids, MAX_BATCH_SIZE, |chunk| self.fetch_batch(chunk, expand)).await
    }
}

/// Build the `Authorization` header value for a personal access token.
fn basic_auth_header(token: &str) -> String {
    format!("Basic {}", STANDARD.encode(format!(":{token}")))
}

/// Run a blocking request on the blocking thread pool.
async fn run_blocking<T, F>(call: F) -> Result<T>
where
    T: Send + 'static,
    F: FnOnce() -> Result<T> + Send + 'static,
{
    tokio::task::spawn_blocking(call)
        .await
        .map_err(|e| Error::Transport(format!("request task failed: {e}")))?
}

/// Decode a JSON response, mapping transport and status failures.
fn call_json<T: DeserializeOwned>(
    response: std::result::Result<ureq::Response, ureq::Error>,
) -> Result<T> {
    match response {
        Ok(response) => response
            .into_json()
            .map_err(|e| Error::Transport(format!("invalid response body: {e}"))),
        Err(ureq::Error::Status(status, response)) => {
            let message = response
                .into_string()
                .ok()
                .filter(|body| !body.trim().is_empty())
                .unwrap_or_else(|| "no response body".to_string());
            Err(Error::Backend { status, message })
        }
        Err(ureq::Error::Transport(transport)) => Err(Error::Transport(transport.to_string())),
    }
}
