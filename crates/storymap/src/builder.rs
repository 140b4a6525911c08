//! Graph construction from fetched work items.
//!
//! Records are projected into [`Node`]s, a URL to id map is built once, and
//! every recognized relation whose target is one of the fetched items becomes
//! an [`Edge`]. The result is the subgraph induced by the requested ids:
//! relations pointing elsewhere are dropped without error.

use crate::domain::{Edge, Graph, Node, WorkItem, WorkItemExpand, WorkItemId, fields};
use crate::error::{Error, Result};
use crate::resolver::{WorkItemSource, resolve_ids};
use crate::tracker::WorkItemTracker;
use std::collections::{HashMap, HashSet};

/// Path segment of a work item's REST URL.
const API_PATH: &str = "/_apis/wit/workItems/";

/// Path segment of a work item's browser URL.
const WEB_PATH: &str = "/_workitems/edit/";

/// Resolve `source` and build its graph.
///
/// # Errors
///
/// Fails if resolving ids, fetching records or projecting any record fails.
pub async fn build(tracker: &dyn WorkItemTracker, source: &WorkItemSource) -> Result<Graph> {
    let ids = resolve_ids(tracker, source).await?;
    build_graph(tracker, &ids).await
}

/// Fetch `ids` with their relations and build the graph.
///
/// An empty id list yields an empty graph without contacting the tracker.
///
/// # Errors
///
/// Propagates tracker failures and returns `Error::InvalidWorkItemRecord` if
/// any record lacks mandatory data.
pub async fn build_graph(tracker: &dyn WorkItemTracker, ids: &[WorkItemId]) -> Result<Graph> {
    if ids.is_empty() {
        tracing::info!("No work items to fetch");
        return Ok(Graph::default());
    }

    let work_items = tracker
        .get_work_items(ids, WorkItemExpand::Relations)
        .await?;
    tracing::debug!(
        requested = ids.len(),
        fetched = work_items.len(),
        "Fetched work items"
    );

    assemble_graph(&work_items)
}

/// Build a graph from already fetched records.
///
/// # Errors
///
/// Returns `Error::InvalidWorkItemRecord` if a record has no id, a zero id,
/// no URL or no fields.
pub fn assemble_graph(work_items: &[WorkItem]) -> Result<Graph> {
    let mut seen = HashSet::new();
    let mut sources: Vec<&WorkItem> = Vec::with_capacity(work_items.len());
    let mut nodes: Vec<Node> = Vec::with_capacity(work_items.len());

    for item in work_items {
        let node = project_node(item)?;
        if !seen.insert(node.id) {
            tracing::warn!(id = node.id, "Ignoring duplicate work item record");
            continue;
        }
        sources.push(item);
        nodes.push(node);
    }

    let by_url: HashMap<&str, WorkItemId> = nodes
        .iter()
        .map(|node| (node.url.as_str(), node.id))
        .collect();

    let edges: Vec<Edge> = sources
        .iter()
        .zip(&nodes)
        .flat_map(|(item, node)| resolve_edges(item, node.id, &by_url))
        .collect();

    let graph = Graph { nodes, edges };
    tracing::info!(
        nodes = graph.nodes.len(),
        edges = graph.edges.len(),
        "Built story map graph"
    );
    for cycle in graph.dependency_cycles() {
        tracing::warn!(?cycle, "Work items form a dependency cycle");
    }

    Ok(graph)
}

/// Project a record into a node.
///
/// # Errors
///
/// Returns `Error::InvalidWorkItemRecord` if the id, URL or field map is
/// missing, or the id is zero.
pub fn project_node(item: &WorkItem) -> Result<Node> {
    let id = item.id.ok_or_else(|| Error::InvalidWorkItemRecord {
        id: None,
        reason: "record has no id".to_string(),
    })?;
    if id == 0 {
        return Err(Error::InvalidWorkItemRecord {
            id: Some(id),
            reason: "id must be positive".to_string(),
        });
    }
    let url = item
        .url
        .as_deref()
        .filter(|url| !url.is_empty())
        .ok_or_else(|| Error::InvalidWorkItemRecord {
            id: Some(id),
            reason: "record has no url".to_string(),
        })?;
    if item.fields.is_none() {
        return Err(Error::InvalidWorkItemRecord {
            id: Some(id),
            reason: "record has no fields".to_string(),
        });
    }

    let text = |name: &str| item.field_str(name).unwrap_or_default().to_string();

    Ok(Node {
        id,
        work_item_type: text(fields::WORK_ITEM_TYPE),
        state: text(fields::STATE),
        title: text(fields::TITLE),
        area: text(fields::AREA_PATH),
        parent: item.field_id(fields::PARENT),
        url: url.to_string(),
        web_url: web_url(url),
        description: item.field_str(fields::DESCRIPTION).map(str::to_string),
        acceptance_criteria: item
            .field_str(fields::ACCEPTANCE_CRITERIA)
            .map(str::to_string),
        story_points: item.field_f64(fields::STORY_POINTS),
        effort: item.field_f64(fields::EFFORT),
    })
}

/// Edges of one record whose kind, target and label all resolve.
fn resolve_edges<'a>(
    item: &'a WorkItem,
    from: WorkItemId,
    by_url: &'a HashMap<&str, WorkItemId>,
) -> impl Iterator<Item = Edge> + 'a {
    item.relations().iter().filter_map(move |relation| {
        let kind = relation.kind()?;
        let Some(&to) = relation.url.as_deref().and_then(|url| by_url.get(url)) else {
            tracing::debug!(from, %kind, url = ?relation.url, "Dropping relation to unfetched item");
            return None;
        };
        let Some(name) = relation.name() else {
            tracing::debug!(from, to, %kind, "Dropping relation without a label");
            return None;
        };
        Some(Edge {
            from,
            to,
            name: name.to_string(),
        })
    })
}

/// Browser URL for a work item's REST URL.
fn web_url(url: &str) -> String {
    url.replace(API_PATH, WEB_PATH)
}
