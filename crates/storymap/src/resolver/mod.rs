//! Resolution of work item ids to fetch.
//!
//! Ids come from one of three places: a WIQL query evaluated by the tracker,
//! an explicit list, or a delimited export. Every path yields the same thing:
//! ids in first-seen order with duplicates removed.

mod tabular;

pub use tabular::{DEFAULT_DELIMITER, DEFAULT_ID_COLUMN, TabularSource, ids_from_csv};

use crate::domain::{QueryResult, WorkItemId};
use crate::error::{Error, Result};
use crate::tracker::WorkItemTracker;
use std::collections::HashSet;

/// Where the ids of a story map come from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WorkItemSource {
    /// A WIQL query
    Query(String),

    /// An explicit list of ids
    Ids(Vec<WorkItemId>),

    /// A delimited document and where to find ids in it
    Csv {
        /// Document text
        content: String,
        /// Column and delimiter
        source: TabularSource,
    },
}

/// Resolve a source to the ids to fetch.
///
/// # Errors
///
/// Propagates tracker failures for queries, `Error::MissingResultData` for
/// incomplete query results and `Error::MalformedInput` for bad documents.
pub async fn resolve_ids(
    tracker: &dyn WorkItemTracker,
    source: &WorkItemSource,
) -> Result<Vec<WorkItemId>> {
    let ids = match source {
        WorkItemSource::Query(query) => resolve_query(tracker, query).await?,
        WorkItemSource::Ids(ids) => dedup_preserving_order(ids.iter().copied()),
        WorkItemSource::Csv { content, source } => ids_from_csv(content, source)?,
    };
    tracing::info!(count = ids.len(), "Resolved work item ids");
    Ok(ids)
}

/// Run a WIQL query and extract the ids it matched.
///
/// # Errors
///
/// Propagates tracker failures and `Error::MissingResultData`.
pub async fn resolve_query(tracker: &dyn WorkItemTracker, query: &str) -> Result<Vec<WorkItemId>> {
    let result = tracker.query_by_wiql(query).await?;
    ids_from_query_result(&result)
}

/// Extract ids from a query result.
///
/// Flat results list their items directly. Tree and one-hop results only
/// carry link pairs, so both ends of every pair are collected. Absent ids are
/// skipped and duplicates removed.
///
/// # Errors
///
/// Returns `Error::MissingResultData` if the list belonging to the result
/// type is absent.
pub fn ids_from_query_result(result: &QueryResult) -> Result<Vec<WorkItemId>> {
    match result {
        QueryResult::WorkItems { work_items } => {
            let work_items = work_items.as_ref().ok_or_else(|| {
                Error::MissingResultData("workItems on a work item query result".to_string())
            })?;
            Ok(dedup_preserving_order(
                work_items.iter().filter_map(|item| item.id),
            ))
        }
        QueryResult::Links {
            work_item_relations,
        } => {
            let links = work_item_relations.as_ref().ok_or_else(|| {
                Error::MissingResultData(
                    "workItemRelations on a work item link query result".to_string(),
                )
            })?;
            Ok(dedup_preserving_order(links.iter().flat_map(|link| {
                [link.source.as_ref(), link.target.as_ref()]
                    .into_iter()
                    .flatten()
                    .filter_map(|reference| reference.id)
            })))
        }
    }
}

/// Parse a comma separated id list such as `12, 13,14`.
///
/// Entries that are not positive integers are skipped with a warning.
pub fn parse_id_list(text: &str) -> Vec<WorkItemId> {
    let ids = text
        .split(',')
        .map(str::trim)
        .filter(|entry| !entry.is_empty())
        .filter_map(|entry| match entry.parse::<WorkItemId>() {
            Ok(id) if id > 0 => Some(id),
            _ => {
                tracing::warn!(entry, "Skipping invalid work item id");
                None
            }
        });
    dedup_preserving_order(ids)
}

pub(crate) fn dedup_preserving_order(
    ids: impl IntoIterator<Item = WorkItemId>,
) -> Vec<WorkItemId> {
    let mut seen = HashSet::new();
    ids.into_iter().filter(|id| seen.insert(*id)).collect()
}
