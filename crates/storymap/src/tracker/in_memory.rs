//! In-memory tracking backend.
//!
//! Serves canned query results and work items. Lookups behave like the REST
//! backend: unknown queries and unknown ids are rejected with a
//! `Error::Backend` status rather than silently ignored.

use super::WorkItemTracker;
use crate::domain::{QueryResult, WorkItem, WorkItemExpand, WorkItemId};
use crate::error::{Error, Result};
use async_trait::async_trait;
use std::collections::HashMap;

/// A tracker backed by maps of queries and work items.
#[derive(Debug, Clone, Default)]
pub struct InMemoryTracker {
    queries: HashMap<String, QueryResult>,
    work_items: HashMap<WorkItemId, WorkItem>,
}

impl InMemoryTracker {
    /// Create an empty tracker.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register the result returned for an exact query string.
    #[must_use]
    pub fn with_query(mut self, query: impl Into<String>, result: QueryResult) -> Self {
        self.queries.insert(query.into(), result);
        self
    }

    /// Register a work item. Items without an id are ignored.
    #[must_use]
    pub fn with_work_item(mut self, item: WorkItem) -> Self {
        self.insert(item);
        self
    }

    /// Register several work items.
    #[must_use]
    pub fn with_work_items(mut self, items: impl IntoIterator<Item = WorkItem>) -> Self {
        for item in items {
            self.insert(item);
        }
        self
    }

    fn insert(&mut self, item: WorkItem) {
        match item.id {
            Some(id) => {
                self.work_items.insert(id, item);
            }
            None => tracing::warn!("Ignoring in-memory work item without an id"),
        }
    }
}

#[async_trait]
impl WorkItemTracker for InMemoryTracker {
    async fn query_by_wiql(&self, query: &str) -> Result<QueryResult> {
        self.queries
            .get(query)
            .cloned()
            .ok_or_else(|| Error::Backend {
                status: 400,
                message: format!("unknown query: {query}"),
            })
    }

    async fn get_work_items(
        &self,
        ids: &[WorkItemId],
        expand: WorkItemExpand,
    ) -> Result<Vec<WorkItem>> {
        ids.iter()
            .map(|id| {
                let mut item = self.work_items.get(id).cloned().ok_or_else(|| Error::Backend {
                    status: 404,
                    message: format!("work item {id} does not exist"),
                })?;
                if !matches!(expand, WorkItemExpand::Relations | WorkItemExpand::All) {
                    item.relations = None;
                }
                Ok(item)
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::WorkItemRelation;

    fn item(id: WorkItemId) -> WorkItem {
        WorkItem {
            id: Some(id),
            url: Some(format!("https://x/_apis/wit/workItems/{id}")),
            fields: Some(serde_json::Map::new()),
            relations: Some(vec![WorkItemRelation::default()]),
        }
    }

    #[tokio::test]
    async fn test_returns_items_in_requested_order() {
        let tracker = InMemoryTracker::new().with_work_items([item(1), item(2), item(3)]);
        let items = tracker
            .get_work_items(&[3, 1], WorkItemExpand::Relations)
            .await
            .unwrap();
        let ids: Vec<_> = items.iter().map(|i| i.id).collect();
        assert_eq!(ids, vec![Some(3), Some(1)]);
        assert!(items[0].relations.is_some());
    }

    #[tokio::test]
    async fn test_relations_only_returned_when_expanded() {
        let tracker = InMemoryTracker::new().with_work_item(item(1));
        let items = tracker
            .get_work_items(&[1], WorkItemExpand::None)
            .await
            .unwrap();
        assert!(items[0].relations.is_none());
    }

    #[tokio::test]
    async fn test_unknown_id_fails_whole_call() {
        let tracker = InMemoryTracker::new().with_work_item(item(1));
        let result = tracker
            .get_work_items(&[1, 99], WorkItemExpand::Relations)
            .await;
        assert!(matches!(result, Err(Error::Backend { status: 404, .. })));
    }

    #[tokio::test]
    async fn test_unknown_query_is_rejected() {
        let tracker = InMemoryTracker::new();
        let result = tracker.query_by_wiql("SELECT nothing").await;
        assert!(matches!(result, Err(Error::Backend { status: 400, .. })));
    }
}
