//! Raw work-item tracking records as returned by the backend.
//!
//! These mirror the REST payloads closely: nearly everything is optional,
//! and it is up to the resolver and graph builder to decide which absences
//! are fatal.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::fmt;

use super::WorkItemId;

/// Field reference names read when projecting a work item.
pub mod fields {
    /// Area path the item belongs to.
    pub const AREA_PATH: &str = "System.AreaPath";
    /// Workflow state.
    pub const STATE: &str = "System.State";
    /// Category (Epic, Feature, User Story, ...).
    pub const WORK_ITEM_TYPE: &str = "System.WorkItemType";
    /// Title.
    pub const TITLE: &str = "System.Title";
    /// Id of the hierarchy parent.
    pub const PARENT: &str = "System.Parent";
    /// Rich-text description.
    pub const DESCRIPTION: &str = "System.Description";
    /// Rich-text acceptance criteria.
    pub const ACCEPTANCE_CRITERIA: &str = "Microsoft.VSTS.Common.AcceptanceCriteria";
    /// Story point estimate (Agile process).
    pub const STORY_POINTS: &str = "Microsoft.VSTS.Scheduling.StoryPoints";
    /// Effort estimate (Scrum process).
    pub const EFFORT: &str = "Microsoft.VSTS.Scheduling.Effort";
}

/// A work item with its fields and, when expanded, its relations.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WorkItem {
    /// Work item id.
    pub id: Option<WorkItemId>,

    /// Canonical REST URL of the item.
    pub url: Option<String>,

    /// Field values keyed by reference name.
    pub fields: Option<Map<String, Value>>,

    /// Links to other items, present when relations were expanded.
    pub relations: Option<Vec<WorkItemRelation>>,
}

impl WorkItem {
    /// Returns a string field, if present and a string.
    pub fn field_str(&self, name: &str) -> Option<&str> {
        self.fields.as_ref()?.get(name)?.as_str()
    }

    /// Returns a numeric field as a work item id.
    pub fn field_id(&self, name: &str) -> Option<WorkItemId> {
        let value = self.fields.as_ref()?.get(name)?.as_u64()?;
        WorkItemId::try_from(value).ok()
    }

    /// Returns a numeric field as a float.
    pub fn field_f64(&self, name: &str) -> Option<f64> {
        self.fields.as_ref()?.get(name)?.as_f64()
    }

    /// Relations of this item, empty when they were not expanded.
    pub fn relations(&self) -> &[WorkItemRelation] {
        self.relations.as_deref().unwrap_or_default()
    }
}

/// A typed link from one work item to another resource.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct WorkItemRelation {
    /// Link type reference name, e.g. `System.LinkTypes.Hierarchy-Forward`.
    pub rel: Option<String>,

    /// URL of the linked resource.
    pub url: Option<String>,

    /// Link attributes; `name` carries the human readable label.
    pub attributes: Option<Map<String, Value>>,
}

impl WorkItemRelation {
    /// The relation's display label (`attributes.name`).
    pub fn name(&self) -> Option<&str> {
        self.attributes.as_ref()?.get("name")?.as_str()
    }

    /// The recognized kind of this relation, if any.
    pub fn kind(&self) -> Option<RelationKind> {
        self.rel.as_deref().and_then(RelationKind::from_reference_name)
    }
}

/// Relation kinds that become graph edges.
///
/// Only the forward direction of each link type is recognized; the reverse
/// link stored on the other item describes the same edge.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RelationKind {
    /// Dependency link pointing at the successor.
    Successor,

    /// Hierarchy link pointing at a child.
    Child,
}

impl RelationKind {
    /// All kinds that are turned into edges.
    pub const ALL: [RelationKind; 2] = [RelationKind::Successor, RelationKind::Child];

    /// The backend's reference name for this link type.
    pub fn reference_name(self) -> &'static str {
        match self {
            Self::Successor => "System.LinkTypes.Dependency-Forward",
            Self::Child => "System.LinkTypes.Hierarchy-Forward",
        }
    }

    /// Looks up a kind by the backend's reference name.
    pub fn from_reference_name(rel: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|kind| kind.reference_name() == rel)
    }
}

impl fmt::Display for RelationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Successor => write!(f, "successor"),
            Self::Child => write!(f, "child"),
        }
    }
}

/// Which parts of a work item the backend should expand.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum WorkItemExpand {
    /// Fields only, no expansion.
    #[default]
    None,
    /// Include relations.
    Relations,
    /// Include all fields.
    Fields,
    /// Include hyperlinks.
    Links,
    /// Everything.
    All,
}

impl WorkItemExpand {
    /// Value of the `$expand` query parameter.
    pub fn as_query_value(self) -> &'static str {
        match self {
            Self::None => "none",
            Self::Relations => "relations",
            Self::Fields => "fields",
            Self::Links => "links",
            Self::All => "all",
        }
    }
}

/// Reference to a work item inside a query result.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct WorkItemReference {
    /// Work item id.
    pub id: Option<WorkItemId>,

    /// REST URL of the item.
    pub url: Option<String>,
}

impl WorkItemReference {
    /// Creates a reference carrying only an id.
    pub fn with_id(id: WorkItemId) -> Self {
        Self {
            id: Some(id),
            url: None,
        }
    }
}

/// A source/target pair produced by tree and one-hop queries.
///
/// Root rows of a tree query have no source.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct WorkItemLink {
    /// Link type reference name, absent for root rows.
    pub rel: Option<String>,

    /// Linking item.
    pub source: Option<WorkItemReference>,

    /// Linked item.
    pub target: Option<WorkItemReference>,
}

/// Result of evaluating a WIQL query.
///
/// Flat queries return work item references; tree and one-hop queries only
/// return link pairs.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "queryResultType")]
pub enum QueryResult {
    /// Flat list of matching items.
    #[serde(rename = "workItem", rename_all = "camelCase")]
    WorkItems {
        /// Matching items.
        work_items: Option<Vec<WorkItemReference>>,
    },

    /// Link pairs from a tree or one-hop query.
    #[serde(rename = "workItemLink", rename_all = "camelCase")]
    Links {
        /// Matching links.
        work_item_relations: Option<Vec<WorkItemLink>>,
    },
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_flat_query_result_deserializes() {
        let result: QueryResult = serde_json::from_value(json!({
            "queryType": "flat",
            "queryResultType": "workItem",
            "asOf": "2024-01-01T00:00:00Z",
            "workItems": [{ "id": 1, "url": "https://x/_apis/wit/workItems/1" }, { "id": 2 }]
        }))
        .unwrap();

        let QueryResult::WorkItems { work_items } = result else {
            panic!("expected flat result");
        };
        let ids: Vec<_> = work_items.unwrap().iter().map(|r| r.id).collect();
        assert_eq!(ids, vec![Some(1), Some(2)]);
    }

    #[test]
    fn test_link_query_result_deserializes_root_rows() {
        let result: QueryResult = serde_json::from_value(json!({
            "queryType": "tree",
            "queryResultType": "workItemLink",
            "workItemRelations": [
                { "rel": null, "source": null, "target": { "id": 5 } },
                { "rel": "System.LinkTypes.Hierarchy-Forward", "source": { "id": 5 }, "target": { "id": 7 } }
            ]
        }))
        .unwrap();

        let QueryResult::Links {
            work_item_relations: Some(links),
        } = result
        else {
            panic!("expected link result with relations");
        };
        assert_eq!(links.len(), 2);
        assert!(links[0].source.is_none());
        assert_eq!(links[1].target, Some(WorkItemReference::with_id(7)));
    }

    #[test]
    fn test_missing_result_list_is_none() {
        let result: QueryResult =
            serde_json::from_value(json!({ "queryResultType": "workItem" })).unwrap();
        assert_eq!(result, QueryResult::WorkItems { work_items: None });
    }

    #[test]
    fn test_relation_kind_only_recognizes_forward_links() {
        assert_eq!(
            RelationKind::from_reference_name("System.LinkTypes.Dependency-Forward"),
            Some(RelationKind::Successor)
        );
        assert_eq!(
            RelationKind::from_reference_name("System.LinkTypes.Hierarchy-Forward"),
            Some(RelationKind::Child)
        );
        assert_eq!(
            RelationKind::from_reference_name("System.LinkTypes.Hierarchy-Reverse"),
            None
        );
        assert_eq!(
            RelationKind::from_reference_name("System.LinkTypes.Related"),
            None
        );
    }

    #[test]
    fn test_work_item_field_accessors() {
        let item: WorkItem = serde_json::from_value(json!({
            "id": 3,
            "url": "https://x/_apis/wit/workItems/3",
            "fields": {
                "System.Title": "Checkout",
                "System.Parent": 1,
                "Microsoft.VSTS.Scheduling.StoryPoints": 5.0
            }
        }))
        .unwrap();

        assert_eq!(item.field_str(fields::TITLE), Some("Checkout"));
        assert_eq!(item.field_id(fields::PARENT), Some(1));
        assert_eq!(item.field_f64(fields::STORY_POINTS), Some(5.0));
        assert_eq!(item.field_str(fields::STATE), None);
        assert!(item.relations().is_empty());
    }
}
