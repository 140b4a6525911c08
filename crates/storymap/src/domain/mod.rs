//! Domain types for story maps.
//!
//! A [`Graph`] is the only artifact passed from the graph builder to the
//! diagram renderer. Nodes never reference each other or their edges; edges
//! refer to nodes by id.

mod work_item;

pub use work_item::{
    QueryResult, RelationKind, WorkItem, WorkItemExpand, WorkItemLink, WorkItemReference,
    WorkItemRelation, fields,
};

use petgraph::algo::tarjan_scc;
use petgraph::graphmap::DiGraphMap;
use serde::{Deserialize, Serialize};

/// Identifier of a work item in the tracking backend.
pub type WorkItemId = u32;

/// A work item projected for graphing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Node {
    /// Work item id
    pub id: WorkItemId,

    /// Category (Epic, Feature, User Story, Task, ...)
    #[serde(rename = "type")]
    pub work_item_type: String,

    /// Workflow state
    pub state: String,

    /// Title
    pub title: String,

    /// Area path
    pub area: String,

    /// Hierarchy parent, if any
    pub parent: Option<WorkItemId>,

    /// Canonical REST URL, used to resolve relation targets
    pub url: String,

    /// Browser URL of the item
    pub web_url: String,

    /// Description (HTML)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    /// Acceptance criteria (HTML)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub acceptance_criteria: Option<String>,

    /// Story point estimate
    #[serde(skip_serializing_if = "Option::is_none")]
    pub story_points: Option<f64>,

    /// Effort estimate
    #[serde(skip_serializing_if = "Option::is_none")]
    pub effort: Option<f64>,
}

/// A directed relation between two nodes of the same graph.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Edge {
    /// Source node id
    pub from: WorkItemId,

    /// Target node id
    pub to: WorkItemId,

    /// Relation label
    pub name: String,
}

/// Nodes and edges of one story map build.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Graph {
    /// Work items in fetch order
    pub nodes: Vec<Node>,

    /// Resolved relations
    pub edges: Vec<Edge>,
}

impl Graph {
    /// Returns `true` if the graph has no nodes.
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Looks up a node by id.
    pub fn node(&self, id: WorkItemId) -> Option<&Node> {
        self.nodes.iter().find(|node| node.id == id)
    }

    /// Groups of nodes that reach each other through edges.
    ///
    /// Each group is a strongly connected component with more than one node,
    /// or a single node with an edge to itself. Ids inside a group are sorted
    /// and groups are ordered by their smallest id.
    pub fn dependency_cycles(&self) -> Vec<Vec<WorkItemId>> {
        let mut graph: DiGraphMap<WorkItemId, ()> = DiGraphMap::new();
        for node in &self.nodes {
            graph.add_node(node.id);
        }
        for edge in &self.edges {
            graph.add_edge(edge.from, edge.to, ());
        }

        let mut cycles: Vec<Vec<WorkItemId>> = tarjan_scc(&graph)
            .into_iter()
            .filter(|component| {
                component.len() > 1
                    || component
                        .first()
                        .is_some_and(|&id| graph.contains_edge(id, id))
            })
            .map(|mut component| {
                component.sort_unstable();
                component
            })
            .collect();
        cycles.sort();
        cycles
    }
}
