//! Application context for CLI command execution.
//!
//! [`App`] owns the tracker and the renderer for one run, and turns a
//! [`WorkItemSource`] into the bytes the command emits.
//!
//! # Example
//!
//! ```no_run
//! use storymap::app::App;
//! use storymap::output::OutputFormat;
//! use storymap::render::{DiagramOptions, GraphvizRenderer};
//! use storymap::resolver::WorkItemSource;
//! use storymap::tracker::ConnectionSettings;
//!
//! #[tokio::main(flavor = "current_thread")]
//! async fn main() -> anyhow::Result<()> {
//!     let settings = ConnectionSettings::new("https://dev.azure.com/contoso", "token");
//!     let app = App::connect(&settings, GraphvizRenderer::default())?;
//!     let graph = app.build(&WorkItemSource::Ids(vec![1, 2, 3])).await?;
//!     let svg = app
//!         .render(&graph, OutputFormat::Svg, &DiagramOptions::default())
//!         .await?;
//!     std::fs::write("storymap.svg", svg)?;
//!     Ok(())
//! }
//! ```

use crate::builder;
use crate::domain::Graph;
use crate::error::Result;
use crate::output::{OutputFormat, graph_to_json};
use crate::render::{DiagramOptions, GraphvizRenderer, to_diagram_source};
use crate::resolver::WorkItemSource;
use crate::tracker::{ConnectionSettings, WorkItemTracker, connect};

/// Application context for CLI operations.
pub struct App {
    /// The tracking backend (trait object for polymorphism)
    tracker: Box<dyn WorkItemTracker>,

    /// Layout engine for image formats
    renderer: GraphvizRenderer,
}

impl std::fmt::Debug for App {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("App")
            .field("renderer", &self.renderer)
            .field("tracker", &"<dyn WorkItemTracker>")
            .finish()
    }
}

impl App {
    /// Create an App from an existing tracker.
    pub fn new(tracker: Box<dyn WorkItemTracker>, renderer: GraphvizRenderer) -> Self {
        Self { tracker, renderer }
    }

    /// Create an App talking to Azure DevOps.
    ///
    /// # Errors
    ///
    /// Returns `Error::Config` if the connection settings are incomplete.
    pub fn connect(settings: &ConnectionSettings, renderer: GraphvizRenderer) -> Result<Self> {
        tracing::debug!(?settings, "Connecting to tracker");
        Ok(Self::new(connect(settings)?, renderer))
    }

    /// Get a reference to the tracker.
    pub fn tracker(&self) -> &dyn WorkItemTracker {
        self.tracker.as_ref()
    }

    /// Get a reference to the renderer.
    pub fn renderer(&self) -> &GraphvizRenderer {
        &self.renderer
    }

    /// Resolve `source` and build its graph.
    ///
    /// # Errors
    ///
    /// See [`builder::build`].
    pub async fn build(&self, source: &WorkItemSource) -> Result<Graph> {
        builder::build(self.tracker(), source).await
    }

    /// Produce the command output for `graph` in `format`.
    ///
    /// `dot` and `json` are produced in process; image formats go through
    /// the renderer.
    ///
    /// # Errors
    ///
    /// Returns renderer errors for image formats and `Error::Json` if the
    /// graph cannot be serialized.
    pub async fn render(
        &self,
        graph: &Graph,
        format: OutputFormat,
        options: &DiagramOptions,
    ) -> Result<Vec<u8>> {
        if format == OutputFormat::Json {
            return Ok(graph_to_json(graph)?.into_bytes());
        }

        let source = to_diagram_source(graph, options);
        match format.image_format() {
            Some(image) => self.renderer.render(&source, image).await,
            None => Ok(source.into_bytes()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{QueryResult, WorkItem, WorkItemReference};
    use crate::error::Error;
    use crate::render::Direction;
    use crate::tracker::InMemoryTracker;
    use serde_json::json;

    const BASE: &str = "https://dev.azure.com/contoso/_apis/wit/workItems";
    const QUERY: &str = "SELECT [System.Id] FROM WorkItems";

    fn item(id: u32, work_item_type: &str, relations: serde_json::Value) -> WorkItem {
        serde_json::from_value(json!({
            "id": id,
            "url": format!("{BASE}/{id}"),
            "fields": {
                "System.WorkItemType": work_item_type,
                "System.State": "New",
                "System.Title": format!("Item {id}"),
                "System.AreaPath": "Shop",
            },
            "relations": relations,
        }))
        .unwrap()
    }

    fn test_app(renderer: GraphvizRenderer) -> App {
        let tracker = InMemoryTracker::new()
            .with_query(
                QUERY,
                QueryResult::WorkItems {
                    work_items: Some(vec![
                        WorkItemReference::with_id(1),
                        WorkItemReference::with_id(2),
                    ]),
                },
            )
            .with_work_items([
                item(
                    1,
                    "Feature",
                    json!([{
                        "rel": "System.LinkTypes.Hierarchy-Forward",
                        "url": format!("{BASE}/2"),
                        "attributes": { "name": "Child" },
                    }]),
                ),
                item(2, "User Story", json!([])),
            ]);
        App::new(Box::new(tracker), renderer)
    }

    #[tokio::test]
    async fn test_build_from_query() {
        let app = test_app(GraphvizRenderer::default());
        let graph = app
            .build(&WorkItemSource::Query(QUERY.to_string()))
            .await
            .unwrap();
        assert_eq!(graph.nodes.len(), 2);
        assert_eq!(graph.edges.len(), 1);
    }

    #[tokio::test]
    async fn test_render_dot_does_not_need_graphviz() {
        let app = test_app(GraphvizRenderer::new("/nonexistent/dot"));
        let graph = app.build(&WorkItemSource::Ids(vec![1, 2])).await.unwrap();
        let options = DiagramOptions {
            direction: Direction::TopToBottom,
            ..DiagramOptions::default()
        };

        let bytes = app.render(&graph, OutputFormat::Dot, &options).await.unwrap();
        let dot = String::from_utf8(bytes).unwrap();
        assert!(dot.contains("rankdir=TB;"));
        assert!(dot.contains("1 -> 2 [xlabel=<Child>];"));
    }

    #[tokio::test]
    async fn test_render_json() {
        let app = test_app(GraphvizRenderer::default());
        let graph = app.build(&WorkItemSource::Ids(vec![2, 1])).await.unwrap();
        let bytes = app
            .render(&graph, OutputFormat::Json, &DiagramOptions::default())
            .await
            .unwrap();
        let value: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(value["nodes"].as_array().unwrap().len(), 2);
        assert_eq!(value["edges"][0]["name"], "Child");
    }

    #[tokio::test]
    async fn test_render_image_without_graphviz_fails() {
        let app = test_app(GraphvizRenderer::new("/nonexistent/dot"));
        let graph = app.build(&WorkItemSource::Ids(vec![1])).await.unwrap();
        let result = app
            .render(&graph, OutputFormat::Svg, &DiagramOptions::default())
            .await;
        assert!(matches!(result, Err(Error::RendererUnavailable { .. })));
    }

    #[test]
    fn test_connect_requires_token() {
        let settings = ConnectionSettings::new("https://dev.azure.com/contoso", "");
        let result = App::connect(&settings, GraphvizRenderer::default());
        assert!(matches!(result, Err(Error::Config(_))));
    }

    #[test]
    fn test_debug_hides_tracker() {
        let app = test_app(GraphvizRenderer::default());
        let debug = format!("{app:?}");
        assert!(debug.contains("<dyn WorkItemTracker>"));
        assert!(debug.contains("GraphvizRenderer"));
    }
}
