//! Storymap - story map diagrams from Azure DevOps work items.
//!
//! A story map is a diagram of work items joined by their successor and
//! parent/child links. Building one is a short pipeline:
//!
//! 1. [`resolver`] turns a WIQL query, an id list or a CSV export into ids
//! 2. a [`tracker::WorkItemTracker`] fetches the records with relations
//! 3. [`builder`] projects them into a [`domain::Graph`], keeping only links
//!    between fetched items
//! 4. [`render`] serializes the graph to DOT and pipes it through Graphviz
//!
//! ```no_run
//! use storymap::render::{DiagramOptions, to_diagram_source};
//! use storymap::resolver::WorkItemSource;
//! use storymap::tracker::{ConnectionSettings, connect};
//!
//! # async fn run() -> storymap::error::Result<()> {
//! let settings = ConnectionSettings::new("https://dev.azure.com/contoso", "token");
//! let tracker = connect(&settings)?;
//! let graph = storymap::build(tracker.as_ref(), &WorkItemSource::Ids(vec![1, 2])).await?;
//! println!("{}", to_diagram_source(&graph, &DiagramOptions::default()));
//! # Ok(())
//! # }
//! ```

#![forbid(unsafe_code)]

pub mod app;
pub mod builder;
pub mod cli;
pub mod config;
pub mod domain;
pub mod error;
pub mod output;
pub mod render;
pub mod resolver;
pub mod tracker;

pub use builder::{assemble_graph, build, build_graph};
pub use domain::{Edge, Graph, Node, WorkItemId};
pub use error::{Error, Result};
pub use render::{GraphvizRenderer, to_diagram_source};
pub use resolver::{WorkItemSource, resolve_ids};
