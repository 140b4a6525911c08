//! Diagram rendering.
//!
//! A [`Graph`](crate::domain::Graph) is first serialized to Graphviz DOT
//! source by [`to_diagram_source`]. Turning that source into an image is left
//! to the Graphviz `dot` engine, driven by [`GraphvizRenderer`]; no layout is
//! computed here.

mod dot;
mod graphviz;

pub use dot::{
    DEFAULT_STATE_COLOR, DEFAULT_TYPE_COLOR, STATUS_GLYPH, escape_markup, state_color,
    to_diagram_source, type_color,
};
pub use graphviz::{DEFAULT_DOT_BINARY, GraphvizRenderer};

use serde::{Deserialize, Serialize};
use std::fmt;

/// Layout orientation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Direction {
    /// Ranks flow left to right
    #[default]
    #[serde(rename = "lr")]
    LeftToRight,

    /// Ranks flow top to bottom
    #[serde(rename = "tb")]
    TopToBottom,
}

impl Direction {
    /// Value of the `rankdir` graph attribute.
    pub fn rankdir(self) -> &'static str {
        match self {
            Self::LeftToRight => "LR",
            Self::TopToBottom => "TB",
        }
    }
}

/// How edges are drawn.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Splines {
    /// Axis-aligned segments
    #[default]
    Ortho,
    /// Polylines
    Polyline,
    /// Straight lines
    Line,
    /// Splines
    Spline,
    /// Curved arcs
    Curved,
}

impl Splines {
    /// Value of the `splines` graph attribute.
    pub fn as_attribute(self) -> &'static str {
        match self {
            Self::Ortho => "ortho",
            Self::Polyline => "polyline",
            Self::Line => "line",
            Self::Spline => "spline",
            Self::Curved => "curved",
        }
    }
}

impl fmt::Display for Splines {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_attribute())
    }
}

/// Image formats the layout engine is asked to produce.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImageFormat {
    /// Scalable vector graphics
    Svg,
    /// Portable network graphics
    Png,
}

impl ImageFormat {
    /// Graphviz output format name (`-T` argument).
    pub fn graphviz_name(self) -> &'static str {
        match self {
            Self::Svg => "svg",
            Self::Png => "png",
        }
    }
}

/// Options applied when serializing a graph.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct DiagramOptions {
    /// Layout orientation
    pub direction: Direction,

    /// Edge drawing mode
    pub splines: Splines,
}
