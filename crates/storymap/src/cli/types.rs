//! CLI value enums and domain type conversions.

use clap::ValueEnum;

use crate::output::OutputFormat;
use crate::render::{Direction, Splines};

/// Output format for CLI arguments
#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormatArg {
    /// SVG image (requires Graphviz)
    Svg,
    /// PNG image (requires Graphviz)
    Png,
    /// Graphviz DOT source
    Dot,
    /// Graph as JSON
    Json,
}

impl std::fmt::Display for FormatArg {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Svg => write!(f, "svg"),
            Self::Png => write!(f, "png"),
            Self::Dot => write!(f, "dot"),
            Self::Json => write!(f, "json"),
        }
    }
}

impl From<FormatArg> for OutputFormat {
    fn from(arg: FormatArg) -> Self {
        match arg {
            FormatArg::Svg => OutputFormat::Svg,
            FormatArg::Png => OutputFormat::Png,
            FormatArg::Dot => OutputFormat::Dot,
            FormatArg::Json => OutputFormat::Json,
        }
    }
}

/// Layout direction for CLI arguments
#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum DirectionArg {
    /// Left to right
    Lr,
    /// Top to bottom
    Tb,
}

impl std::fmt::Display for DirectionArg {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Lr => write!(f, "lr"),
            Self::Tb => write!(f, "tb"),
        }
    }
}

impl From<DirectionArg> for Direction {
    fn from(arg: DirectionArg) -> Self {
        match arg {
            DirectionArg::Lr => Direction::LeftToRight,
            DirectionArg::Tb => Direction::TopToBottom,
        }
    }
}

/// Edge drawing mode for CLI arguments
#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum SplinesArg {
    /// Axis-aligned segments
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

impl std::fmt::Display for SplinesArg {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        Splines::from(*self).fmt(f)
    }
}

impl From<SplinesArg> for Splines {
    fn from(arg: SplinesArg) -> Self {
        match arg {
            SplinesArg::Ortho => Splines::Ortho,
            SplinesArg::Polyline => Splines::Polyline,
            SplinesArg::Line => Splines::Line,
            SplinesArg::Spline => Splines::Spline,
            SplinesArg::Curved => Splines::Curved,
        }
    }
}
