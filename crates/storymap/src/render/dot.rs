//! Graphviz DOT serialization.
//!
//! Nodes are drawn as HTML-like table labels: a marker strip colored by work
//! item type, the id and title, and the state behind a status glyph colored by
//! state. Colors come from fixed tables; anything not in a table gets the
//! neutral default.

use super::{DiagramOptions, Splines};
use crate::domain::{Edge, Graph, Node};
use std::fmt;

/// Marker color for work item types not in the table.
pub const DEFAULT_TYPE_COLOR: &str = "#C0C0C0";

/// Status color for states not in the table.
pub const DEFAULT_STATE_COLOR: &str = "#C0C0C0";

/// Glyph drawn in front of the state.
pub const STATUS_GLYPH: &str = "\u{25CF}";

const FONT: &str = "Helvetica";

/// Marker color for a work item type.
pub fn type_color(work_item_type: &str) -> &'static str {
    match work_item_type {
        "Epic" => "#FF7B00",
        "Feature" => "#773B93",
        "User Story" | "Product Backlog Item" | "Requirement" => "#009CCC",
        "Task" => "#F2CB1D",
        "Bug" => "#CC293D",
        "Issue" | "Impediment" => "#B4009E",
        "Test Case" => "#004B50",
        _ => DEFAULT_TYPE_COLOR,
    }
}

/// Status glyph color for a workflow state.
pub fn state_color(state: &str) -> &'static str {
    match state {
        "New" | "To Do" | "Proposed" | "Approved" => "#B2B2B2",
        "Active" | "In Progress" | "Committed" | "Doing" => "#007ACC",
        "Resolved" => "#FF9D00",
        "Closed" | "Done" | "Completed" => "#339933",
        "Removed" => "#E0E0E0",
        _ => DEFAULT_STATE_COLOR,
    }
}

/// Escape the five markup characters for embedding in a label.
///
/// Control characters other than tab and line breaks are dropped; they are
/// not legal in Graphviz's XML-like labels.
pub fn escape_markup(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '\'' => escaped.push_str("&#39;"),
            '"' => escaped.push_str("&quot;"),
            '\t' | '\n' | '\r' => escaped.push(c),
            c if c < ' ' => {}
            c => escaped.push(c),
        }
    }
    escaped
}

/// Escape text for a double-quoted attribute value.
fn escape_attribute(text: &str) -> String {
    escape_markup(text).replace('\\', "\\\\")
}

/// Serialize a graph to DOT source.
pub fn to_diagram_source(graph: &Graph, options: &DiagramOptions) -> String {
    Diagram { graph, options }.to_string()
}

struct Diagram<'a> {
    graph: &'a Graph,
    options: &'a DiagramOptions,
}

impl fmt::Display for Diagram<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "digraph storymap {{")?;
        writeln!(f, "    rankdir={};", self.options.direction.rankdir())?;
        writeln!(f, "    splines={};", self.options.splines)?;
        writeln!(f, "    nodesep=0.4;")?;
        writeln!(f, "    ranksep=0.8;")?;
        writeln!(
            f,
            "    node [shape=plain, fontname=\"{FONT}\", fontsize=10];"
        )?;
        writeln!(
            f,
            "    edge [fontname=\"{FONT}\", fontsize=9, color=\"#666666\"];"
        )?;

        if !self.graph.nodes.is_empty() {
            writeln!(f)?;
        }
        for node in &self.graph.nodes {
            write_node(f, node)?;
        }

        if !self.graph.edges.is_empty() {
            writeln!(f)?;
        }
        for edge in &self.graph.edges {
            write_edge(f, edge, self.options.splines)?;
        }

        writeln!(f, "}}")
    }
}

fn write_node(f: &mut fmt::Formatter<'_>, node: &Node) -> fmt::Result {
    let tooltip = format!("{} {}: {}", node.work_item_type, node.id, node.title);
    writeln!(
        f,
        "    {id} [label=<<table border=\"0\" cellborder=\"1\" cellspacing=\"0\" cellpadding=\"4\">\
<tr><td bgcolor=\"{marker}\" width=\"6\" rowspan=\"2\"></td>\
<td align=\"left\"><b>{id}</b> {title}</td></tr>\
<tr><td align=\"left\"><font color=\"{status}\">{STATUS_GLYPH}</font> {state}</td></tr>\
</table>>, URL=\"{url}\", tooltip=\"{tooltip}\"];",
        id = node.id,
        marker = type_color(&node.work_item_type),
        title = escape_markup(&node.title),
        status = state_color(&node.state),
        state = escape_markup(&node.state),
        url = escape_attribute(&node.web_url),
        tooltip = escape_attribute(&tooltip),
    )
}

fn write_edge(f: &mut fmt::Formatter<'_>, edge: &Edge, splines: Splines) -> fmt::Result {
    // Orthogonal routing cannot place regular edge labels.
    let label = match splines {
        Splines::Ortho => "xlabel",
        _ => "label",
    };
    writeln!(
        f,
        "    {} -> {} [{label}=<{}>];",
        edge.from,
        edge.to,
        escape_markup(&edge.name)
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::render::Direction;
    use rstest::rstest;

    fn node(id: u32, work_item_type: &str, state: &str, title: &str) -> Node {
        Node {
            id,
            work_item_type: work_item_type.to_string(),
            state: state.to_string(),
            title: title.to_string(),
            area: "Shop".to_string(),
            parent: None,
            url: format!("https://dev.azure.com/contoso/_apis/wit/workItems/{id}"),
            web_url: format!("https://dev.azure.com/contoso/_workitems/edit/{id}"),
            description: None,
            acceptance_criteria: None,
            story_points: None,
            effort: None,
        }
    }

    fn sample_graph() -> Graph {
        Graph {
            nodes: vec![
                node(1, "Epic", "Active", "Checkout"),
                node(2, "User Story", "New", "Pay by card"),
            ],
            edges: vec![Edge {
                from: 1,
                to: 2,
                name: "Child".to_string(),
            }],
        }
    }

    #[rstest]
    #[case::epic("Epic", "#FF7B00")]
    #[case::feature("Feature", "#773B93")]
    #[case::story("User Story", "#009CCC")]
    #[case::pbi("Product Backlog Item", "#009CCC")]
    #[case::task("Task", "#F2CB1D")]
    #[case::bug("Bug", "#CC293D")]
    #[case::unknown("Risk", DEFAULT_TYPE_COLOR)]
    #[case::empty("", DEFAULT_TYPE_COLOR)]
    #[case::wrong_case("epic", DEFAULT_TYPE_COLOR)]
    fn test_type_color(#[case] work_item_type: &str, #[case] expected: &str) {
        assert_eq!(type_color(work_item_type), expected);
    }

    #[rstest]
    #[case::new("New", "#B2B2B2")]
    #[case::active("Active", "#007ACC")]
    #[case::resolved("Resolved", "#FF9D00")]
    #[case::closed("Closed", "#339933")]
    #[case::doing("Doing", "#007ACC")]
    #[case::done("Done", "#339933")]
    #[case::unknown("Waiting for Review", DEFAULT_STATE_COLOR)]
    fn test_state_color(#[case] state: &str, #[case] expected: &str) {
        assert_eq!(state_color(state), expected);
    }

    #[test]
    fn test_escape_markup_covers_reserved_characters() {
        assert_eq!(
            escape_markup(r#"<b>"Tom" & 'Jerry'</b>"#),
            "&lt;b&gt;&quot;Tom&quot; &amp; &#39;Jerry&#39;&lt;/b&gt;"
        );
        assert_eq!(escape_markup("plain text"), "plain text");
    }

    #[test]
    fn test_escape_markup_drops_control_characters() {
        assert_eq!(escape_markup("a\u{1}b\u{1f}c\u{0}"), "abc");
        assert_eq!(escape_markup("tab\there"), "tab\there");
    }

    #[test]
    fn test_control_characters_never_reach_labels() {
        let graph = Graph {
            nodes: vec![node(5, "Task", "New", "Bell\u{7}and\u{1}start")],
            edges: vec![],
        };
        let dot = to_diagram_source(&graph, &DiagramOptions::default());
        assert!(dot.contains("<b>5</b> Bellandstart</td>"));
        assert!(!dot.chars().any(|c| c.is_ascii_control() && c != '\n'));
    }

    #[test]
    fn test_header_uses_direction_and_splines() {
        let options = DiagramOptions {
            direction: Direction::TopToBottom,
            splines: Splines::Curved,
        };
        let dot = to_diagram_source(&Graph::default(), &options);
        assert!(dot.starts_with("digraph storymap {\n"));
        assert!(dot.contains("rankdir=TB;"));
        assert!(dot.contains("splines=curved;"));
        assert!(dot.trim_end().ends_with('}'));

        let dot = to_diagram_source(&Graph::default(), &DiagramOptions::default());
        assert!(dot.contains("rankdir=LR;"));
        assert!(dot.contains("splines=ortho;"));
    }

    #[test]
    fn test_nodes_carry_colors_and_text() {
        let dot = to_diagram_source(&sample_graph(), &DiagramOptions::default());
        assert!(dot.contains("    1 [label=<"));
        assert!(dot.contains("bgcolor=\"#FF7B00\""));
        assert!(dot.contains("<b>1</b> Checkout"));
        assert!(dot.contains(&format!("<font color=\"#007ACC\">{STATUS_GLYPH}</font> Active")));
        assert!(dot.contains("bgcolor=\"#009CCC\""));
        assert!(dot.contains("URL=\"https://dev.azure.com/contoso/_workitems/edit/2\""));
    }

    #[test]
    fn test_unknown_categories_use_default_colors() {
        let graph = Graph {
            nodes: vec![node(3, "Risk", "Parked", "Vendor delay")],
            edges: vec![],
        };
        let dot = to_diagram_source(&graph, &DiagramOptions::default());
        assert!(dot.contains(&format!("bgcolor=\"{DEFAULT_TYPE_COLOR}\"")));
        assert!(dot.contains(&format!("<font color=\"{DEFAULT_STATE_COLOR}\">")));
    }

    #[test]
    fn test_edges_are_labeled_connectors() {
        let dot = to_diagram_source(&sample_graph(), &DiagramOptions::default());
        assert!(dot.contains("    1 -> 2 [xlabel=<Child>];"));

        let options = DiagramOptions {
            splines: Splines::Spline,
            ..DiagramOptions::default()
        };
        let dot = to_diagram_source(&sample_graph(), &options);
        assert!(dot.contains("    1 -> 2 [label=<Child>];"));
    }

    #[test]
    fn test_title_markup_is_escaped() {
        let title = r#"<img src=x> & "quoted" 'single'"#;
        let graph = Graph {
            nodes: vec![node(9, "Task", "New", title)],
            edges: vec![],
        };
        let dot = to_diagram_source(&graph, &DiagramOptions::default());

        assert!(!dot.contains(title));
        assert!(!dot.contains("<img"));
        assert!(dot.contains(
            "<b>9</b> &lt;img src=x&gt; &amp; &quot;quoted&quot; &#39;single&#39;</td>"
        ));
        assert!(dot.contains(
            "tooltip=\"Task 9: &lt;img src=x&gt; &amp; &quot;quoted&quot; &#39;single&#39;\""
        ));
    }

    #[test]
    fn test_edge_label_is_escaped() {
        let mut graph = sample_graph();
        graph.edges[0].name = "A<B".to_string();
        let dot = to_diagram_source(&graph, &DiagramOptions::default());
        assert!(dot.contains("[xlabel=<A&lt;B>];"));
    }
}
