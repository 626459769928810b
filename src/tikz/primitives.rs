//! Drawing primitives and their TikZ serialization.

use crate::geometry::format_ex;
use crate::types::{Anchor, Face};
use std::fmt;

/// Where a connector starts or ends.
#[derive(Debug, Clone, PartialEq)]
pub enum Endpoint {
    /// A raw grid coordinate
    Anchor(Anchor),
    /// A face of a named node, e.g. `annex_node_3.east`
    Face(String, Face),
    /// A synthesized node referenced by name
    Named(String),
}

impl fmt::Display for Endpoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Endpoint::Anchor(a) => write!(f, "{}", a),
            Endpoint::Face(node, face) => write!(f, "{}.{}", node, face),
            Endpoint::Named(name) => f.write_str(name),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LabelSide {
    Above,
    Below,
}

/// A text node placed along a connector.
#[derive(Debug, Clone, PartialEq)]
pub struct EdgeLabel {
    pub side: LabelSide,
    pub style: String,
    pub text: String,
}

impl fmt::Display for EdgeLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.side {
            LabelSide::Above => write!(f, "node[above,{}] {{{}}}", self.style, self.text),
            LabelSide::Below => write!(f, "node[below,{},align=center] {{{}}}", self.style, self.text),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Primitive {
    Comment(String),
    /// `\node[...] at (at) {text};`
    Node {
        options: Vec<String>,
        at: Anchor,
        text: String,
    },
    /// Zero-size node at the midpoint between two anchors
    HalfNode {
        name: String,
        above: Anchor,
        below: Anchor,
    },
    /// Directed arrow drawn with `to`, carrying optional labels
    Segment {
        style: String,
        /// Perpendicular offset in ex, used by compound requests
        offset: Option<f64>,
        extra_style: Option<String>,
        from: Endpoint,
        to: Endpoint,
        labels: Vec<EdgeLabel>,
    },
    /// Straight lifeline stroke
    Line {
        style: String,
        from: Endpoint,
        to: Endpoint,
    },
}

impl Primitive {
    pub fn is_segment(&self) -> bool {
        matches!(self, Primitive::Segment { .. })
    }
}

impl fmt::Display for Primitive {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Primitive::Comment(text) => write!(f, "% {}", text),
            Primitive::Node { options, at, text } => {
                write!(f, "\\node[{}] at ({}) {{{}}};", options.join(","), at, text)
            }
            Primitive::HalfNode { name, above, below } => write!(
                f,
                "\\node[inner sep=0] ({}) at ($({})!0.5!({})$) {{}};",
                name, above, below
            ),
            Primitive::Segment {
                style,
                offset,
                extra_style,
                from,
                to,
                labels,
            } => {
                let mut options = vec![style.clone()];
                if let Some(y) = offset {
                    options.push(format!("transform canvas={{yshift={}}}", format_ex(*y)));
                }
                if let Some(extra) = extra_style {
                    options.push(extra.clone());
                }
                write!(f, "\\draw[{}] ({}) to ", options.join(","), from)?;
                for label in labels {
                    write!(f, "{} ", label)?;
                }
                write!(f, "({});", to)
            }
            Primitive::Line { style, from, to } => {
                write!(f, "\\draw[{}] ({}) -- ({});", style, from, to)
            }
        }
    }
}

/// Primitives for one step, split so that every node can be emitted before
/// any connector references it.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct VectorDrawing {
    pub nodes: Vec<Primitive>,
    pub connectors: Vec<Primitive>,
}

impl VectorDrawing {
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty() && self.connectors.is_empty()
    }

    pub fn segments(&self) -> impl Iterator<Item = &Primitive> {
        self.connectors.iter().filter(|p| p.is_segment())
    }

    pub fn to_tikz(&self) -> String {
        self.nodes
            .iter()
            .chain(self.connectors.iter())
            .map(|p| p.to_string())
            .collect::<Vec<_>>()
            .join("\n")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_segment_with_offset_and_labels() {
        let seg = Primitive::Segment {
            style: "annex_http_request".to_string(),
            offset: Some(0.25),
            extra_style: Some("red".to_string()),
            from: Endpoint::Anchor(Anchor("a".to_string())),
            to: Endpoint::Face("n1".to_string(), Face::West),
            labels: vec![EdgeLabel {
                side: LabelSide::Above,
                style: "annex_request_text".to_string(),
                text: "GET".to_string(),
            }],
        };
        assert_eq!(
            seg.to_string(),
            r"\draw[annex_http_request,transform canvas={yshift=0.25ex},red] (a) to node[above,annex_request_text] {GET} (n1.west);"
        );
    }

    #[test]
    fn test_half_node() {
        let half = Primitive::HalfNode {
            name: "p-1-2-half".to_string(),
            above: Anchor("p-1-2".to_string()),
            below: Anchor("p-1-3".to_string()),
        };
        assert_eq!(
            half.to_string(),
            r"\node[inner sep=0] (p-1-2-half) at ($(p-1-2)!0.5!(p-1-3)$) {};"
        );
    }
}
