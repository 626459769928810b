//! TikZ backend - turns steps into `\node` / `\draw` instructions.
//!
//! Pure string building over primitives produced by each step.
//! Nodes of all steps come first so connectors can reference node names.

mod contour;
mod primitives;

pub use contour::{contour, escape_tex};
pub use primitives::{EdgeLabel, Endpoint, LabelSide, Primitive, VectorDrawing};

use crate::steps::ProtocolStep;
use crate::types::CoordinateResolver;

/// Draw a whole step list.
pub fn render_tikz<S: ProtocolStep>(steps: &[S], resolver: &dyn CoordinateResolver) -> String {
    let drawings: Vec<VectorDrawing> = steps
        .iter()
        .map(|step| {
            let drawing = step.draw_vector(resolver);
            tracing::debug!(
                step_type = step.step_type(),
                line = step.header().line,
                nodes = drawing.nodes.len(),
                connectors = drawing.connectors.len(),
                "drew step"
            );
            drawing
        })
        .collect();

    let mut out: Vec<String> = Vec::new();
    for drawing in &drawings {
        out.extend(drawing.nodes.iter().map(|p| p.to_string()));
    }
    for drawing in &drawings {
        out.extend(drawing.connectors.iter().map(|p| p.to_string()));
    }
    out.join("\n")
}
