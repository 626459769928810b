//! Markup backend - CSS grid placement for each step.
//!
//! Blocks are plain data; a template engine can read them through
//! [`template_context`], or [`MarkupBlock::to_html`] produces the reference
//! markup directly. Text is inserted verbatim, escaping happens upstream.

mod grid;

pub use grid::{GridBand, GridPlacement, MarkupBlock};

use crate::error::Result;
use crate::steps::ProtocolStep;
use serde_json::Value;

/// Render the markup of a whole step list, one block per line.
pub fn render_html<S: ProtocolStep>(steps: &[S]) -> String {
    steps
        .iter()
        .filter_map(|step| step.layout_markup())
        .map(|block| block.to_html())
        .collect::<Vec<_>>()
        .join("\n")
}

/// The fields a template may read for one step, or `null` for steps without
/// markup.
pub fn template_context<S: ProtocolStep + ?Sized>(step: &S) -> Result<Value> {
    match step.layout_markup() {
        Some(block) => Ok(serde_json::to_value(block)?),
        None => Ok(Value::Null),
    }
}
