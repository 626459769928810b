//! Grid placement types

use crate::geometry::Height;
use serde::Serialize;

/// Where a block sits in the CSS grid. Rows are one-indexed and row 1 is the
/// header, so a step on `line` starts at row `line + 1`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GridPlacement {
    pub column_start: usize,
    /// Set for blocks spanning between two party columns
    #[serde(skip_serializing_if = "Option::is_none")]
    pub column_end: Option<usize>,
    pub row_start: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub row_span: Option<usize>,
}

impl GridPlacement {
    pub fn cell(column: usize, line: usize) -> Self {
        Self {
            column_start: column,
            column_end: None,
            row_start: line + 1,
            row_span: None,
        }
    }

    /// A one-row span between two columns given in either order.
    pub fn between(a: usize, b: usize, line: usize) -> Self {
        Self {
            column_start: a.min(b),
            column_end: Some(a.max(b)),
            row_start: line + 1,
            row_span: Some(1),
        }
    }

    pub fn css(&self) -> String {
        match self.column_end {
            Some(end) => format!(
                "grid-column: {} / {}; grid-row: {} / span {}",
                self.column_start,
                end,
                self.row_start,
                self.row_span.unwrap_or(1)
            ),
            None => format!(
                "grid-column-start: {}; grid-row-start: {};",
                self.column_start, self.row_start
            ),
        }
    }
}

/// A lifeline band spanning several rows of one column.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GridBand {
    pub class: String,
    pub column_start: usize,
    pub row_start: usize,
    pub row_end: usize,
}

impl GridBand {
    /// Band for a segment given in half-row units.
    pub fn from_half_rows(class: &str, column: usize, start: usize, end: usize) -> Self {
        Self {
            class: class.to_string(),
            column_start: column,
            row_start: start / 2 + 2,
            row_end: end / 2 + 1,
        }
    }

    pub fn css(&self) -> String {
        format!(
            "grid-column-start: {}; grid-row-start: {}; grid-row-end: {};",
            self.column_start, self.row_start, self.row_end
        )
    }
}

/// Everything the markup backend knows about one step.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MarkupBlock {
    #[serde(rename = "type")]
    pub step_type: String,
    pub html_rtl: bool,
    pub html_id: String,
    pub html_text: String,
    pub height: Height,
    pub placement: GridPlacement,
    pub bands: Vec<GridBand>,
}

impl MarkupBlock {
    pub fn class(&self) -> String {
        if self.html_rtl {
            format!("{} rtl", self.step_type)
        } else {
            self.step_type.clone()
        }
    }

    /// Reference markup for the block. Numbered steps of every type get their
    /// `step_id` span in front of the text, so actions and lifecycles read the
    /// same as requests; templates that want the bare label use `html_text`.
    pub fn to_html(&self) -> String {
        let content = if self.html_id.is_empty() {
            self.html_text.clone()
        } else {
            format!("{} {}", self.html_id, self.html_text)
        };
        let mut parts = vec![format!(
            r#"<div class="{}" style="{}">{}</div>"#,
            self.class(),
            self.placement.css(),
            content
        )];
        for band in &self.bands {
            parts.push(format!(r#"<div class="{}" style="{}"></div>"#, band.class, band.css()));
        }
        parts.join("\n")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_between_orders_columns() {
        assert_eq!(GridPlacement::between(4, 2, 3), GridPlacement::between(2, 4, 3));
        assert_eq!(GridPlacement::between(4, 2, 3).css(), "grid-column: 2 / 4; grid-row: 4 / span 1");
    }

    #[test]
    fn test_band_rows() {
        let band = GridBand::from_half_rows("lifeline", 3, 5, 10);
        assert_eq!(band.row_start, 4);
        assert_eq!(band.row_end, 6);
    }
}
