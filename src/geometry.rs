//! Vertical extent and label alignment rules.
//!
//! A step's height is its reserved extent plus an anchor token telling the
//! drawing backend which edge of that extent the row midline is pinned to.

use crate::config::GeometryConfig;
use serde::{Serialize, Serializer};
use std::fmt;

/// Literal TeX line break separating label lines.
pub const LINE_BREAK: &str = "\\\\";

/// Number of lines in a label. An empty label still counts as one line.
pub fn line_count(text: &str) -> usize {
    text.split(LINE_BREAK).count()
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Alignment {
    Center,
    /// Center with an additional vertical shift
    CenterShifted(f64),
    North(f64),
    South(f64),
}

impl fmt::Display for Alignment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Alignment::Center => f.write_str("center"),
            Alignment::CenterShifted(y) => write!(f, "center,yshift={}", format_ex(*y)),
            Alignment::North(y) => write!(f, "north,yshift={}", format_ex(*y)),
            Alignment::South(y) => write!(f, "south,yshift={}", format_ex(*y)),
        }
    }
}

impl Serialize for Alignment {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Height {
    pub extent_ex: f64,
    pub alignment: Alignment,
}

impl Height {
    pub fn centered(extent_ex: f64) -> Self {
        Self {
            extent_ex,
            alignment: Alignment::Center,
        }
    }

    /// Extent as a TeX dimension, e.g. `4ex`
    pub fn extent(&self) -> String {
        format_ex(self.extent_ex)
    }
}

impl fmt::Display for Height {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}, {}", self.extent(), self.alignment)
    }
}

/// Format a value in ex, dropping a zero fraction (`4ex`, `0.25ex`).
pub fn format_ex(value: f64) -> String {
    if value.fract() == 0.0 {
        format!("{}ex", value as i64)
    } else {
        let s = format!("{}", value);
        format!("{}ex", s.trim_end_matches('0').trim_end_matches('.'))
    }
}

/// Height of a request row given which sides carry a label.
pub fn request_height(
    has_above: bool,
    has_below: bool,
    lines_below: usize,
    config: &GeometryConfig,
) -> Height {
    let below = config.line_below * lines_below as f64;
    match (has_above, has_below) {
        (true, true) => Height {
            extent_ex: config.request_both + below,
            alignment: Alignment::North(config.both_shift),
        },
        (true, false) => Height {
            extent_ex: config.request_above,
            alignment: Alignment::South(config.above_shift),
        },
        (false, true) => Height {
            extent_ex: config.request_below + below,
            alignment: Alignment::North(config.below_shift),
        },
        (false, false) => Height::centered(config.request_bare),
    }
}

pub fn action_height(label: &str, config: &GeometryConfig) -> Height {
    Height::centered(config.action_base + config.action_line * line_count(label) as f64)
}

pub fn window_height(config: &GeometryConfig) -> Height {
    Height {
        extent_ex: config.window,
        alignment: Alignment::CenterShifted(config.window_shift),
    }
}
