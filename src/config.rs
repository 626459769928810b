//! Geometry tuning constants.
//!
//! All values are in TeX `ex` units. They are visual tuning values; any
//! subset can be overridden from JSON, the rest keep their defaults.

use crate::error::Result;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GeometryConfig {
    /// Request without any label. Default: 1
    pub request_bare: f64,
    /// Request with text above only. Default: 4
    pub request_above: f64,
    /// Base extent of a request with text below only. Default: 2
    pub request_below: f64,
    /// Base extent of a request with text on both sides. Default: 4
    pub request_both: f64,
    /// Added per line of text below the midline. Default: 2
    pub line_below: f64,
    /// Anchor shift for above-only labels. Default: -1
    pub above_shift: f64,
    /// Anchor shift for below-only labels. Default: 1
    pub below_shift: f64,
    /// Anchor shift when labels sit on both sides. Default: 3
    pub both_shift: f64,
    /// Action base extent. Default: 1
    pub action_base: f64,
    /// Added per action label line. Default: 2
    pub action_line: f64,
    /// Script action extent. Default: 4
    pub script_action: f64,
    /// Start/end party extent. Default: 5
    pub lifecycle: f64,
    /// Open/close window extent. Default: 6
    pub window: f64,
    /// Open/close window anchor shift. Default: 1
    pub window_shift: f64,
    /// Perpendicular offset of each arrow in a compound request. Default: 0.25
    pub compound_offset: f64,
}

impl Default for GeometryConfig {
    fn default() -> Self {
        Self {
            request_bare: 1.0,
            request_above: 4.0,
            request_below: 2.0,
            request_both: 4.0,
            line_below: 2.0,
            above_shift: -1.0,
            below_shift: 1.0,
            both_shift: 3.0,
            action_base: 1.0,
            action_line: 2.0,
            script_action: 4.0,
            lifecycle: 5.0,
            window: 6.0,
            window_shift: 1.0,
            compound_offset: 0.25,
        }
    }
}

impl GeometryConfig {
    /// Parse a (possibly partial) JSON object of overrides.
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partial_override() {
        let config = GeometryConfig::from_json(r#"{ "lifecycle": 7, "compound_offset": 0.5 }"#).unwrap();
        assert_eq!(config.lifecycle, 7.0);
        assert_eq!(config.compound_offset, 0.5);
        assert_eq!(config.request_above, 4.0);
    }

    #[test]
    fn test_invalid_json() {
        assert!(GeometryConfig::from_json("{ lifecycle: }").is_err());
    }
}
