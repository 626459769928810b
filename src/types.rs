//! Shared types: parties, anchors and the coordinate resolver seam.

use serde::{Deserialize, Serialize};
use std::fmt;

/// A diagram participant. Column assignment happens upstream; steps only
/// reference parties.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Party {
    pub name: String,
    /// Integer column used by the vector backend
    pub column: usize,
    /// Grid column used by the markup backend
    pub annexid: usize,
    /// Extra TikZ style applied to the party's lifecycle box
    #[serde(default)]
    pub style: String,
}

impl Party {
    pub fn new(name: impl Into<String>, column: usize, annexid: usize) -> Self {
        Self {
            name: name.into(),
            column,
            annexid,
            style: String::new(),
        }
    }

    pub fn with_style(mut self, style: impl Into<String>) -> Self {
        self.style = style.into();
        self
    }
}

/// An opaque resolved position, printed verbatim into TikZ coordinates.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Anchor(pub String);

impl Anchor {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Anchor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Maps a `(column, line)` pair to an anchor. Supplied by the layout pass and
/// never mutated by steps.
pub trait CoordinateResolver {
    fn resolve(&self, column: usize, line: usize) -> Anchor;
}

impl<F> CoordinateResolver for F
where
    F: Fn(usize, usize) -> Anchor,
{
    fn resolve(&self, column: usize, line: usize) -> Anchor {
        self(column, line)
    }
}

/// Resolver naming each grid point `<prefix>-<column>-<line>`.
#[derive(Debug, Clone)]
pub struct GridResolver {
    pub prefix: String,
}

impl Default for GridResolver {
    fn default() -> Self {
        Self {
            prefix: "pos".to_string(),
        }
    }
}

impl CoordinateResolver for GridResolver {
    fn resolve(&self, column: usize, line: usize) -> Anchor {
        Anchor(format!("{}-{}-{}", self.prefix, column, line))
    }
}

/// A vertical lifeline band, in half-row units: row `n` is `2n`, the
/// midpoint between rows `n` and `n + 1` is `2n + 1`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LifelineSegment {
    pub start: usize,
    pub end: usize,
    pub style: String,
}

impl LifelineSegment {
    pub fn new(start: usize, end: usize, style: impl Into<String>) -> Self {
        Self {
            start,
            end,
            style: style.into(),
        }
    }
}

/// Which face of a named node a connector attaches to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Face {
    East,
    West,
}

impl Face {
    pub fn as_str(self) -> &'static str {
        match self {
            Face::East => "east",
            Face::West => "west",
        }
    }
}

impl fmt::Display for Face {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
