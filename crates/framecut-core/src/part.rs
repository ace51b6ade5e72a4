//! Part identity and ordering
//!
//! Beam identity is stable across geometry rebuilds; the geometry itself is
//! recomputed wholesale. Imported reference models may also carry sub-meshes
//! that do not map to a beam; those keep their native name.

use crate::error::FrameError;
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;

/// One of the four structural members of a rectangular frame
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum BeamName {
    Top,
    Bottom,
    Left,
    Right,
}

/// Beam orientation in the frame plane
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Orientation {
    /// Spans the frame width along X (TOP, BOTTOM)
    Horizontal,
    /// Spans the frame height along Y (LEFT, RIGHT)
    Vertical,
}

impl BeamName {
    /// All beams in construction order (TOP, BOTTOM, LEFT, RIGHT)
    pub const ALL: [BeamName; 4] = [
        BeamName::Top,
        BeamName::Bottom,
        BeamName::Left,
        BeamName::Right,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Top => "TOP",
            Self::Bottom => "BOTTOM",
            Self::Left => "LEFT",
            Self::Right => "RIGHT",
        }
    }

    pub fn orientation(&self) -> Orientation {
        match self {
            Self::Top | Self::Bottom => Orientation::Horizontal,
            Self::Left | Self::Right => Orientation::Vertical,
        }
    }

    /// Fixed display/export priority: TOP=1, LEFT=2, BOTTOM=3, RIGHT=4
    pub fn priority(&self) -> u8 {
        match self {
            Self::Top => 1,
            Self::Left => 2,
            Self::Bottom => 3,
            Self::Right => 4,
        }
    }
}

impl fmt::Display for BeamName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for BeamName {
    type Err = FrameError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "TOP" => Ok(Self::Top),
            "BOTTOM" => Ok(Self::Bottom),
            "LEFT" => Ok(Self::Left),
            "RIGHT" => Ok(Self::Right),
            _ => Err(FrameError::UnknownPart(s.to_string())),
        }
    }
}

/// Stable identity of a pickable part
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PartId {
    /// A frame beam (procedural, or an imported sub-mesh mapped to a beam)
    Beam(BeamName),
    /// An imported sub-mesh whose name has no beam mapping
    Named(String),
}

impl PartId {
    /// Resolve a part name, falling back to [`PartId::Named`]
    pub fn parse(name: &str) -> Self {
        match name.parse::<BeamName>() {
            Ok(beam) => Self::Beam(beam),
            Err(_) => Self::Named(name.to_string()),
        }
    }

    pub fn beam(&self) -> Option<BeamName> {
        match self {
            Self::Beam(beam) => Some(*beam),
            Self::Named(_) => None,
        }
    }
}

impl From<BeamName> for PartId {
    fn from(beam: BeamName) -> Self {
        Self::Beam(beam)
    }
}

impl fmt::Display for PartId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Beam(beam) => write!(f, "{}", beam),
            Self::Named(name) => f.write_str(name),
        }
    }
}

/// Fixed-priority ordering of parts for the parts list and batch export.
///
/// Beams sort by [`BeamName::priority`]; unmapped parts follow, by name.
/// The result never depends on the order parts were discovered in.
#[derive(Debug, Clone, Copy, Default)]
pub struct PartOrdering;

impl PartOrdering {
    pub fn compare(a: &PartId, b: &PartId) -> Ordering {
        match (a, b) {
            (PartId::Beam(x), PartId::Beam(y)) => x.priority().cmp(&y.priority()),
            (PartId::Beam(_), PartId::Named(_)) => Ordering::Less,
            (PartId::Named(_), PartId::Beam(_)) => Ordering::Greater,
            (PartId::Named(x), PartId::Named(y)) => x.cmp(y),
        }
    }

    /// Return the parts sorted by priority
    pub fn ordered(parts: &[PartId]) -> Vec<PartId> {
        let mut sorted = parts.to_vec();
        sorted.sort_by(Self::compare);
        sorted
    }

    /// The four beams in priority order: TOP, LEFT, BOTTOM, RIGHT
    pub fn beams() -> [BeamName; 4] {
        [
            BeamName::Top,
            BeamName::Left,
            BeamName::Bottom,
            BeamName::Right,
        ]
    }
}
