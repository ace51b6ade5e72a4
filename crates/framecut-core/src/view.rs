//! View and gizmo modes shared by the scene, the settings file and events.

use serde::{Deserialize, Serialize};
use std::fmt;

/// How parts are drawn; applied uniformly to every part
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ViewMode {
    #[default]
    Solid,
    Wireframe,
    Vertices,
    Mixed,
}

impl fmt::Display for ViewMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Solid => write!(f, "solid"),
            Self::Wireframe => write!(f, "wireframe"),
            Self::Vertices => write!(f, "vertices"),
            Self::Mixed => write!(f, "mixed"),
        }
    }
}

/// Transform gizmo mode; the gizmo drives the whole assembly group
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GizmoMode {
    Translate,
    Rotate,
    Scale,
    #[default]
    None,
}

impl fmt::Display for GizmoMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Translate => write!(f, "translate"),
            Self::Rotate => write!(f, "rotate"),
            Self::Scale => write!(f, "scale"),
            Self::None => write!(f, "none"),
        }
    }
}
