//! Event type definitions for the editor event bus.
//!
//! Events are cloneable and serializable so they can be logged or replayed.

use serde::{Deserialize, Serialize};

use crate::frame::FrameParameters;
use crate::part::PartId;
use crate::view::{GizmoMode, ViewMode};

/// Root event enum for all editor events
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum EditorEvent {
    /// The current part set was torn down and rebuilt
    PartsRebuilt {
        /// Monotonic scene generation counter.
        generation: u64,
        /// Parts in discovery order.
        parts: Vec<PartId>,
        /// Parts in fixed priority order (TOP, LEFT, BOTTOM, RIGHT, then unmapped).
        ordered: Vec<PartId>,
        /// Whether the parts came from the procedural builder.
        procedural: bool,
    },
    /// The selected part changed
    SelectionChanged {
        /// Previously selected part, if any.
        previous: Option<PartId>,
        /// Newly selected part, if any.
        current: Option<PartId>,
    },
    /// View mode switched
    ViewModeChanged(ViewMode),
    /// Gizmo mode switched
    GizmoModeChanged(GizmoMode),
    /// Draft parameters were persisted and applied
    ParametersConfirmed(FrameParameters),
    /// Draft parameters could not be confirmed
    ConfirmFailed {
        /// Human readable reason.
        reason: String,
    },
    /// Reference asset loading status
    Asset(AssetEvent),
    /// An export artifact was produced
    ExportCompleted {
        /// File name of the artifact.
        file_name: String,
    },
    /// An export was refused
    ExportRefused {
        /// Human readable reason.
        reason: String,
    },
}

/// Reference asset loading status
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum AssetEvent {
    /// Fetch started
    Loading { url: String },
    /// Asset loaded and applied
    Loaded { url: String, parts: usize },
    /// Fetch or decode failed; procedural geometry stays in place
    Failed { url: String, error: String },
    /// A stale fetch resolved after newer state and was dropped
    Discarded { url: String },
}

impl EditorEvent {
    /// Get the category of this event
    pub fn category(&self) -> EventCategory {
        match self {
            EditorEvent::PartsRebuilt { .. } => EventCategory::Geometry,
            EditorEvent::SelectionChanged { .. } => EventCategory::Selection,
            EditorEvent::ViewModeChanged(_) | EditorEvent::GizmoModeChanged(_) => {
                EventCategory::View
            }
            EditorEvent::ParametersConfirmed(_) | EditorEvent::ConfirmFailed { .. } => {
                EventCategory::Parameters
            }
            EditorEvent::Asset(_) => EventCategory::Asset,
            EditorEvent::ExportCompleted { .. } | EditorEvent::ExportRefused { .. } => {
                EventCategory::Export
            }
        }
    }

    /// Get a short description of this event for logging
    pub fn description(&self) -> String {
        match self {
            EditorEvent::PartsRebuilt {
                generation,
                ordered,
                procedural,
                ..
            } => format!(
                "Generation {} rebuilt with {} parts ({})",
                generation,
                ordered.len(),
                if *procedural { "procedural" } else { "imported" }
            ),
            EditorEvent::SelectionChanged { current, .. } => match current {
                Some(part) => format!("Selected {}", part),
                None => "Selection cleared".to_string(),
            },
            EditorEvent::ViewModeChanged(mode) => format!("View mode: {}", mode),
            EditorEvent::GizmoModeChanged(mode) => format!("Gizmo mode: {}", mode),
            EditorEvent::ParametersConfirmed(p) => format!(
                "Confirmed {}x{} beam {} kerf {}",
                p.width, p.height, p.beam_thickness, p.saw_thickness
            ),
            EditorEvent::ConfirmFailed { reason } => format!("Confirm failed: {}", reason),
            EditorEvent::Asset(AssetEvent::Loading { url }) => format!("Loading {}", url),
            EditorEvent::Asset(AssetEvent::Loaded { url, parts }) => {
                format!("Loaded {} ({} parts)", url, parts)
            }
            EditorEvent::Asset(AssetEvent::Failed { url, error }) => {
                format!("Failed to load {}: {}", url, error)
            }
            EditorEvent::Asset(AssetEvent::Discarded { url }) => {
                format!("Discarded stale load of {}", url)
            }
            EditorEvent::ExportCompleted { file_name } => format!("Exported {}", file_name),
            EditorEvent::ExportRefused { reason } => format!("Export refused: {}", reason),
        }
    }
}

/// Event category for filtering
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EventCategory {
    /// Part set rebuilds.
    Geometry,
    /// Selection changes.
    Selection,
    /// View and gizmo mode changes.
    View,
    /// Draft/confirmed parameter transitions.
    Parameters,
    /// Reference asset loading.
    Asset,
    /// G-code and label exports.
    Export,
}

impl std::fmt::Display for EventCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            EventCategory::Geometry => write!(f, "Geometry"),
            EventCategory::Selection => write!(f, "Selection"),
            EventCategory::View => write!(f, "View"),
            EventCategory::Parameters => write!(f, "Parameters"),
            EventCategory::Asset => write!(f, "Asset"),
            EventCategory::Export => write!(f, "Export"),
        }
    }
}
