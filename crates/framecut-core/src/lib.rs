//! # FrameCut Core
//!
//! Core types shared by every FrameCut crate:
//! - [`FrameParameters`]: the rectangular frame description and its validation
//! - [`BeamName`], [`PartId`] and [`PartOrdering`]: stable part identity and
//!   the fixed display/export priority
//! - [`EventBus`]: explicit publish/subscribe channel used to notify observers
//!   of rebuilds, selection changes and exports
//! - Error types built on `thiserror`

pub mod error;
pub mod event_bus;
pub mod frame;
pub mod part;
pub mod view;

pub use error::{FrameError, Result};
pub use event_bus::{
    AssetEvent, EditorEvent, EventBus, EventBusConfig, EventBusError, EventCategory, EventFilter,
    RecordedEvent, SubscriptionId,
};
pub use frame::{
    validate_section, FrameParameters, HOLE_EDGE_OFFSET_FACTOR, HOLE_RADIUS_FACTOR,
    HOLE_SPACING_FACTOR, MIN_SPAN_FACTOR,
};
pub use part::{BeamName, Orientation, PartId, PartOrdering};
pub use view::{GizmoMode, ViewMode};
