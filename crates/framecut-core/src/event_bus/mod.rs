//! # Event Bus Module
//!
//! Publish/subscribe channel between the editor session and its observers
//! (parts list, status line, export panel).
//!
//! ## Usage
//!
//! ```rust
//! use framecut_core::event_bus::{EditorEvent, EventBus, EventCategory, EventFilter};
//!
//! let bus = EventBus::new();
//! let subscription = bus.subscribe(
//!     EventFilter::Categories(vec![EventCategory::Geometry]),
//!     |event| {
//!         if let EditorEvent::PartsRebuilt { ordered, .. } = event {
//!             assert_eq!(ordered.len(), 4);
//!         }
//!     },
//! );
//! bus.unsubscribe(subscription);
//! ```

mod bus;
mod events;

pub use bus::*;
pub use events::*;
