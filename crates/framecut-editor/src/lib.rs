//! # FrameCut Editor
//!
//! The editing session that ties the other crates together: draft and
//! confirmed frame parameters, persistence through a construction store,
//! reference model loading with last-write-wins semantics, and G-code and
//! label exports.

pub mod asset;
pub mod error;
pub mod session;
pub mod store;

pub use asset::{AssetOutcome, AssetSource, AssetTicket, FileAssetSource};
pub use error::{AssetError, EditorError, Result, StoreError};
pub use session::{confirm_draft, load_reference, EditorSession, SessionConfig, SharedSession};
pub use store::{ConstructionStore, ConstructionUpdate, InMemoryStore};
