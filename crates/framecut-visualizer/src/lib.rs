//! # FrameCut Visualizer
//!
//! Interaction side of the frame editor: the live part set, camera
//! framing, ray picking, single-part selection and the view/gizmo modes.
//! Drawing itself is left to the host; this crate only tracks what should
//! be drawn and how.

pub mod camera;
pub mod picking;
pub mod scene;
pub mod selection;

pub use camera::Camera;
pub use picking::{intersect_mesh, intersect_triangle, Aabb, Ray};
pub use scene::{
    apply_view_mode, GroupTransform, Helper, HelperKind, Outline, PickHit, Scene, SceneError,
    ScenePart,
};
pub use selection::{Selection, SelectionChange};
