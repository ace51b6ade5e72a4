//! # FrameCut Designer
//!
//! Geometry side of the frame editor.
//!
//! ## Core Components
//!
//! - **Profiles**: trapezoidal beam outlines with 45 degree ends and the
//!   fastener hole layout
//! - **Frame builder**: extrudes the four beam profiles into indexed meshes
//!   and places them on the frame rectangle
//! - **GLB I/O**: reads and writes the binary glTF subset used for reference
//!   frame models
//! - **Scaler**: fits an imported reference model to new dimensions while
//!   keeping its corners rigid
//!
//! ## Usage
//!
//! ```rust
//! use framecut_designer::build_frame;
//!
//! let beams = build_frame(523.0, 400.0, 22.0).unwrap();
//! assert_eq!(beams.len(), 4);
//! assert_eq!(beams[0].holes().len(), 4);
//! ```

pub mod error;
pub mod frame_builder;
pub mod glb;
pub mod mesh;
pub mod profile;
pub mod reference;
pub mod scaler;

pub use error::{GeometryError, GlbError, ScaleError};
pub use frame_builder::{beam_length, beam_position, build_beam, build_frame, extrude, Beam};
pub use mesh::{Mesh3D, PartMaterial, PartTransform};
pub use profile::{beam_outline, BeamProfile, Perforation, ProfileLayout};
pub use reference::{ModelPart, PartNameMap, ReferenceDimensions, ReferenceModel};
pub use scaler::{scale_reference, DerivedModel, DerivedPart, ImportedModel};
