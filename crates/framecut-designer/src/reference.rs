//! # Reference Models
//!
//! An imported frame model is a set of named sub-meshes. The model is kept
//! exactly as loaded; the scaler always derives new geometry from it and
//! never writes back.

use crate::error::{GlbError, GlbResult, ScaleError, ScaleResult};
use crate::frame_builder::Beam;
use crate::glb;
use crate::mesh::Mesh3D;
use framecut_core::{BeamName, FrameParameters, PartId};
use nalgebra::{Point3, Vector3};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// A named sub-mesh of a reference model
#[derive(Debug, Clone, PartialEq)]
pub struct ModelPart {
    pub name: String,
    /// Geometry centered on its own bounding box
    pub mesh: Mesh3D,
    pub position: Vector3<f32>,
}

impl ModelPart {
    /// Split a mesh given in model coordinates into a centered mesh and an offset
    pub fn from_model_space(name: impl Into<String>, mut mesh: Mesh3D) -> Self {
        let position = mesh.center();
        Self {
            name: name.into(),
            mesh,
            position,
        }
    }

    pub fn world_mesh(&self) -> Mesh3D {
        let mut mesh = self.mesh.clone();
        mesh.translate(self.position);
        mesh
    }
}

/// The frame size a reference model was authored at
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReferenceDimensions {
    pub width: f64,
    pub height: f64,
    pub depth: f64,
}

impl Default for ReferenceDimensions {
    fn default() -> Self {
        Self::from_params(&FrameParameters::default())
    }
}

impl ReferenceDimensions {
    pub fn new(width: f64, height: f64, depth: f64) -> Self {
        Self {
            width,
            height,
            depth,
        }
    }

    /// Dimensions of a procedurally built frame: depth equals the beam thickness
    pub fn from_params(params: &FrameParameters) -> Self {
        Self::new(params.width, params.height, params.beam_thickness)
    }

    pub fn validate(&self) -> ScaleResult<()> {
        for (axis, value) in [
            ("width", self.width),
            ("height", self.height),
            ("depth", self.depth),
        ] {
            if !value.is_finite() || value <= 0.0 {
                return Err(ScaleError::InvalidReferenceDimension { axis, value });
            }
        }
        Ok(())
    }
}

/// Case-insensitive mapping from sub-mesh names to beams
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PartNameMap {
    entries: BTreeMap<String, BeamName>,
}

impl Default for PartNameMap {
    fn default() -> Self {
        Self::from_entries([
            ("Top", BeamName::Top),
            ("Bottom", BeamName::Bottom),
            ("Left", BeamName::Left),
            ("Right", BeamName::Right),
        ])
    }
}

impl PartNameMap {
    pub fn from_entries<I, S>(entries: I) -> Self
    where
        I: IntoIterator<Item = (S, BeamName)>,
        S: Into<String>,
    {
        Self {
            entries: entries
                .into_iter()
                .map(|(name, beam)| (name.into(), beam))
                .collect(),
        }
    }

    pub fn insert(&mut self, name: impl Into<String>, beam: BeamName) {
        self.entries.insert(name.into(), beam);
    }

    pub fn beam_for(&self, name: &str) -> Option<BeamName> {
        self.entries
            .iter()
            .find(|(key, _)| key.eq_ignore_ascii_case(name.trim()))
            .map(|(_, beam)| *beam)
    }

    /// Identity of a sub-mesh; names without a mapping stay as they are
    pub fn resolve(&self, name: &str) -> PartId {
        match self.beam_for(name) {
            Some(beam) => PartId::Beam(beam),
            None => PartId::Named(name.to_string()),
        }
    }

    pub fn entries(&self) -> impl Iterator<Item = (&str, BeamName)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), *v))
    }
}

/// An imported frame model, immutable once loaded
#[derive(Debug, Clone, PartialEq)]
pub struct ReferenceModel {
    parts: Vec<ModelPart>,
}

impl ReferenceModel {
    pub fn from_parts(parts: Vec<ModelPart>) -> GlbResult<Self> {
        if parts.iter().all(|p| p.mesh.is_empty()) {
            return Err(GlbError::NoMeshes);
        }
        Ok(Self { parts })
    }

    /// Parse a binary glTF container
    pub fn from_glb(bytes: &[u8]) -> GlbResult<Self> {
        Self::from_parts(glb::read_glb(bytes)?)
    }

    pub fn to_glb(&self) -> GlbResult<Vec<u8>> {
        glb::write_glb(&self.parts)
    }

    /// A reference model made of procedural beams, one part per beam
    pub fn from_beams(beams: &[Beam]) -> Self {
        let parts = beams
            .iter()
            .map(|beam| ModelPart {
                name: beam.name.to_string(),
                mesh: beam.mesh.clone(),
                position: beam.transform.position,
            })
            .collect();
        Self { parts }
    }

    pub fn parts(&self) -> &[ModelPart] {
        &self.parts
    }

    pub fn part(&self, name: &str) -> Option<&ModelPart> {
        self.parts.iter().find(|p| p.name == name)
    }

    /// Bounds of all parts in model coordinates
    pub fn bounds(&self) -> (Point3<f32>, Point3<f32>) {
        let mut iter = self.parts.iter().map(|p| {
            (
                p.mesh.bounds_min + p.position,
                p.mesh.bounds_max + p.position,
            )
        });
        let Some(first) = iter.next() else {
            return (Point3::origin(), Point3::origin());
        };
        iter.fold(first, |(min, max), (lo, hi)| (min.inf(&lo), max.sup(&hi)))
    }
}
