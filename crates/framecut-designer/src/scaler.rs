//! # Reference Model Scaler
//!
//! Fits an imported frame model to new outer dimensions without distorting
//! its corners. Each beam is stretched only along its long axis, and only in
//! its middle section: the geometry within a corner zone of either end moves
//! rigidly, so the 45 degree miters and the fastener holes near the ends keep
//! their shape. The short in-plane axis is never scaled; depth is scaled
//! uniformly.
//!
//! The corner zone is a quarter of the shorter of the reference and target
//! lengths, so shrinking a beam never folds its middle section over itself.
//!
//! Scaling always starts from the untouched reference model. Applying the
//! same dimensions twice gives the same result as applying them once.

use crate::error::{ScaleError, ScaleResult};
use crate::mesh::Mesh3D;
use crate::reference::{ModelPart, PartNameMap, ReferenceDimensions, ReferenceModel};
use framecut_core::{BeamName, Orientation, PartId, PartOrdering};
use nalgebra::{Point3, Vector3};
use std::sync::Arc;
use tracing::{debug, warn};

/// Fraction of the beam length that moves rigidly at each end
pub const CORNER_ZONE_FRACTION: f64 = 0.25;

/// One part of a scaled model
#[derive(Debug, Clone, PartialEq)]
pub struct DerivedPart {
    pub id: PartId,
    /// Sub-mesh name in the reference model
    pub source_name: String,
    /// Geometry centered on its own bounding box
    pub mesh: Mesh3D,
    pub position: Vector3<f32>,
}

impl DerivedPart {
    pub fn world_mesh(&self) -> Mesh3D {
        let mut mesh = self.mesh.clone();
        mesh.translate(self.position);
        mesh
    }
}

/// A reference model fitted to target dimensions
#[derive(Debug, Clone, PartialEq)]
pub struct DerivedModel {
    pub width: f64,
    pub height: f64,
    pub depth: f64,
    pub parts: Vec<DerivedPart>,
}

impl DerivedModel {
    pub fn part(&self, id: &PartId) -> Option<&DerivedPart> {
        self.parts.iter().find(|p| &p.id == id)
    }

    /// Part identities in discovery order
    pub fn part_ids(&self) -> Vec<PartId> {
        self.parts.iter().map(|p| p.id.clone()).collect()
    }

    pub fn ordered_ids(&self) -> Vec<PartId> {
        PartOrdering::ordered(&self.part_ids())
    }

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

fn check_target(axis: &'static str, value: f64) -> ScaleResult<()> {
    if value.is_finite() && value > 0.0 {
        Ok(())
    } else {
        Err(ScaleError::InvalidTarget { axis, value })
    }
}

/// Fit `reference` to a `width` x `height` frame of the given depth
pub fn scale_reference(
    reference: &ReferenceModel,
    dimensions: &ReferenceDimensions,
    names: &PartNameMap,
    width: f64,
    height: f64,
    depth: f64,
) -> ScaleResult<DerivedModel> {
    dimensions.validate()?;
    check_target("width", width)?;
    check_target("height", height)?;
    check_target("depth", depth)?;

    let depth_factor = depth / dimensions.depth;
    debug!(
        "Scaling reference {}x{}x{} to {}x{}x{}",
        dimensions.width, dimensions.height, dimensions.depth, width, height, depth
    );

    let parts = reference
        .parts()
        .iter()
        .map(|part| match names.resolve(&part.name) {
            PartId::Beam(beam) => scale_beam(part, beam, width, height, depth_factor),
            id @ PartId::Named(_) => {
                debug!("Part {} has no beam mapping; keeping it unscaled", part.name);
                Ok(DerivedPart {
                    id,
                    source_name: part.name.clone(),
                    mesh: part.mesh.clone(),
                    position: part.position,
                })
            }
        })
        .collect::<ScaleResult<Vec<_>>>()?;

    Ok(DerivedModel {
        width,
        height,
        depth,
        parts,
    })
}

fn scale_beam(
    part: &ModelPart,
    beam: BeamName,
    width: f64,
    height: f64,
    depth_factor: f64,
) -> ScaleResult<DerivedPart> {
    let (axis, axis_name, target) = match beam.orientation() {
        Orientation::Horizontal => (0, "x", width),
        Orientation::Vertical => (1, "y", height),
    };

    let mut mesh = part.mesh.clone();
    let size = mesh.size();
    let reference = size[axis] as f64;
    if reference <= f64::EPSILON {
        return Err(ScaleError::DegeneratePart {
            part: part.name.clone(),
            axis: axis_name,
        });
    }

    let remap = LongAxisMap::new(reference, target);
    let center = mesh.bounds_center();
    for p in &mut mesh.positions {
        let along = (p[axis] - center[axis]) as f64;
        p[axis] = remap.apply(along) as f32;
        p.z = ((p.z - center.z) as f64 * depth_factor) as f32;
    }
    mesh.refresh();
    mesh.center();

    let size = mesh.size();
    let position = match beam {
        BeamName::Top => Vector3::new(0.0, height as f32 / 2.0 - size.y / 2.0, 0.0),
        BeamName::Bottom => Vector3::new(0.0, -(height as f32) / 2.0 + size.y / 2.0, 0.0),
        BeamName::Left => Vector3::new(-(width as f32) / 2.0 + size.x / 2.0, 0.0, 0.0),
        BeamName::Right => Vector3::new(width as f32 / 2.0 - size.x / 2.0, 0.0, 0.0),
    };

    if (size[axis] as f64 - target).abs() > 1e-3 * target.max(1.0) {
        warn!(
            "Scaled {} spans {} along {}, expected {}",
            part.name, size[axis], axis_name, target
        );
    }

    Ok(DerivedPart {
        id: PartId::Beam(beam),
        source_name: part.name.clone(),
        mesh,
        position,
    })
}

/// Piecewise map of a centered long-axis coordinate
#[derive(Debug, Clone, Copy, PartialEq)]
struct LongAxisMap {
    /// Half length of the middle section, before and after
    inner_reference: f64,
    inner_target: f64,
    /// Rigid shift of each end zone
    shift: f64,
}

impl LongAxisMap {
    fn new(reference: f64, target: f64) -> Self {
        let zone = CORNER_ZONE_FRACTION * reference.min(target);
        Self {
            inner_reference: reference / 2.0 - zone,
            inner_target: target / 2.0 - zone,
            shift: (target - reference) / 2.0,
        }
    }

    fn apply(&self, along: f64) -> f64 {
        if along <= -self.inner_reference {
            along - self.shift
        } else if along >= self.inner_reference {
            along + self.shift
        } else {
            along * self.inner_target / self.inner_reference
        }
    }
}

/// An imported model together with its current fitted copy
///
/// The raw model is shared and never modified; `derived` is replaced
/// wholesale on every [`ImportedModel::rederive`].
#[derive(Debug, Clone)]
pub struct ImportedModel {
    raw: Arc<ReferenceModel>,
    dimensions: ReferenceDimensions,
    names: PartNameMap,
    derived: Option<DerivedModel>,
}

impl ImportedModel {
    pub fn new(raw: Arc<ReferenceModel>, dimensions: ReferenceDimensions, names: PartNameMap) -> Self {
        Self {
            raw,
            dimensions,
            names,
            derived: None,
        }
    }

    pub fn raw(&self) -> &Arc<ReferenceModel> {
        &self.raw
    }

    pub fn dimensions(&self) -> &ReferenceDimensions {
        &self.dimensions
    }

    pub fn derived(&self) -> Option<&DerivedModel> {
        self.derived.as_ref()
    }

    /// Refit the raw model to new dimensions, replacing the previous fit
    pub fn rederive(&mut self, width: f64, height: f64, depth: f64) -> ScaleResult<&DerivedModel> {
        let derived = scale_reference(
            &self.raw,
            &self.dimensions,
            &self.names,
            width,
            height,
            depth,
        )?;
        Ok(self.derived.insert(derived))
    }
}
