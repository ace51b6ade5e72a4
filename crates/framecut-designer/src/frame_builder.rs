//! # Frame Builder
//!
//! Builds the four mitered beams of a rectangular frame from its outer
//! dimensions. Each beam is its profile (outline minus holes) extruded by the
//! beam thickness along Z, centered on Z = 0, and placed so that its outer
//! edge lies on the frame rectangle.
//!
//! Rebuilding never edits an existing beam: every call returns a complete new
//! set.

use crate::error::{GeometryError, GeometryResult};
use crate::mesh::{Mesh3D, PartMaterial, PartTransform};
use crate::profile::{signed_area, BeamProfile, Perforation};
use framecut_core::{validate_section, BeamName, Orientation};
use lyon::tessellation::{
    BuffersBuilder, FillOptions, FillRule, FillTessellator, FillVertex, VertexBuffers,
};
use nalgebra::{Point2, Point3, Vector3};
use tracing::debug;

const TESSELLATION_TOLERANCE: f32 = 0.01;

/// One structural member of the frame
#[derive(Debug, Clone, PartialEq)]
pub struct Beam {
    pub name: BeamName,
    /// Outer (long-edge) length
    pub length: f64,
    pub thickness: f64,
    pub profile: BeamProfile,
    /// Extruded geometry in beam-local coordinates
    pub mesh: Mesh3D,
    pub transform: PartTransform,
    pub visible: bool,
    pub material: PartMaterial,
}

impl Beam {
    pub fn holes(&self) -> &[Perforation] {
        &self.profile.holes
    }

    /// Mesh in frame coordinates
    pub fn world_mesh(&self) -> Mesh3D {
        let mut mesh = self.mesh.clone();
        mesh.transform(&self.transform.matrix());
        mesh
    }

    /// Outline corners in frame coordinates
    pub fn world_outline(&self) -> Vec<Point2<f64>> {
        let offset = self.transform.position.cast::<f64>().xy();
        self.profile.outline.iter().map(|p| p + offset).collect()
    }
}

/// Local placement offset of a beam inside a `width` x `height` frame
pub fn beam_position(beam: BeamName, width: f64, height: f64, thickness: f64) -> Vector3<f64> {
    let half = thickness / 2.0;
    match beam {
        BeamName::Top => Vector3::new(0.0, height / 2.0 - half, 0.0),
        BeamName::Bottom => Vector3::new(0.0, -height / 2.0 + half, 0.0),
        BeamName::Left => Vector3::new(-width / 2.0 + half, 0.0, 0.0),
        BeamName::Right => Vector3::new(width / 2.0 - half, 0.0, 0.0),
    }
}

/// Long-edge length of a beam: the frame width for TOP/BOTTOM, height for LEFT/RIGHT
pub fn beam_length(beam: BeamName, width: f64, height: f64) -> f64 {
    match beam.orientation() {
        Orientation::Horizontal => width,
        Orientation::Vertical => height,
    }
}

/// Build the four beams, in TOP, BOTTOM, LEFT, RIGHT order
pub fn build_frame(width: f64, height: f64, thickness: f64) -> GeometryResult<[Beam; 4]> {
    validate_section(width, height, thickness)?;
    debug!(
        "Building frame {}x{} with {} mm beams",
        width, height, thickness
    );

    let [top, bottom, left, right] = BeamName::ALL;
    Ok([
        build_beam(top, width, height, thickness)?,
        build_beam(bottom, width, height, thickness)?,
        build_beam(left, width, height, thickness)?,
        build_beam(right, width, height, thickness)?,
    ])
}

/// Build a single beam for a frame of the given size
pub fn build_beam(
    name: BeamName,
    width: f64,
    height: f64,
    thickness: f64,
) -> GeometryResult<Beam> {
    let length = beam_length(name, width, height);
    let profile = BeamProfile::new(name, length, thickness);
    let mesh = extrude(&profile, thickness)?;
    let position = beam_position(name, width, height, thickness).cast::<f32>();

    Ok(Beam {
        name,
        length,
        thickness,
        profile,
        mesh,
        transform: PartTransform::from_position(position),
        visible: true,
        material: PartMaterial::default(),
    })
}

/// Extrude a profile by `depth` along Z, centered on Z = 0
pub fn extrude(profile: &BeamProfile, depth: f64) -> GeometryResult<Mesh3D> {
    let cap = tessellate(profile)?;
    let half = (depth / 2.0) as f32;

    let mut positions = Vec::new();
    let mut indices = Vec::new();

    // front cap (+Z) keeps the counter-clockwise winding, back cap flips it
    for (z, flip) in [(half, false), (-half, true)] {
        let base = positions.len() as u32;
        positions.extend(cap.vertices.iter().map(|v| Point3::new(v[0], v[1], z)));
        for tri in &cap.triangles {
            let [a, b, c] = tri.map(|i| i + base);
            indices.push(if flip { [a, c, b] } else { [a, b, c] });
        }
    }

    // walls: outline is counter-clockwise and holes clockwise, so the right
    // side of every edge faces away from the material
    for contour in profile.contours() {
        let n = contour.len();
        for i in 0..n {
            let a = contour[i];
            let b = contour[(i + 1) % n];
            let base = positions.len() as u32;
            positions.extend([
                Point3::new(a.x as f32, a.y as f32, -half),
                Point3::new(b.x as f32, b.y as f32, -half),
                Point3::new(b.x as f32, b.y as f32, half),
                Point3::new(a.x as f32, a.y as f32, half),
            ]);
            indices.push([base, base + 1, base + 2]);
            indices.push([base, base + 2, base + 3]);
        }
    }

    Ok(Mesh3D::new(positions, indices))
}

struct CapTriangles {
    vertices: Vec<[f32; 2]>,
    triangles: Vec<[u32; 3]>,
}

/// Fill the profile (outline minus holes) with counter-clockwise triangles
fn tessellate(profile: &BeamProfile) -> GeometryResult<CapTriangles> {
    let path = profile.to_path();
    let mut buffers: VertexBuffers<[f32; 2], u32> = VertexBuffers::new();

    FillTessellator::new()
        .tessellate_path(
            &path,
            &FillOptions::tolerance(TESSELLATION_TOLERANCE).with_fill_rule(FillRule::EvenOdd),
            &mut BuffersBuilder::new(&mut buffers, |vertex: FillVertex| {
                vertex.position().to_array()
            }),
        )
        .map_err(|e| GeometryError::Tessellation {
            beam: profile.beam.to_string(),
            reason: format!("{:?}", e),
        })?;

    let triangles = buffers
        .indices
        .chunks_exact(3)
        .map(|tri| {
            let corners: Vec<Point2<f64>> = tri
                .iter()
                .map(|&i| {
                    let [x, y] = buffers.vertices[i as usize];
                    Point2::new(x as f64, y as f64)
                })
                .collect();
            if signed_area(&corners) < 0.0 {
                [tri[0], tri[2], tri[1]]
            } else {
                [tri[0], tri[1], tri[2]]
            }
        })
        .collect();

    Ok(CapTriangles {
        vertices: buffers.vertices,
        triangles,
    })
}
