//! # Mesh Module
//!
//! Indexed triangle meshes shared by the beam builder, the GLB reader and the
//! reference scaler, plus the per-part transform and material that travel
//! with a mesh into the scene.

use nalgebra::{Matrix4, Point3, UnitQuaternion, Vector3};
use serde::{Deserialize, Serialize};

/// An indexed triangle mesh
#[derive(Debug, Clone, PartialEq)]
pub struct Mesh3D {
    pub positions: Vec<Point3<f32>>,
    pub normals: Vec<Vector3<f32>>,
    pub indices: Vec<[u32; 3]>,
    pub bounds_min: Point3<f32>,
    pub bounds_max: Point3<f32>,
}

impl Mesh3D {
    pub fn new(positions: Vec<Point3<f32>>, indices: Vec<[u32; 3]>) -> Self {
        let mut mesh = Self {
            normals: Vec::new(),
            positions,
            indices,
            bounds_min: Point3::origin(),
            bounds_max: Point3::origin(),
        };
        mesh.recompute_normals();
        mesh.calculate_bounds();
        mesh
    }

    pub fn is_empty(&self) -> bool {
        self.indices.is_empty()
    }

    pub fn vertex_count(&self) -> usize {
        self.positions.len()
    }

    pub fn triangle_count(&self) -> usize {
        self.indices.len()
    }

    /// Corner positions of triangle `index`
    pub fn triangle(&self, index: usize) -> Option<[Point3<f32>; 3]> {
        let [a, b, c] = *self.indices.get(index)?;
        Some([
            *self.positions.get(a as usize)?,
            *self.positions.get(b as usize)?,
            *self.positions.get(c as usize)?,
        ])
    }

    pub fn triangles(&self) -> impl Iterator<Item = [Point3<f32>; 3]> + '_ {
        (0..self.indices.len()).filter_map(move |i| self.triangle(i))
    }

    /// Area-weighted vertex normals
    pub fn recompute_normals(&mut self) {
        let mut normals = vec![Vector3::zeros(); self.positions.len()];
        for &[a, b, c] in &self.indices {
            let (a, b, c) = (a as usize, b as usize, c as usize);
            if a >= normals.len() || b >= normals.len() || c >= normals.len() {
                continue;
            }
            let face = (self.positions[b] - self.positions[a])
                .cross(&(self.positions[c] - self.positions[a]));
            normals[a] += face;
            normals[b] += face;
            normals[c] += face;
        }
        for normal in &mut normals {
            *normal = normal.try_normalize(f32::EPSILON).unwrap_or_else(Vector3::z);
        }
        self.normals = normals;
    }

    fn calculate_bounds(&mut self) {
        let Some(first) = self.positions.first() else {
            self.bounds_min = Point3::origin();
            self.bounds_max = Point3::origin();
            return;
        };

        let mut min = *first;
        let mut max = *first;
        for p in &self.positions[1..] {
            min = min.inf(p);
            max = max.sup(p);
        }

        self.bounds_min = min;
        self.bounds_max = max;
    }

    /// Recompute normals and bounds after positions were edited in place
    pub fn refresh(&mut self) {
        self.recompute_normals();
        self.calculate_bounds();
    }

    pub fn size(&self) -> Vector3<f32> {
        self.bounds_max - self.bounds_min
    }

    pub fn bounds_center(&self) -> Point3<f32> {
        nalgebra::center(&self.bounds_min, &self.bounds_max)
    }

    /// Transform the mesh using a 4x4 transformation matrix
    pub fn transform(&mut self, transform: &Matrix4<f32>) {
        for p in &mut self.positions {
            *p = transform.transform_point(p);
        }
        self.refresh();
    }

    pub fn translate(&mut self, offset: Vector3<f32>) {
        for p in &mut self.positions {
            *p += offset;
        }
        self.calculate_bounds();
    }

    /// Center the mesh on its bounding box and return the removed offset
    pub fn center(&mut self) -> Vector3<f32> {
        let center = self.bounds_center().coords;
        self.translate(-center);
        center
    }

    /// Append another mesh, offsetting its indices
    pub fn merge(&mut self, other: &Mesh3D) {
        let base = self.positions.len() as u32;
        self.positions.extend_from_slice(&other.positions);
        self.indices
            .extend(other.indices.iter().map(|[a, b, c]| [a + base, b + base, c + base]));
        self.refresh();
    }

    /// Signed volume; positive for closed meshes with outward winding
    pub fn signed_volume(&self) -> f32 {
        self.triangles()
            .map(|[a, b, c]| a.coords.dot(&b.coords.cross(&c.coords)) / 6.0)
            .sum()
    }
}

/// Placement of a part relative to its parent group
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PartTransform {
    pub position: Vector3<f32>,
    pub rotation: UnitQuaternion<f32>,
    pub scale: Vector3<f32>,
}

impl Default for PartTransform {
    fn default() -> Self {
        Self {
            position: Vector3::zeros(),
            rotation: UnitQuaternion::identity(),
            scale: Vector3::repeat(1.0),
        }
    }
}

impl PartTransform {
    pub fn from_position(position: Vector3<f32>) -> Self {
        Self {
            position,
            ..Self::default()
        }
    }

    /// Translation * rotation * scale
    pub fn matrix(&self) -> Matrix4<f32> {
        Matrix4::new_translation(&self.position)
            * self.rotation.to_homogeneous()
            * Matrix4::new_nonuniform_scaling(&self.scale)
    }
}

/// Surface appearance of a part
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PartMaterial {
    /// RGBA, 0..1
    pub base_color: [f32; 4],
    pub wireframe: bool,
    pub show_faces: bool,
    pub show_vertices: bool,
}

impl Default for PartMaterial {
    fn default() -> Self {
        Self {
            base_color: [0.76, 0.6, 0.42, 1.0],
            wireframe: false,
            show_faces: true,
            show_vertices: false,
        }
    }
}
