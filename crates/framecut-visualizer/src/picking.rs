//! Ray picking against part meshes
//!
//! Each part is tested against its bounding box first, then triangle by
//! triangle with the Moller-Trumbore test. Only the nearest hit counts.

use framecut_designer::Mesh3D;
use glam::{Mat4, Vec3};

const EPSILON: f32 = 1e-7;

/// Half-line with a unit direction
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Ray {
    pub origin: Vec3,
    pub direction: Vec3,
}

impl Ray {
    /// `None` when `direction` has no length
    pub fn new(origin: Vec3, direction: Vec3) -> Option<Self> {
        let direction = direction.try_normalize()?;
        Some(Self { origin, direction })
    }

    pub fn at(&self, distance: f32) -> Vec3 {
        self.origin + self.direction * distance
    }

    /// The same ray expressed in another coordinate system
    ///
    /// Distances along the result are only comparable with distances along
    /// `self` when `matrix` has no scale.
    pub fn transformed(&self, matrix: &Mat4) -> Option<Self> {
        Self::new(
            matrix.transform_point3(self.origin),
            matrix.transform_vector3(self.direction),
        )
    }
}

/// Axis-aligned bounding box
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Aabb {
    pub min: Vec3,
    pub max: Vec3,
}

impl Aabb {
    pub fn new(min: Vec3, max: Vec3) -> Self {
        Self {
            min: min.min(max),
            max: min.max(max),
        }
    }

    pub fn of_mesh(mesh: &Mesh3D) -> Self {
        Self::new(to_vec3(&mesh.bounds_min), to_vec3(&mesh.bounds_max))
    }

    pub fn union(&self, other: &Aabb) -> Aabb {
        Aabb {
            min: self.min.min(other.min),
            max: self.max.max(other.max),
        }
    }

    pub fn center(&self) -> Vec3 {
        (self.min + self.max) * 0.5
    }

    pub fn size(&self) -> Vec3 {
        self.max - self.min
    }

    /// Box containing all eight corners after `matrix`
    pub fn transformed(&self, matrix: &Mat4) -> Aabb {
        let corners = [
            Vec3::new(self.min.x, self.min.y, self.min.z),
            Vec3::new(self.max.x, self.min.y, self.min.z),
            Vec3::new(self.min.x, self.max.y, self.min.z),
            Vec3::new(self.max.x, self.max.y, self.min.z),
            Vec3::new(self.min.x, self.min.y, self.max.z),
            Vec3::new(self.max.x, self.min.y, self.max.z),
            Vec3::new(self.min.x, self.max.y, self.max.z),
            Vec3::new(self.max.x, self.max.y, self.max.z),
        ];
        let first = matrix.transform_point3(corners[0]);
        corners[1..].iter().fold(Aabb::new(first, first), |acc, c| {
            let p = matrix.transform_point3(*c);
            Aabb {
                min: acc.min.min(p),
                max: acc.max.max(p),
            }
        })
    }

    /// Entry distance of the ray into the box (slab test), 0 if it starts inside
    pub fn intersect(&self, ray: &Ray) -> Option<f32> {
        let mut t_min = 0.0f32;
        let mut t_max = f32::INFINITY;
        for axis in 0..3 {
            let origin = ray.origin[axis];
            let dir = ray.direction[axis];
            if dir.abs() < EPSILON {
                if origin < self.min[axis] || origin > self.max[axis] {
                    return None;
                }
                continue;
            }
            let inv = 1.0 / dir;
            let mut t0 = (self.min[axis] - origin) * inv;
            let mut t1 = (self.max[axis] - origin) * inv;
            if t0 > t1 {
                std::mem::swap(&mut t0, &mut t1);
            }
            t_min = t_min.max(t0);
            t_max = t_max.min(t1);
            if t_min > t_max {
                return None;
            }
        }
        Some(t_min)
    }
}

pub(crate) fn to_vec3(p: &nalgebra::Point3<f32>) -> Vec3 {
    Vec3::new(p.x, p.y, p.z)
}

/// Distance along `ray` to the triangle, if it is hit in front of the origin
pub fn intersect_triangle(ray: &Ray, a: Vec3, b: Vec3, c: Vec3) -> Option<f32> {
    let edge1 = b - a;
    let edge2 = c - a;
    let p = ray.direction.cross(edge2);
    let det = edge1.dot(p);
    if det.abs() < EPSILON {
        return None;
    }
    let inv_det = 1.0 / det;
    let s = ray.origin - a;
    let u = s.dot(p) * inv_det;
    if !(0.0..=1.0).contains(&u) {
        return None;
    }
    let q = s.cross(edge1);
    let v = ray.direction.dot(q) * inv_det;
    if v < 0.0 || u + v > 1.0 {
        return None;
    }
    let t = edge2.dot(q) * inv_det;
    (t > EPSILON).then_some(t)
}

/// Nearest hit of `ray` on `mesh`
pub fn intersect_mesh(ray: &Ray, mesh: &Mesh3D) -> Option<f32> {
    if mesh.is_empty() {
        return None;
    }
    Aabb::of_mesh(mesh).intersect(ray)?;
    mesh.triangles()
        .filter_map(|[a, b, c]| intersect_triangle(ray, to_vec3(&a), to_vec3(&b), to_vec3(&c)))
        .min_by(f32::total_cmp)
}
