//! # Frame Scene
//!
//! Holds the current part set of the editor inside one assembly group.
//!
//! The part set is replaced wholesale on every rebuild: the selection and
//! its outline are torn down first, the generation counter advances and
//! observers receive a [`EditorEvent::PartsRebuilt`] carrying both the
//! discovery order and the fixed priority order. Helper objects (grid,
//! axes, gizmo handle) live next to the parts but are never pickable.

use crate::camera::Camera;
use crate::picking::{intersect_mesh, Aabb, Ray};
use crate::selection::{Selection, SelectionChange};
use framecut_core::{EditorEvent, EventBus, GizmoMode, PartId, PartOrdering, ViewMode};
use framecut_designer::{Beam, DerivedModel, Mesh3D, PartMaterial};
use glam::{EulerRot, Mat4, Quat, Vec2, Vec3};
use std::sync::Arc;
use thiserror::Error;
use tracing::{debug, info};

const MIN_GROUP_SCALE: f32 = 1e-3;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum SceneError {
    #[error("Part {0} is not in the scene")]
    UnknownPart(PartId),
}

/// Highlight drawn around the selected part
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Outline {
    pub color: [f32; 4],
    /// Scale of the outline shell relative to the part
    pub scale: f32,
}

impl Default for Outline {
    fn default() -> Self {
        Self {
            color: [1.0, 0.55, 0.0, 1.0],
            scale: 1.02,
        }
    }
}

/// A pickable part of the current generation
#[derive(Debug, Clone, PartialEq)]
pub struct ScenePart {
    pub id: PartId,
    /// Geometry in assembly coordinates
    pub mesh: Mesh3D,
    pub bounds: Aabb,
    pub visible: bool,
    pub material: PartMaterial,
    pub outline: Option<Outline>,
}

impl ScenePart {
    pub fn new(id: PartId, mesh: Mesh3D, visible: bool, material: PartMaterial) -> Self {
        Self {
            id,
            bounds: Aabb::of_mesh(&mesh),
            mesh,
            visible,
            material,
            outline: None,
        }
    }
}

/// Transform of the assembly group; the gizmo edits only this
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GroupTransform {
    pub translation: Vec3,
    pub rotation: Quat,
    pub scale: Vec3,
}

impl Default for GroupTransform {
    fn default() -> Self {
        Self {
            translation: Vec3::ZERO,
            rotation: Quat::IDENTITY,
            scale: Vec3::ONE,
        }
    }
}

impl GroupTransform {
    pub fn matrix(&self) -> Mat4 {
        Mat4::from_scale_rotation_translation(self.scale, self.rotation, self.translation)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HelperKind {
    Grid,
    Axes,
    Gizmo,
}

/// Scene object that is drawn but never picked
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Helper {
    pub kind: HelperKind,
    pub bounds: Aabb,
}

/// Nearest part under a ray
#[derive(Debug, Clone, PartialEq)]
pub struct PickHit {
    pub part: PartId,
    /// Distance from the ray origin in world units
    pub distance: f32,
    pub point: Vec3,
}

/// Material flags for a view mode; colors are left alone
pub fn apply_view_mode(material: &mut PartMaterial, mode: ViewMode) {
    let (faces, wireframe, vertices) = match mode {
        ViewMode::Solid => (true, false, false),
        ViewMode::Wireframe => (false, true, false),
        ViewMode::Vertices => (false, false, true),
        ViewMode::Mixed => (true, true, false),
    };
    material.show_faces = faces;
    material.wireframe = wireframe;
    material.show_vertices = vertices;
}

pub struct Scene {
    parts: Vec<ScenePart>,
    group: GroupTransform,
    helpers: Vec<Helper>,
    selection: Selection,
    view_mode: ViewMode,
    gizmo_mode: GizmoMode,
    camera: Camera,
    generation: u64,
    procedural: bool,
    bus: Arc<EventBus>,
}

impl Scene {
    pub fn new(bus: Arc<EventBus>) -> Self {
        Self {
            parts: Vec::new(),
            group: GroupTransform::default(),
            helpers: vec![
                Helper {
                    kind: HelperKind::Grid,
                    bounds: Aabb::new(Vec3::new(-1000.0, -1000.0, 0.0), Vec3::new(1000.0, 1000.0, 0.0)),
                },
                Helper {
                    kind: HelperKind::Axes,
                    bounds: Aabb::new(Vec3::ZERO, Vec3::splat(100.0)),
                },
            ],
            selection: Selection::new(),
            view_mode: ViewMode::default(),
            gizmo_mode: GizmoMode::default(),
            camera: Camera::default(),
            generation: 0,
            procedural: true,
            bus,
        }
    }

    pub fn parts(&self) -> &[ScenePart] {
        &self.parts
    }

    pub fn part(&self, id: &PartId) -> Option<&ScenePart> {
        self.parts.iter().find(|p| &p.id == id)
    }

    /// Part identities in discovery order
    pub fn part_ids(&self) -> Vec<PartId> {
        self.parts.iter().map(|p| p.id.clone()).collect()
    }

    /// Part identities in fixed priority order
    pub fn ordered_ids(&self) -> Vec<PartId> {
        PartOrdering::ordered(&self.part_ids())
    }

    pub fn helpers(&self) -> &[Helper] {
        &self.helpers
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// Whether the current parts came from the procedural builder
    pub fn is_procedural(&self) -> bool {
        self.procedural
    }

    pub fn selected(&self) -> Option<&PartId> {
        self.selection.current()
    }

    pub fn view_mode(&self) -> ViewMode {
        self.view_mode
    }

    pub fn gizmo_mode(&self) -> GizmoMode {
        self.gizmo_mode
    }

    pub fn group(&self) -> &GroupTransform {
        &self.group
    }

    pub fn camera(&self) -> &Camera {
        &self.camera
    }

    pub fn camera_mut(&mut self) -> &mut Camera {
        &mut self.camera
    }

    /// Number of attached outline objects
    pub fn outline_count(&self) -> usize {
        self.parts.iter().filter(|p| p.outline.is_some()).count()
    }

    /// Replace the part set with procedural beams
    pub fn rebuild_from_beams(&mut self, beams: &[Beam]) {
        let parts = beams
            .iter()
            .map(|beam| {
                ScenePart::new(
                    PartId::Beam(beam.name),
                    beam.world_mesh(),
                    beam.visible,
                    beam.material,
                )
            })
            .collect();
        self.replace_parts(parts, true);
    }

    /// Replace the part set with a scaled reference model
    pub fn rebuild_from_derived(&mut self, model: &DerivedModel) {
        let parts = model
            .parts
            .iter()
            .map(|part| {
                ScenePart::new(
                    part.id.clone(),
                    part.world_mesh(),
                    true,
                    PartMaterial::default(),
                )
            })
            .collect();
        self.replace_parts(parts, false);
    }

    fn replace_parts(&mut self, mut parts: Vec<ScenePart>, procedural: bool) {
        let cleared = self.selection.clear();
        for part in &mut self.parts {
            part.outline = None;
        }
        self.parts.clear();
        if !cleared.is_noop() {
            self.notify_selection(cleared);
        }

        for part in &mut parts {
            apply_view_mode(&mut part.material, self.view_mode);
        }
        self.parts = parts;
        self.procedural = procedural;
        self.generation += 1;
        self.frame_camera();

        let ids = self.part_ids();
        let ordered = PartOrdering::ordered(&ids);
        debug!(
            "Scene generation {}: {} parts ({})",
            self.generation,
            ids.len(),
            if procedural { "procedural" } else { "imported" }
        );
        self.notify(EditorEvent::PartsRebuilt {
            generation: self.generation,
            parts: ids,
            ordered,
            procedural,
        });
    }

    /// Bounds of every part in world coordinates
    pub fn bounds(&self) -> Option<Aabb> {
        let matrix = self.group.matrix();
        self.parts
            .iter()
            .map(|p| p.bounds.transformed(&matrix))
            .reduce(|a, b| a.union(&b))
    }

    /// Point the camera at the whole assembly
    pub fn frame_camera(&mut self) {
        if let Some(bounds) = self.bounds() {
            self.camera.fit_to_bounds(bounds.min, bounds.max);
        }
    }

    pub fn set_view_mode(&mut self, mode: ViewMode) {
        for part in &mut self.parts {
            apply_view_mode(&mut part.material, mode);
        }
        if self.view_mode != mode {
            self.view_mode = mode;
            self.notify(EditorEvent::ViewModeChanged(mode));
        }
    }

    pub fn set_gizmo_mode(&mut self, mode: GizmoMode) {
        if self.gizmo_mode == mode {
            return;
        }
        self.gizmo_mode = mode;
        self.helpers.retain(|h| h.kind != HelperKind::Gizmo);
        if mode != GizmoMode::None {
            let center = self.bounds().map(|b| b.center()).unwrap_or(self.group.translation);
            self.helpers.push(Helper {
                kind: HelperKind::Gizmo,
                bounds: Aabb::new(center - Vec3::splat(50.0), center + Vec3::splat(50.0)),
            });
        }
        self.notify(EditorEvent::GizmoModeChanged(mode));
    }

    /// Apply a gizmo drag to the assembly group
    ///
    /// Translate adds `delta` in millimeters, rotate applies `delta` as XYZ
    /// Euler angles in radians and scale multiplies by `1 + delta`. Returns
    /// false when no gizmo is active.
    pub fn drag_gizmo(&mut self, delta: Vec3) -> bool {
        match self.gizmo_mode {
            GizmoMode::Translate => self.group.translation += delta,
            GizmoMode::Rotate => {
                let rotation = Quat::from_euler(EulerRot::XYZ, delta.x, delta.y, delta.z);
                self.group.rotation = (rotation * self.group.rotation).normalize();
            }
            GizmoMode::Scale => {
                self.group.scale = (self.group.scale * (Vec3::ONE + delta)).max(Vec3::splat(MIN_GROUP_SCALE));
            }
            GizmoMode::None => return false,
        }
        true
    }

    /// Nearest visible part hit by a world-space ray
    pub fn pick(&self, ray: &Ray) -> Option<PickHit> {
        let matrix = self.group.matrix();
        let local = ray.transformed(&matrix.inverse())?;
        self.parts
            .iter()
            .filter(|p| p.visible)
            .filter_map(|part| {
                let t = intersect_mesh(&local, &part.mesh)?;
                let point = matrix.transform_point3(local.at(t));
                Some(PickHit {
                    part: part.id.clone(),
                    distance: point.distance(ray.origin),
                    point,
                })
            })
            .min_by(|a, b| a.distance.total_cmp(&b.distance))
    }

    /// Pick through the camera at a viewport position in pixels
    pub fn pick_at(&self, position: Vec2, viewport: Vec2) -> Option<PickHit> {
        let ray = self.camera.screen_ray(position, viewport)?;
        self.pick(&ray)
    }

    /// Select whatever is under the cursor; empty space clears the selection
    pub fn click(&mut self, position: Vec2, viewport: Vec2) -> Option<PartId> {
        let target = self.pick_at(position, viewport).map(|hit| hit.part);
        // picked ids always belong to the current part set
        let _ = self.select(target);
        self.selection.current().cloned()
    }

    /// Programmatic selection; `None` clears it
    pub fn select(&mut self, target: Option<PartId>) -> Result<SelectionChange, SceneError> {
        if let Some(id) = &target {
            if self.part(id).is_none() {
                return Err(SceneError::UnknownPart(id.clone()));
            }
        }

        let change = self.selection.transition(target);
        if change.is_noop() {
            return Ok(change);
        }

        if let Some(previous) = &change.previous {
            if let Some(part) = self.parts.iter_mut().find(|p| &p.id == previous) {
                part.outline = None;
            }
        }
        if let Some(current) = &change.current {
            if let Some(part) = self.parts.iter_mut().find(|p| &p.id == current) {
                part.outline = Some(Outline::default());
            }
            info!("Selected {}", current);
        }

        self.notify_selection(change.clone());
        Ok(change)
    }

    fn notify_selection(&self, change: SelectionChange) {
        self.notify(EditorEvent::SelectionChanged {
            previous: change.previous,
            current: change.current,
        });
    }

    fn notify(&self, event: EditorEvent) {
        if let Err(e) = self.bus.publish(event) {
            debug!("Scene event not delivered: {}", e);
        }
    }
}

impl std::fmt::Debug for Scene {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Scene")
            .field("generation", &self.generation)
            .field("parts", &self.parts.len())
            .field("selected", &self.selection.current())
            .field("view_mode", &self.view_mode)
            .field("gizmo_mode", &self.gizmo_mode)
            .finish()
    }
}
