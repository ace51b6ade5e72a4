use crate::picking::Ray;
use glam::{Mat4, Vec2, Vec3};

/// Orbit camera around a target point, Y up
#[derive(Debug, Clone, Copy)]
pub struct Camera {
    pub target: Vec3,
    pub distance: f32,
    pub yaw: f32,   // radians
    pub pitch: f32, // radians
    pub fov: f32,   // degrees
    pub aspect_ratio: f32,
    pub near: f32,
    pub far: f32,
    pub min_distance: f32,
    pub max_distance: f32,
}

impl Default for Camera {
    fn default() -> Self {
        Self {
            target: Vec3::ZERO,
            distance: 1000.0,
            yaw: 0.0,
            pitch: 0.0,
            fov: 45.0,
            aspect_ratio: 1.0,
            near: 1.0,
            far: 20000.0,
            min_distance: 10.0,
            max_distance: 20000.0,
        }
    }
}

impl Camera {
    pub fn new(target: Vec3, distance: f32) -> Self {
        Self {
            target,
            distance,
            ..Default::default()
        }
    }

    pub fn update_aspect_ratio(&mut self, width: f32, height: f32) {
        if height > 0.0 {
            self.aspect_ratio = width / height;
        }
    }

    pub fn orbit(&mut self, delta_yaw: f32, delta_pitch: f32) {
        self.yaw += delta_yaw;
        self.pitch += delta_pitch;

        let limit = 89.0f32.to_radians();
        self.pitch = self.pitch.clamp(-limit, limit);
    }

    pub fn zoom(&mut self, delta: f32) {
        self.distance -= delta;
        self.distance = self.distance.clamp(self.min_distance, self.max_distance);
    }

    pub fn pan(&mut self, delta_x: f32, delta_y: f32) {
        let forward = (self.target - self.get_eye_position()).normalize();
        let cam_right = forward.cross(Vec3::Y).normalize();
        let cam_up = cam_right.cross(forward).normalize();

        let scale = self.distance * 0.001;
        self.target -= cam_right * delta_x * scale;
        self.target += cam_up * delta_y * scale;
    }

    /// Unit vector from the target towards the eye
    fn offset_dir(&self) -> Vec3 {
        let (sin_yaw, cos_yaw) = self.yaw.sin_cos();
        let (sin_pitch, cos_pitch) = self.pitch.sin_cos();
        // yaw = pitch = 0 looks down -Z onto the frame plane
        Vec3::new(cos_pitch * sin_yaw, sin_pitch, cos_pitch * cos_yaw)
    }

    pub fn get_eye_position(&self) -> Vec3 {
        self.target + self.offset_dir() * self.distance
    }

    pub fn get_view_matrix(&self) -> Mat4 {
        Mat4::look_at_rh(self.get_eye_position(), self.target, Vec3::Y)
    }

    pub fn set_view(&mut self, yaw_deg: f32, pitch_deg: f32) {
        self.yaw = yaw_deg.to_radians();
        self.pitch = pitch_deg.to_radians();
    }

    pub fn get_projection_matrix(&self) -> Mat4 {
        Mat4::perspective_rh(
            self.fov.to_radians(),
            self.aspect_ratio,
            self.near,
            self.far,
        )
    }

    /// Frame the box so the whole of it stays in view
    pub fn fit_to_bounds(&mut self, min: Vec3, max: Vec3) {
        let center = (min + max) * 0.5;
        let max_dim = (max - min).max_element();

        self.target = center;

        // 1.2 leaves a margin around the largest dimension
        let fov_rad = self.fov.to_radians();
        let distance = (max_dim * 1.2) / (fov_rad / 2.0).tan();

        if distance > self.max_distance {
            self.max_distance = distance;
        }
        self.far = self.far.max(distance + max_dim * 4.0);
        self.distance = distance.clamp(self.min_distance, self.max_distance);
    }

    /// Ray through a viewport position given in pixels from the top-left corner
    pub fn screen_ray(&self, position: Vec2, viewport: Vec2) -> Option<Ray> {
        if viewport.x <= 0.0 || viewport.y <= 0.0 {
            return None;
        }
        let ndc = Vec2::new(
            2.0 * position.x / viewport.x - 1.0,
            1.0 - 2.0 * position.y / viewport.y,
        );

        let inverse = (self.get_projection_matrix() * self.get_view_matrix()).inverse();
        // perspective_rh maps depth to 0..1
        let unproject = |depth: f32| {
            let p = inverse * ndc.extend(depth).extend(1.0);
            p.truncate() / p.w
        };
        let near = unproject(0.0);
        let far = unproject(1.0);

        Ray::new(near, far - near)
    }
}
