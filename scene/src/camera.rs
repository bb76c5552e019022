//! Fly-through camera
//!
//! Euler-angle camera driven by keyboard movement, mouse look and scroll zoom.
//! Angles are stored in degrees; matrices are right-handed.

use glam::{Mat4, Vec3, Vec4};

pub const DEFAULT_YAW: f32 = -90.0;
pub const DEFAULT_PITCH: f32 = 0.0;
pub const DEFAULT_SPEED: f32 = 2.5;
pub const DEFAULT_SENSITIVITY: f32 = 0.1;
pub const DEFAULT_FOV: f32 = 45.0;

/// Near clipping plane used by the demos
pub const DEFAULT_NEAR: f32 = 0.1;
/// Far clipping plane used by the demos
pub const DEFAULT_FAR: f32 = 100.0;

const PITCH_LIMIT: f32 = 89.0;
const MIN_FOV: f32 = 1.0;
const MAX_FOV: f32 = 179.0;

/// Keyboard-driven movement directions
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CameraMovement {
    Forward,
    Backward,
    Left,
    Right,
    Upward,
    Downward,
}

/// Camera state for a first-person fly-through
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FlyCamera {
    pub position: Vec3,
    front: Vec3,
    up: Vec3,
    right: Vec3,
    pub world_up: Vec3,
    yaw: f32,
    pitch: f32,
    pub movement_speed: f32,
    pub mouse_sensitivity: f32,
    fov: f32,
}

impl Default for FlyCamera {
    fn default() -> Self {
        Self::new(Vec3::new(0.0, 0.0, 3.0))
    }
}

impl FlyCamera {
    /// Camera at `position` with default orientation, looking down -Z
    pub fn new(position: Vec3) -> Self {
        Self::with_angles(position, Vec3::Y, DEFAULT_YAW, DEFAULT_PITCH)
    }

    pub fn with_angles(position: Vec3, world_up: Vec3, yaw: f32, pitch: f32) -> Self {
        let mut camera = Self {
            position,
            front: Vec3::NEG_Z,
            up: world_up,
            right: Vec3::X,
            world_up,
            yaw,
            pitch: pitch.clamp(-PITCH_LIMIT, PITCH_LIMIT),
            movement_speed: DEFAULT_SPEED,
            mouse_sensitivity: DEFAULT_SENSITIVITY,
            fov: DEFAULT_FOV,
        };
        camera.update_vectors();
        camera
    }

    pub fn front(&self) -> Vec3 {
        self.front
    }

    pub fn up(&self) -> Vec3 {
        self.up
    }

    pub fn right(&self) -> Vec3 {
        self.right
    }

    pub fn yaw(&self) -> f32 {
        self.yaw
    }

    pub fn pitch(&self) -> f32 {
        self.pitch
    }

    /// Vertical field of view in degrees
    pub fn fov(&self) -> f32 {
        self.fov
    }

    pub fn set_fov(&mut self, fov: f32) {
        self.fov = fov.clamp(MIN_FOV, MAX_FOV);
    }

    /// Front projected onto the horizontal plane
    ///
    /// Zero when looking straight up or down.
    pub fn horizontal_front(&self) -> Vec3 {
        Vec3::new(self.front.x, 0.0, self.front.z).normalize_or_zero()
    }

    /// World-to-camera transform
    pub fn view_matrix(&self) -> Mat4 {
        Mat4::look_at_rh(self.position, self.position + self.front, self.up)
    }

    /// Same transform as [`Self::view_matrix`], assembled as rotation * translation
    pub fn look_at_matrix(&self) -> Mat4 {
        let z_axis = -self.front;
        let x_axis = self.world_up.cross(z_axis).normalize();
        let y_axis = z_axis.cross(x_axis);

        let rotation = Mat4::from_cols(
            Vec4::new(x_axis.x, y_axis.x, z_axis.x, 0.0),
            Vec4::new(x_axis.y, y_axis.y, z_axis.y, 0.0),
            Vec4::new(x_axis.z, y_axis.z, z_axis.z, 0.0),
            Vec4::W,
        );
        let translation = Mat4::from_translation(-self.position);
        rotation * translation
    }

    pub fn projection_matrix(&self, aspect_ratio: f32, near: f32, far: f32) -> Mat4 {
        Mat4::perspective_rh(self.fov.to_radians(), aspect_ratio, near, far)
    }

    /// Move along the camera axes, scaled by `movement_speed * delta_time`
    ///
    /// Forward/backward stay in the horizontal plane, up/down follow `world_up`.
    pub fn move_camera(&mut self, direction: CameraMovement, delta_time: f32) {
        let velocity = self.movement_speed * delta_time;
        let offset = match direction {
            CameraMovement::Forward => self.horizontal_front(),
            CameraMovement::Backward => -self.horizontal_front(),
            CameraMovement::Right => self.right,
            CameraMovement::Left => -self.right,
            CameraMovement::Upward => self.world_up,
            CameraMovement::Downward => -self.world_up,
        };
        self.position += offset * velocity;
    }

    pub fn process_mouse_movement(&mut self, x_offset: f32, y_offset: f32) {
        self.yaw += x_offset * self.mouse_sensitivity;
        self.pitch = (self.pitch + y_offset * self.mouse_sensitivity).clamp(-PITCH_LIMIT, PITCH_LIMIT);
        self.update_vectors();
    }

    pub fn process_mouse_scroll(&mut self, y_offset: f32) {
        self.set_fov(self.fov - y_offset);
    }

    /// Turn to face `target`; no-op if it coincides with the position
    pub fn look_at(&mut self, target: Vec3) {
        let Some(direction) = (target - self.position).try_normalize() else {
            return;
        };
        self.pitch = direction
            .y
            .clamp(-1.0, 1.0)
            .asin()
            .to_degrees()
            .clamp(-PITCH_LIMIT, PITCH_LIMIT);
        self.yaw = direction.z.atan2(direction.x).to_degrees();
        self.update_vectors();
    }

    pub fn look_at_origin(&mut self) {
        self.look_at(Vec3::ZERO);
    }

    fn update_vectors(&mut self) {
        let (yaw, pitch) = (self.yaw.to_radians(), self.pitch.to_radians());
        self.front = Vec3::new(yaw.cos() * pitch.cos(), pitch.sin(), yaw.sin() * pitch.cos()).normalize();
        self.right = self.front.cross(self.world_up).normalize();
        self.up = self.right.cross(self.front).normalize();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPS: f32 = 1e-5;

    fn assert_vec3_near(a: Vec3, b: Vec3) {
        assert!((a - b).length() < EPS, "{a:?} != {b:?}");
    }

    #[test]
    fn test_default_camera_looks_down_neg_z() {
        let camera = FlyCamera::default();
        assert_eq!(camera.position, Vec3::new(0.0, 0.0, 3.0));
        assert_vec3_near(camera.front(), Vec3::NEG_Z);
        assert_vec3_near(camera.right(), Vec3::X);
        assert_vec3_near(camera.up(), Vec3::Y);
        assert_eq!(camera.fov(), 45.0);
    }

    #[test]
    fn test_pitch_clamped() {
        let mut camera = FlyCamera::default();
        camera.process_mouse_movement(0.0, 10_000.0);
        assert_eq!(camera.pitch(), 89.0);
        camera.process_mouse_movement(0.0, -100_000.0);
        assert_eq!(camera.pitch(), -89.0);
    }

    #[test]
    fn test_mouse_movement_scaled_by_sensitivity() {
        let mut camera = FlyCamera::default();
        camera.process_mouse_movement(100.0, 50.0);
        assert!((camera.yaw() - (-80.0)).abs() < EPS);
        assert!((camera.pitch() - 5.0).abs() < EPS);
    }

    #[test]
    fn test_scroll_zoom_clamped() {
        let mut camera = FlyCamera::default();
        camera.process_mouse_scroll(5.0);
        assert_eq!(camera.fov(), 40.0);
        camera.process_mouse_scroll(500.0);
        assert_eq!(camera.fov(), 1.0);
        camera.process_mouse_scroll(-500.0);
        assert_eq!(camera.fov(), 179.0);
    }

    #[test]
    fn test_forward_stays_horizontal() {
        let mut camera = FlyCamera::default();
        camera.process_mouse_movement(0.0, 300.0); // pitch 30 degrees up
        let start = camera.position;
        camera.move_camera(CameraMovement::Forward, 1.0);
        assert!((camera.position.y - start.y).abs() < EPS);
        assert!(((camera.position - start).length() - DEFAULT_SPEED).abs() < EPS);
    }

    #[test]
    fn test_vertical_movement_uses_world_up() {
        let mut camera = FlyCamera::default();
        camera.move_camera(CameraMovement::Upward, 0.5);
        assert_vec3_near(camera.position, Vec3::new(0.0, 1.25, 3.0));
        camera.move_camera(CameraMovement::Downward, 0.5);
        camera.move_camera(CameraMovement::Right, 0.4);
        assert_vec3_near(camera.position, Vec3::new(1.0, 0.0, 3.0));
    }

    #[test]
    fn test_look_at_matrix_matches_view_matrix() {
        let mut camera = FlyCamera::new(Vec3::new(1.5, -2.0, 4.0));
        camera.process_mouse_movement(123.0, -77.0);
        let a = camera.view_matrix().to_cols_array();
        let b = camera.look_at_matrix().to_cols_array();
        for (x, y) in a.iter().zip(b.iter()) {
            assert!((x - y).abs() < 1e-4, "{a:?} != {b:?}");
        }
    }

    #[test]
    fn test_view_matrix_moves_position_to_origin() {
        let camera = FlyCamera::new(Vec3::new(2.0, 1.0, 5.0));
        let eye = camera.view_matrix().transform_point3(camera.position);
        assert_vec3_near(eye, Vec3::ZERO);
    }

    #[test]
    fn test_look_at_faces_target() {
        let mut camera = FlyCamera::new(Vec3::new(3.0, 2.0, 3.0));
        camera.look_at_origin();
        assert_vec3_near(camera.front(), Vec3::new(-3.0, -2.0, -3.0).normalize());

        // Coincident target leaves orientation untouched
        let before = camera;
        camera.look_at(camera.position);
        assert_eq!(camera, before);
    }

    #[test]
    fn test_projection_uses_fov() {
        let camera = FlyCamera::default();
        let expected = Mat4::perspective_rh(45f32.to_radians(), 800.0 / 600.0, DEFAULT_NEAR, DEFAULT_FAR);
        assert_eq!(camera.projection_matrix(800.0 / 600.0, DEFAULT_NEAR, DEFAULT_FAR), expected);
    }
}
