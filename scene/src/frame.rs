//! Per-frame mutable state
//!
//! Everything a demo's input callbacks and render loop share lives in one
//! [`FrameContext`] that the host application owns and passes around.

use glam::{Mat4, Quat, Vec3};

use crate::camera::{CameraMovement, DEFAULT_FAR, DEFAULT_NEAR, FlyCamera};

/// Window size the demos open with
pub const DEFAULT_WIDTH: u32 = 800;
pub const DEFAULT_HEIGHT: u32 = 600;

#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct FrameTiming {
    /// Timestamp of the previous frame in seconds
    pub last_frame: f32,
    /// Seconds between the previous two frames
    pub delta_time: f32,
}

impl FrameTiming {
    /// Advance to `now`, returning the new delta
    pub fn tick(&mut self, now: f32) -> f32 {
        self.delta_time = (now - self.last_frame).max(0.0);
        self.last_frame = now;
        self.delta_time
    }
}

/// Cursor tracking for mouse look
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MouseState {
    pub last_x: f32,
    pub last_y: f32,
    /// Next cursor event only primes `last_x`/`last_y`
    pub first_mouse: bool,
    /// Whether the cursor is grabbed for mouse look
    pub captured: bool,
}

impl MouseState {
    /// Centered in a `width` x `height` window, captured
    pub fn centered(width: u32, height: u32) -> Self {
        Self {
            last_x: width as f32 / 2.0,
            last_y: height as f32 / 2.0,
            first_mouse: true,
            captured: true,
        }
    }
}

impl Default for MouseState {
    fn default() -> Self {
        Self::centered(DEFAULT_WIDTH, DEFAULT_HEIGHT)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct FrameContext {
    pub camera: FlyCamera,
    pub timing: FrameTiming,
    pub mouse: MouseState,
    pub aspect_ratio: f32,
}

impl Default for FrameContext {
    fn default() -> Self {
        Self::new(FlyCamera::default(), DEFAULT_WIDTH, DEFAULT_HEIGHT)
    }
}

impl FrameContext {
    pub fn new(camera: FlyCamera, width: u32, height: u32) -> Self {
        Self {
            camera,
            timing: FrameTiming::default(),
            mouse: MouseState::centered(width, height),
            aspect_ratio: width as f32 / height.max(1) as f32,
        }
    }

    /// Start a frame at time `now` (seconds)
    pub fn begin_frame(&mut self, now: f32) -> f32 {
        self.timing.tick(now)
    }

    /// Cursor position callback
    pub fn cursor_moved(&mut self, x: f32, y: f32) {
        if !self.mouse.captured {
            return;
        }
        if self.mouse.first_mouse {
            self.mouse.last_x = x;
            self.mouse.last_y = y;
            self.mouse.first_mouse = false;
            return;
        }

        let x_offset = x - self.mouse.last_x;
        // Window y grows downward
        let y_offset = self.mouse.last_y - y;
        self.mouse.last_x = x;
        self.mouse.last_y = y;

        self.camera.process_mouse_movement(x_offset, y_offset);
    }

    pub fn scrolled(&mut self, y_offset: f32) {
        self.camera.process_mouse_scroll(y_offset);
    }

    /// Flip cursor capture; returns the new state
    ///
    /// Re-capturing starts from a fresh `first_mouse` so the camera does not
    /// jump to wherever the cursor went meanwhile.
    pub fn toggle_capture(&mut self) -> bool {
        self.mouse.captured = !self.mouse.captured;
        if !self.mouse.captured {
            self.mouse.first_mouse = true;
        }
        self.mouse.captured
    }

    /// Apply held movement keys using this frame's delta
    pub fn apply_movement(&mut self, held: &[CameraMovement]) {
        let dt = self.timing.delta_time;
        for &direction in held {
            self.camera.move_camera(direction, dt);
        }
    }

    /// Framebuffer resize; zero height (minimized) is ignored
    pub fn resized(&mut self, width: u32, height: u32) {
        if height == 0 {
            return;
        }
        self.aspect_ratio = width as f32 / height as f32;
    }

    /// `(view, projection)` for this frame
    pub fn view_projection(&self) -> (Mat4, Mat4) {
        (
            self.camera.view_matrix(),
            self.camera
                .projection_matrix(self.aspect_ratio, DEFAULT_NEAR, DEFAULT_FAR),
        )
    }
}

/// Point on a circle of `radius` around `center`, in the plane perpendicular to `axis`
///
/// `angle` is in radians; callers pass elapsed time to animate an orbit.
pub fn orbit_position(center: Vec3, radius: f32, axis: Vec3, angle: f32) -> Vec3 {
    let axis = axis.try_normalize().unwrap_or(Vec3::Y);
    let reference = if axis.dot(Vec3::X).abs() < 0.9 {
        Vec3::X
    } else {
        Vec3::Z
    };
    // Start direction in the orbit plane
    let start = (reference - axis * reference.dot(axis)).normalize();
    center + Quat::from_axis_angle(axis, angle) * start * radius
}
