//! First-person camera producing the scene's view and projection matrices.
//!
//! The camera keeps position plus accumulated yaw/pitch, and rebuilds its
//! view matrix from them on every [`Camera::update`] — the facing direction
//! depends on continuously accumulated look input, so there is nothing to
//! cache. The projection matrix is rebuilt only when the viewport changes
//! via [`Camera::set_projection`].
//!
//! All matrices are left-handed with +Z as the local forward axis and a
//! 0..1 clip-space depth range, which is what wgpu consumes. They are
//! column-major [`Mat4`]s and upload to WGSL uniforms without transposition.
//!
//! Movement and look input arrive as a [`CameraInput`] snapshot rather than
//! by polling any windowing backend, so the camera is unit-testable without
//! simulating OS key state.
//!
//! # Example
//!
//! ```
//! use phalanx::{Camera, CameraInput};
//!
//! let mut camera = Camera::new(1280, 720).unwrap();
//! let input = CameraInput {
//!     forward: true,
//!     ..Default::default()
//! };
//! camera.update(&input, 0.016);
//! ```

use glam::{EulerRot, Mat4, Quat, Vec3};
use thiserror::Error;

use crate::input::CameraInput;

/// Vertical field of view, radians.
const FOV_Y: f32 = std::f32::consts::FRAC_PI_4;
/// Near clip plane distance.
const NEAR_Z: f32 = 0.1;
/// Far clip plane distance.
const FAR_Z: f32 = 100.0;
/// Pitch stays just short of ±90° so the look-to basis never degenerates.
const PITCH_LIMIT: f32 = std::f32::consts::FRAC_PI_2 - 0.01;

/// Errors from camera construction and viewport changes.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum CameraError {
    /// The viewport has a zero dimension; a perspective matrix built from it
    /// would be non-finite.
    #[error("invalid viewport {width}x{height}: both dimensions must be nonzero")]
    InvalidViewport { width: u32, height: u32 },
}

/// A freelook camera: position + yaw/pitch in, view/projection matrices out.
///
/// One camera exists per running session. The frame driver owns it, calls
/// [`Camera::rotate`] as look input arrives, [`Camera::update`] once per
/// frame, and [`Camera::set_projection`] on every viewport resize, then
/// passes it by reference to each entity's draw preparation.
#[derive(Clone, Debug)]
pub struct Camera {
    position: Vec3,
    yaw: f32,
    pitch: f32,
    view: Mat4,
    projection: Mat4,
}

impl Camera {
    /// Creates a camera for the given viewport, at the default pose:
    /// five units behind the origin, looking down +Z.
    pub fn new(width: u32, height: u32) -> Result<Self, CameraError> {
        let position = Vec3::new(0.0, 0.0, -5.0);
        let mut camera = Self {
            position,
            yaw: 0.0,
            pitch: 0.0,
            view: Mat4::look_to_lh(position, Vec3::Z, Vec3::Y),
            projection: Mat4::IDENTITY,
        };
        camera.set_projection(width, height)?;
        Ok(camera)
    }

    /// Moves the camera to `position` (builder form).
    pub fn with_position(mut self, position: Vec3) -> Self {
        self.position = position;
        self.view = Mat4::look_to_lh(self.position, self.facing(), Vec3::Y);
        self
    }

    /// Current world-space position.
    pub fn position(&self) -> Vec3 {
        self.position
    }

    /// Accumulated yaw in radians.
    pub fn yaw(&self) -> f32 {
        self.yaw
    }

    /// Accumulated pitch in radians.
    pub fn pitch(&self) -> f32 {
        self.pitch
    }

    /// World-space facing direction derived from yaw/pitch.
    pub fn facing(&self) -> Vec3 {
        self.orientation() * Vec3::Z
    }

    /// The world-to-eye matrix as of the last [`Camera::update`].
    pub fn view_matrix(&self) -> Mat4 {
        self.view
    }

    /// The eye-to-clip matrix as of the last [`Camera::set_projection`].
    pub fn projection_matrix(&self) -> Mat4 {
        self.projection
    }

    /// Accumulates look input into yaw and pitch.
    ///
    /// The view matrix is untouched here; it picks the new angles up on the
    /// next [`Camera::update`]. Pitch is clamped just short of straight up
    /// and straight down so the view basis stays well defined; yaw is
    /// unbounded.
    pub fn rotate(&mut self, dx: f32, dy: f32) {
        self.yaw += dx;
        self.pitch = (self.pitch + dy).clamp(-PITCH_LIMIT, PITCH_LIMIT);
    }

    /// Per-frame update: rebuild the view matrix, then apply movement.
    ///
    /// The view matrix is recomputed unconditionally from the current
    /// position and orientation. Movement then displaces the position by
    /// `dt` units per second along each active direction: forward/back along
    /// the full look direction, strafing perpendicular to it, rise/fall along
    /// the world vertical. Simultaneous directions add without rescaling, so
    /// diagonal movement is faster than axial movement; opposite directions
    /// cancel exactly.
    pub fn update(&mut self, input: &CameraInput, dt: f32) {
        let orientation = self.orientation();
        let facing = orientation * Vec3::Z;
        self.view = Mat4::look_to_lh(self.position, facing, Vec3::Y);

        let side = facing.cross(Vec3::Y).normalize_or_zero();
        let mut displacement = Vec3::ZERO;
        if input.forward {
            displacement += orientation * Vec3::new(0.0, 0.0, dt);
        }
        if input.back {
            displacement += orientation * Vec3::new(0.0, 0.0, -dt);
        }
        if input.strafe_left {
            displacement += side * dt;
        }
        if input.strafe_right {
            displacement -= side * dt;
        }
        if input.up {
            displacement.y += dt;
        }
        if input.down {
            displacement.y -= dt;
        }
        self.position += displacement;
    }

    /// Rebuilds the projection matrix for a resized viewport.
    ///
    /// Uses a fixed 45° vertical field of view and 0.1 / 100.0 clip planes;
    /// only the aspect ratio varies. Calling this again with the same
    /// dimensions reproduces the projection bit for bit.
    pub fn set_projection(&mut self, width: u32, height: u32) -> Result<(), CameraError> {
        if width == 0 || height == 0 {
            return Err(CameraError::InvalidViewport { width, height });
        }
        let aspect = width as f32 / height as f32;
        self.projection = Mat4::perspective_lh(FOV_Y, aspect, NEAR_Z, FAR_Z);
        Ok(())
    }

    fn orientation(&self) -> Quat {
        Quat::from_euler(EulerRot::YXZ, self.yaw, self.pitch, 0.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn camera_at_origin() -> Camera {
        Camera::new(1280, 720).unwrap().with_position(Vec3::ZERO)
    }

    #[test]
    fn projection_is_idempotent() {
        let mut camera = Camera::new(1280, 720).unwrap();
        let first = camera.projection_matrix().to_cols_array();
        camera.set_projection(1280, 720).unwrap();
        assert_eq!(first, camera.projection_matrix().to_cols_array());
    }

    #[test]
    fn zero_height_viewport_is_rejected() {
        let mut camera = Camera::new(1280, 720).unwrap();
        let before = camera.projection_matrix();
        assert_eq!(
            camera.set_projection(1280, 0),
            Err(CameraError::InvalidViewport {
                width: 1280,
                height: 0
            })
        );
        // The previous projection survives a rejected resize.
        assert_eq!(camera.projection_matrix(), before);
    }

    #[test]
    fn forward_moves_along_z_by_dt() {
        let mut camera = camera_at_origin();
        let input = CameraInput {
            forward: true,
            ..Default::default()
        };
        camera.update(&input, 0.5);
        assert_eq!(camera.position(), Vec3::new(0.0, 0.0, 0.5));
    }

    #[test]
    fn opposite_inputs_cancel() {
        let mut camera = camera_at_origin();
        let input = CameraInput {
            forward: true,
            back: true,
            strafe_left: true,
            strafe_right: true,
            ..Default::default()
        };
        camera.update(&input, 0.25);
        assert_eq!(camera.position(), Vec3::ZERO);
    }

    #[test]
    fn zero_rotation_is_a_no_op() {
        let mut rotated = camera_at_origin();
        let mut untouched = camera_at_origin();

        rotated.rotate(0.0, 0.0);
        assert_eq!(rotated.yaw(), 0.0);
        assert_eq!(rotated.pitch(), 0.0);

        let input = CameraInput::default();
        rotated.update(&input, 0.016);
        untouched.update(&input, 0.016);
        assert_eq!(
            rotated.view_matrix().to_cols_array(),
            untouched.view_matrix().to_cols_array()
        );
    }

    #[test]
    fn rotation_takes_effect_on_next_update() {
        let mut camera = camera_at_origin();
        let input = CameraInput::default();
        camera.update(&input, 0.016);
        let before = camera.view_matrix();

        camera.rotate(0.5, 0.0);
        assert_eq!(camera.view_matrix(), before);

        camera.update(&input, 0.016);
        assert_ne!(camera.view_matrix(), before);
    }

    #[test]
    fn pitch_is_clamped_short_of_vertical() {
        let mut camera = camera_at_origin();
        camera.rotate(0.0, 10.0);
        assert!(camera.pitch() < std::f32::consts::FRAC_PI_2);
        camera.rotate(0.0, -20.0);
        assert!(camera.pitch() > -std::f32::consts::FRAC_PI_2);
    }

    #[test]
    fn strafe_is_relative_to_facing() {
        let mut camera = camera_at_origin();
        // Quarter turn to the right: facing +X, so strafing right is -Z.
        camera.rotate(std::f32::consts::FRAC_PI_2, 0.0);
        let input = CameraInput {
            strafe_right: true,
            ..Default::default()
        };
        camera.update(&input, 1.0);
        assert!(
            camera
                .position()
                .abs_diff_eq(Vec3::new(0.0, 0.0, -1.0), 1e-6)
        );
    }
}
