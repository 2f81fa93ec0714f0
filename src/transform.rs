//! Spatial transforms with a lazily recomputed world matrix.
//!
//! Every entity owns a [`Transform`]: translation, Euler rotation and scale,
//! composed on demand into a world matrix. The composed matrix is kept in a
//! [`Cached`] slot so that entities which do not move between frames pay no
//! matrix math at all — setters only flip the cache invalid, and the matrix
//! is rebuilt the next time someone asks for it.
//!
//! # Example
//!
//! ```
//! use phalanx::Transform;
//!
//! let mut transform = Transform::new();
//! transform.set_translation(0.0, -0.5, -2.0);
//! transform.set_scale(2.0, 2.0, 2.0);
//!
//! // Recomputed here, then served from cache until the next setter call.
//! let world = transform.world_matrix();
//! ```

use glam::{EulerRot, Mat4, Quat, Vec3};

/// A cached derived value with an explicit validity tag.
///
/// Mutators of the source data call [`Cached::invalidate`]; readers call
/// [`Cached::get_or_recompute`] with the recomputation closure. The closure
/// only runs when the tag is stale.
#[derive(Clone, Copy, Debug)]
pub struct Cached<T> {
    value: T,
    valid: bool,
}

impl<T> Cached<T> {
    /// Wraps an already-valid value.
    pub fn new(value: T) -> Self {
        Self { value, valid: true }
    }

    /// Marks the cached value stale.
    pub fn invalidate(&mut self) {
        self.valid = false;
    }

    /// Whether the cached value currently reflects its sources.
    pub fn is_valid(&self) -> bool {
        self.valid
    }

    /// Returns the cached value, recomputing it first if stale.
    pub fn get_or_recompute(&mut self, recompute: impl FnOnce() -> T) -> &T {
        if !self.valid {
            self.value = recompute();
            self.valid = true;
        }
        &self.value
    }
}

/// Translation, rotation and scale for one entity, with a cached world matrix.
///
/// Rotation is stored as Euler angles in radians and applied yaw → pitch →
/// roll around the local origin. The world matrix composes scale first, then
/// rotation, then translation, so an entity is scaled and oriented in place
/// before being positioned in the world.
///
/// Matrices are column-major [`Mat4`]s, the same layout WGSL uniform buffers
/// use, so the cached matrix is uploaded to the GPU without transposition.
///
/// Setters accept any finite value; passing non-finite floats is a caller
/// bug and produces a garbage matrix rather than an error.
#[derive(Clone, Copy, Debug)]
pub struct Transform {
    translation: Vec3,
    rotation: Vec3,
    scale: Vec3,
    world: Cached<Mat4>,
}

impl Default for Transform {
    fn default() -> Self {
        Self {
            translation: Vec3::ZERO,
            rotation: Vec3::ZERO,
            scale: Vec3::ONE,
            world: Cached::new(Mat4::IDENTITY),
        }
    }
}

impl Transform {
    /// Identity transform: origin, no rotation, unit scale.
    ///
    /// Its world matrix is the identity matrix without any recomputation.
    pub fn new() -> Self {
        Self::default()
    }

    /// Overwrites the translation and invalidates the cached world matrix.
    pub fn set_translation(&mut self, x: f32, y: f32, z: f32) {
        self.translation = Vec3::new(x, y, z);
        self.world.invalidate();
    }

    /// Overwrites the Euler rotation (radians) and invalidates the cache.
    pub fn set_rotation(&mut self, x: f32, y: f32, z: f32) {
        self.rotation = Vec3::new(x, y, z);
        self.world.invalidate();
    }

    /// Overwrites the per-axis scale and invalidates the cache.
    pub fn set_scale(&mut self, x: f32, y: f32, z: f32) {
        self.scale = Vec3::new(x, y, z);
        self.world.invalidate();
    }

    /// Current translation.
    pub fn translation(&self) -> Vec3 {
        self.translation
    }

    /// Current Euler rotation in radians.
    pub fn rotation(&self) -> Vec3 {
        self.rotation
    }

    /// Current per-axis scale.
    pub fn scale(&self) -> Vec3 {
        self.scale
    }

    /// The local-to-world matrix, recomputed only if a setter ran since the
    /// last call.
    pub fn world_matrix(&mut self) -> Mat4 {
        let (translation, rotation, scale) = (self.translation, self.rotation, self.scale);
        *self
            .world
            .get_or_recompute(|| compose(translation, rotation, scale))
    }
}

/// Scale, then rotate, then translate.
fn compose(translation: Vec3, rotation: Vec3, scale: Vec3) -> Mat4 {
    let orientation = Quat::from_euler(EulerRot::YXZ, rotation.y, rotation.x, rotation.z);
    Mat4::from_scale_rotation_translation(scale, orientation, translation)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fresh_transform_is_identity() {
        let mut transform = Transform::new();
        assert_eq!(transform.world_matrix(), Mat4::IDENTITY);
    }

    #[test]
    fn world_matrix_matches_direct_composition() {
        let mut transform = Transform::new();
        transform.set_translation(1.0, 2.0, 3.0);
        transform.set_rotation(0.3, -0.7, 0.1);
        transform.set_scale(2.0, 0.5, 1.5);

        let expected = Mat4::from_scale_rotation_translation(
            Vec3::new(2.0, 0.5, 1.5),
            Quat::from_euler(EulerRot::YXZ, -0.7, 0.3, 0.1),
            Vec3::new(1.0, 2.0, 3.0),
        );
        assert!(transform.world_matrix().abs_diff_eq(expected, 1e-6));
    }

    #[test]
    fn repeated_reads_are_bit_identical() {
        let mut transform = Transform::new();
        transform.set_rotation(0.25, 1.5, -0.5);
        transform.set_translation(-4.0, 0.0, 9.0);

        let first = transform.world_matrix();
        let second = transform.world_matrix();
        assert_eq!(first.to_cols_array(), second.to_cols_array());
    }

    #[test]
    fn setter_invalidates_cache() {
        let mut transform = Transform::new();
        transform.set_translation(1.0, 0.0, 0.0);
        let before = transform.world_matrix();

        transform.set_translation(2.0, 0.0, 0.0);
        let after = transform.world_matrix();
        assert_ne!(before, after);
        assert_eq!(after.w_axis.x, 2.0);
    }

    #[test]
    fn scale_applies_before_translation() {
        let mut transform = Transform::new();
        transform.set_translation(10.0, 0.0, 0.0);
        transform.set_scale(3.0, 3.0, 3.0);

        // A point at local (1,0,0) scales to (3,0,0) and then lands at 13.
        let world = transform.world_matrix();
        let p = world.transform_point3(Vec3::X);
        assert!(p.abs_diff_eq(Vec3::new(13.0, 0.0, 0.0), 1e-6));
    }

    #[test]
    fn cached_recomputes_only_when_invalid() {
        let mut cache = Cached::new(7);
        let mut runs = 0;

        cache.get_or_recompute(|| {
            runs += 1;
            0
        });
        assert_eq!(runs, 0);

        cache.invalidate();
        assert!(!cache.is_valid());
        let value = *cache.get_or_recompute(|| {
            runs += 1;
            42
        });
        assert_eq!((value, runs), (42, 1));
        assert!(cache.is_valid());
    }
}
