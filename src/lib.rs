//! # Phalanx
//!
//! **A minimal real-time 3D scene renderer.**
//!
//! A flat list of entities, each with an independent transform, viewed by
//! one freelook camera, drawn with shared materials. The interesting parts
//! are deliberately small and testable:
//!
//! - [`Transform`] composes translation/rotation/scale into a world matrix
//!   behind a dirty-flag cache, so unmoved entities cost no matrix math.
//! - [`Camera`] turns position + yaw/pitch into view and projection
//!   matrices, consuming a [`CameraInput`] snapshot instead of polling the
//!   OS.
//! - [`Material`] immutably binds a shader pair with texture/sampler
//!   handles; [`Entity::prepare_draw`] stages matrices and resources into
//!   the shared [`ScenePass`] pipeline state, one entity at a time.
//!
//! ## Quick start
//!
//! ```no_run
//! use phalanx::*;
//!
//! fn main() -> anyhow::Result<()> {
//!     phalanx::run("spinning cube", |ctx| {
//!         let shader = ctx.assets.load_shader(ctx.gpu, "entity", ENTITY_SHADER);
//!         let material = ctx.assets.add_material(Material::new(shader, shader));
//!         let cube = ctx.assets.add_geometry(ctx.gpu, &RawGeometry::cube())?;
//!
//!         let entity = Entity::new(ctx.gpu, ctx.pass, ctx.assets, cube, material)?;
//!         let camera = Camera::new(ctx.gpu.width(), ctx.gpu.height())?;
//!
//!         Ok(Scene {
//!             camera,
//!             entities: vec![entity],
//!             update: Some(Box::new(|entities, _dt, elapsed| {
//!                 entities[0].transform.set_rotation(0.0, elapsed, 0.0);
//!             })),
//!         })
//!     })
//! }
//! ```
//!
//! ## Conventions
//!
//! Left-handed coordinates, +Z forward, +Y up, 0..1 clip depth. Matrices
//! are column-major [`Mat4`]s end to end and upload to WGSL uniforms
//! without transposition. World matrices apply scale, then rotation, then
//! translation.

mod app;
mod assets;
mod camera;
mod entity;
mod geometry;
mod gpu;
mod input;
mod material;
mod mesh;
mod scene_pass;
mod texture;
mod transform;

pub use app::{Scene, SceneContext, UpdateFn, run};
pub use assets::{Assets, MaterialId, MeshId, SamplerId, ShaderId, TextureId};
pub use camera::{Camera, CameraError};
pub use entity::{Entity, EntityError};
pub use geometry::{GeometryError, RawGeometry};
pub use gpu::GpuContext;
pub use input::{CameraInput, Input};
pub use material::Material;
pub use mesh::{Mesh, Vertex3d};
pub use scene_pass::{DirectionalLight, ENTITY_SHADER, ScenePass};
pub use texture::Texture;
pub use transform::{Cached, Transform};

// Re-export glam math types for convenience
pub use glam::{Mat4, Quat, Vec2, Vec3, Vec4};

// Re-export commonly used winit types for convenience
pub use winit::event::MouseButton;
pub use winit::keyboard::KeyCode;
