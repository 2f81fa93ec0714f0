//! Renderable entities: an owned transform plus mesh/material references.

use thiserror::Error;

use crate::assets::{Assets, MaterialId, MeshId};
use crate::camera::Camera;
use crate::gpu::GpuContext;
use crate::scene_pass::ScenePass;
use crate::transform::Transform;

/// Errors from entity construction.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum EntityError {
    /// The mesh handle does not resolve in the asset registry.
    #[error("mesh handle {0:?} does not resolve")]
    UnknownMesh(MeshId),
    /// The material handle does not resolve in the asset registry.
    #[error("material handle {0:?} does not resolve")]
    UnknownMaterial(MaterialId),
}

/// The vertex-stage matrix block, mirroring the shader's `EntityUniforms`
/// struct (`world`, `view`, `projection` — names are part of the contract).
#[repr(C)]
#[derive(Copy, Clone, Debug, bytemuck::Pod, bytemuck::Zeroable)]
pub(crate) struct EntityUniforms {
    world: [[f32; 4]; 4],
    view: [[f32; 4]; 4],
    projection: [[f32; 4]; 4],
}

/// One renderable object: an owned [`Transform`], non-owning mesh and
/// material handles, and the entity's slice of vertex-stage uniform state.
///
/// Both handles are validated at construction, and the uniform buffer and
/// bind group are created there too, so a constructed entity is always
/// drawable — there is no separate initialization step to forget.
///
/// Each entity owns its own uniform buffer rather than sharing one staging
/// buffer: queued buffer writes all land before the frame's submission, so
/// a shared buffer would leave every draw reading the last entity's
/// matrices.
pub struct Entity {
    /// The entity's spatial state; mutate freely between frames.
    pub transform: Transform,
    mesh: MeshId,
    material: MaterialId,
    uniform_buffer: wgpu::Buffer,
    bind_group: wgpu::BindGroup,
}

impl Entity {
    /// Creates an entity referencing an already-registered mesh and
    /// material, failing fast if either handle does not resolve.
    pub fn new(
        gpu: &GpuContext,
        pass: &ScenePass,
        assets: &Assets,
        mesh: MeshId,
        material: MaterialId,
    ) -> Result<Self, EntityError> {
        if assets.mesh(mesh).is_none() {
            return Err(EntityError::UnknownMesh(mesh));
        }
        if assets.material(material).is_none() {
            return Err(EntityError::UnknownMaterial(material));
        }

        let uniform_buffer = gpu.device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("Entity Uniforms"),
            size: std::mem::size_of::<EntityUniforms>() as u64,
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });

        let bind_group = gpu.device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("Entity Bind Group"),
            layout: pass.entity_layout(),
            entries: &[wgpu::BindGroupEntry {
                binding: 0,
                resource: uniform_buffer.as_entire_binding(),
            }],
        });

        Ok(Self {
            transform: Transform::new(),
            mesh,
            material,
            uniform_buffer,
            bind_group,
        })
    }

    /// The referenced mesh.
    pub fn mesh(&self) -> MeshId {
        self.mesh
    }

    /// The referenced material.
    pub fn material(&self) -> MaterialId {
        self.material
    }

    /// Stages everything this entity's draw call needs, in order:
    ///
    /// 1. fetch the (lazily recomputed) world matrix;
    /// 2. stage world/view/projection into the vertex-stage block;
    /// 3. commit the vertex stage with a single buffer write;
    /// 4. activate the material's pipeline and pixel-stage resources
    ///    (texture/sampler and lights) through the shared [`ScenePass`];
    /// 5. bind this entity's matrix block.
    ///
    /// The staged state stays in effect until the next entity's call
    /// overwrites it, so the caller must draw this entity's geometry before
    /// preparing another. Returns `false` if the material could not be
    /// resolved or activated (the draw should be skipped).
    pub fn prepare_draw(
        &mut self,
        gpu: &GpuContext,
        pass: &mut ScenePass,
        render_pass: &mut wgpu::RenderPass,
        assets: &Assets,
        camera: &Camera,
    ) -> bool {
        let uniforms = EntityUniforms {
            world: self.transform.world_matrix().to_cols_array_2d(),
            view: camera.view_matrix().to_cols_array_2d(),
            projection: camera.projection_matrix().to_cols_array_2d(),
        };
        gpu.queue
            .write_buffer(&self.uniform_buffer, 0, bytemuck::bytes_of(&uniforms));

        let Some(material) = assets.material(self.material) else {
            log::warn!(
                "material {:?} does not resolve, skipping draw",
                self.material
            );
            return false;
        };
        if !pass.activate(gpu, render_pass, assets, self.material, material) {
            return false;
        }
        render_pass.set_bind_group(0, &self.bind_group, &[]);
        true
    }
}
