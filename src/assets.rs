//! Shared GPU resource registry and the handles that reference it.
//!
//! Entities and materials never own GPU objects. Meshes, textures, samplers
//! and shader modules live in [`Assets`], and everything else refers to them
//! through small `Copy` handles. The registry is append-only — resources
//! stay alive for the life of the scene — so a handle that was issued by
//! this registry always resolves.

use std::path::Path;

use crate::geometry::{GeometryError, RawGeometry};
use crate::gpu::GpuContext;
use crate::material::Material;
use crate::mesh::Mesh;
use crate::texture::Texture;

/// Handle to a [`Mesh`] stored in [`Assets`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct MeshId(pub(crate) usize);

/// Handle to a [`Texture`] stored in [`Assets`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct TextureId(pub(crate) usize);

/// Handle to a `wgpu::Sampler` stored in [`Assets`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct SamplerId(pub(crate) usize);

/// Handle to a compiled shader module stored in [`Assets`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct ShaderId(pub(crate) usize);

/// Handle to a [`Material`] stored in [`Assets`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct MaterialId(pub(crate) usize);

/// Owner of every shared GPU resource in a scene.
#[derive(Default)]
pub struct Assets {
    meshes: Vec<Mesh>,
    textures: Vec<Texture>,
    samplers: Vec<wgpu::Sampler>,
    shaders: Vec<wgpu::ShaderModule>,
    materials: Vec<Material>,
}

impl Assets {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers an uploaded mesh.
    pub fn add_mesh(&mut self, mesh: Mesh) -> MeshId {
        self.meshes.push(mesh);
        MeshId(self.meshes.len() - 1)
    }

    /// Uploads and registers raw geometry.
    pub fn add_geometry(
        &mut self,
        gpu: &GpuContext,
        geometry: &RawGeometry,
    ) -> Result<MeshId, GeometryError> {
        Ok(self.add_mesh(Mesh::from_geometry(gpu, geometry)?))
    }

    /// Imports a triangulated OBJ model, uploads it and registers it.
    pub fn load_obj(
        &mut self,
        gpu: &GpuContext,
        path: impl AsRef<Path>,
    ) -> Result<MeshId, GeometryError> {
        let geometry = RawGeometry::from_obj_file(path)?;
        self.add_geometry(gpu, &geometry)
    }

    pub fn mesh(&self, id: MeshId) -> Option<&Mesh> {
        self.meshes.get(id.0)
    }

    /// Registers a texture.
    pub fn add_texture(&mut self, texture: Texture) -> TextureId {
        self.textures.push(texture);
        TextureId(self.textures.len() - 1)
    }

    pub fn texture(&self, id: TextureId) -> Option<&Texture> {
        self.textures.get(id.0)
    }

    /// Registers a sampler created from the given descriptor.
    pub fn add_sampler(&mut self, gpu: &GpuContext, desc: &wgpu::SamplerDescriptor) -> SamplerId {
        self.samplers.push(gpu.device.create_sampler(desc));
        SamplerId(self.samplers.len() - 1)
    }

    /// Registers the workhorse sampler: linear filtering, repeat addressing.
    pub fn add_linear_sampler(&mut self, gpu: &GpuContext) -> SamplerId {
        self.add_sampler(
            gpu,
            &wgpu::SamplerDescriptor {
                label: Some("Linear Repeat Sampler"),
                address_mode_u: wgpu::AddressMode::Repeat,
                address_mode_v: wgpu::AddressMode::Repeat,
                address_mode_w: wgpu::AddressMode::Repeat,
                mag_filter: wgpu::FilterMode::Linear,
                min_filter: wgpu::FilterMode::Linear,
                mipmap_filter: wgpu::FilterMode::Linear,
                ..Default::default()
            },
        )
    }

    pub fn sampler(&self, id: SamplerId) -> Option<&wgpu::Sampler> {
        self.samplers.get(id.0)
    }

    /// Compiles WGSL source into a shader module and registers it.
    pub fn load_shader(&mut self, gpu: &GpuContext, label: &str, source: &str) -> ShaderId {
        let module = gpu
            .device
            .create_shader_module(wgpu::ShaderModuleDescriptor {
                label: Some(label),
                source: wgpu::ShaderSource::Wgsl(source.into()),
            });
        self.shaders.push(module);
        ShaderId(self.shaders.len() - 1)
    }

    pub fn shader(&self, id: ShaderId) -> Option<&wgpu::ShaderModule> {
        self.shaders.get(id.0)
    }

    /// Registers a material so entities can share it by handle.
    pub fn add_material(&mut self, material: Material) -> MaterialId {
        self.materials.push(material);
        MaterialId(self.materials.len() - 1)
    }

    pub fn material(&self, id: MaterialId) -> Option<&Material> {
        self.materials.get(id.0)
    }
}
