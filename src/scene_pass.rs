//! The shared pipeline-state context entities draw through.
//!
//! [`ScenePass`] owns everything the draw loop mutates between entities:
//! the bind group layouts for the three resource groups, the pixel-stage
//! light uniforms, a pipeline cache keyed by material shader pair, the
//! per-material texture/sampler bind groups, the default white texture for
//! untextured materials, and the depth buffer.
//!
//! The pass is deliberately passed around by `&mut`: whatever the last
//! entity's [`prepare_draw`](crate::Entity::prepare_draw) staged stays in
//! effect until the next entity overwrites it, so entities must be prepared
//! and drawn strictly one at a time. [`ScenePass::render`] is that
//! sequential loop.
//!
//! # Shader contract
//!
//! The bind group layout mirrors [`ENTITY_SHADER`]:
//!
//! | group | stage  | contents |
//! |-------|--------|----------|
//! | 0     | vertex | `world`, `view`, `projection` matrices |
//! | 1     | pixel  | `light_1`, `light_2` directional lights |
//! | 2     | pixel  | diffuse texture + sampler |
//!
//! The field names are part of the CPU/shader contract and must match
//! exactly; custom shaders registered with
//! [`Assets::load_shader`](crate::Assets::load_shader) are expected to
//! declare the same uniform structure.

use std::collections::HashMap;

use crate::assets::{Assets, MaterialId, ShaderId};
use crate::camera::Camera;
use crate::entity::Entity;
use crate::gpu::GpuContext;
use crate::material::Material;
use crate::mesh::Vertex3d;
use crate::texture::Texture;

/// WGSL source of the built-in entity shader.
pub const ENTITY_SHADER: &str = include_str!("shaders/entity.wgsl");

/// One directional light, laid out to match the shader's
/// `DirectionalLight` uniform struct (48 bytes, vec3 padded to 16).
#[repr(C)]
#[derive(Copy, Clone, Debug, bytemuck::Pod, bytemuck::Zeroable)]
pub struct DirectionalLight {
    pub ambient_color: [f32; 4],
    pub diffuse_color: [f32; 4],
    pub direction: [f32; 3],
    _padding: f32,
}

impl DirectionalLight {
    pub fn new(ambient_color: [f32; 4], diffuse_color: [f32; 4], direction: [f32; 3]) -> Self {
        Self {
            ambient_color,
            diffuse_color,
            direction,
            _padding: 0.0,
        }
    }
}

/// The `light_1`/`light_2` pixel-stage uniform block.
#[repr(C)]
#[derive(Copy, Clone, bytemuck::Pod, bytemuck::Zeroable)]
struct LightUniforms {
    light_1: DirectionalLight,
    light_2: DirectionalLight,
}

/// Shared mutable pipeline state for the scene's draw loop.
pub struct ScenePass {
    entity_layout: wgpu::BindGroupLayout,
    lights_layout: wgpu::BindGroupLayout,
    texture_layout: wgpu::BindGroupLayout,
    lights_buffer: wgpu::Buffer,
    lights_bind_group: wgpu::BindGroup,
    lights: [DirectionalLight; 2],
    pipelines: HashMap<(ShaderId, ShaderId), wgpu::RenderPipeline>,
    material_bind_groups: HashMap<MaterialId, wgpu::BindGroup>,
    default_texture: Texture,
    default_sampler: wgpu::Sampler,
    depth_view: wgpu::TextureView,
    depth_size: (u32, u32),
}

impl ScenePass {
    pub fn new(gpu: &GpuContext) -> Self {
        let device = &gpu.device;

        // Group 0: the per-entity matrix block, vertex stage only.
        let entity_layout = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("Entity Bind Group Layout"),
            entries: &[wgpu::BindGroupLayoutEntry {
                binding: 0,
                visibility: wgpu::ShaderStages::VERTEX,
                ty: wgpu::BindingType::Buffer {
                    ty: wgpu::BufferBindingType::Uniform,
                    has_dynamic_offset: false,
                    min_binding_size: None,
                },
                count: None,
            }],
        });

        // Group 1: the light descriptors, pixel stage only.
        let lights_layout = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("Lights Bind Group Layout"),
            entries: &[wgpu::BindGroupLayoutEntry {
                binding: 0,
                visibility: wgpu::ShaderStages::FRAGMENT,
                ty: wgpu::BindingType::Buffer {
                    ty: wgpu::BufferBindingType::Uniform,
                    has_dynamic_offset: false,
                    min_binding_size: None,
                },
                count: None,
            }],
        });

        // Group 2: diffuse texture + sampler, pixel stage only.
        let texture_layout = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("Material Texture Bind Group Layout"),
            entries: &[
                wgpu::BindGroupLayoutEntry {
                    binding: 0,
                    visibility: wgpu::ShaderStages::FRAGMENT,
                    ty: wgpu::BindingType::Texture {
                        sample_type: wgpu::TextureSampleType::Float { filterable: true },
                        view_dimension: wgpu::TextureViewDimension::D2,
                        multisampled: false,
                    },
                    count: None,
                },
                wgpu::BindGroupLayoutEntry {
                    binding: 1,
                    visibility: wgpu::ShaderStages::FRAGMENT,
                    ty: wgpu::BindingType::Sampler(wgpu::SamplerBindingType::Filtering),
                    count: None,
                },
            ],
        });

        let lights_buffer = device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("Light Uniforms"),
            size: std::mem::size_of::<LightUniforms>() as u64,
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });

        let lights_bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("Lights Bind Group"),
            layout: &lights_layout,
            entries: &[wgpu::BindGroupEntry {
                binding: 0,
                resource: lights_buffer.as_entire_binding(),
            }],
        });

        let default_texture = Texture::solid(gpu, [255, 255, 255, 255], "Default White Texture");
        let default_sampler = device.create_sampler(&wgpu::SamplerDescriptor {
            label: Some("Default Sampler"),
            address_mode_u: wgpu::AddressMode::Repeat,
            address_mode_v: wgpu::AddressMode::Repeat,
            address_mode_w: wgpu::AddressMode::Repeat,
            mag_filter: wgpu::FilterMode::Linear,
            min_filter: wgpu::FilterMode::Linear,
            mipmap_filter: wgpu::FilterMode::Linear,
            ..Default::default()
        });

        let depth_view = Self::create_depth_view(gpu);

        Self {
            entity_layout,
            lights_layout,
            texture_layout,
            lights_buffer,
            lights_bind_group,
            lights: [
                DirectionalLight::new([0.1, 0.1, 0.1, 1.0], [0.0, 0.0, 1.0, 1.0], [1.0, -1.0, 0.0]),
                DirectionalLight::new([0.1, 0.1, 0.1, 1.0], [1.0, 0.0, 0.0, 1.0], [-1.0, 1.0, 0.0]),
            ],
            pipelines: HashMap::new(),
            material_bind_groups: HashMap::new(),
            default_texture,
            default_sampler,
            depth_view,
            depth_size: (gpu.width(), gpu.height()),
        }
    }

    /// Replaces the two scene lights; committed at the next frame's render.
    pub fn set_lights(&mut self, light_1: DirectionalLight, light_2: DirectionalLight) {
        self.lights = [light_1, light_2];
    }

    pub(crate) fn entity_layout(&self) -> &wgpu::BindGroupLayout {
        &self.entity_layout
    }

    /// View of the depth buffer, for the frame driver's render pass.
    pub fn depth_view(&self) -> &wgpu::TextureView {
        &self.depth_view
    }

    fn create_depth_view(gpu: &GpuContext) -> wgpu::TextureView {
        let texture = gpu.device.create_texture(&wgpu::TextureDescriptor {
            label: Some("Depth Texture"),
            size: wgpu::Extent3d {
                width: gpu.width(),
                height: gpu.height(),
                depth_or_array_layers: 1,
            },
            mip_level_count: 1,
            sample_count: 1,
            dimension: wgpu::TextureDimension::D2,
            format: wgpu::TextureFormat::Depth32Float,
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
            view_formats: &[],
        });
        texture.create_view(&wgpu::TextureViewDescriptor::default())
    }

    /// Recreates the depth buffer if the surface has been resized.
    pub fn ensure_depth_size(&mut self, gpu: &GpuContext) {
        if self.depth_size != (gpu.width(), gpu.height()) {
            self.depth_view = Self::create_depth_view(gpu);
            self.depth_size = (gpu.width(), gpu.height());
        }
    }

    /// Activates the pipeline state for `material`: the render pipeline for
    /// its shader pair plus the pixel-stage light and texture groups.
    ///
    /// Whatever was active for the previous entity is overwritten; nothing
    /// is reset afterwards. Returns `false` (after logging) if the
    /// material's shader handles do not resolve.
    pub(crate) fn activate(
        &mut self,
        gpu: &GpuContext,
        render_pass: &mut wgpu::RenderPass,
        assets: &Assets,
        material_id: MaterialId,
        material: &Material,
    ) -> bool {
        let pair = material.shader_pair();
        if !self.ensure_pipeline(gpu, assets, pair) {
            return false;
        }
        self.ensure_material_bind_group(gpu, assets, material_id, material);

        let (Some(pipeline), Some(textures)) = (
            self.pipelines.get(&pair),
            self.material_bind_groups.get(&material_id),
        ) else {
            return false;
        };
        render_pass.set_pipeline(pipeline);
        render_pass.set_bind_group(1, &self.lights_bind_group, &[]);
        render_pass.set_bind_group(2, textures, &[]);
        true
    }

    fn ensure_pipeline(
        &mut self,
        gpu: &GpuContext,
        assets: &Assets,
        pair: (ShaderId, ShaderId),
    ) -> bool {
        if self.pipelines.contains_key(&pair) {
            return true;
        }
        let (Some(vertex_shader), Some(pixel_shader)) =
            (assets.shader(pair.0), assets.shader(pair.1))
        else {
            log::warn!("shader pair {pair:?} does not resolve, skipping draw");
            return false;
        };

        let layout = gpu
            .device
            .create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
                label: Some("Scene Pipeline Layout"),
                bind_group_layouts: &[
                    &self.entity_layout,
                    &self.lights_layout,
                    &self.texture_layout,
                ],
                push_constant_ranges: &[],
            });

        let pipeline = gpu
            .device
            .create_render_pipeline(&wgpu::RenderPipelineDescriptor {
                label: Some("Scene Pipeline"),
                layout: Some(&layout),
                vertex: wgpu::VertexState {
                    module: vertex_shader,
                    entry_point: Some("vs"),
                    buffers: &[Vertex3d::LAYOUT],
                    compilation_options: Default::default(),
                },
                fragment: Some(wgpu::FragmentState {
                    module: pixel_shader,
                    entry_point: Some("fs"),
                    targets: &[Some(wgpu::ColorTargetState {
                        format: gpu.config.format,
                        blend: Some(wgpu::BlendState::ALPHA_BLENDING),
                        write_mask: wgpu::ColorWrites::ALL,
                    })],
                    compilation_options: Default::default(),
                }),
                primitive: wgpu::PrimitiveState {
                    topology: wgpu::PrimitiveTopology::TriangleList,
                    // The left-handed view flips the on-screen winding of
                    // outward (CCW-authored) faces.
                    front_face: wgpu::FrontFace::Cw,
                    cull_mode: Some(wgpu::Face::Back),
                    ..Default::default()
                },
                depth_stencil: Some(wgpu::DepthStencilState {
                    format: wgpu::TextureFormat::Depth32Float,
                    depth_write_enabled: true,
                    depth_compare: wgpu::CompareFunction::Less,
                    stencil: wgpu::StencilState::default(),
                    bias: wgpu::DepthBiasState::default(),
                }),
                multisample: wgpu::MultisampleState::default(),
                multiview: None,
                cache: None,
            });

        log::debug!("built pipeline for shader pair {pair:?}");
        self.pipelines.insert(pair, pipeline);
        true
    }

    fn ensure_material_bind_group(
        &mut self,
        gpu: &GpuContext,
        assets: &Assets,
        material_id: MaterialId,
        material: &Material,
    ) {
        if self.material_bind_groups.contains_key(&material_id) {
            return;
        }
        let view = material
            .texture()
            .and_then(|id| assets.texture(id))
            .map(|texture| &texture.view)
            .unwrap_or(&self.default_texture.view);
        let sampler = material
            .sampler()
            .and_then(|id| assets.sampler(id))
            .unwrap_or(&self.default_sampler);

        let bind_group = gpu.device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("Material Texture Bind Group"),
            layout: &self.texture_layout,
            entries: &[
                wgpu::BindGroupEntry {
                    binding: 0,
                    resource: wgpu::BindingResource::TextureView(view),
                },
                wgpu::BindGroupEntry {
                    binding: 1,
                    resource: wgpu::BindingResource::Sampler(sampler),
                },
            ],
        });
        self.material_bind_groups.insert(material_id, bind_group);
    }

    /// Draws every entity, strictly sequentially.
    ///
    /// The pixel-stage light uniforms are committed once up front (a single
    /// buffer write for the whole stage), then each entity is prepared and
    /// immediately drawn before the next one touches the shared state.
    pub fn render(
        &mut self,
        gpu: &GpuContext,
        render_pass: &mut wgpu::RenderPass,
        camera: &Camera,
        assets: &Assets,
        entities: &mut [Entity],
    ) {
        if entities.is_empty() {
            return;
        }

        let lights = LightUniforms {
            light_1: self.lights[0],
            light_2: self.lights[1],
        };
        gpu.queue
            .write_buffer(&self.lights_buffer, 0, bytemuck::bytes_of(&lights));

        for entity in entities {
            if !entity.prepare_draw(gpu, self, render_pass, assets, camera) {
                continue;
            }
            let Some(mesh) = assets.mesh(entity.mesh()) else {
                log::warn!("mesh {:?} does not resolve, skipping draw", entity.mesh());
                continue;
            };
            render_pass.set_vertex_buffer(0, mesh.vertex_buffer.slice(..));
            render_pass.set_index_buffer(mesh.index_buffer.slice(..), wgpu::IndexFormat::Uint32);
            render_pass.draw_indexed(0..mesh.index_count(), 0, 0..1);
        }
    }
}
