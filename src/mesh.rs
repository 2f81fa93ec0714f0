//! The vertex format and GPU-resident mesh geometry.

use wgpu::util::DeviceExt;

use crate::geometry::{GeometryError, RawGeometry};
use crate::gpu::GpuContext;

/// A mesh vertex: position, normal and texture coordinates.
///
/// The layout matches the shader's vertex input contract: 32 bytes per
/// vertex, position at location 0, normal at location 1, uv at location 2.
/// `#[repr(C)]` plus the bytemuck derives make the slice directly uploadable.
#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct Vertex3d {
    pub position: [f32; 3],
    pub normal: [f32; 3],
    pub uv: [f32; 2],
}

impl Vertex3d {
    /// The wgpu vertex buffer layout for this vertex type.
    pub const LAYOUT: wgpu::VertexBufferLayout<'static> = wgpu::VertexBufferLayout {
        array_stride: std::mem::size_of::<Vertex3d>() as u64,
        step_mode: wgpu::VertexStepMode::Vertex,
        attributes: &[
            // position
            wgpu::VertexAttribute {
                offset: 0,
                shader_location: 0,
                format: wgpu::VertexFormat::Float32x3,
            },
            // normal
            wgpu::VertexAttribute {
                offset: 12,
                shader_location: 1,
                format: wgpu::VertexFormat::Float32x3,
            },
            // uv
            wgpu::VertexAttribute {
                offset: 24,
                shader_location: 2,
                format: wgpu::VertexFormat::Float32x2,
            },
        ],
    };

    pub fn new(position: [f32; 3], normal: [f32; 3], uv: [f32; 2]) -> Self {
        Self {
            position,
            normal,
            uv,
        }
    }
}

/// GPU-resident triangle geometry: a vertex buffer, an index buffer and the
/// index count for the draw call.
///
/// Construction validates the source arrays (see
/// [`RawGeometry::validate`]) and fails fast on empty or out-of-range data;
/// a `Mesh` that exists is always drawable. Meshes are immutable after
/// creation and are shared between entities through
/// [`MeshId`](crate::MeshId) handles.
#[derive(Debug)]
pub struct Mesh {
    pub(crate) vertex_buffer: wgpu::Buffer,
    pub(crate) index_buffer: wgpu::Buffer,
    index_count: u32,
}

impl Mesh {
    /// Uploads validated vertex/index data to GPU buffers.
    pub fn new(
        gpu: &GpuContext,
        vertices: &[Vertex3d],
        indices: &[u32],
    ) -> Result<Self, GeometryError> {
        let geometry = RawGeometry::new(vertices.to_vec(), indices.to_vec());
        Self::from_geometry(gpu, &geometry)
    }

    /// Uploads an already-assembled [`RawGeometry`].
    pub fn from_geometry(gpu: &GpuContext, geometry: &RawGeometry) -> Result<Self, GeometryError> {
        geometry.validate()?;

        let vertex_buffer = gpu
            .device
            .create_buffer_init(&wgpu::util::BufferInitDescriptor {
                label: Some("Mesh Vertex Buffer"),
                contents: bytemuck::cast_slice(&geometry.vertices),
                usage: wgpu::BufferUsages::VERTEX,
            });

        let index_buffer = gpu
            .device
            .create_buffer_init(&wgpu::util::BufferInitDescriptor {
                label: Some("Mesh Index Buffer"),
                contents: bytemuck::cast_slice(&geometry.indices),
                usage: wgpu::BufferUsages::INDEX,
            });

        Ok(Self {
            vertex_buffer,
            index_buffer,
            index_count: geometry.indices.len() as u32,
        })
    }

    /// Number of indices consumed by one draw of this mesh.
    pub fn index_count(&self) -> u32 {
        self.index_count
    }
}
