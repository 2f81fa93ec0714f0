//! CPU-side geometry: validation and model import.
//!
//! [`RawGeometry`] is the intermediate representation between a model source
//! (inline vertex data or a triangulated OBJ file) and a GPU-resident
//! [`Mesh`](crate::Mesh). Validation happens here, before any GPU upload:
//! empty vertex or index arrays and indices that point past the vertex array
//! are construction errors, never silently clamped.
//!
//! OBJ import goes through `tobj` with triangulation and single-indexing
//! enabled, so every supported file arrives as plain vertex/index arrays.
//! Files without normals get area-weighted face normals reconstructed.

use std::io::BufRead;
use std::path::Path;

use glam::Vec3;
use thiserror::Error;

use crate::mesh::Vertex3d;

/// Errors raised while importing or validating geometry.
#[derive(Debug, Error)]
pub enum GeometryError {
    /// Model file could not be read.
    #[error("failed to read model file")]
    Io(#[from] std::io::Error),
    /// OBJ data could not be parsed.
    #[error("failed to parse OBJ model")]
    Obj(#[from] tobj::LoadError),
    /// The vertex array is empty.
    #[error("geometry has no vertices")]
    NoVertices,
    /// The index array is empty.
    #[error("geometry has no indices")]
    NoIndices,
    /// An index references a vertex past the end of the vertex array.
    #[error("index {index} out of range for {vertex_count} vertices")]
    IndexOutOfRange { index: u32, vertex_count: usize },
}

/// Vertex/index arrays not yet uploaded to the GPU.
#[derive(Clone, Debug, Default)]
pub struct RawGeometry {
    pub vertices: Vec<Vertex3d>,
    pub indices: Vec<u32>,
}

impl RawGeometry {
    pub fn new(vertices: Vec<Vertex3d>, indices: Vec<u32>) -> Self {
        Self { vertices, indices }
    }

    /// Rejects geometry a draw call could not consume.
    pub fn validate(&self) -> Result<(), GeometryError> {
        if self.vertices.is_empty() {
            return Err(GeometryError::NoVertices);
        }
        if self.indices.is_empty() {
            return Err(GeometryError::NoIndices);
        }
        let vertex_count = self.vertices.len();
        for &index in &self.indices {
            if index as usize >= vertex_count {
                return Err(GeometryError::IndexOutOfRange {
                    index,
                    vertex_count,
                });
            }
        }
        Ok(())
    }

    /// Imports a triangulated OBJ model from disk.
    ///
    /// Multiple objects in the file are merged into one geometry. Material
    /// references are ignored; materials in this renderer are assigned per
    /// entity, not per model file.
    pub fn from_obj_file(path: impl AsRef<Path>) -> Result<Self, GeometryError> {
        let path = path.as_ref();
        let (models, _materials) = tobj::load_obj(path, &tobj::GPU_LOAD_OPTIONS)?;
        let geometry = Self::from_models(models)?;
        log::info!(
            "loaded {}: {} vertices, {} triangles",
            path.display(),
            geometry.vertices.len(),
            geometry.indices.len() / 3
        );
        Ok(geometry)
    }

    /// Imports a triangulated OBJ model from in-memory bytes.
    pub fn from_obj_bytes(bytes: &[u8]) -> Result<Self, GeometryError> {
        let mut reader = std::io::BufReader::new(bytes);
        Self::from_obj_reader(&mut reader)
    }

    fn from_obj_reader(reader: &mut impl BufRead) -> Result<Self, GeometryError> {
        let (models, _materials) = tobj::load_obj_buf(reader, &tobj::GPU_LOAD_OPTIONS, |_| {
            // Inline material libraries are not resolved.
            Ok((Vec::new(), Default::default()))
        })?;
        Self::from_models(models)
    }

    fn from_models(models: Vec<tobj::Model>) -> Result<Self, GeometryError> {
        let mut merged = Self::default();
        for model in models {
            let mesh = model.mesh;
            let vertex_count = mesh.positions.len() / 3;
            let mut part = Self {
                vertices: Vec::with_capacity(vertex_count),
                indices: mesh.indices,
            };
            for i in 0..vertex_count {
                let normal = if mesh.normals.is_empty() {
                    [0.0; 3]
                } else {
                    [
                        mesh.normals[i * 3],
                        mesh.normals[i * 3 + 1],
                        mesh.normals[i * 3 + 2],
                    ]
                };
                let uv = if mesh.texcoords.is_empty() {
                    [0.0; 2]
                } else {
                    [mesh.texcoords[i * 2], mesh.texcoords[i * 2 + 1]]
                };
                part.vertices.push(Vertex3d::new(
                    [
                        mesh.positions[i * 3],
                        mesh.positions[i * 3 + 1],
                        mesh.positions[i * 3 + 2],
                    ],
                    normal,
                    uv,
                ));
            }
            if mesh.normals.is_empty() {
                log::debug!("model '{}' has no normals, reconstructing", model.name);
                part.compute_normals();
            }
            merged.merge(part);
        }
        merged.validate()?;
        Ok(merged)
    }

    /// Appends another geometry, offsetting its indices.
    pub fn merge(&mut self, other: RawGeometry) {
        let offset = self.vertices.len() as u32;
        self.vertices.extend(other.vertices);
        self.indices.extend(other.indices.iter().map(|i| i + offset));
    }

    /// Replaces the vertex normals with area-weighted face normals.
    ///
    /// Each triangle's unnormalized cross product is accumulated into its
    /// three vertices, so larger faces contribute more, then every vertex
    /// normal is normalized. Degenerate triangles contribute nothing.
    pub fn compute_normals(&mut self) {
        let mut accumulated = vec![Vec3::ZERO; self.vertices.len()];
        for triangle in self.indices.chunks_exact(3) {
            let [i0, i1, i2] = [
                triangle[0] as usize,
                triangle[1] as usize,
                triangle[2] as usize,
            ];
            let v0 = Vec3::from_array(self.vertices[i0].position);
            let v1 = Vec3::from_array(self.vertices[i1].position);
            let v2 = Vec3::from_array(self.vertices[i2].position);
            let face = (v1 - v0).cross(v2 - v0);
            accumulated[i0] += face;
            accumulated[i1] += face;
            accumulated[i2] += face;
        }
        for (vertex, normal) in self.vertices.iter_mut().zip(accumulated) {
            vertex.normal = normal.normalize_or_zero().to_array();
        }
    }

    /// A unit cube centered at the origin, four vertices per face so each
    /// face carries its own flat normal and full UV range.
    pub fn cube() -> Self {
        #[rustfmt::skip]
        let vertices = vec![
            // Front face (Z+)
            Vertex3d::new([-0.5, -0.5,  0.5], [ 0.0,  0.0,  1.0], [0.0, 0.0]),
            Vertex3d::new([ 0.5, -0.5,  0.5], [ 0.0,  0.0,  1.0], [1.0, 0.0]),
            Vertex3d::new([ 0.5,  0.5,  0.5], [ 0.0,  0.0,  1.0], [1.0, 1.0]),
            Vertex3d::new([-0.5,  0.5,  0.5], [ 0.0,  0.0,  1.0], [0.0, 1.0]),
            // Back face (Z-)
            Vertex3d::new([ 0.5, -0.5, -0.5], [ 0.0,  0.0, -1.0], [0.0, 0.0]),
            Vertex3d::new([-0.5, -0.5, -0.5], [ 0.0,  0.0, -1.0], [1.0, 0.0]),
            Vertex3d::new([-0.5,  0.5, -0.5], [ 0.0,  0.0, -1.0], [1.0, 1.0]),
            Vertex3d::new([ 0.5,  0.5, -0.5], [ 0.0,  0.0, -1.0], [0.0, 1.0]),
            // Top face (Y+)
            Vertex3d::new([-0.5,  0.5,  0.5], [ 0.0,  1.0,  0.0], [0.0, 0.0]),
            Vertex3d::new([ 0.5,  0.5,  0.5], [ 0.0,  1.0,  0.0], [1.0, 0.0]),
            Vertex3d::new([ 0.5,  0.5, -0.5], [ 0.0,  1.0,  0.0], [1.0, 1.0]),
            Vertex3d::new([-0.5,  0.5, -0.5], [ 0.0,  1.0,  0.0], [0.0, 1.0]),
            // Bottom face (Y-)
            Vertex3d::new([-0.5, -0.5, -0.5], [ 0.0, -1.0,  0.0], [0.0, 0.0]),
            Vertex3d::new([ 0.5, -0.5, -0.5], [ 0.0, -1.0,  0.0], [1.0, 0.0]),
            Vertex3d::new([ 0.5, -0.5,  0.5], [ 0.0, -1.0,  0.0], [1.0, 1.0]),
            Vertex3d::new([-0.5, -0.5,  0.5], [ 0.0, -1.0,  0.0], [0.0, 1.0]),
            // Right face (X+)
            Vertex3d::new([ 0.5, -0.5,  0.5], [ 1.0,  0.0,  0.0], [0.0, 0.0]),
            Vertex3d::new([ 0.5, -0.5, -0.5], [ 1.0,  0.0,  0.0], [1.0, 0.0]),
            Vertex3d::new([ 0.5,  0.5, -0.5], [ 1.0,  0.0,  0.0], [1.0, 1.0]),
            Vertex3d::new([ 0.5,  0.5,  0.5], [ 1.0,  0.0,  0.0], [0.0, 1.0]),
            // Left face (X-)
            Vertex3d::new([-0.5, -0.5, -0.5], [-1.0,  0.0,  0.0], [0.0, 0.0]),
            Vertex3d::new([-0.5, -0.5,  0.5], [-1.0,  0.0,  0.0], [1.0, 0.0]),
            Vertex3d::new([-0.5,  0.5,  0.5], [-1.0,  0.0,  0.0], [1.0, 1.0]),
            Vertex3d::new([-0.5,  0.5, -0.5], [-1.0,  0.0,  0.0], [0.0, 1.0]),
        ];

        #[rustfmt::skip]
        let indices = vec![
            0,  1,  2,  2,  3,  0,  // front
            4,  5,  6,  6,  7,  4,  // back
            8,  9,  10, 10, 11, 8,  // top
            12, 13, 14, 14, 15, 12, // bottom
            16, 17, 18, 18, 19, 16, // right
            20, 21, 22, 22, 23, 20, // left
        ];

        Self { vertices, indices }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn triangle() -> RawGeometry {
        RawGeometry::new(
            vec![
                Vertex3d::new([0.0, 0.0, 0.0], [0.0, 0.0, 1.0], [0.0, 0.0]),
                Vertex3d::new([1.0, 0.0, 0.0], [0.0, 0.0, 1.0], [1.0, 0.0]),
                Vertex3d::new([0.0, 1.0, 0.0], [0.0, 0.0, 1.0], [0.0, 1.0]),
            ],
            vec![0, 1, 2],
        )
    }

    #[test]
    fn valid_geometry_passes() {
        assert!(triangle().validate().is_ok());
        assert!(RawGeometry::cube().validate().is_ok());
    }

    #[test]
    fn empty_vertices_are_rejected() {
        let geometry = RawGeometry::new(Vec::new(), vec![0, 1, 2]);
        assert!(matches!(
            geometry.validate(),
            Err(GeometryError::NoVertices)
        ));
    }

    #[test]
    fn empty_indices_are_rejected() {
        let mut geometry = triangle();
        geometry.indices.clear();
        assert!(matches!(geometry.validate(), Err(GeometryError::NoIndices)));
    }

    #[test]
    fn out_of_range_index_is_rejected() {
        let mut geometry = triangle();
        geometry.indices[2] = 3;
        assert!(matches!(
            geometry.validate(),
            Err(GeometryError::IndexOutOfRange {
                index: 3,
                vertex_count: 3
            })
        ));
    }

    #[test]
    fn obj_bytes_import() {
        let obj = b"\
v 0.0 0.0 0.0
v 1.0 0.0 0.0
v 0.0 1.0 0.0
vt 0.0 0.0
vt 1.0 0.0
vt 0.0 1.0
vn 0.0 0.0 1.0
f 1/1/1 2/2/1 3/3/1
";
        let geometry = RawGeometry::from_obj_bytes(obj).unwrap();
        assert_eq!(geometry.vertices.len(), 3);
        assert_eq!(geometry.indices.len(), 3);
        assert_eq!(geometry.vertices[1].position, [1.0, 0.0, 0.0]);
        assert_eq!(geometry.vertices[1].normal, [0.0, 0.0, 1.0]);
        assert_eq!(geometry.vertices[1].uv, [1.0, 0.0]);
    }

    #[test]
    fn missing_normals_are_reconstructed() {
        let obj = b"\
v 0.0 0.0 0.0
v 1.0 0.0 0.0
v 0.0 1.0 0.0
f 1 2 3
";
        let geometry = RawGeometry::from_obj_bytes(obj).unwrap();
        for vertex in &geometry.vertices {
            assert_eq!(vertex.normal, [0.0, 0.0, 1.0]);
        }
    }

    #[test]
    fn merge_offsets_indices() {
        let mut geometry = triangle();
        geometry.merge(triangle());
        assert_eq!(geometry.vertices.len(), 6);
        assert_eq!(&geometry.indices, &[0, 1, 2, 3, 4, 5]);
    }
}
