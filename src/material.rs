//! Shared surface descriptions: a shader pair plus texture/sampler bindings.

use crate::assets::{SamplerId, ShaderId, TextureId};

/// An immutable binding of a vertex/pixel shader pair with an optional
/// diffuse texture and sampler.
///
/// A material holds only handles; the GPU objects belong to
/// [`Assets`](crate::Assets). Any number of entities may reference the same
/// material, and nothing about it can change after construction — all the
/// behavior lives in how an entity's draw preparation consumes it.
///
/// # Example
///
/// ```no_run
/// # use phalanx::{Assets, Material};
/// # fn demo(assets: &mut Assets, gpu: &phalanx::GpuContext) {
/// let shader = assets.load_shader(gpu, "entity", phalanx::ENTITY_SHADER);
/// assets.add_material(Material::new(shader, shader));
/// # }
/// ```
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Material {
    vertex_shader: ShaderId,
    pixel_shader: ShaderId,
    texture: Option<TextureId>,
    sampler: Option<SamplerId>,
}

impl Material {
    /// An untextured material; draws sample the renderer's default white
    /// texture.
    pub fn new(vertex_shader: ShaderId, pixel_shader: ShaderId) -> Self {
        Self {
            vertex_shader,
            pixel_shader,
            texture: None,
            sampler: None,
        }
    }

    /// A textured material.
    pub fn with_texture(
        vertex_shader: ShaderId,
        pixel_shader: ShaderId,
        texture: TextureId,
        sampler: SamplerId,
    ) -> Self {
        Self {
            vertex_shader,
            pixel_shader,
            texture: Some(texture),
            sampler: Some(sampler),
        }
    }

    /// The vertex/pixel shader pair, in that order.
    pub fn shader_pair(&self) -> (ShaderId, ShaderId) {
        (self.vertex_shader, self.pixel_shader)
    }

    pub fn vertex_shader(&self) -> ShaderId {
        self.vertex_shader
    }

    pub fn pixel_shader(&self) -> ShaderId {
        self.pixel_shader
    }

    pub fn texture(&self) -> Option<TextureId> {
        self.texture
    }

    pub fn sampler(&self) -> Option<SamplerId> {
        self.sampler
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accessors_return_the_handles_passed_in() {
        let (vs, ps) = (ShaderId(0), ShaderId(1));
        let (texture, sampler) = (TextureId(4), SamplerId(2));

        let material = Material::with_texture(vs, ps, texture, sampler);
        assert_eq!(material.shader_pair(), (vs, ps));
        assert_eq!(material.vertex_shader(), vs);
        assert_eq!(material.pixel_shader(), ps);
        assert_eq!(material.texture(), Some(texture));
        assert_eq!(material.sampler(), Some(sampler));
    }

    #[test]
    fn untextured_material_has_no_bindings() {
        let material = Material::new(ShaderId(7), ShaderId(7));
        assert_eq!(material.texture(), None);
        assert_eq!(material.sampler(), None);
    }
}
