//! A row of checkered cubes, one spinning.
//!
//! Controls: W/S/A/D + Space/LeftShift to move, hold the right mouse
//! button to look around, Escape to quit.

use anyhow::Result;
use phalanx::{Camera, ENTITY_SHADER, Entity, Material, RawGeometry, Scene, Texture};

fn main() -> Result<()> {
    env_logger::init();

    phalanx::run("phalanx: spinning", |ctx| {
        let shader = ctx.assets.load_shader(ctx.gpu, "entity shader", ENTITY_SHADER);
        let checker = Texture::checkerboard(
            ctx.gpu,
            256,
            8,
            [210, 210, 210, 255],
            [60, 60, 60, 255],
        );
        let texture = ctx.assets.add_texture(checker);
        let sampler = ctx.assets.add_linear_sampler(ctx.gpu);
        let material = ctx
            .assets
            .add_material(Material::with_texture(shader, shader, texture, sampler));
        let cube = ctx.assets.add_geometry(ctx.gpu, &RawGeometry::cube())?;

        let mut entities = Vec::new();
        for i in 0..5 {
            let mut entity = Entity::new(ctx.gpu, ctx.pass, ctx.assets, cube, material)?;
            entity
                .transform
                .set_translation(i as f32 * 1.5 - 3.0, 0.0, 0.0);
            entities.push(entity);
        }
        entities[0].transform.set_translation(0.0, -0.5, -2.0);

        let camera = Camera::new(ctx.gpu.width(), ctx.gpu.height())?;

        Ok(Scene {
            camera,
            entities,
            update: Some(Box::new(|entities, _dt, elapsed| {
                entities[0].transform.set_rotation(0.0, elapsed, 0.0);
            })),
        })
    })
}
