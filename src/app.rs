//! The frame driver: window, event loop, and per-frame sequencing.
//!
//! Each frame runs one update phase (input snapshot → camera → user update
//! hook) followed by one draw phase (sequential entity preparation and
//! drawing), never overlapping. Escape quits; a viewport resize
//! reconfigures the surface and the camera projection.
//!
//! Scene setup is deferred into a closure because GPU resources only exist
//! once winit delivers `resumed`.

use std::sync::Arc;
use std::time::Instant;

use winit::application::ApplicationHandler;
use winit::event::{MouseButton, WindowEvent};
use winit::event_loop::{ActiveEventLoop, ControlFlow, EventLoop};
use winit::keyboard::KeyCode;
use winit::window::{Window, WindowId};

use crate::assets::Assets;
use crate::camera::Camera;
use crate::entity::Entity;
use crate::gpu::GpuContext;
use crate::input::{CameraInput, Input};
use crate::scene_pass::ScenePass;

/// Scale applied to held-button mouse deltas before they reach the camera.
const LOOK_SENSITIVITY: f32 = 0.002;

/// Background clear color (cornflower blue).
const CLEAR_COLOR: wgpu::Color = wgpu::Color {
    r: 0.4,
    g: 0.6,
    b: 0.75,
    a: 1.0,
};

/// Everything a setup closure needs to build a scene.
pub struct SceneContext<'a> {
    pub gpu: &'a GpuContext,
    pub assets: &'a mut Assets,
    pub pass: &'a ScenePass,
}

/// Per-frame update hook: entities, delta time, elapsed time (seconds).
pub type UpdateFn = Box<dyn FnMut(&mut [Entity], f32, f32)>;

/// A built scene: the camera, the flat entity list, and an optional
/// per-frame update hook that runs after the camera update and before the
/// draw phase.
pub struct Scene {
    pub camera: Camera,
    pub entities: Vec<Entity>,
    pub update: Option<UpdateFn>,
}

type SetupFn = Box<dyn FnOnce(&mut SceneContext) -> anyhow::Result<Scene>>;

/// Opens a window and runs the frame loop until quit.
///
/// The setup closure runs once, after the GPU is available, and returns the
/// scene to drive.
///
/// # Example
///
/// ```no_run
/// use phalanx::{Camera, Scene};
///
/// phalanx::run("demo", |ctx| {
///     let camera = Camera::new(ctx.gpu.width(), ctx.gpu.height())?;
///     Ok(Scene {
///         camera,
///         entities: Vec::new(),
///         update: None,
///     })
/// })
/// .unwrap();
/// ```
pub fn run(
    title: &str,
    setup: impl FnOnce(&mut SceneContext) -> anyhow::Result<Scene> + 'static,
) -> anyhow::Result<()> {
    let event_loop = EventLoop::new()?;
    event_loop.set_control_flow(ControlFlow::Poll);

    let mut app = App {
        title: title.to_owned(),
        setup: Some(Box::new(setup)),
        running: None,
    };
    event_loop.run_app(&mut app)?;
    Ok(())
}

/// State that exists only once the window and GPU are up.
struct Running {
    window: Arc<Window>,
    gpu: GpuContext,
    assets: Assets,
    pass: ScenePass,
    scene: Scene,
    input: Input,
    last_frame: Instant,
    start: Instant,
}

struct App {
    title: String,
    setup: Option<SetupFn>,
    running: Option<Running>,
}

impl ApplicationHandler for App {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.running.is_some() {
            return;
        }
        let Some(setup) = self.setup.take() else {
            return;
        };

        let window = Arc::new(
            event_loop
                .create_window(Window::default_attributes().with_title(&self.title))
                .expect("Failed to create window"),
        );

        let gpu = GpuContext::new(window.clone());
        let pass = ScenePass::new(&gpu);
        let mut assets = Assets::new();

        let scene = match setup(&mut SceneContext {
            gpu: &gpu,
            assets: &mut assets,
            pass: &pass,
        }) {
            Ok(scene) => scene,
            Err(err) => {
                log::error!("scene setup failed: {err:#}");
                event_loop.exit();
                return;
            }
        };
        log::info!("scene ready: {} entities", scene.entities.len());
        window.request_redraw();

        self.running = Some(Running {
            window,
            gpu,
            assets,
            pass,
            scene,
            input: Input::new(),
            last_frame: Instant::now(),
            start: Instant::now(),
        });
    }

    fn window_event(&mut self, event_loop: &ActiveEventLoop, _id: WindowId, event: WindowEvent) {
        let Some(running) = &mut self.running else {
            return;
        };
        running.input.handle_event(&event);
        if running.input.key_down(KeyCode::Escape) {
            event_loop.exit();
            return;
        }

        match event {
            WindowEvent::CloseRequested => {
                event_loop.exit();
            }
            WindowEvent::Resized(size) => {
                running.gpu.resize(size.width, size.height);
                if let Err(err) = running.scene.camera.set_projection(size.width, size.height) {
                    log::warn!("projection not updated: {err}");
                }
            }
            WindowEvent::RedrawRequested => {
                running.frame();
            }
            _ => {}
        }
    }
}

impl Running {
    /// One full frame: update phase, then draw phase.
    fn frame(&mut self) {
        let now = Instant::now();
        let dt = (now - self.last_frame).as_secs_f32();
        self.last_frame = now;
        let elapsed = self.start.elapsed().as_secs_f32();

        // Update phase.
        let snapshot = CameraInput::from_input(&self.input, MouseButton::Right);
        self.scene.camera.rotate(
            snapshot.look_delta.x * LOOK_SENSITIVITY,
            snapshot.look_delta.y * LOOK_SENSITIVITY,
        );
        self.scene.camera.update(&snapshot, dt);
        if let Some(update) = &mut self.scene.update {
            update(&mut self.scene.entities, dt, elapsed);
        }

        // Draw phase.
        self.pass.ensure_depth_size(&self.gpu);
        let output = match self.gpu.surface.get_current_texture() {
            Ok(output) => output,
            Err(wgpu::SurfaceError::Lost | wgpu::SurfaceError::Outdated) => {
                self.gpu.resize(self.gpu.width(), self.gpu.height());
                return;
            }
            Err(err) => {
                log::warn!("dropping frame: {err}");
                return;
            }
        };
        let view = output
            .texture
            .create_view(&wgpu::TextureViewDescriptor::default());

        let mut encoder = self
            .gpu
            .device
            .create_command_encoder(&wgpu::CommandEncoderDescriptor { label: None });

        {
            let mut render_pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("Scene Pass"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view: &view,
                    resolve_target: None,
                    ops: wgpu::Operations {
                        load: wgpu::LoadOp::Clear(CLEAR_COLOR),
                        store: wgpu::StoreOp::Store,
                    },
                    depth_slice: None,
                })],
                depth_stencil_attachment: Some(wgpu::RenderPassDepthStencilAttachment {
                    view: self.pass.depth_view(),
                    depth_ops: Some(wgpu::Operations {
                        load: wgpu::LoadOp::Clear(1.0),
                        store: wgpu::StoreOp::Store,
                    }),
                    stencil_ops: None,
                }),
                timestamp_writes: None,
                occlusion_query_set: None,
            });

            self.pass.render(
                &self.gpu,
                &mut render_pass,
                &self.scene.camera,
                &self.assets,
                &mut self.scene.entities,
            );
        }

        self.gpu.queue.submit(std::iter::once(encoder.finish()));
        output.present();

        self.input.begin_frame();
        self.window.request_redraw();
    }
}
