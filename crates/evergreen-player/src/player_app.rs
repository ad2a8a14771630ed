//! Player application implementing winit ApplicationHandler
//!
//! Space toggles the formation, left-drag orbits, the wheel zooms.

use crate::session::Session;
use evergreen_formation::SceneConfig;
use evergreen_render::{FormationRenderer, RenderContext};
use evergreen_runtime::RuntimeSystem;
use std::sync::Arc;
use winit::application::ApplicationHandler;
use winit::dpi::{PhysicalPosition, PhysicalSize};
use winit::event::{ElementState, MouseButton, MouseScrollDelta, WindowEvent};
use winit::event_loop::ActiveEventLoop;
use winit::keyboard::{KeyCode, PhysicalKey};
use winit::window::{Fullscreen, Window, WindowId};

/// Radians of orbit per pixel dragged
const ORBIT_SENSITIVITY: f32 = 0.005;
/// World units per wheel line
const ZOOM_STEP: f32 = 0.5;

pub struct PlayerApp {
    pub config: SceneConfig,
    session: Option<Session>,

    window: Option<Arc<Window>>,
    render_context: Option<RenderContext>,
    renderer: Option<FormationRenderer>,

    pub fullscreen: bool,
    dragging: bool,
    last_cursor: Option<PhysicalPosition<f64>>,
}

impl PlayerApp {
    pub fn new(config: SceneConfig, fullscreen: bool) -> Self {
        Self {
            config,
            session: None,
            window: None,
            render_context: None,
            renderer: None,
            fullscreen,
            dragging: false,
            last_cursor: None,
        }
    }

    fn initialize(&mut self, event_loop: &ActiveEventLoop) -> anyhow::Result<()> {
        let window_attrs = Window::default_attributes()
            .with_title(format!("Evergreen - {}", self.config.scene.name))
            .with_inner_size(PhysicalSize::new(1280, 720));

        let window = Arc::new(event_loop.create_window(window_attrs)?);
        if self.fullscreen {
            window.set_fullscreen(Some(Fullscreen::Borderless(None)));
        }
        self.window = Some(window.clone());

        let render_context = pollster::block_on(RenderContext::new(window))?;
        let session = Session::new(&self.config, render_context.aspect_ratio())?;
        let renderer = FormationRenderer::new(&render_context.device, render_context.format(), &session.system);

        self.render_context = Some(render_context);
        self.renderer = Some(renderer);
        self.session = Some(session);
        Ok(())
    }

    fn render(&mut self) {
        let (Some(context), Some(renderer), Some(session)) =
            (&self.render_context, &self.renderer, &self.session)
        else {
            return;
        };

        let output = match context.surface.get_current_texture() {
            Ok(output) => output,
            Err(wgpu::SurfaceError::Lost | wgpu::SurfaceError::Outdated) => {
                return;
            }
            Err(e) => {
                log::error!("Surface error: {:?}", e);
                return;
            }
        };

        let view = output
            .texture
            .create_view(&wgpu::TextureViewDescriptor::default());

        renderer.prepare(&context.queue, &session.system, &session.camera, context.viewport());
        let mut encoder = context
            .device
            .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("Player Encoder"),
            });
        renderer.render(&mut encoder, &view, &context.depth_view);
        context.queue.submit(std::iter::once(encoder.finish()));

        output.present();
    }

    fn tick(&mut self) {
        if let Some(session) = &mut self.session {
            if let Err(e) = session.tick() {
                log::error!("Update error: {}", e);
            }
        }
    }

    fn toggle_fullscreen(&self) {
        if let Some(window) = &self.window {
            if window.fullscreen().is_some() {
                window.set_fullscreen(None);
            } else {
                window.set_fullscreen(Some(Fullscreen::Borderless(None)));
            }
        }
    }
}

impl ApplicationHandler for PlayerApp {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.window.is_none() {
            if let Err(e) = self.initialize(event_loop) {
                log::error!("Failed to start player: {:#}", e);
                event_loop.exit();
            }
        }
    }

    fn window_event(
        &mut self,
        event_loop: &ActiveEventLoop,
        _window_id: WindowId,
        event: WindowEvent,
    ) {
        match event {
            WindowEvent::CloseRequested => {
                event_loop.exit();
            }

            WindowEvent::Resized(new_size) => {
                if let Some(context) = &mut self.render_context {
                    context.resize(new_size);
                    if let Some(session) = &mut self.session {
                        session.camera.aspect = context.aspect_ratio();
                    }
                }
            }

            WindowEvent::KeyboardInput { event, .. } => {
                if event.state != ElementState::Pressed || event.repeat {
                    return;
                }
                if let PhysicalKey::Code(key_code) = event.physical_key {
                    match key_code {
                        KeyCode::Escape => event_loop.exit(),
                        KeyCode::Space => {
                            if let Some(session) = &mut self.session {
                                session.toggle_formation();
                            }
                        }
                        KeyCode::F11 => self.toggle_fullscreen(),
                        _ => {}
                    }
                }
            }

            WindowEvent::MouseInput { state, button, .. } => {
                if button == MouseButton::Left {
                    self.dragging = state == ElementState::Pressed;
                }
            }

            WindowEvent::CursorMoved { position, .. } => {
                if let (true, Some(last), Some(session)) = (self.dragging, self.last_cursor, &mut self.session) {
                    let dx = (position.x - last.x) as f32;
                    let dy = (position.y - last.y) as f32;
                    session.camera.orbit(-dx * ORBIT_SENSITIVITY, -dy * ORBIT_SENSITIVITY);
                }
                self.last_cursor = Some(position);
            }

            WindowEvent::MouseWheel { delta, .. } => {
                let lines = match delta {
                    MouseScrollDelta::LineDelta(_, y) => y,
                    MouseScrollDelta::PixelDelta(p) => p.y as f32 / 40.0,
                };
                if let Some(session) = &mut self.session {
                    session.camera.zoom(lines * ZOOM_STEP);
                }
            }

            WindowEvent::RedrawRequested => {
                self.tick();
                self.render();
            }

            _ => {}
        }
    }

    fn about_to_wait(&mut self, _event_loop: &ActiveEventLoop) {
        if let Some(window) = &self.window {
            window.request_redraw();
        }
    }

    fn exiting(&mut self, _event_loop: &ActiveEventLoop) {
        if let Some(session) = &mut self.session {
            if let Err(e) = session.system.shutdown() {
                log::warn!("Shutdown error: {}", e);
            }
        }
    }
}
