//! Interactive window showing a [`Scene`].
//!
//! Controls: drag with the left mouse button to orbit, scroll to zoom,
//! Space or Enter to toggle between scatter and tree, P to pause, Esc to quit.

use crate::error::ViewerError;
use crate::gpu::GpuState;
use crate::scene::Scene;
use crate::time::Time;
use crate::transition::TreeState;
use log::{error, info, warn};
use std::sync::Arc;
use winit::{
    application::ApplicationHandler,
    event::{ElementState, KeyEvent, MouseButton, MouseScrollDelta, WindowEvent},
    event_loop::{ActiveEventLoop, ControlFlow, EventLoop},
    keyboard::{KeyCode, PhysicalKey},
    window::{Window, WindowId},
};

/// Viewer settings that are not part of the scene.
#[derive(Debug, Clone)]
pub struct ViewerOptions {
    /// Window title; the measured FPS is appended while running.
    pub title: String,
    /// Initial inner width in logical pixels.
    pub width: u32,
    /// Initial inner height in logical pixels.
    pub height: u32,
    /// Advance batches on the rayon pool.
    pub parallel: bool,
}

impl Default for ViewerOptions {
    fn default() -> Self {
        Self {
            title: "treemorph".to_string(),
            width: 1280,
            height: 720,
            parallel: false,
        }
    }
}

/// Open a window and animate `scene` until it is closed.
pub fn run(scene: Scene, options: ViewerOptions) -> Result<(), ViewerError> {
    let event_loop = EventLoop::new()?;
    event_loop.set_control_flow(ControlFlow::Poll);

    let mut app = App::new(scene, options);
    event_loop.run_app(&mut app)?;

    match app.error.take() {
        Some(err) => Err(err),
        None => Ok(()),
    }
}

struct App {
    window: Option<Arc<Window>>,
    gpu_state: Option<GpuState>,
    scene: Scene,
    time: Time,
    options: ViewerOptions,
    mouse_pressed: bool,
    last_mouse_pos: Option<(f64, f64)>,
    /// First fatal error, reported once the event loop returns.
    error: Option<ViewerError>,
}

impl App {
    fn new(scene: Scene, options: ViewerOptions) -> Self {
        Self {
            window: None,
            gpu_state: None,
            scene,
            time: Time::new(),
            options,
            mouse_pressed: false,
            last_mouse_pos: None,
            error: None,
        }
    }

    fn fail(&mut self, event_loop: &ActiveEventLoop, err: ViewerError) {
        error!("{err}");
        self.error.get_or_insert(err);
        event_loop.exit();
    }

    fn handle_key(&mut self, event_loop: &ActiveEventLoop, event: &KeyEvent) {
        if event.state != ElementState::Pressed || event.repeat {
            return;
        }
        match event.physical_key {
            PhysicalKey::Code(KeyCode::Space | KeyCode::Enter | KeyCode::NumpadEnter) => {
                self.scene.toggle();
            }
            PhysicalKey::Code(KeyCode::KeyP) => {
                self.time.toggle_pause();
                info!("{}", if self.time.is_paused() { "paused" } else { "resumed" });
            }
            PhysicalKey::Code(KeyCode::Escape) => event_loop.exit(),
            _ => {}
        }
    }

    fn frame(&mut self) {
        let (elapsed, delta) = self.time.update();
        if self.options.parallel {
            self.scene.update_parallel(elapsed, delta);
        } else {
            self.scene.update(elapsed, delta);
        }

        if let Some(gpu_state) = &mut self.gpu_state {
            if self.scene.state() == TreeState::Tree {
                gpu_state.camera.auto_rotate(delta);
            }
            gpu_state.sync(&mut self.scene);
        }

        if let (Some(fps), Some(window)) = (self.time.take_fps(), &self.window) {
            window.set_title(&format!("{} - {:.0} fps", self.options.title, fps));
        }
    }
}

impl ApplicationHandler for App {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.window.is_some() {
            return;
        }

        let window_attrs = Window::default_attributes()
            .with_title(self.options.title.as_str())
            .with_inner_size(winit::dpi::LogicalSize::new(
                self.options.width,
                self.options.height,
            ));

        let window = match event_loop.create_window(window_attrs) {
            Ok(window) => Arc::new(window),
            Err(err) => return self.fail(event_loop, err.into()),
        };
        self.window = Some(window.clone());

        match pollster::block_on(GpuState::new(window, &mut self.scene)) {
            Ok(gpu_state) => self.gpu_state = Some(gpu_state),
            Err(err) => self.fail(event_loop, err),
        }
    }

    fn window_event(&mut self, event_loop: &ActiveEventLoop, _id: WindowId, event: WindowEvent) {
        match event {
            WindowEvent::CloseRequested => {
                event_loop.exit();
            }
            WindowEvent::Resized(physical_size) => {
                if let Some(gpu_state) = &mut self.gpu_state {
                    gpu_state.resize(physical_size);
                }
            }
            WindowEvent::KeyboardInput { event, .. } => {
                self.handle_key(event_loop, &event);
            }
            WindowEvent::MouseInput { state, button, .. } => {
                if button == MouseButton::Left {
                    self.mouse_pressed = state == ElementState::Pressed;
                    if !self.mouse_pressed {
                        self.last_mouse_pos = None;
                    }
                }
            }
            WindowEvent::CursorMoved { position, .. } => {
                if self.mouse_pressed {
                    if let Some((last_x, last_y)) = self.last_mouse_pos {
                        let dx = (position.x - last_x) as f32;
                        let dy = (position.y - last_y) as f32;
                        if let Some(gpu_state) = &mut self.gpu_state {
                            gpu_state.camera.orbit(dx, dy);
                        }
                    }
                    self.last_mouse_pos = Some((position.x, position.y));
                }
            }
            WindowEvent::MouseWheel { delta, .. } => {
                let scroll = match delta {
                    MouseScrollDelta::LineDelta(_, y) => y,
                    MouseScrollDelta::PixelDelta(pos) => pos.y as f32 * 0.1,
                };
                if let Some(gpu_state) = &mut self.gpu_state {
                    gpu_state.camera.zoom(scroll);
                }
            }
            WindowEvent::RedrawRequested => {
                self.frame();
                if let Some(gpu_state) = &mut self.gpu_state {
                    match gpu_state.render() {
                        Ok(_) => {}
                        Err(wgpu::SurfaceError::Lost | wgpu::SurfaceError::Outdated) => {
                            gpu_state.resize(winit::dpi::PhysicalSize {
                                width: gpu_state.config.width,
                                height: gpu_state.config.height,
                            })
                        }
                        Err(wgpu::SurfaceError::OutOfMemory) => {
                            error!("GPU out of memory");
                            event_loop.exit();
                        }
                        Err(e) => warn!("render error: {e:?}"),
                    }
                }
                if let Some(window) = &self.window {
                    window.request_redraw();
                }
            }
            _ => {}
        }
    }
}
