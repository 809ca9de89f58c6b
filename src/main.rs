use std::sync::Arc;

use anyhow::Result;
use clap::Parser;
use loop_cubes::{
    build_scene, AnimationSession, Cli, FrameInfo, Playback, SketchSettings, WgpuRenderer,
};
use winit::{
    application::ApplicationHandler,
    dpi::{LogicalSize, PhysicalSize},
    event::*,
    event_loop::{ActiveEventLoop, EventLoop},
    keyboard::{KeyCode, PhysicalKey},
    window::{Window, WindowId},
};

struct App {
    settings: SketchSettings,
    playback: Playback,
    window: Option<Arc<Window>>,
    session: Option<AnimationSession<WgpuRenderer>>,
    last_frame: Option<FrameInfo>,
}

impl App {
    fn new(settings: SketchSettings) -> Self {
        Self {
            playback: Playback::new(&settings),
            settings,
            window: None,
            session: None,
            last_frame: None,
        }
    }

    fn start_session(&self, window: Arc<Window>) -> Result<AnimationSession<WgpuRenderer>> {
        let scene = build_scene(&self.settings)?;
        let renderer = pollster::block_on(WgpuRenderer::new(window.clone(), &self.settings, &scene))?;
        let mut session = AnimationSession::with_scene(&self.settings, scene, renderer);
        resize_session(&mut session, &window, window.inner_size());
        Ok(session)
    }

    fn shutdown(&mut self, event_loop: &ActiveEventLoop) {
        if let Some(session) = self.session.as_mut() {
            session.unload();
        }
        event_loop.exit();
    }

    fn redraw(&mut self, event_loop: &ActiveEventLoop) {
        // Still mode keeps repainting its single frame on expose
        let frame = match self.playback.tick() {
            Some(frame) => {
                self.last_frame = Some(frame);
                frame
            }
            None => match self.last_frame {
                Some(frame) => frame,
                None => return,
            },
        };

        let Some(session) = self.session.as_mut() else {
            return;
        };
        if let Err(e) = session.render(frame.playhead, frame.elapsed) {
            log::error!("Render error: {:#}", e);
            self.shutdown(event_loop);
        }
    }
}

fn resize_session(
    session: &mut AnimationSession<WgpuRenderer>,
    window: &Window,
    size: PhysicalSize<u32>,
) {
    let scale = window.scale_factor();
    let logical: LogicalSize<f64> = size.to_logical(scale);
    session.resize(
        scale as f32,
        logical.width.round() as u32,
        logical.height.round() as u32,
    );
}

impl ApplicationHandler for App {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.window.is_some() {
            return;
        }

        let window = match event_loop.create_window(
            Window::default_attributes()
                .with_title("Loop Cubes")
                .with_inner_size(LogicalSize::new(self.settings.width(), self.settings.height())),
        ) {
            Ok(w) => Arc::new(w),
            Err(e) => {
                log::error!("Failed to create window: {}", e);
                event_loop.exit();
                return;
            }
        };

        match self.start_session(window.clone()) {
            Ok(session) => self.session = Some(session),
            Err(e) => {
                log::error!("Failed to start sketch: {:#}", e);
                event_loop.exit();
                return;
            }
        }

        window.request_redraw();
        self.window = Some(window);
    }

    fn window_event(
        &mut self,
        event_loop: &ActiveEventLoop,
        _window_id: WindowId,
        event: WindowEvent,
    ) {
        match event {
            WindowEvent::CloseRequested
            | WindowEvent::KeyboardInput {
                event:
                    KeyEvent {
                        state: ElementState::Pressed,
                        physical_key: PhysicalKey::Code(KeyCode::Escape),
                        ..
                    },
                ..
            } => self.shutdown(event_loop),
            WindowEvent::Resized(size) => {
                if let (Some(session), Some(window)) = (self.session.as_mut(), &self.window) {
                    resize_session(session, window, size);
                    window.request_redraw();
                }
            }
            WindowEvent::ScaleFactorChanged { .. } => {
                if let (Some(session), Some(window)) = (self.session.as_mut(), &self.window) {
                    resize_session(session, window, window.inner_size());
                }
            }
            WindowEvent::RedrawRequested => self.redraw(event_loop),
            _ => {}
        }
    }

    fn about_to_wait(&mut self, _event_loop: &ActiveEventLoop) {
        if !self.playback.is_animated() {
            return;
        }
        if let Some(window) = &self.window {
            window.request_redraw();
        }
    }

    fn exiting(&mut self, _event_loop: &ActiveEventLoop) {
        if let Some(session) = self.session.as_mut() {
            session.unload();
        }
    }
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let settings = Cli::parse().settings()?;
    log::info!(
        "{}x{} @ {} fps, {}s loop ({} frames){}",
        settings.width(),
        settings.height(),
        settings.fps,
        settings.duration,
        settings.total_frames(),
        if settings.animate { "" } else { ", still" }
    );

    let event_loop = EventLoop::new()?;
    let mut app = App::new(settings);
    event_loop.run_app(&mut app)?;

    Ok(())
}
