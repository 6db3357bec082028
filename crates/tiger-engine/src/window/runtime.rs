use anyhow::{Context, Result};

use winit::application::ApplicationHandler;
use winit::dpi::PhysicalSize;
use winit::event::WindowEvent;
use winit::event_loop::{ActiveEventLoop, ControlFlow, EventLoop};
use winit::window::{Window, WindowId};

use crate::coords::{ColorRgba, Viewport};
use crate::core::{App, AppControl, InitCtx};
use crate::device::{create_gl_window, GlInit, GlWindow};
use crate::render::FrameLoop;

/// Window/runtime configuration.
#[derive(Debug, Clone)]
pub struct RuntimeConfig {
    pub title: String,
    /// Window size in physical pixels.
    pub size: PhysicalSize<u32>,
    pub clear_color: ColorRgba,
    pub resizable: bool,
}

impl Default for RuntimeConfig {
    fn default() -> Self {
        Self {
            title: "tiger".to_string(),
            size: PhysicalSize::new(800, 600),
            clear_color: ColorRgba::slate(),
            resizable: true,
        }
    }
}

impl RuntimeConfig {
    fn window_attributes(&self) -> winit::window::WindowAttributes {
        Window::default_attributes()
            .with_title(self.title.clone())
            .with_inner_size(self.size)
            .with_resizable(self.resizable)
    }
}

/// Entry point for the runtime.
pub struct Runtime;

impl Runtime {
    /// Opens the window, initializes `app`, and renders until the window is
    /// closed or the app requests exit.
    ///
    /// Returns the first fatal error (window/context creation, function
    /// loading, app init, presentation). The event loop and window are
    /// released before this returns.
    pub fn run<A>(config: RuntimeConfig, init: GlInit, app: A) -> Result<()>
    where
        A: App<glow::Context> + 'static,
    {
        let event_loop = EventLoop::new().context("failed to create winit EventLoop")?;
        let mut state = AppState::new(config, init, app);

        event_loop
            .run_app(&mut state)
            .context("winit event loop terminated with error")?;

        match state.fatal.take() {
            Some(err) => Err(err),
            None => {
                log::info!("shut down after {} frames", state.frame_loop.frames_rendered());
                Ok(())
            }
        }
    }
}

struct AppState<A>
where
    A: App<glow::Context> + 'static,
{
    config: RuntimeConfig,
    init: GlInit,
    app: A,

    frame_loop: FrameLoop,
    window: Option<GlWindow>,
    fatal: Option<anyhow::Error>,
}

impl<A> AppState<A>
where
    A: App<glow::Context> + 'static,
{
    fn new(config: RuntimeConfig, init: GlInit, app: A) -> Self {
        let frame_loop = FrameLoop::new(config.clear_color);
        Self {
            config,
            init,
            app,
            frame_loop,
            window: None,
            fatal: None,
        }
    }

    /// Records the first fatal error and stops the loop.
    fn fail(&mut self, event_loop: &ActiveEventLoop, err: anyhow::Error) {
        log::debug!("fatal runtime error: {err:#}");
        if self.fatal.is_none() {
            self.fatal = Some(err);
        }
        self.teardown();
        event_loop.exit();
    }

    /// Lets the app release GPU objects, then drops the context and window.
    fn teardown(&mut self) {
        if let Some(window) = self.window.take() {
            self.app.on_exit(window.gl());
            drop(window);
            log::debug!("window and GL context released");
        }
    }

    fn open_window(&mut self, event_loop: &ActiveEventLoop) -> Result<GlWindow> {
        let window = create_gl_window(event_loop, self.config.window_attributes(), &self.init)?;

        let ctx = InitCtx {
            gpu: window.gl(),
            init: &self.init,
        };
        self.app
            .on_init(&ctx)
            .context("application initialization failed")?;

        Ok(window)
    }
}

impl<A> ApplicationHandler for AppState<A>
where
    A: App<glow::Context> + 'static,
{
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.window.is_some() || self.fatal.is_some() {
            return;
        }

        match self.open_window(event_loop) {
            Ok(window) => {
                log::info!(
                    "window \"{}\" opened at {}x{}",
                    self.config.title,
                    self.config.size.width,
                    self.config.size.height
                );
                window.window().request_redraw();
                self.window = Some(window);
            }
            Err(e) => {
                self.fail(event_loop, e);
                return;
            }
        }

        // No frame limiting: redraw as fast as the driver presents.
        event_loop.set_control_flow(ControlFlow::Poll);
    }

    fn about_to_wait(&mut self, event_loop: &ActiveEventLoop) {
        if self.frame_loop.close_requested() {
            self.teardown();
            event_loop.exit();
            return;
        }

        if let Some(window) = &self.window {
            window.window().request_redraw();
        }
    }

    fn window_event(
        &mut self,
        event_loop: &ActiveEventLoop,
        _window_id: WindowId,
        event: WindowEvent,
    ) {
        let Some(window) = self.window.as_mut() else {
            return;
        };

        if self.app.on_window_event(&event) == AppControl::Exit {
            self.frame_loop.request_close();
        }

        let result = match event {
            WindowEvent::CloseRequested => {
                log::info!("window close requested");
                self.frame_loop.request_close();
                Ok(())
            }

            WindowEvent::Resized(size) => {
                window.resize(Viewport::new(size.width, size.height));
                Ok(())
            }

            WindowEvent::RedrawRequested => {
                let viewport = window.viewport();
                self.frame_loop
                    .run_frame(&mut self.app, window.gl(), &*window, viewport)
                    .map(|_| ())
            }

            _ => Ok(()),
        };

        if let Err(e) = result {
            self.fail(event_loop, e);
        }
    }

    fn exiting(&mut self, _event_loop: &ActiveEventLoop) {
        self.teardown();
    }
}
