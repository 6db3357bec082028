use std::ffi::{c_void, CStr};
use std::num::NonZeroU32;

use anyhow::Context as _;
use glow::HasContext;
use glutin::config::{Config, ConfigTemplateBuilder, GlConfig};
use glutin::context::{
    ContextApi, ContextAttributesBuilder, GlProfile, NotCurrentGlContext, PossiblyCurrentContext,
    Version,
};
use glutin::display::{Display, GetGlDisplay, GlDisplay};
use glutin::surface::{GlSurface, Surface, SwapInterval, WindowSurface};
use glutin_winit::{DisplayBuilder, GlWindow as _};
use raw_window_handle::HasWindowHandle;
use winit::event_loop::ActiveEventLoop;
use winit::window::{Window, WindowAttributes};

use super::{GlInit, GpuApi, InitError, Present};
use crate::coords::Viewport;

/// Entry points that must resolve before the context is considered usable.
const REQUIRED_SYMBOLS: &[&CStr] = &[
    c"glClear",
    c"glClearColor",
    c"glViewport",
    c"glCreateShader",
    c"glShaderSource",
    c"glCompileShader",
    c"glCreateProgram",
    c"glAttachShader",
    c"glLinkProgram",
    c"glGenBuffers",
    c"glBindBuffer",
    c"glBufferData",
];

/// The window together with its current GL context.
///
/// Field order is drop order: GL state goes first, the OS window last.
pub struct GlWindow {
    gl: glow::Context,
    surface: Surface<WindowSurface>,
    context: PossiblyCurrentContext,
    viewport: Viewport,
    window: Window,
}

impl GlWindow {
    #[inline]
    pub fn gl(&self) -> &glow::Context {
        &self.gl
    }

    #[inline]
    pub fn window(&self) -> &Window {
        &self.window
    }

    #[inline]
    pub fn viewport(&self) -> Viewport {
        self.viewport
    }

    /// Resizes the surface and resets the GL viewport.
    ///
    /// Zero-sized requests (minimized windows) are ignored.
    pub fn resize(&mut self, viewport: Viewport) {
        let (Some(w), Some(h)) = (NonZeroU32::new(viewport.width), NonZeroU32::new(viewport.height))
        else {
            return;
        };

        self.surface.resize(&self.context, w, h);
        self.gl.set_viewport(viewport);
        self.viewport = viewport;
        log::debug!("viewport resized to {}x{}", viewport.width, viewport.height);
    }
}

impl Present for GlWindow {
    fn present(&self) -> anyhow::Result<()> {
        self.window.pre_present_notify();
        self.surface
            .swap_buffers(&self.context)
            .context("failed to swap buffers")
    }
}

/// Creates the window, a core-profile context of `init.gl_version`, and makes
/// it current; then loads GL functions.
///
/// Any failure here is fatal for the process.
pub fn create_gl_window(
    event_loop: &ActiveEventLoop,
    attrs: WindowAttributes,
    init: &GlInit,
) -> Result<GlWindow, InitError> {
    let template = ConfigTemplateBuilder::new().with_alpha_size(8);

    let (window, gl_config) = DisplayBuilder::new()
        .with_window_attributes(Some(attrs))
        .build(event_loop, template, pick_config)
        .map_err(|e| InitError::Window(e.to_string()))?;

    let window =
        window.ok_or_else(|| InitError::Window("display builder returned no window".into()))?;

    let raw_handle = window
        .window_handle()
        .map_err(|e| InitError::Window(e.to_string()))?
        .as_raw();

    let display = gl_config.display();
    let (major, minor) = init.gl_version;
    let context_attrs = ContextAttributesBuilder::new()
        .with_profile(GlProfile::Core)
        .with_context_api(ContextApi::OpenGl(Some(Version::new(major, minor))))
        .build(Some(raw_handle));

    // SAFETY: `raw_handle` belongs to `window`, which outlives the context.
    let not_current = unsafe { display.create_context(&gl_config, &context_attrs) }
        .map_err(InitError::Context)?;

    let surface_attrs = window
        .build_surface_attributes(Default::default())
        .map_err(|e| InitError::Surface(e.to_string()))?;

    // SAFETY: same window handle as above.
    let surface = unsafe { display.create_window_surface(&gl_config, &surface_attrs) }
        .map_err(|e| InitError::Surface(e.to_string()))?;

    let context = not_current
        .make_current(&surface)
        .map_err(InitError::Context)?;

    let interval = if init.vsync {
        SwapInterval::Wait(NonZeroU32::MIN)
    } else {
        SwapInterval::DontWait
    };
    if let Err(e) = surface.set_swap_interval(&context, interval) {
        log::warn!("failed to set swap interval {interval:?}: {e}");
    }

    let gl = load_gl_functions(&display, init)?;

    let size = window.inner_size();
    let viewport = Viewport::new(size.width, size.height);
    if viewport.is_valid() {
        gl.set_viewport(viewport);
    }

    Ok(GlWindow {
        gl,
        surface,
        context,
        viewport,
        window,
    })
}

/// Loads GL entry points through `display`.
///
/// Must run once, after the context is current and before any GL call.
pub fn load_gl_functions(display: &Display, init: &GlInit) -> Result<glow::Context, InitError> {
    if let Some(missing) = first_missing_symbol(REQUIRED_SYMBOLS, |s| display.get_proc_address(s)) {
        return Err(InitError::FunctionLoading(missing.to_string_lossy().into_owned()));
    }

    // SAFETY: the context is current and every required symbol resolved.
    let gl = unsafe { glow::Context::from_loader_function_cstr(|s| display.get_proc_address(s)) };

    let version = gl.version();
    check_version(init.gl_version, (version.major, version.minor))?;

    // SAFETY: plain string queries on the current context.
    let (version_str, renderer) = unsafe {
        (
            gl.get_parameter_string(glow::VERSION),
            gl.get_parameter_string(glow::RENDERER),
        )
    };
    log::info!("OpenGL {version_str} on {renderer}");

    Ok(gl)
}

/// glutin guarantees a non-empty config list; prefer one without multisampling.
fn pick_config(configs: Box<dyn Iterator<Item = Config> + '_>) -> Config {
    configs
        .min_by_key(|c| c.num_samples())
        .expect("glutin yields at least one matching config")
}

fn first_missing_symbol<'a, F>(symbols: &[&'a CStr], mut resolve: F) -> Option<&'a CStr>
where
    F: FnMut(&CStr) -> *const c_void,
{
    symbols.iter().copied().find(|s| resolve(s).is_null())
}

fn check_version(requested: (u8, u8), actual: (u32, u32)) -> Result<(), InitError> {
    let wanted = (u32::from(requested.0), u32::from(requested.1));
    if actual < wanted {
        return Err(InitError::Version { requested, actual });
    }
    Ok(())
}
