//! Compile-time window and context settings.

use tiger_engine::coords::ColorRgba;
use tiger_engine::device::GlInit;
use tiger_engine::shader::ShaderPolicy;
use tiger_engine::window::RuntimeConfig;
use winit::dpi::PhysicalSize;

pub const SCREEN_WIDTH: u32 = 800;
pub const SCREEN_HEIGHT: u32 = 600;
pub const WINDOW_TITLE: &str = "TigerEngine";

pub const GL_VERSION: (u8, u8) = (4, 3);
pub const CLEAR_COLOR: ColorRgba = ColorRgba::new(0.2, 0.3, 0.3, 1.0);

pub fn runtime_config() -> RuntimeConfig {
    RuntimeConfig {
        title: WINDOW_TITLE.to_string(),
        size: PhysicalSize::new(SCREEN_WIDTH, SCREEN_HEIGHT),
        clear_color: CLEAR_COLOR,
        ..RuntimeConfig::default()
    }
}

pub fn gl_init() -> GlInit {
    GlInit {
        gl_version: GL_VERSION,
        vsync: false,
        // Broken shaders are reported but do not stop the window from opening.
        shader_policy: ShaderPolicy::LogAndContinue,
    }
}
