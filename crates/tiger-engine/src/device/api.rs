use glow::HasContext;

use crate::coords::{ColorRgba, Viewport};
use crate::shader::ShaderStage;

/// The subset of OpenGL the engine issues.
///
/// Implemented for `glow::Context`; tests use `testing::RecordingGpu`. Every
/// method is a blocking call on the thread that owns the current context.
pub trait GpuApi {
    type Shader: Copy + std::fmt::Debug;
    type Program: Copy + std::fmt::Debug;
    type Buffer: Copy + std::fmt::Debug;

    fn new_shader(&self, stage: ShaderStage) -> Result<Self::Shader, String>;

    /// Uploads `source` and compiles it. Returns the compile status.
    fn compile_source(&self, shader: Self::Shader, source: &str) -> bool;

    fn shader_info_log(&self, shader: Self::Shader) -> String;

    fn drop_shader(&self, shader: Self::Shader);

    fn new_program(&self) -> Result<Self::Program, String>;

    /// Attaches `stages` and links. Returns the link status.
    fn link_stages(&self, program: Self::Program, stages: &[Self::Shader]) -> bool;

    fn program_info_log(&self, program: Self::Program) -> String;

    fn drop_program(&self, program: Self::Program);

    /// Allocates an `ARRAY_BUFFER` sized to `data` and fills it with a
    /// `STATIC_DRAW` usage hint. The buffer stays bound.
    fn new_static_buffer(&self, data: &[u8]) -> Result<Self::Buffer, String>;

    /// Reads back the first `len` bytes of `buffer`.
    fn read_buffer_bytes(&self, buffer: Self::Buffer, len: usize) -> Vec<u8>;

    fn drop_buffer(&self, buffer: Self::Buffer);

    /// Fills the color buffer of the current framebuffer with `color`.
    fn clear_color_buffer(&self, color: ColorRgba);

    fn set_viewport(&self, viewport: Viewport);
}

/// Presents the back buffer.
pub trait Present {
    fn present(&self) -> anyhow::Result<()>;
}

// SAFETY (all blocks below): the context is current on this thread for the
// whole lifetime of `GlWindow`, which owns the `glow::Context`.
impl GpuApi for glow::Context {
    type Shader = glow::NativeShader;
    type Program = glow::NativeProgram;
    type Buffer = glow::NativeBuffer;

    fn new_shader(&self, stage: ShaderStage) -> Result<Self::Shader, String> {
        unsafe { self.create_shader(stage.gl_enum()) }
    }

    fn compile_source(&self, shader: Self::Shader, source: &str) -> bool {
        unsafe {
            self.shader_source(shader, source);
            self.compile_shader(shader);
            self.get_shader_compile_status(shader)
        }
    }

    fn shader_info_log(&self, shader: Self::Shader) -> String {
        unsafe { self.get_shader_info_log(shader) }
    }

    fn drop_shader(&self, shader: Self::Shader) {
        unsafe { self.delete_shader(shader) }
    }

    fn new_program(&self) -> Result<Self::Program, String> {
        unsafe { self.create_program() }
    }

    fn link_stages(&self, program: Self::Program, stages: &[Self::Shader]) -> bool {
        unsafe {
            for &stage in stages {
                self.attach_shader(program, stage);
            }
            self.link_program(program);
            self.get_program_link_status(program)
        }
    }

    fn program_info_log(&self, program: Self::Program) -> String {
        unsafe { self.get_program_info_log(program) }
    }

    fn drop_program(&self, program: Self::Program) {
        unsafe { self.delete_program(program) }
    }

    fn new_static_buffer(&self, data: &[u8]) -> Result<Self::Buffer, String> {
        unsafe {
            let buffer = self.create_buffer()?;
            self.bind_buffer(glow::ARRAY_BUFFER, Some(buffer));
            self.buffer_data_u8_slice(glow::ARRAY_BUFFER, data, glow::STATIC_DRAW);
            Ok(buffer)
        }
    }

    fn read_buffer_bytes(&self, buffer: Self::Buffer, len: usize) -> Vec<u8> {
        let mut out = vec![0u8; len];
        unsafe {
            self.bind_buffer(glow::ARRAY_BUFFER, Some(buffer));
            self.get_buffer_sub_data(glow::ARRAY_BUFFER, 0, &mut out);
        }
        out
    }

    fn drop_buffer(&self, buffer: Self::Buffer) {
        unsafe { self.delete_buffer(buffer) }
    }

    fn clear_color_buffer(&self, color: ColorRgba) {
        unsafe {
            self.clear_color(color.r, color.g, color.b, color.a);
            self.clear(glow::COLOR_BUFFER_BIT);
        }
    }

    fn set_viewport(&self, viewport: Viewport) {
        let (w, h) = viewport.gl_size();
        unsafe { self.viewport(0, 0, w, h) }
    }
}
