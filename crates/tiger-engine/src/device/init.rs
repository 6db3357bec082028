use crate::shader::ShaderPolicy;

/// Initialization parameters for the GL layer.
///
/// Keep this structure minimal; add flags only when a concrete platform
/// requirement exists.
#[derive(Debug, Clone)]
pub struct GlInit {
    /// Requested OpenGL `(major, minor)` version. Core profile is always used.
    pub gl_version: (u8, u8),

    /// Wait for vblank on swap.
    ///
    /// Off by default: the render loop has no frame limiting of its own.
    pub vsync: bool,

    /// What to do when a shader stage fails to compile or the program fails
    /// to link.
    pub shader_policy: ShaderPolicy,
}

impl Default for GlInit {
    fn default() -> Self {
        Self {
            gl_version: (4, 3),
            vsync: false,
            shader_policy: ShaderPolicy::LogAndContinue,
        }
    }
}
