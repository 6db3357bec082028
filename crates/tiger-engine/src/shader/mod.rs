//! Shader compilation and program linking.
//!
//! Compile and link failures are reported through a bounded diagnostic on the
//! returned value. Whether they stop the program is decided by `ShaderPolicy`.

mod compile;
mod diagnostic;
mod stage;

pub use compile::{build_program, compile_shader, link_program, CompiledShader, LinkedProgram};
pub use diagnostic::MAX_DIAGNOSTIC_LEN;
pub use stage::ShaderStage;

use thiserror::Error;

/// Reaction to a compile or link diagnostic.
#[derive(Debug, Copy, Clone, Default, Eq, PartialEq)]
pub enum ShaderPolicy {
    /// Log the diagnostic and keep running with the broken shader/program.
    #[default]
    LogAndContinue,
    /// Log the diagnostic and fail `build_program`.
    Abort,
}

#[derive(Debug, Error)]
pub enum ShaderError {
    #[error("{stage} shader failed to compile: {diagnostic}")]
    Compile {
        stage: ShaderStage,
        diagnostic: String,
    },

    #[error("shader program failed to link: {diagnostic}")]
    Link { diagnostic: String },

    #[error("failed to create {object}: {reason}")]
    Create { object: &'static str, reason: String },
}
