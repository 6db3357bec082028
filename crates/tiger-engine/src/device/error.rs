use thiserror::Error;

/// Fatal errors raised while bringing up the window and GL context.
///
/// Every variant terminates the process; they are kept distinct for logging.
#[derive(Debug, Error)]
pub enum InitError {
    #[error("failed to create window: {0}")]
    Window(String),

    #[error("failed to create OpenGL context")]
    Context(#[source] glutin::error::Error),

    #[error("failed to create window surface: {0}")]
    Surface(String),

    #[error("failed to load OpenGL function `{0}`")]
    FunctionLoading(String),

    #[error("OpenGL {}.{} requested but driver reports {}.{}", requested.0, requested.1, actual.0, actual.1)]
    Version {
        requested: (u8, u8),
        actual: (u32, u32),
    },
}
