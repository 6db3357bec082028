//! OpenGL context + function loading.
//!
//! This module is responsible for:
//! - creating the window together with a core-profile GL context (glutin)
//! - loading GL entry points (glow) and verifying the driver version
//! - the `GpuApi` seam used by shader/geometry/render code

mod api;
mod context;
mod error;
mod init;

pub use api::{GpuApi, Present};
pub use context::{create_gl_window, load_gl_functions, GlWindow};
pub use error::InitError;
pub use init::GlInit;
