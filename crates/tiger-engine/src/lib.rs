//! Tiger engine crate.
//!
//! Owns the platform runtime (winit + glutin) and the thin OpenGL layer used by
//! the studio binary: context creation, shader compilation, static geometry
//! upload and the clear/swap frame loop.

pub mod device;
pub mod window;
pub mod core;

pub mod logging;
pub mod coords;
pub mod shader;
pub mod geometry;
pub mod render;

#[cfg(any(test, feature = "testing"))]
pub mod testing;
