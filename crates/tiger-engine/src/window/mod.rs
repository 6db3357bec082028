//! Window + runtime loop.
//!
//! Owns the `winit` EventLoop and the single GL window, and drives the
//! application through `render::FrameLoop`.

mod runtime;

pub use runtime::{Runtime, RuntimeConfig};
