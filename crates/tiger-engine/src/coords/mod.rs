//! Small value types shared by the GL layer and applications.

mod color;
mod viewport;

pub use color::ColorRgba;
pub use viewport::Viewport;
