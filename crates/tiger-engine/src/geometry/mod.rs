//! Static vertex data on the GPU.

mod buffer;

pub use buffer::{upload_static_geometry, VertexBuffer, POSITION_COMPONENTS};
