use crate::coords::Viewport;
use crate::device::{GlInit, GpuApi};

/// Context passed to `App::on_init`.
pub struct InitCtx<'a, G: GpuApi> {
    pub gpu: &'a G,
    pub init: &'a GlInit,
}

/// Per-frame context passed to `App::on_frame`.
pub struct FrameCtx<'a, G: GpuApi> {
    pub gpu: &'a G,
    pub viewport: Viewport,
    /// Number of frames completed before this one.
    pub frame_index: u64,
}
