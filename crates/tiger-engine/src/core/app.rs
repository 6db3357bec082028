use winit::event::WindowEvent;

use super::ctx::{FrameCtx, InitCtx};
use crate::device::GpuApi;

/// Control directive returned by app callbacks.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum AppControl {
    Continue,
    Exit,
}

/// Application contract implemented by higher layers.
///
/// `G` is the GL backend; the runtime uses `glow::Context`.
pub trait App<G: GpuApi> {
    /// Called once, after the context is current and functions are loaded.
    ///
    /// An error here is fatal for the process.
    fn on_init(&mut self, ctx: &InitCtx<'_, G>) -> anyhow::Result<()> {
        let _ = ctx;
        Ok(())
    }

    /// Called for window events, before the runtime handles them.
    fn on_window_event(&mut self, event: &WindowEvent) -> AppControl {
        let _ = event;
        AppControl::Continue
    }

    /// Called at the start of every frame, before clear and swap.
    ///
    /// Returning `Exit` still lets the current frame finish.
    fn on_frame(&mut self, ctx: &mut FrameCtx<'_, G>) -> AppControl;

    /// Called once when the loop ends, while the context is still alive.
    fn on_exit(&mut self, gpu: &G) {
        let _ = gpu;
    }
}
