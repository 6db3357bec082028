use anyhow::Result;

use crate::coords::{ColorRgba, Viewport};
use crate::core::{App, AppControl, FrameCtx};
use crate::device::{GpuApi, Present};

/// One iteration of the render loop, independent of the platform.
///
/// Order per frame: app input/close check, clear, present. A close request
/// raised during a frame takes effect after that frame has been presented.
#[derive(Debug, Clone)]
pub struct FrameLoop {
    clear_color: ColorRgba,
    frames: u64,
    close_requested: bool,
}

impl FrameLoop {
    pub fn new(clear_color: ColorRgba) -> Self {
        Self {
            clear_color,
            frames: 0,
            close_requested: false,
        }
    }

    #[inline]
    pub fn clear_color(&self) -> ColorRgba {
        self.clear_color
    }

    /// Frames cleared and presented so far.
    #[inline]
    pub fn frames_rendered(&self) -> u64 {
        self.frames
    }

    #[inline]
    pub fn close_requested(&self) -> bool {
        self.close_requested
    }

    pub fn request_close(&mut self) {
        if !self.close_requested {
            log::debug!("close requested after {} frames", self.frames);
        }
        self.close_requested = true;
    }

    /// Runs one frame.
    ///
    /// Returns `Exit` without rendering when a close was already pending, and
    /// `Exit` after presenting when the app asked to close during this frame.
    pub fn run_frame<A, G, P>(
        &mut self,
        app: &mut A,
        gpu: &G,
        target: &P,
        viewport: Viewport,
    ) -> Result<AppControl>
    where
        A: App<G>,
        G: GpuApi,
        P: Present,
    {
        if self.close_requested {
            return Ok(AppControl::Exit);
        }

        let mut ctx = FrameCtx {
            gpu,
            viewport,
            frame_index: self.frames,
        };
        if app.on_frame(&mut ctx) == AppControl::Exit {
            self.request_close();
        }

        gpu.clear_color_buffer(self.clear_color);
        target.present()?;
        self.frames += 1;

        log::trace!("frame {} presented", self.frames);

        Ok(if self.close_requested {
            AppControl::Exit
        } else {
            AppControl::Continue
        })
    }
}
