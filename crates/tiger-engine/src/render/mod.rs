//! Per-frame rendering.
//!
//! The frame is constant: every iteration clears to one color and presents.

mod frame_loop;

pub use frame_loop::FrameLoop;
