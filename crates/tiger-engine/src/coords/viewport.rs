/// Framebuffer size in physical pixels, as passed to `glViewport`.
#[derive(Debug, Copy, Clone, Default, PartialEq, Eq)]
pub struct Viewport {
    pub width: u32,
    pub height: u32,
}

impl Viewport {
    #[inline]
    pub const fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    /// Minimized windows report a zero-sized framebuffer.
    #[inline]
    pub fn is_valid(self) -> bool {
        self.width > 0 && self.height > 0
    }

    /// Size clamped into the `GLsizei` range.
    #[inline]
    pub fn gl_size(self) -> (i32, i32) {
        (
            i32::try_from(self.width).unwrap_or(i32::MAX),
            i32::try_from(self.height).unwrap_or(i32::MAX),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn zero_sized_viewport_is_invalid() {
        assert!(!Viewport::new(0, 600).is_valid());
        assert!(!Viewport::new(800, 0).is_valid());
        assert!(Viewport::new(800, 600).is_valid());
    }

    #[test]
    fn gl_size_saturates() {
        assert_eq!(Viewport::new(800, 600).gl_size(), (800, 600));
        assert_eq!(Viewport::new(u32::MAX, 1).gl_size(), (i32::MAX, 1));
    }
}
