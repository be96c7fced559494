//! Display box shared by every embedded object.
//!
//! # Invariants
//! - `width` and `height` only change through `resize`, which never shrinks
//!   either edge to `MIN_FRAME_EDGE` or below.
//! - `background` is an opaque color value; the core never interprets it.

/// Edge length (layout units) a frame must stay strictly above.
pub const MIN_FRAME_EDGE: u32 = 50;

/// Size and background color of one embedded object's box.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Frame {
    width: u32,
    height: u32,
    background: String,
}

impl Frame {
    /// Creates a frame as given, without applying the resize floor.
    ///
    /// Persisted sizes are restored verbatim even when they are small.
    pub fn new(width: u32, height: u32, background: impl Into<String>) -> Self {
        Self {
            width,
            height,
            background: background.into(),
        }
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn background(&self) -> &str {
        &self.background
    }

    /// Applies a drag-resize request.
    ///
    /// Returns `false` and leaves the frame untouched when either edge is not
    /// above `MIN_FRAME_EDGE`.
    pub fn resize(&mut self, width: u32, height: u32) -> bool {
        if width <= MIN_FRAME_EDGE || height <= MIN_FRAME_EDGE {
            return false;
        }
        self.width = width;
        self.height = height;
        true
    }

    pub fn set_background(&mut self, color: impl Into<String>) {
        self.background = color.into();
    }
}
