//! Vertical-strip geometry primitives.
//!
//! The reader only ever scrolls on one axis, so a "rect" here is a
//! vertical extent: a top offset and a height, both in strip pixels.

/// A vertical extent within the strip, in content coordinates
/// (y = 0 is the top of the first placeholder).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Rect {
    /// Top edge, in content pixels.
    pub top: i32,
    /// Height in pixels. Never negative.
    pub height: i32,
}

impl Rect {
    pub fn new(top: i32, height: i32) -> Self {
        Self {
            top,
            height: height.max(0),
        }
    }

    /// Bottom edge (exclusive).
    pub fn bottom(&self) -> i32 {
        self.top + self.height
    }

    /// Whether this extent overlaps `[region_top, region_bottom)`.
    pub fn intersects(&self, region_top: i32, region_bottom: i32) -> bool {
        self.top < region_bottom && self.bottom() > region_top
    }
}

/// The visible window onto the strip.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Viewport {
    /// Viewport width in pixels (placeholders span the full width).
    pub width: i32,
    /// Viewport height in pixels.
    pub height: i32,
    /// Current vertical scroll offset in content pixels.
    pub scroll_y: i32,
}

impl Viewport {
    pub fn new(width: i32, height: i32) -> Self {
        Self {
            width,
            height,
            scroll_y: 0,
        }
    }

    /// Content y-coordinate of the viewport's vertical midpoint.
    pub fn midpoint(&self) -> i32 {
        self.scroll_y + self.height / 2
    }

    /// Convert a content y-coordinate to viewport-relative pixels
    /// (negative means above the visible window).
    pub fn to_viewport_y(&self, content_y: i32) -> i32 {
        content_y - self.scroll_y
    }
}
