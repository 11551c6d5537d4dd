//! Placeholder geometry for the vertical strip.
//!
//! The strip stacks one placeholder per page, full viewport width, in
//! page order. Each placeholder's height comes from its aspect ratio,
//! so the whole layout is known before any image loads (no layout
//! shift), and both the proximity observer and the progress tracker
//! work from geometry alone.

use longstrip_types::geometry::Rect;

use crate::ratio::AspectRatio;

/// Computed placeholder extents, indexed by page order.
#[derive(Debug, Clone)]
pub struct StripLayout {
    rects: Vec<Rect>,
    content_height: i32,
}

impl StripLayout {
    /// Stack placeholders top to bottom for the given ratios, in page
    /// order, at the given viewport width.
    pub fn build<'a, I>(viewport_width: i32, ratios: I) -> Self
    where
        I: IntoIterator<Item = &'a AspectRatio>,
    {
        let mut rects = Vec::new();
        let mut y = 0;
        for ratio in ratios {
            let height = ratio.height_for_width(viewport_width);
            rects.push(Rect::new(y, height));
            y += height;
        }
        Self {
            rects,
            content_height: y,
        }
    }

    /// Placeholder extent for a 1-based page index.
    pub fn page_rect(&self, index: u32) -> Option<Rect> {
        if index == 0 {
            return None;
        }
        self.rects.get(index as usize - 1).copied()
    }

    /// Total strip height in content pixels.
    pub fn content_height(&self) -> i32 {
        self.content_height
    }

    /// Number of placeholders.
    pub fn len(&self) -> usize {
        self.rects.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rects.is_empty()
    }
}
