//! Reading progress and the go-to-top affordance.

use longstrip_types::geometry::Viewport;

use crate::layout::StripLayout;

/// A snapshot of reading progress for the host's chrome.
#[derive(Debug, Clone, PartialEq)]
pub struct ProgressUpdate {
    /// 1-based index of the page currently being read.
    pub current_page: u32,
    /// Total pages in the chapter.
    pub total_pages: u32,
    /// `current / total`, in [0, 1] (progress bar width).
    pub fraction: f32,
    /// Text readout, e.g. `"3 / 12"`.
    pub label: String,
    /// Whether the scroll-to-top control should be visible.
    pub show_top_button: bool,
}

/// Compute progress from geometry alone.
///
/// The current page is the highest-indexed placeholder whose top edge
/// has scrolled above the vertical midpoint of the viewport; if none
/// qualifies, page 1. Placeholders are scanned last to first so the
/// first match wins. The top button shows once the scroll offset
/// exceeds one viewport height.
pub fn compute(viewport: &Viewport, layout: &StripLayout, total_pages: u32) -> ProgressUpdate {
    let midpoint = viewport.height / 2;
    let mut current_page = 1;
    for index in (1..=total_pages).rev() {
        if let Some(rect) = layout.page_rect(index)
            && viewport.to_viewport_y(rect.top) < midpoint
        {
            current_page = index;
            break;
        }
    }

    let fraction = if total_pages == 0 {
        0.0
    } else {
        current_page as f32 / total_pages as f32
    };

    ProgressUpdate {
        current_page,
        total_pages,
        fraction,
        label: format!("{current_page} / {total_pages}"),
        show_top_button: viewport.scroll_y > viewport.height,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ratio::AspectRatio;

    /// Five 2/3 pages at 800px wide: each placeholder is 1200px tall.
    fn five_page_layout() -> StripLayout {
        let ratio = AspectRatio::parse("2/3").unwrap();
        StripLayout::build(800, std::iter::repeat_n(&ratio, 5))
    }

    fn viewport_at(scroll_y: i32) -> Viewport {
        Viewport {
            width: 800,
            height: 600,
            scroll_y,
        }
    }

    #[test]
    fn at_top_current_page_is_one() {
        let layout = five_page_layout();
        let p = compute(&viewport_at(0), &layout, 5);
        assert_eq!(p.current_page, 1);
        assert_eq!(p.label, "1 / 5");
        assert!((p.fraction - 0.2).abs() < 1e-6);
        assert!(!p.show_top_button);
    }

    #[test]
    fn page_top_above_midpoint_wins() {
        let layout = five_page_layout();
        // Placeholder 5 spans [4800, 6000). Scroll so its top sits at
        // 40% of the viewport height (240px < 300px midpoint).
        let p = compute(&viewport_at(4800 - 240), &layout, 5);
        assert_eq!(p.current_page, 5);
        assert_eq!(p.label, "5 / 5");
        assert!((p.fraction - 1.0).abs() < 1e-6);
    }

    #[test]
    fn page_top_below_midpoint_does_not_count() {
        let layout = five_page_layout();
        // Placeholder 2 starts at 1200; put its top at 360px (> 300px
        // midpoint), so page 1 is still current.
        let p = compute(&viewport_at(1200 - 360), &layout, 5);
        assert_eq!(p.current_page, 1);
    }

    #[test]
    fn midpoint_is_exclusive() {
        let layout = five_page_layout();
        // Top exactly at the midpoint does not qualify.
        let p = compute(&viewport_at(1200 - 300), &layout, 5);
        assert_eq!(p.current_page, 1);
        // One pixel above does.
        let p = compute(&viewport_at(1200 - 299), &layout, 5);
        assert_eq!(p.current_page, 2);
    }

    #[test]
    fn top_button_visibility_threshold() {
        let layout = five_page_layout();
        assert!(!compute(&viewport_at(600), &layout, 5).show_top_button);
        assert!(compute(&viewport_at(601), &layout, 5).show_top_button);
    }

    #[test]
    fn progress_monotonic_in_scroll() {
        let layout = five_page_layout();
        let mut prev = 0;
        for scroll_y in (0..=5400).step_by(100) {
            let p = compute(&viewport_at(scroll_y), &layout, 5);
            assert!(
                p.current_page >= prev,
                "page went backwards at scroll_y={scroll_y}",
            );
            prev = p.current_page;
        }
        assert_eq!(prev, 5);
    }

    #[test]
    fn single_page_chapter_is_always_page_one() {
        let ratio = AspectRatio::parse("2/3").unwrap();
        let layout = StripLayout::build(800, std::iter::once(&ratio));
        let p = compute(&viewport_at(0), &layout, 1);
        assert_eq!(p.current_page, 1);
        assert_eq!(p.label, "1 / 1");
        assert!((p.fraction - 1.0).abs() < 1e-6);
    }
}
