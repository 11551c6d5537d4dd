//! Viewport scroll offset management.

/// Fraction of the remaining distance covered per tick of the smooth
/// scroll-to-top animation.
const EASE_FRACTION: f32 = 0.2;

/// Minimum pixels moved per tick so the animation terminates.
const MIN_STEP: i32 = 8;

/// Scroll state for the reader viewport.
#[derive(Debug, Clone)]
pub struct ScrollState {
    /// Current vertical scroll offset in content pixels.
    scroll_y: i32,
    /// Total strip height (from layout).
    content_height: i32,
    /// Visible viewport height.
    viewport_height: i32,
    /// Whether the smooth scroll-to-top animation is running.
    easing_to_top: bool,
}

impl ScrollState {
    pub fn new(viewport_height: i32) -> Self {
        Self {
            scroll_y: 0,
            content_height: 0,
            viewport_height,
            easing_to_top: false,
        }
    }

    pub fn scroll_y(&self) -> i32 {
        self.scroll_y
    }

    pub fn viewport_height(&self) -> i32 {
        self.viewport_height
    }

    /// Update content height (after layout).
    pub fn set_content_height(&mut self, height: i32) {
        self.content_height = height;
        self.clamp();
    }

    /// Scroll to an absolute offset. Cancels any to-top animation.
    pub fn scroll_to(&mut self, y: i32) {
        self.easing_to_top = false;
        self.scroll_y = y;
        self.clamp();
    }

    /// Scroll by a relative amount (e.g. a wheel notch).
    pub fn scroll_by(&mut self, delta: i32) {
        self.easing_to_top = false;
        self.scroll_y += delta;
        self.clamp();
    }

    /// Jump straight to the top.
    pub fn scroll_to_top(&mut self) {
        self.easing_to_top = false;
        self.scroll_y = 0;
    }

    /// Begin the smooth scroll-to-top animation; drive it with
    /// [`ScrollState::tick`].
    pub fn start_scroll_to_top(&mut self) {
        self.easing_to_top = self.scroll_y > 0;
    }

    /// Advance the smooth scroll animation one frame. Returns true if
    /// still animating.
    pub fn tick(&mut self) -> bool {
        if !self.easing_to_top {
            return false;
        }
        let step = ((self.scroll_y as f32 * EASE_FRACTION) as i32).max(MIN_STEP);
        self.scroll_y = (self.scroll_y - step).max(0);
        if self.scroll_y == 0 {
            self.easing_to_top = false;
        }
        self.easing_to_top
    }

    /// Maximum scroll offset.
    pub fn max_scroll(&self) -> i32 {
        (self.content_height - self.viewport_height).max(0)
    }

    pub fn at_top(&self) -> bool {
        self.scroll_y == 0
    }

    pub fn at_bottom(&self) -> bool {
        self.scroll_y >= self.max_scroll()
    }

    /// Clamp scroll_y to [0, max_scroll].
    fn clamp(&mut self) {
        let max = self.max_scroll();
        self.scroll_y = self.scroll_y.clamp(0, max);
    }
}
