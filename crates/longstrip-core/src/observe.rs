//! Viewport-proximity observation.
//!
//! A generic "watch these extents, report the ones near the viewport"
//! utility. The watched region is the viewport expanded by a margin of
//! `margin_factor × viewport height` in both scroll directions, so a
//! load fires well before its placeholder becomes visible.
//!
//! The observer only reports; registration bookkeeping is shared with
//! the caller. Each entry is registered at most once, and the caller
//! unregisters an entry exactly once when its load succeeds. Entries
//! whose load failed stay registered but are inert, because their state
//! machine refuses a second trigger.

use std::collections::BTreeMap;

use longstrip_types::geometry::{Rect, Viewport};

/// Observes vertical extents keyed by page index.
#[derive(Debug)]
pub struct ProximityObserver {
    margin_factor: f32,
    entries: BTreeMap<u32, Rect>,
}

impl ProximityObserver {
    pub fn new(margin_factor: f32) -> Self {
        Self {
            margin_factor,
            entries: BTreeMap::new(),
        }
    }

    /// Register an extent. Re-registering the same key is ignored.
    pub fn observe(&mut self, key: u32, rect: Rect) {
        self.entries.entry(key).or_insert(rect);
    }

    /// Remove an entry. Removing an absent key is a no-op.
    pub fn unobserve(&mut self, key: u32) {
        self.entries.remove(&key);
    }

    pub fn is_observed(&self, key: u32) -> bool {
        self.entries.contains_key(&key)
    }

    pub fn observed_count(&self) -> usize {
        self.entries.len()
    }

    /// Keys whose extent intersects the expanded viewport region, in
    /// ascending order.
    pub fn check(&self, viewport: &Viewport) -> Vec<u32> {
        let margin = (viewport.height as f32 * self.margin_factor) as i32;
        let region_top = viewport.scroll_y - margin;
        let region_bottom = viewport.scroll_y + viewport.height + margin;
        self.entries
            .iter()
            .filter(|(_, rect)| rect.intersects(region_top, region_bottom))
            .map(|(&key, _)| key)
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn viewport_at(scroll_y: i32) -> Viewport {
        Viewport {
            width: 800,
            height: 600,
            scroll_y,
        }
    }

    #[test]
    fn reports_entries_within_margin() {
        let mut obs = ProximityObserver::new(2.0);
        obs.observe(1, Rect::new(0, 1000));
        obs.observe(2, Rect::new(1000, 1000));
        obs.observe(3, Rect::new(10_000, 1000));

        // Viewport [0, 600), margin 1200 → region [-1200, 1800).
        let fired = obs.check(&viewport_at(0));
        assert_eq!(fired, vec![1, 2]);
    }

    #[test]
    fn far_entries_fire_after_scrolling_near() {
        let mut obs = ProximityObserver::new(2.0);
        obs.observe(3, Rect::new(10_000, 1000));

        assert!(obs.check(&viewport_at(0)).is_empty());
        // Region [7100, 10_100) reaches the entry's top.
        assert_eq!(obs.check(&viewport_at(8300)), vec![3]);
    }

    #[test]
    fn zero_margin_is_plain_visibility() {
        let mut obs = ProximityObserver::new(0.0);
        obs.observe(1, Rect::new(700, 100));
        assert!(obs.check(&viewport_at(0)).is_empty());
        assert_eq!(obs.check(&viewport_at(200)), vec![1]);
    }

    #[test]
    fn duplicate_observe_keeps_first_extent() {
        let mut obs = ProximityObserver::new(0.0);
        obs.observe(1, Rect::new(0, 100));
        obs.observe(1, Rect::new(50_000, 100));
        assert_eq!(obs.observed_count(), 1);
        assert_eq!(obs.check(&viewport_at(0)), vec![1]);
    }

    #[test]
    fn unobserved_entries_never_fire() {
        let mut obs = ProximityObserver::new(2.0);
        obs.observe(1, Rect::new(0, 100));
        obs.unobserve(1);
        assert!(!obs.is_observed(1));
        assert!(obs.check(&viewport_at(0)).is_empty());
        // Unobserving again is harmless.
        obs.unobserve(1);
    }

    #[test]
    fn results_in_ascending_key_order() {
        let mut obs = ProximityObserver::new(2.0);
        obs.observe(9, Rect::new(200, 100));
        obs.observe(4, Rect::new(0, 100));
        obs.observe(7, Rect::new(100, 100));
        assert_eq!(obs.check(&viewport_at(0)), vec![4, 7, 9]);
    }
}
