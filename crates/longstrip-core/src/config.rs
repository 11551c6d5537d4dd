//! Reader configuration.
//!
//! All URL construction and srcset generation derive deterministically
//! from this struct plus a page index. The config is immutable and passed
//! explicitly to each component at construction time.

use std::time::Duration;

use serde::Deserialize;

use longstrip_types::error::{LongstripError, Result};

/// Which page a manifest's per-page aspect-ratio override applies to.
///
/// Legacy chapters disagree on this; the rule is configurable rather
/// than silently picking one side.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OverrideTarget {
    /// The override ratio applies to the final page.
    #[default]
    LastPage,
    /// The override ratio applies to the first page.
    FirstPage,
}

/// Static reader configuration.
#[derive(Debug, Clone)]
pub struct ReaderConfig {
    /// Asset base URL, including trailing slash (e.g. `assets/manhwa/`).
    pub image_path: String,
    /// Filename stem (e.g. `slice_`).
    pub image_prefix: String,
    /// Zero-pad width for page numbers in filenames.
    pub pad_length: usize,
    /// Candidate encodings in preference order.
    pub image_formats: Vec<String>,
    /// The encoding guaranteed to exist for the fallback image.
    pub fallback_format: String,
    /// Width of the main, unsuffixed image file.
    pub base_width: u32,
    /// Additional suffixed widths (`-{w}w`). May be empty.
    pub smaller_widths: Vec<u32>,
    /// Pages eagerly loaded beyond page 1.
    pub preload_count: u32,
    /// Minimum interval between scroll-driven progress recomputations.
    pub scroll_throttle: Duration,
    /// Load-trigger margin as a multiple of the viewport height.
    pub root_margin_factor: f32,
    /// Which page the manifest's override ratio applies to.
    pub override_target: OverrideTarget,
}

impl Default for ReaderConfig {
    fn default() -> Self {
        Self {
            image_path: "assets/manhwa/".to_string(),
            image_prefix: "slice_".to_string(),
            pad_length: 3,
            image_formats: vec!["avif".to_string(), "webp".to_string()],
            fallback_format: "webp".to_string(),
            base_width: 1600,
            smaller_widths: vec![800],
            preload_count: 2,
            scroll_throttle: Duration::from_millis(100),
            root_margin_factor: 2.0,
            override_target: OverrideTarget::LastPage,
        }
    }
}

impl ReaderConfig {
    /// All configured widths, descending, duplicates removed.
    pub fn all_widths(&self) -> Vec<u32> {
        let mut widths = Vec::with_capacity(1 + self.smaller_widths.len());
        widths.push(self.base_width);
        widths.extend_from_slice(&self.smaller_widths);
        widths.sort_unstable_by(|a, b| b.cmp(a));
        widths.dedup();
        widths
    }

    /// The smallest configured width (used for the guaranteed fallback).
    pub fn smallest_width(&self) -> u32 {
        self.smaller_widths
            .iter()
            .copied()
            .chain(std::iter::once(self.base_width))
            .min()
            .unwrap_or(self.base_width)
    }

    /// The `sizes` hint handed to the host alongside each candidate set,
    /// derived from the smallest configured width.
    pub fn sizes(&self) -> String {
        let w = self.smallest_width();
        format!("(max-width: {w}px) 100vw, {w}px")
    }

    /// Zero-padded image number for a 1-based page index.
    pub fn page_number(&self, index: u32) -> String {
        format!("{index:0width$}", width = self.pad_length)
    }

    /// URL of the chapter manifest.
    pub fn manifest_url(&self) -> String {
        format!("{}manifest.json", self.image_path)
    }

    /// Check invariants that URL and layout generation rely on.
    pub fn validate(&self) -> Result<()> {
        if self.image_formats.is_empty() {
            return Err(LongstripError::Config(
                "image_formats must list at least one encoding".into(),
            ));
        }
        if self.fallback_format.is_empty() {
            return Err(LongstripError::Config("fallback_format is empty".into()));
        }
        if self.base_width == 0 {
            return Err(LongstripError::Config("base_width must be non-zero".into()));
        }
        if self.smaller_widths.contains(&0) {
            return Err(LongstripError::Config(
                "smaller_widths must be non-zero".into(),
            ));
        }
        if self.root_margin_factor < 0.0 {
            return Err(LongstripError::Config(
                "root_margin_factor must not be negative".into(),
            ));
        }
        Ok(())
    }
}

// -----------------------------------------------------------------------
// TOML overrides
// -----------------------------------------------------------------------

/// Optional per-chapter overrides loaded from a `reader.toml`.
///
/// Every field is optional; absent fields keep the built-in default.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ReaderConfigFile {
    pub image_path: Option<String>,
    pub image_prefix: Option<String>,
    pub pad_length: Option<usize>,
    pub image_formats: Option<Vec<String>>,
    pub fallback_format: Option<String>,
    pub base_width: Option<u32>,
    pub smaller_widths: Option<Vec<u32>>,
    pub preload_count: Option<u32>,
    pub scroll_throttle_ms: Option<u64>,
    pub root_margin_factor: Option<f32>,
    pub override_target: Option<OverrideTarget>,
}

impl ReaderConfigFile {
    /// Parse a TOML overrides document.
    pub fn from_toml(text: &str) -> Result<Self> {
        Ok(toml::from_str(text)?)
    }

    /// Apply these overrides on top of a base configuration.
    pub fn apply(self, mut base: ReaderConfig) -> ReaderConfig {
        if let Some(v) = self.image_path {
            base.image_path = v;
        }
        if let Some(v) = self.image_prefix {
            base.image_prefix = v;
        }
        if let Some(v) = self.pad_length {
            base.pad_length = v;
        }
        if let Some(v) = self.image_formats {
            base.image_formats = v;
        }
        if let Some(v) = self.fallback_format {
            base.fallback_format = v;
        }
        if let Some(v) = self.base_width {
            base.base_width = v;
        }
        if let Some(v) = self.smaller_widths {
            base.smaller_widths = v;
        }
        if let Some(v) = self.preload_count {
            base.preload_count = v;
        }
        if let Some(v) = self.scroll_throttle_ms {
            base.scroll_throttle = Duration::from_millis(v);
        }
        if let Some(v) = self.root_margin_factor {
            base.root_margin_factor = v;
        }
        if let Some(v) = self.override_target {
            base.override_target = v;
        }
        base
    }
}
