//! Responsive image candidate generation.
//!
//! Every URL follows the asset pipeline's naming convention:
//! `{path}{prefix}{zero-padded index}[-{width}w].{format}`, where the
//! suffix is omitted iff the width is the base (largest) width.

use crate::config::ReaderConfig;

/// One concrete (URL, width) candidate.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageCandidate {
    pub url: String,
    pub width: u32,
}

/// The candidates for one encoding format, in descending width order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceSet {
    /// MIME type, e.g. `image/webp`.
    pub mime: String,
    /// The candidates, widest first.
    pub candidates: Vec<ImageCandidate>,
}

impl SourceSet {
    /// The srcset attribute value: `url 1600w, url-800w.webp 800w`.
    pub fn srcset(&self) -> String {
        let parts: Vec<String> = self
            .candidates
            .iter()
            .map(|c| format!("{} {}w", c.url, c.width))
            .collect();
        parts.join(", ")
    }
}

/// The full candidate set for one page: one [`SourceSet`] per configured
/// format plus the guaranteed fallback.
///
/// Built inert at page construction; none of these URLs is handed to the
/// host until the page's load is triggered.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageCandidateSet {
    /// Per-format source sets, in configured preference order.
    pub sources: Vec<SourceSet>,
    /// The candidate guaranteed to exist: fallback format at the
    /// smallest configured width.
    pub fallback: ImageCandidate,
    /// Viewport sizes hint for the host's selection logic.
    pub sizes: String,
}

/// Build the URL for one (page, width, format) triple.
pub fn image_url(config: &ReaderConfig, index: u32, width: u32, format: &str) -> String {
    let number = config.page_number(index);
    let suffix = if width == config.base_width {
        String::new()
    } else {
        format!("-{width}w")
    };
    format!(
        "{}{}{}{}.{}",
        config.image_path, config.image_prefix, number, suffix, format,
    )
}

/// Build the inert candidate set for a 1-based page index.
pub fn candidate_set(config: &ReaderConfig, index: u32) -> ImageCandidateSet {
    let widths = config.all_widths();

    let sources = config
        .image_formats
        .iter()
        .map(|format| SourceSet {
            mime: format!("image/{format}"),
            candidates: widths
                .iter()
                .map(|&width| ImageCandidate {
                    url: image_url(config, index, width, format),
                    width,
                })
                .collect(),
        })
        .collect();

    let smallest = config.smallest_width();
    let fallback = ImageCandidate {
        url: image_url(config, index, smallest, &config.fallback_format),
        width: smallest,
    };

    ImageCandidateSet {
        sources,
        fallback,
        sizes: config.sizes(),
    }
}
