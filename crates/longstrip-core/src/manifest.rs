//! Chapter manifest: the JSON document describing a chapter's page
//! count and aspect ratios.
//!
//! Fetched exactly once at startup from `{image_path}manifest.json`,
//! validated, then immutable. There is no retry and no caching across
//! sessions.

use serde::Deserialize;

use longstrip_types::error::Result;

use crate::config::{OverrideTarget, ReaderConfig};
use crate::loader::ResourceFetcher;
use crate::ratio::AspectRatio;

/// User-visible text when the manifest cannot be fetched or parsed.
pub const LOAD_FAILED_TEXT: &str = "Failed to load chapter data.";
/// User-visible text for a zero-page chapter.
pub const EMPTY_CHAPTER_TEXT: &str = "No images found in chapter.";
/// User-visible text when a required manifest field is missing or bad.
pub const CORRUPT_MANIFEST_TEXT: &str = "Chapter data is corrupted (missing aspect ratio).";

/// The manifest as it appears on the wire (camelCase field names).
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChapterManifest {
    /// Page count. A missing field reads as zero, which is the
    /// distinct "no images" failure, not a parse error.
    #[serde(default)]
    pub total_images: u32,
    /// Required; its absence is the "corrupted chapter" failure.
    pub default_aspect_ratio: Option<String>,
    /// Optional override for one page (see [`OverrideTarget`]).
    pub last_image_aspect_ratio: Option<String>,
    /// Legacy key from older chapter generators; honored only when the
    /// override target is the first page.
    pub first_image_aspect_ratio: Option<String>,
}

impl ChapterManifest {
    /// Parse manifest JSON bytes.
    pub fn parse(bytes: &[u8]) -> Result<Self> {
        Ok(serde_json::from_slice(bytes)?)
    }

    /// Validate the manifest into a [`ChapterInfo`].
    pub fn validate(
        &self,
        target: OverrideTarget,
    ) -> std::result::Result<ChapterInfo, ManifestError> {
        if self.total_images == 0 {
            return Err(ManifestError::EmptyChapter);
        }
        let default_text = self
            .default_aspect_ratio
            .as_deref()
            .ok_or(ManifestError::MissingDefaultRatio)?;
        let default_ratio = parse_ratio(default_text)?;

        let override_ratio = match target {
            OverrideTarget::LastPage => {
                if self.first_image_aspect_ratio.is_some() {
                    log::warn!(
                        "manifest carries legacy 'firstImageAspectRatio' but the \
                         override target is the last page; ignoring it",
                    );
                }
                self.last_image_aspect_ratio.as_deref()
            },
            OverrideTarget::FirstPage => {
                if self.last_image_aspect_ratio.is_some()
                    && self.first_image_aspect_ratio.is_some()
                {
                    log::warn!(
                        "manifest carries both override keys; using \
                         'firstImageAspectRatio' per the configured target",
                    );
                }
                self.first_image_aspect_ratio
                    .as_deref()
                    .or(self.last_image_aspect_ratio.as_deref())
            },
        };
        let override_ratio = override_ratio.map(parse_ratio).transpose()?;

        Ok(ChapterInfo {
            total_images: self.total_images,
            default_ratio,
            override_ratio,
            override_target: target,
        })
    }
}

fn parse_ratio(text: &str) -> std::result::Result<AspectRatio, ManifestError> {
    AspectRatio::parse(text).map_err(|_| ManifestError::BadRatio(text.to_string()))
}

/// Manifest validation failures, each mapping to a distinct
/// user-visible state.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ManifestError {
    #[error("chapter has no images")]
    EmptyChapter,

    #[error("manifest is missing 'defaultAspectRatio'")]
    MissingDefaultRatio,

    #[error("bad aspect ratio '{0}' in manifest")]
    BadRatio(String),
}

impl ManifestError {
    /// The static text shown in place of the reader content.
    pub fn user_message(&self) -> &'static str {
        match self {
            ManifestError::EmptyChapter => EMPTY_CHAPTER_TEXT,
            ManifestError::MissingDefaultRatio | ManifestError::BadRatio(_) => {
                CORRUPT_MANIFEST_TEXT
            },
        }
    }
}

/// A validated, immutable chapter description.
#[derive(Debug, Clone)]
pub struct ChapterInfo {
    /// Page count, always at least 1.
    pub total_images: u32,
    /// Ratio for every page without an override.
    pub default_ratio: AspectRatio,
    /// Ratio for the override page, when the manifest supplies one.
    pub override_ratio: Option<AspectRatio>,
    /// Which page the override applies to.
    pub override_target: OverrideTarget,
}

impl ChapterInfo {
    /// The displayed aspect ratio for a 1-based page index.
    ///
    /// A single-page chapter is simultaneously first and last, so the
    /// override applies to it under either target.
    pub fn ratio_for_page(&self, index: u32) -> &AspectRatio {
        let Some(override_ratio) = &self.override_ratio else {
            return &self.default_ratio;
        };
        let applies = match self.override_target {
            OverrideTarget::LastPage => index == self.total_images,
            OverrideTarget::FirstPage => index == 1,
        };
        if applies {
            override_ratio
        } else {
            &self.default_ratio
        }
    }
}

/// Fetch and parse the chapter manifest. Single attempt, fail fast.
pub fn load_manifest(fetcher: &dyn ResourceFetcher, config: &ReaderConfig) -> Result<ChapterManifest> {
    let url = config.manifest_url();
    log::debug!("fetching manifest from {url}");
    let bytes = fetcher.fetch(&url)?;
    ChapterManifest::parse(&bytes)
}
