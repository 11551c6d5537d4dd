//! Host-side wiring: chapter location handling, fetcher selection, and
//! image decoding for the engine's load requests.

use std::path::PathBuf;

use longstrip_core::config::{ReaderConfig, ReaderConfigFile};
use longstrip_core::loader::{FsFetcher, HttpFetcher, ResourceFetcher};
use longstrip_core::{LoadRequest, StripReader};
use longstrip_types::error::Result;

/// Where a chapter lives.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ChapterLocation {
    /// A local directory containing `manifest.json` and the slices.
    Dir(PathBuf),
    /// A plain-HTTP base URL.
    Http(String),
}

impl ChapterLocation {
    pub fn parse(arg: &str) -> Self {
        if arg.starts_with("http://") {
            let mut url = arg.to_string();
            if !url.ends_with('/') {
                url.push('/');
            }
            ChapterLocation::Http(url)
        } else {
            ChapterLocation::Dir(PathBuf::from(arg))
        }
    }

    /// The fetcher serving this location.
    pub fn fetcher(&self) -> Box<dyn ResourceFetcher> {
        match self {
            ChapterLocation::Dir(dir) => Box::new(FsFetcher::new(dir.clone())),
            ChapterLocation::Http(_) => Box::new(HttpFetcher::new()),
        }
    }

    /// Rebase the config's `image_path` onto this location: relative
    /// paths for the filesystem fetcher, the full base URL for HTTP.
    pub fn apply_to(&self, mut config: ReaderConfig) -> ReaderConfig {
        config.image_path = match self {
            ChapterLocation::Dir(_) => String::new(),
            ChapterLocation::Http(url) => url.clone(),
        };
        config
    }

    /// Load `reader.toml` overrides next to a local chapter, if present.
    pub fn config_overrides(&self) -> Result<Option<ReaderConfigFile>> {
        let ChapterLocation::Dir(dir) = self else {
            return Ok(None);
        };
        let path = dir.join("reader.toml");
        if !path.is_file() {
            return Ok(None);
        }
        let text = std::fs::read_to_string(&path)?;
        log::info!("applying config overrides from {}", path.display());
        Ok(Some(ReaderConfigFile::from_toml(&text)?))
    }
}

/// Parse a `WIDTHxHEIGHT` viewport spec.
pub fn parse_viewport(spec: &str) -> Option<(i32, i32)> {
    let (w, h) = spec.split_once('x')?;
    let w: i32 = w.parse().ok()?;
    let h: i32 = h.parse().ok()?;
    if w > 0 && h > 0 { Some((w, h)) } else { None }
}

/// Decode image bytes; the error string feeds the page's inline error.
pub fn decode_image(bytes: &[u8]) -> std::result::Result<(), String> {
    image::load_from_memory(bytes)
        .map(|_| ())
        .map_err(|e| e.to_string())
}

/// Service load requests: fetch and decode each page's fallback
/// candidate, then report the outcome back to the engine.
///
/// The fallback is the one candidate guaranteed to exist; a real
/// frontend would negotiate formats from `request.sources` first.
pub fn service_requests(
    fetcher: &dyn ResourceFetcher,
    reader: &mut StripReader,
    requests: Vec<LoadRequest>,
) {
    for request in requests {
        let outcome = fetcher
            .fetch(&request.fallback.url)
            .map_err(|e| e.to_string())
            .and_then(|bytes| decode_image(&bytes));
        if outcome.is_ok() {
            log::info!("page {}: loaded {}", request.page, request.fallback.url);
        }
        reader.complete_load(request.page, outcome);
    }
}
