//! Resource fetching.
//!
//! The engine never touches the network or filesystem directly; hosts
//! hand it a [`ResourceFetcher`]. Two implementations ship here: a
//! filesystem fetcher for local chapters and a minimal plain-HTTP
//! client for remote ones.

pub mod http;

use std::path::{Path, PathBuf};

use longstrip_types::error::Result;

pub use http::HttpFetcher;

/// One synchronous resource retrieval. A failed fetch is a failed
/// fetch; retry policy (there is none) belongs to the caller.
pub trait ResourceFetcher {
    fn fetch(&self, url: &str) -> Result<Vec<u8>>;
}

/// Serves resources from a directory tree; URLs are paths relative to
/// the root.
#[derive(Debug, Clone)]
pub struct FsFetcher {
    root: PathBuf,
}

impl FsFetcher {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }
}

impl ResourceFetcher for FsFetcher {
    fn fetch(&self, url: &str) -> Result<Vec<u8>> {
        let path = self.root.join(url);
        log::debug!("reading {}", path.display());
        Ok(std::fs::read(path)?)
    }
}
