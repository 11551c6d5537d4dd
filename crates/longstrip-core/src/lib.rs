//! Vertical strip reader engine: manifest loading, responsive image
//! candidate generation, lazy load triggering, and reading progress.
//!
//! The engine is headless. A host supplies a [`loader::ResourceFetcher`]
//! and an image decoder, drives the scroll offset, and services the
//! [`LoadRequest`]s the engine emits; the engine owns page construction,
//! placeholder geometry, the proximity observer that activates loads
//! before pages become visible, and the throttled progress tracker.

pub mod config;
pub mod layout;
pub mod loader;
pub mod manifest;
pub mod observe;
pub mod page;
pub mod progress;
pub mod ratio;
pub mod reader;
pub mod scroll;
pub mod srcset;
pub mod throttle;

// -----------------------------------------------------------------------
// Public re-exports
// -----------------------------------------------------------------------

pub use config::{OverrideTarget, ReaderConfig};
pub use manifest::{ChapterInfo, ChapterManifest, ManifestError, load_manifest};
pub use page::{LoadState, Page};
pub use progress::ProgressUpdate;
pub use reader::{InitError, LoadRequest, ScrollOutcome, StripReader};
pub use srcset::{ImageCandidate, ImageCandidateSet, SourceSet};
