//! Per-page state.

use crate::ratio::AspectRatio;
use crate::srcset::ImageCandidateSet;

/// Load state of one page. Transitions are monotonic:
/// `Pending → Loading → {Loaded | Error}`, never back.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadState {
    /// Built, candidates inert, waiting for a trigger.
    Pending,
    /// Candidates activated; decode in flight.
    Loading,
    /// Decoded and revealed.
    Loaded,
    /// Decode failed; terminal, no retry.
    Error,
}

/// One page of the strip. Created by the page builder, never destroyed
/// during a session; state transitions are owned by the load routine.
#[derive(Debug, Clone)]
pub struct Page {
    /// 1-based index.
    pub index: u32,
    /// Zero-padded image number, as it appears in filenames.
    pub number: String,
    /// Displayed aspect ratio (reserves layout height before load).
    pub ratio: AspectRatio,
    /// Inert responsive candidates, activated on load trigger.
    pub candidates: ImageCandidateSet,
    state: LoadState,
    error_text: Option<String>,
}

impl Page {
    pub fn new(index: u32, number: String, ratio: AspectRatio, candidates: ImageCandidateSet) -> Self {
        Self {
            index,
            number,
            ratio,
            candidates,
            state: LoadState::Pending,
            error_text: None,
        }
    }

    pub fn state(&self) -> LoadState {
        self.state
    }

    /// Whether the image has been decoded and revealed.
    pub fn is_revealed(&self) -> bool {
        self.state == LoadState::Loaded
    }

    /// Inline error text, present only in the `Error` state.
    pub fn error_text(&self) -> Option<&str> {
        self.error_text.as_deref()
    }

    /// Pending → Loading. Returns false (and does nothing) from any
    /// other state, which is what makes repeated triggers no-ops.
    pub(crate) fn begin_load(&mut self) -> bool {
        if self.state == LoadState::Pending {
            self.state = LoadState::Loading;
            true
        } else {
            false
        }
    }

    /// Loading → Loaded. Returns false from any other state.
    pub(crate) fn finish_load(&mut self) -> bool {
        if self.state == LoadState::Loading {
            self.state = LoadState::Loaded;
            true
        } else {
            false
        }
    }

    /// Loading → Error, replacing the page content with inline text
    /// referencing the page number. Terminal.
    pub(crate) fn fail_load(&mut self) -> bool {
        if self.state == LoadState::Loading {
            self.state = LoadState::Error;
            self.error_text = Some(format!("Error loading page {}", self.index));
            true
        } else {
            false
        }
    }
}
