//! The strip reader: ties manifest, page construction, lazy loading,
//! scroll state, and progress tracking together.
//!
//! The host drives the reader with scroll offsets and a clock, services
//! the [`LoadRequest`]s it emits (fetch + decode), and reports each
//! decode outcome back via [`StripReader::complete_load`].

use std::time::Instant;

use longstrip_types::error::LongstripError;
use longstrip_types::geometry::Viewport;

use crate::config::ReaderConfig;
use crate::layout::StripLayout;
use crate::manifest::{ChapterInfo, ChapterManifest, LOAD_FAILED_TEXT, ManifestError};
use crate::observe::ProximityObserver;
use crate::page::Page;
use crate::progress::{self, ProgressUpdate};
use crate::scroll::ScrollState;
use crate::srcset::{ImageCandidate, SourceSet, candidate_set};
use crate::throttle::Throttle;

/// Why reader initialization failed. Fatal: no partial page list is
/// ever built.
#[derive(Debug, thiserror::Error)]
pub enum InitError {
    #[error(transparent)]
    Manifest(#[from] ManifestError),

    #[error(transparent)]
    Engine(#[from] LongstripError),
}

impl InitError {
    /// The static text shown in place of the reader content.
    pub fn user_message(&self) -> &'static str {
        match self {
            InitError::Manifest(e) => e.user_message(),
            InitError::Engine(_) => LOAD_FAILED_TEXT,
        }
    }
}

/// An activated candidate set for one page: the host should fetch and
/// decode the best candidate it supports and report the outcome back.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoadRequest {
    /// 1-based page index.
    pub page: u32,
    /// Per-format source sets, preference order, widths descending.
    pub sources: Vec<SourceSet>,
    /// The candidate guaranteed to exist.
    pub fallback: ImageCandidate,
    /// Viewport sizes hint.
    pub sizes: String,
}

/// What one scroll/poll step produced.
#[derive(Debug, Default)]
pub struct ScrollOutcome {
    /// Newly triggered loads, ascending page order.
    pub requests: Vec<LoadRequest>,
    /// A fresh progress snapshot, unless throttled away.
    pub progress: Option<ProgressUpdate>,
}

/// The reader engine for one chapter.
#[derive(Debug)]
pub struct StripReader {
    config: ReaderConfig,
    info: ChapterInfo,
    pages: Vec<Page>,
    layout: StripLayout,
    observer: ProximityObserver,
    throttle: Throttle,
    scroll: ScrollState,
    viewport_width: i32,
    progress: ProgressUpdate,
}

impl StripReader {
    /// Build the reader from a fetched manifest.
    ///
    /// Pages are constructed strictly in ascending index order (the
    /// progress scan depends on it). Pages `1..=preload_count + 1` are
    /// load-triggered immediately; the rest are registered with the
    /// proximity observer, which is also checked once here so that
    /// placeholders already near the initial viewport start loading
    /// without waiting for a scroll event.
    pub fn new(
        config: ReaderConfig,
        manifest: &ChapterManifest,
        viewport: Viewport,
    ) -> Result<(Self, Vec<LoadRequest>), InitError> {
        config.validate().map_err(InitError::Engine)?;
        let info = manifest.validate(config.override_target)?;
        log::info!(
            "chapter: {} pages, default ratio {}",
            info.total_images,
            info.default_ratio,
        );

        let mut pages = Vec::with_capacity(info.total_images as usize);
        for index in 1..=info.total_images {
            pages.push(Page::new(
                index,
                config.page_number(index),
                info.ratio_for_page(index).clone(),
                candidate_set(&config, index),
            ));
        }

        let layout = StripLayout::build(viewport.width, pages.iter().map(|p| &p.ratio));
        let mut scroll = ScrollState::new(viewport.height);
        scroll.set_content_height(layout.content_height());
        scroll.scroll_to(viewport.scroll_y);

        let initial_progress = progress::compute(
            &Viewport {
                width: viewport.width,
                height: viewport.height,
                scroll_y: scroll.scroll_y(),
            },
            &layout,
            info.total_images,
        );

        let mut reader = Self {
            observer: ProximityObserver::new(config.root_margin_factor),
            throttle: Throttle::new(config.scroll_throttle),
            info,
            pages,
            layout,
            scroll,
            viewport_width: viewport.width,
            progress: initial_progress,
            config,
        };

        let mut requests = Vec::new();
        let eager_limit = reader.config.preload_count + 1;
        for index in 1..=reader.info.total_images {
            if index <= eager_limit {
                if let Some(request) = reader.trigger_load(index) {
                    requests.push(request);
                }
            } else if let Some(rect) = reader.layout.page_rect(index) {
                reader.observer.observe(index, rect);
            }
        }

        // Placeholders already inside the expanded region fire now.
        let viewport = reader.viewport();
        for index in reader.observer.check(&viewport) {
            if let Some(request) = reader.trigger_load(index) {
                requests.push(request);
            }
        }

        Ok((reader, requests))
    }

    /// The host moved the scroll offset (wheel, drag, keyboard).
    pub fn on_scroll(&mut self, scroll_y: i32, now: Instant) -> ScrollOutcome {
        self.scroll.scroll_to(scroll_y);
        self.poll(now)
    }

    /// Check the observer and (throttled) recompute progress.
    pub fn poll(&mut self, now: Instant) -> ScrollOutcome {
        let viewport = self.viewport();

        let mut requests = Vec::new();
        for index in self.observer.check(&viewport) {
            if let Some(request) = self.trigger_load(index) {
                requests.push(request);
            }
        }

        let progress = if self.throttle.try_fire(now) {
            let update = progress::compute(&viewport, &self.layout, self.info.total_images);
            self.progress = update.clone();
            Some(update)
        } else {
            None
        };

        ScrollOutcome { requests, progress }
    }

    /// Report a decode outcome for a previously emitted [`LoadRequest`].
    ///
    /// Success reveals the page and unregisters its placeholder from
    /// the observer (its single unregistration). Failure is terminal
    /// for that page only; the placeholder stays registered but its
    /// state machine refuses further triggers.
    pub fn complete_load(&mut self, index: u32, result: Result<(), String>) {
        let Some(page) = self.page_mut(index) else {
            log::warn!("decode completion for unknown page {index}");
            return;
        };
        match result {
            Ok(()) => {
                if page.finish_load() {
                    self.observer.unobserve(index);
                    log::debug!("page {index}: revealed");
                } else {
                    log::warn!("page {index}: unexpected decode completion");
                }
            },
            Err(reason) => {
                if page.fail_load() {
                    log::error!("page {index}: decode failed: {reason}");
                }
            },
        }
    }

    /// Begin the smooth scroll-to-top animation (the go-to-top control).
    pub fn start_scroll_to_top(&mut self) {
        self.scroll.start_scroll_to_top();
    }

    /// Advance the scroll animation one frame and poll. Returns whether
    /// the animation is still running, plus the step's outcome.
    pub fn tick(&mut self, now: Instant) -> (bool, ScrollOutcome) {
        let animating = self.scroll.tick();
        (animating, self.poll(now))
    }

    // ---------------------------------------------------------------
    // Accessors
    // ---------------------------------------------------------------

    pub fn config(&self) -> &ReaderConfig {
        &self.config
    }

    pub fn total_pages(&self) -> u32 {
        self.info.total_images
    }

    pub fn page(&self, index: u32) -> Option<&Page> {
        if index == 0 {
            return None;
        }
        self.pages.get(index as usize - 1)
    }

    pub fn pages(&self) -> &[Page] {
        &self.pages
    }

    /// The most recent progress snapshot.
    pub fn progress(&self) -> &ProgressUpdate {
        &self.progress
    }

    pub fn content_height(&self) -> i32 {
        self.layout.content_height()
    }

    pub fn max_scroll(&self) -> i32 {
        self.scroll.max_scroll()
    }

    pub fn scroll_y(&self) -> i32 {
        self.scroll.scroll_y()
    }

    fn viewport(&self) -> Viewport {
        Viewport {
            width: self.viewport_width,
            height: self.scroll.viewport_height(),
            scroll_y: self.scroll.scroll_y(),
        }
    }

    fn page_mut(&mut self, index: u32) -> Option<&mut Page> {
        if index == 0 {
            return None;
        }
        self.pages.get_mut(index as usize - 1)
    }

    /// Activate a page's candidates: Pending → Loading plus a
    /// [`LoadRequest`] carrying the no-longer-inert URLs. `None` for
    /// any page that is not Pending, so repeated triggers (eager path,
    /// observer path, or both) stay no-ops.
    fn trigger_load(&mut self, index: u32) -> Option<LoadRequest> {
        let page = self.page_mut(index)?;
        if !page.begin_load() {
            return None;
        }
        log::debug!("page {index}: load triggered");
        Some(LoadRequest {
            page: index,
            sources: page.candidates.sources.clone(),
            fallback: page.candidates.fallback.clone(),
            sizes: page.candidates.sizes.clone(),
        })
    }
}
