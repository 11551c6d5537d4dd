//! Longstrip development host.
//!
//! Loads a chapter (local directory or plain-HTTP base URL), builds
//! the reader engine, and simulates a full read-through: stepping the
//! scroll offset, servicing the lazy-load requests with real fetch and
//! decode, logging progress, then riding the smooth scroll back to the
//! top. Usage:
//!
//!     longstrip <chapter-dir-or-url> [WIDTHxHEIGHT]

mod host;

use std::time::{Duration, Instant};

use anyhow::{Result, bail};

use longstrip_core::{ReaderConfig, StripReader, load_manifest};
use longstrip_types::geometry::Viewport;

use host::{ChapterLocation, parse_viewport, service_requests};

/// Simulated time per scroll step. Longer than the progress throttle
/// window, so every step reports progress.
const STEP_INTERVAL: Duration = Duration::from_millis(120);

/// Simulated time per animation frame.
const FRAME_INTERVAL: Duration = Duration::from_millis(16);

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    // The chapter argument is this host's one required element; its
    // absence aborts before anything is rendered.
    let Some(chapter_arg) = std::env::args().nth(1) else {
        log::error!("required chapter location argument is missing");
        bail!("usage: longstrip <chapter-dir-or-url> [WIDTHxHEIGHT]");
    };
    let viewport_spec = std::env::args().nth(2).unwrap_or_else(|| "800x600".into());
    let Some((width, height)) = parse_viewport(&viewport_spec) else {
        log::error!("bad viewport spec '{viewport_spec}'");
        bail!("viewport must be WIDTHxHEIGHT, e.g. 800x600");
    };

    let location = ChapterLocation::parse(&chapter_arg);
    let fetcher = location.fetcher();

    let mut config = location.apply_to(ReaderConfig::default());
    if let Some(overrides) = location.config_overrides()? {
        config = location.apply_to(overrides.apply(config));
    }

    log::info!("opening chapter at {chapter_arg} ({width}x{height})");

    let manifest = match load_manifest(fetcher.as_ref(), &config) {
        Ok(manifest) => manifest,
        Err(e) => {
            log::error!("failed to load chapter manifest: {e}");
            println!("{}", longstrip_core::manifest::LOAD_FAILED_TEXT);
            std::process::exit(1);
        },
    };

    let viewport = Viewport::new(width, height);
    let (mut reader, initial) = match StripReader::new(config, &manifest, viewport) {
        Ok(built) => built,
        Err(e) => {
            log::error!("reader initialization failed: {e}");
            println!("{}", e.user_message());
            std::process::exit(1);
        },
    };
    service_requests(fetcher.as_ref(), &mut reader, initial);

    // Read through the chapter: half a viewport per step.
    let start = Instant::now();
    let mut now = start;
    let mut scroll_y = 0;
    let step = height / 2;

    while scroll_y < reader.max_scroll() {
        scroll_y += step;
        now += STEP_INTERVAL;
        let outcome = reader.on_scroll(scroll_y, now);
        service_requests(fetcher.as_ref(), &mut reader, outcome.requests);
        if let Some(progress) = outcome.progress {
            log::info!(
                "reading {} ({}%){}",
                progress.label,
                (progress.fraction * 100.0).round() as u32,
                if progress.show_top_button { " [top]" } else { "" },
            );
        }
    }

    // Ride the go-to-top control back up.
    reader.start_scroll_to_top();
    loop {
        now += FRAME_INTERVAL;
        let (animating, outcome) = reader.tick(now);
        service_requests(fetcher.as_ref(), &mut reader, outcome.requests);
        if !animating {
            break;
        }
    }
    log::info!("back at the top (scroll_y = {})", reader.scroll_y());

    let loaded = reader.pages().iter().filter(|p| p.is_revealed()).count();
    let errored: Vec<String> = reader
        .pages()
        .iter()
        .filter_map(|p| p.error_text().map(str::to_string))
        .collect();
    log::info!("{loaded} / {} pages loaded", reader.total_pages());
    for text in &errored {
        log::warn!("{text}");
    }
    if !errored.is_empty() {
        bail!("{} page(s) failed to decode", errored.len());
    }
    Ok(())
}
