//! End-to-end read-through of a chapter: manifest in, every page
//! loaded and progress complete by the time the scroll reaches the
//! bottom.

use std::time::{Duration, Instant};

use longstrip_core::loader::ResourceFetcher;
use longstrip_core::page::LoadState;
use longstrip_core::{ChapterManifest, LoadRequest, ReaderConfig, StripReader, load_manifest};
use longstrip_types::error::{LongstripError, Result};
use longstrip_types::geometry::Viewport;

/// Serves canned bytes per URL.
struct MapFetcher(Vec<(String, Vec<u8>)>);

impl ResourceFetcher for MapFetcher {
    fn fetch(&self, url: &str) -> Result<Vec<u8>> {
        self.0
            .iter()
            .find(|(u, _)| u == url)
            .map(|(_, b)| b.clone())
            .ok_or_else(|| LongstripError::Fetch(format!("no such resource: {url}")))
    }
}

const VIEWPORT: Viewport = Viewport {
    width: 800,
    height: 600,
    scroll_y: 0,
};

fn chapter_manifest(total: u32) -> ChapterManifest {
    let json = format!(
        r#"{{"totalImages": {total}, "defaultAspectRatio": "2/3",
             "lastImageAspectRatio": "2/1"}}"#
    );
    ChapterManifest::parse(json.as_bytes()).unwrap()
}

fn service_ok(reader: &mut StripReader, requests: &[LoadRequest]) {
    for request in requests {
        reader.complete_load(request.page, Ok(()));
    }
}

#[test]
fn manifest_fetch_goes_through_the_fetcher() {
    let cfg = ReaderConfig::default();
    let fetcher = MapFetcher(vec![(
        "assets/manhwa/manifest.json".to_string(),
        br#"{"totalImages": 2, "defaultAspectRatio": "2/3"}"#.to_vec(),
    )]);
    let manifest = load_manifest(&fetcher, &cfg).unwrap();
    assert_eq!(manifest.total_images, 2);
}

#[test]
fn manifest_fetch_failure_is_fatal() {
    let cfg = ReaderConfig::default();
    let fetcher = MapFetcher(vec![]);
    assert!(load_manifest(&fetcher, &cfg).is_err());
}

#[test]
fn full_read_through_loads_every_page() {
    let (mut reader, initial) =
        StripReader::new(ReaderConfig::default(), &chapter_manifest(12), VIEWPORT).unwrap();
    service_ok(&mut reader, &initial);

    let start = Instant::now();
    let mut now = start;
    let mut scroll_y = 0;
    let step = VIEWPORT.height / 2;

    while scroll_y < reader.max_scroll() {
        scroll_y += step;
        now += Duration::from_millis(120);
        let outcome = reader.on_scroll(scroll_y, now);
        // Loads fire before their page is visible: every triggered
        // placeholder is still below the viewport bottom or above its
        // top, never required to be on screen.
        service_ok(&mut reader, &outcome.requests);
    }

    for page in reader.pages() {
        assert_eq!(page.state(), LoadState::Loaded, "page {}", page.index);
    }

    now += Duration::from_millis(120);
    let progress = reader.poll(now).progress.unwrap();
    assert_eq!(progress.current_page, 12);
    assert_eq!(progress.label, "12 / 12");
    assert!((progress.fraction - 1.0).abs() < 1e-6);
    assert!(progress.show_top_button);
}

#[test]
fn pages_load_ahead_of_the_viewport() {
    let (mut reader, _) =
        StripReader::new(ReaderConfig::default(), &chapter_manifest(12), VIEWPORT).unwrap();

    let start = Instant::now();
    let mut now = start;
    let mut scroll_y = 0;

    while scroll_y < reader.max_scroll() {
        scroll_y += 300;
        now += Duration::from_millis(120);
        let outcome = reader.on_scroll(scroll_y, now);
        for request in &outcome.requests {
            // The placeholder's top must still be at least one
            // viewport height below the visible bottom when its load
            // fires (margin is 2x viewport height).
            if request.page > 3 {
                let top = (request.page as i32 - 1) * 1200;
                assert!(
                    top >= scroll_y + VIEWPORT.height,
                    "page {} fired too late at scroll_y={scroll_y}",
                    request.page,
                );
            }
            reader.complete_load(request.page, Ok(()));
        }
    }
}

#[test]
fn one_bad_page_does_not_stop_the_chapter() {
    let (mut reader, initial) =
        StripReader::new(ReaderConfig::default(), &chapter_manifest(12), VIEWPORT).unwrap();
    service_ok(&mut reader, &initial);

    let start = Instant::now();
    let mut now = start;
    let mut scroll_y = 0;

    while scroll_y < reader.max_scroll() {
        scroll_y += 300;
        now += Duration::from_millis(120);
        let outcome = reader.on_scroll(scroll_y, now);
        for request in &outcome.requests {
            if request.page == 7 {
                reader.complete_load(request.page, Err("decode exploded".into()));
            } else {
                reader.complete_load(request.page, Ok(()));
            }
        }
    }

    assert_eq!(reader.page(7).unwrap().state(), LoadState::Error);
    assert_eq!(
        reader.page(7).unwrap().error_text(),
        Some("Error loading page 7"),
    );
    for page in reader.pages() {
        if page.index != 7 {
            assert_eq!(page.state(), LoadState::Loaded, "page {}", page.index);
        }
    }
}

#[test]
fn final_page_override_shapes_the_layout() {
    // 11 pages of 2/3 (1200px each at 800 wide) plus a final 2/1
    // (400px): content height reflects the override.
    let (reader, _) =
        StripReader::new(ReaderConfig::default(), &chapter_manifest(12), VIEWPORT).unwrap();
    assert_eq!(reader.page(12).unwrap().ratio.css(), "2/1");
    assert_eq!(reader.content_height(), 11 * 1200 + 400);
}

#[test]
fn go_to_top_round_trip() {
    let (mut reader, initial) =
        StripReader::new(ReaderConfig::default(), &chapter_manifest(12), VIEWPORT).unwrap();
    service_ok(&mut reader, &initial);

    let start = Instant::now();
    reader.on_scroll(reader.max_scroll(), start);
    reader.start_scroll_to_top();

    let mut now = start + Duration::from_millis(200);
    loop {
        let (animating, outcome) = reader.tick(now);
        service_ok(&mut reader, &outcome.requests);
        if !animating {
            break;
        }
        now += Duration::from_millis(16);
    }

    assert_eq!(reader.scroll_y(), 0);
    now += Duration::from_millis(200);
    let progress = reader.poll(now).progress.unwrap();
    assert_eq!(progress.current_page, 1);
    assert!(!progress.show_top_button);
}
