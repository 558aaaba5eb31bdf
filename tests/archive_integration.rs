//! Download flow tests.
//!
//! The first group drives `download_products` end to end with an in-memory
//! archive. The `#[ignore]` group hits the real archives and is meant to be
//! run by hand when an archive layout is suspected to have changed:
//!
//!   cargo test --test archive_integration -- --ignored

use std::cell::RefCell;
use std::collections::HashMap;
use std::time::Duration;

use chrono::{Duration as Days, Utc};
use gnss_survey::download::{DownloadError, FetchError, Fetcher, HttpFetcher, download_products};
use gnss_survey::gpstime::{compute_gps_time, gps_time_from_str};
use gnss_survey::model::Product;
use gnss_survey::products::{ProductTemplates, build_product_urls};

// ---------------------------------------------------------------------------
// Test Helpers
// ---------------------------------------------------------------------------

/// Serves fixed bodies by URL and records every request.
struct MemoryArchive {
    files: HashMap<String, Vec<u8>>,
    requests: RefCell<Vec<String>>,
}

impl MemoryArchive {
    fn new(files: &[(&str, &str)]) -> Self {
        Self {
            files: files.iter().map(|(url, body)| (url.to_string(), body.as_bytes().to_vec())).collect(),
            requests: RefCell::new(Vec::new()),
        }
    }
}

impl Fetcher for MemoryArchive {
    fn fetch(&self, url: &str) -> Result<Vec<u8>, FetchError> {
        self.requests.borrow_mut().push(url.to_string());
        self.files
            .get(url)
            .cloned()
            .ok_or_else(|| FetchError::NotFound(url.to_string()))
    }
}

// ---------------------------------------------------------------------------
// Offline
// ---------------------------------------------------------------------------

#[test]
fn test_downloads_published_products_and_reports_missing_ones() {
    let id = gps_time_from_str("01-01-2022").unwrap();
    let descriptors = build_product_urls(&id, &Product::ALL, &ProductTemplates::default()).unwrap();

    let archive = MemoryArchive::new(&[
        ("https://garner.ucsd.edu/pub/products/2190/igs21906.sp3.Z", "final"),
        ("https://garner.ucsd.edu/pub/products/2190/igr21906.sp3.Z", "rapid"),
    ]);
    let dir = tempfile::tempdir().unwrap();

    let report = download_products(&archive, &descriptors, dir.path()).unwrap();

    assert_eq!(report.saved.len(), 2);
    assert_eq!(std::fs::read(dir.path().join("igs21906.sp3.Z")).unwrap(), b"final");
    assert_eq!(std::fs::read(dir.path().join("igr21906.sp3.Z")).unwrap(), b"rapid");

    assert_eq!(report.failed.len(), 1);
    assert_eq!(report.failed[0].product, Product::Gfz);
    assert!(matches!(report.failed[0].error, DownloadError::Fetch(FetchError::NotFound(_))));
}

#[test]
fn test_each_url_is_requested_exactly_once_in_declaration_order() {
    let id = gps_time_from_str("2022-01-01").unwrap();
    let descriptors = build_product_urls(&id, &[Product::Gfz, Product::Rapid], &ProductTemplates::default()).unwrap();
    let archive = MemoryArchive::new(&[]);
    let dir = tempfile::tempdir().unwrap();

    download_products(&archive, &descriptors, dir.path()).unwrap();

    let requests = archive.requests.borrow();
    assert_eq!(requests.len(), 2);
    assert!(requests[0].contains("igr21906"));
    assert!(requests[1].contains("GFZ0OPSRAP_2022001"));
}

#[test]
fn test_custom_mirror_templates_are_used() {
    let templates = ProductTemplates {
        rapid: "https://mirror.test/gps/{year}/{doy}/igr{id}.sp3.Z".to_string(),
        ..ProductTemplates::default()
    };
    let id = gps_time_from_str("25-06-2020").unwrap();
    let descriptors = build_product_urls(&id, &[Product::Rapid], &templates).unwrap();
    let archive = MemoryArchive::new(&[("https://mirror.test/gps/2020/177/igr21114.sp3.Z", "x")]);
    let dir = tempfile::tempdir().unwrap();

    let report = download_products(&archive, &descriptors, dir.path()).unwrap();
    assert!(report.is_complete());
    assert!(dir.path().join("igr21114.sp3.Z").exists());
}

// ---------------------------------------------------------------------------
// Live archives
// ---------------------------------------------------------------------------

fn live_fetcher() -> HttpFetcher {
    HttpFetcher::new(Duration::from_secs(60)).unwrap()
}

#[test]
#[ignore] // Don't run in CI - depends on external archive
fn test_live_rapid_orbit_for_a_past_day_is_available() {
    let date = (Utc::now() - Days::days(30)).date_naive();
    let id = compute_gps_time(date).unwrap();
    let descriptors = build_product_urls(&id, &[Product::Rapid], &ProductTemplates::default()).unwrap();
    let dir = tempfile::tempdir().unwrap();

    let report = download_products(&live_fetcher(), &descriptors, dir.path()).unwrap();

    if let Some(failure) = report.failed.first() {
        panic!("rapid orbit for {} unavailable: {}", date, failure.error);
    }
    let size = std::fs::metadata(&report.saved[0]).unwrap().len();
    assert!(size > 1000, "suspiciously small file: {} bytes", size);
}

#[test]
#[ignore] // Don't run in CI - depends on external archive
fn test_live_future_day_is_not_found() {
    let date = (Utc::now() + Days::days(60)).date_naive();
    let id = compute_gps_time(date).unwrap();
    let descriptors = build_product_urls(&id, &[Product::Precise], &ProductTemplates::default()).unwrap();

    let result = live_fetcher().fetch(&descriptors[0].url);
    assert!(matches!(result, Err(FetchError::NotFound(_))), "got {:?}", result.map(|b| b.len()));
}
