//! Ephemeris archive client.
//!
//! Fetches the files named by [`RemoteProductDescriptor`]s and writes them,
//! untouched, into an output directory. Files are opaque blobs: no
//! decompression and no content checks. Each URL gets exactly one attempt.

use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use reqwest::StatusCode;

use crate::logging::{self, Component};
use crate::model::{Product, RemoteProductDescriptor};

// ============================================================================
// Fetcher
// ============================================================================

/// Errors a fetcher can report for a single URL.
#[derive(Debug, Clone, PartialEq)]
pub enum FetchError {
    /// The archive answered but has no such file (not yet published, or
    /// retired).
    NotFound(String),
    /// Anything else: connection failure, timeout, non-404 HTTP status.
    Transport(String),
}

impl fmt::Display for FetchError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FetchError::NotFound(url) => write!(f, "Not found: {}", url),
            FetchError::Transport(msg) => write!(f, "Transport error: {}", msg),
        }
    }
}

impl std::error::Error for FetchError {}

/// Source of remote file contents.
///
/// The production implementation is [`HttpFetcher`]; tests substitute an
/// in-memory map.
pub trait Fetcher {
    fn fetch(&self, url: &str) -> Result<Vec<u8>, FetchError>;
}

/// Blocking HTTP(S) fetcher.
pub struct HttpFetcher {
    client: reqwest::blocking::Client,
}

impl HttpFetcher {
    pub fn new(timeout: Duration) -> Result<Self, FetchError> {
        let client = reqwest::blocking::Client::builder()
            .timeout(timeout)
            .user_agent(concat!("gnss-survey/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| FetchError::Transport(format!("client setup failed: {}", e)))?;
        Ok(Self { client })
    }
}

impl Fetcher for HttpFetcher {
    fn fetch(&self, url: &str) -> Result<Vec<u8>, FetchError> {
        let response = self.client.get(url).send().map_err(|e| {
            if e.is_timeout() {
                FetchError::Transport(format!("request timed out: {}", url))
            } else {
                FetchError::Transport(format!("request failed: {}", e))
            }
        })?;

        let status = response.status();
        if status == StatusCode::NOT_FOUND {
            return Err(FetchError::NotFound(url.to_string()));
        }
        if !status.is_success() {
            return Err(FetchError::Transport(format!("HTTP {} for {}", status.as_u16(), url)));
        }

        let body = response
            .bytes()
            .map_err(|e| FetchError::Transport(format!("failed to read body: {}", e)))?;
        Ok(body.to_vec())
    }
}

// ============================================================================
// Download
// ============================================================================

/// Why one product could not be saved.
#[derive(Debug, PartialEq)]
pub enum DownloadError {
    Fetch(FetchError),
    Write(String),
}

impl fmt::Display for DownloadError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DownloadError::Fetch(e) => write!(f, "{}", e),
            DownloadError::Write(msg) => write!(f, "Write error: {}", msg),
        }
    }
}

impl std::error::Error for DownloadError {}

#[derive(Debug, PartialEq)]
pub struct DownloadFailure {
    pub product: Product,
    pub url: String,
    pub error: DownloadError,
}

/// Outcome of one download run.
#[derive(Debug, Default, PartialEq)]
pub struct DownloadReport {
    pub saved: Vec<PathBuf>,
    pub failed: Vec<DownloadFailure>,
}

impl DownloadReport {
    pub fn total(&self) -> usize {
        self.saved.len() + self.failed.len()
    }

    pub fn is_complete(&self) -> bool {
        self.failed.is_empty()
    }
}

/// Downloads each descriptor into `output_dir`, sequentially, one attempt
/// each. A failure on one product does not stop the others.
///
/// Only failing to create `output_dir` aborts the run.
pub fn download_products(
    fetcher: &dyn Fetcher,
    descriptors: &[RemoteProductDescriptor],
    output_dir: &Path,
) -> Result<DownloadReport, DownloadError> {
    fs::create_dir_all(output_dir)
        .map_err(|e| DownloadError::Write(format!("{}: {}", output_dir.display(), e)))?;

    let mut report = DownloadReport::default();

    for descriptor in descriptors {
        logging::debug(Component::Fetch, Some(&descriptor.file_name), &format!("GET {}", descriptor.url));

        let bytes = match fetcher.fetch(&descriptor.url) {
            Ok(bytes) => bytes,
            Err(e) => {
                logging::log_fetch_failure(&descriptor.file_name, &e);
                report.failed.push(DownloadFailure {
                    product: descriptor.product,
                    url: descriptor.url.clone(),
                    error: DownloadError::Fetch(e),
                });
                continue;
            }
        };

        let path = output_dir.join(&descriptor.file_name);
        match fs::write(&path, &bytes) {
            Ok(()) => {
                logging::info(
                    Component::Fetch,
                    Some(&descriptor.file_name),
                    &format!("{} saved to {} ({} bytes)", descriptor.label, path.display(), bytes.len()),
                );
                report.saved.push(path);
            }
            Err(e) => {
                let error = DownloadError::Write(format!("{}: {}", path.display(), e));
                logging::error(Component::Fetch, Some(&descriptor.file_name), &error.to_string());
                report.failed.push(DownloadFailure {
                    product: descriptor.product,
                    url: descriptor.url.clone(),
                    error,
                });
            }
        }
    }

    logging::log_download_summary(report.total(), report.saved.len(), report.failed.len());
    Ok(report)
}

// ============================================================================
// Tests
// ============================================================================
