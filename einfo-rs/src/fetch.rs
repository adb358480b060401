//! URL fetch collaborators for the `wget` builtin.
//!
//! The interpreter only sees the [`Fetch`] trait.  Two backends exist:
//!
//! * [`CacheFetcher`]: reads responses from `cache_<hash>.dat` files, keyed
//!   by the 32-bit FNV-1 hash of the URL.  Used for offline runs and tests.
//! * [`HttpFetcher`]: blocking HTTP GET (cargo feature `net`).
//!
//! [`RecordingFetcher`] wraps a live fetcher and writes every response into a
//! cache directory so the same script can later be replayed offline.

use std::path::{Path, PathBuf};

use thiserror::Error;

/// Why a fetch produced no body.  The interpreter logs it and pushes an empty
/// value.
#[derive(Debug, Error)]
pub enum FetchError {
    #[error("cache not found: '{}' for '{url}'", .path.display())]
    CacheMiss { path: PathBuf, url: String },
    #[error("cannot read '{}': {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("HTTP {status} for '{url}'")]
    Status { status: u16, url: String },
    #[error("request to '{url}' failed: {message}")]
    Request { url: String, message: String },
}

/// Resolve a URL to its response body.
pub trait Fetch {
    fn fetch(&mut self, url: &str) -> Result<String, FetchError>;
}

impl<F: Fetch + ?Sized> Fetch for Box<F> {
    fn fetch(&mut self, url: &str) -> Result<String, FetchError> {
        (**self).fetch(url)
    }
}

/// 32-bit FNV-1 (multiply, then xor).
pub fn fnv1_hash(data: &[u8]) -> u32 {
    data.iter()
        .fold(2_166_136_261u32, |h, &b| h.wrapping_mul(16_777_619) ^ u32::from(b))
}

// ── CacheFetcher ──────────────────────────────────────────────────────────────

/// Offline fetcher backed by a directory of cached responses.
#[derive(Debug, Clone)]
pub struct CacheFetcher {
    dir: PathBuf,
}

impl CacheFetcher {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Cache file for `url`.
    pub fn path_for(&self, url: &str) -> PathBuf {
        self.dir.join(format!("cache_{}.dat", fnv1_hash(url.as_bytes())))
    }

    /// Write `body` as the cached response for `url`.
    pub fn store(&self, url: &str, body: &str) -> std::io::Result<PathBuf> {
        std::fs::create_dir_all(&self.dir)?;
        let path = self.path_for(url);
        std::fs::write(&path, body)?;
        Ok(path)
    }
}

impl Fetch for CacheFetcher {
    fn fetch(&mut self, url: &str) -> Result<String, FetchError> {
        let path = self.path_for(url);
        match std::fs::read(&path) {
            // the device reads up to the first NUL
            Ok(mut bytes) => {
                if let Some(nul) = bytes.iter().position(|&b| b == 0) {
                    bytes.truncate(nul);
                }
                Ok(String::from_utf8_lossy(&bytes).into_owned())
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                Err(FetchError::CacheMiss { path, url: url.to_owned() })
            }
            Err(source) => Err(FetchError::Io { path, source }),
        }
    }
}

// ── HttpFetcher ───────────────────────────────────────────────────────────────

/// Live fetcher: one blocking GET per call.
#[cfg(feature = "net")]
pub struct HttpFetcher {
    client: reqwest::blocking::Client,
}

#[cfg(feature = "net")]
impl HttpFetcher {
    pub fn new(timeout: std::time::Duration) -> Result<Self, FetchError> {
        let client = reqwest::blocking::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| FetchError::Request { url: String::new(), message: e.to_string() })?;
        Ok(Self { client })
    }
}

#[cfg(feature = "net")]
impl Fetch for HttpFetcher {
    fn fetch(&mut self, url: &str) -> Result<String, FetchError> {
        tracing::debug!(url, "fetching");
        let request_err = |e: reqwest::Error| FetchError::Request { url: url.to_owned(), message: e.to_string() };
        let response = self
            .client
            .get(url)
            .header(reqwest::header::ACCEPT, "*/*")
            .send()
            .map_err(request_err)?;
        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::Status { status: status.as_u16(), url: url.to_owned() });
        }
        let body = response.text().map_err(request_err)?;
        tracing::debug!(url, bytes = body.len(), "fetched");
        Ok(body)
    }
}

// ── RecordingFetcher ──────────────────────────────────────────────────────────

/// Pass-through fetcher that stores each successful response in a cache.
pub struct RecordingFetcher<F> {
    inner: F,
    cache: CacheFetcher,
}

impl<F: Fetch> RecordingFetcher<F> {
    pub fn new(inner: F, cache: CacheFetcher) -> Self {
        Self { inner, cache }
    }
}

impl<F: Fetch> Fetch for RecordingFetcher<F> {
    fn fetch(&mut self, url: &str) -> Result<String, FetchError> {
        let body = self.inner.fetch(url)?;
        match self.cache.store(url, &body) {
            Ok(path) => tracing::debug!(url, path = %path.display(), "recorded response"),
            Err(e) => tracing::warn!(url, error = %e, "cannot record response"),
        }
        Ok(body)
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
