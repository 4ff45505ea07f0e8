use std::{
    collections::HashMap,
    path::{Path, PathBuf},
    sync::{
        Mutex,
        atomic::{AtomicUsize, Ordering},
    },
};

use base64::Engine as _;

use crate::{
    assets::source::{ImageSource, SourceKind, normalize_rel_path, parse_data_uri},
    foundation::error::PostcardResult,
};

/// Resolves an [`ImageSource`] to its encoded bytes.
///
/// Implementations are called from rayon workers, one call per source, and must fail with
/// [`crate::PostcardError::ImageLoad`] when the bytes cannot be obtained.
pub trait ImageFetcher: Send + Sync {
    /// Fetch the raw encoded bytes for `source`.
    fn fetch(&self, source: &ImageSource) -> PostcardResult<Vec<u8>>;
}

/// Fetcher for `data:` URIs, filesystem paths and (with the `http` feature) remote URLs.
#[derive(Clone, Debug, Default)]
pub struct DefaultFetcher {
    assets_root: Option<PathBuf>,
}

impl DefaultFetcher {
    /// Resolve relative paths against the process working directory.
    pub fn new() -> Self {
        Self::default()
    }

    /// Resolve relative paths against `root`.
    pub fn with_assets_root(root: impl Into<PathBuf>) -> Self {
        Self {
            assets_root: Some(root.into()),
        }
    }

    /// Root directory used for relative paths, if any.
    pub fn assets_root(&self) -> Option<&Path> {
        self.assets_root.as_deref()
    }

    fn fetch_data_uri(&self, source: &ImageSource) -> PostcardResult<Vec<u8>> {
        let uri = parse_data_uri(source.as_str()).map_err(|e| source.load_error(e))?;
        if !uri.base64 {
            return Ok(uri.payload.as_bytes().to_vec());
        }
        let payload: String = uri
            .payload
            .chars()
            .filter(|c| !c.is_ascii_whitespace())
            .collect();
        base64::engine::general_purpose::STANDARD
            .decode(payload.as_bytes())
            .map_err(|e| source.load_error(format!("invalid base64 payload ({}): {e}", uri.mime)))
    }

    fn fetch_file(&self, source: &ImageSource) -> PostcardResult<Vec<u8>> {
        let raw = source.as_str().trim();
        let raw = raw.strip_prefix("file://").unwrap_or(raw);
        let path = if Path::new(raw).is_absolute() {
            PathBuf::from(raw)
        } else {
            let norm = normalize_rel_path(raw).map_err(|e| source.load_error(e))?;
            match &self.assets_root {
                Some(root) => root.join(Path::new(&norm)),
                None => PathBuf::from(norm),
            }
        };
        std::fs::read(&path)
            .map_err(|e| source.load_error(format!("read '{}': {e}", path.display())))
    }

    #[cfg(feature = "http")]
    fn fetch_remote(&self, source: &ImageSource) -> PostcardResult<Vec<u8>> {
        let resp = reqwest::blocking::get(source.as_str())
            .and_then(|r| r.error_for_status())
            .map_err(|e| source.load_error(e))?;
        let bytes = resp.bytes().map_err(|e| source.load_error(e))?;
        Ok(bytes.to_vec())
    }

    #[cfg(not(feature = "http"))]
    fn fetch_remote(&self, source: &ImageSource) -> PostcardResult<Vec<u8>> {
        Err(source.load_error(
            "remote sources require the `http` feature",
        ))
    }
}

impl ImageFetcher for DefaultFetcher {
    fn fetch(&self, source: &ImageSource) -> PostcardResult<Vec<u8>> {
        if source.is_blank() {
            return Err(source.load_error("empty source"));
        }
        match source.kind() {
            SourceKind::Data => self.fetch_data_uri(source),
            SourceKind::File => self.fetch_file(source),
            SourceKind::Remote => self.fetch_remote(source),
        }
    }
}

/// In-memory fetcher serving registered byte blobs, with per-source fetch counters.
#[derive(Debug, Default)]
pub struct MemoryFetcher {
    blobs: HashMap<ImageSource, Vec<u8>>,
    counts: Mutex<HashMap<ImageSource, usize>>,
    total: AtomicUsize,
}

impl MemoryFetcher {
    /// Empty fetcher; every source fails until registered.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `bytes` under `source`, replacing any previous blob.
    pub fn insert(&mut self, source: impl Into<ImageSource>, bytes: Vec<u8>) {
        self.blobs.insert(source.into(), bytes);
    }

    /// Builder form of [`MemoryFetcher::insert`].
    pub fn with(mut self, source: impl Into<ImageSource>, bytes: Vec<u8>) -> Self {
        self.insert(source, bytes);
        self
    }

    /// Number of fetch attempts made for `source`, including failed ones.
    pub fn fetch_count(&self, source: &ImageSource) -> usize {
        self.counts
            .lock()
            .map(|c| c.get(source).copied().unwrap_or(0))
            .unwrap_or(0)
    }

    /// Number of fetch attempts across all sources.
    pub fn total_fetches(&self) -> usize {
        self.total.load(Ordering::Relaxed)
    }
}

impl ImageFetcher for MemoryFetcher {
    fn fetch(&self, source: &ImageSource) -> PostcardResult<Vec<u8>> {
        self.total.fetch_add(1, Ordering::Relaxed);
        if let Ok(mut counts) = self.counts.lock() {
            *counts.entry(source.clone()).or_insert(0) += 1;
        }
        self.blobs
            .get(source)
            .cloned()
            .ok_or_else(|| source.load_error("not found"))
    }
}

#[cfg(test)]
#[path = "../../tests/unit/assets/fetch.rs"]
mod tests;
