use std::sync::Arc;

use rayon::prelude::*;

use crate::{
    assets::cache::ImageCache,
    assets::decode::{DecodedImage, decode_image},
    assets::fetch::{DefaultFetcher, ImageFetcher},
    assets::source::ImageSource,
    foundation::error::PostcardResult,
};

/// Fetches, decodes and memoizes image sources.
pub struct ImageLoader {
    fetcher: Arc<dyn ImageFetcher>,
    cache: ImageCache,
}

impl Default for ImageLoader {
    fn default() -> Self {
        Self::new(Arc::new(DefaultFetcher::new()))
    }
}

impl std::fmt::Debug for ImageLoader {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ImageLoader")
            .field("cache", &self.cache)
            .finish_non_exhaustive()
    }
}

impl ImageLoader {
    /// Loader with an unbounded never-evicting cache.
    pub fn new(fetcher: Arc<dyn ImageFetcher>) -> Self {
        Self::with_cache(fetcher, ImageCache::new())
    }

    /// Loader using a caller-configured cache.
    pub fn with_cache(fetcher: Arc<dyn ImageFetcher>, cache: ImageCache) -> Self {
        Self { fetcher, cache }
    }

    /// Shared access to the cache.
    pub fn cache(&self) -> &ImageCache {
        &self.cache
    }

    /// Mutable access to the cache, e.g. to clear it between test cases.
    pub fn cache_mut(&mut self) -> &mut ImageCache {
        &mut self.cache
    }

    /// Load a single source, serving from cache when possible.
    pub fn load(&mut self, source: &ImageSource) -> PostcardResult<Arc<DecodedImage>> {
        let mut out = self.load_all(std::slice::from_ref(source))?;
        Ok(out.remove(0))
    }

    /// Load every source concurrently; all must succeed.
    ///
    /// Cache misses are fetched and decoded in parallel. Each distinct source is fetched at
    /// most once per call. Successful decodes are cached even when another source in the
    /// batch fails; the first failure in `sources` order is returned and nothing else is.
    #[tracing::instrument(skip_all, fields(count = sources.len()))]
    pub fn load_all(&mut self, sources: &[ImageSource]) -> PostcardResult<Vec<Arc<DecodedImage>>> {
        let mut resolved: Vec<Option<Arc<DecodedImage>>> = Vec::with_capacity(sources.len());
        let mut pending: Vec<ImageSource> = Vec::new();
        for source in sources {
            match self.cache.get(source) {
                Some(img) => {
                    tracing::debug!(source = %source, "image cache hit");
                    resolved.push(Some(img));
                }
                None => {
                    if !pending.contains(source) {
                        pending.push(source.clone());
                    }
                    resolved.push(None);
                }
            }
        }

        let fetcher = &self.fetcher;
        let fetched: Vec<(ImageSource, PostcardResult<Arc<DecodedImage>>)> = pending
            .into_par_iter()
            .map(|source| {
                let result = fetch_and_decode(fetcher.as_ref(), &source);
                (source, result)
            })
            .collect();

        let mut failures = Vec::new();
        for (source, result) in fetched {
            match result {
                Ok(img) => {
                    tracing::debug!(
                        source = %source,
                        width = img.width,
                        height = img.height,
                        "decoded image"
                    );
                    self.cache.insert(source.clone(), img.clone());
                    for (slot, s) in resolved.iter_mut().zip(sources) {
                        if slot.is_none() && *s == source {
                            *slot = Some(img.clone());
                        }
                    }
                }
                Err(e) => {
                    tracing::warn!(source = %source, error = %e, "image load failed");
                    failures.push((source, e));
                }
            }
        }

        if !failures.is_empty() {
            let first = sources
                .iter()
                .find_map(|s| failures.iter().position(|(f, _)| f == s))
                .unwrap_or(0);
            return Err(failures.swap_remove(first).1);
        }

        resolved
            .into_iter()
            .zip(sources)
            .map(|(slot, source)| {
                slot.ok_or_else(|| source.load_error("image was not resolved"))
            })
            .collect()
    }
}

fn fetch_and_decode(
    fetcher: &dyn ImageFetcher,
    source: &ImageSource,
) -> PostcardResult<Arc<DecodedImage>> {
    let bytes = fetcher.fetch(source)?;
    let img = decode_image(&bytes).map_err(|e| source.load_error(e))?;
    Ok(Arc::new(img))
}

#[cfg(test)]
#[path = "../../tests/unit/assets/loader.rs"]
mod tests;
