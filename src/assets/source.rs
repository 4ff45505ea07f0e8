use std::fmt;

use crate::foundation::error::{PostcardError, PostcardResult};

const DISPLAY_MAX_CHARS: usize = 64;

/// Opaque image source identifier: a URL, a `data:` URI or a file path.
///
/// The identifier doubles as the cache key, so two sources are the same resource exactly
/// when their strings are equal.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, serde::Serialize, serde::Deserialize)]
#[serde(transparent)]
pub struct ImageSource(String);

/// How an [`ImageSource`] is resolved to bytes.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SourceKind {
    /// Inline `data:` URI.
    Data,
    /// `http://` or `https://` URL.
    Remote,
    /// `file://` URL or plain filesystem path.
    File,
}

impl ImageSource {
    /// Wrap a source identifier.
    pub fn new(source: impl Into<String>) -> Self {
        Self(source.into())
    }

    /// Raw identifier string.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// `true` for an empty or whitespace-only identifier.
    pub fn is_blank(&self) -> bool {
        self.0.trim().is_empty()
    }

    /// Classify the identifier by scheme.
    pub fn kind(&self) -> SourceKind {
        let s = self.0.trim_start();
        if starts_with_ignore_case(s, "data:") {
            SourceKind::Data
        } else if starts_with_ignore_case(s, "http://") || starts_with_ignore_case(s, "https://")
        {
            SourceKind::Remote
        } else {
            SourceKind::File
        }
    }

    /// Short form for logs and error messages; long `data:` payloads are elided.
    pub fn display_name(&self) -> String {
        if self.0.chars().count() <= DISPLAY_MAX_CHARS {
            return self.0.clone();
        }
        let head: String = self.0.chars().take(DISPLAY_MAX_CHARS).collect();
        format!("{head}…")
    }

    /// Build an [`PostcardError::ImageLoad`] naming this source.
    pub fn load_error(&self, reason: impl fmt::Display) -> PostcardError {
        PostcardError::image_load(self.display_name(), reason)
    }
}

impl fmt::Display for ImageSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.display_name())
    }
}

impl From<&str> for ImageSource {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}

impl From<String> for ImageSource {
    fn from(s: String) -> Self {
        Self(s)
    }
}

fn starts_with_ignore_case(s: &str, prefix: &str) -> bool {
    s.len() >= prefix.len()
        && s.as_bytes()[..prefix.len()].eq_ignore_ascii_case(prefix.as_bytes())
}

/// Parsed `data:` URI.
#[derive(Clone, Debug, PartialEq, Eq)]
pub(crate) struct DataUri<'a> {
    pub(crate) mime: &'a str,
    pub(crate) base64: bool,
    pub(crate) payload: &'a str,
}

/// Split `data:[<mime>][;param...][;base64],<payload>` into its parts.
pub(crate) fn parse_data_uri(uri: &str) -> PostcardResult<DataUri<'_>> {
    let rest = uri.trim();
    if !starts_with_ignore_case(rest, "data:") {
        return Err(PostcardError::validation("data URI must start with 'data:'"));
    }
    let rest = &rest[5..];
    let (header, payload) = rest
        .split_once(',')
        .ok_or_else(|| PostcardError::validation("data URI is missing ',' separator"))?;

    let mut parts = header.split(';');
    let mime = parts.next().unwrap_or_default();
    let base64 = parts.any(|p| p.eq_ignore_ascii_case("base64"));

    Ok(DataUri {
        mime,
        base64,
        payload,
    })
}

/// Normalize and validate assets-root-relative paths.
///
/// The normalized result uses `/` separators, removes `.` segments, and rejects parent
/// traversals (`..`).
pub fn normalize_rel_path(source: &str) -> PostcardResult<String> {
    let s = source.replace('\\', "/");
    if s.starts_with('/') {
        return Err(PostcardError::validation("asset paths must be relative"));
    }
    if s.is_empty() {
        return Err(PostcardError::validation("asset path must be non-empty"));
    }

    let mut out = Vec::<&str>::new();
    for part in s.split('/') {
        if part.is_empty() || part == "." {
            continue;
        }
        if part == ".." {
            return Err(PostcardError::validation(
                "asset paths must not contain '..'",
            ));
        }
        out.push(part);
    }

    if out.is_empty() {
        return Err(PostcardError::validation(
            "asset path must contain a file name",
        ));
    }

    Ok(out.join("/"))
}

#[cfg(test)]
#[path = "../../tests/unit/assets/source.rs"]
mod tests;
