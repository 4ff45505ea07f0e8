use std::{
    fs::File,
    io::BufReader,
    path::{Path, PathBuf},
};

use serde::{Deserialize, Serialize};

use crate::{
    foundation::core::Canvas,
    foundation::error::{PostcardError, PostcardResult},
    layout::geometry::{FALLBACK_CANVAS, MAX_EXPORT_DIMENSION},
    render::encode::{DEFAULT_JPEG_QUALITY, ExportFormat},
};

/// Environment variable overriding [`CompositorConfig::max_dimension`].
pub const ENV_MAX_DIMENSION: &str = "POSTCARD_MAX_DIMENSION";
/// Environment variable overriding [`CompositorConfig::jpeg_quality`].
pub const ENV_JPEG_QUALITY: &str = "POSTCARD_JPEG_QUALITY";
/// Environment variable overriding [`CompositorConfig::draw_logo`].
pub const ENV_DRAW_LOGO: &str = "POSTCARD_DRAW_LOGO";
/// Environment variable overriding [`CompositorConfig::assets_root`].
pub const ENV_ASSETS_ROOT: &str = "POSTCARD_ASSETS_ROOT";

/// Knobs for a [`crate::Compositor`].
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default, deny_unknown_fields)]
pub struct CompositorConfig {
    /// Ceiling for either output side, in pixels.
    pub max_dimension: u32,
    /// JPEG quality in `[0, 1]`.
    pub jpeg_quality: f32,
    /// Output container.
    pub format: ExportFormat,
    /// Draw the template logo.
    pub draw_logo: bool,
    /// Root for relative file sources.
    pub assets_root: Option<PathBuf>,
    /// Explicit regular-weight font file.
    pub font_regular: Option<PathBuf>,
    /// Explicit bold font file.
    pub font_bold: Option<PathBuf>,
    /// Base canvas when neither template nor background provides one.
    pub fallback_canvas: Canvas,
    /// Bound on cached decoded images; `None` keeps everything.
    pub cache_capacity: Option<usize>,
}

impl Default for CompositorConfig {
    fn default() -> Self {
        Self {
            max_dimension: MAX_EXPORT_DIMENSION,
            jpeg_quality: DEFAULT_JPEG_QUALITY,
            format: ExportFormat::Jpeg,
            draw_logo: true,
            assets_root: None,
            font_regular: None,
            font_bold: None,
            fallback_canvas: FALLBACK_CANVAS,
            cache_capacity: None,
        }
    }
}

impl CompositorConfig {
    /// Parse a config from a JSON reader and validate it.
    pub fn from_reader<R: std::io::Read>(r: R) -> PostcardResult<Self> {
        let cfg: Self = serde_json::from_reader(r)
            .map_err(|e| PostcardError::validation(format!("parse config JSON: {e}")))?;
        cfg.validate()?;
        Ok(cfg)
    }

    /// Parse a config from a JSON file on disk.
    pub fn from_path(path: impl AsRef<Path>) -> PostcardResult<Self> {
        let path = path.as_ref();
        let f = File::open(path).map_err(|e| {
            PostcardError::validation(format!("open config '{}': {e}", path.display()))
        })?;
        Self::from_reader(BufReader::new(f))
    }

    /// Apply `POSTCARD_*` overrides from the process environment.
    pub fn apply_env_overrides(&mut self) -> PostcardResult<()> {
        self.apply_overrides(|key| std::env::var(key).ok())
    }

    /// Apply `POSTCARD_*` overrides read through `lookup`.
    ///
    /// Empty values are ignored. Unparseable values are validation errors.
    pub fn apply_overrides(&mut self, lookup: impl Fn(&str) -> Option<String>) -> PostcardResult<()> {
        let get = |key: &str| lookup(key).map(|v| v.trim().to_string()).filter(|v| !v.is_empty());

        if let Some(v) = get(ENV_MAX_DIMENSION) {
            self.max_dimension = v.parse().map_err(|_| {
                PostcardError::validation(format!("{ENV_MAX_DIMENSION}: '{v}' is not an integer"))
            })?;
        }
        if let Some(v) = get(ENV_JPEG_QUALITY) {
            self.jpeg_quality = v.parse().map_err(|_| {
                PostcardError::validation(format!("{ENV_JPEG_QUALITY}: '{v}' is not a number"))
            })?;
        }
        if let Some(v) = get(ENV_DRAW_LOGO) {
            self.draw_logo = parse_bool(&v).ok_or_else(|| {
                PostcardError::validation(format!("{ENV_DRAW_LOGO}: '{v}' is not a boolean"))
            })?;
        }
        if let Some(v) = get(ENV_ASSETS_ROOT) {
            self.assets_root = Some(PathBuf::from(v));
        }

        self.validate()
    }

    /// Check ranges the renderer relies on.
    pub fn validate(&self) -> PostcardResult<()> {
        if self.max_dimension == 0 || self.max_dimension > u32::from(u16::MAX) {
            return Err(PostcardError::validation(format!(
                "maxDimension must be in 1..={}, got {}",
                u16::MAX,
                self.max_dimension
            )));
        }
        if !self.jpeg_quality.is_finite() || !(0.0..=1.0).contains(&self.jpeg_quality) {
            return Err(PostcardError::validation(format!(
                "jpegQuality must be in [0, 1], got {}",
                self.jpeg_quality
            )));
        }
        if self.fallback_canvas.is_empty() {
            return Err(PostcardError::validation("fallbackCanvas must be non-empty"));
        }
        if self.cache_capacity == Some(0) {
            return Err(PostcardError::validation("cacheCapacity must be > 0 when set"));
        }
        Ok(())
    }
}

fn parse_bool(v: &str) -> Option<bool> {
    match v.to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}

#[cfg(test)]
#[path = "../tests/unit/config.rs"]
mod tests;
