use std::fmt;

use serde::{Deserialize, Serialize};

use crate::{assets::source::ImageSource, foundation::core::Canvas};

/// Template identifier as issued by the template service (numeric or string).
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum TemplateId {
    /// Numeric database id.
    Num(i64),
    /// Opaque string id.
    Str(String),
}

impl Default for TemplateId {
    fn default() -> Self {
        Self::Str(String::new())
    }
}

impl fmt::Display for TemplateId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Num(n) => write!(f, "{n}"),
            Self::Str(s) => f.write_str(s),
        }
    }
}

#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
/// A designer-authored postcard template.
///
/// Templates are immutable inputs; the compositor only reads them.
pub struct Template {
    /// Template id.
    #[serde(default)]
    pub id: TemplateId,
    /// Display name.
    #[serde(default)]
    pub name: String,
    /// Free-form description.
    #[serde(default)]
    pub description: String,
    /// Slogan text drawn near the bottom edge when enabled.
    #[serde(default)]
    pub slogan: String,
    /// Optional overlay logo.
    #[serde(default, rename = "logoUrl", skip_serializing_if = "Option::is_none")]
    pub logo: Option<ImageSource>,
    /// Background image covering the whole base canvas.
    #[serde(rename = "backgroundUrl")]
    pub background: ImageSource,
    /// Gallery thumbnail; not used for composition.
    #[serde(default, rename = "thumbnailUrl", skip_serializing_if = "Option::is_none")]
    pub thumbnail: Option<ImageSource>,
    /// Declared aspect ratio tag.
    #[serde(default)]
    pub aspect_ratio: AspectRatio,
    /// Logo corner anchor.
    #[serde(default)]
    pub logo_position: LogoPosition,
    /// Normalized photo rectangle.
    pub photo_area: PhotoArea,
    /// Authoring resolution; inferred from the background when absent.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub canvas_size: Option<Canvas>,
}

impl Template {
    /// Template with the given background and photo area; everything else defaulted.
    pub fn new(background: impl Into<ImageSource>, photo_area: PhotoArea) -> Self {
        Self {
            id: TemplateId::default(),
            name: String::new(),
            description: String::new(),
            slogan: String::new(),
            logo: None,
            background: background.into(),
            thumbnail: None,
            aspect_ratio: AspectRatio::default(),
            logo_position: LogoPosition::default(),
            photo_area,
            canvas_size: None,
        }
    }

    /// Logo source, treating a blank identifier as "no logo".
    pub fn logo_source(&self) -> Option<&ImageSource> {
        self.logo.as_ref().filter(|s| !s.is_blank())
    }

    /// Declared canvas size when present and non-empty.
    pub fn declared_canvas(&self) -> Option<Canvas> {
        self.canvas_size.filter(|c| !c.is_empty())
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
/// Photo rectangle normalized to the template canvas (origin top-left, values in `[0, 1]`).
pub struct PhotoArea {
    /// Left edge as a fraction of canvas width.
    pub x: f64,
    /// Top edge as a fraction of canvas height.
    pub y: f64,
    /// Width as a fraction of canvas width.
    pub width: f64,
    /// Height as a fraction of canvas height.
    pub height: f64,
    /// Informational width/height ratio.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ratio: Option<f64>,
}

impl PhotoArea {
    /// Normalized rectangle without a ratio hint.
    pub fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self {
            x,
            y,
            width,
            height,
            ratio: None,
        }
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
/// Aspect ratio tag carried by templates. Informational only.
pub enum AspectRatio {
    /// 3:4 portrait.
    #[default]
    #[serde(rename = "3:4")]
    Portrait3x4,
    /// 1:1 square.
    #[serde(rename = "1:1")]
    Square,
    /// 16:9 landscape.
    #[serde(rename = "16:9")]
    Landscape16x9,
}

impl AspectRatio {
    /// Width divided by height.
    pub fn ratio(self) -> f64 {
        match self {
            Self::Portrait3x4 => 3.0 / 4.0,
            Self::Square => 1.0,
            Self::Landscape16x9 => 16.0 / 9.0,
        }
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
/// Corner the logo is anchored to.
pub enum LogoPosition {
    /// Top-left corner.
    #[default]
    TopLeft,
    /// Top-right corner.
    TopRight,
    /// Bottom-left corner.
    BottomLeft,
    /// Bottom-right corner.
    BottomRight,
}

impl LogoPosition {
    /// Parse a kebab-case anchor name; anything unrecognized is `TopLeft`.
    pub fn parse_lenient(s: &str) -> Self {
        match s.trim().to_ascii_lowercase().as_str() {
            "top-left" => Self::TopLeft,
            "top-right" => Self::TopRight,
            "bottom-left" => Self::BottomLeft,
            "bottom-right" => Self::BottomRight,
            other => {
                if !other.is_empty() {
                    tracing::warn!(position = other, "unknown logo position; using top-left");
                }
                Self::TopLeft
            }
        }
    }
}

impl<'de> Deserialize<'de> for LogoPosition {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let raw = Option::<String>::deserialize(deserializer)?;
        Ok(raw.as_deref().map_or(Self::TopLeft, Self::parse_lenient))
    }
}

#[cfg(test)]
#[path = "../../tests/unit/model/template.rs"]
mod tests;
