use std::{fs::File, io::BufReader, path::Path};

use serde::{Deserialize, Serialize};

use crate::{
    assets::source::ImageSource,
    foundation::error::{PostcardError, PostcardResult},
    model::template::Template,
};

#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
/// User pan/zoom/rotate of the portrait inside the photo area.
pub struct PhotoTransform {
    /// Multiplier on top of the cover-fit scale.
    pub scale: f64,
    /// Rotation in degrees about the portrait center.
    pub rotation: f64,
    /// Horizontal offset in base-canvas pixels.
    pub offset_x: f64,
    /// Vertical offset in base-canvas pixels.
    pub offset_y: f64,
}

impl Default for PhotoTransform {
    fn default() -> Self {
        Self {
            scale: 1.0,
            rotation: 0.0,
            offset_x: 0.0,
            offset_y: 0.0,
        }
    }
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
/// Personal text fields and their visibility flags.
pub struct MetaInfo {
    /// Display name.
    pub display_name: String,
    /// College name.
    pub college: String,
    /// Graduation year, kept as text.
    pub graduation_year: String,
    /// Draw the display name.
    pub show_name: bool,
    /// Draw the college.
    pub show_college: bool,
    /// Draw the graduation year.
    pub show_year: bool,
    /// Draw the template slogan.
    pub show_slogan: bool,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
/// Border decoration around the photo area.
pub enum FrameStyle {
    /// No border.
    #[default]
    None,
    /// Continuous stroke.
    Solid,
    /// Dashed stroke.
    Dashed,
    /// Perforated postage-stamp edge.
    Stamp,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
/// Everything needed for one composition.
pub struct ComposeRequest {
    /// Template to composite onto.
    pub template: Template,
    /// User portrait source.
    pub user_image: ImageSource,
    /// Portrait transform.
    #[serde(default)]
    pub transform: PhotoTransform,
    /// Text fields.
    #[serde(default)]
    pub meta: MetaInfo,
    /// Border style.
    #[serde(default)]
    pub frame_style: FrameStyle,
    /// Output resolution relative to the base canvas.
    #[serde(default = "default_export_scale")]
    pub export_scale: f64,
}

fn default_export_scale() -> f64 {
    1.0
}

impl ComposeRequest {
    /// Request with default transform, no text, no frame and export scale 1.
    pub fn new(template: Template, user_image: impl Into<ImageSource>) -> Self {
        Self {
            template,
            user_image: user_image.into(),
            transform: PhotoTransform::default(),
            meta: MetaInfo::default(),
            frame_style: FrameStyle::default(),
            export_scale: default_export_scale(),
        }
    }

    /// Parse a request from a JSON reader.
    pub fn from_reader<R: std::io::Read>(r: R) -> PostcardResult<Self> {
        serde_json::from_reader(r)
            .map_err(|e| PostcardError::validation(format!("parse compose request JSON: {e}")))
    }

    /// Parse a request from a JSON file on disk.
    pub fn from_path(path: impl AsRef<Path>) -> PostcardResult<Self> {
        let path = path.as_ref();
        let f = File::open(path).map_err(|e| {
            PostcardError::validation(format!("open compose request '{}': {e}", path.display()))
        })?;
        Self::from_reader(BufReader::new(f))
    }
}

#[cfg(test)]
#[path = "../../tests/unit/model/request.rs"]
mod tests;
