use std::io::Cursor;

use base64::Engine as _;
use image::ImageEncoder as _;

use crate::{
    foundation::error::{PostcardError, PostcardResult},
    foundation::math::unpremultiply_rgba8_in_place,
    render::surface::RasterFrame,
};

/// Default JPEG quality in `[0, 1]`.
pub const DEFAULT_JPEG_QUALITY: f32 = 0.85;

/// Output container for a composed postcard.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExportFormat {
    /// Lossy, opaque. Transparent regions come out black.
    #[default]
    Jpeg,
    /// Lossless with alpha.
    Png,
}

impl ExportFormat {
    /// MIME type used in data URLs.
    pub fn mime(self) -> &'static str {
        match self {
            Self::Jpeg => "image/jpeg",
            Self::Png => "image/png",
        }
    }

    /// Conventional file extension.
    pub fn extension(self) -> &'static str {
        match self {
            Self::Jpeg => "jpg",
            Self::Png => "png",
        }
    }

    /// Guess the format from a file extension (`jpg`, `jpeg`, `png`).
    pub fn from_extension(ext: &str) -> Option<Self> {
        match ext.to_ascii_lowercase().as_str() {
            "jpg" | "jpeg" => Some(Self::Jpeg),
            "png" => Some(Self::Png),
            _ => None,
        }
    }
}

/// Encoded postcard bytes plus the dimensions they decode to.
#[derive(Clone, Debug)]
pub struct ComposedImage {
    /// Encoded file bytes.
    pub bytes: Vec<u8>,
    /// Container format of `bytes`.
    pub format: ExportFormat,
    /// Pixel width.
    pub width: u32,
    /// Pixel height.
    pub height: u32,
}

impl ComposedImage {
    /// `data:<mime>;base64,<payload>` form of the encoded bytes.
    pub fn to_data_url(&self) -> String {
        format!(
            "data:{};base64,{}",
            self.format.mime(),
            base64::engine::general_purpose::STANDARD.encode(&self.bytes)
        )
    }
}

fn quality_to_u8(quality: f32) -> u8 {
    let q = if quality.is_finite() {
        quality.clamp(0.0, 1.0)
    } else {
        DEFAULT_JPEG_QUALITY
    };
    ((q * 100.0).round() as u8).max(1)
}

/// Encode a rendered frame. `jpeg_quality` is in `[0, 1]` and ignored for PNG.
#[tracing::instrument(level = "debug", skip(frame), fields(width = frame.width, height = frame.height))]
pub fn encode_frame(
    frame: &RasterFrame,
    format: ExportFormat,
    jpeg_quality: f32,
) -> PostcardResult<ComposedImage> {
    let expected = frame.width as usize * frame.height as usize * 4;
    if frame.data.len() != expected {
        return Err(PostcardError::encode(format!(
            "frame data length {} does not match {}x{}",
            frame.data.len(),
            frame.width,
            frame.height
        )));
    }

    let mut out = Cursor::new(Vec::new());
    match format {
        ExportFormat::Jpeg => {
            // Premultiplied color with alpha dropped is the frame composited over black.
            let rgb: Vec<u8> = frame
                .data
                .chunks_exact(4)
                .flat_map(|px| [px[0], px[1], px[2]])
                .collect();
            image::codecs::jpeg::JpegEncoder::new_with_quality(&mut out, quality_to_u8(jpeg_quality))
                .write_image(&rgb, frame.width, frame.height, image::ExtendedColorType::Rgb8)
                .map_err(|e| PostcardError::encode(format!("jpeg: {e}")))?;
        }
        ExportFormat::Png => {
            let mut rgba = frame.data.clone();
            if frame.premultiplied {
                unpremultiply_rgba8_in_place(&mut rgba);
            }
            image::codecs::png::PngEncoder::new(&mut out)
                .write_image(&rgba, frame.width, frame.height, image::ExtendedColorType::Rgba8)
                .map_err(|e| PostcardError::encode(format!("png: {e}")))?;
        }
    }

    Ok(ComposedImage {
        bytes: out.into_inner(),
        format,
        width: frame.width,
        height: frame.height,
    })
}

#[cfg(test)]
#[path = "../../tests/unit/render/encode.rs"]
mod tests;
