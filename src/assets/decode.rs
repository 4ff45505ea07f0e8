use std::sync::Arc;

use anyhow::Context;

use crate::{
    foundation::core::Canvas, foundation::error::PostcardResult,
    foundation::math::premultiply_rgba8_in_place,
};

#[derive(Clone, Debug)]
/// Decoded raster image in premultiplied RGBA8 form.
pub struct DecodedImage {
    /// Width in pixels.
    pub width: u32,
    /// Height in pixels.
    pub height: u32,
    /// Pixel bytes in row-major premultiplied RGBA8.
    pub rgba8_premul: Arc<Vec<u8>>,
}

impl DecodedImage {
    /// Fully transparent 1×1 image, used when a template declares no logo.
    pub fn transparent_pixel() -> Self {
        Self {
            width: 1,
            height: 1,
            rgba8_premul: Arc::new(vec![0, 0, 0, 0]),
        }
    }

    /// Natural pixel size.
    pub fn size(&self) -> Canvas {
        Canvas::new(self.width, self.height)
    }
}

/// Decode encoded image bytes and convert to premultiplied RGBA8.
pub fn decode_image(bytes: &[u8]) -> PostcardResult<DecodedImage> {
    let dyn_img = image::load_from_memory(bytes).context("decode image from memory")?;
    let rgba = dyn_img.to_rgba8();
    let (width, height) = rgba.dimensions();

    let mut rgba8_premul = rgba.into_raw();
    premultiply_rgba8_in_place(&mut rgba8_premul);

    Ok(DecodedImage {
        width,
        height,
        rgba8_premul: Arc::new(rgba8_premul),
    })
}

#[cfg(test)]
#[path = "../../tests/unit/assets/decode.rs"]
mod tests;
