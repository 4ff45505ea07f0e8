use std::sync::Arc;

use crate::{
    assets::decode::DecodedImage,
    foundation::core::{Affine, BezPath, Canvas, Point, Rect, Rgba8},
    foundation::error::{PostcardError, PostcardResult},
};

/// A rendered canvas as RGBA8 pixels.
///
/// Pixels are **premultiplied alpha**; the flag makes this explicit at API boundaries.
#[derive(Clone, Debug)]
pub struct RasterFrame {
    /// Width in pixels.
    pub width: u32,
    /// Height in pixels.
    pub height: u32,
    /// RGBA8 bytes, tightly packed, row-major.
    pub data: Vec<u8>,
    /// Whether `data` is premultiplied alpha.
    pub premultiplied: bool,
}

impl RasterFrame {
    /// RGBA at `(x, y)`, or `None` outside the frame.
    pub fn pixel(&self, x: u32, y: u32) -> Option<[u8; 4]> {
        if x >= self.width || y >= self.height {
            return None;
        }
        let i = (y as usize * self.width as usize + x as usize) * 4;
        let px = self.data.get(i..i + 4)?;
        Some([px[0], px[1], px[2], px[3]])
    }

    /// Pixel size.
    pub fn size(&self) -> Canvas {
        Canvas::new(self.width, self.height)
    }
}

/// CPU drawing surface. Every draw call takes geometry in base-canvas coordinates; the
/// surface applies the export scale on top.
pub(crate) struct Surface {
    width: u16,
    height: u16,
    base: Affine,
    ctx: vello_cpu::RenderContext,
    clip_depth: usize,
}

impl Surface {
    pub(crate) fn new(target: Canvas, base: Affine) -> PostcardResult<Self> {
        if target.is_empty() {
            return Err(PostcardError::surface(format!(
                "surface size {}x{} is empty",
                target.width, target.height
            )));
        }
        let width: u16 = target.width.try_into().map_err(|_| {
            PostcardError::surface(format!("surface width {} exceeds u16", target.width))
        })?;
        let height: u16 = target.height.try_into().map_err(|_| {
            PostcardError::surface(format!("surface height {} exceeds u16", target.height))
        })?;

        Ok(Self {
            width,
            height,
            base,
            ctx: vello_cpu::RenderContext::new(width, height),
            clip_depth: 0,
        })
    }

    fn set_transform(&mut self, local: Affine) {
        self.ctx.set_paint_transform(vello_cpu::kurbo::Affine::IDENTITY);
        self.ctx.set_transform(affine_to_cpu(self.base * local));
    }

    /// Draw `image` with `transform` mapping its pixel rectangle into base space.
    pub(crate) fn draw_image(&mut self, image: &DecodedImage, transform: Affine) -> PostcardResult<()> {
        if image.width == 0 || image.height == 0 {
            return Ok(());
        }
        let pixmap = pixmap_from_premul_bytes(&image.rgba8_premul, image.width, image.height)?;
        let paint = vello_cpu::Image {
            image: vello_cpu::ImageSource::Pixmap(Arc::new(pixmap)),
            sampler: vello_cpu::peniko::ImageSampler::default(),
        };

        self.set_transform(transform);
        self.ctx.set_paint(paint);
        self.ctx.fill_rect(&vello_cpu::kurbo::Rect::new(
            0.0,
            0.0,
            f64::from(image.width),
            f64::from(image.height),
        ));
        Ok(())
    }

    /// Draw `image` stretched to exactly cover `dst`.
    pub(crate) fn draw_image_in_rect(&mut self, image: &DecodedImage, dst: Rect) -> PostcardResult<()> {
        if image.width == 0 || image.height == 0 {
            return Ok(());
        }
        let sx = dst.width() / f64::from(image.width);
        let sy = dst.height() / f64::from(image.height);
        let tr = Affine::translate((dst.x0, dst.y0)) * Affine::scale_non_uniform(sx, sy);
        self.draw_image(image, tr)
    }

    pub(crate) fn fill_path(&mut self, path: &BezPath, color: Rgba8) {
        self.set_transform(Affine::IDENTITY);
        self.ctx.set_paint(color.to_cpu());
        self.ctx.fill_path(&bezpath_to_cpu(path));
    }

    pub(crate) fn stroke_rect(&mut self, rect: Rect, width: f64, dashes: &[f64], color: Rgba8) {
        let stroke = vello_cpu::kurbo::Stroke::new(width).with_dashes(0.0, dashes.iter().copied());
        self.set_transform(Affine::IDENTITY);
        self.ctx.set_stroke(stroke);
        self.ctx.set_paint(color.to_cpu());
        self.ctx.stroke_rect(&rect_to_cpu(rect));
    }

    /// Restrict subsequent drawing to `rect` until [`Surface::pop_clip`].
    pub(crate) fn push_clip(&mut self, rect: Rect) {
        self.set_transform(Affine::IDENTITY);
        let mut path = BezPath::new();
        path.move_to(Point::new(rect.x0, rect.y0));
        path.line_to(Point::new(rect.x1, rect.y0));
        path.line_to(Point::new(rect.x1, rect.y1));
        path.line_to(Point::new(rect.x0, rect.y1));
        path.close_path();
        self.ctx.push_clip_layer(&bezpath_to_cpu(&path));
        self.clip_depth += 1;
    }

    pub(crate) fn pop_clip(&mut self) {
        if self.clip_depth > 0 {
            self.ctx.pop_layer();
            self.clip_depth -= 1;
        }
    }

    /// Fill a run of positioned glyphs with `origin` as the layout's top-left corner.
    pub(crate) fn fill_glyphs(
        &mut self,
        font: &vello_cpu::peniko::FontData,
        font_size: f32,
        origin: Point,
        color: Rgba8,
        glyphs: impl Iterator<Item = vello_cpu::Glyph>,
    ) {
        self.set_transform(Affine::translate((origin.x, origin.y)));
        self.ctx.set_paint(color.to_cpu());
        self.ctx
            .glyph_run(font)
            .font_size(font_size)
            .fill_glyphs(glyphs);
    }

    pub(crate) fn finish(mut self) -> RasterFrame {
        while self.clip_depth > 0 {
            self.pop_clip();
        }
        let mut pixmap = vello_cpu::Pixmap::new(self.width, self.height);
        self.ctx.flush();
        self.ctx.render_to_pixmap(&mut pixmap);
        RasterFrame {
            width: u32::from(self.width),
            height: u32::from(self.height),
            data: pixmap.data_as_u8_slice().to_vec(),
            premultiplied: true,
        }
    }
}

fn affine_to_cpu(a: Affine) -> vello_cpu::kurbo::Affine {
    vello_cpu::kurbo::Affine::new(a.as_coeffs())
}

fn rect_to_cpu(r: Rect) -> vello_cpu::kurbo::Rect {
    vello_cpu::kurbo::Rect::new(r.x0, r.y0, r.x1, r.y1)
}

fn point_to_cpu(p: Point) -> vello_cpu::kurbo::Point {
    vello_cpu::kurbo::Point::new(p.x, p.y)
}

fn bezpath_to_cpu(path: &BezPath) -> vello_cpu::kurbo::BezPath {
    use kurbo::PathEl;

    let mut out = vello_cpu::kurbo::BezPath::new();
    for &el in path.elements() {
        match el {
            PathEl::MoveTo(p) => out.move_to(point_to_cpu(p)),
            PathEl::LineTo(p) => out.line_to(point_to_cpu(p)),
            PathEl::QuadTo(p1, p2) => out.quad_to(point_to_cpu(p1), point_to_cpu(p2)),
            PathEl::CurveTo(p1, p2, p3) => {
                out.curve_to(point_to_cpu(p1), point_to_cpu(p2), point_to_cpu(p3));
            }
            PathEl::ClosePath => out.close_path(),
        }
    }
    out
}

fn pixmap_from_premul_bytes(
    rgba8_premul: &[u8],
    width: u32,
    height: u32,
) -> PostcardResult<vello_cpu::Pixmap> {
    let w: u16 = width
        .try_into()
        .map_err(|_| PostcardError::surface("image width exceeds u16"))?;
    let h: u16 = height
        .try_into()
        .map_err(|_| PostcardError::surface("image height exceeds u16"))?;
    if rgba8_premul.len() != width as usize * height as usize * 4 {
        return Err(PostcardError::surface("decoded image byte length mismatch"));
    }

    let mut may_have_opacities = false;
    let mut pixels = Vec::with_capacity(width as usize * height as usize);
    for px in rgba8_premul.chunks_exact(4) {
        let a = px[3];
        may_have_opacities |= a != 255;
        pixels.push(vello_cpu::peniko::color::PremulRgba8 {
            r: px[0],
            g: px[1],
            b: px[2],
            a,
        });
    }

    Ok(vello_cpu::Pixmap::from_parts_with_opacity(
        pixels,
        w,
        h,
        may_have_opacities,
    ))
}

#[cfg(test)]
#[path = "../../tests/unit/render/surface.rs"]
mod tests;
