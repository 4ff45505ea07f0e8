use crate::{
    foundation::core::{Affine, Canvas, Rect, Vec2},
    model::request::PhotoTransform,
    model::template::PhotoArea,
};

/// Default ceiling for either side of the exported image.
pub const MAX_EXPORT_DIMENSION: u32 = 2160;

/// Canvas size used when neither the template nor the background provides one.
pub const FALLBACK_CANVAS: Canvas = Canvas::new(1080, 1440);

/// Resolved mapping from the base canvas to the output surface.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ExportGeometry {
    /// Template authoring resolution; all drawing happens in this space.
    pub base: Canvas,
    /// Output surface resolution.
    pub target: Canvas,
    /// `target.width / base.width`.
    pub scale_x: f64,
    /// `target.height / base.height`.
    pub scale_y: f64,
}

impl ExportGeometry {
    /// Transform from base-canvas coordinates to output pixels.
    pub fn surface_transform(&self) -> Affine {
        Affine::scale_non_uniform(self.scale_x, self.scale_y)
    }
}

/// Pick the base canvas: declared size, then the background's natural size, then `fallback`.
pub fn resolve_base_canvas(
    declared: Option<Canvas>,
    background: Canvas,
    fallback: Canvas,
) -> Canvas {
    declared
        .filter(|c| !c.is_empty())
        .or_else(|| (!background.is_empty()).then_some(background))
        .unwrap_or(fallback)
}

/// Scale `base` by `export_scale` and clamp both sides to `max_dimension`.
///
/// When either side exceeds the ceiling, both are scaled by `max_dimension / longest` so the
/// aspect ratio is preserved. Non-finite or non-positive scales are treated as 1.
pub fn resolve_export_geometry(base: Canvas, export_scale: f64, max_dimension: u32) -> ExportGeometry {
    let base = Canvas::new(base.width.max(1), base.height.max(1));
    let scale = if export_scale.is_finite() && export_scale > 0.0 {
        export_scale
    } else {
        tracing::warn!(export_scale, "invalid export scale; using 1");
        1.0
    };

    let mut w = (f64::from(base.width) * scale).round();
    let mut h = (f64::from(base.height) * scale).round();
    let ceiling = f64::from(max_dimension.max(1));
    if w > ceiling || h > ceiling {
        let ratio = ceiling / w.max(h);
        w = (w * ratio).round();
        h = (h * ratio).round();
    }
    let target = Canvas::new((w.max(1.0)) as u32, (h.max(1.0)) as u32);

    ExportGeometry {
        base,
        target,
        scale_x: f64::from(target.width) / f64::from(base.width),
        scale_y: f64::from(target.height) / f64::from(base.height),
    }
}

/// Absolute photo rectangle in base-canvas coordinates.
///
/// Degenerate areas are passed through unchanged and simply clip everything away.
pub fn resolve_photo_area(area: &PhotoArea, base: Canvas) -> Rect {
    let bw = f64::from(base.width);
    let bh = f64::from(base.height);
    let x = area.x * bw;
    let y = area.y * bh;
    Rect::new(x, y, x + area.width * bw, y + area.height * bh)
}

/// Smallest uniform scale making a `content` sized image cover `area` on both axes.
pub fn cover_scale(area_width: f64, area_height: f64, content_width: f64, content_height: f64) -> f64 {
    (area_width / content_width).max(area_height / content_height)
}

/// Placement of the portrait inside the photo area, in base-canvas coordinates.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PortraitPlacement {
    /// Cover-fit scale before the user multiplier.
    pub cover_scale: f64,
    /// `cover_scale * transform.scale`.
    pub total_scale: f64,
    /// Drawn portrait center.
    pub center: Vec2,
    /// Maps portrait pixel space `(0, 0)..(w, h)` into base-canvas space.
    pub transform: Affine,
}

/// Resolve how a `portrait` sized image is drawn into `area` under `transform`.
///
/// A portrait with zero natural size is treated as `fallback` sized.
pub fn resolve_portrait(
    area: Rect,
    portrait: Canvas,
    fallback: Canvas,
    transform: &PhotoTransform,
) -> PortraitPlacement {
    let pw = if portrait.width > 0 { portrait.width } else { fallback.width.max(1) };
    let ph = if portrait.height > 0 { portrait.height } else { fallback.height.max(1) };
    let (pw, ph) = (f64::from(pw), f64::from(ph));

    let cover = cover_scale(area.width(), area.height(), pw, ph);
    let total = cover * transform.scale;
    let center = Vec2::new(
        area.x0 + area.width() / 2.0 + transform.offset_x,
        area.y0 + area.height() / 2.0 + transform.offset_y,
    );

    // T(center) * R(rot) * S(total) * T(-size/2)
    let affine = Affine::translate(center)
        * Affine::rotate(transform.rotation.to_radians())
        * Affine::scale(total)
        * Affine::translate(Vec2::new(-pw / 2.0, -ph / 2.0));

    PortraitPlacement {
        cover_scale: cover,
        total_scale: total,
        center,
        transform: affine,
    }
}

#[cfg(test)]
#[path = "../../tests/unit/layout/geometry.rs"]
mod tests;
