use crate::{
    foundation::core::{Canvas, Rect},
    model::template::LogoPosition,
};

/// Inset from the anchored edges, as a fraction of the longer canvas side.
pub const LOGO_MARGIN_FRACTION: f64 = 0.02;
/// Maximum logo extent on each axis, as a fraction of that canvas side.
pub const LOGO_MAX_FRACTION: f64 = 0.18;
/// Natural size assumed for a logo that reports zero dimensions.
pub const LOGO_FALLBACK_SIZE: f64 = 200.0;

/// Compute the logo rectangle in base-canvas coordinates.
///
/// The logo keeps its aspect ratio and is only ever shrunk: first to 18% of the canvas width,
/// then, if still too tall, to 18% of the canvas height.
pub fn resolve_logo_placement(position: LogoPosition, canvas: Canvas, logo: Canvas) -> Rect {
    let cw = f64::from(canvas.width);
    let ch = f64::from(canvas.height);
    let margin = cw.max(ch) * LOGO_MARGIN_FRACTION;

    let raw_w = if logo.width > 0 { f64::from(logo.width) } else { LOGO_FALLBACK_SIZE };
    let raw_h = if logo.height > 0 { f64::from(logo.height) } else { LOGO_FALLBACK_SIZE };
    let max_w = cw * LOGO_MAX_FRACTION;
    let max_h = ch * LOGO_MAX_FRACTION;
    let ratio = raw_w / raw_h;

    let mut width = raw_w.min(max_w);
    let mut height = width / ratio;
    if height > max_h {
        height = max_h;
        width = height * ratio;
    }

    let (x, y) = match position {
        LogoPosition::TopLeft => (margin, margin),
        LogoPosition::TopRight => (cw - width - margin, margin),
        LogoPosition::BottomLeft => (margin, ch - height - margin),
        LogoPosition::BottomRight => (cw - width - margin, ch - height - margin),
    };

    Rect::new(x, y, x + width, y + height)
}

#[cfg(test)]
#[path = "../../tests/unit/layout/logo.rs"]
mod tests;
