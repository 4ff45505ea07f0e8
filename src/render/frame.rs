use std::f64::consts::{FRAC_PI_2, PI};

use crate::{
    foundation::core::{BezPath, Point, Rect, Rgba8, Vec2},
    model::request::FrameStyle,
    render::surface::Surface,
};

/// Stroke width of the solid and dashed frames.
pub const FRAME_STROKE_WIDTH: f64 = 6.0;
/// Stroke opacity of the solid and dashed frames.
pub const FRAME_STROKE_ALPHA: f32 = 0.95;
/// Dash pattern (on, off) of the dashed frame.
pub const FRAME_DASH_PATTERN: [f64; 2] = [24.0, 12.0];
/// Radius of one stamp perforation bump.
pub const STAMP_BUMP_RADIUS: f64 = 10.0;

/// Number of bumps along an edge of `edge_length` with bump `spacing`.
///
/// Edges are not required to tile evenly, so the last bump may overhang the corner.
pub fn stamp_bump_count(edge_length: f64, spacing: f64) -> usize {
    let n = (edge_length / spacing).ceil();
    if n.is_finite() && n > 0.0 { n as usize } else { 0 }
}

/// One semicircular bump: centred on the rectangle edge, bulging along `outward_angle`.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct StampBump {
    /// Center of the flat side, on the rectangle edge.
    pub center: Point,
    /// Direction of the bulge, in radians (y-down, 0 = +x).
    pub outward_angle: f64,
}

/// Bumps for all four edges of `area`, walking clockwise from the top-left corner.
pub fn stamp_bumps(area: Rect, radius: f64) -> Vec<StampBump> {
    let spacing = radius * 2.0;
    let (w, h) = (area.width(), area.height());

    // (start, step direction, outward direction)
    let edges = [
        (Point::new(area.x0, area.y0), Vec2::new(1.0, 0.0), -FRAC_PI_2, w),
        (Point::new(area.x0 + w, area.y0), Vec2::new(0.0, 1.0), 0.0, h),
        (Point::new(area.x0 + w, area.y0 + h), Vec2::new(-1.0, 0.0), FRAC_PI_2, w),
        (Point::new(area.x0, area.y0 + h), Vec2::new(0.0, -1.0), PI, h),
    ];

    let mut out = Vec::new();
    for (start, dir, outward_angle, len) in edges {
        for i in 0..stamp_bump_count(len, spacing) {
            out.push(StampBump {
                center: start + dir * (spacing * i as f64),
                outward_angle,
            });
        }
    }
    out
}

/// Closed path of all stamp bumps around `area`.
pub fn stamp_border_path(area: Rect, radius: f64) -> BezPath {
    let mut path = BezPath::new();
    for bump in stamp_bumps(area, radius) {
        let start_angle = bump.outward_angle - FRAC_PI_2;
        let arc = kurbo::Arc::new(bump.center, (radius, radius), start_angle, PI, 0.0);
        path.move_to(bump.center + Vec2::from_angle(start_angle) * radius);
        path.extend(arc.append_iter(0.1));
        path.close_path();
    }
    path
}

/// Draw the decorative border for `style` around the photo area.
pub(crate) fn draw_frame(surface: &mut Surface, area: Rect, style: FrameStyle) {
    let stroke_color = Rgba8::WHITE.with_alpha_f32(FRAME_STROKE_ALPHA);
    match style {
        FrameStyle::None => {}
        FrameStyle::Solid => surface.stroke_rect(area, FRAME_STROKE_WIDTH, &[], stroke_color),
        FrameStyle::Dashed => {
            surface.stroke_rect(area, FRAME_STROKE_WIDTH, &FRAME_DASH_PATTERN, stroke_color)
        }
        FrameStyle::Stamp => {
            surface.fill_path(&stamp_border_path(area, STAMP_BUMP_RADIUS), Rgba8::WHITE)
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/render/frame.rs"]
mod tests;
