use super::*;
use crate::foundation::core::Point;

fn approx(a: f64, b: f64) -> bool {
    (a - b).abs() < 1e-9
}

#[test]
fn export_scale_four_clamps_to_ceiling_preserving_ratio() {
    let g = resolve_export_geometry(Canvas::new(1080, 1440), 4.0, MAX_EXPORT_DIMENSION);
    assert_eq!(g.target, Canvas::new(1620, 2160));
    assert_eq!(g.target.width * 4, g.target.height * 3);
    assert!(approx(g.scale_x, 1.5));
    assert!(approx(g.scale_y, 1.5));
}

#[test]
fn export_scale_within_ceiling_is_exact() {
    let g = resolve_export_geometry(Canvas::new(1080, 1440), 1.5, MAX_EXPORT_DIMENSION);
    assert_eq!(g.target, Canvas::new(1620, 2160));

    let g = resolve_export_geometry(Canvas::new(1080, 1440), 1.0, MAX_EXPORT_DIMENSION);
    assert_eq!(g.target, Canvas::new(1080, 1440));
    assert_eq!(g.surface_transform(), Affine::IDENTITY);
}

#[test]
fn export_dimensions_are_monotonic_up_to_ceiling() {
    let base = Canvas::new(1080, 1440);
    let mut prev = 0;
    for step in 1..=12 {
        let g = resolve_export_geometry(base, f64::from(step) * 0.5, MAX_EXPORT_DIMENSION);
        assert!(g.target.max_side() <= MAX_EXPORT_DIMENSION);
        assert!(g.target.height >= prev);
        prev = g.target.height;
    }
}

#[test]
fn landscape_clamps_on_width() {
    let g = resolve_export_geometry(Canvas::new(1920, 1080), 2.0, MAX_EXPORT_DIMENSION);
    assert_eq!(g.target, Canvas::new(2160, 1215));
}

#[test]
fn invalid_export_scale_is_one() {
    for s in [0.0, -2.0, f64::NAN, f64::INFINITY] {
        let g = resolve_export_geometry(Canvas::new(100, 200), s, MAX_EXPORT_DIMENSION);
        assert_eq!(g.target, Canvas::new(100, 200));
    }
}

#[test]
fn base_canvas_preference_order() {
    let declared = Some(Canvas::new(1080, 1440));
    let bg = Canvas::new(540, 720);
    assert_eq!(
        resolve_base_canvas(declared, bg, FALLBACK_CANVAS),
        Canvas::new(1080, 1440)
    );
    assert_eq!(resolve_base_canvas(None, bg, FALLBACK_CANVAS), bg);
    assert_eq!(
        resolve_base_canvas(Some(Canvas::new(0, 0)), bg, FALLBACK_CANVAS),
        bg
    );
    assert_eq!(
        resolve_base_canvas(None, Canvas::new(0, 0), FALLBACK_CANVAS),
        FALLBACK_CANVAS
    );
}

#[test]
fn photo_area_scales_by_base_canvas() {
    let r = resolve_photo_area(
        &PhotoArea::new(0.1, 0.25, 0.5, 0.5),
        Canvas::new(1000, 800),
    );
    assert_eq!(r, Rect::new(100.0, 200.0, 600.0, 600.0));
}

#[test]
fn cover_scale_uses_the_binding_axis() {
    assert!(approx(cover_scale(800.0, 600.0, 400.0, 400.0), 2.0));
    assert!(approx(cover_scale(100.0, 400.0, 100.0, 100.0), 4.0));
}

#[test]
fn portrait_is_centered_and_scaled() {
    let area = Rect::new(100.0, 100.0, 900.0, 700.0);
    let p = resolve_portrait(
        area,
        Canvas::new(400, 400),
        FALLBACK_CANVAS,
        &PhotoTransform {
            scale: 1.5,
            ..PhotoTransform::default()
        },
    );
    assert!(approx(p.cover_scale, 2.0));
    assert!(approx(p.total_scale, 3.0));
    assert_eq!(p.center, Vec2::new(500.0, 400.0));

    let center = p.transform * Point::new(200.0, 200.0);
    assert!(approx(center.x, 500.0) && approx(center.y, 400.0));
    let corner = p.transform * Point::new(0.0, 0.0);
    assert!(approx(corner.x, 500.0 - 600.0) && approx(corner.y, 400.0 - 600.0));
}

#[test]
fn portrait_offset_and_rotation() {
    let area = Rect::new(0.0, 0.0, 200.0, 200.0);
    let p = resolve_portrait(
        area,
        Canvas::new(100, 100),
        FALLBACK_CANVAS,
        &PhotoTransform {
            scale: 1.0,
            rotation: 90.0,
            offset_x: 10.0,
            offset_y: -20.0,
        },
    );
    assert_eq!(p.center, Vec2::new(110.0, 80.0));
    // Top-left corner of the image rotates to the top-right of the drawn square.
    let corner = p.transform * Point::new(0.0, 0.0);
    assert!(approx(corner.x, 110.0 + 100.0));
    assert!(approx(corner.y, 80.0 - 100.0));
}

#[test]
fn zero_sized_portrait_uses_fallback() {
    let p = resolve_portrait(
        Rect::new(0.0, 0.0, 100.0, 100.0),
        Canvas::new(0, 0),
        Canvas::new(50, 25),
        &PhotoTransform::default(),
    );
    assert!(approx(p.cover_scale, 4.0));
}
