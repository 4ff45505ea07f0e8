use std::io::Cursor;

use super::*;
use crate::{
    assets::fetch::MemoryFetcher,
    foundation::core::Canvas,
    model::template::{LogoPosition, PhotoArea, Template},
};

fn png(w: u32, h: u32, rgba: [u8; 4]) -> Vec<u8> {
    let img = image::RgbaImage::from_pixel(w, h, image::Rgba(rgba));
    let mut buf = Vec::new();
    image::DynamicImage::ImageRgba8(img)
        .write_to(&mut Cursor::new(&mut buf), image::ImageFormat::Png)
        .unwrap();
    buf
}

fn compositor(fetcher: MemoryFetcher, config: CompositorConfig) -> Compositor {
    let mut c = Compositor::with_fetcher(config, Arc::new(fetcher));
    c.set_fonts(FontSet::default());
    c
}

fn fixtures() -> MemoryFetcher {
    MemoryFetcher::new()
        .with("bg.png", png(120, 160, [0, 0, 255, 255]))
        .with("me.png", png(50, 50, [255, 0, 0, 255]))
        .with("logo.png", png(40, 20, [0, 255, 0, 255]))
}

fn request() -> ComposeRequest {
    let template = Template::new("bg.png", PhotoArea::new(0.25, 0.25, 0.5, 0.5));
    ComposeRequest::new(template, "me.png")
}

#[test]
fn layout_uses_background_size_without_declared_canvas() {
    let mut c = compositor(fixtures(), CompositorConfig::default());
    let layout = c.layout(&request()).unwrap();
    assert_eq!(layout.export.base, Canvas::new(120, 160));
    assert_eq!(layout.export.target, Canvas::new(120, 160));
    assert_eq!(layout.photo_area, Rect::new(30.0, 40.0, 90.0, 120.0));
    // area 60x80, portrait 50x50
    assert_eq!(layout.portrait.cover_scale, 1.6);
    assert_eq!(layout.logo, None);
    assert_eq!(layout.slogan, None);
    assert_eq!(layout.meta_line, None);
}

#[test]
fn declared_canvas_wins_over_background() {
    let mut req = request();
    req.template.canvas_size = Some(Canvas::new(240, 320));
    req.export_scale = 0.5;
    let mut c = compositor(fixtures(), CompositorConfig::default());
    let layout = c.layout(&req).unwrap();
    assert_eq!(layout.export.base, Canvas::new(240, 320));
    assert_eq!(layout.export.target, Canvas::new(120, 160));
}

#[test]
fn logo_is_placed_unless_disabled() {
    let mut req = request();
    req.template.logo = Some("logo.png".into());
    req.template.logo_position = LogoPosition::TopRight;

    let mut c = compositor(fixtures(), CompositorConfig::default());
    let rect = c.layout(&req).unwrap().logo.unwrap();
    // max width 0.18 * 120 = 21.6, margin 0.02 * 160 = 3.2
    assert!((rect.width() - 21.6).abs() < 1e-9);
    assert!((rect.x1 - (120.0 - 3.2)).abs() < 1e-9);
    assert!((rect.y0 - 3.2).abs() < 1e-9);

    let config = CompositorConfig {
        draw_logo: false,
        ..CompositorConfig::default()
    };
    let mut c = compositor(fixtures(), config);
    assert_eq!(c.layout(&req).unwrap().logo, None);
}

#[test]
fn text_lines_follow_meta_flags() {
    let mut req = request();
    req.template.slogan = "See you".to_string();
    req.meta.show_slogan = true;
    req.meta.display_name = "Alice".to_string();
    req.meta.show_name = true;
    req.meta.graduation_year = "2020".to_string();
    req.meta.show_year = true;

    let mut c = compositor(fixtures(), CompositorConfig::default());
    let layout = c.layout(&req).unwrap();
    assert_eq!(layout.slogan.as_deref(), Some("See you"));
    assert_eq!(layout.meta_line.as_deref(), Some("Alice · 2020"));
}

#[test]
fn render_draws_background_and_clipped_portrait() {
    let mut c = compositor(fixtures(), CompositorConfig::default());
    let frame = c.render(&request()).unwrap();
    assert_eq!(frame.size(), Canvas::new(120, 160));
    assert_eq!(frame.pixel(5, 5), Some([0, 0, 255, 255]));
    let inside = frame.pixel(60, 80).unwrap();
    assert!(inside[0] >= 250 && inside[2] <= 5, "{inside:?}");
    assert_eq!(frame.pixel(26, 80), Some([0, 0, 255, 255]));
}

#[test]
fn missing_logo_fails_the_whole_call() {
    let mut req = request();
    req.template.logo = Some("nope.png".into());
    let mut c = compositor(fixtures(), CompositorConfig::default());
    let err = c.render(&req).unwrap_err();
    assert!(err.is_image_load());
}
