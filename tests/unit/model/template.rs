use super::*;

#[test]
fn parses_template_service_json() {
    let json = r#"{
        "id": 7,
        "name": "Spring",
        "description": "Campus in bloom",
        "slogan": "See you again",
        "logoUrl": "uploads/logo.png",
        "backgroundUrl": "uploads/bg.jpg",
        "aspectRatio": "3:4",
        "logoPosition": "bottom-right",
        "photoArea": { "x": 0.1, "y": 0.2, "width": 0.8, "height": 0.5, "ratio": 1.2 },
        "canvasSize": { "width": 1080, "height": 1440 }
    }"#;
    let t: Template = serde_json::from_str(json).unwrap();
    assert_eq!(t.id, TemplateId::Num(7));
    assert_eq!(t.id.to_string(), "7");
    assert_eq!(t.logo_position, LogoPosition::BottomRight);
    assert_eq!(t.aspect_ratio, AspectRatio::Portrait3x4);
    assert_eq!(t.declared_canvas(), Some(Canvas::new(1080, 1440)));
    assert_eq!(t.photo_area.ratio, Some(1.2));
    assert_eq!(t.logo_source().map(|s| s.as_str()), Some("uploads/logo.png"));
}

#[test]
fn unknown_or_missing_logo_position_is_top_left() {
    let base = r#""backgroundUrl": "bg.png", "photoArea": {"x":0,"y":0,"width":1,"height":1}"#;

    let t: Template = serde_json::from_str(&format!("{{{base}}}")).unwrap();
    assert_eq!(t.logo_position, LogoPosition::TopLeft);

    let t: Template =
        serde_json::from_str(&format!(r#"{{{base}, "logoPosition": "center"}}"#)).unwrap();
    assert_eq!(t.logo_position, LogoPosition::TopLeft);

    let t: Template =
        serde_json::from_str(&format!(r#"{{{base}, "logoPosition": null}}"#)).unwrap();
    assert_eq!(t.logo_position, LogoPosition::TopLeft);
}

#[test]
fn blank_logo_and_empty_canvas_are_absent() {
    let mut t = Template::new("bg.png", PhotoArea::new(0.0, 0.0, 1.0, 1.0));
    t.logo = Some(ImageSource::new(""));
    t.canvas_size = Some(Canvas::new(0, 1440));
    assert!(t.logo_source().is_none());
    assert!(t.declared_canvas().is_none());
}

#[test]
fn string_ids_and_ratios() {
    let id: TemplateId = serde_json::from_str(r#""tpl-1""#).unwrap();
    assert_eq!(id.to_string(), "tpl-1");
    assert!((AspectRatio::Landscape16x9.ratio() - 16.0 / 9.0).abs() < 1e-12);
    let ar: AspectRatio = serde_json::from_str(r#""1:1""#).unwrap();
    assert_eq!(ar, AspectRatio::Square);
}
