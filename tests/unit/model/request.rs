use std::io::Cursor;

use super::*;
use crate::model::template::PhotoArea;

#[test]
fn parses_generate_payload_with_defaults() {
    let json = r#"{
        "template": {
            "backgroundUrl": "bg.png",
            "photoArea": { "x": 0.25, "y": 0.25, "width": 0.5, "height": 0.5 }
        },
        "userImage": "data:image/png;base64,AAAA"
    }"#;
    let req = ComposeRequest::from_reader(Cursor::new(json)).unwrap();
    assert_eq!(req.transform, PhotoTransform::default());
    assert_eq!(req.frame_style, FrameStyle::None);
    assert_eq!(req.export_scale, 1.0);
    assert_eq!(req.meta, MetaInfo::default());
}

#[test]
fn parses_full_payload() {
    let json = r#"{
        "template": {
            "backgroundUrl": "bg.png",
            "photoArea": { "x": 0, "y": 0, "width": 1, "height": 1 }
        },
        "userImage": "me.jpg",
        "transform": { "scale": 1.5, "rotation": -30, "offsetX": 12, "offsetY": -4 },
        "meta": {
            "displayName": "Alice", "college": "Physics", "graduationYear": "2020",
            "showName": true, "showCollege": false, "showYear": true, "showSlogan": true
        },
        "frameStyle": "stamp",
        "exportScale": 2
    }"#;
    let req: ComposeRequest = serde_json::from_str(json).unwrap();
    assert_eq!(req.transform.scale, 1.5);
    assert_eq!(req.transform.rotation, -30.0);
    assert_eq!(req.transform.offset_x, 12.0);
    assert_eq!(req.transform.offset_y, -4.0);
    assert_eq!(req.frame_style, FrameStyle::Stamp);
    assert_eq!(req.export_scale, 2.0);
    assert!(req.meta.show_name && !req.meta.show_college);
}

#[test]
fn unknown_frame_style_is_rejected() {
    let err = serde_json::from_str::<FrameStyle>(r#""wavy""#);
    assert!(err.is_err());
}

#[test]
fn bad_json_is_a_validation_error() {
    let err = ComposeRequest::from_reader(Cursor::new("{")).unwrap_err();
    assert!(matches!(err, PostcardError::Validation(_)));
}

#[test]
fn new_uses_defaults() {
    let req = ComposeRequest::new(
        Template::new("bg.png", PhotoArea::new(0.0, 0.0, 1.0, 1.0)),
        "me.png",
    );
    assert_eq!(req.user_image.as_str(), "me.png");
    assert_eq!(req.export_scale, 1.0);
}
