use std::collections::HashMap;

use super::*;

fn env(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
    let map: HashMap<String, String> = pairs
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect();
    move |k: &str| map.get(k).cloned()
}

#[test]
fn defaults_match_renderer_constants() {
    let cfg = CompositorConfig::default();
    assert_eq!(cfg.max_dimension, 2160);
    assert_eq!(cfg.jpeg_quality, 0.85);
    assert_eq!(cfg.format, ExportFormat::Jpeg);
    assert!(cfg.draw_logo);
    assert_eq!(cfg.fallback_canvas, Canvas::new(1080, 1440));
    cfg.validate().unwrap();
}

#[test]
fn partial_json_keeps_defaults() {
    let cfg = CompositorConfig::from_reader(
        r#"{ "maxDimension": 1024, "format": "png", "drawLogo": false }"#.as_bytes(),
    )
    .unwrap();
    assert_eq!(cfg.max_dimension, 1024);
    assert_eq!(cfg.format, ExportFormat::Png);
    assert!(!cfg.draw_logo);
    assert_eq!(cfg.jpeg_quality, 0.85);
}

#[test]
fn unknown_fields_and_bad_ranges_are_rejected() {
    assert!(CompositorConfig::from_reader(r#"{ "maxDim": 1 }"#.as_bytes()).is_err());
    let err = CompositorConfig::from_reader(r#"{ "maxDimension": 70000 }"#.as_bytes()).unwrap_err();
    assert!(matches!(err, PostcardError::Validation(_)));
    assert!(CompositorConfig::from_reader(r#"{ "jpegQuality": 1.5 }"#.as_bytes()).is_err());
}

#[test]
fn env_overrides_apply() {
    let mut cfg = CompositorConfig::default();
    cfg.apply_overrides(env(&[
        (ENV_MAX_DIMENSION, "1440"),
        (ENV_JPEG_QUALITY, " 0.5 "),
        (ENV_DRAW_LOGO, "off"),
        (ENV_ASSETS_ROOT, "/srv/assets"),
    ]))
    .unwrap();
    assert_eq!(cfg.max_dimension, 1440);
    assert_eq!(cfg.jpeg_quality, 0.5);
    assert!(!cfg.draw_logo);
    assert_eq!(cfg.assets_root.as_deref(), Some(Path::new("/srv/assets")));
}

#[test]
fn empty_overrides_are_ignored() {
    let mut cfg = CompositorConfig::default();
    cfg.apply_overrides(env(&[(ENV_MAX_DIMENSION, ""), (ENV_DRAW_LOGO, "  ")]))
        .unwrap();
    assert_eq!(cfg, CompositorConfig::default());
}

#[test]
fn malformed_overrides_are_validation_errors() {
    let mut cfg = CompositorConfig::default();
    assert!(cfg.apply_overrides(env(&[(ENV_DRAW_LOGO, "maybe")])).is_err());
    assert!(cfg.apply_overrides(env(&[(ENV_MAX_DIMENSION, "big")])).is_err());
    assert!(cfg.apply_overrides(env(&[(ENV_MAX_DIMENSION, "0")])).is_err());
}
