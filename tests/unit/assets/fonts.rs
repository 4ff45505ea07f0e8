use super::*;

#[test]
fn bold_falls_back_to_regular_and_back() {
    let face = FontFace::from_bytes(vec![1, 2, 3], 0);
    let set = FontSet {
        regular: Some(face.clone()),
        bold: None,
    };
    assert_eq!(set.bold().map(|f| f.bytes.len()), Some(3));

    let set = FontSet {
        regular: None,
        bold: Some(face),
    };
    assert_eq!(set.regular().map(|f| f.bytes.len()), Some(3));
    assert!(FontSet::default().is_empty());
}

#[test]
fn missing_font_file_is_an_error() {
    assert!(FontSet::resolve(Some(Path::new("/nonexistent/font.ttf")), None).is_err());
}

#[test]
fn system_lookup_succeeds_and_explicit_file_wins() {
    let system = FontSet::resolve(None, None).unwrap();
    let Some(face) = system.regular() else {
        eprintln!("no system fonts; skipping");
        return;
    };

    let dir = std::env::temp_dir().join(format!("postcard-fonts-{}", std::process::id()));
    std::fs::create_dir_all(&dir).unwrap();
    let path = dir.join("regular.ttf");
    std::fs::write(&path, face.bytes.as_slice()).unwrap();

    let set = FontSet::resolve(Some(&path), None).unwrap();
    assert_eq!(set.regular().map(|f| f.bytes.len()), Some(face.bytes.len()));
    assert!(set.bold().is_some());
}
