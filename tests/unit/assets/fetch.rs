use super::*;

const TRANSPARENT_GIF: &str =
    "data:image/gif;base64,R0lGODlhAQABAIAAAP///wAAACH5BAEAAAAALAAAAAABAAEAAAICRAEAOw==";

fn temp_dir(name: &str) -> PathBuf {
    std::env::temp_dir().join(format!(
        "postcard_{name}_{}_{}",
        std::process::id(),
        std::time::SystemTime::now()
            .duration_since(std::time::UNIX_EPOCH)
            .unwrap()
            .as_nanos()
    ))
}

#[test]
fn data_uri_base64_is_decoded() {
    let bytes = DefaultFetcher::new()
        .fetch(&ImageSource::new(TRANSPARENT_GIF))
        .unwrap();
    assert!(bytes.starts_with(b"GIF89a"));

    let img = crate::assets::decode::decode_image(&bytes).unwrap();
    assert_eq!((img.width, img.height), (1, 1));
}

#[test]
fn data_uri_with_bad_payload_is_a_load_error() {
    let err = DefaultFetcher::new()
        .fetch(&ImageSource::new("data:image/png;base64,@@@@"))
        .unwrap_err();
    assert!(err.is_image_load());
}

#[test]
fn relative_files_resolve_against_root() {
    let tmp = temp_dir("fetch_rel");
    std::fs::create_dir_all(tmp.join("tpl")).unwrap();
    std::fs::write(tmp.join("tpl/bg.bin"), b"abc").unwrap();

    let fetcher = DefaultFetcher::with_assets_root(&tmp);
    assert_eq!(fetcher.assets_root(), Some(tmp.as_path()));
    assert_eq!(
        fetcher.fetch(&ImageSource::new("tpl/bg.bin")).unwrap(),
        b"abc"
    );
    assert_eq!(
        fetcher.fetch(&ImageSource::new("./tpl\\bg.bin")).unwrap(),
        b"abc"
    );

    let abs = tmp.join("tpl/bg.bin");
    let url = format!("file://{}", abs.display());
    assert_eq!(fetcher.fetch(&ImageSource::new(url)).unwrap(), b"abc");

    assert!(
        fetcher
            .fetch(&ImageSource::new("../escape.png"))
            .unwrap_err()
            .is_image_load()
    );
    assert!(
        fetcher
            .fetch(&ImageSource::new("tpl/missing.png"))
            .unwrap_err()
            .is_image_load()
    );

    std::fs::remove_dir_all(&tmp).ok();
}

#[test]
fn blank_source_fails() {
    assert!(
        DefaultFetcher::new()
            .fetch(&ImageSource::new(""))
            .unwrap_err()
            .is_image_load()
    );
}

#[cfg(not(feature = "http"))]
#[test]
fn remote_without_feature_is_a_load_error() {
    let err = DefaultFetcher::new()
        .fetch(&ImageSource::new("https://example.com/bg.png"))
        .unwrap_err();
    assert!(err.is_image_load());
    assert!(err.to_string().contains("http"));
}

#[test]
fn memory_fetcher_counts_attempts() {
    let fetcher = MemoryFetcher::new().with("a.png", vec![1, 2, 3]);
    let a = ImageSource::new("a.png");
    let b = ImageSource::new("b.png");

    assert_eq!(fetcher.fetch(&a).unwrap(), vec![1, 2, 3]);
    assert_eq!(fetcher.fetch(&a).unwrap(), vec![1, 2, 3]);
    assert!(fetcher.fetch(&b).unwrap_err().is_image_load());

    assert_eq!(fetcher.fetch_count(&a), 2);
    assert_eq!(fetcher.fetch_count(&b), 1);
    assert_eq!(fetcher.total_fetches(), 3);
}
