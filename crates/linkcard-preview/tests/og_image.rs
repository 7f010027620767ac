//! Integration tests for OG image composition and its disk cache.

mod common;

use image::ImageFormat;
use linkcard_preview::{ComposeError, OgImageCompositor};
use tempfile::TempDir;
use wiremock::matchers::{any, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use common::{png_bytes, write_overlay};

fn compositor(dir: &TempDir) -> OgImageCompositor {
    write_overlay(dir.path());
    OgImageCompositor::new(
        reqwest::Client::new(),
        dir.path(),
        dir.path().join("overlay.png"),
    )
}

#[tokio::test]
async fn test_generates_once_then_reuses() {
    let mock_server = MockServer::start().await;
    let dir = TempDir::new().unwrap();
    let compositor = compositor(&dir);

    Mock::given(method("GET"))
        .and(path("/logo.png"))
        .respond_with(
            ResponseTemplate::new(200).set_body_bytes(png_bytes(64, 64, [200, 0, 0, 255])),
        )
        .expect(1)
        .mount(&mock_server)
        .await;

    let logo_url = format!("{}/logo.png", mock_server.uri());

    let first = compositor
        .compose(&logo_url, "home", "https://example.com")
        .await
        .unwrap();
    let written = std::fs::read(compositor.image_path("home")).unwrap();

    let second = compositor
        .compose(&logo_url, "home", "https://example.com/")
        .await
        .unwrap();

    assert_eq!(first, "https://example.com/generated-og-images/home.png");
    assert_eq!(first, second);
    assert_eq!(std::fs::read(compositor.image_path("home")).unwrap(), written);
    let served: Vec<_> = std::fs::read_dir(compositor.image_dir())
        .unwrap()
        .map(|entry| entry.unwrap().file_name())
        .collect();
    assert_eq!(served, vec![std::ffi::OsString::from("home.png")]);
    assert_eq!(std::fs::read_dir(compositor.staging_dir()).unwrap().count(), 0);
}

#[tokio::test]
async fn test_existing_file_is_authoritative() {
    let mock_server = MockServer::start().await;
    let dir = TempDir::new().unwrap();
    let compositor = compositor(&dir);

    Mock::given(any())
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&mock_server)
        .await;

    std::fs::create_dir_all(compositor.image_dir()).unwrap();
    std::fs::write(compositor.image_path("home"), b"sentinel").unwrap();

    let url = compositor
        .compose(
            &format!("{}/logo.png", mock_server.uri()),
            "home",
            "https://example.com",
        )
        .await
        .unwrap();

    assert_eq!(url, "https://example.com/generated-og-images/home.png");
    assert_eq!(
        std::fs::read(compositor.image_path("home")).unwrap(),
        b"sentinel"
    );
}

#[tokio::test]
async fn test_output_is_fixed_size_rgb_png() {
    let mock_server = MockServer::start().await;
    let dir = TempDir::new().unwrap();
    let compositor = compositor(&dir);

    Mock::given(method("GET"))
        .and(path("/wide.png"))
        .respond_with(
            ResponseTemplate::new(200).set_body_bytes(png_bytes(900, 90, [10, 150, 10, 128])),
        )
        .mount(&mock_server)
        .await;

    compositor
        .compose(
            &format!("{}/wide.png", mock_server.uri()),
            "wide-logo",
            "https://example.com",
        )
        .await
        .unwrap();

    let bytes = std::fs::read(compositor.image_path("wide-logo")).unwrap();
    let img = image::load_from_memory_with_format(&bytes, ImageFormat::Png).unwrap();
    assert_eq!((img.width(), img.height()), (1200, 630));
    assert_eq!(img.color(), image::ColorType::Rgb8);
}

#[tokio::test]
async fn test_logo_http_error_leaves_no_file() {
    let mock_server = MockServer::start().await;
    let dir = TempDir::new().unwrap();
    let compositor = compositor(&dir);

    Mock::given(method("GET"))
        .and(path("/missing.png"))
        .respond_with(ResponseTemplate::new(404))
        .expect(2)
        .mount(&mock_server)
        .await;

    let logo_url = format!("{}/missing.png", mock_server.uri());

    for _ in 0..2 {
        let err = compositor
            .compose(&logo_url, "about", "https://example.com")
            .await
            .unwrap_err();
        assert!(matches!(err, ComposeError::UpstreamFetch(_)));
        assert!(!compositor.image_path("about").exists());
    }
}

#[tokio::test]
async fn test_undecodable_logo_leaves_no_file() {
    let mock_server = MockServer::start().await;
    let dir = TempDir::new().unwrap();
    let compositor = compositor(&dir);

    Mock::given(method("GET"))
        .and(path("/logo.png"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>not an image</html>"))
        .mount(&mock_server)
        .await;

    let err = compositor
        .compose(
            &format!("{}/logo.png", mock_server.uri()),
            "broken",
            "https://example.com",
        )
        .await
        .unwrap_err();

    assert!(matches!(err, ComposeError::Image(_)));
    assert!(!compositor.image_path("broken").exists());
}

#[tokio::test]
async fn test_missing_overlay_fails() {
    let mock_server = MockServer::start().await;
    let dir = TempDir::new().unwrap();
    let compositor = OgImageCompositor::new(
        reqwest::Client::new(),
        dir.path(),
        dir.path().join("does-not-exist.png"),
    );

    Mock::given(method("GET"))
        .and(path("/logo.png"))
        .respond_with(
            ResponseTemplate::new(200).set_body_bytes(png_bytes(10, 10, [0, 0, 0, 255])),
        )
        .mount(&mock_server)
        .await;

    let result = compositor
        .compose(
            &format!("{}/logo.png", mock_server.uri()),
            "home",
            "https://example.com",
        )
        .await;

    assert!(result.is_err());
    assert!(!compositor.image_path("home").exists());
}

#[tokio::test]
async fn test_invalid_slug_makes_no_request() {
    let mock_server = MockServer::start().await;
    let dir = TempDir::new().unwrap();
    let compositor = compositor(&dir);

    Mock::given(any())
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&mock_server)
        .await;

    let err = compositor
        .compose(
            &format!("{}/logo.png", mock_server.uri()),
            "../escape",
            "https://example.com",
        )
        .await
        .unwrap_err();

    assert!(matches!(err, ComposeError::InvalidSlug(_)));
}
