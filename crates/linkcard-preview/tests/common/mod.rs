//! Shared helpers for integration tests.

#![allow(dead_code)]

use std::io::Cursor;
use std::path::Path;

use image::{ImageFormat, Rgba, RgbaImage};
use linkcard_preview::{AppState, Config};

/// Build a config pointing the YouTube API at `youtube_api_base` and the
/// public directory at `public_dir`.
pub fn test_config(public_dir: &Path, youtube_api_base: &str) -> Config {
    Config {
        bind_addr: "127.0.0.1:0".to_string(),
        base_url: "https://example.com".to_string(),
        public_dir: public_dir.to_path_buf(),
        og_overlay: public_dir.join("overlay.png"),
        youtube_api_base: youtube_api_base.to_string(),
        youtube_api_key: Some("test-key".to_string()),
        user_agent: "linkcard-preview-tests".to_string(),
    }
}

pub fn test_state(public_dir: &Path, youtube_api_base: &str) -> AppState {
    AppState::new(test_config(public_dir, youtube_api_base)).unwrap()
}

/// Encode a solid-color RGBA PNG.
pub fn png_bytes(width: u32, height: u32, color: [u8; 4]) -> Vec<u8> {
    let img = RgbaImage::from_pixel(width, height, Rgba(color));
    let mut buf = Cursor::new(Vec::new());
    img.write_to(&mut buf, ImageFormat::Png).unwrap();
    buf.into_inner()
}

/// Write the overlay asset the compositor expects next to the public dir.
pub fn write_overlay(public_dir: &Path) {
    std::fs::write(public_dir.join("overlay.png"), png_bytes(120, 60, [0, 0, 200, 255])).unwrap();
}
