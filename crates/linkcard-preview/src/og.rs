//! Open Graph image composition.
//!
//! Generates a branded social preview image per slug:
//! - White opaque background (1200x630, standard OG dimensions)
//! - Site logo fitted into a 300x300 box on the left
//! - A fixed local overlay fitted into a 300x300 box on the right
//!
//! Images are written once to `<public-dir>/generated-og-images/<slug>.png`
//! and reused forever after; an existing file is never re-fetched or rewritten.

use std::io::{Cursor, Write};
use std::path::{Path, PathBuf};

use image::imageops::{self, FilterType};
use image::{DynamicImage, ImageFormat, Rgba, RgbImage, RgbaImage};

use crate::error::{ComposeError, FetchError};

/// OG image dimensions (standard Open Graph).
pub const OG_WIDTH: u32 = 1200;
pub const OG_HEIGHT: u32 = 630;

/// Directory under the public dir holding generated images.
pub const IMAGE_DIR: &str = "generated-og-images";

/// Sibling of [`IMAGE_DIR`] where PNGs are written before being renamed into
/// place. It is never served, so partial files stay private.
const STAGING_DIR: &str = ".og-staging";

/// Bounding box for the logo and the overlay.
const TILE_SIZE: u32 = 300;

/// Horizontal distance of each tile from its canvas edge.
const TILE_MARGIN: u32 = 50;

/// Top offset shared by both tiles.
const TILE_TOP: u32 = 165;

const WHITE: Rgba<u8> = Rgba([255, 255, 255, 255]);

/// Composes and caches OG images on disk.
#[derive(Debug, Clone)]
pub struct OgImageCompositor {
    http: reqwest::Client,
    public_dir: PathBuf,
    overlay_path: PathBuf,
}

impl OgImageCompositor {
    pub fn new(
        http: reqwest::Client,
        public_dir: impl Into<PathBuf>,
        overlay_path: impl Into<PathBuf>,
    ) -> Self {
        Self {
            http,
            public_dir: public_dir.into(),
            overlay_path: overlay_path.into(),
        }
    }

    /// Directory holding the generated images.
    pub fn image_dir(&self) -> PathBuf {
        self.public_dir.join(IMAGE_DIR)
    }

    /// Directory holding in-progress writes.
    pub fn staging_dir(&self) -> PathBuf {
        self.public_dir.join(STAGING_DIR)
    }

    /// Cache path for a slug.
    pub fn image_path(&self, slug: &str) -> PathBuf {
        self.image_dir().join(format!("{slug}.png"))
    }

    /// Return the public URL of the OG image for `slug`, generating it first
    /// if no file exists yet.
    ///
    /// Concurrent first calls for the same slug may both generate; the file is
    /// renamed into place atomically so the last writer wins with a complete PNG.
    pub async fn compose(
        &self,
        logo_url: &str,
        slug: &str,
        base_url: &str,
    ) -> Result<String, ComposeError> {
        validate_slug(slug)?;

        let path = self.image_path(slug);
        let url = public_url(base_url, slug);

        if tokio::fs::try_exists(&path).await? {
            tracing::debug!(slug = %slug, "og image cache hit");
            return Ok(url);
        }

        tracing::debug!(slug = %slug, logo_url = %logo_url, "og image cache miss, generating");

        let logo_bytes = fetch_logo(&self.http, logo_url).await?;
        let overlay_path = self.overlay_path.clone();
        let staging = self.staging_dir();
        let dir = self.image_dir();

        tokio::task::spawn_blocking(move || -> Result<(), ComposeError> {
            let logo = image::load_from_memory(&logo_bytes)?;
            let overlay = image::open(&overlay_path)?;
            let png = encode_png(&composite(&logo, &overlay))?;
            write_atomic(&staging, &dir, &path, &png)
        })
        .await??;

        tracing::info!(slug = %slug, "og image generated");
        Ok(url)
    }
}

/// Public URL for a slug's image.
pub fn public_url(base_url: &str, slug: &str) -> String {
    format!("{}/{IMAGE_DIR}/{slug}.png", base_url.trim_end_matches('/'))
}

/// Slugs become file names, so only `[A-Za-z0-9_-]+` is accepted.
fn validate_slug(slug: &str) -> Result<(), ComposeError> {
    let valid = !slug.is_empty()
        && slug
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_');

    if valid {
        Ok(())
    } else {
        Err(ComposeError::InvalidSlug(slug.to_string()))
    }
}

async fn fetch_logo(http: &reqwest::Client, url: &str) -> Result<Vec<u8>, FetchError> {
    let response = http.get(url).send().await?;
    let status = response.status();
    if !status.is_success() {
        return Err(FetchError::Status {
            url: url.to_string(),
            status,
        });
    }

    Ok(response.bytes().await?.to_vec())
}

/// Lay out the logo and overlay on a white 1200x630 canvas.
///
/// Both inputs are scaled to fit a 300x300 box, keeping their aspect ratio.
/// Transparent areas blend onto white; the result has no alpha channel.
pub fn composite(logo: &DynamicImage, overlay: &DynamicImage) -> RgbImage {
    let mut canvas = RgbaImage::from_pixel(OG_WIDTH, OG_HEIGHT, WHITE);

    let logo = fit_tile(logo);
    imageops::overlay(
        &mut canvas,
        &logo,
        i64::from(TILE_MARGIN),
        i64::from(TILE_TOP),
    );

    let overlay = fit_tile(overlay);
    imageops::overlay(
        &mut canvas,
        &overlay,
        i64::from(OG_WIDTH - TILE_SIZE - TILE_MARGIN),
        i64::from(TILE_TOP),
    );

    DynamicImage::ImageRgba8(canvas).to_rgb8()
}

fn fit_tile(img: &DynamicImage) -> RgbaImage {
    img.resize(TILE_SIZE, TILE_SIZE, FilterType::Lanczos3)
        .to_rgba8()
}

fn encode_png(img: &RgbImage) -> Result<Vec<u8>, ComposeError> {
    let mut buf = Cursor::new(Vec::new());
    img.write_to(&mut buf, ImageFormat::Png)?;
    Ok(buf.into_inner())
}

/// Write through a temp file in `staging`, then rename into `path` under `dir`.
///
/// `staging` must be on the same filesystem as `dir`.
fn write_atomic(
    staging: &Path,
    dir: &Path,
    path: &Path,
    bytes: &[u8],
) -> Result<(), ComposeError> {
    std::fs::create_dir_all(staging)?;
    std::fs::create_dir_all(dir)?;

    let mut tmp = tempfile::Builder::new()
        .prefix(".og-")
        .suffix(".partial")
        .tempfile_in(staging)?;
    tmp.write_all(bytes)?;
    tmp.as_file().sync_all()?;
    tmp.persist(path).map_err(|e| e.error)?;

    Ok(())
}
