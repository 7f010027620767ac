//! Link preview resolution.
//!
//! Classifies the URL, dispatches to exactly one strategy and normalizes the
//! result. Strategy failures surface as [`PreviewError::UpstreamFetch`]; there
//! is no fallback from one strategy to the other.

use serde::Serialize;

use crate::classify::{self, SourceKind};
use crate::error::PreviewError;
use crate::opengraph::{self, OpenGraph};
use crate::youtube::{VideoPreview, YouTubeClient};

const DEFAULT_TITLE: &str = "No title";
const DEFAULT_DESCRIPTION: &str = "No description available";

/// The unified preview returned to callers.
///
/// `title`, `description` and `url` are never empty; `image` may be.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LinkPreview {
    pub title: String,
    pub description: String,
    pub image: String,
    pub url: String,
}

impl LinkPreview {
    /// Build a preview from scraped tags, falling back to `requested_url`.
    pub fn from_open_graph(og: OpenGraph, requested_url: &str) -> Self {
        Self {
            title: og.title.unwrap_or_default(),
            description: og.description.unwrap_or_default(),
            image: og.image.unwrap_or_default(),
            url: og.url.unwrap_or_default(),
        }
        .normalized(requested_url)
    }

    fn from_video(video: VideoPreview, requested_url: &str) -> Self {
        Self {
            title: video.title,
            description: video.description,
            image: video.image,
            url: video.url,
        }
        .normalized(requested_url)
    }

    fn normalized(mut self, requested_url: &str) -> Self {
        if self.title.trim().is_empty() {
            self.title = DEFAULT_TITLE.to_string();
        }
        if self.description.trim().is_empty() {
            self.description = DEFAULT_DESCRIPTION.to_string();
        }
        if self.url.trim().is_empty() {
            self.url = requested_url.to_string();
        }
        self
    }
}

/// Resolves URLs into link previews.
#[derive(Debug, Clone)]
pub struct PreviewResolver {
    http: reqwest::Client,
    youtube: YouTubeClient,
}

impl PreviewResolver {
    pub fn new(http: reqwest::Client, youtube: YouTubeClient) -> Self {
        Self { http, youtube }
    }

    /// Resolve a URL into a [`LinkPreview`].
    ///
    /// Fails with [`PreviewError::MissingInput`] before any network call when
    /// `url` is absent or blank.
    pub async fn resolve(&self, url: Option<&str>) -> Result<LinkPreview, PreviewError> {
        let url = url
            .map(str::trim)
            .filter(|u| !u.is_empty())
            .ok_or(PreviewError::MissingInput)?;

        let source = classify::classify(url);
        tracing::debug!(url = %url, kind = ?source.kind, "dispatching link preview");

        let preview = match source.kind {
            SourceKind::VideoPlatform => {
                let video = self.youtube.resolve(&source).await?;
                LinkPreview::from_video(video, url)
            }
            SourceKind::Generic => {
                let og = opengraph::scrape(&self.http, url).await?;
                LinkPreview::from_open_graph(og, url)
            }
        };

        Ok(preview)
    }
}
