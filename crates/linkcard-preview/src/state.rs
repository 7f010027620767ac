//! Application state shared across all request handlers.

use std::sync::Arc;

use crate::config::Config;
use crate::og::OgImageCompositor;
use crate::resolve::PreviewResolver;
use crate::youtube::YouTubeClient;

/// Shared application state available to all request handlers.
#[derive(Clone)]
pub struct AppState {
    /// Application configuration.
    pub config: Arc<Config>,

    /// Link preview resolver (classifier + strategies).
    pub resolver: PreviewResolver,

    /// OG image compositor backed by the public directory.
    pub compositor: OgImageCompositor,
}

impl AppState {
    /// Create a new application state from configuration.
    ///
    /// One HTTP client is shared by every outbound call; it has no timeout,
    /// the caller's deadline governs cancellation.
    pub fn new(config: Config) -> anyhow::Result<Self> {
        let http = reqwest::Client::builder()
            .user_agent(&config.user_agent)
            .build()?;

        let youtube = YouTubeClient::new(
            http.clone(),
            &config.youtube_api_base,
            config.youtube_api_key.clone(),
        );
        let resolver = PreviewResolver::new(http.clone(), youtube);
        let compositor = OgImageCompositor::new(http, &config.public_dir, &config.og_overlay);

        tracing::info!(
            image_dir = %compositor.image_dir().display(),
            "application state initialized"
        );

        Ok(Self {
            config: Arc::new(config),
            resolver,
            compositor,
        })
    }
}
