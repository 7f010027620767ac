//! Application configuration loaded from environment variables.

use std::path::PathBuf;

/// Default YouTube Data API base.
pub const DEFAULT_YOUTUBE_API_BASE: &str = "https://www.googleapis.com/youtube/v3";

/// Application configuration.
#[derive(Clone)]
pub struct Config {
    /// Server bind address (e.g., "0.0.0.0:8080").
    pub bind_addr: String,

    /// Base URL for this service, used to build public image URLs.
    /// e.g., "https://example.com"
    pub base_url: String,

    /// Public directory; generated images live in `<public_dir>/generated-og-images`.
    pub public_dir: PathBuf,

    /// Local overlay asset composited onto every OG image.
    pub og_overlay: PathBuf,

    /// YouTube Data API base URL.
    pub youtube_api_base: String,

    /// YouTube Data API key.
    pub youtube_api_key: Option<String>,

    /// User agent for outbound requests.
    pub user_agent: String,
}

impl std::fmt::Debug for Config {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Config")
            .field("bind_addr", &self.bind_addr)
            .field("base_url", &self.base_url)
            .field("public_dir", &self.public_dir)
            .field("og_overlay", &self.og_overlay)
            .field("youtube_api_base", &self.youtube_api_base)
            .field("youtube_api_key", &self.youtube_api_key.as_ref().map(|_| "<redacted>"))
            .field("user_agent", &self.user_agent)
            .finish()
    }
}

impl Config {
    /// Load configuration from environment variables.
    ///
    /// Required:
    /// - None (all have defaults for local development)
    ///
    /// Optional:
    /// - `LINKCARD_BIND_ADDR`: Server bind address (default: "0.0.0.0:8080")
    /// - `LINKCARD_BASE_URL`: Base URL for public links (default: "http://localhost:8080")
    /// - `LINKCARD_PUBLIC_DIR`: Public directory (default: "public")
    /// - `LINKCARD_OG_OVERLAY`: Overlay image path (default: "assets/og-overlay.png")
    /// - `YOUTUBE_API_BASE`: YouTube Data API base URL
    /// - `YOUTUBE_API_KEY`: YouTube Data API key
    /// - `LINKCARD_USER_AGENT`: Outbound user agent (default: "linkcard-preview/<version>")
    pub fn from_env() -> anyhow::Result<Self> {
        let bind_addr =
            std::env::var("LINKCARD_BIND_ADDR").unwrap_or_else(|_| "0.0.0.0:8080".to_string());

        let base_url = std::env::var("LINKCARD_BASE_URL")
            .unwrap_or_else(|_| "http://localhost:8080".to_string())
            .trim_end_matches('/')
            .to_string();

        let public_dir = std::env::var("LINKCARD_PUBLIC_DIR")
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from("public"));

        let og_overlay = std::env::var("LINKCARD_OG_OVERLAY")
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from("assets/og-overlay.png"));

        let youtube_api_base = std::env::var("YOUTUBE_API_BASE")
            .unwrap_or_else(|_| DEFAULT_YOUTUBE_API_BASE.to_string())
            .trim_end_matches('/')
            .to_string();

        let youtube_api_key = std::env::var("YOUTUBE_API_KEY")
            .ok()
            .map(|k| k.trim().to_string())
            .filter(|k| !k.is_empty());

        let user_agent = std::env::var("LINKCARD_USER_AGENT")
            .unwrap_or_else(|_| concat!("linkcard-preview/", env!("CARGO_PKG_VERSION")).to_string());

        tracing::info!(
            bind_addr = %bind_addr,
            base_url = %base_url,
            public_dir = %public_dir.display(),
            og_overlay = %og_overlay.display(),
            youtube_api_base = %youtube_api_base,
            youtube_api_key_set = youtube_api_key.is_some(),
            "preview configuration loaded"
        );

        if youtube_api_key.is_none() {
            tracing::warn!("YOUTUBE_API_KEY is not set, video platform previews will fail");
        }

        Ok(Self {
            bind_addr,
            base_url,
            public_dir,
            og_overlay,
            youtube_api_base,
            youtube_api_key,
            user_agent,
        })
    }
}
