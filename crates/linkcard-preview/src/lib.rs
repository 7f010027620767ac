//! Linkcard Preview - link previews and cached Open Graph images.
//!
//! # Architecture
//!
//! - **Classify**: Decides whether a URL belongs to the video platform or is a generic page
//! - **YouTube**: Resolves playlist/video metadata through the YouTube Data API
//! - **Open Graph**: Scrapes `og:*` meta tags from any other page
//! - **Resolve**: Dispatches to exactly one strategy and normalizes the result
//! - **OG**: Composites a logo and overlay into a 1200x630 PNG, written once per slug
//!
//! # Endpoints
//!
//! ```text
//! GET /api/link-preview?url=<url>    -> { title, description, image, url }
//! GET /generated-og-images/<slug>.png
//! ```
//!
//! Failures never degrade into partial previews: the caller gets either a
//! fully populated preview or a JSON `{ error }` with status 400 or 500.

pub mod classify;
pub mod config;
pub mod error;
pub mod og;
pub mod opengraph;
pub mod resolve;
pub mod routes;
pub mod state;
pub mod youtube;

pub use config::Config;
pub use error::{ComposeError, FetchError, PreviewError};
pub use og::OgImageCompositor;
pub use resolve::{LinkPreview, PreviewResolver};
pub use routes::router;
pub use state::AppState;
