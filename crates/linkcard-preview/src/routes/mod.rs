//! Route definitions for the preview service.
//!
//! ## Routes
//!
//! - `GET /health` - Health check (JSON)
//! - `GET /api/link-preview?url=<url>` - Link preview (JSON)
//! - `GET /generated-og-images/{slug}.png` - Generated OG images (static files)

mod health;
mod preview;

use axum::Router;
use axum::routing::get;
use tower_http::services::ServeDir;

use crate::og::IMAGE_DIR;
use crate::state::AppState;

/// Build the complete preview service router.
pub fn router(state: AppState) -> Router {
    let images = ServeDir::new(state.compositor.image_dir());

    Router::new()
        .route("/health", get(health::health_check))
        .route("/api/link-preview", get(preview::link_preview_handler))
        .nest_service(&format!("/{IMAGE_DIR}"), images)
        .with_state(state)
}
