//! Linkcard Preview - link preview API and OG image generator.
//!
//! `serve` (the default) runs the HTTP API; `og-image` composes one OG image
//! and prints its public URL, for use from page metadata build steps.

use axum::http::Request;
use clap::{Parser, Subcommand};
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::Level;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

use linkcard_preview::{AppState, Config, router};

/// Linkcard Preview - link previews and cached OG images.
#[derive(Parser, Debug)]
#[command(name = "linkcard-preview")]
#[command(about = "Link preview API and OG image generator", long_about = None)]
struct Args {
    /// Path to .env file (optional).
    #[arg(long, env = "DOTENV_PATH", default_value = ".env")]
    dotenv: String,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Run the HTTP server (default).
    Serve,

    /// Generate (or reuse) the OG image for a slug and print its public URL.
    OgImage {
        /// URL of the logo to composite.
        #[arg(long)]
        logo: String,

        /// Stable content identifier; also the cache key.
        #[arg(long)]
        slug: String,

        /// Base URL for the printed public URL (default: LINKCARD_BASE_URL).
        #[arg(long)]
        base_url: Option<String>,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    // Load .env file if it exists
    if std::path::Path::new(&args.dotenv).exists() {
        dotenvy::from_path(&args.dotenv)?;
        eprintln!("Loaded environment from {}", args.dotenv);
    }

    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let config = Config::from_env()?;

    match args.command.unwrap_or(Command::Serve) {
        Command::Serve => serve(config).await,
        Command::OgImage {
            logo,
            slug,
            base_url,
        } => {
            let state = AppState::new(config)?;
            let base_url = base_url.unwrap_or_else(|| state.config.base_url.clone());
            let url = state.compositor.compose(&logo, &slug, &base_url).await?;
            println!("{url}");
            Ok(())
        }
    }
}

async fn serve(config: Config) -> anyhow::Result<()> {
    let state = AppState::new(config)?;
    let bind_addr = state.config.bind_addr.clone();

    let app = router(state)
        .layer(
            TraceLayer::new_for_http().make_span_with(|request: &Request<_>| {
                tracing::span!(
                    Level::INFO,
                    "http_request",
                    method = %request.method(),
                    path = %request.uri().path(),
                )
            }),
        )
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        );

    let listener = tokio::net::TcpListener::bind(&bind_addr).await?;
    tracing::info!(addr = %bind_addr, "starting preview server");

    axum::serve(listener, app).await?;

    Ok(())
}
