use std::net::SocketAddr;
use std::path::PathBuf;

use axum::http::{header, HeaderValue};
use axum::routing::get;
use axum::Router;
use clap::Parser;
use tower_http::services::ServeDir;
use tower_http::set_header::SetResponseHeaderLayer;
use tower_http::trace::TraceLayer;
use tracing_subscriber::EnvFilter;

use mathboard_shared::protocol::DEFAULT_API_URL;

mod handlers;
mod state;

use crate::handlers::{config_handler, ping_handler};
use crate::state::AppState;

#[derive(Parser, Debug)]
#[command(author, version, about)]
struct Args {
    /// Directory holding index.html and the wasm bundle.
    #[arg(long)]
    public_dir: Option<PathBuf>,
    /// Base URL of the recognition service handed to the browser.
    #[arg(long, env = "MATHBOARD_API_URL", default_value = DEFAULT_API_URL)]
    api_url: String,
    #[arg(long, env = "PORT", default_value_t = 3000)]
    port: u16,
}

fn app(state: AppState, public_dir: PathBuf) -> Router {
    let config_routes = Router::new()
        .route("/config.json", get(config_handler))
        .layer(SetResponseHeaderLayer::overriding(
            header::CACHE_CONTROL,
            HeaderValue::from_static("no-store"),
        ));

    Router::new()
        .merge(config_routes)
        .route("/ping", get(ping_handler))
        .fallback_service(ServeDir::new(public_dir).append_index_html_on_directories(true))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let args = Args::parse();
    let public_dir = args
        .public_dir
        .unwrap_or_else(|| PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("../public"));
    if !public_dir.join("index.html").exists() {
        tracing::warn!(dir = %public_dir.display(), "public dir has no index.html");
    }
    tracing::info!(api_url = %args.api_url, "recognizer endpoint");

    let state = AppState::new(args.api_url);
    let app = app(state, public_dir);

    let addr = SocketAddr::from(([0, 0, 0, 0], args.port));
    tracing::info!(port = args.port, "MathBoard running at http://localhost:{}", args.port);

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .expect("Failed to bind server");
    axum::serve(listener, app).await.expect("Server crashed");
}
