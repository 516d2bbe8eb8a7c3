use axum::http::{header::CONTENT_TYPE, HeaderValue, Method};
use log::*;
use time::Duration;
use tower_http::cors::CorsLayer;
use tower_sessions::{Expiry, MemoryStore, SessionManagerLayer};

pub use self::error::{Error, Result};
pub use service::AppState;

mod error;

pub(crate) mod controller;
pub(crate) mod extractors;
pub(crate) mod middleware;
pub(crate) mod params;
pub mod router;
pub(crate) mod view;

pub async fn init_server(app_state: AppState) -> std::io::Result<()> {
    let host = app_state
        .config
        .interface
        .clone()
        .unwrap_or_else(|| "127.0.0.1".to_string());
    let port = app_state.config.port;
    let listen_addr = format!("{host}:{port}");

    info!("Server starting... listening for connections on http://{listen_addr}");

    let allowed_origins: Vec<HeaderValue> = app_state
        .config
        .allowed_origins
        .iter()
        .filter_map(|origin| {
            origin
                .parse()
                .map_err(|err| warn!("Skipping unparseable CORS origin {origin}: {err:?}"))
                .ok()
        })
        .collect();

    let cors_layer = CorsLayer::new()
        .allow_methods([Method::GET, Method::POST])
        .allow_credentials(true)
        .allow_headers([CONTENT_TYPE])
        .allow_origin(allowed_origins);

    // Sessions live in process memory; a restart logs everyone out.
    let session_store = MemoryStore::default();
    let session_layer = SessionManagerLayer::new(session_store)
        .with_secure(app_state.config.is_production())
        .with_expiry(Expiry::OnInactivity(Duration::seconds(
            app_state.config.session_expiry_seconds as i64,
        )));

    let router = router::define_routes(app_state)
        .layer(cors_layer)
        .layer(session_layer);

    let listener = tokio::net::TcpListener::bind(listen_addr).await?;
    axum::serve(listener, router).await
}
