use axum::Router;
use axum_server::tls_rustls::RustlsConfig;
use std::net::SocketAddr;
use std::sync::Arc;
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;

use crate::config::TodoConfig;
use crate::database::DatabaseConnection;
use crate::routes::{todo, weather};
use crate::weather::WeatherSource;

const ASSETS_PATH: &str = "assets";

// Anything that goes in here must be a handle or pointer that can be cloned.
// The underlying state itself should be shared.
#[derive(Clone)]
pub struct AppState {
    pub database_connection: DatabaseConnection,
    pub config: Arc<TodoConfig>,
}

#[derive(Clone)]
pub struct WeatherState {
    /// Where the widget gets its reports from.
    pub widget_source: Arc<dyn WeatherSource>,
    /// Backs the `/weather` JSON endpoint.
    pub upstream: Arc<dyn WeatherSource>,
}

pub fn create_app(state: AppState) -> Router {
    log::debug!("serving assets from {}", ASSETS_PATH);
    todo::routes(state)
        .nest_service("/assets", ServeDir::new(ASSETS_PATH))
        .layer(TraceLayer::new_for_http())
}

pub fn create_weather_app(state: WeatherState) -> Router {
    weather::routes(state)
        .nest_service("/assets", ServeDir::new(ASSETS_PATH))
        .layer(TraceLayer::new_for_http())
}

/// Serves `app` on `addr`, over TLS when a key and certificate file pair is
/// given.
pub async fn serve(
    app: Router,
    addr: SocketAddr,
    tls_files: Option<(String, String)>,
) -> std::io::Result<()> {
    log::info!("listening on {}", addr);
    match tls_files {
        Some((key_file_path, cert_file_path)) => {
            log::info!(
                "using tls with key file {} and cert file {}",
                key_file_path,
                cert_file_path
            );
            let tls = RustlsConfig::from_pem_file(cert_file_path, key_file_path).await?;
            axum_server::bind_rustls(addr, tls)
                .serve(app.into_make_service())
                .await
        }
        None => {
            axum_server::bind(addr)
                .serve(app.into_make_service())
                .await
        }
    }
}
