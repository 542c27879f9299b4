use std::time::Duration;

use anyhow::{Context, Result};
use axum::http::{HeaderValue, Method, StatusCode};
use axum::{Router, routing::get};
use tower_http::cors::{AllowOrigin, CorsLayer};
use tower_http::services::ServeDir;
use tower_http::timeout::TimeoutLayer;
use tower_http::trace::TraceLayer;
use tracing::{info, warn};

use crate::api::{self, AppState};
use crate::config::{NeedCoffeeConfig, ServerConfig};

const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

fn build_cors(origins: &[String]) -> CorsLayer {
    let origins: Vec<HeaderValue> = origins
        .iter()
        .filter_map(|origin| match HeaderValue::from_str(origin) {
            Ok(value) => Some(value),
            Err(_) => {
                warn!(origin = %origin, "Ignoring invalid CORS origin");
                None
            }
        })
        .collect();

    CorsLayer::new()
        .allow_origin(AllowOrigin::list(origins))
        .allow_methods([Method::GET])
}

/// Assemble the router: `/api/*`, `/health`, and static assets outside production
pub fn build_app(server: &ServerConfig, state: AppState) -> Router {
    let mut app = Router::new()
        .nest("/api", api::router())
        .route("/health", get(api::health));

    if !server.is_production() {
        app = app.fallback_service(ServeDir::new(&server.static_dir));
    }

    app.layer(build_cors(&server.allowed_origins))
        .layer(TimeoutLayer::with_status_code(
            StatusCode::REQUEST_TIMEOUT,
            REQUEST_TIMEOUT,
        ))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

pub async fn run(config: &NeedCoffeeConfig) -> Result<()> {
    let state = AppState {
        maps_api_key: config.maps.api_key.clone(),
    };
    if state.maps_api_key.is_none() {
        warn!("GOOGLE_MAPS_API_KEY is not set; /api/config will return null");
    }
    let app = build_app(&config.server, state);
    let addr = config.server.bind_address();

    if let (Some(cert), Some(key)) = (&config.server.tls_cert_path, &config.server.tls_key_path) {
        return serve_tls(app, &addr, cert, key).await;
    }

    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Failed to bind {addr}"))?;
    info!("Web server running at http://{}", addr);
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("Web server failed")
}

#[cfg(feature = "tls")]
async fn serve_tls(app: Router, addr: &str, cert: &str, key: &str) -> Result<()> {
    use axum_server::Handle;
    use axum_server::tls_rustls::RustlsConfig;

    let socket_addr: std::net::SocketAddr = addr
        .parse()
        .with_context(|| format!("Invalid bind address {addr}"))?;
    let tls = RustlsConfig::from_pem_file(cert, key)
        .await
        .context("Failed to load TLS certificate or key")?;

    let handle = Handle::new();
    let shutdown = handle.clone();
    tokio::spawn(async move {
        shutdown_signal().await;
        shutdown.graceful_shutdown(Some(Duration::from_secs(10)));
    });

    info!("Web server running at https://{}", addr);
    axum_server::bind_rustls(socket_addr, tls)
        .handle(handle)
        .serve(app.into_make_service())
        .await
        .context("Web server failed")
}

#[cfg(not(feature = "tls"))]
async fn serve_tls(_app: Router, _addr: &str, _cert: &str, _key: &str) -> Result<()> {
    anyhow::bail!("TLS is configured but this build has the `tls` feature disabled")
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            warn!(error = %e, "Failed to listen for ctrl-c");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                warn!(error = %e, "Failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {},
        () = terminate => {},
    }

    info!("Received shutdown signal, starting graceful shutdown");
}
