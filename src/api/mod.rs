use axum::{Router, extract::State, response::Json, routing::get};
use serde::{Deserialize, Serialize};

/// Shared state for the API handlers
#[derive(Clone, Default)]
pub struct AppState {
    pub maps_api_key: Option<String>,
}

/// Configuration handed to the browser client
#[derive(Debug, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ClientConfig {
    pub google_maps_api_key: Option<String>,
}

#[derive(Debug, Serialize, Deserialize, PartialEq)]
pub struct HealthStatus {
    pub status: String,
}

/// Routes mounted under `/api`
pub fn router() -> Router<AppState> {
    Router::new().route("/config", get(get_config))
}

async fn get_config(State(state): State<AppState>) -> Json<ClientConfig> {
    tracing::debug!(
        key_configured = state.maps_api_key.is_some(),
        "Serving client config"
    );
    Json(ClientConfig {
        google_maps_api_key: state.maps_api_key,
    })
}

pub async fn health() -> Json<HealthStatus> {
    Json(HealthStatus {
        status: "ok".to_string(),
    })
}
