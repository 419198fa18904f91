use std::{
    net::{SocketAddr, ToSocketAddrs},
    sync::Arc,
};

use axum::{
    Json, Router,
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
};
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::{info, warn};
use wheel_protocol::{ControlValues, ErrorResponse};

pub mod mapping;
pub mod sampler;
pub mod telemetry;

use sampler::{GilrsSampler, WheelSampler};
use telemetry::{TelemetrySink, UdpTelemetrySink};

/// Fixed response message when no wheel was acquired.
pub const NO_DEVICE_MESSAGE: &str = "no input device attached";

#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub bind: String,
    pub telemetry_host: String,
    pub telemetry_port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind: "127.0.0.1:8787".to_string(),
            telemetry_host: "172.20.76.119".to_string(),
            telemetry_port: 5000,
        }
    }
}

#[derive(Clone)]
pub struct AppState {
    sampler: Arc<dyn WheelSampler>,
    telemetry: Arc<dyn TelemetrySink>,
}

impl AppState {
    pub fn new(sampler: Arc<dyn WheelSampler>, telemetry: Arc<dyn TelemetrySink>) -> Self {
        Self { sampler, telemetry }
    }
}

#[derive(Debug)]
struct ApiError {
    status: StatusCode,
    message: String,
}

impl ApiError {
    fn not_found(message: impl Into<String>) -> Self {
        Self {
            status: StatusCode::NOT_FOUND,
            message: message.into(),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (
            self.status,
            Json(ErrorResponse {
                error: self.message,
            }),
        )
            .into_response()
    }
}

pub async fn run_server(config: ServerConfig) -> Result<(), Box<dyn std::error::Error>> {
    let sampler = Arc::new(GilrsSampler::new()?);

    let destination: SocketAddr = (config.telemetry_host.as_str(), config.telemetry_port)
        .to_socket_addrs()?
        .next()
        .ok_or("telemetry destination did not resolve")?;
    let telemetry = Arc::new(UdpTelemetrySink::bind(destination)?);

    let state = AppState::new(sampler, telemetry);

    let addr: SocketAddr = config.bind.parse()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    info!("listening on {addr}, telemetry destination {destination}");
    axum::serve(listener, app(state)).await?;
    Ok(())
}

pub fn app(state: AppState) -> Router {
    Router::new()
        .route("/healthz", get(healthz))
        .route("/api/v1/controls", get(controls))
        .route("/api/v1/controls/send", post(send_controls))
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

async fn healthz() -> &'static str {
    "ok"
}

async fn controls(State(state): State<AppState>) -> Result<Json<ControlValues>, ApiError> {
    let raw = state
        .sampler
        .sample()
        .ok_or_else(|| ApiError::not_found(NO_DEVICE_MESSAGE))?;
    Ok(Json(mapping::map_state(&raw)))
}

async fn send_controls(State(state): State<AppState>) -> Result<Json<ControlValues>, ApiError> {
    let raw = state
        .sampler
        .sample()
        .ok_or_else(|| ApiError::not_found(NO_DEVICE_MESSAGE))?;
    let values = mapping::map_state(&raw);

    // Best effort: one attempt, the caller still gets the values.
    if let Err(err) = state.telemetry.forward(&values) {
        warn!("telemetry send failed: {err}");
    }

    Ok(Json(values))
}
