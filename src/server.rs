use crate::adapters::HttpPageSource;
use crate::config::TomlConfig;
use crate::core::engine::{ScheduleEngine, ScheduleRequest};
use crate::core::pipeline::SchedulePipeline;
use crate::core::Pipeline;
use crate::utils::error::{AzbaError, Result};
use axum::{
    extract::{Query, State},
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    routing::get,
    Router,
};
use serde::Serialize;
use std::collections::HashMap;
use std::sync::Arc;
use tower_http::trace::TraceLayer;

pub const JSON_CONTENT_TYPE: &str = "application/json; charset=utf-8";

/// Query key carrying the zone filter.
pub const ZONE_PARAM: &str = "azba";

// Sent by indicator devices on every poll; only logged.
const DIAGNOSTIC_PARAMS: &[&str] = &["refresh_count", "attempt_count"];

struct ServerError(AzbaError);

impl IntoResponse for ServerError {
    fn into_response(self) -> Response {
        tracing::error!(
            kind = ?self.0.kind(),
            "❌ Schedule request failed: {}",
            self.0
        );
        let body = serde_json::json!({ "error": self.0.to_string() });
        json_response(StatusCode::INTERNAL_SERVER_ERROR, &body)
    }
}

impl From<AzbaError> for ServerError {
    fn from(err: AzbaError) -> Self {
        Self(err)
    }
}

fn json_response<T: Serialize>(status: StatusCode, body: &T) -> Response {
    match serde_json::to_string_pretty(body) {
        Ok(text) => (status, [(header::CONTENT_TYPE, JSON_CONTENT_TYPE)], text).into_response(),
        Err(e) => {
            tracing::error!("Failed to serialize response: {}", e);
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                [(header::CONTENT_TYPE, JSON_CONTENT_TYPE)],
                r#"{"error": "serialization failed"}"#,
            )
                .into_response()
        }
    }
}

async fn schedule<P: Pipeline + 'static>(
    State(engine): State<Arc<ScheduleEngine<P>>>,
    Query(params): Query<HashMap<String, String>>,
) -> std::result::Result<Response, ServerError> {
    let zone = params.get(ZONE_PARAM).map(String::as_str);

    let diagnostics: Vec<String> = DIAGNOSTIC_PARAMS
        .iter()
        .filter_map(|key| params.get(*key).map(|value| format!("{}={}", key, value)))
        .collect();
    if !diagnostics.is_empty() {
        tracing::info!(zone = ?zone, diagnostics = %diagnostics.join(" "), "indicator poll");
    }

    let request = ScheduleRequest::at_wall_clock(zone);
    let document = engine.run(&request).await?;
    Ok(json_response(StatusCode::OK, &document))
}

async fn healthz() -> &'static str {
    "ok"
}

pub fn router<P: Pipeline + 'static>(engine: Arc<ScheduleEngine<P>>) -> Router {
    Router::new()
        .route("/", get(schedule::<P>))
        .route("/azba.php", get(schedule::<P>))
        .route("/healthz", get(healthz))
        .layer(TraceLayer::new_for_http())
        .with_state(engine)
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::warn!("Failed to listen for shutdown signal: {}", e);
        std::future::pending::<()>().await;
    }
    tracing::info!("Shutdown signal received");
}

/// Serves the schedule API until interrupted.
pub async fn serve(config: &TomlConfig) -> Result<()> {
    let addr = config.bind_addr()?;
    let source = HttpPageSource::from_config(config)?;
    let engine = Arc::new(ScheduleEngine::new(SchedulePipeline::with_config(
        source, config,
    )));

    let listener = tokio::net::TcpListener::bind(addr).await?;
    tracing::info!("🚀 Schedule API listening on http://{}", addr);
    tracing::info!("📡 Source page: {}", config.source.url);

    axum::serve(listener, router(engine))
        .with_graceful_shutdown(shutdown_signal())
        .await?;
    Ok(())
}
