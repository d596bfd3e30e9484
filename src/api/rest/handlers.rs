//! # REST Handlers
//!
//! Request handlers and response bodies for the HTTP surface.

use crate::application::error::ApplicationError;
use crate::application::services::quote_aggregation::QuoteAggregationEngine;
use crate::application::services::quote_cache::CacheStatus;
use crate::domain::entities::{Average, Quote, Slippage};
use crate::domain::value_objects::{SourceId, Timestamp};
use crate::infrastructure::sources::shared_client::HttpResource;
use axum::extract::State;
use axum::http::{StatusCode, Uri};
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;
use std::sync::Arc;

/// Shared handler state.
#[derive(Debug, Clone)]
pub struct AppState {
    /// Collection engine.
    pub engine: Arc<QuoteAggregationEngine>,
    /// Shared HTTP resource, reported by the health endpoint.
    pub resource: Arc<dyn HttpResource>,
}

impl AppState {
    /// Creates handler state.
    #[must_use]
    pub fn new(engine: Arc<QuoteAggregationEngine>, resource: Arc<dyn HttpResource>) -> Self {
        Self { engine, resource }
    }
}

/// Error body returned with every non-2xx response.
#[derive(Debug, Clone, Serialize)]
pub struct ErrorResponse {
    /// Short title.
    pub error: String,
    /// Human-readable detail.
    pub message: String,
    /// When the error was produced.
    pub timestamp: Timestamp,
}

impl ErrorResponse {
    /// Creates an error body stamped now.
    #[must_use]
    pub fn new(error: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            error: error.into(),
            message: message.into(),
            timestamp: Timestamp::now(),
        }
    }
}

/// An application error bound to the title of the endpoint that failed.
#[derive(Debug)]
pub struct ApiError {
    title: &'static str,
    source: ApplicationError,
}

impl ApiError {
    /// Wraps an error under the given title.
    #[must_use]
    pub fn new(title: &'static str, source: impl Into<ApplicationError>) -> Self {
        Self {
            title,
            source: source.into(),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        tracing::error!(error = %self.source, "{}", self.title);
        let body = ErrorResponse::new(self.title, self.source.to_string());
        (StatusCode::INTERNAL_SERVER_ERROR, Json(body)).into_response()
    }
}

/// One entry of the service description.
#[derive(Debug, Clone, Serialize)]
pub struct EndpointInfo {
    /// HTTP method.
    pub method: &'static str,
    /// Route path.
    pub path: &'static str,
    /// What the route returns.
    pub description: &'static str,
}

/// Body of `GET /`.
#[derive(Debug, Clone, Serialize)]
pub struct ServiceInfo {
    /// Service name.
    pub name: &'static str,
    /// Crate version.
    pub version: &'static str,
    /// One-line description.
    pub description: &'static str,
    /// Available routes.
    pub endpoints: Vec<EndpointInfo>,
}

/// Body of `GET /health`.
#[derive(Debug, Clone, Serialize)]
pub struct HealthResponse {
    /// Always `"ok"` while the process serves requests.
    pub status: &'static str,
    /// Configured source ids.
    pub sources: Vec<SourceId>,
    /// True if the shared HTTP client currently exists.
    pub client_active: bool,
    /// Cache state, when a cache is configured.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cache: Option<CacheStatus>,
    /// Response time.
    pub timestamp: Timestamp,
}

/// `GET /`
pub async fn service_info() -> Json<ServiceInfo> {
    Json(ServiceInfo {
        name: "fx-quotes",
        version: env!("CARGO_PKG_VERSION"),
        description: "USD/BRL quotes aggregated from several public sources",
        endpoints: vec![
            EndpointInfo {
                method: "GET",
                path: "/quotes",
                description: "Latest quote from every responding source",
            },
            EndpointInfo {
                method: "GET",
                path: "/average",
                description: "Average buy and sell price across sources",
            },
            EndpointInfo {
                method: "GET",
                path: "/slippage",
                description: "Each source's deviation from the average, in percent",
            },
            EndpointInfo {
                method: "GET",
                path: "/health",
                description: "Liveness and configured sources",
            },
        ],
    })
}

/// `GET /quotes`
///
/// # Errors
///
/// Returns 500 if no source produced a quote.
pub async fn get_quotes(State(state): State<AppState>) -> Result<Json<Vec<Quote>>, ApiError> {
    let collection = state
        .engine
        .collect()
        .await
        .map_err(|e| ApiError::new("Failed to fetch quotes", e))?;
    Ok(Json(collection.quotes))
}

/// `GET /average`
///
/// # Errors
///
/// Returns 500 if no source produced a quote.
pub async fn get_average(State(state): State<AppState>) -> Result<Json<Average>, ApiError> {
    let average = state
        .engine
        .collect_average()
        .await
        .map_err(|e| ApiError::new("Failed to calculate average", e))?;
    Ok(Json(average))
}

/// `GET /slippage`
///
/// # Errors
///
/// Returns 500 if no source produced a quote.
pub async fn get_slippage(State(state): State<AppState>) -> Result<Json<Vec<Slippage>>, ApiError> {
    let slippage = state
        .engine
        .collect_slippage()
        .await
        .map_err(|e| ApiError::new("Failed to calculate slippage", e))?;
    Ok(Json(slippage))
}

/// `GET /health`
pub async fn health(State(state): State<AppState>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok",
        sources: state.engine.source_ids(),
        client_active: state.resource.is_active(),
        cache: state.engine.cache_status(),
        timestamp: Timestamp::now(),
    })
}

/// Fallback for unmatched routes.
pub async fn not_found(uri: Uri) -> (StatusCode, Json<ErrorResponse>) {
    (
        StatusCode::NOT_FOUND,
        Json(ErrorResponse::new("Not Found", format!("Route {} not found", uri.path()))),
    )
}
