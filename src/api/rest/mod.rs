//! # REST API
//!
//! Thin axum surface over the aggregation engine.
//!
//! # Endpoints
//!
//! - `GET /` - Service description
//! - `GET /quotes` - Validated quote from every responding source
//! - `GET /average` - Cross-source average
//! - `GET /slippage` - Per-source deviation from the average
//! - `GET /health` - Liveness, configured sources and client state
//!
//! Failures answer 500 with `{error, message, timestamp}`; unknown routes
//! answer 404 with the same shape.
//!
//! # Usage
//!
//! ```ignore
//! use fx_quotes::api::rest::{create_router, AppState};
//!
//! let router = create_router(AppState::new(engine, resource));
//! let listener = tokio::net::TcpListener::bind("0.0.0.0:3000").await?;
//! axum::serve(listener, router).await?;
//! ```

pub mod handlers;
pub mod routes;

pub use handlers::{AppState, ErrorResponse, HealthResponse, ServiceInfo};
pub use routes::create_router;
