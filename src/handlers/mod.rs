//! HTTP handlers
//!
//! - [`fetch_meta`]: `POST /api/fetch-meta`
//! - [`status`]: `/health`, `/ready`, `/status` and the shared [`AppState`]

pub mod fetch_meta;
pub mod status;

pub use fetch_meta::{fetch_meta_handler, ErrorResponse, FetchMetaRequest, FetchMetaResponse};
pub use status::{
    health_handler, readiness_handler, status_handler, status_router, AppState, HealthResponse,
    LatencyHistogram, LatencyMetrics, MemoryMetrics, StatusResponse, SERVER_NAME, SERVER_VERSION,
};
