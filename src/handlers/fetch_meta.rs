//! `POST /api/fetch-meta`
//!
//! Request: `{ "url": "example.com" }`
//!
//! | Outcome                     | Status          | Body                                      |
//! |-----------------------------|-----------------|-------------------------------------------|
//! | extracted                   | 200             | `{ "success": true, "data": { ... } }`    |
//! | `url` missing or empty      | 400             | `{ "error": "URL is required" }`          |
//! | body is not valid JSON      | 400             | `{ "error": "<reason>" }`                 |
//! | input is not a URL          | 400             | `{ "error": "Invalid URL format" }`       |
//! | target answered non-2xx     | upstream status | `{ "error": "Failed to fetch URL: ..." }` |
//! | anything else               | 500             | `{ "error": "<message>" }`                |

use std::sync::Arc;
use std::time::Instant;

use axum::extract::rejection::JsonRejection;
use axum::extract::State;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::{Deserialize, Serialize};
use tracing::{info, instrument, warn};
use uuid::Uuid;

use crate::error::Error;
use crate::extraction::PageMetadata;
use crate::handlers::status::AppState;

/// Request body
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct FetchMetaRequest {
    /// Raw user input; a scheme is added when missing
    #[serde(default)]
    pub url: Option<String>,
}

/// Success body
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FetchMetaResponse {
    /// Always `true`
    pub success: bool,
    /// Extracted record
    pub data: PageMetadata,
}

/// Error body
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorResponse {
    /// Human-readable reason
    pub error: String,
}

fn error_response(status: StatusCode, message: impl Into<String>) -> Response {
    (
        status,
        Json(ErrorResponse {
            error: message.into(),
        }),
    )
        .into_response()
}

/// Map a pipeline error onto the API contract
fn pipeline_error_response(err: &Error) -> Response {
    match err {
        Error::InvalidUrl { .. } => error_response(StatusCode::BAD_REQUEST, "Invalid URL format"),
        Error::FetchFailed { .. } => {
            let status =
                StatusCode::from_u16(err.http_status()).unwrap_or(StatusCode::BAD_GATEWAY);
            error_response(status, err.to_string())
        }
        other => error_response(StatusCode::INTERNAL_SERVER_ERROR, other.to_string()),
    }
}

/// Fetch a page and return its metadata record
#[instrument(skip_all, fields(request_id = %Uuid::new_v4()))]
pub async fn fetch_meta_handler(
    State(state): State<Arc<AppState>>,
    body: Result<Json<FetchMetaRequest>, JsonRejection>,
) -> Response {
    let request = match body {
        Ok(Json(request)) => request,
        Err(rejection) => {
            warn!(error = %rejection.body_text(), "Rejected request body");
            state.record_invalid_request();
            return error_response(StatusCode::BAD_REQUEST, rejection.body_text());
        }
    };

    let url = match request.url.as_deref() {
        Some(url) if !url.is_empty() => url,
        _ => {
            state.record_invalid_request();
            return error_response(StatusCode::BAD_REQUEST, "URL is required");
        }
    };

    let started = Instant::now();
    let result = state.pipeline().extract_metadata(url).await;
    state.record_latency(started.elapsed());

    match result {
        Ok(data) => {
            state.record_page_checked();
            info!(
                url = %url,
                elapsed_ms = started.elapsed().as_millis() as u64,
                "Checked page"
            );
            (StatusCode::OK, Json(FetchMetaResponse { success: true, data })).into_response()
        }
        Err(err) => {
            if err.is_fetch_failure() {
                state.record_fetch_failure();
            } else {
                state.record_invalid_request();
            }
            warn!(url = %url, error = %err, "Check failed");
            pipeline_error_response(&err)
        }
    }
}
