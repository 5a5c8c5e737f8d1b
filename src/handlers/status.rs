//! Status and health check handlers for the metatags-web server.
//!
//! - `/status` - server status with check counters and runtime metrics
//! - `/health` - liveness probe
//! - `/ready` - readiness probe
//!
//! # Architecture
//!
//! ```text
//! HTTP Request ──> Axum Router ──> status_handler ──> AppState
//!                                        │                │
//!                                        ▼                ▼
//!                              StatusResponse    LatencyHistogram
//!                                        │         + Counters
//!                                        ▼
//!                                   JSON Response
//! ```
//!
//! # Example Response
//!
//! ```json
//! {
//!   "version": "0.1.0",
//!   "name": "metatags-web",
//!   "uptime_seconds": 3600,
//!   "pages_checked": 1024,
//!   "fetch_failures": 12,
//!   "invalid_requests": 3,
//!   "memory": { "rss_bytes": 52428800, "virtual_bytes": 268435456 },
//!   "latency": { "p50_ms": 180.5, "p95_ms": 910.2, "p99_ms": 1400.7, ... },
//!   "status": "running",
//!   "timestamp": "2026-01-01T12:00:00+00:00"
//! }
//! ```

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};

use axum::extract::State;
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use hdrhistogram::Histogram;
use parking_lot::RwLock;
use serde::{Deserialize, Serialize};
use sysinfo::{Pid, ProcessesToUpdate, System};
use tracing::{debug, instrument};

use crate::error::{Error, Result};
use crate::pipeline::MetadataPipeline;

/// Server version from Cargo.toml
pub const SERVER_VERSION: &str = env!("CARGO_PKG_VERSION");

/// Server name from Cargo.toml
pub const SERVER_NAME: &str = env!("CARGO_PKG_NAME");

// ============================================================================
// Response Types
// ============================================================================

/// Health check response for liveness and readiness probes.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    /// Health status (always "healthy" if responding)
    pub status: String,
}

impl Default for HealthResponse {
    fn default() -> Self {
        Self {
            status: "healthy".to_string(),
        }
    }
}

/// Server status response with runtime metrics.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StatusResponse {
    /// Server version (from Cargo.toml)
    pub version: String,

    /// Server name
    pub name: String,

    /// Server uptime in seconds
    pub uptime_seconds: u64,

    /// Pages successfully checked
    pub pages_checked: u64,

    /// Checks whose target could not be fetched (network, non-2xx)
    pub fetch_failures: u64,

    /// Requests rejected before fetching (malformed body, missing or invalid URL)
    pub invalid_requests: u64,

    /// Memory usage metrics
    pub memory: MemoryMetrics,

    /// Check latency statistics (percentiles)
    pub latency: LatencyMetrics,

    /// Server status (always "running" if responding)
    pub status: String,

    /// RFC 3339 timestamp of when status was generated
    pub timestamp: String,
}

/// Memory usage metrics collected from sysinfo.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct MemoryMetrics {
    /// Resident Set Size (bytes)
    pub rss_bytes: u64,

    /// Virtual memory size (bytes)
    pub virtual_bytes: u64,
}

/// Latency percentile metrics.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LatencyMetrics {
    /// 50th percentile (median) latency in milliseconds
    pub p50_ms: f64,

    /// 95th percentile latency in milliseconds
    pub p95_ms: f64,

    /// 99th percentile latency in milliseconds
    pub p99_ms: f64,

    /// Number of recorded checks
    pub total_requests: u64,

    /// Mean latency in milliseconds
    pub mean_ms: f64,

    /// Maximum latency in milliseconds
    pub max_ms: f64,
}

// ============================================================================
// Latency Histogram
// ============================================================================

/// Thread-safe latency histogram.
///
/// Tracks latencies from 1 microsecond to 5 minutes with 3 significant
/// figures. Slow targets make multi-second checks normal.
#[derive(Debug)]
pub struct LatencyHistogram {
    inner: RwLock<Histogram<u64>>,
}

impl LatencyHistogram {
    /// Create an empty histogram
    pub fn new() -> Result<Self> {
        let histogram = Histogram::new_with_bounds(1, 300_000_000, 3)
            .map_err(|e| Error::Config(format!("Invalid latency histogram bounds: {e}")))?;
        Ok(Self {
            inner: RwLock::new(histogram),
        })
    }

    /// Record a latency value in microseconds.
    ///
    /// Values outside the histogram bounds are clamped.
    pub fn record(&self, latency_us: u64) {
        self.inner.write().saturating_record(latency_us.max(1));
    }

    /// Record a latency duration
    pub fn record_duration(&self, duration: Duration) {
        self.record(u64::try_from(duration.as_micros()).unwrap_or(u64::MAX));
    }

    /// Number of recorded values
    pub fn count(&self) -> u64 {
        self.inner.read().len()
    }

    /// Snapshot in milliseconds
    pub fn metrics(&self) -> LatencyMetrics {
        let hist = self.inner.read();
        LatencyMetrics {
            p50_ms: hist.value_at_percentile(50.0) as f64 / 1000.0,
            p95_ms: hist.value_at_percentile(95.0) as f64 / 1000.0,
            p99_ms: hist.value_at_percentile(99.0) as f64 / 1000.0,
            total_requests: hist.len(),
            mean_ms: hist.mean() / 1000.0,
            max_ms: hist.max() as f64 / 1000.0,
        }
    }
}

// ============================================================================
// Application State
// ============================================================================

/// Shared server state: the pipeline plus observability counters.
///
/// Counters are atomics and the histogram is behind a `RwLock`, so the state
/// is shared across handlers as `Arc<AppState>` without further locking.
///
/// ```rust,no_run
/// use std::sync::Arc;
/// use metatags_web::handlers::AppState;
/// use metatags_web::pipeline::MetadataPipeline;
///
/// let state = Arc::new(AppState::new(MetadataPipeline::new()?)?);
/// state.record_page_checked();
/// # Ok::<(), metatags_web::Error>(())
/// ```
#[derive(Debug)]
pub struct AppState {
    pipeline: MetadataPipeline,
    start_time: Instant,
    pages_checked: AtomicU64,
    fetch_failures: AtomicU64,
    invalid_requests: AtomicU64,
    latency_histogram: LatencyHistogram,
}

impl AppState {
    /// Create state around `pipeline`
    pub fn new(pipeline: MetadataPipeline) -> Result<Self> {
        Ok(Self {
            pipeline,
            start_time: Instant::now(),
            pages_checked: AtomicU64::new(0),
            fetch_failures: AtomicU64::new(0),
            invalid_requests: AtomicU64::new(0),
            latency_histogram: LatencyHistogram::new()?,
        })
    }

    /// The extraction pipeline
    #[inline]
    pub fn pipeline(&self) -> &MetadataPipeline {
        &self.pipeline
    }

    /// Server uptime in seconds
    #[inline]
    pub fn uptime_seconds(&self) -> u64 {
        self.start_time.elapsed().as_secs()
    }

    /// Count a successful check, returning the new total
    #[inline]
    pub fn record_page_checked(&self) -> u64 {
        self.pages_checked.fetch_add(1, Ordering::Relaxed) + 1
    }

    /// Successful checks so far
    #[inline]
    pub fn pages_checked(&self) -> u64 {
        self.pages_checked.load(Ordering::Relaxed)
    }

    /// Count a failed fetch, returning the new total
    #[inline]
    pub fn record_fetch_failure(&self) -> u64 {
        self.fetch_failures.fetch_add(1, Ordering::Relaxed) + 1
    }

    /// Failed fetches so far
    #[inline]
    pub fn fetch_failures(&self) -> u64 {
        self.fetch_failures.load(Ordering::Relaxed)
    }

    /// Count a request rejected before fetching, returning the new total
    #[inline]
    pub fn record_invalid_request(&self) -> u64 {
        self.invalid_requests.fetch_add(1, Ordering::Relaxed) + 1
    }

    /// Rejected requests so far
    #[inline]
    pub fn invalid_requests(&self) -> u64 {
        self.invalid_requests.load(Ordering::Relaxed)
    }

    /// Record the latency of one check
    #[inline]
    pub fn record_latency(&self, duration: Duration) {
        self.latency_histogram.record_duration(duration);
    }

    /// Latency snapshot
    #[inline]
    pub fn latency_metrics(&self) -> LatencyMetrics {
        self.latency_histogram.metrics()
    }
}

// ============================================================================
// System Metrics Collection
// ============================================================================

/// Memory usage of the current process; zeros if it cannot be read
fn collect_memory_metrics() -> MemoryMetrics {
    let pid = Pid::from_u32(std::process::id());
    let mut system = System::new();

    system.refresh_processes(ProcessesToUpdate::Some(&[pid]), true);

    match system.process(pid) {
        Some(process) => MemoryMetrics {
            rss_bytes: process.memory(),
            virtual_bytes: process.virtual_memory(),
        },
        None => {
            debug!("Could not find current process in sysinfo");
            MemoryMetrics::default()
        }
    }
}

// ============================================================================
// HTTP Handlers
// ============================================================================

/// `GET /health`
///
/// ```bash
/// curl http://localhost:3001/health
/// # {"status":"healthy"}
/// ```
#[instrument(skip_all)]
pub async fn health_handler() -> impl IntoResponse {
    debug!("Health check requested");
    (StatusCode::OK, Json(HealthResponse::default()))
}

/// `GET /status`
#[instrument(skip_all)]
pub async fn status_handler(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    debug!("Status check requested");

    let response = StatusResponse {
        version: SERVER_VERSION.to_string(),
        name: SERVER_NAME.to_string(),
        uptime_seconds: state.uptime_seconds(),
        pages_checked: state.pages_checked(),
        fetch_failures: state.fetch_failures(),
        invalid_requests: state.invalid_requests(),
        memory: collect_memory_metrics(),
        latency: state.latency_metrics(),
        status: "running".to_string(),
        timestamp: chrono::Utc::now().to_rfc3339(),
    };

    (StatusCode::OK, Json(response))
}

/// `GET /ready`
///
/// The pipeline holds no external connections, so readiness mirrors
/// liveness.
#[instrument(skip_all)]
pub async fn readiness_handler() -> impl IntoResponse {
    debug!("Readiness check requested");
    (StatusCode::OK, Json(HealthResponse::default()))
}

/// Router with `/health`, `/status` and `/ready`
pub fn status_router() -> axum::Router<Arc<AppState>> {
    use axum::routing::get;

    axum::Router::new()
        .route("/health", get(health_handler))
        .route("/status", get(status_handler))
        .route("/ready", get(readiness_handler))
}

// ============================================================================
// Tests
// ============================================================================
