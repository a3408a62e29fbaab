//! # LogScope Actix
//!
//! Observability middleware for Actix-Web: one structured, redacted JSON
//! record per sampled request/response pair, without changing request
//! handling behavior and without putting log I/O on the response path.
//!
//! Design principles:
//!
//! - **Non-blocking**: records are serialized and queued; a single worker
//!   task writes them to the sink in completion order
//! - **Non-intrusive**: status and headers pass through untouched, captured
//!   response bodies are replayed byte-identical to the client
//! - **Fail-safe**: capture failures become sentinel strings inside the
//!   record; a downstream failure becomes a generic 500 plus an ERROR log,
//!   and logging problems never affect request serving
//! - **Secure**: configured body fields and the authorization header are
//!   masked before anything reaches the sink
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use actix_web::{web, App, HttpResponse, HttpServer};
//! use logscope_actix::LogScopeMiddleware;
//!
//! #[actix_web::main]
//! async fn main() -> std::io::Result<()> {
//!     HttpServer::new(|| {
//!         App::new()
//!             .wrap(LogScopeMiddleware::new())
//!             .service(web::resource("/").to(|| async {
//!                 HttpResponse::Ok().body("Hello!")
//!             }))
//!     })
//!     .bind("0.0.0.0:8080")?
//!     .run()
//!     .await
//! }
//! ```
//!
//! ## Configuration
//!
//! Tunables are read once from the environment:
//!
//! - `LOG_SAMPLE_RATE`: probability in [0, 1] that an eligible request is
//!   logged (default 1.0)
//! - `LATENCY_THRESHOLD`: seconds above which a successful response logs at
//!   WARNING (default 2.0)
//!
//! Excluded paths (`/health`, `/favicon.ico`), loggable content types
//! (`application/json`, `text/plain`), masked fields (`password`, `token`),
//! and the 1024-byte body limit are fixed constants.
//!
//! ## How It Works
//!
//! 1. Every request receives a correlation id in its extensions, then the
//!    sampling gate decides whether this request is instrumented
//! 2. The request body is buffered once and replayed to handlers
//! 3. The downstream service runs under a failure boundary; a failure
//!    yields a synchronous ERROR log and a generic 500
//! 4. The response body is drained and replayed byte-identical while a
//!    size-limited copy goes into the record
//! 5. The record is classified (status and latency), counted into the
//!    periodic status summary, and queued for the sink worker
//!
//! ## Architecture
//!
//! - `middleware`: the Actix-Web hook orchestrating the request lifecycle
//! - `gate`: correlation context and the sampling/exclusion decision
//! - `request_capture` / `response_capture`: body buffering and replay
//! - `redact`: sensitive-field and header masking
//! - `severity`: status/latency classification
//! - `stats`: periodic status-code rollups
//! - `record`: the serialized log record types
//! - `dispatch`: single-worker queue in front of the log sink
//! - `config`: environment-based tunables and fixed constants
//! - `error`: capture failure reasons and their sentinel strings

pub mod config;
pub mod dispatch;
pub mod error;
pub mod gate;
pub mod middleware;
pub mod record;
pub mod redact;
pub mod request_capture;
pub mod response_capture;
pub mod severity;
pub mod stats;
pub mod utils;

// Re-export main components for easy access
pub use config::Config;
pub use dispatch::{Dispatcher, LogSink, TracingSink};
pub use error::CaptureError;
pub use gate::CorrelationContext;
pub use middleware::LogScopeMiddleware;
pub use record::LogRecord;
pub use severity::Severity;

/// Convenience prelude for importing common types
pub mod prelude {
    pub use crate::config::Config;
    pub use crate::dispatch::{LogSink, TracingSink};
    pub use crate::error::CaptureError;
    pub use crate::gate::CorrelationContext;
    pub use crate::middleware::LogScopeMiddleware;
    pub use crate::severity::Severity;
}
