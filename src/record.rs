//! Structured log record types
//!
//! A record is assembled once per logged request, serialized, and moved
//! into the dispatcher. Nothing mutates it after handoff.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Event type tag carried by all per-request records
pub const EVENT_TYPE: &str = "http_request";

/// Complete record for one logged request/response pair
#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct LogRecord {
    /// Always [`EVENT_TYPE`]
    pub event_type: String,

    /// Fractional seconds since the Unix epoch when the record was built
    pub event_timestamp: f64,

    /// Unique id joining all records for this request
    pub correlation_id: String,

    pub request: RequestInfo,
    pub response: ResponseInfo,
    pub metadata: Metadata,
}

/// Captured request side of a record
#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct RequestInfo {
    /// HTTP method (GET, POST, ...)
    pub method: String,

    /// Request path (e.g. /api/users)
    pub url: String,

    /// Request headers, authorization masked
    pub headers: HashMap<String, String>,

    /// Decoded query-string pairs
    pub query_params: HashMap<String, String>,

    /// Redacted, size-limited body content or a sentinel string
    pub body: String,
}

/// Captured response side of a record
#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct ResponseInfo {
    pub status_code: u16,

    /// Size-limited body text or a sentinel string
    pub content: String,

    /// Request handling time in seconds
    pub latency: f64,
}

/// Process and connection metadata
#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct Metadata {
    pub client_ip: Option<String>,
    pub hostname: String,
    pub app_version: String,
}

/// Record emitted synchronously when downstream processing fails
///
/// Kept deliberately small: the request is terminating abnormally and this
/// must be writable without the async dispatcher.
#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct ErrorRecord {
    pub event_type: String,
    pub event_timestamp: f64,
    pub correlation_id: String,

    /// Downstream failure message
    pub error: String,

    /// Captured backtrace at the failure boundary
    pub traceback: String,

    pub method: String,
    pub url: String,
    pub client_ip: Option<String>,
}
