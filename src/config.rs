//! Configuration for the logging middleware
//!
//! Values are read once at startup and never change afterwards. Environment
//! parsing is fail-soft: an unreadable or out-of-range value falls back to
//! its default instead of aborting, so a bad deployment variable can never
//! keep the host application from starting.

use std::env;

/// Default sampling rate (log everything)
const DEFAULT_SAMPLE_RATE: f64 = 1.0;

/// Default slow-request threshold in seconds
const DEFAULT_LATENCY_THRESHOLD: f64 = 2.0;

/// Maximum size in bytes for logged body content
const MAX_BODY_SIZE: usize = 1024;

/// Middleware configuration
///
/// Loaded from environment variables:
/// - `LOG_SAMPLE_RATE`: probability in [0, 1] that an eligible request is logged (default 1.0)
/// - `LATENCY_THRESHOLD`: latency in seconds above which a 2xx/3xx response logs at WARNING (default 2.0)
///
/// The remaining fields are fixed constants mirroring the paths, content
/// types, and field names this middleware is expected to handle.
#[derive(Debug, Clone)]
pub struct Config {
    /// Paths that are never instrumented
    pub excluded_paths: Vec<String>,

    /// Content types whose response bodies are safe to capture
    pub loggable_content_types: Vec<String>,

    /// Probability in [0, 1] that an eligible request is logged
    pub sample_rate: f64,

    /// Latency in seconds above which a successful response logs at WARNING
    pub latency_threshold: f64,

    /// Maximum size in bytes for logged body content
    pub max_body_size: usize,

    /// Body field names to mask, stored lowercase
    pub sensitive_fields: Vec<String>,

    /// Host identifier included in every record's metadata
    pub hostname: String,

    /// Application version included in every record's metadata
    pub app_version: String,
}

impl Config {
    /// Load configuration from environment variables
    ///
    /// Unparseable values fall back to defaults; the sampling rate is
    /// clamped into [0, 1].
    pub fn from_env() -> Self {
        let sample_rate = env::var("LOG_SAMPLE_RATE")
            .ok()
            .and_then(|v| v.parse::<f64>().ok())
            .unwrap_or(DEFAULT_SAMPLE_RATE)
            .clamp(0.0, 1.0);

        let latency_threshold = env::var("LATENCY_THRESHOLD")
            .ok()
            .and_then(|v| v.parse::<f64>().ok())
            .unwrap_or(DEFAULT_LATENCY_THRESHOLD);

        Self {
            sample_rate,
            latency_threshold,
            ..Self::base()
        }
    }

    /// Fixed constants with default tunables, independent of the environment
    fn base() -> Self {
        Self {
            excluded_paths: vec!["/health".to_string(), "/favicon.ico".to_string()],
            loggable_content_types: vec![
                "application/json".to_string(),
                "text/plain".to_string(),
            ],
            sample_rate: DEFAULT_SAMPLE_RATE,
            latency_threshold: DEFAULT_LATENCY_THRESHOLD,
            max_body_size: MAX_BODY_SIZE,
            sensitive_fields: vec!["password".to_string(), "token".to_string()],
            hostname: crate::utils::hostname(),
            app_version: env!("CARGO_PKG_VERSION").to_string(),
        }
    }

    /// Create configuration with explicit tunables (useful for testing)
    pub fn new(sample_rate: f64, latency_threshold: f64) -> Self {
        Self {
            sample_rate: sample_rate.clamp(0.0, 1.0),
            latency_threshold,
            ..Self::base()
        }
    }

    /// Override the logged-body size limit
    pub fn with_max_body_size(mut self, max_body_size: usize) -> Self {
        self.max_body_size = max_body_size;
        self
    }

    /// Whether a request path is exempt from instrumentation
    pub fn is_excluded(&self, path: &str) -> bool {
        self.excluded_paths.iter().any(|p| p == path)
    }

    /// Whether a response content-type is safe to capture
    ///
    /// Substring match so parameterized types like
    /// `application/json; charset=utf-8` qualify.
    pub fn is_loggable_content_type(&self, content_type: &str) -> bool {
        self.loggable_content_types
            .iter()
            .any(|t| content_type.contains(t.as_str()))
    }

    /// Whether a body field name is sensitive (case-insensitive)
    pub fn is_sensitive_field(&self, name: &str) -> bool {
        let lower = name.to_lowercase();
        self.sensitive_fields.iter().any(|f| *f == lower)
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::from_env()
    }
}
