//! Correlation context and the sampling gate
//!
//! Every request receives a correlation context before any logging decision
//! is made, so downstream handlers can always read the correlation id even
//! when the request ends up not being instrumented.

use std::time::Instant;

use crate::config::Config;
use crate::utils::generate_correlation_id;

/// Per-request correlation state, stored in the request extensions
///
/// Created at middleware entry and dropped when the request completes.
#[derive(Debug, Clone)]
pub struct CorrelationContext {
    /// Unique id joining all log records for this request
    pub correlation_id: String,

    /// Wall-clock start of request handling
    pub started_at: Instant,
}

impl CorrelationContext {
    pub fn new() -> Self {
        Self {
            correlation_id: generate_correlation_id(),
            started_at: Instant::now(),
        }
    }

    /// Seconds elapsed since the request entered the middleware
    pub fn elapsed_secs(&self) -> f64 {
        self.started_at.elapsed().as_secs_f64()
    }
}

impl Default for CorrelationContext {
    fn default() -> Self {
        Self::new()
    }
}

/// Decide whether this request should produce a log record
///
/// A request is skipped when its path is excluded or it loses the sampling
/// draw. The decision is made once per request; skipped requests pass
/// through with no logging work at all.
pub fn should_instrument(config: &Config, path: &str) -> bool {
    if config.is_excluded(path) {
        return false;
    }
    sample_passes(config.sample_rate, rand::random::<f64>())
}

/// Deterministic core of the sampling decision
///
/// `draw` is uniform in [0, 1): a rate of 1.0 always passes and a rate of
/// 0.0 never does.
pub(crate) fn sample_passes(rate: f64, draw: f64) -> bool {
    draw < rate
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_context_ids_unique() {
        let a = CorrelationContext::new();
        let b = CorrelationContext::new();
        assert_ne!(a.correlation_id, b.correlation_id);
    }

    #[test]
    fn test_elapsed_monotonic() {
        let ctx = CorrelationContext::new();
        assert!(ctx.elapsed_secs() >= 0.0);
    }

    #[test]
    fn test_sample_rate_zero_never_passes() {
        for draw in [0.0, 0.001, 0.5, 0.999] {
            assert!(!sample_passes(0.0, draw));
        }
    }

    #[test]
    fn test_sample_rate_one_always_passes() {
        for draw in [0.0, 0.001, 0.5, 0.999] {
            assert!(sample_passes(1.0, draw));
        }
    }

    #[test]
    fn test_partial_rate() {
        assert!(sample_passes(0.5, 0.25));
        assert!(!sample_passes(0.5, 0.75));
    }

    #[test]
    fn test_excluded_path_never_instrumented() {
        let config = Config::new(1.0, 2.0);
        assert!(!should_instrument(&config, "/health"));
        assert!(!should_instrument(&config, "/favicon.ico"));
    }

    #[test]
    fn test_full_rate_instruments_everything_else() {
        let config = Config::new(1.0, 2.0);
        assert!(should_instrument(&config, "/api/users"));
    }

    #[test]
    fn test_zero_rate_instruments_nothing() {
        let config = Config::new(0.0, 2.0);
        for _ in 0..50 {
            assert!(!should_instrument(&config, "/api/users"));
        }
    }
}
