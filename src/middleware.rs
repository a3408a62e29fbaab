//! Actix-Web middleware implementation
//!
//! Wires the gate, capture units, classifier, aggregator, and dispatcher
//! into the per-request hook. The middleware never changes what the client
//! receives: headers and status pass through untouched, and a captured body
//! is replayed byte-identical. The only response it substitutes is a generic
//! 500 when the downstream service itself fails.

use actix_web::{
    body::{BoxBody, MessageBody},
    dev::{forward_ready, Service, ServiceRequest, ServiceResponse, Transform},
    http::StatusCode,
    Error, HttpMessage, HttpResponse, ResponseError,
};
use futures::future::{ok, LocalBoxFuture, Ready};
use std::backtrace::Backtrace;
use std::collections::HashMap;
use std::fmt;
use std::rc::Rc;
use std::sync::Arc;

use crate::config::Config;
use crate::dispatch::{Dispatcher, LogSink, TracingSink};
use crate::gate::{self, CorrelationContext};
use crate::record::{ErrorRecord, LogRecord, Metadata, RequestInfo, ResponseInfo, EVENT_TYPE};
use crate::redact::mask_header_value;
use crate::request_capture;
use crate::response_capture;
use crate::severity::{classify, Severity};
use crate::stats::StatusAggregator;
use crate::utils::{epoch_timestamp, extract_ip};

/// Error returned when the downstream service fails
///
/// Renders as a detail-free 500; everything diagnostic lives only in the
/// synchronously emitted error record.
#[derive(Debug)]
struct DownstreamFailure;

impl fmt::Display for DownstreamFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Internal Server Error")
    }
}

impl ResponseError for DownstreamFailure {
    fn status_code(&self) -> StatusCode {
        StatusCode::INTERNAL_SERVER_ERROR
    }

    fn error_response(&self) -> HttpResponse {
        HttpResponse::InternalServerError()
            .json(serde_json::json!({"detail": "Internal Server Error"}))
    }
}

/// Request/response logging middleware
///
/// Add it to an Actix app via `.wrap()`:
///
/// ```rust,no_run
/// use actix_web::App;
/// use logscope_actix::LogScopeMiddleware;
///
/// App::new().wrap(LogScopeMiddleware::new());
/// ```
///
/// Clones share one dispatcher worker and one set of status counters, so a
/// single instance can be created up front and cloned into every server
/// worker. Construction spawns the dispatcher task and therefore must
/// happen inside a tokio runtime (the Actix app factory qualifies).
pub struct LogScopeMiddleware {
    inner: Arc<Inner>,
}

struct Inner {
    config: Config,
    dispatcher: Dispatcher,
    stats: StatusAggregator,
}

impl LogScopeMiddleware {
    /// Environment-driven configuration, `tracing` sink
    pub fn new() -> Self {
        Self::with_config(Config::from_env())
    }

    /// Explicit configuration, `tracing` sink
    pub fn with_config(config: Config) -> Self {
        Self::with_sink(config, Arc::new(TracingSink))
    }

    /// Explicit configuration and sink (useful for testing)
    pub fn with_sink(config: Config, sink: Arc<dyn LogSink>) -> Self {
        Self {
            inner: Arc::new(Inner {
                config,
                dispatcher: Dispatcher::new(sink),
                stats: StatusAggregator::new(),
            }),
        }
    }
}

impl Clone for LogScopeMiddleware {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl Default for LogScopeMiddleware {
    fn default() -> Self {
        Self::new()
    }
}

impl<S, B> Transform<S, ServiceRequest> for LogScopeMiddleware
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: MessageBody + 'static,
{
    type Response = ServiceResponse<BoxBody>;
    type Error = Error;
    type InitError = ();
    type Transform = LogScopeService<S>;
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ok(LogScopeService {
            service: Rc::new(service),
            inner: Arc::clone(&self.inner),
        })
    }
}

/// The per-request service wrapping the downstream app
pub struct LogScopeService<S> {
    service: Rc<S>,
    inner: Arc<Inner>,
}

impl<S, B> Service<ServiceRequest> for LogScopeService<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: MessageBody + 'static,
{
    type Response = ServiceResponse<BoxBody>;
    type Error = Error;
    type Future = LocalBoxFuture<'static, Result<Self::Response, Self::Error>>;

    forward_ready!(service);

    fn call(&self, mut req: ServiceRequest) -> Self::Future {
        let service = Rc::clone(&self.service);
        let inner = Arc::clone(&self.inner);

        Box::pin(async move {
            // Every request gets a correlation context, even when logging
            // is skipped, so handlers can always read the id.
            let ctx = CorrelationContext::new();
            req.extensions_mut().insert(ctx.clone());

            if !gate::should_instrument(&inner.config, req.path()) {
                let res = service.call(req).await?;
                return Ok(res.map_into_boxed_body());
            }

            let method = req.method().to_string();
            let path = req.path().to_string();
            let query_params: HashMap<String, String> =
                serde_urlencoded::from_str(req.query_string()).unwrap_or_default();
            let headers = redacted_headers(&req);
            let peer_addr = req.peer_addr().map(|addr| addr.ip().to_string());
            let client_ip = extract_ip(&headers, peer_addr.as_deref());

            let body_bytes = request_capture::buffer_and_restore(&mut req)
                .await
                .unwrap_or_default();

            let res = match service.call(req).await {
                Ok(res) => res,
                Err(err) => {
                    // Downstream failed: log synchronously, then surface a
                    // substitute error whose rendering is a detail-free 500.
                    let record = ErrorRecord {
                        event_type: EVENT_TYPE.to_string(),
                        event_timestamp: epoch_timestamp(),
                        correlation_id: ctx.correlation_id.clone(),
                        error: err.to_string(),
                        traceback: Backtrace::force_capture().to_string(),
                        method,
                        url: path,
                        client_ip,
                    };
                    if let Ok(message) = serde_json::to_string(&record) {
                        inner.dispatcher.emit_sync(Severity::Error, &message);
                    }

                    return Err(DownstreamFailure.into());
                }
            };

            let latency = ctx.elapsed_secs();

            let body = request_capture::render_body(&inner.config, &body_bytes)
                .unwrap_or_else(|e| e.sentinel().to_string());

            let (res, captured) = response_capture::capture_response(&inner.config, res).await;
            let content = captured.unwrap_or_else(|e| e.sentinel().to_string());
            let status = res.status().as_u16();

            let severity = classify(status, latency, inner.config.latency_threshold);

            if let Some(summary) = inner.stats.record(status) {
                if let Ok(message) = serde_json::to_string(&summary) {
                    inner.dispatcher.submit(Severity::Info, message);
                }
            }

            let record = LogRecord {
                event_type: EVENT_TYPE.to_string(),
                event_timestamp: epoch_timestamp(),
                correlation_id: ctx.correlation_id,
                request: RequestInfo {
                    method,
                    url: path,
                    headers,
                    query_params,
                    body,
                },
                response: ResponseInfo {
                    status_code: status,
                    content,
                    latency,
                },
                metadata: Metadata {
                    client_ip,
                    hostname: inner.config.hostname.clone(),
                    app_version: inner.config.app_version.clone(),
                },
            };
            if let Ok(message) = serde_json::to_string(&record) {
                inner.dispatcher.submit(severity, message);
            }

            Ok(res)
        })
    }
}

/// Lowercased request headers with the authorization value masked
fn redacted_headers(req: &ServiceRequest) -> HashMap<String, String> {
    let mut headers = HashMap::new();
    for (name, value) in req.headers() {
        let name = name.as_str().to_lowercase();
        if let Ok(value) = value.to_str() {
            let value = mask_header_value(&name, value);
            headers.insert(name, value);
        }
    }
    headers
}
