//! Basic usage example for the LogScope middleware
//!
//! Run with:
//! ```bash
//! LOG_SAMPLE_RATE=1.0 LATENCY_THRESHOLD=2.0 cargo run --example basic_usage
//! ```

use actix_web::{web, App, HttpRequest, HttpResponse, HttpServer};
use actix_web::HttpMessage;
use logscope_actix::{CorrelationContext, LogScopeMiddleware};

async fn index() -> HttpResponse {
    HttpResponse::Ok().json(serde_json::json!({"message": "Hello LogScope!"}))
}

/// Excluded path: served normally but never logged
async fn health() -> HttpResponse {
    HttpResponse::Ok().json(serde_json::json!({
        "status": "healthy",
        "service": "example-app"
    }))
}

/// Shows that handlers can read the correlation id even for skipped requests
async fn whoami(req: HttpRequest) -> HttpResponse {
    let correlation_id = req
        .extensions()
        .get::<CorrelationContext>()
        .map(|ctx| ctx.correlation_id.clone())
        .unwrap_or_default();
    HttpResponse::Ok().json(serde_json::json!({"correlation_id": correlation_id}))
}

async fn echo(body: String) -> HttpResponse {
    HttpResponse::Ok().content_type("application/json").body(body)
}

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .init();

    println!("Starting example server on http://0.0.0.0:8080");
    println!("\nTry these endpoints:");
    println!("  GET  http://localhost:8080/");
    println!("  GET  http://localhost:8080/health   (excluded from logging)");
    println!("  GET  http://localhost:8080/whoami");
    println!("  POST http://localhost:8080/echo     (try a JSON body with a \"password\" field)");

    // One middleware instance shared by all server workers: a single
    // dispatcher queue and one set of status counters.
    let middleware = LogScopeMiddleware::new();

    HttpServer::new(move || {
        App::new()
            .wrap(middleware.clone())
            .service(web::resource("/").route(web::get().to(index)))
            .service(web::resource("/health").route(web::get().to(health)))
            .service(web::resource("/whoami").route(web::get().to(whoami)))
            .service(web::resource("/echo").route(web::post().to(echo)))
    })
    .bind("0.0.0.0:8080")?
    .run()
    .await
}
