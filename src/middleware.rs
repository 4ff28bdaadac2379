use std::time::Instant;

use axum::{extract::Request, middleware::Next, response::Response};
use tracing::{debug, info};

pub async fn log_request(req: Request, next: Next) -> Response {
    let method = req.method().clone();
    let uri = req.uri().clone();
    let started = Instant::now();

    let response = next.run(req).await;

    let status = response.status().as_u16();
    let elapsed_ms = started.elapsed().as_millis() as u64;

    // health checks would drown everything else
    if uri.path() == "/health" {
        debug!(method = %method, url = %uri, status, elapsed_ms, "HTTP request");
    } else {
        info!(method = %method, url = %uri, status, elapsed_ms, "HTTP request");
    }

    response
}
