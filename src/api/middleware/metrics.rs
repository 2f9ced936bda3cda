//! HTTP metrics middleware: records Prometheus request count, duration, and
//! in-flight gauge for every request. Near-verbatim reuse of the teacher's
//! `api::middleware::metrics::metrics_middleware`, pointed at the
//! exchange's own `metrics::prometheus` module.

use axum::body::Body;
use axum::extract::MatchedPath;
use axum::http::Request;
use axum::middleware::Next;
use axum::response::Response;
use std::time::Instant;

use crate::metrics::prometheus;

pub async fn metrics_middleware(request: Request<Body>, next: Next) -> Response {
    let start = Instant::now();

    let method = request.method().to_string();
    let path = request
        .extensions()
        .get::<MatchedPath>()
        .map(|p| p.as_str().to_string())
        .unwrap_or_else(|| request.uri().path().to_string());

    prometheus::set_http_requests_in_flight(1);

    let response = next.run(request).await;

    let duration = start.elapsed().as_secs_f64();
    let status = response.status().as_u16();

    prometheus::record_http_request(&method, &path, status, duration);
    prometheus::set_http_requests_in_flight(-1);

    response
}
