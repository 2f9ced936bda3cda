use std::sync::Arc;

use axum::middleware as axum_middleware;
use axum::routing::{get, post};
use axum::Router;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use super::handlers;
use super::middleware::metrics::metrics_middleware;
use super::state::AppState;

pub fn create_router(state: Arc<AppState>) -> Router {
    let exchange_routes = Router::new()
        .route("/orders", post(handlers::orders::place_order))
        .route("/orders/:id", axum::routing::delete(handlers::orders::cancel_order))
        .route("/orderbook/:symbol", get(handlers::orders::get_order_book))
        .route("/metrics", get(handlers::metrics::get_metrics))
        .route("/metrics/analysis", get(handlers::metrics::get_analysis))
        .route("/demo/load-test", post(handlers::demo::start_load_test))
        .route("/demo/chaos-test", post(handlers::demo::start_chaos_test))
        .route("/demo/status", get(handlers::demo::status))
        .route("/demo/stop", post(handlers::demo::stop))
        .route("/demo/results/load", get(handlers::demo::load_results))
        .route("/demo/results/chaos", get(handlers::demo::chaos_results));

    Router::new()
        .route("/health", get(handlers::health::health))
        .nest("/api/v1", exchange_routes)
        .layer(axum_middleware::from_fn(metrics_middleware))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}
