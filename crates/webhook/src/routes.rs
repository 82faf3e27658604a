use axum::{routing::get, Router};
use http::Method;
use tower::ServiceBuilder;
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::{handlers, state::AppState};

pub fn create_route(state: AppState) -> Router {
    Router::new()
        .route("/webhook", get(handlers::webhook::verify_webhook).post(handlers::webhook::receive_webhook))
        .route("/health", get(handlers::health::dashboard))
        .with_state(state)
        .layer(
            ServiceBuilder::new().layer(TraceLayer::new_for_http()).layer(
                CorsLayer::new().allow_origin(tower_http::cors::Any).allow_methods([Method::GET, Method::POST]),
            ),
        )
}
