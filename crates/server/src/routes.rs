use axum::routing::{get, post};
use axum::{Json, Router};
use tower_http::cors::CorsLayer;
use tower_http::trace::{
    DefaultMakeSpan, DefaultOnFailure, DefaultOnRequest, DefaultOnResponse, TraceLayer,
};
use tracing::Level;

use common::types::Health;

use crate::state::AppState;

mod catalog;
mod centers;
mod vehicles;
mod write;

pub async fn health() -> Json<Health> {
    Json(Health { status: "ok" })
}

/// Build the full application router.
pub fn build_router(state: AppState, cors: CorsLayer) -> Router {
    let api = Router::new()
        .nest("/api/v1/categories", catalog::category_routes())
        .nest("/api/v1/types", catalog::type_routes())
        .nest("/api/v1/components", catalog::component_routes())
        .nest("/api/v1/brands", vehicles::brand_routes())
        .nest("/api/v1/models", vehicles::model_routes())
        .nest("/api/v1/service-centers", centers::center_routes())
        .nest("/api/v1/service-center-addresses", centers::address_routes())
        .nest("/api/v1/service-center-operating-hours", centers::operating_hour_routes())
        .nest("/api/v1/service-center-slot", centers::slot_routes())
        .nest("/api/v1/write", write::write_routes())
        .route("/api/v1/operations", post(write::run_operations))
        .nest("/api/v1/queue", write::queue_routes());

    Router::new()
        .route("/health", get(health))
        .merge(api)
        .with_state(state)
        .layer(cors)
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(DefaultMakeSpan::new().level(Level::INFO).include_headers(false))
                .on_request(DefaultOnRequest::new().level(Level::INFO))
                .on_response(DefaultOnResponse::new().level(Level::INFO).include_headers(false))
                .on_failure(DefaultOnFailure::new().level(Level::ERROR)),
        )
}
