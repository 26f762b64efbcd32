use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::routing::{patch, post};
use axum::{Json, Router};
use uuid::Uuid;

use common::types::ApiResponse;
use service::brand_service::{self, BrandInput, BrandPatch};
use service::vehicle_model_service::{self, VehicleModelInput, VehicleModelPatch};

use crate::errors::ApiError;
use crate::state::AppState;

pub fn brand_routes() -> Router<AppState> {
    Router::new()
        .route("/", post(create_brand))
        .route("/:id", patch(update_brand).delete(delete_brand))
}

pub fn model_routes() -> Router<AppState> {
    Router::new()
        .route("/", post(create_model))
        .route("/:id", patch(update_model).delete(delete_model))
}

async fn create_brand(
    State(state): State<AppState>,
    Json(input): Json<BrandInput>,
) -> Result<(StatusCode, Json<ApiResponse<models::brand::Model>>), ApiError> {
    let brand = brand_service::create_brand(&state.db, input).await.map_err(|e| state.api_err(e))?;
    Ok((StatusCode::CREATED, Json(ApiResponse::success(brand))))
}

async fn update_brand(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(patch): Json<BrandPatch>,
) -> Result<Json<ApiResponse<models::brand::Model>>, ApiError> {
    let brand =
        brand_service::update_brand(&state.db, id, patch).await.map_err(|e| state.api_err(e))?;
    Ok(Json(ApiResponse::success(brand)))
}

async fn delete_brand(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, ApiError> {
    brand_service::delete_brand(&state.db, id).await.map_err(|e| state.api_err(e))?;
    Ok(StatusCode::NO_CONTENT)
}

async fn create_model(
    State(state): State<AppState>,
    Json(input): Json<VehicleModelInput>,
) -> Result<(StatusCode, Json<ApiResponse<models::vehicle_model::Model>>), ApiError> {
    let model = vehicle_model_service::create_model(&state.db, input)
        .await
        .map_err(|e| state.api_err(e))?;
    Ok((StatusCode::CREATED, Json(ApiResponse::success(model))))
}

async fn update_model(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(patch): Json<VehicleModelPatch>,
) -> Result<Json<ApiResponse<models::vehicle_model::Model>>, ApiError> {
    let model = vehicle_model_service::update_model(&state.db, id, patch)
        .await
        .map_err(|e| state.api_err(e))?;
    Ok(Json(ApiResponse::success(model)))
}

async fn delete_model(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, ApiError> {
    vehicle_model_service::delete_model(&state.db, id).await.map_err(|e| state.api_err(e))?;
    Ok(StatusCode::NO_CONTENT)
}
