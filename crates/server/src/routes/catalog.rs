use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::routing::{patch, post};
use axum::{Json, Router};
use uuid::Uuid;

use common::types::{ApiResponse, CountResponse};
use service::category_service::{self, CategoryInput, CategoryPatch};
use service::component_service::{self, ComponentInput, ComponentPatch};
use service::type_service::{self, ServiceTypeInput, ServiceTypePatch};

use crate::errors::ApiError;
use crate::state::AppState;

pub fn category_routes() -> Router<AppState> {
    Router::new()
        .route("/", post(create_category))
        .route("/bulk", post(bulk_create_categories))
        .route("/:id", patch(update_category).delete(delete_category))
}

pub fn type_routes() -> Router<AppState> {
    Router::new()
        .route("/", post(create_type))
        .route("/bulk", post(bulk_create_types))
        .route("/:id", patch(update_type).delete(delete_type))
}

pub fn component_routes() -> Router<AppState> {
    Router::new()
        .route("/", post(create_component))
        .route("/:id", patch(update_component).delete(delete_component))
}

async fn create_category(
    State(state): State<AppState>,
    Json(input): Json<CategoryInput>,
) -> Result<(StatusCode, Json<ApiResponse<models::category::Model>>), ApiError> {
    let category = category_service::create_category(&state.db, input)
        .await
        .map_err(|e| state.api_err(e))?;
    Ok((StatusCode::CREATED, Json(ApiResponse::success(category))))
}

async fn update_category(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(patch): Json<CategoryPatch>,
) -> Result<Json<ApiResponse<models::category::Model>>, ApiError> {
    let category = category_service::update_category(&state.db, id, patch)
        .await
        .map_err(|e| state.api_err(e))?;
    Ok(Json(ApiResponse::success(category)))
}

async fn delete_category(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, ApiError> {
    category_service::delete_category(&state.db, id).await.map_err(|e| state.api_err(e))?;
    Ok(StatusCode::NO_CONTENT)
}

async fn bulk_create_categories(
    State(state): State<AppState>,
    Json(inputs): Json<Vec<CategoryInput>>,
) -> Result<(StatusCode, Json<CountResponse>), ApiError> {
    let count = category_service::bulk_create_categories(&state.db, inputs)
        .await
        .map_err(|e| state.api_err(e))?;
    Ok((StatusCode::CREATED, Json(CountResponse::new(count))))
}

async fn create_type(
    State(state): State<AppState>,
    Json(input): Json<ServiceTypeInput>,
) -> Result<(StatusCode, Json<ApiResponse<models::service_type::Model>>), ApiError> {
    let service_type =
        type_service::create_type(&state.db, input).await.map_err(|e| state.api_err(e))?;
    Ok((StatusCode::CREATED, Json(ApiResponse::success(service_type))))
}

async fn update_type(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(patch): Json<ServiceTypePatch>,
) -> Result<Json<ApiResponse<models::service_type::Model>>, ApiError> {
    let service_type =
        type_service::update_type(&state.db, id, patch).await.map_err(|e| state.api_err(e))?;
    Ok(Json(ApiResponse::success(service_type)))
}

async fn delete_type(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, ApiError> {
    type_service::delete_type(&state.db, id).await.map_err(|e| state.api_err(e))?;
    Ok(StatusCode::NO_CONTENT)
}

async fn bulk_create_types(
    State(state): State<AppState>,
    Json(inputs): Json<Vec<ServiceTypeInput>>,
) -> Result<(StatusCode, Json<CountResponse>), ApiError> {
    let count =
        type_service::bulk_create_types(&state.db, inputs).await.map_err(|e| state.api_err(e))?;
    Ok((StatusCode::CREATED, Json(CountResponse::new(count))))
}

async fn create_component(
    State(state): State<AppState>,
    Json(input): Json<ComponentInput>,
) -> Result<(StatusCode, Json<ApiResponse<models::component::Model>>), ApiError> {
    let component = component_service::create_component(&state.db, input)
        .await
        .map_err(|e| state.api_err(e))?;
    Ok((StatusCode::CREATED, Json(ApiResponse::success(component))))
}

async fn update_component(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(patch): Json<ComponentPatch>,
) -> Result<Json<ApiResponse<models::component::Model>>, ApiError> {
    let component = component_service::update_component(&state.db, id, patch)
        .await
        .map_err(|e| state.api_err(e))?;
    Ok(Json(ApiResponse::success(component)))
}

async fn delete_component(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, ApiError> {
    component_service::delete_component(&state.db, id).await.map_err(|e| state.api_err(e))?;
    Ok(StatusCode::NO_CONTENT)
}
