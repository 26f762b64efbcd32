use axum::extract::{Path, State};
use axum::http::{header, HeaderMap, StatusCode};
use axum::routing::{patch, post};
use axum::{Json, Router};
use uuid::Uuid;

use common::types::ApiResponse;
use service::address_service::{self, AddressInput, AddressPatch};
use service::center_service::{self, CenterInput, CenterPatch, OfferingInput, OfferingPatch};
use service::operating_hour_service::{self, OperatingHourInput, OperatingHourPatch};
use service::slot_service::{self, SlotInput, SlotPatch};

use crate::errors::ApiError;
use crate::state::AppState;

pub fn center_routes() -> Router<AppState> {
    Router::new()
        .route("/", post(create_center))
        .route("/:id", patch(update_center).delete(delete_center))
        .route("/:id/offerings", post(create_offering))
        .route("/:id/offerings/:offering_id", patch(update_offering))
}

pub fn address_routes() -> Router<AppState> {
    Router::new().route(
        "/:service_center_id",
        post(create_address).patch(update_address).delete(delete_address),
    )
}

pub fn operating_hour_routes() -> Router<AppState> {
    Router::new()
        .route("/", post(create_operating_hour))
        .route("/:id", patch(update_operating_hour).delete(delete_operating_hour))
}

pub fn slot_routes() -> Router<AppState> {
    Router::new()
        .route("/", post(create_slot))
        .route("/:id", patch(update_slot).delete(delete_slot))
}

async fn create_center(
    State(state): State<AppState>,
    Json(input): Json<CenterInput>,
) -> Result<(StatusCode, Json<ApiResponse<models::service_center::Model>>), ApiError> {
    let center =
        center_service::create_center(&state.db, input).await.map_err(|e| state.api_err(e))?;
    Ok((StatusCode::CREATED, Json(ApiResponse::success(center))))
}

async fn update_center(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(patch): Json<CenterPatch>,
) -> Result<Json<ApiResponse<models::service_center::Model>>, ApiError> {
    let center =
        center_service::update_center(&state.db, id, patch).await.map_err(|e| state.api_err(e))?;
    Ok(Json(ApiResponse::success(center)))
}

async fn delete_center(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, ApiError> {
    center_service::delete_center(&state.db, id).await.map_err(|e| state.api_err(e))?;
    Ok(StatusCode::NO_CONTENT)
}

async fn create_offering(
    State(state): State<AppState>,
    Path(service_center_id): Path<Uuid>,
    headers: HeaderMap,
    Json(input): Json<OfferingInput>,
) -> Result<(StatusCode, Json<ApiResponse<models::offering::Model>>), ApiError> {
    let auth = headers.get(header::AUTHORIZATION).and_then(|value| value.to_str().ok());
    let offering = center_service::create_center_offering(
        &state.db,
        &state.catalog,
        service_center_id,
        input,
        auth,
    )
    .await
    .map_err(|e| state.api_err(e))?;
    Ok((StatusCode::CREATED, Json(ApiResponse::success(offering))))
}

async fn update_offering(
    State(state): State<AppState>,
    Path((service_center_id, offering_id)): Path<(Uuid, Uuid)>,
    Json(patch): Json<OfferingPatch>,
) -> Result<Json<ApiResponse<models::offering::Model>>, ApiError> {
    let offering =
        center_service::update_center_offering(&state.db, service_center_id, offering_id, patch)
            .await
            .map_err(|e| state.api_err(e))?;
    Ok(Json(ApiResponse::success(offering)))
}

async fn create_address(
    State(state): State<AppState>,
    Path(service_center_id): Path<Uuid>,
    Json(input): Json<AddressInput>,
) -> Result<(StatusCode, Json<ApiResponse<models::address::Model>>), ApiError> {
    let address = address_service::create_address(&state.db, service_center_id, input)
        .await
        .map_err(|e| state.api_err(e))?;
    Ok((StatusCode::CREATED, Json(ApiResponse::success(address))))
}

async fn update_address(
    State(state): State<AppState>,
    Path(service_center_id): Path<Uuid>,
    Json(patch): Json<AddressPatch>,
) -> Result<Json<ApiResponse<models::address::Model>>, ApiError> {
    let address = address_service::update_address(&state.db, service_center_id, patch)
        .await
        .map_err(|e| state.api_err(e))?;
    Ok(Json(ApiResponse::success(address)))
}

async fn delete_address(
    State(state): State<AppState>,
    Path(service_center_id): Path<Uuid>,
) -> Result<StatusCode, ApiError> {
    address_service::delete_address(&state.db, service_center_id)
        .await
        .map_err(|e| state.api_err(e))?;
    Ok(StatusCode::NO_CONTENT)
}

async fn create_operating_hour(
    State(state): State<AppState>,
    Json(input): Json<OperatingHourInput>,
) -> Result<(StatusCode, Json<ApiResponse<models::operating_hour::Model>>), ApiError> {
    let hours = operating_hour_service::create_operating_hour(&state.db, input)
        .await
        .map_err(|e| state.api_err(e))?;
    Ok((StatusCode::CREATED, Json(ApiResponse::success(hours))))
}

async fn update_operating_hour(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(patch): Json<OperatingHourPatch>,
) -> Result<Json<ApiResponse<models::operating_hour::Model>>, ApiError> {
    let hours = operating_hour_service::update_operating_hour(&state.db, id, patch)
        .await
        .map_err(|e| state.api_err(e))?;
    Ok(Json(ApiResponse::success(hours)))
}

async fn delete_operating_hour(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, ApiError> {
    operating_hour_service::delete_operating_hour(&state.db, id)
        .await
        .map_err(|e| state.api_err(e))?;
    Ok(StatusCode::NO_CONTENT)
}

async fn create_slot(
    State(state): State<AppState>,
    Json(input): Json<SlotInput>,
) -> Result<(StatusCode, Json<ApiResponse<models::slot::Model>>), ApiError> {
    let slot = slot_service::create_slot(&state.db, input).await.map_err(|e| state.api_err(e))?;
    Ok((StatusCode::CREATED, Json(ApiResponse::success(slot))))
}

async fn update_slot(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(patch): Json<SlotPatch>,
) -> Result<Json<ApiResponse<models::slot::Model>>, ApiError> {
    let slot =
        slot_service::update_slot(&state.db, id, patch).await.map_err(|e| state.api_err(e))?;
    Ok(Json(ApiResponse::success(slot)))
}

async fn delete_slot(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, ApiError> {
    slot_service::delete_slot(&state.db, id).await.map_err(|e| state.api_err(e))?;
    Ok(StatusCode::NO_CONTENT)
}
