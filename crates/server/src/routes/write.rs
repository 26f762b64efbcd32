//! Generic write relay: direct store dispatch through the collection
//! registry, atomic batches through the operation executor, and the
//! queue-publishing entry points.

use axum::extract::State;
use axum::http::StatusCode;
use axum::routing::post;
use axum::{Json, Router};
use serde::Deserialize;
use serde_json::{json, Map, Value};
use uuid::Uuid;

use common::types::{ApiResponse, CountResponse};
use queue::producer::{publish_bulk_operation, publish_write_operation};
use service::ops::{self, Action, Collection, OperationRequest};

use crate::errors::ApiError;
use crate::state::AppState;

pub fn write_routes() -> Router<AppState> {
    Router::new()
        .route("/create", post(create_item))
        .route("/update", post(update_item))
        .route("/delete", post(delete_item))
        .route("/bulk", post(bulk_create))
}

pub fn queue_routes() -> Router<AppState> {
    Router::new().route("/write", post(queue_write)).route("/bulk", post(queue_bulk))
}

#[derive(Debug, Deserialize)]
struct WriteItemBody {
    model: String,
    id: Option<Uuid>,
    data: Option<Value>,
}

fn id_filter(id: Uuid) -> Map<String, Value> {
    let mut filter = Map::new();
    filter.insert("id".to_string(), Value::String(id.to_string()));
    filter
}

async fn create_item(
    State(state): State<AppState>,
    Json(body): Json<WriteItemBody>,
) -> Result<(StatusCode, Json<ApiResponse<Value>>), ApiError> {
    let data = body
        .data
        .ok_or_else(|| ApiError::new(StatusCode::BAD_REQUEST, "model and data are required"))?;
    let op = OperationRequest {
        model: body.model,
        action: "create".to_string(),
        data: Some(data),
        filter: None,
    };
    let result = ops::apply_operation(&state.db, &op).await.map_err(|e| state.api_err(e))?;
    Ok((StatusCode::CREATED, Json(ApiResponse::success(result))))
}

async fn update_item(
    State(state): State<AppState>,
    Json(body): Json<WriteItemBody>,
) -> Result<Json<ApiResponse<Value>>, ApiError> {
    let (id, data) = match (body.id, body.data) {
        (Some(id), Some(data)) => (id, data),
        _ => {
            return Err(ApiError::new(
                StatusCode::BAD_REQUEST,
                "model, id, and data are required",
            ))
        }
    };
    let op = OperationRequest {
        model: body.model,
        action: "update".to_string(),
        data: Some(data),
        filter: Some(id_filter(id)),
    };
    let result = ops::apply_operation(&state.db, &op).await.map_err(|e| state.api_err(e))?;
    Ok(Json(ApiResponse::success(result)))
}

async fn delete_item(
    State(state): State<AppState>,
    Json(body): Json<WriteItemBody>,
) -> Result<StatusCode, ApiError> {
    let id = body
        .id
        .ok_or_else(|| ApiError::new(StatusCode::BAD_REQUEST, "model and id are required"))?;
    let op = OperationRequest {
        model: body.model,
        action: "delete".to_string(),
        data: None,
        filter: Some(id_filter(id)),
    };
    ops::apply_operation(&state.db, &op).await.map_err(|e| state.api_err(e))?;
    Ok(StatusCode::NO_CONTENT)
}

#[derive(Debug, Deserialize)]
struct BulkCreateBody {
    model: String,
    data: Vec<Value>,
}

async fn bulk_create(
    State(state): State<AppState>,
    Json(body): Json<BulkCreateBody>,
) -> Result<(StatusCode, Json<CountResponse>), ApiError> {
    if body.data.is_empty() {
        return Err(ApiError::new(
            StatusCode::BAD_REQUEST,
            "model and a non-empty array of data are required",
        ));
    }
    let collection = Collection::parse(&body.model).map_err(|e| state.api_err(e))?;
    let count =
        collection.insert_many(&state.db, body.data).await.map_err(|e| state.api_err(e))?;
    Ok((StatusCode::CREATED, Json(CountResponse::new(count))))
}

/// Execute a batch of operations as one atomic transaction.
pub async fn run_operations(
    State(state): State<AppState>,
    Json(operations): Json<Vec<OperationRequest>>,
) -> Result<Json<ApiResponse<Vec<Value>>>, ApiError> {
    let results =
        ops::execute_operations(&state.db, &operations).await.map_err(|e| state.api_err(e))?;
    Ok(Json(ApiResponse::success(results)))
}

/// Queue a single write operation. The shape is validated before publishing
/// so malformed requests fail here instead of being dropped by the consumer.
async fn queue_write(
    State(state): State<AppState>,
    Json(body): Json<Value>,
) -> Result<(StatusCode, Json<ApiResponse<Value>>), ApiError> {
    let op: OperationRequest = serde_json::from_value(body.clone()).map_err(|err| {
        ApiError::new(StatusCode::BAD_REQUEST, format!("invalid write operation: {err}"))
    })?;
    Collection::parse(&op.model).map_err(|e| state.api_err(e))?;
    match Action::parse(&op.action).map_err(|e| state.api_err(e))? {
        Action::Create | Action::Update | Action::Delete => {}
        Action::CreateMany => {
            return Err(ApiError::new(
                StatusCode::BAD_REQUEST,
                "createMany must go through the bulk queue",
            ))
        }
    }
    publish_write_operation(&state.relay, body)
        .await
        .map_err(|e| ApiError::from_queue(e, state.production))?;
    Ok((StatusCode::ACCEPTED, Json(ApiResponse::with_message("write operation queued", Value::Null))))
}

#[derive(Debug, Deserialize)]
struct QueueBulkBody {
    model: String,
    action: String,
    payload: Vec<Value>,
}

/// Queue a bulk operation (`createMany` or `bulkTransaction`).
async fn queue_bulk(
    State(state): State<AppState>,
    Json(body): Json<QueueBulkBody>,
) -> Result<(StatusCode, Json<ApiResponse<Value>>), ApiError> {
    Collection::parse(&body.model).map_err(|e| state.api_err(e))?;
    if body.payload.is_empty() {
        return Err(ApiError::new(StatusCode::BAD_REQUEST, "payload must be a non-empty array"));
    }
    if body.action != "createMany" && body.action != "bulkTransaction" {
        return Err(ApiError::new(
            StatusCode::BAD_REQUEST,
            format!("invalid bulk action: {}", body.action),
        ));
    }
    let data = json!({
        "model": body.model,
        "action": body.action,
        "payload": body.payload,
    });
    publish_bulk_operation(&state.relay, data)
        .await
        .map_err(|e| ApiError::from_queue(e, state.production))?;
    Ok((StatusCode::ACCEPTED, Json(ApiResponse::with_message("bulk operation queued", Value::Null))))
}
