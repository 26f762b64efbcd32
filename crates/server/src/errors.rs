use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use tracing::error;

use queue::QueueError;
use service::errors::ServiceError;

/// HTTP-facing error: a status code plus the standard error envelope.
#[derive(Debug)]
pub struct ApiError {
    pub status: StatusCode,
    pub message: String,
}

impl ApiError {
    pub fn new(status: StatusCode, message: impl Into<String>) -> Self {
        Self { status, message: message.into() }
    }

    /// Map a service error onto a status code. Unexpected errors keep their
    /// detail in development mode only.
    pub fn from_service(err: ServiceError, production: bool) -> Self {
        let status = match &err {
            ServiceError::Validation(_)
            | ServiceError::UnknownCollection(_)
            | ServiceError::UnknownAction(_) => StatusCode::BAD_REQUEST,
            ServiceError::NotFound(_) => StatusCode::NOT_FOUND,
            ServiceError::Conflict(_) => StatusCode::CONFLICT,
            ServiceError::Dependency(_) => StatusCode::SERVICE_UNAVAILABLE,
            ServiceError::Db(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };
        if status == StatusCode::INTERNAL_SERVER_ERROR {
            error!(error = %err, "unexpected error handling request");
            if production {
                return Self::new(status, "Something went wrong!");
            }
        }
        Self::new(status, err.to_string())
    }

    /// Queue failures surface as dependency-unavailable to HTTP callers.
    pub fn from_queue(err: QueueError, production: bool) -> Self {
        error!(error = %err, "queue error handling request");
        let message = if production {
            "message queue is unavailable, please try again later".to_string()
        } else {
            err.to_string()
        };
        Self::new(StatusCode::SERVICE_UNAVAILABLE, message)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let body = serde_json::json!({
            "status": "error",
            "message": self.message,
        });
        (self.status, Json(body)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn service_errors_map_to_expected_statuses() {
        let cases = [
            (ServiceError::Validation("bad".into()), StatusCode::BAD_REQUEST),
            (ServiceError::UnknownCollection("user".into()), StatusCode::BAD_REQUEST),
            (ServiceError::UnknownAction("upsert".into()), StatusCode::BAD_REQUEST),
            (ServiceError::NotFound("gone".into()), StatusCode::NOT_FOUND),
            (ServiceError::Conflict("dup".into()), StatusCode::CONFLICT),
            (ServiceError::Dependency("down".into()), StatusCode::SERVICE_UNAVAILABLE),
            (ServiceError::Db("boom".into()), StatusCode::INTERNAL_SERVER_ERROR),
        ];
        for (err, status) in cases {
            assert_eq!(ApiError::from_service(err, false).status, status);
        }
    }

    #[test]
    fn production_mode_hides_internal_detail() {
        let err = ApiError::from_service(ServiceError::Db("secret detail".into()), true);
        assert_eq!(err.message, "Something went wrong!");

        let err = ApiError::from_service(ServiceError::Db("secret detail".into()), false);
        assert!(err.message.contains("secret detail"));
    }
}
