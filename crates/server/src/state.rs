use std::sync::Arc;

use sea_orm::DatabaseConnection;

use queue::QueueRelay;
use service::errors::ServiceError;
use service::pricing::ComponentCatalog;

use crate::errors::ApiError;

#[derive(Clone)]
pub struct AppState {
    pub db: DatabaseConnection,
    pub relay: Arc<QueueRelay>,
    pub catalog: Arc<ComponentCatalog>,
    /// Production mode hides internal error detail from responses.
    pub production: bool,
}

impl AppState {
    pub fn api_err(&self, err: ServiceError) -> ApiError {
        ApiError::from_service(err, self.production)
    }
}
