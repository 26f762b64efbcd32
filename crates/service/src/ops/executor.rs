use std::future::Future;
use std::pin::Pin;

use sea_orm::{
    ConnectionTrait, DatabaseConnection, DatabaseTransaction, TransactionError, TransactionTrait,
};
use serde_json::{json, Value};
use tracing::{error, warn};

use super::operation::{Action, OperationRequest};
use super::registry::Collection;
use crate::errors::ServiceError;

/// Execute one operation against any connection (plain connection or open
/// transaction). Collection and action resolution happens here, before the
/// store is touched for this operation.
pub async fn apply_operation<C: ConnectionTrait>(
    conn: &C,
    op: &OperationRequest,
) -> Result<Value, ServiceError> {
    let collection = Collection::parse(&op.model)?;
    match Action::parse(&op.action)? {
        Action::Create => collection.insert(conn, op.object_payload()?).await,
        Action::Update => {
            let filter = op.required_filter()?;
            collection.update(conn, filter, op.object_payload()?).await
        }
        Action::Delete => collection.delete(conn, op.required_filter()?).await,
        Action::CreateMany => {
            let count = collection.insert_many(conn, op.array_payload()?).await?;
            Ok(json!({ "count": count }))
        }
    }
}

/// Execute a batch of operations inside one transaction, in order, collecting
/// one result per operation. Any failure rolls the whole batch back; no
/// partial application is ever visible.
pub async fn execute_operations(
    db: &DatabaseConnection,
    operations: &[OperationRequest],
) -> Result<Vec<Value>, ServiceError> {
    if operations.is_empty() {
        return Err(ServiceError::Validation(
            "operations must be a non-empty array".to_string(),
        ));
    }

    let txn = db.begin().await.map_err(ServiceError::from)?;
    let mut results = Vec::with_capacity(operations.len());

    for (index, op) in operations.iter().enumerate() {
        match apply_operation(&txn, op).await {
            Ok(result) => results.push(result),
            Err(err) => {
                warn!(index, model = %op.model, action = %op.action, error = %err,
                    "batch operation failed, rolling back");
                if let Err(rollback_err) = txn.rollback().await {
                    error!(error = %rollback_err, "transaction rollback failed");
                }
                return Err(err);
            }
        }
    }

    txn.commit().await.map_err(ServiceError::from)?;
    Ok(results)
}

/// Run `body` inside a transaction, committing on `Ok` and rolling back on
/// `Err`.
pub async fn execute_transaction<F, T>(db: &DatabaseConnection, body: F) -> Result<T, ServiceError>
where
    F: for<'c> FnOnce(
            &'c DatabaseTransaction,
        ) -> Pin<Box<dyn Future<Output = Result<T, ServiceError>> + Send + 'c>>
        + Send,
    T: Send,
{
    db.transaction::<F, T, ServiceError>(body).await.map_err(|err| match err {
        TransactionError::Connection(db_err) => ServiceError::from(db_err),
        TransactionError::Transaction(service_err) => service_err,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::get_db;
    use migration::MigratorTrait;
    use sea_orm::{ColumnTrait, EntityTrait, QueryFilter};
    use serde_json::json;
    use uuid::Uuid;

    fn op(value: Value) -> OperationRequest {
        serde_json::from_value(value).expect("valid operation json")
    }

    #[tokio::test]
    async fn batch_failure_rolls_back_everything() -> anyhow::Result<()> {
        if std::env::var("SKIP_DB_TESTS").is_ok() {
            return Ok(());
        }
        let db = get_db().await?;
        migration::Migrator::up(&db, None).await?;

        let name = format!("atomicity_{}", Uuid::new_v4());
        let missing = Uuid::new_v4();
        let batch = [
            op(json!({
                "model": "serviceCategory",
                "action": "create",
                "data": {"name": name}
            })),
            op(json!({
                "model": "serviceCategory",
                "action": "update",
                "where": {"id": missing.to_string()},
                "data": {"is_popular": true}
            })),
        ];

        let err = execute_operations(&db, &batch).await.unwrap_err();
        assert!(matches!(err, ServiceError::NotFound(_)));

        // the create from the same batch must not be visible
        let found = models::category::Entity::find()
            .filter(models::category::Column::Name.eq(name))
            .one(&db)
            .await?;
        assert!(found.is_none());
        Ok(())
    }

    #[tokio::test]
    async fn later_operations_see_earlier_ones() -> anyhow::Result<()> {
        if std::env::var("SKIP_DB_TESTS").is_ok() {
            return Ok(());
        }
        let db = get_db().await?;
        migration::Migrator::up(&db, None).await?;

        let name = format!("dependent_{}", Uuid::new_v4());
        let batch = [
            op(json!({
                "model": "serviceCategory",
                "action": "create",
                "data": {"name": name}
            })),
            op(json!({
                "model": "serviceCategory",
                "action": "update",
                "where": {"name": name},
                "data": {"is_popular": true}
            })),
            op(json!({
                "model": "serviceCategory",
                "action": "delete",
                "where": {"name": name}
            })),
        ];

        let results = execute_operations(&db, &batch).await?;
        assert_eq!(results.len(), 3);
        assert_eq!(results[0]["name"], json!(name));
        assert_eq!(results[1]["is_popular"], json!(true));
        assert_eq!(results[2]["count"], json!(1));

        let found = models::category::Entity::find()
            .filter(models::category::Column::Name.eq(name))
            .one(&db)
            .await?;
        assert!(found.is_none());
        Ok(())
    }

    #[tokio::test]
    async fn create_many_skips_duplicates_and_reports_true_count() -> anyhow::Result<()> {
        if std::env::var("SKIP_DB_TESTS").is_ok() {
            return Ok(());
        }
        let db = get_db().await?;
        migration::Migrator::up(&db, None).await?;

        let existing = format!("dup_{}", Uuid::new_v4());
        let fresh = format!("fresh_{}", Uuid::new_v4());

        let seed = op(json!({
            "model": "serviceCategory",
            "action": "create",
            "data": {"name": existing}
        }));
        apply_operation(&db, &seed).await?;

        let batch = [op(json!({
            "model": "serviceCategory",
            "action": "createMany",
            "data": [{"name": existing}, {"name": fresh}]
        }))];
        let results = execute_operations(&db, &batch).await?;
        assert_eq!(results[0]["count"], json!(1));

        for name in [existing, fresh] {
            models::category::Entity::delete_many()
                .filter(models::category::Column::Name.eq(name))
                .exec(&db)
                .await?;
        }
        Ok(())
    }

    #[tokio::test]
    async fn unknown_collection_fails_before_any_store_access() {
        let db = match get_db_or_skip().await {
            Some(db) => db,
            None => return,
        };
        let batch = [op(json!({
            "model": "noSuchModel",
            "action": "create",
            "data": {"name": "x"}
        }))];
        let err = execute_operations(&db, &batch).await.unwrap_err();
        assert!(matches!(err, ServiceError::UnknownCollection(_)));
    }

    #[tokio::test]
    async fn unknown_action_is_rejected() {
        let db = match get_db_or_skip().await {
            Some(db) => db,
            None => return,
        };
        let batch = [op(json!({
            "model": "serviceCategory",
            "action": "upsert",
            "data": {"name": "x"}
        }))];
        let err = execute_operations(&db, &batch).await.unwrap_err();
        assert!(matches!(err, ServiceError::UnknownAction(_)));
    }

    async fn get_db_or_skip() -> Option<DatabaseConnection> {
        if std::env::var("SKIP_DB_TESTS").is_ok() {
            return None;
        }
        let db = get_db().await.ok()?;
        migration::Migrator::up(&db, None).await.ok()?;
        Some(db)
    }
}
