//! End-to-end queue scenarios against a real database.
//!
//! Requires Postgres (DATABASE_URL); set SKIP_DB_TESTS to skip.

use std::sync::Arc;
use std::time::Duration;

use migration::MigratorTrait;
use sea_orm::{ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter};
use serde_json::json;
use tokio::time::timeout;
use uuid::Uuid;

use queue::consumer::start_consumers;
use queue::producer::{publish_bulk_operation, publish_write_operation};
use queue::{InMemoryBroker, QueueRelay, BULK_OPERATIONS_QUEUE, WRITE_OPERATIONS_QUEUE};

async fn setup() -> anyhow::Result<Option<(DatabaseConnection, InMemoryBroker, Arc<QueueRelay>)>> {
    if std::env::var("SKIP_DB_TESTS").is_ok() {
        return Ok(None);
    }
    let db = models::db::connect().await?;
    migration::Migrator::up(&db, None).await?;
    let broker = InMemoryBroker::new();
    let cfg = configs::QueueConfig { retry_delay_secs: 1, ..Default::default() };
    let relay = QueueRelay::new(Arc::new(broker.clone()), &cfg);
    Ok(Some((db, broker, relay)))
}

async fn wait_until_empty(broker: &InMemoryBroker, queue: &str) {
    timeout(Duration::from_secs(5), async {
        while broker.message_count(queue) > 0 {
            tokio::time::sleep(Duration::from_millis(10)).await;
        }
    })
    .await
    .expect("queue should drain");
}

#[tokio::test]
async fn write_message_creates_exactly_one_record_and_is_acked() -> anyhow::Result<()> {
    let Some((db, broker, relay)) = setup().await? else {
        return Ok(());
    };
    let handles = start_consumers(Arc::clone(&relay), db.clone());

    let name = format!("queued_{}", Uuid::new_v4());
    publish_write_operation(
        &relay,
        json!({
            "model": "serviceCategory",
            "action": "create",
            "payload": {"name": name}
        }),
    )
    .await?;

    wait_until_empty(&broker, WRITE_OPERATIONS_QUEUE).await;

    let matching = models::category::Entity::find()
        .filter(models::category::Column::Name.eq(name.clone()))
        .all(&db)
        .await?;
    assert_eq!(matching.len(), 1, "exactly one record must exist");

    models::category::Entity::delete_by_id(matching[0].id).exec(&db).await?;
    relay.close().await;
    for handle in handles {
        timeout(Duration::from_secs(2), handle).await??;
    }
    Ok(())
}

#[tokio::test]
async fn failed_bulk_transaction_rolls_back_and_is_not_redelivered() -> anyhow::Result<()> {
    let Some((db, broker, relay)) = setup().await? else {
        return Ok(());
    };
    let handles = start_consumers(Arc::clone(&relay), db.clone());

    let name = format!("queued_tx_{}", Uuid::new_v4());
    let missing = Uuid::new_v4();
    publish_bulk_operation(
        &relay,
        json!({
            "model": "serviceCategory",
            "action": "bulkTransaction",
            "payload": [
                {"model": "serviceCategory", "action": "create", "data": {"name": name}},
                {"model": "serviceCategory", "action": "update",
                 "where": {"id": missing.to_string()}, "data": {"is_popular": true}}
            ]
        }),
    )
    .await?;

    wait_until_empty(&broker, BULK_OPERATIONS_QUEUE).await;
    // give a would-be redelivery time to appear
    tokio::time::sleep(Duration::from_millis(100)).await;
    assert_eq!(broker.message_count(BULK_OPERATIONS_QUEUE), 0, "message must not requeue");

    let matching = models::category::Entity::find()
        .filter(models::category::Column::Name.eq(name))
        .all(&db)
        .await?;
    assert!(matching.is_empty(), "the whole transaction must roll back");

    relay.close().await;
    for handle in handles {
        timeout(Duration::from_secs(2), handle).await??;
    }
    Ok(())
}

#[tokio::test]
async fn bulk_create_many_skips_duplicates() -> anyhow::Result<()> {
    let Some((db, broker, relay)) = setup().await? else {
        return Ok(());
    };
    let handles = start_consumers(Arc::clone(&relay), db.clone());

    let name = format!("queued_dup_{}", Uuid::new_v4());
    publish_bulk_operation(
        &relay,
        json!({
            "model": "serviceCategory",
            "action": "createMany",
            "payload": [{"name": name}, {"name": name}]
        }),
    )
    .await?;

    wait_until_empty(&broker, BULK_OPERATIONS_QUEUE).await;

    let matching = models::category::Entity::find()
        .filter(models::category::Column::Name.eq(name))
        .all(&db)
        .await?;
    assert_eq!(matching.len(), 1, "duplicates inside the payload are skipped");

    models::category::Entity::delete_by_id(matching[0].id).exec(&db).await?;
    relay.close().await;
    for handle in handles {
        timeout(Duration::from_secs(2), handle).await??;
    }
    Ok(())
}
