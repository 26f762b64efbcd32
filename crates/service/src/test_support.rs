use sea_orm::DatabaseConnection;

pub async fn get_db() -> anyhow::Result<DatabaseConnection> {
    models::db::connect().await
}
