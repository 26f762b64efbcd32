/// Entity JSON payload behavior (no database required)
mod payload_tests {
    use sea_orm::{ActiveModelTrait, ActiveValue};
    use serde_json::json;

    use crate::{category, offering};

    #[test]
    fn partial_json_leaves_absent_fields_unset() {
        let am = category::ActiveModel::from_json(json!({
            "name": "Maintenance",
            "is_popular": true
        }))
        .expect("valid payload");

        assert_eq!(am.name, ActiveValue::Set("Maintenance".to_string()));
        assert_eq!(am.is_popular, ActiveValue::Set(true));
        assert!(matches!(am.id, ActiveValue::NotSet));
        assert!(matches!(am.created_at, ActiveValue::NotSet));
    }

    #[test]
    fn wrong_field_type_is_rejected() {
        let res = category::ActiveModel::from_json(json!({
            "name": "Maintenance",
            "display_order": "not-a-number"
        }));
        assert!(res.is_err());
    }

    #[test]
    fn json_columns_accept_structured_values() {
        let am = offering::ActiveModel::from_json(json!({
            "base_price": 49.5,
            "available_priorities": ["NORMAL", "EXPRESS"],
            "priority_prices": {"EXPRESS": 20.0}
        }))
        .expect("valid payload");

        assert_eq!(am.base_price, ActiveValue::Set(49.5));
        assert!(matches!(am.available_priorities, ActiveValue::Set(_)));
    }
}

/// Database round trips (requires Postgres; skipped via SKIP_DB_TESTS)
mod db_tests {
    use migration::MigratorTrait;
    use sea_orm::{ActiveModelTrait, EntityTrait, Set};
    use uuid::Uuid;

    use crate::{category, db};

    #[tokio::test]
    async fn insert_fills_database_defaults() -> anyhow::Result<()> {
        if std::env::var("SKIP_DB_TESTS").is_ok() {
            return Ok(());
        }

        let db = db::connect().await?;
        migration::Migrator::up(&db, None).await?;

        let name = format!("defaults_{}", Uuid::new_v4());
        let am = category::ActiveModel { name: Set(name.clone()), ..Default::default() };
        let created = am.insert(&db).await?;

        // id and timestamps come from column defaults
        assert!(!created.id.is_nil());
        assert!(!created.is_popular);

        let found = category::Entity::find_by_id(created.id).one(&db).await?;
        assert_eq!(found.map(|c| c.name), Some(name));

        category::Entity::delete_by_id(created.id).exec(&db).await?;
        Ok(())
    }
}
