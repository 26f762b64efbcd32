use std::fmt;
use std::str::FromStr;

use sea_orm::sea_query::{ColumnType, OnConflict};
use sea_orm::{
    ActiveModelBehavior, ActiveModelTrait, ColumnTrait, Condition, ConnectionTrait, EntityTrait,
    IntoActiveModel, QueryFilter, Value as DbValue,
};
use serde::{Deserialize, Serialize};
use serde_json::{json, Map, Value};
use uuid::Uuid;

use crate::errors::ServiceError;

/// Closed set of collections the generic write path may touch. Unknown wire
/// names never reach the store.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Collection {
    Category,
    ServiceType,
    Component,
    Brand,
    VehicleModel,
    ServiceCenter,
    Address,
    OperatingHour,
    Slot,
    Offering,
}

impl Collection {
    pub fn parse(name: &str) -> Result<Self, ServiceError> {
        match name {
            "serviceCategory" => Ok(Collection::Category),
            "serviceType" => Ok(Collection::ServiceType),
            "serviceComponent" => Ok(Collection::Component),
            "brand" => Ok(Collection::Brand),
            "model" => Ok(Collection::VehicleModel),
            "serviceCenter" => Ok(Collection::ServiceCenter),
            "address" => Ok(Collection::Address),
            "operatingHours" => Ok(Collection::OperatingHour),
            "slot" => Ok(Collection::Slot),
            "serviceCenterOffering" => Ok(Collection::Offering),
            other => Err(ServiceError::UnknownCollection(other.to_string())),
        }
    }

    pub fn wire_name(self) -> &'static str {
        match self {
            Collection::Category => "serviceCategory",
            Collection::ServiceType => "serviceType",
            Collection::Component => "serviceComponent",
            Collection::Brand => "brand",
            Collection::VehicleModel => "model",
            Collection::ServiceCenter => "serviceCenter",
            Collection::Address => "address",
            Collection::OperatingHour => "operatingHours",
            Collection::Slot => "slot",
            Collection::Offering => "serviceCenterOffering",
        }
    }
}

impl fmt::Display for Collection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.wire_name())
    }
}

/// Resolve a collection to its ActiveModel type and run `$body` with it.
macro_rules! with_entity {
    ($collection:expr, $am:ident, $body:expr) => {
        match $collection {
            Collection::Category => {
                use models::category::ActiveModel as $am;
                $body
            }
            Collection::ServiceType => {
                use models::service_type::ActiveModel as $am;
                $body
            }
            Collection::Component => {
                use models::component::ActiveModel as $am;
                $body
            }
            Collection::Brand => {
                use models::brand::ActiveModel as $am;
                $body
            }
            Collection::VehicleModel => {
                use models::vehicle_model::ActiveModel as $am;
                $body
            }
            Collection::ServiceCenter => {
                use models::service_center::ActiveModel as $am;
                $body
            }
            Collection::Address => {
                use models::address::ActiveModel as $am;
                $body
            }
            Collection::OperatingHour => {
                use models::operating_hour::ActiveModel as $am;
                $body
            }
            Collection::Slot => {
                use models::slot::ActiveModel as $am;
                $body
            }
            Collection::Offering => {
                use models::offering::ActiveModel as $am;
                $body
            }
        }
    };
}

impl Collection {
    /// Insert one record built from `payload`; returns the created record.
    pub async fn insert<C: ConnectionTrait>(
        self,
        conn: &C,
        payload: Value,
    ) -> Result<Value, ServiceError> {
        with_entity!(self, A, insert_one::<A, C>(conn, payload).await)
    }

    /// Patch the first record matching `filter` with `payload`; returns the
    /// updated record. Not-found when nothing matches.
    pub async fn update<C: ConnectionTrait>(
        self,
        conn: &C,
        filter: &Map<String, Value>,
        payload: Value,
    ) -> Result<Value, ServiceError> {
        with_entity!(self, A, update_one::<A, C>(conn, filter, payload).await)
    }

    /// Remove all records matching `filter`; returns the removal count.
    /// Not-found when nothing matches.
    pub async fn delete<C: ConnectionTrait>(
        self,
        conn: &C,
        filter: &Map<String, Value>,
    ) -> Result<Value, ServiceError> {
        with_entity!(self, A, delete_where::<A, C>(conn, filter).await)
    }

    /// Bulk-insert `items`, silently skipping duplicate-key conflicts;
    /// returns the number of records actually inserted.
    pub async fn insert_many<C: ConnectionTrait>(
        self,
        conn: &C,
        items: Vec<Value>,
    ) -> Result<u64, ServiceError> {
        with_entity!(self, A, insert_many_skip_duplicates::<A, C>(conn, items).await)
    }
}

async fn insert_one<A, C>(conn: &C, payload: Value) -> Result<Value, ServiceError>
where
    C: ConnectionTrait,
    A: ActiveModelTrait + ActiveModelBehavior + Default + Send,
    <A::Entity as EntityTrait>::Model: IntoActiveModel<A> + Serialize,
    for<'de> <A::Entity as EntityTrait>::Model: Deserialize<'de>,
{
    let record = A::from_json(payload)?;
    let created = record.insert(conn).await?;
    to_json(&created)
}

async fn update_one<A, C>(
    conn: &C,
    filter: &Map<String, Value>,
    payload: Value,
) -> Result<Value, ServiceError>
where
    C: ConnectionTrait,
    A: ActiveModelTrait + ActiveModelBehavior + Default + Send,
    <A::Entity as EntityTrait>::Model: IntoActiveModel<A> + Serialize + Clone,
    for<'de> <A::Entity as EntityTrait>::Model: Deserialize<'de>,
    <A::Entity as EntityTrait>::Column: FromStr,
{
    if payload.as_object().map_or(true, |m| m.is_empty()) {
        return Err(ServiceError::Validation(
            "update payload must be a non-empty object".to_string(),
        ));
    }
    let condition = filter_condition::<A::Entity>(filter)?;
    let found = <A::Entity as EntityTrait>::find()
        .filter(condition)
        .one(conn)
        .await?
        .ok_or_else(|| {
            ServiceError::NotFound("no record matched the update filter".to_string())
        })?;
    let mut record: A = found.clone().into_active_model();
    record.set_from_json(payload)?;
    if !record.is_changed() {
        // nothing to write; echo the current record
        return to_json(&found);
    }
    let updated = record.update(conn).await?;
    to_json(&updated)
}

async fn delete_where<A, C>(conn: &C, filter: &Map<String, Value>) -> Result<Value, ServiceError>
where
    C: ConnectionTrait,
    A: ActiveModelTrait + Send,
    <A::Entity as EntityTrait>::Column: FromStr,
{
    let condition = filter_condition::<A::Entity>(filter)?;
    let result = <A::Entity as EntityTrait>::delete_many()
        .filter(condition)
        .exec(conn)
        .await?;
    if result.rows_affected == 0 {
        return Err(ServiceError::NotFound(
            "no record matched the delete filter".to_string(),
        ));
    }
    Ok(json!({ "count": result.rows_affected }))
}

async fn insert_many_skip_duplicates<A, C>(
    conn: &C,
    items: Vec<Value>,
) -> Result<u64, ServiceError>
where
    C: ConnectionTrait,
    A: ActiveModelTrait + ActiveModelBehavior + Default + Send,
    <A::Entity as EntityTrait>::Model: IntoActiveModel<A>,
    for<'de> <A::Entity as EntityTrait>::Model: Deserialize<'de>,
{
    let mut records = Vec::with_capacity(items.len());
    for item in items {
        records.push(A::from_json(item)?);
    }
    let inserted = <A::Entity as EntityTrait>::insert_many(records)
        .on_conflict(OnConflict::new().do_nothing().to_owned())
        .exec_without_returning(conn)
        .await?;
    Ok(inserted)
}

fn to_json<T: Serialize>(record: &T) -> Result<Value, ServiceError> {
    serde_json::to_value(record).map_err(|e| ServiceError::Db(e.to_string()))
}

/// Build an equality condition from a JSON filter map, converting each value
/// by the target column's type.
fn filter_condition<E>(filter: &Map<String, Value>) -> Result<Condition, ServiceError>
where
    E: EntityTrait,
    E::Column: FromStr,
{
    if filter.is_empty() {
        return Err(ServiceError::Validation("filter must not be empty".to_string()));
    }
    let mut condition = Condition::all();
    for (key, raw) in filter {
        let column = E::Column::from_str(key).map_err(|_| {
            ServiceError::Validation(format!("unknown filter column: {key}"))
        })?;
        let value = filter_value(key, column.def().get_column_type(), raw)?;
        condition = condition.add(column.eq(value));
    }
    Ok(condition)
}

fn filter_value(key: &str, ty: &ColumnType, raw: &Value) -> Result<DbValue, ServiceError> {
    if raw.is_null() {
        return Err(ServiceError::Validation(format!(
            "null filter values are not supported (column `{key}`)"
        )));
    }
    let mismatch = || {
        ServiceError::Validation(format!("filter value for column `{key}` has the wrong type"))
    };
    match ty {
        ColumnType::Uuid => {
            let s = raw.as_str().ok_or_else(mismatch)?;
            let id = Uuid::parse_str(s).map_err(|_| {
                ServiceError::Validation(format!("invalid uuid in filter column `{key}`"))
            })?;
            Ok(id.into())
        }
        ColumnType::String(_) | ColumnType::Text | ColumnType::Char(_) => {
            Ok(raw.as_str().ok_or_else(mismatch)?.to_string().into())
        }
        ColumnType::Integer
        | ColumnType::BigInteger
        | ColumnType::SmallInteger
        | ColumnType::TinyInteger => Ok(raw.as_i64().ok_or_else(mismatch)?.into()),
        ColumnType::Float | ColumnType::Double => {
            Ok(raw.as_f64().ok_or_else(mismatch)?.into())
        }
        ColumnType::Boolean => Ok(raw.as_bool().ok_or_else(mismatch)?.into()),
        ColumnType::TimestampWithTimeZone => {
            let s = raw.as_str().ok_or_else(mismatch)?;
            let ts = chrono::DateTime::parse_from_rfc3339(s).map_err(|_| {
                ServiceError::Validation(format!(
                    "invalid timestamp in filter column `{key}` (expected RFC 3339)"
                ))
            })?;
            Ok(ts.into())
        }
        ColumnType::Date => {
            let s = raw.as_str().ok_or_else(mismatch)?;
            let date = chrono::NaiveDate::parse_from_str(s, "%Y-%m-%d")
                .map_err(|_| ServiceError::Validation(format!("invalid date in filter column `{key}`")))?;
            Ok(date.into())
        }
        ColumnType::Time => {
            let s = raw.as_str().ok_or_else(mismatch)?;
            let time = chrono::NaiveTime::parse_from_str(s, "%H:%M:%S")
                .map_err(|_| ServiceError::Validation(format!("invalid time in filter column `{key}`")))?;
            Ok(time.into())
        }
        _ => Err(ServiceError::Validation(format!(
            "filtering on column `{key}` is not supported"
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn known_collections_resolve() {
        assert_eq!(Collection::parse("serviceCategory").unwrap(), Collection::Category);
        assert_eq!(Collection::parse("model").unwrap(), Collection::VehicleModel);
        assert_eq!(
            Collection::parse("serviceCenterOffering").unwrap(),
            Collection::Offering
        );
    }

    #[test]
    fn unknown_collection_is_a_typed_error() {
        match Collection::parse("user") {
            Err(ServiceError::UnknownCollection(name)) => assert_eq!(name, "user"),
            other => panic!("expected UnknownCollection, got {other:?}"),
        }
    }

    #[test]
    fn wire_names_round_trip() {
        for name in [
            "serviceCategory",
            "serviceType",
            "serviceComponent",
            "brand",
            "model",
            "serviceCenter",
            "address",
            "operatingHours",
            "slot",
            "serviceCenterOffering",
        ] {
            assert_eq!(Collection::parse(name).unwrap().wire_name(), name);
        }
    }

    #[test]
    fn filter_values_convert_by_column_type() {
        let id = Uuid::new_v4();
        let v = filter_value("id", &ColumnType::Uuid, &Value::String(id.to_string())).unwrap();
        assert_eq!(v, DbValue::from(id));

        let v = filter_value("is_popular", &ColumnType::Boolean, &Value::Bool(true)).unwrap();
        assert_eq!(v, DbValue::from(true));

        assert!(filter_value("id", &ColumnType::Uuid, &Value::String("nope".into())).is_err());
        assert!(filter_value("name", &ColumnType::Text, &Value::Bool(true)).is_err());
        assert!(filter_value("name", &ColumnType::Text, &Value::Null).is_err());
    }

    #[test]
    fn filter_condition_rejects_unknown_columns() {
        let mut filter = Map::new();
        filter.insert("no_such_column".to_string(), Value::String("x".into()));
        let res = filter_condition::<models::category::Entity>(&filter);
        assert!(matches!(res, Err(ServiceError::Validation(_))));
    }
}
