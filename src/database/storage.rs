use async_trait::async_trait;
use chrono::{DateTime, NaiveDateTime, Utc};
use serde_json::{Map, Value};
use sqlx::{
    postgres::{PgArguments, PgRow},
    Column, PgPool, Row as _, TypeInfo,
};

use crate::database::manager::DatabaseError;
use crate::query::ParameterizedStatement;

/// One result row keyed by column name.
pub type Row = Map<String, Value>;

/// Executes one statement at a time. Implementations do not wrap statements
/// in transactions.
#[async_trait]
pub trait Storage: Send + Sync {
    async fn execute(&self, statement: &ParameterizedStatement) -> Result<Vec<Row>, DatabaseError>;

    async fn ping(&self) -> Result<(), DatabaseError>;
}

pub struct PgStorage {
    pool: PgPool,
}

impl PgStorage {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl Storage for PgStorage {
    async fn execute(&self, statement: &ParameterizedStatement) -> Result<Vec<Row>, DatabaseError> {
        debug_assert_eq!(statement.placeholder_count(), statement.params.len());

        let mut q = sqlx::query(&statement.query);
        for p in statement.params.iter() {
            q = bind_param(q, p);
        }
        let rows = q.fetch_all(&self.pool).await.map_err(DatabaseError::classify)?;
        Ok(rows.iter().map(row_to_map).collect())
    }

    async fn ping(&self) -> Result<(), DatabaseError> {
        sqlx::query("SELECT 1").execute(&self.pool).await?;
        Ok(())
    }
}

fn bind_param<'q>(
    q: sqlx::query::Query<'q, sqlx::Postgres, PgArguments>,
    v: &'q Value,
) -> sqlx::query::Query<'q, sqlx::Postgres, PgArguments> {
    match v {
        Value::Null => {
            let none: Option<String> = None;
            q.bind(none)
        }
        Value::Bool(b) => q.bind(*b),
        Value::Number(n) => {
            if let Some(i) = n.as_i64() {
                q.bind(i)
            } else if let Some(f) = n.as_f64() {
                q.bind(f)
            } else {
                q.bind(n.to_string())
            }
        }
        Value::String(s) => q.bind(s.as_str()),
        // Builders reject nested values; bind as JSON if one slips through.
        Value::Array(_) | Value::Object(_) => q.bind(v.clone()),
    }
}

/// Decodes each column by its Postgres type; unreadable values become null.
fn row_to_map(row: &PgRow) -> Row {
    let mut map = Map::new();
    for (i, column) in row.columns().iter().enumerate() {
        let value = match column.type_info().name() {
            "BOOL" => row.try_get::<Option<bool>, _>(i).ok().flatten().map(Value::Bool),
            "INT2" => row.try_get::<Option<i16>, _>(i).ok().flatten().map(Value::from),
            "INT4" => row.try_get::<Option<i32>, _>(i).ok().flatten().map(Value::from),
            "INT8" => row.try_get::<Option<i64>, _>(i).ok().flatten().map(Value::from),
            "FLOAT4" => row.try_get::<Option<f32>, _>(i).ok().flatten().map(|f| Value::from(f as f64)),
            "FLOAT8" => row.try_get::<Option<f64>, _>(i).ok().flatten().map(Value::from),
            "TIMESTAMPTZ" => row
                .try_get::<Option<DateTime<Utc>>, _>(i)
                .ok()
                .flatten()
                .map(|dt| Value::String(dt.to_rfc3339())),
            "TIMESTAMP" => row
                .try_get::<Option<NaiveDateTime>, _>(i)
                .ok()
                .flatten()
                .map(|dt| Value::String(dt.and_utc().to_rfc3339())),
            "JSON" | "JSONB" => row.try_get::<Option<Value>, _>(i).ok().flatten(),
            _ => row.try_get::<Option<String>, _>(i).ok().flatten().map(Value::String),
        };
        map.insert(column.name().to_string(), value.unwrap_or(Value::Null));
    }
    map
}
