//! Per-resource data access. Repositories turn typed requests into
//! parameterized statements and decode the rows that come back.

mod companies;
mod jobs;
mod users;

pub use companies::CompanyRepository;
pub use jobs::JobRepository;
pub use users::UserRepository;

use crate::database::manager::DatabaseError;
use crate::database::storage::Row;
use crate::query::FieldSet;
use crate::validation::Schema;

/// First row of a result, or `NotFound` carrying `message`.
fn first_or_not_found(rows: Vec<Row>, message: &str) -> Result<Row, DatabaseError> {
    rows.into_iter()
        .next()
        .ok_or_else(|| DatabaseError::NotFound(message.to_string()))
}

/// Rejects update fields outside the resource's allowlist.
fn ensure_columns(schema: &Schema, fields: &FieldSet) -> Result<(), DatabaseError> {
    schema.check_columns(fields).map_err(DatabaseError::InvalidInput)
}

/// Rewrites a unique violation into a message naming the duplicate key.
fn duplicate(err: DatabaseError, message: String) -> DatabaseError {
    match err {
        DatabaseError::Conflict(_) => DatabaseError::Conflict(message),
        other => other,
    }
}
