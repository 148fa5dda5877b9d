pub mod company;
pub mod job;
pub mod user;

pub use company::{Company, CompanyDetail, CompanySummary, NewCompany};
pub use job::{Job, JobDetail, JobSummary, NewJob};
pub use user::{NewUser, User, UserCredentials, UserSummary};

use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::database::manager::DatabaseError;
use crate::database::storage::Row;

/// Decodes a storage row into a model.
pub fn from_row<T: DeserializeOwned>(row: Row) -> Result<T, DatabaseError> {
    serde_json::from_value(Value::Object(row)).map_err(|e| DatabaseError::Query(format!("Unexpected row shape: {}", e)))
}
