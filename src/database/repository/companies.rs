use std::sync::Arc;

use serde_json::json;
use tracing::debug;

use super::{duplicate, ensure_columns, first_or_not_found};
use crate::database::manager::DatabaseError;
use crate::database::models::{from_row, Company, CompanyDetail, CompanySummary, JobSummary, NewCompany};
use crate::database::storage::Storage;
use crate::query::{partial_update, FieldSet, Filter, ParameterizedStatement, Resource};
use crate::validation::schemas::COMPANY_UPDATE;

const NOT_FOUND: &str = "Company does not exist";
const COLUMNS: &str = "handle, name, num_employees, description, logo_url";

pub struct CompanyRepository {
    storage: Arc<dyn Storage>,
}

impl CompanyRepository {
    pub fn new(storage: Arc<dyn Storage>) -> Self {
        Self { storage }
    }

    pub async fn list(&self, filters: &FieldSet) -> Result<Vec<CompanySummary>, DatabaseError> {
        let statement = Filter::build(Resource::Companies, filters)?;
        let rows = self.storage.execute(&statement).await?;
        rows.into_iter().map(from_row).collect()
    }

    pub async fn create(&self, company: NewCompany) -> Result<Company, DatabaseError> {
        let statement = ParameterizedStatement::new(
            format!(
                "INSERT INTO companies ({cols}) VALUES ($1, $2, $3::INTEGER, $4, $5) RETURNING {cols}",
                cols = COLUMNS
            ),
            vec![
                json!(company.handle),
                json!(company.name),
                json!(company.num_employees),
                json!(company.description),
                json!(company.logo_url),
            ],
        );
        let rows = self
            .storage
            .execute(&statement)
            .await
            .map_err(|e| duplicate(e, format!("Duplicate company: {}", company.handle)))?;
        debug!("Created company {}", company.handle);
        from_row(first_or_not_found(rows, NOT_FOUND)?)
    }

    /// The company plus its postings ordered by title.
    pub async fn get(&self, handle: &str) -> Result<CompanyDetail, DatabaseError> {
        let statement = ParameterizedStatement::new(
            format!("SELECT {} FROM companies WHERE handle = $1", COLUMNS),
            vec![json!(handle)],
        );
        let company: Company = from_row(first_or_not_found(self.storage.execute(&statement).await?, NOT_FOUND)?)?;

        let statement = ParameterizedStatement::new(
            "SELECT id, title, company_handle FROM jobs WHERE company_handle = $1 ORDER BY title",
            vec![json!(handle)],
        );
        let jobs = self
            .storage
            .execute(&statement)
            .await?
            .into_iter()
            .map(from_row::<JobSummary>)
            .collect::<Result<Vec<_>, _>>()?;

        Ok(CompanyDetail { company, jobs })
    }

    pub async fn update(&self, handle: &str, fields: &FieldSet) -> Result<Company, DatabaseError> {
        ensure_columns(&COMPANY_UPDATE, fields)?;
        let statement = partial_update("companies", fields, "handle", handle)?;
        let rows = self.storage.execute(&statement).await?;
        from_row(first_or_not_found(rows, NOT_FOUND)?)
    }

    pub async fn remove(&self, handle: &str) -> Result<(), DatabaseError> {
        let statement = ParameterizedStatement::new(
            "DELETE FROM companies WHERE handle = $1 RETURNING handle",
            vec![json!(handle)],
        );
        first_or_not_found(self.storage.execute(&statement).await?, NOT_FOUND)?;
        debug!("Removed company {}", handle);
        Ok(())
    }
}
