use std::sync::Arc;

use serde_json::json;
use tracing::debug;

use super::{ensure_columns, first_or_not_found};
use crate::database::manager::DatabaseError;
use crate::database::models::{from_row, Company, Job, JobDetail, JobSummary, NewJob};
use crate::database::storage::Storage;
use crate::query::{partial_update, FieldSet, Filter, ParameterizedStatement, Resource};
use crate::validation::schemas::JOB_UPDATE;

const NOT_FOUND: &str = "Job does not exist";
const COLUMNS: &str = "id, title, salary, equity, company_handle, date_posted";

pub struct JobRepository {
    storage: Arc<dyn Storage>,
}

impl JobRepository {
    pub fn new(storage: Arc<dyn Storage>) -> Self {
        Self { storage }
    }

    pub async fn list(&self, filters: &FieldSet) -> Result<Vec<JobSummary>, DatabaseError> {
        let statement = Filter::build(Resource::Jobs, filters)?;
        let rows = self.storage.execute(&statement).await?;
        rows.into_iter().map(from_row).collect()
    }

    /// Inserts a posting dated now. An unknown `company_handle` surfaces as
    /// invalid input through the foreign key.
    pub async fn create(&self, job: NewJob) -> Result<Job, DatabaseError> {
        let statement = ParameterizedStatement::new(
            format!(
                "INSERT INTO jobs (title, salary, equity, company_handle, date_posted) \
                 VALUES ($1, $2, $3, $4, CURRENT_TIMESTAMP) RETURNING {}",
                COLUMNS
            ),
            vec![json!(job.title), json!(job.salary), json!(job.equity), json!(job.company_handle)],
        );
        let job: Job = from_row(first_or_not_found(self.storage.execute(&statement).await?, NOT_FOUND)?)?;
        debug!("Created job {} for {}", job.id, job.company_handle);
        Ok(job)
    }

    pub async fn get(&self, id: i32) -> Result<JobDetail, DatabaseError> {
        let statement = ParameterizedStatement::new(
            format!("SELECT {} FROM jobs WHERE id = $1", COLUMNS),
            vec![json!(id)],
        );
        let job: Job = from_row(first_or_not_found(self.storage.execute(&statement).await?, NOT_FOUND)?)?;

        let statement = ParameterizedStatement::new(
            "SELECT handle, name, num_employees, description, logo_url FROM companies WHERE handle = $1",
            vec![json!(job.company_handle)],
        );
        let company: Company = from_row(first_or_not_found(
            self.storage.execute(&statement).await?,
            "Company does not exist",
        )?)?;

        Ok(JobDetail {
            id: job.id,
            title: job.title,
            salary: job.salary,
            equity: job.equity,
            date_posted: job.date_posted,
            company,
        })
    }

    pub async fn update(&self, id: i32, fields: &FieldSet) -> Result<Job, DatabaseError> {
        ensure_columns(&JOB_UPDATE, fields)?;
        let statement = partial_update("jobs", fields, "id", id)?;
        from_row(first_or_not_found(self.storage.execute(&statement).await?, NOT_FOUND)?)
    }

    pub async fn remove(&self, id: i32) -> Result<(), DatabaseError> {
        let statement = ParameterizedStatement::new("DELETE FROM jobs WHERE id = $1 RETURNING id", vec![json!(id)]);
        first_or_not_found(self.storage.execute(&statement).await?, NOT_FOUND)?;
        debug!("Removed job {}", id);
        Ok(())
    }
}
