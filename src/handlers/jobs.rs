// handlers/jobs.rs - /jobs and /jobs/:id

use axum::{
    extract::rejection::{JsonRejection, PathRejection, QueryRejection},
    extract::{Path, Query, State},
    Json,
};
use serde::Deserialize;
use serde_json::{json, Value};

use super::{decode, empty_as_none, validated};
use crate::database::models::{Job, JobDetail, JobSummary, NewJob};
use crate::middleware::{ApiResponse, ApiResult};
use crate::query::FieldSet;
use crate::state::AppState;
use crate::validation::schemas::{JOB_NEW, JOB_UPDATE};

#[derive(Debug, Default, Deserialize)]
pub struct JobQuery {
    #[serde(default)]
    pub search: Option<String>,
    #[serde(default, deserialize_with = "empty_as_none")]
    pub min_salary: Option<i64>,
    #[serde(default, deserialize_with = "empty_as_none")]
    pub min_equity: Option<f64>,
}

impl JobQuery {
    fn into_filters(self) -> FieldSet {
        let mut filters = FieldSet::new();
        if let Some(search) = self.search {
            filters.insert("search", search);
        }
        if let Some(min) = self.min_salary {
            filters.insert("min_salary", min);
        }
        if let Some(min) = self.min_equity {
            filters.insert("min_equity", min);
        }
        filters
    }
}

/// GET /jobs - filtered listing
pub async fn list(
    State(state): State<AppState>,
    query: Result<Query<JobQuery>, QueryRejection>,
) -> ApiResult<Vec<JobSummary>> {
    let Query(query) = query?;
    Ok(ApiResponse::success(state.jobs.list(&query.into_filters()).await?))
}

/// POST /jobs
pub async fn create(State(state): State<AppState>, body: Result<Json<Value>, JsonRejection>) -> ApiResult<Job> {
    let job: NewJob = decode(validated(&JOB_NEW, body)?)?;
    Ok(ApiResponse::created(state.jobs.create(job).await?))
}

/// GET /jobs/:id - job with its company
pub async fn get(State(state): State<AppState>, id: Result<Path<i32>, PathRejection>) -> ApiResult<JobDetail> {
    let Path(id) = id?;
    Ok(ApiResponse::success(state.jobs.get(id).await?))
}

/// PATCH /jobs/:id
pub async fn update(
    State(state): State<AppState>,
    id: Result<Path<i32>, PathRejection>,
    body: Result<Json<Value>, JsonRejection>,
) -> ApiResult<Job> {
    let Path(id) = id?;
    let fields = validated(&JOB_UPDATE, body)?;
    Ok(ApiResponse::success(state.jobs.update(id, &fields).await?))
}

/// DELETE /jobs/:id
pub async fn remove(State(state): State<AppState>, id: Result<Path<i32>, PathRejection>) -> ApiResult<Value> {
    let Path(id) = id?;
    state.jobs.remove(id).await?;
    Ok(ApiResponse::success(json!({ "deleted": id })))
}
