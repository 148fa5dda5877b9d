// handlers/companies.rs - /companies and /companies/:handle

use axum::{
    extract::rejection::{JsonRejection, QueryRejection},
    extract::{Path, Query, State},
    Json,
};
use serde::Deserialize;
use serde_json::{json, Value};

use super::{decode, empty_as_none, validated};
use crate::database::models::{Company, CompanyDetail, CompanySummary, NewCompany};
use crate::error::ApiError;
use crate::middleware::{ApiResponse, ApiResult};
use crate::query::FieldSet;
use crate::state::AppState;
use crate::validation::schemas::{COMPANY_NEW, COMPANY_UPDATE};

#[derive(Debug, Default, Deserialize)]
pub struct CompanyQuery {
    #[serde(default)]
    pub search: Option<String>,
    #[serde(default, deserialize_with = "empty_as_none")]
    pub min_employees: Option<i64>,
    #[serde(default, deserialize_with = "empty_as_none")]
    pub max_employees: Option<i64>,
}

impl CompanyQuery {
    fn into_filters(self) -> Result<FieldSet, ApiError> {
        if let (Some(min), Some(max)) = (self.min_employees, self.max_employees) {
            if min > max {
                return Err(ApiError::bad_request(
                    "Min employees must be less than or equal to max employees",
                ));
            }
        }
        let mut filters = FieldSet::new();
        if let Some(search) = self.search {
            filters.insert("search", search);
        }
        if let Some(min) = self.min_employees {
            filters.insert("min_employees", min);
        }
        if let Some(max) = self.max_employees {
            filters.insert("max_employees", max);
        }
        Ok(filters)
    }
}

/// GET /companies - filtered listing
pub async fn list(
    State(state): State<AppState>,
    query: Result<Query<CompanyQuery>, QueryRejection>,
) -> ApiResult<Vec<CompanySummary>> {
    let Query(query) = query?;
    let companies = state.companies.list(&query.into_filters()?).await?;
    Ok(ApiResponse::success(companies))
}

/// POST /companies
pub async fn create(State(state): State<AppState>, body: Result<Json<Value>, JsonRejection>) -> ApiResult<Company> {
    let company: NewCompany = decode(validated(&COMPANY_NEW, body)?)?;
    Ok(ApiResponse::created(state.companies.create(company).await?))
}

/// GET /companies/:handle - company with its jobs
pub async fn get(State(state): State<AppState>, Path(handle): Path<String>) -> ApiResult<CompanyDetail> {
    Ok(ApiResponse::success(state.companies.get(&handle).await?))
}

/// PATCH /companies/:handle
pub async fn update(
    State(state): State<AppState>,
    Path(handle): Path<String>,
    body: Result<Json<Value>, JsonRejection>,
) -> ApiResult<Company> {
    let fields = validated(&COMPANY_UPDATE, body)?;
    Ok(ApiResponse::success(state.companies.update(&handle, &fields).await?))
}

/// DELETE /companies/:handle
pub async fn remove(State(state): State<AppState>, Path(handle): Path<String>) -> ApiResult<Value> {
    state.companies.remove(&handle).await?;
    Ok(ApiResponse::success(json!({ "deleted": handle })))
}
