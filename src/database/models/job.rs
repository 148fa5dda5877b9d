use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::company::Company;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Job {
    pub id: i32,
    pub title: String,
    pub salary: i64,
    pub equity: f64,
    pub company_handle: String,
    pub date_posted: DateTime<Utc>,
}

/// Listing projection.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JobSummary {
    pub id: i32,
    pub title: String,
    pub company_handle: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewJob {
    pub title: String,
    pub salary: i64,
    pub equity: f64,
    pub company_handle: String,
}

/// A job with its company inlined in place of `company_handle`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct JobDetail {
    pub id: i32,
    pub title: String,
    pub salary: i64,
    pub equity: f64,
    pub date_posted: DateTime<Utc>,
    pub company: Company,
}
