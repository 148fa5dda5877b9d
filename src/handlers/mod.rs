// handlers/mod.rs - request handlers grouped by resource
//
// Guards run as route layers before any of these are called; handlers only
// see requests that already passed their route's policy.

pub mod auth;
pub mod companies;
pub mod jobs;
pub mod users;

use std::fmt::Display;
use std::str::FromStr;

use axum::{extract::rejection::JsonRejection, Json};
use serde::{de::DeserializeOwned, Deserialize, Deserializer};
use serde_json::Value;

use crate::error::ApiError;
use crate::query::FieldSet;
use crate::validation::Schema;

/// Unwraps a JSON body and checks it against `schema`.
pub(crate) fn validated(schema: &Schema, body: Result<Json<Value>, JsonRejection>) -> Result<FieldSet, ApiError> {
    let Json(body) = body?;
    schema
        .validate(&body)
        .map_err(|errors| ApiError::validation_error("Invalid input", errors))
}

/// Decodes a validated field set into a typed payload.
pub(crate) fn decode<T: DeserializeOwned>(fields: FieldSet) -> Result<T, ApiError> {
    serde_json::from_value(fields.into_value()).map_err(|e| ApiError::bad_request(e.to_string()))
}

/// Query-string numbers where an empty value means "not supplied".
pub(crate) fn empty_as_none<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: FromStr,
    T::Err: Display,
{
    let raw: Option<String> = Option::deserialize(deserializer)?;
    match raw.as_deref().map(str::trim) {
        None | Some("") => Ok(None),
        Some(s) => s.parse::<T>().map(Some).map_err(serde::de::Error::custom),
    }
}
