// handlers/auth.rs - POST /login

use axum::{extract::rejection::JsonRejection, extract::State, Json};
use serde::Deserialize;
use serde_json::{json, Value};
use tracing::info;

use super::{decode, validated};
use crate::auth::password::{reject_unknown_user, verify_password};
use crate::error::ApiError;
use crate::middleware::{ApiResponse, ApiResult};
use crate::state::AppState;
use crate::validation::schemas::LOGIN;

const INVALID_CREDENTIALS: &str = "Invalid username/password";

#[derive(Debug, Deserialize)]
struct LoginRequest {
    username: String,
    password: String,
}

/// POST /login - exchange username and password for a token.
///
/// Unknown users and wrong passwords get the same 401 after the same
/// bcrypt work.
pub async fn login(State(state): State<AppState>, body: Result<Json<Value>, JsonRejection>) -> ApiResult<Value> {
    let request: LoginRequest = decode(validated(&LOGIN, body)?)?;

    let Some(credentials) = state.users.credentials(&request.username).await? else {
        reject_unknown_user(request.password, state.config.security.bcrypt_cost).await?;
        return Err(ApiError::Unauthorized(INVALID_CREDENTIALS.to_string()));
    };

    if !verify_password(request.password, credentials.password).await? {
        return Err(ApiError::Unauthorized(INVALID_CREDENTIALS.to_string()));
    }

    let token = state.keys.issue(&credentials.username, credentials.is_admin)?;
    info!("User {} logged in", credentials.username);
    Ok(ApiResponse::success(json!({ "token": token })))
}
