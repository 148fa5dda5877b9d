// handlers/users.rs - registration and /users/:username

use axum::{
    extract::rejection::JsonRejection,
    extract::{Path, State},
    Json,
};
use serde_json::{json, Value};
use tracing::info;

use super::{decode, validated};
use crate::auth::password::hash_password;
use crate::database::models::{NewUser, User, UserSummary};
use crate::middleware::{ApiResponse, ApiResult};
use crate::state::AppState;
use crate::validation::schemas::{USER_NEW, USER_UPDATE};

/// POST /users - open registration; returns a token for the new account.
/// New accounts are never administrators.
pub async fn register(State(state): State<AppState>, body: Result<Json<Value>, JsonRejection>) -> ApiResult<Value> {
    let mut user: NewUser = decode(validated(&USER_NEW, body)?)?;
    user.password = hash_password(user.password, state.config.security.bcrypt_cost).await?;

    let user = state.users.create(user).await?;
    let token = state.keys.issue(&user.username, false)?;
    info!("Registered user {}", user.username);
    Ok(ApiResponse::created(json!({ "token": token })))
}

/// GET /users
pub async fn list(State(state): State<AppState>) -> ApiResult<Vec<UserSummary>> {
    Ok(ApiResponse::success(state.users.list().await?))
}

/// GET /users/:username
pub async fn get(State(state): State<AppState>, Path(username): Path<String>) -> ApiResult<User> {
    Ok(ApiResponse::success(state.users.get(&username).await?))
}

/// PATCH /users/:username - a supplied password is re-hashed in place.
pub async fn update(
    State(state): State<AppState>,
    Path(username): Path<String>,
    body: Result<Json<Value>, JsonRejection>,
) -> ApiResult<User> {
    let mut fields = validated(&USER_UPDATE, body)?;
    if let Some(Value::String(plain)) = fields.get("password").cloned() {
        let hashed = hash_password(plain, state.config.security.bcrypt_cost).await?;
        fields.insert("password", hashed);
    }
    Ok(ApiResponse::success(state.users.update(&username, &fields).await?))
}

/// DELETE /users/:username
pub async fn remove(State(state): State<AppState>, Path(username): Path<String>) -> ApiResult<Value> {
    state.users.remove(&username).await?;
    Ok(ApiResponse::success(json!({ "deleted": username })))
}
