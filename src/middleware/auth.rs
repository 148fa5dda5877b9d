use std::collections::HashMap;

use axum::{
    extract::{Path, Request, State},
    http::{header::AUTHORIZATION, HeaderMap},
    middleware::Next,
    response::Response,
};
use tracing::debug;

use crate::auth::guard::{Guard, GuardOutcome};
use crate::auth::JwtKeys;
use crate::error::ApiError;
use crate::state::AppState;

/// Query parameter accepted when no Authorization header is sent.
const TOKEN_QUERY_PARAM: &str = "_token";

/// Any valid token.
pub async fn require_authenticated(
    State(state): State<AppState>,
    request: Request,
    next: Next,
) -> Result<Response, ApiError> {
    run_guard(&state.keys, Guard::Authenticated, request, next).await
}

/// Token subject must equal the `:username` route segment.
pub async fn require_same_identity(
    State(state): State<AppState>,
    Path(params): Path<HashMap<String, String>>,
    request: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let target = params.get("username").map(String::as_str).unwrap_or_default();
    run_guard(&state.keys, Guard::SameIdentity(target), request, next).await
}

/// Token must carry `is_admin`.
pub async fn require_administrator(
    State(state): State<AppState>,
    request: Request,
    next: Next,
) -> Result<Response, ApiError> {
    run_guard(&state.keys, Guard::Administrator, request, next).await
}

/// Runs one guard and either forwards the request with the verified
/// identity attached or answers 401 without reaching the handler.
async fn run_guard(keys: &JwtKeys, guard: Guard<'_>, mut request: Request, next: Next) -> Result<Response, ApiError> {
    let token = extract_token(request.headers(), request.uri().query());

    match guard.check(keys, token.as_deref()) {
        GuardOutcome::Proceed(claim) => {
            debug!("{:?} passed for {}", guard, claim.subject);
            request.extensions_mut().insert(claim);
            Ok(next.run(request).await)
        }
        GuardOutcome::Reject(rejection) => Err(rejection.into()),
    }
}

/// Bearer token from the Authorization header, falling back to `_token` in
/// the query string.
fn extract_token(headers: &HeaderMap, query: Option<&str>) -> Option<String> {
    let from_header = headers
        .get(AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.strip_prefix("Bearer "))
        .map(str::trim)
        .filter(|token| !token.is_empty());

    if let Some(token) = from_header {
        return Some(token.to_string());
    }

    url::form_urlencoded::parse(query?.as_bytes())
        .find(|(key, _)| key == TOKEN_QUERY_PARAM)
        .map(|(_, value)| value.into_owned())
        .filter(|token| !token.is_empty())
}
