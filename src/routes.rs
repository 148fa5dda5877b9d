use axum::{
    extract::State,
    http::{HeaderValue, StatusCode},
    middleware::from_fn_with_state,
    response::{IntoResponse, Json},
    routing::{get, post},
    Router,
};
use serde_json::json;
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::config::Environment;
use crate::error::ApiError;
use crate::handlers;
use crate::middleware::{require_administrator, require_authenticated, require_same_identity};
use crate::state::AppState;

/// Full application router with guards, CORS and request tracing applied.
pub fn app(state: AppState) -> Router {
    let mut router = Router::new()
        // Public
        .route("/", get(root))
        .route("/health", get(health))
        .route("/login", post(handlers::auth::login))
        .merge(user_routes(&state))
        .merge(company_routes(&state))
        .merge(job_routes(&state))
        .fallback(not_found);

    if state.config.security.enable_cors {
        router = router.layer(cors_layer(&state));
    }
    if state.config.api.enable_request_logging {
        router = router.layer(TraceLayer::new_for_http());
    }

    router.with_state(state)
}

fn user_routes(state: &AppState) -> Router<AppState> {
    use axum::routing::patch;
    use handlers::users;

    let authenticated = from_fn_with_state(state.clone(), require_authenticated);
    let same_identity = from_fn_with_state(state.clone(), require_same_identity);

    Router::new()
        // Registration is public; listing is not
        .route(
            "/users",
            post(users::register).merge(get(users::list).route_layer(authenticated.clone())),
        )
        .route(
            "/users/:username",
            get(users::get)
                .route_layer(authenticated)
                .merge(patch(users::update).delete(users::remove).route_layer(same_identity)),
        )
}

fn company_routes(state: &AppState) -> Router<AppState> {
    use axum::routing::patch;
    use handlers::companies;

    let authenticated = from_fn_with_state(state.clone(), require_authenticated);
    let administrator = from_fn_with_state(state.clone(), require_administrator);

    Router::new()
        .route(
            "/companies",
            get(companies::list)
                .route_layer(authenticated.clone())
                .merge(post(companies::create).route_layer(administrator.clone())),
        )
        .route(
            "/companies/:handle",
            get(companies::get).route_layer(authenticated).merge(
                patch(companies::update)
                    .delete(companies::remove)
                    .route_layer(administrator),
            ),
        )
}

fn job_routes(state: &AppState) -> Router<AppState> {
    use axum::routing::patch;
    use handlers::jobs;

    let authenticated = from_fn_with_state(state.clone(), require_authenticated);
    let administrator = from_fn_with_state(state.clone(), require_administrator);

    Router::new()
        .route(
            "/jobs",
            get(jobs::list)
                .route_layer(authenticated.clone())
                .merge(post(jobs::create).route_layer(administrator.clone())),
        )
        .route(
            "/jobs/:id",
            get(jobs::get).route_layer(authenticated).merge(
                patch(jobs::update)
                    .delete(jobs::remove)
                    .route_layer(administrator),
            ),
        )
}

/// Development allows any origin; other environments only the configured
/// list.
fn cors_layer(state: &AppState) -> CorsLayer {
    if state.config.environment == Environment::Development {
        return CorsLayer::permissive();
    }
    let origins: Vec<HeaderValue> = state
        .config
        .security
        .cors_origins
        .iter()
        .filter_map(|origin| origin.parse().ok())
        .collect();
    CorsLayer::new()
        .allow_origin(origins)
        .allow_methods(tower_http::cors::Any)
        .allow_headers(tower_http::cors::Any)
}

async fn root() -> Json<serde_json::Value> {
    let version = env!("CARGO_PKG_VERSION");

    Json(json!({
        "success": true,
        "data": {
            "name": "Jobly API",
            "version": version,
            "endpoints": {
                "auth": "/login, POST /users (public - token acquisition)",
                "users": "/users[/:username] (authenticated; updates by owner only)",
                "companies": "/companies[/:handle] (authenticated; writes by administrators)",
                "jobs": "/jobs[/:id] (authenticated; writes by administrators)",
            }
        }
    }))
}

async fn health(State(state): State<AppState>) -> impl IntoResponse {
    let now = chrono::Utc::now();

    match state.storage.ping().await {
        Ok(()) => (
            StatusCode::OK,
            Json(json!({
                "success": true,
                "data": {
                    "status": "ok",
                    "timestamp": now,
                    "database": "ok"
                }
            })),
        ),
        Err(e) => {
            tracing::error!("Health check failed: {}", e);
            (
                StatusCode::SERVICE_UNAVAILABLE,
                Json(json!({
                    "error": true,
                    "message": "Database temporarily unavailable",
                    "code": "SERVICE_UNAVAILABLE",
                    "data": {
                        "status": "degraded",
                        "timestamp": now
                    }
                })),
            )
        }
    }
}

async fn not_found() -> ApiError {
    ApiError::not_found("Not Found")
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use axum::{
        body::{to_bytes, Body},
        http::{header::AUTHORIZATION, Method, Request},
    };
    use serde_json::{json, Value};
    use tower::ServiceExt;

    use super::*;
    use crate::config::AppConfig;
    use crate::testing::ScriptedStorage;

    fn state(storage: Arc<ScriptedStorage>) -> AppState {
        AppState::new(AppConfig::development(), storage).unwrap()
    }

    fn request(method: Method, uri: &str, token: Option<&str>, body: Option<Value>) -> Request<Body> {
        let mut builder = Request::builder().method(method).uri(uri);
        if let Some(token) = token {
            builder = builder.header(AUTHORIZATION, format!("Bearer {}", token));
        }
        match body {
            Some(body) => builder
                .header("content-type", "application/json")
                .body(Body::from(body.to_string()))
                .unwrap(),
            None => builder.body(Body::empty()).unwrap(),
        }
    }

    async fn json_body(response: axum::response::Response) -> Value {
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[tokio::test]
    async fn root_is_public() {
        let app = app(state(Arc::new(ScriptedStorage::new())));
        let response = app.oneshot(request(Method::GET, "/", None, None)).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn listing_without_token_is_unauthorized() {
        let storage = Arc::new(ScriptedStorage::new());
        let app = app(state(storage.clone()));

        let response = app.oneshot(request(Method::GET, "/companies", None, None)).await.unwrap();

        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
        let body = json_body(response).await;
        assert_eq!(body["message"], "Unauthorized");
        assert!(storage.executed().is_empty());
    }

    #[tokio::test]
    async fn listing_with_token_reaches_storage() {
        let storage = Arc::new(ScriptedStorage::new());
        storage.reply(vec![json!({"handle": "NFLX", "name": "Netflix"})]);
        let state = state(storage.clone());
        let token = state.keys.issue("kenny", false).unwrap();

        let response = app(state)
            .oneshot(request(Method::GET, "/companies?search=net", Some(&token), None))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let body = json_body(response).await;
        assert_eq!(body["data"][0]["handle"], "NFLX");
        assert_eq!(storage.executed().len(), 1);
    }

    #[tokio::test]
    async fn other_users_cannot_patch() {
        let storage = Arc::new(ScriptedStorage::new());
        let state = state(storage.clone());
        let token = state.keys.issue("kenny", true).unwrap();

        let response = app(state)
            .oneshot(request(
                Method::PATCH,
                "/users/someone",
                Some(&token),
                Some(json!({"first_name": "X"})),
            ))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
        assert!(storage.executed().is_empty());
    }

    #[tokio::test]
    async fn company_writes_need_administrator() {
        let storage = Arc::new(ScriptedStorage::new());
        let state = state(storage.clone());
        let token = state.keys.issue("kenny", false).unwrap();

        let response = app(state)
            .oneshot(request(
                Method::DELETE,
                "/companies/NFLX",
                Some(&token),
                None,
            ))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
        assert!(storage.executed().is_empty());
    }

    #[tokio::test]
    async fn inverted_employee_range_is_bad_request() {
        let storage = Arc::new(ScriptedStorage::new());
        let state = state(storage.clone());
        let token = state.keys.issue("kenny", false).unwrap();

        let response = app(state)
            .oneshot(request(
                Method::GET,
                "/companies?min_employees=10&max_employees=2",
                Some(&token),
                None,
            ))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert!(storage.executed().is_empty());
    }

    #[tokio::test]
    async fn unknown_route_is_not_found() {
        let app = app(state(Arc::new(ScriptedStorage::new())));
        let response = app.oneshot(request(Method::GET, "/nope", None, None)).await.unwrap();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }
}
