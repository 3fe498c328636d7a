use std::sync::Arc;

use axum::{
    http::header,
    response::{IntoResponse, Json},
    routing::get,
    Router,
};
use serde_json::{json, Value};
use utoipa::OpenApi;

use users_admin::api::rest::openapi::UsersAdminApiDoc;

/// Liveness probe
#[utoipa::path(
    get,
    path = "/health",
    responses((status = 200, description = "Service is up")),
    tags = ["health"],
    operation_id = "health"
)]
pub async fn health_check() -> Json<Value> {
    Json(json!({
        "status": "healthy",
        "timestamp": chrono::Utc::now().to_rfc3339()
    }))
}

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Blogify admin API",
        description = "Back-office user management for Blogify."
    ),
    paths(health_check),
    tags((name = "health", description = "Endpoints for health checks"))
)]
struct ServerApiDoc;

/// Full document: server routes plus every module's routes.
pub fn openapi() -> utoipa::openapi::OpenApi {
    let mut doc = ServerApiDoc::openapi();
    doc.merge(UsersAdminApiDoc::openapi());
    doc
}

/// Router with `/health` and a pre-rendered `/openapi.json`.
pub fn base_router() -> anyhow::Result<Router> {
    let doc = Arc::new(serde_json::to_value(openapi())?);
    Ok(Router::new().route("/health", get(health_check)).route(
        "/openapi.json",
        get(move || {
            let doc = doc.clone();
            async move { ([(header::CACHE_CONTROL, "no-store")], Json((*doc).clone())).into_response() }
        }),
    ))
}
