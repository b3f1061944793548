use axum::{
    Json,
    extract::{Query, State},
    http::HeaderMap,
};
use serde::Serialize;
use utoipa::ToSchema;

use crate::{
    error::{AppError, AppResult},
    routes::params::RevalidateQuery,
    state::AppState,
};

pub const SECRET_HEADER: &str = "x-revalidate-secret";

#[derive(Debug, Serialize, ToSchema)]
pub struct RevalidateResponse {
    pub ok: bool,
    pub revalidated: String,
}

/// Unset secrets reject every request.
fn authorized(expected: Option<&str>, given: Option<&str>) -> bool {
    match (expected, given) {
        (Some(expected), Some(given)) => !expected.is_empty() && expected == given,
        _ => false,
    }
}

#[utoipa::path(
    post,
    path = "/api/revalidate",
    params(
        ("path" = Option<String>, Query, description = "Storefront path to refresh, default /"),
        ("x-revalidate-secret" = String, Header, description = "Shared revalidation secret"),
    ),
    responses(
        (status = 200, description = "Cached pages dropped", body = RevalidateResponse),
        (status = 401, description = "Missing or wrong secret")
    ),
    tag = "Revalidate"
)]
pub async fn revalidate(
    State(state): State<AppState>,
    headers: HeaderMap,
    Query(query): Query<RevalidateQuery>,
) -> AppResult<Json<RevalidateResponse>> {
    let given = headers.get(SECRET_HEADER).and_then(|v| v.to_str().ok());
    if !authorized(state.config.revalidate_secret.as_deref(), given) {
        return Err(AppError::Unauthorized);
    }

    let path = query
        .path
        .map(|p| p.trim().to_string())
        .filter(|p| !p.is_empty())
        .unwrap_or_else(|| "/".to_string());
    let removed = state.cache.invalidate_prefix(&path).await;
    tracing::info!(path = %path, removed, "revalidated");

    Ok(Json(RevalidateResponse {
        ok: true,
        revalidated: path,
    }))
}
