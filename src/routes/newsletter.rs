use axum::{
    Json, Router,
    extract::{State, rejection::JsonRejection},
    http::HeaderMap,
    routing::post,
};

use crate::{
    dto::newsletter::{OkResponse, SubscribeRequest},
    error::{AppError, AppResult},
    middleware::headers::{client_ip, user_agent},
    services::newsletter_service,
    state::AppState,
};

pub fn router() -> Router<AppState> {
    Router::new().route("/subscribe", post(subscribe))
}

#[utoipa::path(
    post,
    path = "/api/newsletter/subscribe",
    request_body = SubscribeRequest,
    responses(
        (status = 200, description = "Subscribed (repeat subscriptions update the row)", body = OkResponse),
        (status = 400, description = "invalid_email")
    ),
    tag = "Newsletter"
)]
pub async fn subscribe(
    State(state): State<AppState>,
    headers: HeaderMap,
    payload: Result<Json<SubscribeRequest>, JsonRejection>,
) -> AppResult<Json<OkResponse>> {
    let Json(payload) = payload.map_err(|_| AppError::BadRequest("invalid_email".into()))?;
    let resp = newsletter_service::subscribe(
        &state,
        payload,
        client_ip(&headers),
        user_agent(&headers),
    )
    .await?;
    Ok(Json(resp))
}
