use axum::{
    Json, Router,
    extract::{State, rejection::JsonRejection},
    http::StatusCode,
    routing::get,
};

use crate::{
    dto::contact::{ContactInfo, ContactRequest, ContactResponse},
    error::{AppError, AppResult},
    response::ApiResponse,
    services::contact_service,
    state::AppState,
};

pub fn router() -> Router<AppState> {
    Router::new().route("/contact", get(contact_info).post(send_message))
}

#[utoipa::path(
    get,
    path = "/api/contact",
    responses(
        (status = 200, description = "Email, phone and social links from the site settings", body = ApiResponse<ContactInfo>)
    ),
    tag = "Contact"
)]
pub async fn contact_info(State(state): State<AppState>) -> AppResult<Json<ApiResponse<ContactInfo>>> {
    let resp = contact_service::contact_info(&state).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    post,
    path = "/api/contact",
    request_body = ContactRequest,
    responses(
        (status = 201, description = "Message stored", body = ContactResponse),
        (status = 400, description = "Missing fields or invalid_email")
    ),
    tag = "Contact"
)]
pub async fn send_message(
    State(state): State<AppState>,
    payload: Result<Json<ContactRequest>, JsonRejection>,
) -> AppResult<(StatusCode, Json<ContactResponse>)> {
    let Json(payload) = payload.map_err(|_| AppError::BadRequest("Missing fields".into()))?;
    let resp = contact_service::submit(&state, payload).await?;
    Ok((StatusCode::CREATED, Json(resp)))
}
