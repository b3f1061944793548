use axum::{
    Json, Router,
    extract::rejection::JsonRejection,
    http::header,
    response::{IntoResponse, Response},
    routing::{get, post},
};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use utoipa::ToSchema;

use crate::{
    error::{AppError, AppResult},
    i18n::{LANG_COOKIE, LANG_COOKIE_MAX_AGE, Locale},
    middleware::headers::{ActiveLocale, set_cookie},
    response::ApiResponse,
    state::AppState,
};

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/locale", post(set_locale))
        .route("/i18n", get(messages))
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct LocaleRequest {
    pub locale: String,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct LocaleResponse {
    pub ok: bool,
    pub locale: Locale,
}

#[utoipa::path(
    post,
    path = "/api/locale",
    request_body = LocaleRequest,
    responses(
        (status = 200, description = "Language cookie set", body = LocaleResponse),
        (status = 400, description = "Unsupported locale")
    ),
    tag = "I18n"
)]
pub async fn set_locale(payload: Result<Json<LocaleRequest>, JsonRejection>) -> AppResult<Response> {
    let Json(payload) = payload.map_err(|_| AppError::BadRequest("INVALID_LOCALE".into()))?;
    let locale: Locale = payload
        .locale
        .parse()
        .map_err(|_| AppError::BadRequest("INVALID_LOCALE".into()))?;

    Ok((
        [(header::SET_COOKIE, set_cookie(LANG_COOKIE, locale.as_str(), LANG_COOKIE_MAX_AGE))],
        Json(LocaleResponse { ok: true, locale }),
    )
        .into_response())
}

#[utoipa::path(
    get,
    path = "/api/i18n",
    responses(
        (status = 200, description = "Message dictionary of the active locale", body = ApiResponse<Value>)
    ),
    tag = "I18n"
)]
pub async fn messages(ActiveLocale(locale): ActiveLocale) -> Json<ApiResponse<Value>> {
    Json(ApiResponse::success(
        locale.as_str(),
        locale.messages().as_value(),
        None,
    ))
}
