use axum::{
    Json, Router,
    extract::{Query, State, rejection::JsonRejection},
    http::{HeaderMap, StatusCode, header},
    response::{IntoResponse, Response},
    routing::get,
};

use crate::{
    dto::reviews::{CreateTestimonialRequest, ReviewPage},
    error::{AppError, AppResult},
    middleware::headers::{read_cookie, set_cookie},
    models::Testimonial,
    response::ApiResponse,
    routes::params::{LimitQuery, PageQuery},
    services::review_service::{self, REVIEW_COOKIE, REVIEW_COOKIE_MAX_AGE},
    state::AppState,
};

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/testimonials", get(list_testimonials).post(create_testimonial))
        .route("/reviews", get(review_page))
}

#[utoipa::path(
    get,
    path = "/api/testimonials",
    params(("limit" = Option<i64>, Query, description = "1..=100, default 12")),
    responses(
        (status = 200, description = "Approved testimonials, newest first", body = Vec<Testimonial>)
    ),
    tag = "Reviews"
)]
pub async fn list_testimonials(
    State(state): State<AppState>,
    Query(query): Query<LimitQuery>,
) -> AppResult<Json<Vec<Testimonial>>> {
    let items = review_service::latest(&state, review_service::clamp_limit(query.limit)).await?;
    Ok(Json(items))
}

#[utoipa::path(
    post,
    path = "/api/testimonials",
    request_body = CreateTestimonialRequest,
    responses(
        (status = 201, description = "Testimonial stored", body = Testimonial),
        (status = 400, description = "Missing fields"),
        (status = 429, description = "Already submitted today")
    ),
    tag = "Reviews"
)]
pub async fn create_testimonial(
    State(state): State<AppState>,
    headers: HeaderMap,
    payload: Result<Json<CreateTestimonialRequest>, JsonRejection>,
) -> AppResult<Response> {
    let Json(payload) = payload.map_err(|_| AppError::BadRequest("Missing fields".into()))?;
    let submitted_today = read_cookie(&headers, REVIEW_COOKIE).as_deref() == Some("1");

    let row = review_service::submit(&state, payload, submitted_today).await?;

    Ok((
        StatusCode::CREATED,
        [(header::SET_COOKIE, set_cookie(REVIEW_COOKIE, "1", REVIEW_COOKIE_MAX_AGE))],
        Json(row),
    )
        .into_response())
}

#[utoipa::path(
    get,
    path = "/api/reviews",
    params(("page" = Option<String>, Query, description = "Page number; anything unparsable is page 1")),
    responses(
        (status = 200, description = "Three approved reviews per page", body = ApiResponse<ReviewPage>)
    ),
    tag = "Reviews"
)]
pub async fn review_page(
    State(state): State<AppState>,
    Query(query): Query<PageQuery>,
) -> AppResult<Json<ApiResponse<ReviewPage>>> {
    let resp = review_service::review_page(&state, query.page()).await?;
    Ok(Json(resp))
}
