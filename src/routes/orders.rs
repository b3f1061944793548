use axum::{
    Json, Router,
    extract::{State, rejection::JsonRejection},
    routing::post,
};

use crate::{
    dto::orders::{PlaceOrderRequest, PlaceOrderResponse},
    error::{AppError, AppResult},
    services::order_service,
    state::AppState,
};

pub fn router() -> Router<AppState> {
    Router::new().route("/", post(place_order))
}

#[utoipa::path(
    post,
    path = "/api/orders",
    request_body = PlaceOrderRequest,
    responses(
        (status = 200, description = "Order placed", body = PlaceOrderResponse),
        (status = 400, description = "INVALID_ITEMS"),
        (status = 409, description = "OUT_OF_STOCK")
    ),
    tag = "Orders"
)]
pub async fn place_order(
    State(state): State<AppState>,
    payload: Result<Json<PlaceOrderRequest>, JsonRejection>,
) -> AppResult<Json<PlaceOrderResponse>> {
    let Json(payload) = payload.map_err(|err| {
        tracing::debug!(error = %err, "unreadable order body");
        AppError::BadRequest("INVALID_ITEMS".into())
    })?;
    let resp = order_service::place_order(&state, payload).await?;
    Ok(Json(resp))
}
