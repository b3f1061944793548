use axum::{
    extract::{Path, State},
    http::{StatusCode, header},
    response::{IntoResponse, Response},
};

use crate::{error::AppResult, routes::catalog::parse_id, services::catalog_service, state::AppState};

/// Short product links (`/product/{id}`) used in newsletter mails.
#[utoipa::path(
    get,
    path = "/product/{id}",
    params(("id" = uuid::Uuid, Path, description = "Product id")),
    responses(
        (status = 302, description = "Redirect to the product page"),
        (status = 400, description = "Malformed id"),
        (status = 404, description = "Unknown product or product without slug")
    ),
    tag = "Catalog"
)]
pub async fn product_redirect(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<Response> {
    let target = catalog_service::product_path(&state, parse_id(&id)?).await?;
    Ok((StatusCode::FOUND, [(header::LOCATION, target)]).into_response())
}
