use axum::{
    Json, Router,
    extract::{Path, Query, State},
    routing::{get, post},
};
use serde_json::Value;
use uuid::Uuid;

use crate::{
    dto::catalog::{
        CategoryDetail, CategoryList, HomeData, LikeCount, ListingData, ProductDetail, ViewCount,
    },
    error::{AppError, AppResult},
    middleware::headers::ActiveLocale,
    response::ApiResponse,
    routes::params::ListingQuery,
    services::{catalog_service, stats_service},
    state::AppState,
};

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/home", get(home))
        .route("/products", get(list_products))
        .route("/products/{slug}", get(get_product))
        .route("/products/{slug}/like", post(like_product).delete(unlike_product))
        .route("/products/{slug}/view", post(view_product))
        .route("/categories", get(list_categories))
        .route("/categories/{slug}", get(get_category))
}

pub(crate) fn parse_id(raw: &str) -> AppResult<Uuid> {
    Uuid::parse_str(raw.trim()).map_err(|_| AppError::BadRequest("INVALID_ID".into()))
}

#[utoipa::path(
    get,
    path = "/api/home",
    responses(
        (status = 200, description = "Hero categories, featured and most liked products, testimonials and the parallax block", body = ApiResponse<HomeData>)
    ),
    tag = "Catalog"
)]
pub async fn home(
    State(state): State<AppState>,
    ActiveLocale(locale): ActiveLocale,
) -> AppResult<Json<ApiResponse<Value>>> {
    let resp = catalog_service::home(&state, locale).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    get,
    path = "/api/products",
    params(
        ("category_id" = Option<Uuid>, Query, description = "Only products of this category"),
        ("sort" = Option<String>, Query, description = "name, price_asc, price_desc, most_liked (default), admin_order"),
    ),
    responses(
        (status = 200, description = "Sorted product listing with filter categories", body = ApiResponse<ListingData>)
    ),
    tag = "Catalog"
)]
pub async fn list_products(
    State(state): State<AppState>,
    ActiveLocale(locale): ActiveLocale,
    Query(query): Query<ListingQuery>,
) -> AppResult<Json<ApiResponse<Value>>> {
    let resp = catalog_service::listing(&state, locale, query).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    get,
    path = "/api/products/{slug}",
    params(("slug" = String, Path, description = "Product slug or id")),
    responses(
        (status = 200, description = "Product detail", body = ApiResponse<ProductDetail>),
        (status = 404, description = "Unknown product")
    ),
    tag = "Catalog"
)]
pub async fn get_product(
    State(state): State<AppState>,
    ActiveLocale(locale): ActiveLocale,
    Path(slug): Path<String>,
) -> AppResult<Json<ApiResponse<Value>>> {
    let resp = catalog_service::product_detail(&state, locale, slug).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    post,
    path = "/api/products/{id}/like",
    params(("id" = Uuid, Path, description = "Product id")),
    responses(
        (status = 200, description = "Like recorded", body = ApiResponse<LikeCount>),
        (status = 404, description = "Unknown product")
    ),
    tag = "Catalog"
)]
pub async fn like_product(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<Json<ApiResponse<LikeCount>>> {
    let resp = stats_service::like(&state, parse_id(&id)?).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    delete,
    path = "/api/products/{id}/like",
    params(("id" = Uuid, Path, description = "Product id")),
    responses(
        (status = 200, description = "Like withdrawn", body = ApiResponse<LikeCount>),
        (status = 404, description = "Unknown product")
    ),
    tag = "Catalog"
)]
pub async fn unlike_product(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<Json<ApiResponse<LikeCount>>> {
    let resp = stats_service::unlike(&state, parse_id(&id)?).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    post,
    path = "/api/products/{id}/view",
    params(("id" = Uuid, Path, description = "Product id")),
    responses(
        (status = 200, description = "View counted", body = ApiResponse<ViewCount>)
    ),
    tag = "Catalog"
)]
pub async fn view_product(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<Json<ApiResponse<ViewCount>>> {
    let resp = stats_service::view(&state, parse_id(&id)?).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    get,
    path = "/api/categories",
    responses(
        (status = 200, description = "Categories by position", body = ApiResponse<CategoryList>)
    ),
    tag = "Catalog"
)]
pub async fn list_categories(State(state): State<AppState>) -> AppResult<Json<ApiResponse<Value>>> {
    let resp = catalog_service::categories(&state).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    get,
    path = "/api/categories/{slug}",
    params(("slug" = String, Path, description = "Category slug or id")),
    responses(
        (status = 200, description = "Category with its products", body = ApiResponse<CategoryDetail>),
        (status = 404, description = "Unknown category")
    ),
    tag = "Catalog"
)]
pub async fn get_category(
    State(state): State<AppState>,
    Path(slug): Path<String>,
) -> AppResult<Json<ApiResponse<Value>>> {
    let resp = catalog_service::category_detail(&state, slug).await?;
    Ok(Json(resp))
}
