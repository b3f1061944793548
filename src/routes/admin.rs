use axum::{
    Json, Router,
    extract::{Path, Query, State},
    http::header,
    response::{IntoResponse, Response},
    routing::{get, post, put},
};
use serde_json::Value;
use uuid::Uuid;

use crate::{
    dto::{
        admin::{
            AdminCategoryList, AdminProductList, CategoryInput, ImageAltRequest, ImageInput,
            ImageList, MoveRequest, Overview, ProductInput, RichTextRequest, RichTextResponse,
            SortOrderRequest, StockRequest,
        },
        contact::ContactMessageList,
        newsletter::{CampaignRequest, CampaignResult, SubscriberList},
    },
    error::AppResult,
    middleware::auth::AdminUser,
    models::{Category, Product, ProductImage},
    response::ApiResponse,
    routes::params::{Pagination, SubscriberQuery},
    services::{admin_service, contact_service, newsletter_service, settings_service},
    settings::SiteSettings,
    state::AppState,
};

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/overview", get(overview))
        .route("/products", get(list_products).post(create_product))
        .route("/products/{id}", put(update_product).delete(delete_product))
        .route("/products/{id}/move", post(move_product))
        .route("/products/{id}/sort-order", put(set_sort_order))
        .route("/products/{id}/stock", put(set_stock))
        .route("/products/{id}/images", get(list_images).post(add_image))
        .route("/images/{id}", put(update_image).delete(delete_image))
        .route("/images/{id}/move", post(move_image))
        .route("/categories", get(list_categories).post(upsert_category))
        .route("/categories/{id}", axum::routing::delete(delete_category))
        .route("/categories/{id}/move", post(move_category))
        .route("/settings", get(get_settings).put(update_settings))
        .route("/settings/rich-text/{key}", post(apply_rich_text))
        .route("/newsletter/campaign", post(send_campaign))
        .route("/newsletter/subscribers", get(list_subscribers))
        .route("/newsletter/subscribers.csv", get(export_subscribers))
        .route("/contact-messages", get(list_contact_messages))
}

#[utoipa::path(
    get,
    path = "/api/admin/overview",
    responses(
        (status = 200, description = "Counts and top products by likes and clicks", body = ApiResponse<Overview>),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Forbidden"),
    ),
    security(("bearer_auth" = [])),
    tag = "Admin"
)]
pub async fn overview(
    State(state): State<AppState>,
    _admin: AdminUser,
) -> AppResult<Json<ApiResponse<Overview>>> {
    let resp = admin_service::overview(&state).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    get,
    path = "/api/admin/products",
    responses(
        (status = 200, description = "Products in admin order", body = ApiResponse<AdminProductList>),
        (status = 403, description = "Forbidden"),
    ),
    security(("bearer_auth" = [])),
    tag = "Admin"
)]
pub async fn list_products(
    State(state): State<AppState>,
    _admin: AdminUser,
) -> AppResult<Json<ApiResponse<AdminProductList>>> {
    let resp = admin_service::list_products(&state).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    post,
    path = "/api/admin/products",
    request_body = ProductInput,
    responses(
        (status = 200, description = "Product created", body = ApiResponse<Product>),
        (status = 400, description = "Invalid product"),
    ),
    security(("bearer_auth" = [])),
    tag = "Admin"
)]
pub async fn create_product(
    State(state): State<AppState>,
    AdminUser(user): AdminUser,
    Json(payload): Json<ProductInput>,
) -> AppResult<Json<ApiResponse<Product>>> {
    let resp = admin_service::create_product(&state, &user, payload).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    put,
    path = "/api/admin/products/{id}",
    params(("id" = Uuid, Path, description = "Product id")),
    request_body = ProductInput,
    responses(
        (status = 200, description = "Product updated", body = ApiResponse<Product>),
        (status = 404, description = "Not Found"),
    ),
    security(("bearer_auth" = [])),
    tag = "Admin"
)]
pub async fn update_product(
    State(state): State<AppState>,
    AdminUser(user): AdminUser,
    Path(id): Path<Uuid>,
    Json(payload): Json<ProductInput>,
) -> AppResult<Json<ApiResponse<Product>>> {
    let resp = admin_service::update_product(&state, &user, id, payload).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    delete,
    path = "/api/admin/products/{id}",
    params(("id" = Uuid, Path, description = "Product id")),
    responses(
        (status = 200, description = "Product deleted", body = ApiResponse<serde_json::Value>),
        (status = 404, description = "Not Found"),
    ),
    security(("bearer_auth" = [])),
    tag = "Admin"
)]
pub async fn delete_product(
    State(state): State<AppState>,
    AdminUser(user): AdminUser,
    Path(id): Path<Uuid>,
) -> AppResult<Json<ApiResponse<Value>>> {
    let resp = admin_service::delete_product(&state, &user, id).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    post,
    path = "/api/admin/products/{id}/move",
    params(("id" = Uuid, Path, description = "Product id")),
    request_body = MoveRequest,
    responses(
        (status = 200, description = "Products after the move", body = ApiResponse<AdminProductList>),
    ),
    security(("bearer_auth" = [])),
    tag = "Admin"
)]
pub async fn move_product(
    State(state): State<AppState>,
    AdminUser(user): AdminUser,
    Path(id): Path<Uuid>,
    Json(payload): Json<MoveRequest>,
) -> AppResult<Json<ApiResponse<AdminProductList>>> {
    let resp = admin_service::move_product(&state, &user, id, payload.direction).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    put,
    path = "/api/admin/products/{id}/sort-order",
    params(("id" = Uuid, Path, description = "Product id")),
    request_body = SortOrderRequest,
    responses(
        (status = 200, description = "Sort order saved", body = ApiResponse<Product>),
    ),
    security(("bearer_auth" = [])),
    tag = "Admin"
)]
pub async fn set_sort_order(
    State(state): State<AppState>,
    AdminUser(user): AdminUser,
    Path(id): Path<Uuid>,
    Json(payload): Json<SortOrderRequest>,
) -> AppResult<Json<ApiResponse<Product>>> {
    let resp = admin_service::set_sort_order(&state, &user, id, payload.sort_order).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    put,
    path = "/api/admin/products/{id}/stock",
    params(("id" = Uuid, Path, description = "Product id")),
    request_body = StockRequest,
    responses(
        (status = 200, description = "Stock saved", body = ApiResponse<Product>),
        (status = 400, description = "Negative stock"),
    ),
    security(("bearer_auth" = [])),
    tag = "Admin"
)]
pub async fn set_stock(
    State(state): State<AppState>,
    AdminUser(user): AdminUser,
    Path(id): Path<Uuid>,
    Json(payload): Json<StockRequest>,
) -> AppResult<Json<ApiResponse<Product>>> {
    let resp = admin_service::set_stock(&state, &user, id, payload.stock).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    get,
    path = "/api/admin/products/{id}/images",
    params(("id" = Uuid, Path, description = "Product id")),
    responses(
        (status = 200, description = "Gallery images by position", body = ApiResponse<ImageList>),
    ),
    security(("bearer_auth" = [])),
    tag = "Admin"
)]
pub async fn list_images(
    State(state): State<AppState>,
    _admin: AdminUser,
    Path(id): Path<Uuid>,
) -> AppResult<Json<ApiResponse<ImageList>>> {
    let resp = admin_service::list_images(&state, id).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    post,
    path = "/api/admin/products/{id}/images",
    params(("id" = Uuid, Path, description = "Product id")),
    request_body = ImageInput,
    responses(
        (status = 200, description = "Image appended", body = ApiResponse<ProductImage>),
    ),
    security(("bearer_auth" = [])),
    tag = "Admin"
)]
pub async fn add_image(
    State(state): State<AppState>,
    AdminUser(user): AdminUser,
    Path(id): Path<Uuid>,
    Json(payload): Json<ImageInput>,
) -> AppResult<Json<ApiResponse<ProductImage>>> {
    let resp = admin_service::add_image(&state, &user, id, payload).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    put,
    path = "/api/admin/images/{id}",
    params(("id" = Uuid, Path, description = "Image id")),
    request_body = ImageAltRequest,
    responses(
        (status = 200, description = "Alt text saved", body = ApiResponse<ProductImage>),
    ),
    security(("bearer_auth" = [])),
    tag = "Admin"
)]
pub async fn update_image(
    State(state): State<AppState>,
    AdminUser(user): AdminUser,
    Path(id): Path<Uuid>,
    Json(payload): Json<ImageAltRequest>,
) -> AppResult<Json<ApiResponse<ProductImage>>> {
    let resp = admin_service::update_image_alt(&state, &user, id, payload).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    delete,
    path = "/api/admin/images/{id}",
    params(("id" = Uuid, Path, description = "Image id")),
    responses(
        (status = 200, description = "Image deleted", body = ApiResponse<serde_json::Value>),
    ),
    security(("bearer_auth" = [])),
    tag = "Admin"
)]
pub async fn delete_image(
    State(state): State<AppState>,
    AdminUser(user): AdminUser,
    Path(id): Path<Uuid>,
) -> AppResult<Json<ApiResponse<Value>>> {
    let resp = admin_service::delete_image(&state, &user, id).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    post,
    path = "/api/admin/images/{id}/move",
    params(("id" = Uuid, Path, description = "Image id")),
    request_body = MoveRequest,
    responses(
        (status = 200, description = "Images after the move", body = ApiResponse<ImageList>),
    ),
    security(("bearer_auth" = [])),
    tag = "Admin"
)]
pub async fn move_image(
    State(state): State<AppState>,
    AdminUser(user): AdminUser,
    Path(id): Path<Uuid>,
    Json(payload): Json<MoveRequest>,
) -> AppResult<Json<ApiResponse<ImageList>>> {
    let resp = admin_service::move_image(&state, &user, id, payload.direction).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    get,
    path = "/api/admin/categories",
    responses(
        (status = 200, description = "Categories by position", body = ApiResponse<AdminCategoryList>),
    ),
    security(("bearer_auth" = [])),
    tag = "Admin"
)]
pub async fn list_categories(
    State(state): State<AppState>,
    _admin: AdminUser,
) -> AppResult<Json<ApiResponse<AdminCategoryList>>> {
    let resp = admin_service::list_categories(&state).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    post,
    path = "/api/admin/categories",
    request_body = CategoryInput,
    responses(
        (status = 200, description = "Category created or updated", body = ApiResponse<Category>),
    ),
    security(("bearer_auth" = [])),
    tag = "Admin"
)]
pub async fn upsert_category(
    State(state): State<AppState>,
    AdminUser(user): AdminUser,
    Json(payload): Json<CategoryInput>,
) -> AppResult<Json<ApiResponse<Category>>> {
    let resp = admin_service::upsert_category(&state, &user, payload).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    delete,
    path = "/api/admin/categories/{id}",
    params(("id" = Uuid, Path, description = "Category id")),
    responses(
        (status = 200, description = "Category deleted", body = ApiResponse<serde_json::Value>),
        (status = 400, description = "CATEGORY_IN_USE"),
    ),
    security(("bearer_auth" = [])),
    tag = "Admin"
)]
pub async fn delete_category(
    State(state): State<AppState>,
    AdminUser(user): AdminUser,
    Path(id): Path<Uuid>,
) -> AppResult<Json<ApiResponse<Value>>> {
    let resp = admin_service::delete_category(&state, &user, id).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    post,
    path = "/api/admin/categories/{id}/move",
    params(("id" = Uuid, Path, description = "Category id")),
    request_body = MoveRequest,
    responses(
        (status = 200, description = "Categories after the move", body = ApiResponse<AdminCategoryList>),
    ),
    security(("bearer_auth" = [])),
    tag = "Admin"
)]
pub async fn move_category(
    State(state): State<AppState>,
    AdminUser(user): AdminUser,
    Path(id): Path<Uuid>,
    Json(payload): Json<MoveRequest>,
) -> AppResult<Json<ApiResponse<AdminCategoryList>>> {
    let resp = admin_service::move_category(&state, &user, id, payload.direction).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    get,
    path = "/api/admin/settings",
    responses(
        (status = 200, description = "Current site settings", body = ApiResponse<SiteSettings>),
    ),
    security(("bearer_auth" = [])),
    tag = "Admin"
)]
pub async fn get_settings(
    State(state): State<AppState>,
    _admin: AdminUser,
) -> AppResult<Json<ApiResponse<SiteSettings>>> {
    let resp = settings_service::get_settings(&state).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    put,
    path = "/api/admin/settings",
    request_body = SiteSettings,
    responses(
        (status = 200, description = "Settings saved", body = ApiResponse<SiteSettings>),
        (status = 400, description = "Validation failed"),
    ),
    security(("bearer_auth" = [])),
    tag = "Admin"
)]
pub async fn update_settings(
    State(state): State<AppState>,
    AdminUser(user): AdminUser,
    Json(payload): Json<SiteSettings>,
) -> AppResult<Json<ApiResponse<SiteSettings>>> {
    let resp = settings_service::update_settings(&state, &user, payload).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    post,
    path = "/api/admin/settings/rich-text/{key}",
    params(("key" = String, Path, description = "parallax_title or parallax_message")),
    request_body = RichTextRequest,
    responses(
        (status = 200, description = "Resulting HTML", body = ApiResponse<RichTextResponse>),
        (status = 404, description = "Not an editable key"),
    ),
    security(("bearer_auth" = [])),
    tag = "Admin"
)]
pub async fn apply_rich_text(
    State(state): State<AppState>,
    AdminUser(user): AdminUser,
    Path(key): Path<String>,
    Json(payload): Json<RichTextRequest>,
) -> AppResult<Json<ApiResponse<RichTextResponse>>> {
    let resp = settings_service::apply_rich_text(&state, &user, &key, payload).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    post,
    path = "/api/admin/newsletter/campaign",
    request_body = CampaignRequest,
    responses(
        (status = 200, description = "Per-recipient delivery summary", body = CampaignResult),
        (status = 400, description = "No products selected"),
        (status = 500, description = "Mail transport not configured"),
    ),
    security(("bearer_auth" = [])),
    tag = "Admin"
)]
pub async fn send_campaign(
    State(state): State<AppState>,
    AdminUser(user): AdminUser,
    Json(payload): Json<CampaignRequest>,
) -> AppResult<Json<CampaignResult>> {
    let resp = newsletter_service::send_campaign(&state, &user, payload).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    get,
    path = "/api/admin/newsletter/subscribers",
    params(
        ("page" = Option<i64>, Query, description = "Page number, default 1"),
        ("per_page" = Option<i64>, Query, description = "Items per page, default 20"),
        ("verified" = Option<bool>, Query, description = "Filter by verification"),
        ("sort_order" = Option<String>, Query, description = "Sort order: asc, desc"),
    ),
    responses(
        (status = 200, description = "Subscribers", body = ApiResponse<SubscriberList>),
    ),
    security(("bearer_auth" = [])),
    tag = "Admin"
)]
pub async fn list_subscribers(
    State(state): State<AppState>,
    _admin: AdminUser,
    Query(query): Query<SubscriberQuery>,
) -> AppResult<Json<ApiResponse<SubscriberList>>> {
    let resp = newsletter_service::list_subscribers(&state, query).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    get,
    path = "/api/admin/newsletter/subscribers.csv",
    responses(
        (status = 200, description = "email,locale,consent_at,verified", content_type = "text/csv"),
    ),
    security(("bearer_auth" = [])),
    tag = "Admin"
)]
pub async fn export_subscribers(
    State(state): State<AppState>,
    _admin: AdminUser,
) -> AppResult<Response> {
    let csv = newsletter_service::subscribers_csv(&state).await?;
    Ok((
        [
            (header::CONTENT_TYPE, "text/csv; charset=utf-8"),
            (header::CONTENT_DISPOSITION, "attachment; filename=\"subscribers.csv\""),
        ],
        csv,
    )
        .into_response())
}

#[utoipa::path(
    get,
    path = "/api/admin/contact-messages",
    params(
        ("page" = Option<i64>, Query, description = "Page number, default 1"),
        ("per_page" = Option<i64>, Query, description = "Items per page, default 20"),
    ),
    responses(
        (status = 200, description = "Contact form messages, newest first", body = ApiResponse<ContactMessageList>),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Forbidden"),
    ),
    security(("bearer_auth" = [])),
    tag = "Admin"
)]
pub async fn list_contact_messages(
    State(state): State<AppState>,
    _admin: AdminUser,
    Query(query): Query<Pagination>,
) -> AppResult<Json<ApiResponse<ContactMessageList>>> {
    let resp = contact_service::list_messages(&state, query).await?;
    Ok(Json(resp))
}
