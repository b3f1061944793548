//! Like and view counters kept in `product_stats`.

use sea_orm::EntityTrait;
use uuid::Uuid;

use crate::{
    dto::catalog::{LikeCount, ViewCount},
    entity::products::Entity as Products,
    error::{AppError, AppResult},
    response::ApiResponse,
    state::AppState,
};

async fn ensure_product(state: &AppState, id: Uuid) -> AppResult<()> {
    Products::find_by_id(id)
        .one(&state.orm)
        .await?
        .map(|_| ())
        .ok_or(AppError::NotFound)
}

/// Home and product listings embed like counts and the most-liked order.
async fn drop_like_pages(state: &AppState) {
    state.cache.invalidate_page("/").await;
    state.cache.invalidate_prefix("/products").await;
}

pub async fn like(state: &AppState, id: Uuid) -> AppResult<ApiResponse<LikeCount>> {
    ensure_product(state, id).await?;
    let likes: i32 = sqlx::query_scalar(
        r#"
        INSERT INTO product_stats (product_id, likes, clicks, updated_at)
        VALUES ($1, 1, 0, now())
        ON CONFLICT (product_id)
        DO UPDATE SET likes = product_stats.likes + 1, updated_at = now()
        RETURNING likes
        "#,
    )
    .bind(id)
    .fetch_one(&state.pool)
    .await?;

    drop_like_pages(state).await;
    tracing::debug!(product_id = %id, likes, "product liked");
    Ok(ApiResponse::success("Liked", LikeCount { product_id: id, likes }, None))
}

/// Never drops below zero.
pub async fn unlike(state: &AppState, id: Uuid) -> AppResult<ApiResponse<LikeCount>> {
    ensure_product(state, id).await?;
    let likes: i32 = sqlx::query_scalar(
        r#"
        INSERT INTO product_stats (product_id, likes, clicks, updated_at)
        VALUES ($1, 0, 0, now())
        ON CONFLICT (product_id)
        DO UPDATE SET likes = GREATEST(product_stats.likes - 1, 0), updated_at = now()
        RETURNING likes
        "#,
    )
    .bind(id)
    .fetch_one(&state.pool)
    .await?;

    drop_like_pages(state).await;
    Ok(ApiResponse::success("Unliked", LikeCount { product_id: id, likes }, None))
}

pub async fn view(state: &AppState, id: Uuid) -> AppResult<ApiResponse<ViewCount>> {
    ensure_product(state, id).await?;
    let clicks: i32 = sqlx::query_scalar(
        r#"
        INSERT INTO product_stats (product_id, likes, clicks, updated_at)
        VALUES ($1, 0, 1, now())
        ON CONFLICT (product_id)
        DO UPDATE SET clicks = product_stats.clicks + 1, updated_at = now()
        RETURNING clicks
        "#,
    )
    .bind(id)
    .fetch_one(&state.pool)
    .await?;

    Ok(ApiResponse::success("Viewed", ViewCount { product_id: id, clicks }, None))
}
