use std::collections::HashMap;

use sea_orm::{
    ActiveModelTrait, ActiveValue::NotSet, ColumnTrait, EntityTrait, PaginatorTrait, QueryFilter,
    QueryOrder, QuerySelect, Set, TransactionTrait,
};
use sea_orm::sea_query::Expr;
use serde_json::json;
use uuid::Uuid;

use crate::{
    audit,
    dto::admin::{
        AdminCategoryList, AdminProductList, CategoryInput, Direction, ImageAltRequest,
        ImageInput, ImageList, MetricRow, Overview, ProductInput,
    },
    entity::{
        categories::{ActiveModel as CategoryActive, Column as CatCol, Entity as Categories},
        product_images::{ActiveModel as ImageActive, Column as ImageCol, Entity as ProductImages},
        product_stats::{Column as StatCol, Entity as ProductStats, Model as StatModel},
        products::{ActiveModel as ProductActive, Column as ProdCol, Entity as Products},
    },
    error::{AppError, AppResult},
    middleware::auth::AuthUser,
    models::{Category, Product, ProductImage},
    response::{ApiResponse, Meta},
    services::catalog_service::{category_from_entity, image_from_entity, product_from_entity},
    state::AppState,
};

pub const TOP_METRICS: u64 = 5;

/// `"Türk Lokumu  Gül"` → `"türk-lokumu-gül"`.
pub fn slugify(name: &str) -> String {
    name.to_lowercase()
        .split_whitespace()
        .collect::<Vec<_>>()
        .join("-")
}

fn slug_or_derived(slug: Option<String>, name: &str) -> Option<String> {
    let slug = slug
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .unwrap_or_else(|| slugify(name));
    (!slug.is_empty()).then_some(slug)
}

fn blank_to_none(value: Option<String>) -> Option<String> {
    value.map(|v| v.trim().to_string()).filter(|v| !v.is_empty())
}

/// New order of `ids` after moving the entry at `index` one step. `None` when
/// it is already at that end.
pub fn reorder(ids: &[Uuid], index: usize, direction: Direction) -> Option<Vec<Uuid>> {
    let target = match direction {
        Direction::Up => index.checked_sub(1)?,
        Direction::Down => index + 1,
    };
    if index >= ids.len() || target >= ids.len() {
        return None;
    }
    let mut order = ids.to_vec();
    order.swap(index, target);
    Some(order)
}

/// Rows whose position changes when `order` is numbered `0..n`.
pub fn changed_positions(current: &[(Uuid, i32)], order: &[Uuid]) -> Vec<(Uuid, i32)> {
    let before: HashMap<Uuid, i32> = current.iter().copied().collect();
    order
        .iter()
        .enumerate()
        .map(|(position, id)| (*id, position as i32))
        .filter(|(id, position)| before.get(id) != Some(position))
        .collect()
}

/// Invalidates every cached catalog payload and writes the audit row.
async fn after_mutation(
    state: &AppState,
    user: &AuthUser,
    action: &str,
    resource: &str,
    metadata: serde_json::Value,
) {
    state.cache.invalidate_all().await;
    audit::record(state, user, action, resource, metadata).await;
}

// ---- overview ----

pub async fn overview(state: &AppState) -> AppResult<ApiResponse<Overview>> {
    let (product_count, category_count, top_liked, top_clicked) = tokio::try_join!(
        Products::find().count(&state.orm),
        Categories::find().count(&state.orm),
        ProductStats::find()
            .order_by_desc(StatCol::Likes)
            .limit(TOP_METRICS)
            .all(&state.orm),
        ProductStats::find()
            .order_by_desc(StatCol::Clicks)
            .limit(TOP_METRICS)
            .all(&state.orm),
    )?;

    let top_liked = metric_rows(state, top_liked).await?;
    let top_clicked = metric_rows(state, top_clicked).await?;

    Ok(ApiResponse::success(
        "Overview",
        Overview {
            product_count,
            category_count,
            top_liked,
            top_clicked,
        },
        Some(Meta::empty()),
    ))
}

/// Names the stats rows. Without any stats the first products are listed with zero metrics.
async fn metric_rows(state: &AppState, stats: Vec<StatModel>) -> AppResult<Vec<MetricRow>> {
    if stats.is_empty() {
        return Ok(Products::find()
            .order_by_asc(ProdCol::Name)
            .limit(TOP_METRICS)
            .all(&state.orm)
            .await?
            .into_iter()
            .map(|p| MetricRow {
                product_id: p.id,
                name: p.name,
                likes: 0,
                clicks: 0,
            })
            .collect());
    }

    let names: HashMap<Uuid, String> = Products::find()
        .filter(ProdCol::Id.is_in(stats.iter().map(|s| s.product_id)))
        .all(&state.orm)
        .await?
        .into_iter()
        .map(|p| (p.id, p.name))
        .collect();

    Ok(stats
        .into_iter()
        .map(|s| MetricRow {
            name: names.get(&s.product_id).cloned().unwrap_or_default(),
            product_id: s.product_id,
            likes: s.likes,
            clicks: s.clicks,
        })
        .collect())
}

// ---- products ----

pub async fn list_products(state: &AppState) -> AppResult<ApiResponse<AdminProductList>> {
    let items = Products::find()
        .order_by_asc(ProdCol::SortOrder)
        .order_by_asc(ProdCol::Name)
        .all(&state.orm)
        .await?
        .into_iter()
        .map(product_from_entity)
        .collect();
    Ok(ApiResponse::success("Products", AdminProductList { items }, None))
}

fn validate_product(input: &ProductInput) -> AppResult<()> {
    if input.name.trim().is_empty() {
        return Err(AppError::BadRequest("Missing fields".into()));
    }
    if input.price < 0 {
        return Err(AppError::BadRequest("INVALID_PRICE".into()));
    }
    if input.stock < 0 {
        return Err(AppError::BadRequest("INVALID_STOCK".into()));
    }
    Ok(())
}

pub async fn create_product(
    state: &AppState,
    user: &AuthUser,
    payload: ProductInput,
) -> AppResult<ApiResponse<Product>> {
    validate_product(&payload)?;
    let sort_order = match payload.sort_order {
        Some(order) => order,
        None => next_sort_order(state, payload.category_id).await?,
    };

    let product = ProductActive {
        id: Set(Uuid::new_v4()),
        slug: Set(slug_or_derived(payload.slug, &payload.name)),
        name: Set(payload.name.trim().to_string()),
        description: Set(blank_to_none(payload.description)),
        price: Set(payload.price),
        image_url: Set(blank_to_none(payload.image_url)),
        image_alt: Set(blank_to_none(payload.image_alt)),
        category_id: Set(payload.category_id),
        stock: Set(payload.stock),
        sort_order: Set(sort_order),
        is_featured: Set(payload.is_featured),
        likes: Set(0),
        seo_title: Set(blank_to_none(payload.seo_title)),
        seo_desc: Set(blank_to_none(payload.seo_desc)),
        important_html: Set(blank_to_none(payload.important_html)),
        created_at: NotSet,
    }
    .insert(&state.orm)
    .await?;

    after_mutation(state, user, "product_create", "products", json!({ "product_id": product.id })).await;
    Ok(ApiResponse::success(
        "Product created",
        product_from_entity(product),
        Some(Meta::empty()),
    ))
}

async fn next_sort_order(state: &AppState, category_id: Option<Uuid>) -> AppResult<i32> {
    let last = Products::find()
        .filter(match category_id {
            Some(id) => ProdCol::CategoryId.eq(id),
            None => ProdCol::CategoryId.is_null(),
        })
        .order_by_desc(ProdCol::SortOrder)
        .one(&state.orm)
        .await?;
    Ok(last.map(|p| p.sort_order + 1).unwrap_or(0))
}

pub async fn update_product(
    state: &AppState,
    user: &AuthUser,
    id: Uuid,
    payload: ProductInput,
) -> AppResult<ApiResponse<Product>> {
    validate_product(&payload)?;
    let existing = Products::find_by_id(id)
        .one(&state.orm)
        .await?
        .ok_or(AppError::NotFound)?;

    let mut active: ProductActive = existing.into();
    active.slug = Set(slug_or_derived(payload.slug, &payload.name));
    active.name = Set(payload.name.trim().to_string());
    active.description = Set(blank_to_none(payload.description));
    active.price = Set(payload.price);
    active.image_url = Set(blank_to_none(payload.image_url));
    active.image_alt = Set(blank_to_none(payload.image_alt));
    active.category_id = Set(payload.category_id);
    active.stock = Set(payload.stock);
    if let Some(sort_order) = payload.sort_order {
        active.sort_order = Set(sort_order);
    }
    active.is_featured = Set(payload.is_featured);
    active.seo_title = Set(blank_to_none(payload.seo_title));
    active.seo_desc = Set(blank_to_none(payload.seo_desc));
    active.important_html = Set(blank_to_none(payload.important_html));
    let product = active.update(&state.orm).await?;

    after_mutation(state, user, "product_update", "products", json!({ "product_id": id })).await;
    Ok(ApiResponse::success(
        "Product updated",
        product_from_entity(product),
        Some(Meta::empty()),
    ))
}

pub async fn delete_product(
    state: &AppState,
    user: &AuthUser,
    id: Uuid,
) -> AppResult<ApiResponse<serde_json::Value>> {
    let result = Products::delete_by_id(id).exec(&state.orm).await?;
    if result.rows_affected == 0 {
        return Err(AppError::NotFound);
    }

    after_mutation(state, user, "product_delete", "products", json!({ "product_id": id })).await;
    Ok(ApiResponse::success(
        "Product deleted",
        json!({ "id": id }),
        Some(Meta::empty()),
    ))
}

/// Swaps the product with its neighbour inside the same category and renumbers the siblings.
pub async fn move_product(
    state: &AppState,
    user: &AuthUser,
    id: Uuid,
    direction: Direction,
) -> AppResult<ApiResponse<AdminProductList>> {
    let product = Products::find_by_id(id)
        .one(&state.orm)
        .await?
        .ok_or(AppError::NotFound)?;

    let txn = state.orm.begin().await?;
    let siblings = Products::find()
        .filter(match product.category_id {
            Some(category_id) => ProdCol::CategoryId.eq(category_id),
            None => ProdCol::CategoryId.is_null(),
        })
        .order_by_asc(ProdCol::SortOrder)
        .order_by_asc(ProdCol::Name)
        .all(&txn)
        .await?;

    let ids: Vec<Uuid> = siblings.iter().map(|p| p.id).collect();
    let index = ids.iter().position(|p| *p == id).ok_or(AppError::NotFound)?;
    if let Some(order) = reorder(&ids, index, direction) {
        let current: Vec<(Uuid, i32)> = siblings.iter().map(|p| (p.id, p.sort_order)).collect();
        for (product_id, position) in changed_positions(&current, &order) {
            Products::update_many()
                .col_expr(ProdCol::SortOrder, Expr::value(position))
                .filter(ProdCol::Id.eq(product_id))
                .exec(&txn)
                .await?;
        }
    }
    txn.commit().await?;

    after_mutation(state, user, "product_move", "products", json!({ "product_id": id })).await;
    list_products(state).await
}

pub async fn set_sort_order(
    state: &AppState,
    user: &AuthUser,
    id: Uuid,
    sort_order: i32,
) -> AppResult<ApiResponse<Product>> {
    let existing = Products::find_by_id(id)
        .one(&state.orm)
        .await?
        .ok_or(AppError::NotFound)?;
    let mut active: ProductActive = existing.into();
    active.sort_order = Set(sort_order);
    let product = active.update(&state.orm).await?;

    after_mutation(state, user, "product_sort_order", "products", json!({ "product_id": id, "sort_order": sort_order })).await;
    Ok(ApiResponse::success("Sort order saved", product_from_entity(product), None))
}

pub async fn set_stock(
    state: &AppState,
    user: &AuthUser,
    id: Uuid,
    stock: i32,
) -> AppResult<ApiResponse<Product>> {
    if stock < 0 {
        return Err(AppError::BadRequest("INVALID_STOCK".into()));
    }
    let existing = Products::find_by_id(id)
        .one(&state.orm)
        .await?
        .ok_or(AppError::NotFound)?;
    let mut active: ProductActive = existing.into();
    active.stock = Set(stock);
    let product = active.update(&state.orm).await?;

    after_mutation(state, user, "product_stock", "products", json!({ "product_id": id, "stock": stock })).await;
    Ok(ApiResponse::success("Stock saved", product_from_entity(product), None))
}

// ---- categories ----

pub async fn list_categories(state: &AppState) -> AppResult<ApiResponse<AdminCategoryList>> {
    let items = Categories::find()
        .order_by_asc(CatCol::Position)
        .order_by_asc(CatCol::Name)
        .all(&state.orm)
        .await?
        .into_iter()
        .map(category_from_entity)
        .collect();
    Ok(ApiResponse::success("Categories", AdminCategoryList { items }, None))
}

/// Creates the category, or updates it when `id` names an existing one.
pub async fn upsert_category(
    state: &AppState,
    user: &AuthUser,
    payload: CategoryInput,
) -> AppResult<ApiResponse<Category>> {
    if payload.name.trim().is_empty() {
        return Err(AppError::BadRequest("Missing fields".into()));
    }
    let existing = match payload.id {
        Some(id) => Categories::find_by_id(id).one(&state.orm).await?,
        None => None,
    };

    let slug = slug_or_derived(payload.slug, &payload.name);
    let name = payload.name.trim().to_string();

    let category = match existing {
        Some(model) => {
            let mut active: CategoryActive = model.into();
            active.name = Set(name);
            active.slug = Set(slug);
            active.image_url = Set(blank_to_none(payload.image_url));
            active.image_alt = Set(blank_to_none(payload.image_alt));
            if let Some(position) = payload.position {
                active.position = Set(position);
            }
            active.tagline = Set(blank_to_none(payload.tagline));
            active.description = Set(blank_to_none(payload.description));
            active.seo_title = Set(blank_to_none(payload.seo_title));
            active.seo_desc = Set(blank_to_none(payload.seo_desc));
            active.update(&state.orm).await?
        }
        None => {
            let position = match payload.position {
                Some(position) => position,
                None => Categories::find()
                    .order_by_desc(CatCol::Position)
                    .one(&state.orm)
                    .await?
                    .map(|c| c.position + 1)
                    .unwrap_or(0),
            };
            CategoryActive {
                id: Set(payload.id.unwrap_or_else(Uuid::new_v4)),
                name: Set(name),
                slug: Set(slug),
                image_url: Set(blank_to_none(payload.image_url)),
                image_alt: Set(blank_to_none(payload.image_alt)),
                position: Set(position),
                tagline: Set(blank_to_none(payload.tagline)),
                description: Set(blank_to_none(payload.description)),
                seo_title: Set(blank_to_none(payload.seo_title)),
                seo_desc: Set(blank_to_none(payload.seo_desc)),
                created_at: NotSet,
            }
            .insert(&state.orm)
            .await?
        }
    };

    after_mutation(state, user, "category_upsert", "categories", json!({ "category_id": category.id })).await;
    Ok(ApiResponse::success(
        "Category saved",
        category_from_entity(category),
        Some(Meta::empty()),
    ))
}

/// Refused while any product still points at the category.
pub async fn delete_category(
    state: &AppState,
    user: &AuthUser,
    id: Uuid,
) -> AppResult<ApiResponse<serde_json::Value>> {
    let in_use = Products::find()
        .filter(ProdCol::CategoryId.eq(id))
        .count(&state.orm)
        .await?;
    if in_use > 0 {
        return Err(AppError::BadRequest("CATEGORY_IN_USE".into()));
    }

    let result = Categories::delete_by_id(id).exec(&state.orm).await?;
    if result.rows_affected == 0 {
        return Err(AppError::NotFound);
    }

    after_mutation(state, user, "category_delete", "categories", json!({ "category_id": id })).await;
    Ok(ApiResponse::success(
        "Category deleted",
        json!({ "id": id }),
        Some(Meta::empty()),
    ))
}

pub async fn move_category(
    state: &AppState,
    user: &AuthUser,
    id: Uuid,
    direction: Direction,
) -> AppResult<ApiResponse<AdminCategoryList>> {
    let txn = state.orm.begin().await?;
    let all = Categories::find()
        .order_by_asc(CatCol::Position)
        .order_by_asc(CatCol::Name)
        .all(&txn)
        .await?;

    let ids: Vec<Uuid> = all.iter().map(|c| c.id).collect();
    let index = ids.iter().position(|c| *c == id).ok_or(AppError::NotFound)?;
    if let Some(order) = reorder(&ids, index, direction) {
        let current: Vec<(Uuid, i32)> = all.iter().map(|c| (c.id, c.position)).collect();
        for (category_id, position) in changed_positions(&current, &order) {
            Categories::update_many()
                .col_expr(CatCol::Position, Expr::value(position))
                .filter(CatCol::Id.eq(category_id))
                .exec(&txn)
                .await?;
        }
    }
    txn.commit().await?;

    after_mutation(state, user, "category_move", "categories", json!({ "category_id": id })).await;
    list_categories(state).await
}

// ---- product images ----

pub async fn list_images(state: &AppState, product_id: Uuid) -> AppResult<ApiResponse<ImageList>> {
    let items = ProductImages::find()
        .filter(ImageCol::ProductId.eq(product_id))
        .order_by_asc(ImageCol::Position)
        .all(&state.orm)
        .await?
        .into_iter()
        .map(image_from_entity)
        .collect();
    Ok(ApiResponse::success("Images", ImageList { items }, None))
}

/// Appends after the current last image.
pub async fn add_image(
    state: &AppState,
    user: &AuthUser,
    product_id: Uuid,
    payload: ImageInput,
) -> AppResult<ApiResponse<ProductImage>> {
    let url = payload.url.trim().to_string();
    if url.is_empty() {
        return Err(AppError::BadRequest("Missing fields".into()));
    }
    Products::find_by_id(product_id)
        .one(&state.orm)
        .await?
        .ok_or(AppError::NotFound)?;

    let position = ProductImages::find()
        .filter(ImageCol::ProductId.eq(product_id))
        .order_by_desc(ImageCol::Position)
        .one(&state.orm)
        .await?
        .map(|img| img.position + 1)
        .unwrap_or(0);

    let image = ImageActive {
        id: Set(Uuid::new_v4()),
        product_id: Set(product_id),
        url: Set(url),
        image_alt: Set(blank_to_none(payload.image_alt)),
        position: Set(position),
        created_at: NotSet,
    }
    .insert(&state.orm)
    .await?;

    after_mutation(state, user, "image_add", "product_images", json!({ "product_id": product_id, "image_id": image.id })).await;
    Ok(ApiResponse::success("Image added", image_from_entity(image), Some(Meta::empty())))
}

pub async fn update_image_alt(
    state: &AppState,
    user: &AuthUser,
    image_id: Uuid,
    payload: ImageAltRequest,
) -> AppResult<ApiResponse<ProductImage>> {
    let existing = ProductImages::find_by_id(image_id)
        .one(&state.orm)
        .await?
        .ok_or(AppError::NotFound)?;
    let mut active: ImageActive = existing.into();
    active.image_alt = Set(blank_to_none(payload.image_alt));
    let image = active.update(&state.orm).await?;

    after_mutation(state, user, "image_alt", "product_images", json!({ "image_id": image_id })).await;
    Ok(ApiResponse::success("Image updated", image_from_entity(image), None))
}

pub async fn move_image(
    state: &AppState,
    user: &AuthUser,
    image_id: Uuid,
    direction: Direction,
) -> AppResult<ApiResponse<ImageList>> {
    let image = ProductImages::find_by_id(image_id)
        .one(&state.orm)
        .await?
        .ok_or(AppError::NotFound)?;

    let txn = state.orm.begin().await?;
    let siblings = ProductImages::find()
        .filter(ImageCol::ProductId.eq(image.product_id))
        .order_by_asc(ImageCol::Position)
        .order_by_asc(ImageCol::CreatedAt)
        .all(&txn)
        .await?;

    let ids: Vec<Uuid> = siblings.iter().map(|i| i.id).collect();
    let index = ids.iter().position(|i| *i == image_id).ok_or(AppError::NotFound)?;
    if let Some(order) = reorder(&ids, index, direction) {
        let current: Vec<(Uuid, i32)> = siblings.iter().map(|i| (i.id, i.position)).collect();
        for (id, position) in changed_positions(&current, &order) {
            ProductImages::update_many()
                .col_expr(ImageCol::Position, Expr::value(position))
                .filter(ImageCol::Id.eq(id))
                .exec(&txn)
                .await?;
        }
    }
    txn.commit().await?;

    after_mutation(state, user, "image_move", "product_images", json!({ "image_id": image_id })).await;
    list_images(state, image.product_id).await
}

pub async fn delete_image(
    state: &AppState,
    user: &AuthUser,
    image_id: Uuid,
) -> AppResult<ApiResponse<serde_json::Value>> {
    let result = ProductImages::delete_by_id(image_id).exec(&state.orm).await?;
    if result.rows_affected == 0 {
        return Err(AppError::NotFound);
    }

    after_mutation(state, user, "image_delete", "product_images", json!({ "image_id": image_id })).await;
    Ok(ApiResponse::success(
        "Image deleted",
        json!({ "id": image_id }),
        Some(Meta::empty()),
    ))
}
