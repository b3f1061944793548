use std::collections::{HashMap, HashSet};

use chrono::Utc;
use sea_orm::{ColumnTrait, EntityTrait, QueryFilter, QueryOrder, QuerySelect};
use serde_json::Value;
use uuid::Uuid;

use crate::{
    cache::CatalogCache,
    dto::catalog::{
        Breadcrumb, CarouselSet, CategoryDetail, CategoryList, HomeData, ListingData,
        ProductDetail, StockState,
    },
    entity::{
        categories::{Column as CatCol, Entity as Categories, Model as CategoryModel},
        product_images::{Column as ImageCol, Entity as ProductImages, Model as ImageModel},
        product_stats::{Column as StatCol, Entity as ProductStats},
        products::{Column as ProdCol, Entity as Products, Model as ProductModel},
    },
    error::{AppError, AppResult},
    i18n::Locale,
    listing::{SortKey, sort_options, sort_products},
    models::{Category, Product, ProductImage},
    response::ApiResponse,
    routes::params::ListingQuery,
    services::review_service,
    state::AppState,
};

pub const HOME_TESTIMONIALS: u64 = 12;
pub const MOST_LIKED_LIMIT: u64 = 24;
pub const RELATED_LIMIT: usize = 8;

pub async fn home(state: &AppState, locale: Locale) -> AppResult<ApiResponse<Value>> {
    let key = CatalogCache::key("/", locale.as_str());
    let data = state.cache.get_or_load(key, || load_home(state)).await?;
    Ok(ApiResponse::success("Home", data, None))
}

async fn load_home(state: &AppState) -> AppResult<HomeData> {
    let settings = state.site_settings().await;

    let hero = Categories::find()
        .order_by_asc(CatCol::Position)
        .order_by_asc(CatCol::Name)
        .all(&state.orm)
        .await?
        .into_iter()
        .map(category_from_entity)
        .collect();

    let featured = if settings.home_show_featured {
        let items = Products::find()
            .filter(ProdCol::IsFeatured.eq(true))
            .order_by_asc(ProdCol::SortOrder)
            .order_by_asc(ProdCol::Name)
            .all(&state.orm)
            .await?
            .into_iter()
            .map(product_from_entity)
            .collect();
        Some(items)
    } else {
        None
    };

    let most_liked = if settings.home_show_most_liked {
        Some(most_liked_products(state, MOST_LIKED_LIMIT).await?)
    } else {
        None
    };

    let testimonials = review_service::latest(state, HOME_TESTIMONIALS).await?;

    Ok(HomeData {
        hero,
        featured,
        most_liked,
        testimonials,
        parallax: settings.parallax.render(),
        carousels: CarouselSet::default(),
    })
}

/// Top products by `product_stats.likes`; falls back to the legacy
/// `products.likes` column while no stats have been recorded.
pub async fn most_liked_products(state: &AppState, limit: u64) -> AppResult<Vec<Product>> {
    let stats = ProductStats::find()
        .filter(StatCol::Likes.gt(0))
        .order_by_desc(StatCol::Likes)
        .limit(limit)
        .all(&state.orm)
        .await?;

    if stats.is_empty() {
        let items = Products::find()
            .order_by_desc(ProdCol::Likes)
            .order_by_asc(ProdCol::Name)
            .limit(limit)
            .all(&state.orm)
            .await?
            .into_iter()
            .map(product_from_entity)
            .collect();
        return Ok(items);
    }

    let ids: Vec<Uuid> = stats.iter().map(|s| s.product_id).collect();
    let mut by_id: HashMap<Uuid, Product> = Products::find()
        .filter(ProdCol::Id.is_in(ids))
        .all(&state.orm)
        .await?
        .into_iter()
        .map(|m| (m.id, product_from_entity(m)))
        .collect();

    Ok(stats
        .iter()
        .filter_map(|stat| {
            by_id.remove(&stat.product_id).map(|mut product| {
                product.likes = stat.likes;
                product
            })
        })
        .collect())
}

pub async fn listing(
    state: &AppState,
    locale: Locale,
    query: ListingQuery,
) -> AppResult<ApiResponse<Value>> {
    let sort = SortKey::parse(query.sort.as_deref());
    let variant = format!(
        "{}|{}|{}",
        query.category_id.map(|id| id.to_string()).unwrap_or_default(),
        sort.as_str(),
        locale
    );
    let key = CatalogCache::key("/products", &variant);
    let data = state
        .cache
        .get_or_load(key, || load_listing(state, locale, query.category_id, sort))
        .await?;
    Ok(ApiResponse::success("Products", data, None))
}

async fn load_listing(
    state: &AppState,
    locale: Locale,
    category_id: Option<Uuid>,
    sort: SortKey,
) -> AppResult<ListingData> {
    let mut finder = Products::find().order_by_asc(ProdCol::Name);
    if let Some(category_id) = category_id {
        finder = finder.filter(ProdCol::CategoryId.eq(category_id));
    }
    let mut items: Vec<Product> = finder
        .all(&state.orm)
        .await?
        .into_iter()
        .map(product_from_entity)
        .collect();

    let likes = if sort.needs_likes() {
        let ids: Vec<Uuid> = items.iter().map(|p| p.id).collect();
        likes_for(state, ids).await?
    } else {
        HashMap::new()
    };
    sort_products(&mut items, sort, &likes);

    let categories = Categories::find()
        .order_by_asc(CatCol::Name)
        .all(&state.orm)
        .await?
        .into_iter()
        .map(category_from_entity)
        .collect();

    Ok(ListingData {
        items,
        categories,
        sort,
        sort_options: sort_options(locale.messages(), sort),
        category_id,
    })
}

/// Like counts from `product_stats` for the given products. Missing rows are absent.
pub async fn likes_for(state: &AppState, ids: Vec<Uuid>) -> AppResult<HashMap<Uuid, i32>> {
    if ids.is_empty() {
        return Ok(HashMap::new());
    }
    Ok(ProductStats::find()
        .filter(StatCol::ProductId.is_in(ids))
        .all(&state.orm)
        .await?
        .into_iter()
        .map(|s| (s.product_id, s.likes))
        .collect())
}

pub async fn product_detail(
    state: &AppState,
    locale: Locale,
    slug_or_id: String,
) -> AppResult<ApiResponse<Value>> {
    let key = CatalogCache::key(&format!("/products/{slug_or_id}"), locale.as_str());
    let data = state
        .cache
        .get_or_load(key, || load_product_detail(state, &slug_or_id))
        .await?;
    Ok(ApiResponse::success("Product", data, None))
}

async fn load_product_detail(state: &AppState, slug_or_id: &str) -> AppResult<ProductDetail> {
    let product = find_product(state, slug_or_id).await?.ok_or(AppError::NotFound)?;

    let category = match product.category_id {
        Some(category_id) => Categories::find_by_id(category_id)
            .one(&state.orm)
            .await?
            .map(|c| Breadcrumb {
                id: c.id,
                name: c.name,
                slug: c.slug,
            }),
        None => None,
    };

    let images = ProductImages::find()
        .filter(ImageCol::ProductId.eq(product.id))
        .order_by_asc(ImageCol::Position)
        .all(&state.orm)
        .await?
        .into_iter()
        .map(image_from_entity)
        .collect();

    let likes = ProductStats::find_by_id(product.id)
        .one(&state.orm)
        .await?
        .map(|s| s.likes)
        .unwrap_or(product.likes);

    let related = related_products(state, &product).await?;

    Ok(ProductDetail {
        stock_state: StockState::from_stock(product.stock),
        product: product_from_entity(product),
        category,
        images,
        likes,
        related,
    })
}

/// Slug first, then id.
async fn find_product(state: &AppState, slug_or_id: &str) -> AppResult<Option<ProductModel>> {
    let by_slug = Products::find()
        .filter(ProdCol::Slug.eq(slug_or_id))
        .one(&state.orm)
        .await?;
    if by_slug.is_some() {
        return Ok(by_slug);
    }
    match Uuid::parse_str(slug_or_id) {
        Ok(id) => Ok(Products::find_by_id(id).one(&state.orm).await?),
        Err(_) => Ok(None),
    }
}

/// Same category first, topped up with the newest other products.
async fn related_products(state: &AppState, product: &ProductModel) -> AppResult<Vec<Product>> {
    let mut related: Vec<ProductModel> = match product.category_id {
        Some(category_id) => {
            Products::find()
                .filter(ProdCol::CategoryId.eq(category_id))
                .filter(ProdCol::Id.ne(product.id))
                .order_by_asc(ProdCol::SortOrder)
                .order_by_asc(ProdCol::Name)
                .limit(RELATED_LIMIT as u64)
                .all(&state.orm)
                .await?
        }
        None => Vec::new(),
    };

    if related.len() < RELATED_LIMIT {
        let mut taken: HashSet<Uuid> = related.iter().map(|p| p.id).collect();
        taken.insert(product.id);
        let newest = Products::find()
            .filter(ProdCol::Id.is_not_in(taken.iter().copied()))
            .order_by_desc(ProdCol::CreatedAt)
            .limit((RELATED_LIMIT - related.len()) as u64)
            .all(&state.orm)
            .await?;
        related.extend(newest);
    }

    Ok(related.into_iter().map(product_from_entity).collect())
}

pub async fn categories(state: &AppState) -> AppResult<ApiResponse<Value>> {
    let key = CatalogCache::key("/categories", "all");
    let data = state
        .cache
        .get_or_load(key, || async {
            let items = Categories::find()
                .order_by_asc(CatCol::Position)
                .order_by_asc(CatCol::Name)
                .all(&state.orm)
                .await?
                .into_iter()
                .map(category_from_entity)
                .collect();
            Ok::<_, AppError>(CategoryList { items })
        })
        .await?;
    Ok(ApiResponse::success("Categories", data, None))
}

pub async fn category_detail(state: &AppState, slug_or_id: String) -> AppResult<ApiResponse<Value>> {
    let key = CatalogCache::key(&format!("/category/{slug_or_id}"), "all");
    let data = state
        .cache
        .get_or_load(key, || load_category_detail(state, &slug_or_id))
        .await?;
    Ok(ApiResponse::success("Category", data, None))
}

async fn load_category_detail(state: &AppState, slug_or_id: &str) -> AppResult<CategoryDetail> {
    let mut category = Categories::find()
        .filter(CatCol::Slug.eq(slug_or_id))
        .one(&state.orm)
        .await?;
    if category.is_none() {
        if let Ok(id) = Uuid::parse_str(slug_or_id) {
            category = Categories::find_by_id(id).one(&state.orm).await?;
        }
    }
    let category = category.ok_or(AppError::NotFound)?;

    let products = Products::find()
        .filter(ProdCol::CategoryId.eq(category.id))
        .order_by_asc(ProdCol::SortOrder)
        .order_by_asc(ProdCol::Name)
        .all(&state.orm)
        .await?
        .into_iter()
        .map(product_from_entity)
        .collect();

    Ok(CategoryDetail {
        category: category_from_entity(category),
        products,
    })
}

/// Storefront path of a product, used by the short `/product/{id}` links in emails.
/// Products without a slug have no page to land on.
pub async fn product_path(state: &AppState, id: Uuid) -> AppResult<String> {
    let product = Products::find_by_id(id)
        .one(&state.orm)
        .await?
        .ok_or(AppError::NotFound)?;
    slug_path(product.slug.as_deref()).ok_or(AppError::NotFound)
}

pub fn slug_path(slug: Option<&str>) -> Option<String> {
    let slug = slug.map(str::trim).filter(|s| !s.is_empty())?;
    Some(format!("/products/{slug}"))
}

pub(crate) fn product_from_entity(model: ProductModel) -> Product {
    Product {
        id: model.id,
        name: model.name,
        slug: model.slug,
        description: model.description,
        price: model.price,
        image_url: model.image_url,
        image_alt: model.image_alt,
        category_id: model.category_id,
        stock: model.stock,
        sort_order: model.sort_order,
        is_featured: model.is_featured,
        likes: model.likes,
        seo_title: model.seo_title,
        seo_desc: model.seo_desc,
        important_html: model.important_html,
        created_at: model.created_at.with_timezone(&Utc),
    }
}

pub(crate) fn category_from_entity(model: CategoryModel) -> Category {
    Category {
        id: model.id,
        name: model.name,
        slug: model.slug,
        image_url: model.image_url,
        image_alt: model.image_alt,
        position: model.position,
        tagline: model.tagline,
        description: model.description,
        seo_title: model.seo_title,
        seo_desc: model.seo_desc,
    }
}

pub(crate) fn image_from_entity(model: ImageModel) -> ProductImage {
    ProductImage {
        id: model.id,
        product_id: model.product_id,
        url: model.url,
        image_alt: model.image_alt,
        position: model.position,
    }
}
