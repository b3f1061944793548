use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::{
    carousel::CarouselConfig,
    listing::{SortKey, SortOption},
    models::{Category, Product, ProductImage, Testimonial},
    settings::ParallaxBlock,
};

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ProductList {
    pub items: Vec<Product>,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct CategoryList {
    pub items: Vec<Category>,
}

#[derive(Debug, Clone, Copy, Serialize, ToSchema)]
pub struct CarouselSet {
    pub hero: CarouselConfig,
    pub featured: CarouselConfig,
    pub most_liked: CarouselConfig,
    pub related: CarouselConfig,
}

impl Default for CarouselSet {
    fn default() -> Self {
        Self {
            hero: CarouselConfig::hero(),
            featured: CarouselConfig::featured(),
            most_liked: CarouselConfig::most_liked(),
            related: CarouselConfig::related(),
        }
    }
}

#[derive(Debug, Serialize, ToSchema)]
pub struct HomeData {
    pub hero: Vec<Category>,
    /// `None` when the section is switched off in the settings.
    pub featured: Option<Vec<Product>>,
    pub most_liked: Option<Vec<Product>>,
    pub testimonials: Vec<Testimonial>,
    pub parallax: ParallaxBlock,
    pub carousels: CarouselSet,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct ListingData {
    pub items: Vec<Product>,
    pub categories: Vec<Category>,
    pub sort: SortKey,
    pub sort_options: Vec<SortOption>,
    pub category_id: Option<Uuid>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum StockState {
    Out,
    Low,
    In,
}

impl StockState {
    pub fn from_stock(stock: i32) -> Self {
        if stock <= 0 {
            StockState::Out
        } else if stock <= 5 {
            StockState::Low
        } else {
            StockState::In
        }
    }
}

#[derive(Debug, Serialize, ToSchema)]
pub struct Breadcrumb {
    pub id: Uuid,
    pub name: String,
    pub slug: Option<String>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct ProductDetail {
    pub product: Product,
    pub category: Option<Breadcrumb>,
    pub images: Vec<ProductImage>,
    pub stock_state: StockState,
    pub likes: i32,
    pub related: Vec<Product>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct CategoryDetail {
    pub category: Category,
    pub products: Vec<Product>,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct LikeCount {
    pub product_id: Uuid,
    pub likes: i32,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ViewCount {
    pub product_id: Uuid,
    pub clicks: i32,
}
