use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::{
    models::{Category, Product, ProductImage},
    richtext::{Command, Selection},
};

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct MetricRow {
    pub product_id: Uuid,
    pub name: String,
    pub likes: i32,
    pub clicks: i32,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct Overview {
    pub product_count: u64,
    pub category_count: u64,
    pub top_liked: Vec<MetricRow>,
    pub top_clicked: Vec<MetricRow>,
}

#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct ProductInput {
    pub name: String,
    #[serde(default)]
    pub slug: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    /// Price in cents.
    pub price: i64,
    #[serde(default)]
    pub image_url: Option<String>,
    #[serde(default)]
    pub image_alt: Option<String>,
    #[serde(default)]
    pub category_id: Option<Uuid>,
    #[serde(default)]
    pub stock: i32,
    #[serde(default)]
    pub sort_order: Option<i32>,
    #[serde(default)]
    pub is_featured: bool,
    #[serde(default)]
    pub seo_title: Option<String>,
    #[serde(default)]
    pub seo_desc: Option<String>,
    #[serde(default)]
    pub important_html: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    Up,
    Down,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct MoveRequest {
    pub direction: Direction,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct SortOrderRequest {
    pub sort_order: i32,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct StockRequest {
    pub stock: i32,
}

#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct CategoryInput {
    /// Present when updating an existing category.
    #[serde(default)]
    pub id: Option<Uuid>,
    pub name: String,
    #[serde(default)]
    pub slug: Option<String>,
    #[serde(default)]
    pub image_url: Option<String>,
    #[serde(default)]
    pub image_alt: Option<String>,
    #[serde(default)]
    pub position: Option<i32>,
    #[serde(default)]
    pub tagline: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub seo_title: Option<String>,
    #[serde(default)]
    pub seo_desc: Option<String>,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct ImageInput {
    pub url: String,
    #[serde(default)]
    pub image_alt: Option<String>,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct ImageAltRequest {
    #[serde(default)]
    pub image_alt: Option<String>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct AdminProductList {
    pub items: Vec<Product>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct AdminCategoryList {
    pub items: Vec<Category>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct ImageList {
    pub items: Vec<ProductImage>,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct RichTextRequest {
    pub selection: Option<Selection>,
    #[serde(default)]
    pub commands: Vec<Command>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct RichTextResponse {
    pub key: String,
    pub html: String,
}
