//! Sort and pagination rules shared by the product listings and the review pages.

use std::cmp::Ordering;
use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::i18n::Messages;
use crate::models::Product;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum SortKey {
    Name,
    PriceAsc,
    PriceDesc,
    #[default]
    MostLiked,
    AdminOrder,
}

impl SortKey {
    pub const ALL: [SortKey; 5] = [
        SortKey::AdminOrder,
        SortKey::MostLiked,
        SortKey::PriceAsc,
        SortKey::PriceDesc,
        SortKey::Name,
    ];

    /// Lenient parse for URL parameters; unknown values use the default order.
    pub fn parse(raw: Option<&str>) -> Self {
        match raw.map(str::trim) {
            Some("name") => SortKey::Name,
            Some("price_asc") => SortKey::PriceAsc,
            Some("price_desc") => SortKey::PriceDesc,
            Some("most_liked") => SortKey::MostLiked,
            Some("admin_order") => SortKey::AdminOrder,
            _ => SortKey::default(),
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            SortKey::Name => "name",
            SortKey::PriceAsc => "price_asc",
            SortKey::PriceDesc => "price_desc",
            SortKey::MostLiked => "most_liked",
            SortKey::AdminOrder => "admin_order",
        }
    }

    /// Whether the order needs the like counts from `product_stats`.
    pub fn needs_likes(&self) -> bool {
        matches!(self, SortKey::MostLiked)
    }

    fn label_key(&self) -> &'static str {
        match self {
            SortKey::Name => "sort_name",
            SortKey::PriceAsc => "sort_price_asc",
            SortKey::PriceDesc => "sort_price_desc",
            SortKey::MostLiked => "sort_most_liked",
            SortKey::AdminOrder => "sort_admin",
        }
    }

    fn fallback_label(&self) -> &'static str {
        match self {
            SortKey::Name => "Name (A-Z)",
            SortKey::PriceAsc => "Price (Low-High)",
            SortKey::PriceDesc => "Price (High-Low)",
            SortKey::MostLiked => "Most Liked",
            SortKey::AdminOrder => "Recommended",
        }
    }
}

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct SortOption {
    pub value: SortKey,
    pub label: String,
    pub selected: bool,
}

pub fn sort_options(messages: &Messages, selected: SortKey) -> Vec<SortOption> {
    SortKey::ALL
        .iter()
        .map(|key| SortOption {
            value: *key,
            label: messages.t_or("common", key.label_key(), key.fallback_label()),
            selected: *key == selected,
        })
        .collect()
}

/// Orders products in memory. `slice::sort_by` is stable, so ties keep the
/// order the rows arrived in.
pub fn sort_products(products: &mut [Product], sort: SortKey, likes: &HashMap<Uuid, i32>) {
    match sort {
        SortKey::PriceAsc => products.sort_by(|a, b| a.price.cmp(&b.price)),
        SortKey::PriceDesc => products.sort_by(|a, b| b.price.cmp(&a.price)),
        SortKey::MostLiked => products.sort_by(|a, b| {
            let la = likes.get(&a.id).copied().unwrap_or(0);
            let lb = likes.get(&b.id).copied().unwrap_or(0);
            lb.cmp(&la)
        }),
        SortKey::AdminOrder => products.sort_by(|a, b| {
            a.sort_order
                .cmp(&b.sort_order)
                .then_with(|| compare_names(&a.name, &b.name))
        }),
        SortKey::Name => products.sort_by(|a, b| compare_names(&a.name, &b.name)),
    }
}

fn compare_names(a: &str, b: &str) -> Ordering {
    a.to_lowercase().cmp(&b.to_lowercase())
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, ToSchema)]
pub struct PageWindow {
    pub page: i64,
    pub per_page: i64,
    pub total: i64,
    pub total_pages: i64,
}

impl PageWindow {
    /// `page` is clamped into `1..=total_pages`; there is always at least one page.
    pub fn new(total: i64, per_page: i64, page: i64) -> Self {
        let per_page = per_page.max(1);
        let total = total.max(0);
        let total_pages = ((total + per_page - 1) / per_page).max(1);
        let page = page.clamp(1, total_pages);
        Self {
            page,
            per_page,
            total,
            total_pages,
        }
    }

    pub fn offset(&self) -> i64 {
        (self.page - 1) * self.per_page
    }

    pub fn limit(&self) -> i64 {
        self.per_page
    }

    pub fn has_prev(&self) -> bool {
        self.page > 1
    }

    pub fn has_next(&self) -> bool {
        self.page < self.total_pages
    }

    /// Page numbers shown around the current page.
    pub fn visible_pages(&self) -> Vec<i64> {
        let first = (self.page - 2).max(1);
        let last = (self.page + 2).min(self.total_pages);
        (first..=last).collect()
    }
}

/// Parses a `page` query value the way the review page does: anything
/// unparsable is page one.
pub fn parse_page(raw: Option<&str>) -> i64 {
    raw.and_then(|v| v.trim().parse::<i64>().ok())
        .unwrap_or(1)
        .max(1)
}
