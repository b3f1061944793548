use serde::Deserialize;
use utoipa::ToSchema;
use uuid::Uuid;

use crate::listing::parse_page;

#[derive(Debug, Default, Deserialize, ToSchema)]
pub struct Pagination {
    pub page: Option<i64>,
    pub per_page: Option<i64>,
}

impl Pagination {
    pub fn normalize(&self) -> (i64, i64, i64) {
        let page = self.page.unwrap_or(1).max(1);
        let per_page = self.per_page.unwrap_or(20).clamp(1, 100);
        let offset = (page - 1) * per_page;
        (page, per_page, offset)
    }
}

#[derive(Debug, Clone, Copy, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum SortOrder {
    Asc,
    Desc,
}

/// `sort` stays a raw string so unknown values fall back instead of failing the request.
#[derive(Debug, Default, Deserialize, ToSchema)]
pub struct ListingQuery {
    pub category_id: Option<Uuid>,
    pub sort: Option<String>,
}

#[derive(Debug, Default, Deserialize, ToSchema)]
pub struct LimitQuery {
    pub limit: Option<i64>,
}

#[derive(Debug, Default, Deserialize, ToSchema)]
pub struct PageQuery {
    pub page: Option<String>,
}

impl PageQuery {
    pub fn page(&self) -> i64 {
        parse_page(self.page.as_deref())
    }
}

#[derive(Debug, Default, Deserialize, ToSchema)]
pub struct RevalidateQuery {
    pub path: Option<String>,
}

#[derive(Debug, Default, Deserialize, ToSchema)]
pub struct SubscriberQuery {
    pub page: Option<i64>,
    pub per_page: Option<i64>,
    pub verified: Option<bool>,
    pub sort_order: Option<SortOrder>,
}

impl SubscriberQuery {
    pub fn pagination(&self) -> Pagination {
        Pagination {
            page: self.page,
            per_page: self.per_page,
        }
    }
}
