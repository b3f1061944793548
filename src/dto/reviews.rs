use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::models::Testimonial;

#[derive(Debug, Deserialize, ToSchema)]
pub struct CreateTestimonialRequest {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub rating: Option<i32>,
    #[serde(default)]
    pub message: Option<String>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct ReviewPage {
    pub items: Vec<Testimonial>,
    pub has_prev: bool,
    pub has_next: bool,
    /// Page links shown around the current page.
    pub pages: Vec<i64>,
}
