use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ActiveValue::NotSet, ColumnTrait, EntityTrait, PaginatorTrait, QueryFilter,
    QueryOrder, QuerySelect, Set,
};
use uuid::Uuid;

use crate::{
    dto::reviews::{CreateTestimonialRequest, ReviewPage},
    entity::testimonials::{ActiveModel, Column, Entity as Testimonials, Model as TestimonialModel},
    error::{AppError, AppResult},
    listing::PageWindow,
    models::Testimonial,
    response::{ApiResponse, Meta},
    state::AppState,
};

pub const DEFAULT_LIMIT: i64 = 12;
pub const REVIEWS_PER_PAGE: i64 = 3;
pub const REVIEW_COOKIE: &str = "tmnls_today";
pub const REVIEW_COOKIE_MAX_AGE: i64 = 60 * 60 * 24;

pub fn clamp_limit(limit: Option<i64>) -> u64 {
    limit.unwrap_or(DEFAULT_LIMIT).clamp(1, 100) as u64
}

/// Approved testimonials, newest first.
pub async fn latest(state: &AppState, limit: u64) -> AppResult<Vec<Testimonial>> {
    Ok(Testimonials::find()
        .filter(Column::Approved.eq(true))
        .order_by_desc(Column::CreatedAt)
        .limit(limit)
        .all(&state.orm)
        .await?
        .into_iter()
        .map(testimonial_from_entity)
        .collect())
}

pub async fn review_page(state: &AppState, page: i64) -> AppResult<ApiResponse<ReviewPage>> {
    let finder = Testimonials::find()
        .filter(Column::Approved.eq(true))
        .order_by_desc(Column::CreatedAt);

    let total = finder.clone().count(&state.orm).await? as i64;
    let window = PageWindow::new(total, REVIEWS_PER_PAGE, page);

    let items = finder
        .limit(window.limit() as u64)
        .offset(window.offset() as u64)
        .all(&state.orm)
        .await?
        .into_iter()
        .map(testimonial_from_entity)
        .collect();

    let data = ReviewPage {
        items,
        has_prev: window.has_prev(),
        has_next: window.has_next(),
        pages: window.visible_pages(),
    };
    Ok(ApiResponse::success("Reviews", data, Some(Meta::from_window(&window))))
}

/// Trimmed name and message, rating clamped to 1..=5.
pub fn validate_submission(
    payload: CreateTestimonialRequest,
) -> AppResult<(String, Option<i16>, String)> {
    let name = payload.name.as_deref().map(str::trim).unwrap_or_default();
    let message = payload.message.as_deref().map(str::trim).unwrap_or_default();
    if name.is_empty() || message.is_empty() {
        return Err(AppError::BadRequest("Missing fields".into()));
    }
    let rating = payload.rating.map(|r| r.clamp(1, 5) as i16);
    Ok((name.to_string(), rating, message.to_string()))
}

/// One submission per visitor and day; `submitted_today` comes from the review cookie.
pub async fn submit(
    state: &AppState,
    payload: CreateTestimonialRequest,
    submitted_today: bool,
) -> AppResult<Testimonial> {
    let (name, rating, message) = validate_submission(payload)?;
    if submitted_today {
        return Err(AppError::RateLimited);
    }

    let row = ActiveModel {
        id: Set(Uuid::new_v4()),
        name: Set(name),
        rating: Set(rating),
        message: Set(message),
        approved: Set(true),
        created_at: NotSet,
    }
    .insert(&state.orm)
    .await?;

    // the home payload embeds the latest testimonials
    state
        .cache
        .invalidate_page("/")
        .await;

    tracing::info!(testimonial_id = %row.id, "testimonial submitted");
    Ok(testimonial_from_entity(row))
}

fn testimonial_from_entity(model: TestimonialModel) -> Testimonial {
    Testimonial {
        id: model.id,
        name: model.name,
        rating: model.rating,
        message: model.message,
        approved: model.approved,
        created_at: model.created_at.with_timezone(&Utc),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request(name: Option<&str>, rating: Option<i32>, message: Option<&str>) -> CreateTestimonialRequest {
        CreateTestimonialRequest {
            name: name.map(str::to_string),
            rating,
            message: message.map(str::to_string),
        }
    }

    #[test]
    fn limit_defaults_and_clamps() {
        assert_eq!(clamp_limit(None), 12);
        assert_eq!(clamp_limit(Some(0)), 1);
        assert_eq!(clamp_limit(Some(500)), 100);
    }

    #[test]
    fn blank_fields_are_rejected() {
        let err = validate_submission(request(Some("  "), None, Some("hi"))).unwrap_err();
        assert_eq!(err.code(), "Missing fields");
        assert!(validate_submission(request(Some("Ayşe"), None, None)).is_err());
    }

    #[test]
    fn rating_is_clamped() {
        let (name, rating, _) = validate_submission(request(Some(" Ayşe "), Some(9), Some("lecker"))).unwrap();
        assert_eq!(name, "Ayşe");
        assert_eq!(rating, Some(5));
        let (_, rating, _) = validate_submission(request(Some("A"), Some(-3), Some("m"))).unwrap();
        assert_eq!(rating, Some(1));
    }
}
