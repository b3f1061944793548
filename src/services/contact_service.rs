//! Contact form submissions kept in `contact_messages`.

use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ActiveValue::NotSet, EntityTrait, PaginatorTrait, QueryOrder, QuerySelect,
    Set,
};
use uuid::Uuid;

use crate::{
    dto::contact::{ContactInfo, ContactMessageList, ContactRequest, ContactResponse},
    entity::contact_messages::{ActiveModel, Column, Entity as ContactMessages, Model as ContactModel},
    error::{AppError, AppResult},
    models::ContactMessage,
    response::{ApiResponse, Meta},
    routes::params::Pagination,
    services::{newsletter_service::normalize_email, settings_service},
    state::AppState,
};

/// A contact submission after trimming and validation.
#[derive(Debug, PartialEq)]
pub struct ValidContact {
    pub name: String,
    pub email: String,
    pub phone: Option<String>,
    pub message: String,
}

fn trimmed(value: Option<&str>) -> Option<String> {
    value
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(str::to_string)
}

pub fn validate(payload: &ContactRequest) -> AppResult<ValidContact> {
    let name = trimmed(payload.name.as_deref());
    let email = trimmed(payload.email.as_deref());
    let message = trimmed(payload.message.as_deref());
    let (Some(name), Some(email), Some(message)) = (name, email, message) else {
        return Err(AppError::BadRequest("Missing fields".into()));
    };
    let email = normalize_email(&email).ok_or_else(|| AppError::BadRequest("invalid_email".into()))?;

    Ok(ValidContact {
        name,
        email,
        phone: trimmed(payload.phone.as_deref()),
        message,
    })
}

pub async fn submit(state: &AppState, payload: ContactRequest) -> AppResult<ContactResponse> {
    let contact = validate(&payload)?;

    let row = ActiveModel {
        id: Set(Uuid::new_v4()),
        name: Set(contact.name),
        email: Set(contact.email),
        phone: Set(contact.phone),
        message: Set(contact.message),
        created_at: NotSet,
    }
    .insert(&state.orm)
    .await?;

    tracing::info!(contact_id = %row.id, "contact message stored");
    Ok(ContactResponse { ok: true, id: row.id })
}

pub async fn contact_info(state: &AppState) -> AppResult<ApiResponse<ContactInfo>> {
    let social = settings_service::load(state).await?.social;
    let data = ContactInfo {
        email: social.email,
        phone: social.phone,
        instagram: social.instagram,
        twitter: social.twitter,
    };
    Ok(ApiResponse::success("Contact", data, None))
}

/// Newest first.
pub async fn list_messages(
    state: &AppState,
    pagination: Pagination,
) -> AppResult<ApiResponse<ContactMessageList>> {
    let (page, limit, offset) = pagination.normalize();
    let finder = ContactMessages::find().order_by_desc(Column::CreatedAt);

    let total = finder.clone().count(&state.orm).await? as i64;
    let items = finder
        .limit(limit as u64)
        .offset(offset as u64)
        .all(&state.orm)
        .await?
        .into_iter()
        .map(contact_from_entity)
        .collect();

    let meta = Meta::new(page, limit, total);
    Ok(ApiResponse::success("Contact messages", ContactMessageList { items }, Some(meta)))
}

fn contact_from_entity(model: ContactModel) -> ContactMessage {
    ContactMessage {
        id: model.id,
        name: model.name,
        email: model.email,
        phone: model.phone,
        message: model.message,
        created_at: model.created_at.with_timezone(&Utc),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request(name: &str, email: &str, phone: Option<&str>, message: &str) -> ContactRequest {
        ContactRequest {
            name: Some(name.to_string()),
            email: Some(email.to_string()),
            phone: phone.map(str::to_string),
            message: Some(message.to_string()),
        }
    }

    #[test]
    fn trims_and_lowercases() {
        let valid = validate(&request(" Ayşe ", " Ayse@Example.COM ", Some(" +49 170 1 "), " Merhaba ")).unwrap();
        assert_eq!(
            valid,
            ValidContact {
                name: "Ayşe".into(),
                email: "ayse@example.com".into(),
                phone: Some("+49 170 1".into()),
                message: "Merhaba".into(),
            }
        );
    }

    #[test]
    fn blank_phone_is_dropped() {
        let valid = validate(&request("A", "a@b.de", Some("   "), "Hi")).unwrap();
        assert_eq!(valid.phone, None);
    }

    #[test]
    fn required_fields_are_checked_first() {
        for payload in [
            request("  ", "a@b.de", None, "Hi"),
            request("A", "", None, "Hi"),
            request("A", "a@b.de", None, " \n "),
            ContactRequest::default(),
        ] {
            let err = validate(&payload).unwrap_err();
            assert_eq!(err.code(), "Missing fields");
        }
    }

    #[test]
    fn malformed_email_is_rejected() {
        let err = validate(&request("A", "not-an-email", None, "Hi")).unwrap_err();
        assert_eq!(err.code(), "invalid_email");
    }
}
