use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::models::ContactMessage;

/// Contact form body. Name, email and message are required; phone is optional.
#[derive(Debug, Default, Deserialize, ToSchema)]
pub struct ContactRequest {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub phone: Option<String>,
    #[serde(default)]
    pub message: Option<String>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct ContactResponse {
    pub ok: bool,
    pub id: Uuid,
}

/// Reachability shown beside the contact form.
#[derive(Debug, Serialize, ToSchema)]
pub struct ContactInfo {
    pub email: String,
    pub phone: String,
    pub instagram: String,
    pub twitter: String,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct ContactMessageList {
    pub items: Vec<ContactMessage>,
}
