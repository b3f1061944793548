use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::models::NewsletterSubscriber;

#[derive(Debug, Deserialize, ToSchema)]
pub struct SubscribeRequest {
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub locale: Option<String>,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct OkResponse {
    pub ok: bool,
}

#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CampaignRequest {
    #[serde(default)]
    pub product_ids: Vec<Uuid>,
    #[serde(default)]
    pub subject: Option<String>,
    #[serde(default)]
    pub intro: Option<String>,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct RecipientError {
    pub to: String,
    pub error: String,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct CampaignResult {
    pub ok: bool,
    pub sent: usize,
    pub total: usize,
    pub errors: Vec<RecipientError>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct SubscriberList {
    pub items: Vec<NewsletterSubscriber>,
}
