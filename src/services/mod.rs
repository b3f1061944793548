pub mod admin_service;
pub mod auth_service;
pub mod catalog_service;
pub mod contact_service;
pub mod newsletter_service;
pub mod order_service;
pub mod review_service;
pub mod settings_service;
pub mod stats_service;
