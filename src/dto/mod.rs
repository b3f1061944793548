pub mod admin;
pub mod auth;
pub mod catalog;
pub mod contact;
pub mod newsletter;
pub mod orders;
pub mod reviews;
