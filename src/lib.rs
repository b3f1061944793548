pub mod audit;
pub mod cache;
pub mod carousel;
pub mod client_state;
pub mod config;
pub mod db;
pub mod dto;
pub mod email;
pub mod entity;
pub mod error;
pub mod i18n;
pub mod listing;
pub mod mail;
pub mod middleware;
pub mod models;
pub mod response;
pub mod richtext;
pub mod routes;
pub mod sanitize;
pub mod services;
pub mod settings;
pub mod state;
