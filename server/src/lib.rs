pub mod api;
pub mod auth;
pub mod components;
pub mod cookies;
pub mod errors;
pub mod media;
pub mod models;
pub mod pages;
pub mod routes;
pub mod server;
pub mod setup;
pub mod state;
pub mod static_assets;

/// Application-wide result type, backed by `color_eyre::Report`
pub type Result<T, E = color_eyre::Report> = std::result::Result<T, E>;
