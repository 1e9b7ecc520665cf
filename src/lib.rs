pub mod app;
pub mod client;
pub mod config;
pub mod errors;
pub mod format;
pub mod handlers;
pub mod listing;
pub mod models;
pub mod state;
pub mod stats_bar;
pub mod ui;
pub mod validate;

pub use app::router;
pub use client::BackendClient;
pub use config::Config;
pub use state::AppState;
