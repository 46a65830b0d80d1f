pub mod app;
pub mod auth_handlers;
pub mod config;
pub mod dashboard_handlers;
pub mod dashboards;
pub mod errors;
pub mod metrics;
pub mod secrets;
pub mod token_handlers;

pub use app::{router, AppState};
