pub mod api_handler;
pub mod health_handler;
pub mod metrics_handler;
pub mod secrets;
pub mod ui_handler;
pub mod workspace_store;
