pub mod api;
pub mod app;
pub mod config;
pub mod models;
pub mod ui;

pub use api::ApiClient;
pub use app::{App, Screen, WizardOrigin};
pub use models::{Investment, Project};
