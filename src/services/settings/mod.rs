pub mod service;
pub mod sync;

pub use service::{effective_api_url, SettingsService, API_URL_ENV};
pub use sync::SettingsSync;
