mod auth_provider;
mod sheets_api;

pub use auth_provider::{ServiceAccountAuth, ServiceAccountKey};
pub use sheets_api::SheetsRestApi;
