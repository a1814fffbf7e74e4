pub mod google_sheets;
pub mod whatsapp;

pub use google_sheets::{ServiceAccountAuth, ServiceAccountKey, SheetsRestApi};
pub use whatsapp::{IMessenger, InMemoryMessenger, SessionStatus, WhatsAppRestApi};
