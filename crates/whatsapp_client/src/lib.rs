pub mod client;
pub mod config;
pub mod errors;

pub use client::core::WhatsAppClient;
pub use config::WhatsAppClientConfig;
pub use errors::{WhatsAppError, WhatsAppResult};
