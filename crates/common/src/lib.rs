pub mod domain;
pub mod runtime_config;
pub mod shared_store;
pub mod webhook_types;

pub use domain::*;
pub use runtime_config::*;
pub use shared_store::*;
pub use webhook_types::*;
