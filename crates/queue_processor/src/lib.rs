pub mod errors;
pub mod processor;
pub mod types;

pub use errors::QueueError;
pub use processor::QueueProcessor;
pub use types::{DelayedMessage, MessageHandler, QueueSnapshot, QueuedMessage};
