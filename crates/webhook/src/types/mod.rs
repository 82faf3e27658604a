// Webhook verification types
pub mod webhook;
pub use webhook::*;

// Incoming payload types
pub mod payload;
pub use payload::*;

// Outgoing message types are owned by `whatsapp_client`; this crate only
// ever constructs them via the sender pool in `crate::outbound`.
