use crate::{
    errors::WhatsAppResult,
    client::{
        validation::{validate_phone_number, validate_text_message},
        message_types::mtrait::Message,
    },
};
use serde::{Serialize, Deserialize};

/// A text message that can be sent via WhatsApp
/// 
/// This represents a simple text message with optional link preview functionality.
/// Text messages are the most basic message type and form the foundation for
/// most conversational interactions.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TextMessage {
    /// Always "whatsapp" for WhatsApp Business API
    messaging_product: String,
    /// Recipient type - always "individual" for direct messages
    recipient_type: String,
    /// Recipient's phone number in E.164 format
    to: String,
    /// Message type identifier
    #[serde(rename = "type")]
    message_type: String,
    /// Text content and settings
    text: TextContent,
}

impl Message for TextMessage {
    /// Get the recipient phone number
    fn recipient(&self) -> &str {
        &self.to
    }

    /// Get the message type identifier
    fn message_type(&self) -> &str {
        "text"
    }
    
}

/// Text message content structure
/// 
/// This contains the actual message text and optional settings for link previews.
#[derive(Debug, Clone, Serialize, Deserialize)]
struct TextContent {
    /// The message text (up to 4096 characters)
    body: String,
    /// Whether to show link previews for URLs in the message
    #[serde(skip_serializing_if = "Option::is_none")]
    preview_url: Option<bool>,
}

impl TextMessage {
    /// Create a new text message
    /// 
    /// # Arguments
    /// * `to` - Recipient phone number in E.164 format (+1234567890)
    /// * `message` - Text content (up to 4096 characters)
    /// 
    /// # Example
    /// ```
    /// # use whatsapp_client::client::message_types::TextMessage;
    /// let message = TextMessage::new("+1234567890", "Hello, world!")?;
    /// # Ok::<(), whatsapp_client::errors::WhatsAppError>(())
    /// ```
    pub fn new(to: &str, message: &str) -> WhatsAppResult<Self> {
        // Validate inputs
        validate_phone_number(to)?;
        validate_text_message(message)?;
        
        Ok(Self {
            messaging_product: "whatsapp".to_string(),
            recipient_type: "individual".to_string(),
            to: to.to_string(),
            message_type: "text".to_string(),
            text: TextContent {
                body: message.to_string(),
                preview_url: None,
            },
        })
    }
    
    /// Create a new text message with link preview enabled
    /// 
    /// When link preview is enabled, WhatsApp will attempt to generate
    /// a preview for the first URL found in the message text.
    /// 
    /// # Example
    /// ```
    /// # use whatsapp_client::client::message_types::TextMessage;
    /// let message = TextMessage::with_preview(
    ///     "+1234567890", 
    ///     "Check out our website: https://example.com"
    /// )?;
    /// # Ok::<(), whatsapp_client::errors::WhatsAppError>(())
    /// ```
    pub fn with_preview(to: &str, message: &str) -> WhatsAppResult<Self> {
        let mut text_message = Self::new(to, message)?;
        text_message.text.preview_url = Some(true);
        Ok(text_message)
    }
    
    /// Create a new text message with link preview explicitly disabled
    /// 
    /// This ensures that no link previews are shown even if URLs are present.
    pub fn without_preview(to: &str, message: &str) -> WhatsAppResult<Self> {
        let mut text_message = Self::new(to, message)?;
        text_message.text.preview_url = Some(false);
        Ok(text_message)
    }
    
    /// Get the message text
    pub fn message(&self) -> &str {
        &self.text.body
    }
    
    /// Check if link preview is enabled
    pub fn has_preview_enabled(&self) -> Option<bool> {
        self.text.preview_url
    }
    
    /// Get the length of the message text
    pub fn message_length(&self) -> usize {
        self.text.body.len()
    }
}
