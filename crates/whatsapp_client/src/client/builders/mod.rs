pub mod text;
// pub mod audio;
// pub mod interactive;

// Re-export builders for easy access
pub use text::TextMessageBuilder;
// pub use audio::AudioMessageBuilder;
// pub use interactive::InteractiveMessageBuilder;

// Placeholder exports for other message types
// These would be implemented following the same pattern
// pub use text::TextMessageBuilder as ContactMessageBuilder;
// pub use audio::AudioMessageBuilder as DocumentMessageBuilder;
// pub use audio::AudioMessageBuilder as ImageMessageBuilder;
// pub use text::TextMessageBuilder as LocationMessageBuilder;
// pub use audio::AudioMessageBuilder as VideoMessageBuilder;
