//! Status messages shown in the interactive UI's message bar

use std::time::{Duration, Instant};

/// Message severity, used for styling
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MessageType {
    Info,
    Success,
    Warning,
    Error,
}

/// A transient message for the user
#[derive(Debug, Clone)]
pub struct Message {
    pub message_type: MessageType,
    pub text: String,
    pub timestamp: Instant,
}

impl Message {
    fn new(message_type: MessageType, text: impl Into<String>) -> Self {
        Self {
            message_type,
            text: text.into(),
            timestamp: Instant::now(),
        }
    }

    pub fn info(text: impl Into<String>) -> Self {
        Self::new(MessageType::Info, text)
    }

    pub fn success(text: impl Into<String>) -> Self {
        Self::new(MessageType::Success, text)
    }

    pub fn warning(text: impl Into<String>) -> Self {
        Self::new(MessageType::Warning, text)
    }

    pub fn error(text: impl Into<String>) -> Self {
        Self::new(MessageType::Error, text)
    }

    /// Messages older than 10 seconds are dropped from the bar
    pub fn is_expired(&self) -> bool {
        self.timestamp.elapsed() > Duration::from_secs(10)
    }

    /// Icon prefix for this message type
    pub fn icon(&self) -> &str {
        match self.message_type {
            MessageType::Info => "ℹ",
            MessageType::Success => "✓",
            MessageType::Warning => "⚠",
            MessageType::Error => "✗",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_constructors_set_type() {
        assert_eq!(Message::info("a").message_type, MessageType::Info);
        assert_eq!(Message::success("a").message_type, MessageType::Success);
        assert_eq!(Message::warning("a").message_type, MessageType::Warning);
        assert_eq!(Message::error("a").message_type, MessageType::Error);
    }

    #[test]
    fn test_fresh_message_is_not_expired() {
        assert!(!Message::info("a").is_expired());
    }
}

// Made with Bob
