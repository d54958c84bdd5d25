use thiserror::Error;
use uuid::Uuid;

/// Error type that captures subscription store, validation, and scheduling failures.
#[derive(Debug, Error)]
pub enum SubscriptionError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Serialization error: {0}")]
    Serde(#[from] serde_json::Error),
    #[error("Subscription not found: {0}")]
    NotFound(Uuid),
    #[error("Duplicate subscription id: {0}")]
    Duplicate(Uuid),
    #[error("Validation failed: {0}")]
    Validation(String),
    #[error("Invalid date window: end {end} is before start {start}")]
    InvalidWindow {
        start: chrono::NaiveDate,
        end: chrono::NaiveDate,
    },
    #[error("Unknown frequency `{0}`")]
    UnknownFrequency(String),
    #[error("Configuration error: {0}")]
    Config(String),
    #[error("Notification error: {0}")]
    Notification(String),
}

pub type Result<T> = std::result::Result<T, SubscriptionError>;
