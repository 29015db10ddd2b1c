//! Error types for the financial intent chatbot

use thiserror::Error;

/// Result type alias for chatbot operations
pub type Result<T> = std::result::Result<T, ChatbotError>;

#[derive(Error, Debug)]
pub enum ChatbotError {

    // =============================
    // Classification Pipeline Errors
    // =============================

    #[error("Training error: {0}")]
    TrainingError(String),

    #[error("Model format error: {0}")]
    ModelFormatError(String),

    #[error("Model store error: {0}")]
    StoreError(String),

    #[error("Data provider error: {0}")]
    DataProviderError(String),

    #[error("Data fetch timed out after {0} ms")]
    Timeout(u64),

    #[error("Configuration error: {0}")]
    ConfigError(String),

    // =============================
    // External Library Conversions
    // =============================

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("Binary encoding error: {0}")]
    EncodingError(#[from] bincode::Error),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),
}
