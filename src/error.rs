//! TalkCoach Error Types
//!
//! Centralized error handling for the coaching backend.

use thiserror::Error;

/// Central error type for TalkCoach
#[derive(Error, Debug)]
pub enum CoachError {
    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Prompt error: {0}")]
    Prompt(String),

    #[error("Language model error: {0}")]
    Llm(String),

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Json(#[from] serde_json::Error),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

/// Result type alias for TalkCoach operations
pub type CoachResult<T> = Result<T, CoachError>;
