//! Language model integration
//!
//! Prompt assembly and the Clova Studio chat-completion client. The
//! analysis engine never touches the network; these modules turn its
//! verdicts into the one-sentence coaching message the learner sees.

pub mod clova;
pub mod prompts;
pub mod topics;

pub use clova::{ChatModel, ClovaClient};

use serde::{Deserialize, Serialize};

/// One chat-completion message
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatMessage {
    /// "system", "user" or "assistant"
    pub role: String,
    pub content: String,
}

impl ChatMessage {
    pub fn system(content: impl Into<String>) -> Self {
        Self {
            role: "system".to_string(),
            content: content.into(),
        }
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: "user".to_string(),
            content: content.into(),
        }
    }
}
