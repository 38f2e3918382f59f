//! Request/response wire types
//!
//! Serde mirrors of the JSON the mobile client exchanges with the
//! service. Boundary validation lives here: malformed requests are
//! rejected before anything reaches the analysis engine.

use serde::{Deserialize, Serialize};

use crate::analysis::{Segment, SegmentAnalysis, WaveformAnalysis};
use crate::error::{CoachError, CoachResult};
use crate::llm::ChatMessage;

/// Feedback request carrying per-word timestamp segments
#[derive(Debug, Clone, Deserialize)]
pub struct SegmentFeedbackRequest {
    /// Reference sentence the learner was asked to read
    pub target_text: String,
    /// STT transcript of what the learner said
    pub result_text: String,
    pub segments: Vec<Segment>,
}

impl SegmentFeedbackRequest {
    /// The client must send at least one segment; the engine itself would
    /// degrade to zero metrics, but an empty list means the recording
    /// pipeline failed upstream.
    pub fn validate(&self) -> CoachResult<()> {
        if self.segments.is_empty() {
            return Err(CoachError::Validation("segments must not be empty".into()));
        }
        Ok(())
    }
}

/// Feedback request carrying durations and amplitude graphs
#[derive(Debug, Clone, Deserialize)]
pub struct WaveformFeedbackRequest {
    pub target_text: String,
    pub result_text: String,
    /// Learner's speaking time in seconds; derived from the graph length
    /// when absent
    #[serde(default)]
    pub duration: Option<f64>,
    pub ref_graph: Vec<i64>,
    pub usr_graph: Vec<i64>,
}

impl WaveformFeedbackRequest {
    /// Amplitude graphs must be non-negative. Returns the checked series.
    pub fn validated_graphs(&self) -> CoachResult<(Vec<u32>, Vec<u32>)> {
        Ok((
            checked_graph("ref_graph", &self.ref_graph)?,
            checked_graph("usr_graph", &self.usr_graph)?,
        ))
    }
}

fn checked_graph(name: &str, graph: &[i64]) -> CoachResult<Vec<u32>> {
    graph
        .iter()
        .map(|&v| {
            u32::try_from(v).map_err(|_| {
                CoachError::Validation(format!("{name} contains out-of-range sample {v}"))
            })
        })
        .collect()
}

/// Feedback response for the segment path
#[derive(Debug, Clone, Serialize)]
pub struct SegmentFeedbackResponse {
    /// One-sentence coaching message from the language model
    pub feedback_text: String,
    pub analysis: SegmentAnalysis,
}

/// Feedback response for the waveform path
#[derive(Debug, Clone, Serialize)]
pub struct WaveformFeedbackResponse {
    pub feedback_text: String,
    pub analysis: WaveformAnalysis,
}

/// What kind of practice content to generate
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LearningKind {
    Word,
    Sentence,
}

#[derive(Debug, Clone, Deserialize)]
pub struct LearningRequest {
    #[serde(rename = "type")]
    pub kind: LearningKind,
}

#[derive(Debug, Clone, Serialize)]
pub struct LearningResponse {
    pub result: String,
}

/// Free-conversation request; history is caller-supplied, the service
/// keeps no state between turns
#[derive(Debug, Clone, Deserialize)]
pub struct ChatRequest {
    pub topic: String,
    #[serde(default)]
    pub user_input: Option<String>,
    #[serde(default)]
    pub history: Vec<ChatMessage>,
}

#[derive(Debug, Clone, Serialize)]
pub struct ChatResponse {
    pub ai_response: String,
}
