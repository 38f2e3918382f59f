//! Coaching services
//!
//! Composes the analysis engine, prompt builder and chat model into the
//! operations the client consumes: pronunciation feedback (segment and
//! waveform variants), practice-content generation, and free chat. Each
//! call is independent; nothing is kept between requests.

use tracing::debug;

use crate::analysis::{analyze_segments, analyze_waveform, Tuning};
use crate::error::{CoachError, CoachResult};
use crate::llm::ChatMessage;
use crate::llm::prompts::{
    build_chat_prompt, build_feedback_messages, build_learning_prompts, FeedbackContext,
};
use crate::llm::ChatModel;
use crate::schemas::{
    ChatRequest, ChatResponse, LearningKind, LearningResponse, SegmentFeedbackRequest,
    SegmentFeedbackResponse, WaveformFeedbackRequest, WaveformFeedbackResponse,
};

/// The model returns free text; the client renders a single line
fn single_line(text: &str) -> String {
    text.trim().replace('\n', " ")
}

async fn complete_one(model: &dyn ChatModel, messages: &[ChatMessage]) -> CoachResult<String> {
    model
        .complete(messages)
        .await
        .map_err(|e| CoachError::Llm(e.to_string()))
}

/// Pronunciation feedback from per-word timestamp segments
pub async fn segment_feedback(
    model: &dyn ChatModel,
    tuning: &Tuning,
    req: &SegmentFeedbackRequest,
) -> CoachResult<SegmentFeedbackResponse> {
    req.validate()?;

    let analysis = analyze_segments(tuning, &req.target_text, &req.result_text, &req.segments);
    debug!(
        "segment analysis: issue={} wer={} wps_total={}",
        analysis.issue, analysis.wer, analysis.wps_total
    );

    let messages = build_feedback_messages(&FeedbackContext {
        target_text: &req.target_text,
        result_text: &req.result_text,
        issue: analysis.issue,
        accuracy_ok: analysis.accuracy_ok,
        speed: analysis.speed,
        gaps: analysis.gaps,
        wpm_user: analysis.wpm_user,
    });

    let feedback_text = single_line(&complete_one(model, &messages).await?);
    Ok(SegmentFeedbackResponse {
        feedback_text,
        analysis,
    })
}

/// Pronunciation feedback from durations and amplitude graphs
pub async fn waveform_feedback(
    model: &dyn ChatModel,
    tuning: &Tuning,
    req: &WaveformFeedbackRequest,
) -> CoachResult<WaveformFeedbackResponse> {
    let (ref_graph, usr_graph) = req.validated_graphs()?;

    // Durations: the client may report the learner's take directly,
    // otherwise both sides fall back to graph length at the sample rate
    let sample_rate = f64::from(tuning.silence.sample_rate_hz.max(1));
    let user_duration_sec = req
        .duration
        .unwrap_or(usr_graph.len() as f64 / sample_rate);
    let target_duration_sec = ref_graph.len() as f64 / sample_rate;

    let analysis = analyze_waveform(
        tuning,
        &req.target_text,
        &req.result_text,
        target_duration_sec,
        user_duration_sec,
        &ref_graph,
        &usr_graph,
    );
    debug!(
        "waveform analysis: issue={} wpm_user={} wpm_target={}",
        analysis.issue, analysis.wpm_user, analysis.wpm_target
    );

    let messages = build_feedback_messages(&FeedbackContext {
        target_text: &req.target_text,
        result_text: &req.result_text,
        issue: analysis.issue,
        accuracy_ok: analysis.accuracy_ok,
        speed: analysis.speed,
        gaps: analysis.gaps,
        wpm_user: analysis.wpm_user,
    });

    let feedback_text = single_line(&complete_one(model, &messages).await?);
    Ok(WaveformFeedbackResponse {
        feedback_text,
        analysis,
    })
}

/// Generate a practice word or sentence
pub async fn learning_content(
    model: &dyn ChatModel,
    kind: LearningKind,
) -> CoachResult<LearningResponse> {
    let messages = build_learning_prompts(kind);
    let result = complete_one(model, &messages).await?;
    Ok(LearningResponse {
        result: result.trim().to_string(),
    })
}

/// One turn of free conversation practice
pub async fn chat_turn(model: &dyn ChatModel, req: &ChatRequest) -> CoachResult<ChatResponse> {
    let messages = build_chat_prompt(&req.topic, &req.history, req.user_input.as_deref())?;
    let ai_response = model
        .chat(&messages)
        .await
        .map_err(|e| CoachError::Llm(e.to_string()))?;
    Ok(ChatResponse {
        ai_response: ai_response.trim().to_string(),
    })
}
