//! Prompt assembly for the coaching flows
//!
//! Builds the message lists sent to Clova Studio: practice-content
//! generation, free conversation, and the one-sentence pronunciation
//! feedback. All learner-facing text is Korean.

use crate::analysis::{Issue, SpeedLabel};
use crate::error::{CoachError, CoachResult};
use crate::llm::topics::topic_prompt;
use crate::llm::ChatMessage;
use crate::schemas::LearningKind;

const WORD_SYSTEM: &str = "너는 성인의 한국어 학습을 위한 단어 생성기야.\n\n\
조건은 다음과 같아:\n\n\
1. 일상생활에서 자주 사용하는, 쉬운 한국어 단어 '1개만' 출력해야 해.\n\
2. 출력은 오직 단어 '하나'만, 설명 없이. 예: 떡볶이\n\
3. 음식, 운동, 음악, 여행, 날씨, 동물, 영화/드라마, 책, 물건, 회의, 병원, 대중교통 등 주제 안에서 랜덤으로 단어 1개만 선택해.\n\
4. 절대 설명하지 마. 추가 문장, 부연설명, 예시, 포맷팅, 강조표현 사용 금지.\n\
5. 딱 하나의 단어만 줄 바꿈 없이 출력해. 예: 버스\n\n\
지시를 어기면 학습자가 헷갈릴 수 있어. 무조건 단어 하나만 출력해.";

const SENTENCE_SYSTEM: &str = "너는 성인의 한국어 학습을 위한 문장 생성기야.\n\n\
조건은 다음과 같아:\n\n\
1. 일상생활에서 자주 사용하는, 짧은 한국어 문장을 출력해야 해.\n\
2. 출력은 오직 문장 '하나'만, 설명 없이.\n\
3. 음식, 운동, 음악, 여행, 날씨, 동물, 영화/드라마, 책, 물건, 회의, 병원, 대중교통 등 주제 안에서 랜덤으로 문장 1개만 선택해.\n\
4. 절대 설명하지 마. 추가 문장, 부연설명, 예시, 포맷팅, 강조표현 사용 금지.\n\
5. 딱 하나의 문장만 줄 바꿈 없이 출력해.\n\n\
지시를 어기면 학습자가 헷갈릴 수 있어. 무조건 짧은 문장 하나만 출력해.";

const FEEDBACK_SYSTEM: &str = "너는 성인 한국어 학습자를 위한 간단 피드백 생성기다.\n\
지침:\n\
1) 한국어로 한 문장만 생성한다. 2) 50자 이내를 권장한다.\n\
3) 이모지, 특수문자, 따옴표, 마크다운, 순번, 불릿 사용 금지.\n\
4) 장황한 설명, 반복, 사족 금지. 5) 존대하되 단정적으로 짧게.\n\
6) 아래 분석 결과를 반영해 가장 중요한 한 가지만 명확히 조언한다.";

/// Prompts for word/sentence practice-content generation
pub fn build_learning_prompts(kind: LearningKind) -> Vec<ChatMessage> {
    match kind {
        LearningKind::Word => vec![
            ChatMessage::system(WORD_SYSTEM),
            ChatMessage::user("단어 생성"),
        ],
        LearningKind::Sentence => vec![
            ChatMessage::system(SENTENCE_SYSTEM),
            ChatMessage::user("문장 생성"),
        ],
    }
}

/// Prompt for a free-conversation turn.
///
/// History comes from the caller; a missing user input marks the start of
/// the conversation. Unknown topics are an error.
pub fn build_chat_prompt(
    topic: &str,
    history: &[ChatMessage],
    user_input: Option<&str>,
) -> CoachResult<Vec<ChatMessage>> {
    let system = topic_prompt(topic)
        .ok_or_else(|| CoachError::Prompt(format!("unknown topic: {topic}")))?;

    let mut messages = Vec::with_capacity(history.len() + 2);
    messages.push(ChatMessage::system(system));
    messages.extend(history.iter().cloned());
    messages.push(ChatMessage::user(user_input.unwrap_or("대화 시작")));
    Ok(messages)
}

/// Coaching direction for each issue, phrased as the tone/direction of
/// the message the learner should receive
fn issue_instruction(issue: Issue) -> &'static str {
    match issue {
        Issue::Accuracy => {
            "정확도 문제가 있으니 기준 문장과 다른 단어를 바로잡아 주고, \
             학습자가 다음에 어떻게 말하면 좋을지 간단한 지침을 한 문장으로 제시하세요."
        }
        Issue::SpeedFast => {
            "속도가 지나치게 빠르니 속도를 약간 늦추도록 권하고, \
             호흡을 고르고 끊지 않고 자연스럽게 말하라는 조언을 한 문장으로 제시하세요."
        }
        Issue::SpeedSlow => {
            "속도가 느리니 약간 빠르게 말하되 한 호흡으로 자연스럽게 이어 말하라는 조언을 한 문장으로 제시하세요."
        }
        Issue::Gaps => {
            "단어 사이 공백이 크니 단어를 붙여서 자연스럽게 이어 말하라고 안내하는 한 문장을 제시하세요."
        }
        Issue::Good => {
            "전반적으로 발음과 속도가 좋으니 간단히 칭찬하고, \
             다음에도 같은 리듬으로 이어가라고 격려하는 한 문장을 제시하세요."
        }
    }
}

/// Inputs for the feedback prompt
#[derive(Debug, Clone)]
pub struct FeedbackContext<'a> {
    pub target_text: &'a str,
    pub result_text: &'a str,
    pub issue: Issue,
    pub accuracy_ok: bool,
    pub speed: SpeedLabel,
    pub gaps: bool,
    pub wpm_user: f64,
}

/// Messages for the one-sentence pronunciation feedback
pub fn build_feedback_messages(ctx: &FeedbackContext<'_>) -> Vec<ChatMessage> {
    let instruction = issue_instruction(ctx.issue);

    let context = format!(
        "[기준 문장] {}\n[인식 문장] {}\n[판정] issue={}, accuracy_ok={}, speed={}, gaps={}, wpm_user={:.1}",
        ctx.target_text, ctx.result_text, ctx.issue, ctx.accuracy_ok, ctx.speed, ctx.gaps, ctx.wpm_user
    );

    let user_content = format!(
        "{instruction}\n\n{context}\n\n출력 형식: 한국어 한 문장. 조언 핵심만 간결히. 추가 문장, 인용부호, 이모지 금지."
    );

    vec![
        ChatMessage::system(FEEDBACK_SYSTEM),
        ChatMessage::user(user_content),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_learning_prompts_shape() {
        let msgs = build_learning_prompts(LearningKind::Word);
        assert_eq!(msgs.len(), 2);
        assert_eq!(msgs[0].role, "system");
        assert_eq!(msgs[1].content, "단어 생성");
    }

    #[test]
    fn test_chat_prompt_start_of_conversation() {
        let msgs = build_chat_prompt("food", &[], None).unwrap();
        assert_eq!(msgs.len(), 2);
        assert_eq!(msgs[1].content, "대화 시작");
    }

    #[test]
    fn test_chat_prompt_with_history() {
        let history = vec![
            ChatMessage::user("점심 먹었어요"),
            ChatMessage {
                role: "assistant".into(),
                content: "무엇을 드셨나요?".into(),
            },
        ];
        let msgs = build_chat_prompt("food", &history, Some("김치찌개요")).unwrap();
        assert_eq!(msgs.len(), 4);
        assert_eq!(msgs[3].content, "김치찌개요");
    }

    #[test]
    fn test_chat_prompt_unknown_topic() {
        assert!(build_chat_prompt("quantum-physics", &[], None).is_err());
    }

    #[test]
    fn test_feedback_messages_carry_judgment() {
        let msgs = build_feedback_messages(&FeedbackContext {
            target_text: "오늘 날씨가 좋네요",
            result_text: "오늘 날씨가 좋네요",
            issue: Issue::SpeedFast,
            accuracy_ok: true,
            speed: SpeedLabel::Fast,
            gaps: false,
            wpm_user: 182.0,
        });
        assert_eq!(msgs.len(), 2);
        assert!(msgs[1].content.contains("issue=speed_fast"));
        assert!(msgs[1].content.contains("wpm_user=182.0"));
        assert!(msgs[1].content.contains("[기준 문장] 오늘 날씨가 좋네요"));
    }
}
