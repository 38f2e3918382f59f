//! Conversation topics for free chat practice
//!
//! Each topic maps to the Korean system prompt that keeps the model in a
//! short, learner-friendly conversational register for that subject.

use lazy_static::lazy_static;
use std::collections::HashMap;

fn topic_system(subject: &str) -> String {
    format!(
        "너는 성인 한국어 학습자의 회화 연습 상대야. 주제는 '{subject}'이다.\n\
         지침:\n\
         1) 한국어로만 대화한다. 2) 한 번에 1~2문장, 쉬운 어휘로 말한다.\n\
         3) 학습자가 말을 이어가도록 매번 주제와 관련된 질문 하나로 끝낸다.\n\
         4) 이모지, 특수문자, 마크다운 사용 금지. 5) 존대하되 친근하게.\n\
         6) 주제를 벗어난 질문을 받아도 자연스럽게 '{subject}' 주제로 돌아온다."
    )
}

lazy_static! {
    /// topic key -> system prompt
    static ref TOPIC_PROMPTS: HashMap<&'static str, String> = {
        let mut m = HashMap::new();
        m.insert("food", topic_system("음식"));
        m.insert("exercise", topic_system("운동"));
        m.insert("music", topic_system("음악"));
        m.insert("travel", topic_system("여행"));
        m.insert("weather", topic_system("날씨"));
        m.insert("animals", topic_system("동물"));
        m.insert("movies", topic_system("영화/드라마"));
        m.insert("books", topic_system("책"));
        m.insert("objects", topic_system("물건"));
        m.insert("meetings", topic_system("회의"));
        m.insert("hospital", topic_system("병원"));
        m.insert("transit", topic_system("대중교통"));
        m
    };
}

/// System prompt for a topic, `None` if the topic is unknown
pub fn topic_prompt(topic: &str) -> Option<&'static str> {
    TOPIC_PROMPTS.get(topic).map(|s| s.as_str())
}

/// All supported topic keys, for request validation and CLI help
pub fn topic_keys() -> Vec<&'static str> {
    let mut keys: Vec<&'static str> = TOPIC_PROMPTS.keys().copied().collect();
    keys.sort_unstable();
    keys
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_known_topic() {
        let prompt = topic_prompt("travel").unwrap();
        assert!(prompt.contains("여행"));
    }

    #[test]
    fn test_unknown_topic() {
        assert!(topic_prompt("politics").is_none());
    }

    #[test]
    fn test_topic_keys_sorted() {
        let keys = topic_keys();
        assert!(keys.contains(&"food"));
        let mut sorted = keys.clone();
        sorted.sort_unstable();
        assert_eq!(keys, sorted);
    }
}
