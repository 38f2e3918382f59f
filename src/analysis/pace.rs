//! Words-per-minute figures and relative speed judgment
//!
//! Used by the waveform path, where the only timing evidence is a pair of
//! durations: how long the reference take is and how long the learner
//! actually spoke.

use serde::{Deserialize, Serialize};

use super::text::count_words;

/// Durations below this are treated as this value, keeping WPM finite
pub const MIN_DURATION_SEC: f64 = 0.3;

/// Speed classification of an utterance
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SpeedLabel {
    Fast,
    Slow,
    Ok,
}

impl std::fmt::Display for SpeedLabel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SpeedLabel::Fast => write!(f, "fast"),
            SpeedLabel::Slow => write!(f, "slow"),
            SpeedLabel::Ok => write!(f, "ok"),
        }
    }
}

/// Words per minute for a text read in `duration_sec`, rounded to one
/// decimal place
pub fn wpm(text: &str, duration_sec: f64) -> f64 {
    let duration = duration_sec.max(MIN_DURATION_SEC);
    let words = count_words(text) as f64;
    round1(words / (duration / 60.0))
}

/// Target and user WPM for a coaching round.
///
/// The target assumes the reference text is read in `target_duration_sec`;
/// the user figure uses the learner's actual duration.
pub fn wpm_pair(
    target_text: &str,
    result_text: &str,
    target_duration_sec: f64,
    user_duration_sec: f64,
) -> (f64, f64) {
    (
        wpm(target_text, target_duration_sec),
        wpm(result_text, user_duration_sec),
    )
}

/// Classify the user's rate against the target rate.
///
/// Below `slow_factor` times the target is slow, above `fast_factor` times
/// is fast. A non-positive target can't anchor a comparison, so everything
/// is ok.
pub fn judge_relative(
    user_wpm: f64,
    target_wpm: f64,
    slow_factor: f64,
    fast_factor: f64,
) -> SpeedLabel {
    if target_wpm <= 0.0 {
        return SpeedLabel::Ok;
    }
    if user_wpm < target_wpm * slow_factor {
        return SpeedLabel::Slow;
    }
    if user_wpm > target_wpm * fast_factor {
        return SpeedLabel::Fast;
    }
    SpeedLabel::Ok
}

fn round1(v: f64) -> f64 {
    (v * 10.0).round() / 10.0
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_wpm_basic() {
        // 5 words in 3 seconds = 100 wpm
        assert_eq!(wpm("하나 둘 셋 넷 다섯", 3.0), 100.0);
    }

    #[test]
    fn test_wpm_clamps_tiny_duration() {
        // 1 word at the 0.3s floor = 200 wpm, no blowup at zero
        assert_eq!(wpm("word", 0.0), 200.0);
        assert_eq!(wpm("word", 0.1), 200.0);
    }

    #[test]
    fn test_wpm_empty_text() {
        assert_eq!(wpm("", 5.0), 0.0);
    }

    #[test]
    fn test_wpm_pair() {
        let (target, user) = wpm_pair("하나 둘 셋 넷", "하나 둘 셋 넷", 4.0, 2.0);
        assert_eq!(target, 60.0);
        assert_eq!(user, 120.0);
    }

    #[test]
    fn test_judge_relative_bounds() {
        // ±25% band around the target
        assert_eq!(judge_relative(76.0, 100.0, 0.75, 1.25), SpeedLabel::Ok);
        assert_eq!(judge_relative(74.0, 100.0, 0.75, 1.25), SpeedLabel::Slow);
        assert_eq!(judge_relative(126.0, 100.0, 0.75, 1.25), SpeedLabel::Fast);
        assert_eq!(judge_relative(125.0, 100.0, 0.75, 1.25), SpeedLabel::Ok);
    }

    #[test]
    fn test_judge_relative_zero_target() {
        assert_eq!(judge_relative(300.0, 0.0, 0.75, 1.25), SpeedLabel::Ok);
    }
}
