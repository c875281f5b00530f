//! @ai:module:intent Extract a difficulty label and score from free analysis text
//! @ai:module:layer application
//! @ai:module:public_api ResultInterpreter, ResultInterpreterTrait, Interpretation, Difficulty, DIFFICULTY_PATTERNS, SCORE_PATTERNS
//! @ai:module:depends_on cascade, payload
//! @ai:module:stateless true

use crate::cascade::PatternCascade;
use crate::payload::AnalysisPayload;
use serde::{Deserialize, Serialize};

/// Difficulty rules in priority order. Explicit "difficulty: X" phrasing
/// outranks a bare mention of the word.
pub const DIFFICULTY_PATTERNS: [&str; 4] = [
    r"(?i)difficulty[:\s]+(easy|moderate|tough|hard)",
    r"(?i)(easy|moderate|tough|hard)\s+difficulty",
    r"(?i)level[:\s]+(easy|moderate|tough|hard)",
    r"(?i)\b(easy|moderate|tough|hard)\b",
];

/// Score rules in priority order.
pub const SCORE_PATTERNS: [&str; 5] = [
    r"(?i)score[:\s]+([0-9]+(?:\.[0-9]+)?)",
    r"(?i)alignment[:\s]+([0-9]+(?:\.[0-9]+)?)",
    r"(?i)([0-9]+(?:\.[0-9]+)?)\s*/\s*10",
    r"(?i)([0-9]+(?:\.[0-9]+)?)\s*out\s*of\s*10",
    r"(?i)rating[:\s]+([0-9]+(?:\.[0-9]+)?)",
];

/// @ai:intent Coarse difficulty label found in analysis text
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Difficulty {
    Easy,
    #[default]
    Moderate,
    Tough,
    Hard,
}

impl Difficulty {
    /// @ai:intent Parse a captured difficulty word, ignoring case
    /// @ai:effects pure
    pub fn from_word(word: &str) -> Option<Self> {
        match word.to_lowercase().as_str() {
            "easy" => Some(Difficulty::Easy),
            "moderate" => Some(Difficulty::Moderate),
            "tough" => Some(Difficulty::Tough),
            "hard" => Some(Difficulty::Hard),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Difficulty::Easy => "easy",
            Difficulty::Moderate => "moderate",
            Difficulty::Tough => "tough",
            Difficulty::Hard => "hard",
        }
    }

    /// @ai:intent Label form used for synthesized metric records
    /// @ai:example (Tough) -> "Tough"
    /// @ai:effects pure
    pub fn capitalized(&self) -> &'static str {
        match self {
            Difficulty::Easy => "Easy",
            Difficulty::Moderate => "Moderate",
            Difficulty::Tough => "Tough",
            Difficulty::Hard => "Hard",
        }
    }

    /// @ai:intent Presentation tone for badges
    /// @ai:effects pure
    pub fn tone(&self) -> &'static str {
        match self {
            Difficulty::Easy => "success",
            Difficulty::Moderate => "warning",
            Difficulty::Tough | Difficulty::Hard => "danger",
        }
    }
}

impl std::fmt::Display for Difficulty {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// @ai:intent Result of interpreting one payload
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Interpretation {
    pub text: String,
    pub difficulty: Difficulty,
    /// `None` when no score phrase was found; `Some(0.0)` is a real score
    pub score: Option<f64>,
}

impl Interpretation {
    /// @ai:intent One-line text used when sharing a result
    /// @ai:example (Hard, Some(7.5)) -> "Analysis Result: HARD difficulty (Score: 7.5/10)"
    /// @ai:effects pure
    pub fn share_text(&self) -> String {
        let mut text = format!(
            "Analysis Result: {} difficulty",
            self.difficulty.as_str().to_uppercase()
        );
        if let Some(score) = self.score {
            text.push_str(&format!(" (Score: {}/10)", score));
        }
        text
    }
}

/// @ai:intent Trait for result interpretation
pub trait ResultInterpreterTrait: Send + Sync {
    /// @ai:intent Interpret the text source of a payload
    fn interpret(&self, payload: &AnalysisPayload) -> Interpretation;
}

/// @ai:intent Interprets analysis text with ordered regex cascades
pub struct ResultInterpreter {
    difficulty: PatternCascade<Difficulty>,
    score: PatternCascade<f64>,
}

impl ResultInterpreter {
    /// @ai:intent Create an interpreter with the standard rule order
    /// @ai:effects pure
    pub fn new() -> Self {
        Self {
            difficulty: PatternCascade::new(&DIFFICULTY_PATTERNS, Difficulty::from_word),
            score: PatternCascade::new(&SCORE_PATTERNS, parse_score),
        }
    }

    /// @ai:intent Interpret raw text directly
    /// @ai:post empty text yields Moderate with no score
    /// @ai:effects pure
    pub fn interpret_text(&self, text: &str) -> Interpretation {
        if text.trim().is_empty() {
            tracing::debug!("Empty analysis text, using default difficulty");
            return Interpretation {
                text: text.to_string(),
                difficulty: Difficulty::default(),
                score: None,
            };
        }

        let difficulty = match self.difficulty.find(text) {
            Some((rule, difficulty)) => {
                tracing::debug!("Difficulty {} matched rule {}", difficulty, rule);
                difficulty
            }
            None => {
                tracing::debug!("No difficulty phrase found, defaulting to moderate");
                Difficulty::default()
            }
        };
        let score = self.score.find(text).map(|(rule, score)| {
            tracing::debug!("Score {} matched rule {}", score, rule);
            score
        });

        Interpretation {
            text: text.to_string(),
            difficulty,
            score,
        }
    }
}

impl Default for ResultInterpreter {
    fn default() -> Self {
        Self::new()
    }
}

impl ResultInterpreterTrait for ResultInterpreter {
    /// @ai:effects pure
    fn interpret(&self, payload: &AnalysisPayload) -> Interpretation {
        self.interpret_text(payload.text())
    }
}

fn parse_score(s: &str) -> Option<f64> {
    s.parse::<f64>().ok().filter(|v| v.is_finite())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::payload::StructuredPayload;

    fn interpret(text: &str) -> Interpretation {
        ResultInterpreter::new().interpret_text(text)
    }

    #[test]
    fn test_explicit_difficulty_beats_bare_word() {
        let result = interpret("Most questions are easy. Overall difficulty: hard.");
        assert_eq!(result.difficulty, Difficulty::Hard);
    }

    #[test]
    fn test_trailing_difficulty_phrase() {
        let result = interpret("An easy start, but TOUGH difficulty overall");
        assert_eq!(result.difficulty, Difficulty::Tough);
    }

    #[test]
    fn test_level_phrase_beats_bare_word() {
        let result = interpret("Some easy parts. Level: moderate");
        assert_eq!(result.difficulty, Difficulty::Moderate);
    }

    #[test]
    fn test_bare_word_requires_word_boundary() {
        let result = interpret("The paper is uneasy to read but hard to finish");
        assert_eq!(result.difficulty, Difficulty::Hard);
    }

    #[test]
    fn test_no_keywords_defaults() {
        let result = interpret("The paper covers normalization and ER diagrams.");
        assert_eq!(result.difficulty, Difficulty::Moderate);
        assert_eq!(result.score, None);
    }

    #[test]
    fn test_empty_text_defaults() {
        let result = interpret("   ");
        assert_eq!(result.difficulty, Difficulty::Moderate);
        assert_eq!(result.score, None);
    }

    #[test]
    fn test_score_phrase_beats_out_of_ten() {
        let result = interpret("Rated 9/10 by reviewers. Score: 7.5");
        assert_eq!(result.score, Some(7.5));
    }

    #[test]
    fn test_score_fallback_patterns() {
        assert_eq!(interpret("Alignment: 8").score, Some(8.0));
        assert_eq!(interpret("about 6.5 / 10").score, Some(6.5));
        assert_eq!(interpret("4 out of 10").score, Some(4.0));
        assert_eq!(interpret("Rating: 3").score, Some(3.0));
    }

    #[test]
    fn test_score_skips_non_ascii_digits() {
        let result = interpret("Score: \u{667} in the draft, final Score: 8");
        assert_eq!(result.score, Some(8.0));
    }

    #[test]
    fn test_zero_score_is_present() {
        let result = interpret("Score: 0");
        assert_eq!(result.score, Some(0.0));
    }

    #[test]
    fn test_rule_order_is_exposed() {
        let interpreter = ResultInterpreter::new();
        assert_eq!(interpreter.difficulty.len(), DIFFICULTY_PATTERNS.len());
        assert_eq!(interpreter.score.len(), SCORE_PATTERNS.len());
        assert_eq!(
            interpreter.difficulty.find("hard difficulty, difficulty: easy"),
            Some((0, Difficulty::Easy))
        );
    }

    #[test]
    fn test_interpret_structured_payload_uses_analysis() {
        let payload = AnalysisPayload::Structured(StructuredPayload {
            analysis: "Difficulty Level: easy\nAlignment Score: 7.5/10".to_string(),
            ..Default::default()
        });
        let result = ResultInterpreter::new().interpret(&payload);
        assert_eq!(result.difficulty, Difficulty::Easy);
        assert_eq!(result.score, Some(7.5));
    }

    #[test]
    fn test_share_text() {
        let mut result = interpret("difficulty: hard, score: 7.5");
        assert_eq!(
            result.share_text(),
            "Analysis Result: HARD difficulty (Score: 7.5/10)"
        );

        result.score = None;
        assert_eq!(result.share_text(), "Analysis Result: HARD difficulty");
    }

    #[test]
    fn test_difficulty_helpers() {
        assert_eq!(Difficulty::from_word("HARD"), Some(Difficulty::Hard));
        assert_eq!(Difficulty::from_word("medium"), None);
        assert_eq!(Difficulty::Tough.capitalized(), "Tough");
        assert_eq!(Difficulty::Hard.tone(), "danger");
    }
}
