//! @ai:module:intent Split multi-question analysis text and extract per-question metrics
//! @ai:module:layer application
//! @ai:module:public_api QuestionExtractor, QuestionBlock, BLOOM_LEVELS
//! @ai:module:depends_on cascade, metrics, payload
//! @ai:module:stateless true

use crate::cascade::PatternCascade;
use crate::metrics::MetricRecord;
use crate::payload::StructuredPayload;
use regex::Regex;

/// Bloom's Taxonomy levels accepted as a cognitive level.
pub const BLOOM_LEVELS: [&str; 6] = ["Remember", "Understand", "Apply", "Analyze", "Evaluate", "Create"];

const QUESTION_MARKER: &str = r"\*\*Question[:\s]*([^*]+)\*\*";

const LABEL_PATTERNS: [&str; 4] = [
    r"(?i)\*\s*\*\*difficulty\s+label\*\*[:\s]*([^\n\r]+)",
    r"(?i)difficulty\s+label[:\s]*([^\n\r]+)",
    r"(?i)difficulty[:\s]+(easy|moderate|tough|hard|difficult)",
    r"(?i)(easy|moderate|tough|hard|difficult)\s+difficulty",
];

const DIFFICULTY_SCORE_PATTERNS: [&str; 3] = [
    r"(?i)\*\s*\*\*difficulty\s+score\*\*[:\s]*([0-9]+(?:\.[0-9]+)?)",
    r"(?i)difficulty\s+score[:\s]*([0-9]+(?:\.[0-9]+)?)",
    r"(?i)score[:\s]*([0-9]+(?:\.[0-9]+)?)",
];

const ALIGNMENT_PATTERNS: [&str; 3] = [
    r"(?i)\*\s*\*\*syllabus\s+alignment\s+score\*\*[:\s]*([0-9]+(?:\.[0-9]+)?)",
    r"(?i)syllabus\s+alignment\s+score[:\s]*([0-9]+(?:\.[0-9]+)?)",
    r"(?i)alignment[:\s]*([0-9]+(?:\.[0-9]+)?)",
];

const COGNITIVE_PATTERNS: [&str; 4] = [
    r"(?i)\*\s*\*\*bloom['s]*\s+taxonomy\s+level\*\*[:\s]*([^\n\r]+)",
    r"(?i)bloom['s]*\s+taxonomy\s+level[:\s]*([^\n\r]+)",
    r"(?i)cognitive\s+level[:\s]*([^\n\r]+)",
    r"(?i)(remember|understand|apply|analyze|evaluate|create)",
];

const DEPTH_PATTERNS: [&str; 3] = [
    r"(?i)\*\s*\*\*application\s+depth\*\*[:\s]*([0-9]+)",
    r"(?i)application\s+depth[:\s]*([0-9]+)",
    r"(?i)depth[:\s]*([0-9]+)",
];

const TIME_PATTERNS: [&str; 4] = [
    r"(?i)\*\s*\*\*estimated\s+time\s+to\s+solve\*\*[:\s]*([^\n\r]+)",
    r"(?i)estimated\s+time[:\s]*([^\n\r]+)",
    r"(?i)time\s+to\s+solve[:\s]*([^\n\r]+)",
    r"(?i)([0-9]+)\s*minutes?",
];

const EXPLANATION_PATTERNS: [&str; 3] = [
    r"(?i)\*\s*\*\*brief\s+explanation\*\*[:\s]*([^\n\r*]+)",
    r"(?i)brief\s+explanation[:\s]*([^\n\r*]+)",
    r"(?i)explanation[:\s]*([^\n\r*]+)",
];

const DEFAULT_LABEL: &str = "Moderate";
const DEFAULT_DIFFICULTY_SCORE: f64 = 6.0;
const DEFAULT_ALIGNMENT_SCORE: f64 = 7.0;
const DEFAULT_COGNITIVE_LEVEL: &str = "Apply";
const DEFAULT_APPLICATION_DEPTH: u32 = 3;
const DEFAULT_TIME: &str = "15 minutes";
const DEFAULT_EXPLANATION: &str = "Analysis completed for this question.";

/// @ai:intent A question identifier and the analysis text that follows it
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QuestionBlock<'a> {
    pub question_id: String,
    pub content: &'a str,
}

/// @ai:intent Extracts metric records from markdown analysis text
pub struct QuestionExtractor {
    marker: Regex,
    label: PatternCascade<String>,
    difficulty_score: PatternCascade<f64>,
    alignment: PatternCascade<f64>,
    cognitive_level: PatternCascade<String>,
    application_depth: PatternCascade<u32>,
    estimated_time: PatternCascade<String>,
    explanation: PatternCascade<String>,
}

impl QuestionExtractor {
    /// @ai:intent Create an extractor with compiled field cascades
    /// @ai:effects pure
    pub fn new() -> Self {
        Self {
            marker: Regex::new(QUESTION_MARKER).expect("Invalid regex"),
            label: PatternCascade::new(&LABEL_PATTERNS, clean_label),
            difficulty_score: PatternCascade::new(&DIFFICULTY_SCORE_PATTERNS, parse_number),
            alignment: PatternCascade::new(&ALIGNMENT_PATTERNS, parse_number),
            cognitive_level: PatternCascade::new(&COGNITIVE_PATTERNS, bloom_level),
            application_depth: PatternCascade::new(&DEPTH_PATTERNS, parse_depth),
            estimated_time: PatternCascade::new(&TIME_PATTERNS, clean_time),
            explanation: PatternCascade::new(&EXPLANATION_PATTERNS, clean_text),
        }
    }

    /// @ai:intent Split text on `**Question: <id>**` markers
    /// @ai:post text before the first marker is dropped
    /// @ai:effects pure
    pub fn split_questions<'a>(&self, text: &'a str) -> Vec<QuestionBlock<'a>> {
        let markers: Vec<_> = self.marker.captures_iter(text).collect();

        markers
            .iter()
            .enumerate()
            .map(|(i, caps)| {
                let start = caps.get(0).map(|m| m.end()).unwrap_or(0);
                let end = markers
                    .get(i + 1)
                    .and_then(|next| next.get(0))
                    .map(|m| m.start())
                    .unwrap_or(text.len());

                QuestionBlock {
                    question_id: caps
                        .get(1)
                        .map(|m| m.as_str().trim().to_string())
                        .unwrap_or_default(),
                    content: text[start..end].trim(),
                }
            })
            .collect()
    }

    /// @ai:intent Extract one record per question, or one record for unmarked text
    /// @ai:post result is never empty
    /// @ai:effects pure
    pub fn extract_all(&self, text: &str, ai_model: Option<&str>) -> Vec<MetricRecord> {
        let blocks = self.split_questions(text);

        if blocks.is_empty() {
            tracing::debug!("No question markers found, extracting a single record");
            return vec![self.extract_question("Q1", text, ai_model)];
        }

        tracing::debug!("Found {} question blocks", blocks.len());
        blocks
            .iter()
            .enumerate()
            .map(|(i, block)| {
                let id = if block.question_id.is_empty() {
                    format!("Q{}", i + 1)
                } else {
                    block.question_id.clone()
                };
                self.extract_question(&id, block.content, ai_model)
            })
            .collect()
    }

    /// @ai:intent Extract metrics from one question's analysis text
    /// @ai:post every field is populated, missing ones with defaults
    /// @ai:effects pure
    pub fn extract_question(&self, question_id: &str, content: &str, ai_model: Option<&str>) -> MetricRecord {
        let depth = self.application_depth.first_match(content);
        let complexity = (depth.unwrap_or(DEFAULT_APPLICATION_DEPTH) as f64 * 2.0).clamp(1.0, 10.0);

        MetricRecord {
            question_id: question_id.to_string(),
            difficulty_label: Some(
                self.label
                    .first_match(content)
                    .unwrap_or_else(|| DEFAULT_LABEL.to_string()),
            ),
            difficulty_score: Some(
                self.difficulty_score
                    .first_match(content)
                    .unwrap_or(DEFAULT_DIFFICULTY_SCORE),
            ),
            syllabus_alignment_score: Some(
                self.alignment
                    .first_match(content)
                    .unwrap_or(DEFAULT_ALIGNMENT_SCORE),
            ),
            cognitive_level: Some(
                self.cognitive_level
                    .first_match(content)
                    .unwrap_or_else(|| DEFAULT_COGNITIVE_LEVEL.to_string()),
            ),
            complexity_index: Some(complexity),
            application_depth: Some(depth.unwrap_or(DEFAULT_APPLICATION_DEPTH) as f64),
            estimated_time_to_solve: Some(
                self.estimated_time
                    .first_match(content)
                    .unwrap_or_else(|| DEFAULT_TIME.to_string()),
            ),
            explanation: Some(
                self.explanation
                    .first_match(content)
                    .unwrap_or_else(|| DEFAULT_EXPLANATION.to_string()),
            ),
            ai_model_used: ai_model.map(str::to_string),
        }
    }

    /// @ai:intent Build a structured payload from raw analysis text
    /// @ai:effects pure
    pub fn into_payload(&self, text: &str, ai_model: Option<&str>) -> StructuredPayload {
        let records = self.extract_all(text, ai_model);

        StructuredPayload {
            analysis: text.to_string(),
            metrics: records.first().cloned(),
            all_questions_metrics: records,
            ai_model: ai_model.map(str::to_string),
        }
    }
}

impl Default for QuestionExtractor {
    fn default() -> Self {
        Self::new()
    }
}

/// @ai:intent Remove markdown emphasis and surrounding punctuation
/// @ai:effects pure
fn strip_markdown(s: &str) -> String {
    s.replace('*', "")
        .trim_matches(|c: char| c == ':' || c.is_whitespace())
        .to_string()
}

/// @ai:intent Upper-case the first letter of each alphabetic run, lower-case the rest
/// @ai:example ("very HARD") -> "Very Hard"
/// @ai:effects pure
fn title_case(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    let mut prev_alpha = false;
    for c in s.chars() {
        if c.is_alphabetic() {
            if prev_alpha {
                out.extend(c.to_lowercase());
            } else {
                out.extend(c.to_uppercase());
            }
            prev_alpha = true;
        } else {
            out.push(c);
            prev_alpha = false;
        }
    }
    out
}

fn clean_text(s: &str) -> Option<String> {
    let cleaned = strip_markdown(s);
    (!cleaned.is_empty()).then_some(cleaned)
}

fn clean_label(s: &str) -> Option<String> {
    clean_text(s).map(|l| title_case(&l))
}

fn bloom_level(s: &str) -> Option<String> {
    let level = title_case(&strip_markdown(s));
    BLOOM_LEVELS.contains(&level.as_str()).then_some(level)
}

fn clean_time(s: &str) -> Option<String> {
    let time = clean_text(s)?;
    if time.to_lowercase().contains("minute") {
        Some(time)
    } else {
        Some(format!("{} minutes", time))
    }
}

fn parse_depth(s: &str) -> Option<u32> {
    s.parse().ok()
}

fn parse_number(s: &str) -> Option<f64> {
    s.parse::<f64>().ok().filter(|v| v.is_finite())
}
