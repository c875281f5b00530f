//! @ai:module:intent Normalize backend response bodies into a single payload shape
//! @ai:module:layer domain
//! @ai:module:public_api AnalysisPayload, StructuredPayload, PLACEHOLDER_ANALYSIS
//! @ai:module:stateless true

use crate::metrics::MetricRecord;
use serde::Serialize;
use serde_json::Value;

/// Text used when a response body carries neither `analysis` nor `result`.
pub const PLACEHOLDER_ANALYSIS: &str = "Analysis completed";

/// @ai:intent Analysis returned by the backend, in either of its two shapes
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum AnalysisPayload {
    /// Legacy shape: the whole analysis is free text
    PlainText(String),
    Structured(StructuredPayload),
}

/// @ai:intent Current payload shape with optional per-question metrics
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct StructuredPayload {
    pub analysis: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub metrics: Option<MetricRecord>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub all_questions_metrics: Vec<MetricRecord>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ai_model: Option<String>,
}

impl AnalysisPayload {
    /// @ai:intent Parse a response body; text that is not JSON is taken verbatim
    /// @ai:effects pure
    pub fn parse(body: &str) -> Self {
        match serde_json::from_str::<Value>(body) {
            Ok(value) => Self::from_value(value),
            Err(e) => {
                tracing::debug!("Payload is not JSON ({}), treating as plain text", e);
                AnalysisPayload::PlainText(body.to_string())
            }
        }
    }

    /// @ai:intent Normalize any JSON value into a payload
    /// @ai:post exactly one text source exists on the result
    /// @ai:effects pure
    pub fn from_value(value: Value) -> Self {
        match value {
            Value::String(text) => AnalysisPayload::PlainText(text),
            Value::Null => AnalysisPayload::PlainText(String::new()),
            Value::Bool(_) | Value::Number(_) => AnalysisPayload::PlainText(value.to_string()),
            Value::Array(items) => AnalysisPayload::Structured(StructuredPayload {
                analysis: PLACEHOLDER_ANALYSIS.to_string(),
                all_questions_metrics: records_from_array(&items),
                ..Default::default()
            }),
            Value::Object(obj) => {
                let analysis = non_empty_str(obj.get("analysis"))
                    .or_else(|| non_empty_str(obj.get("result")))
                    .unwrap_or(PLACEHOLDER_ANALYSIS)
                    .to_string();

                let metrics = obj
                    .get("metrics")
                    .filter(|m| m.is_object())
                    .map(|m| MetricRecord::from_value(m, 0));

                let all_questions_metrics = obj
                    .get("all_questions_metrics")
                    .and_then(Value::as_array)
                    .map(|items| records_from_array(items))
                    .unwrap_or_default();

                let ai_model = non_empty_str(obj.get("ai_model")).map(str::to_string);

                AnalysisPayload::Structured(StructuredPayload {
                    analysis,
                    metrics,
                    all_questions_metrics,
                    ai_model,
                })
            }
        }
    }

    /// @ai:intent The single text source of this payload
    /// @ai:effects pure
    pub fn text(&self) -> &str {
        match self {
            AnalysisPayload::PlainText(text) => text,
            AnalysisPayload::Structured(s) => &s.analysis,
        }
    }

    /// @ai:intent Model name reported by the backend, if any
    /// @ai:effects pure
    pub fn ai_model(&self) -> Option<&str> {
        match self {
            AnalysisPayload::PlainText(_) => None,
            AnalysisPayload::Structured(s) => s.ai_model.as_deref(),
        }
    }
}

impl From<&str> for AnalysisPayload {
    fn from(text: &str) -> Self {
        AnalysisPayload::PlainText(text.to_string())
    }
}

impl From<StructuredPayload> for AnalysisPayload {
    fn from(payload: StructuredPayload) -> Self {
        AnalysisPayload::Structured(payload)
    }
}

fn records_from_array(items: &[Value]) -> Vec<MetricRecord> {
    items
        .iter()
        .enumerate()
        .map(|(i, item)| MetricRecord::from_value(item, i))
        .collect()
}

fn non_empty_str(value: Option<&Value>) -> Option<&str> {
    value
        .and_then(Value::as_str)
        .filter(|s| !s.trim().is_empty())
}
