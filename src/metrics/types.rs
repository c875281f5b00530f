//! @ai:module:intent Metric types for per-question analysis results
//! @ai:module:layer domain
//! @ai:module:public_api MetricRecord, DifficultyBucket, DifficultyDistribution, AggregateSummary, EstimatedTime, MetricKey, ChartSeries, Aggregation
//! @ai:module:stateless true

use serde::Serialize;
use serde_json::{Map, Value};

/// @ai:intent Metrics derived for a single question
///
/// Every field except `question_id` may be absent. Records are built once at
/// the payload boundary, so `question_id` is always populated.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct MetricRecord {
    pub question_id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub difficulty_label: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub difficulty_score: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub syllabus_alignment_score: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cognitive_level: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub complexity_index: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub application_depth: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub estimated_time_to_solve: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub explanation: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ai_model_used: Option<String>,
}

impl MetricRecord {
    /// @ai:intent Build a record from an untrusted JSON value
    /// @ai:pre index is the 0-based position of the record in its list
    /// @ai:post question_id is non-empty
    /// @ai:effects pure
    pub fn from_value(value: &Value, index: usize) -> Self {
        let empty = Map::new();
        let obj = value.as_object().unwrap_or(&empty);

        Self {
            question_id: text_field(obj, "question_id")
                .unwrap_or_else(|| format!("Q{}", index + 1)),
            difficulty_label: text_field(obj, "difficulty_label"),
            difficulty_score: number_field(obj, "difficulty_score"),
            syllabus_alignment_score: number_field(obj, "syllabus_alignment_score"),
            cognitive_level: text_field(obj, "cognitive_level"),
            complexity_index: number_field(obj, "complexity_index"),
            application_depth: number_field(obj, "application_depth"),
            estimated_time_to_solve: time_field(obj, "estimated_time_to_solve"),
            explanation: text_field(obj, "explanation"),
            ai_model_used: text_field(obj, "ai_model_used"),
        }
    }
}

/// @ai:intent Read a finite number that may be encoded as a JSON number or string
/// @ai:effects pure
fn number_field(obj: &Map<String, Value>, key: &str) -> Option<f64> {
    let value = match obj.get(key)? {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse::<f64>().ok(),
        _ => None,
    }?;

    value.is_finite().then_some(value)
}

/// @ai:intent Read a non-blank string, stringifying scalar numbers and booleans
/// @ai:effects pure
fn text_field(obj: &Map<String, Value>, key: &str) -> Option<String> {
    let text = match obj.get(key)? {
        Value::String(s) => s.trim().to_string(),
        Value::Number(n) => n.to_string(),
        Value::Bool(b) => b.to_string(),
        _ => return None,
    };

    (!text.is_empty()).then_some(text)
}

/// @ai:intent Read a solving-time field; bare numbers are taken as minutes
/// @ai:effects pure
fn time_field(obj: &Map<String, Value>, key: &str) -> Option<String> {
    match obj.get(key)? {
        Value::Number(n) => Some(format!("{} minutes", n)),
        _ => text_field(obj, key),
    }
}

/// @ai:intent Normalized difficulty bucket used for distribution charts
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub enum DifficultyBucket {
    Easy,
    Moderate,
    Hard,
    Unknown,
}

impl DifficultyBucket {
    pub const ALL: [DifficultyBucket; 4] = [
        DifficultyBucket::Easy,
        DifficultyBucket::Moderate,
        DifficultyBucket::Hard,
        DifficultyBucket::Unknown,
    ];

    /// @ai:intent Map a free-form label to its bucket by substring
    /// @ai:example (Some("Very Difficult")) -> Hard
    /// @ai:example (None) -> Unknown
    /// @ai:effects pure
    pub fn classify(label: Option<&str>) -> Self {
        let Some(label) = label else {
            return DifficultyBucket::Unknown;
        };
        let level = label.to_lowercase();

        if level.contains("easy") {
            DifficultyBucket::Easy
        } else if level.contains("moderate") || level.contains("medium") {
            DifficultyBucket::Moderate
        } else if level.contains("hard") || level.contains("tough") || level.contains("difficult")
        {
            DifficultyBucket::Hard
        } else {
            DifficultyBucket::Unknown
        }
    }

    /// @ai:intent Convert bucket to its display name
    /// @ai:effects pure
    pub fn as_str(&self) -> &'static str {
        match self {
            DifficultyBucket::Easy => "Easy",
            DifficultyBucket::Moderate => "Moderate",
            DifficultyBucket::Hard => "Hard",
            DifficultyBucket::Unknown => "Unknown",
        }
    }
}

impl std::fmt::Display for DifficultyBucket {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// @ai:intent One slice of the difficulty distribution
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DistributionSegment {
    pub bucket: DifficultyBucket,
    pub count: usize,
    pub percentage: f64,
}

/// @ai:intent Count and share of records per difficulty bucket
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct DifficultyDistribution {
    pub total: usize,
    /// Only buckets with at least one record, in `DifficultyBucket::ALL` order
    pub segments: Vec<DistributionSegment>,
}

impl DifficultyDistribution {
    /// @ai:intent Number of records in a bucket
    /// @ai:effects pure
    pub fn count_of(&self, bucket: DifficultyBucket) -> usize {
        self.segment(bucket).map(|s| s.count).unwrap_or(0)
    }

    /// @ai:intent Share of records in a bucket, 0-100
    /// @ai:effects pure
    pub fn percentage_of(&self, bucket: DifficultyBucket) -> f64 {
        self.segment(bucket).map(|s| s.percentage).unwrap_or(0.0)
    }

    fn segment(&self, bucket: DifficultyBucket) -> Option<&DistributionSegment> {
        self.segments.iter().find(|s| s.bucket == bucket)
    }
}

/// @ai:intent Total solving time split into hours and minutes
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct EstimatedTime {
    pub total: u64,
    pub hours: u64,
    pub minutes: u64,
}

impl EstimatedTime {
    /// @ai:intent Split a minute count
    /// @ai:example (135) -> { total: 135, hours: 2, minutes: 15 }
    /// @ai:effects pure
    pub fn from_minutes(total: u64) -> Self {
        Self {
            total,
            hours: total / 60,
            minutes: total % 60,
        }
    }
}

impl std::fmt::Display for EstimatedTime {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if self.hours > 0 {
            write!(f, "{}h {}m", self.hours, self.minutes)
        } else {
            write!(f, "{}m", self.minutes)
        }
    }
}

/// @ai:intent Summary statistics across all records of one payload
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AggregateSummary {
    pub avg_difficulty: f64,
    pub avg_alignment: f64,
    pub avg_complexity: f64,
    pub total_questions: usize,
    /// Taken from the first record only
    pub cognitive_level: String,
    pub total_estimated_minutes: EstimatedTime,
}

impl Default for AggregateSummary {
    fn default() -> Self {
        Self {
            avg_difficulty: 0.0,
            avg_alignment: 0.0,
            avg_complexity: 0.0,
            total_questions: 0,
            cognitive_level: "Apply".to_string(),
            total_estimated_minutes: EstimatedTime::default(),
        }
    }
}

/// @ai:intent Numeric record fields that can be charted
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum MetricKey {
    DifficultyScore,
    SyllabusAlignmentScore,
    ComplexityIndex,
    ApplicationDepth,
}

impl MetricKey {
    pub const ALL: [MetricKey; 4] = [
        MetricKey::DifficultyScore,
        MetricKey::SyllabusAlignmentScore,
        MetricKey::ComplexityIndex,
        MetricKey::ApplicationDepth,
    ];

    /// @ai:intent Field name as it appears in payload JSON
    /// @ai:effects pure
    pub fn as_str(&self) -> &'static str {
        match self {
            MetricKey::DifficultyScore => "difficulty_score",
            MetricKey::SyllabusAlignmentScore => "syllabus_alignment_score",
            MetricKey::ComplexityIndex => "complexity_index",
            MetricKey::ApplicationDepth => "application_depth",
        }
    }

    /// @ai:intent Human readable chart title
    /// @ai:effects pure
    pub fn title(&self) -> &'static str {
        match self {
            MetricKey::DifficultyScore => "Difficulty Scores",
            MetricKey::SyllabusAlignmentScore => "Syllabus Alignment",
            MetricKey::ComplexityIndex => "Complexity Index",
            MetricKey::ApplicationDepth => "Application Depth",
        }
    }

    /// @ai:intent Read this metric from a record; absent values chart as zero
    /// @ai:effects pure
    pub fn value_of(&self, record: &MetricRecord) -> f64 {
        let value = match self {
            MetricKey::DifficultyScore => record.difficulty_score,
            MetricKey::SyllabusAlignmentScore => record.syllabus_alignment_score,
            MetricKey::ComplexityIndex => record.complexity_index,
            MetricKey::ApplicationDepth => record.application_depth,
        };
        value.unwrap_or(0.0)
    }
}

/// @ai:intent A labelled bar in a chart series
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChartPoint {
    pub label: String,
    pub value: f64,
}

/// @ai:intent Chart-ready values for one metric with an axis maximum
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChartSeries {
    pub metric: MetricKey,
    pub title: String,
    pub points: Vec<ChartPoint>,
    /// `max(observed maximum, axis floor)`
    pub max_value: f64,
}

/// @ai:intent Where the records of an aggregation came from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RecordSource {
    AllQuestions,
    SingleMetrics,
    Synthesized,
}

/// @ai:intent Output of aggregating one payload
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Aggregation {
    pub source: RecordSource,
    pub records: Vec<MetricRecord>,
    pub summary: AggregateSummary,
    pub distribution: DifficultyDistribution,
}
