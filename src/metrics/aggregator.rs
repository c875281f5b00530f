//! @ai:module:intent Statistical aggregation of per-question metrics
//! @ai:module:layer application
//! @ai:module:public_api MetricsAggregator, MetricsAggregatorTrait, difficulty_distribution
//! @ai:module:depends_on interpreter, payload, config
//! @ai:module:stateless true

use crate::config::{FallbackScores, InsightConfig, SummaryConfig};
use crate::interpreter::{Interpretation, ResultInterpreter};
use crate::metrics::types::{
    AggregateSummary, Aggregation, ChartPoint, ChartSeries, DifficultyBucket,
    DifficultyDistribution, DistributionSegment, EstimatedTime, MetricKey, MetricRecord,
    RecordSource,
};
use crate::payload::AnalysisPayload;
use regex::Regex;
use std::collections::BTreeMap;

const DEFAULT_MODEL_LABEL: &str = "AI Analysis";

/// @ai:intent Trait for metrics aggregation
pub trait MetricsAggregatorTrait: Send + Sync {
    /// @ai:intent Normalize a payload's records and compute summary data
    fn aggregate(&self, payload: &AnalysisPayload) -> Aggregation;
}

/// @ai:intent Aggregates metric records into summaries and chart data
pub struct MetricsAggregator {
    interpreter: ResultInterpreter,
    fallback: FallbackScores,
    summary: SummaryConfig,
    minutes_regex: Regex,
}

impl MetricsAggregator {
    /// @ai:intent Create an aggregator with the current fallback scores
    /// @ai:effects pure
    pub fn new() -> Self {
        Self::with_settings(FallbackScores::default(), SummaryConfig::default())
    }

    /// @ai:intent Create an aggregator from loaded configuration
    /// @ai:effects pure
    pub fn from_config(config: &InsightConfig) -> Self {
        Self::with_settings(config.fallback.scores(), config.summary.clone())
    }

    /// @ai:intent Create an aggregator with explicit fallback scores and summary settings
    /// @ai:post non-finite settings are replaced by defaults
    /// @ai:effects pure
    pub fn with_settings(fallback: FallbackScores, mut summary: SummaryConfig) -> Self {
        let defaults = FallbackScores::default();
        let fallback = FallbackScores {
            difficulty: finite_or(fallback.difficulty, defaults.difficulty),
            alignment: finite_or(fallback.alignment, defaults.alignment),
            complexity: finite_or(fallback.complexity, defaults.complexity),
        };
        if !summary.chart_axis_floor.is_finite() {
            tracing::warn!("Chart axis floor is not finite, using default");
            summary.chart_axis_floor = SummaryConfig::default().chart_axis_floor;
        }

        Self {
            interpreter: ResultInterpreter::new(),
            fallback,
            summary,
            minutes_regex: Regex::new(r"([0-9]+)").expect("Invalid regex"),
        }
    }

    pub fn fallback(&self) -> FallbackScores {
        self.fallback
    }

    /// @ai:intent Interpreter used for synthesized records, shared with report building
    pub fn interpreter(&self) -> &ResultInterpreter {
        &self.interpreter
    }

    /// @ai:intent Pick the record list for a payload in priority order
    /// @ai:post result has at least one record
    /// @ai:effects pure
    pub fn select_records(&self, payload: &AnalysisPayload) -> (RecordSource, Vec<MetricRecord>) {
        if let AnalysisPayload::Structured(s) = payload {
            if !s.all_questions_metrics.is_empty() {
                return (RecordSource::AllQuestions, s.all_questions_metrics.clone());
            }
            if let Some(metrics) = &s.metrics {
                return (RecordSource::SingleMetrics, vec![metrics.clone()]);
            }
        }

        tracing::debug!("Payload has no metric records, synthesizing one from the text");
        let interpretation = self.interpreter.interpret_text(payload.text());
        (
            RecordSource::Synthesized,
            vec![self.synthesize_record(&interpretation, payload.ai_model())],
        )
    }

    /// @ai:intent Build the single record used for payloads without metrics
    /// @ai:effects pure
    pub fn synthesize_record(&self, interpretation: &Interpretation, ai_model: Option<&str>) -> MetricRecord {
        let score = interpretation.score;

        MetricRecord {
            question_id: "Q1".to_string(),
            difficulty_label: Some(interpretation.difficulty.capitalized().to_string()),
            difficulty_score: Some(score.unwrap_or(self.fallback.difficulty)),
            syllabus_alignment_score: Some(score.unwrap_or(self.fallback.alignment)),
            cognitive_level: Some(self.summary.default_cognitive_level.clone()),
            complexity_index: Some(score.unwrap_or(self.fallback.complexity)),
            application_depth: None,
            estimated_time_to_solve: None,
            explanation: Some(interpretation.text.clone()),
            ai_model_used: Some(ai_model.unwrap_or(DEFAULT_MODEL_LABEL).to_string()),
        }
    }

    /// @ai:intent Compute averages, counts and total time for a record list
    /// @ai:post empty input yields zeros and the default cognitive level
    /// @ai:effects pure
    pub fn summarize(&self, records: &[MetricRecord]) -> AggregateSummary {
        if records.is_empty() {
            return AggregateSummary {
                cognitive_level: self.summary.default_cognitive_level.clone(),
                ..Default::default()
            };
        }

        let avg = |key: MetricKey| round_to(average(records.iter().map(|r| key.value_of(r))), 1);

        let total_minutes = records
            .iter()
            .map(|r| self.minutes_of(r))
            .fold(0u64, |acc, m| acc.saturating_add(m));

        AggregateSummary {
            avg_difficulty: avg(MetricKey::DifficultyScore),
            avg_alignment: avg(MetricKey::SyllabusAlignmentScore),
            avg_complexity: avg(MetricKey::ComplexityIndex),
            total_questions: records.len(),
            cognitive_level: records[0]
                .cognitive_level
                .clone()
                .unwrap_or_else(|| self.summary.default_cognitive_level.clone()),
            total_estimated_minutes: EstimatedTime::from_minutes(total_minutes),
        }
    }

    /// @ai:intent Minutes embedded in a record's solving time, or the fallback
    /// @ai:example ("about 25 min") -> 25
    /// @ai:effects pure
    pub fn minutes_of(&self, record: &MetricRecord) -> u64 {
        record
            .estimated_time_to_solve
            .as_deref()
            .and_then(|time| self.minutes_regex.captures(time))
            .and_then(|caps| caps.get(1))
            .and_then(|m| m.as_str().parse::<u64>().ok())
            .unwrap_or(self.summary.fallback_minutes)
    }

    /// @ai:intent Chart points for one metric plus an axis maximum
    /// @ai:post max_value >= chart axis floor
    /// @ai:effects pure
    pub fn chart_series(&self, records: &[MetricRecord], key: MetricKey) -> ChartSeries {
        let single = records.len() == 1;

        let points: Vec<ChartPoint> = records
            .iter()
            .enumerate()
            .map(|(i, record)| ChartPoint {
                label: if single {
                    "Analysis".to_string()
                } else {
                    format!("Q{}", i + 1)
                },
                value: key.value_of(record),
            })
            .collect();

        let max_value = points
            .iter()
            .map(|p| p.value)
            .fold(self.summary.chart_axis_floor, f64::max);

        ChartSeries {
            metric: key,
            title: key.title().to_string(),
            points,
            max_value,
        }
    }

    /// @ai:intent Chart series for every chartable metric
    /// @ai:effects pure
    pub fn all_chart_series(&self, records: &[MetricRecord]) -> Vec<ChartSeries> {
        MetricKey::ALL
            .iter()
            .map(|key| self.chart_series(records, *key))
            .collect()
    }
}

impl Default for MetricsAggregator {
    fn default() -> Self {
        Self::new()
    }
}

impl MetricsAggregatorTrait for MetricsAggregator {
    /// @ai:intent Aggregate a payload into records, summary and distribution
    /// @ai:idempotent true
    /// @ai:effects pure
    fn aggregate(&self, payload: &AnalysisPayload) -> Aggregation {
        let (source, records) = self.select_records(payload);
        let summary = self.summarize(&records);
        let distribution = difficulty_distribution(&records);

        Aggregation {
            source,
            records,
            summary,
            distribution,
        }
    }
}

/// @ai:intent Count records per difficulty bucket with percentages
/// @ai:post percentages sum to 100 for non-empty input
/// @ai:effects pure
pub fn difficulty_distribution(records: &[MetricRecord]) -> DifficultyDistribution {
    if records.is_empty() {
        return DifficultyDistribution::default();
    }

    let mut counts: BTreeMap<DifficultyBucket, usize> = BTreeMap::new();
    for record in records {
        let bucket = DifficultyBucket::classify(record.difficulty_label.as_deref());
        *counts.entry(bucket).or_insert(0) += 1;
    }

    let total = records.len();
    let segments = counts
        .into_iter()
        .map(|(bucket, count)| DistributionSegment {
            bucket,
            count,
            percentage: (count as f64 / total as f64) * 100.0,
        })
        .collect();

    DifficultyDistribution { total, segments }
}

/// @ai:intent Calculate average of an iterator of f64 without overflowing the running sum
/// @ai:effects pure
fn average<I: Iterator<Item = f64>>(iter: I) -> f64 {
    iter.enumerate().fold(0.0, |mean, (i, v)| {
        let n = (i + 1) as f64;
        mean - mean / n + v / n
    })
}

/// @ai:intent Round to a fixed number of decimals; non-finite input becomes 0
/// @ai:post values too large to scale are returned unrounded
/// @ai:effects pure
fn round_to(value: f64, decimals: u32) -> f64 {
    if !value.is_finite() {
        return 0.0;
    }
    let factor = 10f64.powi(decimals as i32);
    let scaled = value * factor;
    if !scaled.is_finite() {
        return value;
    }
    scaled.round() / factor
}

fn finite_or(value: f64, default: f64) -> f64 {
    if value.is_finite() {
        value
    } else {
        tracing::warn!("Fallback score {} is not finite, using {}", value, default);
        default
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::interpreter::Difficulty;
    use crate::payload::StructuredPayload;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    fn record(label: &str, difficulty: f64, alignment: f64, complexity: f64, time: &str) -> MetricRecord {
        MetricRecord {
            question_id: "Q".to_string(),
            difficulty_label: Some(label.to_string()),
            difficulty_score: Some(difficulty),
            syllabus_alignment_score: Some(alignment),
            cognitive_level: Some("Analyze".to_string()),
            complexity_index: Some(complexity),
            estimated_time_to_solve: Some(time.to_string()),
            ..Default::default()
        }
    }

    #[test]
    fn test_average() {
        let values = vec![10.0, 20.0, 30.0];
        assert!((average(values.into_iter()) - 20.0).abs() < 0.01);
    }

    #[test]
    fn test_average_empty() {
        let values: Vec<f64> = vec![];
        assert!((average(values.into_iter()) - 0.0).abs() < 0.01);
    }

    #[test]
    fn test_round_to() {
        assert_eq!(round_to(6.66, 1), 6.7);
        assert_eq!(round_to(f64::NAN, 1), 0.0);
        assert_eq!(round_to(1.5e308, 1), 1.5e308);
    }

    #[test]
    fn test_average_of_huge_values_stays_finite() {
        let values = vec![1.5e308, 1.5e308];
        assert_eq!(average(values.into_iter()), 1.5e308);

        let mixed = vec![-1.5e308, 1.5e308];
        assert_eq!(average(mixed.into_iter()), 0.0);
    }

    #[test]
    fn test_huge_scores_average_to_their_mean() {
        let payload = AnalysisPayload::from_value(json!({
            "analysis": "",
            "all_questions_metrics": [
                {"difficulty_score": 1.5e308},
                {"difficulty_score": 1.5e308}
            ]
        }));

        let summary = MetricsAggregator::new().aggregate(&payload).summary;
        assert_eq!(summary.avg_difficulty, 1.5e308);
        assert_eq!(summary.total_questions, 2);
    }

    #[test]
    fn test_total_minutes_saturates_instead_of_overflowing() {
        let payload = AnalysisPayload::from_value(json!({
            "analysis": "",
            "all_questions_metrics": [
                {"estimated_time_to_solve": "18446744073709551615 minutes"},
                {"estimated_time_to_solve": "18446744073709551615 minutes"},
                {"estimated_time_to_solve": "20 minutes"}
            ]
        }));

        let summary = MetricsAggregator::new().aggregate(&payload).summary;
        assert_eq!(summary.total_estimated_minutes.total, u64::MAX);
    }

    #[test]
    fn test_minutes_ignore_non_ascii_digits() {
        let aggregator = MetricsAggregator::new();
        let record = MetricRecord {
            estimated_time_to_solve: Some("\u{663} or 25 minutes".to_string()),
            ..Default::default()
        };
        assert_eq!(aggregator.minutes_of(&record), 25);
    }

    #[test]
    fn test_all_questions_metrics_take_priority() {
        let payload = AnalysisPayload::from_value(json!({
            "analysis": "difficulty: easy",
            "metrics": {"question_id": "single"},
            "all_questions_metrics": [{"question_id": "a"}, {"question_id": "b"}]
        }));

        let aggregation = MetricsAggregator::new().aggregate(&payload);
        assert_eq!(aggregation.source, RecordSource::AllQuestions);
        let ids: Vec<_> = aggregation.records.iter().map(|r| r.question_id.as_str()).collect();
        assert_eq!(ids, vec!["a", "b"]);
    }

    #[test]
    fn test_single_metrics_is_wrapped() {
        let payload = AnalysisPayload::from_value(json!({
            "analysis": "difficulty: easy",
            "metrics": {"difficulty_label": "Easy", "difficulty_score": 3},
            "all_questions_metrics": []
        }));

        let aggregation = MetricsAggregator::new().aggregate(&payload);
        assert_eq!(aggregation.source, RecordSource::SingleMetrics);
        assert_eq!(aggregation.records.len(), 1);
        assert_eq!(aggregation.records[0].difficulty_score, Some(3.0));
    }

    #[test]
    fn test_synthesized_record_matches_interpreter() {
        let text = "Overall the paper has tough difficulty.";
        let payload = AnalysisPayload::from_value(json!({
            "analysis": text,
            "all_questions_metrics": []
        }));

        let aggregator = MetricsAggregator::new();
        let aggregation = aggregator.aggregate(&payload);
        let interpretation = ResultInterpreter::new().interpret_text(text);

        assert_eq!(aggregation.source, RecordSource::Synthesized);
        assert_eq!(aggregation.records.len(), 1);
        assert_eq!(interpretation.difficulty, Difficulty::Tough);
        assert_eq!(
            aggregation.records[0].difficulty_label.as_deref(),
            Some(interpretation.difficulty.capitalized())
        );
        assert_eq!(
            aggregation.records[0],
            MetricRecord {
                question_id: "Q1".to_string(),
                difficulty_label: Some("Tough".to_string()),
                difficulty_score: Some(5.0),
                syllabus_alignment_score: Some(7.0),
                cognitive_level: Some("Apply".to_string()),
                complexity_index: Some(6.0),
                application_depth: None,
                estimated_time_to_solve: None,
                explanation: Some(text.to_string()),
                ai_model_used: Some("AI Analysis".to_string()),
            }
        );
    }

    #[test]
    fn test_synthesized_record_uses_score_and_profile() {
        let legacy = MetricsAggregator::with_settings(FallbackScores::LEGACY, SummaryConfig::default());

        let no_score = legacy.aggregate(&AnalysisPayload::from("Easy questions."));
        assert_eq!(no_score.records[0].difficulty_score, Some(6.5));
        assert_eq!(no_score.records[0].syllabus_alignment_score, Some(8.5));
        assert_eq!(no_score.records[0].complexity_index, Some(7.2));

        let zero_score = legacy.aggregate(&AnalysisPayload::from("Score: 0"));
        assert_eq!(zero_score.records[0].difficulty_score, Some(0.0));
        assert_eq!(zero_score.records[0].complexity_index, Some(0.0));
    }

    #[test]
    fn test_synthesized_record_keeps_model_name() {
        let payload = AnalysisPayload::Structured(StructuredPayload {
            analysis: "moderate".to_string(),
            ai_model: Some("gemini".to_string()),
            ..Default::default()
        });
        let aggregation = MetricsAggregator::new().aggregate(&payload);
        assert_eq!(aggregation.records[0].ai_model_used.as_deref(), Some("gemini"));
    }

    #[test]
    fn test_non_finite_fallback_is_replaced() {
        let aggregator = MetricsAggregator::with_settings(
            FallbackScores {
                difficulty: f64::NAN,
                alignment: 8.0,
                complexity: f64::INFINITY,
            },
            SummaryConfig::default(),
        );
        assert_eq!(
            aggregator.fallback(),
            FallbackScores {
                difficulty: 5.0,
                alignment: 8.0,
                complexity: 6.0,
            }
        );
    }

    #[test]
    fn test_distribution_collapses_synonyms() {
        let records = vec![
            record("Tough", 8.0, 7.0, 8.0, "20"),
            record("hard", 9.0, 7.0, 8.0, "20"),
            record("very difficult", 9.0, 7.0, 8.0, "20"),
            record("Easy", 2.0, 7.0, 2.0, "20"),
            record("medium", 5.0, 7.0, 5.0, "20"),
            record("???", 5.0, 7.0, 5.0, "20"),
        ];

        let distribution = difficulty_distribution(&records);
        assert_eq!(distribution.total, 6);
        assert_eq!(distribution.count_of(DifficultyBucket::Hard), 3);
        assert_eq!(distribution.count_of(DifficultyBucket::Easy), 1);
        assert_eq!(distribution.count_of(DifficultyBucket::Moderate), 1);
        assert_eq!(distribution.count_of(DifficultyBucket::Unknown), 1);
        assert!((distribution.percentage_of(DifficultyBucket::Hard) - 50.0).abs() < 0.01);

        let total: f64 = distribution.segments.iter().map(|s| s.percentage).sum();
        assert!((total - 100.0).abs() < 0.01);

        let order: Vec<_> = distribution.segments.iter().map(|s| s.bucket).collect();
        assert_eq!(order, DifficultyBucket::ALL.to_vec());
    }

    #[test]
    fn test_distribution_of_thirds_sums_to_hundred() {
        let records = vec![
            record("Easy", 1.0, 1.0, 1.0, ""),
            record("Moderate", 1.0, 1.0, 1.0, ""),
            record("Hard", 1.0, 1.0, 1.0, ""),
        ];
        let distribution = difficulty_distribution(&records);
        let total: f64 = distribution.segments.iter().map(|s| s.percentage).sum();
        assert!((total - 100.0).abs() < 0.01);
    }

    #[test]
    fn test_distribution_missing_label_is_unknown() {
        let records = vec![MetricRecord::default()];
        let distribution = difficulty_distribution(&records);
        assert_eq!(distribution.count_of(DifficultyBucket::Unknown), 1);
        assert!(difficulty_distribution(&[]).segments.is_empty());
    }

    #[test]
    fn test_total_minutes_falls_back_per_record() {
        let records = vec![
            record("Easy", 1.0, 1.0, 1.0, "15 minutes"),
            record("Easy", 1.0, 1.0, 1.0, "30 minutes"),
            record("Easy", 1.0, 1.0, 1.0, "a while"),
        ];

        let summary = MetricsAggregator::new().summarize(&records);
        assert_eq!(
            summary.total_estimated_minutes,
            EstimatedTime {
                total: 60,
                hours: 1,
                minutes: 0
            }
        );
    }

    #[test]
    fn test_single_record_averages_equal_record() {
        let records = vec![record("Moderate", 6.4, 8.2, 5.9, "20 minutes")];
        let summary = MetricsAggregator::new().summarize(&records);

        assert_eq!(summary.avg_difficulty, 6.4);
        assert_eq!(summary.avg_alignment, 8.2);
        assert_eq!(summary.avg_complexity, 5.9);
        assert_eq!(summary.total_questions, 1);
        assert_eq!(summary.cognitive_level, "Analyze");
    }

    #[test]
    fn test_summary_averages_and_first_cognitive_level() {
        let mut second = record("Hard", 9.0, 6.0, 8.0, "40 min");
        second.cognitive_level = Some("Create".to_string());
        let records = vec![record("Easy", 3.0, 9.0, 2.0, "10 min"), second];

        let summary = MetricsAggregator::new().summarize(&records);
        assert_eq!(summary.avg_difficulty, 6.0);
        assert_eq!(summary.avg_alignment, 7.5);
        assert_eq!(summary.avg_complexity, 5.0);
        assert_eq!(summary.cognitive_level, "Analyze");
        assert_eq!(summary.total_estimated_minutes.total, 50);
    }

    #[test]
    fn test_missing_numbers_count_as_zero() {
        let records = vec![
            MetricRecord {
                difficulty_score: Some(8.0),
                ..Default::default()
            },
            MetricRecord::default(),
        ];
        let summary = MetricsAggregator::new().summarize(&records);
        assert_eq!(summary.avg_difficulty, 4.0);
        assert_eq!(summary.cognitive_level, "Apply");
    }

    #[test]
    fn test_empty_summary() {
        let summary = MetricsAggregator::new().summarize(&[]);
        assert_eq!(summary, AggregateSummary::default());
    }

    #[test]
    fn test_aggregate_is_idempotent() {
        let payload = AnalysisPayload::from_value(json!({
            "analysis": "Difficulty: hard. Score: 8.5",
            "all_questions_metrics": [
                {"difficulty_label": "Hard", "difficulty_score": 8.5, "estimated_time_to_solve": "25 minutes"},
                {"difficulty_label": "Easy", "difficulty_score": 2.25}
            ]
        }));

        let aggregator = MetricsAggregator::new();
        let first = aggregator.aggregate(&payload);
        let second = aggregator.aggregate(&payload);
        assert_eq!(first, second);
        assert_eq!(
            serde_json::to_string(&first.summary).unwrap(),
            serde_json::to_string(&second.summary).unwrap()
        );
    }

    #[test]
    fn test_chart_series_labels_and_floor() {
        let aggregator = MetricsAggregator::new();
        let records = vec![
            record("Easy", 3.0, 4.0, 2.0, ""),
            record("Hard", 12.0, 4.0, 2.0, ""),
        ];

        let series = aggregator.chart_series(&records, MetricKey::DifficultyScore);
        let labels: Vec<_> = series.points.iter().map(|p| p.label.as_str()).collect();
        assert_eq!(labels, vec!["Q1", "Q2"]);
        assert_eq!(series.max_value, 12.0);

        let low = aggregator.chart_series(&records, MetricKey::ComplexityIndex);
        assert_eq!(low.max_value, 10.0);

        let depth = aggregator.chart_series(&records, MetricKey::ApplicationDepth);
        assert!(depth.points.iter().all(|p| p.value == 0.0));
    }

    #[test]
    fn test_single_record_chart_label() {
        let aggregator = MetricsAggregator::new();
        let series = aggregator.chart_series(
            &[record("Easy", 3.0, 4.0, 2.0, "")],
            MetricKey::SyllabusAlignmentScore,
        );
        assert_eq!(series.points[0].label, "Analysis");
        assert_eq!(series.points[0].value, 4.0);
        assert_eq!(aggregator.all_chart_series(&[]).len(), 4);
    }
}
