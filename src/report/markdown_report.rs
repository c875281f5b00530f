//! @ai:module:intent Markdown report generation
//! @ai:module:layer infrastructure
//! @ai:module:public_api MarkdownReporter, MarkdownReporterTrait
//! @ai:module:stateless true

use crate::error::{Error, Result};
use crate::metrics::{AggregateSummary, DifficultyDistribution, MetricRecord};
use crate::report::AnalysisReport;
use std::fmt::Write as FmtWrite;
use std::path::Path;

/// @ai:intent Trait for Markdown report generation
pub trait MarkdownReporterTrait: Send + Sync {
    /// @ai:intent Render a report as Markdown text
    fn render(&self, report: &AnalysisReport) -> String;

    /// @ai:intent Generate Markdown report to file
    fn generate(&self, report: &AnalysisReport, output_path: &Path) -> Result<()>;
}

/// @ai:intent Generates Markdown reports from analysis results
pub struct MarkdownReporter;

impl MarkdownReporter {
    /// @ai:intent Create a new Markdown reporter
    /// @ai:effects pure
    pub fn new() -> Self {
        Self
    }

    /// @ai:intent Format an optional score for tables
    /// @ai:effects pure
    fn format_score(value: Option<f64>) -> String {
        match value {
            Some(v) if v.is_finite() => format!("{:.1}", v),
            _ => "-".to_string(),
        }
    }

    /// @ai:intent Generate title and headline section
    /// @ai:effects pure
    fn generate_header(report: &AnalysisReport) -> String {
        let mut output = String::new();
        let interpretation = &report.interpretation;

        writeln!(output, "# Question Paper Analysis").unwrap();
        writeln!(output).unwrap();
        writeln!(output, "**Date:** {}", report.timestamp).unwrap();
        writeln!(
            output,
            "**Model:** {}",
            report.ai_model.as_deref().unwrap_or("unknown")
        )
        .unwrap();
        writeln!(
            output,
            "**Difficulty:** {} ({})",
            interpretation.difficulty.capitalized(),
            interpretation.difficulty.tone()
        )
        .unwrap();
        writeln!(
            output,
            "**Score:** {}",
            interpretation
                .score
                .filter(|s| s.is_finite())
                .map(|s| format!("{}/10", s))
                .unwrap_or_else(|| "-".to_string())
        )
        .unwrap();
        writeln!(output).unwrap();

        output
    }

    /// @ai:intent Generate overview table from the summary
    /// @ai:effects pure
    fn generate_overview(summary: &AggregateSummary) -> String {
        let mut output = String::new();

        writeln!(output, "## Overview").unwrap();
        writeln!(output).unwrap();
        writeln!(output, "| Metric | Value |").unwrap();
        writeln!(output, "|--------|-------|").unwrap();
        writeln!(output, "| Average Difficulty | {:.1} |", summary.avg_difficulty).unwrap();
        writeln!(output, "| Average Alignment | {:.1} |", summary.avg_alignment).unwrap();
        writeln!(output, "| Average Complexity | {:.1} |", summary.avg_complexity).unwrap();
        writeln!(output, "| Total Questions | {} |", summary.total_questions).unwrap();
        writeln!(output, "| Cognitive Level | {} |", summary.cognitive_level).unwrap();
        writeln!(
            output,
            "| Estimated Time | {} |",
            summary.total_estimated_minutes
        )
        .unwrap();

        writeln!(output).unwrap();
        output
    }

    /// @ai:intent Generate difficulty distribution table
    /// @ai:effects pure
    fn generate_distribution(distribution: &DifficultyDistribution) -> String {
        let mut output = String::new();

        writeln!(output, "## Difficulty Distribution").unwrap();
        writeln!(output).unwrap();
        writeln!(output, "| Difficulty | Questions | Share |").unwrap();
        writeln!(output, "|------------|-----------|-------|").unwrap();

        for segment in &distribution.segments {
            writeln!(
                output,
                "| {} | {} | {:.1}% |",
                segment.bucket, segment.count, segment.percentage
            )
            .unwrap();
        }

        writeln!(output).unwrap();
        output
    }

    /// @ai:intent Generate per-question table
    /// @ai:effects pure
    fn generate_questions(records: &[MetricRecord]) -> String {
        let mut output = String::new();

        writeln!(output, "## Questions").unwrap();
        writeln!(output).unwrap();
        writeln!(
            output,
            "| Question | Difficulty | Score | Alignment | Complexity | Level | Time |"
        )
        .unwrap();
        writeln!(output, "|----------|------------|-------|-----------|------------|-------|------|").unwrap();

        for record in records {
            writeln!(
                output,
                "| {} | {} | {} | {} | {} | {} | {} |",
                record.question_id,
                record.difficulty_label.as_deref().unwrap_or("Unknown"),
                Self::format_score(record.difficulty_score),
                Self::format_score(record.syllabus_alignment_score),
                Self::format_score(record.complexity_index),
                record.cognitive_level.as_deref().unwrap_or("-"),
                record.estimated_time_to_solve.as_deref().unwrap_or("-"),
            )
            .unwrap();
        }

        writeln!(output).unwrap();
        output
    }
}

impl Default for MarkdownReporter {
    fn default() -> Self {
        Self::new()
    }
}

impl MarkdownReporterTrait for MarkdownReporter {
    /// @ai:effects pure
    fn render(&self, report: &AnalysisReport) -> String {
        let mut output = String::new();

        output.push_str(&Self::generate_header(report));
        output.push_str(&Self::generate_overview(&report.aggregation.summary));
        output.push_str(&Self::generate_distribution(&report.aggregation.distribution));
        output.push_str(&Self::generate_questions(&report.aggregation.records));

        writeln!(output, "## Analysis").unwrap();
        writeln!(output).unwrap();
        writeln!(output, "{}", report.interpretation.text.trim()).unwrap();

        output
    }

    /// @ai:effects fs:write
    fn generate(&self, report: &AnalysisReport, output_path: &Path) -> Result<()> {
        let content = self.render(report);
        std::fs::write(output_path, content).map_err(|source| Error::FileWrite {
            path: output_path.to_path_buf(),
            source,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::metrics::MetricsAggregator;
    use crate::payload::AnalysisPayload;
    use crate::report::ViewMode;
    use serde_json::json;
    use tempfile::TempDir;

    fn sample_report() -> AnalysisReport {
        let payload = AnalysisPayload::from_value(json!({
            "analysis": "Overall difficulty: tough. Score: 7",
            "ai_model": "openrouter",
            "all_questions_metrics": [
                {"question_id": "Q1 A", "difficulty_label": "Hard", "difficulty_score": 8.0,
                 "cognitive_level": "Analyze", "estimated_time_to_solve": "20 minutes"},
                {"question_id": "Q1 B", "difficulty_label": "Easy", "difficulty_score": 3.0}
            ]
        }));
        AnalysisReport::build(
            &payload,
            &MetricsAggregator::new(),
            ViewMode::Standard,
            "2026-01-19T00:00:00Z".to_string(),
        )
    }

    #[test]
    fn test_render_sections() {
        let content = MarkdownReporter::new().render(&sample_report());

        assert!(content.starts_with("# Question Paper Analysis"));
        assert!(content.contains("**Model:** openrouter"));
        assert!(content.contains("**Difficulty:** Tough (danger)"));
        assert!(content.contains("**Score:** 7/10"));
        assert!(content.contains("| Average Difficulty | 5.5 |"));
        assert!(content.contains("| Estimated Time | 35m |"));
        assert!(content.contains("| Hard | 1 | 50.0% |"));
        assert!(content.contains("| Q1 B | Easy | 3.0 | - | - | - | - |"));
        assert!(content.trim_end().ends_with("Overall difficulty: tough. Score: 7"));
    }

    #[test]
    fn test_format_score() {
        assert_eq!(MarkdownReporter::format_score(Some(6.24)), "6.2");
        assert_eq!(MarkdownReporter::format_score(None), "-");
        assert_eq!(MarkdownReporter::format_score(Some(f64::INFINITY)), "-");
    }

    #[test]
    fn test_generate_markdown_report() {
        let temp = TempDir::new().unwrap();
        let output = temp.path().join("analysis.md");

        MarkdownReporter::new()
            .generate(&sample_report(), &output)
            .unwrap();
        assert!(output.exists());
    }
}
