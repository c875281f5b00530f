//! @ai:module:intent Report generation for analysis results
//! @ai:module:layer infrastructure
//! @ai:module:public_api AnalysisReport, ReportGenerator, JsonReporter, MarkdownReporter, ExportDocument, ViewMode

pub mod json_report;
pub mod markdown_report;

pub use json_report::{ExportDocument, JsonReporter, JsonReporterTrait, ViewMode, EXPORT_VERSION};
pub use markdown_report::{MarkdownReporter, MarkdownReporterTrait};

use crate::error::Result;
use crate::interpreter::{Interpretation, ResultInterpreterTrait};
use crate::metrics::{Aggregation, ChartSeries, MetricsAggregator, MetricsAggregatorTrait};
use crate::payload::AnalysisPayload;
use serde::Serialize;
use std::path::{Path, PathBuf};

/// @ai:intent Everything derived from one payload, ready for rendering
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AnalysisReport {
    pub timestamp: String,
    pub ai_model: Option<String>,
    pub view: ViewMode,
    pub interpretation: Interpretation,
    pub aggregation: Aggregation,
    pub charts: Vec<ChartSeries>,
}

impl AnalysisReport {
    /// @ai:intent Interpret and aggregate a payload in one pass
    /// @ai:pre timestamp is RFC 3339 text supplied by the caller
    /// @ai:post reuses the aggregator's compiled interpreter
    /// @ai:effects pure
    pub fn build(
        payload: &AnalysisPayload,
        aggregator: &MetricsAggregator,
        view: ViewMode,
        timestamp: String,
    ) -> Self {
        let interpretation = aggregator.interpreter().interpret(payload);
        let aggregation = aggregator.aggregate(payload);
        let charts = aggregator.all_chart_series(&aggregation.records);

        Self {
            timestamp,
            ai_model: payload.ai_model().map(str::to_string),
            view,
            interpretation,
            aggregation,
            charts,
        }
    }
}

/// @ai:intent Combined report generator
pub struct ReportGenerator {
    json: JsonReporter,
    markdown: MarkdownReporter,
}

impl ReportGenerator {
    /// @ai:intent Create a new report generator
    /// @ai:effects pure
    pub fn new() -> Self {
        Self {
            json: JsonReporter::new(),
            markdown: MarkdownReporter::new(),
        }
    }

    /// @ai:intent Generate all reports
    /// @ai:post output_dir contains analysis.json and analysis.md
    /// @ai:effects fs:write
    pub fn generate_all(&self, report: &AnalysisReport, output_dir: &Path) -> Result<Vec<PathBuf>> {
        std::fs::create_dir_all(output_dir)?;

        let json_path = output_dir.join("analysis.json");
        let markdown_path = output_dir.join("analysis.md");

        self.json.generate(report, &json_path)?;
        self.markdown.generate(report, &markdown_path)?;

        tracing::info!("Reports generated in {}", output_dir.display());
        Ok(vec![json_path, markdown_path])
    }
}

impl Default for ReportGenerator {
    fn default() -> Self {
        Self::new()
    }
}
