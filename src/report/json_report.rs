//! @ai:module:intent JSON export of an analysis result
//! @ai:module:layer infrastructure
//! @ai:module:public_api JsonReporter, JsonReporterTrait, ExportDocument, ViewMode, EXPORT_VERSION
//! @ai:module:stateless true

use crate::error::{Error, Result};
use crate::interpreter::Difficulty;
use crate::metrics::{AggregateSummary, ChartSeries, DifficultyDistribution, MetricRecord};
use crate::report::AnalysisReport;
use serde::{Deserialize, Serialize};
use std::path::Path;

pub const EXPORT_VERSION: &str = "1.0";

const UNKNOWN_MODEL: &str = "unknown";

/// @ai:intent Which result view the caller is showing
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ViewMode {
    #[default]
    Standard,
    Metrics,
}

impl ViewMode {
    /// @ai:intent Parse a view name as given on the command line
    /// @ai:effects pure
    pub fn from_name(name: &str) -> Option<Self> {
        match name.trim().to_lowercase().as_str() {
            "standard" => Some(Self::Standard),
            "metrics" => Some(Self::Metrics),
            _ => None,
        }
    }
}

/// @ai:intent Downloadable JSON document for one analysis
///
/// Metric sections are only filled in the metrics view.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ExportDocument {
    pub timestamp: String,
    pub difficulty: Difficulty,
    pub score: Option<f64>,
    pub analysis_text: String,
    pub ai_model: String,
    pub view_mode: ViewMode,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub metrics: Option<Vec<MetricRecord>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub general_metrics: Option<AggregateSummary>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub distribution: Option<DifficultyDistribution>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub charts: Option<Vec<ChartSeries>>,
    pub version: String,
}

impl ExportDocument {
    /// @ai:intent Build the export document for a report
    /// @ai:post score is finite or None
    /// @ai:effects pure
    pub fn from_report(report: &AnalysisReport) -> Self {
        let metrics_view = report.view == ViewMode::Metrics;

        Self {
            timestamp: report.timestamp.clone(),
            difficulty: report.interpretation.difficulty,
            score: report.interpretation.score.filter(|s| s.is_finite()),
            analysis_text: report.interpretation.text.clone(),
            ai_model: report
                .ai_model
                .clone()
                .unwrap_or_else(|| UNKNOWN_MODEL.to_string()),
            view_mode: report.view,
            metrics: metrics_view.then(|| report.aggregation.records.clone()),
            general_metrics: metrics_view.then(|| report.aggregation.summary.clone()),
            distribution: metrics_view.then(|| report.aggregation.distribution.clone()),
            charts: metrics_view.then(|| report.charts.clone()),
            version: EXPORT_VERSION.to_string(),
        }
    }
}

/// @ai:intent Trait for JSON report generation
pub trait JsonReporterTrait: Send + Sync {
    /// @ai:intent Render the export document as pretty JSON
    fn render(&self, report: &AnalysisReport) -> Result<String>;

    /// @ai:intent Write the export document to a file
    fn generate(&self, report: &AnalysisReport, output_path: &Path) -> Result<()>;
}

/// @ai:intent Generates JSON export documents
pub struct JsonReporter;

impl JsonReporter {
    /// @ai:intent Create a new JSON reporter
    /// @ai:effects pure
    pub fn new() -> Self {
        Self
    }
}

impl Default for JsonReporter {
    fn default() -> Self {
        Self::new()
    }
}

impl JsonReporterTrait for JsonReporter {
    /// @ai:effects pure
    fn render(&self, report: &AnalysisReport) -> Result<String> {
        let document = ExportDocument::from_report(report);
        Ok(serde_json::to_string_pretty(&document)?)
    }

    /// @ai:intent Generate JSON report to file
    /// @ai:effects fs:write
    fn generate(&self, report: &AnalysisReport, output_path: &Path) -> Result<()> {
        let json = self.render(report)?;
        std::fs::write(output_path, json).map_err(|source| Error::FileWrite {
            path: output_path.to_path_buf(),
            source,
        })
    }
}
