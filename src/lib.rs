//! @ai:module:intent Interpret AI question-paper analyses and aggregate per-question metrics
//! @ai:module:layer application
//! @ai:module:public_api payload, interpreter, extractor, metrics, report, loader, config, error

pub mod cascade;
pub mod config;
pub mod error;
pub mod extractor;
pub mod interpreter;
pub mod loader;
pub mod metrics;
pub mod payload;
pub mod report;

pub use config::{FallbackProfile, FallbackScores, InsightConfig};
pub use error::{Error, Result};
pub use extractor::QuestionExtractor;
pub use interpreter::{Difficulty, Interpretation, ResultInterpreter, ResultInterpreterTrait};
pub use loader::{PayloadLoader, PayloadLoaderTrait};
pub use metrics::{AggregateSummary, Aggregation, MetricRecord, MetricsAggregator, MetricsAggregatorTrait};
pub use payload::{AnalysisPayload, StructuredPayload};
pub use report::{AnalysisReport, ReportGenerator, ViewMode};
