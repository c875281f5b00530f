//! @ai:module:intent Metric records, aggregation and chart shaping
//! @ai:module:layer application
//! @ai:module:public_api MetricRecord, AggregateSummary, DifficultyDistribution, MetricsAggregator, ChartSeries

pub mod aggregator;
pub mod types;

pub use aggregator::{difficulty_distribution, MetricsAggregator, MetricsAggregatorTrait};
pub use types::{
    AggregateSummary, Aggregation, ChartPoint, ChartSeries, DifficultyBucket,
    DifficultyDistribution, DistributionSegment, EstimatedTime, MetricKey, MetricRecord,
    RecordSource,
};
