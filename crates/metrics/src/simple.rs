use bucketagg_core::{MetricConfigError, MetricFactory, PendingFields};

use crate::params::{MetricConfig, MetricParams};

/// Bucket metrics that take no fields beyond the shared ones.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SimpleMetric {
    Avg,
    Sum,
    Min,
    Max,
    Stats,
}

impl SimpleMetric {
    pub const ALL: [SimpleMetric; 5] = [
        SimpleMetric::Avg,
        SimpleMetric::Sum,
        SimpleMetric::Min,
        SimpleMetric::Max,
        SimpleMetric::Stats,
    ];
}

impl MetricFactory for SimpleMetric {
    type Settings = MetricParams;

    fn kind(&self) -> &'static str {
        match self {
            SimpleMetric::Avg => "avg_bucket",
            SimpleMetric::Sum => "sum_bucket",
            SimpleMetric::Min => "min_bucket",
            SimpleMetric::Max => "max_bucket",
            SimpleMetric::Stats => "stats_bucket",
        }
    }

    fn build(
        &self,
        name: &str,
        buckets_path: &str,
        _pending: &mut PendingFields,
    ) -> Result<MetricConfig, MetricConfigError> {
        Ok(MetricConfig::new(
            name,
            self.kind(),
            buckets_path,
            MetricParams::None,
        ))
    }
}
