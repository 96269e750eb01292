use bucketagg_core::{BucketMetricsConfig, MetricSettings};
use serde_json::{Map, Value};

/// Settings specific to one kind of bucket metric.
#[derive(Debug, Clone, PartialEq)]
pub enum MetricParams {
    /// `avg_bucket`, `sum_bucket`, `min_bucket`, `max_bucket`, `stats_bucket`.
    None,
    ExtendedStats {
        /// Standard deviations above/below the mean for the bounds.
        sigma: f64,
    },
    Percentiles {
        percents: Vec<f64>,
    },
}

/// Configuration produced by every factory in this crate.
pub type MetricConfig = BucketMetricsConfig<MetricParams>;

impl MetricSettings for MetricParams {
    fn write_fields(&self, out: &mut Map<String, Value>) {
        match self {
            MetricParams::None => {}
            MetricParams::ExtendedStats { sigma } => {
                out.insert("sigma".to_owned(), number(*sigma));
            }
            MetricParams::Percentiles { percents } => {
                out.insert(
                    "percents".to_owned(),
                    Value::Array(percents.iter().copied().map(number).collect()),
                );
            }
        }
    }
}

fn number(value: f64) -> Value {
    serde_json::Number::from_f64(value)
        .map(Value::Number)
        .unwrap_or(Value::Null)
}
