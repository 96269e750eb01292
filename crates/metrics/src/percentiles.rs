use bucketagg_core::{MetricConfigError, MetricFactory, ParseField, PendingFields};

use crate::params::{MetricConfig, MetricParams};

pub const PERCENTS: ParseField = ParseField::new("percents");

pub const DEFAULT_PERCENTS: [f64; 7] = [1.0, 5.0, 25.0, 50.0, 75.0, 95.0, 99.0];

/// `percentiles_bucket`: percentiles over the sibling buckets' values.
#[derive(Debug, Clone, Copy, Default)]
pub struct PercentilesBucket;

impl MetricFactory for PercentilesBucket {
    type Settings = MetricParams;

    fn kind(&self) -> &'static str {
        "percentiles_bucket"
    }

    fn build(
        &self,
        name: &str,
        buckets_path: &str,
        pending: &mut PendingFields,
    ) -> Result<MetricConfig, MetricConfigError> {
        let percents = pending
            .take_f64_list(PERCENTS.preferred_name())?
            .unwrap_or_else(|| DEFAULT_PERCENTS.to_vec());

        if let Some(bad) = percents.iter().find(|p| !(0.0..=100.0).contains(*p)) {
            return Err(MetricConfigError::InvalidValue {
                field: PERCENTS.preferred_name().to_owned(),
                message: format!("must only contain values between 0.0 and 100.0, got {}", bad),
            });
        }

        Ok(MetricConfig::new(
            name,
            self.kind(),
            buckets_path,
            MetricParams::Percentiles { percents },
        ))
    }
}
