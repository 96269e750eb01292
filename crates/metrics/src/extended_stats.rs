use bucketagg_core::{MetricConfigError, MetricFactory, ParseField, PendingFields};

use crate::params::{MetricConfig, MetricParams};

pub const SIGMA: ParseField = ParseField::new("sigma");

pub const DEFAULT_SIGMA: f64 = 2.0;

/// `extended_stats_bucket`: stats plus variance, std deviation and bounds.
#[derive(Debug, Clone, Copy, Default)]
pub struct ExtendedStatsBucket;

impl MetricFactory for ExtendedStatsBucket {
    type Settings = MetricParams;

    fn kind(&self) -> &'static str {
        "extended_stats_bucket"
    }

    fn build(
        &self,
        name: &str,
        buckets_path: &str,
        pending: &mut PendingFields,
    ) -> Result<MetricConfig, MetricConfigError> {
        let sigma = pending
            .take_f64(SIGMA.preferred_name())?
            .unwrap_or(DEFAULT_SIGMA);
        if sigma < 0.0 {
            return Err(MetricConfigError::InvalidValue {
                field: SIGMA.preferred_name().to_owned(),
                message: "must be greater than or equal to 0".to_owned(),
            });
        }
        Ok(MetricConfig::new(
            name,
            self.kind(),
            buckets_path,
            MetricParams::ExtendedStats { sigma },
        ))
    }
}
