use crate::config::BucketMetricsConfig;
use crate::error::MetricConfigError;
use crate::pending::PendingFields;

/// Builds the configuration for one kind of bucket metric.
///
/// The shared request parser calls [`build`](MetricFactory::build) exactly
/// once per request, after the whole body has been read. Implementations
/// must `take` every field they understand out of `pending`; anything left
/// behind is reported to the caller as an unexpected field.
pub trait MetricFactory: Send + Sync {
    type Settings;

    /// The request key this factory answers to, e.g. `avg_bucket`.
    fn kind(&self) -> &'static str;

    fn build(
        &self,
        name: &str,
        buckets_path: &str,
        pending: &mut PendingFields,
    ) -> Result<BucketMetricsConfig<Self::Settings>, MetricConfigError>;
}
