//! bucketagg-metrics: the standard bucket metrics.
//!
//! Provides a [`MetricFactory`](bucketagg_core::MetricFactory) for each
//! bucket metric kind (`avg_bucket`, `sum_bucket`, `min_bucket`,
//! `max_bucket`, `stats_bucket`, `extended_stats_bucket`,
//! `percentiles_bucket`), a [`MetricRegistry`] that resolves kinds to
//! factories, and [`parse_definitions`] for documents holding several
//! named requests.

pub mod definitions;
pub mod error;
pub mod extended_stats;
pub mod params;
pub mod percentiles;
pub mod registry;
pub mod simple;

pub use definitions::parse_definitions;
pub use error::DefinitionError;
pub use extended_stats::ExtendedStatsBucket;
pub use params::{MetricConfig, MetricParams};
pub use percentiles::PercentilesBucket;
pub use registry::MetricRegistry;
pub use simple::SimpleMetric;
