use std::collections::BTreeMap;

use bucketagg_core::{Location, MetricFactory, ParserOptions};

use crate::error::DefinitionError;
use crate::extended_stats::ExtendedStatsBucket;
use crate::params::{MetricConfig, MetricParams};
use crate::percentiles::PercentilesBucket;
use crate::simple::SimpleMetric;

/// A metric factory producing this crate's [`MetricParams`].
pub type BoxedFactory = Box<dyn MetricFactory<Settings = MetricParams>>;

/// Metric factories keyed by the request kind they answer to.
#[derive(Default)]
pub struct MetricRegistry {
    factories: BTreeMap<&'static str, BoxedFactory>,
}

impl MetricRegistry {
    pub fn new() -> Self {
        MetricRegistry::default()
    }

    /// Registry holding every bucket metric shipped with this crate.
    pub fn with_defaults() -> Self {
        let mut registry = MetricRegistry::new();
        for metric in SimpleMetric::ALL {
            registry.register(Box::new(metric));
        }
        registry.register(Box::new(ExtendedStatsBucket));
        registry.register(Box::new(PercentilesBucket));
        tracing::debug!(count = registry.factories.len(), "default bucket metrics registered");
        registry
    }

    /// Register `factory` under its kind, replacing any earlier factory
    /// for the same kind.
    pub fn register(&mut self, factory: BoxedFactory) -> Option<BoxedFactory> {
        self.factories.insert(factory.kind(), factory)
    }

    pub fn get(&self, kind: &str) -> Option<&dyn MetricFactory<Settings = MetricParams>> {
        self.factories.get(kind).map(|f| f.as_ref())
    }

    /// Registered kinds, sorted.
    pub fn kinds(&self) -> Vec<&'static str> {
        self.factories.keys().copied().collect()
    }

    pub(crate) fn resolve(
        &self,
        kind: &str,
        location: Location,
    ) -> Result<&dyn MetricFactory<Settings = MetricParams>, DefinitionError> {
        self.get(kind).ok_or_else(|| DefinitionError::UnknownMetric {
            kind: kind.to_owned(),
            location,
        })
    }

    /// Parse a single request body for a metric of `kind`.
    pub fn parse_request(
        &self,
        kind: &str,
        name: &str,
        src: &str,
        options: &ParserOptions,
    ) -> Result<MetricConfig, DefinitionError> {
        let factory = self.resolve(kind, Location::default())?;
        Ok(bucketagg_core::parse_request(name, src, factory, options)?)
    }
}
