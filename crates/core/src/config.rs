//! The typed configuration a bucket metrics request is parsed into.

use serde_json::{Map, Value};

use crate::gap_policy::GapPolicy;

/// Metric-specific settings carried by a [`BucketMetricsConfig`].
pub trait MetricSettings {
    /// Write the settings back as request-body fields.
    fn write_fields(&self, out: &mut Map<String, Value>);
}

impl MetricSettings for () {
    fn write_fields(&self, _out: &mut Map<String, Value>) {}
}

/// A parsed bucket metrics request.
#[derive(Debug, Clone, PartialEq)]
pub struct BucketMetricsConfig<S> {
    /// Aggregation name the request was submitted under.
    pub name: String,
    /// Metric kind, e.g. `avg_bucket`.
    pub kind: String,
    /// Primary buckets path; the only one forwarded to the metric.
    pub buckets_path: String,
    pub format: Option<String>,
    pub gap_policy: GapPolicy,
    pub settings: S,
}

impl<S> BucketMetricsConfig<S> {
    pub fn new(
        name: impl Into<String>,
        kind: impl Into<String>,
        buckets_path: impl Into<String>,
        settings: S,
    ) -> Self {
        BucketMetricsConfig {
            name: name.into(),
            kind: kind.into(),
            buckets_path: buckets_path.into(),
            format: None,
            gap_policy: GapPolicy::default(),
            settings,
        }
    }

    pub fn format(mut self, format: impl Into<String>) -> Self {
        self.format = Some(format.into());
        self
    }

    pub fn gap_policy(mut self, gap_policy: GapPolicy) -> Self {
        self.gap_policy = gap_policy;
        self
    }
}

impl<S: MetricSettings> BucketMetricsConfig<S> {
    /// Serialize back to a request body that parses to the same configuration.
    pub fn to_json_value(&self) -> Value {
        let mut body = Map::new();
        body.insert(
            "buckets_path".to_owned(),
            Value::String(self.buckets_path.clone()),
        );
        if let Some(format) = &self.format {
            body.insert("format".to_owned(), Value::String(format.clone()));
        }
        body.insert(
            "gap_policy".to_owned(),
            Value::String(self.gap_policy.name().to_owned()),
        );
        self.settings.write_fields(&mut body);
        Value::Object(body)
    }

    /// Serialize as a named definition: `{"<name>": {"<kind>": <body>}}`.
    pub fn to_definition_json(&self) -> Value {
        let mut inner = Map::new();
        inner.insert(self.kind.clone(), self.to_json_value());
        let mut outer = Map::new();
        outer.insert(self.name.clone(), Value::Object(inner));
        Value::Object(outer)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn builder_defaults() {
        let config = BucketMetricsConfig::new("avg_sales", "avg_bucket", "sales>sum", ());
        assert_eq!(config.format, None);
        assert_eq!(config.gap_policy, GapPolicy::Skip);
    }

    #[test]
    fn json_omits_unset_format() {
        let config = BucketMetricsConfig::new("a", "sum_bucket", "p", ());
        assert_eq!(
            config.to_json_value(),
            json!({"buckets_path": "p", "gap_policy": "skip"})
        );
    }

    #[test]
    fn definition_json_nests_name_and_kind() {
        let config = BucketMetricsConfig::new("total", "sum_bucket", "sales>sum", ())
            .format("0.00")
            .gap_policy(GapPolicy::InsertZeros);
        assert_eq!(
            config.to_definition_json(),
            json!({"total": {"sum_bucket": {
                "buckets_path": "sales>sum",
                "format": "0.00",
                "gap_policy": "insert_zeros"
            }}})
        );
    }
}
