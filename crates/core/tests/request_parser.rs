//! End-to-end behaviour of the shared request parser against small
//! hand-written metric factories.

use bucketagg_core::{
    parse_request, BucketMetricsConfig, GapPolicy, MetricConfigError, MetricFactory, ParseError,
    ParserOptions, PendingFields,
};

/// A metric with no fields of its own.
struct PlainFactory;

impl MetricFactory for PlainFactory {
    type Settings = ();

    fn kind(&self) -> &'static str {
        "plain_bucket"
    }

    fn build(
        &self,
        name: &str,
        buckets_path: &str,
        _pending: &mut PendingFields,
    ) -> Result<BucketMetricsConfig<()>, MetricConfigError> {
        Ok(BucketMetricsConfig::new(name, self.kind(), buckets_path, ()))
    }
}

/// A metric that requires a `lag` field.
struct LagFactory;

impl MetricFactory for LagFactory {
    type Settings = f64;

    fn kind(&self) -> &'static str {
        "lag_bucket"
    }

    fn build(
        &self,
        name: &str,
        buckets_path: &str,
        pending: &mut PendingFields,
    ) -> Result<BucketMetricsConfig<f64>, MetricConfigError> {
        let lag = pending
            .take_f64("lag")?
            .ok_or_else(|| MetricConfigError::InvalidValue {
                field: "lag".to_string(),
                message: "is required".to_string(),
            })?;
        Ok(BucketMetricsConfig::new(name, self.kind(), buckets_path, lag))
    }
}

fn plain(src: &str) -> Result<BucketMetricsConfig<()>, ParseError> {
    parse_request("my_agg", src, &PlainFactory, &ParserOptions::default())
}

// ──────────────────────────────────────────────
// Shared fields
// ──────────────────────────────────────────────

#[test]
fn lone_buckets_path_string() {
    let config = plain(r#"{"buckets_path": "sales_per_month>sales"}"#).unwrap();
    assert_eq!(config.name, "my_agg");
    assert_eq!(config.kind, "plain_bucket");
    assert_eq!(config.buckets_path, "sales_per_month>sales");
    assert_eq!(config.format, None);
    assert_eq!(config.gap_policy, GapPolicy::Skip);
}

#[test]
fn buckets_path_array_uses_first_entry() {
    let config = plain(r#"{"buckets_path": ["a", "b"]}"#).unwrap();
    assert_eq!(config.buckets_path, "a");
}

#[test]
fn format_and_gap_policy_are_applied() {
    let config =
        plain(r###"{"buckets_path": "x", "format": "##0.00", "gap_policy": "skip"}"###).unwrap();
    assert_eq!(config.format.as_deref(), Some("##0.00"));
    assert_eq!(config.gap_policy, GapPolicy::Skip);

    let config = plain(r#"{"gap_policy": "insert_zeros", "buckets_path": "x"}"#).unwrap();
    assert_eq!(config.gap_policy, GapPolicy::InsertZeros);
}

#[test]
fn duplicate_format_last_value_wins() {
    let config = plain(r#"{"format": "first", "buckets_path": "x", "format": "second"}"#).unwrap();
    assert_eq!(config.format.as_deref(), Some("second"));
}

#[test]
fn duplicate_buckets_path_last_value_wins() {
    let config = plain(r#"{"buckets_path": ["a", "b"], "buckets_path": "c"}"#).unwrap();
    assert_eq!(config.buckets_path, "c");
}

#[test]
fn duplicate_gap_policy_last_value_wins() {
    let config = plain(
        r#"{"gap_policy": "insert_zeros", "buckets_path": "x", "gap_policy": "skip"}"#,
    )
    .unwrap();
    assert_eq!(config.gap_policy, GapPolicy::Skip);
}

#[test]
fn duplicate_pending_field_reaches_factory_with_last_value() {
    let config = parse_request(
        "lagged",
        r#"{"lag": 1, "buckets_path": "x", "lag": 7}"#,
        &LagFactory,
        &ParserOptions::default(),
    )
    .unwrap();
    assert_eq!(config.settings, 7.0);
}

#[test]
fn buckets_path_array_scalars_are_taken_as_text() {
    let config = plain(r#"{"buckets_path": [1, "b"]}"#).unwrap();
    assert_eq!(config.buckets_path, "1");

    let config = plain(r#"{"buckets_path": [true]}"#).unwrap();
    assert_eq!(config.buckets_path, "true");

    let err = plain(r#"{"buckets_path": [["a"], "b"]}"#).unwrap_err();
    assert_eq!(err.kind(), "syntax");
}

#[test]
fn scenario_avg_bucket_with_format() {
    let config = plain(r#"{"buckets_path": "avg_bucket", "format": "0.0"}"#).unwrap();
    assert_eq!(config.buckets_path, "avg_bucket");
    assert_eq!(config.format.as_deref(), Some("0.0"));
    assert_eq!(config.gap_policy, GapPolicy::default());
}

// ──────────────────────────────────────────────
// Failures
// ──────────────────────────────────────────────

#[test]
fn empty_object_is_missing_buckets_path() {
    let err = plain("{}").unwrap_err();
    match err {
        ParseError::MissingRequiredField { field, name, .. } => {
            assert_eq!(field, "buckets_path");
            assert_eq!(name, "my_agg");
        }
        other => panic!("expected MissingRequiredField, got {:?}", other),
    }
}

#[test]
fn missing_buckets_path_regardless_of_other_fields() {
    for src in [
        r#"{"format": "0.0"}"#,
        r#"{"gap_policy": "skip", "format": "0"}"#,
        r#"{"unknown": {"nested": [1, 2]}}"#,
        r#"{"buckets": "almost"}"#,
    ] {
        let err = plain(src).unwrap_err();
        assert_eq!(err.kind(), "missing_required_field", "input: {}", src);
    }
}

#[test]
fn scenario_unknown_field_is_reported() {
    let err = plain(r#"{"buckets_path": "x", "unknown_field": 5}"#).unwrap_err();
    match err {
        ParseError::UnexpectedFields { name, fields, .. } => {
            assert_eq!(name, "my_agg");
            assert_eq!(fields, vec!["unknown_field".to_string()]);
        }
        other => panic!("expected UnexpectedFields, got {:?}", other),
    }
}

#[test]
fn unexpected_fields_of_every_shape() {
    let err = plain(
        r#"{"buckets_path": "x", "s": "str", "a": [1], "o": {"k": null}, "b": true, "n": null}"#,
    )
    .unwrap_err();
    match err {
        ParseError::UnexpectedFields { fields, .. } => {
            assert_eq!(fields, vec!["a", "b", "n", "o", "s"]);
        }
        other => panic!("expected UnexpectedFields, got {:?}", other),
    }
}

#[test]
fn claimed_field_is_never_unexpected() {
    let config = parse_request(
        "lagged",
        r#"{"buckets_path": "x", "lag": 3}"#,
        &LagFactory,
        &ParserOptions::default(),
    )
    .unwrap();
    assert_eq!(config.settings, 3.0);

    let err = parse_request(
        "lagged",
        r#"{"buckets_path": "x", "lag": 3, "extra": "y"}"#,
        &LagFactory,
        &ParserOptions::default(),
    )
    .unwrap_err();
    match err {
        ParseError::UnexpectedFields { fields, .. } => assert_eq!(fields, vec!["extra"]),
        other => panic!("expected UnexpectedFields, got {:?}", other),
    }
}

#[test]
fn factory_rejection_is_wrapped() {
    let err = parse_request(
        "lagged",
        r#"{"buckets_path": "x", "lag": "soon"}"#,
        &LagFactory,
        &ParserOptions::default(),
    )
    .unwrap_err();
    match &err {
        ParseError::InvalidMetricConfig { name, source, .. } => {
            assert_eq!(name, "lagged");
            assert!(matches!(source, MetricConfigError::InvalidType { field, .. } if field == "lag"));
        }
        other => panic!("expected InvalidMetricConfig, got {:?}", other),
    }
    assert!(err
        .to_string()
        .contains("could not parse settings for aggregation [lagged]"));
}

#[test]
fn factory_rejection_returns_no_partial_config() {
    for src in [
        r#"{"buckets_path": "x", "format": "0.0", "gap_policy": "insert_zeros"}"#,
        r#"{"format": "0.0", "buckets_path": "x", "lag": "soon", "gap_policy": "skip"}"#,
    ] {
        let result = parse_request("lagged", src, &LagFactory, &ParserOptions::default());
        match result {
            Err(ParseError::InvalidMetricConfig { name, .. }) => assert_eq!(name, "lagged"),
            other => panic!("expected InvalidMetricConfig for {}, got {:?}", src, other),
        }
    }
}

#[test]
fn number_beyond_f64_is_an_unexpected_field() {
    let err = plain(r#"{"buckets_path": "x", "big": 1e400}"#).unwrap_err();
    match err {
        ParseError::UnexpectedFields { fields, .. } => assert_eq!(fields, vec!["big"]),
        other => panic!("expected UnexpectedFields, got {:?}", other),
    }
}

#[test]
fn deep_nesting_fails_cleanly_whatever_the_configured_depth() {
    let depth = 20_000;
    let src = format!(
        r#"{{"buckets_path": "x", "deep": {}{}}}"#,
        "[".repeat(depth),
        "]".repeat(depth)
    );
    let options = ParserOptions {
        strict_field_names: false,
        max_depth: 1_000_000,
    };
    let err = parse_request("my_agg", &src, &PlainFactory, &options).unwrap_err();
    assert_eq!(err.kind(), "syntax");
    assert!(
        err.to_string()
            .contains("nesting depth exceeds the limit of 1024"),
        "{}",
        err
    );
}

#[test]
fn invalid_gap_policy_propagates() {
    let err = plain(r#"{"buckets_path": "x", "gap_policy": "zero"}"#).unwrap_err();
    assert_eq!(err.kind(), "invalid_gap_policy");
    assert_eq!(err.location().column, 37);
}

#[test]
fn malformed_stream_propagates() {
    let err = plain(r#"{"buckets_path": "x",, }"#).unwrap_err();
    assert_eq!(err.kind(), "syntax");
}

// ──────────────────────────────────────────────
// Round trip
// ──────────────────────────────────────────────

#[test]
fn serialized_config_parses_back_to_the_same_shared_fields() {
    let inputs = [
        r#"{"buckets_path": "a>b"}"#,
        r##"{"buckets_path": ["first", "second"], "format": "#.#"}"##,
        r#"{"buckets_path": "x", "gap_policy": "insert_zeros", "format": "0"}"#,
        r#"{"buckets_path": "p\"q", "format": "é"}"#,
    ];
    for src in inputs {
        let first = plain(src).unwrap();
        let body = serde_json::to_string(&first.to_json_value()).unwrap();
        let second = plain(&body).unwrap();
        assert_eq!(first.buckets_path, second.buckets_path, "input: {}", src);
        assert_eq!(first.format, second.format, "input: {}", src);
        assert_eq!(first.gap_policy, second.gap_policy, "input: {}", src);
    }
}
