//! Shared front-end for bucket metrics requests.
//!
//! [`RequestConfigParser`] walks one request body in a single forward pass.
//! It understands the fields every bucket metric shares (`buckets_path`,
//! `format`, `gap_policy`) and parks everything else in [`PendingFields`]
//! for the metric's [`MetricFactory`] to claim. Fields still unclaimed once
//! the factory returns make the request fail.

use serde::{de, Deserialize, Deserializer};
use serde_json::Value;

use crate::config::BucketMetricsConfig;
use crate::error::ParseError;
use crate::factory::MetricFactory;
use crate::field::{FieldMatcher, ParseField};
use crate::gap_policy::GapPolicy;
use crate::pending::PendingFields;
use crate::reader::{TokenKind, TokenReader, DEFAULT_MAX_DEPTH, MAX_DEPTH_LIMIT};

pub const BUCKETS_PATH: ParseField = ParseField::new("buckets_path");
pub const FORMAT: ParseField = ParseField::new("format");
pub const GAP_POLICY: ParseField = ParseField::new("gap_policy");

/// Knobs for request parsing. Loadable from the `[parser]` table of a TOML file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct ParserOptions {
    /// Refuse deprecated field spellings instead of accepting them with a warning.
    pub strict_field_names: bool,
    /// Maximum object/array nesting accepted in a request body, at most
    /// [`MAX_DEPTH_LIMIT`]. Larger values set in code are clamped.
    #[serde(deserialize_with = "bounded_depth")]
    pub max_depth: usize,
}

fn bounded_depth<'de, D>(deserializer: D) -> Result<usize, D::Error>
where
    D: Deserializer<'de>,
{
    let depth = usize::deserialize(deserializer)?;
    if depth == 0 || depth > MAX_DEPTH_LIMIT {
        return Err(de::Error::custom(format!(
            "max_depth must be between 1 and {}, got {}",
            MAX_DEPTH_LIMIT, depth
        )));
    }
    Ok(depth)
}

impl Default for ParserOptions {
    fn default() -> Self {
        ParserOptions {
            strict_field_names: false,
            max_depth: DEFAULT_MAX_DEPTH,
        }
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct RequestConfigParser {
    matcher: FieldMatcher,
}

impl RequestConfigParser {
    pub fn new(options: &ParserOptions) -> Self {
        RequestConfigParser {
            matcher: FieldMatcher::new(options.strict_field_names),
        }
    }

    /// Parse the request body for aggregation `name`.
    ///
    /// `reader` must either sit on the body's `StartObject` token or just
    /// before it. On success the reader is left on the body's `EndObject`.
    pub fn parse<F>(
        &self,
        name: &str,
        reader: &mut TokenReader,
        factory: &F,
    ) -> Result<BucketMetricsConfig<F::Settings>, ParseError>
    where
        F: MetricFactory + ?Sized,
    {
        enter_object(name, reader)?;

        let mut current_field: Option<String> = None;
        let mut buckets_paths: Option<Vec<String>> = None;
        let mut format: Option<String> = None;
        let mut gap_policy: Option<GapPolicy> = None;
        let mut pending = PendingFields::new();

        loop {
            let token = reader.next_token()?;
            match token {
                TokenKind::EndObject => break,
                TokenKind::FieldName => {
                    current_field = Some(reader.text()?.to_owned());
                    continue;
                }
                _ => {}
            }

            let Some(field) = current_field.as_deref() else {
                return Err(ParseError::syntax(
                    reader.location(),
                    format!("value without a field name in [{}]", name),
                ));
            };

            match token {
                TokenKind::ValueString => {
                    let text = reader.text()?;
                    if self.matcher.matches(field, &FORMAT) {
                        format = Some(text.to_owned());
                    } else if self.matcher.matches(field, &BUCKETS_PATH) {
                        buckets_paths = Some(vec![text.to_owned()]);
                    } else if self.matcher.matches(field, &GAP_POLICY) {
                        gap_policy = Some(GapPolicy::parse(
                            text,
                            reader.location(),
                            &self.matcher,
                        )?);
                    } else {
                        pending.insert(field, Value::String(text.to_owned()));
                    }
                }
                TokenKind::StartArray => {
                    if self.matcher.matches(field, &BUCKETS_PATH) {
                        let mut paths = Vec::new();
                        while reader.next_token()? != TokenKind::EndArray {
                            paths.push(reader.text()?.to_owned());
                        }
                        buckets_paths = Some(paths);
                    } else {
                        pending.insert(field, reader.list()?);
                    }
                }
                _ => {
                    pending.insert(field, reader.object_value()?);
                }
            }
        }

        let end = reader.location();

        // An empty array sets the field but leaves nothing to forward.
        let primary = match buckets_paths.as_deref() {
            Some([first, rest @ ..]) => {
                if !rest.is_empty() {
                    tracing::debug!(
                        aggregation = name,
                        ignored = rest.len(),
                        "only the first buckets_path entry is used"
                    );
                }
                first.clone()
            }
            _ => {
                return Err(ParseError::MissingRequiredField {
                    field: BUCKETS_PATH.preferred_name().to_owned(),
                    name: name.to_owned(),
                    location: end,
                });
            }
        };

        let mut config = factory
            .build(name, &primary, &mut pending)
            .map_err(|source| ParseError::InvalidMetricConfig {
                name: name.to_owned(),
                source,
                location: end,
            })?;

        if let Some(format) = format {
            config.format = Some(format);
        }
        if let Some(gap_policy) = gap_policy {
            config.gap_policy = gap_policy;
        }

        if !pending.is_empty() {
            return Err(ParseError::UnexpectedFields {
                name: name.to_owned(),
                fields: pending.names(),
                location: end,
            });
        }

        tracing::debug!(
            aggregation = name,
            kind = factory.kind(),
            buckets_path = %config.buckets_path,
            "parsed bucket metrics request"
        );
        Ok(config)
    }
}

fn enter_object(name: &str, reader: &mut TokenReader) -> Result<(), ParseError> {
    if reader.current() == Some(TokenKind::StartObject) {
        return Ok(());
    }
    match reader.next_token()? {
        TokenKind::StartObject => Ok(()),
        other => Err(ParseError::syntax(
            reader.location(),
            format!(
                "expected an object for aggregation [{}], got {:?}",
                name, other
            ),
        )),
    }
}

/// Lex `src` and parse it as the complete request body for `name`.
pub fn parse_request<F>(
    name: &str,
    src: &str,
    factory: &F,
    options: &ParserOptions,
) -> Result<BucketMetricsConfig<F::Settings>, ParseError>
where
    F: MetricFactory + ?Sized,
{
    let mut reader = TokenReader::from_source(src)?.with_max_depth(options.max_depth);
    let config = RequestConfigParser::new(options).parse(name, &mut reader, factory)?;
    reader.finish()?;
    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::MetricConfigError;
    use std::sync::atomic::{AtomicUsize, Ordering};

    /// Claims `window` and counts how often it is invoked.
    #[derive(Default)]
    struct CountingFactory {
        calls: AtomicUsize,
    }

    impl MetricFactory for CountingFactory {
        type Settings = Option<f64>;

        fn kind(&self) -> &'static str {
            "counting_bucket"
        }

        fn build(
            &self,
            name: &str,
            buckets_path: &str,
            pending: &mut PendingFields,
        ) -> Result<BucketMetricsConfig<Option<f64>>, MetricConfigError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            let window = pending.take_f64("window")?;
            Ok(BucketMetricsConfig::new(
                name,
                self.kind(),
                buckets_path,
                window,
            ))
        }
    }

    fn parse(src: &str) -> Result<BucketMetricsConfig<Option<f64>>, ParseError> {
        parse_request("agg", src, &CountingFactory::default(), &ParserOptions::default())
    }

    #[test]
    fn factory_is_invoked_once() {
        let factory = CountingFactory::default();
        let config = parse_request(
            "agg",
            r#"{"buckets_path": "a", "window": 5}"#,
            &factory,
            &ParserOptions::default(),
        )
        .unwrap();
        assert_eq!(factory.calls.load(Ordering::SeqCst), 1);
        assert_eq!(config.settings, Some(5.0));
    }

    #[test]
    fn factory_not_invoked_without_buckets_path() {
        let factory = CountingFactory::default();
        let err = parse_request(
            "agg",
            r#"{"window": 5}"#,
            &factory,
            &ParserOptions::default(),
        )
        .unwrap_err();
        assert_eq!(err.kind(), "missing_required_field");
        assert_eq!(factory.calls.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn accepts_reader_already_on_start_object() {
        let mut reader = TokenReader::from_source(r#"{"buckets_path": "a"}"#).unwrap();
        assert_eq!(reader.next_token().unwrap(), TokenKind::StartObject);
        let config = RequestConfigParser::default()
            .parse("agg", &mut reader, &CountingFactory::default())
            .unwrap();
        assert_eq!(config.buckets_path, "a");
        assert_eq!(reader.current(), Some(TokenKind::EndObject));
    }

    #[test]
    fn rejects_non_object_body() {
        let err = parse(r#"["buckets_path"]"#).unwrap_err();
        assert_eq!(err.kind(), "syntax");
        assert!(err.to_string().contains("expected an object for aggregation [agg]"));
    }

    #[test]
    fn empty_buckets_path_array_is_missing() {
        let err = parse(r#"{"buckets_path": []}"#).unwrap_err();
        assert!(matches!(
            err,
            ParseError::MissingRequiredField { ref field, ref name, .. }
                if field == "buckets_path" && name == "agg"
        ));
    }

    #[test]
    fn object_inside_buckets_path_array_is_rejected() {
        let err = parse(r#"{"buckets_path": [{"a": 1}]}"#).unwrap_err();
        assert_eq!(err.kind(), "syntax");
    }

    #[test]
    fn non_string_buckets_path_goes_to_pending() {
        let err = parse(r#"{"buckets_path": 5}"#).unwrap_err();
        // A numeric buckets_path is not recognised as the shared field.
        assert_eq!(err.kind(), "missing_required_field");
    }

    #[test]
    fn deprecated_spelling_depends_on_strictness() {
        let src = r#"{"bucketsPath": "a", "gapPolicy": "insert_zeros"}"#;
        let config = parse(src).unwrap();
        assert_eq!(config.buckets_path, "a");
        assert_eq!(config.gap_policy, GapPolicy::InsertZeros);

        let strict = ParserOptions {
            strict_field_names: true,
            ..ParserOptions::default()
        };
        let err =
            parse_request("agg", src, &CountingFactory::default(), &strict).unwrap_err();
        assert_eq!(err.kind(), "missing_required_field");
    }

    #[test]
    fn trailing_content_is_rejected() {
        let err = parse(r#"{"buckets_path": "a"} []"#).unwrap_err();
        assert_eq!(err.kind(), "syntax");
    }

    #[test]
    fn errors_point_at_closing_brace() {
        let err = parse("{\n  \"window\": 1\n}").unwrap_err();
        assert_eq!(err.location().line, 3);
        assert_eq!(err.location().column, 1);
    }

    #[test]
    fn works_through_trait_object() {
        let factory: Box<dyn MetricFactory<Settings = Option<f64>>> =
            Box::new(CountingFactory::default());
        let config = parse_request(
            "agg",
            r#"{"buckets_path": "x"}"#,
            factory.as_ref(),
            &ParserOptions::default(),
        )
        .unwrap();
        assert_eq!(config.kind, "counting_bucket");
    }

    #[test]
    fn options_deserialize_with_defaults() {
        let options: ParserOptions = serde_json::from_str(r#"{"max_depth": 16}"#).unwrap();
        assert_eq!(
            options,
            ParserOptions {
                strict_field_names: false,
                max_depth: 16,
            }
        );
        let options: ParserOptions = serde_json::from_str("{}").unwrap();
        assert_eq!(options, ParserOptions::default());
    }

    #[test]
    fn options_reject_unbounded_depth() {
        for raw in [r#"{"max_depth": 0}"#, r#"{"max_depth": 20000}"#] {
            let err = serde_json::from_str::<ParserOptions>(raw).unwrap_err();
            assert!(
                err.to_string().contains("max_depth must be between 1 and 1024"),
                "{}",
                err
            );
        }
        assert!(serde_json::from_str::<ParserOptions>(r#"{"max_depth": 1024}"#).is_ok());
    }
}
