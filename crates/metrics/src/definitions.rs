//! Documents holding several named bucket metric requests.
//!
//! ```json
//! {
//!   "avg_monthly_sales": { "avg_bucket": { "buckets_path": "sales_per_month>sales" } },
//!   "sales_spread":      { "extended_stats_bucket": { "buckets_path": "sales_per_month>sales", "sigma": 3 } }
//! }
//! ```
//!
//! Each entry maps an aggregation name to a single-key object whose key
//! selects the metric factory and whose value is the request body.

use bucketagg_core::{
    Location, ParseError, ParserOptions, RequestConfigParser, TokenKind, TokenReader,
};

use crate::error::DefinitionError;
use crate::params::MetricConfig;
use crate::registry::MetricRegistry;

fn malformed(name: &str, message: impl Into<String>, location: Location) -> DefinitionError {
    DefinitionError::MalformedDefinition {
        name: name.to_owned(),
        message: message.into(),
        location,
    }
}

/// Parse every definition in `src`, in document order.
pub fn parse_definitions(
    registry: &MetricRegistry,
    src: &str,
    options: &ParserOptions,
) -> Result<Vec<MetricConfig>, DefinitionError> {
    let mut reader = TokenReader::from_source(src)?.with_max_depth(options.max_depth);
    let parser = RequestConfigParser::new(options);

    if reader.next_token()? != TokenKind::StartObject {
        return Err(ParseError::syntax(
            reader.location(),
            "definitions document must be an object",
        )
        .into());
    }

    let mut configs: Vec<MetricConfig> = Vec::new();
    loop {
        match reader.next_token()? {
            TokenKind::EndObject => break,
            TokenKind::FieldName => {}
            other => {
                return Err(ParseError::syntax(
                    reader.location(),
                    format!("expected an aggregation name, got {:?}", other),
                )
                .into());
            }
        }

        let name = reader.text()?.to_owned();
        let name_at = reader.location();
        if configs.iter().any(|c| c.name == name) {
            return Err(malformed(&name, "duplicate aggregation name", name_at));
        }

        if reader.next_token()? != TokenKind::StartObject {
            return Err(malformed(
                &name,
                "expected an object holding the metric kind",
                reader.location(),
            ));
        }

        let kind = match reader.next_token()? {
            TokenKind::FieldName => reader.text()?.to_owned(),
            _ => return Err(malformed(&name, "missing metric kind", reader.location())),
        };
        let factory = registry.resolve(&kind, reader.location())?;
        let config = parser.parse(&name, &mut reader, factory)?;
        tracing::debug!(aggregation = %name, kind = %kind, "definition parsed");
        configs.push(config);

        if reader.next_token()? == TokenKind::FieldName {
            return Err(malformed(
                &name,
                format!(
                    "expected exactly one metric kind, found [{}] after [{}]",
                    reader.text()?,
                    kind
                ),
                reader.location(),
            ));
        }
    }

    reader.finish()?;
    Ok(configs)
}
