//! bucketagg-core: request parsing for bucket metrics aggregations.
//!
//! Turns the JSON body of a bucket metrics request (`avg_bucket`,
//! `percentiles_bucket`, ...) into a typed [`BucketMetricsConfig`]. The
//! fields all bucket metrics share are handled here; metric-specific
//! fields are handed to a [`MetricFactory`] supplied by the caller.
//!
//! # Public API
//!
//! - [`parse_request()`] -- lex and parse one request body
//! - [`RequestConfigParser`] -- the shared parser, for callers that already
//!   hold a [`TokenReader`]
//! - [`MetricFactory`] -- extension point for metric-specific fields
//! - [`ParseError`] / [`MetricConfigError`] -- error types

pub mod config;
pub mod error;
pub mod factory;
pub mod field;
pub mod gap_policy;
pub mod lexer;
pub mod parser;
pub mod pending;
pub mod reader;

// ── Convenience re-exports ───────────────────────────────────────────

pub use config::{BucketMetricsConfig, MetricSettings};
pub use error::{Location, MetricConfigError, ParseError};
pub use factory::MetricFactory;
pub use field::{FieldMatcher, ParseField};
pub use gap_policy::GapPolicy;
pub use parser::{parse_request, ParserOptions, RequestConfigParser};
pub use pending::PendingFields;
pub use reader::{TokenKind, TokenReader};
