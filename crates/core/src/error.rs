use std::fmt;

/// Position of a token in the request source. Lines and columns are 1-based.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Location {
    pub line: u32,
    pub column: u32,
}

impl Location {
    pub fn new(line: u32, column: u32) -> Self {
        Location { line, column }
    }
}

impl fmt::Display for Location {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.line, self.column)
    }
}

/// Raised by a metric factory when the fields it claims are unusable.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum MetricConfigError {
    /// The field is present but has the wrong JSON type.
    #[error("parameter [{field}] must be {expected}, {found} provided instead")]
    InvalidType {
        field: String,
        expected: &'static str,
        found: &'static str,
    },

    /// The field has the right type but an unacceptable value.
    #[error("parameter [{field}] {message}")]
    InvalidValue { field: String, message: String },
}

/// A bucket metrics request could not be turned into a configuration.
///
/// Every variant is terminal for the request: nothing is retried and no
/// partial configuration is produced.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ParseError {
    /// Malformed input: bad literal, unexpected token, premature end of input.
    #[error("[{location}] {message}")]
    Syntax { message: String, location: Location },

    #[error("[{location}] missing required field [{field}] for aggregation [{name}]")]
    MissingRequiredField {
        field: String,
        name: String,
        location: Location,
    },

    /// The metric factory rejected the fields it was handed.
    #[error("[{location}] could not parse settings for aggregation [{name}]: {source}")]
    InvalidMetricConfig {
        name: String,
        #[source]
        source: MetricConfigError,
        location: Location,
    },

    /// Fields that neither the shared parser nor the metric factory claimed.
    #[error("[{location}] unexpected tokens [{}] in [{name}]", .fields.join(", "))]
    UnexpectedFields {
        name: String,
        fields: Vec<String>,
        location: Location,
    },

    #[error("[{location}] invalid gap policy [{value}], accepted values: [{}]", .valid.join(", "))]
    InvalidGapPolicy {
        value: String,
        valid: Vec<String>,
        location: Location,
    },
}

impl ParseError {
    pub fn syntax(location: Location, message: impl Into<String>) -> Self {
        ParseError::Syntax {
            message: message.into(),
            location,
        }
    }

    /// Stable snake_case discriminant, suitable for mapping onto responses.
    pub fn kind(&self) -> &'static str {
        match self {
            ParseError::Syntax { .. } => "syntax",
            ParseError::MissingRequiredField { .. } => "missing_required_field",
            ParseError::InvalidMetricConfig { .. } => "invalid_metric_config",
            ParseError::UnexpectedFields { .. } => "unexpected_fields",
            ParseError::InvalidGapPolicy { .. } => "invalid_gap_policy",
        }
    }

    pub fn location(&self) -> Location {
        match self {
            ParseError::Syntax { location, .. }
            | ParseError::MissingRequiredField { location, .. }
            | ParseError::InvalidMetricConfig { location, .. }
            | ParseError::UnexpectedFields { location, .. }
            | ParseError::InvalidGapPolicy { location, .. } => *location,
        }
    }

    /// The aggregation the error belongs to, when known.
    pub fn aggregation_name(&self) -> Option<&str> {
        match self {
            ParseError::MissingRequiredField { name, .. }
            | ParseError::InvalidMetricConfig { name, .. }
            | ParseError::UnexpectedFields { name, .. } => Some(name),
            ParseError::Syntax { .. } | ParseError::InvalidGapPolicy { .. } => None,
        }
    }

    /// Serialize to the `expected-error.json` layout. All keys are always present.
    pub fn to_json_value(&self) -> serde_json::Value {
        let location = self.location();
        serde_json::json!({
            "column":  location.column,
            "kind":    self.kind(),
            "line":    location.line,
            "message": self.to_string(),
            "name":    self.aggregation_name(),
        })
    }
}
