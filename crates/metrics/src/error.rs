use bucketagg_core::{Location, ParseError};

/// Errors from resolving metric kinds and reading definitions documents.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum DefinitionError {
    /// No factory is registered under the requested kind.
    #[error("unknown bucket metric [{kind}]")]
    UnknownMetric { kind: String, location: Location },

    /// A named definition is not shaped as `{"<kind>": {...}}`.
    #[error("[{location}] malformed definition [{name}]: {message}")]
    MalformedDefinition {
        name: String,
        message: String,
        location: Location,
    },

    #[error(transparent)]
    Parse(#[from] ParseError),
}

impl DefinitionError {
    pub fn kind(&self) -> &'static str {
        match self {
            DefinitionError::UnknownMetric { .. } => "unknown_metric",
            DefinitionError::MalformedDefinition { .. } => "malformed_definition",
            DefinitionError::Parse(e) => e.kind(),
        }
    }

    pub fn location(&self) -> Location {
        match self {
            DefinitionError::UnknownMetric { location, .. }
            | DefinitionError::MalformedDefinition { location, .. } => *location,
            DefinitionError::Parse(e) => e.location(),
        }
    }

    /// Same layout as [`ParseError::to_json_value`].
    pub fn to_json_value(&self) -> serde_json::Value {
        match self {
            DefinitionError::Parse(e) => e.to_json_value(),
            DefinitionError::UnknownMetric { location, .. } => serde_json::json!({
                "column":  location.column,
                "kind":    self.kind(),
                "line":    location.line,
                "message": self.to_string(),
                "name":    serde_json::Value::Null,
            }),
            DefinitionError::MalformedDefinition { name, location, .. } => serde_json::json!({
                "column":  location.column,
                "kind":    self.kind(),
                "line":    location.line,
                "message": self.to_string(),
                "name":    name,
            }),
        }
    }
}
