//! Field-name matching with deprecated-alias support.
//!
//! A [`ParseField`] names a field by its preferred snake_case spelling plus
//! any deprecated aliases. The camelCase form of the preferred name is
//! always treated as a deprecated alias. [`FieldMatcher`] decides whether
//! deprecated spellings are accepted (with a warning) or refused.

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ParseField {
    name: &'static str,
    deprecated: &'static [&'static str],
}

impl ParseField {
    pub const fn new(name: &'static str) -> Self {
        ParseField {
            name,
            deprecated: &[],
        }
    }

    pub const fn with_deprecated(self, deprecated: &'static [&'static str]) -> Self {
        ParseField {
            name: self.name,
            deprecated,
        }
    }

    pub fn preferred_name(&self) -> &'static str {
        self.name
    }

    fn is_deprecated_spelling(&self, candidate: &str) -> bool {
        self.deprecated.contains(&candidate)
            || (self.name.contains('_') && candidate == camel_case(self.name))
    }
}

fn camel_case(name: &str) -> String {
    let mut out = String::with_capacity(name.len());
    let mut upper = false;
    for c in name.chars() {
        if c == '_' {
            upper = true;
        } else if upper {
            out.extend(c.to_uppercase());
            upper = false;
        } else {
            out.push(c);
        }
    }
    out
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FieldMatcher {
    strict: bool,
}

impl FieldMatcher {
    pub fn new(strict: bool) -> Self {
        FieldMatcher { strict }
    }

    /// Accepts deprecated spellings, logging a warning for each use.
    pub fn lenient() -> Self {
        FieldMatcher::new(false)
    }

    /// Only the preferred spelling matches.
    pub fn strict() -> Self {
        FieldMatcher::new(true)
    }

    pub fn matches(&self, candidate: &str, field: &ParseField) -> bool {
        if candidate == field.name {
            return true;
        }
        if !field.is_deprecated_spelling(candidate) {
            return false;
        }
        if self.strict {
            tracing::debug!(
                field = candidate,
                preferred = field.name,
                "deprecated field name refused in strict mode"
            );
            false
        } else {
            tracing::warn!(
                "deprecated field [{}] used, expected [{}] instead",
                candidate,
                field.name
            );
            true
        }
    }
}
