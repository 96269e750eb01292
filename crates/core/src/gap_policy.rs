use std::fmt;

use crate::error::{Location, ParseError};
use crate::field::{FieldMatcher, ParseField};

/// How a bucket metric treats buckets whose input value is missing.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum GapPolicy {
    /// Leave the bucket out of the computation.
    #[default]
    Skip,
    /// Count the bucket as zero.
    InsertZeros,
}

impl GapPolicy {
    pub const ALL: [GapPolicy; 2] = [GapPolicy::Skip, GapPolicy::InsertZeros];

    pub fn name(self) -> &'static str {
        self.parse_field().preferred_name()
    }

    fn parse_field(self) -> ParseField {
        match self {
            GapPolicy::Skip => ParseField::new("skip"),
            GapPolicy::InsertZeros => ParseField::new("insert_zeros"),
        }
    }

    /// Resolve a raw `gap_policy` value. `location` is where the value
    /// appeared, for error attribution.
    pub fn parse(
        raw: &str,
        location: Location,
        matcher: &FieldMatcher,
    ) -> Result<GapPolicy, ParseError> {
        GapPolicy::ALL
            .into_iter()
            .find(|policy| matcher.matches(raw, &policy.parse_field()))
            .ok_or_else(|| ParseError::InvalidGapPolicy {
                value: raw.to_owned(),
                valid: GapPolicy::ALL.iter().map(|p| p.name().to_owned()).collect(),
                location,
            })
    }
}

impl fmt::Display for GapPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
