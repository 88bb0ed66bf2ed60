//! Multiplicity and value-range normalization.
//!
//! Accepted shapes:
//!
//! | field          | input      | result          |
//! |----------------|------------|-----------------|
//! | `multiplicity` | absent     | `1..1`          |
//! | `multiplicity` | `N`        | `N..N`          |
//! | `multiplicity` | `*`        | `0..*`          |
//! | `multiplicity` | `MIN..MAX` | `MIN..MAX` (`MAX` may be `*`) |
//! | `range`        | absent     | none            |
//! | `range`        | `MIN..MAX` | signed bounds, `MAX` may be `*` |
//!
//! A present but empty string is malformed for both fields.

use super::defs::Range;
use super::error::SchemaError;
use crate::base::constants::UNBOUNDED;

/// Normalize an optional `multiplicity` field into a cardinality.
pub fn parse_multiplicity(value: Option<&str>, location: &str) -> Result<Range, SchemaError> {
    let Some(raw) = value else {
        return Ok(Range::exactly_one());
    };

    if let Some((min, max)) = raw.split_once("..") {
        if is_unsigned(min) && (is_unsigned(max) || max == UNBOUNDED) {
            return Ok(Range::new(min, max));
        }
    } else if raw == UNBOUNDED {
        return Ok(Range::new("0", UNBOUNDED));
    } else if is_unsigned(raw) {
        return Ok(Range::new(raw, raw));
    }

    Err(SchemaError::invalid_multiplicity(location, raw))
}

/// Normalize an optional `range` field into a value range.
pub fn parse_value_range(value: Option<&str>, location: &str) -> Result<Option<Range>, SchemaError> {
    let Some(raw) = value else {
        return Ok(None);
    };

    match raw.split_once("..") {
        Some((min, max)) if is_signed(min) && (is_signed(max) || max == UNBOUNDED) => {
            Ok(Some(Range::new(min, max)))
        }
        _ => Err(SchemaError::invalid_range(location, raw)),
    }
}

fn is_unsigned(s: &str) -> bool {
    !s.is_empty() && s.bytes().all(|b| b.is_ascii_digit())
}

fn is_signed(s: &str) -> bool {
    is_unsigned(s.strip_prefix('-').unwrap_or(s))
}
