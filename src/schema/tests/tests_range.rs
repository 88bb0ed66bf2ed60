#![allow(clippy::unwrap_used)]

use rstest::rstest;

use crate::schema::{Range, SchemaError, parse_multiplicity, parse_value_range};

// ============================================================================
// Multiplicity
// ============================================================================

#[rstest]
#[case(None, "1", "1")]
#[case(Some("3"), "3", "3")]
#[case(Some("*"), "0", "*")]
#[case(Some("0..*"), "0", "*")]
#[case(Some("2..5"), "2", "5")]
fn test_multiplicity_normalization(
    #[case] input: Option<&str>,
    #[case] min: &str,
    #[case] max: &str,
) {
    assert_eq!(parse_multiplicity(input, "attr").unwrap(), Range::new(min, max));
}

#[rstest]
#[case("")]
#[case("abc")]
#[case("1..")]
#[case("..3")]
#[case("-1")]
#[case("*..3")]
#[case("1..2..3")]
fn test_multiplicity_rejects_malformed(#[case] input: &str) {
    let err = parse_multiplicity(Some(input), "struct 'S', attribute 'a'").unwrap_err();
    assert!(matches!(err, SchemaError::InvalidMultiplicity { ref value, .. } if value == input));
    assert!(err.to_string().contains(input));
    assert!(err.to_string().contains("attribute 'a'"));
}

#[test]
fn test_unbounded_flag() {
    assert!(parse_multiplicity(Some("*"), "a").unwrap().is_unbounded());
    assert!(!parse_multiplicity(Some("4"), "a").unwrap().is_unbounded());
}

// ============================================================================
// Value range
// ============================================================================

#[rstest]
#[case("1..10", "1", "10")]
#[case("-5..*", "-5", "*")]
#[case("-10..-2", "-10", "-2")]
fn test_value_range_accepted(#[case] input: &str, #[case] min: &str, #[case] max: &str) {
    assert_eq!(
        parse_value_range(Some(input), "a").unwrap(),
        Some(Range::new(min, max))
    );
}

#[test]
fn test_value_range_absent() {
    assert_eq!(parse_value_range(None, "a").unwrap(), None);
}

#[rstest]
#[case("")]
#[case("abc")]
#[case("5")]
#[case("*..5")]
#[case("1.5..2")]
fn test_value_range_rejects_malformed(#[case] input: &str) {
    let err = parse_value_range(Some(input), "a").unwrap_err();
    assert!(matches!(err, SchemaError::InvalidRange { ref value, .. } if value == input));
}

#[test]
fn test_range_display() {
    assert_eq!(Range::new("0", "*").to_string(), "0..*");
}
