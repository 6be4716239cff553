//! Scenario: array fields are unordered multisets
//!
//! # Invariants under test
//!
//! 1. Element order never matters.
//! 2. Each unmatched element yields one diagnostic tagged with its side.
//! 3. Duplicate counts matter.
//! 4. A declared array with nothing observed yields a single missing-array diagnostic.
//! 5. A scalar observed value counts as a one-element array.

use sdc_compare::*;

fn one(key: &str, v: FieldValue) -> ConfigMap {
    let mut m = ConfigMap::new();
    m.insert(key.to_string(), v);
    m
}

fn tags_filter() -> Vec<String> {
    vec!["Tags".to_string()]
}

#[test]
fn array_order_is_ignored() {
    let observed = one("Tags", FieldValue::array([1, 2, 3]));
    let declared = one("Tags", FieldValue::array([3, 2, 1]));

    let r = compare(&observed, DeclaredConfig::Map(&declared), &tags_filter()).unwrap();
    assert!(r.is_compliant(), "reordered arrays must match: {:?}", r.diagnostics);
}

#[test]
fn missing_element_is_declared_only() {
    let observed = one("Tags", FieldValue::array([1, 2]));
    let declared = one("Tags", FieldValue::array([1, 2, 3]));

    let r = compare(&observed, DeclaredConfig::Map(&declared), &tags_filter()).unwrap();
    assert!(!r.is_compliant());
    assert_eq!(r.diagnostics.len(), 1);
    assert_eq!(
        r.diagnostics[0].reason,
        MismatchReason::ArrayElement {
            element: ArrayElement::Int(3),
            side: ElementSide::DeclaredOnly,
        }
    );
}

#[test]
fn extra_and_missing_elements_are_both_reported() {
    let observed = one("Tags", FieldValue::array(["web", "legacy"]));
    let declared = one("Tags", FieldValue::array(["web", "api"]));

    let r = compare(&observed, DeclaredConfig::Map(&declared), &[]).unwrap();
    assert!(!r.is_compliant());

    let reasons: Vec<&MismatchReason> = r.diagnostics_for("Tags").map(|d| &d.reason).collect();
    assert_eq!(reasons.len(), 2);
    assert!(reasons.contains(&&MismatchReason::ArrayElement {
        element: ArrayElement::from("legacy"),
        side: ElementSide::ObservedOnly,
    }));
    assert!(reasons.contains(&&MismatchReason::ArrayElement {
        element: ArrayElement::from("api"),
        side: ElementSide::DeclaredOnly,
    }));
}

#[test]
fn duplicate_counts_are_significant() {
    let observed = one("Tags", FieldValue::array(["a", "a", "b"]));
    let declared = one("Tags", FieldValue::array(["a", "b"]));

    let r = compare(&observed, DeclaredConfig::Map(&declared), &[]).unwrap();
    assert!(!r.is_compliant());
    assert_eq!(r.diagnostics.len(), 1);
}

#[test]
fn missing_observed_array_is_reported_once() {
    let declared = one("Tags", FieldValue::array([1, 2]));

    let r = compare(&ConfigMap::new(), DeclaredConfig::Map(&declared), &[]).unwrap();
    assert!(!r.is_compliant());
    assert_eq!(r.diagnostics.len(), 1);
    assert_eq!(r.diagnostics[0].reason, MismatchReason::MissingArray);
    assert_eq!(r.diagnostics[0].observed, FieldValue::Null);
}

#[test]
fn null_observed_array_is_missing() {
    let observed = one("Tags", FieldValue::Null);
    let declared = one("Tags", FieldValue::array(["x"]));

    let r = compare(&observed, DeclaredConfig::Map(&declared), &[]).unwrap();
    assert_eq!(r.diagnostics[0].reason, MismatchReason::MissingArray);
}

#[test]
fn empty_declared_array_matches_empty_observed_array() {
    let observed = one("Tags", FieldValue::Array(Vec::new()));
    let declared = one("Tags", FieldValue::Array(Vec::new()));

    assert!(is_compliant(&observed, DeclaredConfig::Map(&declared), &[]).unwrap());
}

#[test]
fn scalar_observed_counts_as_single_element() {
    let observed = one("Tags", FieldValue::from("web"));
    let declared = one("Tags", FieldValue::array(["web"]));

    assert!(is_compliant(&observed, DeclaredConfig::Map(&declared), &[]).unwrap());
}

#[test]
fn unsupported_observed_against_declared_array_is_a_mismatch() {
    let observed = one("Tags", FieldValue::unsupported("object", "{}"));
    let declared = one("Tags", FieldValue::array(["web"]));

    let r = compare(&observed, DeclaredConfig::Map(&declared), &[]).unwrap();
    assert!(!r.is_compliant());
    assert_eq!(r.diagnostics[0].reason, MismatchReason::ValueMismatch);
}
