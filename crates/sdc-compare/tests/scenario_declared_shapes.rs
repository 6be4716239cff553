//! Scenario: declared-configuration shapes and key selection
//!
//! # Invariants under test
//!
//! 1. Bound parameters behave like a map for key enumeration and containment.
//! 2. A property bag without a key filter is rejected with AmbiguousFilter.
//! 3. A property bag with a filter is compared through has-field/get-field.
//! 4. Filter entries are used verbatim; keys not declared are compliant.
//! 5. Non-object declared JSON is rejected with InputType before any comparison.
//! 6. Unsupported declared kinds always fail, whatever is observed.
//! 7. `Verbose` never affects the verdict.
//! 8. A null declared value is satisfied only by a null, absent or empty observed value.

use sdc_compare::*;
use serde_json::json;

/// Structured configuration object with fixed fields; only reachable through
/// the property-bag capability.
struct SiteSettings {
    port: Option<i32>,
    host_header: Option<String>,
}

impl PropertyBag for SiteSettings {
    fn has_field(&self, name: &str) -> bool {
        matches!(name, "Port" | "HostHeader")
    }

    fn get_field(&self, name: &str) -> Option<FieldValue> {
        match name {
            "Port" => self.port.map(FieldValue::Int32),
            "HostHeader" => self.host_header.clone().map(FieldValue::String),
            _ => None,
        }
    }
}

fn observed() -> ConfigMap {
    config_map_from_json(&json!({ "Port": 80, "HostHeader": "intranet" })).unwrap()
}

fn keys(k: &[&str]) -> Vec<String> {
    k.iter().map(|s| s.to_string()).collect()
}

#[test]
fn bound_parameters_enumerate_only_bound_keys() {
    let bound = BoundParameters::new().with("Port", 80);

    let r = compare(&observed(), DeclaredConfig::Bound(&bound), &[]).unwrap();
    assert!(r.is_compliant());
    assert_eq!(r.checked_keys, keys(&["Port"]));
}

#[test]
fn bound_parameters_report_mismatch() {
    let mut bound = BoundParameters::new();
    bound.bind("Port", 8080).bind("HostHeader", "intranet");

    let r = compare(&observed(), (&bound).into(), &[]).unwrap();
    assert!(!r.is_compliant());
    assert_eq!(r.diagnostics.len(), 1);
    assert_eq!(r.diagnostics[0].field, "Port");
}

#[test]
fn property_bag_without_filter_is_ambiguous() {
    let bag = SiteSettings {
        port: Some(80),
        host_header: None,
    };

    let err = compare(&observed(), DeclaredConfig::Properties(&bag), &[]).unwrap_err();
    assert_eq!(err, CompareError::AmbiguousFilter);
}

#[test]
fn property_bag_with_filter_is_compared() {
    let bag = SiteSettings {
        port: Some(443),
        host_header: Some("intranet".to_string()),
    };

    let r = compare(
        &observed(),
        DeclaredConfig::Properties(&bag),
        &keys(&["Port", "HostHeader"]),
    )
    .unwrap();
    assert!(!r.is_compliant());
    assert_eq!(r.diagnostics.len(), 1);
    assert_eq!(r.diagnostics[0].declared, FieldValue::Int32(443));
}

#[test]
fn property_bag_field_without_value_requires_unset_observed() {
    let bag = SiteSettings {
        port: None,
        host_header: None,
    };

    let r = compare(&observed(), DeclaredConfig::Properties(&bag), &keys(&["Port"])).unwrap();
    assert!(!r.is_compliant());
    assert_eq!(r.diagnostics.len(), 1);
    assert_eq!(r.diagnostics[0].reason, MismatchReason::ValueMismatch);
    assert_eq!(r.diagnostics[0].declared, FieldValue::Null);

    let unset = config_map_from_json(&json!({ "HostHeader": "" })).unwrap();
    let r = compare(
        &unset,
        DeclaredConfig::Properties(&bag),
        &keys(&["Port", "HostHeader"]),
    )
    .unwrap();
    assert!(r.is_compliant(), "absent and empty observed values satisfy a null declaration");
}

#[test]
fn null_declared_map_value_rejects_observed_value() {
    let observed = config_map_from_json(&json!({ "Name": "svc", "Port": 8080 })).unwrap();
    let declared = config_map_from_json(&json!({ "Name": null, "Port": null })).unwrap();

    let r = compare(&observed, DeclaredConfig::Map(&declared), &[]).unwrap();
    assert!(!r.is_compliant());
    assert_eq!(r.diagnostics.len(), 2);
    assert!(r
        .diagnostics
        .iter()
        .all(|d| d.reason == MismatchReason::ValueMismatch && d.declared == FieldValue::Null));

    let unset = config_map_from_json(&json!({ "Name": "", "Port": null })).unwrap();
    assert!(is_compliant(&unset, DeclaredConfig::Map(&declared), &[]).unwrap());
}

#[test]
fn filter_keys_not_declared_are_compliant() {
    let declared = config_map_from_json(&json!({ "Port": 80 })).unwrap();

    let r = compare(
        &observed(),
        DeclaredConfig::Map(&declared),
        &keys(&["Port", "DoesNotExist", "HostHeader"]),
    )
    .unwrap();
    assert!(r.is_compliant());
    assert_eq!(r.checked_keys.len(), 3);
}

#[test]
fn filter_restricts_checked_keys() {
    let declared = config_map_from_json(&json!({ "Port": 443, "HostHeader": "intranet" })).unwrap();

    let r = compare(&observed(), DeclaredConfig::Map(&declared), &keys(&["HostHeader"])).unwrap();
    assert!(r.is_compliant(), "Port mismatch must be ignored when filtered out");
}

#[test]
fn non_object_declared_json_is_input_type_error() {
    for bad in [json!("Port=80"), json!(42), json!(null), json!([{"Port": 80}])] {
        let err = DeclaredInput::map_from_json(&bad).unwrap_err();
        assert!(
            matches!(err, CompareError::InputType { .. }),
            "expected InputType for {bad}, got {err:?}"
        );
        assert!(DeclaredInput::properties_from_json(&bad).is_err());
    }
}

#[test]
fn declared_input_properties_require_filter() {
    let input = DeclaredInput::properties_from_json(&json!({ "Port": 80 })).unwrap();

    assert_eq!(
        compare(&observed(), input.as_declared(), &[]).unwrap_err(),
        CompareError::AmbiguousFilter
    );
    assert!(is_compliant(&observed(), input.as_declared(), &keys(&["Port"])).unwrap());
}

#[test]
fn unsupported_declared_kind_always_fails() {
    let observed = config_map_from_json(&json!({ "Enabled": true, "Ratio": 0.5 })).unwrap();

    // Identical raw values are compliant before any rule runs.
    let same = observed.clone();
    assert!(is_compliant(&observed, DeclaredConfig::Map(&same), &[]).unwrap());

    for value in [json!(false), json!(0.25), json!({ "nested": 1 })] {
        let declared = config_map_from_json(&json!({ "Enabled": value })).unwrap();
        let r = compare(&observed, DeclaredConfig::Map(&declared), &[]).unwrap();
        assert!(!r.is_compliant());
        assert!(matches!(
            r.diagnostics[0].reason,
            MismatchReason::UnsupportedType { .. }
        ));
    }

    // Missing observed value does not rescue an unsupported declared kind.
    let declared = config_map_from_json(&json!({ "Missing": { "a": 1 } })).unwrap();
    assert!(!is_compliant(&observed, DeclaredConfig::Map(&declared), &[]).unwrap());
}

#[test]
fn verbose_never_affects_verdict() {
    let declared = config_map_from_json(&json!({ "Verbose": true, "Port": 80 })).unwrap();

    let r = compare(&observed(), DeclaredConfig::Map(&declared), &[]).unwrap();
    assert!(r.is_compliant());
    assert_eq!(r.checked_keys, keys(&["Port"]));

    let r = compare(
        &observed(),
        DeclaredConfig::Map(&declared),
        &keys(&["Verbose", "verbose"]),
    )
    .unwrap();
    assert!(r.is_compliant());
    assert!(r.checked_keys.is_empty());
}

#[test]
fn report_serializes_with_kind_tags() {
    let declared = config_map_from_json(&json!({ "Port": 443 })).unwrap();
    let r = compare(&observed(), DeclaredConfig::Map(&declared), &[]).unwrap();

    let v = serde_json::to_value(&r).unwrap();
    assert_eq!(v["compliant"], json!(false));
    assert_eq!(v["diagnostics"][0]["field"], json!("Port"));
    assert_eq!(v["diagnostics"][0]["reason"], json!("value_mismatch"));
    assert_eq!(
        v["diagnostics"][0]["observed"],
        json!({ "kind": "int32", "value": 80 })
    );
}
