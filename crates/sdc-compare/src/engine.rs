use std::collections::BTreeMap;

use crate::{
    is_reserved_key, ArrayElement, CompareError, ComplianceReport, ConfigMap, DeclaredConfig,
    Diagnostic, ElementDifference, ElementSide, FieldValue, MismatchReason, ValueKind,
};

/// Stand-in for a field the observed snapshot does not have.
static ABSENT: FieldValue = FieldValue::Null;

/// A per-kind comparison rule: `(field, observed, declared, diagnostics) -> compliant`.
type Rule = fn(&str, &FieldValue, &FieldValue, &mut Vec<Diagnostic>) -> bool;

/// Rule table, keyed by the declared value's kind.
fn rule_for(kind: ValueKind) -> Rule {
    match kind {
        ValueKind::Array => check_array,
        ValueKind::String | ValueKind::Null => check_string,
        ValueKind::Int16 | ValueKind::Int32 => check_integer,
        ValueKind::Unsupported => check_unsupported,
    }
}

fn check_array(
    field: &str,
    observed: &FieldValue,
    declared: &FieldValue,
    diags: &mut Vec<Diagnostic>,
) -> bool {
    if observed.is_null() {
        diags.push(Diagnostic::new(
            field,
            observed,
            declared,
            MismatchReason::MissingArray,
        ));
        return false;
    }

    let Some(observed_items) = observed.elements() else {
        diags.push(Diagnostic::new(
            field,
            observed,
            declared,
            MismatchReason::ValueMismatch,
        ));
        return false;
    };
    let declared_items = declared.elements().unwrap_or_default();

    let diff = array_difference(&observed_items, &declared_items);
    for d in &diff {
        diags.push(Diagnostic::new(
            field,
            observed,
            declared,
            MismatchReason::ArrayElement {
                element: d.element.clone(),
                side: d.side,
            },
        ));
    }
    diff.is_empty()
}

fn check_string(
    field: &str,
    observed: &FieldValue,
    declared: &FieldValue,
    diags: &mut Vec<Diagnostic>,
) -> bool {
    if observed.is_null_or_empty() && declared.is_null_or_empty() {
        return true;
    }
    if let (Some(o), Some(d)) = (observed.as_text(), declared.as_text()) {
        if o == d {
            return true;
        }
    }
    diags.push(Diagnostic::new(
        field,
        observed,
        declared,
        MismatchReason::ValueMismatch,
    ));
    false
}

fn check_integer(
    field: &str,
    observed: &FieldValue,
    declared: &FieldValue,
    diags: &mut Vec<Diagnostic>,
) -> bool {
    let want = declared.as_integer();

    // Unset observed state matches an unspecified (zero) declared value.
    if want == Some(0) && observed.is_null() {
        return true;
    }

    let got = match observed {
        FieldValue::String(s) => s.trim().parse::<i64>().ok(),
        other => other.as_integer(),
    };
    if got.is_some() && got == want {
        return true;
    }

    diags.push(Diagnostic::new(
        field,
        observed,
        declared,
        MismatchReason::ValueMismatch,
    ));
    false
}

fn check_unsupported(
    field: &str,
    observed: &FieldValue,
    declared: &FieldValue,
    diags: &mut Vec<Diagnostic>,
) -> bool {
    diags.push(Diagnostic::new(
        field,
        observed,
        declared,
        MismatchReason::UnsupportedType {
            type_name: declared.type_name().to_string(),
        },
    ));
    false
}

/// Multiset symmetric difference of two arrays.
///
/// Order of the inputs is irrelevant; duplicate counts are not. Output is
/// sorted by element so repeated calls produce identical diagnostics.
pub fn array_difference(
    observed: &[ArrayElement],
    declared: &[ArrayElement],
) -> Vec<ElementDifference> {
    let mut balance: BTreeMap<&ArrayElement, i64> = BTreeMap::new();
    for e in observed {
        *balance.entry(e).or_insert(0) += 1;
    }
    for e in declared {
        *balance.entry(e).or_insert(0) -= 1;
    }

    let mut out = Vec::new();
    for (element, n) in balance {
        let side = if n > 0 {
            ElementSide::ObservedOnly
        } else {
            ElementSide::DeclaredOnly
        };
        for _ in 0..n.unsigned_abs() {
            out.push(ElementDifference {
                element: element.clone(),
                side,
            });
        }
    }
    out
}

/// Compare an observed snapshot against a declared configuration.
///
/// - Empty `filter`: every declared key is checked (map and bound shapes only;
///   a property bag yields [`CompareError::AmbiguousFilter`]).
/// - Non-empty `filter`: exactly those keys, verbatim, in order.
/// - [`RESERVED_VERBOSE`](crate::RESERVED_VERBOSE) is never checked.
///
/// Every checked key is evaluated; the verdict is the AND of all of them.
/// Mismatches are reported as diagnostics, never as errors.
pub fn compare(
    observed: &ConfigMap,
    declared: DeclaredConfig<'_>,
    filter: &[String],
) -> Result<ComplianceReport, CompareError> {
    let keys = if filter.is_empty() {
        declared
            .enumerable_keys()
            .ok_or(CompareError::AmbiguousFilter)?
    } else {
        filter.to_vec()
    };

    let mut report = ComplianceReport::empty();

    for key in keys {
        if is_reserved_key(&key) {
            continue;
        }

        let observed_value = observed.get(&key);
        let declared_value = declared.get(&key);
        report.checked_keys.push(key.clone());

        let declared_is_array =
            declared_value.as_ref().map(FieldValue::kind) == Some(ValueKind::Array);
        let candidate = observed_value.is_none()
            || observed_value != declared_value.as_ref()
            || declared_is_array;
        if !candidate {
            continue;
        }

        // Nothing declared, nothing to violate.
        if !declared.contains(&key) {
            continue;
        }
        let declared_value = declared_value.unwrap_or(FieldValue::Null);
        let observed_value = observed_value.unwrap_or(&ABSENT);

        let rule = rule_for(declared_value.kind());
        let ok = rule(&key, observed_value, &declared_value, &mut report.diagnostics);
        report.compliant &= ok;
    }

    Ok(report)
}

/// Verdict-only form of [`compare`].
pub fn is_compliant(
    observed: &ConfigMap,
    declared: DeclaredConfig<'_>,
    filter: &[String],
) -> Result<bool, CompareError> {
    compare(observed, declared, filter).map(|r| r.compliant)
}
