use anyhow::Result;
use clap::ValueEnum;
use sdc_compare::{compare, config_map_from_json, ComplianceReport, DeclaredInput};
use tracing::{info, warn};

use super::load_document;

/// How the declared document is presented to the comparator.
#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum DeclaredShape {
    /// Ordered map: every key is checked when no --key is given.
    Map,
    /// Bound parameters: like a map, holds only what was supplied.
    Bound,
    /// Property bag: fields are only reachable by name; --key is required.
    Properties,
}

pub fn run_compare(
    observed_path: &str,
    declared_path: &str,
    shape: DeclaredShape,
    keys: &[String],
) -> Result<ComplianceReport> {
    let observed = config_map_from_json(&load_document(observed_path)?)?;

    let declared_doc = load_document(declared_path)?;
    let declared = match shape {
        DeclaredShape::Map => DeclaredInput::map_from_json(&declared_doc)?,
        DeclaredShape::Bound => DeclaredInput::bound_from_json(&declared_doc)?,
        DeclaredShape::Properties => DeclaredInput::properties_from_json(&declared_doc)?,
    };

    let report = compare(&observed, declared.as_declared(), keys)?;

    for d in &report.diagnostics {
        warn!(field = %d.field, "{d}");
    }
    info!(
        compliant = report.compliant,
        checked = report.checked_keys.len(),
        mismatches = report.diagnostics.len(),
        "comparison finished"
    );

    Ok(report)
}
