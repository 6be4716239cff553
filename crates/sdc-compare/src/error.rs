use thiserror::Error;

/// Failures that stop a comparison before any field is evaluated.
///
/// Field mismatches are never errors; they are reported through
/// [`ComplianceReport`](crate::ComplianceReport).
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CompareError {
    /// Declared configuration is not a map, bound parameters or a property bag.
    #[error("declared configuration must be a map, bound parameters or a property bag (got {found})")]
    InputType { found: String },

    /// Property bags cannot enumerate their fields, so the caller must name them.
    #[error("declared configuration is a property bag: a key filter is required")]
    AmbiguousFilter,
}
