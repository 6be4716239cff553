//! sdc-compare
//!
//! Configuration-state comparator for declarative reconciliation.
//!
//! Decides whether an observed configuration snapshot matches a declared one:
//! - Rules are chosen from an explicit value-kind tag (string, int16, int32,
//!   array); any other declared kind is non-compliant.
//! - Arrays are compared as unordered multisets.
//! - Missing/null observed strings match empty declared strings; missing
//!   observed integers match a zero declared value. A null declared value is
//!   satisfied only by a missing, null or empty observed value.
//! - `Verbose` is never compared.
//!
//! Pure, deterministic logic. No IO, no logging: callers get a structured
//! report and decide what to do with it.

mod declared;
mod engine;
mod error;
mod json;
mod types;

pub use declared::{BoundParameters, DeclaredConfig, PropertyBag};
pub use engine::{array_difference, compare, is_compliant};
pub use error::CompareError;
pub use json::{config_map_from_json, DeclaredInput, JsonProperties};
pub use types::*;
