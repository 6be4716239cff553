//! sdc-host
//!
//! Host-state collaborators used alongside the comparator by a reconciliation
//! engine:
//! - module search-path merge (machine scope into process scope)
//! - trust-zone registry entries for a server
//! - organizational-unit lookup in a directory service
//! - installed product version discovery
//!
//! Each OS/directory surface is a trait ([`EnvironmentStore`],
//! [`RegistryHive`], [`DirectorySearcher`], [`InstalledSoftware`]); this crate
//! holds the logic on top of them. Backend errors propagate unmodified.
//! [`memory`] provides deterministic in-memory backends.

mod directory;
mod env_path;
pub mod memory;
mod product;
mod trust_zone;

pub use directory::{
    escape_filter_value, lookup_organizational_unit, relative_path, split_dn, DirectoryEntry,
    DirectoryQuery, DirectorySearcher, OuMembership, OuNotFound, ORGANIZATIONAL_UNIT_CATEGORY,
};
pub use env_path::{merge_search_path, EnvScope, EnvironmentStore};
pub use product::{
    installed_product_version, InstalledSoftware, ProductVersion, UninstallEntry,
    VersionParseError,
};
pub use trust_zone::{RegistryHive, TrustZone, TrustZoneChange, TRUSTED_FLAG};
