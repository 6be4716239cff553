//! Organizational-unit lookup.
//!
//! The desired OU is located by name; its distinguished name is reduced to the
//! domain-relative path (all `DC=` components dropped) and compared with the
//! OU a machine currently sits in.

use anyhow::Result;
use serde::Serialize;
use thiserror::Error;
use tracing::debug;

pub const ORGANIZATIONAL_UNIT_CATEGORY: &str = "organizationalUnit";

/// A directory search: objects of `object_category` whose `name` matches.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DirectoryQuery {
    pub object_category: String,
    pub name: String,
}

impl DirectoryQuery {
    pub fn organizational_unit(name: impl Into<String>) -> Self {
        Self {
            object_category: ORGANIZATIONAL_UNIT_CATEGORY.to_string(),
            name: name.into(),
        }
    }

    /// LDAP filter form, for backends that speak LDAP.
    pub fn to_ldap_filter(&self) -> String {
        format!(
            "(&(objectCategory={})(name={}))",
            escape_filter_value(&self.object_category),
            escape_filter_value(&self.name)
        )
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct DirectoryEntry {
    pub distinguished_name: String,
    pub name: String,
}

pub trait DirectorySearcher {
    fn search(&self, query: &DirectoryQuery) -> Result<Vec<DirectoryEntry>>;
}

/// No organizational unit with the requested name exists.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
#[error("organizational unit '{ou_name}' not found")]
pub struct OuNotFound {
    pub ou_name: String,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct OuMembership {
    pub distinguished_name: String,
    pub relative_path: String,
    /// Whether the existing OU equals the desired one.
    pub matches: bool,
}

/// Escape an LDAP filter assertion value (RFC 4515).
pub fn escape_filter_value(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    for c in value.chars() {
        match c {
            '\\' => out.push_str("\\5c"),
            '*' => out.push_str("\\2a"),
            '(' => out.push_str("\\28"),
            ')' => out.push_str("\\29"),
            '\0' => out.push_str("\\00"),
            other => out.push(other),
        }
    }
    out
}

/// Split a distinguished name into its RDN components. Escaped commas (`\,`)
/// stay inside their component.
pub fn split_dn(dn: &str) -> Vec<String> {
    let mut parts = Vec::new();
    let mut current = String::new();
    let mut escaped = false;
    for c in dn.chars() {
        if escaped {
            current.push(c);
            escaped = false;
            continue;
        }
        match c {
            '\\' => {
                current.push(c);
                escaped = true;
            }
            ',' => parts.push(std::mem::take(&mut current)),
            other => current.push(other),
        }
    }
    parts.push(current);
    parts
        .into_iter()
        .map(|p| p.trim().to_string())
        .filter(|p| !p.is_empty())
        .collect()
}

fn is_domain_component(rdn: &str) -> bool {
    rdn.get(..3)
        .map(|head| head.eq_ignore_ascii_case("DC="))
        .unwrap_or(false)
}

/// Domain-relative path of a distinguished name.
pub fn relative_path(dn: &str) -> String {
    split_dn(dn)
        .into_iter()
        .filter(|rdn| !is_domain_component(rdn))
        .collect::<Vec<_>>()
        .join(",")
}

fn normalize_dn(dn: &str) -> String {
    split_dn(dn).join(",").to_lowercase()
}

/// Find `desired_ou` and compare it with `existing_ou`.
///
/// The first search result wins. `existing_ou` matches when it equals either
/// the relative path or the full distinguished name (case-insensitive, spacing
/// around commas ignored). No result is an [`OuNotFound`] error.
pub fn lookup_organizational_unit<D: DirectorySearcher + ?Sized>(
    directory: &D,
    desired_ou: &str,
    existing_ou: &str,
) -> Result<OuMembership> {
    let query = DirectoryQuery::organizational_unit(desired_ou);
    let results = directory.search(&query)?;
    debug!(filter = %query.to_ldap_filter(), hits = results.len(), "organizational unit search");

    let entry = results.into_iter().next().ok_or_else(|| OuNotFound {
        ou_name: desired_ou.to_string(),
    })?;

    let relative = relative_path(&entry.distinguished_name);
    let existing = normalize_dn(existing_ou);
    let matches = !existing.is_empty()
        && (existing == normalize_dn(&relative)
            || existing == normalize_dn(&entry.distinguished_name));

    Ok(OuMembership {
        distinguished_name: entry.distinguished_name,
        relative_path: relative,
        matches,
    })
}
