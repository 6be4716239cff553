//! Deterministic in-memory backends.
//!
//! - Iteration and search order are stable (sorted maps, insertion-ordered lists).
//! - Registry paths, value names and directory names are case-insensitive,
//!   like the systems they stand in for.
//! - `MemoryEnvironment` and `MemoryRegistry` can be made read-only so callers
//!   can see backend failures propagate.

use std::collections::BTreeMap;

use anyhow::{anyhow, bail, Result};

use crate::{
    DirectoryEntry, DirectoryQuery, DirectorySearcher, EnvScope, EnvironmentStore,
    InstalledSoftware, RegistryHive, UninstallEntry,
};

// ---------------------------------------------------------------------------
// Environment
// ---------------------------------------------------------------------------

#[derive(Clone, Debug, Default)]
pub struct MemoryEnvironment {
    vars: BTreeMap<(EnvScope, String), String>,
    read_only: bool,
}

impl MemoryEnvironment {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_var(mut self, scope: EnvScope, name: &str, value: &str) -> Self {
        self.vars.insert((scope, name.to_string()), value.to_string());
        self
    }

    pub fn set_read_only(&mut self, read_only: bool) {
        self.read_only = read_only;
    }
}

impl EnvironmentStore for MemoryEnvironment {
    fn get(&self, scope: EnvScope, name: &str) -> Result<Option<String>> {
        Ok(self.vars.get(&(scope, name.to_string())).cloned())
    }

    fn set(&mut self, scope: EnvScope, name: &str, value: &str) -> Result<()> {
        if self.read_only {
            bail!("access denied writing {} variable {name}", scope.as_str());
        }
        self.vars.insert((scope, name.to_string()), value.to_string());
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Registry
// ---------------------------------------------------------------------------

fn fold(path: &str) -> String {
    path.trim_end_matches('\\').to_lowercase()
}

#[derive(Clone, Debug, Default)]
pub struct MemoryRegistry {
    /// folded key path -> (folded value name -> DWORD)
    keys: BTreeMap<String, BTreeMap<String, u32>>,
    read_only: bool,
    writes: usize,
}

impl MemoryRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_read_only(&mut self, read_only: bool) {
        self.read_only = read_only;
    }

    /// Number of successful mutating calls so far.
    pub fn writes(&self) -> usize {
        self.writes
    }

    pub fn key_count(&self) -> usize {
        self.keys.len()
    }

    fn check_writable(&self, path: &str) -> Result<()> {
        if self.read_only {
            bail!("access denied: {path}");
        }
        Ok(())
    }
}

impl RegistryHive for MemoryRegistry {
    fn key_exists(&self, path: &str) -> Result<bool> {
        Ok(self.keys.contains_key(&fold(path)))
    }

    fn create_key(&mut self, path: &str) -> Result<()> {
        self.check_writable(path)?;
        self.keys.entry(fold(path)).or_default();
        self.writes += 1;
        Ok(())
    }

    fn remove_key(&mut self, path: &str) -> Result<()> {
        self.check_writable(path)?;
        let key = fold(path);
        let child_prefix = format!("{key}\\");
        self.keys
            .retain(|k, _| k != &key && !k.starts_with(&child_prefix));
        self.writes += 1;
        Ok(())
    }

    fn get_dword(&self, path: &str, name: &str) -> Result<Option<u32>> {
        Ok(self
            .keys
            .get(&fold(path))
            .and_then(|values| values.get(&name.to_lowercase()).copied()))
    }

    fn set_dword(&mut self, path: &str, name: &str, value: u32) -> Result<()> {
        self.check_writable(path)?;
        let values = self
            .keys
            .get_mut(&fold(path))
            .ok_or_else(|| anyhow!("registry key not found: {path}"))?;
        values.insert(name.to_lowercase(), value);
        self.writes += 1;
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Directory
// ---------------------------------------------------------------------------

#[derive(Clone, Debug, PartialEq, Eq)]
struct DirectoryObject {
    object_category: String,
    entry: DirectoryEntry,
}

/// Directory objects in insertion order; search returns matches in that order.
#[derive(Clone, Debug, Default)]
pub struct MemoryDirectory {
    objects: Vec<DirectoryObject>,
}

impl MemoryDirectory {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_object(
        mut self,
        object_category: &str,
        name: &str,
        distinguished_name: &str,
    ) -> Self {
        self.objects.push(DirectoryObject {
            object_category: object_category.to_string(),
            entry: DirectoryEntry {
                distinguished_name: distinguished_name.to_string(),
                name: name.to_string(),
            },
        });
        self
    }

    pub fn with_ou(self, name: &str, distinguished_name: &str) -> Self {
        self.with_object(crate::ORGANIZATIONAL_UNIT_CATEGORY, name, distinguished_name)
    }
}

impl DirectorySearcher for MemoryDirectory {
    fn search(&self, query: &DirectoryQuery) -> Result<Vec<DirectoryEntry>> {
        Ok(self
            .objects
            .iter()
            .filter(|o| o.object_category.eq_ignore_ascii_case(&query.object_category))
            .filter(|o| o.entry.name.eq_ignore_ascii_case(&query.name))
            .map(|o| o.entry.clone())
            .collect())
    }
}

// ---------------------------------------------------------------------------
// Installed software
// ---------------------------------------------------------------------------

#[derive(Clone, Debug, Default)]
pub struct MemorySoftware {
    entries: Vec<UninstallEntry>,
}

impl MemorySoftware {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_entry(mut self, display_name: &str, display_version: Option<&str>) -> Self {
        self.entries
            .push(UninstallEntry::new(display_name, display_version));
        self
    }
}

impl InstalledSoftware for MemorySoftware {
    fn entries(&self) -> Result<Vec<UninstallEntry>> {
        Ok(self.entries.clone())
    }
}
