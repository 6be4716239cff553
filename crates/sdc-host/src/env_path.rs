use anyhow::Result;
use tracing::{debug, info};

/// Environment variable scope.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum EnvScope {
    Machine,
    Process,
}

impl EnvScope {
    pub fn as_str(&self) -> &'static str {
        match self {
            EnvScope::Machine => "machine",
            EnvScope::Process => "process",
        }
    }
}

/// Read/write access to scoped environment variables.
pub trait EnvironmentStore {
    fn get(&self, scope: EnvScope, name: &str) -> Result<Option<String>>;
    fn set(&mut self, scope: EnvScope, name: &str, value: &str) -> Result<()>;
}

/// Comparison form of a path entry: case-insensitive, trailing `\` ignored.
fn entry_key(entry: &str) -> String {
    entry.trim().trim_end_matches('\\').to_lowercase()
}

fn split_entries(value: &str) -> impl Iterator<Item = &str> {
    value.split(';').map(str::trim).filter(|s| !s.is_empty())
}

/// Append machine-scoped search-path entries missing from the process scope.
///
/// Entries already present are skipped; nothing is ever removed. The process
/// variable is written only when at least one entry is appended. Returns the
/// appended entries in machine order.
pub fn merge_search_path<S: EnvironmentStore + ?Sized>(
    store: &mut S,
    variable: &str,
) -> Result<Vec<String>> {
    let machine = store.get(EnvScope::Machine, variable)?.unwrap_or_default();
    let process = store.get(EnvScope::Process, variable)?.unwrap_or_default();

    let mut present: Vec<String> = split_entries(&process).map(entry_key).collect();
    let mut appended: Vec<String> = Vec::new();
    for entry in split_entries(&machine) {
        let key = entry_key(entry);
        if present.contains(&key) {
            continue;
        }
        present.push(key);
        appended.push(entry.to_string());
    }

    if appended.is_empty() {
        debug!(variable, "search path already contains every machine entry");
        return Ok(appended);
    }

    let base = process.trim_end_matches(';');
    let merged = if base.trim().is_empty() {
        appended.join(";")
    } else {
        format!("{base};{}", appended.join(";"))
    };
    store.set(EnvScope::Process, variable, &merged)?;
    info!(variable, appended = ?appended, "merged machine search path into process scope");

    Ok(appended)
}
