//! sdc-config
//!
//! Layered YAML settings for the collaborators and the `sdc` binary.
//!
//! - Documents merge in order: earlier docs are base, later docs override
//!   (mappings merge key by key, everything else is replaced).
//! - The merged document is canonicalised to JSON and hashed (SHA-256) so a
//!   run can record exactly which settings it used.
//! - An unknown-key guard flags leaves that no code reads (typo protection).
//! - [`Settings`] is the typed view with defaults for every field.

use anyhow::{bail, Context, Result};
use serde_json::Value;
use sha2::{Digest, Sha256};
use std::collections::BTreeSet;
use std::fs;

mod settings;

pub use settings::{
    ProductSettings, SearchPathSettings, Settings, TrustZoneSettings,
    DEFAULT_PRODUCT_DISPLAY_NAMES,
};

/// JSON-pointer prefixes read by code. A leaf under any of these is known.
///
/// Keep in sync with the fields of [`Settings`].
pub const KNOWN_POINTERS: &[&str] = &[
    "/trust_zone/root",
    "/trust_zone/escalated_subkey",
    "/trust_zone/normal_subkey",
    "/trust_zone/value_name",
    "/search_path/variable",
    "/product/display_names",
];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UnknownKeyPolicy {
    Warn,
    Fail,
}

#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
pub struct UnknownKeyReport {
    /// Minimal set of unknown leaf pointers (sorted)
    pub unknown_leaf_pointers: Vec<String>,
}

impl UnknownKeyReport {
    pub fn is_clean(&self) -> bool {
        self.unknown_leaf_pointers.is_empty()
    }
}

/// Produce an unknown-key report for a merged settings document.
/// If `policy == Fail`, returns an error when unknown keys exist.
pub fn report_unknown_keys(
    config_json: &Value,
    policy: UnknownKeyPolicy,
) -> Result<UnknownKeyReport> {
    let known: BTreeSet<String> = KNOWN_POINTERS.iter().map(|p| normalize_pointer(p)).collect();

    let mut leaves: Vec<String> = Vec::new();
    collect_leaf_pointers(config_json, "", &mut leaves);

    let mut unknown: Vec<String> = leaves
        .into_iter()
        .filter(|lp| !known.iter().any(|kp| is_prefix_pointer(kp, lp)))
        .collect();
    unknown.sort();
    unknown.dedup();

    let report = UnknownKeyReport {
        unknown_leaf_pointers: unknown,
    };

    if policy == UnknownKeyPolicy::Fail && !report.is_clean() {
        bail!(
            "SETTINGS_UNKNOWN_KEYS: {} unknown settings leaf key(s) detected. First few: {}",
            report.unknown_leaf_pointers.len(),
            preview_list(&report.unknown_leaf_pointers, 12)
        );
    }

    Ok(report)
}

/// Normalize JSON pointer:
/// - must begin with "/"
/// - no trailing "/" unless it's just "/"
fn normalize_pointer(p: &str) -> String {
    let mut s = p.trim().to_string();
    if s.is_empty() {
        return "/".to_string();
    }
    if !s.starts_with('/') {
        s.insert(0, '/');
    }
    while s.ends_with('/') && s.len() > 1 {
        s.pop();
    }
    s
}

/// Return true if `prefix` is a JSON-pointer prefix of `leaf`.
/// "/a/b" covers "/a/b" and "/a/b/0" but not "/a/bc".
fn is_prefix_pointer(prefix: &str, leaf: &str) -> bool {
    if prefix == "/" || leaf == prefix {
        return true;
    }
    leaf.strip_prefix(prefix)
        .map(|rest| rest.starts_with('/'))
        .unwrap_or(false)
}

fn collect_leaf_pointers(v: &Value, prefix: &str, out: &mut Vec<String>) {
    match v {
        Value::Object(map) if !map.is_empty() => {
            for (k, vv) in map.iter() {
                let next = format!("{}/{}", prefix, escape_pointer_token(k));
                collect_leaf_pointers(vv, &next, out);
            }
        }
        Value::Array(arr) if !arr.is_empty() => {
            for (i, vv) in arr.iter().enumerate() {
                collect_leaf_pointers(vv, &format!("{}/{}", prefix, i), out);
            }
        }
        _ => {
            if prefix.is_empty() {
                // Empty root document has no leaves worth reporting.
                if !matches!(v, Value::Object(_) | Value::Null) {
                    out.push("/".to_string());
                }
            } else {
                out.push(prefix.to_string());
            }
        }
    }
}

fn escape_pointer_token(s: &str) -> String {
    s.replace('~', "~0").replace('/', "~1")
}

fn preview_list(items: &[String], n: usize) -> String {
    let take = items.iter().take(n).cloned().collect::<Vec<_>>();
    format!("{:?}", take)
}

#[derive(Debug, Clone)]
pub struct LoadedSettings {
    pub settings_hash: String,
    pub canonical_json: String,
    pub settings_json: Value,
}

impl LoadedSettings {
    /// Typed view of the merged document.
    pub fn settings(&self) -> Result<Settings> {
        Settings::from_json(&self.settings_json)
    }
}

pub fn load_layered_yaml(paths: &[&str]) -> Result<LoadedSettings> {
    let mut docs: Vec<String> = Vec::new();
    for p in paths {
        let raw =
            fs::read_to_string(p).with_context(|| format!("failed to read yaml path: {p}"))?;
        docs.push(raw);
    }

    let doc_refs: Vec<&str> = docs.iter().map(|s| s.as_str()).collect();
    load_layered_yaml_from_strings(&doc_refs)
}

pub fn load_layered_yaml_from_strings(yaml_docs: &[&str]) -> Result<LoadedSettings> {
    let mut merged = serde_json::json!({});
    for raw in yaml_docs {
        let v_yaml: serde_yaml::Value = serde_yaml::from_str(raw).context("invalid yaml")?;
        let v_json = serde_json::to_value(v_yaml).context("yaml->json conversion failed")?;
        // An empty document parses as null; it contributes nothing.
        if v_json.is_null() {
            continue;
        }
        if !v_json.is_object() {
            bail!("settings document must be a mapping at the top level");
        }
        merged = deep_merge(merged, v_json);
    }

    let canonical_json = canonicalize_json(&merged)?;
    let settings_hash = sha256_hex(canonical_json.as_bytes());
    Ok(LoadedSettings {
        settings_hash,
        canonical_json,
        settings_json: merged,
    })
}

fn deep_merge(a: Value, b: Value) -> Value {
    match (a, b) {
        (Value::Object(mut a_map), Value::Object(b_map)) => {
            for (k, b_val) in b_map {
                let a_val = a_map.remove(&k).unwrap_or(Value::Null);
                a_map.insert(k, deep_merge(a_val, b_val));
            }
            Value::Object(a_map)
        }
        (_, b_other) => b_other,
    }
}

/// serde_json's default `Map` is key-sorted, so this is stable regardless of
/// key order in the YAML input.
fn canonicalize_json(v: &Value) -> Result<String> {
    serde_json::to_string(v).context("canonical json serialize failed")
}

fn sha256_hex(bytes: &[u8]) -> String {
    let mut hasher = Sha256::new();
    hasher.update(bytes);
    hex::encode(hasher.finalize())
}
