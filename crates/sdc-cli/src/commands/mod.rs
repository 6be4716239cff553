//! Command handler modules for sdc.
//!
//! Shared utilities used by multiple command paths live here.
//! Command-specific logic lives in the submodules.

pub mod compare;
pub mod settings;

use anyhow::{Context, Result};
use serde_json::Value;
use std::fs;

/// Read a YAML or JSON document (JSON is valid YAML) into a JSON value.
pub fn load_document(path: &str) -> Result<Value> {
    let bytes = fs::read(path).with_context(|| format!("read failed: {path}"))?;
    let bytes = bytes.strip_prefix(&[0xEF, 0xBB, 0xBF]).unwrap_or(&bytes);
    let raw = String::from_utf8(bytes.to_vec())
        .with_context(|| format!("{path} must be UTF-8 text"))?;
    let v_yaml: serde_yaml::Value =
        serde_yaml::from_str(&raw).with_context(|| format!("{path} is not valid YAML/JSON"))?;
    serde_json::to_value(v_yaml).with_context(|| format!("{path}: yaml->json conversion failed"))
}

/// Settings paths as `&str`, loaded in merge order.
pub fn load_settings(paths: &[String]) -> Result<sdc_config::LoadedSettings> {
    let path_refs: Vec<&str> = paths.iter().map(|s| s.as_str()).collect();
    sdc_config::load_layered_yaml(&path_refs)
}
