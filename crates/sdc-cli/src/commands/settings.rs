use anyhow::Result;
use sdc_config::{report_unknown_keys, UnknownKeyPolicy, UnknownKeyReport};
use sdc_host::TrustZone;
use tracing::warn;

use super::load_settings;

pub fn run_settings_check(paths: &[String], strict: bool) -> Result<UnknownKeyReport> {
    let loaded = load_settings(paths)?;
    // Typed view must load too; unknown keys alone don't make it invalid.
    loaded.settings()?;

    let policy = if strict {
        UnknownKeyPolicy::Fail
    } else {
        UnknownKeyPolicy::Warn
    };
    let report = report_unknown_keys(&loaded.settings_json, policy)?;
    for p in &report.unknown_leaf_pointers {
        warn!(pointer = %p, "unknown settings key");
    }
    Ok(report)
}

/// Registry keys that mark `server` as trusted under the given settings.
pub fn trust_zone_keys(paths: &[String], server: &str) -> Result<[String; 2]> {
    let settings = load_settings(paths)?.settings()?;
    TrustZone::new(settings.trust_zone).key_paths(server)
}
