use anyhow::{bail, Context, Result};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Registry location of the per-user zone map.
pub const DEFAULT_ZONE_MAP_ROOT: &str =
    r"HKCU:\Software\Microsoft\Windows\CurrentVersion\Internet Settings\ZoneMap";

/// Typed settings. Every section and field is optional in YAML.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub trust_zone: TrustZoneSettings,
    pub search_path: SearchPathSettings,
    pub product: ProductSettings,
}

/// Where trusted-server entries live.
///
/// A server is trusted when both `{root}\{escalated_subkey}\{server}` and
/// `{root}\{normal_subkey}\{server}` exist with DWORD `{value_name}` = 1.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TrustZoneSettings {
    pub root: String,
    pub escalated_subkey: String,
    pub normal_subkey: String,
    pub value_name: String,
}

impl Default for TrustZoneSettings {
    fn default() -> Self {
        Self {
            root: DEFAULT_ZONE_MAP_ROOT.to_string(),
            escalated_subkey: "EscDomains".to_string(),
            normal_subkey: "Domains".to_string(),
            value_name: "file".to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SearchPathSettings {
    /// Environment variable holding the semicolon-delimited module search path.
    pub variable: String,
}

impl Default for SearchPathSettings {
    fn default() -> Self {
        Self {
            variable: "PSModulePath".to_string(),
        }
    }
}

/// Display names the managed product registers under, across releases.
pub const DEFAULT_PRODUCT_DISPLAY_NAMES: [&str; 2] = [
    "Microsoft Office Web Apps Server 2013",
    "Microsoft Office Online Server",
];

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProductSettings {
    /// Installed-software display names recognised as the managed product.
    pub display_names: Vec<String>,
}

impl Default for ProductSettings {
    fn default() -> Self {
        Self {
            display_names: DEFAULT_PRODUCT_DISPLAY_NAMES
                .iter()
                .map(|n| n.to_string())
                .collect(),
        }
    }
}

impl Settings {
    /// Deserialize and validate a merged settings document.
    pub fn from_json(v: &Value) -> Result<Self> {
        let s: Settings =
            serde_json::from_value(v.clone()).context("settings do not match the expected shape")?;
        s.validate()?;
        Ok(s)
    }

    pub fn validate(&self) -> Result<()> {
        let tz = &self.trust_zone;
        for (name, value) in [
            ("trust_zone.root", &tz.root),
            ("trust_zone.escalated_subkey", &tz.escalated_subkey),
            ("trust_zone.normal_subkey", &tz.normal_subkey),
            ("trust_zone.value_name", &tz.value_name),
            ("search_path.variable", &self.search_path.variable),
        ] {
            if value.trim().is_empty() {
                bail!("{name} must not be empty");
            }
        }
        if tz.escalated_subkey.eq_ignore_ascii_case(&tz.normal_subkey) {
            bail!("trust_zone.escalated_subkey and trust_zone.normal_subkey must differ");
        }
        if self.product.display_names.iter().any(|n| n.trim().is_empty()) {
            bail!("product.display_names must not contain empty names");
        }
        Ok(())
    }
}
