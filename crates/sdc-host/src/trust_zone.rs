use anyhow::{bail, Result};
use sdc_config::TrustZoneSettings;
use tracing::{debug, info};

/// DWORD value marking a zone-map entry as trusted.
pub const TRUSTED_FLAG: u32 = 1;

/// Registry access used for trust-zone entries. Paths are backslash-separated
/// and case-insensitive.
pub trait RegistryHive {
    fn key_exists(&self, path: &str) -> Result<bool>;
    fn create_key(&mut self, path: &str) -> Result<()>;
    /// Remove a key and everything below it.
    fn remove_key(&mut self, path: &str) -> Result<()>;
    fn get_dword(&self, path: &str, name: &str) -> Result<Option<u32>>;
    fn set_dword(&mut self, path: &str, name: &str, value: u32) -> Result<()>;
}

/// Writes performed by [`TrustZone::add`]. Empty on a repeat call.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct TrustZoneChange {
    pub created_keys: Vec<String>,
    pub flags_set: Vec<String>,
}

impl TrustZoneChange {
    pub fn is_noop(&self) -> bool {
        self.created_keys.is_empty() && self.flags_set.is_empty()
    }
}

/// Trusted-server entries under the zone map.
///
/// Each server gets two keys, one under the escalated (enhanced security)
/// subkey and one under the normal subkey, each carrying the trusted flag.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TrustZone {
    settings: TrustZoneSettings,
}

impl TrustZone {
    pub fn new(settings: TrustZoneSettings) -> Self {
        Self { settings }
    }

    pub fn settings(&self) -> &TrustZoneSettings {
        &self.settings
    }

    /// `[escalated, normal]` key paths for `server`.
    pub fn key_paths(&self, server: &str) -> Result<[String; 2]> {
        let server = server.trim();
        if server.is_empty() {
            bail!("server name must not be empty");
        }
        if server.contains('\\') {
            bail!("server name must not contain '\\' (got '{server}')");
        }
        let root = self.settings.root.trim_end_matches('\\');
        Ok([
            format!("{root}\\{}\\{server}", self.settings.escalated_subkey),
            format!("{root}\\{}\\{server}", self.settings.normal_subkey),
        ])
    }

    /// Create both entries for `server` and set the trusted flag where it is
    /// not already set. Safe to repeat.
    pub fn add<H: RegistryHive + ?Sized>(
        &self,
        hive: &mut H,
        server: &str,
    ) -> Result<TrustZoneChange> {
        let mut change = TrustZoneChange::default();
        let value_name = self.settings.value_name.as_str();

        for path in self.key_paths(server)? {
            if !hive.key_exists(&path)? {
                hive.create_key(&path)?;
                info!(key = %path, "created trust-zone key");
                change.created_keys.push(path.clone());
            }
            if hive.get_dword(&path, value_name)? != Some(TRUSTED_FLAG) {
                hive.set_dword(&path, value_name, TRUSTED_FLAG)?;
                info!(key = %path, value = value_name, "set trust-zone flag");
                change.flags_set.push(path);
            }
        }

        if change.is_noop() {
            debug!(server, "trust-zone entries already present");
        }
        Ok(change)
    }

    /// Remove both entries for `server`. Absent keys are not an error.
    /// Returns the keys actually removed.
    pub fn remove<H: RegistryHive + ?Sized>(
        &self,
        hive: &mut H,
        server: &str,
    ) -> Result<Vec<String>> {
        let mut removed = Vec::new();
        for path in self.key_paths(server)? {
            if hive.key_exists(&path)? {
                hive.remove_key(&path)?;
                info!(key = %path, "removed trust-zone key");
                removed.push(path);
            }
        }
        Ok(removed)
    }

    /// `true` when both entries exist and carry the trusted flag.
    pub fn is_trusted<H: RegistryHive + ?Sized>(&self, hive: &H, server: &str) -> Result<bool> {
        let value_name = self.settings.value_name.as_str();
        for path in self.key_paths(server)? {
            if !hive.key_exists(&path)?
                || hive.get_dword(&path, value_name)? != Some(TRUSTED_FLAG)
            {
                return Ok(false);
            }
        }
        Ok(true)
    }
}

impl Default for TrustZone {
    fn default() -> Self {
        Self::new(TrustZoneSettings::default())
    }
}
