use std::fmt;
use std::str::FromStr;

use anyhow::{Context, Result};
use serde::Serialize;
use thiserror::Error;
use tracing::debug;

/// One installed-software registration.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct UninstallEntry {
    pub display_name: String,
    pub display_version: Option<String>,
}

impl UninstallEntry {
    pub fn new(display_name: impl Into<String>, display_version: Option<&str>) -> Self {
        Self {
            display_name: display_name.into(),
            display_version: display_version.map(str::to_string),
        }
    }
}

pub trait InstalledSoftware {
    fn entries(&self) -> Result<Vec<UninstallEntry>>;
}

/// Four-part product version (`major.minor.build.revision`).
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub struct ProductVersion {
    pub major: u32,
    pub minor: u32,
    pub build: u32,
    pub revision: u32,
}

impl ProductVersion {
    pub fn new(major: u32, minor: u32, build: u32, revision: u32) -> Self {
        Self {
            major,
            minor,
            build,
            revision,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum VersionParseError {
    #[error("version string is empty")]
    Empty,
    #[error("version '{raw}' has more than four parts")]
    TooManyParts { raw: String },
    #[error("version '{raw}' has a non-numeric part '{part}'")]
    InvalidPart { raw: String, part: String },
}

impl FromStr for ProductVersion {
    type Err = VersionParseError;

    /// Accepts one to four dot-separated numeric parts; missing parts are 0.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let raw = s.trim();
        if raw.is_empty() {
            return Err(VersionParseError::Empty);
        }

        let mut parts = [0u32; 4];
        for (i, part) in raw.split('.').enumerate() {
            if i >= parts.len() {
                return Err(VersionParseError::TooManyParts {
                    raw: raw.to_string(),
                });
            }
            parts[i] = part.parse().map_err(|_| VersionParseError::InvalidPart {
                raw: raw.to_string(),
                part: part.to_string(),
            })?;
        }

        Ok(Self::new(parts[0], parts[1], parts[2], parts[3]))
    }
}

impl fmt::Display for ProductVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}.{}.{}.{}",
            self.major, self.minor, self.build, self.revision
        )
    }
}

/// Version of the first installed entry whose display name is recognised.
///
/// Names compare case-insensitively. `None` when nothing matches. A matching
/// entry without a parseable version is an error.
pub fn installed_product_version<S: InstalledSoftware + ?Sized>(
    software: &S,
    recognized_names: &[String],
) -> Result<Option<ProductVersion>> {
    let entries = software.entries()?;
    let Some(entry) = entries.into_iter().find(|e| {
        recognized_names
            .iter()
            .any(|n| n.trim().eq_ignore_ascii_case(e.display_name.trim()))
    }) else {
        debug!(recognized = ?recognized_names, "no recognised product installed");
        return Ok(None);
    };

    let raw = entry
        .display_version
        .as_deref()
        .with_context(|| format!("'{}' has no display version", entry.display_name))?;
    let version = raw
        .parse::<ProductVersion>()
        .with_context(|| format!("'{}' has an unreadable version", entry.display_name))?;
    debug!(product = %entry.display_name, %version, "found installed product");

    Ok(Some(version))
}
