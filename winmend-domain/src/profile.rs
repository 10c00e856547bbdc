//! OS identity profiling and product-name normalization.
//!
//! The raw `ProductName` value lags behind reality: Windows 11 still reports
//! "Windows 10 ..." and Server releases often carry a stale year. The label is
//! rewritten from the build number using the tables below.

use crate::ports::IdentitySource;
use thiserror::Error;
use tracing::debug;
use winmend_types::OsDescriptor;

/// Bumped whenever a threshold or label in this module changes.
pub const PROFILE_RULES_VERSION: u32 = 1;

/// First build number that ships as Windows 11.
pub const WINDOWS_11_MIN_BUILD: u32 = 22000;

/// Names of the raw identity fields under `HKLM\SOFTWARE\Microsoft\Windows NT\CurrentVersion`.
pub mod identity_fields {
    pub const PRODUCT_NAME: &str = "ProductName";
    pub const EDITION_ID: &str = "EditionID";
    pub const BUILD_NUMBER: &str = "CurrentBuildNumber";
    pub const UPDATE_BUILD_REVISION: &str = "UBR";
}

#[derive(Debug, Error)]
pub enum ProfileError {
    /// A required identity field could not be read or parsed.
    #[error("identity source unavailable: {field}: {message}")]
    IdentitySourceUnavailable {
        field: &'static str,
        message: String,
    },
}

/// One server release threshold.
#[derive(Debug, Clone, Copy)]
pub struct ServerLabel {
    pub min_build: u32,
    pub label: &'static str,
}

/// Server release thresholds, highest first. The first entry whose
/// `min_build` is reached wins.
pub static SERVER_LABELS: &[ServerLabel] = &[
    ServerLabel {
        min_build: 26100,
        label: "Windows Server 2025",
    },
    ServerLabel {
        min_build: 20348,
        label: "Windows Server 2022",
    },
    ServerLabel {
        min_build: 17763,
        label: "Windows Server 2019",
    },
    ServerLabel {
        min_build: 14393,
        label: "Windows Server 2016",
    },
];

/// Normalize a raw product name against the build number.
pub fn normalize_product_name(raw: &str, build_number: u32) -> String {
    if raw.contains("Server") {
        return SERVER_LABELS
            .iter()
            .find(|s| build_number >= s.min_build)
            .map(|s| s.label.to_string())
            .unwrap_or_else(|| raw.to_string());
    }

    if build_number >= WINDOWS_11_MIN_BUILD && raw.contains("Windows 10") {
        return raw.replacen("Windows 10", "Windows 11", 1);
    }

    raw.to_string()
}

/// Read the raw identity fields and build the canonical descriptor.
///
/// Any unreadable or unparsable field is fatal: no descriptor is produced.
pub fn profile_os(source: &dyn IdentitySource) -> Result<OsDescriptor, ProfileError> {
    let raw_name = read_field(source, identity_fields::PRODUCT_NAME)?;
    let edition = read_field(source, identity_fields::EDITION_ID)?;
    let build = read_number(source, identity_fields::BUILD_NUMBER)?;
    let ubr = read_number(source, identity_fields::UPDATE_BUILD_REVISION)?;

    let product_name = normalize_product_name(&raw_name, build);
    if product_name != raw_name {
        debug!(raw = %raw_name, normalized = %product_name, build, "normalized product name");
    }

    Ok(OsDescriptor::new(product_name, edition, build, ubr))
}

fn read_field(source: &dyn IdentitySource, field: &'static str) -> Result<String, ProfileError> {
    let value = source
        .read_value(field)
        .map_err(|e| ProfileError::IdentitySourceUnavailable {
            field,
            message: format!("{e:#}"),
        })?;
    let value = value.trim();
    if value.is_empty() {
        return Err(ProfileError::IdentitySourceUnavailable {
            field,
            message: "value is empty".to_string(),
        });
    }
    Ok(value.to_string())
}

fn read_number(source: &dyn IdentitySource, field: &'static str) -> Result<u32, ProfileError> {
    let raw = read_field(source, field)?;
    parse_registry_number(&raw).ok_or_else(|| ProfileError::IdentitySourceUnavailable {
        field,
        message: format!("not a number: '{}'", raw),
    })
}

/// REG_DWORD values come back as `0x...`; REG_SZ build numbers as decimal.
fn parse_registry_number(raw: &str) -> Option<u32> {
    match raw
        .strip_prefix("0x")
        .or_else(|| raw.strip_prefix("0X"))
    {
        Some(hex) => u32::from_str_radix(hex, 16).ok(),
        None => raw.parse().ok(),
    }
}
