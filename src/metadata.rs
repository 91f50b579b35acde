//! Version metadata from the embedded manifest and lock data
//!
//! The manifest gives the tool's own version. The lock data maps dependency
//! specifiers (`jsr:@probitas/core@^0.2.0`) to resolved versions; every
//! `@probitas/*` entry becomes a line of `probitas --version`.
//!
//! Resolution failures are expected (a stripped binary, a hand-edited lock) and
//! are never fatal: the `try_*` functions return the cause, the plain ones log
//! it at debug level and return `None`.

use crate::assets::{AssetError, Embedded, LOCK_PATH, MANIFEST_PATH, ResourceLoader};
use regex::Regex;
use serde_json::{Map, Value};
use std::cmp::Ordering;
use std::collections::HashSet;
use std::sync::LazyLock;
use thiserror::Error;

static PROBITAS_SPECIFIER: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^jsr:(@probitas/[^@]+)@").expect("specifier pattern is valid")
});

/// Shown when the manifest has no `version` field
pub const UNKNOWN_VERSION: &str = "unknown";

#[derive(Debug, Error)]
pub enum MetadataError {
    #[error(transparent)]
    Resource(#[from] AssetError),

    #[error("{path} is not valid JSON: {source}")]
    Parse {
        path: &'static str,
        source: serde_json::Error,
    },

    #[error("{path} does not match the expected shape: {reason}")]
    Schema { path: &'static str, reason: String },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PackageVersion {
    pub name: String,
    pub version: String,
}

/// CLI version plus the `@probitas/*` packages it was built against
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VersionInfo {
    pub version: String,
    /// Sorted by name, names unique
    pub packages: Vec<PackageVersion>,
}

impl VersionInfo {
    /// Build from raw manifest and lock contents
    pub fn from_sources(manifest: &str, lock: &str) -> Result<Self, MetadataError> {
        let version = manifest_version(manifest)?.unwrap_or_else(|| UNKNOWN_VERSION.to_string());
        let packages = probitas_packages(lock)?;
        Ok(Self { version, packages })
    }
}

/// The tool's own version, or `None` if the manifest is unusable or has no version
pub fn resolve_version() -> Option<String> {
    resolve_version_with(&Embedded)
}

pub fn resolve_version_with(loader: &impl ResourceLoader) -> Option<String> {
    match try_resolve_version(loader) {
        Ok(version) => version,
        Err(err) => {
            tracing::debug!(error = %err, "Failed to read version from manifest");
            None
        }
    }
}

pub fn try_resolve_version(loader: &impl ResourceLoader) -> Result<Option<String>, MetadataError> {
    let manifest = loader.load(MANIFEST_PATH)?;
    manifest_version(&manifest)
}

/// Version information for `--version`, or `None` if either file is unusable
pub fn resolve_version_info() -> Option<VersionInfo> {
    resolve_version_info_with(&Embedded)
}

pub fn resolve_version_info_with(loader: &impl ResourceLoader) -> Option<VersionInfo> {
    match try_resolve_version_info(loader) {
        Ok(info) => Some(info),
        Err(err) => {
            tracing::debug!(error = %err, "Failed to read version info");
            None
        }
    }
}

pub fn try_resolve_version_info(loader: &impl ResourceLoader) -> Result<VersionInfo, MetadataError> {
    let manifest = loader.load(MANIFEST_PATH)?;
    let lock = loader.load(LOCK_PATH)?;
    VersionInfo::from_sources(&manifest, &lock)
}

fn parse_object(path: &'static str, content: &str) -> Result<Map<String, Value>, MetadataError> {
    match serde_json::from_str(content) {
        Ok(Value::Object(object)) => Ok(object),
        Ok(_) => Err(MetadataError::Schema {
            path,
            reason: "expected a JSON object".to_string(),
        }),
        Err(source) => Err(MetadataError::Parse { path, source }),
    }
}

fn manifest_version(content: &str) -> Result<Option<String>, MetadataError> {
    let manifest = parse_object(MANIFEST_PATH, content)?;
    match manifest.get("version") {
        None => Ok(None),
        Some(Value::String(version)) => Ok(Some(version.clone())),
        Some(_) => Err(MetadataError::Schema {
            path: MANIFEST_PATH,
            reason: "`version` must be a string".to_string(),
        }),
    }
}

fn probitas_packages(content: &str) -> Result<Vec<PackageVersion>, MetadataError> {
    let lock = parse_object(LOCK_PATH, content)?;
    let specifiers = match lock.get("specifiers") {
        None => return Ok(Vec::new()),
        Some(Value::Object(specifiers)) => specifiers,
        Some(_) => {
            return Err(MetadataError::Schema {
                path: LOCK_PATH,
                reason: "`specifiers` must be an object".to_string(),
            });
        }
    };

    let mut packages = Vec::new();
    let mut seen = HashSet::new();

    // Map iteration follows document order, so the first specifier for a package wins
    for (specifier, resolved) in specifiers {
        let Value::String(resolved) = resolved else {
            return Err(MetadataError::Schema {
                path: LOCK_PATH,
                reason: format!("specifier `{specifier}` must map to a string"),
            });
        };

        let Some(captures) = PROBITAS_SPECIFIER.captures(specifier) else {
            continue;
        };
        let name = &captures[1];
        if seen.insert(name.to_string()) {
            packages.push(PackageVersion {
                name: name.to_string(),
                version: resolved.clone(),
            });
        }
    }

    packages.sort_by(|a, b| locale_compare(&a.name, &b.name));
    Ok(packages)
}

/// Case-insensitive first; names differing only in case put lowercase first
fn locale_compare(a: &str, b: &str) -> Ordering {
    a.to_lowercase()
        .cmp(&b.to_lowercase())
        .then_with(|| b.cmp(a))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::assets::testing::InMemory;

    const MANIFEST: &str = r#"{"version":"1.0.0"}"#;
    const LOCK: &str = r#"{
        "specifiers": {
            "jsr:@probitas/core@^0.2.0": "0.2.0",
            "jsr:@probitas/core@^0.1.0": "0.1.5",
            "jsr:@probitas/runner@^1.0.0": "1.0.0",
            "npm:left-pad@^1.0.0": "1.3.0"
        }
    }"#;

    fn package(name: &str, version: &str) -> PackageVersion {
        PackageVersion {
            name: name.to_string(),
            version: version.to_string(),
        }
    }

    #[test]
    fn test_first_seen_wins_and_sorted() {
        let info = VersionInfo::from_sources(MANIFEST, LOCK).unwrap();
        assert_eq!(
            info,
            VersionInfo {
                version: "1.0.0".to_string(),
                packages: vec![
                    package("@probitas/core", "0.2.0"),
                    package("@probitas/runner", "1.0.0"),
                ],
            }
        );
    }

    #[test]
    fn test_document_order_not_key_order() {
        // Lexically "^0.1.0" < "^0.2.0", but the earlier entry in the file still wins
        let lock = r#"{"specifiers": {
            "jsr:@probitas/core@^0.2.0": "0.2.0",
            "jsr:@probitas/core@^0.1.0": "0.1.5"
        }}"#;
        let info = VersionInfo::from_sources(MANIFEST, lock).unwrap();
        assert_eq!(info.packages, vec![package("@probitas/core", "0.2.0")]);
    }

    #[test]
    fn test_output_is_name_sorted() {
        let lock = r#"{"specifiers": {
            "jsr:@probitas/runner@^1.0.0": "1.0.0",
            "jsr:@probitas/builder@^0.4.0": "0.4.1",
            "jsr:@probitas/Client@^0.1.0": "0.1.0"
        }}"#;
        let info = VersionInfo::from_sources(MANIFEST, lock).unwrap();
        let names: Vec<_> = info.packages.iter().map(|p| p.name.as_str()).collect();
        assert_eq!(
            names,
            ["@probitas/builder", "@probitas/Client", "@probitas/runner"]
        );
    }

    #[test]
    fn test_case_only_difference_puts_lowercase_first() {
        assert_eq!(locale_compare("@probitas/core", "@probitas/Core"), Ordering::Less);
        assert_eq!(locale_compare("@probitas/Core", "@probitas/core"), Ordering::Greater);
        assert_eq!(locale_compare("@probitas/Core", "@probitas/client"), Ordering::Greater);
        assert_eq!(locale_compare("@probitas/core", "@probitas/core"), Ordering::Equal);
    }

    #[test]
    fn test_missing_fields_are_optional() {
        let info = VersionInfo::from_sources("{}", "{}").unwrap();
        assert_eq!(info.version, UNKNOWN_VERSION);
        assert!(info.packages.is_empty());
    }

    #[test]
    fn test_schema_mismatches() {
        assert!(matches!(
            VersionInfo::from_sources(r#"{"version": 1}"#, "{}"),
            Err(MetadataError::Schema { .. })
        ));
        assert!(matches!(
            VersionInfo::from_sources("[]", "{}"),
            Err(MetadataError::Schema { .. })
        ));
        assert!(matches!(
            VersionInfo::from_sources(MANIFEST, r#"{"specifiers": []}"#),
            Err(MetadataError::Schema { .. })
        ));
        assert!(matches!(
            VersionInfo::from_sources(MANIFEST, r#"{"specifiers": {"npm:x@1": 1}}"#),
            Err(MetadataError::Schema { .. })
        ));
        assert!(matches!(
            VersionInfo::from_sources("{", "{}"),
            Err(MetadataError::Parse { .. })
        ));
    }

    #[test]
    fn test_resolution_failures_become_none() {
        let missing_lock = InMemory::default().with(MANIFEST_PATH, MANIFEST);
        assert_eq!(resolve_version_info_with(&missing_lock), None);
        // The manifest is read independently of the lock
        assert_eq!(resolve_version_with(&missing_lock), Some("1.0.0".to_string()));

        let broken = InMemory::default()
            .with(MANIFEST_PATH, "not json")
            .with(LOCK_PATH, LOCK);
        assert_eq!(resolve_version_info_with(&broken), None);
        assert_eq!(resolve_version_with(&broken), None);
    }

    #[test]
    fn test_resolve_with_loader() {
        let loader = InMemory::default()
            .with(MANIFEST_PATH, MANIFEST)
            .with(LOCK_PATH, LOCK);
        let info = resolve_version_info_with(&loader).unwrap();
        assert_eq!(info.version, "1.0.0");
        assert_eq!(info.packages.len(), 2);
    }

    #[test]
    fn test_embedded_manifest_matches_crate_version() {
        assert_eq!(resolve_version().as_deref(), Some(env!("CARGO_PKG_VERSION")));

        let info = resolve_version_info().unwrap();
        assert!(!info.packages.is_empty());
        assert!(info.packages.iter().all(|p| p.name.starts_with("@probitas/")));
    }
}
