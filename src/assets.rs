//! Embedded resources
//!
//! Help text, `init` templates and the metadata files are compiled into the
//! binary with `include_str!`, so lookups behave the same from a source checkout
//! and from an installed executable. Paths are logical, `/`-separated and
//! relative to the crate root; assets live under `assets/`.

use std::borrow::Cow;
use thiserror::Error;

/// Manifest carrying the tool's own version
pub const MANIFEST_PATH: &str = "manifest.json";
/// Lock data with the resolved `@probitas/*` package versions
pub const LOCK_PATH: &str = "manifest.lock";

const ASSETS_ROOT: &str = "assets";

static EMBEDDED: &[(&str, &str)] = &[
    (MANIFEST_PATH, include_str!("../manifest.json")),
    (LOCK_PATH, include_str!("../manifest.lock")),
    ("assets/usage.txt", include_str!("../assets/usage.txt")),
    (
        "assets/templates/probitas.json",
        include_str!("../assets/templates/probitas.json"),
    ),
    (
        "assets/templates/example.probitas.ts",
        include_str!("../assets/templates/example.probitas.ts"),
    ),
];

#[derive(Debug, Error)]
pub enum AssetError {
    #[error("Resource not found: {path}")]
    NotFound { path: String },
}

/// Source of text resources addressed by logical path
pub trait ResourceLoader {
    /// Load a resource relative to the crate root
    fn load(&self, path: &str) -> Result<Cow<'static, str>, AssetError>;

    /// Load a resource relative to `assets/` (e.g. `usage.txt`, `templates/probitas.json`)
    fn read_asset(&self, path: &str) -> Result<Cow<'static, str>, AssetError> {
        let path = path.trim_start_matches('/');
        self.load(&format!("{ASSETS_ROOT}/{path}"))
    }
}

/// Resources compiled into the binary
#[derive(Debug, Clone, Copy, Default)]
pub struct Embedded;

impl ResourceLoader for Embedded {
    fn load(&self, path: &str) -> Result<Cow<'static, str>, AssetError> {
        EMBEDDED
            .iter()
            .find(|(name, _)| *name == path)
            .map(|(_, content)| Cow::Borrowed(*content))
            .ok_or_else(|| AssetError::NotFound {
                path: path.to_string(),
            })
    }
}

/// Read an embedded asset relative to `assets/`
pub fn read_asset(path: &str) -> Result<Cow<'static, str>, AssetError> {
    Embedded.read_asset(path)
}


#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_usage_is_embedded() {
        let usage = read_asset("usage.txt").unwrap();
        assert!(usage.contains("Usage: probitas"));
    }

    #[test]
    fn test_templates_are_embedded() {
        assert!(read_asset("templates/probitas.json").is_ok());
        assert!(read_asset("/templates/example.probitas.ts").is_ok());
    }

    #[test]
    fn test_metadata_files_are_embedded() {
        assert!(Embedded.load(MANIFEST_PATH).is_ok());
        assert!(Embedded.load(LOCK_PATH).is_ok());
    }

    #[test]
    fn test_missing_asset_names_path() {
        let err = read_asset("missing.txt").unwrap_err();
        assert_eq!(err.to_string(), "Resource not found: assets/missing.txt");
    }
}
