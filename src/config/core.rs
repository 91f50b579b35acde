use super::ProbitasConfig;
use figment::{
    Figment, Profile, Provider,
    providers::{Env, Format, Json, Serialized},
    value::Dict,
};
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Config file looked up in the working directory
pub const CONFIG_FILE: &str = "probitas.json";

/// Prefix for environment overrides (`PROBITAS_TIMEOUT=1m`)
pub const ENV_PREFIX: &str = "PROBITAS_";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Config file not found: {}", path.display())]
    NotFound { path: PathBuf },

    #[error("Invalid configuration: {0}")]
    Invalid(#[from] Box<figment::Error>),
}

impl ProbitasConfig {
    /// Load configuration for a command running in `cwd`
    ///
    /// An explicit `custom` file must exist; the default `probitas.json` is optional.
    pub fn load(cwd: &Path, custom: Option<&Path>) -> Result<Self, ConfigError> {
        Self::load_with_prefix(cwd, custom, ENV_PREFIX)
    }

    pub(crate) fn load_with_prefix(
        cwd: &Path,
        custom: Option<&Path>,
        prefix: &str,
    ) -> Result<Self, ConfigError> {
        let figment = Self::figment(cwd, custom)?.merge(env_provider(prefix));
        Self::extract(&figment)
    }

    /// Defaults plus the config file, without environment overrides
    pub(crate) fn figment(cwd: &Path, custom: Option<&Path>) -> Result<Figment, ConfigError> {
        let path = match custom {
            Some(custom) => {
                let path = cwd.join(custom);
                if !path.is_file() {
                    return Err(ConfigError::NotFound { path });
                }
                path
            }
            None => cwd.join(CONFIG_FILE),
        };

        tracing::trace!(path = %path.display(), "CONFIG LOAD: Reading config file");
        let mut data = Json::file(&path).data().map_err(Box::new)?;
        let file: Dict = data
            .remove(&Profile::Default)
            .unwrap_or_default()
            .into_iter()
            .map(|(key, value)| (camel_case(&key), value))
            .collect();

        Ok(Figment::new().merge(Serialized::defaults(file)))
    }

    pub(crate) fn extract(figment: &Figment) -> Result<Self, ConfigError> {
        let config: Self = figment.extract().map_err(Box::new)?;
        tracing::trace!(?config, "CONFIG LOAD: Final configuration");
        Ok(config)
    }
}

/// `PROBITAS_MAX_CONCURRENCY` arrives as `max_concurrency`; rename it to the file's key
fn env_provider(prefix: &str) -> Env {
    Env::prefixed(prefix).map(|key| camel_case(key.as_str()).into())
}

/// `max_failures` -> `maxFailures`; keys without underscores pass through
pub(crate) fn camel_case(key: &str) -> String {
    let mut out = String::with_capacity(key.len());
    let mut upper = false;
    for ch in key.chars() {
        if ch == '_' {
            upper = !out.is_empty();
        } else if upper {
            out.extend(ch.to_uppercase());
            upper = false;
        } else {
            out.push(ch);
        }
    }
    out
}
