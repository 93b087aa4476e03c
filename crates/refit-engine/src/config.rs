//! Engine configuration.
//!
//! Sources, lowest priority first:
//! 1. built-in defaults
//! 2. `refit.toml` in the working directory, or an explicit file (`.toml` or `.json`)
//! 3. `REFIT_`-prefixed environment variables (`REFIT_TARGET_VERSION=1.7`)

use std::path::{Path, PathBuf};

use bon::Builder;
use figment::{
    Figment,
    providers::{Env, Format as _, Json, Serialized, Toml},
};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::version::LanguageVersion;

/// Default configuration file name.
pub const CONFIG_FILE: &str = "refit.toml";

const ENV_PREFIX: &str = "REFIT_";
const TARGET_VERSION_VAR: &str = "REFIT_TARGET_VERSION";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("configuration file not found: {}", .0.display())]
    NotFound(PathBuf),

    #[error("invalid configuration: {source}")]
    Invalid {
        #[source]
        source: Box<figment::Error>,
    },
}

impl From<figment::Error> for ConfigError {
    fn from(source: figment::Error) -> Self {
        ConfigError::Invalid {
            source: Box::new(source),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Builder)]
#[serde(default)]
pub struct EngineConfig {
    /// Language version the rewritten code must compile under.
    #[builder(default)]
    pub target_version: LanguageVersion,

    /// Rule names excluded from the run.
    #[builder(default, into)]
    pub disabled_rules: Vec<String>,

    /// Stop descending below a node where a rule faulted.
    #[builder(default)]
    pub skip_subtree_on_fault: bool,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            target_version: LanguageVersion::JAVA_8,
            disabled_rules: Vec::new(),
            skip_subtree_on_fault: false,
        }
    }
}

impl EngineConfig {
    /// Load from defaults, the config file and the environment.
    ///
    /// Without `path`, `refit.toml` is read when it exists. An explicit path
    /// must exist.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        Ok(Self::figment(path)?.extract()?)
    }

    /// The layered provider chain behind [`EngineConfig::load`].
    pub fn figment(path: Option<&Path>) -> Result<Figment, ConfigError> {
        let mut figment = Figment::new().merge(Serialized::defaults(Self::default()));

        let config_file = match path {
            Some(path) if !path.exists() => return Err(ConfigError::NotFound(path.to_path_buf())),
            Some(path) => Some(path.to_path_buf()),
            None => {
                let default_path = Path::new(CONFIG_FILE);
                default_path.exists().then(|| default_path.to_path_buf())
            }
        };

        if let Some(file) = config_file {
            let is_json = file.extension().is_some_and(|ext| ext == "json");
            figment = if is_json {
                figment.merge(Json::file(file))
            } else {
                figment.merge(Toml::file(file))
            };
        }

        // `Env` would parse `1.10` as the float `1.1`; the version stays a string.
        figment = figment.merge(Env::prefixed(ENV_PREFIX).ignore(&["target_version"]));
        if let Some(version) = Env::var(TARGET_VERSION_VAR) {
            figment = figment.merge(Serialized::default("target_version", version));
        }
        Ok(figment)
    }

    pub fn is_disabled(&self, rule: &str) -> bool {
        self.disabled_rules.iter().any(|name| name == rule)
    }
}
