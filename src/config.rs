//! `sleet.toml` configuration.
//!
//! ```toml
//! projectId = "acme-analytics"
//! dataset = "blog"
//! location = "EU"
//! defaultLimit = 1000
//! ```

use std::path::{Path, PathBuf};

use serde::Deserialize;
use sleet_core::SleetError;
use sleet_core::schema::{Namespace, Registry};

/// Default config file name, resolved against the working directory.
pub const CONFIG_FILE: &str = "sleet.toml";

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase", default, deny_unknown_fields)]
pub struct Config {
    /// Project that owns the dataset
    pub project_id: Option<String>,
    /// Dataset holding every entity table
    pub dataset: Option<String>,
    /// Processing location. Not read by sleet; executors can look it up
    /// through `Sleet::config` when submitting jobs
    pub location: Option<String>,
    /// Limit applied to unpaged finds without includes
    pub default_limit: Option<u64>,
}

impl Config {
    /// Load from [`CONFIG_FILE`]
    pub fn load() -> Result<Self, ConfigError> {
        Self::load_from(Path::new(CONFIG_FILE))
    }

    /// Load from a specific path
    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                ConfigError::NotFound(path.into())
            } else {
                ConfigError::Io(path.into(), e)
            }
        })?;

        let config: Self =
            toml::from_str(&content).map_err(|e| ConfigError::Parse(path.into(), e))?;

        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> Result<(), ConfigError> {
        let invalid = |msg: &str| Err(ConfigError::Invalid(msg.into()));

        if self.project_id.is_some() && self.dataset.is_none() {
            return invalid("projectId requires dataset");
        }
        if let Some(project) = &self.project_id
            && !valid_name(project, &['-', ':', '.'])
        {
            return invalid("projectId must be non-empty and contain only letters, digits, '-', ':' and '.'");
        }
        if let Some(dataset) = &self.dataset
            && !valid_name(dataset, &[])
        {
            return invalid("dataset must be non-empty and contain only letters, digits and '_'");
        }
        if self.default_limit == Some(0) {
            return invalid("defaultLimit must be positive");
        }
        Ok(())
    }

    /// Table qualification for statements built under this config.
    pub fn namespace(&self) -> Namespace {
        let mut namespace = Namespace::new();
        if let Some(project) = &self.project_id {
            namespace = namespace.project(project.as_str());
        }
        if let Some(dataset) = &self.dataset {
            namespace = namespace.dataset(dataset.as_str());
        }
        namespace
    }

    /// An empty registry qualified by [`namespace`](Self::namespace).
    pub fn registry(&self) -> Registry {
        Registry::with_namespace(self.namespace())
    }
}

fn valid_name(name: &str, extra: &[char]) -> bool {
    !name.is_empty()
        && name
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '_' || extra.contains(&c))
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("config not found: {}", .0.display())]
    NotFound(PathBuf),

    #[error("failed to read {}: {}", .0.display(), .1)]
    Io(PathBuf, #[source] std::io::Error),

    #[error("failed to parse {}: {}", .0.display(), .1)]
    Parse(PathBuf, #[source] toml::de::Error),

    #[error("invalid config: {0}")]
    Invalid(String),
}

impl From<ConfigError> for SleetError {
    fn from(error: ConfigError) -> Self {
        SleetError::Config(error.to_string())
    }
}
