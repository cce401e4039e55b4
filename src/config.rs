use crate::{Error, Result};
use crate::storage::sqlite::MEMORY_URL;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Environment variable overriding the store URL
pub const URL_VAR: &str = "CLOUDGRAPH_URL";
/// Environment variable overriding the principal
pub const USER_VAR: &str = "CLOUDGRAPH_USER";
/// Environment variable overriding the credential
pub const PASSWORD_VAR: &str = "CLOUDGRAPH_PASSWORD";

pub const DEFAULT_PRINCIPAL: &str = "cloudgraph";

#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq, Eq)]
pub struct CloudgraphConfig {
    pub url: Option<String>,
    pub principal: Option<String>,
    pub credential: Option<String>,
}

pub fn default_config_path() -> PathBuf {
    PathBuf::from("cloudgraph.toml")
}

pub fn default_database_path() -> PathBuf {
    PathBuf::from(".cloudgraph").join("cloudgraph.db")
}

pub fn load_config(path: Option<&Path>) -> Result<Option<CloudgraphConfig>> {
    let path = path.map(Path::to_path_buf).unwrap_or_else(default_config_path);
    if !path.exists() {
        return Ok(None);
    }

    let contents = std::fs::read_to_string(&path)?;
    let config: CloudgraphConfig = toml::from_str(&contents)
        .map_err(|e| Error::Config(format!("{}: {}", path.display(), e)))?;
    Ok(Some(config))
}

pub fn write_config(path: &Path, config: &CloudgraphConfig, force: bool) -> Result<()> {
    if path.exists() && !force {
        return Err(Error::Config(format!(
            "config already exists at {} (use --force to overwrite)",
            path.display()
        )));
    }

    let contents = toml::to_string_pretty(config).map_err(|e| Error::Config(e.to_string()))?;
    std::fs::write(path, contents)?;
    Ok(())
}

/// Everything needed to open the graph store
#[derive(Clone, PartialEq, Eq)]
pub struct ConnectionSettings {
    pub url: String,
    pub principal: String,
    pub credential: String,
}

impl ConnectionSettings {
    /// Merge a config file with variables from `lookup`; variables win.
    pub fn resolve<F>(config: Option<CloudgraphConfig>, lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let config = config.unwrap_or_default();
        Self {
            url: lookup(URL_VAR)
                .or(config.url)
                .unwrap_or_else(|| default_database_path().display().to_string()),
            principal: lookup(USER_VAR)
                .or(config.principal)
                .unwrap_or_else(|| DEFAULT_PRINCIPAL.to_string()),
            credential: lookup(PASSWORD_VAR).or(config.credential).unwrap_or_default(),
        }
    }

    /// Settings from `path` (or `cloudgraph.toml`) and the process environment
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let config = load_config(path)?;
        Ok(Self::resolve(config, |key| std::env::var(key).ok()))
    }

    /// Settings for a private in-memory store
    pub fn in_memory() -> Self {
        Self {
            url: MEMORY_URL.to_string(),
            principal: DEFAULT_PRINCIPAL.to_string(),
            credential: String::new(),
        }
    }
}

impl std::fmt::Debug for ConnectionSettings {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ConnectionSettings")
            .field("url", &self.url)
            .field("principal", &self.principal)
            .field("credential", &"<redacted>")
            .finish()
    }
}
