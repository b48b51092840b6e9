use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// Environment variable pointing at an alternate config file
pub const CONFIG_ENV: &str = "DOSSIERS_CONFIG";

/// Environment variable overriding the directory holding the session file
pub const HOME_ENV: &str = "DOSSIERS_HOME";

const SESSION_FILE_NAME: &str = "session.toml";

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Config {
    #[serde(default)]
    pub api: ApiConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiConfig {
    #[serde(default = "default_base_url")]
    pub base_url: String,

    #[serde(default = "default_timeout")]
    pub timeout_seconds: u64,
}

// Default value functions
fn default_base_url() -> String {
    "https://gestiondossierback.onrender.com".to_string()
}

fn default_timeout() -> u64 {
    30
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            timeout_seconds: default_timeout(),
        }
    }
}

impl Config {
    /// Get config directory path (~/.dossiers/)
    pub fn config_dir() -> Result<PathBuf> {
        let home = dirs::home_dir().context("Could not find home directory")?;
        Ok(home.join(".dossiers"))
    }

    /// Get config file path (~/.dossiers/config.toml)
    pub fn config_file() -> Result<PathBuf> {
        Ok(Self::config_dir()?.join("config.toml"))
    }

    /// Path of the token store file: under `$DOSSIERS_HOME` when set,
    /// otherwise next to `config_path`
    pub fn session_file(config_path: &Path) -> PathBuf {
        let home = std::env::var_os(HOME_ENV).map(PathBuf::from);
        session_file_in(home.as_deref(), config_path)
    }

    /// Resolve the config file: explicit path, then `$DOSSIERS_CONFIG`, then the default
    pub fn resolve_path(explicit: Option<&Path>) -> Result<PathBuf> {
        if let Some(path) = explicit {
            return Ok(path.to_path_buf());
        }

        if let Ok(path) = std::env::var(CONFIG_ENV) {
            return Ok(PathBuf::from(path));
        }

        Self::config_file()
    }

    /// Load configuration from a file, falling back to defaults when it is missing
    pub fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            tracing::debug!("Config file {:?} not found, using defaults", path);
            return Ok(Self::default());
        }

        let contents = fs::read_to_string(path).context("Failed to read config file")?;

        let config: Config = toml::from_str(&contents).context("Failed to parse config file")?;

        Ok(config)
    }

    /// Save configuration to file
    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).context("Failed to create config directory")?;
        }

        let contents = toml::to_string_pretty(self).context("Failed to serialize config")?;

        fs::write(path, contents).context("Failed to write config file")?;

        Ok(())
    }

    /// Replace the API base URL
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.api.base_url = base_url.into();
        self
    }

    /// Base URL without a trailing slash, so paths can be appended as-is
    pub fn base_url(&self) -> &str {
        self.api.base_url.trim_end_matches('/')
    }
}

fn session_file_in(home: Option<&Path>, config_path: &Path) -> PathBuf {
    let dir = match home {
        Some(dir) => dir,
        None => config_path.parent().unwrap_or_else(|| Path::new("")),
    };
    dir.join(SESSION_FILE_NAME)
}
