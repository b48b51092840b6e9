// Durable key-value storage for the session tokens.
// Backed by a small TOML file so it survives between invocations.

use anyhow::{Context, Result};
use std::collections::BTreeMap;
use std::fs;
use std::path::PathBuf;

pub const ACCESS_TOKEN_KEY: &str = "access_token";
pub const REFRESH_TOKEN_KEY: &str = "refresh_token";

/// String key-value store, optionally persisted to a file
#[derive(Debug, Default)]
pub struct TokenStore {
    path: Option<PathBuf>,
    entries: BTreeMap<String, String>,
}

impl TokenStore {
    /// Open the store at `path`, loading existing entries if the file exists
    pub fn open(path: impl Into<PathBuf>) -> Result<Self> {
        let path = path.into();

        let entries = if path.exists() {
            let contents = fs::read_to_string(&path).context("Failed to read session file")?;
            toml::from_str(&contents).context("Failed to parse session file")?
        } else {
            BTreeMap::new()
        };

        tracing::debug!("Opened token store at {:?} ({} keys)", path, entries.len());

        Ok(Self {
            path: Some(path),
            entries,
        })
    }

    /// Store that lives only in memory (nothing is written to disk)
    pub fn in_memory() -> Self {
        Self::default()
    }

    /// Read a value; empty strings count as absent
    pub fn get(&self, key: &str) -> Option<&str> {
        self.entries
            .get(key)
            .map(String::as_str)
            .filter(|value| !value.is_empty())
    }

    /// Write a value and flush
    pub fn set(&mut self, key: &str, value: impl Into<String>) -> Result<()> {
        self.entries.insert(key.to_string(), value.into());
        self.flush()
    }

    /// Remove a value and flush
    pub fn remove(&mut self, key: &str) -> Result<()> {
        if self.entries.remove(key).is_some() {
            self.flush()?;
        }
        Ok(())
    }

    fn flush(&self) -> Result<()> {
        let Some(path) = &self.path else {
            return Ok(());
        };

        // An empty store leaves nothing behind on disk.
        if self.entries.is_empty() {
            if path.exists() {
                fs::remove_file(path).context("Failed to remove session file")?;
            }
            return Ok(());
        }

        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).context("Failed to create session directory")?;
        }

        let contents = toml::to_string(&self.entries).context("Failed to serialize session")?;
        fs::write(path, contents).context("Failed to write session file")?;

        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            fs::set_permissions(path, fs::Permissions::from_mode(0o600))
                .context("Failed to restrict session file permissions")?;
        }

        Ok(())
    }
}
