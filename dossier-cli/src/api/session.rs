use anyhow::Result;
use std::path::PathBuf;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use crate::storage::{TokenStore, ACCESS_TOKEN_KEY, REFRESH_TOKEN_KEY};

/// Token pair shared between the HTTP client and the auth calls.
///
/// Cloning is cheap and every clone sees the same tokens.
#[derive(Clone, Debug)]
pub struct Session {
    store: Arc<Mutex<TokenStore>>,
}

impl Session {
    pub fn new(store: TokenStore) -> Self {
        Self {
            store: Arc::new(Mutex::new(store)),
        }
    }

    /// Session persisted in the given file
    pub fn open(path: impl Into<PathBuf>) -> Result<Self> {
        Ok(Self::new(TokenStore::open(path)?))
    }

    pub fn in_memory() -> Self {
        Self::new(TokenStore::in_memory())
    }

    fn store(&self) -> MutexGuard<'_, TokenStore> {
        self.store.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn access_token(&self) -> Option<String> {
        self.store().get(ACCESS_TOKEN_KEY).map(str::to_string)
    }

    pub fn refresh_token(&self) -> Option<String> {
        self.store().get(REFRESH_TOKEN_KEY).map(str::to_string)
    }

    /// True when an access token is stored
    pub fn is_authenticated(&self) -> bool {
        self.store().get(ACCESS_TOKEN_KEY).is_some()
    }

    pub fn set_tokens(&self, access: &str, refresh: &str) -> Result<()> {
        let mut store = self.store();
        store.set(ACCESS_TOKEN_KEY, access)?;
        store.set(REFRESH_TOKEN_KEY, refresh)
    }

    pub fn set_access_token(&self, access: &str) -> Result<()> {
        self.store().set(ACCESS_TOKEN_KEY, access)
    }

    pub fn set_refresh_token(&self, refresh: &str) -> Result<()> {
        self.store().set(REFRESH_TOKEN_KEY, refresh)
    }

    /// Forget both tokens
    pub fn clear(&self) -> Result<()> {
        let mut store = self.store();
        store.remove(ACCESS_TOKEN_KEY)?;
        store.remove(REFRESH_TOKEN_KEY)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clones_share_tokens() -> Result<()> {
        let session = Session::in_memory();
        let other = session.clone();

        session.set_tokens("a", "r")?;
        assert_eq!(other.access_token().as_deref(), Some("a"));
        assert_eq!(other.refresh_token().as_deref(), Some("r"));
        assert!(other.is_authenticated());

        other.clear()?;
        assert!(!session.is_authenticated());
        assert!(session.refresh_token().is_none());

        Ok(())
    }

    #[test]
    fn test_access_token_replaced_alone() -> Result<()> {
        let session = Session::in_memory();
        session.set_tokens("a1", "r1")?;
        session.set_access_token("a2")?;

        assert_eq!(session.access_token().as_deref(), Some("a2"));
        assert_eq!(session.refresh_token().as_deref(), Some("r1"));
        Ok(())
    }
}
