use crate::{config::AppConfig, Error};
use keyring::Entry;
use std::sync::{Mutex, PoisonError};

/// Where the session token lives between navigations.
///
/// The browser apps keep a single cookie named after the app's token;
/// a native client keeps the same single entry in one of these stores.
/// An empty stored value reads back as no token.
pub trait TokenStore: Send + Sync {
    fn get(&self) -> Result<Option<String>, Error>;
    fn set(&self, token: &str) -> Result<(), Error>;
    fn remove(&self) -> Result<(), Error>;
}

/// Keeps the token within the user's OS keyring.
pub struct KeyringStore {
    entry: Entry,
}

impl KeyringStore {
    /// Opens the entry for this app, keyed by app name and token name.
    pub fn new(config: &AppConfig) -> Result<Self, Error> {
        let entry = Entry::new(&config.app_name, &config.app_token_name)?;
        Ok(Self { entry })
    }
}

impl TokenStore for KeyringStore {
    fn get(&self) -> Result<Option<String>, Error> {
        match self.entry.get_password() {
            Ok(token) if token.is_empty() => Ok(None),
            Ok(token) => Ok(Some(token)),
            Err(keyring::Error::NoEntry) => Ok(None),
            Err(err) => Err(err.into()),
        }
    }

    fn set(&self, token: &str) -> Result<(), Error> {
        self.entry.set_password(token)?;
        Ok(())
    }

    fn remove(&self) -> Result<(), Error> {
        // Removing a token that was never stored is fine.
        match self.entry.delete_password() {
            Ok(()) | Err(keyring::Error::NoEntry) => Ok(()),
            Err(err) => Err(err.into()),
        }
    }
}

/// An in-process store, for one-shot sessions and tests.
#[derive(Debug, Default)]
pub struct MemoryStore {
    token: Mutex<Option<String>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_token(token: &str) -> Self {
        Self {
            token: Mutex::new(Some(token.to_string())),
        }
    }
}

impl TokenStore for MemoryStore {
    fn get(&self) -> Result<Option<String>, Error> {
        let token = self.token.lock().unwrap_or_else(PoisonError::into_inner);
        Ok(token.clone().filter(|token| !token.is_empty()))
    }

    fn set(&self, token: &str) -> Result<(), Error> {
        *self.token.lock().unwrap_or_else(PoisonError::into_inner) = Some(token.to_string());
        Ok(())
    }

    fn remove(&self) -> Result<(), Error> {
        self.token
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .take();
        Ok(())
    }
}
