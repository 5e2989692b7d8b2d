//! Persistent session token storage.

use std::cell::RefCell;

use log::warn;
use thiserror::Error;
use web_sys::Storage;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum SessionError {
    #[error("browser storage is unavailable")]
    Unavailable,
    #[error("failed to persist session token: {0}")]
    Write(String),
}

/// Read/write access to the session token. Pages only write through
/// login, register and logout.
pub trait SessionStore {
    fn token(&self) -> Option<String>;
    fn store(&self, token: &str) -> Result<(), SessionError>;
    fn clear(&self);

    fn is_signed_in(&self) -> bool {
        self.token().is_some()
    }
}

/// Token kept in `window.localStorage` under a fixed key.
pub struct LocalStorageSession {
    key: String,
}

impl LocalStorageSession {
    pub fn new(key: impl Into<String>) -> Self {
        Self { key: key.into() }
    }

    pub fn is_available() -> bool {
        storage().is_some()
    }
}

fn storage() -> Option<Storage> {
    web_sys::window()?.local_storage().ok()?
}

impl SessionStore for LocalStorageSession {
    fn token(&self) -> Option<String> {
        storage()?
            .get_item(&self.key)
            .ok()?
            .filter(|token| !token.is_empty())
    }

    fn store(&self, token: &str) -> Result<(), SessionError> {
        let storage = storage().ok_or(SessionError::Unavailable)?;
        storage
            .set_item(&self.key, token)
            .map_err(|e| SessionError::Write(format!("{e:?}")))
    }

    fn clear(&self) {
        match storage() {
            Some(storage) => {
                if storage.remove_item(&self.key).is_err() {
                    warn!("could not remove session token from storage");
                }
            }
            None => warn!("storage unavailable while clearing session"),
        }
    }
}

/// In-memory token, used when `localStorage` is blocked and in tests.
#[derive(Default)]
pub struct MemorySession {
    token: RefCell<Option<String>>,
}

impl MemorySession {
    pub fn with_token(token: impl Into<String>) -> Self {
        Self {
            token: RefCell::new(Some(token.into())),
        }
    }
}

impl SessionStore for MemorySession {
    fn token(&self) -> Option<String> {
        self.token.borrow().clone()
    }

    fn store(&self, token: &str) -> Result<(), SessionError> {
        *self.token.borrow_mut() = Some(token.to_string());
        Ok(())
    }

    fn clear(&self) {
        self.token.borrow_mut().take();
    }
}
