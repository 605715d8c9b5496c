//! [`TokenStore`] implementations.
//!
//! - [`InMemoryTokenStore`]: process-local, with per-kind failure
//!   injection for tests
//! - [`FileTokenStore`]: a JSON map on disk, replaced atomically on every
//!   write

use std::collections::{HashMap, HashSet};
use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use parking_lot::{Mutex, RwLock};

use crate::domain::TokenKind;
use crate::errors::StoreError;
use crate::ports::TokenStore;

// =============================================================================
// InMemoryTokenStore
// =============================================================================

#[derive(Debug, Default)]
pub struct InMemoryTokenStore {
    tokens: RwLock<HashMap<TokenKind, String>>,
    failing_writes: RwLock<HashSet<TokenKind>>,
    failing_deletes: RwLock<HashSet<TokenKind>>,
}

impl InMemoryTokenStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// A store pre-filled with `entries`.
    #[must_use]
    pub fn with_tokens<'a>(entries: impl IntoIterator<Item = (TokenKind, &'a str)>) -> Self {
        let store = Self::new();
        store.tokens.write().extend(
            entries
                .into_iter()
                .map(|(kind, value)| (kind, value.to_string())),
        );
        store
    }

    /// Makes every later write of `kind` fail.
    pub fn fail_writes_for(&self, kind: TokenKind) {
        self.failing_writes.write().insert(kind);
    }

    /// Makes every later delete of `kind` fail.
    pub fn fail_deletes_for(&self, kind: TokenKind) {
        self.failing_deletes.write().insert(kind);
    }

    /// Current value without going through the port.
    #[must_use]
    pub fn peek(&self, kind: TokenKind) -> Option<String> {
        self.tokens.read().get(&kind).cloned()
    }
}

impl TokenStore for InMemoryTokenStore {
    fn fetch_token(&self, kind: TokenKind) -> Result<String, StoreError> {
        self.peek(kind).ok_or_else(|| StoreError::not_found(kind))
    }

    fn save_token(&self, kind: TokenKind, value: &str) -> Result<(), StoreError> {
        if self.failing_writes.read().contains(&kind) {
            return Err(StoreError::write(kind, "injected failure"));
        }
        self.tokens.write().insert(kind, value.to_string());
        Ok(())
    }

    fn delete_token(&self, kind: TokenKind) -> Result<(), StoreError> {
        if self.failing_deletes.read().contains(&kind) {
            return Err(StoreError::delete(kind, "injected failure"));
        }
        self.tokens.write().remove(&kind);
        Ok(())
    }
}

// =============================================================================
// FileTokenStore
// =============================================================================

/// Tokens persisted as `{ "<storage key>": "<value>" }`.
///
/// Every operation re-reads the file, so several stores pointing at the
/// same path observe each other's writes. Writes go to a sibling
/// temporary file that is then renamed over the original.
#[derive(Debug)]
pub struct FileTokenStore {
    path: PathBuf,
    lock: Mutex<()>,
}

impl FileTokenStore {
    #[must_use]
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            lock: Mutex::new(()),
        }
    }

    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn load(&self, kind: TokenKind) -> Result<HashMap<String, String>, StoreError> {
        match fs::read(&self.path) {
            Ok(bytes) if bytes.is_empty() => Ok(HashMap::new()),
            Ok(bytes) => serde_json::from_slice(&bytes)
                .map_err(|error| StoreError::read(kind, format!("corrupt token file: {error}"))),
            Err(error) if error.kind() == io::ErrorKind::NotFound => Ok(HashMap::new()),
            Err(error) => Err(StoreError::read(kind, error.to_string())),
        }
    }

    fn persist(&self, entries: &HashMap<String, String>) -> io::Result<()> {
        if let Some(parent) = self.path.parent()
            && !parent.as_os_str().is_empty()
        {
            fs::create_dir_all(parent)?;
        }
        let bytes = serde_json::to_vec_pretty(entries).map_err(io::Error::other)?;
        let temporary = self.path.with_extension("tmp");
        let mut file = fs::File::create(&temporary)?;
        file.write_all(&bytes)?;
        file.sync_all()?;
        fs::rename(&temporary, &self.path)
    }

    fn update(
        &self,
        kind: TokenKind,
        change: impl FnOnce(&mut HashMap<String, String>) -> bool,
        to_error: fn(TokenKind, String) -> StoreError,
    ) -> Result<(), StoreError> {
        let _guard = self.lock.lock();
        let mut entries = self.load(kind)?;
        if !change(&mut entries) {
            return Ok(());
        }
        self.persist(&entries).map_err(|error| {
            tracing::error!(path = %self.path.display(), %error, "token file write failed");
            to_error(kind, error.to_string())
        })
    }
}

impl TokenStore for FileTokenStore {
    fn fetch_token(&self, kind: TokenKind) -> Result<String, StoreError> {
        let _guard = self.lock.lock();
        self.load(kind)?
            .remove(kind.storage_key())
            .ok_or_else(|| StoreError::not_found(kind))
    }

    fn save_token(&self, kind: TokenKind, value: &str) -> Result<(), StoreError> {
        self.update(
            kind,
            |entries| {
                entries.insert(kind.storage_key().to_string(), value.to_string());
                true
            },
            |kind, message| StoreError::write(kind, message),
        )
    }

    fn delete_token(&self, kind: TokenKind) -> Result<(), StoreError> {
        self.update(
            kind,
            |entries| entries.remove(kind.storage_key()).is_some(),
            |kind, message| StoreError::delete(kind, message),
        )
    }
}
