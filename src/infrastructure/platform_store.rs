use std::fs;
use std::io;
use std::path::PathBuf;

use parking_lot::RwLock;

use crate::domain::LoginPlatform;
use crate::errors::StoreError;
use crate::ports::PlatformStore;

const PLATFORM_KEY: &str = "recentLoginPlatform";

#[derive(Debug, Default)]
pub struct InMemoryPlatformStore {
    recent: RwLock<Option<LoginPlatform>>,
}

impl InMemoryPlatformStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

impl PlatformStore for InMemoryPlatformStore {
    fn recent_platform(&self) -> Option<LoginPlatform> {
        *self.recent.read()
    }

    fn save_platform(&self, platform: LoginPlatform) -> Result<(), StoreError> {
        *self.recent.write() = Some(platform);
        Ok(())
    }
}

/// Stores the platform name as plain text, one file per app install.
#[derive(Debug)]
pub struct FilePlatformStore {
    path: PathBuf,
}

impl FilePlatformStore {
    #[must_use]
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl PlatformStore for FilePlatformStore {
    fn recent_platform(&self) -> Option<LoginPlatform> {
        match fs::read_to_string(&self.path) {
            Ok(raw) => raw
                .trim()
                .parse::<LoginPlatform>()
                .inspect_err(|error| tracing::warn!(%error, "ignoring stored login platform"))
                .ok(),
            Err(error) if error.kind() == io::ErrorKind::NotFound => None,
            Err(error) => {
                tracing::warn!(path = %self.path.display(), %error, "platform file unreadable");
                None
            }
        }
    }

    fn save_platform(&self, platform: LoginPlatform) -> Result<(), StoreError> {
        fs::write(&self.path, platform.as_str()).map_err(|error| StoreError::Write {
            key: PLATFORM_KEY.to_string(),
            message: error.to_string(),
        })
    }
}
