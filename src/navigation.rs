//! Tab navigation owned by the app shell.
//!
//! The coordinator keeps a non-owning reference to whichever tab host is
//! currently mounted; once the host is dropped, tab changes report
//! [`NavigationError::NoActiveHost`] instead of touching a dead view.

use std::sync::{Arc, Weak};

use parking_lot::RwLock;
use thiserror::Error;

/// A view hosting the dictionary tabs.
pub trait TabHost: Send + Sync {
    fn tab_count(&self) -> usize;

    fn select_tab(&self, index: usize);
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum NavigationError {
    #[error("no tab host is attached")]
    NoActiveHost,

    #[error("tab {index} does not exist, host has {count} tabs")]
    TabOutOfRange { index: usize, count: usize },
}

#[derive(Default)]
pub struct NavigationCoordinator {
    host: RwLock<Option<Weak<dyn TabHost>>>,
}

impl NavigationCoordinator {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers `host` without taking ownership. Replaces any previous host.
    pub fn attach(&self, host: &Arc<dyn TabHost>) {
        *self.host.write() = Some(Arc::downgrade(host));
    }

    pub fn detach(&self) {
        *self.host.write() = None;
    }

    #[must_use]
    pub fn has_active_host(&self) -> bool {
        self.active_host().is_some()
    }

    /// # Errors
    ///
    /// [`NavigationError::NoActiveHost`] when no live host is attached and
    /// [`NavigationError::TabOutOfRange`] for an invalid index.
    pub fn change_tab(&self, index: usize) -> Result<(), NavigationError> {
        let host = self.active_host().ok_or(NavigationError::NoActiveHost)?;
        let count = host.tab_count();
        if index >= count {
            return Err(NavigationError::TabOutOfRange { index, count });
        }
        tracing::debug!(index, "change tab");
        host.select_tab(index);
        Ok(())
    }

    fn active_host(&self) -> Option<Arc<dyn TabHost>> {
        self.host.read().as_ref().and_then(Weak::upgrade)
    }
}

impl std::fmt::Debug for NavigationCoordinator {
    fn fmt(&self, formatter: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        formatter
            .debug_struct("NavigationCoordinator")
            .field("has_active_host", &self.has_active_host())
            .finish()
    }
}
