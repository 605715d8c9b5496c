//! Transient UI overlays: toast, snackbar, alert.
//!
//! At most one overlay is active. Presenting a new one replaces the
//! current one; dismissing only clears the overlay it refers to, so a late
//! dismiss of an old toast cannot hide its replacement.

use std::sync::Arc;

use tokio::sync::watch;

use crate::reactor::{Pulse, PulseReader, PulseSource};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Overlay {
    Toast {
        message: String,
    },
    /// Toast with an action button (for example "undo").
    Snackbar {
        message: String,
        action_title: String,
    },
    Alert {
        title: String,
        message: String,
    },
}

impl Overlay {
    #[must_use]
    pub fn toast(message: impl Into<String>) -> Self {
        Self::Toast {
            message: message.into(),
        }
    }

    #[must_use]
    pub fn snackbar(message: impl Into<String>, action_title: impl Into<String>) -> Self {
        Self::Snackbar {
            message: message.into(),
            action_title: action_title.into(),
        }
    }

    #[must_use]
    pub fn alert(title: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Alert {
            title: title.into(),
            message: message.into(),
        }
    }
}

/// Identifies a presented overlay for a later dismiss.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct OverlayTicket(u64);

/// Owner of the single active overlay. Clone to share.
#[derive(Debug, Clone)]
pub struct OverlayCenter {
    sender: Arc<watch::Sender<Option<Pulse<Overlay>>>>,
    source: Arc<PulseSource>,
}

impl OverlayCenter {
    #[must_use]
    pub fn new() -> Self {
        let (sender, _) = watch::channel(None);
        Self {
            sender: Arc::new(sender),
            source: Arc::new(PulseSource::new()),
        }
    }

    /// Shows `overlay`, replacing whatever is active.
    pub fn present(&self, overlay: Overlay) -> OverlayTicket {
        let pulse = self.source.emit(overlay);
        let ticket = OverlayTicket(pulse.generation());
        tracing::debug!(overlay = ?pulse.value(), "present overlay");
        self.sender.send_replace(Some(pulse));
        ticket
    }

    /// Clears the overlay identified by `ticket` if it is still active.
    pub fn dismiss(&self, ticket: OverlayTicket) -> bool {
        self.sender.send_if_modified(|current| {
            let is_current = current
                .as_ref()
                .is_some_and(|pulse| pulse.generation() == ticket.0);
            if is_current {
                *current = None;
            }
            is_current
        })
    }

    #[must_use]
    pub fn current(&self) -> Option<Overlay> {
        self.sender
            .borrow()
            .as_ref()
            .map(|pulse| pulse.value().clone())
    }

    /// Observer that yields each presented overlay once, including the one
    /// active at subscription time.
    #[must_use]
    pub fn subscribe(&self) -> OverlaySubscription {
        self.subscribe_from(PulseReader::new())
    }

    /// Re-subscribes with the reader of a previous subscription, so overlays
    /// it already consumed are not shown again.
    #[must_use]
    pub fn subscribe_from(&self, reader: PulseReader) -> OverlaySubscription {
        let mut receiver = self.sender.subscribe();
        receiver.mark_changed();
        OverlaySubscription { receiver, reader }
    }
}

impl Default for OverlayCenter {
    fn default() -> Self {
        Self::new()
    }
}

pub struct OverlaySubscription {
    receiver: watch::Receiver<Option<Pulse<Overlay>>>,
    reader: PulseReader,
}

impl OverlaySubscription {
    #[must_use]
    pub const fn reader(&self) -> PulseReader {
        self.reader
    }

    /// Next overlay not yet seen by this subscription; `None` when the
    /// centre is gone.
    pub async fn next(&mut self) -> Option<Overlay> {
        loop {
            self.receiver.changed().await.ok()?;
            let latest = self.receiver.borrow_and_update().clone();
            if let Some(pulse) = latest
                && let Some(overlay) = self.reader.read(&pulse)
            {
                return Some(overlay.clone());
            }
        }
    }
}
