//! Broadcast of bookmark changes to list screens.
//!
//! A change is `(kind, entity_id, bookmark_id)`. Delivery is fire and
//! forget: publishing with no subscriber is fine, and a subscriber that
//! falls behind skips the changes it missed (each list refetches on its
//! next load anyway).

use futures::stream::{self, BoxStream, StreamExt};
use tokio::sync::broadcast;

use crate::domain::{BookmarkId, EntityId, EntityKind};

const DEFAULT_CAPACITY: usize = 64;

/// New bookmark state of one entity.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BookmarkChange {
    pub kind: EntityKind,
    pub entity_id: EntityId,
    pub bookmark_id: Option<BookmarkId>,
}

#[derive(Debug, Clone)]
pub struct BookmarkRelay {
    sender: broadcast::Sender<BookmarkChange>,
}

impl BookmarkRelay {
    #[must_use]
    pub fn new() -> Self {
        Self::with_capacity(DEFAULT_CAPACITY)
    }

    #[must_use]
    pub fn with_capacity(capacity: usize) -> Self {
        let (sender, _) = broadcast::channel(capacity.max(1));
        Self { sender }
    }

    /// Returns the number of subscribers that will see the change.
    pub fn publish(&self, change: BookmarkChange) -> usize {
        tracing::trace!(?change, "bookmark change");
        self.sender.send(change).unwrap_or(0)
    }

    #[must_use]
    pub fn subscribe(&self) -> BookmarkSubscription {
        BookmarkSubscription {
            receiver: self.sender.subscribe(),
        }
    }
}

impl Default for BookmarkRelay {
    fn default() -> Self {
        Self::new()
    }
}

pub struct BookmarkSubscription {
    receiver: broadcast::Receiver<BookmarkChange>,
}

impl BookmarkSubscription {
    /// Next change, or `None` once the relay is gone.
    pub async fn recv(&mut self) -> Option<BookmarkChange> {
        loop {
            match self.receiver.recv().await {
                Ok(change) => return Some(change),
                Err(broadcast::error::RecvError::Lagged(skipped)) => {
                    tracing::debug!(skipped, "bookmark subscriber lagged");
                }
                Err(broadcast::error::RecvError::Closed) => return None,
            }
        }
    }

    /// Changes concerning `kind` only, as a stream.
    pub fn into_stream(self, kind: EntityKind) -> BoxStream<'static, BookmarkChange> {
        stream::unfold(self, |mut subscription| async move {
            subscription
                .recv()
                .await
                .map(|change| (change, subscription))
        })
        .filter(move |change| futures::future::ready(change.kind == kind))
        .boxed()
    }
}
