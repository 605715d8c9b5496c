//! Bookmark toggle and undo.
//!
//! 1. `is_selected = bookmark_id.is_some()`
//! 2. selected: delete that bookmark; otherwise set `(kind, entity_id)`
//! 3. on success report [`BookmarkEvent::Added`] / [`BookmarkEvent::Deleted`],
//!    then refetch the detail (the returned id is not trusted long-term)
//!    and publish the authoritative id on the [`BookmarkRelay`]
//! 4. undo after a delete sets the bookmark again from the entity id, so
//!    the backend always hands out a fresh id

use std::sync::Arc;

use crate::domain::{BookmarkId, DictionaryEntity};
use crate::effect::AsyncIO;
use crate::errors::{WorkflowError, WorkflowResult};
use crate::ports::{BookmarkApi, BookmarkRequest, DictionaryApi};
use crate::relay::{BookmarkChange, BookmarkRelay};
use crate::workflows::dictionary::fetch_detail;

/// One-shot UI event produced by a bookmark mutation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BookmarkEvent<E> {
    /// Carries the entity with its newly assigned id.
    Added(E),
    /// Carries the entity as it was before deletion, for undo.
    Deleted(E),
}

impl<E> BookmarkEvent<E> {
    #[must_use]
    pub const fn entity(&self) -> &E {
        match self {
            Self::Added(entity) | Self::Deleted(entity) => entity,
        }
    }
}

// =============================================================================
// Step 1: Build Request [Pure]
// =============================================================================

fn toggle_request<E: DictionaryEntity>(entity: &E) -> BookmarkRequest {
    match entity.bookmark_id() {
        Some(bookmark_id) => BookmarkRequest::Delete { bookmark_id },
        None => BookmarkRequest::Set {
            kind: E::KIND,
            entity_id: entity.entity_id(),
        },
    }
}

// =============================================================================
// Step 2: Interpret Response [Pure]
// =============================================================================

fn toggle_event<E: DictionaryEntity>(
    entity: E,
    request: BookmarkRequest,
    new_bookmark_id: Option<BookmarkId>,
) -> BookmarkEvent<E> {
    match request {
        BookmarkRequest::Delete { .. } => BookmarkEvent::Deleted(entity),
        BookmarkRequest::Set { .. } => {
            BookmarkEvent::Added(entity.with_bookmark_id(new_bookmark_id))
        }
    }
}

// =============================================================================
// Toggle / Undo Workflows
// =============================================================================

/// Flips the bookmark state of `entity`.
pub fn toggle_bookmark<E: DictionaryEntity>(
    bookmarks: &Arc<dyn BookmarkApi>,
    entity: E,
) -> AsyncIO<WorkflowResult<BookmarkEvent<E>>> {
    let request = toggle_request(&entity);
    tracing::debug!(kind = %E::KIND, id = %entity.entity_id(), ?request, "toggle bookmark");
    bookmarks
        .set_bookmark(request)
        .fmap_err(WorkflowError::from)
        .fmap_ok(move |new_bookmark_id| toggle_event(entity, request, new_bookmark_id))
}

/// Restores a bookmark removed by [`toggle_bookmark`].
///
/// Always creates a new bookmark from the entity id; the deleted id is
/// never reused.
pub fn undo_bookmark_deletion<E: DictionaryEntity>(
    bookmarks: &Arc<dyn BookmarkApi>,
    deleted: E,
) -> AsyncIO<WorkflowResult<BookmarkEvent<E>>> {
    let request = BookmarkRequest::Set {
        kind: E::KIND,
        entity_id: deleted.entity_id(),
    };
    bookmarks
        .set_bookmark(request)
        .fmap_err(WorkflowError::from)
        .fmap_ok(move |new_bookmark_id| {
            BookmarkEvent::Added(deleted.with_bookmark_id(new_bookmark_id))
        })
}

// =============================================================================
// Refresh Workflow
// =============================================================================

/// Refetches the authoritative entity after a bookmark mutation and
/// publishes its bookmark id to every list screen.
pub fn refresh_bookmarked_entity<E: DictionaryEntity>(
    dictionary: &Arc<dyn DictionaryApi>,
    relay: &BookmarkRelay,
    entity: &E,
) -> AsyncIO<WorkflowResult<E>> {
    let relay = relay.clone();
    fetch_detail::<E>(dictionary, entity.entity_id()).fmap_ok(move |refreshed| {
        relay.publish(BookmarkChange {
            kind: E::KIND,
            entity_id: refreshed.entity_id(),
            bookmark_id: refreshed.bookmark_id(),
        });
        refreshed
    })
}

/// Toggle followed by refresh, for callers that do not need the
/// intermediate event separately.
pub fn toggle_and_refresh<E: DictionaryEntity>(
    bookmarks: &Arc<dyn BookmarkApi>,
    dictionary: &Arc<dyn DictionaryApi>,
    relay: &BookmarkRelay,
    entity: E,
) -> AsyncIO<WorkflowResult<(BookmarkEvent<E>, E)>> {
    let dictionary = Arc::clone(dictionary);
    let relay = relay.clone();
    toggle_bookmark(bookmarks, entity).flat_map_ok(move |event| {
        refresh_bookmarked_entity(&dictionary, &relay, event.entity())
            .fmap_ok(move |refreshed| (event, refreshed))
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{EntityId, EntityKind, ItemDetail};
    use rstest::rstest;

    fn item(bookmark: Option<i64>) -> ItemDetail {
        ItemDetail {
            id: EntityId::new(42),
            name: "Red Potion".to_string(),
            required_level: None,
            category: "consumable".to_string(),
            bookmark_id: bookmark.map(BookmarkId::new),
        }
    }

    #[rstest]
    fn unbookmarked_entity_requests_set() {
        assert_eq!(
            toggle_request(&item(None)),
            BookmarkRequest::Set {
                kind: EntityKind::Item,
                entity_id: EntityId::new(42)
            }
        );
    }

    #[rstest]
    fn bookmarked_entity_requests_delete_by_bookmark_id() {
        assert_eq!(
            toggle_request(&item(Some(7))),
            BookmarkRequest::Delete {
                bookmark_id: BookmarkId::new(7)
            }
        );
    }

    #[rstest]
    fn delete_event_keeps_pre_toggle_entity() {
        let event = toggle_event(item(Some(7)), toggle_request(&item(Some(7))), None);
        assert_eq!(event, BookmarkEvent::Deleted(item(Some(7))));
    }
}
