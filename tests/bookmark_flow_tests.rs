//! Integration tests for bookmark toggle, undo and the list relay.

mod common;

use common::{FakeBackend, potion_document, slime_document};
use companion_core::domain::{BookmarkId, EntityId, EntityKind, ItemDetail, MonsterDetail};
use companion_core::errors::ApiError;
use companion_core::relay::{BookmarkChange, BookmarkRelay};
use companion_core::workflows::bookmark::{
    BookmarkEvent, refresh_bookmarked_entity, toggle_and_refresh, toggle_bookmark,
    undo_bookmark_deletion,
};
use companion_core::workflows::dictionary::fetch_detail;
use futures::StreamExt;
use rstest::{fixture, rstest};

#[fixture]
fn backend() -> FakeBackend {
    FakeBackend::new()
        .with_detail(EntityKind::Monster, 100, slime_document())
        .with_detail(EntityKind::Item, 42, potion_document())
}

async fn slime(backend: &FakeBackend) -> MonsterDetail {
    fetch_detail::<MonsterDetail>(&backend.dictionary(), EntityId::new(100))
        .run_async()
        .await
        .unwrap()
}

// =============================================================================
// Toggle
// =============================================================================

#[rstest]
#[tokio::test]
async fn test_toggle_on_unbookmarked_entity_reports_added_with_new_id(backend: FakeBackend) {
    let entity = slime(&backend).await;
    assert_eq!(entity.bookmark_id, None);

    let event = toggle_bookmark(&backend.bookmarks(), entity.clone())
        .run_async()
        .await
        .unwrap();

    let expected = MonsterDetail {
        bookmark_id: Some(BookmarkId::new(1)),
        ..entity
    };
    assert_eq!(event, BookmarkEvent::Added(expected));
    assert_eq!(
        backend.bookmark_of(EntityKind::Monster, 100),
        Some(BookmarkId::new(1))
    );
}

#[rstest]
#[tokio::test]
async fn test_toggle_on_bookmarked_entity_reports_deleted_with_old_id() {
    let backend = FakeBackend::new()
        .with_detail(EntityKind::Item, 42, potion_document())
        .with_bookmark(EntityKind::Item, 42, 7);
    let entity = fetch_detail::<ItemDetail>(&backend.dictionary(), EntityId::new(42))
        .run_async()
        .await
        .unwrap();
    assert_eq!(entity.bookmark_id, Some(BookmarkId::new(7)));

    let event = toggle_bookmark(&backend.bookmarks(), entity.clone())
        .run_async()
        .await
        .unwrap();

    // Deleted carries the pre-toggle entity so undo can restore it
    assert_eq!(event, BookmarkEvent::Deleted(entity));
    assert_eq!(backend.bookmark_of(EntityKind::Item, 42), None);
}

#[rstest]
#[tokio::test]
async fn test_toggle_failure_leaves_backend_untouched(backend: FakeBackend) {
    let entity = slime(&backend).await;
    backend.fail_bookmarks(ApiError::status(503, "maintenance"));

    let result = toggle_bookmark(&backend.bookmarks(), entity)
        .run_async()
        .await;

    assert!(result.unwrap_err().is_api());
    assert_eq!(backend.bookmark_of(EntityKind::Monster, 100), None);
}

// =============================================================================
// Undo
// =============================================================================

#[rstest]
#[tokio::test]
async fn test_set_then_undo_ends_bookmarked_with_fresh_id(backend: FakeBackend) {
    let bookmarks = backend.bookmarks();
    let original = slime(&backend).await;

    let added = toggle_bookmark(&bookmarks, original).run_async().await.unwrap();
    let BookmarkEvent::Added(bookmarked) = added else {
        panic!("expected Added, got {added:?}");
    };
    let deleted = toggle_bookmark(&bookmarks, bookmarked.clone())
        .run_async()
        .await
        .unwrap();
    let BookmarkEvent::Deleted(removed) = deleted else {
        panic!("expected Deleted, got {deleted:?}");
    };
    assert_eq!(backend.bookmark_of(EntityKind::Monster, 100), None);

    let restored = undo_bookmark_deletion(&bookmarks, removed)
        .run_async()
        .await
        .unwrap();

    let restored_id = restored.entity().bookmark_id;
    assert!(matches!(restored, BookmarkEvent::Added(_)));
    assert!(restored_id.is_some());
    assert_ne!(restored_id, bookmarked.bookmark_id);
    assert_eq!(backend.bookmark_of(EntityKind::Monster, 100), restored_id);
}

// =============================================================================
// Refresh / Relay
// =============================================================================

#[rstest]
#[tokio::test]
async fn test_refresh_publishes_authoritative_bookmark_id(backend: FakeBackend) {
    let relay = BookmarkRelay::new();
    let mut changes = relay.subscribe().into_stream(EntityKind::Monster);
    let entity = slime(&backend).await;

    let (event, refreshed) = toggle_and_refresh(
        &backend.bookmarks(),
        &backend.dictionary(),
        &relay,
        entity,
    )
    .run_async()
    .await
    .unwrap();

    assert!(matches!(event, BookmarkEvent::Added(_)));
    assert_eq!(refreshed.bookmark_id, Some(BookmarkId::new(1)));
    assert_eq!(
        changes.next().await,
        Some(BookmarkChange {
            kind: EntityKind::Monster,
            entity_id: EntityId::new(100),
            bookmark_id: Some(BookmarkId::new(1)),
        })
    );
    assert_eq!(backend.call_count("detail"), 2);
}

#[rstest]
#[tokio::test]
async fn test_refresh_failure_publishes_nothing(backend: FakeBackend) {
    let relay = BookmarkRelay::new();
    let mut subscription = relay.subscribe();
    let missing = MonsterDetail {
        id: EntityId::new(999),
        name: "Ghost".to_string(),
        level: 1,
        hit_points: 1,
        experience: 1,
        bookmark_id: None,
    };

    let result = refresh_bookmarked_entity(&backend.dictionary(), &relay, &missing)
        .run_async()
        .await;

    assert!(result.is_err());
    drop(relay);
    assert_eq!(subscription.recv().await, None);
}
