//! Detail screen shared by every dictionary kind.
//!
//! Bookmarking requires a session: a logged-out user gets
//! [`DetailEvent::LoginRequired`] and no request is sent. Only one bookmark
//! request runs at a time; taps while one is in flight are ignored.

use std::marker::PhantomData;
use std::sync::Arc;

use crate::domain::{DictionaryEntity, EntityId};
use crate::effect::AsyncIO;
use crate::errors::{WorkflowError, WorkflowResult};
use crate::ports::{AuthApi, BookmarkApi, DictionaryApi, TokenStore};
use crate::reactor::mutation::{self, MutationStream};
use crate::reactor::{Reactor, Transition};
use crate::relay::BookmarkRelay;
use crate::workflows::auth::check_login;
use crate::workflows::bookmark::{
    BookmarkEvent, refresh_bookmarked_entity, toggle_bookmark, undo_bookmark_deletion,
};
use crate::workflows::dictionary::fetch_detail;

/// Collaborators of a detail screen.
#[derive(Clone)]
pub struct DetailServices {
    pub tokens: Arc<dyn TokenStore>,
    pub auth: Arc<dyn AuthApi>,
    pub dictionary: Arc<dyn DictionaryApi>,
    pub bookmarks: Arc<dyn BookmarkApi>,
    pub relay: BookmarkRelay,
}

pub struct DictionaryDetailReactor<E> {
    id: EntityId,
    services: DetailServices,
    entity: PhantomData<fn() -> E>,
}

impl<E: DictionaryEntity> DictionaryDetailReactor<E> {
    #[must_use]
    pub const fn new(id: EntityId, services: DetailServices) -> Self {
        Self {
            id,
            services,
            entity: PhantomData,
        }
    }

    fn load(&self) -> MutationStream<DetailMutation<E>> {
        let detail = fetch_detail::<E>(&self.services.dictionary, self.id).fmap(|result| {
            result.map_or_else(DetailMutation::LoadFailed, DetailMutation::Loaded)
        });
        mutation::concat(vec![
            mutation::just(DetailMutation::SetLoading(true)),
            mutation::from_async_io(detail),
            mutation::just(DetailMutation::SetLoading(false)),
        ])
    }

    /// Reports the bookmark event, then replaces the entity with the
    /// refetched one. A failure of either step ends in
    /// [`DetailEvent::BookmarkFailed`].
    fn bookmark_then_refresh(
        &self,
        request: AsyncIO<WorkflowResult<BookmarkEvent<E>>>,
    ) -> MutationStream<DetailMutation<E>> {
        let dictionary = Arc::clone(&self.services.dictionary);
        let relay = self.services.relay.clone();
        let flow = mutation::and_then(request, move |result| match result {
            Ok(event) => {
                let refresh = refresh_bookmarked_entity(&dictionary, &relay, event.entity());
                mutation::concat(vec![
                    mutation::just(DetailMutation::Bookmarked(event)),
                    mutation::and_then(refresh, |refreshed| match refreshed {
                        Ok(entity) => mutation::just(DetailMutation::Loaded(entity)),
                        Err(error) => {
                            tracing::warn!(
                                kind = %E::KIND,
                                %error,
                                "refresh after bookmark failed"
                            );
                            mutation::just(DetailMutation::BookmarkFailed(error))
                        }
                    }),
                ])
            }
            Err(error) => mutation::just(DetailMutation::BookmarkFailed(error)),
        });
        mutation::concat(vec![
            mutation::just(DetailMutation::SetBookmarking(true)),
            flow,
            mutation::just(DetailMutation::SetBookmarking(false)),
        ])
    }
}

#[derive(Debug, Clone)]
pub enum DetailAction<E> {
    Appear,
    ToggleBookmark,
    /// Restores a bookmark from a [`BookmarkEvent::Deleted`] payload.
    UndoBookmark(E),
}

#[derive(Debug, Clone)]
pub enum DetailMutation<E> {
    SetLoggedIn(bool),
    SetLoading(bool),
    SetBookmarking(bool),
    Loaded(E),
    LoadFailed(WorkflowError),
    Bookmarked(BookmarkEvent<E>),
    BookmarkFailed(WorkflowError),
    LoginRequired,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DetailState<E> {
    pub entity: Option<E>,
    pub is_logged_in: bool,
    pub is_loading: bool,
    /// A set, delete or undo request is in flight.
    pub is_bookmarking: bool,
}

impl<E> Default for DetailState<E> {
    fn default() -> Self {
        Self {
            entity: None,
            is_logged_in: false,
            is_loading: false,
            is_bookmarking: false,
        }
    }
}

#[derive(Debug, Clone)]
pub enum DetailEvent<E> {
    /// Show the bookmark toast (with undo for deletions).
    Bookmarked(BookmarkEvent<E>),
    LoginRequired,
    BookmarkFailed(WorkflowError),
    LoadFailed(WorkflowError),
}

impl<E: DictionaryEntity> Reactor for DictionaryDetailReactor<E> {
    const NAME: &'static str = "dictionary_detail";

    type Action = DetailAction<E>;
    type Mutation = DetailMutation<E>;
    type State = DetailState<E>;
    type Event = DetailEvent<E>;

    fn initial_state(&self) -> DetailState<E> {
        DetailState::default()
    }

    fn mutate(
        &self,
        action: DetailAction<E>,
        state: &DetailState<E>,
    ) -> MutationStream<DetailMutation<E>> {
        match action {
            DetailAction::Appear => mutation::merge(vec![
                mutation::from_async_io(
                    check_login(&self.services.tokens, &self.services.auth)
                        .fmap(DetailMutation::SetLoggedIn),
                ),
                self.load(),
            ]),
            DetailAction::ToggleBookmark => {
                if !state.is_logged_in {
                    return mutation::just(DetailMutation::LoginRequired);
                }
                if state.is_bookmarking {
                    tracing::debug!(kind = %E::KIND, "bookmark request in flight, tap ignored");
                    return mutation::empty();
                }
                match &state.entity {
                    Some(entity) => self.bookmark_then_refresh(toggle_bookmark(
                        &self.services.bookmarks,
                        entity.clone(),
                    )),
                    None => mutation::empty(),
                }
            }
            DetailAction::UndoBookmark(deleted) => {
                if !state.is_logged_in {
                    return mutation::just(DetailMutation::LoginRequired);
                }
                if state.is_bookmarking {
                    tracing::debug!(kind = %E::KIND, "bookmark request in flight, undo ignored");
                    return mutation::empty();
                }
                let undo = undo_bookmark_deletion(&self.services.bookmarks, deleted);
                self.bookmark_then_refresh(undo)
            }
        }
    }

    fn reduce(
        state: DetailState<E>,
        mutation: DetailMutation<E>,
    ) -> Transition<DetailState<E>, DetailEvent<E>> {
        match mutation {
            DetailMutation::SetLoggedIn(is_logged_in) => Transition::to(DetailState {
                is_logged_in,
                ..state
            }),
            DetailMutation::SetLoading(is_loading) => {
                Transition::to(DetailState { is_loading, ..state })
            }
            DetailMutation::SetBookmarking(is_bookmarking) => Transition::to(DetailState {
                is_bookmarking,
                ..state
            }),
            DetailMutation::Loaded(entity) => Transition::to(DetailState {
                entity: Some(entity),
                ..state
            }),
            DetailMutation::LoadFailed(error) => {
                Transition::with_event(state, DetailEvent::LoadFailed(error))
            }
            DetailMutation::Bookmarked(event) => {
                let entity = match &event {
                    BookmarkEvent::Added(entity) => entity.clone(),
                    BookmarkEvent::Deleted(entity) => entity.clone().with_bookmark_id(None),
                };
                Transition::with_event(
                    DetailState {
                        entity: Some(entity),
                        ..state
                    },
                    DetailEvent::Bookmarked(event),
                )
            }
            DetailMutation::BookmarkFailed(error) => {
                Transition::with_event(state, DetailEvent::BookmarkFailed(error))
            }
            DetailMutation::LoginRequired => {
                Transition::with_event(state, DetailEvent::LoginRequired)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{BookmarkId, MonsterDetail};
    use rstest::rstest;

    type Monster = DictionaryDetailReactor<MonsterDetail>;

    fn slime(bookmark: Option<i64>) -> MonsterDetail {
        MonsterDetail {
            id: EntityId::new(100),
            name: "Slime".to_string(),
            level: 6,
            hit_points: 50,
            experience: 10,
            bookmark_id: bookmark.map(BookmarkId::new),
        }
    }

    fn loaded(bookmark: Option<i64>) -> DetailState<MonsterDetail> {
        DetailState {
            entity: Some(slime(bookmark)),
            is_logged_in: true,
            is_loading: false,
            is_bookmarking: false,
        }
    }

    #[rstest]
    fn deleted_event_clears_bookmark_but_carries_old_id() {
        let transition = Monster::reduce(
            loaded(Some(7)),
            DetailMutation::Bookmarked(BookmarkEvent::Deleted(slime(Some(7)))),
        );

        assert_eq!(transition.state.entity, Some(slime(None)));
        match transition.events.as_slice() {
            [DetailEvent::Bookmarked(BookmarkEvent::Deleted(entity))] => {
                assert_eq!(entity.bookmark_id, Some(BookmarkId::new(7)));
            }
            other => panic!("unexpected events: {other:?}"),
        }
    }

    #[rstest]
    fn added_event_stores_new_id() {
        let transition = Monster::reduce(
            loaded(None),
            DetailMutation::Bookmarked(BookmarkEvent::Added(slime(Some(9)))),
        );

        assert_eq!(transition.state.entity, Some(slime(Some(9))));
    }

    #[rstest]
    fn login_required_leaves_state_untouched() {
        let state = DetailState {
            is_logged_in: false,
            ..loaded(None)
        };
        let transition = Monster::reduce(state.clone(), DetailMutation::LoginRequired);

        assert_eq!(transition.state, state);
        assert!(matches!(
            transition.events.as_slice(),
            [DetailEvent::LoginRequired]
        ));
    }
}
