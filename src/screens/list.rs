//! List screen of one dictionary kind.
//!
//! Rows are patched in place from the [`BookmarkRelay`] so a bookmark made
//! on a detail screen shows up without a reload.

use std::sync::Arc;

use futures::StreamExt;

use crate::domain::{DictionarySummary, EntityKind, LevelRange, ValidationError};
use crate::errors::WorkflowError;
use crate::ports::DictionaryApi;
use crate::reactor::mutation::{self, MutationStream};
use crate::reactor::{Reactor, Transition};
use crate::relay::{BookmarkChange, BookmarkRelay};
use crate::workflows::dictionary::fetch_list;

pub struct DictionaryListReactor {
    kind: EntityKind,
    dictionary: Arc<dyn DictionaryApi>,
    relay: BookmarkRelay,
}

impl DictionaryListReactor {
    #[must_use]
    pub const fn new(
        kind: EntityKind,
        dictionary: Arc<dyn DictionaryApi>,
        relay: BookmarkRelay,
    ) -> Self {
        Self {
            kind,
            dictionary,
            relay,
        }
    }

    fn load(&self, levels: LevelRange) -> MutationStream<ListMutation> {
        let levels = if self.kind.has_level() {
            levels
        } else {
            LevelRange::full()
        };
        let rows = fetch_list(&self.dictionary, self.kind, levels)
            .fmap(|result| result.map_or_else(ListMutation::LoadFailed, ListMutation::SetRows));
        mutation::concat(vec![
            mutation::just(ListMutation::SetLoading(true)),
            mutation::from_async_io(rows),
            mutation::just(ListMutation::SetLoading(false)),
        ])
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ListAction {
    Load,
    /// Raw bounds from the filter inputs.
    FilterLevels { min: u32, max: u32 },
}

#[derive(Debug, Clone)]
pub enum ListMutation {
    SetLoading(bool),
    SetRows(Vec<DictionarySummary>),
    SetLevels(LevelRange),
    LevelsRejected(ValidationError),
    LoadFailed(WorkflowError),
    BookmarkChanged(BookmarkChange),
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ListState {
    pub rows: Vec<DictionarySummary>,
    pub levels: LevelRange,
    /// Shown under the filter inputs; the last valid range stays applied.
    pub level_error: Option<ValidationError>,
    pub is_loading: bool,
}

#[derive(Debug, Clone)]
pub enum ListEvent {
    LoadFailed(WorkflowError),
}

impl Reactor for DictionaryListReactor {
    const NAME: &'static str = "dictionary_list";

    type Action = ListAction;
    type Mutation = ListMutation;
    type State = ListState;
    type Event = ListEvent;

    fn initial_state(&self) -> ListState {
        ListState::default()
    }

    fn mutate(&self, action: ListAction, state: &ListState) -> MutationStream<ListMutation> {
        match action {
            ListAction::Load => self.load(state.levels),
            ListAction::FilterLevels { min, max } => match LevelRange::new(min, max) {
                Ok(levels) => mutation::concat(vec![
                    mutation::just(ListMutation::SetLevels(levels)),
                    self.load(levels),
                ]),
                Err(error) => mutation::just(ListMutation::LevelsRejected(error)),
            },
        }
    }

    fn reduce(state: ListState, mutation: ListMutation) -> Transition<ListState, ListEvent> {
        match mutation {
            ListMutation::SetLoading(is_loading) => {
                Transition::to(ListState { is_loading, ..state })
            }
            ListMutation::SetRows(rows) => Transition::to(ListState { rows, ..state }),
            ListMutation::SetLevels(levels) => Transition::to(ListState {
                levels,
                level_error: None,
                ..state
            }),
            ListMutation::LevelsRejected(error) => Transition::to(ListState {
                level_error: Some(error),
                ..state
            }),
            ListMutation::LoadFailed(error) => {
                Transition::with_event(state, ListEvent::LoadFailed(error))
            }
            ListMutation::BookmarkChanged(change) => {
                let mut rows = state.rows;
                for row in &mut rows {
                    if row.is_entity(change.kind, change.entity_id) {
                        row.bookmark_id = change.bookmark_id;
                    }
                }
                Transition::to(ListState { rows, ..state })
            }
        }
    }

    fn transform(&self) -> MutationStream<ListMutation> {
        self.relay
            .subscribe()
            .into_stream(self.kind)
            .map(ListMutation::BookmarkChanged)
            .boxed()
    }
}
