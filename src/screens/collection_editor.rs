use std::sync::Arc;

use crate::domain::{Collection, CollectionName, ValidationError};
use crate::errors::WorkflowError;
use crate::ports::CollectionApi;
use crate::reactor::mutation::{self, MutationStream};
use crate::reactor::{Reactor, Transition};
use crate::workflows::member::create_collection;

/// Name input and save button of the "new collection" sheet.
pub struct CollectionEditorReactor {
    collections: Arc<dyn CollectionApi>,
}

impl CollectionEditorReactor {
    #[must_use]
    pub fn new(collections: Arc<dyn CollectionApi>) -> Self {
        Self { collections }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CollectionEditorAction {
    UpdateName(String),
    Save,
}

#[derive(Debug, Clone)]
pub enum CollectionEditorMutation {
    SetName(String),
    SetSaving(bool),
    Saved(Collection),
    Failed(WorkflowError),
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct CollectionEditorState {
    pub name: String,
    /// Drives the red hint under the input; recomputed on every edit.
    pub validation_error: Option<ValidationError>,
    pub is_saving: bool,
}

impl CollectionEditorState {
    #[must_use]
    pub const fn can_save(&self) -> bool {
        self.validation_error.is_none() && !self.name.is_empty() && !self.is_saving
    }
}

#[derive(Debug, Clone)]
pub enum CollectionEditorEvent {
    Created(Collection),
    Failed(WorkflowError),
}

impl Reactor for CollectionEditorReactor {
    const NAME: &'static str = "collection_editor";

    type Action = CollectionEditorAction;
    type Mutation = CollectionEditorMutation;
    type State = CollectionEditorState;
    type Event = CollectionEditorEvent;

    fn initial_state(&self) -> CollectionEditorState {
        CollectionEditorState::default()
    }

    fn mutate(
        &self,
        action: CollectionEditorAction,
        state: &CollectionEditorState,
    ) -> MutationStream<CollectionEditorMutation> {
        match action {
            CollectionEditorAction::UpdateName(name) => {
                mutation::just(CollectionEditorMutation::SetName(name))
            }
            CollectionEditorAction::Save => {
                if !state.can_save() {
                    return mutation::empty();
                }
                let request = create_collection(&self.collections, &state.name).fmap(|result| {
                    result.map_or_else(
                        CollectionEditorMutation::Failed,
                        CollectionEditorMutation::Saved,
                    )
                });
                mutation::concat(vec![
                    mutation::just(CollectionEditorMutation::SetSaving(true)),
                    mutation::from_async_io(request),
                    mutation::just(CollectionEditorMutation::SetSaving(false)),
                ])
            }
        }
    }

    fn reduce(
        state: CollectionEditorState,
        mutation: CollectionEditorMutation,
    ) -> Transition<CollectionEditorState, CollectionEditorEvent> {
        match mutation {
            CollectionEditorMutation::SetName(name) => {
                let validation_error = if name.is_empty() {
                    None
                } else {
                    CollectionName::new(&name).err()
                };
                Transition::to(CollectionEditorState {
                    name,
                    validation_error,
                    ..state
                })
            }
            CollectionEditorMutation::SetSaving(is_saving) => {
                Transition::to(CollectionEditorState { is_saving, ..state })
            }
            CollectionEditorMutation::Saved(collection) => {
                Transition::with_event(state, CollectionEditorEvent::Created(collection))
            }
            CollectionEditorMutation::Failed(error) => {
                Transition::with_event(state, CollectionEditorEvent::Failed(error))
            }
        }
    }
}
