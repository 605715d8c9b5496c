//! The runtime that drives a [`Reactor`].
//!
//! ```text
//! send(Action) ──► mutate ──► MutationStream ─┐
//!                                             ├─► reduce ─► watch<State>
//! transform() ──────────────► MutationStream ─┘         └─► Events (once)
//! ```
//!
//! All mutation streams are merged inside one driver task and `reduce` is
//! applied there, one mutation at a time. Two rapid actions can interleave
//! their mutations but never corrupt state.
//!
//! Mutations a fresh stream yields without waiting (`just`, the head of a
//! `concat`) are reduced before the next action is read, so `mutate` always
//! sees flags such as "request in flight" set by earlier actions.

use std::fmt;

use futures::FutureExt;
use futures::stream::{SelectAll, StreamExt};
use thiserror::Error;
use tokio::sync::{mpsc, watch};
use tokio::task::JoinHandle;
use tracing::Instrument;

use super::{MutationStream, Reactor, Transition};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum ReactorError {
    #[error("reactor has been disposed")]
    Disposed,
}

// =============================================================================
// Store
// =============================================================================

/// Owns the pipeline of one screen instance.
///
/// Dropping the store disposes the pipeline: the driver is aborted and
/// in-flight results no longer reach state (the underlying requests are not
/// necessarily cancelled).
pub struct Store<R: Reactor> {
    actions: mpsc::UnboundedSender<R::Action>,
    state: watch::Receiver<R::State>,
    driver: JoinHandle<()>,
}

impl<R: Reactor> Store<R> {
    /// Starts the driver on the current tokio runtime.
    ///
    /// Returns the store and the single consumer of its one-shot events.
    ///
    /// # Panics
    ///
    /// Panics when called outside a tokio runtime.
    pub fn spawn(reactor: R) -> (Self, Events<R::Event>) {
        let (action_sender, action_receiver) = mpsc::unbounded_channel();
        let (event_sender, event_receiver) = mpsc::unbounded_channel();
        let (state_sender, state_receiver) = watch::channel(reactor.initial_state());

        let span = tracing::debug_span!("reactor", name = R::NAME);
        let driver = tokio::spawn(
            drive(reactor, action_receiver, state_sender, event_sender).instrument(span),
        );

        let store = Self {
            actions: action_sender,
            state: state_receiver,
            driver,
        };
        (
            store,
            Events {
                receiver: event_receiver,
            },
        )
    }

    /// Enqueues an action.
    ///
    /// # Errors
    ///
    /// [`ReactorError::Disposed`] once the driver has stopped.
    pub fn send(&self, action: R::Action) -> Result<(), ReactorError> {
        self.actions
            .send(action)
            .map_err(|_| ReactorError::Disposed)
    }

    /// A cloneable handle that only sends actions.
    #[must_use]
    pub fn dispatcher(&self) -> Dispatcher<R::Action> {
        Dispatcher {
            actions: self.actions.clone(),
        }
    }

    /// Latest published state.
    #[must_use]
    pub fn current_state(&self) -> R::State {
        self.state.borrow().clone()
    }

    /// A fresh observer of the durable state. Observers may come and go;
    /// each new one starts from the latest state.
    #[must_use]
    pub fn observe(&self) -> watch::Receiver<R::State> {
        self.state.clone()
    }

    /// Waits until the state satisfies `predicate` and returns it.
    ///
    /// Returns `None` if the driver stops first.
    pub async fn wait_for(&self, predicate: impl FnMut(&R::State) -> bool) -> Option<R::State> {
        let mut observer = self.state.clone();
        observer
            .wait_for(predicate)
            .await
            .ok()
            .map(|state| state.clone())
    }
}

impl<R: Reactor> Drop for Store<R> {
    fn drop(&mut self) {
        self.driver.abort();
    }
}

impl<R: Reactor> fmt::Debug for Store<R> {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter
            .debug_struct("Store")
            .field("reactor", &R::NAME)
            .field("state", &*self.state.borrow())
            .finish_non_exhaustive()
    }
}

// =============================================================================
// Dispatcher / Events
// =============================================================================

pub struct Dispatcher<A> {
    actions: mpsc::UnboundedSender<A>,
}

impl<A> Clone for Dispatcher<A> {
    fn clone(&self) -> Self {
        Self {
            actions: self.actions.clone(),
        }
    }
}

impl<A> Dispatcher<A> {
    /// # Errors
    ///
    /// [`ReactorError::Disposed`] once the driver has stopped.
    pub fn send(&self, action: A) -> Result<(), ReactorError> {
        self.actions
            .send(action)
            .map_err(|_| ReactorError::Disposed)
    }
}

/// Single-consumer channel of one-shot events (routes, toasts).
///
/// Each event is delivered exactly once; it is never replayed to a new
/// observer.
#[derive(Debug)]
pub struct Events<E> {
    receiver: mpsc::UnboundedReceiver<E>,
}

impl<E> Events<E> {
    /// Next event, or `None` once the store is gone and the queue drained.
    pub async fn next(&mut self) -> Option<E> {
        self.receiver.recv().await
    }

    /// Next event if one is already queued.
    pub fn try_next(&mut self) -> Option<E> {
        self.receiver.try_recv().ok()
    }
}

// =============================================================================
// Driver
// =============================================================================

async fn drive<R: Reactor>(
    reactor: R,
    mut actions: mpsc::UnboundedReceiver<R::Action>,
    state_sender: watch::Sender<R::State>,
    event_sender: mpsc::UnboundedSender<R::Event>,
) {
    let mut in_flight: SelectAll<MutationStream<R::Mutation>> = SelectAll::new();
    in_flight.push(reactor.transform());
    let mut state = state_sender.borrow().clone();
    let mut accepting = true;

    loop {
        tokio::select! {
            action = actions.recv(), if accepting => match action {
                Some(action) => {
                    tracing::debug!(?action, "action");
                    let mut mutations = reactor.mutate(action, &state);
                    loop {
                        let ready = mutations.next().now_or_never();
                        match ready {
                            Some(Some(mutation)) => {
                                state = apply::<R>(state, mutation, &state_sender, &event_sender);
                            }
                            Some(None) => break,
                            None => {
                                in_flight.push(mutations);
                                break;
                            }
                        }
                    }
                }
                None => accepting = false,
            },
            Some(mutation) = in_flight.next(), if !in_flight.is_empty() => {
                state = apply::<R>(state, mutation, &state_sender, &event_sender);
            },
            else => break,
        }
    }
    tracing::debug!("reactor driver finished");
}

fn apply<R: Reactor>(
    state: R::State,
    mutation: R::Mutation,
    state_sender: &watch::Sender<R::State>,
    event_sender: &mpsc::UnboundedSender<R::Event>,
) -> R::State {
    tracing::trace!(?mutation, "mutation");
    let Transition { state, events } = R::reduce(state, mutation);
    state_sender.send_replace(state.clone());
    for event in events {
        tracing::debug!(?event, "event");
        if event_sender.send(event).is_err() {
            tracing::trace!("event receiver dropped");
        }
    }
    state
}
