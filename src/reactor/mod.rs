//! Unidirectional state engine: Action → Mutation → State.
//!
//! Each screen implements [`Reactor`] once and is run by a [`Store`]:
//!
//! - `mutate` maps an action to a stream of mutations. It may fan out
//!   ([`mutation::merge`]) or sequence ([`mutation::concat`]) workflow
//!   calls, and must turn failures into mutations: the stream carries
//!   plain mutations, never errors.
//! - `reduce` is pure, synchronous and total; it is the only place state
//!   is written.
//! - One-shot effects (routes, toasts) are returned from `reduce` as
//!   events and delivered once on a separate channel instead of living in
//!   the observed state.
//!
//! # Example
//!
//! ```rust
//! use companion_core::reactor::{Reactor, Store, Transition, mutation::{self, MutationStream}};
//!
//! struct Counter;
//!
//! #[derive(Debug)]
//! enum Action { Increment }
//!
//! #[derive(Debug)]
//! enum Mutation { Add(i32) }
//!
//! impl Reactor for Counter {
//!     const NAME: &'static str = "counter";
//!     type Action = Action;
//!     type Mutation = Mutation;
//!     type State = i32;
//!     type Event = ();
//!
//!     fn initial_state(&self) -> i32 { 0 }
//!
//!     fn mutate(&self, action: Action, _state: &i32) -> MutationStream<Mutation> {
//!         match action {
//!             Action::Increment => mutation::just(Mutation::Add(1)),
//!         }
//!     }
//!
//!     fn reduce(state: i32, mutation: Mutation) -> Transition<i32, ()> {
//!         match mutation {
//!             Mutation::Add(amount) => Transition::to(state + amount),
//!         }
//!     }
//! }
//!
//! # tokio::runtime::Builder::new_current_thread().enable_all().build().unwrap().block_on(async {
//! let (store, _events) = Store::spawn(Counter);
//! store.send(Action::Increment).unwrap();
//! assert_eq!(store.wait_for(|count| *count == 1).await, Some(1));
//! # });
//! ```

pub mod mutation;
mod pulse;
mod store;

use std::fmt;

pub use mutation::MutationStream;
pub use pulse::{Pulse, PulseReader, PulseSource};
pub use store::{Dispatcher, Events, ReactorError, Store};

/// Result of one `reduce` step.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Transition<S, E> {
    pub state: S,
    pub events: Vec<E>,
}

impl<S, E> Transition<S, E> {
    /// New state, no event.
    pub const fn to(state: S) -> Self {
        Self {
            state,
            events: Vec::new(),
        }
    }

    /// New state plus one event.
    pub fn with_event(state: S, event: E) -> Self {
        Self {
            state,
            events: vec![event],
        }
    }
}

/// One screen's state machine.
pub trait Reactor: Send + 'static {
    /// Used for the tracing span of the store.
    const NAME: &'static str;

    type Action: fmt::Debug + Send + 'static;
    type Mutation: fmt::Debug + Send + 'static;
    type State: Clone + fmt::Debug + Send + Sync + 'static;
    type Event: fmt::Debug + Send + 'static;

    fn initial_state(&self) -> Self::State;

    /// Maps an action to mutations.
    ///
    /// `state` already includes every mutation earlier actions yielded
    /// without waiting. Results of requests still in flight are not in it.
    fn mutate(&self, action: Self::Action, state: &Self::State) -> MutationStream<Self::Mutation>;

    /// Pure state transition.
    fn reduce(state: Self::State, mutation: Self::Mutation) -> Transition<Self::State, Self::Event>;

    /// Mutations from outside the screen (for example the bookmark relay),
    /// merged for the lifetime of the store.
    fn transform(&self) -> MutationStream<Self::Mutation> {
        mutation::empty()
    }
}
