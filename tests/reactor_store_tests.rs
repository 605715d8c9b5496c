//! Integration tests for the reactor runtime: ordering, atomicity,
//! one-shot events, external mutation sources and disposal.

use std::time::Duration;

use companion_core::reactor::mutation::{self, MutationStream};
use companion_core::reactor::{Reactor, ReactorError, Store, Transition};
use futures::StreamExt;
use parking_lot::Mutex;
use rstest::rstest;
use tokio::sync::mpsc;

// =============================================================================
// Test reactor
// =============================================================================

#[derive(Debug)]
enum Action {
    /// `count` increments, each arriving after `step`.
    AddSlowly { count: u32, step: Duration },
    Sequence(Vec<(u32, u64)>),
    Parallel(Vec<(u32, u64)>),
    Announce(&'static str),
    AddNow(u32),
    /// Records `total` as seen by `mutate`.
    RecordTotal,
}

#[derive(Debug)]
enum Mutation {
    Add(u32),
    Record(u32),
    Announce(&'static str),
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
struct State {
    total: u32,
    order: Vec<u32>,
}

struct Counter {
    external: Mutex<Option<mpsc::UnboundedReceiver<u32>>>,
}

impl Counter {
    fn new() -> Self {
        Self {
            external: Mutex::new(None),
        }
    }

    fn with_external(receiver: mpsc::UnboundedReceiver<u32>) -> Self {
        Self {
            external: Mutex::new(Some(receiver)),
        }
    }
}

fn delayed(value: u32, millis: u64) -> MutationStream<Mutation> {
    mutation::from_future(async move {
        tokio::time::sleep(Duration::from_millis(millis)).await;
        Mutation::Record(value)
    })
}

impl Reactor for Counter {
    const NAME: &'static str = "counter";
    type Action = Action;
    type Mutation = Mutation;
    type State = State;
    type Event = &'static str;

    fn initial_state(&self) -> State {
        State::default()
    }

    fn mutate(&self, action: Action, state: &State) -> MutationStream<Mutation> {
        match action {
            Action::AddSlowly { count, step } => futures::stream::iter(0..count)
                .then(move |_| async move {
                    tokio::time::sleep(step).await;
                    Mutation::Add(1)
                })
                .boxed(),
            Action::Sequence(steps) => mutation::concat(
                steps
                    .into_iter()
                    .map(|(value, millis)| delayed(value, millis))
                    .collect(),
            ),
            Action::Parallel(steps) => mutation::merge(
                steps
                    .into_iter()
                    .map(|(value, millis)| delayed(value, millis))
                    .collect(),
            ),
            Action::Announce(message) => mutation::just(Mutation::Announce(message)),
            Action::AddNow(amount) => mutation::just(Mutation::Add(amount)),
            Action::RecordTotal => mutation::just(Mutation::Record(state.total)),
        }
    }

    fn reduce(mut state: State, mutation: Mutation) -> Transition<State, &'static str> {
        match mutation {
            Mutation::Add(amount) => {
                state.total += amount;
                Transition::to(state)
            }
            Mutation::Record(value) => {
                state.order.push(value);
                Transition::to(state)
            }
            Mutation::Announce(message) => Transition::with_event(state, message),
        }
    }

    fn transform(&self) -> MutationStream<Mutation> {
        self.external.lock().take().map_or_else(mutation::empty, |receiver| {
            futures::stream::unfold(receiver, |mut receiver| async move {
                receiver.recv().await.map(|value| (Mutation::Add(value), receiver))
            })
            .boxed()
        })
    }
}

// =============================================================================
// Ordering
// =============================================================================

#[rstest]
#[tokio::test(start_paused = true)]
async fn test_concat_preserves_declared_order() {
    let (store, _events) = Store::spawn(Counter::new());

    store
        .send(Action::Sequence(vec![(1, 30), (2, 10), (3, 20)]))
        .unwrap();

    let state = store.wait_for(|state| state.order.len() == 3).await.unwrap();
    assert_eq!(state.order, vec![1, 2, 3]);
}

#[rstest]
#[tokio::test(start_paused = true)]
async fn test_merge_emits_in_completion_order() {
    let (store, _events) = Store::spawn(Counter::new());

    store
        .send(Action::Parallel(vec![(1, 30), (2, 10), (3, 20)]))
        .unwrap();

    let state = store.wait_for(|state| state.order.len() == 3).await.unwrap();
    assert_eq!(state.order, vec![2, 3, 1]);
}

// =============================================================================
// Atomicity
// =============================================================================

#[rstest]
#[case(2, 50)]
#[case(8, 25)]
#[tokio::test(start_paused = true)]
async fn test_interleaved_actions_never_lose_mutations(
    #[case] actions: u32,
    #[case] increments: u32,
) {
    let (store, _events) = Store::spawn(Counter::new());
    let dispatcher = store.dispatcher();

    for index in 0..actions {
        dispatcher
            .send(Action::AddSlowly {
                count: increments,
                step: Duration::from_millis(u64::from(index % 3 + 1)),
            })
            .unwrap();
    }

    let expected = actions * increments;
    let state = store
        .wait_for(|state| state.total == expected)
        .await
        .unwrap();
    assert_eq!(state.total, expected);
}

#[rstest]
#[tokio::test(start_paused = true)]
async fn test_mutate_sees_ready_mutations_of_earlier_actions() {
    let (store, _events) = Store::spawn(Counter::new());

    store.send(Action::AddNow(3)).unwrap();
    store.send(Action::RecordTotal).unwrap();
    store.send(Action::Sequence(vec![(9, 50)])).unwrap();
    store.send(Action::AddNow(4)).unwrap();
    store.send(Action::RecordTotal).unwrap();

    let state = store.wait_for(|state| state.order.len() == 3).await.unwrap();
    assert_eq!(state.order, vec![3, 7, 9]);
}

// =============================================================================
// Events
// =============================================================================

#[rstest]
#[tokio::test]
async fn test_events_are_delivered_once_and_not_replayed() {
    let (store, mut events) = Store::spawn(Counter::new());

    store.send(Action::Announce("saved")).unwrap();

    assert_eq!(events.next().await, Some("saved"));
    // A late observer gets the durable state only
    let observer = store.observe();
    assert_eq!(*observer.borrow(), State::default());
    assert_eq!(events.try_next(), None);
}

#[rstest]
#[tokio::test]
async fn test_events_keep_emission_order() {
    let (store, mut events) = Store::spawn(Counter::new());

    store.send(Action::Announce("first")).unwrap();
    store.send(Action::Announce("second")).unwrap();

    assert_eq!(events.next().await, Some("first"));
    assert_eq!(events.next().await, Some("second"));
}

// =============================================================================
// External mutations
// =============================================================================

#[rstest]
#[tokio::test]
async fn test_transform_stream_feeds_reduce() {
    let (sender, receiver) = mpsc::unbounded_channel();
    let (store, _events) = Store::spawn(Counter::with_external(receiver));

    sender.send(5).unwrap();
    sender.send(7).unwrap();

    let state = store.wait_for(|state| state.total == 12).await.unwrap();
    assert_eq!(state.total, 12);
}

// =============================================================================
// Disposal
// =============================================================================

#[rstest]
#[tokio::test(start_paused = true)]
async fn test_dropping_store_discards_in_flight_results() {
    let (store, mut events) = Store::spawn(Counter::new());
    let mut observer = store.observe();
    let dispatcher = store.dispatcher();

    store.send(Action::Sequence(vec![(1, 1_000)])).unwrap();
    tokio::task::yield_now().await;
    drop(store);

    assert_eq!(events.next().await, None);
    tokio::time::advance(Duration::from_secs(2)).await;

    assert!(observer.borrow_and_update().order.is_empty());
    assert!(observer.changed().await.is_err());
    assert_eq!(
        dispatcher.send(Action::Announce("late")),
        Err(ReactorError::Disposed)
    );
}
