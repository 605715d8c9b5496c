//! Building blocks for `Reactor::mutate`.
//!
//! - [`merge`]: run sources concurrently, emit in completion order
//! - [`concat`]: run sources one after another, preserving order
//! - [`and_then`]: pick the next mutations from an effect's output
//!
//! ```rust
//! use companion_core::reactor::mutation::{concat, just, merge};
//!
//! # #[derive(Debug)]
//! # enum Mutation { Loading(bool), Loaded(u32) }
//! let stream = concat(vec![
//!     just(Mutation::Loading(true)),
//!     merge(vec![just(Mutation::Loaded(1)), just(Mutation::Loaded(2))]),
//!     just(Mutation::Loading(false)),
//! ]);
//! # drop(stream);
//! ```

use std::future::Future;

use futures::stream::{self, BoxStream, StreamExt};

use crate::effect::AsyncIO;

/// Stream of mutations produced for one action.
pub type MutationStream<M> = BoxStream<'static, M>;

/// A single mutation.
pub fn just<M: Send + 'static>(mutation: M) -> MutationStream<M> {
    stream::once(futures::future::ready(mutation)).boxed()
}

/// No mutation.
pub fn empty<M: Send + 'static>() -> MutationStream<M> {
    stream::empty().boxed()
}

/// The output of a future, as one mutation.
pub fn from_future<M, Fut>(future: Fut) -> MutationStream<M>
where
    M: Send + 'static,
    Fut: Future<Output = M> + Send + 'static,
{
    stream::once(future).boxed()
}

/// Runs a deferred effect when the stream is first polled.
pub fn from_async_io<M: Send + 'static>(async_io: AsyncIO<M>) -> MutationStream<M> {
    from_future(async_io.run_async())
}

/// Concurrent sources; no ordering between them.
pub fn merge<M: Send + 'static>(streams: Vec<MutationStream<M>>) -> MutationStream<M> {
    stream::select_all(streams).boxed()
}

/// Sequential sources; each starts once the previous one has finished.
pub fn concat<M: Send + 'static>(streams: Vec<MutationStream<M>>) -> MutationStream<M> {
    stream::iter(streams).flatten().boxed()
}

/// Runs `async_io`, then continues with the mutations chosen from its
/// output. Use when a later step depends on an earlier result.
pub fn and_then<A, M, F>(async_io: AsyncIO<A>, next: F) -> MutationStream<M>
where
    A: Send + 'static,
    M: Send + 'static,
    F: FnOnce(A) -> MutationStream<M> + Send + 'static,
{
    stream::once(async move { next(async_io.run_async().await) })
        .flatten()
        .boxed()
}
