//! `AsyncIO` - deferred asynchronous side effects.
//!
//! An `AsyncIO<A>` describes an asynchronous computation producing `A`.
//! Nothing runs until [`AsyncIO::run_async`] is awaited, so ports and
//! workflows can build whole pipelines as values and hand them to the
//! reactor engine, which decides when (and whether) to execute them.
//!
//! # Examples
//!
//! ```rust
//! use companion_core::effect::AsyncIO;
//!
//! # tokio_test_block_on(async {
//! let async_io = AsyncIO::pure(10)
//!     .fmap(|x| x * 2)
//!     .flat_map(|x| AsyncIO::pure(x + 1));
//! assert_eq!(async_io.run_async().await, 21);
//! # });
//! # fn tokio_test_block_on<F: std::future::Future>(future: F) -> F::Output {
//! #     tokio::runtime::Builder::new_current_thread().build().unwrap().block_on(future)
//! # }
//! ```

use std::future::Future;
use std::pin::Pin;

/// A deferred asynchronous computation.
///
/// The wrapped closure is invoked exactly once, by [`AsyncIO::run_async`].
pub struct AsyncIO<A> {
    run_async_io: Box<dyn FnOnce() -> Pin<Box<dyn Future<Output = A> + Send>> + Send>,
}

// =============================================================================
// Constructors
// =============================================================================

impl<A: 'static> AsyncIO<A> {
    /// Creates an `AsyncIO` from a closure returning a future.
    ///
    /// The closure is not called until the action is run.
    pub fn new<F, Fut>(action: F) -> Self
    where
        F: FnOnce() -> Fut + Send + 'static,
        Fut: Future<Output = A> + Send + 'static,
    {
        Self {
            run_async_io: Box::new(move || Box::pin(action())),
        }
    }
}

impl<A: Send + 'static> AsyncIO<A> {
    /// Lifts a value without performing any effect.
    pub fn pure(value: A) -> Self {
        Self {
            run_async_io: Box::new(move || Box::pin(async move { value })),
        }
    }
}

// =============================================================================
// Execution
// =============================================================================

impl<A: 'static> AsyncIO<A> {
    /// Runs the described computation.
    pub async fn run_async(self) -> A {
        (self.run_async_io)().await
    }
}

// =============================================================================
// Functor / Monad
// =============================================================================

impl<A: 'static> AsyncIO<A> {
    /// Maps the produced value.
    pub fn fmap<B, F>(self, function: F) -> AsyncIO<B>
    where
        F: FnOnce(A) -> B + Send + 'static,
        B: 'static,
    {
        AsyncIO::new(move || async move {
            let value = self.run_async().await;
            function(value)
        })
    }

    /// Sequences a dependent computation.
    pub fn flat_map<B, F>(self, function: F) -> AsyncIO<B>
    where
        F: FnOnce(A) -> AsyncIO<B> + Send + 'static,
        B: 'static,
    {
        AsyncIO::new(move || async move {
            let value = self.run_async().await;
            function(value).run_async().await
        })
    }

    /// Runs both computations concurrently and pairs their results.
    pub fn par<B: Send + 'static>(self, other: AsyncIO<B>) -> AsyncIO<(A, B)>
    where
        A: Send,
    {
        AsyncIO::new(move || async move { futures::join!(self.run_async(), other.run_async()) })
    }
}

// =============================================================================
// Result helpers
// =============================================================================

impl<A, E> AsyncIO<Result<A, E>>
where
    A: Send + 'static,
    E: Send + 'static,
{
    /// Maps the success value, leaving errors untouched.
    pub fn fmap_ok<B, F>(self, function: F) -> AsyncIO<Result<B, E>>
    where
        F: FnOnce(A) -> B + Send + 'static,
        B: 'static,
    {
        self.fmap(move |result| result.map(function))
    }

    /// Maps the error value.
    pub fn fmap_err<E2, F>(self, function: F) -> AsyncIO<Result<A, E2>>
    where
        F: FnOnce(E) -> E2 + Send + 'static,
        E2: 'static,
    {
        self.fmap(move |result| result.map_err(function))
    }

    /// Sequences a fallible step; an error short-circuits the rest.
    pub fn flat_map_ok<B, F>(self, function: F) -> AsyncIO<Result<B, E>>
    where
        F: FnOnce(A) -> AsyncIO<Result<B, E>> + Send + 'static,
        B: Send + 'static,
    {
        self.flat_map(move |result| match result {
            Ok(value) => function(value),
            Err(error) => AsyncIO::pure(Err(error)),
        })
    }

    /// Replaces any error with a value computed from it.
    pub fn recover<F>(self, handler: F) -> AsyncIO<A>
    where
        F: FnOnce(E) -> A + Send + 'static,
    {
        self.fmap(move |result| result.unwrap_or_else(handler))
    }
}

impl<A> std::fmt::Debug for AsyncIO<A> {
    fn fmt(&self, formatter: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(formatter, "<AsyncIO>")
    }
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;
    use std::sync::Arc;
    use std::sync::atomic::{AtomicBool, Ordering};

    #[rstest]
    #[tokio::test]
    async fn construction_does_not_run_the_effect() {
        let executed = Arc::new(AtomicBool::new(false));
        let flag = Arc::clone(&executed);
        let async_io = AsyncIO::new(move || async move {
            flag.store(true, Ordering::SeqCst);
            1
        });

        assert!(!executed.load(Ordering::SeqCst));
        assert_eq!(async_io.run_async().await, 1);
        assert!(executed.load(Ordering::SeqCst));
    }

    #[rstest]
    #[tokio::test]
    async fn flat_map_ok_short_circuits_on_error() {
        let reached = Arc::new(AtomicBool::new(false));
        let flag = Arc::clone(&reached);
        let async_io: AsyncIO<Result<i32, &str>> = AsyncIO::pure(Err("boom")).flat_map_ok(
            move |value: i32| {
                flag.store(true, Ordering::SeqCst);
                AsyncIO::pure(Ok(value))
            },
        );

        assert_eq!(async_io.run_async().await, Err("boom"));
        assert!(!reached.load(Ordering::SeqCst));
    }

    #[rstest]
    #[case(Ok(3), 3)]
    #[case(Err("lost"), -1)]
    #[tokio::test]
    async fn recover_replaces_errors(
        #[case] input: Result<i32, &'static str>,
        #[case] expected: i32,
    ) {
        let value = AsyncIO::pure(input).recover(|_| -1).run_async().await;
        assert_eq!(value, expected);
    }

    #[rstest]
    #[tokio::test]
    async fn par_returns_both_results() {
        let (left, right) = AsyncIO::pure("a").par(AsyncIO::pure(2)).run_async().await;
        assert_eq!((left, right), ("a", 2));
    }
}
