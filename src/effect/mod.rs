//! Deferred effects used at every port boundary.
//!
//! Ports return [`AsyncIO`] values instead of running futures directly, so a
//! workflow is a description that the caller (usually a reactor) executes.
//!
//! ```rust
//! use companion_core::effect::AsyncIO;
//!
//! let describe: AsyncIO<Result<i32, String>> = AsyncIO::pure(Ok(20))
//!     .fmap_ok(|value| value + 1)
//!     .flat_map_ok(|value| AsyncIO::pure(Ok(value * 2)));
//! # let _ = describe;
//! ```

mod async_io;

pub use async_io::AsyncIO;
