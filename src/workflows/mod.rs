//! Application use cases.
//!
//! Workflows compose port calls into [`AsyncIO`](crate::effect::AsyncIO)
//! descriptions and never hold state of their own. Reactors run them and
//! turn their results into mutations.

pub mod auth;
pub mod bookmark;
pub mod dictionary;
pub mod member;
