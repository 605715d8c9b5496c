//! # companion-core
//!
//! Headless core of a game-companion dictionary client: session and token
//! handling, a unidirectional state engine for screens, and the bookmark
//! flow that keeps detail and list screens consistent.
//!
//! ## Layers
//!
//! - [`domain`]: plain data (tokens, entities, validated inputs)
//! - [`ports`]: traits for storage and the remote API
//! - [`workflows`]: use cases composed as [`effect::AsyncIO`] descriptions
//! - [`reactor`]: the Action → Mutation → State engine
//! - [`screens`]: one reactor per screen
//! - [`relay`], [`overlay`], [`navigation`]: app-wide channels
//! - [`infrastructure`]: configuration, logging, stores, HTTP client
//!
//! ## Example
//!
//! ```rust,ignore
//! use companion_core::infrastructure::{AppConfig, AppDependencies, init_tracing};
//! use companion_core::reactor::Store;
//! use companion_core::screens::{SplashAction, SplashRoute};
//!
//! let config = AppConfig::from_env()?;
//! init_tracing(&config)?;
//! let dependencies = AppDependencies::from_config(&config)?;
//!
//! let (splash, mut routes) = Store::spawn(dependencies.splash());
//! splash.send(SplashAction::Appear)?;
//! match routes.next().await {
//!     Some(SplashRoute::Home) => { /* show tabs */ }
//!     _ => { /* show login */ }
//! }
//! ```

#![forbid(unsafe_code)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![warn(clippy::nursery)]
// Note: Disabling redundant_closure_for_method_calls due to clippy 0.1.92 panic bug
#![allow(clippy::redundant_closure_for_method_calls)]

pub mod domain;
pub mod effect;
pub mod errors;
pub mod infrastructure;
pub mod navigation;
pub mod overlay;
pub mod ports;
pub mod reactor;
pub mod relay;
pub mod screens;
pub mod workflows;
