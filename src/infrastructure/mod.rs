//! Adapters behind the ports, configuration and wiring.
//!
//! - `config`: settings loaded from the environment
//! - `logging`: tracing subscriber setup
//! - `token_store` / `platform_store`: local storage
//! - `http`: the REST client (feature `http`)
//! - `dependencies`: the container handed to screens

mod config;
mod dependencies;
#[cfg(feature = "http")]
mod http;
mod logging;
mod platform_store;
mod token_store;

pub use config::{AppConfig, ConfigError, LogFormat};
pub use dependencies::{AppDependencies, RemotePorts};
#[cfg(feature = "http")]
pub use http::RestClient;
pub use logging::init_tracing;
pub use platform_store::{FilePlatformStore, InMemoryPlatformStore};
pub use token_store::{FileTokenStore, InMemoryTokenStore};
