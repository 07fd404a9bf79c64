//! # cascade-config
//!
//! Versioned, hierarchical configuration distribution over HTTP with cascade
//! precedence and multi-endpoint failover.
//!
//! ## Overview
//!
//! `cascade-config` resolves configuration for an `(application, profile,
//! label)` request by cascading across every combination of the request's
//! comma-lists against a pluggable backing store, producing one
//! precedence-ordered [`Environment`](environment::Environment). On the
//! consuming side, a retrieval client fetches that environment from an
//! ordered list of candidate servers with a configurable failover policy
//! that distinguishes timeouts, not-found results, client errors, server
//! errors, and ambiguous non-error responses.
//!
//! ## Server side
//!
//! ```rust,no_run
//! use cascade_config::prelude::*;
//! # use std::sync::Arc;
//! # fn example(store: Arc<dyn cascade_config::server::BackingStore>) -> Result<()> {
//! let engine = AssemblyEngine::builder(store)
//!     .with_default_label("main")
//!     .build();
//!
//! // "production" overrides "default"; "myapp" overrides "application".
//! let environment = engine.resolve("myapp", "production", "")?;
//! # Ok(())
//! # }
//! ```
//!
//! ## Client side
//!
//! ```rust,no_run
//! use cascade_config::prelude::*;
//!
//! # async fn example() -> Result<()> {
//! let settings = ClientSettings::builder()
//!     .with_uris(["http://config-a:8888", "http://config-b:8888"])
//!     .with_name("myapp")
//!     .with_profile("production")
//!     .with_label("main")
//!     .with_fail_fast(true)
//!     .build()?;
//!
//! let client = RetrievalClient::new(settings)?;
//! let environment = client.load().await?;
//! # Ok(())
//! # }
//! ```
//!
//! Storage backends, format parsing, encryption, and the HTTP server
//! surface are deliberately out of scope: implement
//! [`BackingStore`](server::BackingStore) and
//! [`DiscoveryLookup`](client::DiscoveryLookup) to plug in your own.

#![warn(missing_docs, rust_2024_compatibility)]
#![deny(unsafe_code)]

pub mod client;
pub mod environment;
pub mod error;
pub mod server;

/// Convenient re-exports for common usage patterns.
pub mod prelude {
    pub use crate::client::{ClientSettings, MultipleUriStrategy, RetrievalClient};
    pub use crate::environment::{Environment, PropertySource};
    pub use crate::error::{ConfigError, Result};
    pub use crate::server::{AssemblyEngine, AssemblyEngineBuilder};
}
