//! Bridge Core - Job model and queue for the clean bridge
//!
//! This crate holds everything the bridge service and the Discord relay
//! share: the [`Job`] entity and its wire shape, the owned [`JobQueue`],
//! environment configuration, and the error types.
//!
//! With the `client` feature enabled it also provides [`BridgeClient`],
//! the HTTP client the relay (and the operator CLI) use to talk to a
//! running bridge.

#[cfg(feature = "client")]
pub mod client;
pub mod config;
pub mod error;
pub mod job;
pub mod queue;
pub mod wire;

#[cfg(feature = "client")]
pub use client::BridgeClient;
pub use config::{BridgeConfig, RelayConfig, SharedSecret};
pub use error::{BridgeError, ConfigError, Result};
pub use job::{Job, JobAction};
pub use queue::JobQueue;
pub use wire::{EnqueueAck, parse_enqueue_body};
