//! Bridge Discord - slash command relay
//!
//! Listens for `/clean userid:<n>` in one guild, checks that the caller
//! holds the owner role, and forwards the request to the bridge's enqueue
//! endpoint. The outcome is reported back to the caller.
//!
//! ## Configuration
//!
//! The relay takes a [`RelayConfig`](bridge_core::RelayConfig) loaded once at
//! startup. There are NO runtime environment variable reads in this crate.

pub mod bot;
pub mod commands;
pub mod error;
pub mod relay;

pub use bot::{run_relay, RelayHandler};
pub use commands::{clean_command, is_clean_command, CLEAN_COMMAND, USERID_OPTION};
pub use error::{RelayError, Result};
pub use relay::{relay_clean, JobSubmitter, RelayReply};

// Re-export serenity for convenience
pub use serenity;
