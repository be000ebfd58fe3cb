//! Error types for the Discord relay.

use bridge_core::BridgeError;
use miette::Diagnostic;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, RelayError>;

#[derive(Debug, Error, Diagnostic)]
pub enum RelayError {
    #[error("Failed to start Discord client")]
    #[diagnostic(
        code(bridge_discord::client),
        help("Check DISCORD_TOKEN and that the bot has been invited to the guild")
    )]
    Client(#[source] serenity::Error),

    #[error("Failed to respond to interaction")]
    #[diagnostic(code(bridge_discord::respond))]
    Respond(#[source] serenity::Error),

    #[error(transparent)]
    #[diagnostic(transparent)]
    Bridge(#[from] BridgeError),
}
