//! Error types for bridge_core.

use miette::Diagnostic;
use thiserror::Error;

/// Result type for bridge operations.
pub type Result<T> = std::result::Result<T, BridgeError>;

/// Configuration-specific errors
#[derive(Error, Diagnostic, Debug, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum ConfigError {
    #[error("Missing required environment variable: {var}")]
    #[diagnostic(
        code(bridge_core::config::missing),
        help("Set {var} in the environment or in a .env file")
    )]
    Missing { var: &'static str },

    #[error("Invalid value for {var}: {reason}")]
    #[diagnostic(code(bridge_core::config::invalid))]
    Invalid { var: &'static str, reason: String },
}

#[derive(Error, Diagnostic, Debug)]
pub enum BridgeError {
    /// Credential did not match the configured shared secret.
    #[error("Unauthorized")]
    #[diagnostic(
        code(bridge_core::unauthorized),
        help("The shared secret sent with the request does not match SECRET_KEY")
    )]
    Unauthorized,

    /// Enqueue body was not a valid job submission.
    #[error("Malformed job submission: {reason}")]
    #[diagnostic(
        code(bridge_core::malformed_input),
        help("Expected a JSON object like {{\"action\":\"clean\",\"userId\":42}}")
    )]
    MalformedInput { reason: String },

    #[error(transparent)]
    #[diagnostic(transparent)]
    Config(#[from] ConfigError),

    /// The bridge answered with a non-success status.
    #[error("Bridge returned HTTP {status}: {body}")]
    #[diagnostic(code(bridge_core::upstream_status))]
    Upstream { status: u16, body: String },

    #[cfg(feature = "client")]
    #[error("HTTP request to bridge failed: {0}")]
    #[diagnostic(
        code(bridge_core::http),
        help("Check that BRIDGE_URL points at a running bridge")
    )]
    Http(#[from] reqwest::Error),
}

impl BridgeError {
    pub fn malformed(reason: impl Into<String>) -> Self {
        Self::MalformedInput {
            reason: reason.into(),
        }
    }
}
