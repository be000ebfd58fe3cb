//! Error types for the bridge service and their HTTP mapping.

use std::net::SocketAddr;

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use bridge_core::BridgeError;
use miette::Diagnostic;
use thiserror::Error;

pub type ServerResult<T> = Result<T, ServerError>;

#[derive(Debug, Error, Diagnostic)]
pub enum ServerError {
    #[error("Unauthorized")]
    #[diagnostic(code(bridge_server::unauthorized))]
    Unauthorized,

    #[error("Bad request: {0}")]
    #[diagnostic(code(bridge_server::bad_request))]
    BadRequest(String),

    #[error("Failed to bind {addr}")]
    #[diagnostic(
        code(bridge_server::bind),
        help("Is another process already listening on this port? Set PORT to pick another")
    )]
    Bind {
        addr: SocketAddr,
        #[source]
        source: std::io::Error,
    },

    #[error("HTTP server failed")]
    #[diagnostic(code(bridge_server::serve))]
    Serve(#[source] std::io::Error),

    #[error("Internal error: {0}")]
    #[diagnostic(code(bridge_server::internal))]
    Internal(String),
}

impl From<BridgeError> for ServerError {
    fn from(err: BridgeError) -> Self {
        match err {
            BridgeError::Unauthorized => ServerError::Unauthorized,
            BridgeError::MalformedInput { reason } => ServerError::BadRequest(reason),
            other => ServerError::Internal(other.to_string()),
        }
    }
}

impl IntoResponse for ServerError {
    fn into_response(self) -> Response {
        // Status-only responses; details stay in the logs.
        let status = match &self {
            ServerError::Unauthorized => StatusCode::FORBIDDEN,
            ServerError::BadRequest(reason) => {
                tracing::debug!(%reason, "rejected job submission");
                StatusCode::BAD_REQUEST
            }
            other => {
                tracing::error!(error = %other, "request failed");
                StatusCode::INTERNAL_SERVER_ERROR
            }
        };
        status.into_response()
    }
}
