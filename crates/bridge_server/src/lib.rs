//! Bridge Server - HTTP job queue for the game server
//!
//! Two authenticated endpoints over one [`JobQueue`](bridge_core::JobQueue):
//!
//! - `POST /enqueue` appends a job (secret in the `x-secret` header)
//! - `GET /jobs?key=...` returns every pending job and clears the queue
//!
//! `GET /health` reports how many jobs are waiting without touching them.

pub mod error;
pub mod routes;
pub mod state;

pub use error::{ServerError, ServerResult};
pub use routes::router;
pub use state::AppState;

use std::future::Future;

use bridge_core::BridgeConfig;
use tokio::net::TcpListener;

/// Bind the configured address and serve until `shutdown` resolves.
pub async fn serve(
    config: &BridgeConfig,
    state: AppState,
    shutdown: impl Future<Output = ()> + Send + 'static,
) -> ServerResult<()> {
    let addr = config.socket_addr();
    let listener = TcpListener::bind(addr)
        .await
        .map_err(|source| ServerError::Bind { addr, source })?;
    serve_on(listener, state, shutdown).await
}

/// Serve on an already bound listener.
pub async fn serve_on(
    listener: TcpListener,
    state: AppState,
    shutdown: impl Future<Output = ()> + Send + 'static,
) -> ServerResult<()> {
    let addr = listener.local_addr().map_err(ServerError::Serve)?;
    tracing::info!(%addr, "Bridge running");

    axum::serve(listener, router(state))
        .with_graceful_shutdown(shutdown)
        .await
        .map_err(ServerError::Serve)?;

    tracing::info!("Bridge stopped");
    Ok(())
}
