//! Application state

use std::sync::Arc;

use bridge_core::{BridgeConfig, JobQueue, SharedSecret};

/// Per-service state handed to every handler.
///
/// The queue lives exactly as long as the service that owns it.
#[derive(Clone, Debug)]
pub struct AppState {
    pub queue: Arc<JobQueue>,
    pub secret: SharedSecret,
}

impl AppState {
    pub fn new(config: &BridgeConfig) -> Self {
        Self::with_queue(config.secret.clone(), Arc::new(JobQueue::new()))
    }

    pub fn with_queue(secret: SharedSecret, queue: Arc<JobQueue>) -> Self {
        Self { queue, secret }
    }
}
