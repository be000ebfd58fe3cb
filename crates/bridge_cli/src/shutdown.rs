//! Ctrl-C fan-out to every long-running half of the process.

use std::future::Future;

use tokio::sync::watch;

#[derive(Clone)]
pub struct Shutdown {
    rx: watch::Receiver<bool>,
}

impl Shutdown {
    /// Trip on the first Ctrl-C.
    pub fn on_ctrl_c() -> Self {
        let (tx, rx) = watch::channel(false);
        tokio::spawn(async move {
            match tokio::signal::ctrl_c().await {
                Ok(()) => {
                    tracing::info!("Ctrl-C received, shutting down");
                    let _ = tx.send(true);
                }
                Err(e) => {
                    // Without a signal handler we just run until killed
                    tracing::warn!(error = %e, "could not listen for Ctrl-C");
                    std::future::pending::<()>().await;
                }
            }
        });
        Self { rx }
    }

    /// Resolves once shutdown has been requested.
    pub fn wait(&self) -> impl Future<Output = ()> + Send + 'static {
        let mut rx = self.rx.clone();
        async move {
            let _ = rx.wait_for(|stop| *stop).await;
        }
    }
}
