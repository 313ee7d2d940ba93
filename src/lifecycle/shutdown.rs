//! Stop signal shared by the signal listener, the HTTP server and tests.

use tokio::sync::broadcast;

/// One-shot stop signal for the running service.
///
/// `HttpServer::run` holds a receiver and starts draining when it fires;
/// `lifecycle::signals` or a test fires it.
#[derive(Debug, Clone)]
pub struct Shutdown {
    tx: broadcast::Sender<()>,
}

impl Shutdown {
    pub fn new() -> Self {
        let (tx, _) = broadcast::channel(1);
        Self { tx }
    }

    /// Receiver for the server's graceful-shutdown future. Subscribe before
    /// triggering; a late receiver never sees the signal.
    pub fn subscribe(&self) -> broadcast::Receiver<()> {
        self.tx.subscribe()
    }

    /// Begin draining. Harmless when nothing is serving yet.
    pub fn trigger(&self) {
        let _ = self.tx.send(());
    }
}

impl Default for Shutdown {
    fn default() -> Self {
        Self::new()
    }
}
