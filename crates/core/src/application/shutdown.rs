// Worker Shutdown Token

use crate::error::{AppError, Result};
use std::future::Future;
use tokio::sync::watch;

/// Shutdown signal for graceful termination
#[derive(Clone)]
pub struct ShutdownToken {
    rx: watch::Receiver<bool>,
}

impl ShutdownToken {
    /// Check if shutdown was requested
    pub fn is_shutdown(&self) -> bool {
        *self.rx.borrow()
    }

    /// Wait for shutdown signal
    ///
    /// Returns immediately if shutdown was already requested. If the sender
    /// is dropped without signalling, this never resolves.
    pub async fn wait(&mut self) {
        if self.rx.wait_for(|stop| *stop).await.is_err() {
            std::future::pending::<()>().await;
        }
    }

    /// Drive `fut` unless shutdown arrives first.
    ///
    /// On shutdown the future is dropped, which releases whatever it held
    /// (sockets, cursors), and `AppError::Cancelled` is returned.
    pub async fn until_shutdown<F>(&mut self, fut: F) -> Result<F::Output>
    where
        F: Future,
    {
        if self.is_shutdown() {
            return Err(AppError::Cancelled);
        }
        tokio::select! {
            biased;
            _ = self.wait() => Err(AppError::Cancelled),
            output = fut => Ok(output),
        }
    }
}

/// Shutdown sender
pub struct ShutdownSender {
    tx: watch::Sender<bool>,
}

impl ShutdownSender {
    /// Signal shutdown to the worker
    pub fn shutdown(&self) {
        let _ = self.tx.send(true);
    }
}

/// Create a shutdown channel
pub fn shutdown_channel() -> (ShutdownSender, ShutdownToken) {
    let (tx, rx) = watch::channel(false);
    (ShutdownSender { tx }, ShutdownToken { rx })
}
