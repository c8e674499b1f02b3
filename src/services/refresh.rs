//! Periodic background refresh with a cancelling handle

use std::{future::Future, time::Duration};
use tokio::{task::JoinHandle, time::MissedTickBehavior};
use tokio_util::sync::CancellationToken;

/// Handle to a task that runs a refresh immediately, then once per period.
///
/// The task stops when [`stop`](Self::stop) is called or the handle is
/// dropped.
pub struct ScheduledRefresh {
    shutdown: CancellationToken,
    handle: Option<JoinHandle<()>>,
}

impl ScheduledRefresh {
    pub fn spawn<F, Fut>(period: Duration, mut refresh: F) -> Self
    where
        F: FnMut() -> Fut + Send + 'static,
        Fut: Future<Output = ()> + Send + 'static,
    {
        let shutdown = CancellationToken::new();
        let token = shutdown.clone();

        let handle = tokio::spawn(async move {
            let mut ticker = tokio::time::interval(period);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
            tracing::debug!("Scheduled refresh started (every {:?})", period);

            loop {
                tokio::select! {
                    biased;
                    _ = token.cancelled() => break,
                    _ = ticker.tick() => {
                        tokio::select! {
                            biased;
                            _ = token.cancelled() => break,
                            _ = refresh() => {}
                        }
                    }
                }
            }

            tracing::debug!("Scheduled refresh stopped");
        });

        Self {
            shutdown,
            handle: Some(handle),
        }
    }

    pub fn is_running(&self) -> bool {
        !self.shutdown.is_cancelled()
    }

    /// Cancel the task and wait for it to finish
    pub async fn stop(mut self) {
        self.shutdown.cancel();
        if let Some(handle) = self.handle.take() {
            if let Err(e) = handle.await {
                tracing::warn!("Scheduled refresh ended abnormally: {}", e);
            }
        }
    }
}

impl Drop for ScheduledRefresh {
    fn drop(&mut self) {
        self.shutdown.cancel();
    }
}
