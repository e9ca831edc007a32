//! Cancellable task scheduling.
//!
//! Every timer in halcyon (blink jitter, duration tick, gesture auto-clear,
//! delayed breathing start, the render loop itself) runs as a task owned by
//! a [`Scheduler`]. Each spawn returns a [`TaskHandle`] carrying a child
//! [`CancellationToken`]; cancelling the handle stops that task, and
//! [`Scheduler::shutdown`] cancels the root token and with it every task the
//! scheduler ever spawned. Teardown paths cancel their handles, so no timer
//! can fire against a disposed component.

use std::future::Future;
use std::sync::Arc;
use std::time::Duration;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;

/// Owner of a family of cancellable tasks. Cheap to clone; clones share the
/// same root token.
#[derive(Clone)]
pub struct Scheduler {
    root: Arc<CancellationToken>,
}

/// Handle to one scheduled task.
///
/// Dropping the handle does NOT cancel the task — cancellation is always
/// explicit, either per-handle or through [`Scheduler::shutdown`].
pub struct TaskHandle {
    token: CancellationToken,
    join: JoinHandle<()>,
}

impl TaskHandle {
    /// Stop the task at its next suspension point.
    pub fn cancel(&self) {
        self.token.cancel();
    }

    pub fn is_finished(&self) -> bool {
        self.join.is_finished()
    }

    /// Cancel and wait for the task to wind down.
    pub async fn cancel_and_wait(self) {
        self.token.cancel();
        let _ = self.join.await;
    }
}

impl Scheduler {
    pub fn new() -> Self {
        Self {
            root: Arc::new(CancellationToken::new()),
        }
    }

    /// Whether `shutdown` has been called.
    pub fn is_shut_down(&self) -> bool {
        self.root.is_cancelled()
    }

    /// Spawn a future under this scheduler. The future is dropped at its
    /// next await point once the handle or the scheduler is cancelled.
    pub fn spawn<F>(&self, fut: F) -> TaskHandle
    where
        F: Future<Output = ()> + Send + 'static,
    {
        let token = self.root.child_token();
        let run_token = token.clone();
        let join = tokio::spawn(async move {
            tokio::select! {
                _ = run_token.cancelled() => {}
                _ = fut => {}
            }
        });
        TaskHandle { token, join }
    }

    /// Run `fut` once after `delay`, unless cancelled first.
    pub fn spawn_after<F>(&self, delay: Duration, fut: F) -> TaskHandle
    where
        F: Future<Output = ()> + Send + 'static,
    {
        self.spawn(async move {
            tokio::time::sleep(delay).await;
            fut.await;
        })
    }

    /// Run `tick` every `period` until cancelled. The first tick fires after
    /// one full period, not immediately.
    pub fn spawn_interval<F, Fut>(&self, period: Duration, mut tick: F) -> TaskHandle
    where
        F: FnMut() -> Fut + Send + 'static,
        Fut: Future<Output = ()> + Send,
    {
        self.spawn(async move {
            let mut interval = tokio::time::interval(period);
            // Swallow the immediate first tick of tokio's interval
            interval.tick().await;
            loop {
                interval.tick().await;
                tick().await;
            }
        })
    }

    /// Cancel every task spawned from this scheduler (and its clones).
    pub fn shutdown(&self) {
        self.root.cancel();
    }
}

impl Default for Scheduler {
    fn default() -> Self {
        Self::new()
    }
}
