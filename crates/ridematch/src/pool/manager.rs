//! Cancellable pool of matcher tasks.
//!
//! This module defines the [`WorkerPool`] struct, which spawns a fixed number
//! of [`worker_loop`] tasks against one shared [`WorkerContext`] and stops
//! them through a shared [`CancellationToken`].
//!
//! Workers never talk to each other. They only meet at the two queues and the
//! ride store, each of which guards itself.

use crate::pool::worker::{WorkerContext, worker_loop};
use core::time::Duration;
use portable_atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use tokio::{sync::Mutex, task::JoinHandle, time::timeout};
use tokio_util::sync::CancellationToken;

/// How a call to [`WorkerPool::shutdown`] ended.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ShutdownOutcome {
    /// Every worker reached its stopped state within the bound.
    Graceful,
    /// The bound elapsed first. The remaining workers were aborted.
    Forced { still_running: usize },
}

impl ShutdownOutcome {
    pub const fn is_forced(self) -> bool {
        matches!(self, Self::Forced { .. })
    }
}

/// Join handles of the spawned workers and, once drained, how that went.
struct Workers {
    handles: Vec<JoinHandle<usize>>,
    outcome: Option<ShutdownOutcome>,
}

/// Decrements the live worker count when a worker task is dropped, whether it
/// returned or was aborted.
struct RunningGuard(Arc<AtomicUsize>);

impl Drop for RunningGuard {
    fn drop(&mut self) {
        self.0.fetch_sub(1, Ordering::AcqRel);
    }
}

/// A fixed-size set of matcher tasks sharing one cancellation token.
pub struct WorkerPool {
    workers: Mutex<Workers>,
    running: Arc<AtomicUsize>,
    shutdown_token: CancellationToken,
    size: usize,
}

impl WorkerPool {
    /// Spawns `size` workers on the current Tokio runtime.
    ///
    /// # Panics
    ///
    /// Panics if called outside of a Tokio runtime.
    pub fn start(size: usize, ctx: &WorkerContext) -> Self {
        let shutdown_token = CancellationToken::new();
        let running = Arc::new(AtomicUsize::new(size));
        let handles = (0..size)
            .map(|worker_id| {
                let guard = RunningGuard(Arc::clone(&running));
                let task = worker_loop(worker_id, ctx.clone(), shutdown_token.clone());
                tokio::spawn(async move {
                    let _guard = guard;
                    task.await
                })
            })
            .collect();

        #[cfg(feature = "tracing")]
        tracing::debug!("Started {size} matching workers");

        Self {
            workers: Mutex::new(Workers {
                handles,
                outcome: None,
            }),
            running,
            shutdown_token,
            size,
        }
    }

    pub const fn size(&self) -> usize {
        self.size
    }

    /// True once [`WorkerPool::shutdown`] has been requested.
    pub fn is_shutting_down(&self) -> bool {
        self.shutdown_token.is_cancelled()
    }

    /// Number of workers that have not yet stopped.
    pub fn running_workers(&self) -> usize {
        self.running.load(Ordering::Acquire)
    }

    /// Signals every worker to stop without waiting for them.
    ///
    /// Idle workers stop at once, busy workers after their current ride.
    pub fn cancel(&self) {
        self.shutdown_token.cancel();
    }

    /// Stops every worker, waiting at most `bound` for them to drain.
    ///
    /// - Cancels the shared [`CancellationToken`]; idle workers stop at once
    ///   and busy workers stop after finishing their current ride.
    /// - Waits up to `bound` for every task to finish.
    /// - On overrun, logs a warning, aborts the stragglers and returns
    ///   [`ShutdownOutcome::Forced`]. This is never an error.
    ///
    /// Concurrent and later calls wait for the first drain to finish and
    /// report the same outcome.
    pub async fn shutdown(&self, bound: Duration) -> ShutdownOutcome {
        // === Phase 1: Signal every worker ===
        #[cfg(feature = "tracing")]
        tracing::info!("Cancelling matching workers");
        self.cancel();

        let mut workers = self.workers.lock().await;
        if let Some(outcome) = workers.outcome {
            return outcome;
        }

        let outcome = Self::drain(&mut workers.handles, bound).await;
        workers.handles.clear();
        workers.outcome = Some(outcome);
        outcome
    }

    async fn drain(handles: &mut [JoinHandle<usize>], bound: Duration) -> ShutdownOutcome {
        // === Phase 2: Wait for in-flight rides to drain ===
        #[cfg(feature = "tracing")]
        tracing::debug!(
            "Waiting up to {bound:?} for {} workers to stop",
            handles.len()
        );

        match timeout(bound, futures::future::join_all(handles.iter_mut())).await {
            Ok(results) => {
                for (_worker_id, result) in results.into_iter().enumerate() {
                    match result {
                        Ok(_completed) => {
                            #[cfg(feature = "tracing")]
                            tracing::trace!(
                                "Worker {_worker_id} stopped after {_completed} rides"
                            );
                        }
                        Err(_e) => {
                            #[cfg(feature = "tracing")]
                            tracing::error!("Worker {_worker_id} failed: {_e}");
                        }
                    }
                }

                #[cfg(feature = "tracing")]
                tracing::info!("Worker pool shutdown complete");
                ShutdownOutcome::Graceful
            }
            Err(_) => {
                // === Phase 3: Abort whatever is still running ===
                let still_running = handles.iter().filter(|h| !h.is_finished()).count();

                #[cfg(feature = "tracing")]
                tracing::warn!(
                    "Force shutdown: {still_running} workers still running after {bound:?}"
                );

                for handle in handles.iter() {
                    handle.abort();
                }
                // Aborted tasks stop at their next await point; reap them so
                // none outlives this call.
                futures::future::join_all(handles.iter_mut()).await;
                ShutdownOutcome::Forced { still_running }
            }
        }
    }
}

impl Drop for WorkerPool {
    fn drop(&mut self) {
        self.shutdown_token.cancel();
    }
}
