//! Owns the single report job slot.
//!
//! The main components are:
//! - `ReportController`: A clonable handle around the slot. It is created in
//!   `main.rs` and injected into the Actix application state, so handlers reach
//!   the slot through dependency injection rather than a global.
//! - `Slot`: The current `ReportState` plus the `JobHandle` of the active run.
//!   Every read and write goes through one `std::sync::Mutex`, and the lock is
//!   never held across an `.await`, so `status` stays a cheap lock-and-copy.
//! - `supervise`: The task spawned for each run on the runtime captured when
//!   the controller was built. It runs the job body in a nested task and
//!   always writes a terminal state back into the slot, whether the body
//!   completed, observed cancellation, returned an error or panicked. If the
//!   task itself is dropped, `Finalizer` writes the terminal state instead.

use crate::job_controller::report::{generate_report, ReportError, ReportSettings};
use common::jobs::{CancelOutcome, ReportResult, ReportState, StartOutcome};
use log::{debug, error, info, warn};
use std::future::Future;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use tokio::runtime::Handle;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use uuid::Uuid;

/// A thread-safe, shareable handle to the report job slot.
#[derive(Clone)]
pub struct ReportController {
    inner: Arc<Inner>,
}

struct Inner {
    settings: ReportSettings,
    /// Runtime every run is spawned on, independent of the caller's runtime.
    runtime: Handle,
    slot: Mutex<Slot>,
    /// Mirrors every transition of `Slot::state` for callers that want to
    /// await a state instead of polling.
    changes: watch::Sender<ReportState>,
}

struct Slot {
    state: ReportState,
    /// Present exactly while `state` is `Running`.
    active: Option<JobHandle>,
}

/// Ownership token for the run currently occupying the slot.
struct JobHandle {
    run_id: Uuid,
    cancel: CancellationToken,
    /// The supervising task. Taken by `shutdown` when it waits for the run.
    task: Option<JoinHandle<()>>,
}

/// What a job body gets to work with.
pub(crate) struct RunContext {
    pub(crate) settings: ReportSettings,
    pub(crate) cancel: CancellationToken,
    pub(crate) progress: ProgressSink,
}

/// Publishes progress for one run into the slot.
pub(crate) struct ProgressSink {
    inner: Arc<Inner>,
    run_id: Uuid,
}

impl ProgressSink {
    pub(crate) fn report(&self, progress: u8) {
        self.inner.record_progress(self.run_id, progress);
    }
}

impl ReportController {
    /// Creates a controller whose runs execute on the current Tokio runtime.
    ///
    /// Must be called from within a runtime, typically at the top of `main`.
    pub fn new(settings: ReportSettings) -> Self {
        Self::with_runtime(settings, Handle::current())
    }

    pub fn with_runtime(settings: ReportSettings, runtime: Handle) -> Self {
        let (changes, _) = watch::channel(ReportState::Idle);
        ReportController {
            inner: Arc::new(Inner {
                settings,
                runtime,
                slot: Mutex::new(Slot {
                    state: ReportState::Idle,
                    active: None,
                }),
                changes,
            }),
        }
    }

    /// Launches a report run unless one is already running.
    ///
    /// The check and the claim of the slot happen under the same lock, so
    /// concurrent callers can never start two runs. Returns without waiting
    /// for the job.
    pub fn start(&self) -> StartOutcome {
        self.start_with(|ctx: RunContext| async move {
            generate_report(&ctx.settings, &ctx.cancel, |progress| {
                ctx.progress.report(progress)
            })
            .await
        })
    }

    pub(crate) fn start_with<F, Fut>(&self, body: F) -> StartOutcome
    where
        F: FnOnce(RunContext) -> Fut,
        Fut: Future<Output = Result<ReportResult, ReportError>> + Send + 'static,
    {
        let run_id = Uuid::new_v4();
        let cancel = CancellationToken::new();
        {
            let mut slot = self.inner.lock_slot();
            if slot.state.is_running() {
                debug!("report start ignored, a run is already active");
                return StartOutcome::AlreadyRunning;
            }
            self.inner
                .transition(&mut slot, ReportState::Running { progress: 0 });
            slot.active = Some(JobHandle {
                run_id,
                cancel: cancel.clone(),
                task: None,
            });
        }

        let finalizer = Finalizer {
            inner: self.inner.clone(),
            run_id,
            cancel: cancel.clone(),
            done: false,
        };
        let body = body(RunContext {
            settings: self.inner.settings.clone(),
            cancel,
            progress: ProgressSink {
                inner: self.inner.clone(),
                run_id,
            },
        });
        // Spawned outside the lock: a runtime that is already shut down drops
        // the future on the spot, and the finalizer then needs the lock.
        let task = self
            .inner
            .runtime
            .spawn(supervise(self.inner.runtime.clone(), finalizer, body));

        // A run that already finalized has nothing left to wait for.
        let mut slot = self.inner.lock_slot();
        if let Some(handle) = slot.active.as_mut().filter(|h| h.run_id == run_id) {
            handle.task = Some(task);
        }
        drop(slot);

        info!("report run {} started", run_id);
        StartOutcome::Started
    }

    /// Snapshot of the slot. Never waits for the job.
    pub fn status(&self) -> ReportState {
        self.inner.lock_slot().state.clone()
    }

    /// Asks the running job to stop. Returns immediately; the slot stays
    /// `Running` until the job observes the request and finalizes.
    pub fn cancel(&self) -> CancelOutcome {
        let slot = self.inner.lock_slot();
        match (&slot.state, &slot.active) {
            (ReportState::Running { .. }, Some(handle)) => {
                handle.cancel.cancel();
                info!("cancellation requested for report run {}", handle.run_id);
                CancelOutcome::CancelRequested
            }
            _ => {
                debug!("report cancel ignored, nothing is running");
                CancelOutcome::NothingToCancel
            }
        }
    }

    /// Receiver that sees every state transition, starting from the current one.
    pub fn subscribe(&self) -> watch::Receiver<ReportState> {
        self.inner.changes.subscribe()
    }

    /// Cancels the active run, if any, and waits until it has finalized.
    pub async fn shutdown(&self) {
        let task = {
            let mut slot = self.inner.lock_slot();
            match slot.active.as_mut() {
                Some(handle) => {
                    handle.cancel.cancel();
                    handle.task.take()
                }
                None => None,
            }
        };
        if let Some(task) = task {
            if let Err(err) = task.await {
                error!("report supervisor did not finish cleanly: {}", err);
            }
        }
        // Covers a run whose task handle was not stored yet.
        let mut changes = self.subscribe();
        if changes.wait_for(|state| !state.is_running()).await.is_err() {
            error!("report slot closed while shutting down");
        }
    }
}

impl Inner {
    fn lock_slot(&self) -> MutexGuard<'_, Slot> {
        // Slot updates are single assignments, so a poisoned lock still holds
        // a consistent value.
        self.slot.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn transition(&self, slot: &mut Slot, state: ReportState) {
        slot.state = state.clone();
        self.changes.send_replace(state);
    }

    fn record_progress(&self, run_id: Uuid, progress: u8) {
        let mut slot = self.lock_slot();
        let owns_slot = slot.active.as_ref().map(|h| h.run_id) == Some(run_id);
        if owns_slot && slot.state != (ReportState::Running { progress }) {
            self.transition(&mut slot, ReportState::Running { progress });
        }
    }

    /// Writes the terminal state of `run_id` and releases the slot.
    fn finish(&self, run_id: Uuid, outcome: ReportState) {
        let mut slot = self.lock_slot();
        if slot.active.as_ref().map(|h| h.run_id) != Some(run_id) {
            warn!("report run {} finished after losing the slot", run_id);
            return;
        }
        match &outcome {
            ReportState::Completed(result) => {
                info!("report run {} completed, written to {}", run_id, result.path)
            }
            ReportState::Canceled => info!("report run {} canceled", run_id),
            ReportState::Failed(cause) => error!("report run {} failed: {}", run_id, cause),
            ReportState::Idle | ReportState::Running { .. } => {}
        }
        slot.active = None;
        self.transition(&mut slot, outcome);
    }
}

/// Writes the terminal state of one run exactly once.
///
/// If the supervisor is dropped before it reports an outcome (its runtime
/// went away), the drop writes `Canceled` or `Failed` instead, so the slot
/// never stays `Running`.
struct Finalizer {
    inner: Arc<Inner>,
    run_id: Uuid,
    cancel: CancellationToken,
    done: bool,
}

impl Finalizer {
    fn finish(mut self, outcome: ReportState) {
        self.done = true;
        self.inner.finish(self.run_id, outcome);
    }
}

impl Drop for Finalizer {
    fn drop(&mut self) {
        if self.done {
            return;
        }
        let outcome = if self.cancel.is_cancelled() {
            ReportState::Canceled
        } else {
            ReportState::Failed("report run was dropped before it finished".to_string())
        };
        self.inner.finish(self.run_id, outcome);
    }
}

/// Runs the job body in its own task and finalizes the slot on every exit path.
async fn supervise<Fut>(runtime: Handle, finalizer: Finalizer, body: Fut)
where
    Fut: Future<Output = Result<ReportResult, ReportError>> + Send + 'static,
{
    let outcome = match runtime.spawn(body).await {
        Ok(Ok(result)) => ReportState::Completed(result),
        Ok(Err(ReportError::Canceled)) => ReportState::Canceled,
        Ok(Err(err)) => ReportState::Failed(err.to_string()),
        Err(join_err) => ReportState::Failed(format!("report task aborted: {}", join_err)),
    };
    finalizer.finish(outcome);
}
