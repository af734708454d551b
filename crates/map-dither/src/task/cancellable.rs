//! Off-thread execution with progress, cooperative cancellation, and a
//! single terminal result.

use std::any::Any;
use std::fmt;
use std::panic::{self, AssertUnwindSafe};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::thread::{self, JoinHandle};

use super::cancel::CancelToken;
use super::progress::{ProgressChannel, ProgressReport};

/// Lifecycle of a [`CancellableTask`].
///
/// ```text
/// Pending -> Running -> Completed | Failed | Cancelled
/// Pending -> Cancelled
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TaskState {
    /// Created, worker not yet executing the work
    Pending,
    /// Work is executing on the worker thread
    Running,
    /// Work returned `Ok`
    Completed,
    /// Work returned `Err`, panicked, or the worker could not start
    Failed,
    /// Cancellation was requested before the work finished
    Cancelled,
}

impl TaskState {
    /// Whether the task can no longer change state.
    pub fn is_terminal(self) -> bool {
        matches!(
            self,
            TaskState::Completed | TaskState::Failed | TaskState::Cancelled
        )
    }
}

/// Why a task produced no value.
#[derive(Debug)]
pub enum TaskFailure<E> {
    /// The work returned an error
    Error(E),
    /// The work panicked; carries the panic message when it was a string
    Panicked(String),
    /// The worker thread could not be spawned
    Spawn(String),
}

impl<E: fmt::Display> fmt::Display for TaskFailure<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TaskFailure::Error(err) => write!(f, "{}", err),
            TaskFailure::Panicked(msg) => write!(f, "task panicked: {}", msg),
            TaskFailure::Spawn(msg) => write!(f, "failed to start worker: {}", msg),
        }
    }
}

impl<E: std::error::Error + 'static> std::error::Error for TaskFailure<E> {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            TaskFailure::Error(err) => Some(err),
            _ => None,
        }
    }
}

/// Terminal outcome of a task that was not cancelled.
pub type TaskResult<T, E> = Result<T, TaskFailure<E>>;

type Work<T, E> = Box<dyn FnOnce(&TaskContext) -> Result<T, E> + Send + 'static>;

/// What the work closure sees while it runs.
#[derive(Debug, Clone)]
pub struct TaskContext {
    cancel: CancelToken,
    progress: Arc<ProgressChannel>,
}

impl TaskContext {
    /// Publish progress. Values are clamped to `0..=100` and never decrease.
    pub fn report(&self, percent: f32, message: Option<&str>) {
        self.progress.push(percent, message.map(str::to_string));
    }

    /// A callback suitable for [`Dither`](crate::Dither) passes.
    pub fn progress_fn(&self) -> impl FnMut(f32) + '_ {
        move |percent| self.progress.push(percent, None)
    }

    /// Token to hand to passes that check for cancellation.
    pub fn cancel_token(&self) -> &CancelToken {
        &self.cancel
    }

    /// Whether the caller asked the task to stop.
    pub fn is_cancelled(&self) -> bool {
        self.cancel.is_cancelled()
    }
}

struct Slot<T, E> {
    state: TaskState,
    result: Option<TaskResult<T, E>>,
}

struct Shared<T, E> {
    slot: Mutex<Slot<T, E>>,
    cancel: CancelToken,
    progress: Arc<ProgressChannel>,
}

impl<T, E> Shared<T, E> {
    fn new() -> Self {
        Self {
            slot: Mutex::new(Slot {
                state: TaskState::Pending,
                result: None,
            }),
            cancel: CancelToken::new(),
            progress: Arc::new(ProgressChannel::default()),
        }
    }

    fn lock(&self) -> MutexGuard<'_, Slot<T, E>> {
        self.slot.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn state(&self) -> TaskState {
        self.lock().state
    }

    /// Pending/Running -> Cancelled; no-op once terminal.
    fn cancel(&self) -> bool {
        let mut slot = self.lock();
        if slot.state.is_terminal() {
            return false;
        }
        slot.state = TaskState::Cancelled;
        self.cancel.cancel();
        true
    }

    fn finish(&self, outcome: TaskResult<T, E>) {
        let mut slot = self.lock();
        if slot.state == TaskState::Cancelled || self.cancel.is_cancelled() {
            slot.state = TaskState::Cancelled;
            return;
        }
        slot.state = if outcome.is_ok() {
            TaskState::Completed
        } else {
            TaskState::Failed
        };
        slot.result = Some(outcome);
    }
}

/// A unit of work to run on its own thread.
///
/// The work receives a [`TaskContext`] for progress and cancellation. Its
/// result is delivered through [`TaskHandle::poll`] exactly once, unless the
/// task was cancelled first, in which case nothing is delivered.
///
/// # Example
///
/// ```
/// use map_dither::{CancellableTask, TaskState};
///
/// let handle = CancellableTask::spawn(|ctx| {
///     ctx.report(50.0, Some("halfway"));
///     Ok::<_, std::io::Error>(21 * 2)
/// });
///
/// let result = handle.wait().expect("not cancelled");
/// assert_eq!(result.unwrap(), 42);
/// ```
pub struct CancellableTask<T, E> {
    shared: Arc<Shared<T, E>>,
    work: Work<T, E>,
    thread_name: Option<String>,
}

impl<T, E> CancellableTask<T, E>
where
    T: Send + 'static,
    E: Send + 'static,
{
    /// Wrap `work` in a task in the `Pending` state.
    pub fn new<F>(work: F) -> Self
    where
        F: FnOnce(&TaskContext) -> Result<T, E> + Send + 'static,
    {
        Self {
            shared: Arc::new(Shared::new()),
            work: Box::new(work),
            thread_name: None,
        }
    }

    /// Create and immediately submit a task.
    pub fn spawn<F>(work: F) -> TaskHandle<T, E>
    where
        F: FnOnce(&TaskContext) -> Result<T, E> + Send + 'static,
    {
        Self::new(work).submit()
    }

    /// Name the worker thread.
    pub fn thread_name(mut self, name: impl Into<String>) -> Self {
        self.thread_name = Some(name.into());
        self
    }

    /// Current state; `Pending` or `Cancelled` before submission.
    pub fn state(&self) -> TaskState {
        self.shared.state()
    }

    /// Cancel before submission. The work will never run.
    pub fn cancel(&self) {
        self.shared.cancel();
    }

    /// Start the worker thread and return immediately.
    pub fn submit(self) -> TaskHandle<T, E> {
        let shared = Arc::clone(&self.shared);
        let worker_shared = Arc::clone(&self.shared);
        let work = self.work;

        let mut builder = thread::Builder::new();
        if let Some(name) = self.thread_name {
            builder = builder.name(name);
        }

        let join = match builder.spawn(move || run_worker(worker_shared, work)) {
            Ok(join) => Some(join),
            Err(err) => {
                shared.finish(Err(TaskFailure::Spawn(err.to_string())));
                None
            }
        };

        TaskHandle { shared, join }
    }
}

fn run_worker<T, E>(shared: Arc<Shared<T, E>>, work: Work<T, E>) {
    {
        let mut slot = shared.lock();
        if slot.state != TaskState::Pending {
            return;
        }
        slot.state = TaskState::Running;
    }

    let ctx = TaskContext {
        cancel: shared.cancel.clone(),
        progress: Arc::clone(&shared.progress),
    };

    let outcome = match panic::catch_unwind(AssertUnwindSafe(|| work(&ctx))) {
        Ok(Ok(value)) => Ok(value),
        Ok(Err(err)) => Err(TaskFailure::Error(err)),
        Err(payload) => Err(TaskFailure::Panicked(panic_message(payload.as_ref()))),
    };
    shared.finish(outcome);
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        (*s).to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "non-string panic payload".to_string()
    }
}

/// Caller-side view of a submitted task.
///
/// Dropping a handle whose task is still running cancels it.
pub struct TaskHandle<T, E> {
    shared: Arc<Shared<T, E>>,
    join: Option<JoinHandle<()>>,
}

impl<T, E> TaskHandle<T, E> {
    /// Current state.
    pub fn state(&self) -> TaskState {
        self.shared.state()
    }

    /// Whether the task reached a terminal state.
    pub fn is_finished(&self) -> bool {
        self.state().is_terminal()
    }

    /// Request cooperative cancellation.
    ///
    /// Returns `true` if the task moved to `Cancelled`, `false` if it had
    /// already finished (in which case this is a no-op).
    pub fn cancel(&self) -> bool {
        self.shared.cancel()
    }

    /// Non-blocking check for the terminal result.
    ///
    /// Returns `None` while the task runs and for cancelled tasks. The
    /// result is handed out once; later calls return `None`.
    pub fn poll(&mut self) -> Option<TaskResult<T, E>> {
        self.shared.lock().result.take()
    }

    /// Most recent progress report.
    pub fn progress(&self) -> Option<ProgressReport> {
        self.shared.progress.latest()
    }

    /// All progress reports since the last drain, oldest first.
    pub fn drain_progress(&self) -> Vec<ProgressReport> {
        self.shared.progress.drain()
    }

    /// Block until the worker exits, then take the result.
    ///
    /// Returns `None` if the task was cancelled or the result was already
    /// taken by [`poll`](Self::poll).
    pub fn wait(mut self) -> Option<TaskResult<T, E>> {
        if let Some(join) = self.join.take() {
            // The worker catches panics from the work itself
            let _ = join.join();
        }
        self.poll()
    }
}

impl<T, E> Drop for TaskHandle<T, E> {
    fn drop(&mut self) {
        self.shared.cancel();
    }
}

impl<T, E> fmt::Debug for TaskHandle<T, E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TaskHandle")
            .field("state", &self.state())
            .finish_non_exhaustive()
    }
}
