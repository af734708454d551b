//! Running long passes off the caller's thread.
//!
//! [`CancellableTask`] moves a closure onto a dedicated worker thread. The
//! caller keeps a [`TaskHandle`] and polls it at its own pace (for example
//! from a UI timer) instead of blocking:
//!
//! - progress arrives as [`ProgressReport`]s, monotonic per task
//! - [`TaskHandle::cancel`] sets a shared [`CancelToken`] that the work
//!   checks at its own checkpoints
//! - the outcome is delivered once through [`TaskHandle::poll`]; a
//!   cancelled task delivers nothing
//!
//! Failures inside the work (errors and panics) are captured as
//! [`TaskFailure`] and never escape the worker.

mod cancel;
mod cancellable;
mod progress;

pub use cancel::CancelToken;
pub use cancellable::{
    CancellableTask, TaskContext, TaskFailure, TaskHandle, TaskResult, TaskState,
};
pub use progress::ProgressReport;
