//! Progress reports shared between a worker and its handle.

use std::collections::VecDeque;
use std::sync::{Mutex, PoisonError};

/// Reports kept for `drain_progress` before the oldest are dropped.
const MAX_QUEUED_REPORTS: usize = 4096;

/// A progress update from a running task.
#[derive(Debug, Clone, PartialEq)]
pub struct ProgressReport {
    /// Completion percentage in `0.0..=100.0`.
    pub percent: f32,
    /// Optional human-readable status.
    pub message: Option<String>,
}

impl ProgressReport {
    /// A report without a message.
    pub fn new(percent: f32) -> Self {
        Self {
            percent,
            message: None,
        }
    }
}

#[derive(Debug, Default)]
struct ProgressState {
    latest: Option<ProgressReport>,
    queued: VecDeque<ProgressReport>,
}

/// Monotonic progress mailbox written by the worker, read by the handle.
#[derive(Debug, Default)]
pub(crate) struct ProgressChannel {
    state: Mutex<ProgressState>,
}

impl ProgressChannel {
    /// Record a report. Percentages are clamped to `0..=100` and never go
    /// below the previous report; NaN repeats the previous value.
    pub(crate) fn push(&self, percent: f32, message: Option<String>) {
        let mut state = self.state.lock().unwrap_or_else(PoisonError::into_inner);
        let floor = state.latest.as_ref().map_or(0.0, |r| r.percent);
        let percent = if percent.is_nan() {
            floor
        } else {
            percent.clamp(0.0, 100.0).max(floor)
        };

        let report = ProgressReport { percent, message };
        if state.queued.len() == MAX_QUEUED_REPORTS {
            state.queued.pop_front();
        }
        state.queued.push_back(report.clone());
        state.latest = Some(report);
    }

    pub(crate) fn latest(&self) -> Option<ProgressReport> {
        self.state
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .latest
            .clone()
    }

    pub(crate) fn drain(&self) -> Vec<ProgressReport> {
        self.state
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .queued
            .drain(..)
            .collect()
    }
}
