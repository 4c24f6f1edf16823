//! Cancellable execution context passed to every filesystem operation
//!
//! A [`Context`] carries an optional deadline and any number of shared
//! cancellation flags. Cloning is cheap; clones observe the same flags.
//! Derived contexts inherit their parent's flags and never extend its
//! deadline.

use crate::fs::FsError;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};
use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum ContextError {
    #[error("context cancelled")]
    Cancelled,

    #[error("context deadline exceeded")]
    DeadlineExceeded,
}

impl From<ContextError> for FsError {
    fn from(err: ContextError) -> Self {
        match err {
            ContextError::Cancelled => FsError::Cancelled,
            ContextError::DeadlineExceeded => FsError::DeadlineExceeded,
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct Context {
    deadline: Option<Instant>,
    cancel_flags: Vec<Arc<AtomicBool>>,
}

/// Cancels every context derived from the one it was created with.
#[derive(Debug, Clone)]
pub struct CancelHandle {
    flag: Arc<AtomicBool>,
}

impl CancelHandle {
    pub fn cancel(&self) {
        self.flag.store(true, Ordering::SeqCst);
    }

    pub fn is_cancelled(&self) -> bool {
        self.flag.load(Ordering::SeqCst)
    }
}

impl Context {
    /// A context that is never cancelled and has no deadline.
    pub fn background() -> Self {
        Self::default()
    }

    pub fn with_timeout(timeout: Duration) -> Self {
        Self::background().child_with_timeout(timeout)
    }

    pub fn with_deadline(deadline: Instant) -> Self {
        Self::background().child_with_deadline(deadline)
    }

    pub fn with_cancel() -> (Self, CancelHandle) {
        Self::background().child_with_cancel()
    }

    /// A timeout too large to represent as an `Instant` keeps the parent's deadline.
    pub fn child_with_timeout(&self, timeout: Duration) -> Self {
        match Instant::now().checked_add(timeout) {
            Some(deadline) => self.child_with_deadline(deadline),
            None => self.clone(),
        }
    }

    /// Derives a context whose deadline is the earlier of `deadline` and the parent's.
    pub fn child_with_deadline(&self, deadline: Instant) -> Self {
        let deadline = match self.deadline {
            Some(current) if current < deadline => current,
            _ => deadline,
        };

        Self {
            deadline: Some(deadline),
            cancel_flags: self.cancel_flags.clone(),
        }
    }

    pub fn child_with_cancel(&self) -> (Self, CancelHandle) {
        let flag = Arc::new(AtomicBool::new(false));
        let mut cancel_flags = self.cancel_flags.clone();
        cancel_flags.push(flag.clone());

        (
            Self {
                deadline: self.deadline,
                cancel_flags,
            },
            CancelHandle { flag },
        )
    }

    pub fn deadline(&self) -> Option<Instant> {
        self.deadline
    }

    /// Time left before the deadline, `None` when there is no deadline.
    pub fn remaining(&self) -> Option<Duration> {
        self.deadline
            .map(|d| d.saturating_duration_since(Instant::now()))
    }

    /// Cancellation wins over an expired deadline.
    pub fn err(&self) -> Option<ContextError> {
        if self
            .cancel_flags
            .iter()
            .any(|flag| flag.load(Ordering::SeqCst))
        {
            return Some(ContextError::Cancelled);
        }

        match self.deadline {
            Some(deadline) if Instant::now() >= deadline => Some(ContextError::DeadlineExceeded),
            _ => None,
        }
    }

    pub fn check(&self) -> Result<(), FsError> {
        match self.err() {
            Some(err) => Err(err.into()),
            None => Ok(()),
        }
    }
}
