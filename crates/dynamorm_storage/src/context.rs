//! Per-call cancellation and deadline propagation.

use crate::error::{StoreError, StoreResult};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};

/// Caller-supplied cancellation and deadline for one store call.
///
/// Repositories never inspect or alter a context; they hand it to the store
/// unchanged. Stores call [`Context::check`] before applying a request.
///
/// Contexts form a tree: a context derived with
/// [`Context::with_cancellation`] is cancelled when its own handle fires or
/// when any ancestor is cancelled. Derived deadlines never extend a parent's.
#[derive(Debug, Clone, Default)]
pub struct Context {
    deadline: Option<Instant>,
    cancel_flags: Vec<Arc<AtomicBool>>,
}

impl Context {
    /// A context with no deadline that can never be cancelled.
    #[must_use]
    pub fn background() -> Self {
        Self::default()
    }

    /// Derives a context that expires at `deadline` (or earlier, if this
    /// context already expires earlier).
    #[must_use]
    pub fn with_deadline(mut self, deadline: Instant) -> Self {
        self.deadline = Some(match self.deadline {
            Some(existing) => existing.min(deadline),
            None => deadline,
        });
        self
    }

    /// Derives a context that expires `timeout` from now.
    #[must_use]
    pub fn with_timeout(self, timeout: Duration) -> Self {
        self.with_deadline(Instant::now() + timeout)
    }

    /// Derives a cancellable context and the handle that cancels it.
    #[must_use]
    pub fn with_cancellation(mut self) -> (Self, CancelHandle) {
        let flag = Arc::new(AtomicBool::new(false));
        self.cancel_flags.push(Arc::clone(&flag));
        (self, CancelHandle { flag })
    }

    /// Returns the deadline, if any.
    #[must_use]
    pub fn deadline(&self) -> Option<Instant> {
        self.deadline
    }

    /// Returns the time left before the deadline, if any.
    #[must_use]
    pub fn remaining(&self) -> Option<Duration> {
        self.deadline
            .map(|d| d.saturating_duration_since(Instant::now()))
    }

    /// Returns true if this context or an ancestor has been cancelled.
    #[must_use]
    pub fn is_cancelled(&self) -> bool {
        self.cancel_flags
            .iter()
            .any(|flag| flag.load(Ordering::SeqCst))
    }

    /// Fails if the context is cancelled or its deadline has passed.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Cancelled`] or [`StoreError::DeadlineExceeded`].
    pub fn check(&self) -> StoreResult<()> {
        if self.is_cancelled() {
            return Err(StoreError::Cancelled);
        }
        match self.deadline {
            Some(deadline) if Instant::now() >= deadline => Err(StoreError::DeadlineExceeded),
            _ => Ok(()),
        }
    }
}

/// Cancels the [`Context`] it was created with.
#[derive(Debug, Clone)]
pub struct CancelHandle {
    flag: Arc<AtomicBool>,
}

impl CancelHandle {
    /// Cancels the associated context and every context derived from it.
    pub fn cancel(&self) {
        self.flag.store(true, Ordering::SeqCst);
    }

    /// Returns true once [`CancelHandle::cancel`] has been called.
    #[must_use]
    pub fn is_cancelled(&self) -> bool {
        self.flag.load(Ordering::SeqCst)
    }
}
