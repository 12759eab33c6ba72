//! Render scheduling.
//!
//! After every update the runtime hands a [`RenderTask`] to its [`Scheduler`].
//! The task re-derives the view from the latest state when it runs, so a
//! deferred task never renders stale state.
//!
//! ```
//! use alder::schedule::{RenderQueue, RenderTask, Scheduler};
//!
//! let queue = RenderQueue::new();
//! queue.schedule(RenderTask::new(|| Ok(()))).unwrap();
//! assert_eq!(queue.len(), 1);
//! queue.flush().unwrap();
//! assert!(queue.is_empty());
//! ```

use std::cell::RefCell;
use std::collections::VecDeque;
use std::fmt;
use std::rc::Rc;

use crate::error::Result;

/// A pending render pass.
pub struct RenderTask {
    run: Box<dyn FnOnce() -> Result<()>>,
}

impl RenderTask {
    pub fn new(run: impl FnOnce() -> Result<()> + 'static) -> Self {
        Self { run: Box::new(run) }
    }

    /// Performs the render pass.
    ///
    /// # Errors
    ///
    /// Propagates reconciliation and renderer errors.
    pub fn run(self) -> Result<()> {
        (self.run)()
    }
}

impl fmt::Debug for RenderTask {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RenderTask").finish_non_exhaustive()
    }
}

/// Decides when a render pass runs.
pub trait Scheduler {
    /// Runs the task now, or stores it to run later.
    ///
    /// Implementations that defer must run tasks in the order they were
    /// scheduled.
    ///
    /// # Errors
    ///
    /// An immediate scheduler returns the render's error.
    fn schedule(&self, task: RenderTask) -> Result<()>;
}

impl<F: Fn(RenderTask) -> Result<()>> Scheduler for F {
    fn schedule(&self, task: RenderTask) -> Result<()> {
        self(task)
    }
}

/// Runs every render synchronously inside the dispatch that caused it.
#[derive(Debug, Clone, Copy, Default)]
pub struct Immediate;

impl Scheduler for Immediate {
    fn schedule(&self, task: RenderTask) -> Result<()> {
        task.run()
    }
}

/// FIFO queue of deferred renders, flushed by its owner.
///
/// Clones share the same queue: give one to the runtime and keep one to flush
/// from the host's event loop.
#[derive(Debug, Clone, Default)]
pub struct RenderQueue {
    tasks: Rc<RefCell<VecDeque<RenderTask>>>,
}

impl RenderQueue {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.tasks.borrow().len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.tasks.borrow().is_empty()
    }

    /// Runs the oldest pending task, if any.
    pub fn run_next(&self) -> Option<Result<()>> {
        let task = self.tasks.borrow_mut().pop_front()?;
        Some(task.run())
    }

    /// Runs pending tasks in order until the queue is empty, including tasks
    /// scheduled while flushing.
    ///
    /// # Errors
    ///
    /// Stops at the first failing render; later tasks stay queued.
    pub fn flush(&self) -> Result<()> {
        while let Some(result) = self.run_next() {
            result?;
        }
        Ok(())
    }
}

impl Scheduler for RenderQueue {
    fn schedule(&self, task: RenderTask) -> Result<()> {
        self.tasks.borrow_mut().push_back(task);
        Ok(())
    }
}
