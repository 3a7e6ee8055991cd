//! Single-flight serial task queue.
//!
//! Every stack mutation runs as one unit on a [`SerialTaskQueue`]. A unit
//! receives a [`TaskCompletion`] and the queue does not start the next unit
//! until that completion fires, so a unit can keep the queue busy for the
//! whole length of an animation. Units run in submission order.
//!
//! Dropping a completion without calling [`TaskCompletion::complete`] also
//! releases the queue. A unit that keeps its completion alive forever stalls
//! the queue forever; there is no timeout.
//!
//! # Example
//!
//! ```
//! use gpui_stack_navigator::queue::SerialTaskQueue;
//! use std::cell::RefCell;
//! use std::rc::Rc;
//!
//! let queue = SerialTaskQueue::new();
//! let log = Rc::new(RefCell::new(Vec::new()));
//! let held = Rc::new(RefCell::new(None));
//!
//! let (l, h) = (log.clone(), held.clone());
//! queue.enqueue(move |done| {
//!     l.borrow_mut().push("a");
//!     *h.borrow_mut() = Some(done);
//! });
//! let l = log.clone();
//! queue.enqueue(move |done| {
//!     l.borrow_mut().push("b");
//!     done.complete();
//! });
//!
//! assert_eq!(*log.borrow(), vec!["a"]);
//! held.borrow_mut().take().unwrap().complete();
//! assert_eq!(*log.borrow(), vec!["a", "b"]);
//! ```

use crate::{debug_log, trace_log};
use std::cell::{Cell, RefCell};
use std::collections::VecDeque;
use std::fmt;
use std::rc::{Rc, Weak};

type QueuedTask = Box<dyn FnOnce(TaskCompletion)>;

struct QueueInner {
    pending: RefCell<VecDeque<QueuedTask>>,
    running: Cell<bool>,
    draining: Cell<bool>,
    submitted: Cell<u64>,
    completed: Cell<u64>,
}

impl QueueInner {
    /// Start pending units until one of them stays in flight.
    ///
    /// Units that complete synchronously loop here instead of recursing.
    fn drain(self: &Rc<Self>) {
        if self.draining.replace(true) {
            return;
        }
        while !self.running.get() {
            let next = self.pending.borrow_mut().pop_front();
            let Some(task) = next else {
                break;
            };
            self.running.set(true);
            let sequence = self.completed.get() + 1;
            trace_log!("Serial queue: starting unit #{}", sequence);
            task(TaskCompletion {
                queue: Rc::downgrade(self),
                sequence,
                fired: false,
            });
        }
        self.draining.set(false);
    }

    fn finish(self: &Rc<Self>, sequence: u64) {
        self.running.set(false);
        self.completed.set(self.completed.get() + 1);
        debug_log!(
            "Serial queue: unit #{} complete ({} pending)",
            sequence,
            self.pending.borrow().len()
        );
        self.drain();
    }
}

/// Runs one unit of work at a time, in submission order.
#[derive(Clone)]
pub struct SerialTaskQueue {
    inner: Rc<QueueInner>,
}

impl SerialTaskQueue {
    /// Create an idle queue.
    pub fn new() -> Self {
        Self {
            inner: Rc::new(QueueInner {
                pending: RefCell::new(VecDeque::new()),
                running: Cell::new(false),
                draining: Cell::new(false),
                submitted: Cell::new(0),
                completed: Cell::new(0),
            }),
        }
    }

    /// Submit a unit. Starts it right away if the queue is idle.
    pub fn enqueue<F>(&self, task: F)
    where
        F: FnOnce(TaskCompletion) + 'static,
    {
        self.inner.pending.borrow_mut().push_back(Box::new(task));
        self.inner.submitted.set(self.inner.submitted.get() + 1);
        self.inner.drain();
    }

    /// Check if a unit is in flight.
    pub fn is_busy(&self) -> bool {
        self.inner.running.get()
    }

    /// Number of units waiting behind the one in flight.
    pub fn pending(&self) -> usize {
        self.inner.pending.borrow().len()
    }

    /// Number of units that have completed.
    pub fn completed(&self) -> u64 {
        self.inner.completed.get()
    }

    /// Number of units ever submitted.
    pub fn submitted(&self) -> u64 {
        self.inner.submitted.get()
    }
}

impl Default for SerialTaskQueue {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for SerialTaskQueue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SerialTaskQueue")
            .field("busy", &self.is_busy())
            .field("pending", &self.pending())
            .field("completed", &self.completed())
            .finish()
    }
}

/// Completion signal for the unit currently in flight.
#[must_use = "dropping a TaskCompletion completes the unit immediately"]
pub struct TaskCompletion {
    queue: Weak<QueueInner>,
    sequence: u64,
    fired: bool,
}

impl TaskCompletion {
    /// Mark the unit as done and let the queue advance.
    pub fn complete(mut self) {
        self.fire();
    }

    fn fire(&mut self) {
        if std::mem::replace(&mut self.fired, true) {
            return;
        }
        if let Some(queue) = self.queue.upgrade() {
            queue.finish(self.sequence);
        }
    }
}

impl Drop for TaskCompletion {
    fn drop(&mut self) {
        if !self.fired {
            debug_log!(
                "Serial queue: unit #{} dropped its completion",
                self.sequence
            );
        }
        self.fire();
    }
}

impl fmt::Debug for TaskCompletion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TaskCompletion")
            .field("sequence", &self.sequence)
            .finish()
    }
}
