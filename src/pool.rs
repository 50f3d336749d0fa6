use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread::JoinHandle;

use crossbeam_channel::{bounded, Sender};
use crossbeam_utils::sync::WaitGroup;

use crate::rule;

/// Number of workers started per pool unless overridden.
pub const DEFAULT_WORKERS: usize = 5;

/// Capacity of the bounded task queue.
pub const QUEUE_CAPACITY: usize = 10;

/// One cell transition, consumed exactly once by exactly one worker.
///
/// `read` and `write` always point at distinct buffers, and the dispatcher
/// never enqueues the same `(x, y)` twice within a generation, so workers
/// write disjoint coordinates and need no lock beyond the queue itself.
/// Dropping the task (worker done, or the send failing) releases its
/// `WaitGroup` handle, so the dispatcher's barrier always drains.
pub(crate) struct Task {
  pub x: usize,
  pub y: usize,
  pub read: Arc<Vec<AtomicBool>>,
  pub write: Arc<Vec<AtomicBool>>,
  pub width: usize,
  pub height: usize,
  pub done: WaitGroup,
}

/// A fixed set of worker threads draining a bounded queue of cell
/// transitions. Workers live for the pool's whole lifetime: they block on an
/// empty queue rather than exiting, and terminate only when the pool is
/// dropped and the queue closes. Dropping the pool joins every worker.
pub struct WorkerPool {
  tx: Option<Sender<Task>>,
  handles: Vec<JoinHandle<()>>,
}

impl WorkerPool {
  /// A pool with the default worker count and queue capacity.
  pub fn new() -> Self {
    Self::with_size(DEFAULT_WORKERS, QUEUE_CAPACITY)
  }

  /// A pool with explicit sizing. Results are identical for any worker
  /// count, since each task writes a disjoint coordinate.
  pub fn with_size(workers: usize, capacity: usize) -> Self {
    let (tx, rx) = bounded::<Task>(capacity);
    let handles = (0..workers)
      .map(|_| {
        let rx = rx.clone();
        std::thread::spawn(move || {
          for task in rx {
            let next = rule::next_state(&task.read, task.x, task.y, task.width, task.height);
            task.write[task.y * task.width + task.x].store(next, Ordering::Relaxed);
            // Dropping the task signals its WaitGroup handle.
          }
        })
      })
      .collect();
    Self {
      tx: Some(tx),
      handles,
    }
  }

  /// Enqueue one transition, blocking while the queue is full. If every
  /// worker has died the task is dropped, which still releases its barrier
  /// handle.
  pub(crate) fn submit(&self, task: Task) {
    if let Some(tx) = &self.tx {
      let _ = tx.send(task);
    }
  }
}

impl Default for WorkerPool {
  fn default() -> Self {
    Self::new()
  }
}

impl Drop for WorkerPool {
  fn drop(&mut self) {
    // Closing the queue lets workers drain remaining tasks and exit.
    self.tx.take();
    for handle in self.handles.drain(..) {
      let _ = handle.join();
    }
  }
}
