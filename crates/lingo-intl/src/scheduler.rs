//! Cancellable deferred tasks.
//!
//! The locale controller never fires its change notification synchronously;
//! it hands a task to a [`Scheduler`] and keeps the returned [`TimerHandle`]
//! so a newer change can cancel it.

use parking_lot::Mutex;
use std::collections::VecDeque;
use std::fmt;
use std::sync::atomic::{AtomicU8, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::runtime::Handle;
use tracing::{trace, warn};

const PENDING: u8 = 0;
const FIRED: u8 = 1;
const CANCELLED: u8 = 2;

/// A unit of deferred work
pub type Task = Box<dyn FnOnce() + Send + 'static>;

/// Handle to one scheduled task.
///
/// A task runs at most once, and never after [`TimerHandle::cancel`] returned.
#[derive(Clone)]
pub struct TimerHandle {
    state: Arc<AtomicU8>,
}

impl TimerHandle {
    fn new() -> Self {
        Self {
            state: Arc::new(AtomicU8::new(PENDING)),
        }
    }

    /// Cancel the task if it has not started; returns whether it was pending
    pub fn cancel(&self) -> bool {
        self.state
            .compare_exchange(PENDING, CANCELLED, Ordering::AcqRel, Ordering::Acquire)
            .is_ok()
    }

    /// Whether the task has neither run nor been cancelled
    pub fn is_pending(&self) -> bool {
        self.state.load(Ordering::Acquire) == PENDING
    }

    /// Claim the right to run the task
    pub(crate) fn try_fire(&self) -> bool {
        self.state
            .compare_exchange(PENDING, FIRED, Ordering::AcqRel, Ordering::Acquire)
            .is_ok()
    }
}

impl fmt::Debug for TimerHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let state = match self.state.load(Ordering::Acquire) {
            PENDING => "pending",
            FIRED => "fired",
            _ => "cancelled",
        };
        f.debug_struct("TimerHandle").field("state", &state).finish()
    }
}

/// Something that can run a task later
pub trait Scheduler: Send + Sync {
    /// Run `task` after `delay`; a zero delay means the next turn
    fn schedule(&self, delay: Duration, task: Task) -> TimerHandle;

    /// Run queued tasks now, for schedulers driven by the host.
    ///
    /// Schedulers with their own clock return 0.
    fn run_pending(&self) -> usize {
        0
    }
}

/// Runs tasks on a tokio runtime
#[derive(Debug, Clone)]
pub struct TokioScheduler {
    handle: Handle,
}

impl TokioScheduler {
    pub fn new(handle: Handle) -> Self {
        Self { handle }
    }

    /// Scheduler for the runtime of the calling context, if any
    pub fn current() -> Option<Self> {
        Handle::try_current().ok().map(Self::new)
    }
}

impl Scheduler for TokioScheduler {
    fn schedule(&self, delay: Duration, task: Task) -> TimerHandle {
        let timer = TimerHandle::new();
        let armed = timer.clone();
        self.handle.spawn(async move {
            if delay.is_zero() {
                tokio::task::yield_now().await;
            } else {
                tokio::time::sleep(delay).await;
            }
            if armed.try_fire() {
                task();
            } else {
                trace!("Skipped cancelled task");
            }
        });
        timer
    }
}

/// Queues tasks until the host calls [`ManualScheduler::run_pending`].
///
/// Delays are ignored; every queued task is due on the next run.
#[derive(Default)]
pub struct ManualScheduler {
    queue: Mutex<VecDeque<(TimerHandle, Task)>>,
}

impl ManualScheduler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Run every task that is still pending; returns how many ran
    pub fn run_pending(&self) -> usize {
        let due: Vec<_> = self.queue.lock().drain(..).collect();
        let mut ran = 0;
        for (timer, task) in due {
            if timer.try_fire() {
                task();
                ran += 1;
            }
        }
        ran
    }

    /// Number of queued tasks, cancelled ones included
    pub fn queued(&self) -> usize {
        self.queue.lock().len()
    }
}

impl Scheduler for ManualScheduler {
    fn schedule(&self, _delay: Duration, task: Task) -> TimerHandle {
        let timer = TimerHandle::new();
        self.queue.lock().push_back((timer.clone(), task));
        timer
    }

    fn run_pending(&self) -> usize {
        ManualScheduler::run_pending(self)
    }
}

impl fmt::Debug for ManualScheduler {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ManualScheduler")
            .field("queued", &self.queued())
            .finish()
    }
}

/// The tokio scheduler when called inside a runtime, otherwise a manual one
pub fn default_scheduler() -> Arc<dyn Scheduler> {
    match TokioScheduler::current() {
        Some(scheduler) => Arc::new(scheduler),
        None => {
            warn!("No tokio runtime available; locale notifications wait for run_pending_notifications");
            Arc::new(ManualScheduler::new())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::AtomicUsize;

    fn counter_task(counter: &Arc<AtomicUsize>) -> Task {
        let counter = Arc::clone(counter);
        Box::new(move || {
            counter.fetch_add(1, Ordering::SeqCst);
        })
    }

    #[test]
    fn test_manual_scheduler_runs_once() {
        let scheduler = ManualScheduler::new();
        let counter = Arc::new(AtomicUsize::new(0));

        let timer = scheduler.schedule(Duration::ZERO, counter_task(&counter));
        assert!(timer.is_pending());

        assert_eq!(scheduler.run_pending(), 1);
        assert_eq!(scheduler.run_pending(), 0);
        assert_eq!(counter.load(Ordering::SeqCst), 1);
        assert!(!timer.is_pending());
        assert!(!timer.cancel());
    }

    #[test]
    fn test_cancelled_task_never_runs() {
        let scheduler = ManualScheduler::new();
        let counter = Arc::new(AtomicUsize::new(0));

        let timer = scheduler.schedule(Duration::ZERO, counter_task(&counter));
        assert!(timer.cancel());
        assert!(!timer.cancel());

        assert_eq!(scheduler.run_pending(), 0);
        assert_eq!(counter.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_tokio_scheduler_defers_to_next_turn() {
        let scheduler = TokioScheduler::current().unwrap();
        let counter = Arc::new(AtomicUsize::new(0));

        let timer = scheduler.schedule(Duration::ZERO, counter_task(&counter));
        assert_eq!(counter.load(Ordering::SeqCst), 0);

        tokio::time::sleep(Duration::from_millis(20)).await;
        assert_eq!(counter.load(Ordering::SeqCst), 1);
        assert!(!timer.is_pending());
    }

    #[tokio::test]
    async fn test_tokio_scheduler_honours_cancel() {
        let scheduler = TokioScheduler::current().unwrap();
        let counter = Arc::new(AtomicUsize::new(0));

        let timer = scheduler.schedule(Duration::from_millis(5), counter_task(&counter));
        assert!(timer.cancel());

        tokio::time::sleep(Duration::from_millis(30)).await;
        assert_eq!(counter.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn test_default_scheduler_without_runtime_is_host_driven() {
        assert!(TokioScheduler::current().is_none());
        let scheduler = default_scheduler();
        let counter = Arc::new(AtomicUsize::new(0));

        let timer = scheduler.schedule(Duration::ZERO, counter_task(&counter));
        assert!(timer.is_pending());
        assert_eq!(counter.load(Ordering::SeqCst), 0);

        assert_eq!(scheduler.run_pending(), 1);
        assert_eq!(counter.load(Ordering::SeqCst), 1);
        assert!(!timer.is_pending());
    }

    #[tokio::test]
    async fn test_tokio_scheduler_has_nothing_to_run_by_hand() {
        let scheduler: Arc<dyn Scheduler> = default_scheduler();
        let counter = Arc::new(AtomicUsize::new(0));

        scheduler.schedule(Duration::from_millis(5), counter_task(&counter));
        assert_eq!(scheduler.run_pending(), 0);

        tokio::time::sleep(Duration::from_millis(30)).await;
        assert_eq!(counter.load(Ordering::SeqCst), 1);
    }
}
