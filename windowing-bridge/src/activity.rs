use crate::platform::Scheduler;

/// Debounced "is scrolling" tracking.
///
/// Every scroll event cancels the pending quiescence task and schedules a new one, so the flag
/// resets `delay_ms` after the most recent event rather than the first.
#[derive(Clone, Debug)]
pub struct ScrollActivity<T> {
    pending: Option<T>,
}

impl<T: Copy + PartialEq> ScrollActivity<T> {
    pub fn new() -> Self {
        Self { pending: None }
    }

    pub fn is_pending(&self) -> bool {
        self.pending.is_some()
    }

    /// Restarts the quiescence timer.
    pub fn restart<S>(&mut self, scheduler: &mut S, delay_ms: u64)
    where
        S: Scheduler<Task = T> + ?Sized,
    {
        if let Some(task) = self.pending.take() {
            scheduler.cancel(task);
        }
        self.pending = Some(scheduler.schedule(delay_ms));
    }

    /// Consumes a fired task. Returns `true` when it was the pending one, i.e. scrolling has
    /// settled; stale tasks return `false`.
    pub fn fire(&mut self, task: T) -> bool {
        if self.pending == Some(task) {
            self.pending = None;
            return true;
        }
        false
    }

    /// Cancels the pending task, if any.
    pub fn cancel<S>(&mut self, scheduler: &mut S)
    where
        S: Scheduler<Task = T> + ?Sized,
    {
        if let Some(task) = self.pending.take() {
            scheduler.cancel(task);
        }
    }
}

impl<T: Copy + PartialEq> Default for ScrollActivity<T> {
    fn default() -> Self {
        Self::new()
    }
}
