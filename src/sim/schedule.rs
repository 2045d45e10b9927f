//! Cancellable timers on the simulation clock
//!
//! The round timer, the countdown and the feedback cues are all tasks in this
//! table. The clock only moves when a tick feeds it `dt`, so timers stay in
//! lockstep with the frames that drive them and tests can step time exactly.

/// Handle to a scheduled task
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TaskId(u64);

/// Work a timer triggers when it comes due
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Task {
    /// Advance the 3-2-1 countdown
    CountdownStep,
    /// One second of round time elapsed
    RoundSecond,
    /// Mouth cue expired
    CloseMouth,
    /// "-1" cue expired
    HideMinusOne,
}

#[derive(Debug, Clone)]
struct Entry {
    id: TaskId,
    task: Task,
    due_us: u64,
    period_us: Option<u64>,
}

/// Task table keyed by [`TaskId`]
#[derive(Debug, Clone, Default)]
pub struct Scheduler {
    now_us: u64,
    next_id: u64,
    entries: Vec<Entry>,
}

fn ms_to_us(ms: u64) -> u64 {
    ms.saturating_mul(1_000)
}

impl Scheduler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Current clock reading in microseconds
    pub fn now_us(&self) -> u64 {
        self.now_us
    }

    /// Run `task` once, `delay_ms` from now
    pub fn once(&mut self, task: Task, delay_ms: u64) -> TaskId {
        self.insert(task, ms_to_us(delay_ms), None)
    }

    /// Run `task` every `period_ms`, first firing one period from now
    pub fn every(&mut self, task: Task, period_ms: u64) -> TaskId {
        let period = ms_to_us(period_ms).max(1);
        self.insert(task, period, Some(period))
    }

    fn insert(&mut self, task: Task, delay_us: u64, period_us: Option<u64>) -> TaskId {
        let id = TaskId(self.next_id);
        self.next_id += 1;
        self.entries.push(Entry {
            id,
            task,
            due_us: self.now_us.saturating_add(delay_us),
            period_us,
        });
        id
    }

    /// Cancel one task. Returns false if it already fired or was cancelled.
    pub fn cancel(&mut self, id: TaskId) -> bool {
        let before = self.entries.len();
        self.entries.retain(|e| e.id != id);
        self.entries.len() != before
    }

    /// Cancel `id` if present; convenience for `Option<TaskId>` slots
    pub fn cancel_slot(&mut self, slot: &mut Option<TaskId>) {
        if let Some(id) = slot.take() {
            self.cancel(id);
        }
    }

    /// Drop every outstanding task
    pub fn cancel_all(&mut self) {
        if !self.entries.is_empty() {
            log::debug!("Cancelling {} scheduled task(s)", self.entries.len());
        }
        self.entries.clear();
    }

    pub fn is_scheduled(&self, id: TaskId) -> bool {
        self.entries.iter().any(|e| e.id == id)
    }

    pub fn pending(&self) -> usize {
        self.entries.len()
    }

    /// Move the clock forward by `dt` seconds
    pub fn advance(&mut self, dt: f32) {
        let dt_us = (dt.max(0.0) as f64 * 1_000_000.0).round() as u64;
        self.now_us = self.now_us.saturating_add(dt_us);
    }

    /// Pop the earliest task that is due, rescheduling it if it repeats.
    ///
    /// Callers drain this in a loop and run each task before popping the
    /// next, so a task that cancels others stops them from firing.
    pub fn pop_due(&mut self) -> Option<(TaskId, Task)> {
        let idx = self
            .entries
            .iter()
            .enumerate()
            .filter(|(_, e)| e.due_us <= self.now_us)
            .min_by_key(|(_, e)| (e.due_us, e.id.0))
            .map(|(i, _)| i)?;

        let entry = &mut self.entries[idx];
        let fired = (entry.id, entry.task);
        match entry.period_us {
            Some(period) => entry.due_us = entry.due_us.saturating_add(period),
            None => {
                self.entries.remove(idx);
            }
        }
        Some(fired)
    }
}
