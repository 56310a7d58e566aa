//! Session scheduler - the cooperative "main queue" for timed session work
//!
//! Holds one-shot and repeating tasks against a virtual clock. Every task is
//! tagged with the session generation it was scheduled under so a whole
//! generation can be cancelled at teardown. Tasks come out of `pop_due` one at
//! a time in due-time order (ties in scheduling order), so a handler can cancel
//! later tasks before they run.

use std::time::Duration;

/// Work the session controller schedules against its clock
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionTask {
    /// Periodic power accumulation while the user holds a touch
    ChargeTick,
    /// Hoop placement has settled; shots are allowed
    HoopReady,
    /// Hide the plane-detected notice
    HideNotice,
}

/// Handle to a scheduled task
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TaskId(u64);

/// A task that came due
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FiredTask {
    pub id: TaskId,
    pub generation: u64,
    pub task: SessionTask,
    /// Clock time the task was due at
    pub at: Duration,
}

#[derive(Debug, Clone)]
struct Entry {
    id: TaskId,
    generation: u64,
    task: SessionTask,
    due: Duration,
    interval: Option<Duration>,
}

#[derive(Debug, Default)]
pub struct Scheduler {
    now: Duration,
    next_id: u64,
    entries: Vec<Entry>,
}

impl Scheduler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Current clock time
    pub fn now(&self) -> Duration {
        self.now
    }

    /// Run `task` once, `delay` from now
    pub fn schedule_once(&mut self, delay: Duration, generation: u64, task: SessionTask) -> TaskId {
        self.push(delay, None, generation, task)
    }

    /// Run `task` every `interval`, first firing one interval from now.
    ///
    /// A zero interval is bumped to 1ms so the task cannot starve the clock.
    pub fn schedule_repeating(
        &mut self,
        interval: Duration,
        generation: u64,
        task: SessionTask,
    ) -> TaskId {
        let interval = interval.max(Duration::from_millis(1));
        self.push(interval, Some(interval), generation, task)
    }

    fn push(
        &mut self,
        delay: Duration,
        interval: Option<Duration>,
        generation: u64,
        task: SessionTask,
    ) -> TaskId {
        let id = TaskId(self.next_id);
        self.next_id += 1;
        self.entries.push(Entry {
            id,
            generation,
            task,
            due: self.now + delay,
            interval,
        });
        id
    }

    /// Cancel a task. Returns false if it already ran (one-shot) or was cancelled.
    pub fn cancel(&mut self, id: TaskId) -> bool {
        let before = self.entries.len();
        self.entries.retain(|e| e.id != id);
        self.entries.len() != before
    }

    /// Cancel every task scheduled under `generation`
    pub fn cancel_generation(&mut self, generation: u64) -> usize {
        let before = self.entries.len();
        self.entries.retain(|e| e.generation != generation);
        before - self.entries.len()
    }

    pub fn pending_count(&self) -> usize {
        self.entries.len()
    }

    /// Pop the earliest task due at or before `deadline`, moving the clock to
    /// its due time. Repeating tasks are re-armed one interval later.
    pub fn pop_due(&mut self, deadline: Duration) -> Option<FiredTask> {
        let index = self
            .entries
            .iter()
            .enumerate()
            .filter(|(_, e)| e.due <= deadline)
            .min_by_key(|(_, e)| (e.due, e.id))
            .map(|(i, _)| i)?;

        let fired = {
            let entry = &self.entries[index];
            FiredTask {
                id: entry.id,
                generation: entry.generation,
                task: entry.task,
                at: entry.due,
            }
        };

        self.now = self.now.max(fired.at);
        match self.entries[index].interval {
            Some(interval) => self.entries[index].due += interval,
            None => {
                self.entries.swap_remove(index);
            }
        }
        Some(fired)
    }

    /// Move the clock forward without running anything (never backwards)
    pub fn set_now(&mut self, now: Duration) {
        self.now = self.now.max(now);
    }
}
