use std::time::Duration;

#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
pub struct TaskId(pub u64);

pub type Task = Box<dyn FnOnce()>;

/// Delayed, cancelable work on the page's single thread.
///
/// Tasks run in due-time order. Tasks with equal due times run in the order
/// they were scheduled. Canceling an already-run or unknown task is a no-op.
pub trait Scheduler {
    fn schedule(&self, delay: Duration, task: Task) -> TaskId;
    fn cancel(&self, id: TaskId);
}

pub fn millis(value: u64) -> Duration {
    Duration::from_millis(value)
}
