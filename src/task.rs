//! Background job with a polled completion flag
//!
//! Used for slow bookkeeping (loading level tables) while the caller keeps
//! its own loop running. The job never sees simulation state.

use std::sync::{Arc, Mutex, MutexGuard};
use std::thread::{self, JoinHandle};
use std::time::{Duration, Instant};

#[derive(Debug)]
struct TaskState<T> {
    finished: bool,
    result: Option<T>,
}

#[derive(Debug)]
pub struct ParallelTask<T> {
    state: Arc<Mutex<TaskState<T>>>,
    handle: Option<JoinHandle<()>>,
    started: Option<Instant>,
    /// Expected duration, only used for the progress estimate
    expected: Duration,
}

impl<T: Send + 'static> ParallelTask<T> {
    pub fn new(expected: Duration) -> Self {
        Self {
            state: Arc::new(Mutex::new(TaskState {
                finished: false,
                result: None,
            })),
            handle: None,
            started: None,
            expected,
        }
    }

    fn lock(&self) -> MutexGuard<'_, TaskState<T>> {
        // A panicking job leaves `finished` false, which is the state we want to read
        self.state.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    /// Start `job` on a worker thread, replacing any previous result
    pub fn execute<F>(&mut self, job: F)
    where
        F: FnOnce() -> T + Send + 'static,
    {
        {
            let mut state = self.lock();
            state.finished = false;
            state.result = None;
        }

        let state = Arc::clone(&self.state);
        self.started = Some(Instant::now());
        self.handle = Some(thread::spawn(move || {
            let result = job();
            let mut state = state.lock().unwrap_or_else(|poisoned| poisoned.into_inner());
            state.result = Some(result);
            state.finished = true;
        }));
    }

    pub fn is_finished(&self) -> bool {
        self.lock().finished
    }

    /// Estimated progress in `[0, 1]`
    pub fn completion(&self) -> f32 {
        if self.is_finished() {
            return 1.0;
        }
        match self.started {
            Some(started) if !self.expected.is_zero() => {
                (started.elapsed().as_secs_f32() / self.expected.as_secs_f32()).min(1.0)
            }
            _ => 0.0,
        }
    }

    /// Take the job's result once it has finished
    pub fn take_result(&mut self) -> Option<T> {
        let result = self.lock().result.take();
        if result.is_some() {
            if let Some(handle) = self.handle.take() {
                let _ = handle.join();
            }
        }
        result
    }
}
