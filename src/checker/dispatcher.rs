//! Bounded worker pool that runs one job per chunk of text.
//!
//! Chunks go onto a bounded queue drained by a fixed set of worker threads.
//! When the queue is full the submitting thread runs the job itself, so
//! submission never blocks and no chunk is dropped. After the last chunk the
//! queue is closed and the dispatcher waits, up to a deadline, for the
//! workers to drain it.

use crate::config::CheckSettings;
use crate::error::{Result, SpellError};
use crossbeam_channel::{bounded, unbounded, Sender, TrySendError};
use std::panic::{self, AssertUnwindSafe};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::thread;
use std::time::{Duration, Instant};

/// Lifecycle of a dispatch run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DispatchState {
    Idle,
    Accepting,
    Draining,
    Done,
}

/// What happened during one run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DispatchReport {
    /// Chunks handed to the dispatcher.
    pub submitted: usize,

    /// Chunks executed on the submitting thread because the queue was full.
    pub ran_inline: usize,

    /// Jobs that panicked. Whatever they emitted before panicking is kept.
    pub panicked: usize,

    /// The join deadline passed with work still outstanding.
    pub timed_out: bool,
}

#[derive(Debug)]
pub struct Dispatcher {
    workers: usize,
    queue_capacity: usize,
    join_timeout: Duration,
    state: DispatchState,
}

impl Dispatcher {
    pub fn new(workers: usize, queue_capacity: usize, join_timeout: Duration) -> Self {
        Self {
            workers: workers.max(1),
            queue_capacity: queue_capacity.max(1),
            join_timeout,
            state: DispatchState::Idle,
        }
    }

    pub fn from_settings(settings: &CheckSettings) -> Self {
        Self::new(
            settings.workers,
            settings.queue_capacity,
            settings.join_timeout,
        )
    }

    pub fn state(&self) -> DispatchState {
        self.state
    }

    /// Run `job` once for every chunk.
    ///
    /// Fails only if a worker thread cannot be spawned. A timed-out join is
    /// logged and reported through [`DispatchReport::timed_out`]; jobs still
    /// running at that point are left to finish on their own.
    pub fn run<I, F>(&mut self, chunks: I, job: F) -> Result<DispatchReport>
    where
        I: IntoIterator<Item = String>,
        F: Fn(String) + Send + Sync + 'static,
    {
        let job = Arc::new(job);
        let panicked = Arc::new(AtomicUsize::new(0));
        let (task_sender, task_receiver) = bounded::<String>(self.queue_capacity);
        let (done_sender, done_receiver) = unbounded::<usize>();

        self.state = DispatchState::Accepting;
        log::debug!(
            "Starting {} spell-check workers (queue capacity {})",
            self.workers,
            self.queue_capacity
        );

        let mut handles = Vec::with_capacity(self.workers);
        for worker_id in 0..self.workers {
            let task_receiver = task_receiver.clone();
            let job = Arc::clone(&job);
            let panicked = Arc::clone(&panicked);
            let done = DoneSignal {
                worker_id,
                sender: done_sender.clone(),
            };

            let handle = thread::Builder::new()
                .name(format!("spell-worker-{worker_id}"))
                .spawn(move || {
                    let _done = done;
                    while let Ok(chunk) = task_receiver.recv() {
                        run_guarded(job.as_ref(), chunk, &panicked);
                    }
                })
                .map_err(|e| {
                    self.state = DispatchState::Done;
                    SpellError::IoUnlocated(e)
                })?;
            handles.push(handle);
        }
        drop(task_receiver);
        drop(done_sender);

        let mut report = DispatchReport::default();
        for chunk in chunks {
            report.submitted += 1;
            match task_sender.try_send(chunk) {
                Ok(()) => {}
                Err(TrySendError::Full(chunk)) | Err(TrySendError::Disconnected(chunk)) => {
                    log::trace!("Work queue full, running chunk on the submitting thread");
                    report.ran_inline += 1;
                    run_guarded(job.as_ref(), chunk, &panicked);
                }
            }
        }

        self.state = DispatchState::Draining;
        drop(task_sender);

        let deadline = Instant::now() + self.join_timeout;
        let mut finished = 0;
        while finished < handles.len() {
            match done_receiver.recv_deadline(deadline) {
                Ok(worker_id) => {
                    log::trace!("spell-worker-{} finished", worker_id);
                    finished += 1;
                }
                Err(_) => {
                    report.timed_out = true;
                    break;
                }
            }
        }

        if report.timed_out {
            log::warn!("{}", SpellError::ConcurrencyTimeout(self.join_timeout));
        } else {
            for handle in handles {
                let _ = handle.join();
            }
        }

        report.panicked = panicked.load(Ordering::Acquire);
        self.state = DispatchState::Done;
        Ok(report)
    }
}

/// Signals the dispatcher when a worker exits, however it exits.
struct DoneSignal {
    worker_id: usize,
    sender: Sender<usize>,
}

impl Drop for DoneSignal {
    fn drop(&mut self) {
        let _ = self.sender.send(self.worker_id);
    }
}

fn run_guarded<F: Fn(String)>(job: &F, chunk: String, panicked: &AtomicUsize) {
    if let Err(cause) = panic::catch_unwind(AssertUnwindSafe(|| job(chunk))) {
        let msg = cause
            .downcast_ref::<&str>()
            .map(|s| s.to_string())
            .or_else(|| cause.downcast_ref::<String>().cloned())
            .unwrap_or_else(|| "unknown panic".to_string());
        log::error!("Spell-check job failed: {}", msg);
        panicked.fetch_add(1, Ordering::AcqRel);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use parking_lot::Mutex;
    use std::collections::HashMap;

    #[test]
    fn test_every_chunk_runs_exactly_once() {
        let seen = Arc::new(Mutex::new(HashMap::<String, usize>::new()));
        let counter = Arc::clone(&seen);

        let mut dispatcher = Dispatcher::new(2, 50, Duration::from_secs(60));
        assert_eq!(dispatcher.state(), DispatchState::Idle);

        let chunks = (0..1000).map(|i| format!("chunk {i}"));
        let report = dispatcher
            .run(chunks, move |chunk| {
                *counter.lock().entry(chunk).or_insert(0) += 1;
            })
            .unwrap();

        assert_eq!(dispatcher.state(), DispatchState::Done);
        assert_eq!(report.submitted, 1000);
        assert!(!report.timed_out);
        let seen = seen.lock();
        assert_eq!(seen.len(), 1000);
        assert!(seen.values().all(|&n| n == 1));
    }

    #[test]
    fn test_full_queue_runs_on_caller() {
        let mut dispatcher = Dispatcher::new(1, 1, Duration::from_secs(60));
        let caller = thread::current().id();
        let inline = Arc::new(AtomicUsize::new(0));
        let inline_count = Arc::clone(&inline);

        let report = dispatcher
            .run((0..20).map(|i| i.to_string()), move |_| {
                if thread::current().id() == caller {
                    inline_count.fetch_add(1, Ordering::SeqCst);
                }
                thread::sleep(Duration::from_millis(5));
            })
            .unwrap();

        assert!(report.ran_inline > 0);
        assert_eq!(report.ran_inline, inline.load(Ordering::SeqCst));
    }

    #[test]
    fn test_panicking_job_does_not_stop_pool() {
        let done = Arc::new(AtomicUsize::new(0));
        let done_count = Arc::clone(&done);

        let mut dispatcher = Dispatcher::new(2, 50, Duration::from_secs(60));
        let chunks = vec!["ok".to_string(), "boom".to_string(), "ok".to_string()];
        let report = dispatcher
            .run(chunks, move |chunk| {
                if chunk == "boom" {
                    panic!("bad chunk");
                }
                done_count.fetch_add(1, Ordering::SeqCst);
            })
            .unwrap();

        assert_eq!(report.panicked, 1);
        assert_eq!(done.load(Ordering::SeqCst), 2);
        assert!(!report.timed_out);
    }

    #[test]
    fn test_join_timeout_returns_partial() {
        let mut dispatcher = Dispatcher::new(1, 10, Duration::from_millis(50));
        let report = dispatcher
            .run(vec!["slow".to_string()], |_| {
                thread::sleep(Duration::from_millis(500));
            })
            .unwrap();

        assert!(report.timed_out);
        assert_eq!(dispatcher.state(), DispatchState::Done);
    }

    #[test]
    fn test_no_chunks() {
        let mut dispatcher = Dispatcher::new(2, 50, Duration::from_secs(1));
        let report = dispatcher.run(Vec::new(), |_| {}).unwrap();
        assert_eq!(report, DispatchReport::default());
    }
}
