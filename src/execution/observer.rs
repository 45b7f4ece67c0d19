use std::fmt;
use std::path::PathBuf;
use std::sync::atomic::{AtomicU64, AtomicUsize, Ordering};
use std::time::Duration;

/// Batch events emitted by the executor.
#[derive(Debug, Clone)]
pub enum BatchEvent {
    BatchStarted { files: usize, max_in_flight: usize },
    ThrottleWaited { duration: Duration },
    FileStarted { input: PathBuf },
    FileFinished { input: PathBuf, ok: bool, rows_written: u64 },
    BatchFinished {
        elapsed: Duration,
        metrics: BatchMetricsSnapshot,
    },
}

/// Observer hook for batch events.
pub trait BatchObserver: Send + Sync {
    fn on_event(&self, event: &BatchEvent);
}

/// A simple stderr logger for batch events.
#[derive(Default)]
pub struct StdErrBatchObserver;

impl BatchObserver for StdErrBatchObserver {
    fn on_event(&self, event: &BatchEvent) {
        eprintln!("[batch] {event:?}");
    }
}

/// Real-time counters for a batch.
///
/// The executor updates these while files are processed; callers can snapshot them at any time.
pub struct BatchMetrics {
    batch_id: AtomicU64,
    elapsed_ns: AtomicU64,

    files_started: AtomicU64,
    files_succeeded: AtomicU64,
    files_failed: AtomicU64,
    rows_written: AtomicU64,
    throttle_wait_ns: AtomicU64,

    active_files: AtomicUsize,
    max_active_files: AtomicUsize,
}

impl BatchMetrics {
    pub fn new() -> Self {
        Self {
            batch_id: AtomicU64::new(0),
            elapsed_ns: AtomicU64::new(0),
            files_started: AtomicU64::new(0),
            files_succeeded: AtomicU64::new(0),
            files_failed: AtomicU64::new(0),
            rows_written: AtomicU64::new(0),
            throttle_wait_ns: AtomicU64::new(0),
            active_files: AtomicUsize::new(0),
            max_active_files: AtomicUsize::new(0),
        }
    }

    pub(crate) fn begin_batch(&self) {
        let _ = self.batch_id.fetch_add(1, Ordering::SeqCst);
        self.elapsed_ns.store(0, Ordering::SeqCst);
        self.files_started.store(0, Ordering::SeqCst);
        self.files_succeeded.store(0, Ordering::SeqCst);
        self.files_failed.store(0, Ordering::SeqCst);
        self.rows_written.store(0, Ordering::SeqCst);
        self.throttle_wait_ns.store(0, Ordering::SeqCst);
        self.active_files.store(0, Ordering::SeqCst);
        self.max_active_files.store(0, Ordering::SeqCst);
    }

    pub(crate) fn end_batch(&self, elapsed: Duration) {
        self.elapsed_ns.store(saturating_nanos(elapsed), Ordering::SeqCst);
    }

    pub(crate) fn on_file_start(&self) {
        let _ = self.files_started.fetch_add(1, Ordering::SeqCst);
        let now = self.active_files.fetch_add(1, Ordering::SeqCst) + 1;
        update_max_usize(&self.max_active_files, now);
    }

    pub(crate) fn on_file_end(&self, ok: bool, rows_written: u64) {
        if ok {
            let _ = self.files_succeeded.fetch_add(1, Ordering::SeqCst);
        } else {
            let _ = self.files_failed.fetch_add(1, Ordering::SeqCst);
        }
        let _ = self.rows_written.fetch_add(rows_written, Ordering::SeqCst);
        let _ = self.active_files.fetch_sub(1, Ordering::SeqCst);
    }

    pub(crate) fn on_throttle_wait(&self, d: Duration) {
        let _ = self
            .throttle_wait_ns
            .fetch_add(saturating_nanos(d), Ordering::SeqCst);
    }

    pub fn snapshot(&self) -> BatchMetricsSnapshot {
        let elapsed_ns = self.elapsed_ns.load(Ordering::SeqCst);
        let elapsed = if elapsed_ns > 0 {
            Some(Duration::from_nanos(elapsed_ns))
        } else {
            None
        };

        BatchMetricsSnapshot {
            batch_id: self.batch_id.load(Ordering::SeqCst),
            elapsed,
            files_started: self.files_started.load(Ordering::SeqCst),
            files_succeeded: self.files_succeeded.load(Ordering::SeqCst),
            files_failed: self.files_failed.load(Ordering::SeqCst),
            rows_written: self.rows_written.load(Ordering::SeqCst),
            throttle_wait: Duration::from_nanos(self.throttle_wait_ns.load(Ordering::SeqCst)),
            max_active_files: self.max_active_files.load(Ordering::SeqCst),
        }
    }
}

impl Default for BatchMetrics {
    fn default() -> Self {
        Self::new()
    }
}

fn saturating_nanos(d: Duration) -> u64 {
    d.as_nanos().min(u64::MAX as u128) as u64
}

fn update_max_usize(dst: &AtomicUsize, now: usize) {
    let _ = dst.fetch_max(now, Ordering::SeqCst);
}

/// Immutable snapshot of [`BatchMetrics`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BatchMetricsSnapshot {
    pub batch_id: u64,
    pub elapsed: Option<Duration>,
    pub files_started: u64,
    pub files_succeeded: u64,
    pub files_failed: u64,
    pub rows_written: u64,
    pub throttle_wait: Duration,
    pub max_active_files: usize,
}

impl fmt::Display for BatchMetricsSnapshot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "batch_id={}, files={}/{} ok, failed={}, rows_written={}, max_active_files={}, throttle_wait={:?}, elapsed={:?}",
            self.batch_id,
            self.files_succeeded,
            self.files_started,
            self.files_failed,
            self.rows_written,
            self.max_active_files,
            self.throttle_wait,
            self.elapsed
        )
    }
}
