//! Bounded parallel execution of the graph pipeline over many input files.
//!
//! Each file is an independent reduction run with its own reducer state; runs share nothing
//! but the renderer and the observers. This module provides:
//!
//! - A rayon worker pool sized by [`BatchOptions::num_threads`]
//! - A cap on concurrently running files ([`BatchOptions::max_in_flight`])
//! - Real-time metrics + observer hooks for monitoring

mod observer;
mod semaphore;

use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::{Duration, Instant};

use rayon::ThreadPool;
use rayon::ThreadPoolBuilder;
use rayon::prelude::*;

use crate::config::GraphConfig;
use crate::error::{ReduceError, ReduceResult};
use crate::pipeline::{create_graph, GraphOptions, GraphOutput};
use crate::render::ChartRenderer;

pub use observer::{BatchEvent, BatchMetrics, BatchMetricsSnapshot, BatchObserver, StdErrBatchObserver};

use semaphore::Semaphore;

/// Configuration for the [`BatchExecutor`].
#[derive(Debug, Clone)]
pub struct BatchOptions {
    /// Number of worker threads.
    ///
    /// If `None`, uses the platform's available parallelism.
    pub num_threads: Option<usize>,
    /// Upper bound on files processed at the same time (bounds open handles and buffers).
    pub max_in_flight: usize,
}

impl Default for BatchOptions {
    fn default() -> Self {
        let n = std::thread::available_parallelism().map(|n| n.get()).unwrap_or(1);
        Self {
            num_threads: Some(n),
            max_in_flight: n.max(1),
        }
    }
}

/// Result for one input of a batch.
#[derive(Debug)]
pub struct BatchOutcome {
    pub input: PathBuf,
    pub result: ReduceResult<GraphOutput>,
}

/// Runs [`create_graph`] over a list of CSV files with bounded parallelism.
///
/// Only one batch runs at a time per executor; a second [`BatchExecutor::run`] call made while
/// a batch is in progress returns [`ReduceError::Busy`].
pub struct BatchExecutor {
    pool: ThreadPool,
    opts: BatchOptions,
    observer: Option<Arc<dyn BatchObserver>>,
    metrics: Arc<BatchMetrics>,
    running: AtomicBool,
}

struct RunningGuard<'a>(&'a AtomicBool);

impl Drop for RunningGuard<'_> {
    fn drop(&mut self) {
        self.0.store(false, Ordering::SeqCst);
    }
}

impl BatchExecutor {
    /// Create a new executor with the given options.
    ///
    /// # Panics
    ///
    /// Panics if `max_in_flight == 0` or `num_threads == Some(0)`.
    pub fn new(opts: BatchOptions) -> Self {
        assert!(opts.max_in_flight > 0, "max_in_flight must be > 0");
        if let Some(n) = opts.num_threads {
            assert!(n > 0, "num_threads must be > 0 when set");
        }

        let n_threads = opts
            .num_threads
            .unwrap_or_else(|| std::thread::available_parallelism().map(|n| n.get()).unwrap_or(1))
            .max(1);

        let pool = ThreadPoolBuilder::new()
            .num_threads(n_threads)
            .build()
            .expect("failed to build rayon thread pool");

        Self {
            pool,
            opts,
            observer: None,
            metrics: Arc::new(BatchMetrics::new()),
            running: AtomicBool::new(false),
        }
    }

    /// Attach an observer for batch events.
    pub fn with_observer(mut self, observer: Arc<dyn BatchObserver>) -> Self {
        self.observer = Some(observer);
        self
    }

    /// Get a handle to real-time batch metrics.
    pub fn metrics(&self) -> Arc<BatchMetrics> {
        Arc::clone(&self.metrics)
    }

    /// Whether a batch is currently running.
    pub fn is_running(&self) -> bool {
        self.running.load(Ordering::SeqCst)
    }

    /// Process every input; outcomes are returned in input order.
    ///
    /// The whole batch is rejected with [`ReduceError::UnsupportedInput`] if any input lacks a
    /// `.csv` extension. A failing file does not stop the others.
    pub fn run<P>(
        &self,
        inputs: &[P],
        config: &GraphConfig,
        renderer: &dyn ChartRenderer,
        options: &GraphOptions,
    ) -> ReduceResult<Vec<BatchOutcome>>
    where
        P: AsRef<Path> + Sync,
    {
        if let Some(bad) = inputs
            .iter()
            .map(AsRef::as_ref)
            .find(|p| p.extension().is_none_or(|e| e != "csv"))
        {
            return Err(ReduceError::UnsupportedInput {
                path: bad.to_path_buf(),
            });
        }
        if self
            .running
            .compare_exchange(false, true, Ordering::SeqCst, Ordering::SeqCst)
            .is_err()
        {
            return Err(ReduceError::Busy);
        }
        let _guard = RunningGuard(&self.running);

        let start = Instant::now();
        self.metrics.begin_batch();
        self.emit(BatchEvent::BatchStarted {
            files: inputs.len(),
            max_in_flight: self.opts.max_in_flight,
        });

        let sem = Semaphore::new(self.opts.max_in_flight);
        let outcomes: Vec<BatchOutcome> = self.pool.install(|| {
            inputs
                .par_iter()
                .map(|input| self.run_one(&sem, input.as_ref(), config, renderer, options))
                .collect()
        });

        self.metrics.end_batch(start.elapsed());
        self.emit(BatchEvent::BatchFinished {
            elapsed: start.elapsed(),
            metrics: self.metrics.snapshot(),
        });
        Ok(outcomes)
    }

    fn run_one(
        &self,
        sem: &Semaphore,
        input: &Path,
        config: &GraphConfig,
        renderer: &dyn ChartRenderer,
        options: &GraphOptions,
    ) -> BatchOutcome {
        let (_permit, waited) = sem.acquire();
        if waited > Duration::ZERO {
            self.metrics.on_throttle_wait(waited);
            self.emit(BatchEvent::ThrottleWaited { duration: waited });
        }

        self.metrics.on_file_start();
        self.emit(BatchEvent::FileStarted {
            input: input.to_path_buf(),
        });

        let result = create_graph(input, config, renderer, options);
        let rows_written = result
            .as_ref()
            .map(|o| o.summary.stats.rows_written)
            .unwrap_or(0);

        self.metrics.on_file_end(result.is_ok(), rows_written);
        self.emit(BatchEvent::FileFinished {
            input: input.to_path_buf(),
            ok: result.is_ok(),
            rows_written,
        });

        BatchOutcome {
            input: input.to_path_buf(),
            result,
        }
    }

    fn emit(&self, event: BatchEvent) {
        if let Some(obs) = &self.observer {
            obs.on_event(&event);
        }
    }
}
