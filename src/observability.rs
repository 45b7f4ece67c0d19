//! Observer hooks for reduction runs.
//!
//! There is no process-wide logger: every reducer and pipeline call receives an
//! `Arc<dyn ReductionObserver>`, so concurrent runs can log independently.

use std::fmt;
use std::fs::OpenOptions;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};
use std::time::{SystemTime, UNIX_EPOCH};

use crate::error::ReduceError;
use crate::types::{DataStats, SkippedColumn};

/// Severity classification used for observer callbacks and alerting thresholds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum ReductionSeverity {
    /// Informational event.
    Info,
    /// Warning-level event (non-fatal, e.g. a skipped column).
    Warning,
    /// Error-level event (the run failed).
    Error,
    /// Critical error (I/O or other infrastructure failures).
    Critical,
}

impl ReductionSeverity {
    /// Severity of a failed run.
    pub fn for_error(e: &ReduceError) -> Self {
        match e {
            ReduceError::Io(_) => Self::Critical,
            #[cfg(feature = "xlsx")]
            ReduceError::Csv(err) => match err.kind() {
                csv::ErrorKind::Io(_) => Self::Critical,
                _ => Self::Error,
            },
            _ => Self::Error,
        }
    }
}

/// Context about a reduction attempt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReductionContext {
    /// Source CSV.
    pub input: PathBuf,
    /// Projected CSV being written.
    pub output: PathBuf,
}

impl ReductionContext {
    pub fn new(input: impl Into<PathBuf>, output: impl Into<PathBuf>) -> Self {
        Self {
            input: input.into(),
            output: output.into(),
        }
    }
}

/// Observer interface for reduction events.
///
/// Implementors can record metrics, logs, or trigger alerts. All methods default to no-ops.
pub trait ReductionObserver: Send + Sync {
    /// Called once per Y column dropped because it lies beyond the header width.
    fn on_skipped_column(&self, _ctx: &ReductionContext, _column: &SkippedColumn) {}

    /// Called when a run succeeds.
    fn on_success(&self, _ctx: &ReductionContext, _stats: DataStats) {}

    /// Called when a run fails.
    fn on_failure(&self, _ctx: &ReductionContext, _severity: ReductionSeverity, _error: &ReduceError) {}

    /// Called when a failure meets an alert threshold.
    ///
    /// Default behavior forwards to [`Self::on_failure`].
    fn on_alert(&self, ctx: &ReductionContext, severity: ReductionSeverity, error: &ReduceError) {
        self.on_failure(ctx, severity, error)
    }

    /// Called when a file that should have been removed after a run could not be.
    fn on_cleanup_failure(&self, _ctx: &ReductionContext, _path: &Path, _error: &io::Error) {}
}

/// Discards every event.
#[derive(Debug, Default, Clone, Copy)]
pub struct NullObserver;

impl ReductionObserver for NullObserver {}

/// An observer that fans out callbacks to a list of observers.
#[derive(Default)]
pub struct CompositeObserver {
    observers: Vec<Arc<dyn ReductionObserver>>,
}

impl CompositeObserver {
    /// Create a new composite observer from a list of observers.
    pub fn new(observers: Vec<Arc<dyn ReductionObserver>>) -> Self {
        Self { observers }
    }
}

impl fmt::Debug for CompositeObserver {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CompositeObserver")
            .field("observers_len", &self.observers.len())
            .finish()
    }
}

impl ReductionObserver for CompositeObserver {
    fn on_skipped_column(&self, ctx: &ReductionContext, column: &SkippedColumn) {
        for o in &self.observers {
            o.on_skipped_column(ctx, column);
        }
    }

    fn on_success(&self, ctx: &ReductionContext, stats: DataStats) {
        for o in &self.observers {
            o.on_success(ctx, stats);
        }
    }

    fn on_failure(&self, ctx: &ReductionContext, severity: ReductionSeverity, error: &ReduceError) {
        for o in &self.observers {
            o.on_failure(ctx, severity, error);
        }
    }

    fn on_alert(&self, ctx: &ReductionContext, severity: ReductionSeverity, error: &ReduceError) {
        for o in &self.observers {
            o.on_alert(ctx, severity, error);
        }
    }

    fn on_cleanup_failure(&self, ctx: &ReductionContext, path: &Path, error: &io::Error) {
        for o in &self.observers {
            o.on_cleanup_failure(ctx, path, error);
        }
    }
}

/// Logs reduction events to stderr.
#[derive(Debug, Default)]
pub struct StdErrObserver;

impl ReductionObserver for StdErrObserver {
    fn on_skipped_column(&self, ctx: &ReductionContext, column: &SkippedColumn) {
        eprintln!(
            "[reduce][Warning] path={} skipped column '{}' (index {}, header width {})",
            ctx.input.display(),
            column.address,
            column.index,
            column.header_width
        );
    }

    fn on_success(&self, ctx: &ReductionContext, stats: DataStats) {
        eprintln!(
            "[reduce][ok] path={} out={} lines={} rows={}",
            ctx.input.display(),
            ctx.output.display(),
            stats.data_lines,
            stats.rows_written
        );
    }

    fn on_failure(&self, ctx: &ReductionContext, severity: ReductionSeverity, error: &ReduceError) {
        eprintln!(
            "[reduce][{:?}] path={} err={}",
            severity,
            ctx.input.display(),
            error
        );
    }

    fn on_alert(&self, ctx: &ReductionContext, severity: ReductionSeverity, error: &ReduceError) {
        eprintln!(
            "[ALERT][reduce][{:?}] path={} err={}",
            severity,
            ctx.input.display(),
            error
        );
    }

    fn on_cleanup_failure(&self, ctx: &ReductionContext, path: &Path, error: &io::Error) {
        eprintln!(
            "[reduce][Warning] path={} could not remove {}: {}",
            ctx.input.display(),
            path.display(),
            error
        );
    }
}

/// Appends reduction events to a local log file.
#[derive(Debug)]
pub struct FileObserver {
    path: PathBuf,
    lock: Mutex<()>,
}

impl FileObserver {
    /// Create a file observer that appends events to `path`.
    ///
    /// Writes are best-effort; failures to open/write the log file are ignored.
    pub fn new(path: impl AsRef<Path>) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
            lock: Mutex::new(()),
        }
    }

    fn append_line(&self, line: &str) {
        let _guard = self.lock.lock().ok();
        if let Ok(mut f) = OpenOptions::new().create(true).append(true).open(&self.path) {
            let _ = writeln!(f, "{line}");
        }
    }
}

impl ReductionObserver for FileObserver {
    fn on_skipped_column(&self, ctx: &ReductionContext, column: &SkippedColumn) {
        self.append_line(&format!(
            "{} warn path={} skipped={} index={} header_width={}",
            unix_ts(),
            ctx.input.display(),
            column.address,
            column.index,
            column.header_width
        ));
    }

    fn on_success(&self, ctx: &ReductionContext, stats: DataStats) {
        self.append_line(&format!(
            "{} ok path={} out={} lines={} rows={}",
            unix_ts(),
            ctx.input.display(),
            ctx.output.display(),
            stats.data_lines,
            stats.rows_written
        ));
    }

    fn on_failure(&self, ctx: &ReductionContext, severity: ReductionSeverity, error: &ReduceError) {
        self.append_line(&format!(
            "{} fail severity={:?} path={} err={}",
            unix_ts(),
            severity,
            ctx.input.display(),
            error
        ));
    }

    fn on_alert(&self, ctx: &ReductionContext, severity: ReductionSeverity, error: &ReduceError) {
        self.append_line(&format!(
            "{} ALERT severity={:?} path={} err={}",
            unix_ts(),
            severity,
            ctx.input.display(),
            error
        ));
    }

    fn on_cleanup_failure(&self, ctx: &ReductionContext, path: &Path, error: &io::Error) {
        self.append_line(&format!(
            "{} warn path={} cleanup={} err={}",
            unix_ts(),
            ctx.input.display(),
            path.display(),
            error
        ));
    }
}

fn unix_ts() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default()
        .as_secs()
}

#[cfg(test)]
mod tests {
    use std::io;

    use super::{FileObserver, ReductionContext, ReductionObserver, ReductionSeverity};
    use crate::error::ReduceError;
    use crate::types::{DataStats, SkippedColumn};

    #[test]
    fn severity_classifies_io_as_critical() {
        let io = ReduceError::Io(io::Error::new(io::ErrorKind::NotFound, "gone"));
        assert_eq!(ReductionSeverity::for_error(&io), ReductionSeverity::Critical);

        let short = ReduceError::ShortRow {
            line: 3,
            cells: 1,
            header_width: 4,
        };
        assert_eq!(ReductionSeverity::for_error(&short), ReductionSeverity::Error);
        assert!(ReductionSeverity::Warning < ReductionSeverity::Error);
    }

    #[test]
    fn file_observer_appends_lines() {
        let dir = tempfile::tempdir().unwrap();
        let log = dir.path().join("reduce.log");
        let obs = FileObserver::new(&log);
        let ctx = ReductionContext::new("in.csv", "in_graph.csv");

        obs.on_skipped_column(
            &ctx,
            &SkippedColumn {
                address: "Z".to_string(),
                index: 25,
                header_width: 4,
            },
        );
        obs.on_success(
            &ctx,
            DataStats {
                data_lines: 9,
                rows_written: 3,
            },
        );

        let text = std::fs::read_to_string(&log).unwrap();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines.len(), 2);
        assert!(lines[0].contains("warn path=in.csv skipped=Z index=25"));
        assert!(lines[1].contains("ok path=in.csv out=in_graph.csv lines=9 rows=3"));
    }
}
