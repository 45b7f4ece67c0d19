use std::path::PathBuf;

use thiserror::Error;

/// Convenience result type for reduction operations.
pub type ReduceResult<T> = Result<T, ReduceError>;

/// Error type returned by the reducer, the configuration loader and the graph pipeline.
///
/// A single error enum shared across the crate; skipped Y columns are not errors and are
/// reported through [`crate::observability::ReductionObserver::on_skipped_column`] instead.
#[derive(Debug, Error)]
pub enum ReduceError {
    /// Underlying I/O error (open/read/write/close failure, or a source with no header line).
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[cfg(feature = "xlsx")]
    /// Error reading the projected CSV back in the workbook renderer.
    #[error("csv error: {0}")]
    Csv(#[from] csv::Error),

    /// Configuration file could not be parsed or serialized.
    #[error("config error: {0}")]
    Json(#[from] serde_json::Error),

    /// Configuration directory pattern was invalid.
    #[error("config discovery error: {0}")]
    Pattern(#[from] glob::PatternError),

    #[cfg(feature = "xlsx")]
    /// Workbook rendering error (feature-gated behind `xlsx`).
    #[error("xlsx error: {0}")]
    Xlsx(#[from] rust_xlsxwriter::XlsxError),

    /// The X-axis column resolves outside the header width. Fatal before any data is scanned.
    #[error("X-axis column out of range: '{address}' is column {index} but the header has {header_width} cells")]
    XAxisOutOfRange {
        address: String,
        index: u64,
        header_width: usize,
    },

    /// A data line has fewer cells than `header_width - 1`.
    #[error("column count dropped below header width - 1 at line {line}: {cells} cells, header has {header_width}")]
    ShortRow {
        line: u64,
        cells: usize,
        header_width: usize,
    },

    /// A reducer step was invoked out of sequence (e.g. data before header).
    #[error("reducer used out of order: {message}")]
    OutOfOrder { message: String },

    /// The requested configuration name is not part of the catalog.
    #[error("config not found: {name}")]
    ConfigNotFound { name: String },

    /// A batch contained a file that is not a `.csv`.
    #[error("unsupported input (expected .csv): {}", path.display())]
    UnsupportedInput { path: PathBuf },

    /// A batch was submitted while another one was still running.
    #[error("a batch is already running")]
    Busy,

    /// The chart renderer reported a failure.
    #[error("render error: {message}")]
    Render { message: String },
}

impl ReduceError {
    /// Build a [`ReduceError::Render`] from any displayable message.
    pub fn render(message: impl Into<String>) -> Self {
        Self::Render {
            message: message.into(),
        }
    }
}
