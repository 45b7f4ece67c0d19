//! `csv-graph-reducer` turns a spreadsheet-style CSV into a smaller CSV ready for charting:
//! a projected, renamed subset of columns with optional row decimation.
//!
//! Columns are addressed by position using spreadsheet letters (`A`, `B`, ..., `AA`, ...), see
//! [`address`]. A projection keeps one X column followed by ordered Y columns; Y columns can be
//! tagged for a secondary chart axis, and their 1-based output positions are handed to the chart
//! renderer.
//!
//! ## Quick example: reduce a file
//!
//! ```no_run
//! use std::sync::Arc;
//!
//! use csv_graph_reducer::observability::StdErrObserver;
//! use csv_graph_reducer::processing::reduce_file;
//! use csv_graph_reducer::types::{ColumnSpec, ProjectionConfig};
//!
//! # fn main() -> Result<(), csv_graph_reducer::ReduceError> {
//! let config = ProjectionConfig::new(ColumnSpec::new("A").with_title("time"))
//!     .with_y(ColumnSpec::new("C"))
//!     .with_y(ColumnSpec::new("F").on_secondary_axis())
//!     .with_reduce_rows(10);
//!
//! let summary = reduce_file(&config, "log.csv", "log_graph.csv", Arc::new(StdErrObserver))?;
//! println!(
//!     "rows={} secondary={:?}",
//!     summary.stats.rows_written,
//!     summary.secondary_positions()
//! );
//! # Ok(())
//! # }
//! ```
//!
//! ## Input and output format
//!
//! - Fields are split on bare commas; there is no quoting or escaping.
//! - Input lines may end in `\n` or `\r\n`; output lines always end in `\r\n`.
//! - Cell bytes are copied verbatim (no re-encoding).
//! - A data line may be missing its last cell (one fewer comma than the header); anything
//!   shorter fails the run with [`ReduceError::ShortRow`].
//! - With `reduce_rows = N > 0`, only lines whose absolute 1-based line number (header = 1) is a
//!   multiple of `N` are written. The header is always written.
//!
//! ## Modules
//!
//! - [`address`]: column letter codec
//! - [`types`]: projection config and results
//! - [`processing`]: projection resolution, decimation, streaming reducer
//! - [`config`]: JSON graph configuration files and directory discovery
//! - [`observability`]: observer hooks (the logging capability passed into runs)
//! - [`render`]: chart renderer seam (and the `xlsx` feature's workbook renderer)
//! - [`pipeline`]: reduce → render → clean up, for one file
//! - [`execution`]: bounded parallel batches of files
//! - [`error`]: error types

pub mod address;
pub mod config;
pub mod error;
pub mod execution;
pub mod observability;
pub mod pipeline;
pub mod processing;
pub mod render;
pub mod types;

pub use error::{ReduceError, ReduceResult};
