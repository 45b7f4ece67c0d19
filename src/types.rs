//! Core data model types for projection.
//!
//! A [`ProjectionConfig`] describes which input columns to keep (one X column followed by
//! ordered Y columns) and how aggressively to decimate rows. Resolving it against a header line
//! produces a [`Projection`].

use crate::address::ColumnAddress;

/// One logical output column.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ColumnSpec {
    /// Input column, addressed spreadsheet-style.
    pub address: ColumnAddress,
    /// Output header text. `None` or an empty string keeps the input header cell.
    pub title: Option<String>,
    /// Plot against the secondary value axis. Ignored for the X column.
    pub secondary: bool,
}

impl ColumnSpec {
    /// Create a column spec with no title override on the primary axis.
    pub fn new(address: impl Into<ColumnAddress>) -> Self {
        Self {
            address: address.into(),
            title: None,
            secondary: false,
        }
    }

    /// Set the output header text.
    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    /// Mark this column for the secondary axis.
    pub fn on_secondary_axis(mut self) -> Self {
        self.secondary = true;
        self
    }

    /// Title override, if set and non-empty.
    pub fn title_override(&self) -> Option<&str> {
        self.title.as_deref().filter(|t| !t.is_empty())
    }
}

/// Immutable description of a reduction run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProjectionConfig {
    /// The X column; always output position 0.
    pub x_column: ColumnSpec,
    /// Y columns in output order.
    pub y_columns: Vec<ColumnSpec>,
    /// Keep one line in every `reduce_rows` (by absolute line number). `0` keeps everything.
    pub reduce_rows: u64,
}

impl ProjectionConfig {
    /// Create a config with the given X column, no Y columns and no decimation.
    pub fn new(x_column: ColumnSpec) -> Self {
        Self {
            x_column,
            y_columns: Vec::new(),
            reduce_rows: 0,
        }
    }

    /// Append a Y column.
    pub fn with_y(mut self, column: ColumnSpec) -> Self {
        self.y_columns.push(column);
        self
    }

    /// Set the decimation interval.
    pub fn with_reduce_rows(mut self, reduce_rows: u64) -> Self {
        self.reduce_rows = reduce_rows;
        self
    }
}

/// A Y column dropped during resolution because it lies beyond the header width.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SkippedColumn {
    /// Raw address as configured.
    pub address: String,
    /// Decoded 0-based index.
    pub index: u64,
    /// Number of cells in the header line.
    pub header_width: usize,
}

/// Result of resolving a [`ProjectionConfig`] against a header line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Projection {
    /// Number of cells in the input header line.
    pub header_width: usize,
    /// Input column indexes in output order; `column_indices[0]` is the X column.
    pub column_indices: Vec<usize>,
    /// Output header cells, raw bytes (input cells are passed through verbatim).
    pub header: Vec<Vec<u8>>,
    /// 1-based output positions of the Y columns on the secondary axis.
    pub secondary_positions: Vec<usize>,
    /// Y columns that were dropped.
    pub skipped: Vec<SkippedColumn>,
}

impl Projection {
    /// Number of output columns.
    pub fn width(&self) -> usize {
        self.column_indices.len()
    }

    /// Output header joined with `,` (lossy UTF-8, for display).
    pub fn header_line(&self) -> String {
        self.header
            .iter()
            .map(|cell| String::from_utf8_lossy(cell))
            .collect::<Vec<_>>()
            .join(",")
    }
}

/// Counters collected while scanning data lines.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DataStats {
    /// Data lines read (header excluded).
    pub data_lines: u64,
    /// Data lines written after decimation.
    pub rows_written: u64,
}

/// Everything a completed reduction run reports back.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReductionSummary {
    /// Resolved projection.
    pub projection: Projection,
    /// Data line counters.
    pub stats: DataStats,
}

impl ReductionSummary {
    /// 1-based secondary-axis output positions, as expected by chart renderers.
    pub fn secondary_positions(&self) -> &[usize] {
        &self.projection.secondary_positions
    }
}
