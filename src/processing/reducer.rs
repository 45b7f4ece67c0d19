//! Streaming CSV reducer.
//!
//! A run is strictly sequential: [`CsvReducer::open`] → [`CsvReducer::scan_header`] →
//! [`CsvReducer::scan_data`] → [`CsvReducer::close`]. [`reduce_file`] performs the whole
//! sequence for a pair of paths.
//!
//! Input lines are split on bare commas (no quoting) and may end in `\n` or `\r\n`. Output
//! lines always end in `\r\n`; cell bytes are written verbatim, with no quoting or escaping.
//!
//! ```rust
//! use std::sync::Arc;
//!
//! use csv_graph_reducer::observability::NullObserver;
//! use csv_graph_reducer::processing::CsvReducer;
//! use csv_graph_reducer::types::{ColumnSpec, ProjectionConfig};
//!
//! # fn main() -> Result<(), csv_graph_reducer::ReduceError> {
//! let config = ProjectionConfig::new(ColumnSpec::new("A")).with_y(ColumnSpec::new("C"));
//! let input = "t,a,b\n0,1,2\n1,3,4\n";
//!
//! let mut out = Vec::new();
//! let mut reducer = CsvReducer::new(input.as_bytes(), &mut out, Arc::new(NullObserver));
//! reducer.scan_header(&config)?;
//! reducer.scan_data()?;
//! reducer.close()?;
//!
//! assert_eq!(out, b"t,b\r\n0,2\r\n1,4\r\n");
//! # Ok(())
//! # }
//! ```

use std::fs::{self, File};
use std::io::{self, BufRead, BufReader, BufWriter, Write};
use std::path::Path;
use std::sync::Arc;

use crate::error::{ReduceError, ReduceResult};
use crate::observability::{ReductionContext, ReductionObserver};
use crate::types::{DataStats, Projection, ProjectionConfig, ReductionSummary};

use super::decimate::Decimator;
use super::projection::resolve_projection;

/// Output buffer size; nothing reaches the sink before it fills or [`CsvReducer::close`].
pub const WRITE_BUFFER_SIZE: usize = 128 * 1024;

/// Per-run state, created by a successful header scan.
#[derive(Debug)]
struct ReductionState {
    header_width: usize,
    column_indices: Vec<usize>,
    decimator: Decimator,
    line_number: u64,
}

/// Projects and decimates one CSV stream into another.
///
/// Both handles are owned by the reducer and released when it is closed or dropped, so an
/// early `?` return never leaks them.
pub struct CsvReducer<R, W: Write> {
    source: R,
    sink: BufWriter<W>,
    ctx: ReductionContext,
    observer: Arc<dyn ReductionObserver>,
    state: Option<ReductionState>,
    line: Vec<u8>,
}

impl CsvReducer<BufReader<File>, File> {
    /// Open `input` for reading and create (or truncate) `output`.
    pub fn open(
        input: impl AsRef<Path>,
        output: impl AsRef<Path>,
        observer: Arc<dyn ReductionObserver>,
    ) -> ReduceResult<Self> {
        let (input, output) = (input.as_ref(), output.as_ref());
        let source = BufReader::new(File::open(input)?);
        let sink = File::create(output)?;
        let mut reducer = Self::new(source, sink, observer);
        reducer.ctx = ReductionContext::new(input, output);
        Ok(reducer)
    }
}

impl<R: BufRead, W: Write> CsvReducer<R, W> {
    /// Wrap an arbitrary source and sink.
    pub fn new(source: R, sink: W, observer: Arc<dyn ReductionObserver>) -> Self {
        Self {
            source,
            sink: BufWriter::with_capacity(WRITE_BUFFER_SIZE, sink),
            ctx: ReductionContext::new("<reader>", "<writer>"),
            observer,
            state: None,
            line: Vec::new(),
        }
    }

    /// Replace the context passed to observer callbacks.
    pub fn with_context(mut self, ctx: ReductionContext) -> Self {
        self.ctx = ctx;
        self
    }

    /// Context passed to observer callbacks.
    pub fn context(&self) -> &ReductionContext {
        &self.ctx
    }

    /// Read the header line, resolve `config` against it and write the projected header.
    ///
    /// Skipped Y columns are reported to the observer. Fails with an
    /// [`io::ErrorKind::UnexpectedEof`] I/O error when the source is empty.
    pub fn scan_header(&mut self, config: &ProjectionConfig) -> ReduceResult<Projection> {
        if self.state.is_some() {
            return Err(ReduceError::OutOfOrder {
                message: "header already scanned".to_string(),
            });
        }
        if !read_line(&mut self.source, &mut self.line)? {
            return Err(io::Error::new(io::ErrorKind::UnexpectedEof, "no header line").into());
        }

        let cells: Vec<&[u8]> = self.line.split(|&b| b == b',').collect();
        let projection = resolve_projection(config, &cells)?;
        for column in &projection.skipped {
            self.observer.on_skipped_column(&self.ctx, column);
        }
        write_line(&mut self.sink, projection.header.iter().map(Vec::as_slice))?;

        self.state = Some(ReductionState {
            header_width: projection.header_width,
            column_indices: projection.column_indices.clone(),
            decimator: Decimator::new(config.reduce_rows),
            line_number: 1,
        });
        Ok(projection)
    }

    /// Project and decimate every remaining line.
    ///
    /// A line with fewer than `header_width - 1` cells aborts the run with
    /// [`ReduceError::ShortRow`]. A line missing exactly its last cell is accepted; a projected
    /// column beyond the end of such a line is written as an empty cell.
    pub fn scan_data(&mut self) -> ReduceResult<DataStats> {
        let Self {
            source,
            sink,
            state,
            line,
            ..
        } = self;
        let Some(state) = state.as_mut() else {
            return Err(ReduceError::OutOfOrder {
                message: "scan_data called before scan_header".to_string(),
            });
        };

        let mut stats = DataStats::default();
        while read_line(source, line)? {
            state.line_number += 1;
            stats.data_lines += 1;

            let cells: Vec<&[u8]> = line.split(|&b| b == b',').collect();
            if cells.len() + 1 < state.header_width {
                return Err(ReduceError::ShortRow {
                    line: state.line_number,
                    cells: cells.len(),
                    header_width: state.header_width,
                });
            }
            if !state.decimator.keep(state.line_number) {
                continue;
            }

            write_line(
                sink,
                state
                    .column_indices
                    .iter()
                    .map(|&i| cells.get(i).copied().unwrap_or_default()),
            )?;
            stats.rows_written += 1;
        }
        Ok(stats)
    }

    /// Flush buffered output and release both handles.
    pub fn close(mut self) -> ReduceResult<()> {
        self.sink.flush()?;
        Ok(())
    }
}

/// Read one line into `buf` without its `\n` / `\r\n` terminator.
///
/// Returns `false` at end of input. A final line without a terminator is still returned, minus
/// a trailing `\r`.
fn read_line<R: BufRead>(source: &mut R, buf: &mut Vec<u8>) -> io::Result<bool> {
    buf.clear();
    if source.read_until(b'\n', buf)? == 0 {
        return Ok(false);
    }
    if buf.last() == Some(&b'\n') {
        buf.pop();
    }
    if buf.last() == Some(&b'\r') {
        buf.pop();
    }
    Ok(true)
}

/// Write `cells` joined with `,` and terminated by `\r\n`.
fn write_line<'a, W: Write>(
    sink: &mut W,
    cells: impl IntoIterator<Item = &'a [u8]>,
) -> io::Result<()> {
    for (i, cell) in cells.into_iter().enumerate() {
        if i > 0 {
            sink.write_all(b",")?;
        }
        sink.write_all(cell)?;
    }
    sink.write_all(b"\r\n")
}

/// Run a complete reduction from `input` to `output`.
///
/// On any failure the partially written `output` is removed before the error is returned. If
/// that removal fails, the observer's `on_cleanup_failure` is called and the original error is
/// still returned.
pub fn reduce_file(
    config: &ProjectionConfig,
    input: impl AsRef<Path>,
    output: impl AsRef<Path>,
    observer: Arc<dyn ReductionObserver>,
) -> ReduceResult<ReductionSummary> {
    let (input, output) = (input.as_ref(), output.as_ref());
    let reducer = CsvReducer::open(input, output, Arc::clone(&observer))?;

    let result = run_to_completion(reducer, config);
    if result.is_err() {
        let ctx = ReductionContext::new(input, output);
        discard_file(&ctx, output, observer.as_ref());
    }
    result
}

/// Remove `path`, reporting any failure other than "not found" to `observer`.
pub(crate) fn discard_file(ctx: &ReductionContext, path: &Path, observer: &dyn ReductionObserver) {
    match fs::remove_file(path) {
        Ok(()) => {}
        Err(e) if e.kind() == io::ErrorKind::NotFound => {}
        Err(e) => observer.on_cleanup_failure(ctx, path, &e),
    }
}

fn run_to_completion<R: BufRead, W: Write>(
    mut reducer: CsvReducer<R, W>,
    config: &ProjectionConfig,
) -> ReduceResult<ReductionSummary> {
    let projection = reducer.scan_header(config)?;
    let stats = reducer.scan_data()?;
    reducer.close()?;
    Ok(ReductionSummary { projection, stats })
}
