//! Column projection, row decimation and the streaming reducer that combines them.
//!
//! - [`resolve_projection()`]: resolve configured column addresses against a header line
//! - [`Decimator`]: keep one line in every N (absolute line numbers, header = line 1)
//! - [`CsvReducer`]: stream a CSV through both, writing CRLF-terminated output
//! - [`reduce_file()`]: the whole open → header → data → close sequence for two paths
//!
//! ## Example
//!
//! ```rust
//! use csv_graph_reducer::processing::resolve_projection;
//! use csv_graph_reducer::types::{ColumnSpec, ProjectionConfig};
//!
//! let config = ProjectionConfig::new(ColumnSpec::new("A"))
//!     .with_y(ColumnSpec::new("C").on_secondary_axis())
//!     .with_y(ColumnSpec::new("Z"));
//!
//! let p = resolve_projection(&config, &["A", "B", "C", "D"]).unwrap();
//! assert_eq!(p.header_line(), "A,C");
//! assert_eq!(p.secondary_positions, vec![1]);
//! assert_eq!(p.skipped.len(), 1);
//! ```

pub mod decimate;
pub mod projection;
pub mod reducer;

pub use decimate::Decimator;
pub use projection::resolve_projection;
pub use reducer::{reduce_file, CsvReducer, WRITE_BUFFER_SIZE};
