//! Resolution of a [`ProjectionConfig`] against a header line.

use crate::error::{ReduceError, ReduceResult};
use crate::types::{ColumnSpec, Projection, ProjectionConfig, SkippedColumn};

/// Resolve `config` against the split cells of a header line.
///
/// Rules:
///
/// - The X column must lie inside the header, otherwise [`ReduceError::XAxisOutOfRange`].
/// - Y columns beyond the header are dropped (with their title and axis flag) and listed in
///   [`Projection::skipped`]; the run continues with the remaining columns.
/// - Output header cells use the title override when non-empty, else the input cell.
/// - Secondary-axis Y columns are recorded by 1-based output position.
pub fn resolve_projection<S: AsRef<[u8]>>(
    config: &ProjectionConfig,
    header_cells: &[S],
) -> ReduceResult<Projection> {
    let header_width = header_cells.len();
    let capacity = config.y_columns.len() + 1;
    let mut column_indices = Vec::with_capacity(capacity);
    let mut header = Vec::with_capacity(capacity);
    let mut secondary_positions = Vec::new();
    let mut skipped = Vec::new();

    let x = &config.x_column;
    let x_index = x.address.index();
    match in_range(x_index, header_width) {
        Some(idx) => {
            header.push(output_cell(x, header_cells[idx].as_ref()));
            column_indices.push(idx);
        }
        None => {
            return Err(ReduceError::XAxisOutOfRange {
                address: x.address.to_string(),
                index: x_index,
                header_width,
            });
        }
    }

    for y in &config.y_columns {
        let y_index = y.address.index();
        let Some(idx) = in_range(y_index, header_width) else {
            skipped.push(SkippedColumn {
                address: y.address.to_string(),
                index: y_index,
                header_width,
            });
            continue;
        };
        if y.secondary {
            secondary_positions.push(header.len());
        }
        header.push(output_cell(y, header_cells[idx].as_ref()));
        column_indices.push(idx);
    }

    Ok(Projection {
        header_width,
        column_indices,
        header,
        secondary_positions,
        skipped,
    })
}

fn in_range(index: u64, width: usize) -> Option<usize> {
    usize::try_from(index).ok().filter(|&i| i < width)
}

fn output_cell(spec: &ColumnSpec, raw: &[u8]) -> Vec<u8> {
    match spec.title_override() {
        Some(title) => title.as_bytes().to_vec(),
        None => raw.to_vec(),
    }
}
