//! Chart rendering seam.
//!
//! The reducer hands a projected CSV and the secondary-axis positions to a [`ChartRenderer`].
//! Rendering itself is pluggable: any closure with the right signature works, and the
//! `xlsx` feature provides [`XlsxChartRenderer`], which builds a workbook with a scatter chart.

#[cfg(feature = "xlsx")]
pub mod xlsx;

use std::path::Path;

use crate::error::ReduceResult;

#[cfg(feature = "xlsx")]
pub use xlsx::XlsxChartRenderer;

/// Renders a projected CSV into a workbook and (optionally) an image.
pub trait ChartRenderer: Send + Sync {
    /// `secondary` holds 1-based output column positions (column 0 is the X axis).
    fn render_chart(
        &self,
        csv: &Path,
        workbook: &Path,
        image: &Path,
        secondary: &[usize],
    ) -> ReduceResult<()>;
}

impl<F> ChartRenderer for F
where
    F: Fn(&Path, &Path, &Path, &[usize]) -> ReduceResult<()> + Send + Sync,
{
    fn render_chart(
        &self,
        csv: &Path,
        workbook: &Path,
        image: &Path,
        secondary: &[usize],
    ) -> ReduceResult<()> {
        self(csv, workbook, image, secondary)
    }
}
