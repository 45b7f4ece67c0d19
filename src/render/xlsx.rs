//! Workbook renderer backed by `rust_xlsxwriter` (feature `xlsx`).

use std::collections::HashSet;
use std::path::Path;

use rust_xlsxwriter::{Chart, ChartLegendPosition, ChartType, Workbook};

use crate::error::{ReduceError, ReduceResult};

use super::ChartRenderer;

const DATA_SHEET: &str = "Sheet1";
const CHART_SHEET: &str = "Graph1";

/// Writes the projected CSV to a workbook with an XY line chart on its own chart sheet.
///
/// Column 0 is the X series; every other column becomes a Y series, on the secondary axis
/// when its position is listed. Cells that parse as numbers are stored as numbers. The image
/// path is not written: this renderer does not rasterize charts.
#[derive(Debug, Clone, Default)]
pub struct XlsxChartRenderer {
    /// Chart title; defaults to the CSV file stem.
    pub title: Option<String>,
}

impl XlsxChartRenderer {
    /// Renderer titling each chart after its CSV file stem.
    pub fn new() -> Self {
        Self::default()
    }

    /// Use a fixed chart title.
    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }
}

impl ChartRenderer for XlsxChartRenderer {
    fn render_chart(
        &self,
        csv_path: &Path,
        workbook_path: &Path,
        _image: &Path,
        secondary: &[usize],
    ) -> ReduceResult<()> {
        let mut rdr = csv::ReaderBuilder::new()
            .has_headers(true)
            .flexible(true)
            .quoting(false)
            .from_path(csv_path)?;
        let headers = rdr.headers()?.clone();

        let mut workbook = Workbook::new();
        let mut last_row: u32 = 0;
        {
            let sheet = workbook.add_worksheet();
            sheet.set_name(DATA_SHEET)?;
            for (col, h) in headers.iter().enumerate() {
                sheet.write_string(0, column_number(col)?, h)?;
            }
            for (i, record) in rdr.records().enumerate() {
                let record = record?;
                let row = row_number(i + 1)?;
                for (col, cell) in record.iter().enumerate() {
                    let col = column_number(col)?;
                    match cell.trim().parse::<f64>() {
                        Ok(v) => {
                            sheet.write_number(row, col, v)?;
                        }
                        Err(_) => {
                            sheet.write_string(row, col, cell)?;
                        }
                    }
                }
                last_row = row;
            }
        }

        if last_row > 0 && headers.len() > 1 {
            let chart = self.build_chart(csv_path, &headers, last_row, secondary)?;
            let chartsheet = workbook.add_chartsheet();
            chartsheet.set_name(CHART_SHEET)?;
            chartsheet.insert_chart(0, 0, &chart)?;
        }

        workbook.save(workbook_path)?;
        Ok(())
    }
}

impl XlsxChartRenderer {
    fn build_chart(
        &self,
        csv_path: &Path,
        headers: &csv::StringRecord,
        last_row: u32,
        secondary: &[usize],
    ) -> ReduceResult<Chart> {
        let secondary: HashSet<usize> = secondary.iter().copied().collect();
        let mut primary_names = Vec::new();
        let mut secondary_names = Vec::new();

        let mut chart = Chart::new(ChartType::ScatterStraight);
        for col in 1..headers.len() {
            let name = headers.get(col).unwrap_or_default();
            let c = column_number(col)?;
            let series = chart
                .add_series()
                .set_categories((DATA_SHEET, 1, 0, last_row, 0))
                .set_values((DATA_SHEET, 1, c, last_row, c))
                .set_name((DATA_SHEET, 0, c));
            if secondary.contains(&col) {
                series.set_secondary_axis(true);
                secondary_names.push(name);
            } else {
                primary_names.push(name);
            }
        }

        let title = match &self.title {
            Some(t) => t.clone(),
            None => csv_path
                .file_stem()
                .map(|s| s.to_string_lossy().into_owned())
                .unwrap_or_default(),
        };
        chart.title().set_name(title.as_str());
        chart.x_axis().set_name(headers.get(0).unwrap_or_default());
        let primary_title = primary_names.join(" / ");
        chart.y_axis().set_name(primary_title.as_str());
        if !secondary_names.is_empty() {
            let secondary_title = secondary_names.join(" / ");
            chart.y2_axis().set_name(secondary_title.as_str());
        }
        chart.legend().set_position(ChartLegendPosition::Bottom);
        Ok(chart)
    }
}

fn column_number(col: usize) -> ReduceResult<u16> {
    u16::try_from(col)
        .map_err(|_| ReduceError::render(format!("column {col} is beyond the worksheet column range")))
}

fn row_number(row: usize) -> ReduceResult<u32> {
    u32::try_from(row)
        .map_err(|_| ReduceError::render(format!("row {row} is beyond the worksheet row range")))
}
