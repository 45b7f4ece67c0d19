//! Graph configuration files.
//!
//! A configuration is a JSON document describing the X column, the Y columns and the
//! decimation interval:
//!
//! ```json
//! {
//!   "xAxis": "A",
//!   "xAxisTitle": "time",
//!   "yColumns": [
//!     { "axis": "C", "axisTitle": "voltage" },
//!     { "axis": "F", "axisSecondary": true }
//!   ],
//!   "reduceRows": 10
//! }
//! ```
//!
//! The legacy key spelling (`XAxis`, `XAxisTitle`, `Columns` with `YAxis` / `YAxisTitle` /
//! `YAxisSecondary`, `ReduceRows`) is accepted as well. Use [`ConfigCatalog`] to discover the
//! configuration files of a directory.

pub mod catalog;

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::address::ColumnAddress;
use crate::error::ReduceResult;
use crate::types::{ColumnSpec, ProjectionConfig};

pub use catalog::ConfigCatalog;

/// One configured Y column.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct YColumnConfig {
    #[serde(default, alias = "YAxis")]
    pub axis: String,
    #[serde(default, alias = "YAxisTitle", skip_serializing_if = "Option::is_none")]
    pub axis_title: Option<String>,
    #[serde(default, alias = "YAxisSecondary", skip_serializing_if = "is_false")]
    pub axis_secondary: bool,
}

/// On-disk graph configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GraphConfig {
    /// X column address; empty means column `A`.
    #[serde(default, alias = "XAxis")]
    pub x_axis: String,
    #[serde(default, alias = "XAxisTitle", skip_serializing_if = "Option::is_none")]
    pub x_axis_title: Option<String>,
    #[serde(default, alias = "Columns")]
    pub y_columns: Vec<YColumnConfig>,
    /// Keep one line in every `reduce_rows`; `0` disables decimation.
    #[serde(default, alias = "ReduceRows", skip_serializing_if = "is_zero")]
    pub reduce_rows: u64,
}

fn is_false(v: &bool) -> bool {
    !*v
}

fn is_zero(v: &u64) -> bool {
    *v == 0
}

impl GraphConfig {
    /// Parse a configuration from JSON text.
    pub fn from_json_str(text: &str) -> ReduceResult<Self> {
        Ok(serde_json::from_str(text)?)
    }

    /// Read and parse a configuration file.
    pub fn from_path(path: impl AsRef<Path>) -> ReduceResult<Self> {
        let text = fs::read_to_string(path)?;
        Self::from_json_str(&text)
    }

    /// Pretty-printed JSON (two-space indent), for display.
    pub fn to_pretty_json(&self) -> ReduceResult<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Write the configuration to `path` as pretty JSON, replacing any existing file.
    pub fn write_to_path(&self, path: impl AsRef<Path>) -> ReduceResult<()> {
        let mut text = self.to_pretty_json()?;
        text.push('\n');
        fs::write(path, text)?;
        Ok(())
    }

    /// Build the immutable projection description used by a reduction run.
    pub fn to_projection(&self) -> ProjectionConfig {
        let x_column = ColumnSpec {
            address: ColumnAddress::new(self.x_axis.as_str()),
            title: self.x_axis_title.clone(),
            secondary: false,
        };
        let y_columns = self
            .y_columns
            .iter()
            .map(|c| ColumnSpec {
                address: ColumnAddress::new(c.axis.as_str()),
                title: c.axis_title.clone(),
                secondary: c.axis_secondary,
            })
            .collect();
        ProjectionConfig {
            x_column,
            y_columns,
            reduce_rows: self.reduce_rows,
        }
    }
}

impl From<&GraphConfig> for ProjectionConfig {
    fn from(c: &GraphConfig) -> Self {
        c.to_projection()
    }
}

#[cfg(test)]
mod tests {
    use super::GraphConfig;

    #[test]
    fn parses_camel_case_contract() {
        let c = GraphConfig::from_json_str(
            r#"{
                "xAxis": "B",
                "xAxisTitle": "time",
                "yColumns": [
                    {"axis": "C", "axisTitle": "v"},
                    {"axis": "D", "axisSecondary": true}
                ],
                "reduceRows": 5
            }"#,
        )
        .unwrap();

        assert_eq!(c.x_axis, "B");
        assert_eq!(c.x_axis_title.as_deref(), Some("time"));
        assert_eq!(c.y_columns.len(), 2);
        assert!(c.y_columns[1].axis_secondary);
        assert_eq!(c.reduce_rows, 5);
    }

    #[test]
    fn parses_legacy_keys() {
        let c = GraphConfig::from_json_str(
            r#"{"XAxis":"A","Columns":[{"YAxis":"E","YAxisTitle":"t","YAxisSecondary":true}]}"#,
        )
        .unwrap();

        assert_eq!(c.x_axis, "A");
        assert_eq!(c.x_axis_title, None);
        assert_eq!(c.y_columns[0].axis, "E");
        assert_eq!(c.y_columns[0].axis_title.as_deref(), Some("t"));
        assert!(c.y_columns[0].axis_secondary);
        assert_eq!(c.reduce_rows, 0);
    }

    #[test]
    fn missing_keys_default() {
        let c = GraphConfig::from_json_str("{}").unwrap();
        assert_eq!(c, GraphConfig::default());

        let p = c.to_projection();
        assert_eq!(p.x_column.address.index(), 0);
        assert!(p.y_columns.is_empty());
    }

    #[test]
    fn to_projection_keeps_order_and_flags() {
        let c = GraphConfig::from_json_str(
            r#"{"xAxis":"a","yColumns":[{"axis":"ZZ"},{"axis":"c","axisSecondary":true,"axisTitle":""}]}"#,
        )
        .unwrap();
        let p = c.to_projection();

        assert_eq!(p.y_columns[0].address.index(), 701);
        assert_eq!(p.y_columns[1].address.index(), 2);
        assert!(p.y_columns[1].secondary);
        // Empty titles do not override the header cell.
        assert_eq!(p.y_columns[1].title_override(), None);
    }

    #[test]
    fn pretty_json_omits_defaults() {
        let c = GraphConfig::from_json_str(r#"{"XAxis":"A","Columns":[{"YAxis":"B"}]}"#).unwrap();
        let text = c.to_pretty_json().unwrap();

        assert!(text.contains("\"xAxis\": \"A\""));
        assert!(text.contains("\"axis\": \"B\""));
        assert!(!text.contains("reduceRows"));
        assert!(!text.contains("axisSecondary"));
        assert_eq!(GraphConfig::from_json_str(&text).unwrap(), c);
    }

    #[test]
    fn rejects_malformed_json() {
        let err = GraphConfig::from_json_str("{\"xAxis\": ").unwrap_err();
        assert!(err.to_string().contains("config error"));
    }
}
