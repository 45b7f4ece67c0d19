#![cfg(feature = "xlsx")]

use std::fs;
use std::sync::Arc;

use calamine::{open_workbook_auto, Data, Reader};
use csv_graph_reducer::config::GraphConfig;
use csv_graph_reducer::observability::NullObserver;
use csv_graph_reducer::pipeline::{create_graph, GraphOptions};
use csv_graph_reducer::render::{ChartRenderer, XlsxChartRenderer};

#[test]
fn workbook_holds_projected_data_as_numbers() {
    let dir = tempfile::tempdir().unwrap();
    let csv = dir.path().join("run_graph.csv");
    let workbook = dir.path().join("run_graph.csv.xlsx");
    let image = dir.path().join("run_graph.csv.xlsx.png");
    fs::write(&csv, "t,volts,status\r\n0,1.5,ok\r\n1,1.75,ok\r\n").unwrap();

    XlsxChartRenderer::new()
        .with_title("run")
        .render_chart(&csv, &workbook, &image, &[2])
        .unwrap();

    assert!(!image.exists());
    let mut book = open_workbook_auto(&workbook).unwrap();
    let range = book.worksheet_range("Sheet1").unwrap();
    assert_eq!(range.get_size(), (3, 3));
    assert_eq!(range.get_value((0, 1)), Some(&Data::String("volts".to_string())));
    assert_eq!(range.get_value((2, 1)), Some(&Data::Float(1.75)));
    assert_eq!(range.get_value((1, 2)), Some(&Data::String("ok".to_string())));
}

#[test]
fn header_only_csv_still_produces_a_workbook() {
    let dir = tempfile::tempdir().unwrap();
    let csv = dir.path().join("empty_graph.csv");
    let workbook = dir.path().join("empty_graph.csv.xlsx");
    fs::write(&csv, "t,volts\r\n").unwrap();

    XlsxChartRenderer::new()
        .render_chart(&csv, &workbook, &dir.path().join("unused.png"), &[])
        .unwrap();

    assert!(workbook.exists());
}

#[test]
fn pipeline_writes_workbook_next_to_input() {
    let dir = tempfile::tempdir().unwrap();
    let input = dir.path().join("measurements.csv");
    fs::copy("tests/fixtures/measurements.csv", &input).unwrap();
    let config = GraphConfig::from_path("tests/fixtures/config/10_temperature.json").unwrap();
    let options = GraphOptions {
        observer: Arc::new(NullObserver),
        ..GraphOptions::default()
    };

    let out = create_graph(&input, &config, &XlsxChartRenderer::new(), &options).unwrap();

    assert!(out.paths.workbook.exists());
    assert!(!out.paths.reduced_csv.exists());
    let mut book = open_workbook_auto(&out.paths.workbook).unwrap();
    let range = book.worksheet_range("Sheet1").unwrap();
    assert_eq!(range.get_size(), (10, 3));
    assert_eq!(range.get_value((0, 0)), Some(&Data::String("elapsed".to_string())));
    assert_eq!(range.get_value((9, 2)), Some(&Data::Float(47.0)));
}
