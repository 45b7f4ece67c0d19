use std::fs;

use csv_graph_reducer::config::{ConfigCatalog, GraphConfig, YColumnConfig};
use csv_graph_reducer::ReduceError;

const CONFIG_DIR: &str = "tests/fixtures/config";

#[test]
fn discovers_json_files_in_sorted_order() {
    let catalog = ConfigCatalog::discover(CONFIG_DIR).unwrap();

    let names: Vec<&str> = catalog.names().collect();
    assert_eq!(names, vec!["10_temperature.json", "20_legacy.json"]);
    assert_eq!(catalog.len(), 2);
    assert_eq!(catalog.current_index(), 0);
    assert!(catalog
        .current_path()
        .is_some_and(|p| p.ends_with("10_temperature.json")));
}

#[test]
fn select_then_load_legacy_keys() {
    let mut catalog = ConfigCatalog::discover(CONFIG_DIR).unwrap();
    catalog.select("20_legacy.json").unwrap();
    assert_eq!(catalog.current_index(), 1);

    let config = catalog.load().unwrap();
    assert_eq!(config.x_axis, "a");
    assert_eq!(config.reduce_rows, 3);
    assert_eq!(config.y_columns.len(), 2);
    assert_eq!(config.y_columns[0].axis_title.as_deref(), Some("hPa"));
    assert!(config.y_columns[1].axis_secondary);

    let projection = config.to_projection();
    assert_eq!(projection.x_column.address.index(), 0);
    assert_eq!(projection.y_columns[0].address.index(), 3);
    assert_eq!(projection.y_columns[1].address.index(), 1);
    assert!(projection.y_columns[1].secondary);
}

#[test]
fn unknown_name_keeps_selection() {
    let mut catalog = ConfigCatalog::discover(CONFIG_DIR).unwrap();

    let err = catalog.select("missing.json").unwrap_err();

    assert!(matches!(err, ReduceError::ConfigNotFound { ref name } if name == "missing.json"));
    assert_eq!(catalog.current_index(), 0);
}

#[test]
fn empty_directory_yields_empty_catalog() {
    let dir = tempfile::tempdir().unwrap();
    fs::write(dir.path().join("readme.txt"), "not a config").unwrap();
    fs::create_dir(dir.path().join("nested.json")).unwrap();

    let catalog = ConfigCatalog::discover(dir.path()).unwrap();

    assert!(catalog.is_empty());
    assert!(catalog.current_path().is_none());
    assert!(matches!(catalog.load(), Err(ReduceError::ConfigNotFound { .. })));
}

#[test]
fn saved_config_is_rediscovered() {
    let dir = tempfile::tempdir().unwrap();
    let config = GraphConfig {
        x_axis: "A".to_string(),
        x_axis_title: None,
        y_columns: vec![YColumnConfig {
            axis: "AB".to_string(),
            axis_title: Some("flow".to_string()),
            axis_secondary: true,
        }],
        reduce_rows: 0,
    };
    config.write_to_path(dir.path().join("flow.json")).unwrap();

    let catalog = ConfigCatalog::discover(dir.path()).unwrap();
    let loaded = catalog.load().unwrap();

    assert_eq!(loaded, config);
    let text = fs::read_to_string(dir.path().join("flow.json")).unwrap();
    assert!(text.contains("\"axisSecondary\": true"));
    assert!(!text.contains("reduceRows"));
}

#[test]
fn malformed_json_is_reported() {
    let dir = tempfile::tempdir().unwrap();
    fs::write(dir.path().join("broken.json"), "{ \"xAxis\": ").unwrap();

    let catalog = ConfigCatalog::discover(dir.path()).unwrap();

    assert!(matches!(catalog.load(), Err(ReduceError::Json(_))));
}
