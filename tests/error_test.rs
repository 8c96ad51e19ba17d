//! Tests for error types

use interference::Error;
use std::path::PathBuf;

#[test]
fn test_missing_file_error() {
    let error = Error::MissingFile {
        path: PathBuf::from("measurements/b/1/0/summary_out.csv"),
    };
    let error_str = format!("{error}");
    assert!(error_str.contains("Missing measurement file"));
    assert!(error_str.contains("summary_out.csv"));
}

#[test]
fn test_malformed_table_error() {
    let error = Error::MalformedTable {
        path: PathBuf::from("x.csv"),
        reason: "missing column 'Avg Response Time'".to_string(),
    };
    let error_str = format!("{error}");
    assert!(error_str.contains("Malformed table x.csv"));
    assert!(error_str.contains("Avg Response Time"));
}

#[test]
fn test_insufficient_samples_error() {
    let error = Error::InsufficientSamples {
        step: "200rps".to_string(),
        count: 1,
    };
    let error_str = format!("{error}");
    assert!(error_str.contains("Insufficient samples for step 200rps"));
    assert!(error_str.contains("got 1"));
}

#[test]
fn test_invalid_argument_error() {
    let error = Error::InvalidArgument("duration must be positive, got 0".to_string());
    let error_str = format!("{error}");
    assert!(error_str.contains("Invalid argument"));
    assert!(error_str.contains("duration must be positive"));
}

#[test]
fn test_no_measurements_error() {
    let error = Error::NoMeasurements {
        root: PathBuf::from("measurements/empty"),
    };
    assert!(format!("{error}").contains("No measurements found under measurements/empty"));
}

#[test]
fn test_io_error_conversion() {
    let io_error = std::io::Error::new(std::io::ErrorKind::NotFound, "file not found");
    let error: Error = io_error.into();
    let error_str = format!("{error}");
    assert!(error_str.contains("IO error"));
    assert!(error_str.contains("file not found"));
}

#[test]
fn test_arrow_error_conversion() {
    let arrow_error = arrow::error::ArrowError::SchemaError("bad schema".to_string());
    let error: Error = arrow_error.into();
    assert!(format!("{error}").contains("Arrow error"));
}

#[test]
fn test_yaml_error_conversion() {
    let yaml_error = serde_yaml::from_str::<f64>("[not, a, number]").unwrap_err();
    let error: Error = yaml_error.into();
    assert!(format!("{error}").contains("YAML error"));
}

#[test]
fn test_error_debug_format() {
    let error = Error::InvalidArgument("steps".to_string());
    let debug_str = format!("{error:?}");
    assert!(debug_str.contains("InvalidArgument"));
}
