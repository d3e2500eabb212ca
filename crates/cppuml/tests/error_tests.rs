//! Tests for core error types

use cppuml::core::ConvertError;
use cppuml::plugins::orchestrator::{check_output_target, Converter, Settings};
use std::fs;
use std::path::Path;

#[test]
fn test_source_not_found() {
    let error = ConvertError::source_not_found("shapes.hpp");
    let error_msg = format!("{}", error);
    assert_eq!(error_msg, "File shapes.hpp not found.");
}

#[test]
fn test_output_is_directory() {
    let error = ConvertError::output_is_directory("diagrams");
    assert_eq!(format!("{}", error), "diagrams is a directory.");
}

#[test]
fn test_output_exists() {
    let error = ConvertError::output_exists("out.puml");
    assert_eq!(
        format!("{}", error),
        "out.puml already exists. Use -f to overwrite."
    );
}

#[test]
fn test_front_end_error() {
    let error = ConvertError::front_end_error("no tree");
    let error_msg = format!("{}", error);
    assert!(error_msg.contains("Front-end error"));
    assert!(error_msg.contains("no tree"));
}

#[test]
fn test_io_error() {
    use std::io;
    let io_err = io::Error::new(io::ErrorKind::NotFound, "File not found");
    let error: ConvertError = io_err.into();
    let error_msg = format!("{}", error);
    assert!(error_msg.contains("IO error"));
    assert!(error_msg.contains("File not found"));
}

#[test]
fn test_pipeline_errors_downcast() {
    let err = Converter::new(Settings::default())
        .convert(Path::new("nowhere/shapes.hpp"))
        .unwrap_err();
    assert!(matches!(
        err.downcast_ref::<ConvertError>(),
        Some(ConvertError::SourceNotFound { .. })
    ));
}

#[test]
fn test_no_partial_output_on_failure() {
    let dir = tempfile::tempdir().unwrap();
    let output = dir.path().join("out.puml");

    let result = Converter::new(Settings::default()).translate(
        Path::new("nowhere/shapes.hpp"),
        &output,
        false,
    );
    assert!(result.is_err());
    assert!(!output.exists());
}

#[test]
fn test_existing_output_is_untouched() {
    let dir = tempfile::tempdir().unwrap();
    let output = dir.path().join("out.puml");
    fs::write(&output, "previous").unwrap();

    let err = check_output_target(&output, false).unwrap_err();
    assert!(matches!(err, ConvertError::OutputExists { .. }));
    assert!(check_output_target(&output, true).is_ok());
    assert_eq!(fs::read_to_string(&output).unwrap(), "previous");
}
