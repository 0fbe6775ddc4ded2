//! Tests for the logger module

use crate::logger::config::*;
use crate::logger::error::LoggerError;
use crate::logger::writer::open_log_writer;
use std::io::Write;
use std::path::PathBuf;

fn create_test_config() -> LoggerConfig {
    LoggerConfig {
        console: ConsoleConfig {
            enabled: true,
            colored: false,
        },
        file: FileConfig {
            enabled: false,
            path: PathBuf::from("test.log"),
            append: true,
            format: LogFormat::Full,
        },
        level: "info".to_string(),
    }
}

#[test]
fn test_default_config_creation() {
    let config = LoggerConfig::default();
    assert!(config.console.enabled);
    assert!(config.console.colored);
    assert!(!config.file.enabled);
    assert_eq!(config.level, "info");
}

#[test]
fn test_config_validation() {
    let mut config = create_test_config();
    assert!(config.validate().is_ok());

    config.console.enabled = false;
    config.file.enabled = false;
    assert!(matches!(config.validate(), Err(LoggerError::Config { .. })));
}

#[test]
fn test_config_accepts_filter_directives() {
    let mut config = create_test_config();
    config.level = "info,reasonable_excuse=trace".to_string();
    assert!(config.validate().is_ok());

    config.level = "reasonable_excuse=loud".to_string();
    assert!(config.validate().is_err());
}

#[test]
fn test_file_path_required_when_enabled() {
    let mut config = create_test_config();
    config.file.enabled = true;
    config.file.path = PathBuf::new();
    assert!(config.validate().is_err());
}

#[test]
fn test_log_format_parsing() {
    assert_eq!("full".parse::<LogFormat>().unwrap(), LogFormat::Full);
    assert_eq!("COMPACT".parse::<LogFormat>().unwrap(), LogFormat::Compact);
    assert_eq!("json".parse::<LogFormat>().unwrap(), LogFormat::Json);
    assert!(matches!(
        "xml".parse::<LogFormat>(),
        Err(LoggerError::Format { .. })
    ));
    assert_eq!(LogFormat::Compact.as_str(), "compact");
    assert_eq!(LogFormat::default(), LogFormat::Full);
}

#[test]
fn test_writer_creates_parent_directories() {
    let temp_dir = tempfile::TempDir::new().unwrap();
    let path = temp_dir.path().join("nested").join("dir").join("app.log");

    let config = FileConfig::new(true, path.clone(), true, LogFormat::Json);
    let writer = open_log_writer(&config).unwrap();
    writer.lock().unwrap().write_all(b"hello\n").unwrap();

    assert_eq!(std::fs::read_to_string(&path).unwrap(), "hello\n");
}

#[test]
fn test_writer_append_and_truncate() {
    let temp_dir = tempfile::TempDir::new().unwrap();
    let path = temp_dir.path().join("app.log");
    std::fs::write(&path, "old\n").unwrap();

    let append = FileConfig::new(true, path.clone(), true, LogFormat::Full);
    open_log_writer(&append)
        .unwrap()
        .lock()
        .unwrap()
        .write_all(b"new\n")
        .unwrap();
    assert_eq!(std::fs::read_to_string(&path).unwrap(), "old\nnew\n");

    let truncate = FileConfig::new(true, path.clone(), false, LogFormat::Full);
    open_log_writer(&truncate)
        .unwrap()
        .lock()
        .unwrap()
        .write_all(b"fresh\n")
        .unwrap();
    assert_eq!(std::fs::read_to_string(&path).unwrap(), "fresh\n");
}
