use std::fs;
use tempfile::tempdir;

use dragonc_core::{DragoncErrorExt, LowerConfig};

#[test]
fn defaults_match_printf_convention() {
    let config = LowerConfig::default();
    assert_eq!(config.entry_function, "main");
    assert_eq!(config.print_routine, "printf");
    assert_eq!(config.print_format.as_deref(), Some("%d\n"));
}

#[test]
fn partial_json_keeps_defaults() {
    let config = LowerConfig::from_json_str(r#"{ "print_routine": "puts_int" }"#).expect("parse");
    assert_eq!(config.print_routine, "puts_int");
    assert_eq!(config.entry_function, "main");
    assert_eq!(config.print_format.as_deref(), Some("%d\n"));

    let bare = LowerConfig::from_json_str(r#"{ "print_format": null }"#).expect("parse");
    assert_eq!(bare.print_format, None);
}

#[test]
fn loads_from_file() {
    let td = tempdir().expect("tempdir");
    let path = td.path().join("dragonc.json");
    fs::write(&path, r#"{ "entry_function": "start", "print_format": "%d " }"#).expect("write config");

    let config = LowerConfig::load_from_file(&path).expect("load");
    assert_eq!(config.entry_function, "start");
    assert_eq!(config.print_format.as_deref(), Some("%d "));
}

#[test]
fn malformed_file_reports_position() {
    let td = tempdir().expect("tempdir");
    let path = td.path().join("broken.json");
    fs::write(&path, "{\n  \"entry_function\": 3\n}").expect("write config");

    let err = LowerConfig::load_from_file(&path).expect_err("must fail");
    let loc = err.location().expect("location");
    assert_eq!(loc.line, 2);
    assert!(loc.file.ends_with("broken.json"));
    assert_eq!(err.issuer(), "dragonc.config");
}

#[test]
fn missing_file_is_an_error() {
    let td = tempdir().expect("tempdir");
    let err = LowerConfig::load_from_file(td.path().join("absent.json")).expect_err("must fail");
    assert!(err.message().starts_with("read config"));
}

#[test]
fn validation_rejects_unusable_names() {
    assert!(LowerConfig::from_json_str(r#"{ "entry_function": " " }"#).is_err());
    assert!(LowerConfig::from_json_str(r#"{ "print_routine": "" }"#).is_err());
    assert!(LowerConfig::from_json_str(r#"{ "entry_function": "out", "print_routine": "out" }"#).is_err());
}
