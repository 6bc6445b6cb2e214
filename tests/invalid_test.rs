use magic_core::{Magic, MagicError, ParseError};

#[test]
fn test_create_flat_from_invalid_json() {
    let err = Magic::from_json(r#"{"k""v"}"#).unwrap_err();

    assert!(matches!(err, MagicError::Parse(ParseError::Json { .. })));
    assert_eq!(err.sub_code(), Some(100));
}

#[test]
fn test_create_from_scalar_json() {
    let err = Magic::from_json(r#""just a string""#).unwrap_err();
    assert_eq!(err.sub_code(), Some(100));
}

#[test]
fn test_create_flat_from_invalid_json_with_comments() {
    let err = Magic::from_json_with_comments("{\"k\": // no value\n}").unwrap_err();
    assert_eq!(err.sub_code(), Some(100));
}

#[test]
fn test_create_flat_from_invalid_yaml() {
    let err = Magic::from_yaml("> a").unwrap_err();
    assert_eq!(err.sub_code(), Some(102));
}

#[test]
fn test_create_flat_from_invalid_ini() {
    let err = Magic::from_ini("a == a").unwrap_err();

    assert!(matches!(err, MagicError::Parse(ParseError::Ini { .. })));
    assert_eq!(err.sub_code(), Some(103));
}

#[test]
fn test_json_file_not_found() {
    let err = Magic::from_json_file_with_comments("./tests/assets/missing.json").unwrap_err();
    assert!(matches!(err, MagicError::SourceNotFound { .. }));
    assert_eq!(err.sub_code(), Some(101));
}

#[test]
fn test_json_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("config.json");
    std::fs::write(&path, "{\n  // port\n  \"port\": 80\n}").unwrap();

    assert!(Magic::from_json_file(&path).is_err());

    let mut magic = Magic::from_json_file_with_comments(&path).unwrap();
    assert_eq!(magic.get("port").as_i64(), Some(80));
}

#[test]
fn test_error_display() {
    let err = Magic::from_json("{ invalid").unwrap_err();
    assert!(!err.to_string().is_empty());

    let report = format!("{:?}", miette::Report::new(err));
    assert!(!report.is_empty());
}
