use magic_core::{Magic, MagicError};
use serde_json::json;

#[test]
fn test_merge() {
    let mut magic = Magic::from_plain(json!({"k": {"k": "v"}}));

    magic.merge("k", [("x", "y")]).unwrap();

    assert_eq!(magic.container_mut("k").unwrap().count(), 2);
}

#[test]
fn test_merge_wraps_nested_maps() {
    let mut magic = Magic::new();

    let values = json!({"db": {"host": "localhost"}, "debug": true});
    if let serde_json::Value::Object(map) = values {
        magic.merge("config", map).unwrap();
    }

    let config = magic.container_mut("config").unwrap();
    assert!(config.has(["db", "debug"]));
    assert!(config.get("db").as_container().is_some());
}

#[test]
fn test_merge_chains() {
    let mut magic = Magic::new();

    magic
        .merge("k", [("a", 1)])
        .unwrap()
        .merge("k", [("b", 2)])
        .unwrap();

    assert_eq!(magic.to_string(), r#"{"k":{"a":1,"b":2}}"#);
}

#[test]
fn test_merge_invalid() {
    let mut magic = Magic::from_plain(json!({"k": "v"}));

    let err = magic.merge("k", [("x", "y")]).unwrap_err();

    assert!(matches!(err, MagicError::NotIterable { ref key } if key == "k"));
    assert_eq!(magic.to_string(), r#"{"k":"v"}"#);
}
