use magic_core::{IniMode, IniOptions, Magic, Value};

fn check(mut magic: Magic, expected: &str) {
    assert_eq!(magic.count(), 1);
    assert!(magic.exists("k"));
    assert_eq!(magic.get("k"), expected);
}

#[test]
fn test_create_flat_from_plain() {
    check(Magic::from_plain(serde_json::json!({"k": "v"})), "v");
}

#[test]
fn test_create_flat_from_json() {
    check(Magic::from_json(r#"{"k":"v"}"#).unwrap(), "v");
}

#[test]
fn test_create_flat_from_json_with_comments() {
    let source = r#"
        {
            // Comment
            "k": "v"
        }
    "#;
    check(Magic::from_json_with_comments(source).unwrap(), "v");
}

#[test]
fn test_create_flat_from_json_with_comment_in_string() {
    check(
        Magic::from_json_with_comments(r#"{"k": "NO // comment!"}"#).unwrap(),
        "NO // comment!",
    );
}

#[test]
fn test_create_flat_from_json_with_trailing_comment() {
    check(
        Magic::from_json_with_comments("{\"k\": \"v\" // the value\n}").unwrap(),
        "v",
    );
}

#[test]
fn test_create_flat_from_yaml() {
    check(Magic::from_yaml("k: v").unwrap(), "v");
}

#[test]
fn test_create_flat_from_query_string() {
    check(Magic::from_query_string("k=v"), "v");
}

#[test]
fn test_create_flat_from_ini() {
    check(Magic::from_ini("k = v").unwrap(), "v");
}

#[test]
fn test_create_from_typed_ini() {
    let options = IniOptions {
        sections: true,
        mode: IniMode::Typed,
    };
    let mut magic = Magic::from_ini_with("[server]\nport = 8080\ntls = on\n", &options).unwrap();

    let server = magic.container_mut("server").unwrap();
    assert_eq!(server.get("port").as_i64(), Some(8080));
    assert_eq!(server.get("tls"), Value::Bool(true));
}

#[test]
fn test_serialize() {
    let magic = Magic::from_plain(serde_json::json!({"k": "v"}));

    assert_eq!(serde_json::to_string(&magic).unwrap(), r#"{"k":"v"}"#);
    assert_eq!(magic.to_string(), r#"{"k":"v"}"#);
    assert_eq!(magic.to_json().unwrap(), r#"{"k":"v"}"#);
}

#[test]
fn test_not_exists() {
    let mut magic = Magic::new();

    assert_eq!(magic.count(), 0);
    assert!(!magic.has(["x"]));
    assert!(magic.get("x").is_null());
    assert_eq!(magic.get_or("x", "y"), "y");
}

#[test]
fn test_sort() {
    let mut magic = Magic::from_plain(serde_json::json!({"z": "z"}));
    magic.set("a", "a");

    let sorted = magic.to_plain(true);
    assert_eq!(Magic::from_plain(sorted.clone()).to_plain(false), sorted);
}

#[test]
fn test_sort_auto() {
    let mut magic = Magic::from_plain(serde_json::json!({"z": "z"}));
    magic.set("a", "a");

    assert_eq!(
        serde_json::to_string(&magic.to_plain(true)).unwrap(),
        r#"{"a":"a","z":"z"}"#
    );
    assert_eq!(
        serde_json::to_string(&magic.to_plain(false)).unwrap(),
        r#"{"z":"z","a":"a"}"#
    );
}
