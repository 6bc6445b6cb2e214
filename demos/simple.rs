use magic_core::{Magic, Value};

fn main() {
    let config = r#"
        {
            // who we are
            "user": {
                "name": "John Doe",
                "email": "john.doe@example.com"
            }
        }
    "#;

    match Magic::from_json_with_comments(config) {
        Ok(mut magic) => {
            magic.protect("request_id", |owner| Value::from(format!("req-{}", owner.count())));
            if let Ok(Some(name)) = magic.call("getUser", None) {
                println!("user: {name:?}");
            }
            println!("Successfully parsed JSON:\n{}", magic.to_json_pretty().unwrap_or_default());
        }
        Err(e) => {
            eprintln!("Failed to parse JSON: {:?}", miette::Report::new(e));
        }
    }
}
