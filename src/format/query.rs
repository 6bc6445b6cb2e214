use serde_json::{Map, Value};
use url::form_urlencoded;

/// Parses `application/x-www-form-urlencoded` text into a plain tree.
///
/// Keys may use bracket paths: `a[b]=1` nests a mapping, `a[]=1&a[]=2`
/// builds a sequence. Dots and spaces in the leading part of a key become
/// underscores. A leading `?` is part of the first key, not a separator.
/// Later pairs override earlier ones. Parsing never fails;
/// pairs with an empty key are skipped.
pub fn parse(input: &str) -> Value {
    let mut root = Map::new();

    for (key, value) in form_urlencoded::parse(input.as_bytes()) {
        let (base, path) = split_key(&key);
        if base.is_empty() {
            continue;
        }
        let slot = root.entry(base).or_insert(Value::Null);
        assign(slot, &path, value.into_owned());
    }

    Value::Object(root)
}

/// Splits `a.b[c][]` into the base `a_b` and the path `["c", ""]`.
fn split_key(key: &str) -> (String, Vec<String>) {
    let key = key.trim_start_matches(' ');
    let (base, mut rest) = match key.find('[') {
        Some(open) if key[open..].contains(']') => (&key[..open], &key[open..]),
        _ => (key, ""),
    };

    let base: String = base
        .chars()
        .map(|c| if matches!(c, '.' | ' ' | '[') { '_' } else { c })
        .collect();

    let mut path = Vec::new();
    while let Some(inner) = rest.strip_prefix('[') {
        let Some(close) = inner.find(']') else {
            break;
        };
        path.push(inner[..close].to_string());
        rest = &inner[close + 1..];
    }
    (base, path)
}

fn assign(slot: &mut Value, path: &[String], value: String) {
    let Some((segment, rest)) = path.split_first() else {
        *slot = Value::String(value);
        return;
    };

    if segment.is_empty() {
        match slot {
            Value::Array(items) => {
                items.push(Value::Null);
                if let Some(last) = items.last_mut() {
                    assign(last, rest, value);
                }
            }
            Value::Object(map) => {
                let index = map.len().to_string();
                assign(map.entry(index).or_insert(Value::Null), rest, value);
            }
            _ => {
                let mut item = Value::Null;
                assign(&mut item, rest, value);
                *slot = Value::Array(vec![item]);
            }
        }
        return;
    }

    if let Value::Array(items) = slot {
        match segment.parse::<usize>() {
            Ok(index) if index < items.len() => return assign(&mut items[index], rest, value),
            Ok(index) if index == items.len() => {
                let mut item = Value::Null;
                assign(&mut item, rest, value);
                items.push(item);
                return;
            }
            _ => {
                let map = std::mem::take(items)
                    .into_iter()
                    .enumerate()
                    .map(|(i, item)| (i.to_string(), item))
                    .collect();
                *slot = Value::Object(map);
            }
        }
    }

    if !slot.is_object() {
        *slot = Value::Object(Map::new());
    }
    if let Value::Object(map) = slot {
        assign(map.entry(segment.clone()).or_insert(Value::Null), rest, value);
    }
}
