use crate::error::ParseError;
use crate::utils::get_line_and_column;
use miette::NamedSource;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// How option values are interpreted.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum IniMode {
    /// Values are strings; `true`/`on`/`yes` read as `"1"`, and
    /// `false`/`off`/`no`/`none`/`null` read as `""`.
    #[default]
    Normal,
    /// Values are taken verbatim, only surrounding quotes are removed.
    Raw,
    /// Like `Normal`, but keywords become booleans or null and integers become numbers.
    Typed,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct IniOptions {
    /// Keep `[section]` headers as nested mappings instead of flattening them.
    pub sections: bool,
    pub mode: IniMode,
}

/// Parses an INI document into a plain tree.
///
/// # Errors
/// Returns [`ParseError::Ini`] on the first malformed line.
pub fn parse(source: &str, options: &IniOptions) -> Result<Value, ParseError> {
    IniParser::new(source, *options).parse()
}

/// A line-oriented INI reader.
struct IniParser<'a> {
    source: &'a str,
    options: IniOptions,
    root: Map<String, Value>,
    section: Option<String>,
}

impl<'a> IniParser<'a> {
    fn new(source: &'a str, options: IniOptions) -> Self {
        Self {
            source,
            options,
            root: Map::new(),
            section: None,
        }
    }

    fn parse(mut self) -> Result<Value, ParseError> {
        let source = self.source;
        let mut offset = 0;
        for line in source.split_inclusive('\n') {
            self.parse_line(line.trim_end_matches(['\r', '\n']), offset)?;
            offset += line.len();
        }
        Ok(Value::Object(self.root))
    }

    fn parse_line(&mut self, line: &str, offset: usize) -> Result<(), ParseError> {
        let content = line.trim();
        let start = offset + (line.len() - line.trim_start().len());

        if content.is_empty() || content.starts_with(';') || content.starts_with('#') {
            return Ok(());
        }

        if let Some(header) = content.strip_prefix('[') {
            return self.parse_section(header, start, content.len());
        }

        let Some(equals) = content.find('=') else {
            return Err(self.error("expected '=' after the key", start, content.len()));
        };

        let key = content[..equals].trim();
        if key.is_empty() {
            return Err(self.error("empty key", start, equals + 1));
        }
        let (base, segment) = split_key(key)
            .ok_or_else(|| self.error("malformed key brackets", start, equals))?;

        let value_start = start + equals + 1;
        let value = self
            .parse_value(&content[equals + 1..])
            .map_err(|message| self.error(message, value_start, content.len() - equals - 1))?;

        self.insert(base, segment, value);
        Ok(())
    }

    fn parse_section(&mut self, header: &str, start: usize, len: usize) -> Result<(), ParseError> {
        let Some(close) = header.find(']') else {
            return Err(self.error("unterminated section header", start, len));
        };
        let trailing = header[close + 1..].trim();
        if !trailing.is_empty() && !trailing.starts_with(';') {
            return Err(self.error("unexpected text after section header", start, len));
        }

        let name = header[..close].trim().to_string();
        if self.options.sections {
            let entry = self
                .root
                .entry(name.clone())
                .or_insert_with(|| Value::Object(Map::new()));
            if !entry.is_object() {
                *entry = Value::Object(Map::new());
            }
            self.section = Some(name);
        }
        Ok(())
    }

    fn parse_value(&self, raw: &str) -> Result<Value, &'static str> {
        let raw = raw.trim();
        if self.options.mode == IniMode::Raw {
            return Ok(Value::String(unquote(raw).to_string()));
        }

        if let Some(quoted) = raw.strip_prefix('"') {
            return read_quoted(quoted, '"', true).map(Value::String);
        }
        if let Some(quoted) = raw.strip_prefix('\'') {
            return read_quoted(quoted, '\'', false).map(Value::String);
        }

        let text = raw.split(';').next().unwrap_or_default().trim();
        if text.contains('=') {
            return Err("syntax error, unexpected '='");
        }
        if text.contains('"') {
            return Err("syntax error, unbalanced quote");
        }

        Ok(self.keyword(text))
    }

    fn keyword(&self, text: &str) -> Value {
        let typed = self.options.mode == IniMode::Typed;
        match text.to_ascii_lowercase().as_str() {
            "true" | "on" | "yes" if typed => Value::Bool(true),
            "false" | "off" | "no" | "none" if typed => Value::Bool(false),
            "null" if typed => Value::Null,
            "true" | "on" | "yes" => Value::String("1".to_string()),
            "false" | "off" | "no" | "none" | "null" => Value::String(String::new()),
            _ => match text.parse::<i64>() {
                Ok(n) if typed => Value::Number(n.into()),
                _ => Value::String(text.to_string()),
            },
        }
    }

    fn insert(&mut self, base: &str, segment: Option<&str>, value: Value) {
        match &self.section {
            Some(section) => {
                let entry = self
                    .root
                    .entry(section.clone())
                    .or_insert_with(|| Value::Object(Map::new()));
                if let Value::Object(map) = entry {
                    insert_into(map, base, segment, value);
                }
            }
            None => insert_into(&mut self.root, base, segment, value),
        }
    }

    fn error(&self, message: &str, offset: usize, len: usize) -> ParseError {
        let (line, _) = get_line_and_column(self.source, offset);
        ParseError::Ini {
            message: format!("{message} on line {line}"),
            src: NamedSource::new("input.ini", self.source.to_string()),
            span: (offset, len).into(),
        }
    }
}

fn insert_into(target: &mut Map<String, Value>, base: &str, segment: Option<&str>, value: Value) {
    match segment {
        None => {
            target.insert(base.to_string(), value);
        }
        Some("") => {
            let slot = target.entry(base).or_insert_with(|| Value::Array(Vec::new()));
            match slot {
                Value::Array(items) => items.push(value),
                _ => *slot = Value::Array(vec![value]),
            }
        }
        Some(name) => {
            let slot = target.entry(base).or_insert_with(|| Value::Object(Map::new()));
            if !slot.is_object() {
                *slot = Value::Object(Map::new());
            }
            if let Value::Object(map) = slot {
                map.insert(name.to_string(), value);
            }
        }
    }
}

/// Splits `key[name]` into `("key", Some("name"))`.
fn split_key(key: &str) -> Option<(&str, Option<&str>)> {
    let Some(open) = key.find('[') else {
        return (!key.contains(']')).then_some((key, None));
    };
    let inner = key[open + 1..].strip_suffix(']')?;
    if inner.contains(['[', ']']) {
        return None;
    }
    Some((key[..open].trim_end(), Some(inner.trim())))
}

/// Reads a quoted value whose opening quote was already consumed. Only a
/// comment may follow the closing quote.
fn read_quoted(text: &str, quote: char, escapes: bool) -> Result<String, &'static str> {
    let mut value = String::new();
    let mut chars = text.char_indices();
    while let Some((i, c)) = chars.next() {
        match c {
            '\\' if escapes => match chars.next() {
                Some((_, escaped)) if escaped == quote || escaped == '\\' => value.push(escaped),
                Some((_, other)) => {
                    value.push('\\');
                    value.push(other);
                }
                None => value.push('\\'),
            },
            c if c == quote => {
                let trailing = text[i + c.len_utf8()..].trim();
                if trailing.is_empty() || trailing.starts_with(';') {
                    return Ok(value);
                }
                return Err("syntax error, unexpected text after quoted value");
            }
            c => value.push(c),
        }
    }
    Err("syntax error, unterminated quoted value")
}

fn unquote(text: &str) -> &str {
    text.strip_prefix('"')
        .and_then(|inner| inner.strip_suffix('"'))
        .unwrap_or(text)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn parse_default(source: &str) -> Result<Value, ParseError> {
        parse(source, &IniOptions::default())
    }

    #[test]
    fn test_flat_pairs() {
        let value = parse_default("; comment\nk = v\n# other\nn=42\n").unwrap();
        assert_eq!(value, json!({"k": "v", "n": "42"}));
    }

    #[test]
    fn test_keywords_in_normal_mode() {
        let value = parse_default("a = on\nb = Off\nc = null\nd = \"yes\"").unwrap();
        assert_eq!(value, json!({"a": "1", "b": "", "c": "", "d": "yes"}));
    }

    #[test]
    fn test_typed_mode() {
        let options = IniOptions {
            sections: false,
            mode: IniMode::Typed,
        };
        let value = parse("a = yes\nb = no\nc = null\nd = 7\ne = 7.5", &options).unwrap();
        assert_eq!(
            value,
            json!({"a": true, "b": false, "c": null, "d": 7, "e": "7.5"})
        );
    }

    #[test]
    fn test_raw_mode() {
        let options = IniOptions {
            sections: false,
            mode: IniMode::Raw,
        };
        let value = parse("a = on ; kept\nb = \"q\"", &options).unwrap();
        assert_eq!(value, json!({"a": "on ; kept", "b": "q"}));
    }

    #[test]
    fn test_sections() {
        let source = "top = 1\n[first]\nk = v\n[second]\nk = w\n";

        let flat = parse_default(source).unwrap();
        assert_eq!(flat, json!({"top": "1", "k": "w"}));

        let options = IniOptions {
            sections: true,
            mode: IniMode::Normal,
        };
        let nested = parse(source, &options).unwrap();
        assert_eq!(
            nested,
            json!({"top": "1", "first": {"k": "v"}, "second": {"k": "w"}})
        );
    }

    #[test]
    fn test_array_keys() {
        let value = parse_default("l[] = a\nl[] = b\nm[x] = 1\nm[y] = 2").unwrap();
        assert_eq!(value, json!({"l": ["a", "b"], "m": {"x": "1", "y": "2"}}));
    }

    #[test]
    fn test_quoted_values() {
        let value = parse_default("a = \"x = y ; z\" ; comment\nb = 'it''").unwrap_err();
        assert_eq!(value.sub_code(), 103);

        let value = parse_default("a = \"x = y ; z\" ; comment\nb = \"say \\\"hi\\\"\"").unwrap();
        assert_eq!(value, json!({"a": "x = y ; z", "b": "say \"hi\""}));
    }

    #[test]
    fn test_syntax_errors() {
        for source in ["a == a", "no equals", "= v", "[open", "[s] junk", "a = \"open", "k]=v"] {
            let err = parse_default(source).unwrap_err();
            assert_eq!(err.sub_code(), 103, "{source} should fail");
        }
    }

    #[test]
    fn test_error_reports_line() {
        let err = parse_default("a = 1\nb == 2").unwrap_err();
        assert!(err.to_string().contains("on line 2"), "{err}");
    }
}
