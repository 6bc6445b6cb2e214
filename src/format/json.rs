use crate::error::{Format, ParseError};
use crate::utils::get_offset;
use miette::NamedSource;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Maximum nesting depth accepted by default.
pub const DEFAULT_DEPTH: usize = 512;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct JsonOptions {
    /// Documents nested deeper than this are rejected. Scalars have depth 0,
    /// every array or object level adds one.
    pub depth: usize,
}

impl Default for JsonOptions {
    fn default() -> Self {
        JsonOptions {
            depth: DEFAULT_DEPTH,
        }
    }
}

/// Parses a JSON document into a plain tree.
///
/// # Errors
/// Returns [`ParseError::Json`] with the parser message and location, or
/// when the document is nested deeper than `options.depth`.
pub fn parse(source: &str, options: &JsonOptions) -> Result<Value, ParseError> {
    if let Some(offset) = exceeds_depth(source, options.depth) {
        return Err(error(
            source,
            format!("Maximum stack depth of {} exceeded", options.depth),
            offset,
        ));
    }

    let value = from_str(source).map_err(|err| {
        let offset = get_offset(source, err.line(), err.column());
        error(source, err.to_string(), offset)
    })?;

    crate::format::expect_root(value, Format::Json)
}

/// Deserializes JSON without serde_json's fixed recursion limit of 128.
///
/// Callers bound the nesting themselves, see [`parse`].
pub(crate) fn from_str(source: &str) -> Result<Value, serde_json::Error> {
    let mut deserializer = serde_json::Deserializer::from_str(source);
    deserializer.disable_recursion_limit();
    let value = Value::deserialize(&mut deserializer)?;
    deserializer.end()?;
    Ok(value)
}

/// Removes `//` line comments from JSON text.
///
/// A comment runs from `//` to the end of its line and may follow other
/// tokens. Whitespace before it goes too. `//` inside a string literal is
/// kept as it is.
pub fn strip_comments(source: &str) -> String {
    let mut out = String::with_capacity(source.len());
    let mut chars = source.chars().peekable();
    let mut in_string = false;

    while let Some(c) = chars.next() {
        if in_string {
            out.push(c);
            match c {
                '\\' => {
                    if let Some(escaped) = chars.next() {
                        out.push(escaped);
                    }
                }
                '"' | '\n' => in_string = false,
                _ => {}
            }
            continue;
        }

        match c {
            '"' => {
                in_string = true;
                out.push(c);
            }
            '/' if chars.peek() == Some(&'/') => {
                let kept = out.trim_end_matches([' ', '\t']).len();
                out.truncate(kept);
                while chars.peek().is_some_and(|&next| next != '\n') {
                    chars.next();
                }
            }
            _ => out.push(c),
        }
    }
    out
}

/// Offset of the first `[` or `{` opening a level deeper than `limit`.
/// Scalars have depth 0, every array or object level adds one.
fn exceeds_depth(source: &str, limit: usize) -> Option<usize> {
    let mut depth = 0usize;
    let mut in_string = false;
    let mut escaped = false;

    for (offset, byte) in source.bytes().enumerate() {
        if in_string {
            match byte {
                _ if escaped => escaped = false,
                b'\\' => escaped = true,
                b'"' => in_string = false,
                _ => {}
            }
            continue;
        }

        match byte {
            b'"' => in_string = true,
            b'[' | b'{' => {
                depth += 1;
                if depth > limit {
                    return Some(offset);
                }
            }
            b']' | b'}' => depth = depth.saturating_sub(1),
            _ => {}
        }
    }
    None
}

fn error(source: &str, message: String, offset: usize) -> ParseError {
    let len = usize::from(offset < source.len());
    ParseError::Json {
        message,
        src: NamedSource::new("input.json", source.to_string()),
        span: (offset, len).into(),
    }
}
