/// Calculates the 1-based line and column number for a given byte position in the source text.
/// This function is designed to be called only when an error occurs, as it iterates through
/// the source text to determine the position.
pub fn get_line_and_column(source: &str, position: usize) -> (usize, usize) {
    let mut line = 1;
    let mut column = 1;
    for (i, c) in source.char_indices() {
        if i >= position {
            break;
        }
        if c == '\n' {
            line += 1;
            column = 1;
        } else {
            column += 1;
        }
    }
    (line, column)
}

/// The inverse of [`get_line_and_column`]: the byte offset of a 1-based line and column.
///
/// Parsers such as `serde_json` only report line/column pairs, while diagnostics
/// want byte spans. Positions past the end of the source clamp to its length.
pub fn get_offset(source: &str, line: usize, column: usize) -> usize {
    let mut current_line = 1;
    let mut current_column = 1;
    for (i, c) in source.char_indices() {
        if current_line == line && current_column >= column {
            return i;
        }
        if c == '\n' {
            if current_line == line {
                return i;
            }
            current_line += 1;
            current_column = 1;
        } else {
            current_column += 1;
        }
    }
    source.len()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_line_and_column() {
        let source = "a = 1\nb == 2";
        assert_eq!(get_line_and_column(source, 0), (1, 1));
        assert_eq!(get_line_and_column(source, 8), (2, 3));
    }

    #[test]
    fn test_offset_matches_line_and_column() {
        let source = "{\n  \"k\" \"v\"\n}";
        let offset = get_offset(source, 2, 7);
        assert_eq!(&source[offset..offset + 1], "\"");
        assert_eq!(get_line_and_column(source, offset), (2, 7));
    }

    #[test]
    fn test_offset_past_end_clamps() {
        assert_eq!(get_offset("abc", 9, 1), 3);
    }
}
