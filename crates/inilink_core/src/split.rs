//! Escape-aware tokenizing primitives for the configuration dialect.
//!
//! Splits physical lines into `(identifier, values, comment)` triples and
//! value strings into delimiter-separated tokens. A backslash makes the
//! following whitespace or delimiter character part of the token instead of
//! trim/split fodder. Comments are the exception: `;` truncates the line
//! unconditionally and can never be escaped.

/// Returns `true` for the characters trimming treats as whitespace.
///
/// Only space and tab count; line breaks are the line supplier's concern.
fn is_space(b: u8) -> bool {
    b == b' ' || b == b'\t'
}

/// Trims leading and trailing whitespace, keeping escaped whitespace.
///
/// A space or tab immediately preceded by a backslash counts as content, so
/// `"x\ "` keeps its escaped trailing space (backslash included — unescaping
/// is the string conversion's job). An all-whitespace input trims to `""`.
pub fn trim_escape_aware(s: &str) -> &str {
    let bytes = s.as_bytes();
    let start = match bytes.iter().position(|&b| !is_space(b)) {
        Some(i) => i,
        None => return "",
    };
    let mut end = start;
    for i in (start..bytes.len()).rev() {
        if !is_space(bytes[i]) || (i > 0 && bytes[i - 1] == b'\\') {
            end = i + 1;
            break;
        }
    }
    &s[start..end]
}

/// Splits an option line into `(identifier, values, comment)`.
///
/// The first `;` truncates the line; everything from it onward (the `;`
/// included) is the comment. The remainder splits on the first `=` into
/// identifier and values. Missing parts come back as empty strings. All three
/// parts are trimmed with [`trim_escape_aware`].
///
/// The comment cut happens before any unescaping, so a `;` can never appear
/// inside a value.
pub fn split_option_line(line: &str) -> (&str, &str, &str) {
    let (rest, comment) = match line.find(';') {
        Some(pos) => (&line[..pos], &line[pos..]),
        None => (line, ""),
    };
    let (identifier, values) = match rest.find('=') {
        Some(pos) => (&rest[..pos], &rest[pos + 1..]),
        None => (rest, ""),
    };
    (
        trim_escape_aware(identifier),
        trim_escape_aware(values),
        trim_escape_aware(comment),
    )
}

/// Splits `s` on `delimiter`, honoring backslash escapes.
///
/// A delimiter immediately preceded by a backslash does not separate; the
/// backslash stays in the token for the value conversion to deal with. Each
/// token is trimmed with [`trim_escape_aware`]. A trailing empty segment is
/// dropped, and an empty input yields no tokens at all.
pub fn split_values(s: &str, delimiter: char) -> Vec<&str> {
    let mut parts = Vec::new();
    let mut part_start = 0;
    let mut prev = None;
    for (i, c) in s.char_indices() {
        if c == delimiter && prev != Some('\\') {
            parts.push(trim_escape_aware(&s[part_start..i]));
            part_start = i + c.len_utf8();
        }
        prev = Some(c);
    }
    if part_start < s.len() {
        parts.push(trim_escape_aware(&s[part_start..]));
    }
    parts
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn trim_plain() {
        assert_eq!(trim_escape_aware("  x  "), "x");
        assert_eq!(trim_escape_aware("\tx\t"), "x");
        assert_eq!(trim_escape_aware("x"), "x");
    }

    #[test]
    fn trim_all_whitespace() {
        assert_eq!(trim_escape_aware(""), "");
        assert_eq!(trim_escape_aware("   "), "");
        assert_eq!(trim_escape_aware(" \t "), "");
    }

    #[test]
    fn trim_keeps_escaped_trailing_space() {
        assert_eq!(trim_escape_aware("x\\ "), "x\\ ");
        assert_eq!(trim_escape_aware("x\\  "), "x\\ ");
        assert_eq!(trim_escape_aware("  \\ hi\\ \t"), "\\ hi\\ ");
    }

    #[test]
    fn trim_leading_escape_is_content() {
        // The backslash itself is not whitespace, so trimming stops at it.
        assert_eq!(trim_escape_aware(" \\ x"), "\\ x");
    }

    #[test]
    fn option_line_full() {
        let (id, values, comment) = split_option_line("port = 8080 ; tcp port");
        assert_eq!(id, "port");
        assert_eq!(values, "8080");
        assert_eq!(comment, "; tcp port");
    }

    #[test]
    fn option_line_no_comment() {
        let (id, values, comment) = split_option_line("host = example.com");
        assert_eq!(id, "host");
        assert_eq!(values, "example.com");
        assert_eq!(comment, "");
    }

    #[test]
    fn option_line_no_values() {
        let (id, values, comment) = split_option_line("  bare  ");
        assert_eq!(id, "bare");
        assert_eq!(values, "");
        assert_eq!(comment, "");
    }

    #[test]
    fn option_line_comment_only() {
        let (id, values, comment) = split_option_line("; just a note");
        assert_eq!(id, "");
        assert_eq!(values, "");
        assert_eq!(comment, "; just a note");
    }

    #[test]
    fn option_line_comment_not_escapable() {
        // Even a backslash cannot keep a `;` inside the values.
        let (id, values, comment) = split_option_line("msg = a\\; b");
        assert_eq!(id, "msg");
        assert_eq!(values, "a\\");
        assert_eq!(comment, "; b");
    }

    #[test]
    fn option_line_splits_on_first_equals() {
        let (id, values, _) = split_option_line("expr = a = b");
        assert_eq!(id, "expr");
        assert_eq!(values, "a = b");
    }

    #[test]
    fn split_values_basic() {
        assert_eq!(split_values("a, b ,c", ','), vec!["a", "b", "c"]);
    }

    #[test]
    fn split_values_escaped_delimiter_stays() {
        assert_eq!(split_values("a\\,b", ','), vec!["a\\,b"]);
        assert_eq!(split_values("a\\,b, c", ','), vec!["a\\,b", "c"]);
    }

    #[test]
    fn split_values_empty_input_yields_nothing() {
        assert_eq!(split_values("", ','), Vec::<&str>::new());
    }

    #[test]
    fn split_values_trailing_empty_dropped() {
        assert_eq!(split_values("a,", ','), vec!["a"]);
        assert_eq!(split_values("a, ", ','), vec!["a", ""]);
    }

    #[test]
    fn split_values_interior_empty_kept() {
        assert_eq!(split_values("a,,b", ','), vec!["a", "", "b"]);
    }

    #[test]
    fn split_values_custom_delimiter() {
        assert_eq!(split_values("1|2|3", '|'), vec!["1", "2", "3"]);
        // The default delimiter is ordinary text under a custom one.
        assert_eq!(split_values("a,b|c", '|'), vec!["a,b", "c"]);
    }

    #[test]
    fn split_values_escaped_whitespace_in_token() {
        assert_eq!(split_values("x\\ , y", ','), vec!["x\\ ", "y"]);
    }
}
