//! Typed values, value kinds, and the per-kind conversion primitives.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Tokens accepted as `true` by boolean options. Case-sensitive.
pub const POSITIVE_WORDS: [&str; 6] = ["1", "t", "y", "on", "yes", "enabled"];

/// Tokens accepted as `false` by boolean options. Case-sensitive.
pub const NEGATIVE_WORDS: [&str; 6] = ["0", "f", "n", "off", "no", "disabled"];

/// Characters whose escaping backslash is stripped by the string conversion.
const ESCAPABLE: [char; 3] = [',', ':', ';'];

/// The closed set of value kinds an option can be declared with.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, Serialize, Deserialize)]
pub enum ValueKind {
    /// `true`/`false`, written with the boolean vocabulary words.
    Boolean,
    /// A signed 64-bit integer.
    Signed,
    /// An unsigned 64-bit integer.
    Unsigned,
    /// A 64-bit float.
    Float,
    /// One of an option-specific set of allowed tokens.
    Enum,
    /// Free text with delimiter escaping.
    String,
}

impl fmt::Display for ValueKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ValueKind::Boolean => "boolean",
            ValueKind::Signed => "signed",
            ValueKind::Unsigned => "unsigned",
            ValueKind::Float => "float",
            ValueKind::Enum => "enum",
            ValueKind::String => "string",
        };
        f.write_str(name)
    }
}

/// A single concrete value of one of the six kinds.
#[derive(Clone, PartialEq, Debug, Serialize, Deserialize)]
pub enum Value {
    /// A boolean value.
    Boolean(bool),
    /// A signed integer value.
    Signed(i64),
    /// An unsigned integer value.
    Unsigned(u64),
    /// A float value.
    Float(f64),
    /// An enum token, stored exactly as written.
    Enum(String),
    /// A string value with escapes already removed.
    String(String),
}

impl Value {
    /// Returns the kind of this value.
    pub fn kind(&self) -> ValueKind {
        match self {
            Value::Boolean(_) => ValueKind::Boolean,
            Value::Signed(_) => ValueKind::Signed,
            Value::Unsigned(_) => ValueKind::Unsigned,
            Value::Float(_) => ValueKind::Float,
            Value::Enum(_) => ValueKind::Enum,
            Value::String(_) => ValueKind::String,
        }
    }

    /// Renders this value in its serialized text form.
    ///
    /// Booleans come out as `yes`/`no` (members of the accepted vocabulary,
    /// so output re-parses), integers in decimal regardless of the radix they
    /// were written in, and strings with `,`, `:`, `;` re-escaped. Enum
    /// tokens are stored verbatim and rendered verbatim.
    pub fn render(&self) -> String {
        match self {
            Value::Boolean(true) => "yes".to_string(),
            Value::Boolean(false) => "no".to_string(),
            Value::Signed(v) => v.to_string(),
            Value::Unsigned(v) => v.to_string(),
            Value::Float(v) => v.to_string(),
            Value::Enum(token) => token.clone(),
            Value::String(text) => escape(text),
        }
    }
}

/// The declared type of an option, with its kind-specific constraints.
///
/// Bounds are inclusive on both ends. There is one variant per [`ValueKind`];
/// the payload is whatever that kind needs to validate a parsed token.
#[derive(Clone, PartialEq, Debug, Serialize, Deserialize)]
pub enum TypeSpec {
    /// Boolean vocabulary membership, no further constraints.
    Boolean,
    /// Signed integer within `[min, max]`.
    Signed {
        /// Inclusive lower bound.
        min: i64,
        /// Inclusive upper bound.
        max: i64,
    },
    /// Unsigned integer within `[min, max]`.
    Unsigned {
        /// Inclusive lower bound.
        min: u64,
        /// Inclusive upper bound.
        max: u64,
    },
    /// Float within `[min, max]`.
    Float {
        /// Inclusive lower bound.
        min: f64,
        /// Inclusive upper bound.
        max: f64,
    },
    /// Literal membership in a fixed token set.
    Enum {
        /// The allowed tokens, compared against the raw value token.
        allowed: Vec<String>,
    },
    /// Free text, no constraints.
    String,
}

impl TypeSpec {
    /// Returns the value kind this type accepts.
    pub fn kind(&self) -> ValueKind {
        match self {
            TypeSpec::Boolean => ValueKind::Boolean,
            TypeSpec::Signed { .. } => ValueKind::Signed,
            TypeSpec::Unsigned { .. } => ValueKind::Unsigned,
            TypeSpec::Float { .. } => ValueKind::Float,
            TypeSpec::Enum { .. } => ValueKind::Enum,
            TypeSpec::String => ValueKind::String,
        }
    }
}

/// A typed assignment was attempted with a value of the wrong kind.
#[derive(Clone, Copy, PartialEq, Eq, Debug, thiserror::Error)]
#[error("expected a {expected} value, found {found}")]
pub struct KindMismatch {
    /// The kind the option was declared with.
    pub expected: ValueKind,
    /// The kind of the offending value.
    pub found: ValueKind,
}

/// Parses a token against the boolean vocabulary. Case-sensitive.
pub fn parse_boolean(token: &str) -> Option<bool> {
    if POSITIVE_WORDS.contains(&token) {
        Some(true)
    } else if NEGATIVE_WORDS.contains(&token) {
        Some(false)
    } else {
        None
    }
}

/// Infers the numeric radix from the token's prefix and strips it.
///
/// `0x` is hex, `0b` is binary, a lone leading `0` is octal, anything else is
/// decimal. Tokens shorter than two characters are always decimal, so `"0"`
/// is decimal zero rather than an empty octal literal.
pub fn split_radix(token: &str) -> (u32, &str) {
    if token.len() < 2 {
        return (10, token);
    }
    if let Some(rest) = token.strip_prefix("0x") {
        (16, rest)
    } else if let Some(rest) = token.strip_prefix("0b") {
        (2, rest)
    } else if let Some(rest) = token.strip_prefix('0') {
        (8, rest)
    } else {
        (10, token)
    }
}

/// Removes the backslash from escaped `,`, `:`, `;` occurrences.
///
/// Every other character, backslashes before anything else included, passes
/// through unchanged.
pub fn unescape(token: &str) -> String {
    let mut out = String::with_capacity(token.len());
    let mut prev_backslash = false;
    for c in token.chars() {
        if prev_backslash && ESCAPABLE.contains(&c) {
            out.pop();
        }
        out.push(c);
        prev_backslash = c == '\\';
    }
    out
}

/// Inserts a backslash before each `,`, `:`, `;` so the text survives
/// re-parsing. Inverse of [`unescape`] for the escapable set.
pub fn escape(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        if ESCAPABLE.contains(&c) {
            out.push('\\');
        }
        out.push(c);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn boolean_vocabulary() {
        for word in POSITIVE_WORDS {
            assert_eq!(parse_boolean(word), Some(true), "{word}");
        }
        for word in NEGATIVE_WORDS {
            assert_eq!(parse_boolean(word), Some(false), "{word}");
        }
        assert_eq!(parse_boolean("true"), None);
        assert_eq!(parse_boolean("YES"), None, "vocabulary is case-sensitive");
        assert_eq!(parse_boolean(""), None);
    }

    #[test]
    fn radix_prefixes() {
        assert_eq!(split_radix("0x1F"), (16, "1F"));
        assert_eq!(split_radix("0b101"), (2, "101"));
        assert_eq!(split_radix("0755"), (8, "755"));
        assert_eq!(split_radix("755"), (10, "755"));
        assert_eq!(split_radix("-42"), (10, "-42"));
    }

    #[test]
    fn radix_short_tokens_are_decimal() {
        assert_eq!(split_radix("0"), (10, "0"));
        assert_eq!(split_radix("7"), (10, "7"));
        assert_eq!(split_radix(""), (10, ""));
    }

    #[test]
    fn radix_bare_prefix_leaves_empty_rest() {
        assert_eq!(split_radix("0x"), (16, ""));
        assert_eq!(split_radix("00"), (8, "0"));
    }

    #[test]
    fn unescape_removes_backslash_before_escapable() {
        assert_eq!(unescape("a\\,b"), "a,b");
        assert_eq!(unescape("a\\:b\\;c"), "a:b;c");
    }

    #[test]
    fn unescape_keeps_other_backslashes() {
        assert_eq!(unescape("a\\b"), "a\\b");
        assert_eq!(unescape("x\\ "), "x\\ ");
        assert_eq!(unescape("\\\\"), "\\\\");
    }

    #[test]
    fn unescape_double_backslash_before_comma() {
        // Only the backslash immediately before the comma is consumed.
        assert_eq!(unescape("a\\\\,b"), "a\\,b");
    }

    #[test]
    fn escape_roundtrips_through_unescape() {
        for text in ["a,b", "k:v;w", "plain", "tail,"] {
            assert_eq!(unescape(&escape(text)), text);
        }
    }

    #[test]
    fn value_kinds() {
        assert_eq!(Value::Boolean(true).kind(), ValueKind::Boolean);
        assert_eq!(Value::Signed(-1).kind(), ValueKind::Signed);
        assert_eq!(Value::Unsigned(1).kind(), ValueKind::Unsigned);
        assert_eq!(Value::Float(0.5).kind(), ValueKind::Float);
        assert_eq!(Value::Enum("a".into()).kind(), ValueKind::Enum);
        assert_eq!(Value::String("a".into()).kind(), ValueKind::String);
    }

    #[test]
    fn render_booleans_reparse() {
        assert_eq!(Value::Boolean(true).render(), "yes");
        assert_eq!(Value::Boolean(false).render(), "no");
        assert_eq!(parse_boolean(&Value::Boolean(true).render()), Some(true));
    }

    #[test]
    fn render_numbers_decimal() {
        assert_eq!(Value::Signed(-31).render(), "-31");
        assert_eq!(Value::Unsigned(255).render(), "255");
        assert_eq!(Value::Float(0.25).render(), "0.25");
    }

    #[test]
    fn render_string_reescapes() {
        assert_eq!(Value::String("a,b".into()).render(), "a\\,b");
        assert_eq!(Value::Enum("plain".into()).render(), "plain");
    }

    #[test]
    fn type_spec_kind() {
        assert_eq!(TypeSpec::Boolean.kind(), ValueKind::Boolean);
        assert_eq!(
            TypeSpec::Signed {
                min: i64::MIN,
                max: i64::MAX
            }
            .kind(),
            ValueKind::Signed
        );
        assert_eq!(
            TypeSpec::Enum { allowed: vec![] }.kind(),
            ValueKind::Enum
        );
    }

    #[test]
    fn kind_mismatch_display() {
        let err = KindMismatch {
            expected: ValueKind::Unsigned,
            found: ValueKind::String,
        };
        assert_eq!(format!("{err}"), "expected a unsigned value, found string");
    }

    #[test]
    fn value_serde_roundtrip() {
        let value = Value::Unsigned(8080);
        let json = serde_json::to_string(&value).unwrap();
        let back: Value = serde_json::from_str(&json).unwrap();
        assert_eq!(value, back);
    }
}
