//! The closed set of error kinds a load pass can produce.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Classification of a problem detected while loading or linking a document.
///
/// Every diagnostic carries exactly one kind. All kinds except
/// [`CircularLink`](ErrorKind::CircularLink) are routed through the error
/// policy; a circular link is detected during materialization and always
/// surfaces as a hard error regardless of policy.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, Serialize, Deserialize)]
pub enum ErrorKind {
    /// Content outside any section that is not blank or a comment.
    BadFormat,
    /// An option identifier not registered in the section's schema.
    UnknownOption,
    /// A section identifier not registered in the schema.
    UnknownSection,
    /// The same section header appeared more than once.
    MultipleSectionDefinitions,
    /// The same option identifier appeared more than once within a section.
    MultipleOptionDefinitions,
    /// A required section was never encountered.
    MissingSection,
    /// A required option was never encountered in its section.
    MissingOption,
    /// A value token could not be converted to the option's kind.
    ConversionError,
    /// A value token is not in an enum option's allowed set.
    WrongEnumValue,
    /// A link address names a missing target or a target of a different kind.
    InvalidLink,
    /// A numeric value lies outside the option's configured bounds.
    ValueOutOfBounds,
    /// Materializing a link revisited an option already on the resolution path.
    CircularLink,
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ErrorKind::BadFormat => "bad format",
            ErrorKind::UnknownOption => "unknown option",
            ErrorKind::UnknownSection => "unknown section",
            ErrorKind::MultipleSectionDefinitions => "multiple section definitions",
            ErrorKind::MultipleOptionDefinitions => "multiple option definitions",
            ErrorKind::MissingSection => "missing section",
            ErrorKind::MissingOption => "missing option",
            ErrorKind::ConversionError => "conversion error",
            ErrorKind::WrongEnumValue => "wrong enum value",
            ErrorKind::InvalidLink => "invalid link",
            ErrorKind::ValueOutOfBounds => "value out of bounds",
            ErrorKind::CircularLink => "circular link",
        };
        f.write_str(name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_names() {
        assert_eq!(format!("{}", ErrorKind::BadFormat), "bad format");
        assert_eq!(format!("{}", ErrorKind::UnknownOption), "unknown option");
        assert_eq!(
            format!("{}", ErrorKind::MultipleSectionDefinitions),
            "multiple section definitions"
        );
        assert_eq!(format!("{}", ErrorKind::CircularLink), "circular link");
    }

    #[test]
    fn serde_roundtrip() {
        let kind = ErrorKind::ValueOutOfBounds;
        let json = serde_json::to_string(&kind).unwrap();
        let back: ErrorKind = serde_json::from_str(&json).unwrap();
        assert_eq!(kind, back);
    }
}
