//! A single reported problem with its kind, input line, and message.

use crate::kind::ErrorKind;
use serde::{Deserialize, Serialize};

/// A problem detected during a load pass.
///
/// Displays as `Line <n>: <message>`, where `<n>` is the 1-based line of the
/// input the problem was detected on. Structure-level problems that have no
/// single offending line (a missing required section, for example) report
/// line 1.
#[derive(Clone, PartialEq, Eq, Debug, Serialize, Deserialize, thiserror::Error)]
#[error("Line {line}: {message}")]
pub struct Diagnostic {
    /// The classification of this problem.
    pub kind: ErrorKind,
    /// The 1-based input line the problem was detected on.
    pub line: u32,
    /// The human-readable description.
    pub message: String,
}

impl Diagnostic {
    /// Creates a new diagnostic.
    pub fn new(kind: ErrorKind, line: u32, message: impl Into<String>) -> Self {
        Self {
            kind,
            line,
            message: message.into(),
        }
    }
}
