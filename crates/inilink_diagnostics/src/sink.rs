//! Error policy and the diagnostic accumulator implementing it.

use crate::diagnostic::Diagnostic;
use serde::{Deserialize, Serialize};

/// How a load pass reacts to the first reported problem.
#[derive(Clone, Copy, PartialEq, Eq, Debug, Default, Serialize, Deserialize)]
pub enum ErrorPolicy {
    /// The first reported diagnostic aborts the pass immediately.
    #[default]
    FailFast,
    /// All diagnostics accumulate and the pass runs to completion.
    FailSoft,
}

/// An ordered accumulator for diagnostics emitted during a load pass.
///
/// Under [`ErrorPolicy::FailFast`], [`report`](Self::report) returns the
/// diagnostic as an error so callers can abort with `?`. Under
/// [`ErrorPolicy::FailSoft`] the diagnostic is appended and processing
/// continues. The document is single-owner and single-threaded, so no
/// synchronization is involved.
#[derive(Debug)]
pub struct DiagnosticSink {
    policy: ErrorPolicy,
    diagnostics: Vec<Diagnostic>,
}

impl DiagnosticSink {
    /// Creates a new empty sink with the given policy.
    pub fn new(policy: ErrorPolicy) -> Self {
        Self {
            policy,
            diagnostics: Vec::new(),
        }
    }

    /// Returns the policy this sink was created with.
    pub fn policy(&self) -> ErrorPolicy {
        self.policy
    }

    /// Routes a diagnostic according to the policy.
    ///
    /// Fail-fast returns `Err(diag)` without recording it, so the diagnostic
    /// propagates up through the load call. Fail-soft records it and returns
    /// `Ok(())`.
    pub fn report(&mut self, diag: Diagnostic) -> Result<(), Diagnostic> {
        match self.policy {
            ErrorPolicy::FailFast => Err(diag),
            ErrorPolicy::FailSoft => {
                self.diagnostics.push(diag);
                Ok(())
            }
        }
    }

    /// Returns `true` if any diagnostics have been recorded.
    pub fn has_errors(&self) -> bool {
        !self.diagnostics.is_empty()
    }

    /// Returns the number of recorded diagnostics.
    pub fn error_count(&self) -> usize {
        self.diagnostics.len()
    }

    /// Returns the recorded diagnostics in report order.
    pub fn diagnostics(&self) -> &[Diagnostic] {
        &self.diagnostics
    }

    /// Takes all recorded diagnostics, leaving the sink empty.
    pub fn take_all(&mut self) -> Vec<Diagnostic> {
        std::mem::take(&mut self.diagnostics)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::kind::ErrorKind;

    fn make_diag(line: u32) -> Diagnostic {
        Diagnostic::new(ErrorKind::ConversionError, line, "Cannot convert q to float.")
    }

    #[test]
    fn fail_fast_returns_err() {
        let mut sink = DiagnosticSink::new(ErrorPolicy::FailFast);
        let err = sink.report(make_diag(3)).unwrap_err();
        assert_eq!(err.line, 3);
        assert!(!sink.has_errors());
    }

    #[test]
    fn fail_soft_accumulates_in_order() {
        let mut sink = DiagnosticSink::new(ErrorPolicy::FailSoft);
        sink.report(make_diag(3)).unwrap();
        sink.report(make_diag(8)).unwrap();
        assert!(sink.has_errors());
        assert_eq!(sink.error_count(), 2);
        assert_eq!(sink.diagnostics()[0].line, 3);
        assert_eq!(sink.diagnostics()[1].line, 8);
    }

    #[test]
    fn take_all_drains() {
        let mut sink = DiagnosticSink::new(ErrorPolicy::FailSoft);
        sink.report(make_diag(1)).unwrap();
        let all = sink.take_all();
        assert_eq!(all.len(), 1);
        assert!(!sink.has_errors());
    }

    #[test]
    fn default_policy_is_fail_fast() {
        assert_eq!(ErrorPolicy::default(), ErrorPolicy::FailFast);
    }
}
