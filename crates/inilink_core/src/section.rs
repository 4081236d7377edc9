//! A named ordered collection of options and its per-section load logic.

use crate::option::OptionData;
use crate::schema::{Requirement, SectionSpec};
use crate::split::split_option_line;
use inilink_diagnostics::{Diagnostic, DiagnosticSink, ErrorKind};

/// A section inside a loaded document.
///
/// Holds every option the schema declared for it plus any permissive
/// containers created for unregistered identifiers. Serialization emits
/// options in the order they were first encountered in the input, not in
/// schema order.
#[derive(Clone, PartialEq, Debug)]
pub struct SectionData {
    id: String,
    description: String,
    requirement: Requirement,
    known: bool,
    loaded: bool,
    comment: String,
    line: u32,
    options: Vec<OptionData>,
    encountered: Vec<usize>,
}

impl SectionData {
    pub(crate) fn from_spec(spec: &SectionSpec) -> Self {
        Self {
            id: spec.id().to_string(),
            description: spec.description().to_string(),
            requirement: spec.requirement(),
            known: true,
            loaded: false,
            comment: String::new(),
            line: 0,
            options: spec.options().iter().map(OptionData::from_spec).collect(),
            encountered: Vec::new(),
        }
    }

    /// A permissive container for a header the schema does not know.
    pub(crate) fn unknown(id: &str) -> Self {
        Self {
            id: id.to_string(),
            description: String::new(),
            requirement: Requirement::Required,
            known: false,
            loaded: false,
            comment: String::new(),
            line: 0,
            options: Vec::new(),
            encountered: Vec::new(),
        }
    }

    /// Loads one header-delimited line group into this section.
    ///
    /// `start` is the 1-based line number of the header, `lines[0]` is the
    /// header itself. A repeated header reports `MultipleSectionDefinitions`
    /// and leaves the previously loaded state alone. Blank and comment-only
    /// lines are skipped; unregistered identifiers are materialized as
    /// permissive String options (an `UnknownOption` error under `strict`).
    /// After the lines, required options that never appeared report
    /// `MissingOption` and optional ones load their defaults.
    pub(crate) fn load(
        &mut self,
        start: u32,
        lines: &[String],
        strict: bool,
        sink: &mut DiagnosticSink,
    ) -> Result<(), Diagnostic> {
        if self.loaded {
            sink.report(Diagnostic::new(
                ErrorKind::MultipleSectionDefinitions,
                start,
                format!("Section {} was defined multiple times", self.id),
            ))?;
            return Ok(());
        }

        for option in &mut self.options {
            option.reset_loaded();
        }
        self.line = start;
        self.comment = split_option_line(&lines[0]).2.to_string();
        self.encountered.clear();

        for (offset, line) in lines.iter().enumerate().skip(1) {
            let line_no = start + offset as u32;
            let (identifier, values, comment) = split_option_line(line);
            if identifier.is_empty() {
                continue;
            }

            let index = match self.options.iter().position(|o| o.id() == identifier) {
                Some(index) => index,
                None => {
                    if strict {
                        sink.report(Diagnostic::new(
                            ErrorKind::UnknownOption,
                            line_no,
                            format!("Unknown option: {identifier}"),
                        ))?;
                    }
                    self.options.push(OptionData::unknown(identifier));
                    self.options.len() - 1
                }
            };

            let first_encounter = !self.options[index].loaded();
            self.options[index].load(values, comment, line_no, sink)?;
            if first_encounter {
                self.encountered.push(index);
            }
        }
        self.loaded = true;

        for option in &mut self.options {
            if !option.loaded() {
                match option.requirement() {
                    Requirement::Required => sink.report(Diagnostic::new(
                        ErrorKind::MissingOption,
                        self.line,
                        format!("Required option {} is missing.", option.id()),
                    ))?,
                    Requirement::Optional => option.load_defaults(),
                }
            }
        }
        Ok(())
    }

    /// Fills every option from its defaults; used when the whole section was
    /// never encountered.
    pub(crate) fn load_all_defaults(&mut self) {
        for option in &mut self.options {
            option.load_defaults();
        }
    }

    /// Renders the section: header line, then each encountered option.
    pub(crate) fn serialize(&self, use_defaults: bool) -> Vec<String> {
        let mut lines = vec![format!("[{}]\t{}", self.id, self.comment)];
        for &index in &self.encountered {
            lines.push(self.options[index].serialize(use_defaults));
        }
        lines
    }

    /// The section identifier.
    pub fn id(&self) -> &str {
        &self.id
    }

    /// The human-readable description from the schema; empty for unknown
    /// sections.
    pub fn description(&self) -> &str {
        &self.description
    }

    /// Whether the section must appear in the input.
    pub fn requirement(&self) -> Requirement {
        self.requirement
    }

    /// `false` if this section was materialized for an unregistered header.
    pub fn known(&self) -> bool {
        self.known
    }

    /// Whether the section was encountered during the load pass.
    pub fn loaded(&self) -> bool {
        self.loaded
    }

    /// The inline comment from the header line, leading `;` included.
    pub fn comment(&self) -> &str {
        &self.comment
    }

    /// The 1-based line number of the header; 0 if never encountered.
    pub fn line(&self) -> u32 {
        self.line
    }

    /// All options, schema-declared first, then unknown ones in discovery
    /// order.
    pub fn options(&self) -> &[OptionData] {
        &self.options
    }

    /// Looks up an option by identifier.
    pub fn option(&self, id: &str) -> Option<&OptionData> {
        self.options.iter().find(|o| o.id() == id)
    }

    /// Mutable lookup of an option by identifier.
    pub fn option_mut(&mut self, id: &str) -> Option<&mut OptionData> {
        self.options.iter_mut().find(|o| o.id() == id)
    }

    pub(crate) fn options_mut(&mut self) -> &mut [OptionData] {
        &mut self.options
    }
}
