//! A typed, possibly multi-valued named field within a section.

use crate::element::{Element, LinkTarget};
use crate::schema::{OptionSpec, Requirement};
use crate::split::split_values;
use crate::value::{parse_boolean, split_radix, unescape, KindMismatch, TypeSpec, Value, ValueKind};
use inilink_diagnostics::{Diagnostic, DiagnosticSink, ErrorKind};

/// A named option inside a loaded document.
///
/// Carries its declaration (kind, constraints, delimiter, defaults) copied
/// from the schema, or synthesized as a permissive String container when the
/// identifier was not registered (`known() == false`). The kind is fixed at
/// construction; every element conforms to it.
#[derive(Clone, PartialEq, Debug)]
pub struct OptionData {
    id: String,
    description: String,
    requirement: Requirement,
    type_spec: TypeSpec,
    delimiter: char,
    defaults: Vec<Value>,
    known: bool,
    loaded: bool,
    comment: String,
    line: u32,
    elements: Vec<Element>,
}

impl OptionData {
    pub(crate) fn from_spec(spec: &OptionSpec) -> Self {
        Self {
            id: spec.id().to_string(),
            description: spec.description().to_string(),
            requirement: spec.requirement(),
            type_spec: spec.type_spec().clone(),
            delimiter: spec.delimiter(),
            defaults: spec.defaults().to_vec(),
            known: true,
            loaded: false,
            comment: String::new(),
            line: 0,
            elements: Vec::new(),
        }
    }

    /// A permissive container for an identifier the schema does not know.
    pub(crate) fn unknown(id: &str) -> Self {
        Self {
            id: id.to_string(),
            description: String::new(),
            requirement: Requirement::Required,
            type_spec: TypeSpec::String,
            delimiter: ',',
            defaults: Vec::new(),
            known: false,
            loaded: false,
            comment: String::new(),
            line: 0,
            elements: Vec::new(),
        }
    }

    pub(crate) fn reset_loaded(&mut self) {
        self.loaded = false;
    }

    /// Parses and validates one option line's value text.
    ///
    /// A second load in the same pass reports `MultipleOptionDefinitions` and
    /// leaves the existing elements alone. Tokens matching the `${...}` link
    /// syntax become unresolved link elements; everything else goes through
    /// the kind-specific conversion. A malformed token is reported and
    /// skipped without aborting its siblings (under fail-soft).
    pub(crate) fn load(
        &mut self,
        raw_values: &str,
        comment: &str,
        line: u32,
        sink: &mut DiagnosticSink,
    ) -> Result<(), Diagnostic> {
        if self.loaded {
            sink.report(Diagnostic::new(
                ErrorKind::MultipleOptionDefinitions,
                line,
                format!("Option {} was defined multiple times", self.id),
            ))?;
            return Ok(());
        }
        self.loaded = true;
        self.comment = comment.to_string();
        self.line = line;
        self.elements.clear();

        for token in split_values(raw_values, self.delimiter) {
            if token.len() >= 3 && token.starts_with("${") && token.ends_with('}') {
                self.elements.push(Element::link(&token[2..token.len() - 1]));
            } else if let Some(element) = self.convert(token, line, sink)? {
                self.elements.push(element);
            }
        }
        Ok(())
    }

    /// Converts one non-link token according to the declared type.
    ///
    /// Returns `Ok(None)` when the token is rejected (already reported). An
    /// out-of-bounds numeric value is reported but still stored, so a
    /// fail-soft caller sees the raw value alongside the error.
    fn convert(
        &self,
        token: &str,
        line: u32,
        sink: &mut DiagnosticSink,
    ) -> Result<Option<Element>, Diagnostic> {
        let value = match &self.type_spec {
            TypeSpec::Boolean => match parse_boolean(token) {
                Some(b) => Value::Boolean(b),
                None => {
                    sink.report(Diagnostic::new(
                        ErrorKind::ConversionError,
                        line,
                        format!("Cannot convert {token} to Boolean."),
                    ))?;
                    return Ok(None);
                }
            },
            TypeSpec::Signed { min, max } => {
                let (radix, digits) = split_radix(token);
                match i64::from_str_radix(digits, radix) {
                    Ok(v) => {
                        if v < *min || v > *max {
                            sink.report(out_of_bounds(v, line))?;
                        }
                        Value::Signed(v)
                    }
                    Err(_) => {
                        sink.report(Diagnostic::new(
                            ErrorKind::ConversionError,
                            line,
                            format!("Cannot convert {token} to signed integer."),
                        ))?;
                        return Ok(None);
                    }
                }
            }
            TypeSpec::Unsigned { min, max } => {
                let (radix, digits) = split_radix(token);
                match u64::from_str_radix(digits, radix) {
                    Ok(v) => {
                        if v < *min || v > *max {
                            sink.report(out_of_bounds(v, line))?;
                        }
                        Value::Unsigned(v)
                    }
                    Err(_) => {
                        sink.report(Diagnostic::new(
                            ErrorKind::ConversionError,
                            line,
                            format!("Cannot convert {token} to unsigned integer."),
                        ))?;
                        return Ok(None);
                    }
                }
            }
            TypeSpec::Float { min, max } => match token.parse::<f64>() {
                Ok(v) => {
                    if v < *min || v > *max {
                        sink.report(out_of_bounds(v, line))?;
                    }
                    Value::Float(v)
                }
                Err(_) => {
                    sink.report(Diagnostic::new(
                        ErrorKind::ConversionError,
                        line,
                        format!("Cannot convert {token} to float."),
                    ))?;
                    return Ok(None);
                }
            },
            TypeSpec::Enum { allowed } => {
                if allowed.iter().any(|a| a == token) {
                    Value::Enum(token.to_string())
                } else {
                    sink.report(Diagnostic::new(
                        ErrorKind::WrongEnumValue,
                        line,
                        format!("{token} is not a valid enum for this option."),
                    ))?;
                    return Ok(None);
                }
            }
            TypeSpec::String => Value::String(unescape(token)),
        };
        Ok(Some(Element::literal(value)))
    }

    /// Replaces the element sequence with the configured defaults.
    pub(crate) fn load_defaults(&mut self) {
        self.elements = self.defaults.iter().cloned().map(Element::literal).collect();
    }

    /// Renders the option as one output line.
    ///
    /// Format: `<identifier> = <elem1><delim><elem2>...\t\t<comment>`. With
    /// `use_defaults` the default sequence is rendered instead of the live
    /// elements; the live state is never touched.
    pub(crate) fn serialize(&self, use_defaults: bool) -> String {
        let rendered: Vec<String> = if use_defaults {
            self.defaults.iter().map(Value::render).collect()
        } else {
            self.elements.iter().map(Element::render).collect()
        };
        format!(
            "{} = {}\t\t{}",
            self.id,
            rendered.join(&self.delimiter.to_string()),
            self.comment
        )
    }

    pub(crate) fn bind_element(&mut self, index: usize, target: LinkTarget) {
        if let Element::Link(link) = &mut self.elements[index] {
            link.bind(target);
        }
    }

    pub(crate) fn set_link_element(&mut self, index: usize, target: LinkTarget) {
        let mut element = Element::link(format!("{}#{}", target.section, target.option));
        if let Element::Link(link) = &mut element {
            link.bind(target);
        }
        self.elements[index] = element;
    }

    /// The option identifier.
    pub fn id(&self) -> &str {
        &self.id
    }

    /// The human-readable description from the schema; empty for unknown
    /// options.
    pub fn description(&self) -> &str {
        &self.description
    }

    /// Whether the option must appear in the input.
    pub fn requirement(&self) -> Requirement {
        self.requirement
    }

    /// The declared type with its constraints.
    pub fn type_spec(&self) -> &TypeSpec {
        &self.type_spec
    }

    /// The declared value kind.
    pub fn kind(&self) -> ValueKind {
        self.type_spec.kind()
    }

    /// The value delimiter.
    pub fn delimiter(&self) -> char {
        self.delimiter
    }

    /// The configured default value sequence.
    pub fn defaults(&self) -> &[Value] {
        &self.defaults
    }

    /// `false` if this option was materialized for an unregistered
    /// identifier rather than declared in the schema.
    pub fn known(&self) -> bool {
        self.known
    }

    /// Whether the option was encountered during the last load pass.
    pub fn loaded(&self) -> bool {
        self.loaded
    }

    /// The inline comment from the option's line, leading `;` included.
    pub fn comment(&self) -> &str {
        &self.comment
    }

    /// The 1-based input line the option was loaded from; 0 if never loaded.
    pub fn line(&self) -> u32 {
        self.line
    }

    /// The current ordered element sequence.
    pub fn elements(&self) -> &[Element] {
        &self.elements
    }

    /// One element by position.
    pub fn element(&self, index: usize) -> Option<&Element> {
        self.elements.get(index)
    }

    /// Replaces the element at `index` with a literal, clearing any link
    /// state there. The value's kind must match the option's kind.
    ///
    /// # Panics
    ///
    /// Panics if `index` is out of bounds.
    pub fn set_value(&mut self, index: usize, value: Value) -> Result<(), KindMismatch> {
        self.check_kind(&value)?;
        self.elements[index] = Element::literal(value);
        Ok(())
    }

    /// Appends a literal element. The value's kind must match the option's
    /// kind.
    pub fn push_value(&mut self, value: Value) -> Result<(), KindMismatch> {
        self.check_kind(&value)?;
        self.elements.push(Element::literal(value));
        Ok(())
    }

    /// Removes and returns the element at `index`.
    ///
    /// # Panics
    ///
    /// Panics if `index` is out of bounds.
    pub fn remove_element(&mut self, index: usize) -> Element {
        self.elements.remove(index)
    }

    fn check_kind(&self, value: &Value) -> Result<(), KindMismatch> {
        if value.kind() == self.kind() {
            Ok(())
        } else {
            Err(KindMismatch {
                expected: self.kind(),
                found: value.kind(),
            })
        }
    }
}

fn out_of_bounds(value: impl std::fmt::Display, line: u32) -> Diagnostic {
    Diagnostic::new(
        ErrorKind::ValueOutOfBounds,
        line,
        format!("Value {value} out of bounds"),
    )
}
