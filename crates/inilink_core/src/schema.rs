//! The registered structure a document is validated against.
//!
//! The embedding application builds a [`Schema`] once, before any load:
//! sections, their options, each option's kind, constraints, delimiter, and
//! default values. The schema is immutable from then on; every load pass
//! reads it and produces a fresh [`Document`](crate::Document), so repeated
//! loads are well-defined.

use crate::value::{TypeSpec, Value, ValueKind};

/// Whether a section or option must appear in the input.
#[derive(Clone, Copy, PartialEq, Eq, Debug, Default)]
pub enum Requirement {
    /// Absence from the input is an error.
    #[default]
    Required,
    /// Absence is filled in from the configured defaults.
    Optional,
}

/// The declaration of a single named option.
///
/// Built with one of the per-kind constructors and the `with_*` methods:
///
/// ```
/// use inilink_core::{OptionSpec, Value};
///
/// let port = OptionSpec::unsigned("port", 0, 65535)
///     .with_description("TCP listen port")
///     .optional()
///     .with_defaults(vec![Value::Unsigned(8080)]);
/// assert_eq!(port.id(), "port");
/// ```
#[derive(Clone, PartialEq, Debug)]
pub struct OptionSpec {
    id: String,
    description: String,
    requirement: Requirement,
    type_spec: TypeSpec,
    delimiter: char,
    defaults: Vec<Value>,
}

impl OptionSpec {
    fn new(id: impl Into<String>, type_spec: TypeSpec) -> Self {
        Self {
            id: id.into(),
            description: String::new(),
            requirement: Requirement::Required,
            type_spec,
            delimiter: ',',
            defaults: Vec::new(),
        }
    }

    /// Declares a boolean option.
    pub fn boolean(id: impl Into<String>) -> Self {
        Self::new(id, TypeSpec::Boolean)
    }

    /// Declares a signed integer option bounded to `[min, max]` inclusive.
    pub fn signed(id: impl Into<String>, min: i64, max: i64) -> Self {
        Self::new(id, TypeSpec::Signed { min, max })
    }

    /// Declares an unsigned integer option bounded to `[min, max]` inclusive.
    pub fn unsigned(id: impl Into<String>, min: u64, max: u64) -> Self {
        Self::new(id, TypeSpec::Unsigned { min, max })
    }

    /// Declares a float option bounded to `[min, max]` inclusive.
    pub fn float(id: impl Into<String>, min: f64, max: f64) -> Self {
        Self::new(id, TypeSpec::Float { min, max })
    }

    /// Declares an enum option accepting exactly the given tokens.
    pub fn enumeration<I, S>(id: impl Into<String>, allowed: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let allowed = allowed.into_iter().map(Into::into).collect();
        Self::new(id, TypeSpec::Enum { allowed })
    }

    /// Declares a string option.
    pub fn string(id: impl Into<String>) -> Self {
        Self::new(id, TypeSpec::String)
    }

    /// Marks the option optional; absence loads the defaults instead of
    /// reporting `MissingOption`.
    pub fn optional(mut self) -> Self {
        self.requirement = Requirement::Optional;
        self
    }

    /// Sets the human-readable description.
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    /// Overrides the value delimiter for this option (default `,`).
    pub fn with_delimiter(mut self, delimiter: char) -> Self {
        self.delimiter = delimiter;
        self
    }

    /// Sets the default value sequence used when an optional option is absent.
    ///
    /// # Panics
    ///
    /// Panics if any default's kind differs from the option's declared kind;
    /// a mismatched default is a schema construction bug.
    pub fn with_defaults(mut self, defaults: Vec<Value>) -> Self {
        for value in &defaults {
            assert_eq!(
                value.kind(),
                self.type_spec.kind(),
                "default value kind mismatch for option '{}'",
                self.id
            );
        }
        self.defaults = defaults;
        self
    }

    /// The option identifier.
    pub fn id(&self) -> &str {
        &self.id
    }

    /// The human-readable description.
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

    /// The default value sequence.
    pub fn defaults(&self) -> &[Value] {
        &self.defaults
    }
}

/// The declaration of a named section and its options.
#[derive(Clone, PartialEq, Debug, Default)]
pub struct SectionSpec {
    id: String,
    description: String,
    requirement: Requirement,
    options: Vec<OptionSpec>,
}

impl SectionSpec {
    /// Declares a new required section with no options.
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            ..Self::default()
        }
    }

    /// Marks the section optional.
    pub fn optional(mut self) -> Self {
        self.requirement = Requirement::Optional;
        self
    }

    /// Sets the human-readable description.
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    /// Registers an option.
    ///
    /// # Panics
    ///
    /// Panics if an option with the same identifier is already registered;
    /// identifiers are unique within their section.
    pub fn with_option(mut self, option: OptionSpec) -> Self {
        assert!(
            !self.options.iter().any(|o| o.id == option.id),
            "option '{}' registered twice in section '{}'",
            option.id,
            self.id
        );
        self.options.push(option);
        self
    }

    /// The section identifier.
    pub fn id(&self) -> &str {
        &self.id
    }

    /// The human-readable description.
    pub fn description(&self) -> &str {
        &self.description
    }

    /// Whether the section must appear in the input.
    pub fn requirement(&self) -> Requirement {
        self.requirement
    }

    /// The registered options, in registration order.
    pub fn options(&self) -> &[OptionSpec] {
        &self.options
    }

    /// Looks up a registered option by identifier.
    pub fn option(&self, id: &str) -> Option<&OptionSpec> {
        self.options.iter().find(|o| o.id == id)
    }
}

/// The full set of registered sections.
#[derive(Clone, PartialEq, Debug, Default)]
pub struct Schema {
    sections: Vec<SectionSpec>,
}

impl Schema {
    /// Creates an empty schema.
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a section.
    ///
    /// # Panics
    ///
    /// Panics if a section with the same identifier is already registered;
    /// identifiers are unique within the schema.
    pub fn with_section(mut self, section: SectionSpec) -> Self {
        assert!(
            !self.sections.iter().any(|s| s.id == section.id),
            "section '{}' registered twice",
            section.id
        );
        self.sections.push(section);
        self
    }

    /// Looks up a registered section by identifier.
    pub fn section(&self, id: &str) -> Option<&SectionSpec> {
        self.sections.iter().find(|s| s.id == id)
    }

    /// The registered sections, in registration order.
    pub fn sections(&self) -> &[SectionSpec] {
        &self.sections
    }
}
