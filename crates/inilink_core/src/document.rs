//! The top-level document: load pipeline, link resolution, serialization.

use crate::element::{Element, LinkTarget};
use crate::option::OptionData;
use crate::schema::{Requirement, Schema};
use crate::section::SectionData;
use crate::value::{Value, ValueKind};
use inilink_diagnostics::{Diagnostic, DiagnosticSink, ErrorKind, ErrorPolicy};

/// A link operation failed.
///
/// Circular links are never routed through the error policy: they surface as
/// a hard error from [`Document::materialize`] no matter how the document was
/// loaded.
#[derive(Clone, PartialEq, Eq, Debug, thiserror::Error)]
pub enum LinkError {
    /// Materialization revisited an option already on the resolution path.
    #[error("circular link through {section}#{option}")]
    Circular {
        /// The section revisited on the path.
        section: String,
        /// The option revisited on the path.
        option: String,
    },
    /// A link was materialized before the resolution pass bound it.
    #[error("link ${{{address}}} was never resolved")]
    Unresolved {
        /// The raw address text of the link.
        address: String,
    },
    /// An option named in the operation does not exist in the document.
    #[error("{section}#{option} does not exist")]
    MissingTarget {
        /// The missing section identifier.
        section: String,
        /// The missing option identifier.
        option: String,
    },
    /// A programmatic re-point named a target of a different kind.
    #[error("link target {section}#{option} holds {found} values, expected {expected}")]
    KindMismatch {
        /// The target section identifier.
        section: String,
        /// The target option identifier.
        option: String,
        /// The linking option's kind.
        expected: ValueKind,
        /// The target option's kind.
        found: ValueKind,
    },
}

/// Loads documents against a registered [`Schema`].
///
/// The two policy knobs of the engine live here: `strict` decides whether
/// unregistered identifiers are structural errors or silently tolerated, and
/// the [`ErrorPolicy`] decides whether the first error aborts the pass or all
/// errors accumulate. Every load produces a fresh [`Document`], so loading
/// the same text twice gives two equal, independent documents.
#[derive(Clone, Copy, Debug)]
pub struct Loader<'a> {
    schema: &'a Schema,
    strict: bool,
    policy: ErrorPolicy,
}

impl<'a> Loader<'a> {
    /// Creates a lenient, fail-fast loader for the given schema.
    pub fn new(schema: &'a Schema) -> Self {
        Self {
            schema,
            strict: false,
            policy: ErrorPolicy::FailFast,
        }
    }

    /// Sets whether unregistered identifiers are reported as errors.
    pub fn strict(mut self, strict: bool) -> Self {
        self.strict = strict;
        self
    }

    /// Sets the error policy for subsequent loads.
    pub fn policy(mut self, policy: ErrorPolicy) -> Self {
        self.policy = policy;
        self
    }

    /// Loads a document from a complete text.
    pub fn load_str(&self, text: &str) -> Result<Document, Diagnostic> {
        self.load_lines(text.lines())
    }

    /// Loads a document from an ordered sequence of lines.
    ///
    /// Under fail-fast the first diagnostic is returned as the error and the
    /// rest of the pass is abandoned. Under fail-soft the returned document
    /// carries every diagnostic in [`Document::diagnostics`] and all
    /// error-free parts of the input are applied.
    pub fn load_lines<I, S>(&self, lines: I) -> Result<Document, Diagnostic>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let lines: Vec<String> = lines.into_iter().map(|s| s.as_ref().to_string()).collect();
        let mut sink = DiagnosticSink::new(self.policy);
        let mut doc = Document {
            sections: self
                .schema
                .sections()
                .iter()
                .map(SectionData::from_spec)
                .collect(),
            encounter_order: Vec::new(),
            preamble: Vec::new(),
            diagnostics: Vec::new(),
        };

        // Group the lines into header-delimited blocks.
        let mut blocks: Vec<(usize, usize)> = Vec::new();
        let mut current_start = None;
        let mut first_header = None;
        for (i, line) in lines.iter().enumerate() {
            if header_id(line).is_some() {
                if let Some(start) = current_start.replace(i) {
                    blocks.push((start, i));
                }
                if first_header.is_none() {
                    first_header = Some(i);
                }
            } else if current_start.is_none() && self.strict && !is_blank_or_comment(line) {
                sink.report(Diagnostic::new(
                    ErrorKind::BadFormat,
                    i as u32 + 1,
                    "Unknown characters before first section",
                ))?;
            }
        }
        if let Some(start) = current_start {
            blocks.push((start, lines.len()));
        }
        doc.preamble = lines[..first_header.unwrap_or(lines.len())].to_vec();

        for (start, end) in blocks {
            let Some(id) = header_id(&lines[start]) else {
                continue;
            };
            let line_no = start as u32 + 1;
            let index = match doc.sections.iter().position(|s| s.id() == id) {
                Some(index) => index,
                None => {
                    if self.strict {
                        sink.report(Diagnostic::new(
                            ErrorKind::UnknownSection,
                            line_no,
                            format!("Unknown section: {id}"),
                        ))?;
                    }
                    doc.sections.push(SectionData::unknown(id));
                    doc.sections.len() - 1
                }
            };
            let first_encounter = !doc.sections[index].loaded();
            doc.sections[index].load(line_no, &lines[start..end], self.strict, &mut sink)?;
            if first_encounter {
                doc.encounter_order.push(index);
            }
        }

        for section in &mut doc.sections {
            if !section.loaded() {
                if section.requirement() == Requirement::Required {
                    sink.report(Diagnostic::new(
                        ErrorKind::MissingSection,
                        1,
                        format!("Required section {} is missing.", section.id()),
                    ))?;
                }
                section.load_all_defaults();
            }
        }

        resolve_links(&mut doc, &mut sink)?;

        doc.diagnostics = sink.take_all();
        Ok(doc)
    }
}

/// Extracts the section identifier if the line is a header.
///
/// A header has `[` as the first non-blank character of its pre-comment
/// prefix and a `]` somewhere after it; the identifier is everything between
/// the two brackets, untrimmed.
fn header_id(line: &str) -> Option<&str> {
    let prefix = line.split(';').next().unwrap_or("");
    if !prefix.trim_start().starts_with('[') {
        return None;
    }
    let open = prefix.find('[')?;
    let close = prefix[open..].find(']')? + open;
    Some(&prefix[open + 1..close])
}

fn is_blank_or_comment(line: &str) -> bool {
    line.split(';')
        .next()
        .unwrap_or("")
        .trim()
        .is_empty()
}

/// Binds every unresolved link element to its target option.
///
/// The address splits on the first `#` into section and option identifiers;
/// both are looked up in the document (dynamically created sections
/// included). A missing target or a target of a different kind is an
/// `InvalidLink`. Values are not flattened here — materialization stays lazy.
fn resolve_links(doc: &mut Document, sink: &mut DiagnosticSink) -> Result<(), Diagnostic> {
    struct Pending {
        section: usize,
        option: usize,
        element: usize,
        address: String,
        line: u32,
        kind: ValueKind,
    }

    let mut pending = Vec::new();
    for (si, section) in doc.sections.iter().enumerate() {
        for (oi, option) in section.options().iter().enumerate() {
            if !option.loaded() {
                continue;
            }
            for (ei, element) in option.elements().iter().enumerate() {
                if let Some(link) = element.as_link() {
                    if !link.is_resolved() {
                        pending.push(Pending {
                            section: si,
                            option: oi,
                            element: ei,
                            address: link.address().to_string(),
                            line: option.line(),
                            kind: option.kind(),
                        });
                    }
                }
            }
        }
    }

    for p in pending {
        let target = p.address.split_once('#').and_then(|(sec, opt)| {
            let kind = doc.section(sec)?.option(opt)?.kind();
            Some((sec.to_string(), opt.to_string(), kind))
        });
        match target {
            Some((section, option, kind)) if kind == p.kind => {
                doc.sections[p.section].options_mut()[p.option]
                    .bind_element(p.element, LinkTarget { section, option });
            }
            _ => sink.report(Diagnostic::new(
                ErrorKind::InvalidLink,
                p.line,
                format!("${{{}}} is invalid link.", p.address),
            ))?,
        }
    }
    Ok(())
}

/// The in-memory result of one load pass.
///
/// Sections appear in schema registration order, followed by any sections
/// the input introduced; serialization walks them in first-encountered input
/// order, preceded by the preamble. The document is freely mutable after the
/// load — serialization reflects the current state, not the original text.
#[derive(Clone, PartialEq, Debug)]
pub struct Document {
    sections: Vec<SectionData>,
    encounter_order: Vec<usize>,
    preamble: Vec<String>,
    diagnostics: Vec<Diagnostic>,
}

impl Document {
    /// All sections: schema-declared first, then unknown ones in discovery
    /// order.
    pub fn sections(&self) -> &[SectionData] {
        &self.sections
    }

    /// Looks up a section by identifier.
    pub fn section(&self, id: &str) -> Option<&SectionData> {
        self.sections.iter().find(|s| s.id() == id)
    }

    /// Mutable lookup of a section by identifier.
    pub fn section_mut(&mut self, id: &str) -> Option<&mut SectionData> {
        self.sections.iter_mut().find(|s| s.id() == id)
    }

    /// The literal lines that preceded the first section header.
    pub fn preamble(&self) -> &[String] {
        &self.preamble
    }

    /// The diagnostics accumulated by a fail-soft load, in report order.
    /// Empty after a clean load (and always empty under fail-fast, where the
    /// first diagnostic is returned as the load error instead).
    pub fn diagnostics(&self) -> &[Diagnostic] {
        &self.diagnostics
    }

    /// Returns `true` if the load pass reported any diagnostics.
    pub fn has_errors(&self) -> bool {
        !self.diagnostics.is_empty()
    }

    /// Flattens an option into its concrete value sequence.
    ///
    /// Literal elements contribute themselves; a resolved link contributes
    /// the full materialized sequence of its target option, in the target's
    /// order, so one link can expand into many values. Nothing is cached:
    /// every call re-walks the chain and re-detects cycles, and the walk
    /// fails with [`LinkError::Circular`] as soon as it revisits an option
    /// already on the current path — regardless of the load's error policy.
    pub fn materialize(&self, section: &str, option: &str) -> Result<Vec<Value>, LinkError> {
        let mut path = Vec::new();
        self.materialize_on_path(section, option, &mut path)
    }

    fn materialize_on_path(
        &self,
        section: &str,
        option: &str,
        path: &mut Vec<(String, String)>,
    ) -> Result<Vec<Value>, LinkError> {
        if path.iter().any(|(s, o)| s == section && o == option) {
            return Err(LinkError::Circular {
                section: section.to_string(),
                option: option.to_string(),
            });
        }
        let target = self
            .section(section)
            .and_then(|s| s.option(option))
            .ok_or_else(|| LinkError::MissingTarget {
                section: section.to_string(),
                option: option.to_string(),
            })?;

        path.push((section.to_string(), option.to_string()));
        let result = self.collect_values(target, path);
        path.pop();
        result
    }

    fn collect_values(
        &self,
        option: &OptionData,
        path: &mut Vec<(String, String)>,
    ) -> Result<Vec<Value>, LinkError> {
        let mut values = Vec::new();
        for element in option.elements() {
            match element {
                Element::Literal(value) => values.push(value.clone()),
                Element::Link(link) => match link.target() {
                    Some(t) => {
                        values.extend(self.materialize_on_path(&t.section, &t.option, path)?)
                    }
                    None => {
                        return Err(LinkError::Unresolved {
                            address: link.address().to_string(),
                        })
                    }
                },
            }
        }
        Ok(values)
    }

    /// Re-points (or creates) a link element programmatically.
    ///
    /// The element at `index` of `section`/`option` becomes a resolved link
    /// to `target_section`/`target_option`. Both ends must exist and the
    /// kinds must match; serialization will print the new target.
    ///
    /// # Panics
    ///
    /// Panics if `index` is out of bounds for the option's element sequence.
    pub fn point_link(
        &mut self,
        section: &str,
        option: &str,
        index: usize,
        target_section: &str,
        target_option: &str,
    ) -> Result<(), LinkError> {
        let source_kind = self
            .section(section)
            .and_then(|s| s.option(option))
            .ok_or_else(|| LinkError::MissingTarget {
                section: section.to_string(),
                option: option.to_string(),
            })?
            .kind();
        let target_kind = self
            .section(target_section)
            .and_then(|s| s.option(target_option))
            .ok_or_else(|| LinkError::MissingTarget {
                section: target_section.to_string(),
                option: target_option.to_string(),
            })?
            .kind();
        if source_kind != target_kind {
            return Err(LinkError::KindMismatch {
                section: target_section.to_string(),
                option: target_option.to_string(),
                expected: source_kind,
                found: target_kind,
            });
        }
        if let Some(sec) = self.section_mut(section) {
            if let Some(opt) = sec.option_mut(option) {
                opt.set_link_element(
                    index,
                    LinkTarget {
                        section: target_section.to_string(),
                        option: target_option.to_string(),
                    },
                );
            }
        }
        Ok(())
    }

    /// Renders the document back to lines: the preamble, then each
    /// encountered section in first-encountered order.
    ///
    /// With `use_defaults` every option renders its default sequence instead
    /// of its live elements; the live state is never modified.
    pub fn serialize(&self, use_defaults: bool) -> Vec<String> {
        let mut lines = self.preamble.clone();
        for &index in &self.encounter_order {
            lines.extend(self.sections[index].serialize(use_defaults));
        }
        lines
    }
}
