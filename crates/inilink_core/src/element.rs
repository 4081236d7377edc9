//! A single literal-or-link value slot within an option.

use crate::value::Value;
use serde::{Deserialize, Serialize};

/// The bound target of a resolved link: the option whose value sequence the
/// link expands to.
#[derive(Clone, PartialEq, Eq, Debug, Serialize, Deserialize)]
pub struct LinkTarget {
    /// The target section identifier.
    pub section: String,
    /// The target option identifier.
    pub option: String,
}

/// A link to another option's value sequence.
///
/// Carries the raw `section#option` address from the input until the
/// resolution pass binds it to a target. Serialization of a resolved link
/// prints the *current* target, so re-pointing a link programmatically
/// changes the output.
#[derive(Clone, PartialEq, Eq, Debug, Serialize, Deserialize)]
pub struct Link {
    address: String,
    target: Option<LinkTarget>,
}

impl Link {
    /// The address text as written in the input, without the `${` `}` frame.
    pub fn address(&self) -> &str {
        &self.address
    }

    /// The bound target, if the resolution pass succeeded.
    pub fn target(&self) -> Option<&LinkTarget> {
        self.target.as_ref()
    }

    /// Returns `true` once the link is bound to a target.
    pub fn is_resolved(&self) -> bool {
        self.target.is_some()
    }

    pub(crate) fn bind(&mut self, target: LinkTarget) {
        self.target = Some(target);
    }
}

/// One value slot in an option's ordered element sequence.
///
/// Exactly one of the two states holds at any time: a concrete literal of the
/// owning option's kind, or a link to another option. Assigning a literal
/// replaces the whole element, clearing any link state.
#[derive(Clone, PartialEq, Debug, Serialize, Deserialize)]
pub enum Element {
    /// A concrete value.
    Literal(Value),
    /// A reference to another option's value sequence.
    Link(Link),
}

impl Element {
    /// Creates a literal element.
    pub fn literal(value: Value) -> Self {
        Element::Literal(value)
    }

    /// Creates an unresolved link element from its address text.
    pub fn link(address: impl Into<String>) -> Self {
        Element::Link(Link {
            address: address.into(),
            target: None,
        })
    }

    /// Returns `true` if this element is a link.
    pub fn is_link(&self) -> bool {
        matches!(self, Element::Link(_))
    }

    /// The literal value, if this element is not a link.
    pub fn as_literal(&self) -> Option<&Value> {
        match self {
            Element::Literal(value) => Some(value),
            Element::Link(_) => None,
        }
    }

    /// The link state, if this element is a link.
    pub fn as_link(&self) -> Option<&Link> {
        match self {
            Element::Literal(_) => None,
            Element::Link(link) => Some(link),
        }
    }

    /// Renders this element in its serialized text form.
    ///
    /// Literals render their value; a resolved link renders
    /// `${<target section>#<target option>}` from its current binding, an
    /// unresolved one falls back to the original address text.
    pub fn render(&self) -> String {
        match self {
            Element::Literal(value) => value.render(),
            Element::Link(link) => match &link.target {
                Some(target) => format!("${{{}#{}}}", target.section, target.option),
                None => format!("${{{}}}", link.address),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn literal_element() {
        let elem = Element::literal(Value::Unsigned(8080));
        assert!(!elem.is_link());
        assert_eq!(elem.as_literal(), Some(&Value::Unsigned(8080)));
        assert_eq!(elem.render(), "8080");
    }

    #[test]
    fn unresolved_link_renders_address() {
        let elem = Element::link("Net#port");
        assert!(elem.is_link());
        assert_eq!(elem.as_link().unwrap().address(), "Net#port");
        assert!(!elem.as_link().unwrap().is_resolved());
        assert_eq!(elem.render(), "${Net#port}");
    }

    #[test]
    fn resolved_link_renders_current_target() {
        let mut elem = Element::link("Net#port");
        if let Element::Link(link) = &mut elem {
            link.bind(LinkTarget {
                section: "Fallback".to_string(),
                option: "port".to_string(),
            });
        }
        // The render reflects the binding, not the original address.
        assert_eq!(elem.render(), "${Fallback#port}");
    }

    #[test]
    fn string_literal_renders_escaped() {
        let elem = Element::literal(Value::String("a,b".to_string()));
        assert_eq!(elem.render(), "a\\,b");
    }
}
