//! Schema-validated, typed configuration documents with value links.
//!
//! The embedding application registers a [`Schema`] — sections, options,
//! kinds, constraints, defaults — then a [`Loader`] parses raw text in the
//! INI-like dialect against it, producing a [`Document`]: validated typed
//! values, captured comments and ordering, and resolved `${section#option}`
//! links that alias another option's value sequence. The document is freely
//! mutable and serializes back to text in its original order.
//!
//! ```
//! use inilink_core::{Loader, OptionSpec, Schema, SectionSpec, Value};
//!
//! let schema = Schema::new().with_section(
//!     SectionSpec::new("Net")
//!         .with_option(OptionSpec::string("host"))
//!         .with_option(OptionSpec::unsigned("port", 0, 65535)),
//! );
//! let doc = Loader::new(&schema)
//!     .strict(true)
//!     .load_str("[Net]\nhost = example.com\nport = 8080")
//!     .unwrap();
//! assert_eq!(
//!     doc.materialize("Net", "port").unwrap(),
//!     vec![Value::Unsigned(8080)]
//! );
//! ```

#![warn(missing_docs)]

pub mod document;
pub mod element;
pub mod option;
pub mod schema;
pub mod section;
pub mod split;
pub mod value;

pub use document::{Document, LinkError, Loader};
pub use element::{Element, Link, LinkTarget};
pub use option::OptionData;
pub use schema::{OptionSpec, Requirement, Schema, SectionSpec};
pub use section::SectionData;
pub use value::{KindMismatch, TypeSpec, Value, ValueKind};

pub use inilink_diagnostics::{Diagnostic, DiagnosticSink, ErrorKind, ErrorPolicy};
