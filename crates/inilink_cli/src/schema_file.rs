//! TOML schema descriptions and their translation into a [`Schema`].
//!
//! The CLI cannot register sections in code the way an embedding application
//! does, so it reads the schema from a TOML file instead:
//!
//! ```toml
//! [[sections]]
//! id = "Net"
//! description = "network endpoint"
//!
//! [[sections.options]]
//! id = "host"
//! type = "string"
//!
//! [[sections.options]]
//! id = "port"
//! type = "unsigned"
//! min = 0
//! max = 65535
//! required = false
//! default = [8080]
//! ```

use inilink_core::{OptionSpec, Schema, SectionSpec, Value};
use serde::Deserialize;
use std::path::Path;

/// Errors that can occur while loading a schema description file.
#[derive(Debug, thiserror::Error)]
pub enum SchemaFileError {
    /// An I/O error occurred while reading the file.
    #[error("failed to read schema: {0}")]
    IoError(#[from] std::io::Error),

    /// The TOML content could not be parsed.
    #[error("failed to parse schema: {0}")]
    ParseError(String),

    /// The description is well-formed TOML but not a valid schema.
    #[error("invalid schema: {0}")]
    InvalidSpec(String),
}

#[derive(Debug, Deserialize)]
struct SchemaFile {
    #[serde(default)]
    sections: Vec<SectionDesc>,
}

#[derive(Debug, Deserialize)]
struct SectionDesc {
    id: String,
    #[serde(default)]
    description: String,
    #[serde(default = "default_true")]
    required: bool,
    #[serde(default)]
    options: Vec<OptionDesc>,
}

#[derive(Debug, Deserialize)]
struct OptionDesc {
    id: String,
    #[serde(rename = "type")]
    kind: KindDesc,
    #[serde(default)]
    description: String,
    #[serde(default = "default_true")]
    required: bool,
    #[serde(default)]
    delimiter: Option<char>,
    #[serde(default)]
    min: Option<toml::Value>,
    #[serde(default)]
    max: Option<toml::Value>,
    #[serde(default)]
    values: Vec<String>,
    #[serde(default)]
    default: Vec<toml::Value>,
}

#[derive(Clone, Copy, PartialEq, Eq, Debug, Deserialize)]
#[serde(rename_all = "lowercase")]
enum KindDesc {
    Boolean,
    Signed,
    Unsigned,
    Float,
    Enum,
    String,
}

fn default_true() -> bool {
    true
}

/// Loads and validates a schema description from a file.
pub fn load_schema(path: &Path) -> Result<Schema, SchemaFileError> {
    let content = std::fs::read_to_string(path)?;
    load_schema_from_str(&content)
}

/// Parses and validates a schema description from a string.
///
/// Useful for testing without filesystem dependencies.
pub fn load_schema_from_str(content: &str) -> Result<Schema, SchemaFileError> {
    let file: SchemaFile =
        toml::from_str(content).map_err(|e| SchemaFileError::ParseError(e.to_string()))?;

    let mut schema = Schema::new();
    for section_desc in &file.sections {
        if schema.section(&section_desc.id).is_some() {
            return Err(SchemaFileError::InvalidSpec(format!(
                "section '{}' is declared twice",
                section_desc.id
            )));
        }
        let mut section = SectionSpec::new(&section_desc.id)
            .with_description(&section_desc.description);
        if !section_desc.required {
            section = section.optional();
        }
        for option_desc in &section_desc.options {
            if section_desc
                .options
                .iter()
                .filter(|o| o.id == option_desc.id)
                .count()
                > 1
            {
                return Err(SchemaFileError::InvalidSpec(format!(
                    "option '{}' is declared twice in section '{}'",
                    option_desc.id, section_desc.id
                )));
            }
            section = section.with_option(build_option(option_desc, &section_desc.id)?);
        }
        schema = schema.with_section(section);
    }
    Ok(schema)
}

fn build_option(desc: &OptionDesc, section_id: &str) -> Result<OptionSpec, SchemaFileError> {
    let invalid = |message: String| SchemaFileError::InvalidSpec(message);
    let context = format!("option '{}' in section '{}'", desc.id, section_id);

    let mut option = match desc.kind {
        KindDesc::Boolean => OptionSpec::boolean(&desc.id),
        KindDesc::Signed => OptionSpec::signed(
            &desc.id,
            bound_i64(desc.min.as_ref(), i64::MIN, &context)?,
            bound_i64(desc.max.as_ref(), i64::MAX, &context)?,
        ),
        KindDesc::Unsigned => OptionSpec::unsigned(
            &desc.id,
            bound_u64(desc.min.as_ref(), u64::MIN, &context)?,
            bound_u64(desc.max.as_ref(), u64::MAX, &context)?,
        ),
        KindDesc::Float => OptionSpec::float(
            &desc.id,
            bound_f64(desc.min.as_ref(), f64::NEG_INFINITY, &context)?,
            bound_f64(desc.max.as_ref(), f64::INFINITY, &context)?,
        ),
        KindDesc::Enum => {
            if desc.values.is_empty() {
                return Err(invalid(format!("{context} declares no allowed values")));
            }
            OptionSpec::enumeration(&desc.id, desc.values.clone())
        }
        KindDesc::String => OptionSpec::string(&desc.id),
    };

    option = option.with_description(&desc.description);
    if !desc.required {
        option = option.optional();
    }
    if let Some(delimiter) = desc.delimiter {
        option = option.with_delimiter(delimiter);
    }

    let mut defaults = Vec::new();
    for raw in &desc.default {
        defaults.push(default_value(desc, raw, &context)?);
    }
    if !defaults.is_empty() {
        option = option.with_defaults(defaults);
    }
    Ok(option)
}

fn default_value(
    desc: &OptionDesc,
    raw: &toml::Value,
    context: &str,
) -> Result<Value, SchemaFileError> {
    let invalid = |message: String| SchemaFileError::InvalidSpec(message);
    match desc.kind {
        KindDesc::Boolean => raw
            .as_bool()
            .map(Value::Boolean)
            .ok_or_else(|| invalid(format!("{context}: default {raw} is not a boolean"))),
        KindDesc::Signed => raw
            .as_integer()
            .map(Value::Signed)
            .ok_or_else(|| invalid(format!("{context}: default {raw} is not an integer"))),
        KindDesc::Unsigned => raw
            .as_integer()
            .and_then(|v| u64::try_from(v).ok())
            .map(Value::Unsigned)
            .ok_or_else(|| {
                invalid(format!("{context}: default {raw} is not an unsigned integer"))
            }),
        KindDesc::Float => match raw {
            toml::Value::Float(v) => Ok(Value::Float(*v)),
            toml::Value::Integer(v) => Ok(Value::Float(*v as f64)),
            _ => Err(invalid(format!("{context}: default {raw} is not a float"))),
        },
        KindDesc::Enum => {
            let token = raw
                .as_str()
                .ok_or_else(|| invalid(format!("{context}: default {raw} is not a string")))?;
            if !desc.values.iter().any(|v| v == token) {
                return Err(invalid(format!(
                    "{context}: default '{token}' is not among the allowed values"
                )));
            }
            Ok(Value::Enum(token.to_string()))
        }
        KindDesc::String => raw
            .as_str()
            .map(|s| Value::String(s.to_string()))
            .ok_or_else(|| invalid(format!("{context}: default {raw} is not a string"))),
    }
}

fn bound_i64(
    raw: Option<&toml::Value>,
    fallback: i64,
    context: &str,
) -> Result<i64, SchemaFileError> {
    match raw {
        None => Ok(fallback),
        Some(value) => value.as_integer().ok_or_else(|| {
            SchemaFileError::InvalidSpec(format!("{context}: bound {value} is not an integer"))
        }),
    }
}

fn bound_u64(
    raw: Option<&toml::Value>,
    fallback: u64,
    context: &str,
) -> Result<u64, SchemaFileError> {
    match raw {
        None => Ok(fallback),
        Some(value) => value
            .as_integer()
            .and_then(|v| u64::try_from(v).ok())
            .ok_or_else(|| {
                SchemaFileError::InvalidSpec(format!(
                    "{context}: bound {value} is not an unsigned integer"
                ))
            }),
    }
}

fn bound_f64(
    raw: Option<&toml::Value>,
    fallback: f64,
    context: &str,
) -> Result<f64, SchemaFileError> {
    match raw {
        None => Ok(fallback),
        Some(value) => match value {
            toml::Value::Float(v) => Ok(*v),
            toml::Value::Integer(v) => Ok(*v as f64),
            _ => Err(SchemaFileError::InvalidSpec(format!(
                "{context}: bound {value} is not a number"
            ))),
        },
    }
}
