//! Raw (serialized) form of a statement list.
//!
//! The raw form is a JSON array of statement objects:
//!
//! ```json
//! [
//!   {
//!     "sid": "ReadDocs",
//!     "effect": "Allow",
//!     "actions": ["documents:GetDocument"],
//!     "resources": ["urn:acme:documents::document/*"],
//!     "conditions": {"StringEquals": {"org": "acme"}}
//!   }
//! ]
//! ```
//!
//! Parsing is a gate with three outcomes: a statement list, a shape error
//! (not a well-formed statement array), or a validation error (well-formed
//! but semantically invalid). Shape is always checked first. Nothing is
//! coerced: a missing `resources` array is an error, never `[]`.

use std::fmt;

use serde::de::{Deserialize, Deserializer, IgnoredAny, MapAccess, Visitor};
use serde_json::Value;
use serde_json::value::RawValue;
use thiserror::Error;

use crate::model::{Effect, Statement};
use crate::validate::{StatementField, ValidationError, validate_list};

/// Raw content that is not a well-formed statement array.
///
/// Indices are zero-based; `Display` renders them 1-based.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ShapeError {
    #[error("invalid JSON at line {line}, column {column}: {message}")]
    Syntax {
        line: usize,
        column: usize,
        message: String,
    },

    #[error("statements must be a JSON array")]
    NotAnArray,

    #[error("statement {}: must be a JSON object", .index + 1)]
    NotAnObject { index: usize },

    #[error("statement {}: missing required field '{}'", .index + 1, .field)]
    MissingField { index: usize, field: StatementField },

    #[error("statement {}: '{}' must be {}", .index + 1, .field, .expected)]
    WrongType {
        index: usize,
        field: StatementField,
        expected: &'static str,
    },

    #[error("statement {}: effect must be \"Allow\" or \"Deny\", got {}", .index + 1, .value)]
    InvalidEffect { index: usize, value: String },

    #[error("statement {}: unknown field '{}'", .index + 1, .name)]
    UnknownField { index: usize, name: String },

    #[error("statement {}: field '{}' appears more than once", .index + 1, .field)]
    DuplicateField { index: usize, field: StatementField },
}

impl ShapeError {
    /// Zero-based index of the offending statement, when one can be named.
    pub fn statement_index(&self) -> Option<usize> {
        match self {
            ShapeError::Syntax { .. } | ShapeError::NotAnArray => None,
            ShapeError::NotAnObject { index }
            | ShapeError::MissingField { index, .. }
            | ShapeError::WrongType { index, .. }
            | ShapeError::InvalidEffect { index, .. }
            | ShapeError::UnknownField { index, .. }
            | ShapeError::DuplicateField { index, .. } => Some(*index),
        }
    }

    pub fn field(&self) -> Option<StatementField> {
        match self {
            ShapeError::MissingField { field, .. }
            | ShapeError::WrongType { field, .. }
            | ShapeError::DuplicateField { field, .. } => Some(*field),
            ShapeError::InvalidEffect { .. } => Some(StatementField::Effect),
            _ => None,
        }
    }
}

/// Why raw content was refused.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RawError {
    #[error(transparent)]
    Shape(#[from] ShapeError),

    #[error(transparent)]
    Validation(#[from] ValidationError),
}

impl RawError {
    pub fn statement_index(&self) -> Option<usize> {
        match self {
            RawError::Shape(e) => e.statement_index(),
            RawError::Validation(e) => Some(e.statement_index),
        }
    }

    pub fn field(&self) -> Option<StatementField> {
        match self {
            RawError::Shape(e) => e.field(),
            RawError::Validation(e) => Some(e.field),
        }
    }

    pub fn is_shape(&self) -> bool {
        matches!(self, RawError::Shape(_))
    }
}

/// Parse raw text into a statement list: shape gate, then validation.
pub fn parse_statements(text: &str) -> Result<Vec<Statement>, RawError> {
    // Syntax only: nothing is decoded, so any well-formed number is accepted.
    serde_json::from_str::<IgnoredAny>(text).map_err(syntax_error)?;
    let items: Vec<Box<RawValue>> =
        serde_json::from_str(text).map_err(|_| ShapeError::NotAnArray)?;
    for (index, item) in items.iter().enumerate() {
        let members: Members = serde_json::from_str(item.get())
            .map_err(|_| ShapeError::NotAnObject { index })?;
        check_shape(index, &members)?;
    }

    // Second pass over the original text so `conditions` keeps its exact bytes.
    let statements: Vec<Statement> = serde_json::from_str(text).map_err(syntax_error)?;
    validate_list(&statements)?;
    Ok(statements)
}

/// Serialize a statement list as pretty-printed JSON.
///
/// `conditions` is written back verbatim; `sid` is omitted when unset.
pub fn serialize_statements(statements: &[Statement]) -> Result<String, serde_json::Error> {
    serde_json::to_string_pretty(statements)
}

fn syntax_error(e: serde_json::Error) -> ShapeError {
    ShapeError::Syntax {
        line: e.line(),
        column: e.column(),
        message: e.to_string(),
    }
}

fn known_field(name: &str) -> Option<StatementField> {
    match name {
        "sid" => Some(StatementField::Sid),
        "effect" => Some(StatementField::Effect),
        "actions" => Some(StatementField::Actions),
        "resources" => Some(StatementField::Resources),
        "conditions" => Some(StatementField::Conditions),
        _ => None,
    }
}

/// Members of one statement object in document order, duplicates kept.
/// Values stay undecoded until a check needs them.
struct Members(Vec<(String, Box<RawValue>)>);

impl<'de> Deserialize<'de> for Members {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct MembersVisitor;

        impl<'de> Visitor<'de> for MembersVisitor {
            type Value = Members;

            fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str("a JSON object")
            }

            fn visit_map<A: MapAccess<'de>>(self, mut map: A) -> Result<Members, A::Error> {
                let mut members = Vec::new();
                while let Some(entry) = map.next_entry::<String, Box<RawValue>>()? {
                    members.push(entry);
                }
                Ok(Members(members))
            }
        }

        deserializer.deserialize_map(MembersVisitor)
    }
}

impl Members {
    fn get(&self, field: StatementField) -> Option<&RawValue> {
        self.0
            .iter()
            .find(|(name, _)| name == field.as_str())
            .map(|(_, value)| value.as_ref())
    }
}

fn check_shape(index: usize, members: &Members) -> Result<(), ShapeError> {
    let mut seen = Vec::with_capacity(members.0.len());
    for (name, _) in &members.0 {
        let Some(field) = known_field(name) else {
            return Err(ShapeError::UnknownField {
                index,
                name: name.clone(),
            });
        };
        if seen.contains(&field) {
            return Err(ShapeError::DuplicateField { index, field });
        }
        seen.push(field);
    }

    let wrong_type = |field, expected| ShapeError::WrongType {
        index,
        field,
        expected,
    };

    match decoded(required(index, members, StatementField::Effect)?) {
        Some(Value::String(s)) if Effect::parse(&s).is_some() => {}
        Some(Value::String(s)) => {
            return Err(ShapeError::InvalidEffect {
                index,
                value: format!("{s:?}"),
            });
        }
        _ => return Err(wrong_type(StatementField::Effect, "a string")),
    }

    for field in [StatementField::Actions, StatementField::Resources] {
        let ok = match decoded(required(index, members, field)?) {
            Some(Value::Array(values)) => values.iter().all(Value::is_string),
            _ => false,
        };
        if !ok {
            return Err(wrong_type(field, "an array of strings"));
        }
    }

    if let Some(sid) = members.get(StatementField::Sid) {
        if !matches!(decoded(sid), Some(Value::String(_) | Value::Null)) {
            return Err(wrong_type(StatementField::Sid, "a string"));
        }
    }

    Ok(())
}

/// Decode one member value. `None` for values `Value` cannot hold.
fn decoded(raw: &RawValue) -> Option<Value> {
    serde_json::from_str(raw.get()).ok()
}

fn required(
    index: usize,
    members: &Members,
    field: StatementField,
) -> Result<&RawValue, ShapeError> {
    members
        .get(field)
        .ok_or(ShapeError::MissingField { index, field })
}
