use std::fmt;

use jsonschema::{error::ValidationErrorKind, ValidationError};
use serde_json::Value;

use crate::schema::Schema;

/// Outcome of validating a payload against a [`Schema`].
pub type ValidationResult = Result<(), SchemaViolations>;

/// The schema keyword a payload violated.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Rule {
    Type,
    Required,
    MinLength,
    MaxLength,
    Minimum,
    Maximum,
    /// Any other keyword, described by the validator itself.
    Other,
}

/// A single schema violation.
///
/// Rendered as `<instance> <message>`, e.g. `instance.author is not of a type(s) string`.
#[derive(Debug, Clone, PartialEq)]
pub struct SchemaViolation {
    /// Path of the offending value, `instance` being the payload itself.
    instance: String,
    /// The property the violation is about, if any.
    ///
    /// For [`Rule::Required`] this is the missing property.
    field: Option<String>,
    rule: Rule,
    message: String,
}

impl SchemaViolation {
    pub fn instance(&self) -> &str {
        &self.instance
    }

    pub fn field(&self) -> Option<&str> {
        self.field.as_deref()
    }

    pub fn rule(&self) -> Rule {
        self.rule
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub fn descriptor(&self) -> String {
        self.to_string()
    }
}

impl fmt::Display for SchemaViolation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.instance, self.message)
    }
}

/// A non-empty, ordered list of [`SchemaViolation`]s.
#[derive(Debug, Clone, PartialEq)]
pub struct SchemaViolations(Vec<SchemaViolation>);

impl SchemaViolations {
    pub fn iter(&self) -> impl Iterator<Item = &SchemaViolation> {
        self.0.iter()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn descriptors(&self) -> Vec<String> {
        self.iter().map(SchemaViolation::descriptor).collect()
    }
}

impl IntoIterator for SchemaViolations {
    type Item = SchemaViolation;
    type IntoIter = std::vec::IntoIter<SchemaViolation>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.into_iter()
    }
}

impl Schema {
    /// Validates `payload` against this schema.
    ///
    /// Every violation is collected, in the order the schema checks them.
    pub fn validate(&self, payload: &Value) -> ValidationResult {
        let violations = self
            .validator
            .iter_errors(payload)
            .map(|error| self.violation(&error))
            .collect::<Vec<_>>();

        match violations.is_empty() {
            true => Ok(()),
            false => Err(SchemaViolations(violations)),
        }
    }

    fn violation(&self, error: &ValidationError<'_>) -> SchemaViolation {
        let segments = pointer_segments(&error.instance_path.to_string());
        let instance = std::iter::once("instance")
            .chain(segments.iter().map(String::as_str))
            .collect::<Vec<_>>()
            .join(".");
        let field = segments.last().cloned();

        let (field, rule, message) = match &error.kind {
            ValidationErrorKind::Required { property } => {
                let property = property
                    .as_str()
                    .map(str::to_string)
                    .unwrap_or_else(|| property.to_string());
                let message = format!("requires property \"{property}\"");

                (Some(property), Rule::Required, message)
            }
            ValidationErrorKind::Type { .. } => {
                let keyword = self.document.pointer(&error.schema_path.to_string());

                let message = match type_names(keyword) {
                    Some(types) => format!("is not of a type(s) {types}"),
                    None => error.to_string(),
                };

                (field, Rule::Type, message)
            }
            ValidationErrorKind::MinLength { limit } => (
                field,
                Rule::MinLength,
                format!("does not meet minimum length of {limit}"),
            ),
            ValidationErrorKind::MaxLength { limit } => (
                field,
                Rule::MaxLength,
                format!("does not meet maximum length of {limit}"),
            ),
            ValidationErrorKind::Minimum { limit } => (
                field,
                Rule::Minimum,
                format!("must be greater than or equal to {limit}"),
            ),
            ValidationErrorKind::Maximum { limit } => (
                field,
                Rule::Maximum,
                format!("must be less than or equal to {limit}"),
            ),
            _ => (field, Rule::Other, error.to_string()),
        };

        SchemaViolation {
            instance,
            field,
            rule,
            message,
        }
    }
}

/// `/publisher/name` -> `["publisher", "name"]`, `""` -> `[]`.
fn pointer_segments(pointer: &str) -> Vec<String> {
    pointer
        .split('/')
        .skip(1)
        .map(|segment| segment.replace("~1", "/").replace("~0", "~"))
        .collect()
}

/// `"string"` -> `string`, `["string", "null"]` -> `string,null`.
fn type_names(keyword: Option<&Value>) -> Option<String> {
    match keyword? {
        Value::String(name) => Some(name.clone()),
        Value::Array(names) => Some(
            names
                .iter()
                .filter_map(Value::as_str)
                .collect::<Vec<_>>()
                .join(","),
        ),
        _ => None,
    }
}
