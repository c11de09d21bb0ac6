use std::{fmt, path::Path};

use jsonschema::Validator;
use serde_json::Value;

/// The schema book payloads are validated against, unless configured otherwise.
const BOOK_SCHEMA: &str = include_str!("../schemas/book.json");

#[derive(Debug, thiserror::Error)]
pub enum SchemaError {
    #[error("Failed to read schema file: {0}")]
    Io(#[from] std::io::Error),
    #[error("Schema is not valid JSON: {0}")]
    Json(#[from] serde_json::Error),
    #[error("Schema is not a valid JSON schema: {reason}")]
    Invalid { reason: String },
}

/// A compiled JSON schema.
///
/// Compiled once, then shared by every request. See [`Schema::validate`].
pub struct Schema {
    pub(crate) document: Value,
    pub(crate) validator: Validator,
}

impl Schema {
    /// The built-in book schema.
    pub fn book() -> Result<Self, SchemaError> {
        Self::from_json_str(BOOK_SCHEMA)
    }

    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, SchemaError> {
        let contents = std::fs::read_to_string(path)?;

        Self::from_json_str(&contents)
    }

    pub fn from_json_str(json: &str) -> Result<Self, SchemaError> {
        let document: Value = serde_json::from_str(json)?;

        Self::from_value(document)
    }

    pub fn from_value(document: Value) -> Result<Self, SchemaError> {
        let validator = jsonschema::validator_for(&document).map_err(|err| SchemaError::Invalid {
            reason: err.to_string(),
        })?;

        Ok(Schema {
            document,
            validator,
        })
    }

    /// The schema as it was loaded.
    pub fn document(&self) -> &Value {
        &self.document
    }
}

impl fmt::Debug for Schema {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Schema")
            .field("document", &self.document)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use schemars::schema_for;
    use serde_json::json;

    use super::*;
    use crate::book::Book;

    #[test]
    fn book_schema_is_parsable() {
        let schema = Schema::book().expect("Book schema is not parsable");
        let document = schema.document();

        assert_eq!(document["type"], "object");
        assert_eq!(
            document["properties"]
                .as_object()
                .unwrap()
                .keys()
                .collect::<Vec<_>>(),
            [
                "isbn",
                "amazon_url",
                "author",
                "language",
                "pages",
                "publisher",
                "title",
                "year"
            ]
        );
        assert_eq!(document["required"].as_array().unwrap().len(), 8);
    }

    #[test]
    fn book_schema_agrees_with_book_type() {
        let schema = Schema::book().unwrap();
        let declared = schema.document();

        let derived = serde_json::to_value(schema_for!(Book)).unwrap();

        let sorted = |required: &Value| {
            let mut names = required
                .as_array()
                .unwrap()
                .iter()
                .filter_map(Value::as_str)
                .map(str::to_string)
                .collect::<Vec<_>>();
            names.sort();
            names
        };
        assert_eq!(sorted(&declared["required"]), sorted(&derived["required"]));

        for (name, property) in derived["properties"].as_object().unwrap() {
            let declared = declared["properties"]
                .get(name)
                .unwrap_or_else(|| panic!("`{name}` is missing from the book schema"));

            assert_eq!(declared["type"], property["type"], "type of `{name}`");
        }
    }

    #[test]
    fn schema_file_is_loaded() {
        let schema = Schema::from_file("schemas/book.json").expect("Schema file is not loadable");

        assert_eq!(schema.document(), Schema::book().unwrap().document());
    }

    #[test]
    fn missing_schema_file_is_an_io_error() {
        let err = Schema::from_file("schemas/does-not-exist.json").unwrap_err();

        assert!(matches!(err, SchemaError::Io(_)));
    }

    #[test]
    fn malformed_json_is_rejected() {
        let err = Schema::from_json_str(r#"{ "type": "#).unwrap_err();

        assert!(matches!(err, SchemaError::Json(_)));
    }

    #[test]
    fn invalid_schemas_are_rejected() {
        let err = Schema::from_value(json!({ "type": "text" })).unwrap_err();
        assert!(matches!(err, SchemaError::Invalid { .. }));

        let err = Schema::from_value(json!({ "required": "isbn" })).unwrap_err();
        assert!(matches!(err, SchemaError::Invalid { .. }));
    }
}
