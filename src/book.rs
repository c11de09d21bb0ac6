use schemars::JsonSchema;
use serde::{de::Error, Deserialize, Deserializer, Serialize};
use serde_json::Number;
use utoipa::ToSchema;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema, ToSchema, sqlx::FromRow)]
/// A book in the catalog, identified by its isbn.
pub struct Book {
    pub isbn: String,
    pub amazon_url: String,
    pub author: String,
    pub language: String,
    #[serde(deserialize_with = "deserialize_integer")]
    #[schemars(with = "i32")]
    pub pages: i32,
    pub publisher: String,
    pub title: String,
    #[serde(deserialize_with = "deserialize_integer")]
    #[schemars(with = "i32")]
    pub year: i32,
}

/// Accepts `264` as well as `264.0`, both of which are JSON-schema integers.
fn deserialize_integer<'de, D: Deserializer<'de>>(deserializer: D) -> Result<i32, D::Error> {
    let number = Number::deserialize(deserializer)?;

    if let Some(integer) = number.as_i64() {
        return i32::try_from(integer)
            .map_err(|_| D::Error::custom(format!("integer `{number}` is out of range")));
    }

    match number.as_f64() {
        Some(float)
            if float.fract() == 0.0 && float >= i32::MIN as f64 && float <= i32::MAX as f64 =>
        {
            Ok(float as i32)
        }
        _ => Err(D::Error::custom(format!(
            "`{number}` is not an integer in range"
        ))),
    }
}
