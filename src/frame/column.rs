use std::error::Error as StdError;
use std::fmt;
use std::str::FromStr;

use phf::phf_map;
use serde::{Deserialize, Serialize};
use serde_with::{DeserializeFromStr, SerializeDisplay};

/// Declared wire type of a [`Column`].
///
/// Parsing is case-insensitive and accepts the aliases the service uses in dataset
/// metadata (`bool`, `int`, `integer`, `uint`, `unsigned`, `float`). Unknown names
/// fail when the schema is deserialized, not when a column is first decoded.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    SerializeDisplay,
    DeserializeFromStr,
    strum_macros::Display,
)]
#[strum(serialize_all = "lowercase")]
#[non_exhaustive]
pub enum FieldType {
    /// Quoted JSON string literal.
    String,
    /// Quoted, hex-encoded binary blob.
    Bytes,
    /// Calendar date as integer epoch milliseconds.
    Date,
    /// Instant as integer epoch milliseconds.
    Datetime,
    Boolean,
    Int64,
    Uint64,
    Float64,
}

static FIELD_TYPES: phf::Map<&'static str, FieldType> = phf_map! {
    "string" => FieldType::String,
    "bytes" => FieldType::Bytes,
    "date" => FieldType::Date,
    "datetime" => FieldType::Datetime,
    "bool" => FieldType::Boolean,
    "boolean" => FieldType::Boolean,
    "integer" => FieldType::Int64,
    "int" => FieldType::Int64,
    "int64" => FieldType::Int64,
    "unsigned" => FieldType::Uint64,
    "uint" => FieldType::Uint64,
    "uint64" => FieldType::Uint64,
    "float" => FieldType::Float64,
    "float64" => FieldType::Float64,
};

impl FromStr for FieldType {
    type Err = UnknownFieldType;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        FIELD_TYPES
            .get(s.to_ascii_lowercase().as_str())
            .copied()
            .ok_or_else(|| UnknownFieldType(s.to_owned()))
    }
}

/// Error returned when a column type name is not part of the wire vocabulary.
#[non_exhaustive]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownFieldType(pub String);

impl fmt::Display for UnknownFieldType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unknown column type '{}'", self.0)
    }
}

impl StdError for UnknownFieldType {}

/// One named, typed slot of a dataset schema.
///
/// `code` is the join key against which record fields are matched, `name` is for display.
#[non_exhaustive]
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Column {
    pub name: String,
    pub code: String,
    #[serde(rename = "type")]
    pub field_type: FieldType,
}

impl Column {
    #[must_use]
    pub fn new<N: Into<String>, C: Into<String>>(name: N, code: C, field_type: FieldType) -> Self {
        Self {
            name: name.into(),
            code: code.into(),
            field_type,
        }
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn field_type_aliases_should_parse() {
        assert_eq!("int".parse::<FieldType>().unwrap(), FieldType::Int64);
        assert_eq!("UNSIGNED".parse::<FieldType>().unwrap(), FieldType::Uint64);
        assert_eq!("Bool".parse::<FieldType>().unwrap(), FieldType::Boolean);
        assert_eq!("float".parse::<FieldType>().unwrap(), FieldType::Float64);
        assert_eq!("datetime".parse::<FieldType>().unwrap(), FieldType::Datetime);
    }

    #[test]
    fn field_type_should_display_canonical_name() {
        assert_eq!(FieldType::Uint64.to_string(), "uint64");
        assert_eq!(FieldType::Datetime.to_string(), "datetime");
        assert_eq!(FieldType::Boolean.to_string(), "boolean");
    }

    #[test]
    fn column_should_deserialize() {
        let column: Column = serde_json::from_value(json!({
            "name": "Block Height",
            "code": "height",
            "type": "uint64"
        }))
        .unwrap();

        assert_eq!(column, Column::new("Block Height", "height", FieldType::Uint64));
    }

    #[test]
    fn unknown_column_type_should_fail_at_parse_time() {
        let err = serde_json::from_value::<Vec<Column>>(json!([
            { "name": "a", "code": "a", "type": "int64" },
            { "name": "b", "code": "b", "type": "decimal128" }
        ]))
        .unwrap_err();

        assert!(err.to_string().contains("unknown column type 'decimal128'"));
    }
}
