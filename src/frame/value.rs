//! Scalar values decoded from raw row fields, and the parse rules shared by the
//! column decoder and the record binder.

use chrono::{DateTime, Utc};

use crate::frame::column::FieldType;
use crate::frame::error::Cause;

/// A single decoded cell, tagged by the column type it was decoded as.
#[non_exhaustive]
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    String(String),
    Bytes(Vec<u8>),
    /// Decoded from `date` and `datetime` columns
    Time(DateTime<Utc>),
    Boolean(bool),
    Int64(i64),
    Uint64(u64),
    Float64(f64),
}

impl Value {
    /// Decodes `raw` according to the declared column type.
    pub fn parse(field_type: FieldType, raw: &str) -> Result<Self, Cause> {
        Ok(match field_type {
            FieldType::String => Self::String(parse_string(raw)?),
            FieldType::Bytes => Self::Bytes(parse_bytes(raw)?),
            FieldType::Date | FieldType::Datetime => Self::Time(parse_time(raw)?),
            FieldType::Boolean => Self::Boolean(parse_bool(raw)?),
            FieldType::Int64 => Self::Int64(parse_int(raw)?),
            FieldType::Uint64 => Self::Uint64(parse_int(raw)?),
            FieldType::Float64 => Self::Float64(parse_float(raw)?),
        })
    }

    /// Encodes the value back into the text form used inside a row.
    #[must_use]
    pub fn to_wire(&self) -> String {
        match self {
            Self::String(s) => serde_json::Value::from(s.as_str()).to_string(),
            Self::Bytes(b) => format!("\"{}\"", hex::encode(b)),
            Self::Time(t) => t.timestamp_millis().to_string(),
            Self::Boolean(b) => b.to_string(),
            Self::Int64(n) => n.to_string(),
            Self::Uint64(n) => n.to_string(),
            Self::Float64(f) => serde_json::Value::from(*f).to_string(),
        }
    }
}

/// All values of one column, decoded with a single column type.
#[non_exhaustive]
#[derive(Debug, Clone, PartialEq)]
pub enum ColumnValues {
    Strings(Vec<String>),
    Bytes(Vec<Vec<u8>>),
    Times(Vec<DateTime<Utc>>),
    Booleans(Vec<bool>),
    Int64(Vec<i64>),
    Uint64(Vec<u64>),
    Float64(Vec<f64>),
}

impl ColumnValues {
    #[must_use]
    pub fn len(&self) -> usize {
        match self {
            Self::Strings(v) => v.len(),
            Self::Bytes(v) => v.len(),
            Self::Times(v) => v.len(),
            Self::Booleans(v) => v.len(),
            Self::Int64(v) => v.len(),
            Self::Uint64(v) => v.len(),
            Self::Float64(v) => v.len(),
        }
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

pub(crate) fn parse_string(raw: &str) -> Result<String, Cause> {
    serde_json::from_str::<String>(raw.trim()).map_err(Cause::Quoting)
}

pub(crate) fn parse_bytes(raw: &str) -> Result<Vec<u8>, Cause> {
    let unquoted = parse_string(raw)?;
    hex::decode(unquoted).map_err(Cause::Hex)
}

pub(crate) fn parse_time(raw: &str) -> Result<DateTime<Utc>, Cause> {
    let millis = parse_int(raw)?;
    DateTime::from_timestamp_millis(millis).ok_or(Cause::TimeOutOfRange(millis))
}

pub(crate) fn parse_bool(raw: &str) -> Result<bool, Cause> {
    match raw.trim() {
        "1" | "t" | "T" | "TRUE" | "true" | "True" => Ok(true),
        "0" | "f" | "F" | "FALSE" | "false" | "False" => Ok(false),
        other => Err(Cause::Boolean(other.to_owned())),
    }
}

pub(crate) fn parse_int<I: std::str::FromStr<Err = std::num::ParseIntError>>(
    raw: &str,
) -> Result<I, Cause> {
    raw.trim().parse().map_err(Cause::Integer)
}

/// Overflowing numerals parse to infinity, which JSON cannot carry, so they are rejected.
pub(crate) fn parse_float<F>(raw: &str) -> Result<F, Cause>
where
    F: std::str::FromStr<Err = std::num::ParseFloatError> + Into<f64> + Copy,
{
    let text = raw.trim();
    let value: F = text.parse().map_err(Cause::Float)?;
    if value.into().is_finite() {
        Ok(value)
    } else {
        Err(Cause::FloatOutOfRange(text.to_owned()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn string_should_unescape() {
        assert_eq!(parse_string(r#" "a\"bé" "#).unwrap(), "a\"bé");
        assert!(matches!(parse_string("abc"), Err(Cause::Quoting(_))));
    }

    #[test]
    fn bytes_should_distinguish_hex_from_quoting() {
        assert_eq!(parse_bytes(r#""00ff""#).unwrap(), vec![0x00, 0xff]);
        assert!(matches!(parse_bytes(r#""zz""#), Err(Cause::Hex(_))));
        assert!(matches!(parse_bytes("00ff"), Err(Cause::Quoting(_))));
    }

    #[test]
    fn bool_should_accept_every_spelling() {
        for raw in ["1", "t", "T", "TRUE", "true", "True"] {
            assert!(parse_bool(raw).unwrap(), "{raw}");
        }
        for raw in ["0", "f", "F", "FALSE", "false", "False"] {
            assert!(!parse_bool(raw).unwrap(), "{raw}");
        }
        assert!(matches!(parse_bool("yes"), Err(Cause::Boolean(s)) if s == "yes"));
    }

    #[test]
    fn numbers_should_parse_at_full_width() {
        assert_eq!(parse_int::<u64>("18446744073709551615").unwrap(), u64::MAX);
        assert_eq!(parse_int::<i64>(" -42 ").unwrap(), -42);
        assert!(matches!(parse_int::<i8>("300"), Err(Cause::Integer(_))));
        assert!(matches!(parse_int::<u64>("-1"), Err(Cause::Integer(_))));
        assert!(matches!(parse_float::<f64>("\"abc\""), Err(Cause::Float(_))));
        assert!(matches!(parse_float::<f64>("1e400"), Err(Cause::FloatOutOfRange(s)) if s == "1e400"));
        assert!(matches!(parse_float::<f32>("1e39"), Err(Cause::FloatOutOfRange(_))));
        assert_eq!(parse_float::<f64>("-0").unwrap().to_string(), "-0");
    }

    #[test]
    fn time_should_decode_epoch_millis() {
        let time = parse_time("1700000000000").unwrap();
        assert_eq!(time.to_rfc3339(), "2023-11-14T22:13:20+00:00");
        assert!(matches!(
            parse_time(&i64::MAX.to_string()),
            Err(Cause::TimeOutOfRange(_))
        ));
    }

    #[test]
    fn wire_text_should_round_trip() {
        let cases = [
            (FieldType::String, r#""hello, \"world\"""#),
            (FieldType::Bytes, r#""deadbeef""#),
            (FieldType::Datetime, "1700000000123"),
            (FieldType::Boolean, "true"),
            (FieldType::Int64, "-9223372036854775808"),
            (FieldType::Uint64, "18446744073709551615"),
            (FieldType::Float64, "0.125"),
        ];

        for (field_type, raw) in cases {
            let value = Value::parse(field_type, raw).unwrap();
            assert_eq!(value.to_wire(), raw, "{field_type}");
        }
    }
}
