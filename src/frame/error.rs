//! Errors raised while resolving record shapes and decoding dataframe rows.
//!
//! Every type here converts into the crate [`Error`](crate::error::Error); callers recover the
//! specific payload with [`Error::downcast_ref`](crate::error::Error::downcast_ref).

use std::error::Error as StdError;
use std::fmt;
use std::num::{ParseFloatError, ParseIntError};

use crate::error::{Error, Kind};

/// Underlying reason a single raw field could not be converted.
#[non_exhaustive]
#[derive(Debug)]
pub enum Cause {
    /// The row is not a bracketed, comma separated array
    MalformedRow,
    /// A string field is not a valid quoted string literal
    Quoting(serde_json::Error),
    /// A bytes field unquoted fine but is not valid hex
    Hex(hex::FromHexError),
    Integer(ParseIntError),
    Float(ParseFloatError),
    /// A well-formed numeral beyond the range of the destination float type
    FloatOutOfRange(String),
    /// Text that is not one of the accepted boolean spellings
    Boolean(String),
    /// Epoch milliseconds outside the representable time range
    TimeOutOfRange(i64),
    /// Failure reported by a custom binary or text unmarshaler
    Custom(Box<dyn StdError + Send + Sync + 'static>),
}

impl fmt::Display for Cause {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::MalformedRow => write!(f, "malformed row"),
            Self::Quoting(e) => write!(f, "invalid quoting: {e}"),
            Self::Hex(e) => write!(f, "invalid hex: {e}"),
            Self::Integer(e) => write!(f, "invalid integer: {e}"),
            Self::Float(e) => write!(f, "invalid float: {e}"),
            Self::FloatOutOfRange(s) => write!(f, "float {s} out of range"),
            Self::Boolean(s) => write!(f, "invalid boolean: '{s}'"),
            Self::TimeOutOfRange(ms) => write!(f, "timestamp {ms}ms out of range"),
            Self::Custom(e) => write!(f, "custom unmarshal failed: {e}"),
        }
    }
}

impl StdError for Cause {
    fn source(&self) -> Option<&(dyn StdError + 'static)> {
        match self {
            Self::Quoting(e) => Some(e),
            Self::Hex(e) => Some(e),
            Self::Integer(e) => Some(e),
            Self::Float(e) => Some(e),
            Self::Custom(e) => Some(e.as_ref()),
            _ => None,
        }
    }
}

/// A destination shape that cannot be bound, e.g. one that registers no fields.
#[non_exhaustive]
#[derive(Debug, Clone)]
pub struct ShapeError {
    pub shape: &'static str,
    pub reason: String,
}

impl fmt::Display for ShapeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} is not a bindable record: {}", self.shape, self.reason)
    }
}

impl StdError for ShapeError {}

/// Two fields of one shape resolve to the same wire name.
#[non_exhaustive]
#[derive(Debug, Clone)]
pub struct ConflictError {
    pub shape: &'static str,
    pub wire_name: String,
    /// Name of the field registered first
    pub first_field: &'static str,
    /// Path and type of the field registered first
    pub first: (Vec<usize>, &'static str),
    /// Name of the colliding field
    pub second_field: &'static str,
    /// Path and type of the colliding field
    pub second: (Vec<usize>, &'static str),
}

impl fmt::Display for ConflictError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} field '{}' {:?} ({}) with wire name {:?} conflicts with field '{}' {:?} ({})",
            self.shape,
            self.second_field,
            self.second.0,
            self.second.1,
            self.wire_name,
            self.first_field,
            self.first.0,
            self.first.1
        )
    }
}

impl StdError for ConflictError {}

/// A column that is not part of the schema, or not present in a short row.
#[non_exhaustive]
#[derive(Debug, Clone)]
pub struct ColumnMissingError {
    pub column: String,
    /// Row in which the field was missing, `None` for a schema lookup miss
    pub row: Option<usize>,
}

impl fmt::Display for ColumnMissingError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.row {
            Some(row) => write!(f, "missing column '{}' in row {row}", self.column),
            None => write!(f, "missing column '{}'", self.column),
        }
    }
}

impl StdError for ColumnMissingError {}

/// A value present in the row that could not be decoded by its declared column type.
#[non_exhaustive]
#[derive(Debug)]
pub struct DecodeError {
    /// Column code, `None` when the row as a whole could not be split
    pub column: Option<String>,
    pub row: usize,
    pub cause: Cause,
}

impl fmt::Display for DecodeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.column {
            Some(column) => write!(
                f,
                "cannot decode column '{column}' in row {}: {}",
                self.row, self.cause
            ),
            None => write!(f, "cannot decode row {}: {}", self.row, self.cause),
        }
    }
}

impl StdError for DecodeError {
    fn source(&self) -> Option<&(dyn StdError + 'static)> {
        Some(&self.cause)
    }
}

/// A value that could not be written into a destination record field.
#[non_exhaustive]
#[derive(Debug)]
pub struct FieldBindError {
    /// Wire name of the field, equal to the column code
    pub field: String,
    pub type_name: &'static str,
    pub row: usize,
    pub cause: Cause,
}

impl fmt::Display for FieldBindError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "cannot decode column '{}' in row {} into field of type {}: {}",
            self.field, self.row, self.type_name, self.cause
        )
    }
}

impl StdError for FieldBindError {
    fn source(&self) -> Option<&(dyn StdError + 'static)> {
        Some(&self.cause)
    }
}

/// A destination field whose kind has no decoding strategy.
#[non_exhaustive]
#[derive(Debug, Clone)]
pub struct UnsupportedFieldError {
    pub field: String,
    pub type_name: &'static str,
}

impl fmt::Display for UnsupportedFieldError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "no method for decoding column '{}' into nested record {}",
            self.field, self.type_name
        )
    }
}

impl StdError for UnsupportedFieldError {}

/// A row or column position past the end of the dataframe.
#[non_exhaustive]
#[derive(Debug, Clone, Copy)]
pub struct OutOfRange {
    pub what: &'static str,
    pub index: usize,
    pub len: usize,
}

impl fmt::Display for OutOfRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "invalid {} {} >= len {}", self.what, self.index, self.len)
    }
}

impl StdError for OutOfRange {}

impl From<ShapeError> for Error {
    fn from(err: ShapeError) -> Self {
        Error::with_source(Kind::Schema, err)
    }
}

impl From<ConflictError> for Error {
    fn from(err: ConflictError) -> Self {
        Error::with_source(Kind::Schema, err)
    }
}

impl From<ColumnMissingError> for Error {
    fn from(err: ColumnMissingError) -> Self {
        Error::with_source(Kind::Decode, err)
    }
}

impl From<DecodeError> for Error {
    fn from(err: DecodeError) -> Self {
        Error::with_source(Kind::Decode, err)
    }
}

impl From<FieldBindError> for Error {
    fn from(err: FieldBindError) -> Self {
        Error::with_source(Kind::Decode, err)
    }
}

impl From<UnsupportedFieldError> for Error {
    fn from(err: UnsupportedFieldError) -> Self {
        Error::with_source(Kind::Decode, err)
    }
}

impl From<OutOfRange> for Error {
    fn from(err: OutOfRange) -> Self {
        Error::with_source(Kind::Decode, err)
    }
}
