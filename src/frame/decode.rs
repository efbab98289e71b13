//! Positional and whole-column value access on a [`Dataframe`].
//!
//! `field_at` and `column` decode by the column's declared type. The typed accessors
//! (`int64_at`, `time_column`, ...) apply their own parse rule whatever the column declares.

use chrono::{DateTime, Utc};

use crate::Result;
use crate::frame::column::FieldType;
use crate::frame::dataframe::Dataframe;
use crate::frame::error::{Cause, ColumnMissingError, DecodeError};
use crate::frame::value::{
    ColumnValues, Value, parse_bool, parse_bytes, parse_float, parse_int, parse_string, parse_time,
};

#[expect(
    clippy::multiple_inherent_impl,
    reason = "Value access is kept apart from the row store itself"
)]
impl Dataframe {
    fn decode_with<T, F>(&self, col: usize, row: usize, parse: F) -> Result<T>
    where
        F: Fn(&str) -> std::result::Result<T, Cause>,
    {
        let raw = self.field_text(col, row)?;
        parse(raw).map_err(|cause| {
            DecodeError {
                column: self.columns().get(col).map(|c| c.code.clone()),
                row,
                cause,
            }
            .into()
        })
    }

    fn decode_column_with<T, F>(&self, col: usize, parse: F) -> Result<Vec<T>>
    where
        F: Fn(&str) -> std::result::Result<T, Cause>,
    {
        self.column_at(col)?;
        (0..self.len())
            .map(|row| self.decode_with(col, row, &parse))
            .collect()
    }

    /// Decodes one cell by its column's declared type.
    pub fn field_at(&self, col: usize, row: usize) -> Result<Value> {
        let field_type = self.column_at(col)?.field_type;
        self.decode_with(col, row, |raw| Value::parse(field_type, raw))
    }

    pub fn string_at(&self, col: usize, row: usize) -> Result<String> {
        self.decode_with(col, row, parse_string)
    }

    /// Decodes a quoted hex cell.
    pub fn bytes_at(&self, col: usize, row: usize) -> Result<Vec<u8>> {
        self.decode_with(col, row, parse_bytes)
    }

    /// Decodes an epoch millisecond cell.
    pub fn time_at(&self, col: usize, row: usize) -> Result<DateTime<Utc>> {
        self.decode_with(col, row, parse_time)
    }

    pub fn bool_at(&self, col: usize, row: usize) -> Result<bool> {
        self.decode_with(col, row, parse_bool)
    }

    pub fn int64_at(&self, col: usize, row: usize) -> Result<i64> {
        self.decode_with(col, row, parse_int::<i64>)
    }

    pub fn uint64_at(&self, col: usize, row: usize) -> Result<u64> {
        self.decode_with(col, row, parse_int::<u64>)
    }

    pub fn float64_at(&self, col: usize, row: usize) -> Result<f64> {
        self.decode_with(col, row, parse_float::<f64>)
    }

    /// Decodes every row of the column with wire code `code`.
    ///
    /// Returns the column position alongside the values. The first undecodable row
    /// aborts the scan.
    pub fn column(&self, code: &str) -> Result<(usize, ColumnValues)> {
        let col = self.column_index(code).ok_or_else(|| ColumnMissingError {
            column: code.to_owned(),
            row: None,
        })?;

        let values = match self.column_at(col)?.field_type {
            FieldType::String => ColumnValues::Strings(self.string_column(col)?),
            FieldType::Bytes => ColumnValues::Bytes(self.bytes_column(col)?),
            FieldType::Date | FieldType::Datetime => ColumnValues::Times(self.time_column(col)?),
            FieldType::Boolean => ColumnValues::Booleans(self.bool_column(col)?),
            FieldType::Int64 => ColumnValues::Int64(self.int64_column(col)?),
            FieldType::Uint64 => ColumnValues::Uint64(self.uint64_column(col)?),
            FieldType::Float64 => ColumnValues::Float64(self.float64_column(col)?),
        };

        Ok((col, values))
    }

    pub fn string_column(&self, col: usize) -> Result<Vec<String>> {
        self.decode_column_with(col, parse_string)
    }

    pub fn bytes_column(&self, col: usize) -> Result<Vec<Vec<u8>>> {
        self.decode_column_with(col, parse_bytes)
    }

    pub fn time_column(&self, col: usize) -> Result<Vec<DateTime<Utc>>> {
        self.decode_column_with(col, parse_time)
    }

    pub fn bool_column(&self, col: usize) -> Result<Vec<bool>> {
        self.decode_column_with(col, parse_bool)
    }

    pub fn int64_column(&self, col: usize) -> Result<Vec<i64>> {
        self.decode_column_with(col, parse_int::<i64>)
    }

    pub fn uint64_column(&self, col: usize) -> Result<Vec<u64>> {
        self.decode_column_with(col, parse_int::<u64>)
    }

    pub fn float64_column(&self, col: usize) -> Result<Vec<f64>> {
        self.decode_column_with(col, parse_float::<f64>)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Kind;
    use crate::frame::column::Column;
    use crate::frame::dataframe::RawRow;

    fn frame() -> Dataframe {
        Dataframe::new(
            vec![
                Column::new("Height", "height", FieldType::Uint64),
                Column::new("Time", "time", FieldType::Datetime),
                Column::new("Hash", "hash", FieldType::Bytes),
                Column::new("Price", "price", FieldType::Float64),
                Column::new("Label", "label", FieldType::String),
            ],
            vec![
                RawRow::from(r#"[12345,1700000000000,"00ab",1.5,"first, row"]"#),
                RawRow::from(r#"[12346,1700000600000,"zz","abc","second"]"#),
            ],
        )
    }

    #[test]
    fn field_at_should_decode_by_declared_type() {
        let frame = frame();

        assert_eq!(frame.field_at(0, 0).unwrap(), Value::Uint64(12345));
        assert_eq!(
            frame.field_at(1, 0).unwrap(),
            Value::Time(DateTime::from_timestamp_millis(1_700_000_000_000).unwrap())
        );
        assert_eq!(frame.field_at(2, 0).unwrap(), Value::Bytes(vec![0x00, 0xab]));
        assert_eq!(frame.field_at(3, 0).unwrap(), Value::Float64(1.5));
        assert_eq!(
            frame.field_at(4, 0).unwrap(),
            Value::String("first, row".to_owned())
        );
    }

    #[test]
    fn non_numeric_float_should_name_column_and_row() {
        let err = frame().float64_at(3, 1).unwrap_err();

        assert_eq!(err.kind(), Kind::Decode);
        let decode = err.downcast_ref::<DecodeError>().unwrap();
        assert_eq!(decode.column.as_deref(), Some("price"));
        assert_eq!(decode.row, 1);
        assert!(matches!(decode.cause, Cause::Float(_)));
    }

    #[test]
    fn typed_accessor_should_ignore_declared_type() {
        assert_eq!(frame().int64_at(0, 1).unwrap(), 12346);
        assert_eq!(frame().string_at(2, 0).unwrap(), "00ab");
    }

    #[test]
    fn column_should_decode_all_rows() {
        let (col, values) = frame().column("height").unwrap();

        assert_eq!(col, 0);
        assert_eq!(values, ColumnValues::Uint64(vec![12345, 12346]));
    }

    #[test]
    fn column_should_abort_at_first_bad_row() {
        let err = frame().column("hash").unwrap_err();
        let decode = err.downcast_ref::<DecodeError>().unwrap();

        assert_eq!(decode.row, 1);
        assert!(matches!(decode.cause, Cause::Hex(_)));
    }

    #[test]
    fn unknown_column_should_be_missing() {
        let err = frame().column("volume").unwrap_err();
        let missing = err.downcast_ref::<ColumnMissingError>().unwrap();

        assert_eq!(missing.column, "volume");
        assert_eq!(missing.row, None);
    }
}
