use std::collections::HashMap;
use std::sync::OnceLock;

use serde::{Deserialize, Deserializer};
use serde_json::value::RawValue;

use crate::Result;
use crate::frame::bind::Binding;
use crate::frame::column::Column;
use crate::frame::error::{Cause, ColumnMissingError, DecodeError, OutOfRange};

/// One not yet decoded row, kept as the array text received on the wire (`[v0,v1,...]`).
///
/// Numbers and string escapes are not normalized, so every cell is decoded from exactly the
/// bytes the service sent.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct RawRow(String);

impl RawRow {
    #[must_use]
    pub fn new<S: Into<String>>(text: S) -> Self {
        Self(text.into())
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Iterates the top-level fields of the row without decoding them.
    pub(crate) fn fields(&self) -> std::result::Result<Fields<'_>, Cause> {
        let body = self
            .0
            .trim()
            .strip_prefix('[')
            .and_then(|s| s.strip_suffix(']'))
            .ok_or(Cause::MalformedRow)?;

        Ok(Fields {
            body,
            pos: 0,
            done: body.trim().is_empty(),
        })
    }
}

impl From<&str> for RawRow {
    fn from(text: &str) -> Self {
        Self::new(text)
    }
}

impl<'de> Deserialize<'de> for RawRow {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        let raw = Box::<RawValue>::deserialize(deserializer)?;
        let text = raw.get().trim();
        if !text.starts_with('[') {
            return Err(serde::de::Error::custom(format!(
                "expected row array, got {text}"
            )));
        }
        Ok(Self(text.to_owned()))
    }
}

/// Splits a row body on commas that are outside quoted strings and nested brackets.
pub(crate) struct Fields<'row> {
    body: &'row str,
    pos: usize,
    done: bool,
}

impl<'row> Iterator for Fields<'row> {
    type Item = &'row str;

    fn next(&mut self) -> Option<&'row str> {
        if self.done {
            return None;
        }

        let bytes = self.body.as_bytes();
        let start = self.pos;
        let mut depth = 0_usize;
        let mut in_string = false;
        let mut escaped = false;

        for (i, b) in bytes.iter().enumerate().skip(start) {
            if in_string {
                match b {
                    _ if escaped => escaped = false,
                    b'\\' => escaped = true,
                    b'"' => in_string = false,
                    _ => {}
                }
                continue;
            }
            match b {
                b'"' => in_string = true,
                b'[' | b'{' => depth += 1,
                b']' | b'}' => depth = depth.saturating_sub(1),
                b',' if depth == 0 => {
                    self.pos = i + 1;
                    return self.body.get(start..i);
                }
                _ => {}
            }
        }

        self.done = true;
        self.body.get(start..)
    }
}

/// Column schema paired with the rows it describes.
///
/// The code to position index and the bound record shape are cached per instance.
/// A `Dataframe` is not meant to be shared between threads while it is being decoded,
/// which is why the binding methods take `&mut self`.
#[non_exhaustive]
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Dataframe {
    #[serde(default)]
    columns: Vec<Column>,
    #[serde(rename = "data", default)]
    rows: Vec<RawRow>,
    #[serde(skip)]
    index: OnceLock<HashMap<String, usize>>,
    #[serde(skip)]
    pub(crate) binding: Option<Binding>,
}

impl Dataframe {
    #[must_use]
    pub fn new(columns: Vec<Column>, rows: Vec<RawRow>) -> Self {
        Self {
            columns,
            rows,
            index: OnceLock::new(),
            binding: None,
        }
    }

    #[must_use]
    pub fn columns(&self) -> &[Column] {
        &self.columns
    }

    #[must_use]
    pub fn rows(&self) -> &[RawRow] {
        &self.rows
    }

    /// Number of rows.
    #[must_use]
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    #[must_use]
    pub fn column_count(&self) -> usize {
        self.columns.len()
    }

    /// Position of the column with wire code `code`.
    ///
    /// The index is built on first lookup. On duplicate codes the first column wins.
    #[must_use]
    pub fn column_index(&self, code: &str) -> Option<usize> {
        self.index
            .get_or_init(|| {
                let mut index = HashMap::with_capacity(self.columns.len());
                for (pos, column) in self.columns.iter().enumerate() {
                    index.entry(column.code.clone()).or_insert(pos);
                }
                index
            })
            .get(code)
            .copied()
    }

    /// Forgets the record shape bound by the last decode call.
    pub fn reset_type(&mut self) {
        self.binding = None;
    }

    pub(crate) fn column_at(&self, col: usize) -> Result<&Column> {
        self.columns.get(col).ok_or_else(|| {
            OutOfRange {
                what: "column",
                index: col,
                len: self.columns.len(),
            }
            .into()
        })
    }

    pub(crate) fn row_at(&self, row: usize) -> Result<&RawRow> {
        self.rows.get(row).ok_or_else(|| {
            OutOfRange {
                what: "row",
                index: row,
                len: self.rows.len(),
            }
            .into()
        })
    }

    /// Raw text of one cell, located by scanning the row.
    pub(crate) fn field_text(&self, col: usize, row: usize) -> Result<&str> {
        let column = self.column_at(col)?;
        let mut fields = self.row_at(row)?.fields().map_err(|cause| DecodeError {
            column: Some(column.code.clone()),
            row,
            cause,
        })?;

        fields.nth(col).ok_or_else(|| {
            ColumnMissingError {
                column: column.code.clone(),
                row: Some(row),
            }
            .into()
        })
    }
}
