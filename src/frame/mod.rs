//! Dataframe decoding.
//!
//! Tables and time series are transferred as a column schema plus an array of row arrays:
//!
//! ```json
//! {
//!   "columns": [
//!     { "name": "Height", "code": "height", "type": "uint64" },
//!     { "name": "Time", "code": "time", "type": "datetime" }
//!   ],
//!   "data": [[12345, 1700000000000]]
//! }
//! ```
//!
//! Rows stay undecoded until asked for. Single cells and whole columns are decoded by
//! position ([`Dataframe::field_at`], [`Dataframe::column`]), whole rows are bound into
//! typed records ([`Dataframe::decode_at`]).
//!
//! # Binding records
//!
//! ```
//! use blockwatch_client_sdk::frame::{Dataframe, DescriptorCache};
//! use blockwatch_client_sdk::types::{DateTime, Utc};
//!
//! blockwatch_client_sdk::record! {
//!     #[derive(Debug, Default)]
//!     struct Block {
//!         height: u64 => "height",
//!         time: DateTime<Utc> => "time",
//!     }
//! }
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let mut frame: Dataframe = serde_json::from_str(
//!     r#"{"columns":[{"name":"Height","code":"height","type":"uint64"},
//!                    {"name":"Time","code":"time","type":"datetime"}],
//!         "data":[[12345,1700000000000]]}"#,
//! )?;
//!
//! let cache = DescriptorCache::new();
//! let blocks: Vec<Block> = frame.decode_all(&cache)?;
//! assert_eq!(blocks[0].height, 12345);
//! assert_eq!(blocks[0].time.timestamp_millis(), 1_700_000_000_000);
//! # Ok(())
//! # }
//! ```
//!
//! Field matching is by column code. Record fields with no column are left untouched and
//! columns with no field are ignored. The destination field type decides how a value is
//! parsed, so an `int64` column binds into a `u64` field as unsigned.

mod bind;
pub mod column;
pub mod dataframe;
mod decode;
pub mod descriptor;
pub mod error;
pub mod record;
pub mod value;

pub use bind::Row;
pub use column::{Column, FieldType, UnknownFieldType};
pub use dataframe::{Dataframe, RawRow};
pub use descriptor::{DescriptorCache, FieldDescriptor, FieldKind, Strategy, TypeDescriptor};
pub use record::{BoxError, Builtin, Record, Shape, UnmarshalBinary, UnmarshalText};
pub use value::{ColumnValues, Value};
