//! Destination record shapes.
//!
//! A record type describes its bindable fields once through [`Shape`]. There is no runtime
//! reflection: every field is registered with its wire name and an accessor, and the
//! decoding strategy is fixed at registration time.
//!
//! ```
//! use blockwatch_client_sdk::frame::{Record, Shape};
//! use blockwatch_client_sdk::types::{DateTime, Utc};
//!
//! #[derive(Debug, Default)]
//! struct Block {
//!     height: u64,
//!     time: DateTime<Utc>,
//!     miner: Option<String>,
//! }
//!
//! impl Record for Block {
//!     fn describe(shape: &mut Shape<Self>) {
//!         shape
//!             .field("height", |b| &mut b.height)
//!             .field("time", |b| &mut b.time)
//!             .field("miner", |b| &mut b.miner);
//!     }
//! }
//! ```
//!
//! The [`record!`](crate::record) macro generates both the struct and this impl.

use std::any::type_name;
use std::collections::HashMap;
use std::error::Error as StdError;

use chrono::{DateTime, Utc};

use crate::Result;
use crate::error::Error;
use crate::frame::descriptor::{FieldDescriptor, FieldKind, Setter, Strategy, TypeDescriptor};
use crate::frame::error::{Cause, ConflictError, ShapeError};
use crate::frame::value::{parse_bool, parse_bytes, parse_float, parse_int, parse_string, parse_time};

/// Error type returned by custom unmarshalers.
pub type BoxError = Box<dyn StdError + Send + Sync + 'static>;

/// A type that can be bound from dataframe rows.
pub trait Record: Sized + 'static {
    /// Registers every bindable field of `Self`.
    fn describe(shape: &mut Shape<Self>);
}

/// Field types with a built-in parse rule, selected by the destination kind.
pub trait Builtin {
    const KIND: FieldKind;

    fn assign(&mut self, raw: &str) -> std::result::Result<(), Cause>;
}

/// Custom decoding from the raw, undecoded field text (quotes included).
pub trait UnmarshalBinary {
    fn unmarshal_binary(&mut self, data: &[u8]) -> std::result::Result<(), BoxError>;
}

/// Custom decoding from the raw field text (quotes included).
pub trait UnmarshalText {
    fn unmarshal_text(&mut self, text: &str) -> std::result::Result<(), BoxError>;
}

macro_rules! builtin_int {
    ($kind:expr => $($t:ty),+) => {
        $(
            impl Builtin for $t {
                const KIND: FieldKind = $kind;

                fn assign(&mut self, raw: &str) -> std::result::Result<(), Cause> {
                    *self = parse_int(raw)?;
                    Ok(())
                }
            }
        )+
    };
}

builtin_int!(FieldKind::Int => i8, i16, i32, i64, isize);
builtin_int!(FieldKind::Uint => u8, u16, u32, u64, usize);

impl Builtin for f32 {
    const KIND: FieldKind = FieldKind::Float;

    fn assign(&mut self, raw: &str) -> std::result::Result<(), Cause> {
        *self = parse_float(raw)?;
        Ok(())
    }
}

impl Builtin for f64 {
    const KIND: FieldKind = FieldKind::Float;

    fn assign(&mut self, raw: &str) -> std::result::Result<(), Cause> {
        *self = parse_float(raw)?;
        Ok(())
    }
}

impl Builtin for bool {
    const KIND: FieldKind = FieldKind::Boolean;

    fn assign(&mut self, raw: &str) -> std::result::Result<(), Cause> {
        *self = parse_bool(raw)?;
        Ok(())
    }
}

impl Builtin for String {
    const KIND: FieldKind = FieldKind::String;

    fn assign(&mut self, raw: &str) -> std::result::Result<(), Cause> {
        *self = parse_string(raw)?;
        Ok(())
    }
}

impl Builtin for Vec<u8> {
    const KIND: FieldKind = FieldKind::Bytes;

    fn assign(&mut self, raw: &str) -> std::result::Result<(), Cause> {
        *self = parse_bytes(raw)?;
        Ok(())
    }
}

impl Builtin for DateTime<Utc> {
    const KIND: FieldKind = FieldKind::Time;

    fn assign(&mut self, raw: &str) -> std::result::Result<(), Cause> {
        *self = parse_time(raw)?;
        Ok(())
    }
}

// Allocated before the value is parsed, so a failed parse leaves `Some(default)`.
impl<F: Builtin + Default> Builtin for Option<F> {
    const KIND: FieldKind = F::KIND;

    fn assign(&mut self, raw: &str) -> std::result::Result<(), Cause> {
        self.get_or_insert_with(F::default).assign(raw)
    }
}

impl<F: UnmarshalBinary + Default> UnmarshalBinary for Option<F> {
    fn unmarshal_binary(&mut self, data: &[u8]) -> std::result::Result<(), BoxError> {
        self.get_or_insert_with(F::default).unmarshal_binary(data)
    }
}

impl<F: UnmarshalText + Default> UnmarshalText for Option<F> {
    fn unmarshal_text(&mut self, text: &str) -> std::result::Result<(), BoxError> {
        self.get_or_insert_with(F::default).unmarshal_text(text)
    }
}

/// Field registry handed to [`Record::describe`].
///
/// Registration methods chain. Every call takes the next field position, `skip` included,
/// so paths mirror declaration order. Errors (duplicate wire names) are kept and reported
/// when the shape is resolved.
pub struct Shape<T> {
    name: &'static str,
    fields: Vec<FieldDescriptor<T>>,
    position: usize,
    /// Index of the field added by the last `field`, `binary`, `text` or `nested` call
    last: Option<usize>,
    error: Option<Error>,
}

impl<T: Record> Shape<T> {
    pub(crate) fn new() -> Self {
        Self {
            name: type_name::<T>(),
            fields: Vec::new(),
            position: 0,
            last: None,
            error: None,
        }
    }

    pub(crate) fn finish(self) -> Result<TypeDescriptor<T>> {
        if let Some(err) = self.error {
            return Err(err);
        }
        if self.fields.is_empty() {
            return Err(ShapeError {
                shape: self.name,
                reason: "no bindable fields registered".to_owned(),
            }
            .into());
        }
        if let Some(conflict) = self.conflict() {
            return Err(conflict.into());
        }

        let by_name = self
            .fields
            .iter()
            .enumerate()
            .map(|(i, field)| (field.wire_name, i))
            .collect::<HashMap<_, _>>();

        Ok(TypeDescriptor {
            name: self.name,
            fields: self.fields,
            by_name,
        })
    }

    /// Registers a field decoded with the built-in rule for its type.
    pub fn field<F: Builtin + 'static>(
        &mut self,
        wire_name: &'static str,
        access: fn(&mut T) -> &mut F,
    ) -> &mut Self {
        let setter: Setter<T> = Box::new(move |record: &mut T, raw: &str| access(record).assign(raw));
        self.register(wire_name, type_name::<F>(), Strategy::Builtin(F::KIND), Some(setter))
    }

    /// Registers a field that decodes itself from the raw field bytes.
    pub fn binary<F: UnmarshalBinary + 'static>(
        &mut self,
        wire_name: &'static str,
        access: fn(&mut T) -> &mut F,
    ) -> &mut Self {
        let setter: Setter<T> = Box::new(move |record: &mut T, raw: &str| {
            access(record)
                .unmarshal_binary(raw.trim().as_bytes())
                .map_err(Cause::Custom)
        });
        self.register(wire_name, type_name::<F>(), Strategy::CustomBinary, Some(setter))
    }

    /// Registers a field that decodes itself from the raw field text.
    pub fn text<F: UnmarshalText + 'static>(
        &mut self,
        wire_name: &'static str,
        access: fn(&mut T) -> &mut F,
    ) -> &mut Self {
        let setter: Setter<T> = Box::new(move |record: &mut T, raw: &str| {
            access(record)
                .unmarshal_text(raw.trim())
                .map_err(Cause::Custom)
        });
        self.register(wire_name, type_name::<F>(), Strategy::CustomText, Some(setter))
    }

    /// Declares a nested record field. It resolves, but binding a column into it fails.
    pub fn nested<N: 'static>(&mut self, wire_name: &'static str) -> &mut Self {
        self.register(
            wire_name,
            type_name::<N>(),
            Strategy::Builtin(FieldKind::Record),
            None,
        )
    }

    /// Flattens the fields of an embedded record into this shape.
    pub fn embed<E: Record>(&mut self, access: fn(&mut T) -> &mut E) -> &mut Self {
        self.flatten::<E, _>(move |record| access(record))
    }

    /// Like [`embed`](Self::embed), allocating the embedded record on first write.
    pub fn embed_opt<E: Record + Default>(
        &mut self,
        access: fn(&mut T) -> &mut Option<E>,
    ) -> &mut Self {
        self.flatten::<E, _>(move |record| access(record).get_or_insert_with(E::default))
    }

    /// Consumes a field position without binding anything to it.
    pub fn skip(&mut self) -> &mut Self {
        self.position += 1;
        self.last = None;
        self
    }

    /// Names the field registered by the previous call, as reported in conflict errors.
    /// Unnamed fields go by their wire name.
    pub fn named(&mut self, field_name: &'static str) -> &mut Self {
        if let Some(field) = self.last.and_then(|i| self.fields.get_mut(i)) {
            field.name = field_name;
        }
        self
    }

    fn flatten<E, A>(&mut self, access: A) -> &mut Self
    where
        E: Record,
        A: Fn(&mut T) -> &mut E + Copy + Send + Sync + 'static,
    {
        let position = self.position;
        self.position += 1;
        self.last = None;

        let mut inner = Shape::<E>::new();
        E::describe(&mut inner);
        if let Some(err) = inner.error {
            self.fail(err);
        }

        for field in inner.fields {
            let setter = field.setter.map(|set| -> Setter<T> {
                Box::new(move |record: &mut T, raw: &str| set(access(record), raw))
            });
            let mut path = Vec::with_capacity(field.path.len() + 1);
            path.push(position);
            path.extend(field.path);

            self.fields.push(FieldDescriptor {
                path,
                name: field.name,
                wire_name: field.wire_name,
                type_name: field.type_name,
                strategy: field.strategy,
                setter,
            });
        }
        self
    }

    fn register(
        &mut self,
        wire_name: &'static str,
        type_name: &'static str,
        strategy: Strategy,
        setter: Option<Setter<T>>,
    ) -> &mut Self {
        let path = vec![self.position];
        self.position += 1;
        self.last = Some(self.fields.len());
        self.fields.push(FieldDescriptor {
            path,
            name: wire_name,
            wire_name,
            type_name,
            strategy,
            setter,
        });
        self
    }

    /// First pair of fields sharing a wire name, in registration order.
    fn conflict(&self) -> Option<ConflictError> {
        self.fields.iter().enumerate().find_map(|(i, second)| {
            let first = self.fields.iter().take(i).find(|f| f.wire_name == second.wire_name)?;
            Some(ConflictError {
                shape: self.name,
                wire_name: second.wire_name.to_owned(),
                first_field: first.name,
                first: (first.path.clone(), first.type_name),
                second_field: second.name,
                second: (second.path.clone(), second.type_name),
            })
        })
    }

    fn fail(&mut self, err: Error) {
        if self.error.is_none() {
            self.error = Some(err);
        }
    }
}

/// Declares a struct together with its [`Record`](crate::frame::Record) impl.
///
/// Each field is written as `name: Type => "wire_name"`; every type must implement
/// [`Builtin`](crate::frame::Builtin).
///
/// ```
/// blockwatch_client_sdk::record! {
///     #[derive(Debug, Default)]
///     pub struct Trade {
///         pub id: u64 => "id",
///         pub price: f64 => "price",
///     }
/// }
/// ```
#[macro_export]
macro_rules! record {
    (
        $(#[$meta:meta])*
        $vis:vis struct $name:ident {
            $(
                $(#[$fmeta:meta])*
                $fvis:vis $field:ident : $ty:ty => $wire:literal
            ),* $(,)?
        }
    ) => {
        $(#[$meta])*
        $vis struct $name {
            $(
                $(#[$fmeta])*
                $fvis $field: $ty,
            )*
        }

        impl $crate::frame::Record for $name {
            fn describe(shape: &mut $crate::frame::Shape<Self>) {
                $(
                    shape
                        .field($wire, |record| &mut record.$field)
                        .named(stringify!($field));
                )*
            }
        }
    };
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Kind;

    #[derive(Debug, Default)]
    struct Inner {
        fee: u64,
    }

    impl Record for Inner {
        fn describe(shape: &mut Shape<Self>) {
            shape.field("fee", |r| &mut r.fee);
        }
    }

    #[derive(Debug, Default)]
    struct Outer {
        height: u64,
        _ignored: String,
        inner: Inner,
    }

    impl Record for Outer {
        fn describe(shape: &mut Shape<Self>) {
            shape
                .field("height", |r| &mut r.height)
                .skip()
                .embed(|r| &mut r.inner);
        }
    }

    #[test]
    fn embedded_fields_should_get_prefixed_paths() {
        let mut shape = Shape::<Outer>::new();
        Outer::describe(&mut shape);
        let descriptor = shape.finish().unwrap();

        let fee = descriptor.field("fee").unwrap();
        assert_eq!(fee.path(), &[2, 0]);
        assert_eq!(fee.strategy(), Strategy::Builtin(FieldKind::Uint));
        assert_eq!(descriptor.field("height").unwrap().path(), &[0]);
    }

    #[test]
    fn option_should_allocate_on_assign() {
        let mut value: Option<i32> = None;
        value.assign("-7").unwrap();
        assert_eq!(value, Some(-7));

        let mut value: Option<i32> = None;
        value.assign("x").unwrap_err();
        assert_eq!(value, Some(0));
    }

    #[derive(Debug, Default)]
    struct Empty;

    impl Record for Empty {
        fn describe(_shape: &mut Shape<Self>) {}
    }

    #[test]
    fn empty_shape_should_not_be_record_like() {
        let err = Shape::<Empty>::new().finish().unwrap_err();

        assert_eq!(err.kind(), Kind::Schema);
        assert!(err.downcast_ref::<ShapeError>().is_some());
    }
}
