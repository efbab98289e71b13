use std::any::{Any, TypeId, type_name};
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use dashmap::DashMap;

use crate::Result;
use crate::error::Error;
use crate::frame::error::Cause;
use crate::frame::record::{Record, Shape};

pub(crate) type Setter<T> = Box<dyn Fn(&mut T, &str) -> std::result::Result<(), Cause> + Send + Sync>;

/// Static kind of a destination field with a built-in parse rule.
#[non_exhaustive]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FieldKind {
    Int,
    Uint,
    Float,
    Boolean,
    String,
    Bytes,
    Time,
    /// Nested record, has no parse rule
    Record,
}

/// How a field is decoded, fixed when the descriptor is built.
#[non_exhaustive]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Strategy {
    CustomBinary,
    CustomText,
    Builtin(FieldKind),
}

/// One bindable field of a record shape.
pub struct FieldDescriptor<T> {
    pub(crate) path: Vec<usize>,
    pub(crate) name: &'static str,
    pub(crate) wire_name: &'static str,
    pub(crate) type_name: &'static str,
    pub(crate) strategy: Strategy,
    pub(crate) setter: Option<Setter<T>>,
}

impl<T> FieldDescriptor<T> {
    /// Field positions from the outermost record down to this field.
    #[must_use]
    pub fn path(&self) -> &[usize] {
        &self.path
    }

    /// Declared field name, the wire name unless the shape named it.
    #[must_use]
    pub fn name(&self) -> &'static str {
        self.name
    }

    #[must_use]
    pub fn wire_name(&self) -> &'static str {
        self.wire_name
    }

    #[must_use]
    pub fn type_name(&self) -> &'static str {
        self.type_name
    }

    #[must_use]
    pub fn strategy(&self) -> Strategy {
        self.strategy
    }
}

impl<T> fmt::Debug for FieldDescriptor<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FieldDescriptor")
            .field("path", &self.path)
            .field("name", &self.name)
            .field("wire_name", &self.wire_name)
            .field("type_name", &self.type_name)
            .field("strategy", &self.strategy)
            .finish_non_exhaustive()
    }
}

/// Resolved field list of a record shape, keyed by wire name.
pub struct TypeDescriptor<T> {
    pub(crate) name: &'static str,
    pub(crate) fields: Vec<FieldDescriptor<T>>,
    pub(crate) by_name: HashMap<&'static str, usize>,
}

impl<T: Record> TypeDescriptor<T> {
    /// Describes `T` without caching the result.
    pub fn build() -> Result<Self> {
        let mut shape = Shape::new();
        T::describe(&mut shape);
        shape.finish()
    }
}

impl<T> TypeDescriptor<T> {
    #[must_use]
    pub fn name(&self) -> &'static str {
        self.name
    }

    #[must_use]
    pub fn fields(&self) -> &[FieldDescriptor<T>] {
        &self.fields
    }

    #[must_use]
    pub fn field(&self, wire_name: &str) -> Option<&FieldDescriptor<T>> {
        self.by_name
            .get(wire_name)
            .and_then(|&i| self.fields.get(i))
    }
}

impl<T> fmt::Debug for TypeDescriptor<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TypeDescriptor")
            .field("name", &self.name)
            .field("fields", &self.fields)
            .finish_non_exhaustive()
    }
}

/// Memoizes one [`TypeDescriptor`] per record shape.
///
/// Lookups take a shard read lock. The first resolution of a shape builds its descriptor
/// while holding the shard write lock, so concurrent callers for the same shape observe
/// exactly one build and never a partial descriptor.
#[derive(Default)]
pub struct DescriptorCache {
    shapes: DashMap<TypeId, Arc<dyn Any + Send + Sync>>,
}

impl DescriptorCache {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn resolve<T: Record>(&self) -> Result<Arc<TypeDescriptor<T>>> {
        let key = TypeId::of::<T>();

        let shared = match self.shapes.get(&key) {
            Some(entry) => Arc::clone(entry.value()),
            None => {
                let entry = self.shapes.entry(key).or_try_insert_with(|| {
                    let descriptor = TypeDescriptor::<T>::build()?;

                    #[cfg(feature = "tracing")]
                    tracing::debug!(
                        shape = descriptor.name(),
                        fields = descriptor.fields().len(),
                        "built record descriptor"
                    );

                    Ok::<_, Error>(Arc::new(descriptor) as Arc<dyn Any + Send + Sync>)
                })?;
                Arc::clone(entry.value())
            }
        };

        shared.downcast::<TypeDescriptor<T>>().map_err(|_entry| {
            Error::validation(format!(
                "descriptor cache entry for {} holds another shape",
                type_name::<T>()
            ))
        })
    }

    /// Number of cached shapes.
    #[must_use]
    pub fn len(&self) -> usize {
        self.shapes.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.shapes.is_empty()
    }

    /// Drops every cached descriptor. Dataframes keep the descriptor they already bound.
    pub fn clear(&self) {
        self.shapes.clear();
    }
}

impl fmt::Debug for DescriptorCache {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DescriptorCache")
            .field("shapes", &self.shapes.len())
            .finish()
    }
}
