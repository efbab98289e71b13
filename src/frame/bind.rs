use std::any::{Any, TypeId};
use std::sync::Arc;

use crate::Result;
use crate::frame::dataframe::Dataframe;
use crate::frame::descriptor::{DescriptorCache, TypeDescriptor};
use crate::frame::error::{
    ColumnMissingError, DecodeError, FieldBindError, UnsupportedFieldError,
};
use crate::frame::record::Record;
use crate::frame::value::Value;

/// Record shape bound to a dataframe: its descriptor plus the column position of every
/// descriptor field, `None` where the schema has no such column.
#[derive(Debug, Clone)]
pub(crate) struct Binding {
    shape: TypeId,
    descriptor: Arc<dyn Any + Send + Sync>,
    columns: Arc<[Option<usize>]>,
}

type Bound<T> = (Arc<TypeDescriptor<T>>, Arc<[Option<usize>]>);

#[expect(
    clippy::multiple_inherent_impl,
    reason = "Record binding is kept apart from the row store itself"
)]
impl Dataframe {
    fn bind<T: Record>(&mut self, cache: &DescriptorCache) -> Result<Bound<T>> {
        let shape = TypeId::of::<T>();

        if let Some(binding) = self.binding.as_ref().filter(|b| b.shape == shape)
            && let Ok(descriptor) = Arc::clone(&binding.descriptor).downcast::<TypeDescriptor<T>>()
        {
            return Ok((descriptor, Arc::clone(&binding.columns)));
        }

        let descriptor = cache.resolve::<T>()?;
        let columns = descriptor
            .fields()
            .iter()
            .map(|field| self.column_index(field.wire_name()))
            .collect::<Arc<[_]>>();

        #[cfg(feature = "tracing")]
        tracing::debug!(
            shape = descriptor.name(),
            fields = descriptor.fields().len(),
            matched = columns.iter().flatten().count(),
            columns = self.column_count(),
            "bound record shape to schema"
        );

        let erased: Arc<dyn Any + Send + Sync> = Arc::<TypeDescriptor<T>>::clone(&descriptor);
        self.binding = Some(Binding {
            shape,
            descriptor: erased,
            columns: Arc::clone(&columns),
        });

        Ok((descriptor, columns))
    }

    /// Decodes row `row` into `dst`.
    ///
    /// Fields without a matching column keep their current value and columns without a
    /// matching field are ignored. The first failing field aborts the row; fields written
    /// before it stay written.
    pub fn decode_at<T: Record>(
        &mut self,
        cache: &DescriptorCache,
        row: usize,
        dst: &mut T,
    ) -> Result<()> {
        let (descriptor, columns) = self.bind::<T>(cache)?;
        let values = self
            .row_at(row)?
            .fields()
            .map_err(|cause| DecodeError {
                column: None,
                row,
                cause,
            })?
            .collect::<Vec<_>>();

        for (field, col) in descriptor.fields().iter().zip(columns.iter()) {
            let Some(col) = *col else {
                continue;
            };
            let Some(raw) = values.get(col) else {
                return Err(ColumnMissingError {
                    column: field.wire_name().to_owned(),
                    row: Some(row),
                }
                .into());
            };
            let Some(setter) = &field.setter else {
                return Err(UnsupportedFieldError {
                    field: field.wire_name().to_owned(),
                    type_name: field.type_name(),
                }
                .into());
            };

            setter(dst, raw).map_err(|cause| FieldBindError {
                field: field.wire_name().to_owned(),
                type_name: field.type_name(),
                row,
                cause,
            })?;
        }

        Ok(())
    }

    /// Decodes every row into a fresh `T::default()`.
    pub fn decode_all<T: Record + Default>(&mut self, cache: &DescriptorCache) -> Result<Vec<T>> {
        let mut records = Vec::with_capacity(self.len());
        for row in 0..self.len() {
            let mut record = T::default();
            self.decode_at(cache, row, &mut record)?;
            records.push(record);
        }
        Ok(records)
    }

    /// Calls `f` once per row, stopping at the first error.
    pub fn for_each<F>(&mut self, cache: &DescriptorCache, mut f: F) -> Result<()>
    where
        F: FnMut(Row<'_>) -> Result<()>,
    {
        for index in 0..self.len() {
            f(Row {
                frame: self,
                cache,
                index,
            })?;
        }
        Ok(())
    }
}

/// One row of a dataframe, handed out by [`Dataframe::for_each`].
#[derive(Debug)]
pub struct Row<'frame> {
    frame: &'frame mut Dataframe,
    cache: &'frame DescriptorCache,
    index: usize,
}

impl Row<'_> {
    #[must_use]
    pub fn index(&self) -> usize {
        self.index
    }

    #[must_use]
    pub fn dataframe(&self) -> &Dataframe {
        self.frame
    }

    pub fn decode<T: Record>(&mut self, dst: &mut T) -> Result<()> {
        self.frame.decode_at(self.cache, self.index, dst)
    }

    /// Decodes the cell of column `code` in this row by its declared type.
    pub fn column(&self, code: &str) -> Result<(usize, Value)> {
        let col = self
            .frame
            .column_index(code)
            .ok_or_else(|| ColumnMissingError {
                column: code.to_owned(),
                row: Some(self.index),
            })?;
        Ok((col, self.frame.field_at(col, self.index)?))
    }
}
