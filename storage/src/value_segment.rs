//! Mutable, appendable column segments backed by a contiguous buffer.

use std::mem;

use data_types::{ChunkOffset, NativeType, Value};
use parking_lot::{RwLock, RwLockReadGuard};
use snafu::OptionExt;

use crate::error::{OutOfBounds, Result, TypeMismatch};

/// The only mutable segment variant: a growable, typed buffer.
///
/// The buffer sits behind its own lock so that rows can be appended through
/// the chunk's shared hold. Concurrent appenders are a caller error (rows
/// may interleave across columns); a concurrent compressor is safe because
/// it takes the chunk's exclusive hold.
#[derive(Debug)]
pub struct ValueSegment<T> {
    values: RwLock<Vec<T>>,
}

impl<T: NativeType> ValueSegment<T> {
    pub fn new() -> Self {
        Self {
            values: RwLock::new(Vec::new()),
        }
    }

    /// Converts `value` to `T` and pushes it.
    pub fn append(&self, value: &Value) -> Result<()> {
        let typed = T::from_value(value).context(TypeMismatch {
            expected: T::ELEMENT_TYPE,
            actual: value.element_type(),
        })?;
        self.values.write().push(typed);
        Ok(())
    }

    /// The value at `offset` as an untyped [`Value`].
    pub fn get(&self, offset: ChunkOffset) -> Result<Value> {
        let values = self.values.read();
        let value = values.get(offset as usize).context(OutOfBounds {
            offset: offset as usize,
            size: values.len(),
        })?;
        Ok(value.clone().into_value())
    }

    /// Read hold over the contiguous backing buffer, for typed fast paths.
    pub fn values(&self) -> RwLockReadGuard<'_, Vec<T>> {
        self.values.read()
    }

    pub fn size(&self) -> ChunkOffset {
        self.values.read().len() as ChunkOffset
    }

    pub fn estimate_memory_usage(&self) -> usize {
        self.values.read().len() * mem::size_of::<T>()
    }
}

impl<T: NativeType> Default for ValueSegment<T> {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;
    use data_types::ElementType;

    #[test]
    fn appends_and_reads_values() {
        let segment = ValueSegment::<i32>::new();
        segment.append(&Value::Int(3)).unwrap();
        segment.append(&Value::Int(-4)).unwrap();

        assert_eq!(segment.size(), 2);
        assert_eq!(segment.get(0).unwrap(), Value::Int(3));
        assert_eq!(segment.get(1).unwrap(), Value::Int(-4));
        assert_eq!(*segment.values(), vec![3, -4]);
    }

    #[test]
    fn rejects_mismatched_variants() {
        let segment = ValueSegment::<i32>::new();
        let err = segment.append(&Value::Long(3)).unwrap_err();
        assert!(matches!(
            err,
            Error::TypeMismatch {
                expected: ElementType::Int,
                actual: ElementType::Long,
            }
        ));
    }

    #[test]
    fn rejects_reads_past_the_end() {
        let segment = ValueSegment::<String>::new();
        segment.append(&Value::from("only")).unwrap();
        let err = segment.get(1).unwrap_err();
        assert!(matches!(err, Error::OutOfBounds { offset: 1, size: 1 }));
    }

    #[test]
    fn estimates_buffer_memory() {
        let segment = ValueSegment::<i64>::new();
        for v in 0..10_i64 {
            segment.append(&Value::Long(v)).unwrap();
        }
        assert_eq!(segment.estimate_memory_usage(), 10 * mem::size_of::<i64>());
    }
}
