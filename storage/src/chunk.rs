//! Horizontal partitions: fixed-arity groups of equal-length segments.

use std::sync::Arc;

use data_types::{ChunkOffset, ColumnId, Value};
use parking_lot::{RwLock, RwLockWriteGuard};
use snafu::{ensure, OptionExt};

use crate::error::{OutOfBounds, Result, WrongColumnCount};
use crate::segment::Segment;

/// An ordered collection of segments of equal length.
///
/// The segment list is guarded by a reader/writer lock: appends take the
/// shared hold and mutate each value segment through its own buffer lock,
/// while chunk compression takes the exclusive hold for the whole
/// build-and-swap. Segment reads clone a stable `Arc` slot under the shared
/// hold and never block each other.
#[derive(Debug, Default)]
pub struct Chunk {
    segments: RwLock<Vec<Arc<Segment>>>,
}

impl Chunk {
    pub fn new() -> Self {
        Self::default()
    }

    pub(crate) fn from_segments(segments: Vec<Arc<Segment>>) -> Self {
        Self {
            segments: RwLock::new(segments),
        }
    }

    /// Adds one segment to the right of the chunk.
    pub fn add_segment(&self, segment: Segment) {
        self.segments.write().push(Arc::new(segment));
    }

    /// Swaps the segment at `column_id` for `segment`.
    pub fn replace_segment(&self, column_id: ColumnId, segment: Segment) -> Result<()> {
        let mut segments = self.segments.write();
        let size = segments.len();
        let slot = segments
            .get_mut(column_id as usize)
            .context(OutOfBounds {
                offset: column_id as usize,
                size,
            })?;
        *slot = Arc::new(segment);
        Ok(())
    }

    /// Appends one element to each of the underlying segments.
    ///
    /// Requires one value per segment, and meaningful only while every
    /// segment is a value segment of the matching element type. Takes the
    /// shared hold: concurrent appenders are a caller error, a concurrent
    /// compressor is blocked until the row is complete.
    pub fn append(&self, values: &[Value]) -> Result<()> {
        let segments = self.segments.read();
        ensure!(
            values.len() == segments.len(),
            WrongColumnCount {
                expected: segments.len(),
                actual: values.len(),
            }
        );
        for (segment, value) in segments.iter().zip(values) {
            segment.append(value)?;
        }
        Ok(())
    }

    /// The segment at `column_id`.
    pub fn segment(&self, column_id: ColumnId) -> Result<Arc<Segment>> {
        let segments = self.segments.read();
        segments
            .get(column_id as usize)
            .map(Arc::clone)
            .context(OutOfBounds {
                offset: column_id as usize,
                size: segments.len(),
            })
    }

    pub fn column_count(&self) -> ColumnId {
        self.segments.read().len() as ColumnId
    }

    /// Number of rows: the size of segment 0, or 0 for a chunk without
    /// segments.
    pub fn size(&self) -> ChunkOffset {
        self.segments
            .read()
            .first()
            .map_or(0, |segment| segment.size())
    }

    /// Exclusive hold over the segment list for the compression
    /// build-and-swap; blocks appends until released.
    pub(crate) fn exclusive_hold(&self) -> RwLockWriteGuard<'_, Vec<Arc<Segment>>> {
        self.segments.write()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;
    use crate::segment::ValueData;
    use data_types::ElementType;

    fn int_string_chunk() -> Chunk {
        let chunk = Chunk::new();
        chunk.add_segment(Segment::Value(ValueData::new(ElementType::Int)));
        chunk.add_segment(Segment::Value(ValueData::new(ElementType::String)));
        chunk
    }

    #[test]
    fn appends_one_row_across_all_segments() {
        let chunk = int_string_chunk();
        chunk.append(&[Value::Int(4), Value::from("four")]).unwrap();
        chunk.append(&[Value::Int(5), Value::from("five")]).unwrap();

        assert_eq!(chunk.column_count(), 2);
        assert_eq!(chunk.size(), 2);
        assert_eq!(chunk.segment(0).unwrap().get(1).unwrap(), Value::Int(5));
        assert_eq!(
            chunk.segment(1).unwrap().get(0).unwrap(),
            Value::from("four")
        );
    }

    #[test]
    fn rejects_rows_of_the_wrong_arity() {
        let chunk = int_string_chunk();
        let err = chunk.append(&[Value::Int(4)]).unwrap_err();
        assert!(matches!(
            err,
            Error::WrongColumnCount {
                expected: 2,
                actual: 1,
            }
        ));
    }

    #[test]
    fn replaces_a_segment_in_place() {
        let chunk = int_string_chunk();
        chunk.append(&[Value::Int(4), Value::from("four")]).unwrap();

        let replacement = ValueData::new(ElementType::Int);
        replacement.append(&Value::Int(44)).unwrap();
        chunk.replace_segment(0, Segment::Value(replacement)).unwrap();

        assert_eq!(chunk.segment(0).unwrap().get(0).unwrap(), Value::Int(44));
        assert!(matches!(
            chunk
                .replace_segment(7, Segment::Value(ValueData::new(ElementType::Int)))
                .unwrap_err(),
            Error::OutOfBounds { offset: 7, size: 2 }
        ));
    }

    #[test]
    fn empty_chunk_has_size_zero() {
        let chunk = Chunk::new();
        assert_eq!(chunk.size(), 0);
        assert_eq!(chunk.column_count(), 0);
    }
}
