//! Identifiers addressing chunks, rows and dictionary entries.

/// Index of a chunk within a table.
pub type ChunkId = u32;

/// Row offset within a chunk.
pub type ChunkOffset = u32;

/// Index of a column within a table's schema.
pub type ColumnId = u16;

/// Index into a dictionary segment's sorted dictionary.
pub type ValueId = u32;

/// Sentinel id for "value not present".
///
/// The maximum of the widest attribute-vector representation. A narrowing
/// store truncates it to the maximum of the narrower representation, so the
/// sentinel stays recognisable across attribute-vector widths.
pub const INVALID_VALUE_ID: ValueId = ValueId::MAX;

/// Names one row within a specific table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct RowId {
    pub chunk_id: ChunkId,
    pub chunk_offset: ChunkOffset,
}

/// An ordered sequence of row ids.
///
/// A scan output chunk builds one of these and shares it, read-only, between
/// all of the chunk's reference segments.
pub type PosList = Vec<RowId>;
