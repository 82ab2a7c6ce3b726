//! Logical segments that name rows of another table.

use std::mem;
use std::sync::Arc;

use data_types::{ChunkOffset, ColumnId, PosList, RowId, Value};
use snafu::OptionExt;

use crate::error::{OutOfBounds, Result};
use crate::table::Table;

/// A segment that stores no values of its own, only a position list into a
/// column of another table.
///
/// Holds a shared handle to the referenced table, which the engine keeps
/// alive for as long as any result referencing it is alive. The position
/// list is shared with the sibling reference segments of the same chunk.
///
/// A reference segment never names rows of another reference segment:
/// operators collapse such chains when they build their output, so reads
/// resolve in one hop.
#[derive(Debug, Clone)]
pub struct ReferenceSegment {
    referenced_table: Arc<Table>,
    referenced_column_id: ColumnId,
    pos_list: Arc<PosList>,
}

impl ReferenceSegment {
    pub fn new(
        referenced_table: Arc<Table>,
        referenced_column_id: ColumnId,
        pos_list: Arc<PosList>,
    ) -> Self {
        Self {
            referenced_table,
            referenced_column_id,
            pos_list,
        }
    }

    /// Resolves the row id at `offset` and reads the referenced value.
    pub fn get(&self, offset: ChunkOffset) -> Result<Value> {
        let size = self.pos_list.len();
        let RowId {
            chunk_id,
            chunk_offset,
        } = *self.pos_list.get(offset as usize).context(OutOfBounds {
            offset: offset as usize,
            size,
        })?;
        let chunk = self.referenced_table.chunk(chunk_id)?;
        let segment = chunk.segment(self.referenced_column_id)?;
        segment.get(chunk_offset)
    }

    pub fn pos_list(&self) -> &Arc<PosList> {
        &self.pos_list
    }

    pub fn referenced_table(&self) -> &Arc<Table> {
        &self.referenced_table
    }

    pub fn referenced_column_id(&self) -> ColumnId {
        self.referenced_column_id
    }

    pub fn size(&self) -> ChunkOffset {
        self.pos_list.len() as ChunkOffset
    }

    pub fn estimate_memory_usage(&self) -> usize {
        self.pos_list.len() * mem::size_of::<RowId>()
    }
}
