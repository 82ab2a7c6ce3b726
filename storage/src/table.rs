//! Tables: ordered chunk sequences, a schema, and the chunk-compression
//! driver.

use std::sync::Arc;
use std::time::Instant;

use crossbeam::thread;
use data_types::{ChunkId, ChunkOffset, ColumnId, ElementType, Value};
use hashbrown::HashMap;
use observability_deps::tracing::{debug, info};
use parking_lot::RwLock;
use snafu::{ensure, OptionExt, ResultExt};

use crate::chunk::Chunk;
use crate::error::{
    ColumnNotFound, DuplicateColumnName, InvalidColumnType, OutOfBounds, Result, TableNotEmpty,
    WrongColumnCount,
};
use crate::segment::{DictionaryData, Segment, ValueData};

#[derive(Debug, Default)]
struct Schema {
    column_names: Vec<String>,
    column_types: Vec<ElementType>,
    ids_by_name: HashMap<String, ColumnId>,
}

/// A table is partitioned horizontally into a number of chunks; the last
/// chunk is the active one and receives appends.
///
/// Chunks are handed out as shared handles: a reader that resolved a chunk
/// before [`Table::compress_chunk`] swapped it keeps a consistent view of
/// the old data.
#[derive(Debug)]
pub struct Table {
    target_chunk_size: ChunkOffset,
    chunks: RwLock<Vec<Arc<Chunk>>>,
    schema: RwLock<Schema>,
}

impl Table {
    /// Creates an empty table holding one empty chunk. `target_chunk_size`
    /// is the maximum number of rows per chunk.
    pub fn new(target_chunk_size: ChunkOffset) -> Self {
        Self {
            target_chunk_size,
            chunks: RwLock::new(vec![Arc::new(Chunk::new())]),
            schema: RwLock::new(Schema::default()),
        }
    }

    /// Adds a column to the right of the table; legal only while the table
    /// has no rows. The active chunk gains a fresh empty value segment of
    /// the matching type.
    pub fn add_column(&self, name: impl Into<String>, type_name: &str) -> Result<()> {
        let name = name.into();
        let element_type: ElementType = type_name
            .parse()
            .context(InvalidColumnType { name: name.clone() })?;
        ensure!(self.row_count() == 0, TableNotEmpty);

        {
            let mut schema = self.schema.write();
            ensure!(
                !schema.ids_by_name.contains_key(&name),
                DuplicateColumnName { name: name.clone() }
            );
            let column_id = schema.column_names.len() as ColumnId;
            schema.ids_by_name.insert(name.clone(), column_id);
            schema.column_names.push(name);
            schema.column_types.push(element_type);
        }

        let active = {
            let chunks = self.chunks.read();
            Arc::clone(chunks.last().expect("table holds at least one chunk"))
        };
        active.add_segment(Segment::Value(ValueData::new(element_type)));
        Ok(())
    }

    /// Inserts one row at the end of the table, sealing the active chunk
    /// and starting a new one once it has reached the target chunk size.
    pub fn append(&self, values: &[Value]) -> Result<()> {
        let column_count = self.column_count() as usize;
        ensure!(
            values.len() == column_count,
            WrongColumnCount {
                expected: column_count,
                actual: values.len(),
            }
        );
        self.active_chunk().append(values)
    }

    /// The chunk that should receive the next row, sealing the current
    /// active chunk when full.
    fn active_chunk(&self) -> Arc<Chunk> {
        let mut chunks = self.chunks.write();
        let active = chunks.last().expect("table holds at least one chunk");
        if active.size() < self.target_chunk_size {
            return Arc::clone(active);
        }

        let schema = self.schema.read();
        let fresh = Chunk::new();
        for element_type in &schema.column_types {
            fresh.add_segment(Segment::Value(ValueData::new(*element_type)));
        }
        debug!(chunks = chunks.len() + 1, "active chunk sealed");
        let fresh = Arc::new(fresh);
        chunks.push(Arc::clone(&fresh));
        fresh
    }

    /// Total number of rows across all chunks.
    pub fn row_count(&self) -> u64 {
        self.chunks
            .read()
            .iter()
            .map(|chunk| chunk.size() as u64)
            .sum()
    }

    pub fn chunk_count(&self) -> ChunkId {
        self.chunks.read().len() as ChunkId
    }

    pub fn column_count(&self) -> ColumnId {
        self.schema.read().column_names.len() as ColumnId
    }

    pub fn column_names(&self) -> Vec<String> {
        self.schema.read().column_names.clone()
    }

    pub fn column_name(&self, column_id: ColumnId) -> Result<String> {
        let schema = self.schema.read();
        schema
            .column_names
            .get(column_id as usize)
            .cloned()
            .context(OutOfBounds {
                offset: column_id as usize,
                size: schema.column_names.len(),
            })
    }

    pub fn column_type(&self, column_id: ColumnId) -> Result<ElementType> {
        let schema = self.schema.read();
        schema
            .column_types
            .get(column_id as usize)
            .copied()
            .context(OutOfBounds {
                offset: column_id as usize,
                size: schema.column_types.len(),
            })
    }

    pub fn column_id_by_name(&self, name: &str) -> Result<ColumnId> {
        self.schema
            .read()
            .ids_by_name
            .get(name)
            .copied()
            .context(ColumnNotFound { name })
    }

    pub fn target_chunk_size(&self) -> ChunkOffset {
        self.target_chunk_size
    }

    /// The chunk with the given id.
    pub fn chunk(&self, chunk_id: ChunkId) -> Result<Arc<Chunk>> {
        let chunks = self.chunks.read();
        chunks
            .get(chunk_id as usize)
            .map(Arc::clone)
            .context(OutOfBounds {
                offset: chunk_id as usize,
                size: chunks.len(),
            })
    }

    /// Adds `chunk` to the table; a lone empty chunk is replaced instead.
    ///
    /// Operators seed their result table with schema only and emplace their
    /// per-chunk results through this.
    pub fn emplace_chunk(&self, chunk: Chunk) {
        let mut chunks = self.chunks.write();
        if chunks.len() == 1 && chunks[0].size() == 0 {
            chunks[0] = Arc::new(chunk);
        } else {
            chunks.push(Arc::new(chunk));
        }
    }

    /// Replaces every segment of the chunk at `chunk_id` with its
    /// dictionary-encoded form, encoding the columns in parallel.
    ///
    /// Appends to the chunk are blocked for the duration of the hold; a
    /// worker failure is propagated before anything is swapped. Readers
    /// that resolved the chunk handle earlier keep the uncompressed data;
    /// readers arriving after the swap see the dictionary-encoded chunk.
    pub fn compress_chunk(&self, chunk_id: ChunkId) -> Result<()> {
        let chunk = self.chunk(chunk_id)?;
        let column_types: Vec<ElementType> = self.schema.read().column_types.clone();

        let start = Instant::now();
        let hold = chunk.exclusive_hold();
        let encoded = thread::scope(|scope| {
            let workers: Vec<_> = hold
                .iter()
                .zip(&column_types)
                .map(|(segment, element_type)| {
                    let segment = Arc::clone(segment);
                    let element_type = *element_type;
                    scope.spawn(move |_| {
                        DictionaryData::from_segment(element_type, &segment)
                            .map(|data| Arc::new(Segment::Dictionary(data)))
                    })
                })
                .collect();
            workers
                .into_iter()
                .map(|worker| worker.join().expect("column encoding worker panicked"))
                .collect::<Result<Vec<_>>>()
        })
        .expect("column encoding scope panicked")?;

        {
            let mut chunks = self.chunks.write();
            chunks[chunk_id as usize] = Arc::new(Chunk::from_segments(encoded));
        }
        drop(hold);

        info!(
            chunk_id,
            columns = column_types.len(),
            took = ?start.elapsed(),
            "chunk dictionary-encoded"
        );
        Ok(())
    }
}
