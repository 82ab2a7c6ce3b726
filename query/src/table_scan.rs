//! Single-column predicate scans over all three segment forms.

use std::cmp::Ordering;
use std::sync::Arc;

use data_types::{
    resolve_element_type, ChunkId, ChunkOffset, ColumnId, NativeType, PosList, RowId, Value,
    INVALID_VALUE_ID,
};
use snafu::{OptionExt, ResultExt};
use storage::{Chunk, DictionarySegment, ReferenceSegment, Segment, Table, ValueSegment};

use crate::operator::{ExecutionState, Operator};
use crate::{InvalidSearchValue, Result, Storage, UnsupportedSegment};

/// Comparison operator of a scan predicate.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScanType {
    Equals,
    NotEquals,
    LessThan,
    LessThanEquals,
    GreaterThan,
    GreaterThanEquals,
}

impl ScanType {
    /// Whether an element that compares `ordering` against the search value
    /// satisfies the predicate.
    fn matches(self, ordering: Ordering) -> bool {
        match self {
            Self::Equals => ordering == Ordering::Equal,
            Self::NotEquals => ordering != Ordering::Equal,
            Self::LessThan => ordering == Ordering::Less,
            Self::LessThanEquals => ordering != Ordering::Greater,
            Self::GreaterThan => ordering == Ordering::Greater,
            Self::GreaterThanEquals => ordering != Ordering::Less,
        }
    }
}

/// Filters one column of its input by a single comparison.
///
/// The result table carries the input schema and consists purely of
/// reference segments; all reference segments of one output chunk share one
/// position list. Scanning a reference segment collapses the indirection,
/// so results always point at the table that physically stores the data.
#[derive(Debug)]
pub struct TableScan {
    input: Arc<dyn Operator>,
    column_id: ColumnId,
    scan_type: ScanType,
    search_value: Value,
    state: ExecutionState,
}

impl TableScan {
    pub fn new(
        input: Arc<dyn Operator>,
        column_id: ColumnId,
        scan_type: ScanType,
        search_value: Value,
    ) -> Self {
        Self {
            input,
            column_id,
            scan_type,
            search_value,
            state: ExecutionState::new(),
        }
    }

    pub fn column_id(&self) -> ColumnId {
        self.column_id
    }

    pub fn scan_type(&self) -> ScanType {
        self.scan_type
    }

    pub fn search_value(&self) -> &Value {
        &self.search_value
    }

    fn scan_input<T: NativeType>(&self, input_table: &Arc<Table>, output: &Table) -> Result<()> {
        let search_value = T::from_value(&self.search_value).context(InvalidSearchValue {
            search_value: self.search_value.clone(),
            element_type: T::ELEMENT_TYPE,
        })?;

        for chunk_id in 0..input_table.chunk_count() {
            let chunk = input_table.chunk(chunk_id).context(Storage)?;
            let segment = chunk.segment(self.column_id).context(Storage)?;

            let mut pos_list = PosList::new();
            let referenced_table = match &*segment {
                Segment::Value(data) => {
                    let typed = data.as_element::<T>().context(UnsupportedSegment)?;
                    self.scan_value_segment(typed, chunk_id, &search_value, &mut pos_list);
                    Arc::clone(input_table)
                }
                Segment::Dictionary(data) => {
                    let typed = data.as_element::<T>().context(UnsupportedSegment)?;
                    self.scan_dictionary_segment(typed, chunk_id, &search_value, &mut pos_list);
                    Arc::clone(input_table)
                }
                Segment::Reference(reference) => {
                    self.scan_reference_segment::<T>(reference, &search_value, &mut pos_list)?;
                    Arc::clone(reference.referenced_table())
                }
            };

            let pos_list = Arc::new(pos_list);
            let result_chunk = Chunk::new();
            for column_id in 0..input_table.column_count() {
                result_chunk.add_segment(Segment::Reference(ReferenceSegment::new(
                    Arc::clone(&referenced_table),
                    column_id,
                    Arc::clone(&pos_list),
                )));
            }
            output.emplace_chunk(result_chunk);
        }
        Ok(())
    }

    fn scan_value_segment<T: NativeType>(
        &self,
        segment: &ValueSegment<T>,
        chunk_id: ChunkId,
        search_value: &T,
        pos_list: &mut PosList,
    ) {
        let values = segment.values();
        for (offset, value) in values.iter().enumerate() {
            if self.scan_type.matches(value.total_cmp(search_value)) {
                pos_list.push(RowId {
                    chunk_id,
                    chunk_offset: offset as ChunkOffset,
                });
            }
        }
    }

    /// Rewrites the typed predicate into one over value ids, then scans the
    /// attribute vector without touching the dictionary again.
    fn scan_dictionary_segment<T: NativeType>(
        &self,
        segment: &DictionarySegment<T>,
        chunk_id: ChunkId,
        search_value: &T,
        pos_list: &mut PosList,
    ) {
        let lower_bound = segment.lower_bound(search_value);
        let upper_bound = segment.upper_bound(search_value);
        let value_in_dictionary = lower_bound != upper_bound;

        let (search_value_id, id_scan_type) = match self.scan_type {
            // an absent value leaves the id invalid: `=` matches no row,
            // `!=` matches every row
            ScanType::Equals | ScanType::NotEquals => {
                let id = if value_in_dictionary {
                    lower_bound
                } else {
                    INVALID_VALUE_ID
                };
                (id, self.scan_type)
            }
            ScanType::GreaterThanEquals => (lower_bound, ScanType::GreaterThanEquals),
            // "> v" holds exactly for ids at or past the first value > v
            ScanType::GreaterThan => (upper_bound, ScanType::GreaterThanEquals),
            // with the value absent, the lower bound already points past
            // the <= set
            ScanType::LessThanEquals => {
                let id_scan_type = if value_in_dictionary {
                    ScanType::LessThanEquals
                } else {
                    ScanType::LessThan
                };
                (lower_bound, id_scan_type)
            }
            ScanType::LessThan => (lower_bound, ScanType::LessThan),
        };

        let attribute_vector = segment.attribute_vector();
        for offset in 0..attribute_vector.size() {
            let value_id = attribute_vector.get(offset);
            if id_scan_type.matches(value_id.cmp(&search_value_id)) {
                pos_list.push(RowId {
                    chunk_id,
                    chunk_offset: offset as ChunkOffset,
                });
            }
        }
    }

    /// Reads through the reference segment and, on a match, emits the
    /// referenced row id rather than the local offset, collapsing the
    /// indirection chain.
    fn scan_reference_segment<T: NativeType>(
        &self,
        segment: &ReferenceSegment,
        search_value: &T,
        pos_list: &mut PosList,
    ) -> Result<()> {
        let referenced_positions = segment.pos_list();
        for offset in 0..segment.size() {
            let value = segment.get(offset).context(Storage)?;
            let typed = T::from_value(&value).context(UnsupportedSegment)?;
            if self.scan_type.matches(typed.total_cmp(search_value)) {
                pos_list.push(referenced_positions[offset as usize]);
            }
        }
        Ok(())
    }
}

impl Operator for TableScan {
    fn execution_state(&self) -> &ExecutionState {
        &self.state
    }

    fn left_input(&self) -> Option<&Arc<dyn Operator>> {
        Some(&self.input)
    }

    fn on_execute(&self) -> Result<Arc<Table>> {
        let input_table = self.left_input_table()?;

        let output = Table::new(input_table.target_chunk_size());
        for column_id in 0..input_table.column_count() {
            let name = input_table.column_name(column_id).context(Storage)?;
            let element_type = input_table.column_type(column_id).context(Storage)?;
            output.add_column(name, element_type.name()).context(Storage)?;
        }

        if input_table.row_count() == 0 {
            return Ok(Arc::new(output));
        }

        let element_type = input_table.column_type(self.column_id).context(Storage)?;
        resolve_element_type!(element_type, |T| self
            .scan_input::<T>(&input_table, &output))?;

        Ok(Arc::new(output))
    }
}
