//! Scenario tests that drive the scan operators against tables in their
//! different physical encodings: plain value segments, dictionary-compressed
//! chunks, and reference-segment results of earlier scans.
//!
//! The helpers here build the shared fixtures; the scenarios live in the
//! test modules.

#![deny(rust_2018_idioms)]
#![warn(
    missing_debug_implementations,
    clippy::explicit_iter_loop,
    clippy::use_self,
    clippy::clone_on_ref_ptr
)]

use std::sync::Arc;

use data_types::{ChunkOffset, ColumnId, PosList, RowId, Value};
use query::{Operator, ScanType, TableScan, TableWrapper};
use storage::{Segment, Table};

/// A two-column table (int `a`, string `b`) with the rows
/// `(1,"x"), (2,"y"), (3,"x"), (4,"y"), (5,"x")`.
pub fn person_table(target_chunk_size: ChunkOffset) -> Arc<Table> {
    let table = Table::new(target_chunk_size);
    table.add_column("a", "int").unwrap();
    table.add_column("b", "string").unwrap();
    for (a, b) in &[(1, "x"), (2, "y"), (3, "x"), (4, "y"), (5, "x")] {
        table.append(&[Value::Int(*a), Value::from(*b)]).unwrap();
    }
    Arc::new(table)
}

/// Runs a single scan over `input` and returns its output table.
pub fn scan_table(
    input: &Arc<Table>,
    column_id: ColumnId,
    scan_type: ScanType,
    search_value: Value,
) -> Arc<Table> {
    let wrapper: Arc<dyn Operator> = Arc::new(TableWrapper::new(Arc::clone(input)));
    wrapper.execute().unwrap();
    scan_operator(wrapper, column_id, scan_type, search_value)
}

/// Runs a scan above an already-executed operator and returns its output.
pub fn scan_operator(
    input: Arc<dyn Operator>,
    column_id: ColumnId,
    scan_type: ScanType,
    search_value: Value,
) -> Arc<Table> {
    let scan = TableScan::new(input, column_id, scan_type, search_value);
    scan.execute().unwrap();
    scan.output().unwrap()
}

/// All rows of `table`, materialised in chunk order.
pub fn collect_rows(table: &Table) -> Vec<Vec<Value>> {
    let mut rows = Vec::new();
    for chunk_id in 0..table.chunk_count() {
        let chunk = table.chunk(chunk_id).unwrap();
        let segments: Vec<_> = (0..chunk.column_count())
            .map(|column_id| chunk.segment(column_id).unwrap())
            .collect();
        for offset in 0..chunk.size() {
            rows.push(
                segments
                    .iter()
                    .map(|segment| segment.get(offset).unwrap())
                    .collect(),
            );
        }
    }
    rows
}

/// The concatenated position lists of a scan result, in chunk order.
pub fn collect_positions(table: &Table) -> Vec<RowId> {
    let mut positions = PosList::new();
    for chunk_id in 0..table.chunk_count() {
        let chunk = table.chunk(chunk_id).unwrap();
        if chunk.column_count() == 0 {
            continue;
        }
        match &*chunk.segment(0).unwrap() {
            Segment::Reference(segment) => positions.extend(segment.pos_list().iter()),
            _ => panic!("scan results consist of reference segments"),
        }
    }
    positions
}

#[cfg(test)]
mod scenarios;
