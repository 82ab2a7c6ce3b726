use std::sync::Arc;

use data_types::{RowId, Value};
use query::{Operator, ScanType, TableScan, TableWrapper};
use storage::{Catalog, Segment};

use crate::{collect_positions, collect_rows, person_table, scan_operator, scan_table};

fn row_id(chunk_id: u32, chunk_offset: u32) -> RowId {
    RowId {
        chunk_id,
        chunk_offset,
    }
}

#[test]
fn table_partitions_into_chunks_of_target_size() {
    let table = person_table(2);
    assert_eq!(table.row_count(), 5);
    assert_eq!(table.chunk_count(), 3);
    let sizes: Vec<u32> = (0..table.chunk_count())
        .map(|chunk_id| table.chunk(chunk_id).unwrap().size())
        .collect();
    assert_eq!(sizes, vec![2, 2, 1]);
}

#[test]
fn equals_scan_references_the_matching_row() {
    let table = person_table(2);
    let result = scan_table(&table, 0, ScanType::Equals, Value::Int(3));

    assert_eq!(result.column_names(), vec!["a", "b"]);
    assert_eq!(result.column_type(0).unwrap(), table.column_type(0).unwrap());
    assert_eq!(collect_positions(&result), vec![row_id(1, 0)]);
    assert_eq!(
        collect_rows(&result),
        vec![vec![Value::Int(3), Value::from("x")]]
    );
}

#[test]
fn scan_output_shares_one_position_list_per_chunk() {
    let table = person_table(2);
    let result = scan_table(&table, 0, ScanType::GreaterThan, Value::Int(1));

    for chunk_id in 0..result.chunk_count() {
        let chunk = result.chunk(chunk_id).unwrap();
        assert_eq!(chunk.column_count(), 2);
        let shared = match &*chunk.segment(0).unwrap() {
            Segment::Reference(segment) => Arc::clone(segment.pos_list()),
            _ => panic!("scan results consist of reference segments"),
        };
        for column_id in 0..chunk.column_count() {
            match &*chunk.segment(column_id).unwrap() {
                Segment::Reference(segment) => {
                    assert!(Arc::ptr_eq(segment.pos_list(), &shared));
                    assert!(Arc::ptr_eq(segment.referenced_table(), &table));
                    assert_eq!(segment.referenced_column_id(), column_id);
                }
                _ => panic!("scan results consist of reference segments"),
            }
        }
    }
}

#[test]
fn scan_sees_compressed_and_uncompressed_chunks_alike() {
    let plain = person_table(2);
    let compressed = person_table(2);
    compressed.compress_chunk(0).unwrap();

    let from_plain = scan_table(&plain, 0, ScanType::GreaterThan, Value::Int(1));
    let from_compressed = scan_table(&compressed, 0, ScanType::GreaterThan, Value::Int(1));

    assert_eq!(
        collect_rows(&from_compressed),
        vec![
            vec![Value::Int(2), Value::from("y")],
            vec![Value::Int(3), Value::from("x")],
            vec![Value::Int(4), Value::from("y")],
            vec![Value::Int(5), Value::from("x")],
        ]
    );
    assert_eq!(
        collect_positions(&from_plain),
        collect_positions(&from_compressed)
    );
}

#[test]
fn chained_scans_point_back_at_the_base_table() {
    let table = person_table(2);

    let wrapper: Arc<dyn Operator> = Arc::new(TableWrapper::new(Arc::clone(&table)));
    wrapper.execute().unwrap();
    let first = TableScan::new(wrapper, 0, ScanType::GreaterThanEquals, Value::Int(2));
    first.execute().unwrap();
    let first: Arc<dyn Operator> = Arc::new(first);
    let second = scan_operator(first, 1, ScanType::Equals, Value::from("y"));

    assert_eq!(
        collect_rows(&second),
        vec![
            vec![Value::Int(2), Value::from("y")],
            vec![Value::Int(4), Value::from("y")],
        ]
    );
    for chunk_id in 0..second.chunk_count() {
        let chunk = second.chunk(chunk_id).unwrap();
        for column_id in 0..chunk.column_count() {
            match &*chunk.segment(column_id).unwrap() {
                Segment::Reference(segment) => {
                    assert!(Arc::ptr_eq(segment.referenced_table(), &table));
                }
                _ => panic!("scan results consist of reference segments"),
            }
        }
    }
}

#[test]
fn chained_scans_match_the_conjunction() {
    let table = person_table(2);

    let wrapper: Arc<dyn Operator> = Arc::new(TableWrapper::new(Arc::clone(&table)));
    wrapper.execute().unwrap();
    let first = TableScan::new(wrapper, 0, ScanType::GreaterThanEquals, Value::Int(2));
    first.execute().unwrap();
    let first: Arc<dyn Operator> = Arc::new(first);
    let chained = scan_operator(first, 0, ScanType::LessThan, Value::Int(5));

    let mut chained_positions = collect_positions(&chained);
    chained_positions.sort_by_key(|row| (row.chunk_id, row.chunk_offset));
    // >= 2 and < 5 leaves rows 2, 3 and 4
    assert_eq!(
        chained_positions,
        vec![row_id(0, 1), row_id(1, 0), row_id(1, 1)]
    );
}

#[test]
fn value_and_dictionary_scans_agree_on_every_predicate() {
    let scan_types = [
        ScanType::Equals,
        ScanType::NotEquals,
        ScanType::LessThan,
        ScanType::LessThanEquals,
        ScanType::GreaterThan,
        ScanType::GreaterThanEquals,
    ];
    // present, absent between entries, below and above the dictionary
    let search_values = [4, 5, -1, 15];

    let plain = even_number_table();
    let compressed = even_number_table();
    compressed.compress_chunk(0).unwrap();

    for scan_type in &scan_types {
        for search_value in &search_values {
            let from_plain =
                scan_table(&plain, 0, *scan_type, Value::Int(*search_value));
            let from_compressed =
                scan_table(&compressed, 0, *scan_type, Value::Int(*search_value));
            assert_eq!(
                collect_positions(&from_plain),
                collect_positions(&from_compressed),
                "{:?} {}",
                scan_type,
                search_value,
            );
        }
    }
}

fn even_number_table() -> Arc<storage::Table> {
    let table = storage::Table::new(100);
    table.add_column("a", "int").unwrap();
    for value in &[0, 2, 4, 6, 8, 10] {
        table.append(&[Value::Int(*value)]).unwrap();
    }
    Arc::new(table)
}

#[test]
fn not_equals_with_an_absent_value_matches_every_row() {
    let table = even_number_table();
    table.compress_chunk(0).unwrap();

    let result = scan_table(&table, 0, ScanType::NotEquals, Value::Int(5));
    assert_eq!(result.row_count(), 6);
}

#[test]
fn absent_value_rewrites_cover_all_predicates() {
    let table = even_number_table();
    table.compress_chunk(0).unwrap();

    let matches = |scan_type| {
        let result = scan_table(&table, 0, scan_type, Value::Int(5));
        collect_rows(&result)
            .into_iter()
            .map(|row| row[0].clone())
            .collect::<Vec<_>>()
    };

    assert_eq!(matches(ScanType::Equals), vec![]);
    assert_eq!(
        matches(ScanType::LessThan),
        vec![Value::Int(0), Value::Int(2), Value::Int(4)]
    );
    assert_eq!(
        matches(ScanType::LessThanEquals),
        vec![Value::Int(0), Value::Int(2), Value::Int(4)]
    );
    assert_eq!(
        matches(ScanType::GreaterThan),
        vec![Value::Int(6), Value::Int(8), Value::Int(10)]
    );
    assert_eq!(
        matches(ScanType::GreaterThanEquals),
        vec![Value::Int(6), Value::Int(8), Value::Int(10)]
    );
}

#[test]
fn scans_compose_through_the_catalog() {
    let catalog = Catalog::new();
    catalog.add_table("people", person_table(2)).unwrap();

    let table = catalog.table("people").unwrap();
    let result = scan_table(&table, 1, ScanType::Equals, Value::from("x"));
    assert_eq!(result.row_count(), 3);

    let mut out = Vec::new();
    catalog.print(&mut out).unwrap();
    assert_eq!(
        String::from_utf8(out).unwrap(),
        "Table: people, Column Count: 2, Row Count: 5, Chunk Count: 3\n"
    );
}
