//! The name → table registry.

use std::collections::BTreeMap;
use std::io::Write;
use std::sync::Arc;

use parking_lot::RwLock;
use snafu::{ensure, OptionExt, Snafu};

use crate::table::Table;

#[derive(Debug, Snafu)]
pub enum Error {
    #[snafu(display("table '{}' already exists", name))]
    TableAlreadyExists { name: String },

    #[snafu(display("table '{}' not found", name))]
    TableNotFound { name: String },
}

pub type Result<T, E = Error> = std::result::Result<T, E>;

/// Tracks the tables of one engine instance by name.
///
/// An explicit value rather than a process global; embedders own one and
/// share it as needed. Listings are name-sorted.
#[derive(Debug, Default)]
pub struct Catalog {
    tables: RwLock<BTreeMap<String, Arc<Table>>>,
}

impl Catalog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers `table` under `name`.
    pub fn add_table(&self, name: impl Into<String>, table: Arc<Table>) -> Result<()> {
        let name = name.into();
        let mut tables = self.tables.write();
        ensure!(
            !tables.contains_key(&name),
            TableAlreadyExists { name: name.clone() }
        );
        tables.insert(name, table);
        Ok(())
    }

    /// Forgets the table registered under `name`. Handles obtained earlier
    /// keep the table alive.
    pub fn drop_table(&self, name: &str) -> Result<()> {
        self.tables
            .write()
            .remove(name)
            .map(|_| ())
            .context(TableNotFound { name })
    }

    pub fn table(&self, name: &str) -> Result<Arc<Table>> {
        self.tables
            .read()
            .get(name)
            .map(Arc::clone)
            .context(TableNotFound { name })
    }

    pub fn has_table(&self, name: &str) -> bool {
        self.tables.read().contains_key(name)
    }

    /// The registered table names, sorted.
    pub fn table_names(&self) -> Vec<String> {
        self.tables.read().keys().cloned().collect()
    }

    /// Writes one line per table with its name and column, row and chunk
    /// counts.
    pub fn print(&self, out: &mut dyn Write) -> std::io::Result<()> {
        for (name, table) in self.tables.read().iter() {
            writeln!(
                out,
                "Table: {}, Column Count: {}, Row Count: {}, Chunk Count: {}",
                name,
                table.column_count(),
                table.row_count(),
                table.chunk_count(),
            )?;
        }
        Ok(())
    }

    /// Forgets all tables. Destructive: names handed out earlier no longer
    /// resolve, though existing handles keep their tables alive.
    pub fn reset(&self) {
        self.tables.write().clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use data_types::Value;

    fn one_row_table() -> Arc<Table> {
        let table = Table::new(8);
        table.add_column("a", "int").unwrap();
        table.append(&[Value::Int(1)]).unwrap();
        Arc::new(table)
    }

    #[test]
    fn registers_and_resolves_tables() {
        let catalog = Catalog::new();
        let table = one_row_table();
        catalog.add_table("first", Arc::clone(&table)).unwrap();

        assert!(catalog.has_table("first"));
        assert!(!catalog.has_table("second"));
        assert!(Arc::ptr_eq(&catalog.table("first").unwrap(), &table));
    }

    #[test]
    fn rejects_duplicate_names() {
        let catalog = Catalog::new();
        catalog.add_table("first", one_row_table()).unwrap();
        assert!(matches!(
            catalog.add_table("first", one_row_table()).unwrap_err(),
            Error::TableAlreadyExists { .. }
        ));
    }

    #[test]
    fn drops_tables_once() {
        let catalog = Catalog::new();
        catalog.add_table("first", one_row_table()).unwrap();
        catalog.drop_table("first").unwrap();
        assert!(matches!(
            catalog.drop_table("first").unwrap_err(),
            Error::TableNotFound { .. }
        ));
        assert!(matches!(
            catalog.table("first").unwrap_err(),
            Error::TableNotFound { .. }
        ));
    }

    #[test]
    fn lists_names_sorted() {
        let catalog = Catalog::new();
        catalog.add_table("second", one_row_table()).unwrap();
        catalog.add_table("first", one_row_table()).unwrap();
        assert_eq!(catalog.table_names(), vec!["first", "second"]);
    }

    #[test]
    fn prints_one_line_per_table() {
        let catalog = Catalog::new();
        catalog.add_table("people", one_row_table()).unwrap();

        let mut out = Vec::new();
        catalog.print(&mut out).unwrap();
        assert_eq!(
            String::from_utf8(out).unwrap(),
            "Table: people, Column Count: 1, Row Count: 1, Chunk Count: 1\n"
        );
    }

    #[test]
    fn reset_forgets_everything() {
        let catalog = Catalog::new();
        catalog.add_table("first", one_row_table()).unwrap();
        catalog.reset();
        assert!(catalog.table_names().is_empty());
    }
}
