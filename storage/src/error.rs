//! Error type shared across the storage layer.

use data_types::ElementType;
use snafu::Snafu;

#[derive(Debug, Snafu)]
#[snafu(visibility = "pub(crate)")]
pub enum Error {
    #[snafu(display("expected a value of type {} but got {}", expected, actual))]
    TypeMismatch {
        expected: ElementType,
        actual: ElementType,
    },

    #[snafu(display("offset {} out of bounds for size {}", offset, size))]
    OutOfBounds { offset: usize, size: usize },

    #[snafu(display(
        "segment has {} distinct values; dictionary ids are limited to 32 bits",
        distinct_values
    ))]
    DictionaryTooLarge { distinct_values: usize },

    #[snafu(display("invalid type for column '{}': {}", name, source))]
    InvalidColumnType {
        name: String,
        source: data_types::TypeError,
    },

    #[snafu(display("columns can only be added while the table has no rows"))]
    TableNotEmpty,

    #[snafu(display("column name '{}' is already taken", name))]
    DuplicateColumnName { name: String },

    #[snafu(display("expected {} values per row but got {}", expected, actual))]
    WrongColumnCount { expected: usize, actual: usize },

    #[snafu(display("no column named '{}'", name))]
    ColumnNotFound { name: String },

    #[snafu(display("cannot append to a reference segment"))]
    AppendToReferenceSegment,
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
