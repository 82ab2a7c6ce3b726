//! Query operators over the columnar storage layer.
//!
//! Operators are wired into a pipeline through shared handles, executed
//! bottom-up exactly once, and yield immutable result tables. The scan
//! operators produce tables of reference segments so that results compose
//! without copying column data.

#![deny(rust_2018_idioms)]
#![warn(
    missing_debug_implementations,
    clippy::explicit_iter_loop,
    clippy::use_self,
    clippy::clone_on_ref_ptr
)]

use data_types::{ElementType, Value};
use snafu::Snafu;

pub mod operator;
pub mod table_scan;
pub mod table_wrapper;

pub use operator::{ExecutionState, Operator};
pub use table_scan::{ScanType, TableScan};
pub use table_wrapper::TableWrapper;

#[derive(Debug, Snafu)]
#[snafu(visibility = "pub(crate)")]
pub enum Error {
    #[snafu(display("operator has already been executed"))]
    AlreadyExecuted,

    #[snafu(display("operator has not been executed"))]
    NotExecuted,

    #[snafu(display(
        "search value '{}' is incompatible with a column of {}",
        search_value,
        element_type
    ))]
    InvalidSearchValue {
        search_value: Value,
        element_type: ElementType,
    },

    #[snafu(display("segment does not carry the scanned column's element type"))]
    UnsupportedSegment,

    #[snafu(display("storage error: {}", source))]
    Storage { source: storage::Error },
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
