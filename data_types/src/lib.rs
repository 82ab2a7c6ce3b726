//! This crate contains the data types shared between the storage layer and
//! the query operators: the closed set of column element types, the untyped
//! value variant carried across the segment interfaces, and the identifiers
//! used to address chunks, rows and dictionary entries.

#![deny(rust_2018_idioms)]
#![warn(
    missing_debug_implementations,
    clippy::explicit_iter_loop,
    clippy::use_self,
    clippy::clone_on_ref_ptr
)]

pub mod element_type;
pub mod ids;
pub mod value;

pub use element_type::{ElementType, Error as TypeError, NativeType};
pub use ids::{ChunkId, ChunkOffset, ColumnId, PosList, RowId, ValueId, INVALID_VALUE_ID};
pub use value::Value;
