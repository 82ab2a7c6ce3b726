//! In-memory columnar storage.
//!
//! A [`Table`] is partitioned horizontally into [`Chunk`]s; each chunk holds
//! one [`Segment`] per column. Segments exist in three physical forms: the
//! mutable, appendable [`ValueSegment`]; the immutable, dictionary-compressed
//! [`DictionarySegment`]; and the [`ReferenceSegment`], which stores no data
//! of its own and instead names rows of another table. A uniform untyped
//! interface on [`Segment`] hides the physical form from consumers.
//!
//! Tables are looked up by name through the [`Catalog`].

#![deny(rust_2018_idioms)]
#![warn(
    missing_debug_implementations,
    clippy::explicit_iter_loop,
    clippy::use_self,
    clippy::clone_on_ref_ptr
)]

pub mod attribute_vector;
pub mod catalog;
pub mod chunk;
pub mod dictionary_segment;
pub mod error;
pub mod reference_segment;
pub mod segment;
pub mod table;
pub mod value_segment;

pub use attribute_vector::{AttributeVector, FixedSizeAttributeVector};
pub use catalog::Catalog;
pub use chunk::Chunk;
pub use dictionary_segment::DictionarySegment;
pub use error::{Error, Result};
pub use reference_segment::ReferenceSegment;
pub use segment::{DictionaryData, Segment, ValueData};
pub use table::Table;
pub use value_segment::ValueSegment;
