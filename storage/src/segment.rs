//! The closed sum of segment variants and the uniform untyped interface.

use std::any::Any;

use data_types::{ChunkOffset, ElementType, NativeType, Value};

use crate::dictionary_segment::DictionarySegment;
use crate::error::{AppendToReferenceSegment, Result};
use crate::reference_segment::ReferenceSegment;
use crate::value_segment::ValueSegment;

/// Delegates to the typed segment held by the current variant.
macro_rules! for_each_element {
    ($self:expr, |$segment:ident| $body:expr) => {
        match $self {
            Self::I32($segment) => $body,
            Self::I64($segment) => $body,
            Self::F32($segment) => $body,
            Self::F64($segment) => $body,
            Self::String($segment) => $body,
        }
    };
}

/// One column of one chunk.
///
/// Consumers read through the untyped accessors below; the scan downcasts
/// to the typed segment where the per-variant code paths diverge.
#[derive(Debug)]
pub enum Segment {
    Value(ValueData),
    Dictionary(DictionaryData),
    Reference(ReferenceSegment),
}

impl Segment {
    /// Number of elements.
    pub fn size(&self) -> ChunkOffset {
        match self {
            Self::Value(data) => data.size(),
            Self::Dictionary(data) => data.size(),
            Self::Reference(segment) => segment.size(),
        }
    }

    /// Untyped read of the value at `offset`.
    pub fn get(&self, offset: ChunkOffset) -> Result<Value> {
        match self {
            Self::Value(data) => data.get(offset),
            Self::Dictionary(data) => data.get(offset),
            Self::Reference(segment) => segment.get(offset),
        }
    }

    /// Appends to a value segment.
    ///
    /// Dictionary segments are immutable; appending to one is a no-op so
    /// that code holding the uniform interface does not need to care about
    /// the physical form. Reference segments reject the call.
    pub fn append(&self, value: &Value) -> Result<()> {
        match self {
            Self::Value(data) => data.append(value),
            Self::Dictionary(_) => Ok(()),
            Self::Reference(_) => AppendToReferenceSegment.fail(),
        }
    }

    pub fn estimate_memory_usage(&self) -> usize {
        match self {
            Self::Value(data) => data.estimate_memory_usage(),
            Self::Dictionary(data) => data.estimate_memory_usage(),
            Self::Reference(segment) => segment.estimate_memory_usage(),
        }
    }
}

/// Typed storage behind [`Segment::Value`], one variant per element type.
#[derive(Debug)]
pub enum ValueData {
    I32(ValueSegment<i32>),
    I64(ValueSegment<i64>),
    F32(ValueSegment<f32>),
    F64(ValueSegment<f64>),
    String(ValueSegment<String>),
}

impl ValueData {
    /// A fresh, empty segment for a column of `element_type`.
    pub fn new(element_type: ElementType) -> Self {
        match element_type {
            ElementType::Int => Self::I32(ValueSegment::new()),
            ElementType::Long => Self::I64(ValueSegment::new()),
            ElementType::Float => Self::F32(ValueSegment::new()),
            ElementType::Double => Self::F64(ValueSegment::new()),
            ElementType::String => Self::String(ValueSegment::new()),
        }
    }

    pub fn element_type(&self) -> ElementType {
        match self {
            Self::I32(_) => ElementType::Int,
            Self::I64(_) => ElementType::Long,
            Self::F32(_) => ElementType::Float,
            Self::F64(_) => ElementType::Double,
            Self::String(_) => ElementType::String,
        }
    }

    /// Typed view of the segment, or `None` when `T` is not the stored
    /// element type.
    pub fn as_element<T: NativeType>(&self) -> Option<&ValueSegment<T>> {
        let segment: &dyn Any = for_each_element!(self, |segment| segment);
        segment.downcast_ref()
    }

    pub fn append(&self, value: &Value) -> Result<()> {
        for_each_element!(self, |segment| segment.append(value))
    }

    pub fn get(&self, offset: ChunkOffset) -> Result<Value> {
        for_each_element!(self, |segment| segment.get(offset))
    }

    pub fn size(&self) -> ChunkOffset {
        for_each_element!(self, |segment| segment.size())
    }

    pub fn estimate_memory_usage(&self) -> usize {
        for_each_element!(self, |segment| segment.estimate_memory_usage())
    }
}

/// Typed storage behind [`Segment::Dictionary`], one variant per element
/// type.
#[derive(Debug)]
pub enum DictionaryData {
    I32(DictionarySegment<i32>),
    I64(DictionarySegment<i64>),
    F32(DictionarySegment<f32>),
    F64(DictionarySegment<f64>),
    String(DictionarySegment<String>),
}

impl DictionaryData {
    /// Dictionary-encodes `segment`, with the element type resolved from
    /// the column schema.
    pub fn from_segment(element_type: ElementType, segment: &Segment) -> Result<Self> {
        Ok(match element_type {
            ElementType::Int => Self::I32(DictionarySegment::from_segment(segment)?),
            ElementType::Long => Self::I64(DictionarySegment::from_segment(segment)?),
            ElementType::Float => Self::F32(DictionarySegment::from_segment(segment)?),
            ElementType::Double => Self::F64(DictionarySegment::from_segment(segment)?),
            ElementType::String => Self::String(DictionarySegment::from_segment(segment)?),
        })
    }

    pub fn element_type(&self) -> ElementType {
        match self {
            Self::I32(_) => ElementType::Int,
            Self::I64(_) => ElementType::Long,
            Self::F32(_) => ElementType::Float,
            Self::F64(_) => ElementType::Double,
            Self::String(_) => ElementType::String,
        }
    }

    /// Typed view of the segment, or `None` when `T` is not the stored
    /// element type.
    pub fn as_element<T: NativeType>(&self) -> Option<&DictionarySegment<T>> {
        let segment: &dyn Any = for_each_element!(self, |segment| segment);
        segment.downcast_ref()
    }

    pub fn get(&self, offset: ChunkOffset) -> Result<Value> {
        for_each_element!(self, |segment| segment.get(offset))
    }

    pub fn size(&self) -> ChunkOffset {
        for_each_element!(self, |segment| segment.size())
    }

    pub fn estimate_memory_usage(&self) -> usize {
        for_each_element!(self, |segment| segment.estimate_memory_usage())
    }
}
