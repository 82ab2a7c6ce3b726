//! Immutable, dictionary-compressed column segments.

use std::cmp::Ordering;
use std::mem;

use data_types::{ChunkOffset, NativeType, Value, ValueId, INVALID_VALUE_ID};
use snafu::{ensure, OptionExt};

use crate::attribute_vector::AttributeVector;
use crate::error::{OutOfBounds, Result, TypeMismatch};
use crate::segment::Segment;

/// Immutable column segment holding a sorted, unique dictionary and an
/// attribute vector mapping each row offset to a dictionary index.
///
/// The attribute-vector width is chosen from the dictionary size at
/// construction; see [`AttributeVector::for_dictionary_size`].
#[derive(Debug, Clone)]
pub struct DictionarySegment<T> {
    dictionary: Vec<T>,
    attribute_vector: AttributeVector,
}

impl<T: NativeType> DictionarySegment<T> {
    /// Dictionary-encodes an existing segment of any physical form.
    ///
    /// Fails with `TypeMismatch` when the base segment yields values of a
    /// different element type, and with `DictionaryTooLarge` when the number
    /// of distinct values cannot be addressed by a 32-bit value id.
    pub fn from_segment(segment: &Segment) -> Result<Self> {
        let size = segment.size();

        let mut values = Vec::with_capacity(size as usize);
        for offset in 0..size {
            let value = segment.get(offset)?;
            let typed = T::from_value(&value).context(TypeMismatch {
                expected: T::ELEMENT_TYPE,
                actual: value.element_type(),
            })?;
            values.push(typed);
        }

        let mut dictionary = values.clone();
        dictionary.sort_by(|a, b| a.total_cmp(b));
        dictionary.dedup_by(|a, b| a.total_cmp(b) == Ordering::Equal);
        dictionary.shrink_to_fit();

        let mut attribute_vector =
            AttributeVector::for_dictionary_size(dictionary.len(), size as usize)?;
        for (offset, value) in values.iter().enumerate() {
            let value_id = dictionary
                .binary_search_by(|entry| entry.total_cmp(value))
                .expect("encoded value missing from its own dictionary");
            attribute_vector.set(offset, value_id as ValueId);
        }

        Ok(Self {
            dictionary,
            attribute_vector,
        })
    }

    /// The decoded value at `offset` as an untyped [`Value`].
    pub fn get(&self, offset: ChunkOffset) -> Result<Value> {
        ensure!(
            (offset as usize) < self.attribute_vector.size(),
            OutOfBounds {
                offset: offset as usize,
                size: self.attribute_vector.size(),
            }
        );
        let value_id = self.attribute_vector.get(offset as usize);
        Ok(self.dictionary[value_id as usize].clone().into_value())
    }

    /// The value a given value id stands for.
    pub fn value_by_value_id(&self, value_id: ValueId) -> Result<&T> {
        self.dictionary.get(value_id as usize).context(OutOfBounds {
            offset: value_id as usize,
            size: self.dictionary.len(),
        })
    }

    /// The smallest value id whose value is `>= value`, or
    /// `INVALID_VALUE_ID` when every dictionary entry is smaller.
    pub fn lower_bound(&self, value: &T) -> ValueId {
        let index = self
            .dictionary
            .partition_point(|entry| entry.total_cmp(value) == Ordering::Less);
        if index == self.dictionary.len() {
            INVALID_VALUE_ID
        } else {
            index as ValueId
        }
    }

    /// The smallest value id whose value is `> value`, or
    /// `INVALID_VALUE_ID` when every dictionary entry is smaller or equal.
    pub fn upper_bound(&self, value: &T) -> ValueId {
        let index = self
            .dictionary
            .partition_point(|entry| entry.total_cmp(value) != Ordering::Greater);
        if index == self.dictionary.len() {
            INVALID_VALUE_ID
        } else {
            index as ValueId
        }
    }

    /// Same as [`Self::lower_bound`], but accepts an untyped value.
    pub fn lower_bound_value(&self, value: &Value) -> Result<ValueId> {
        let typed = T::from_value(value).context(TypeMismatch {
            expected: T::ELEMENT_TYPE,
            actual: value.element_type(),
        })?;
        Ok(self.lower_bound(&typed))
    }

    /// Same as [`Self::upper_bound`], but accepts an untyped value.
    pub fn upper_bound_value(&self, value: &Value) -> Result<ValueId> {
        let typed = T::from_value(value).context(TypeMismatch {
            expected: T::ELEMENT_TYPE,
            actual: value.element_type(),
        })?;
        Ok(self.upper_bound(&typed))
    }

    /// Number of dictionary entries.
    pub fn unique_values_count(&self) -> usize {
        self.dictionary.len()
    }

    /// The sorted, unique dictionary.
    pub fn dictionary(&self) -> &[T] {
        &self.dictionary
    }

    pub fn attribute_vector(&self) -> &AttributeVector {
        &self.attribute_vector
    }

    pub fn size(&self) -> ChunkOffset {
        self.attribute_vector.size() as ChunkOffset
    }

    pub fn estimate_memory_usage(&self) -> usize {
        self.dictionary.len() * mem::size_of::<T>()
            + self.attribute_vector.size() * self.attribute_vector.width()
    }
}
