//! The growable constant-pool container.

use crate::memory::DynArray;

use super::Value;

/// An append-only ordered sequence of values.
///
/// Insertion order is preserved and nothing is ever deduplicated, removed,
/// or mutated in place; the only operations are append and release. A
/// `ValueArray` is owned exclusively by the chunk that embeds it as a
/// constant pool.
#[derive(Debug, Default)]
pub struct ValueArray {
    values: DynArray<Value>,
}

impl ValueArray {
    /// Creates an empty array with zero capacity.
    pub fn new() -> Self {
        Self {
            values: DynArray::new(),
        }
    }

    /// Appends a value.
    pub fn push(&mut self, value: Value) {
        self.values.push(value);
    }

    /// Returns the value at `index`, if in bounds.
    pub fn get(&self, index: usize) -> Option<Value> {
        self.values.get(index)
    }

    /// Returns the number of values.
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Returns true if the array holds no values.
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Returns the number of slots currently allocated.
    pub fn capacity(&self) -> usize {
        self.values.capacity()
    }

    /// Views the values as a slice.
    pub fn as_slice(&self) -> &[Value] {
        self.values.as_slice()
    }

    /// Releases the backing storage and resets the array to empty.
    pub fn free(&mut self) {
        self.values.free();
    }
}
