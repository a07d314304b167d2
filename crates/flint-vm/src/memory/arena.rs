//! The reallocation primitive and the dynamic array built on it.

use std::alloc::{self, Layout, handle_alloc_error};
use std::fmt;
use std::ptr::NonNull;

/// Returns the next capacity step for a growing container.
///
/// Doubles the current capacity with a floor of 8 slots, which keeps the
/// number of reallocations over `n` appends at O(log n) while wasting at
/// most half the backing storage.
pub fn grow_capacity(capacity: usize) -> usize {
    if capacity < 8 { 8 } else { capacity * 2 }
}

/// Resizes an allocation of `new_count` slots of `T`.
///
/// This is the single allocation and release path for every growable
/// structure in the engine:
///
/// - `new_count == 0` releases the block and returns a dangling pointer.
///   Passing a dangling pointer together with `old_count == 0` is a no-op
///   release.
/// - `old_count == 0` (or a dangling pointer) performs a fresh allocation
///   whose contents are uninitialized. The mixed case — dangling pointer
///   with a nonzero `old_count` — is treated the same way, never as an
///   error.
/// - Otherwise the block is resized, preserving the first
///   `min(old_count, new_count)` slots. The input pointer is invalidated
///   whether or not the returned pointer differs from it.
///
/// A failed allocation terminates the process through
/// [`handle_alloc_error`]: the VM has no mode of operation under partial
/// memory, so there is no recoverable-error channel here.
///
/// # Safety
///
/// For nonzero `old_count`, `ptr` must have come from a previous
/// `reallocate::<T>` call whose `new_count` was `old_count`. `T` must not
/// be zero-sized. Callers are responsible for the contents: only the raw
/// storage is managed here, so `T` must not need dropping.
pub unsafe fn reallocate<T>(ptr: NonNull<T>, old_count: usize, new_count: usize) -> NonNull<T> {
    debug_assert!(size_of::<T>() != 0);

    if new_count == 0 {
        if old_count != 0 && ptr != NonNull::dangling() {
            // SAFETY: the block was allocated by this function with
            // `old_count` slots, so the layouts match.
            unsafe { alloc::dealloc(ptr.as_ptr().cast(), array_layout::<T>(old_count)) };
        }
        return NonNull::dangling();
    }

    let new_layout = array_layout::<T>(new_count);
    let raw = if old_count == 0 || ptr == NonNull::dangling() {
        // SAFETY: the layout has nonzero size because `T` is not
        // zero-sized and `new_count > 0`.
        unsafe { alloc::alloc(new_layout) }
    } else {
        // SAFETY: same allocation provenance as the dealloc branch above.
        unsafe { alloc::realloc(ptr.as_ptr().cast(), array_layout::<T>(old_count), new_layout.size()) }
    };

    match NonNull::new(raw.cast::<T>()) {
        Some(block) => block,
        None => handle_alloc_error(new_layout),
    }
}

fn array_layout<T>(count: usize) -> Layout {
    match Layout::array::<T>(count) {
        Ok(layout) => layout,
        // A capacity overflow has no recovery path either.
        Err(_) => handle_alloc_error(Layout::new::<T>()),
    }
}

/// An append-only growable array backed by [`reallocate`].
///
/// `capacity >= len` at all times, insertion order is preserved, and the
/// backing storage is released through [`reallocate`] on drop — never
/// through any other path. `T: Copy` because the array manages raw storage
/// only and runs no destructors.
pub struct DynArray<T: Copy> {
    ptr: NonNull<T>,
    len: usize,
    capacity: usize,
}

impl<T: Copy> DynArray<T> {
    /// Creates an empty array with zero capacity. Allocates nothing.
    pub fn new() -> Self {
        Self {
            ptr: NonNull::dangling(),
            len: 0,
            capacity: 0,
        }
    }

    /// Returns the number of elements.
    pub fn len(&self) -> usize {
        self.len
    }

    /// Returns true if the array holds no elements.
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Returns the number of slots currently allocated.
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Appends an element, growing the backing storage when full.
    pub fn push(&mut self, value: T) {
        if self.len == self.capacity {
            let new_capacity = grow_capacity(self.capacity);
            // SAFETY: `ptr` was produced by `reallocate` with the current
            // capacity (or is dangling when the capacity is zero).
            self.ptr = unsafe { reallocate(self.ptr, self.capacity, new_capacity) };
            self.capacity = new_capacity;
        }

        // SAFETY: `len < capacity` after the growth check, so the slot is
        // in bounds of the allocation.
        unsafe { self.ptr.add(self.len).write(value) };
        self.len += 1;
    }

    /// Returns the element at `index`, if in bounds.
    pub fn get(&self, index: usize) -> Option<T> {
        self.as_slice().get(index).copied()
    }

    /// Views the elements as a slice.
    pub fn as_slice(&self) -> &[T] {
        // SAFETY: the first `len` slots are initialized; a dangling pointer
        // is valid for a zero-length slice.
        unsafe { std::slice::from_raw_parts(self.ptr.as_ptr(), self.len) }
    }

    /// Releases the backing storage and resets the array to empty.
    pub fn free(&mut self) {
        // SAFETY: `ptr`/`capacity` describe the current allocation.
        self.ptr = unsafe { reallocate(self.ptr, self.capacity, 0) };
        self.len = 0;
        self.capacity = 0;
    }
}

impl<T: Copy> Drop for DynArray<T> {
    fn drop(&mut self) {
        self.free();
    }
}

impl<T: Copy> Default for DynArray<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: Copy + fmt::Debug> fmt::Debug for DynArray<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.as_slice()).finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_grow_capacity_floor_and_doubling() {
        assert_eq!(grow_capacity(0), 8);
        assert_eq!(grow_capacity(7), 8);
        assert_eq!(grow_capacity(8), 16);
        assert_eq!(grow_capacity(16), 32);
    }

    #[test]
    fn test_reallocate_fresh_resize_release() {
        unsafe {
            let block = reallocate::<u64>(NonNull::dangling(), 0, 4);
            for i in 0..4 {
                block.add(i).write(i as u64 * 10);
            }

            // Growing preserves the existing slots.
            let block = reallocate(block, 4, 8);
            for i in 0..4 {
                assert_eq!(block.add(i).read(), i as u64 * 10);
            }

            // Shrinking preserves the surviving prefix.
            let block = reallocate(block, 8, 2);
            assert_eq!(block.add(0).read(), 0);
            assert_eq!(block.add(1).read(), 10);

            assert_eq!(reallocate(block, 2, 0), NonNull::<u64>::dangling());
        }
    }

    #[test]
    fn test_reallocate_release_of_nothing_is_a_noop() {
        unsafe {
            assert_eq!(
                reallocate::<u64>(NonNull::dangling(), 0, 0),
                NonNull::<u64>::dangling()
            );
        }
    }

    #[test]
    fn test_reallocate_dangling_with_nonzero_old_count_is_fresh() {
        // The mixed case is a fresh allocation, not an error.
        unsafe {
            let block = reallocate::<u64>(NonNull::dangling(), 3, 2);
            block.add(0).write(7);
            block.add(1).write(9);
            assert_eq!(block.add(0).read(), 7);
            assert_eq!(block.add(1).read(), 9);
            reallocate(block, 2, 0);
        }
    }

    #[test]
    fn test_dynarray_starts_empty_without_allocating() {
        let array: DynArray<u8> = DynArray::new();
        assert_eq!(array.len(), 0);
        assert_eq!(array.capacity(), 0);
        assert!(array.is_empty());
    }

    #[test]
    fn test_dynarray_preserves_insertion_order() {
        let mut array = DynArray::new();
        for i in 0..100u32 {
            array.push(i);
        }

        assert_eq!(array.len(), 100);
        for i in 0..100u32 {
            assert_eq!(array.get(i as usize), Some(i));
        }
        assert_eq!(array.get(100), None);
    }

    #[test]
    fn test_dynarray_capacity_always_covers_len() {
        let mut array = DynArray::new();
        let mut capacities = Vec::new();
        for i in 0..40u8 {
            array.push(i);
            assert!(array.capacity() >= array.len());
            if capacities.last() != Some(&array.capacity()) {
                capacities.push(array.capacity());
            }
        }
        assert_eq!(capacities, vec![8, 16, 32, 64]);
    }

    #[test]
    fn test_dynarray_free_resets_to_empty() {
        let mut array = DynArray::new();
        array.push(1u8);
        array.push(2u8);

        array.free();
        assert_eq!(array.len(), 0);
        assert_eq!(array.capacity(), 0);

        // The array is reusable after a free.
        array.push(3u8);
        assert_eq!(array.as_slice(), &[3]);
    }
}
