//! Memory management for the growable VM containers.
//!
//! Every growable structure in the engine — a chunk's code and line tables
//! and its constant pool — allocates and releases storage through one
//! primitive, [`reallocate`]. Nothing frees its backing memory through any
//! other path, so a block can never be released by a different allocator
//! than the one that produced it.
//!
//! ## Structure
//!
//! - `arena.rs` - The reallocation primitive and the `DynArray` container
//!   built on top of it

mod arena;

pub use arena::{DynArray, grow_capacity, reallocate};
