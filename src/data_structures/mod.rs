//! Containers the searches are built on.

pub mod intrusive_heap;
