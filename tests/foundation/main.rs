//! Integration tests for Layer 0: Foundation
//!
//! Tests for core types: Array, Value, Selection, Remapper, and Error.

mod arrays;
mod errors;
mod remap;
mod selections;
