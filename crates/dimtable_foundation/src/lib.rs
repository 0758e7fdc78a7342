//! Core types, typed arrays, selections, and index remapping for Dimtable.
//!
//! This crate provides:
//! - [`Array`] - Row-major typed column storage
//! - [`ElementType`], [`Shape`], [`Value`] - Type descriptors and scalar values
//! - [`Selection`] - Row selection by index list or boolean mask
//! - [`Remapper`] - Index translation tables used by relation columns
//! - [`Error`] - Rich error types with context

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]

pub mod array;
pub mod error;
pub mod remap;
pub mod selection;
pub mod types;

pub use array::{Array, ArrayData};
pub use error::{Error, ErrorContext, ErrorKind, Result};
pub use remap::{DENSE_CEILING, NOT_FOUND, RemapStrategy, Remapper};
pub use selection::Selection;
pub use types::{ElementType, Shape, Value};
