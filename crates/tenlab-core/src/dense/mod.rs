//! Dense tensor implementation and operations
//!
//! The numeric storage layer, organized into functional sub-modules.

pub mod types;

mod combining;
mod elementwise;
mod indexing;
mod shape_ops;
mod statistics;

pub mod densend_traits;

pub use types::DenseND;
