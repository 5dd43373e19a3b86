//! # tenlab-core
//!
//! Labeled tensors: numeric arrays with named axes, coordinate labels and a
//! tree of attribute metadata.
//!
//! This crate provides the foundational building blocks for the tenlab stack:
//!
//! - **Dense storage** ([`DenseND`]) on top of scirs2-core's ndarray
//! - **Coordinates** ([`Label`], [`Coordinate`], [`CoordinateSet`]) naming the
//!   positions along one or more axes
//! - **Labeled tensors** ([`LabeledTensor`]) with transpose, positional and
//!   label-based selection, sorting and concatenation by axis name
//! - **Attribute trees** ([`Attr`]) of nested labeled tensors
//! - **Alignment** ([`AxisAligner`]) checking and normalizing axis layout
//! - **Combination** ([`combine`]) of tensors together with their attributes
//!
//! ## Core Principles
//!
//! ### SciRS2 Integration
//!
//! Numeric storage goes through `scirs2-core` (`ndarray_ext`, `numeric`);
//! no crate in the workspace depends on `ndarray` or `num-traits` directly.
//!
//! ### Immutability
//!
//! Labeled operations take `&self` and return a new tensor. Inputs are never
//! modified, which lets slices be handed to worker threads without locking.
//!
//! ## Quick Start
//!
//! ```
//! use tenlab_core::{align, Label, LabeledTensor};
//!
//! let responses = LabeledTensor::from_vec(
//!     vec![1.0, 2.0, 3.0, 4.0, 5.0, 6.0],
//!     &[("neuroid", 2), ("presentation", 3)],
//! )
//! .unwrap()
//! .with_coord("neuroid_id", "neuroid", vec![10, 20])
//! .unwrap()
//! .with_coord("stimulus_id", "presentation", vec!["a", "b", "c"])
//! .unwrap();
//!
//! let aligned = align(&responses, &["presentation", "neuroid"]).unwrap();
//! assert_eq!(aligned.dims(), vec!["presentation", "neuroid"]);
//!
//! let first = aligned.isel("presentation", 0).unwrap();
//! assert_eq!(first.values(), vec![1.0, 4.0]);
//! assert_eq!(
//!     first.coord("stimulus_id").unwrap().to_vec(),
//!     vec![Label::from("a")]
//! );
//! ```
//!
//! ## Error Handling
//!
//! Labeled operations return [`LabelResult`]; the dense layer keeps
//! `anyhow::Result` and its failures surface as [`LabelError::Tensor`].
//!
//! ## Features
//!
//! - `serde`: Serialize/deserialize [`Label`] and [`AxisMeta`]

pub mod align;
pub mod attrs;
pub mod combine;
pub mod dense;
pub mod error;
pub mod labeled;
pub mod types;

#[cfg(test)]
mod property_tests;

pub use align::{align, AxisAligner};
pub use attrs::{check_same_keys, check_same_tree, child_path, Attr, AttrMap};
pub use combine::combine;
pub use dense::DenseND;
pub use error::{LabelError, LabelResult};
pub use labeled::LabeledTensor;
pub use types::{AxisMeta, Coordinate, CoordinateSet, Label, Rank, Shape};
