//! # tenlab-exec
//!
//! Recursive apply-over-axes execution for labeled tensors.
//!
//! This crate provides:
//! - [`ApplyEngine`] / [`apply_over_axes`] - walk tensors along named axes,
//!   run a per-slice callable and reassemble the results
//! - [`SliceRunner`] - the task-submission seam, with a rayon-backed
//!   [`RayonRunner`] and an inline [`SequentialRunner`]
//! - [`ApplyHints`] - worker bound and inline threshold
//! - [`tracing_support`] - subscriber setup for the engine's events
//!
//! ## Scheduling
//!
//! A single control thread drives the axis walk. Only the innermost axis is
//! parallel: its slices are submitted to the runner as one fork-join batch
//! and collected in index order, so output order never depends on
//! scheduling. Outer axes recurse sequentially.
//!
//! ## Features
//!
//! - `tracing`: enable [`tracing_support::init_tracing`] (tracing-subscriber)
//! - `serde`: serialize/deserialize [`ApplyHints`]

pub mod apply;
pub mod hints;
mod reassemble;
pub mod runner;
pub mod tracing_support;

pub use apply::{apply_over_axes, ApplyEngine};
pub use hints::ApplyHints;
pub use runner::{RayonRunner, SequentialRunner, SliceRunner};
