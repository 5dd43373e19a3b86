//! # tenlab-metrics
//!
//! Adapters that let plain numeric strategies operate on labeled neural
//! response tensors.
//!
//! This crate provides:
//! - [`RegressionAdapter`] - wraps a fit/predict [`Regression`]: checks and
//!   normalizes axis layout, sorts by stimulus, re-packages predictions with
//!   the unit coordinates captured from the training target
//! - [`PairwiseComparisonAdapter`] - wraps a per-unit [`Comparison`]: lines
//!   up prediction and target labels and collects one statistic per unit
//!   into a [`Score`]
//! - [`MetricDefaults`] - the axis and coordinate names both adapters use
//!
//! Strategies themselves (ridge/PLS regressions, Pearson correlation, ...)
//! are injected and opaque; they report failures through `anyhow`.
//!
//! ## Features
//!
//! - `serde`: serialize/deserialize [`MetricDefaults`]

pub mod comparison;
pub mod defaults;
pub mod regression;
pub mod score;

pub use comparison::{Comparison, ComparisonOutput, PairwiseComparisonAdapter};
pub use defaults::MetricDefaults;
pub use regression::{Regression, RegressionAdapter};
pub use score::Score;
