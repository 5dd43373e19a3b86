//! Score tensors

use std::ops::Deref;
use tenlab_core::LabeledTensor;

/// Per-unit statistics produced by a comparison.
///
/// A thin wrapper marking a [`LabeledTensor`] as a metric result. It derefs
/// to the tensor for inspection.
#[derive(Clone, Debug, PartialEq)]
pub struct Score<T>(LabeledTensor<T>);

impl<T> Score<T> {
    /// Wrap a tensor of statistics
    pub fn new(values: LabeledTensor<T>) -> Self {
        Self(values)
    }

    /// The underlying tensor
    pub fn as_tensor(&self) -> &LabeledTensor<T> {
        &self.0
    }

    /// Unwrap into the underlying tensor
    pub fn into_inner(self) -> LabeledTensor<T> {
        self.0
    }
}

impl<T> Deref for Score<T> {
    type Target = LabeledTensor<T>;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl<T> From<Score<T>> for LabeledTensor<T> {
    fn from(score: Score<T>) -> Self {
        score.0
    }
}
