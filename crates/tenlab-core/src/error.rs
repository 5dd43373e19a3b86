//! Error types for labeled tensor operations
//!
//! Every labeled operation returns [`LabelResult`]. The variants fall into
//! two groups:
//!
//! - **Caller misuse**, raised synchronously where the inconsistency is
//!   detected and never retried: axis sets that disagree, coordinates that
//!   do not line up, attribute trees of different shape, predicting before
//!   fitting.
//! - **Wrapped failures** of the numeric layer ([`LabelError::Tensor`]), of
//!   injected strategies ([`LabelError::Strategy`]) and of the worker pool
//!   ([`LabelError::WorkerPool`]).
//!
//! # Examples
//!
//! ```
//! use tenlab_core::{LabelError, LabeledTensor, DenseND};
//!
//! let t = LabeledTensor::new(DenseND::<f64>::zeros(&[2]), &["presentation"]).unwrap();
//! let err = t.transpose(&["neuroid"]).unwrap_err();
//! assert!(matches!(err, LabelError::AxisMismatch { .. }));
//! ```

use thiserror::Error;

/// Error type for labeled tensor operations
#[derive(Error, Debug)]
pub enum LabelError {
    /// The axis set of a tensor does not equal the expected set
    #[error("Axis mismatch: expected {expected:?}, got {actual:?}")]
    AxisMismatch {
        expected: Vec<String>,
        actual: Vec<String>,
    },

    /// A named axis does not exist on the tensor
    #[error("Axis '{axis}' not found among {available:?}")]
    MissingAxis {
        axis: String,
        available: Vec<String>,
    },

    /// A named coordinate does not exist on the tensor
    #[error("Coordinate '{coord}' not found")]
    MissingCoordinate { coord: String },

    /// Two tensors' coordinate label sequences disagree after sorting
    #[error("Coordinate mismatch on '{coord}': {reason}")]
    CoordinateMismatch { coord: String, reason: String },

    /// A coordinate expected to index a single axis spans a different number of axes
    #[error("Coordinate '{coord}' must index exactly one axis, but spans {dims:?}")]
    AxisArity { coord: String, dims: Vec<String> },

    /// Predict was called before fit
    #[error("Model has not been fitted: call fit before predict")]
    UnfittedModel,

    /// Attribute key sets disagree across operands being combined or reassembled
    #[error("Attribute tree mismatch at '{path}': expected keys {expected:?}, got {actual:?}")]
    AttributeTreeMismatch {
        path: String,
        expected: Vec<String>,
        actual: Vec<String>,
    },

    /// Sizes disagree between related arrays
    #[error("{context}: shape mismatch - expected {expected:?}, got {actual:?}")]
    ShapeMismatch {
        context: String,
        expected: Vec<usize>,
        actual: Vec<usize>,
    },

    /// An injected fit/predict/compare strategy or per-slice callable failed
    #[error("{operation} strategy failed: {source}")]
    Strategy {
        operation: String,
        #[source]
        source: anyhow::Error,
    },

    /// The worker pool could not be built
    #[error("Worker pool error: {0}")]
    WorkerPool(String),

    /// Failure in the underlying dense tensor layer
    #[error("Tensor operation failed: {0}")]
    Tensor(#[from] anyhow::Error),
}

/// Result type for labeled tensor operations
pub type LabelResult<T> = Result<T, LabelError>;

impl LabelError {
    /// Create an axis mismatch error from any two name collections
    pub fn axis_mismatch<E, A>(expected: E, actual: A) -> Self
    where
        E: IntoIterator,
        E::Item: Into<String>,
        A: IntoIterator,
        A::Item: Into<String>,
    {
        LabelError::AxisMismatch {
            expected: expected.into_iter().map(Into::into).collect(),
            actual: actual.into_iter().map(Into::into).collect(),
        }
    }

    /// Wrap a failure raised by an injected strategy
    pub fn strategy(operation: impl Into<String>, source: anyhow::Error) -> Self {
        LabelError::Strategy {
            operation: operation.into(),
            source,
        }
    }

    /// Create a coordinate mismatch error
    pub fn coordinate_mismatch(coord: impl Into<String>, reason: impl Into<String>) -> Self {
        LabelError::CoordinateMismatch {
            coord: coord.into(),
            reason: reason.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_axis_mismatch_display() {
        let err = LabelError::axis_mismatch(["presentation", "neuroid"], ["presentation"]);
        let msg = format!("{}", err);
        assert!(msg.contains("Axis mismatch"));
        assert!(msg.contains("neuroid"));
    }

    #[test]
    fn test_axis_arity_display() {
        let err = LabelError::AxisArity {
            coord: "neuroid_id".to_string(),
            dims: vec!["a".to_string(), "b".to_string()],
        };
        let msg = format!("{}", err);
        assert!(msg.contains("neuroid_id"));
        assert!(msg.contains("exactly one axis"));
    }

    #[test]
    fn test_strategy_keeps_source() {
        let err = LabelError::strategy("fit", anyhow::anyhow!("singular matrix"));
        assert!(format!("{}", err).contains("singular matrix"));
        assert!(std::error::Error::source(&err).is_some());
    }

    #[test]
    fn test_tensor_from_anyhow() {
        let err: LabelError = anyhow::anyhow!("bad shape").into();
        assert!(matches!(err, LabelError::Tensor(_)));
    }
}
