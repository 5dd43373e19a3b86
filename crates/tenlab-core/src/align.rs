//! Axis alignment
//!
//! [`AxisAligner`] is the gate every fit, predict and comparison passes
//! through before touching numbers: it checks that a tensor has exactly the
//! expected set of axis names and permutes it into the expected order.
//!
//! # Examples
//!
//! ```
//! use tenlab_core::{AxisAligner, DenseND, LabeledTensor};
//!
//! let t = LabeledTensor::new(DenseND::<f64>::zeros(&[2, 3]), &["neuroid", "presentation"]).unwrap();
//! let aligner = AxisAligner::new(&["presentation", "neuroid"]).unwrap();
//!
//! let aligned = aligner.align(&t).unwrap();
//! assert_eq!(aligned.dims(), vec!["presentation", "neuroid"]);
//! assert_eq!(aligned.shape().as_slice(), &[3, 2]);
//! ```

use crate::error::{LabelError, LabelResult};
use crate::labeled::LabeledTensor;
use scirs2_core::numeric::Num;

/// Checks and normalizes the axis layout of labeled tensors.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AxisAligner {
    expected: Vec<String>,
}

impl AxisAligner {
    /// Create an aligner for the given axis order.
    ///
    /// # Errors
    ///
    /// [`LabelError::AxisMismatch`] if a name repeats.
    pub fn new<S: AsRef<str>>(expected: &[S]) -> LabelResult<Self> {
        let expected: Vec<String> = expected.iter().map(|s| s.as_ref().to_string()).collect();
        for (i, name) in expected.iter().enumerate() {
            if expected[..i].contains(name) {
                let mut unique = expected.clone();
                unique.sort();
                unique.dedup();
                return Err(LabelError::axis_mismatch(unique, expected));
            }
        }
        Ok(Self { expected })
    }

    /// The axis order tensors are aligned to
    pub fn expected(&self) -> &[String] {
        &self.expected
    }

    /// Verify the axis-name set without permuting.
    pub fn check<T>(&self, tensor: &LabeledTensor<T>) -> LabelResult<()>
    where
        T: Clone + Num,
    {
        let mut actual = tensor.dims();
        actual.sort_unstable();
        let mut wanted: Vec<&str> = self.expected.iter().map(String::as_str).collect();
        wanted.sort_unstable();
        if actual != wanted {
            tracing::debug!(expected = ?self.expected, actual = ?tensor.dims(), "axis set mismatch");
            return Err(LabelError::axis_mismatch(
                self.expected.iter().cloned(),
                tensor.dims(),
            ));
        }
        Ok(())
    }

    /// Permute `tensor` so its axes are exactly the expected order.
    ///
    /// # Errors
    ///
    /// [`LabelError::AxisMismatch`] unless the tensor's axis-name set equals
    /// the expected set.
    pub fn align<T>(&self, tensor: &LabeledTensor<T>) -> LabelResult<LabeledTensor<T>>
    where
        T: Clone + Num,
    {
        self.check(tensor)?;
        tensor.transpose(&self.expected)
    }
}

/// Align `tensor` to `expected` in one call.
pub fn align<T, S>(tensor: &LabeledTensor<T>, expected: &[S]) -> LabelResult<LabeledTensor<T>>
where
    T: Clone + Num,
    S: AsRef<str>,
{
    AxisAligner::new(expected)?.align(tensor)
}
