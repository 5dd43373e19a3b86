//! Shape manipulation operations on tensors
//!
//! Axis permutation and axis insertion. Labeled tensors map their named axes
//! onto these positional operations.

use super::types::DenseND;
use scirs2_core::ndarray_ext::{Axis, IxDyn};
use scirs2_core::numeric::Num;

impl<T> DenseND<T>
where
    T: Clone + Num,
{
    /// Permute (transpose) the axes of the tensor.
    ///
    /// # Errors
    ///
    /// Returns an error if `axes` is not a valid permutation.
    ///
    /// # Examples
    ///
    /// ```
    /// use tenlab_core::DenseND;
    ///
    /// let tensor = DenseND::<f64>::zeros(&[2, 3, 4]);
    /// let permuted = tensor.permute(&[2, 0, 1]).unwrap();
    /// assert_eq!(permuted.shape(), &[4, 2, 3]);
    /// ```
    pub fn permute(&self, axes: &[usize]) -> anyhow::Result<Self> {
        if axes.len() != self.rank() {
            anyhow::bail!(
                "Permutation axes length {} does not match tensor rank {}",
                axes.len(),
                self.rank()
            );
        }
        let mut seen = vec![false; self.rank()];
        for &axis in axes {
            if axis >= self.rank() {
                anyhow::bail!("Invalid axis {} for rank {}", axis, self.rank());
            }
            if seen[axis] {
                anyhow::bail!("Duplicate axis {} in permutation", axis);
            }
            seen[axis] = true;
        }
        let permuted = self.data.clone().permuted_axes(IxDyn(axes));
        Ok(Self { data: permuted })
    }

    /// Insert a new axis of length 1 at position `axis`.
    ///
    /// # Examples
    ///
    /// ```
    /// use tenlab_core::DenseND;
    ///
    /// let tensor = DenseND::<f64>::zeros(&[2, 3]);
    /// let expanded = tensor.unsqueeze(0).unwrap();
    /// assert_eq!(expanded.shape(), &[1, 2, 3]);
    /// ```
    pub fn unsqueeze(&self, axis: usize) -> anyhow::Result<Self> {
        if axis > self.rank() {
            anyhow::bail!(
                "Axis {} out of bounds for result rank {}",
                axis,
                self.rank() + 1
            );
        }
        Ok(Self {
            data: self.data.clone().insert_axis(Axis(axis)),
        })
    }
}
