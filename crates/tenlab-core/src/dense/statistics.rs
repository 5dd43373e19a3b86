//! Reductions on tensors
//!
//! Whole-tensor sums and means plus per-axis sums, used by per-slice
//! callables that collapse an axis.

use super::types::DenseND;
use scirs2_core::ndarray_ext::Axis;
use scirs2_core::numeric::{Num, NumCast};

impl<T> DenseND<T>
where
    T: Clone + Num + std::iter::Sum,
{
    /// Compute the sum of all elements.
    ///
    /// # Examples
    ///
    /// ```
    /// use tenlab_core::DenseND;
    ///
    /// let tensor = DenseND::<f64>::from_vec(vec![1.0, 2.0, 3.0, 4.0], &[2, 2]).unwrap();
    /// assert_eq!(tensor.sum(), 10.0);
    /// ```
    pub fn sum(&self) -> T {
        self.data.iter().cloned().sum()
    }

    /// Compute the mean of all elements.
    ///
    /// # Errors
    ///
    /// Returns an error for an empty tensor or if the element count cannot be
    /// represented in `T`.
    pub fn mean(&self) -> anyhow::Result<T>
    where
        T: NumCast,
    {
        if self.is_empty() {
            anyhow::bail!("Cannot take the mean of an empty tensor");
        }
        let count: T = NumCast::from(self.len())
            .ok_or_else(|| anyhow::anyhow!("Element count {} not representable", self.len()))?;
        Ok(self.sum() / count)
    }

    /// Sum elements along a specific axis.
    ///
    /// # Arguments
    ///
    /// * `axis` - The axis along which to sum
    /// * `keepdims` - If true, retains the reduced dimension with size 1
    ///
    /// # Errors
    ///
    /// Returns an error if the axis is out of bounds.
    ///
    /// # Examples
    ///
    /// ```
    /// use tenlab_core::DenseND;
    ///
    /// let tensor = DenseND::<f64>::from_vec(vec![1.0, 2.0, 3.0, 4.0, 5.0, 6.0], &[3, 2]).unwrap();
    /// let per_row = tensor.sum_axis(1, false).unwrap();
    /// assert_eq!(per_row.to_vec(), vec![3.0, 7.0, 11.0]);
    /// ```
    pub fn sum_axis(&self, axis: usize, keepdims: bool) -> anyhow::Result<Self> {
        if axis >= self.rank() {
            anyhow::bail!("Axis {} out of bounds for rank {}", axis, self.rank());
        }
        let summed = self.data.sum_axis(Axis(axis));
        let mut result = Self { data: summed };
        if keepdims {
            result = result.unsqueeze(axis)?;
        }
        Ok(result)
    }
}
