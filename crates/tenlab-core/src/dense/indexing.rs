//! Indexing and selection operations on tensors
//!
//! Positional element access, fixing one axis to an index, and selecting a
//! subset or reordering along an axis.

use super::types::DenseND;
use scirs2_core::ndarray_ext::Axis;
use scirs2_core::numeric::Num;

impl<T> DenseND<T>
where
    T: Clone + Num,
{
    /// Get an element by index without panicking
    ///
    /// # Examples
    ///
    /// ```
    /// use tenlab_core::DenseND;
    ///
    /// let tensor = DenseND::<f64>::from_vec(vec![1.0, 2.0, 3.0, 4.0], &[2, 2]).unwrap();
    /// assert_eq!(tensor.get(&[0, 1]), Some(&2.0));
    /// assert_eq!(tensor.get(&[5, 5]), None);
    /// ```
    pub fn get(&self, index: &[usize]) -> Option<&T> {
        if index.len() != self.rank() {
            return None;
        }
        for (i, &idx) in index.iter().enumerate() {
            if idx >= self.shape()[i] {
                return None;
            }
        }
        self.data.get(index)
    }

    /// Fix `axis` to `index`, dropping that axis from the result.
    ///
    /// # Examples
    ///
    /// ```
    /// use tenlab_core::DenseND;
    ///
    /// let tensor = DenseND::from_vec(vec![1.0, 2.0, 3.0, 4.0, 5.0, 6.0], &[3, 2]).unwrap();
    /// let row = tensor.index_axis(0, 1).unwrap();
    /// assert_eq!(row.to_vec(), vec![3.0, 4.0]);
    /// ```
    pub fn index_axis(&self, axis: usize, index: usize) -> anyhow::Result<Self> {
        if axis >= self.rank() {
            anyhow::bail!("Axis {} out of bounds for rank {}", axis, self.rank());
        }
        if index >= self.shape()[axis] {
            anyhow::bail!(
                "Index {} out of bounds for axis {} with size {}",
                index,
                axis,
                self.shape()[axis]
            );
        }
        Ok(Self {
            data: self.data.index_axis(Axis(axis), index).to_owned(),
        })
    }

    /// Select elements at the given indices along an axis.
    ///
    /// Indices may repeat and appear in any order, so this doubles as a
    /// positional reorder.
    ///
    /// # Examples
    ///
    /// ```
    /// use tenlab_core::DenseND;
    ///
    /// let tensor = DenseND::<f64>::from_vec(vec![1.0, 2.0, 3.0, 4.0, 5.0, 6.0], &[3, 2]).unwrap();
    /// let selected = tensor.select_indices(&[2, 0], 0).unwrap();
    ///
    /// assert_eq!(selected.shape(), &[2, 2]);
    /// assert_eq!(selected[&[0, 0]], 5.0);
    /// assert_eq!(selected[&[1, 0]], 1.0);
    /// ```
    pub fn select_indices(&self, indices: &[usize], axis: usize) -> anyhow::Result<Self> {
        if axis >= self.rank() {
            anyhow::bail!("Axis {} out of bounds for rank {}", axis, self.rank());
        }

        for &idx in indices {
            if idx >= self.shape()[axis] {
                anyhow::bail!(
                    "Index {} out of bounds for axis {} with size {}",
                    idx,
                    axis,
                    self.shape()[axis]
                );
            }
        }

        Ok(Self {
            data: self.data.select(Axis(axis), indices),
        })
    }
}
