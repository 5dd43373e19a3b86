//! Tensor combining operations
//!
//! Concatenation along an existing axis and stacking along a new one. These are
//! the primitives the reassembly step of the apply engine is built on.

use super::types::DenseND;
use scirs2_core::ndarray_ext::Axis;
use scirs2_core::numeric::Num;

impl<T> DenseND<T>
where
    T: Clone + Num,
{
    /// Concatenate multiple tensors along an existing axis.
    ///
    /// All tensors must have the same shape except along the concatenation axis.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - The tensor list is empty
    /// - Shapes are incompatible
    /// - Axis is out of bounds
    ///
    /// # Examples
    ///
    /// ```
    /// use tenlab_core::DenseND;
    ///
    /// let a = DenseND::<f64>::ones(&[2, 3]);
    /// let b = DenseND::<f64>::zeros(&[1, 3]);
    ///
    /// let concatenated = DenseND::concatenate(&[a, b], 0).unwrap();
    /// assert_eq!(concatenated.shape(), &[3, 3]);
    /// ```
    pub fn concatenate(tensors: &[Self], axis: usize) -> anyhow::Result<Self> {
        if tensors.is_empty() {
            anyhow::bail!("Cannot concatenate empty tensor list");
        }

        let rank = tensors[0].rank();
        if axis >= rank {
            anyhow::bail!("Axis {} out of bounds for rank {}", axis, rank);
        }

        let reference_shape = tensors[0].shape();
        for (i, tensor) in tensors.iter().enumerate().skip(1) {
            if tensor.rank() != rank {
                anyhow::bail!("Tensor {} has rank {}, expected {}", i, tensor.rank(), rank);
            }
            for (dim, (&s1, &s2)) in reference_shape
                .iter()
                .zip(tensor.shape().iter())
                .enumerate()
            {
                if dim != axis && s1 != s2 {
                    anyhow::bail!("Shape mismatch at dimension {}: {} vs {}", dim, s1, s2);
                }
            }
        }

        let views: Vec<_> = tensors.iter().map(|t| t.data.view()).collect();
        let concatenated = scirs2_core::ndarray::concatenate(Axis(axis), &views)?;

        Ok(Self { data: concatenated })
    }

    /// Stack multiple tensors along a new axis.
    ///
    /// All tensors must have the same shape. The result has rank + 1 dimensions.
    ///
    /// # Examples
    ///
    /// ```
    /// use tenlab_core::DenseND;
    ///
    /// let a = DenseND::scalar(3.0);
    /// let b = DenseND::scalar(7.0);
    ///
    /// let stacked = DenseND::stack(&[a, b], 0).unwrap();
    /// assert_eq!(stacked.shape(), &[2]);
    /// assert_eq!(stacked.to_vec(), vec![3.0, 7.0]);
    /// ```
    pub fn stack(tensors: &[Self], axis: usize) -> anyhow::Result<Self> {
        if tensors.is_empty() {
            anyhow::bail!("Cannot stack empty tensor list");
        }

        let rank = tensors[0].rank();
        if axis > rank {
            anyhow::bail!("Axis {} out of bounds for result rank {}", axis, rank + 1);
        }

        let reference_shape = tensors[0].shape();
        for (i, tensor) in tensors.iter().enumerate().skip(1) {
            if tensor.shape() != reference_shape {
                anyhow::bail!(
                    "Tensor {} has shape {:?}, expected {:?}",
                    i,
                    tensor.shape(),
                    reference_shape
                );
            }
        }

        let unsqueezed = tensors
            .iter()
            .map(|t| t.unsqueeze(axis))
            .collect::<anyhow::Result<Vec<_>>>()?;

        Self::concatenate(&unsqueezed, axis)
    }
}
