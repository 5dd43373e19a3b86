//! Element-wise operations on tensors
//!
//! Unary mapping and binary zipping of same-shape tensors. These are the
//! building blocks for the `op` closures handed to
//! [`combine`](crate::combine).

use super::types::DenseND;
use scirs2_core::ndarray_ext::Zip;
use scirs2_core::numeric::Num;

impl<T> DenseND<T>
where
    T: Clone + Num,
{
    /// Apply a function element-wise
    ///
    /// # Examples
    ///
    /// ```
    /// use tenlab_core::DenseND;
    ///
    /// let tensor = DenseND::<f64>::from_vec(vec![1.0, 2.0, 3.0, 4.0], &[2, 2]).unwrap();
    /// let doubled = tensor.map(|x| x * 2.0);
    ///
    /// assert_eq!(doubled[&[0, 0]], 2.0);
    /// assert_eq!(doubled[&[1, 1]], 8.0);
    /// ```
    pub fn map<F>(&self, f: F) -> Self
    where
        F: Fn(T) -> T,
    {
        Self {
            data: self.data.mapv(f),
        }
    }

    /// Combine two same-shape tensors element by element.
    ///
    /// # Errors
    ///
    /// Returns an error if the shapes differ.
    ///
    /// # Examples
    ///
    /// ```
    /// use tenlab_core::DenseND;
    ///
    /// let a = DenseND::<f64>::from_vec(vec![1.0, 2.0], &[2]).unwrap();
    /// let b = DenseND::<f64>::from_vec(vec![10.0, 20.0], &[2]).unwrap();
    /// assert_eq!(a.zip_with(&b, |x, y| x + y).unwrap().to_vec(), vec![11.0, 22.0]);
    /// ```
    pub fn zip_with<F>(&self, other: &Self, f: F) -> anyhow::Result<Self>
    where
        F: Fn(T, T) -> T,
    {
        if !self.same_shape(other) {
            anyhow::bail!(
                "Shape mismatch: {:?} vs {:?}",
                self.shape(),
                other.shape()
            );
        }
        let data = Zip::from(&self.data)
            .and(&other.data)
            .map_collect(|a, b| f(a.clone(), b.clone()));
        Ok(Self { data })
    }
}
