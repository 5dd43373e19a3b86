//! Attribute-tree combination
//!
//! [`combine`] applies one operation to several tensors and, with the same
//! operation, to every attribute tensor they carry under matching names, so
//! derived metadata (raw per-split values, error estimates) follows the
//! primary value through a computation.
//!
//! # Examples
//!
//! ```
//! use tenlab_core::{combine, Attr, LabeledTensor};
//!
//! let a = LabeledTensor::scalar(1.0).with_attr("raw", LabeledTensor::scalar(10.0));
//! let b = LabeledTensor::scalar(3.0).with_attr("raw", LabeledTensor::scalar(30.0));
//!
//! let mean = combine(
//!     |ts| {
//!         let sum = ts[0].data().zip_with(ts[1].data(), |x, y| (x + y) / 2.0)?;
//!         Ok(ts[0].with_data(sum)?)
//!     },
//!     &[&a, &b],
//! )
//! .unwrap();
//!
//! assert_eq!(mean.values(), vec![2.0]);
//! let raw = mean.attr("raw").and_then(Attr::as_tensor).unwrap();
//! assert_eq!(raw.values(), vec![20.0]);
//! ```

use crate::attrs::{check_same_keys, child_path, Attr, AttrMap};
use crate::error::{LabelError, LabelResult};
use crate::labeled::LabeledTensor;
use scirs2_core::numeric::Num;

/// Apply `op` to `tensors` and, recursively, to their attribute tensors.
///
/// Attribute key sets must agree at every depth. Plain-value attributes are
/// copied from the first operand; attributes that are tensors in the first
/// operand must be tensors in all of them.
///
/// # Errors
///
/// [`LabelError::AttributeTreeMismatch`] if the attribute trees differ,
/// [`LabelError::Strategy`] if `op` fails.
pub fn combine<T, F>(op: F, tensors: &[&LabeledTensor<T>]) -> LabelResult<LabeledTensor<T>>
where
    T: Clone + Num,
    F: Fn(&[&LabeledTensor<T>]) -> anyhow::Result<LabeledTensor<T>>,
{
    combine_at("", &op, tensors)
}

fn combine_at<T, F>(
    path: &str,
    op: &F,
    tensors: &[&LabeledTensor<T>],
) -> LabelResult<LabeledTensor<T>>
where
    T: Clone + Num,
    F: Fn(&[&LabeledTensor<T>]) -> anyhow::Result<LabeledTensor<T>>,
{
    let first = tensors.first().ok_or_else(|| {
        LabelError::Tensor(anyhow::anyhow!("combine requires at least one tensor"))
    })?;
    let maps: Vec<&AttrMap<T>> = tensors.iter().map(|t| t.attrs()).collect();
    check_same_keys(path, &maps)?;

    let core = op(tensors).map_err(|e| {
        LabelError::strategy(
            if path.is_empty() {
                "combine".to_string()
            } else {
                format!("combine '{}'", path)
            },
            e,
        )
    })?;

    let mut attrs = AttrMap::new();
    for (key, attr) in first.attrs() {
        let combined = match attr {
            Attr::Value(_) => attr.clone(),
            Attr::Tensor(_) => {
                let sub_path = child_path(path, key);
                let children = tensors
                    .iter()
                    .map(|t| {
                        t.attr(key).and_then(Attr::as_tensor).ok_or_else(|| {
                            LabelError::AttributeTreeMismatch {
                                path: sub_path.clone(),
                                expected: vec!["<tensor>".to_string()],
                                actual: vec!["<value>".to_string()],
                            }
                        })
                    })
                    .collect::<LabelResult<Vec<_>>>()?;
                Attr::Tensor(combine_at(&sub_path, op, &children)?)
            }
        };
        attrs.insert(key.clone(), combined);
    }
    tracing::trace!(path, operands = tensors.len(), attrs = attrs.len(), "combined");
    Ok(core.with_attrs(attrs))
}
