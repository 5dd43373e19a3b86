//! Attribute trees
//!
//! Every [`LabeledTensor`] carries a map from attribute name to [`Attr`]. An
//! attribute is either a plain label (a unit, a description) or another
//! labeled tensor, which may in turn carry its own attributes. Attributes are
//! attached when a tensor is built and never point back at an ancestor, so the
//! structure is an owned tree.

use crate::error::{LabelError, LabelResult};
use crate::labeled::LabeledTensor;
use crate::types::Label;
use scirs2_core::numeric::Num;
use std::collections::BTreeMap;

/// Map from attribute name to value, ordered by name.
pub type AttrMap<T> = BTreeMap<String, Attr<T>>;

/// A single attribute value.
#[derive(Clone, Debug, PartialEq)]
pub enum Attr<T> {
    /// Nested labeled tensor (e.g. a per-split raw score)
    Tensor(LabeledTensor<T>),
    /// Plain metadata value
    Value(Label),
}

impl<T> Attr<T> {
    /// Borrow the nested tensor, if this attribute is one.
    pub fn as_tensor(&self) -> Option<&LabeledTensor<T>> {
        match self {
            Attr::Tensor(t) => Some(t),
            Attr::Value(_) => None,
        }
    }

    /// Borrow the plain value, if this attribute is one.
    pub fn as_value(&self) -> Option<&Label> {
        match self {
            Attr::Tensor(_) => None,
            Attr::Value(v) => Some(v),
        }
    }
}

impl<T> From<LabeledTensor<T>> for Attr<T> {
    fn from(t: LabeledTensor<T>) -> Self {
        Attr::Tensor(t)
    }
}

impl<T> From<Label> for Attr<T> {
    fn from(v: Label) -> Self {
        Attr::Value(v)
    }
}

/// Require every map to carry exactly the key set of the first.
///
/// `path` names the position in the tree for error reporting.
pub fn check_same_keys<T>(path: &str, maps: &[&AttrMap<T>]) -> LabelResult<()> {
    let Some(first) = maps.first() else {
        return Ok(());
    };
    for map in maps.iter().skip(1) {
        if !map.keys().eq(first.keys()) {
            return Err(LabelError::AttributeTreeMismatch {
                path: path.to_string(),
                expected: first.keys().cloned().collect(),
                actual: map.keys().cloned().collect(),
            });
        }
    }
    Ok(())
}

/// Join a parent path and an attribute key.
pub fn child_path(path: &str, key: &str) -> String {
    if path.is_empty() {
        key.to_string()
    } else {
        format!("{}.{}", path, key)
    }
}

/// Require that every tensor's attribute tree has the same keys at every depth.
///
/// Plain-value attributes are leaves; tensor attributes must be tensors in
/// every operand.
pub fn check_same_tree<T>(tensors: &[&LabeledTensor<T>]) -> LabelResult<()>
where
    T: Clone + Num,
{
    check_tree_at("", tensors)
}

fn check_tree_at<T>(path: &str, tensors: &[&LabeledTensor<T>]) -> LabelResult<()>
where
    T: Clone + Num,
{
    let maps: Vec<&AttrMap<T>> = tensors.iter().map(|t| t.attrs()).collect();
    check_same_keys(path, &maps)?;
    let Some(first) = tensors.first() else {
        return Ok(());
    };
    for (key, attr) in first.attrs() {
        if attr.as_tensor().is_none() {
            continue;
        }
        let sub_path = child_path(path, key);
        let children = tensors
            .iter()
            .map(|t| {
                t.attrs()
                    .get(key)
                    .and_then(Attr::as_tensor)
                    .ok_or_else(|| LabelError::AttributeTreeMismatch {
                        path: sub_path.clone(),
                        expected: vec!["<tensor>".to_string()],
                        actual: vec!["<value>".to_string()],
                    })
            })
            .collect::<LabelResult<Vec<_>>>()?;
        check_tree_at(&sub_path, &children)?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::DenseND;

    fn leaf(v: f64) -> LabeledTensor<f64> {
        LabeledTensor::scalar(v)
    }

    #[test]
    fn test_same_tree_accepts_matching() {
        let a = leaf(1.0)
            .with_attr("raw", leaf(2.0).with_attr("unit", Label::from("r")))
            .with_attr("note", Label::from("x"));
        let b = leaf(3.0)
            .with_attr("raw", leaf(4.0).with_attr("unit", Label::from("r")))
            .with_attr("note", Label::from("y"));
        assert!(check_same_tree(&[&a, &b]).is_ok());
    }

    #[test]
    fn test_same_tree_rejects_nested_difference() {
        let a = leaf(1.0).with_attr("raw", leaf(2.0).with_attr("unit", Label::from("r")));
        let b = leaf(3.0).with_attr("raw", leaf(4.0));
        let err = check_same_tree(&[&a, &b]).unwrap_err();
        match err {
            LabelError::AttributeTreeMismatch { path, .. } => assert_eq!(path, "raw"),
            other => panic!("unexpected error {other:?}"),
        }
    }

    #[test]
    fn test_same_tree_rejects_tensor_vs_value() {
        let t = LabeledTensor::new(DenseND::<f64>::zeros(&[1]), &["x"]).unwrap();
        let a = leaf(1.0).with_attr("raw", t);
        let b = leaf(3.0).with_attr("raw", Label::from("oops"));
        assert!(matches!(
            check_same_tree(&[&a, &b]),
            Err(LabelError::AttributeTreeMismatch { .. })
        ));
    }

    #[test]
    fn test_child_path() {
        assert_eq!(child_path("", "raw"), "raw");
        assert_eq!(child_path("raw", "split"), "raw.split");
    }
}
