//! Level reassembly
//!
//! After every slice of one axis has been processed, the surviving results
//! are joined back along that axis. The primary values are concatenated,
//! the axis coordinates of the level's input are reattached, and every
//! attribute tensor is joined the same way, recursively.

use crate::tracing_support::record_level;
use scirs2_core::numeric::Num;
use tenlab_core::{
    check_same_keys, child_path, Attr, AttrMap, LabelError, LabelResult, LabeledTensor,
};

/// Join the per-index results of one level along `axis`.
///
/// `input` is the tensor the level sliced; `results[i]` is the outcome for
/// index `i`. `None` entries are dropped. Returns `None` when nothing
/// survived.
pub(crate) fn reassemble_level<T>(
    input: &LabeledTensor<T>,
    axis: &str,
    results: Vec<Option<LabeledTensor<T>>>,
) -> LabelResult<Option<LabeledTensor<T>>>
where
    T: Clone + Num,
{
    let dispatched = results.len();
    let (indices, survivors): (Vec<usize>, Vec<LabeledTensor<T>>) = results
        .into_iter()
        .enumerate()
        .filter_map(|(i, r)| r.map(|t| (i, t)))
        .unzip();
    record_level(axis, dispatched, survivors.len());
    if survivors.is_empty() {
        return Ok(None);
    }
    stack_along(input, Some(input), axis, &indices, &survivors, "").map(Some)
}

/// Concatenate `parts` along `axis` and rebuild their attribute tree.
///
/// `coords_source` supplies the walked axis's coordinates; `attr_source` is
/// the input node matching `parts` in the attribute tree, used to pass
/// untouched attributes through.
fn stack_along<T>(
    coords_source: &LabeledTensor<T>,
    attr_source: Option<&LabeledTensor<T>>,
    axis: &str,
    indices: &[usize],
    parts: &[LabeledTensor<T>],
    path: &str,
) -> LabelResult<LabeledTensor<T>>
where
    T: Clone + Num,
{
    let maps: Vec<&AttrMap<T>> = parts.iter().map(|p| p.attrs()).collect();
    check_same_keys(path, &maps)?;

    let bare: Vec<LabeledTensor<T>> = parts
        .iter()
        .map(|p| p.clone().with_attrs(AttrMap::new()))
        .collect();
    let joined = LabeledTensor::concat(&bare, axis)?;
    let joined = attach_axis_coords(joined, coords_source, axis, indices)?;
    let walked = coords_source.size_of(axis)?;

    let mut attrs = AttrMap::new();
    for key in maps[0].keys() {
        let sub_path = child_path(path, key);
        let column: Vec<&Attr<T>> = maps.iter().filter_map(|m| m.get(key)).collect();
        let input_attr = attr_source.and_then(|s| s.attr(key));

        if let Some(input_attr) = input_attr.filter(|o| !carries_axis(*o, axis, walked)) {
            if column.iter().all(|a| *a == input_attr) {
                attrs.insert(key.clone(), input_attr.clone());
                continue;
            }
        }

        let merged = match column[0] {
            Attr::Value(first) => {
                if let Some(other) = column.iter().find(|a| **a != column[0]) {
                    return Err(LabelError::AttributeTreeMismatch {
                        path: sub_path,
                        expected: vec![first.to_string()],
                        actual: vec![describe(*other)],
                    });
                }
                Attr::Value(first.clone())
            }
            Attr::Tensor(_) => {
                let children = column
                    .iter()
                    .map(|a| {
                        a.as_tensor().cloned().ok_or_else(|| {
                            LabelError::AttributeTreeMismatch {
                                path: sub_path.clone(),
                                expected: vec!["<tensor>".to_string()],
                                actual: vec![describe(*a)],
                            }
                        })
                    })
                    .collect::<LabelResult<Vec<_>>>()?;
                let child_source = input_attr.and_then(Attr::as_tensor);
                Attr::Tensor(stack_along(
                    coords_source,
                    child_source,
                    axis,
                    indices,
                    &children,
                    &sub_path,
                )?)
            }
        };
        attrs.insert(key.clone(), merged);
    }
    Ok(joined.with_attrs(attrs))
}

/// Reattach the walked axis's coordinates, restricted to surviving indices.
///
/// A coordinate is attached only where every axis it spans exists on
/// `joined` with the matching length.
fn attach_axis_coords<T>(
    mut joined: LabeledTensor<T>,
    source: &LabeledTensor<T>,
    axis: &str,
    indices: &[usize],
) -> LabelResult<LabeledTensor<T>>
where
    T: Clone + Num,
{
    for coord in source.coords().values().filter(|c| c.spans(axis)) {
        let restricted = coord.select(axis, indices);
        let fits = restricted
            .dims()
            .iter()
            .zip(restricted.shape())
            .all(|(dim, &size)| joined.size_of(dim).ok() == Some(size));
        if fits {
            joined = joined.with_coordinate(restricted)?;
        }
    }
    Ok(joined)
}

/// Whether slicing along `axis` of length `size` would have sliced `attr`.
fn carries_axis<T>(attr: &Attr<T>, axis: &str, size: usize) -> bool
where
    T: Clone + Num,
{
    attr.as_tensor()
        .is_some_and(|t| t.size_of(axis).ok() == Some(size))
}

fn describe<T>(attr: &Attr<T>) -> String {
    match attr {
        Attr::Value(v) => v.to_string(),
        Attr::Tensor(_) => "<tensor>".to_string(),
    }
}

/// Put the axes of `result` back into the relative order of `reference`.
///
/// Axes unknown to `reference` keep their current relative order after the
/// known ones. Attribute tensors are restored against the reference's
/// attribute of the same name.
pub(crate) fn restore_order<T>(
    result: LabeledTensor<T>,
    reference: &LabeledTensor<T>,
) -> LabelResult<LabeledTensor<T>>
where
    T: Clone + Num,
{
    let mut order: Vec<String> = reference
        .dims()
        .into_iter()
        .filter(|d| result.has_axis(d))
        .map(str::to_string)
        .collect();
    for dim in result.dims() {
        if !order.iter().any(|o| o == dim) {
            order.push(dim.to_string());
        }
    }
    let reordered = result.transpose(&order)?;

    let mut attrs = AttrMap::new();
    for (key, attr) in reordered.attrs() {
        let restored = match (attr, reference.attr(key).and_then(Attr::as_tensor)) {
            (Attr::Tensor(t), Some(r)) => Attr::Tensor(restore_order(t.clone(), r)?),
            _ => attr.clone(),
        };
        attrs.insert(key.clone(), restored);
    }
    Ok(reordered.with_attrs(attrs))
}

#[cfg(test)]
mod tests {
    use super::*;
    use tenlab_core::Label;

    fn level_input() -> LabeledTensor<f64> {
        LabeledTensor::from_vec(vec![1.0, 2.0, 3.0], &[("presentation", 3)])
            .unwrap()
            .with_coord("stimulus_id", "presentation", vec!["a", "b", "c"])
            .unwrap()
    }

    #[test]
    fn test_drops_none_and_restricts_coords() {
        let results = vec![
            Some(LabeledTensor::scalar(10.0)),
            None,
            Some(LabeledTensor::scalar(30.0)),
        ];
        let out = reassemble_level(&level_input(), "presentation", results)
            .unwrap()
            .unwrap();
        assert_eq!(out.values(), vec![10.0, 30.0]);
        assert_eq!(
            out.coord("stimulus_id").unwrap().to_vec(),
            vec![Label::from("a"), Label::from("c")]
        );
    }

    #[test]
    fn test_all_none_is_none() {
        let out = reassemble_level(&level_input(), "presentation", vec![None, None, None]).unwrap();
        assert!(out.is_none());
    }

    #[test]
    fn test_attr_tensors_stacked_with_axis_coords() {
        let results = (0..3)
            .map(|i| {
                Some(
                    LabeledTensor::scalar(i as f64)
                        .with_attr("raw", LabeledTensor::scalar(i as f64 * 100.0)),
                )
            })
            .collect();
        let out = reassemble_level(&level_input(), "presentation", results)
            .unwrap()
            .unwrap();
        let raw = out.attr("raw").and_then(Attr::as_tensor).unwrap();
        assert_eq!(raw.dims(), vec!["presentation"]);
        assert_eq!(raw.values(), vec![0.0, 100.0, 200.0]);
        assert_eq!(raw.coord("stimulus_id").unwrap(), out.coord("stimulus_id").unwrap());
    }

    #[test]
    fn test_attr_key_mismatch() {
        let results = vec![
            Some(LabeledTensor::scalar(1.0).with_attr("raw", LabeledTensor::scalar(1.0))),
            Some(LabeledTensor::scalar(2.0)),
            Some(LabeledTensor::scalar(3.0).with_attr("raw", LabeledTensor::scalar(1.0))),
        ];
        let err = reassemble_level(&level_input(), "presentation", results).unwrap_err();
        assert!(matches!(err, LabelError::AttributeTreeMismatch { .. }));
    }

    #[test]
    fn test_differing_plain_values_rejected() {
        let results = vec![
            Some(LabeledTensor::scalar(1.0).with_attr("unit", Label::from("a"))),
            Some(LabeledTensor::scalar(2.0).with_attr("unit", Label::from("b"))),
        ];
        let input = level_input().select_along("presentation", &[0, 1]).unwrap();
        let err = reassemble_level(&input, "presentation", results).unwrap_err();
        match err {
            LabelError::AttributeTreeMismatch { path, .. } => assert_eq!(path, "unit"),
            other => panic!("unexpected error {other:?}"),
        }
    }

    #[test]
    fn test_attr_with_unrelated_axis_length_passes_through() {
        let other = LabeledTensor::from_vec(vec![7.0, 8.0], &[("presentation", 2)]).unwrap();
        let input = level_input().with_attr("other", other.clone());
        let results = (0..3)
            .map(|i| input.isel("presentation", i).map(Some))
            .collect::<LabelResult<Vec<_>>>()
            .unwrap();
        let out = reassemble_level(&input, "presentation", results)
            .unwrap()
            .unwrap();
        assert_eq!(out.attr("other").and_then(Attr::as_tensor), Some(&other));
        assert_eq!(out, input);
    }

    #[test]
    fn test_restore_order_follows_reference() {
        let reference = LabeledTensor::new(
            tenlab_core::DenseND::<f64>::zeros(&[2, 3]),
            &["neuroid", "presentation"],
        )
        .unwrap();
        let result = LabeledTensor::new(
            tenlab_core::DenseND::<f64>::zeros(&[3, 4, 2]),
            &["presentation", "extra", "neuroid"],
        )
        .unwrap();
        let restored = restore_order(result, &reference).unwrap();
        assert_eq!(restored.dims(), vec!["neuroid", "presentation", "extra"]);
    }
}
