//! Recursive apply over named axes
//!
//! [`ApplyEngine::apply`] walks one or more aligned tensors along the
//! requested axes, outermost first. The innermost axis is fanned out to the
//! engine's [`SliceRunner`]; outer axes recurse sequentially on the calling
//! thread. Each level's results are joined back along its axis (see
//! `reassemble`), so the output carries the input's coordinate system.
//!
//! # Examples
//!
//! Summing each presentation over its neuroids:
//!
//! ```
//! use tenlab_core::{Label, LabeledTensor};
//! use tenlab_exec::apply_over_axes;
//!
//! let responses = LabeledTensor::from_vec(
//!     vec![1.0, 2.0, 3.0, 4.0, 5.0, 6.0],
//!     &[("presentation", 3), ("neuroid", 2)],
//! )
//! .unwrap()
//! .with_coord("stimulus_id", "presentation", vec!["a", "b", "c"])
//! .unwrap();
//!
//! let sums = apply_over_axes(
//!     |slices| Ok(Some(LabeledTensor::scalar(slices[0].data().sum()))),
//!     &[&responses],
//!     &["presentation"],
//!     Some(2),
//! )
//! .unwrap()
//! .unwrap();
//!
//! assert_eq!(sums.values(), vec![3.0, 7.0, 11.0]);
//! assert_eq!(sums.coord("stimulus_id").unwrap().to_vec()[2], Label::from("c"));
//! ```

use crate::hints::ApplyHints;
use crate::reassemble::{reassemble_level, restore_order};
use crate::runner::{RayonRunner, SliceRunner};
use scirs2_core::numeric::Num;
use tenlab_core::{LabelError, LabelResult, LabeledTensor};

/// Walks tensors along named axes and reassembles per-slice results.
#[derive(Debug)]
pub struct ApplyEngine<R = RayonRunner> {
    runner: R,
}

impl ApplyEngine<RayonRunner> {
    /// Create an engine with a rayon worker pool sized by `hints`.
    pub fn new(hints: &ApplyHints) -> LabelResult<Self> {
        Ok(Self {
            runner: RayonRunner::new(hints)?,
        })
    }
}

impl<R: SliceRunner> ApplyEngine<R> {
    /// Create an engine on top of an existing runner.
    pub fn with_runner(runner: R) -> Self {
        Self { runner }
    }

    /// The runner slices are dispatched to
    pub fn runner(&self) -> &R {
        &self.runner
    }

    /// Apply `callable` to every slice of `tensors` along `axes`.
    ///
    /// `callable` receives one slice per input tensor (every walked axis
    /// fixed to an index) and returns `Ok(None)` for "no result". The output
    /// has the inputs' axes in their original relative order, or is `None`
    /// when no slice produced a result. With no axes, `callable` is invoked
    /// once on the whole tensors.
    ///
    /// # Errors
    ///
    /// [`LabelError::AxisMismatch`] if an input lacks a requested axis or an
    /// axis is requested twice, [`LabelError::ShapeMismatch`] if inputs
    /// disagree on an axis length, [`LabelError::AttributeTreeMismatch`] if
    /// results of one level carry different attribute trees. The first error
    /// returned by `callable` aborts the whole call.
    pub fn apply<T, F>(
        &self,
        callable: F,
        tensors: &[&LabeledTensor<T>],
        axes: &[&str],
    ) -> LabelResult<Option<LabeledTensor<T>>>
    where
        T: Clone + Num + Send + Sync,
        F: Fn(&[LabeledTensor<T>]) -> LabelResult<Option<LabeledTensor<T>>> + Send + Sync,
    {
        let first = tensors.first().ok_or_else(|| {
            LabelError::Tensor(anyhow::anyhow!("apply requires at least one tensor"))
        })?;
        for (i, axis) in axes.iter().enumerate() {
            if axes[..i].contains(axis) {
                let mut unique = axes.to_vec();
                unique.sort_unstable();
                unique.dedup();
                return Err(LabelError::axis_mismatch(unique, axes.iter().copied()));
            }
        }

        let prepared = tensors
            .iter()
            .map(|t| self.prepare(t, axes))
            .collect::<LabelResult<Vec<_>>>()?;
        for axis in axes {
            let sizes = prepared
                .iter()
                .map(|t| t.size_of(axis))
                .collect::<LabelResult<Vec<_>>>()?;
            if sizes.iter().any(|&s| s != sizes[0]) {
                return Err(LabelError::ShapeMismatch {
                    context: format!("axis '{}' across inputs", axis),
                    expected: vec![sizes[0]; sizes.len()],
                    actual: sizes,
                });
            }
        }

        tracing::debug!(
            axes = ?axes,
            inputs = tensors.len(),
            workers = self.runner.parallelism(),
            "apply over axes"
        );
        let walked = self.walk(&callable, &prepared, axes)?;
        walked.map(|result| restore_order(result, *first)).transpose()
    }

    fn prepare<T>(
        &self,
        tensor: &LabeledTensor<T>,
        axes: &[&str],
    ) -> LabelResult<LabeledTensor<T>>
    where
        T: Clone + Num,
    {
        if let Some(missing) = axes.iter().find(|a| !tensor.has_axis(a)) {
            tracing::debug!(axis = *missing, dims = ?tensor.dims(), "input lacks walked axis");
            return Err(LabelError::axis_mismatch(axes.iter().copied(), tensor.dims()));
        }
        tensor.transpose_leading(axes)
    }

    fn walk<T, F>(
        &self,
        callable: &F,
        tensors: &[LabeledTensor<T>],
        axes: &[&str],
    ) -> LabelResult<Option<LabeledTensor<T>>>
    where
        T: Clone + Num + Send + Sync,
        F: Fn(&[LabeledTensor<T>]) -> LabelResult<Option<LabeledTensor<T>>> + Send + Sync,
    {
        let Some((axis, rest)) = axes.split_first() else {
            return callable(tensors);
        };
        let count = tensors[0].size_of(axis)?;

        let results = if rest.is_empty() {
            self.runner
                .run(count, |i| callable(slice_all(tensors, axis, i)?.as_slice()))?
        } else {
            (0..count)
                .map(|i| self.walk(callable, &slice_all(tensors, axis, i)?, rest))
                .collect::<LabelResult<Vec<_>>>()?
        };

        tracing::trace!(axis = *axis, count, innermost = rest.is_empty(), "level done");
        reassemble_level(&tensors[0], axis, results)
    }
}

fn slice_all<T>(
    tensors: &[LabeledTensor<T>],
    axis: &str,
    index: usize,
) -> LabelResult<Vec<LabeledTensor<T>>>
where
    T: Clone + Num,
{
    tensors.iter().map(|t| t.isel(axis, index)).collect()
}

/// Build an engine bounded to `max_parallelism` workers and run one apply.
///
/// `None` uses every available core.
pub fn apply_over_axes<T, F>(
    callable: F,
    tensors: &[&LabeledTensor<T>],
    axes: &[&str],
    max_parallelism: Option<usize>,
) -> LabelResult<Option<LabeledTensor<T>>>
where
    T: Clone + Num + Send + Sync,
    F: Fn(&[LabeledTensor<T>]) -> LabelResult<Option<LabeledTensor<T>>> + Send + Sync,
{
    let hints = ApplyHints {
        max_parallelism,
        ..ApplyHints::default()
    };
    ApplyEngine::new(&hints)?.apply(callable, tensors, axes)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::runner::SequentialRunner;
    use tenlab_core::{Attr, DenseND, Label};

    fn responses() -> LabeledTensor<f64> {
        LabeledTensor::from_vec(
            vec![1.0, 2.0, 3.0, 4.0, 5.0, 6.0],
            &[("presentation", 3), ("neuroid", 2)],
        )
        .unwrap()
        .with_coord("stimulus_id", "presentation", vec!["s1", "s2", "s3"])
        .unwrap()
        .with_coord("neuroid_id", "neuroid", vec![10, 20])
        .unwrap()
    }

    fn sequential() -> ApplyEngine<SequentialRunner> {
        ApplyEngine::with_runner(SequentialRunner)
    }

    #[test]
    fn test_sum_per_stimulus() {
        let out = sequential()
            .apply(
                |s| Ok(Some(LabeledTensor::scalar(s[0].data().sum()))),
                &[&responses()],
                &["presentation"],
            )
            .unwrap()
            .unwrap();
        assert_eq!(out.dims(), vec!["presentation"]);
        assert_eq!(out.values(), vec![3.0, 7.0, 11.0]);
        assert_eq!(
            out.coord("stimulus_id").unwrap().to_vec(),
            vec![Label::from("s1"), Label::from("s2"), Label::from("s3")]
        );
    }

    #[test]
    fn test_identity_over_inner_axis_restores_order() {
        let t = responses();
        let out = sequential()
            .apply(|s| Ok(Some(s[0].clone())), &[&t], &["neuroid"])
            .unwrap()
            .unwrap();
        assert_eq!(out, t);
    }

    #[test]
    fn test_two_axes_identity() {
        let t = responses();
        let out = sequential()
            .apply(|s| Ok(Some(s[0].clone())), &[&t], &["neuroid", "presentation"])
            .unwrap()
            .unwrap();
        assert_eq!(out, t);
    }

    #[test]
    fn test_partial_none_restricts_coordinates() {
        let out = sequential()
            .apply(
                |s| {
                    let sum = s[0].data().sum();
                    Ok((sum > 5.0).then(|| LabeledTensor::scalar(sum)))
                },
                &[&responses()],
                &["presentation"],
            )
            .unwrap()
            .unwrap();
        assert_eq!(out.values(), vec![7.0, 11.0]);
        assert_eq!(
            out.coord("stimulus_id").unwrap().to_vec(),
            vec![Label::from("s2"), Label::from("s3")]
        );
    }

    #[test]
    fn test_all_none_propagates_through_outer_levels() {
        let out = sequential()
            .apply(
                |_| Ok(None::<LabeledTensor<f64>>),
                &[&responses()],
                &["presentation", "neuroid"],
            )
            .unwrap();
        assert!(out.is_none());
    }

    #[test]
    fn test_two_inputs_receive_matching_slices() {
        let target = responses();
        let prediction = target
            .with_data(DenseND::from_vec(vec![1.0, 1.0, 3.0, 3.0, 5.0, 5.0], &[3, 2]).unwrap())
            .unwrap();
        let out = sequential()
            .apply(
                |s| {
                    let diff = s[0].data().zip_with(s[1].data(), |a, b| a - b)?;
                    Ok(Some(LabeledTensor::scalar(diff.sum())))
                },
                &[&target, &prediction],
                &["presentation"],
            )
            .unwrap()
            .unwrap();
        assert_eq!(out.values(), vec![1.0, 1.0, 1.0]);
    }

    #[test]
    fn test_missing_axis_is_axis_mismatch() {
        let err = sequential()
            .apply(|s| Ok(Some(s[0].clone())), &[&responses()], &["time_bin"])
            .unwrap_err();
        assert!(matches!(err, LabelError::AxisMismatch { .. }));
    }

    #[test]
    fn test_length_disagreement_is_shape_mismatch() {
        let short = responses().select_along("presentation", &[0, 1]).unwrap();
        let err = sequential()
            .apply(|s| Ok(Some(s[0].clone())), &[&responses(), &short], &["presentation"])
            .unwrap_err();
        assert!(matches!(err, LabelError::ShapeMismatch { .. }));
    }

    #[test]
    fn test_callable_error_aborts() {
        let err = sequential()
            .apply(
                |s| {
                    if s[0].data().sum() > 6.0 {
                        Err(LabelError::strategy("slice", anyhow::anyhow!("too large")))
                    } else {
                        Ok(Some(s[0].clone()))
                    }
                },
                &[&responses()],
                &["presentation"],
            )
            .unwrap_err();
        assert!(matches!(err, LabelError::Strategy { .. }));
    }

    #[test]
    fn test_untouched_attrs_pass_through() {
        let t = responses().with_attr("unit", Label::from("spikes/s"));
        let out = sequential()
            .apply(|s| Ok(Some(s[0].clone())), &[&t], &["presentation"])
            .unwrap()
            .unwrap();
        assert_eq!(out.attr("unit").and_then(Attr::as_value), Some(&Label::from("spikes/s")));
    }

    #[test]
    fn test_no_axes_calls_once() {
        let out = sequential()
            .apply(
                |s| Ok(Some(LabeledTensor::scalar(s[0].data().sum()))),
                &[&responses()],
                &[],
            )
            .unwrap()
            .unwrap();
        assert_eq!(out.values(), vec![21.0]);
    }
}
