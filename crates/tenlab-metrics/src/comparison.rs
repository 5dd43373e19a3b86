//! Pairwise comparison adapter
//!
//! [`PairwiseComparisonAdapter`] aligns a prediction to its target's axis
//! order and lines the two up by their stimulus and unit coordinates. It
//! then calls a [`Comparison`] strategy once per unit and collects the
//! statistics into a [`Score`] along the unit axis.

use crate::defaults::MetricDefaults;
use crate::score::Score;
use scirs2_core::numeric::Num;
use tenlab_core::{AxisAligner, LabelError, LabelResult, LabeledTensor};

/// Outcome of comparing one target slice with one prediction slice.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ComparisonOutput<T> {
    /// The comparison statistic (e.g. a correlation coefficient)
    pub statistic: T,
    /// Significance of the statistic
    pub p_value: T,
}

/// A pairwise comparison strategy.
///
/// Closures `Fn(&LabeledTensor<T>, &LabeledTensor<T>) -> anyhow::Result<(T, T)>`
/// returning `(statistic, p_value)` implement this trait.
pub trait Comparison<T> {
    /// Compare a target slice with the matching prediction slice.
    fn compare(
        &self,
        target: &LabeledTensor<T>,
        prediction: &LabeledTensor<T>,
    ) -> anyhow::Result<ComparisonOutput<T>>;
}

impl<T, F> Comparison<T> for F
where
    F: Fn(&LabeledTensor<T>, &LabeledTensor<T>) -> anyhow::Result<(T, T)>,
{
    fn compare(
        &self,
        target: &LabeledTensor<T>,
        prediction: &LabeledTensor<T>,
    ) -> anyhow::Result<ComparisonOutput<T>> {
        let (statistic, p_value) = self(target, prediction)?;
        Ok(ComparisonOutput { statistic, p_value })
    }
}

/// Runs a [`Comparison`] per unit of aligned prediction/target tensors.
///
/// # Examples
///
/// ```
/// use tenlab_core::LabeledTensor;
/// use tenlab_metrics::PairwiseComparisonAdapter;
///
/// let target = LabeledTensor::from_vec(vec![1.0, 2.0, 3.0, 4.0], &[("presentation", 2), ("neuroid", 2)])
///     .unwrap()
///     .with_coord("stimulus_id", "presentation", vec!["a", "b"])
///     .unwrap()
///     .with_coord("neuroid_id", "neuroid", vec![1, 2])
///     .unwrap();
///
/// let adapter = PairwiseComparisonAdapter::new(
///     |t: &LabeledTensor<f64>, p: &LabeledTensor<f64>| -> anyhow::Result<(f64, f64)> {
///         let diff = t.data().zip_with(p.data(), |a, b| (a - b).abs())?;
///         Ok((diff.sum(), 1.0))
///     },
/// );
/// let score = adapter.compare(&target, &target).unwrap();
///
/// assert_eq!(score.dims(), vec!["neuroid"]);
/// assert_eq!(score.values(), vec![0.0, 0.0]);
/// ```
#[derive(Debug, Clone)]
pub struct PairwiseComparisonAdapter<C> {
    comparison: C,
    comparison_coord: String,
    collapse_coord: String,
}

impl<C> PairwiseComparisonAdapter<C> {
    /// Wrap `comparison`, pairing by stimulus id and collapsing by unit id.
    pub fn new(comparison: C) -> Self {
        Self::with_defaults(comparison, &MetricDefaults::default())
    }

    /// Wrap `comparison`, taking coordinate names from `defaults`.
    pub fn with_defaults(comparison: C, defaults: &MetricDefaults) -> Self {
        Self {
            comparison,
            comparison_coord: defaults.stimulus_coord.clone(),
            collapse_coord: defaults.neuroid_coord.clone(),
        }
    }

    /// Set the coordinate the strategy compares along
    pub fn with_comparison_coord(mut self, coord: impl Into<String>) -> Self {
        self.comparison_coord = coord.into();
        self
    }

    /// Set the coordinate whose axis is iterated and kept in the score
    pub fn with_collapse_coord(mut self, coord: impl Into<String>) -> Self {
        self.collapse_coord = coord.into();
        self
    }

    /// The coordinate the strategy compares along
    pub fn comparison_coord(&self) -> &str {
        &self.comparison_coord
    }

    /// The coordinate whose axis is iterated
    pub fn collapse_coord(&self) -> &str {
        &self.collapse_coord
    }

    /// Compare `prediction` with `target`, one call per unit.
    ///
    /// The prediction is first aligned to the target's axis order. Both
    /// tensors are then sorted by the comparison and collapse coordinates,
    /// which must agree label for label. The strategy receives
    /// `(target slice, prediction slice)` for each position along the
    /// collapse coordinate's axis; p-values are discarded. The score has that
    /// axis alone and carries every target coordinate indexing it.
    ///
    /// # Errors
    ///
    /// - [`LabelError::AxisMismatch`] if the axis-name sets differ
    /// - [`LabelError::MissingCoordinate`] if a coordinate is absent
    /// - [`LabelError::AxisArity`] if either coordinate is not 1-D
    /// - [`LabelError::CoordinateMismatch`] if the sorted labels differ
    /// - [`LabelError::Strategy`] if the strategy fails
    pub fn compare<T>(
        &self,
        prediction: &LabeledTensor<T>,
        target: &LabeledTensor<T>,
    ) -> LabelResult<Score<T>>
    where
        C: Comparison<T>,
        T: Clone + Num,
    {
        let prediction = AxisAligner::new(&target.dims())?.align(prediction)?;

        let collapse = target.coord(&self.collapse_coord)?;
        let axis = match collapse.dims() {
            [axis] => axis.clone(),
            dims => {
                return Err(LabelError::AxisArity {
                    coord: collapse.name().to_string(),
                    dims: dims.to_vec(),
                })
            }
        };
        let axis = axis.as_str();

        let keys = [self.comparison_coord.as_str(), self.collapse_coord.as_str()];
        let prediction = prediction.sort_by(&keys)?;
        let target = target.sort_by(&keys)?;
        for key in keys {
            let expected = target.coord(key)?;
            let actual = prediction.coord(key)?;
            if expected.labels() != actual.labels() {
                tracing::debug!(
                    coord = key,
                    target = expected.len(),
                    prediction = actual.len(),
                    "labels differ"
                );
                return Err(LabelError::coordinate_mismatch(
                    key,
                    "prediction and target labels differ after sorting",
                ));
            }
        }

        let size = target.size_of(axis)?;
        let mut statistics = Vec::with_capacity(size);
        for i in 0..size {
            let target_slice = target.isel(axis, i)?;
            let prediction_slice = prediction.isel(axis, i)?;
            let output = self
                .comparison
                .compare(&target_slice, &prediction_slice)
                .map_err(|e| LabelError::strategy("compare", e))?;
            statistics.push(output.statistic);
        }
        tracing::debug!(axis, units = size, "compared per unit");

        let mut score = LabeledTensor::from_vec(statistics, &[(axis, size)])?;
        for coord in target.coords().values().filter(|c| c.is_on_axis(axis)) {
            score = score.with_coordinate(coord.clone())?;
        }
        Ok(Score::new(score))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::{Cell, RefCell};
    use tenlab_core::Label;

    fn target() -> LabeledTensor<f64> {
        LabeledTensor::from_vec(
            vec![1.0, 2.0, 3.0, 4.0, 5.0, 6.0],
            &[("presentation", 3), ("neuroid", 2)],
        )
        .unwrap()
        .with_coord("stimulus_id", "presentation", vec!["a", "b", "c"])
        .unwrap()
        .with_coord("neuroid_id", "neuroid", vec![10, 20])
        .unwrap()
        .with_coord("region", "neuroid", vec!["V4", "IT"])
        .unwrap()
    }

    fn sum_of_products(t: &LabeledTensor<f64>, p: &LabeledTensor<f64>) -> anyhow::Result<(f64, f64)> {
        Ok((t.data().zip_with(p.data(), |a, b| a * b)?.sum(), 0.5))
    }

    #[test]
    fn test_score_along_collapse_axis() {
        let adapter = PairwiseComparisonAdapter::new(sum_of_products);
        let score = adapter.compare(&target(), &target()).unwrap();
        assert_eq!(score.dims(), vec!["neuroid"]);
        // 1+9+25, 4+16+36
        assert_eq!(score.values(), vec![35.0, 56.0]);
        assert_eq!(
            score.coord("region").unwrap().to_vec(),
            vec![Label::from("V4"), Label::from("IT")]
        );
        assert!(score.coord("stimulus_id").is_err());
    }

    #[test]
    fn test_shuffled_prediction_is_realigned() {
        let prediction = target()
            .select_along("presentation", &[2, 0, 1])
            .unwrap()
            .select_along("neuroid", &[1, 0])
            .unwrap();
        let adapter = PairwiseComparisonAdapter::new(sum_of_products);
        let score = adapter.compare(&prediction, &target()).unwrap();
        assert_eq!(score.values(), vec![35.0, 56.0]);
    }

    #[test]
    fn test_strategy_sees_target_first() {
        let seen = RefCell::new(Vec::new());
        let adapter = PairwiseComparisonAdapter::new(
            |t: &LabeledTensor<f64>, p: &LabeledTensor<f64>| -> anyhow::Result<(f64, f64)> {
                seen.borrow_mut().push((t.values()[0], p.values()[0]));
                Ok((0.0, 1.0))
            },
        );
        let prediction = target().with_data(target().data().map(|x| -x)).unwrap();
        adapter.compare(&prediction, &target()).unwrap();
        assert_eq!(*seen.borrow(), vec![(1.0, -1.0), (2.0, -2.0)]);
    }

    #[test]
    fn test_label_mismatch() {
        let prediction = target()
            .with_coord("stimulus_id", "presentation", vec!["a", "b", "z"])
            .unwrap();
        let adapter = PairwiseComparisonAdapter::new(sum_of_products);
        let err = adapter.compare(&prediction, &target()).unwrap_err();
        match err {
            LabelError::CoordinateMismatch { coord, .. } => assert_eq!(coord, "stimulus_id"),
            other => panic!("unexpected error {other:?}"),
        }
    }

    fn absolute_difference(
        t: &LabeledTensor<f64>,
        p: &LabeledTensor<f64>,
    ) -> anyhow::Result<(f64, f64)> {
        Ok((t.data().zip_with(p.data(), |a, b| (a - b).abs())?.sum(), 1.0))
    }

    #[test]
    fn test_transposed_prediction_is_aligned() {
        let target = LabeledTensor::from_vec(
            (1..=8).map(|v| v as f64).collect(),
            &[("presentation", 2), ("time_bin", 2), ("neuroid", 2)],
        )
        .unwrap()
        .with_coord("stimulus_id", "presentation", vec!["a", "b"])
        .unwrap()
        .with_coord("neuroid_id", "neuroid", vec![10, 20])
        .unwrap();
        let prediction = target
            .transpose(&["time_bin", "presentation", "neuroid"])
            .unwrap();

        let adapter = PairwiseComparisonAdapter::new(absolute_difference);
        let score = adapter.compare(&prediction, &target).unwrap();
        assert_eq!(score.dims(), vec!["neuroid"]);
        assert_eq!(score.values(), vec![0.0, 0.0]);
    }

    #[test]
    fn test_axis_set_mismatch_fails_before_strategy() {
        let calls = Cell::new(0);
        let adapter = PairwiseComparisonAdapter::new(
            |_: &LabeledTensor<f64>, _: &LabeledTensor<f64>| -> anyhow::Result<(f64, f64)> {
                calls.set(calls.get() + 1);
                Ok((0.0, 1.0))
            },
        );
        let prediction = LabeledTensor::from_vec(vec![0.0; 6], &[("presentation", 3), ("unit", 2)])
            .unwrap()
            .with_coord("stimulus_id", "presentation", vec!["a", "b", "c"])
            .unwrap()
            .with_coord("neuroid_id", "unit", vec![10, 20])
            .unwrap();
        let err = adapter.compare(&prediction, &target()).unwrap_err();
        match err {
            LabelError::AxisMismatch { expected, actual } => {
                assert_eq!(expected, vec!["presentation", "neuroid"]);
                assert_eq!(actual, vec!["presentation", "unit"]);
            }
            other => panic!("unexpected error {other:?}"),
        }
        assert_eq!(calls.get(), 0);
    }

    #[test]
    fn test_collapse_coord_spanning_two_axes() {
        let calls = Cell::new(0);
        let adapter = PairwiseComparisonAdapter::new(
            |_: &LabeledTensor<f64>, _: &LabeledTensor<f64>| -> anyhow::Result<(f64, f64)> {
                calls.set(calls.get() + 1);
                Ok((0.0, 1.0))
            },
        )
        .with_collapse_coord("response_id");
        let labels = scirs2_core::ndarray_ext::Array::from_shape_vec(
            scirs2_core::ndarray_ext::IxDyn(&[3, 2]),
            (0..6).map(Label::Int).collect(),
        )
        .unwrap();
        let target = target()
            .with_coord_nd("response_id", &["presentation", "neuroid"], labels)
            .unwrap();

        let err = adapter.compare(&target, &target).unwrap_err();
        match err {
            LabelError::AxisArity { coord, dims } => {
                assert_eq!(coord, "response_id");
                assert_eq!(dims, vec!["presentation", "neuroid"]);
            }
            other => panic!("unexpected error {other:?}"),
        }
        assert_eq!(calls.get(), 0);
    }

    #[test]
    fn test_custom_coordinates() {
        let adapter = PairwiseComparisonAdapter::new(sum_of_products).with_collapse_coord("region");
        let score = adapter.compare(&target(), &target()).unwrap();
        // sorted by region: IT then V4
        assert_eq!(score.values(), vec![56.0, 35.0]);
        assert_eq!(adapter.comparison_coord(), "stimulus_id");
    }

    #[test]
    fn test_strategy_error_wrapped() {
        let adapter = PairwiseComparisonAdapter::new(
            |_: &LabeledTensor<f64>, _: &LabeledTensor<f64>| -> anyhow::Result<(f64, f64)> {
                anyhow::bail!("constant input")
            },
        );
        let err = adapter.compare(&target(), &target()).unwrap_err();
        assert!(matches!(err, LabelError::Strategy { .. }));
    }
}
