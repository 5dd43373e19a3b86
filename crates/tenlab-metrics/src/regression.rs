//! Alignment-checking regression adapter
//!
//! A [`Regression`] strategy only ever sees tensors laid out in the expected
//! axis order and sorted by stimulus. It returns a bare [`DenseND`] from
//! `predict`; [`RegressionAdapter`] re-packages it with the source's
//! stimulus-side coordinates and the unit coordinates captured from the
//! training target.

use crate::defaults::MetricDefaults;
use scirs2_core::numeric::Num;
use tenlab_core::{
    AxisAligner, Coordinate, CoordinateSet, DenseND, LabelError, LabelResult, LabeledTensor,
};

/// A fit/predict regression strategy.
///
/// Inputs are already aligned to the adapter's expected axes. Strategies
/// report failures through `anyhow`; the adapter wraps them in
/// [`LabelError::Strategy`].
pub trait Regression<T> {
    /// Learn a mapping from `source` to `target`.
    ///
    /// Both tensors are sorted by the stimulus coordinate, so row `i` of
    /// each refers to the same stimulus.
    fn fit(&mut self, source: &LabeledTensor<T>, target: &LabeledTensor<T>) -> anyhow::Result<()>;

    /// Predict target values for `source`.
    ///
    /// The result must have the source's shape except along the unit axis,
    /// whose length must equal the training target's.
    fn predict(&self, source: &LabeledTensor<T>) -> anyhow::Result<DenseND<T>>;
}

/// Unit-axis metadata captured from the training target.
#[derive(Clone, Debug, PartialEq)]
struct FittedTarget {
    neuroid_coords: CoordinateSet<Coordinate>,
    neuroid_size: usize,
}

/// Wraps a [`Regression`] with axis checks and prediction re-packaging.
///
/// # Examples
///
/// ```
/// use tenlab_core::{DenseND, Label, LabeledTensor};
/// use tenlab_metrics::{Regression, RegressionAdapter};
///
/// /// Predicts the training mean of every unit.
/// struct MeanRegression(Vec<f64>);
///
/// impl Regression<f64> for MeanRegression {
///     fn fit(&mut self, _: &LabeledTensor<f64>, target: &LabeledTensor<f64>) -> anyhow::Result<()> {
///         let n = target.shape()[0] as f64;
///         self.0 = target.data().sum_axis(0, false)?.to_vec().iter().map(|s| s / n).collect();
///         Ok(())
///     }
///
///     fn predict(&self, source: &LabeledTensor<f64>) -> anyhow::Result<DenseND<f64>> {
///         let rows = source.shape()[0];
///         let values = (0..rows).flat_map(|_| self.0.iter().copied()).collect();
///         DenseND::from_vec(values, &[rows, self.0.len()])
///     }
/// }
///
/// let source = LabeledTensor::from_vec(vec![0.0; 3], &[("presentation", 3), ("neuroid", 1)])
///     .unwrap()
///     .with_coord("stimulus_id", "presentation", vec!["a", "b", "c"])
///     .unwrap();
/// let target = LabeledTensor::from_vec(
///     vec![1.0, 10.0, 2.0, 20.0, 3.0, 30.0],
///     &[("presentation", 3), ("neuroid", 2)],
/// )
/// .unwrap()
/// .with_coord("stimulus_id", "presentation", vec!["a", "b", "c"])
/// .unwrap()
/// .with_coord("neuroid_id", "neuroid", vec![10, 20])
/// .unwrap();
///
/// let mut adapter = RegressionAdapter::new(MeanRegression(Vec::new())).unwrap();
/// adapter.fit(&source, &target).unwrap();
/// let prediction = adapter.predict(&source).unwrap();
///
/// assert_eq!(prediction.dims(), vec!["presentation", "neuroid"]);
/// assert_eq!(prediction.values(), vec![2.0, 20.0, 2.0, 20.0, 2.0, 20.0]);
/// assert_eq!(prediction.coord("neuroid_id").unwrap().to_vec(), vec![Label::Int(10), Label::Int(20)]);
/// ```
#[derive(Debug)]
pub struct RegressionAdapter<R> {
    regression: R,
    aligner: AxisAligner,
    defaults: MetricDefaults,
    fitted: Option<FittedTarget>,
}

impl<R> RegressionAdapter<R> {
    /// Wrap `regression` using the default axis and coordinate names.
    pub fn new(regression: R) -> LabelResult<Self> {
        Self::with_defaults(regression, MetricDefaults::default())
    }

    /// Wrap `regression` with custom names.
    ///
    /// # Errors
    ///
    /// [`LabelError::AxisMismatch`] if `defaults.expected_dims` repeats a name.
    pub fn with_defaults(regression: R, defaults: MetricDefaults) -> LabelResult<Self> {
        Ok(Self {
            aligner: AxisAligner::new(&defaults.expected_dims)?,
            regression,
            defaults,
            fitted: None,
        })
    }

    /// The wrapped strategy
    pub fn regression(&self) -> &R {
        &self.regression
    }

    /// The naming scheme in use
    pub fn defaults(&self) -> &MetricDefaults {
        &self.defaults
    }

    /// Whether `fit` has completed successfully
    pub fn is_fitted(&self) -> bool {
        self.fitted.is_some()
    }

    /// Unit coordinates captured by the last successful `fit`
    pub fn target_neuroid_coords(&self) -> Option<&CoordinateSet<Coordinate>> {
        self.fitted.as_ref().map(|f| &f.neuroid_coords)
    }

    /// Fit the wrapped strategy on aligned, stimulus-sorted tensors.
    ///
    /// Every coordinate of the aligned target touching the unit axis is
    /// captured for re-packaging predictions. A failed fit leaves the
    /// adapter unfitted.
    ///
    /// # Errors
    ///
    /// - [`LabelError::AxisMismatch`] if either tensor has the wrong axis set
    /// - [`LabelError::MissingCoordinate`] if the stimulus coordinate is absent
    /// - [`LabelError::AxisArity`] if a target coordinate spans the unit axis
    ///   together with another axis
    /// - [`LabelError::Strategy`] if the strategy fails
    pub fn fit<T>(&mut self, source: &LabeledTensor<T>, target: &LabeledTensor<T>) -> LabelResult<()>
    where
        R: Regression<T>,
        T: Clone + Num,
    {
        self.fitted = None;
        let stimulus = [self.defaults.stimulus_coord.as_str()];
        let source = self.aligner.align(source)?.sort_by(&stimulus)?;
        let target = self.aligner.align(target)?.sort_by(&stimulus)?;
        let captured = self.capture_neuroid_coords(&target)?;

        tracing::debug!(
            source_shape = ?source.shape(),
            target_shape = ?target.shape(),
            neuroid_coords = captured.neuroid_coords.len(),
            "fitting regression"
        );
        self.regression
            .fit(&source, &target)
            .map_err(|e| LabelError::strategy("fit", e))?;
        self.fitted = Some(captured);
        Ok(())
    }

    fn capture_neuroid_coords<T>(&self, target: &LabeledTensor<T>) -> LabelResult<FittedTarget>
    where
        T: Clone + Num,
    {
        let neuroid_dim = &self.defaults.neuroid_dim;
        let mut coords = Vec::new();
        for coord in target.coords().values().filter(|c| c.spans(neuroid_dim)) {
            if !coord.is_on_axis(neuroid_dim) {
                return Err(LabelError::AxisArity {
                    coord: coord.name().to_string(),
                    dims: coord.dims().to_vec(),
                });
            }
            coords.push(coord.clone());
        }
        Ok(FittedTarget {
            neuroid_coords: CoordinateSet::from_vec(coords),
            neuroid_size: target.size_of(neuroid_dim)?,
        })
    }

    /// Predict with the wrapped strategy and re-package the result.
    ///
    /// The output has the expected axis order. It carries every coordinate of
    /// the aligned source that does not touch the unit axis, plus the unit
    /// coordinates captured at fit time (these win over same-named source
    /// coordinates).
    ///
    /// # Errors
    ///
    /// - [`LabelError::UnfittedModel`] before a successful `fit`
    /// - [`LabelError::AxisMismatch`] if `source` has the wrong axis set
    /// - [`LabelError::Strategy`] if the strategy fails
    /// - [`LabelError::ShapeMismatch`] if the raw prediction has the wrong shape
    pub fn predict<T>(&self, source: &LabeledTensor<T>) -> LabelResult<LabeledTensor<T>>
    where
        R: Regression<T>,
        T: Clone + Num,
    {
        let fitted = self.fitted.as_ref().ok_or(LabelError::UnfittedModel)?;
        let source = self.aligner.align(source)?;
        let raw = self
            .regression
            .predict(&source)
            .map_err(|e| LabelError::strategy("predict", e))?;
        self.package(raw, &source, fitted)
    }

    fn package<T>(
        &self,
        raw: DenseND<T>,
        source: &LabeledTensor<T>,
        fitted: &FittedTarget,
    ) -> LabelResult<LabeledTensor<T>>
    where
        T: Clone + Num,
    {
        let neuroid_dim = self.defaults.neuroid_dim.as_str();
        let expected: Vec<usize> = source
            .axes()
            .iter()
            .map(|a| {
                if a.name == neuroid_dim {
                    fitted.neuroid_size
                } else {
                    a.size
                }
            })
            .collect();
        if raw.shape() != expected.as_slice() {
            return Err(LabelError::ShapeMismatch {
                context: "raw prediction".to_string(),
                expected,
                actual: raw.shape_vec(),
            });
        }

        // A lone unit coordinate names the axis while coordinates are
        // attached; the axis is renamed back afterwards.
        let level_dim = match &fitted.neuroid_coords {
            CoordinateSet::SingleCoordinate(c) => c.name(),
            _ => neuroid_dim,
        };
        let dims: Vec<&str> = source
            .dims()
            .into_iter()
            .map(|d| if d == neuroid_dim { level_dim } else { d })
            .collect();

        let mut prediction = LabeledTensor::new(raw, &dims)?;
        for coord in source.coords().values().filter(|c| !c.spans(neuroid_dim)) {
            prediction = prediction.with_coordinate(coord.clone())?;
        }
        for coord in fitted.neuroid_coords.iter() {
            prediction = prediction.with_coordinate(coord.rename_dim(neuroid_dim, level_dim))?;
        }
        if level_dim != neuroid_dim {
            prediction = prediction.rename_axis(level_dim, neuroid_dim)?;
        }

        tracing::debug!(
            shape = ?prediction.shape(),
            coords = prediction.coords().len(),
            "packaged prediction"
        );
        Ok(prediction)
    }
}
