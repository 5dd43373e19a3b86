//! Core type definitions for labeled tensors.
//!
//! - Type aliases for tensor dimensions ([`Rank`], [`Shape`])
//! - Coordinate values ([`Label`]) and named coordinate arrays ([`Coordinate`])
//! - Axis metadata ([`AxisMeta`]) for symbolic axis naming
//! - The per-axis coordinate variant ([`CoordinateSet`])
//!
//! # Examples
//!
//! ```
//! use tenlab_core::{AxisMeta, Coordinate, Label};
//!
//! let axis = AxisMeta::new("neuroid", 2);
//! let ids = Coordinate::new_1d("neuroid_id", "neuroid", vec![10, 20]);
//!
//! assert_eq!(axis.name, "neuroid");
//! assert!(ids.is_on_axis("neuroid"));
//! assert_eq!(ids.to_vec(), vec![Label::Int(10), Label::Int(20)]);
//! ```

use crate::error::{LabelError, LabelResult};
use scirs2_core::ndarray_ext::{Array, ArrayD, Axis, IxDyn};
use smallvec::SmallVec;
use std::cmp::Ordering;
use std::fmt;

/// Type alias for tensor rank (number of dimensions).
pub type Rank = usize;

/// Shape type using SmallVec to avoid heap allocation for common cases.
///
/// Labeled tensors rarely exceed six axes; higher ranks spill to the heap.
pub type Shape = SmallVec<[usize; 6]>;

/// A single coordinate value.
///
/// Labels are totally ordered so that sorting by a coordinate is
/// deterministic: numbers sort before strings, integers and floats compare
/// numerically (an integer sorts before an equal float), and floats use IEEE
/// total ordering.
#[derive(Clone, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Label {
    /// Integer label (unit ids, indices)
    Int(i64),
    /// Floating point label (time bins, latencies)
    Float(f64),
    /// String label (stimulus ids, region names)
    Str(String),
}

impl Label {
    fn variant_rank(&self) -> u8 {
        match self {
            Label::Int(_) => 0,
            Label::Float(_) => 1,
            Label::Str(_) => 2,
        }
    }

    /// Borrow the string payload, if any.
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Label::Str(s) => Some(s),
            _ => None,
        }
    }
}

impl Ord for Label {
    fn cmp(&self, other: &Self) -> Ordering {
        match (self, other) {
            (Label::Int(a), Label::Int(b)) => a.cmp(b),
            (Label::Float(a), Label::Float(b)) => a.total_cmp(b),
            (Label::Int(a), Label::Float(b)) => (*a as f64)
                .total_cmp(b)
                .then(Ordering::Less),
            (Label::Float(a), Label::Int(b)) => a
                .total_cmp(&(*b as f64))
                .then(Ordering::Greater),
            (Label::Str(a), Label::Str(b)) => a.cmp(b),
            _ => self.variant_rank().cmp(&other.variant_rank()),
        }
    }
}

impl PartialOrd for Label {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl PartialEq for Label {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for Label {}

impl fmt::Display for Label {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Label::Int(v) => write!(f, "{}", v),
            Label::Float(v) => write!(f, "{}", v),
            Label::Str(v) => write!(f, "{}", v),
        }
    }
}

impl From<i64> for Label {
    fn from(v: i64) -> Self {
        Label::Int(v)
    }
}

impl From<i32> for Label {
    fn from(v: i32) -> Self {
        Label::Int(v as i64)
    }
}

impl From<usize> for Label {
    fn from(v: usize) -> Self {
        Label::Int(v as i64)
    }
}

impl From<f64> for Label {
    fn from(v: f64) -> Self {
        Label::Float(v)
    }
}

impl From<&str> for Label {
    fn from(v: &str) -> Self {
        Label::Str(v.to_string())
    }
}

impl From<String> for Label {
    fn from(v: String) -> Self {
        Label::Str(v)
    }
}

/// Metadata for a single tensor axis.
///
/// # Examples
///
/// ```
/// use tenlab_core::AxisMeta;
///
/// let axis = AxisMeta::new("presentation", 100);
/// assert_eq!(axis.name, "presentation");
/// assert_eq!(axis.size, 100);
/// ```
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct AxisMeta {
    /// Symbolic name for this axis (e.g., "presentation", "neuroid")
    pub name: String,
    /// Size of this dimension (number of elements along this axis)
    pub size: usize,
}

impl AxisMeta {
    /// Create new axis metadata.
    pub fn new(name: impl Into<String>, size: usize) -> Self {
        Self {
            name: name.into(),
            size,
        }
    }
}

/// A named array of labels attached to zero or more axes of a tensor.
///
/// The label array has one dimension per entry of `dims`, in the same order.
/// A coordinate with no dims is a scalar coordinate, which is what remains of
/// a 1-D coordinate after its axis has been fixed to an index.
#[derive(Clone, Debug, PartialEq)]
pub struct Coordinate {
    name: String,
    dims: Vec<String>,
    labels: ArrayD<Label>,
}

impl Coordinate {
    /// Create a coordinate spanning `dims`.
    ///
    /// # Errors
    ///
    /// Returns [`LabelError::ShapeMismatch`] if the label array rank differs
    /// from the number of dims.
    pub fn new(
        name: impl Into<String>,
        dims: Vec<String>,
        labels: ArrayD<Label>,
    ) -> LabelResult<Self> {
        let name = name.into();
        if labels.ndim() != dims.len() {
            return Err(LabelError::ShapeMismatch {
                context: format!("coordinate '{}'", name),
                expected: vec![dims.len()],
                actual: vec![labels.ndim()],
            });
        }
        Ok(Self { name, dims, labels })
    }

    /// Create a coordinate indexing a single axis.
    pub fn new_1d<L>(name: impl Into<String>, dim: impl Into<String>, labels: Vec<L>) -> Self
    where
        L: Into<Label>,
    {
        let labels: Vec<Label> = labels.into_iter().map(Into::into).collect();
        Self {
            name: name.into(),
            dims: vec![dim.into()],
            labels: Array::from_vec(labels).into_dyn(),
        }
    }

    /// Create a scalar coordinate.
    pub fn scalar(name: impl Into<String>, label: impl Into<Label>) -> Self {
        Self {
            name: name.into(),
            dims: Vec::new(),
            labels: Array::from_elem(IxDyn(&[]), label.into()),
        }
    }

    /// Coordinate name
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Axes spanned by this coordinate, in label-array order
    pub fn dims(&self) -> &[String] {
        &self.dims
    }

    /// The label array
    pub fn labels(&self) -> &ArrayD<Label> {
        &self.labels
    }

    /// Labels in row-major order
    pub fn to_vec(&self) -> Vec<Label> {
        self.labels.iter().cloned().collect()
    }

    /// Number of labels
    pub fn len(&self) -> usize {
        self.labels.len()
    }

    /// Whether the coordinate holds no labels
    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }

    /// True if this coordinate indexes exactly `axis` and nothing else.
    pub fn is_on_axis(&self, axis: &str) -> bool {
        self.dims.len() == 1 && self.dims[0] == axis
    }

    /// True if `axis` is one of the dims this coordinate spans.
    pub fn spans(&self, axis: &str) -> bool {
        self.dims.iter().any(|d| d == axis)
    }

    /// Size of the label array along each dim
    pub fn shape(&self) -> &[usize] {
        self.labels.shape()
    }

    fn position(&self, axis: &str) -> Option<usize> {
        self.dims.iter().position(|d| d == axis)
    }

    /// Fix `axis` to `index`, removing it from the coordinate's dims.
    ///
    /// Coordinates not spanning `axis` are returned unchanged.
    pub fn isel(&self, axis: &str, index: usize) -> Self {
        match self.position(axis) {
            Some(pos) => {
                let mut dims = self.dims.clone();
                dims.remove(pos);
                Self {
                    name: self.name.clone(),
                    dims,
                    labels: self.labels.index_axis(Axis(pos), index).to_owned(),
                }
            }
            None => self.clone(),
        }
    }

    /// Reorder or subset the labels along `axis` by position.
    pub fn select(&self, axis: &str, indices: &[usize]) -> Self {
        match self.position(axis) {
            Some(pos) => Self {
                name: self.name.clone(),
                dims: self.dims.clone(),
                labels: self.labels.select(Axis(pos), indices),
            },
            None => self.clone(),
        }
    }

    /// Rename one of the spanned dims.
    pub fn rename_dim(&self, from: &str, to: &str) -> Self {
        let dims = self
            .dims
            .iter()
            .map(|d| if d == from { to.to_string() } else { d.clone() })
            .collect();
        Self {
            name: self.name.clone(),
            dims,
            labels: self.labels.clone(),
        }
    }

    /// Rename the coordinate itself.
    pub fn renamed(&self, name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            dims: self.dims.clone(),
            labels: self.labels.clone(),
        }
    }

    /// Move `axis` to the front of the label array.
    pub(crate) fn leading(&self, axis: &str) -> Self {
        match self.position(axis) {
            Some(0) | None => self.clone(),
            Some(pos) => {
                let mut order: Vec<usize> = (0..self.dims.len()).collect();
                order.remove(pos);
                order.insert(0, pos);
                let dims = order.iter().map(|&i| self.dims[i].clone()).collect();
                Self {
                    name: self.name.clone(),
                    dims,
                    labels: self.labels.clone().permuted_axes(IxDyn(&order)),
                }
            }
        }
    }

    /// Insert `axis` as a new leading dim of length 1.
    pub(crate) fn with_leading_axis(&self, axis: &str) -> Self {
        let mut dims = Vec::with_capacity(self.dims.len() + 1);
        dims.push(axis.to_string());
        dims.extend(self.dims.iter().cloned());
        Self {
            name: self.name.clone(),
            dims,
            labels: self.labels.clone().insert_axis(Axis(0)),
        }
    }

    /// Concatenate coordinates along their leading axis.
    pub(crate) fn concat_leading(parts: &[Coordinate]) -> LabelResult<Self> {
        let first = parts.first().ok_or_else(|| {
            LabelError::Tensor(anyhow::anyhow!("Cannot concatenate empty coordinate list"))
        })?;
        for part in parts.iter().skip(1) {
            if part.dims != first.dims {
                return Err(LabelError::CoordinateMismatch {
                    coord: first.name.clone(),
                    reason: format!(
                        "dims {:?} and {:?} cannot be concatenated",
                        first.dims, part.dims
                    ),
                });
            }
        }
        let views: Vec<_> = parts.iter().map(|c| c.labels.view()).collect();
        let labels = scirs2_core::ndarray::concatenate(Axis(0), &views)
            .map_err(|e| LabelError::Tensor(e.into()))?;
        Ok(Self {
            name: first.name.clone(),
            dims: first.dims.clone(),
            labels,
        })
    }
}

/// The coordinates attached to a single axis, tagged by how many there are.
///
/// The single-coordinate case is an explicit variant because some packaging
/// steps treat an axis with exactly one coordinate differently from one with
/// several (see the regression adapter in `tenlab-metrics`).
#[derive(Clone, Debug, PartialEq)]
pub enum CoordinateSet<C> {
    /// No coordinate is attached to the axis
    NoCoordinate,
    /// Exactly one coordinate is attached to the axis
    SingleCoordinate(C),
    /// Two or more coordinates are attached to the axis
    MultipleCoordinates(Vec<C>),
}

impl<C> CoordinateSet<C> {
    /// Classify a list of coordinates.
    pub fn from_vec(mut coords: Vec<C>) -> Self {
        match coords.len() {
            0 => CoordinateSet::NoCoordinate,
            1 => match coords.pop() {
                Some(c) => CoordinateSet::SingleCoordinate(c),
                None => CoordinateSet::NoCoordinate,
            },
            _ => CoordinateSet::MultipleCoordinates(coords),
        }
    }

    /// Number of coordinates in the set
    pub fn len(&self) -> usize {
        match self {
            CoordinateSet::NoCoordinate => 0,
            CoordinateSet::SingleCoordinate(_) => 1,
            CoordinateSet::MultipleCoordinates(cs) => cs.len(),
        }
    }

    /// True for [`CoordinateSet::NoCoordinate`]
    pub fn is_empty(&self) -> bool {
        matches!(self, CoordinateSet::NoCoordinate)
    }

    /// Iterate over the coordinates in the set
    pub fn iter(&self) -> std::slice::Iter<'_, C> {
        match self {
            CoordinateSet::NoCoordinate => <&[C]>::default().iter(),
            CoordinateSet::SingleCoordinate(c) => std::slice::from_ref(c).iter(),
            CoordinateSet::MultipleCoordinates(cs) => cs.iter(),
        }
    }
}
