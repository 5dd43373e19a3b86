//! Labeled tensors
//!
//! A [`LabeledTensor`] is a [`DenseND`] whose axes carry names, plus named
//! coordinate arrays attached to those axes and a tree of attributes.
//! Operations never mutate in place: every method returns a new tensor.
//!
//! # Examples
//!
//! ```
//! use tenlab_core::{Label, LabeledTensor};
//!
//! let t = LabeledTensor::from_vec(
//!     vec![1.0, 2.0, 3.0, 4.0, 5.0, 6.0],
//!     &[("presentation", 3), ("neuroid", 2)],
//! )
//! .unwrap()
//! .with_coord("stimulus_id", "presentation", vec!["c", "a", "b"])
//! .unwrap();
//!
//! let sorted = t.sort_by(&["stimulus_id"]).unwrap();
//! assert_eq!(sorted.values(), vec![3.0, 4.0, 5.0, 6.0, 1.0, 2.0]);
//! assert_eq!(
//!     sorted.coord("stimulus_id").unwrap().to_vec(),
//!     vec![Label::from("a"), Label::from("b"), Label::from("c")]
//! );
//! ```

use crate::attrs::{check_same_tree, Attr, AttrMap};
use crate::dense::DenseND;
use crate::error::{LabelError, LabelResult};
use crate::types::{AxisMeta, Coordinate, CoordinateSet, Label, Shape};
use scirs2_core::ndarray_ext::ArrayD;
use scirs2_core::numeric::Num;
use std::cmp::Ordering;
use std::collections::BTreeMap;

/// An N-dimensional array with named axes, coordinates and attributes.
#[derive(Clone, Debug, PartialEq)]
pub struct LabeledTensor<T> {
    data: DenseND<T>,
    axes: Vec<AxisMeta>,
    coords: BTreeMap<String, Coordinate>,
    attrs: AttrMap<T>,
}

impl<T> LabeledTensor<T>
where
    T: Clone + Num,
{
    /// Name the axes of a dense tensor.
    ///
    /// # Errors
    ///
    /// [`LabelError::ShapeMismatch`] if the number of names differs from the
    /// rank, [`LabelError::AxisMismatch`] if a name repeats.
    pub fn new<S: AsRef<str>>(data: DenseND<T>, dims: &[S]) -> LabelResult<Self> {
        if dims.len() != data.rank() {
            return Err(LabelError::ShapeMismatch {
                context: "axis names".to_string(),
                expected: vec![data.rank()],
                actual: vec![dims.len()],
            });
        }
        let names: Vec<String> = dims.iter().map(|d| d.as_ref().to_string()).collect();
        for (i, name) in names.iter().enumerate() {
            if names[..i].contains(name) {
                let mut unique = names.clone();
                unique.sort();
                unique.dedup();
                return Err(LabelError::axis_mismatch(unique, names));
            }
        }
        let axes = names
            .into_iter()
            .zip(data.shape().iter())
            .map(|(name, &size)| AxisMeta::new(name, size))
            .collect();
        Ok(Self {
            data,
            axes,
            coords: BTreeMap::new(),
            attrs: AttrMap::new(),
        })
    }

    /// Build a tensor from row-major values and `(name, size)` axis pairs.
    pub fn from_vec(values: Vec<T>, axes: &[(&str, usize)]) -> LabelResult<Self> {
        let shape: Vec<usize> = axes.iter().map(|(_, size)| *size).collect();
        let names: Vec<&str> = axes.iter().map(|(name, _)| *name).collect();
        Self::new(DenseND::from_vec(values, &shape)?, &names)
    }

    /// A rank-0 tensor with no coordinates or attributes.
    pub fn scalar(value: T) -> Self {
        Self {
            data: DenseND::scalar(value),
            axes: Vec::new(),
            coords: BTreeMap::new(),
            attrs: AttrMap::new(),
        }
    }

    /// Attach a 1-D coordinate to `dim`.
    pub fn with_coord<L>(self, name: &str, dim: &str, labels: Vec<L>) -> LabelResult<Self>
    where
        L: Into<Label>,
    {
        self.with_coordinate(Coordinate::new_1d(name, dim, labels))
    }

    /// Attach a coordinate spanning several axes.
    pub fn with_coord_nd<S: AsRef<str>>(
        self,
        name: &str,
        dims: &[S],
        labels: ArrayD<Label>,
    ) -> LabelResult<Self> {
        let dims = dims.iter().map(|d| d.as_ref().to_string()).collect();
        self.with_coordinate(Coordinate::new(name, dims, labels)?)
    }

    /// Attach (or replace) a coordinate.
    ///
    /// # Errors
    ///
    /// [`LabelError::MissingAxis`] if the coordinate spans an unknown axis,
    /// [`LabelError::ShapeMismatch`] if its label count disagrees with the
    /// axis size.
    pub fn with_coordinate(mut self, coord: Coordinate) -> LabelResult<Self> {
        self.check_coordinate(&coord)?;
        self.coords.insert(coord.name().to_string(), coord);
        Ok(self)
    }

    fn check_coordinate(&self, coord: &Coordinate) -> LabelResult<()> {
        for (i, dim) in coord.dims().iter().enumerate() {
            if coord.dims()[..i].contains(dim) {
                return Err(LabelError::coordinate_mismatch(
                    coord.name(),
                    format!("axis '{}' listed twice", dim),
                ));
            }
            let size = self.size_of(dim)?;
            if coord.shape()[i] != size {
                return Err(LabelError::ShapeMismatch {
                    context: format!("coordinate '{}' along '{}'", coord.name(), dim),
                    expected: vec![size],
                    actual: vec![coord.shape()[i]],
                });
            }
        }
        Ok(())
    }

    /// Remove a coordinate, if present.
    pub fn without_coord(mut self, name: &str) -> Self {
        self.coords.remove(name);
        self
    }

    /// Attach (or replace) an attribute.
    pub fn with_attr(mut self, name: impl Into<String>, attr: impl Into<Attr<T>>) -> Self {
        self.attrs.insert(name.into(), attr.into());
        self
    }

    /// Replace the whole attribute map.
    pub fn with_attrs(mut self, attrs: AttrMap<T>) -> Self {
        self.attrs = attrs;
        self
    }

    /// Swap the numeric payload while keeping axes, coordinates and attributes.
    ///
    /// # Errors
    ///
    /// [`LabelError::ShapeMismatch`] if `data` has a different shape.
    pub fn with_data(&self, data: DenseND<T>) -> LabelResult<Self> {
        if data.shape() != self.data.shape() {
            return Err(LabelError::ShapeMismatch {
                context: "replacement data".to_string(),
                expected: self.data.shape_vec(),
                actual: data.shape_vec(),
            });
        }
        Ok(Self {
            data,
            axes: self.axes.clone(),
            coords: self.coords.clone(),
            attrs: self.attrs.clone(),
        })
    }

    /// The numeric payload
    pub fn data(&self) -> &DenseND<T> {
        &self.data
    }

    /// Consume the tensor and return the numeric payload
    pub fn into_data(self) -> DenseND<T> {
        self.data
    }

    /// Values in row-major order
    pub fn values(&self) -> Vec<T> {
        self.data.to_vec()
    }

    /// Axis metadata in storage order
    pub fn axes(&self) -> &[AxisMeta] {
        &self.axes
    }

    /// Axis names in storage order
    pub fn dims(&self) -> Vec<&str> {
        self.axes.iter().map(|a| a.name.as_str()).collect()
    }

    /// Number of axes
    pub fn rank(&self) -> usize {
        self.axes.len()
    }

    /// Axis sizes in storage order
    pub fn shape(&self) -> Shape {
        self.axes.iter().map(|a| a.size).collect()
    }

    /// Total number of elements
    pub fn len(&self) -> usize {
        self.data.len()
    }

    /// Whether the tensor holds no elements
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Storage position of a named axis
    pub fn axis_index(&self, axis: &str) -> Option<usize> {
        self.axes.iter().position(|a| a.name == axis)
    }

    /// Whether the tensor has an axis with this name
    pub fn has_axis(&self, axis: &str) -> bool {
        self.axis_index(axis).is_some()
    }

    /// Storage position of a named axis, or [`LabelError::MissingAxis`].
    pub fn require_axis(&self, axis: &str) -> LabelResult<usize> {
        self.axis_index(axis).ok_or_else(|| LabelError::MissingAxis {
            axis: axis.to_string(),
            available: self.axes.iter().map(|a| a.name.clone()).collect(),
        })
    }

    /// Length of a named axis
    pub fn size_of(&self, axis: &str) -> LabelResult<usize> {
        Ok(self.axes[self.require_axis(axis)?].size)
    }

    /// All coordinates, keyed by name
    pub fn coords(&self) -> &BTreeMap<String, Coordinate> {
        &self.coords
    }

    /// Look up a coordinate by name
    pub fn coord(&self, name: &str) -> LabelResult<&Coordinate> {
        self.coords
            .get(name)
            .ok_or_else(|| LabelError::MissingCoordinate {
                coord: name.to_string(),
            })
    }

    /// The 1-D coordinates indexing `axis`, classified by count.
    pub fn axis_coordinates(&self, axis: &str) -> CoordinateSet<&Coordinate> {
        CoordinateSet::from_vec(self.coords.values().filter(|c| c.is_on_axis(axis)).collect())
    }

    /// The attribute tree
    pub fn attrs(&self) -> &AttrMap<T> {
        &self.attrs
    }

    /// Look up an attribute by name
    pub fn attr(&self, name: &str) -> Option<&Attr<T>> {
        self.attrs.get(name)
    }

    /// Reorder axes to exactly `order`.
    ///
    /// # Errors
    ///
    /// [`LabelError::AxisMismatch`] unless `order` names every axis once.
    pub fn transpose<S: AsRef<str>>(&self, order: &[S]) -> LabelResult<Self> {
        let order: Vec<&str> = order.iter().map(AsRef::as_ref).collect();
        let mut wanted = order.clone();
        wanted.sort_unstable();
        let mut present = self.dims();
        present.sort_unstable();
        if wanted != present {
            return Err(LabelError::axis_mismatch(order, self.dims()));
        }
        let perm = order
            .iter()
            .map(|name| self.require_axis(name))
            .collect::<LabelResult<Vec<_>>>()?;
        self.permuted(&perm)
    }

    /// Move the named axes to the front, keeping the rest in their current order.
    pub fn transpose_leading<S: AsRef<str>>(&self, leading: &[S]) -> LabelResult<Self> {
        let mut order: Vec<&str> = Vec::with_capacity(self.rank());
        for name in leading {
            let name = name.as_ref();
            self.require_axis(name)?;
            if !order.contains(&name) {
                order.push(name);
            }
        }
        for axis in &self.axes {
            if !order.contains(&axis.name.as_str()) {
                order.push(&axis.name);
            }
        }
        self.transpose(&order)
    }

    fn permuted(&self, perm: &[usize]) -> LabelResult<Self> {
        if perm.iter().enumerate().all(|(i, &p)| i == p) {
            return Ok(self.clone());
        }
        Ok(Self {
            data: self.data.permute(perm)?,
            axes: perm.iter().map(|&p| self.axes[p].clone()).collect(),
            coords: self.coords.clone(),
            attrs: self.attrs.clone(),
        })
    }

    /// Fix `axis` to `index`, dropping the axis.
    ///
    /// Coordinates spanning the axis lose that dim (1-D ones become scalar
    /// coordinates). Tensor attributes carrying an axis of the same name and
    /// length are sliced the same way.
    pub fn isel(&self, axis: &str, index: usize) -> LabelResult<Self> {
        let pos = self.require_axis(axis)?;
        let size = self.axes[pos].size;
        let data = self.data.index_axis(pos, index)?;
        let mut axes = self.axes.clone();
        axes.remove(pos);
        let coords = self
            .coords
            .iter()
            .map(|(name, c)| (name.clone(), c.isel(axis, index)))
            .collect();
        let attrs = self.map_tensor_attrs(|t| {
            if t.size_of(axis).ok() == Some(size) {
                t.isel(axis, index).map(Some)
            } else {
                Ok(None)
            }
        })?;
        Ok(Self {
            data,
            axes,
            coords,
            attrs,
        })
    }

    /// Pick (and reorder) positions along `axis`.
    pub fn select_along(&self, axis: &str, indices: &[usize]) -> LabelResult<Self> {
        let pos = self.require_axis(axis)?;
        let size = self.axes[pos].size;
        let data = self.data.select_indices(indices, pos)?;
        let mut axes = self.axes.clone();
        axes[pos].size = indices.len();
        let coords = self
            .coords
            .iter()
            .map(|(name, c)| (name.clone(), c.select(axis, indices)))
            .collect();
        let attrs = self.map_tensor_attrs(|t| {
            if t.size_of(axis).ok() == Some(size) {
                t.select_along(axis, indices).map(Some)
            } else {
                Ok(None)
            }
        })?;
        Ok(Self {
            data,
            axes,
            coords,
            attrs,
        })
    }

    /// Apply `f` to every tensor attribute; `None` keeps the attribute as is.
    fn map_tensor_attrs<F>(&self, f: F) -> LabelResult<AttrMap<T>>
    where
        F: Fn(&Self) -> LabelResult<Option<Self>>,
    {
        self.attrs
            .iter()
            .map(|(key, attr)| {
                let mapped = match attr {
                    Attr::Tensor(t) => match f(t)? {
                        Some(updated) => Attr::Tensor(updated),
                        None => attr.clone(),
                    },
                    Attr::Value(_) => attr.clone(),
                };
                Ok((key.clone(), mapped))
            })
            .collect()
    }

    /// Sort by the labels of one or more 1-D coordinates.
    ///
    /// Keys on the same axis form a lexicographic key, first key primary.
    /// Keys on different axes sort their axes independently. The sort is
    /// stable.
    ///
    /// # Errors
    ///
    /// [`LabelError::MissingCoordinate`] for an unknown key,
    /// [`LabelError::AxisArity`] for a key that does not index exactly one axis.
    pub fn sort_by<S: AsRef<str>>(&self, keys: &[S]) -> LabelResult<Self> {
        let mut groups: Vec<(String, Vec<Vec<Label>>)> = Vec::new();
        for key in keys {
            let coord = self.coord(key.as_ref())?;
            if coord.dims().len() != 1 {
                return Err(LabelError::AxisArity {
                    coord: coord.name().to_string(),
                    dims: coord.dims().to_vec(),
                });
            }
            let axis = &coord.dims()[0];
            let labels = coord.to_vec();
            match groups.iter_mut().find(|(a, _)| a == axis) {
                Some((_, group)) => group.push(labels),
                None => groups.push((axis.clone(), vec![labels])),
            }
        }

        let mut sorted = self.clone();
        for (axis, group) in &groups {
            let mut order: Vec<usize> = (0..sorted.size_of(axis)?).collect();
            order.sort_by(|&a, &b| {
                group
                    .iter()
                    .map(|labels| labels[a].cmp(&labels[b]))
                    .find(|o| o.is_ne())
                    .unwrap_or(Ordering::Equal)
            });
            tracing::trace!(axis = %axis, keys = group.len(), "sorting axis");
            sorted = sorted.select_along(axis, &order)?;
        }
        Ok(sorted)
    }

    /// Rename an axis, along with every coordinate dim and tensor attribute
    /// axis of that name.
    pub fn rename_axis(&self, from: &str, to: &str) -> LabelResult<Self> {
        let pos = self.require_axis(from)?;
        if from == to {
            return Ok(self.clone());
        }
        if self.has_axis(to) {
            let mut renamed = self.dims();
            renamed[pos] = to;
            return Err(LabelError::axis_mismatch(renamed, self.dims()));
        }
        let mut axes = self.axes.clone();
        axes[pos].name = to.to_string();
        let coords = self
            .coords
            .iter()
            .map(|(name, c)| (name.clone(), c.rename_dim(from, to)))
            .collect();
        let attrs = self.map_tensor_attrs(|t| {
            if t.has_axis(from) && !t.has_axis(to) {
                t.rename_axis(from, to).map(Some)
            } else {
                Ok(None)
            }
        })?;
        Ok(Self {
            data: self.data.clone(),
            axes,
            coords,
            attrs,
        })
    }

    /// Join tensors along `axis`.
    ///
    /// If the parts carry `axis` they are concatenated along it; otherwise
    /// they are stacked along a new leading axis of that name. Coordinates
    /// spanning the axis are concatenated. Coordinates equal in every part are
    /// kept once; when stacking, coordinates that differ gain the new axis as
    /// their leading dim. Attributes are taken from the first part.
    ///
    /// # Errors
    ///
    /// [`LabelError::AxisMismatch`] if the parts' axes differ,
    /// [`LabelError::CoordinateMismatch`] if their coordinate sets differ or a
    /// coordinate varies without spanning an existing concatenation axis.
    pub fn concat(parts: &[Self], axis: &str) -> LabelResult<Self> {
        let first = parts.first().ok_or_else(|| {
            LabelError::Tensor(anyhow::anyhow!("Cannot concatenate empty tensor list"))
        })?;
        for part in parts.iter().skip(1) {
            if part.dims() != first.dims() {
                return Err(LabelError::axis_mismatch(first.dims(), part.dims()));
            }
            if !part.coords.keys().eq(first.coords.keys()) {
                return Err(LabelError::coordinate_mismatch(
                    axis,
                    format!(
                        "parts carry coordinates {:?} and {:?}",
                        first.coords.keys().collect::<Vec<_>>(),
                        part.coords.keys().collect::<Vec<_>>()
                    ),
                ));
            }
        }

        let pieces: Vec<DenseND<T>> = parts.iter().map(|p| p.data.clone()).collect();
        let existing = first.axis_index(axis);
        let (data, axes) = match existing {
            Some(pos) => {
                let data = DenseND::concatenate(&pieces, pos)?;
                let mut axes = first.axes.clone();
                axes[pos].size = data.shape()[pos];
                (data, axes)
            }
            None => {
                let data = DenseND::stack(&pieces, 0)?;
                let mut axes = Vec::with_capacity(first.rank() + 1);
                axes.push(AxisMeta::new(axis, parts.len()));
                axes.extend(first.axes.iter().cloned());
                (data, axes)
            }
        };

        let mut coords = BTreeMap::new();
        for (name, coord) in &first.coords {
            let column: Vec<&Coordinate> = parts.iter().filter_map(|p| p.coords.get(name)).collect();
            let merged = if existing.is_some() && coord.spans(axis) {
                let lead: Vec<Coordinate> = column.iter().map(|c| c.leading(axis)).collect();
                Coordinate::concat_leading(&lead)?
            } else if column.iter().all(|c| *c == coord) {
                coord.clone()
            } else if existing.is_none() {
                let lead: Vec<Coordinate> =
                    column.iter().map(|c| c.with_leading_axis(axis)).collect();
                Coordinate::concat_leading(&lead)?
            } else {
                return Err(LabelError::coordinate_mismatch(
                    name.as_str(),
                    format!("differs between parts but does not span '{}'", axis),
                ));
            };
            coords.insert(name.clone(), merged);
        }

        tracing::trace!(axis, parts = parts.len(), stacked = existing.is_none(), "concat");
        Ok(Self {
            data,
            axes,
            coords,
            attrs: first.attrs.clone(),
        })
    }

    /// Whether two tensors share axes, coordinates and attribute tree shape,
    /// regardless of their values.
    pub fn same_layout(&self, other: &Self) -> bool {
        self.axes == other.axes
            && self.coords == other.coords
            && check_same_tree(&[self, other]).is_ok()
    }
}
