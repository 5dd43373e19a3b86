//! Naming defaults shared by the metric adapters
//!
//! Neural response tensors are laid out as `presentation x neuroid`, with
//! stimuli identified by a `stimulus_id` coordinate and units by a
//! `neuroid_id` coordinate. Every adapter takes a [`MetricDefaults`] so the
//! names can be changed in one place.

/// Axis and coordinate names used by the regression and comparison adapters.
///
/// # Examples
///
/// ```
/// use tenlab_metrics::MetricDefaults;
///
/// let defaults = MetricDefaults::new()
///     .with_expected_dims(&["presentation", "neuroid", "time_bin"])
///     .with_stimulus_coord("image_id");
///
/// assert_eq!(defaults.expected_dims.len(), 3);
/// assert_eq!(defaults.neuroid_dim, "neuroid");
/// assert_eq!(defaults.stimulus_coord, "image_id");
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct MetricDefaults {
    /// Axis order tensors are aligned to
    pub expected_dims: Vec<String>,
    /// Axis indexing units
    pub neuroid_dim: String,
    /// Coordinate identifying units
    pub neuroid_coord: String,
    /// Coordinate identifying stimuli
    pub stimulus_coord: String,
}

impl Default for MetricDefaults {
    fn default() -> Self {
        Self {
            expected_dims: vec!["presentation".to_string(), "neuroid".to_string()],
            neuroid_dim: "neuroid".to_string(),
            neuroid_coord: "neuroid_id".to_string(),
            stimulus_coord: "stimulus_id".to_string(),
        }
    }
}

impl MetricDefaults {
    /// Create the default naming scheme
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the expected axis order
    pub fn with_expected_dims<S: AsRef<str>>(mut self, dims: &[S]) -> Self {
        self.expected_dims = dims.iter().map(|d| d.as_ref().to_string()).collect();
        self
    }

    /// Set the unit axis name
    pub fn with_neuroid_dim(mut self, dim: impl Into<String>) -> Self {
        self.neuroid_dim = dim.into();
        self
    }

    /// Set the unit coordinate name
    pub fn with_neuroid_coord(mut self, coord: impl Into<String>) -> Self {
        self.neuroid_coord = coord.into();
        self
    }

    /// Set the stimulus coordinate name
    pub fn with_stimulus_coord(mut self, coord: impl Into<String>) -> Self {
        self.stimulus_coord = coord.into();
        self
    }
}
