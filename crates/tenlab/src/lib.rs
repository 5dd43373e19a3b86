//! # tenlab - Labeled Tensors for Neural Response Metrics
//!
//! Axis-named tensors with coordinates and nested metadata, an adapter
//! pipeline that lets plain fit/predict and comparison strategies run on
//! them safely, and a recursive engine applying a computation to every
//! slice along chosen axes.
//!
//! This is the **meta crate** that re-exports all tenlab components for convenient access.
//!
//! ## Quick Start
//!
//! ```
//! use tenlab::prelude::*;
//!
//! let responses = LabeledTensor::from_vec(
//!     vec![1.0, 2.0, 3.0, 4.0, 5.0, 6.0],
//!     &[("neuroid", 2), ("presentation", 3)],
//! )?
//! .with_coord("stimulus_id", "presentation", vec!["a", "b", "c"])?;
//!
//! let aligned = align(&responses, &["presentation", "neuroid"])?;
//! assert_eq!(aligned.dims(), vec!["presentation", "neuroid"]);
//! # Ok::<(), anyhow::Error>(())
//! ```
//!
//! ## Components
//!
//! ### Labeled Tensors ([`core`])
//!
//! [`LabeledTensor`](core::LabeledTensor), coordinates, attribute trees,
//! axis alignment and the attribute-tree combinator.
//!
//! ### Recursive Apply ([`exec`])
//!
//! Walk one or several tensors along named axes, run a per-slice callable
//! on a bounded rayon pool and reassemble the results.
//!
//! ```
//! use tenlab::exec::apply_over_axes;
//! use tenlab::core::LabeledTensor;
//!
//! let t = LabeledTensor::from_vec(
//!     vec![1.0, 2.0, 3.0, 4.0, 5.0, 6.0],
//!     &[("stimulus", 3), ("neuroid", 2)],
//! )
//! .unwrap();
//! let sums = apply_over_axes(
//!     |s| Ok(Some(LabeledTensor::scalar(s[0].data().sum()))),
//!     &[&t],
//!     &["stimulus"],
//!     None,
//! )
//! .unwrap()
//! .unwrap();
//! assert_eq!(sums.values(), vec![3.0, 7.0, 11.0]);
//! ```
//!
//! ### Metric Adapters ([`metrics`])
//!
//! Alignment-checking regression and pairwise comparison adapters
//! producing per-unit [`Score`](metrics::Score)s.
//!
//! ## Features
//!
//! - `serde`: serialize/deserialize labels, axis metadata and configuration
//! - `tracing`: enable `tenlab::exec::tracing_support::init_tracing`

#![deny(warnings)]

// Re-export all components
pub use tenlab_core as core;
pub use tenlab_exec as exec;
pub use tenlab_metrics as metrics;

pub mod prelude {
    //! Prelude module for convenient imports
    //!
    //! # Example
    //!
    //! ```
    //! use tenlab::prelude::*;
    //!
    //! let t = LabeledTensor::new(DenseND::<f64>::zeros(&[3, 2]), &["presentation", "neuroid"]).unwrap();
    //! assert!(AxisAligner::new(&["presentation", "neuroid"]).unwrap().check(&t).is_ok());
    //! ```

    // Core types
    pub use crate::core::{
        align, combine, Attr, AxisAligner, Coordinate, CoordinateSet, DenseND, Label, LabelError,
        LabelResult, LabeledTensor,
    };

    // Execution
    pub use crate::exec::{apply_over_axes, ApplyEngine, ApplyHints};

    // Metrics
    pub use crate::metrics::{
        Comparison, MetricDefaults, PairwiseComparisonAdapter, Regression, RegressionAdapter,
        Score,
    };
}
