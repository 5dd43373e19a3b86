//! Property-based tests for the metric adapters

use proptest::prelude::*;
use tenlab_core::{DenseND, LabeledTensor};
use tenlab_metrics::{PairwiseComparisonAdapter, Regression, RegressionAdapter};

/// Predicts the training target back unchanged.
#[derive(Default)]
struct Memorize(Option<DenseND<f64>>);

impl Regression<f64> for Memorize {
    fn fit(&mut self, _: &LabeledTensor<f64>, target: &LabeledTensor<f64>) -> anyhow::Result<()> {
        self.0 = Some(target.data().clone());
        Ok(())
    }

    fn predict(&self, _: &LabeledTensor<f64>) -> anyhow::Result<DenseND<f64>> {
        self.0.clone().ok_or_else(|| anyhow::anyhow!("not fitted"))
    }
}

fn responses(presentations: usize, neuroids: usize, extra_coords: usize) -> LabeledTensor<f64> {
    let values = (0..presentations * neuroids).map(|v| v as f64).collect();
    let stimuli: Vec<String> = (0..presentations).map(|i| format!("img_{:03}", i)).collect();
    let mut t = LabeledTensor::from_vec(values, &[("presentation", presentations), ("neuroid", neuroids)])
        .unwrap()
        .with_coord("stimulus_id", "presentation", stimuli)
        .unwrap()
        .with_coord("neuroid_id", "neuroid", (0..neuroids as i64).map(|i| i * 7).collect::<Vec<i64>>())
        .unwrap();
    for k in 0..extra_coords {
        let labels: Vec<String> = (0..neuroids).map(|i| format!("meta{}_{}", k, i)).collect();
        t = t.with_coord(&format!("meta_{}", k), "neuroid", labels).unwrap();
    }
    t
}

proptest! {
    /// Every target unit coordinate reappears on the prediction's unit axis
    #[test]
    fn prop_predict_roundtrips_neuroid_coords(
        presentations in 1usize..6,
        neuroids in 1usize..6,
        extra_coords in 0usize..3,
        rotate in 0usize..6,
    ) {
        let target = responses(presentations, neuroids, extra_coords);
        let mut order: Vec<usize> = (0..presentations).collect();
        order.rotate_left(rotate % presentations);
        let shuffled = target.select_along("presentation", &order).unwrap();

        let source = LabeledTensor::new(DenseND::<f64>::zeros(&[2, presentations]), &["neuroid", "presentation"])
            .unwrap()
            .with_coordinate(target.coord("stimulus_id").unwrap().clone())
            .unwrap();

        let mut adapter = RegressionAdapter::new(Memorize::default()).unwrap();
        adapter.fit(&source, &shuffled).unwrap();
        let prediction = adapter.predict(&source).unwrap();

        prop_assert_eq!(prediction.dims(), vec!["presentation", "neuroid"]);
        prop_assert_eq!(prediction.values(), target.values());
        for coord in target.coords().values().filter(|c| c.is_on_axis("neuroid")) {
            prop_assert_eq!(prediction.coord(coord.name()).unwrap(), coord);
        }
        prop_assert_eq!(prediction.axis_coordinates("neuroid").len(), 1 + extra_coords);
    }

    /// The score has one entry per unit, on the unit axis
    #[test]
    fn prop_score_length_matches_collapse_axis(
        presentations in 1usize..6,
        neuroids in 1usize..8,
    ) {
        let target = responses(presentations, neuroids, 1);
        let reversed: Vec<usize> = (0..neuroids).rev().collect();
        let prediction = target.select_along("neuroid", &reversed).unwrap();

        let adapter = PairwiseComparisonAdapter::new(
            |t: &LabeledTensor<f64>, p: &LabeledTensor<f64>| -> anyhow::Result<(f64, f64)> {
                Ok((t.data().zip_with(p.data(), |a, b| a - b)?.sum(), 1.0))
            },
        );
        let score = adapter.compare(&prediction, &target).unwrap();

        prop_assert_eq!(score.dims(), vec!["neuroid"]);
        prop_assert_eq!(score.len(), neuroids);
        prop_assert!(score.values().iter().all(|v| *v == 0.0));
    }
}
