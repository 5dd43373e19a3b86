//! Property-based tests for labeled tensor operations
//!
//! This module uses proptest to check layout invariants of labeled tensors
//! across randomly generated shapes, axis orders and coordinate labels.

#[cfg(test)]
mod tests {
    use crate::{align, DenseND, Label, LabeledTensor};
    use proptest::prelude::*;

    const NAMES: [&str; 4] = ["presentation", "neuroid", "time_bin", "split"];

    // Shapes of rank 1-4 with small axes
    fn shape_strategy() -> impl Strategy<Value = Vec<usize>> {
        prop::collection::vec(1usize..5, 1..=4)
    }

    fn labeled(shape: &[usize]) -> LabeledTensor<f64> {
        let len: usize = shape.iter().product();
        let values = (0..len).map(|v| v as f64).collect();
        let data = DenseND::from_vec(values, shape).unwrap();
        let mut t = LabeledTensor::new(data, &NAMES[..shape.len()]).unwrap();
        for (name, &size) in NAMES.iter().zip(shape) {
            let labels: Vec<i64> = (0..size as i64).collect();
            t = t.with_coord(&format!("{}_id", name), name, labels).unwrap();
        }
        t
    }

    proptest! {
        #[test]
        fn prop_align_reproduces_target_order(
            shape in shape_strategy(),
            seed in any::<u64>(),
        ) {
            let t = labeled(&shape);
            let mut order: Vec<&str> = t.dims();
            // rotate by a seed-dependent amount to get a different order
            let k = (seed as usize) % order.len();
            order.rotate_left(k);

            let aligned = align(&t, &order).unwrap();
            prop_assert_eq!(aligned.dims(), order.clone());
            prop_assert_eq!(aligned.len(), t.len());

            let back = aligned.transpose(&t.dims()).unwrap();
            prop_assert_eq!(back, t);
        }

        #[test]
        fn prop_isel_concat_roundtrip(shape in shape_strategy(), axis in 0usize..4) {
            let t = labeled(&shape);
            let axis = NAMES[axis % shape.len()];
            let slices: Vec<_> = (0..t.size_of(axis).unwrap())
                .map(|i| t.isel(axis, i).unwrap())
                .collect();
            let stacked = LabeledTensor::concat(&slices, axis).unwrap();
            let restored = stacked.transpose(&t.dims()).unwrap();
            if t.size_of(axis).unwrap() > 1 {
                prop_assert_eq!(restored, t);
            } else {
                prop_assert_eq!(restored.values(), t.values());
            }
        }

        #[test]
        fn prop_sort_by_orders_labels(labels in prop::collection::vec(-20i64..20, 1..12)) {
            let n = labels.len();
            let values: Vec<f64> = labels.iter().map(|&l| l as f64 * 10.0).collect();
            let t = LabeledTensor::from_vec(values, &[("presentation", n)])
                .unwrap()
                .with_coord("stimulus_id", "presentation", labels.clone())
                .unwrap();
            let sorted = t.sort_by(&["stimulus_id"]).unwrap();
            let keys = sorted.coord("stimulus_id").unwrap().to_vec();
            prop_assert!(keys.windows(2).all(|w| w[0] <= w[1]));
            // values travel with their labels
            for (key, value) in keys.iter().zip(sorted.values()) {
                match key {
                    Label::Int(k) => prop_assert_eq!(*k as f64 * 10.0, value),
                    other => prop_assert!(false, "unexpected label {:?}", other),
                }
            }
        }

        #[test]
        fn prop_select_along_inverse(shape in shape_strategy(), seed in any::<u64>()) {
            let t = labeled(&shape);
            let axis = t.dims()[0].to_string();
            let n = t.size_of(&axis).unwrap();
            let k = (seed as usize) % n;
            let forward: Vec<usize> = (0..n).map(|i| (i + k) % n).collect();
            let mut inverse = vec![0; n];
            for (i, &f) in forward.iter().enumerate() {
                inverse[f] = i;
            }
            let shuffled = t.select_along(&axis, &forward).unwrap();
            let back = shuffled.select_along(&axis, &inverse).unwrap();
            prop_assert_eq!(back, t);
        }
    }
}
