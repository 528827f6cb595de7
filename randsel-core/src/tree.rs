//! Weighted draw structure supporting removal.
//!
//! [`WeightedTree`] stores weights in an implicit binary tree: node `i` has
//! children `2i + 1` and `2i + 2`, and `subtotals[i]` is the weight of `i`
//! plus both child subtotals. Taking an item walks down from the root in
//! `O(log n)` and removing it walks back up in `O(log n)`.
//!
//! Subtotals are rebuilt from children on every removal rather than adjusted
//! by a difference. A subtree whose weights are all zero therefore sums to
//! exactly `0.0`, and the descent never enters it.

use crate::source::RandomSource;
use crate::weighted::SampleError;

/// A pool of items that can be drawn one at a time, each at most once.
pub trait WithoutReplacement {
    /// Draw one item with probability proportional to its current weight and
    /// exclude it from later draws. `None` when nothing selectable remains.
    fn take<S: RandomSource + ?Sized>(&mut self, source: &mut S) -> Option<usize>;

    /// Number of items that can still be drawn.
    fn remaining(&self) -> usize;
}

/// Sum tree over non-negative `f64` weights.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct WeightedTree {
    weights: Vec<f64>,
    subtotals: Vec<f64>,
    positive: usize,
}

impl WeightedTree {
    /// Build a tree from a weight vector.
    ///
    /// Fails on negative, NaN or infinite weights, and on finite weights
    /// whose sum overflows `f64`.
    pub fn new(weights: &[f64]) -> Result<Self, SampleError> {
        for (index, &weight) in weights.iter().enumerate() {
            if !(weight.is_finite() && weight >= 0.0) {
                return Err(SampleError::InvalidWeight { index, weight });
            }
        }

        let n = weights.len();
        let mut tree = Self {
            weights: weights.to_vec(),
            subtotals: vec![0.0; n],
            positive: weights.iter().filter(|&&w| w > 0.0).count(),
        };
        for i in (0..n).rev() {
            tree.subtotals[i] = tree.node_sum(i);
        }
        // Every subtotal is bounded by the root, so one check covers the tree.
        if !tree.total().is_finite() {
            return Err(SampleError::WeightSumOverflow { items: n });
        }
        Ok(tree)
    }

    pub fn len(&self) -> usize {
        self.weights.len()
    }

    pub fn is_empty(&self) -> bool {
        self.weights.is_empty()
    }

    /// Current weight at `index` (zero once removed).
    pub fn weight(&self, index: usize) -> f64 {
        self.weights[index]
    }

    /// Sum of all current weights.
    pub fn total(&self) -> f64 {
        self.subtotals.first().copied().unwrap_or(0.0)
    }

    /// Zero the weight at `index`, returning the previous weight.
    pub fn remove(&mut self, index: usize) -> f64 {
        let previous = std::mem::replace(&mut self.weights[index], 0.0);
        if previous > 0.0 {
            self.positive -= 1;
        }

        let mut node = index;
        loop {
            self.subtotals[node] = self.node_sum(node);
            if node == 0 {
                break;
            }
            node = (node - 1) / 2;
        }
        previous
    }

    fn subtotal(&self, index: usize) -> f64 {
        self.subtotals.get(index).copied().unwrap_or(0.0)
    }

    fn node_sum(&self, index: usize) -> f64 {
        self.weights[index] + self.subtotal(2 * index + 1) + self.subtotal(2 * index + 2)
    }

    /// Walk down to the item covering `target`, a point in `[0, total)`.
    ///
    /// Only nodes with a positive subtotal are entered. If rounding pushes
    /// `target` past the last positive weight of a subtree, the walk settles
    /// on a positive item in that subtree instead of overshooting.
    fn find(&self, mut target: f64) -> usize {
        let mut index = 0;
        loop {
            let left_index = 2 * index + 1;
            let left = self.subtotal(left_index);
            if target < left {
                index = left_index;
                continue;
            }
            target -= left;

            let own = self.weights[index];
            if target < own {
                return index;
            }
            target -= own;

            let right_index = 2 * index + 2;
            if self.subtotal(right_index) > 0.0 {
                index = right_index;
                continue;
            }

            if own > 0.0 {
                return index;
            }
            index = left_index;
        }
    }
}

impl WithoutReplacement for WeightedTree {
    fn take<S: RandomSource + ?Sized>(&mut self, source: &mut S) -> Option<usize> {
        if self.positive == 0 {
            return None;
        }
        let target = source.unit_f64() * self.total();
        let index = self.find(target);
        self.remove(index);
        Some(index)
    }

    fn remaining(&self) -> usize {
        self.positive
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::source::scripted::ScriptedSource;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn rejects_invalid_weights() {
        assert_eq!(
            WeightedTree::new(&[1.0, -1.0]).unwrap_err(),
            SampleError::InvalidWeight {
                index: 1,
                weight: -1.0
            }
        );
        assert!(matches!(
            WeightedTree::new(&[f64::NAN]),
            Err(SampleError::InvalidWeight { index: 0, .. })
        ));
        assert!(WeightedTree::new(&[f64::INFINITY]).is_err());
    }

    #[test]
    fn rejects_weights_whose_sum_overflows() {
        assert_eq!(
            WeightedTree::new(&[1e308, 1e308]),
            Err(SampleError::WeightSumOverflow { items: 2 })
        );
        assert_eq!(
            WeightedTree::new(&[0.0, f64::MAX, 1.0, f64::MAX]),
            Err(SampleError::WeightSumOverflow { items: 4 })
        );

        let tree = WeightedTree::new(&[1e307, 1e307]).unwrap();
        assert_eq!(tree.total(), 2e307);
    }

    #[test]
    fn empty_tree_has_nothing_to_take() {
        let mut tree = WeightedTree::new(&[]).unwrap();
        let mut src = ScriptedSource::default();
        assert!(tree.is_empty());
        assert_eq!(tree.total(), 0.0);
        assert_eq!(tree.take(&mut src), None);
    }

    #[test]
    fn all_zero_weights_are_never_taken() {
        let mut tree = WeightedTree::new(&[0.0, 0.0, 0.0]).unwrap();
        let mut src = ScriptedSource::default();
        assert_eq!(tree.remaining(), 0);
        assert_eq!(tree.take(&mut src), None);
        assert!(src.is_drained());
    }

    #[test]
    fn target_maps_to_cumulative_position() {
        // Tree layout: root 0 (w=1), children 1 (w=2) and 2 (w=3).
        // In-order cumulative ranges: [0,2) -> 1, [2,3) -> 0, [3,6) -> 2.
        let tree = WeightedTree::new(&[1.0, 2.0, 3.0]).unwrap();
        assert_eq!(tree.total(), 6.0);
        assert_eq!(tree.find(0.0), 1);
        assert_eq!(tree.find(1.99), 1);
        assert_eq!(tree.find(2.0), 0);
        assert_eq!(tree.find(3.0), 2);
        assert_eq!(tree.find(5.99), 2);
    }

    #[test]
    fn overshoot_settles_on_positive_weight() {
        let mut tree = WeightedTree::new(&[1.0, 2.0, 3.0, 0.0]).unwrap();
        tree.remove(2);
        // Rounding slop past the total must not land on a zero weight.
        let index = tree.find(tree.total() + 1e-9);
        assert!(tree.weight(index) > 0.0);
    }

    #[test]
    fn remove_updates_totals() {
        let mut tree = WeightedTree::new(&[9.0, 1.0, 2.0, 3.0, 5.0]).unwrap();
        assert_eq!(tree.total(), 20.0);
        assert_eq!(tree.remove(0), 9.0);
        assert_eq!(tree.total(), 11.0);
        assert_eq!(tree.remaining(), 4);
        // Removing twice is a no-op.
        assert_eq!(tree.remove(0), 0.0);
        assert_eq!(tree.remaining(), 4);

        let expected = WeightedTree::new(&[0.0, 1.0, 2.0, 3.0, 5.0]).unwrap();
        assert_eq!(tree, expected);
    }

    #[test]
    fn removed_subtree_sums_to_exact_zero() {
        let mut tree = WeightedTree::new(&[0.1, 0.2, 0.3, 0.7, 1e-12]).unwrap();
        for i in 0..5 {
            tree.remove(i);
        }
        assert_eq!(tree.total(), 0.0);
        assert_eq!(tree.remaining(), 0);
    }

    #[test]
    fn take_consumes_one_unit_draw() {
        let mut tree = WeightedTree::new(&[1.0, 2.0, 3.0]).unwrap();
        // 0.5 * 6.0 = 3.0 -> index 2.
        let mut src = ScriptedSource::units(&[0.5]);
        assert_eq!(tree.take(&mut src), Some(2));
        assert_eq!(tree.weight(2), 0.0);
        assert!(src.is_drained());
    }

    #[test]
    fn take_exhausts_positive_items_only() {
        let mut rng = StdRng::seed_from_u64(0x9c9f_a0b0);
        let mut tree = WeightedTree::new(&[0.0, 4.0, 0.0, 1.0, 2.0]).unwrap();
        let mut taken = Vec::new();
        while let Some(i) = tree.take(&mut rng) {
            taken.push(i);
        }
        taken.sort_unstable();
        assert_eq!(taken, vec![1, 3, 4]);
    }

    #[test]
    fn sample_counts_match_probabilities() {
        let weights = [1.0, 2.0, 3.0, 0.0, 4.0];
        let total: f64 = weights.iter().sum();
        let trials = 20_000;
        let mut rng = StdRng::seed_from_u64(0x9c9f_a0b0_580a_7031);
        let mut counts = [0usize; 5];
        for _ in 0..trials {
            let mut tree = WeightedTree::new(&weights).unwrap();
            counts[tree.take(&mut rng).unwrap()] += 1;
        }
        assert_eq!(counts[3], 0);
        for (i, &w) in weights.iter().enumerate() {
            let diff = counts[i] as f64 / trials as f64 - w / total;
            assert!(diff.abs() < 0.02, "index {i}: {diff}");
        }
    }
}
