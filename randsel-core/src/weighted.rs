//! Weighted sampling of indices without replacement.
//!
//! Each draw picks an index with probability proportional to the weights of
//! the items not yet drawn. Zero-weight items are never picked; if the pool
//! of positive weights runs out before `n` draws the whole call fails.

use thiserror::Error;
use tracing::{debug, trace};

use crate::source::RandomSource;
use crate::tree::{WeightedTree, WithoutReplacement};

/// Errors from weighted sampling.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum SampleError {
    #[error("sampling exhausted: requested {requested} items but only {drawn} could be drawn")]
    Exhausted { requested: usize, drawn: usize },
    #[error("invalid weight {weight} at index {index}: weights must be finite and non-negative")]
    InvalidWeight { index: usize, weight: f64 },
    #[error("sum of {items} weights overflows f64; scale the weights down")]
    WeightSumOverflow { items: usize },
}

/// Sample `n` distinct indices from `weights` without replacement.
///
/// Indices are returned in draw order.
///
/// # Errors
///
/// [`SampleError::Exhausted`] when fewer than `n` weights are positive, and
/// [`SampleError::InvalidWeight`] for a negative or non-finite weight, and
/// [`SampleError::WeightSumOverflow`] when the weights are finite but their
/// sum is not.
///
/// ```
/// use rand::rngs::StdRng;
/// use rand::SeedableRng;
/// use randsel_core::weighted::{sample_weighted, SampleError};
///
/// let mut rng = StdRng::seed_from_u64(42);
/// let picked = sample_weighted(&[1.0, 0.0, 3.0, 2.0], 3, &mut rng).unwrap();
/// assert_eq!(picked.len(), 3);
/// assert!(!picked.contains(&1));
///
/// let err = sample_weighted(&[1.0, 0.0], 2, &mut rng).unwrap_err();
/// assert_eq!(err, SampleError::Exhausted { requested: 2, drawn: 1 });
/// ```
pub fn sample_weighted<S: RandomSource + ?Sized>(
    weights: &[f64],
    n: usize,
    source: &mut S,
) -> Result<Vec<usize>, SampleError> {
    trace!(items = weights.len(), n, "weighted sample");
    let mut tree = WeightedTree::new(weights)?;
    sample_from(&mut tree, n, source)
}

/// Take `n` items from an arbitrary without-replacement pool.
///
/// No partial result is returned on exhaustion.
pub fn sample_from<D, S>(draw: &mut D, n: usize, source: &mut S) -> Result<Vec<usize>, SampleError>
where
    D: WithoutReplacement,
    S: RandomSource + ?Sized,
{
    let mut selected = Vec::with_capacity(n.min(draw.remaining()));
    for _ in 0..n {
        match draw.take(source) {
            Some(index) => selected.push(index),
            None => {
                debug!(requested = n, drawn = selected.len(), "weighted sampling exhausted");
                return Err(SampleError::Exhausted {
                    requested: n,
                    drawn: selected.len(),
                });
            }
        }
    }
    Ok(selected)
}
