//! Weighted sampling without replacement
//!
//! Repeatedly draws one item from a shrinking pool, each draw proportional
//! to the item's remaining weight, until the requested count is reached.
//! Deterministic for a fixed RNG state and fixed inputs, which is what
//! makes clustering reproducible across generation runs when seeded
//! identically.

use rand::distributions::{Distribution, WeightedIndex};
use rand::Rng;
use thiserror::Error;

/// Errors for weighted sampling
#[derive(Error, Debug, Clone, PartialEq)]
pub enum SampleError {
    #[error("items/weights length mismatch: {items} items, {weights} weights")]
    LengthMismatch { items: usize, weights: usize },

    #[error("invalid weight {weight} at index {index}: weights must be finite and non-negative")]
    InvalidWeight { index: usize, weight: f64 },
}

pub type Result<T> = std::result::Result<T, SampleError>;

/// Draw `min(k, items.len())` distinct elements from `items` without
/// replacement, where each draw picks a remaining element with probability
/// proportional to its remaining weight.
///
/// Caller slices are never mutated; the draw loop runs on internal copies.
/// A zero weight makes an element unselectable while any positive-weight
/// element remains in the pool. When every remaining weight is zero and a
/// draw is still required, the draw falls back to a uniform choice among
/// the remaining candidates so the output size stays exact.
///
/// # Errors
///
/// `LengthMismatch` when `items` and `weights` differ in length,
/// `InvalidWeight` for a negative or non-finite weight.
pub fn weighted_sample<T: Clone, R: Rng>(
    rng: &mut R,
    items: &[T],
    weights: &[f64],
    k: usize,
) -> Result<Vec<T>> {
    if items.len() != weights.len() {
        return Err(SampleError::LengthMismatch {
            items: items.len(),
            weights: weights.len(),
        });
    }
    if let Some((index, &weight)) = weights
        .iter()
        .enumerate()
        .find(|(_, w)| !w.is_finite() || **w < 0.0)
    {
        return Err(SampleError::InvalidWeight { index, weight });
    }

    let k = k.min(items.len());
    let mut pool: Vec<T> = items.to_vec();
    let mut weights: Vec<f64> = weights.to_vec();
    let mut selected = Vec::with_capacity(k);

    while selected.len() < k {
        let i = match WeightedIndex::new(&weights) {
            Ok(dist) => dist.sample(rng),
            // Weights were validated above, so the only way the
            // distribution can fail here is a pool whose remaining
            // weights are all zero: fall back to a uniform draw.
            Err(_) => rng.gen_range(0..pool.len()),
        };
        selected.push(pool.remove(i));
        weights.remove(i);
    }

    Ok(selected)
}
