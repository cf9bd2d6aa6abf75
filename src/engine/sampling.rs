//! Reproducible random sampling.
//!
//! Every call seeds a fresh `StdRng` with [`SAMPLE_SEED`] and draws indices
//! with `rand::seq::index::sample` (sampling without replacement). The
//! sampled order is kept, so identical inputs always give identical output.

use rand::rngs::StdRng;
use rand::seq::index;
use rand::SeedableRng;

pub const SAMPLE_SEED: u64 = 42;

/// Picks `amount` of `items`. When there are not more than `amount` items
/// they are all returned in their original order.
pub fn sample_fixed<T: Clone>(items: &[T], amount: usize) -> Vec<T> {
    if items.len() <= amount {
        return items.to_vec();
    }
    let mut rng = StdRng::seed_from_u64(SAMPLE_SEED);
    index::sample(&mut rng, items.len(), amount)
        .into_iter()
        .map(|i| items[i].clone())
        .collect()
}
