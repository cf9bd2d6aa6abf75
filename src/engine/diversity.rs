//! Greedy farthest-point selection.
//!
//! Each step scans every remaining candidate against every selected vector,
//! so cost grows with `count * candidates`. Fine for pools in the low
//! thousands.

use crate::dataset::FeatureVector;

fn euclidean_distance(a: &FeatureVector, b: &FeatureVector) -> f64 {
    a.as_slice()
        .iter()
        .zip(b.as_slice())
        .map(|(x, y)| (x - y).powi(2))
        .sum::<f64>()
        .sqrt()
}

/// Indices of `count` mutually distant vectors.
///
/// Index 0 is always picked first. Every next pick maximizes the distance to
/// its nearest already-selected vector, the lowest index winning ties. When
/// `count` covers every vector, all indices are returned in order.
pub fn select_diverse(vectors: &[FeatureVector], count: usize) -> Vec<usize> {
    if vectors.len() <= count {
        return (0..vectors.len()).collect();
    }
    if count == 0 {
        return Vec::new();
    }

    let mut selected = vec![0];
    // Distance from each vector to its nearest selected one.
    let mut nearest: Vec<f64> = vectors
        .iter()
        .map(|v| euclidean_distance(v, &vectors[0]))
        .collect();
    let mut taken = vec![false; vectors.len()];
    taken[0] = true;

    while selected.len() < count {
        let mut best: Option<(usize, f64)> = None;
        for (i, distance) in nearest.iter().enumerate() {
            if taken[i] {
                continue;
            }
            match best {
                Some((_, best_distance)) if *distance <= best_distance => {}
                _ => best = Some((i, *distance)),
            }
        }

        let Some((pick, _)) = best else {
            break;
        };
        selected.push(pick);
        taken[pick] = true;
        for (i, distance) in nearest.iter_mut().enumerate() {
            if !taken[i] {
                *distance = distance.min(euclidean_distance(&vectors[i], &vectors[pick]));
            }
        }
    }

    selected
}
