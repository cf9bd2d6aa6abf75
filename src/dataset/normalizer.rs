//! Z-score standardization of audio features.

use super::track::{AudioFeature, FeatureVector, FEATURE_COUNT};

/// Per-feature mean and population standard deviation, fit once.
#[derive(Clone, Debug, PartialEq)]
pub struct FeatureNormalizer {
    means: [f64; FEATURE_COUNT],
    std_devs: [f64; FEATURE_COUNT],
}

impl FeatureNormalizer {
    pub fn fit<'a, I>(rows: I) -> Self
    where
        I: IntoIterator<Item = &'a FeatureVector>,
        I::IntoIter: Clone,
    {
        let rows = rows.into_iter();
        let mut means = [0.0; FEATURE_COUNT];
        let mut std_devs = [0.0; FEATURE_COUNT];

        let count = rows.clone().count();
        if count == 0 {
            return FeatureNormalizer { means, std_devs };
        }

        for row in rows.clone() {
            for (sum, value) in means.iter_mut().zip(row.0.iter()) {
                *sum += value;
            }
        }
        for mean in means.iter_mut() {
            *mean /= count as f64;
        }

        for row in rows {
            for i in 0..FEATURE_COUNT {
                std_devs[i] += (row.0[i] - means[i]).powi(2);
            }
        }
        for (std_dev, mean) in std_devs.iter_mut().zip(means.iter()) {
            *std_dev = (*std_dev / count as f64).sqrt();
            // Rounding noise from a constant column counts as zero variance.
            if *std_dev <= 10.0 * f64::EPSILON * mean.abs().max(1.0) {
                *std_dev = 0.0;
            }
        }

        FeatureNormalizer { means, std_devs }
    }

    /// A zero-variance feature standardizes to exactly 0.
    pub fn transform(&self, raw: &FeatureVector) -> FeatureVector {
        let mut out = [0.0; FEATURE_COUNT];
        for i in 0..FEATURE_COUNT {
            if self.std_devs[i] > 0.0 {
                out[i] = (raw.0[i] - self.means[i]) / self.std_devs[i];
            }
        }
        FeatureVector(out)
    }

    pub fn mean(&self, feature: AudioFeature) -> f64 {
        self.means[feature.index()]
    }

    pub fn std_dev(&self, feature: AudioFeature) -> f64 {
        self.std_devs[feature.index()]
    }
}
