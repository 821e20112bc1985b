//! Per-feature standardization (zero mean, unit variance).
//!
//! Statistics are fitted once over a batch and then frozen; `transform`
//! never updates them. Uses the population standard deviation; a constant
//! feature is left unscaled (divided by 1).

use statrs::statistics::Statistics;

/// Fitted standard scaler over `N`-dimensional feature vectors.
#[derive(Debug, Clone, PartialEq)]
pub struct StandardScaler<const N: usize> {
    mean: [f64; N],
    scale: [f64; N],
}

impl<const N: usize> StandardScaler<N> {
    /// Fit mean and standard deviation per feature.
    ///
    /// Returns `None` for an empty batch.
    pub fn fit(rows: &[[f64; N]]) -> Option<Self> {
        if rows.is_empty() {
            return None;
        }

        let mut mean = [0.0; N];
        let mut scale = [1.0; N];
        for i in 0..N {
            let column: Vec<f64> = rows.iter().map(|r| r[i]).collect();
            mean[i] = column.iter().mean();
            let std = column.iter().population_std_dev();
            // Constant (or degenerate) columns keep unit scale
            scale[i] = if std.is_finite() && std > f64::EPSILON { std } else { 1.0 };
        }

        Some(Self { mean, scale })
    }

    /// Standardize one feature vector with the fitted statistics.
    pub fn transform(&self, raw: &[f64; N]) -> [f64; N] {
        let mut out = [0.0; N];
        for i in 0..N {
            out[i] = (raw[i] - self.mean[i]) / self.scale[i];
        }
        out
    }

    /// Fit on a batch and return the standardized batch alongside the scaler.
    pub fn fit_transform(rows: &[[f64; N]]) -> Option<(Self, Vec<[f64; N]>)> {
        let scaler = Self::fit(rows)?;
        let scaled = rows.iter().map(|r| scaler.transform(r)).collect();
        Some((scaler, scaled))
    }

    pub fn mean(&self) -> &[f64; N] {
        &self.mean
    }

    pub fn scale(&self) -> &[f64; N] {
        &self.scale
    }
}
