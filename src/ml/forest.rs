//! Random-forest regressor: bootstrap-aggregated CART trees.
//!
//! Each tree is fitted on a bootstrap resample (n draws with replacement)
//! of the training rows. Per-tree seeds are drawn sequentially from one
//! master `StdRng`, then the trees are grown in parallel with rayon, so the
//! fitted forest depends only on the data and the master seed.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use rayon::prelude::*;

use super::tree::{RegressionTree, TreeParams};

/// Ensemble hyperparameters.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ForestParams {
    pub n_estimators: usize,
    pub seed: u64,
    pub tree: TreeParams,
}

impl Default for ForestParams {
    fn default() -> Self {
        Self {
            n_estimators: 100,
            seed: 42,
            tree: TreeParams::default(),
        }
    }
}

/// A fitted random forest over `N` features.
#[derive(Debug, Clone, PartialEq)]
pub struct RandomForestRegressor<const N: usize> {
    trees: Vec<RegressionTree<N>>,
}

impl<const N: usize> RandomForestRegressor<N> {
    /// Fit the ensemble.
    ///
    /// Returns `None` when there are no rows, the row and target counts
    /// differ, or `n_estimators` is zero.
    pub fn fit(x: &[[f64; N]], y: &[f64], params: &ForestParams) -> Option<Self> {
        let n = x.len();
        if n == 0 || n != y.len() || params.n_estimators == 0 {
            return None;
        }

        let mut master = StdRng::seed_from_u64(params.seed);
        let seeds: Vec<u64> = (0..params.n_estimators).map(|_| master.gen()).collect();
        let tree_params = params.tree;

        let trees = seeds
            .into_par_iter()
            .map(|seed| {
                let mut rng = StdRng::seed_from_u64(seed);
                let bootstrap: Vec<usize> = (0..n).map(|_| rng.gen_range(0..n)).collect();
                RegressionTree::fit(x, y, bootstrap, tree_params)
            })
            .collect();

        Some(Self { trees })
    }

    /// Mean of the tree predictions.
    pub fn predict(&self, features: &[f64; N]) -> f64 {
        let total: f64 = self.trees.iter().map(|t| t.predict(features)).sum();
        total / self.trees.len() as f64
    }

    pub fn n_trees(&self) -> usize {
        self.trees.len()
    }
}
