//! Hand-rolled learning primitives used by the forecaster and matcher.
//!
//! - `StandardScaler`: per-feature standardization
//! - `RegressionTree` / `RandomForestRegressor`: bagged CART regression
//! - `kmeans`: seeded k-means++ clustering with restarts
//!
//! All are generic over a fixed feature width `N` and deterministic for a
//! given seed.

pub mod forest;
pub mod kmeans;
pub mod scaler;
pub mod tree;

pub use forest::{ForestParams, RandomForestRegressor};
pub use kmeans::{KMeansFit, KMeansParams};
pub use scaler::StandardScaler;
pub use tree::{RegressionTree, TreeParams};
