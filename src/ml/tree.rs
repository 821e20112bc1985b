//! CART regression tree.
//!
//! Splits minimise the summed squared error of the two children. Every
//! feature is considered at every node; thresholds sit midway between
//! adjacent distinct values, and samples with `x <= threshold` go left.
//! Nodes are grown with an explicit stack so deep trees cannot overflow
//! the call stack.

/// Growth limits for a single tree.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TreeParams {
    /// `None` grows until leaves are pure or too small to split.
    pub max_depth: Option<usize>,
    /// Minimum samples a node needs to be considered for splitting.
    pub min_samples_split: usize,
}

impl Default for TreeParams {
    fn default() -> Self {
        Self { max_depth: None, min_samples_split: 2 }
    }
}

/// Impurity at or below which a node is treated as pure.
const PURE_SSE: f64 = 1e-12;

#[derive(Debug, Clone, PartialEq)]
enum Node {
    Leaf { value: f64 },
    Split { feature: usize, threshold: f64, left: usize, right: usize },
}

/// A fitted regression tree over `N` features.
#[derive(Debug, Clone, PartialEq)]
pub struct RegressionTree<const N: usize> {
    nodes: Vec<Node>,
}

struct SplitCandidate {
    feature: usize,
    threshold: f64,
    sse: f64,
}

impl<const N: usize> RegressionTree<N> {
    /// Fit on the rows selected by `samples` (indices into `x`/`y`, repeats allowed).
    ///
    /// `samples` must be non-empty.
    pub fn fit(x: &[[f64; N]], y: &[f64], samples: Vec<usize>, params: TreeParams) -> Self {
        let mut nodes = vec![Node::Leaf { value: 0.0 }];
        let mut stack = vec![(0usize, samples, 0usize)];

        while let Some((slot, idx, depth)) = stack.pop() {
            let value = mean_target(y, &idx);
            let depth_ok = params.max_depth.map_or(true, |max| depth < max);
            let split = if depth_ok && idx.len() >= params.min_samples_split {
                best_split(x, y, &idx)
            } else {
                None
            };

            match split {
                Some(split) => {
                    let (left_idx, right_idx): (Vec<usize>, Vec<usize>) = idx
                        .iter()
                        .partition(|&&i| x[i][split.feature] <= split.threshold);

                    let left = nodes.len();
                    nodes.push(Node::Leaf { value });
                    let right = nodes.len();
                    nodes.push(Node::Leaf { value });
                    nodes[slot] = Node::Split {
                        feature: split.feature,
                        threshold: split.threshold,
                        left,
                        right,
                    };

                    stack.push((right, right_idx, depth + 1));
                    stack.push((left, left_idx, depth + 1));
                }
                None => nodes[slot] = Node::Leaf { value },
            }
        }

        Self { nodes }
    }

    pub fn predict(&self, features: &[f64; N]) -> f64 {
        let mut at = 0;
        loop {
            match self.nodes[at] {
                Node::Leaf { value } => return value,
                Node::Split { feature, threshold, left, right } => {
                    at = if features[feature] <= threshold { left } else { right };
                }
            }
        }
    }

    /// Longest root-to-leaf path (a lone leaf has depth 0).
    pub fn depth(&self) -> usize {
        let mut deepest = 0;
        let mut stack = vec![(0usize, 0usize)];
        while let Some((at, d)) = stack.pop() {
            match self.nodes[at] {
                Node::Leaf { .. } => deepest = deepest.max(d),
                Node::Split { left, right, .. } => {
                    stack.push((left, d + 1));
                    stack.push((right, d + 1));
                }
            }
        }
        deepest
    }

    pub fn leaf_count(&self) -> usize {
        self.nodes.iter().filter(|n| matches!(n, Node::Leaf { .. })).count()
    }
}

fn mean_target(y: &[f64], idx: &[usize]) -> f64 {
    if idx.is_empty() {
        return 0.0;
    }
    idx.iter().map(|&i| y[i]).sum::<f64>() / idx.len() as f64
}

/// Lowest-SSE split over all features, or `None` when the node is pure or
/// every feature is constant across its samples.
fn best_split<const N: usize>(x: &[[f64; N]], y: &[f64], idx: &[usize]) -> Option<SplitCandidate> {
    let n = idx.len();
    let total_sum: f64 = idx.iter().map(|&i| y[i]).sum();
    let total_sq: f64 = idx.iter().map(|&i| y[i] * y[i]).sum();
    let parent_sse = total_sq - total_sum * total_sum / n as f64;
    if parent_sse <= PURE_SSE {
        return None;
    }

    let mut best: Option<SplitCandidate> = None;
    let mut order = idx.to_vec();

    for feature in 0..N {
        order.sort_by(|&a, &b| x[a][feature].total_cmp(&x[b][feature]));

        let mut left_sum = 0.0;
        let mut left_sq = 0.0;
        for k in 1..n {
            let prev = order[k - 1];
            left_sum += y[prev];
            left_sq += y[prev] * y[prev];

            let lo = x[prev][feature];
            let hi = x[order[k]][feature];
            if lo >= hi {
                continue;
            }

            let left_n = k as f64;
            let right_n = (n - k) as f64;
            let right_sum = total_sum - left_sum;
            let right_sq = total_sq - left_sq;
            let sse = (left_sq - left_sum * left_sum / left_n)
                + (right_sq - right_sum * right_sum / right_n);

            if best.as_ref().map_or(true, |b| sse < b.sse) {
                let mid = lo + (hi - lo) / 2.0;
                // Guard against the midpoint rounding up onto `hi`
                let threshold = if mid < hi { mid } else { lo };
                best = Some(SplitCandidate { feature, threshold, sse });
            }
        }
    }

    best
}
