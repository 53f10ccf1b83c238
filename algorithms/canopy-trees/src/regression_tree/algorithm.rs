//! Variance-minimising regression trees
//!
use std::collections::BTreeSet;

use log::{debug, trace};
use ndarray::{Array1, ArrayBase, ArrayView1, ArrayView2, Data, Ix1, Ix2};
use rand::{seq::index::sample, Rng};

use super::split::{weighted_variance, SplitSearch};
use super::NodeIter;
use super::RegressionTreeValidParams;
use canopy::{
    dataset::{AsTargets, Records},
    error::{Error, Result},
    traits::*,
    DatasetBase, Float,
};

#[cfg(feature = "serde")]
use serde_crate::{Deserialize, Serialize};

/// A node in the regression tree
///
/// Internal nodes own exactly two subtrees. Samples with `x[feature] <= threshold` are routed to
/// the `left` subtree, all others to the `right` subtree.
#[cfg_attr(
    feature = "serde",
    derive(Serialize, Deserialize),
    serde(crate = "serde_crate")
)]
#[derive(Debug, Clone, PartialEq)]
pub enum TreeNode<F> {
    /// Terminal node predicting the mean target of its training samples
    Leaf { value: F },
    /// Decision node
    Split {
        feature: usize,
        threshold: F,
        /// Decrease of the weighted variance sum achieved by this split
        impurity_decrease: F,
        left: Box<TreeNode<F>>,
        right: Box<TreeNode<F>>,
    },
}

impl<F: Float> TreeNode<F> {
    /// Returns true if the node has no children
    pub fn is_leaf(&self) -> bool {
        matches!(self, TreeNode::Leaf { .. })
    }

    /// Returns `Some(prediction)` for leaf nodes and `None` for internal nodes.
    pub fn prediction(&self) -> Option<F> {
        match self {
            TreeNode::Leaf { value } => Some(*value),
            TreeNode::Split { .. } => None,
        }
    }

    /// Returns the split `(feature index, threshold)` of internal nodes
    pub fn split(&self) -> Option<(usize, F)> {
        match self {
            TreeNode::Leaf { .. } => None,
            TreeNode::Split {
                feature, threshold, ..
            } => Some((*feature, *threshold)),
        }
    }

    /// Returns the decrease of the weighted variance sum, zero for leaves
    pub fn impurity_decrease(&self) -> F {
        match self {
            TreeNode::Leaf { .. } => F::zero(),
            TreeNode::Split {
                impurity_decrease, ..
            } => *impurity_decrease,
        }
    }

    /// Returns both children, first left then right
    pub fn children(&self) -> Option<(&TreeNode<F>, &TreeNode<F>)> {
        match self {
            TreeNode::Leaf { .. } => None,
            TreeNode::Split { left, right, .. } => Some((&**left, &**right)),
        }
    }

    /// Returns the child a sample is routed to, `None` for leaves
    pub fn route<D: Data<Elem = F>>(&self, x: &ArrayBase<D, Ix1>) -> Option<&TreeNode<F>> {
        match self {
            TreeNode::Leaf { .. } => None,
            TreeNode::Split {
                feature,
                threshold,
                left,
                right,
                ..
            } => {
                if x[*feature] <= *threshold {
                    Some(&**left)
                } else {
                    Some(&**right)
                }
            }
        }
    }

    /// Returns the length of the longest path from this node down to a leaf
    pub fn height(&self) -> usize {
        match self {
            TreeNode::Leaf { .. } => 0,
            TreeNode::Split { left, right, .. } => 1 + left.height().max(right.height()),
        }
    }
}

/// Recursive partitioning of the training samples
///
/// Rows are referenced by their index into the training records, a node is described by the
/// indices of the samples which reached it.
struct TreeBuilder<'a, F, R> {
    records: ArrayView2<'a, F>,
    targets: ArrayView1<'a, F>,
    max_depth: usize,
    min_samples_split: usize,
    n_split_features: usize,
    search: SplitSearch<'a, F>,
    rng: R,
}

impl<'a, F: Float, R: Rng> TreeBuilder<'a, F, R> {
    fn new(
        records: ArrayView2<'a, F>,
        targets: ArrayView1<'a, F>,
        hyperparameters: &RegressionTreeValidParams<F, R>,
        rng: R,
    ) -> Self {
        TreeBuilder {
            records,
            targets,
            max_depth: hyperparameters.max_depth(),
            min_samples_split: hyperparameters.min_samples_split(),
            n_split_features: hyperparameters
                .max_features()
                .select_count(records.ncols()),
            search: SplitSearch::new(records, targets),
            rng,
        }
    }

    fn leaf(&self, rows: &[usize]) -> TreeNode<F> {
        let sum = rows.iter().map(|&row| self.targets[row]).sum::<F>();

        TreeNode::Leaf {
            value: sum / F::cast(rows.len()),
        }
    }

    /// Recursively builds the subtree for the samples in `rows`
    ///
    /// `rows` is never empty: the root holds all samples and every accepted split leaves at
    /// least two samples on both sides.
    fn build(&mut self, rows: &[usize], depth: usize) -> TreeNode<F> {
        // return a leaf when the depth is exhausted, there are too few samples to split or all
        // targets agree
        if depth >= self.max_depth || rows.len() < self.min_samples_split {
            return self.leaf(rows);
        }

        let first = self.targets[rows[0]];
        if rows.iter().all(|&row| self.targets[row] == first) {
            return self.leaf(rows);
        }

        let features = sample(&mut self.rng, self.records.ncols(), self.n_split_features).into_vec();

        let best = match self.search.find_best(rows, &features) {
            Some(best) => best,
            None => {
                trace!(
                    "no usable split for {} samples at depth {}, features {:?}",
                    rows.len(),
                    depth,
                    features
                );
                return self.leaf(rows);
            }
        };

        let (left_rows, right_rows): (Vec<usize>, Vec<usize>) = rows
            .iter()
            .partition(|&&row| self.records[(row, best.feature)] <= best.threshold);

        let node_targets: Vec<F> = rows.iter().map(|&row| self.targets[row]).collect();
        let impurity_decrease = weighted_variance(&node_targets) - best.score;

        let left = self.build(&left_rows, depth + 1);
        let right = self.build(&right_rows, depth + 1);

        TreeNode::Split {
            feature: best.feature,
            threshold: best.threshold,
            impurity_decrease,
            left: Box::new(left),
            right: Box::new(right),
        }
    }
}

/// A fitted regression tree model.
///
/// ### Structure
/// A regression tree structure is a binary tree where:
/// * Each internal node specifies a decision, represented by a choice of a feature and a
/// "threshold" such that all observations for which `feature <= threshold` is true fall in the
/// left subtree, while the others fall in the right subtree.
///
/// * leaf nodes make predictions, and their prediction is the mean target of the training
/// samples which reached them
///
/// ### Algorithm
///
/// Starting with a single root node holding every sample, the tree is trained recursively by
/// applying the following rules to every node, in order:
///
/// * If the maximal depth is reached, the node holds fewer than `min_samples_split` samples or
///   all targets are identical, the node becomes a leaf;
/// * A random subset of the features is drawn without replacement, its size given by
///   [`MaxFeatures`](enum.MaxFeatures.html);
/// * For every drawn feature the 10th, 20th, ..., 90th percentile of its values within the node
///   are tried as thresholds. A threshold is only acceptable if both sides keep at least two
///   samples, and it is scored by `var(y_left) * |left| + var(y_right) * |right|`;
/// * If no threshold is acceptable the node becomes a leaf, otherwise the node is split at the
///   lowest scoring threshold and both children are trained recursively.
///
/// Ties between thresholds are won by the first one tried.
///
/// ### Predictions
///
/// To predict the target of a sample, the tree is traversed from the root to a leaf, choosing
/// between left and right children according to the values of the features of the sample. The
/// final prediction for the sample is the value of the reached leaf.
///
/// ### Example
///
/// Here is an example on how to train a regression tree from its parameters:
///
/// ```rust
/// use canopy::prelude::*;
/// use canopy_trees::RegressionTree;
/// use ndarray::array;
///
/// let dataset = Dataset::new(
///     array![[1., 0.], [2., 0.], [3., 1.], [4., 1.], [5., 0.], [6., 1.]],
///     array![1., 1., 2., 2., 3., 3.],
/// );
/// let tree = RegressionTree::params().max_depth(2).min_samples_split(2).fit(&dataset).unwrap();
///
/// assert!(tree.max_depth() <= 2);
/// ```
///
#[cfg_attr(
    feature = "serde",
    derive(Serialize, Deserialize),
    serde(crate = "serde_crate")
)]
#[derive(Debug, Clone, PartialEq)]
pub struct RegressionTree<F> {
    root_node: TreeNode<F>,
    num_features: usize,
}

impl<F: Float> RegressionTree<F> {
    /// Predicts the target of a single sample
    ///
    /// ### Panics
    ///
    /// If the sample has fewer features than the tree was trained on
    pub fn predict_one<D: Data<Elem = F>>(&self, x: &ArrayBase<D, Ix1>) -> F {
        let mut node = &self.root_node;

        loop {
            match node {
                TreeNode::Leaf { value } => return *value,
                TreeNode::Split {
                    feature,
                    threshold,
                    left,
                    right,
                    ..
                } => {
                    node = if x[*feature] <= *threshold {
                        &**left
                    } else {
                        &**right
                    };
                }
            }
        }
    }

    /// Create a node iterator in depth-first pre-order
    pub fn iter_nodes(&self) -> NodeIter<'_, F> {
        NodeIter::new(vec![&self.root_node])
    }

    /// Return the indices of all features used in a split, in ascending order
    pub fn features(&self) -> Vec<usize> {
        self.iter_nodes()
            .filter_map(|node| node.split())
            .map(|(feature, _)| feature)
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect()
    }

    /// Return the total impurity decrease of each feature, normalised to sum up to one
    ///
    /// A tree without any split returns zero for every feature.
    pub fn feature_importance(&self) -> Array1<F> {
        let mut importance = Array1::<F>::zeros(self.num_features);

        for node in self.iter_nodes() {
            if let Some((feature, _)) = node.split() {
                importance[feature] += node.impurity_decrease();
            }
        }

        let total = importance.sum();
        if total > F::zero() {
            importance /= total;
        }

        importance
    }

    /// Return root node of the tree
    pub fn root_node(&self) -> &TreeNode<F> {
        &self.root_node
    }

    /// Return the number of features the tree was trained on
    pub fn num_features(&self) -> usize {
        self.num_features
    }

    /// Return max depth of the tree
    pub fn max_depth(&self) -> usize {
        self.root_node.height()
    }

    /// Return the number of leaves in this tree
    pub fn num_leaves(&self) -> usize {
        self.iter_nodes().filter(|node| node.is_leaf()).count()
    }
}

impl<F: Float, D: Data<Elem = F>> PredictInplace<ArrayBase<D, Ix2>, Array1<F>>
    for RegressionTree<F>
{
    /// Make predictions for each row of a matrix of features `x`.
    fn predict_inplace(&self, x: &ArrayBase<D, Ix2>, y: &mut Array1<F>) {
        assert_eq!(
            x.nrows(),
            y.len(),
            "The number of data points must match the number of output targets."
        );
        assert_eq!(
            x.ncols(),
            self.num_features,
            "The number of features must match the number of features the tree was trained on."
        );

        for (row, target) in x.rows().into_iter().zip(y.iter_mut()) {
            *target = self.predict_one(&row);
        }
    }

    fn default_target(&self, x: &ArrayBase<D, Ix2>) -> Array1<F> {
        Array1::zeros(x.nrows())
    }
}

impl<F: Float, R: Rng + Clone, D, T> Fit<ArrayBase<D, Ix2>, T, Error>
    for RegressionTreeValidParams<F, R>
where
    D: Data<Elem = F>,
    T: AsTargets<Elem = F>,
{
    type Object = RegressionTree<F>;

    /// Fit a regression tree using `hyperparamters` on the dataset consisting of
    /// a matrix of features `x` and an array of targets `y`.
    ///
    /// Fails if the dataset is empty, has no features, if the number of targets does not match
    /// the number of samples or if any value is not finite.
    fn fit(&self, dataset: &DatasetBase<ArrayBase<D, Ix2>, T>) -> Result<Self::Object> {
        dataset.validate_regression()?;

        let records = dataset.records().view();
        let targets = dataset.targets().as_targets();
        let rows: Vec<usize> = (0..records.nrows()).collect();

        let mut builder = TreeBuilder::new(records, targets, self, self.rng().clone());
        let root_node = builder.build(&rows, 0);

        let tree = RegressionTree {
            root_node,
            num_features: dataset.nfeatures(),
        };

        debug!(
            "fitted regression tree on {} samples: depth {}, {} leaves",
            rows.len(),
            tree.max_depth(),
            tree.num_leaves()
        );

        Ok(tree)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use crate::{MaxFeatures, RegressionTreeParams};
    use approx::assert_abs_diff_eq;
    use canopy::{Dataset, ParamGuard};
    use ndarray::{array, s, Array, Array2};
    use rand::rngs::SmallRng;

    use ndarray_rand::{rand::SeedableRng, rand_distr::Uniform, RandomExt};

    fn params(seed: u64) -> RegressionTreeParams<f64, SmallRng> {
        RegressionTreeParams::new_fixed_rng(SmallRng::seed_from_u64(seed))
    }

    #[test]
    /// Constant targets never split, whatever the records look like
    fn constant_targets_give_single_leaf() -> Result<()> {
        let mut rng = SmallRng::seed_from_u64(42);
        let data = Array::random_using((20, 4), Uniform::new(-1., 1.), &mut rng);
        let dataset = Dataset::new(data, Array1::from_elem(20, 5.0));

        let tree = params(42).min_samples_split(2).fit(&dataset)?;

        assert_eq!(tree.root_node(), &TreeNode::Leaf { value: 5.0 });
        assert_eq!(tree.num_leaves(), 1);

        Ok(())
    }

    #[test]
    fn four_fives() -> Result<()> {
        let dataset = Dataset::new(array![[1., 9.], [2., 8.], [3., 7.], [4., 6.]], array![5., 5., 5., 5.]);
        let tree = params(0).min_samples_split(2).fit(&dataset)?;

        assert_eq!(tree.root_node().prediction(), Some(5.0));

        Ok(())
    }

    #[test]
    /// Two clusters perfectly separated by the first feature
    fn two_clusters_are_separated() -> Result<()> {
        let data = array![[0.1], [0.2], [0.3], [0.4], [0.6], [0.7], [0.8], [0.9]];
        let targets = array![1., 1., 1., 1., 5., 5., 5., 5.];
        let dataset = Dataset::new(data.clone(), targets.clone());

        let tree = params(1)
            .max_depth(1)
            .min_samples_split(2)
            .max_features(MaxFeatures::All)
            .fit(&dataset)?;

        let (feature, threshold) = tree.root_node().split().unwrap();
        assert_eq!(feature, 0);
        assert!(threshold > 0.4 && threshold < 0.6);

        assert_eq!(tree.predict(&data), targets);
        assert_eq!(tree.predict_one(&array![0.45]), 1.0);
        assert_eq!(tree.predict_one(&array![0.55]), 5.0);

        Ok(())
    }

    #[test]
    /// Generate a dataset where a single feature determines the target while the remaining
    /// features are uniform noise and do not add any information.
    fn single_feature_random_noise() -> Result<()> {
        let mut rng = SmallRng::seed_from_u64(7);
        let mut data = Array::random_using((60, 6), Uniform::new(-4., 4.), &mut rng);
        data.slice_mut(s![.., 4]).assign(
            &(0..60)
                .map(|x| if x < 30 { 0.0 } else { 1.0 })
                .collect::<Array1<_>>(),
        );
        let targets = (0..60)
            .map(|x| if x < 30 { 2.0 } else { 4.0 })
            .collect::<Array1<_>>();
        let dataset = Dataset::new(data, targets);

        let tree = params(3)
            .max_depth(3)
            .min_samples_split(2)
            .max_features(MaxFeatures::All)
            .fit(&dataset)?;

        // the informative feature yields a perfect split at the root
        assert_eq!(tree.features(), vec![4]);
        assert_eq!(tree.num_leaves(), 2);

        let importance = tree.feature_importance();
        assert_abs_diff_eq!(importance[4], 1.0, epsilon = 1e-12);
        assert_abs_diff_eq!(importance.sum(), 1.0, epsilon = 1e-12);

        assert_eq!(tree.predict(&dataset), dataset.targets);

        Ok(())
    }

    #[test]
    /// Check that for random data the max depth is respected
    fn check_max_depth() -> Result<()> {
        let mut rng = SmallRng::seed_from_u64(42);

        let data = Array::random_using((80, 5), Uniform::new(-1., 1.), &mut rng);
        let targets = Array::random_using(80, Uniform::new(0., 10.), &mut rng);
        let dataset = Dataset::new(data, targets);

        for max_depth in &[1, 2, 4, 8] {
            let tree = params(42)
                .max_depth(*max_depth)
                .min_samples_split(2)
                .max_features(MaxFeatures::All)
                .fit(&dataset)?;

            assert!(tree.max_depth() <= *max_depth);
            if *max_depth == 1 {
                assert_eq!(tree.max_depth(), 1);
            }
        }

        Ok(())
    }

    #[test]
    fn few_samples_give_single_leaf() -> Result<()> {
        let dataset = Dataset::new(array![[1.], [2.], [3.]], array![1., 2., 6.]);
        let tree = params(0).min_samples_split(4).fit(&dataset)?;

        assert_eq!(tree.root_node(), &TreeNode::Leaf { value: 3.0 });

        Ok(())
    }

    #[test]
    /// Records without distinct values cannot be split
    fn degenerate_records_give_single_leaf() -> Result<()> {
        let dataset = Dataset::new(Array2::from_elem((10, 3), 1.0), Array1::linspace(0., 9., 10));
        let tree = params(0).min_samples_split(2).fit(&dataset)?;

        assert!(tree.root_node().is_leaf());
        assert_abs_diff_eq!(tree.root_node().prediction().unwrap(), 4.5);

        Ok(())
    }

    #[test]
    /// Every sample follows exactly one path from the root to a leaf
    fn samples_route_to_exactly_one_leaf() -> Result<()> {
        let mut rng = SmallRng::seed_from_u64(3);
        let data = Array::random_using((100, 3), Uniform::new(0., 1.), &mut rng);
        let targets = data.column(0).mapv(|x: f64| (x * 5.).floor());
        let dataset = Dataset::new(data.clone(), targets);

        let tree = params(3).max_depth(6).min_samples_split(2).fit(&dataset)?;

        for row in data.rows() {
            let mut node = tree.root_node();
            let mut steps = 0;
            while let Some(child) = node.route(&row) {
                let (left, right) = node.children().unwrap();
                assert!(std::ptr::eq(child, left) != std::ptr::eq(child, right));
                node = child;
                steps += 1;
            }
            assert!(steps <= 6);
            assert_eq!(node.prediction(), Some(tree.predict_one(&row)));
        }

        Ok(())
    }

    #[test]
    fn same_seed_same_tree() -> Result<()> {
        let mut rng = SmallRng::seed_from_u64(11);
        let data = Array::random_using((50, 9), Uniform::new(0., 1.), &mut rng);
        let targets = Array::random_using(50, Uniform::new(1., 5.), &mut rng);
        let dataset = Dataset::new(data, targets);

        let first = params(5).min_samples_split(2).fit(&dataset)?;
        let second = params(5).min_samples_split(2).fit(&dataset)?;

        assert_eq!(first, second);

        Ok(())
    }

    #[test]
    fn predict_is_idempotent() -> Result<()> {
        let mut rng = SmallRng::seed_from_u64(2);
        let data = Array::random_using((40, 3), Uniform::new(0., 1.), &mut rng);
        let targets = data.sum_axis(ndarray::Axis(1));
        let dataset = Dataset::new(data.clone(), targets);

        let tree = params(2).min_samples_split(2).fit(&dataset)?;

        assert_eq!(tree.predict(&data), tree.predict(&data));

        Ok(())
    }

    #[test]
    fn single_precision_tree() -> Result<()> {
        let data = array![[0.1f32], [0.2], [0.3], [0.4], [0.6], [0.7], [0.8], [0.9]];
        let targets = array![1f32, 1., 1., 1., 5., 5., 5., 5.];
        let dataset = Dataset::new(data.clone(), targets.clone());

        let tree = RegressionTreeParams::new_fixed_rng(SmallRng::seed_from_u64(0))
            .min_samples_split(2)
            .fit(&dataset)?;

        assert_eq!(tree.predict(&data), targets);

        Ok(())
    }

    #[test]
    fn invalid_input_is_rejected() {
        let mismatch = Dataset::new(array![[1.], [2.]], array![1.]);
        assert!(matches!(
            params(0).fit(&mismatch),
            Err(Error::InvalidInput(_))
        ));

        let empty = Dataset::new(Array2::<f64>::zeros((0, 2)), Array1::<f64>::zeros(0));
        assert!(matches!(params(0).fit(&empty), Err(Error::InvalidInput(_))));
    }

    #[test]
    #[should_panic]
    /// Check that a tree without depth panics when checked
    fn panic_zero_max_depth() {
        RegressionTree::<f64>::params().max_depth(0).check().unwrap();
    }
}
