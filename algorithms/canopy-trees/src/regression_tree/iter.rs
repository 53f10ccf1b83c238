use std::iter::Iterator;

use super::TreeNode;
use canopy::Float;

/// Depth-first pre-order iterator of nodes in a regression tree
///
/// Every node is visited before its children and the left subtree before the right one.
pub struct NodeIter<'a, F> {
    stack: Vec<&'a TreeNode<F>>,
}

impl<'a, F> NodeIter<'a, F> {
    pub fn new(stack: Vec<&'a TreeNode<F>>) -> Self {
        NodeIter { stack }
    }
}

impl<'a, F: Float> Iterator for NodeIter<'a, F> {
    type Item = &'a TreeNode<F>;

    fn next(&mut self) -> Option<Self::Item> {
        self.stack.pop().map(|node| {
            if let Some((left, right)) = node.children() {
                self.stack.push(right);
                self.stack.push(left);
            }

            node
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn leaf(value: f64) -> TreeNode<f64> {
        TreeNode::Leaf { value }
    }

    fn split(feature: usize, left: TreeNode<f64>, right: TreeNode<f64>) -> TreeNode<f64> {
        TreeNode::Split {
            feature,
            threshold: 0.5,
            impurity_decrease: 1.0,
            left: Box::new(left),
            right: Box::new(right),
        }
    }

    #[test]
    fn visits_in_pre_order() {
        let root = split(0, split(1, leaf(1.), leaf(2.)), leaf(3.));

        let visited = NodeIter::new(vec![&root])
            .map(|node| node.prediction().map(|v| v as i32).unwrap_or(-1))
            .collect::<Vec<_>>();

        assert_eq!(visited, vec![-1, -1, 1, 2, 3]);
    }

    #[test]
    fn single_leaf() {
        let root = leaf(4.);

        assert_eq!(NodeIter::new(vec![&root]).count(), 1);
    }
}
