//! Cost estimation for relational-algebra plans.

use std::collections::HashMap;
use std::ops::Index;

use serde::ser::{Serialize, SerializeStruct, Serializer};
use tracing::{debug, trace, warn};

use super::model::CostModel;
use crate::metadata::TableStats;
use crate::planner::logical::{NodeId, RaNode, RaTree};
use crate::planner::{PlanError, PlanResult};

/// Estimated cost of one operator.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct NodeCost {
    /// Work of this operator alone, roughly its output size.
    pub cost: f64,
    /// `cost` plus the cumulative cost of every direct input.
    pub cumulative_cost: f64,
}

impl NodeCost {
    fn leaf(cost: f64) -> Self {
        Self {
            cost,
            cumulative_cost: cost,
        }
    }

    fn over(cost: f64, inputs: &[NodeCost]) -> Self {
        Self {
            cost,
            cumulative_cost: cost + inputs.iter().map(|c| c.cumulative_cost).sum::<f64>(),
        }
    }
}

/// Costs of every node reachable from the estimated root.
///
/// Kept apart from the plan so the tree stays immutable and can be
/// re-estimated with different statistics.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CostAnnotations {
    root: Option<NodeId>,
    costs: HashMap<NodeId, NodeCost>,
    /// First-visit post-order, for stable output.
    order: Vec<NodeId>,
}

impl CostAnnotations {
    /// Root the annotations were computed from.
    pub fn root(&self) -> Option<NodeId> {
        self.root
    }

    pub fn get(&self, id: NodeId) -> Option<NodeCost> {
        self.costs.get(&id).copied()
    }

    pub fn cost(&self, id: NodeId) -> Option<f64> {
        self.get(id).map(|c| c.cost)
    }

    pub fn cumulative_cost(&self, id: NodeId) -> Option<f64> {
        self.get(id).map(|c| c.cumulative_cost)
    }

    /// Cumulative cost of the root, `0.0` before estimation.
    pub fn total_cost(&self) -> f64 {
        self.root
            .and_then(|root| self.cumulative_cost(root))
            .unwrap_or(0.0)
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    /// Annotated nodes, children before parents.
    pub fn iter(&self) -> impl Iterator<Item = (NodeId, NodeCost)> + '_ {
        self.order.iter().map(move |id| (*id, self.costs[id]))
    }

    fn record(&mut self, id: NodeId, cost: NodeCost) {
        if self.costs.insert(id, cost).is_none() {
            self.order.push(id);
        }
    }
}

impl Index<NodeId> for CostAnnotations {
    type Output = NodeCost;

    fn index(&self, id: NodeId) -> &NodeCost {
        match self.costs.get(&id) {
            Some(cost) => cost,
            None => panic!("node {} has no cost annotation", id),
        }
    }
}

struct AnnotationRecord {
    node: NodeId,
    cost: NodeCost,
}

impl Serialize for AnnotationRecord {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut record = serializer.serialize_struct("NodeCost", 3)?;
        record.serialize_field("node", &self.node)?;
        record.serialize_field("cost", &self.cost.cost)?;
        record.serialize_field("cumulative_cost", &self.cost.cumulative_cost)?;
        record.end()
    }
}

impl Serialize for CostAnnotations {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_seq(
            self.iter()
                .map(|(node, cost)| AnnotationRecord { node, cost }),
        )
    }
}

/// Walks a plan bottom-up and prices every operator.
pub struct CostEstimator<'a> {
    stats: &'a TableStats,
    model: CostModel,
}

impl<'a> CostEstimator<'a> {
    pub fn new(stats: &'a TableStats) -> Self {
        Self {
            stats,
            model: CostModel::default(),
        }
    }

    /// Use a custom cost model. Call [`CostModel::validate`] first when the
    /// constants come from user input.
    pub fn with_model(mut self, model: CostModel) -> Self {
        self.model = model;
        self
    }

    pub fn model(&self) -> &CostModel {
        &self.model
    }

    /// Estimate every node reachable from `root`.
    ///
    /// Children are priced before their parent, left input before right.
    /// Only fails when `root` does not belong to `tree` or the plan is deeper
    /// than [`CostModel::max_depth`].
    ///
    /// A shared input is priced again on every path that reaches it, so the
    /// work grows with the number of paths rather than the number of nodes.
    /// A chain of k self-joins takes 2^k visits and stays well under the
    /// depth limit.
    pub fn estimate(&self, tree: &RaTree, root: NodeId) -> PlanResult<CostAnnotations> {
        let mut annotations = CostAnnotations {
            root: Some(root),
            ..CostAnnotations::default()
        };

        self.annotate(tree, root, 1, &mut annotations)?;

        debug!(
            root = %root,
            nodes = annotations.len(),
            total_cost = annotations.total_cost(),
            "estimated plan cost"
        );
        Ok(annotations)
    }

    fn annotate(
        &self,
        tree: &RaTree,
        id: NodeId,
        depth: usize,
        out: &mut CostAnnotations,
    ) -> PlanResult<NodeCost> {
        if depth > self.model.max_depth {
            return Err(PlanError::DepthLimitExceeded {
                limit: self.model.max_depth,
            });
        }

        let node = tree.node(id).ok_or(PlanError::UnknownNode(id))?;

        let estimate = match node {
            RaNode::Relation(rel) => {
                let row_count = self.stats.get(&rel.table_name);
                if row_count.is_none() {
                    warn!(
                        table = %rel.table_name,
                        fallback = self.model.default_row_count,
                        "no statistics for table, using fallback row count"
                    );
                }
                NodeCost::leaf(self.model.relation_cost(row_count))
            }
            RaNode::Selection(sel) => {
                let input = self.annotate(tree, sel.child, depth + 1, out)?;
                NodeCost::over(self.model.selection_cost(input.cost), &[input])
            }
            RaNode::Projection(proj) => {
                let input = self.annotate(tree, proj.child, depth + 1, out)?;
                NodeCost::over(input.cost, &[input])
            }
            RaNode::Join(join) => {
                let left = self.annotate(tree, join.left, depth + 1, out)?;
                let right = self.annotate(tree, join.right, depth + 1, out)?;
                NodeCost::over(self.model.join_cost(left.cost, right.cost), &[left, right])
            }
            RaNode::Subquery(sub) => {
                let input = self.annotate(tree, sub.child, depth + 1, out)?;
                NodeCost::over(input.cost, &[input])
            }
        };

        trace!(
            node = %id,
            op = node.name(),
            cost = estimate.cost,
            cumulative_cost = estimate.cumulative_cost,
            "annotated node"
        );
        out.record(id, estimate);
        Ok(estimate)
    }
}
