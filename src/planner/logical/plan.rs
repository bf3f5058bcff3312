//! Relational-algebra plan nodes, stored in an arena.

use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fmt;

/// Handle to a node inside an [`RaTree`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct NodeId(usize);

impl NodeId {
    /// Position of the node in its arena.
    pub fn index(self) -> usize {
        self.0
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Relational-algebra operator.
#[derive(Debug, Clone, PartialEq)]
pub enum RaNode {
    Relation(RelationNode),
    Selection(SelectionNode),
    Projection(ProjectionNode),
    Join(JoinNode),
    Subquery(SubqueryNode),
}

/// Base table scan.
#[derive(Debug, Clone, PartialEq)]
pub struct RelationNode {
    pub table_name: String,
    pub alias: Option<String>,
}

/// Filter rows.
#[derive(Debug, Clone, PartialEq)]
pub struct SelectionNode {
    pub child: NodeId,
    /// Predicate text, opaque to cost estimation.
    pub condition: String,
}

/// Project columns.
#[derive(Debug, Clone, PartialEq)]
pub struct ProjectionNode {
    pub child: NodeId,
    pub columns: Vec<String>,
}

/// Join two inputs. A cross join carries the condition `TRUE`.
#[derive(Debug, Clone, PartialEq)]
pub struct JoinNode {
    pub left: NodeId,
    pub right: NodeId,
    pub condition: String,
}

/// Nested plan materialized as a single operator.
#[derive(Debug, Clone, PartialEq)]
pub struct SubqueryNode {
    pub child: NodeId,
    pub alias: Option<String>,
}

impl RaNode {
    /// Operator name used in logs and rendered output.
    pub fn name(&self) -> &'static str {
        match self {
            RaNode::Relation(_) => "Relation",
            RaNode::Selection(_) => "Selection",
            RaNode::Projection(_) => "Projection",
            RaNode::Join(_) => "Join",
            RaNode::Subquery(_) => "Subquery",
        }
    }

    /// Direct inputs, left before right.
    pub fn children(&self) -> impl Iterator<Item = NodeId> {
        let (first, second) = match self {
            RaNode::Relation(_) => (None, None),
            RaNode::Selection(n) => (Some(n.child), None),
            RaNode::Projection(n) => (Some(n.child), None),
            RaNode::Join(n) => (Some(n.left), Some(n.right)),
            RaNode::Subquery(n) => (Some(n.child), None),
        };
        first.into_iter().chain(second)
    }

    pub fn is_leaf(&self) -> bool {
        matches!(self, RaNode::Relation(_))
    }
}

/// Arena holding the nodes of one or more plans.
///
/// Children must already live in the arena when their parent is added, so
/// every plan reachable from a node is finite and acyclic. A child may be
/// shared by several parents; the estimator and renderers then visit it once
/// per parent. Nothing is cached between visits, so a chain of k self-joins
/// costs 2^k visits, and the depth limit does not catch it.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RaTree {
    nodes: Vec<RaNode>,
}

impl RaTree {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn contains(&self, id: NodeId) -> bool {
        id.0 < self.nodes.len()
    }

    pub fn node(&self, id: NodeId) -> Option<&RaNode> {
        self.nodes.get(id.0)
    }

    /// All node ids in insertion order.
    pub fn ids(&self) -> impl Iterator<Item = NodeId> {
        (0..self.nodes.len()).map(NodeId)
    }

    pub fn relation(&mut self, table_name: impl Into<String>) -> NodeId {
        self.push(RaNode::Relation(RelationNode {
            table_name: table_name.into(),
            alias: None,
        }))
    }

    pub fn relation_as(
        &mut self,
        table_name: impl Into<String>,
        alias: impl Into<String>,
    ) -> NodeId {
        self.push(RaNode::Relation(RelationNode {
            table_name: table_name.into(),
            alias: Some(alias.into()),
        }))
    }

    /// # Panics
    ///
    /// Panics if `child` is not a node of this arena. The same holds for every
    /// other operator constructor.
    pub fn selection(&mut self, condition: impl Into<String>, child: NodeId) -> NodeId {
        self.check_child(child);
        self.push(RaNode::Selection(SelectionNode {
            child,
            condition: condition.into(),
        }))
    }

    pub fn projection<I, S>(&mut self, columns: I, child: NodeId) -> NodeId
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.check_child(child);
        self.push(RaNode::Projection(ProjectionNode {
            child,
            columns: columns.into_iter().map(Into::into).collect(),
        }))
    }

    pub fn join(&mut self, left: NodeId, right: NodeId, condition: impl Into<String>) -> NodeId {
        self.check_child(left);
        self.check_child(right);
        self.push(RaNode::Join(JoinNode {
            left,
            right,
            condition: condition.into(),
        }))
    }

    pub fn subquery(&mut self, alias: Option<String>, child: NodeId) -> NodeId {
        self.check_child(child);
        self.push(RaNode::Subquery(SubqueryNode { child, alias }))
    }

    /// Name under which the output of `id` can be referenced.
    ///
    /// Relations and subqueries prefer their alias; filters and projections
    /// inherit it from their input. Joins have none.
    pub fn output_alias(&self, id: NodeId) -> Option<&str> {
        match self.node(id)? {
            RaNode::Relation(rel) => Some(rel.alias.as_deref().unwrap_or(&rel.table_name)),
            RaNode::Selection(sel) => self.output_alias(sel.child),
            RaNode::Projection(proj) => self.output_alias(proj.child),
            RaNode::Subquery(sub) => match &sub.alias {
                Some(alias) => Some(alias.as_str()),
                None => self.output_alias(sub.child),
            },
            RaNode::Join(_) => None,
        }
    }

    /// Nodes reachable from `root`, children before parents. A shared node
    /// appears once, at its first visit.
    ///
    /// Ids that are not part of the arena are skipped.
    pub fn post_order(&self, root: NodeId) -> Vec<NodeId> {
        let mut order = Vec::new();
        let mut seen = HashSet::new();
        let mut stack = vec![(root, false)];

        while let Some((id, expanded)) = stack.pop() {
            let Some(node) = self.node(id) else {
                continue;
            };
            if expanded {
                order.push(id);
                continue;
            }
            if !seen.insert(id) {
                continue;
            }
            stack.push((id, true));
            let children: Vec<NodeId> = node.children().collect();
            for child in children.into_iter().rev() {
                stack.push((child, false));
            }
        }

        order
    }

    fn push(&mut self, node: RaNode) -> NodeId {
        let id = NodeId(self.nodes.len());
        self.nodes.push(node);
        id
    }

    fn check_child(&self, child: NodeId) {
        assert!(
            self.contains(child),
            "child {} is not part of this plan ({} nodes)",
            child,
            self.nodes.len()
        );
    }
}
