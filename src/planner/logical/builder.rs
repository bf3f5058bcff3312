//! Nested plan description and its lowering into an [`RaTree`].

use serde::{Deserialize, Serialize};

use super::plan::{NodeId, RaTree};

/// Serializable, nested form of a plan, as produced by an upstream planner.
///
/// ```json
/// {"selection": {"condition": "o.total > 10",
///                "child": {"relation": {"table": "orders", "alias": "o"}}}}
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PlanNode {
    Relation {
        table: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        alias: Option<String>,
    },
    Selection {
        condition: String,
        child: Box<PlanNode>,
    },
    Projection {
        columns: Vec<String>,
        child: Box<PlanNode>,
    },
    Join {
        left: Box<PlanNode>,
        right: Box<PlanNode>,
        #[serde(default = "cross_join_condition")]
        condition: String,
    },
    Subquery {
        #[serde(default, skip_serializing_if = "Option::is_none")]
        alias: Option<String>,
        child: Box<PlanNode>,
    },
}

fn cross_join_condition() -> String {
    "TRUE".to_string()
}

impl PlanNode {
    pub fn relation(table: impl Into<String>) -> Self {
        PlanNode::Relation {
            table: table.into(),
            alias: None,
        }
    }

    pub fn relation_as(table: impl Into<String>, alias: impl Into<String>) -> Self {
        PlanNode::Relation {
            table: table.into(),
            alias: Some(alias.into()),
        }
    }

    pub fn selection(condition: impl Into<String>, child: PlanNode) -> Self {
        PlanNode::Selection {
            condition: condition.into(),
            child: Box::new(child),
        }
    }

    pub fn projection<I, S>(columns: I, child: PlanNode) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        PlanNode::Projection {
            columns: columns.into_iter().map(Into::into).collect(),
            child: Box::new(child),
        }
    }

    pub fn join(left: PlanNode, right: PlanNode, condition: impl Into<String>) -> Self {
        PlanNode::Join {
            left: Box::new(left),
            right: Box::new(right),
            condition: condition.into(),
        }
    }

    pub fn subquery(alias: Option<String>, child: PlanNode) -> Self {
        PlanNode::Subquery {
            alias,
            child: Box::new(child),
        }
    }
}

impl RaTree {
    /// Lower a nested plan into a fresh arena, returning the arena and its root.
    pub fn from_plan(plan: &PlanNode) -> (RaTree, NodeId) {
        let mut tree = RaTree::new();
        let root = tree.insert_plan(plan);
        (tree, root)
    }

    /// Lower a nested plan into this arena and return its root.
    pub fn insert_plan(&mut self, plan: &PlanNode) -> NodeId {
        match plan {
            PlanNode::Relation { table, alias } => match alias {
                Some(alias) => self.relation_as(table.as_str(), alias.as_str()),
                None => self.relation(table.as_str()),
            },
            PlanNode::Selection { condition, child } => {
                let child = self.insert_plan(child);
                self.selection(condition.as_str(), child)
            }
            PlanNode::Projection { columns, child } => {
                let child = self.insert_plan(child);
                self.projection(columns.iter().map(String::as_str), child)
            }
            PlanNode::Join {
                left,
                right,
                condition,
            } => {
                let left = self.insert_plan(left);
                let right = self.insert_plan(right);
                self.join(left, right, condition.as_str())
            }
            PlanNode::Subquery { alias, child } => {
                let child = self.insert_plan(child);
                self.subquery(alias.clone(), child)
            }
        }
    }
}
