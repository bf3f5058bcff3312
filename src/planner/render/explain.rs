//! Indented, EXPLAIN-style text rendering of a plan.

use super::format::format_cost;
use crate::planner::cost::CostAnnotations;
use crate::planner::logical::{NodeId, RaNode, RaTree};
use crate::planner::{PlanError, PlanResult};

const INDENT: &str = "  ";

/// Render the plan under `root`, one operator per line, inputs indented
/// below their parent. Annotated nodes carry their costs.
///
/// ```text
/// Projection: o.id (cost=1.00e+02, cumulative=1.20e+03)
///   Selection: o.total > 10 (cost=1.00e+02, cumulative=1.10e+03)
///     Relation: orders AS o (cost=1.00e+03, cumulative=1.00e+03)
/// ```
pub fn explain(tree: &RaTree, root: NodeId, annotations: &CostAnnotations) -> PlanResult<String> {
    let mut lines = Vec::new();
    let mut stack = vec![(root, 0usize)];

    while let Some((id, depth)) = stack.pop() {
        let node = tree.node(id).ok_or(PlanError::UnknownNode(id))?;

        let mut line = INDENT.repeat(depth);
        line.push_str(&label(node));
        if let Some(cost) = annotations.get(id) {
            line.push_str(&format!(
                " (cost={}, cumulative={})",
                format_cost(cost.cost),
                format_cost(cost.cumulative_cost)
            ));
        }
        lines.push(line);

        let children: Vec<NodeId> = node.children().collect();
        for child in children.into_iter().rev() {
            stack.push((child, depth + 1));
        }
    }

    Ok(lines.join("\n"))
}

fn label(node: &RaNode) -> String {
    match node {
        RaNode::Relation(rel) => match &rel.alias {
            Some(alias) => format!("Relation: {} AS {}", rel.table_name, alias),
            None => format!("Relation: {}", rel.table_name),
        },
        RaNode::Selection(sel) => format!("Selection: {}", sel.condition),
        RaNode::Projection(proj) => format!("Projection: {}", proj.columns.join(", ")),
        RaNode::Join(join) => format!("Join: {}", join.condition),
        RaNode::Subquery(sub) => match &sub.alias {
            Some(alias) => format!("Subquery: {}", alias),
            None => "Subquery".to_string(),
        },
    }
}
