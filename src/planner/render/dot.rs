//! Graphviz DOT rendering of an annotated plan.

use std::fmt::Write;

use super::format::{
    escape_dot, format_cost, truncate, MAX_CONDITION_CHARS, MAX_PROJECTION_COLUMNS,
};
use crate::planner::cost::CostAnnotations;
use crate::planner::logical::{NodeId, RaNode, RaTree};
use crate::planner::{PlanError, PlanResult};

/// Fill color per operator.
fn fill_color(node: &RaNode) -> &'static str {
    match node {
        RaNode::Relation(_) => "#AED6F1",
        RaNode::Selection(_) => "#F9E79F",
        RaNode::Projection(_) => "#ABEBC6",
        RaNode::Join(_) => "#F5B7B1",
        RaNode::Subquery(_) => "#D7BDE2",
    }
}

/// Render the plan under `root` as a bottom-to-top digraph.
///
/// Every visit gets its own DOT node, so a shared input is drawn once per
/// parent. Edges run from input to consumer.
pub fn to_dot(tree: &RaTree, root: NodeId, annotations: &CostAnnotations) -> PlanResult<String> {
    let mut out = String::new();
    out.push_str("digraph plan {\n");
    out.push_str("    rankdir=BT;\n");
    out.push_str("    node [shape=box, style=\"rounded,filled\", fontname=\"Helvetica\"];\n");

    let mut edges = Vec::new();
    let mut next_id = 0usize;
    let mut stack: Vec<(NodeId, Option<usize>)> = vec![(root, None)];

    while let Some((id, parent)) = stack.pop() {
        let node = tree.node(id).ok_or(PlanError::UnknownNode(id))?;
        let dot_id = next_id;
        next_id += 1;

        let mut text = label(node);
        if let Some(cost) = annotations.get(id) {
            text.push_str(&format!("\nCost: {}", format_cost(cost.cost)));
            text.push_str(&format!(
                "\nCumulative Cost: {}",
                format_cost(cost.cumulative_cost)
            ));
        }

        // Writing to a String cannot fail.
        let _ = writeln!(
            out,
            "    n{} [label=\"{}\", fillcolor=\"{}\"];",
            dot_id,
            escape_dot(&text),
            fill_color(node)
        );

        if let Some(parent) = parent {
            edges.push((dot_id, parent));
        }

        let children: Vec<NodeId> = node.children().collect();
        for child in children.into_iter().rev() {
            stack.push((child, Some(dot_id)));
        }
    }

    for (from, to) in edges {
        let _ = writeln!(out, "    n{} -> n{};", from, to);
    }
    out.push('}');

    Ok(out)
}

fn label(node: &RaNode) -> String {
    match node {
        RaNode::Relation(rel) => match &rel.alias {
            Some(alias) => format!("Table: {} AS {}", rel.table_name, alias),
            None => format!("Table: {}", rel.table_name),
        },
        RaNode::Selection(sel) => {
            format!("σ\n{}", truncate(&sel.condition, MAX_CONDITION_CHARS))
        }
        RaNode::Projection(proj) => {
            let mut text = String::from("π");
            for column in proj.columns.iter().take(MAX_PROJECTION_COLUMNS) {
                text.push_str("\n• ");
                text.push_str(column);
            }
            if proj.columns.len() > MAX_PROJECTION_COLUMNS {
                text.push_str("\n...");
            }
            text
        }
        RaNode::Join(join) => {
            format!("Join({})", truncate(&join.condition, MAX_CONDITION_CHARS))
        }
        RaNode::Subquery(sub) => format!("Subquery: {}", sub.alias.as_deref().unwrap_or("")),
    }
}
