use racost::metadata::TableStats;
use racost::planner::cost::{estimate_cost, visualize_costs, CostEstimator, CostModel, NodeCost};
use racost::planner::logical::{RaNode, RaTree};
use racost::planner::PlanError;

fn stats(entries: &[(&str, u64)]) -> TableStats {
    entries.iter().map(|(name, rows)| (*name, *rows)).collect()
}

#[test]
fn test_relation_uses_table_stats() {
    let mut tree = RaTree::new();
    let orders = tree.relation("orders");

    let costs = estimate_cost(&tree, orders, &stats(&[("orders", 1000)])).unwrap();

    assert_eq!(
        costs.get(orders),
        Some(NodeCost {
            cost: 1000.0,
            cumulative_cost: 1000.0
        })
    );
}

#[test]
fn test_selection_over_relation() {
    let mut tree = RaTree::new();
    let orders = tree.relation("orders");
    let filter = tree.selection("orders.total > 10", orders);

    let costs = estimate_cost(&tree, filter, &stats(&[("orders", 1000)])).unwrap();

    assert_eq!(costs.cost(filter), Some(100.0));
    assert_eq!(costs.cumulative_cost(filter), Some(1100.0));
    assert_eq!(costs.cumulative_cost(orders), Some(1000.0));
}

#[test]
fn test_missing_stats_fall_back_to_default_rows() {
    let mut tree = RaTree::new();
    let t = tree.relation("t");

    let costs = estimate_cost(&tree, t, &TableStats::new()).unwrap();

    assert_eq!(costs.cost(t), Some(100_000.0));
    assert_eq!(costs.cumulative_cost(t), Some(100_000.0));
}

#[test]
fn test_join_floor_applies_to_small_inputs() {
    let mut tree = RaTree::new();
    let a = tree.relation("a");
    let b = tree.relation("b");
    let join = tree.join(a, b, "a.id = b.id");

    let costs = estimate_cost(&tree, join, &stats(&[("a", 10), ("b", 5)])).unwrap();

    assert_eq!(costs.cost(join), Some(50.0));
    assert_eq!(costs.cumulative_cost(join), Some(65.0));
}

#[test]
fn test_join_scales_cross_product() {
    let mut tree = RaTree::new();
    let a = tree.relation("a");
    let b = tree.relation("b");
    let join = tree.join(a, b, "a.id = b.id");

    let costs = estimate_cost(&tree, join, &stats(&[("a", 1000), ("b", 1000)])).unwrap();

    assert_eq!(costs.cost(join), Some(10_000.0));
    assert_eq!(costs.cumulative_cost(join), Some(12_000.0));
}

#[test]
fn test_projection_over_selection() {
    let mut tree = RaTree::new();
    let a = tree.relation("a");
    let filter = tree.selection("a.x > 1", a);
    let project = tree.projection(["a.x"], filter);

    let costs = estimate_cost(&tree, project, &stats(&[("a", 1000)])).unwrap();

    assert_eq!(costs.cost(project), Some(100.0));
    assert_eq!(costs.cumulative_cost(project), Some(1200.0));
}

#[test]
fn test_subquery_is_cost_transparent() {
    let mut tree = RaTree::new();
    let a = tree.relation("a");
    let filter = tree.selection("a.x > 1", a);
    let sub = tree.subquery(Some("s".to_string()), filter);

    let costs = estimate_cost(&tree, sub, &stats(&[("a", 5000)])).unwrap();

    assert_eq!(costs.cost(sub), costs.cost(filter));
    assert_eq!(costs.cost(sub), Some(500.0));
    assert_eq!(costs.cumulative_cost(sub), Some(500.0 + 5500.0));
}

#[test]
fn test_selection_floor() {
    let mut tree = RaTree::new();
    let tiny = tree.relation("tiny");
    let filter = tree.selection("tiny.flag", tiny);

    let costs = estimate_cost(&tree, filter, &stats(&[("tiny", 3)])).unwrap();

    assert_eq!(costs.cost(filter), Some(1.0));
    assert_eq!(costs.cumulative_cost(filter), Some(4.0));
}

#[test]
fn test_empty_table_costs_zero() {
    let mut tree = RaTree::new();
    let empty = tree.relation("empty");
    let project = tree.projection(["empty.id"], empty);

    let costs = estimate_cost(&tree, project, &stats(&[("empty", 0)])).unwrap();

    assert_eq!(costs.cost(empty), Some(0.0));
    assert_eq!(costs.cost(project), Some(0.0));
    assert_eq!(costs.cumulative_cost(project), Some(0.0));
}

#[test]
fn test_join_keeps_left_and_right() {
    let mut tree = RaTree::new();
    let big = tree.relation("big");
    let small = tree.relation("small");
    let join = tree.join(big, small, "big.id = small.id");
    let swapped = tree.join(small, big, "big.id = small.id");
    let table_stats = stats(&[("big", 20_000), ("small", 30)]);

    let costs = estimate_cost(&tree, join, &table_stats).unwrap();
    let swapped_costs = estimate_cost(&tree, swapped, &table_stats).unwrap();

    assert_eq!(costs.cost(join), swapped_costs.cost(swapped));

    let RaNode::Join(node) = tree.node(join).unwrap() else {
        panic!("expected join");
    };
    assert_eq!((node.left, node.right), (big, small));
}

#[test]
fn test_every_reachable_node_annotated() {
    let mut tree = RaTree::new();
    let a = tree.relation("a");
    let b = tree.relation("b");
    let join = tree.join(a, b, "TRUE");
    let filter = tree.selection("a.x = b.x", join);
    let root = tree.projection(["a.x"], filter);
    let unrelated = tree.relation("c");

    let costs = estimate_cost(&tree, root, &TableStats::new()).unwrap();

    for id in [a, b, join, filter, root] {
        assert!(costs.get(id).is_some(), "node {} not annotated", id);
    }
    assert_eq!(costs.get(unrelated), None);
    assert_eq!(costs.len(), 5);
    assert_eq!(costs.total_cost(), costs[root].cumulative_cost);
}

#[test]
fn test_shared_input_is_counted_per_parent() {
    let mut tree = RaTree::new();
    let a = tree.relation("a");
    let self_join = tree.join(a, a, "a.parent = a.id");

    let costs = estimate_cost(&tree, self_join, &stats(&[("a", 1000)])).unwrap();

    assert_eq!(costs.len(), 2);
    assert_eq!(costs.cost(self_join), Some(10_000.0));
    assert_eq!(costs.cumulative_cost(self_join), Some(12_000.0));
}

#[test]
fn test_self_join_chain_prices_every_path() {
    let mut tree = RaTree::new();
    let a = tree.relation("a");
    let mut top = a;
    for _ in 0..12 {
        top = tree.join(top, top, "TRUE");
    }

    let costs = estimate_cost(&tree, top, &stats(&[("a", 10)])).unwrap();

    assert_eq!(costs.len(), 13);
    // max(50, 10 * 10 * 0.01) = 50 at every level
    assert_eq!(costs.cost(top), Some(50.0));
    // cumulative doubles per level: c(k) = 50 + 2 * c(k - 1), c(0) = 10
    let mut expected = 10.0;
    for _ in 0..12 {
        expected = 50.0 + 2.0 * expected;
    }
    assert_eq!(costs.cumulative_cost(top), Some(expected));
}

#[test]
fn test_shared_input_checks_depth_on_every_path() {
    let mut tree = RaTree::new();
    let a = tree.relation("a");
    let shared = tree.selection("a.x = 1", a);
    // Left path reaches `shared` at depth 2, right path at depth 4.
    let deep = tree.projection(["a.x"], shared);
    let deeper = tree.subquery(None, deep);
    let root = tree.join(shared, deeper, "TRUE");

    let model = CostModel {
        max_depth: 4,
        ..CostModel::default()
    };
    let stats = stats(&[("a", 1000)]);
    assert_eq!(
        CostEstimator::new(&stats).with_model(model).estimate(&tree, root),
        Err(PlanError::DepthLimitExceeded { limit: 4 })
    );

    let model = CostModel {
        max_depth: 5,
        ..CostModel::default()
    };
    assert!(CostEstimator::new(&stats).with_model(model).estimate(&tree, root).is_ok());
}

#[test]
fn test_estimation_leaves_tree_untouched() {
    let mut tree = RaTree::new();
    let a = tree.relation("a");
    let root = tree.selection("a.x > 0", a);
    let before = tree.clone();

    let first = estimate_cost(&tree, root, &stats(&[("a", 10)])).unwrap();
    let second = estimate_cost(&tree, root, &stats(&[("a", 10_000)])).unwrap();

    assert_eq!(tree, before);
    assert_eq!(first.cost(a), Some(10.0));
    assert_eq!(second.cost(a), Some(10_000.0));
}

#[test]
fn test_foreign_root_is_reported() {
    let mut other = RaTree::new();
    other.relation("x");
    let foreign = other.relation("y");

    let mut tree = RaTree::new();
    tree.relation("a");

    let result = CostEstimator::new(&TableStats::new()).estimate(&tree, foreign);
    assert_eq!(result, Err(PlanError::UnknownNode(foreign)));
}

#[test]
fn test_deep_plan_hits_depth_limit() {
    let mut tree = RaTree::new();
    let mut top = tree.relation("a");
    for _ in 0..2000 {
        top = tree.projection(["a.x"], top);
    }

    let result = estimate_cost(&tree, top, &TableStats::new());
    assert_eq!(result, Err(PlanError::DepthLimitExceeded { limit: 1024 }));
}

#[test]
fn test_deep_plan_within_limit() {
    let mut tree = RaTree::new();
    let mut top = tree.relation("a");
    for _ in 0..500 {
        top = tree.projection(["a.x"], top);
    }

    let costs = estimate_cost(&tree, top, &stats(&[("a", 10)])).unwrap();
    assert_eq!(costs.cost(top), Some(10.0));
    assert_eq!(costs.cumulative_cost(top), Some(10.0 * 501.0));
}

#[test]
fn test_visualize_costs_is_noop() {
    let mut tree = RaTree::new();
    let a = tree.relation("a");
    let costs = estimate_cost(&tree, a, &TableStats::new()).unwrap();
    let before = costs.clone();

    visualize_costs(&tree, a, &costs);

    assert_eq!(costs, before);
}
