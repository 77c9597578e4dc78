// SPDX-License-Identifier: MIT

//! Execution order computation
//!
//! Produces the linear order in which a graph's nodes are interpreted for
//! one run. Depth-first: every dependency (edge source) of a node is
//! appended before the node itself. Seeded from `input`-kind nodes, or from
//! nodes with no incoming edge when a graph declares no inputs. A final
//! sweep over the declared node order guarantees every node appears exactly
//! once, disconnected subgraphs included.
//!
//! There is no cycle detection: the visited set is marked on entry, so a
//! cycle terminates with whichever node was reached first ordered after its
//! (not yet executed) dependency. Edge endpoints that name no declared node
//! are traversed as no-ops and never emitted.

use std::collections::{HashMap, HashSet};

use super::graph::{NodeKind, WorkflowGraph};

/// Compute the execution order for a graph.
///
/// Returns every declared node id exactly once, dependencies first.
pub fn execution_order(graph: &WorkflowGraph) -> Vec<String> {
    let node_ids: HashSet<&str> = graph.nodes.iter().map(|n| n.id.as_str()).collect();

    // Incoming-edge index: target -> sources, in declared edge order.
    let mut incoming: HashMap<&str, Vec<&str>> = HashMap::new();
    for edge in &graph.edges {
        incoming
            .entry(edge.target.as_str())
            .or_default()
            .push(edge.source.as_str());
    }

    let mut visited: HashSet<String> = HashSet::new();
    let mut order: Vec<String> = Vec::new();

    let seeds: Vec<&str> = {
        let inputs: Vec<&str> = graph
            .nodes
            .iter()
            .filter(|n| n.kind == NodeKind::Input)
            .map(|n| n.id.as_str())
            .collect();
        if inputs.is_empty() {
            graph
                .nodes
                .iter()
                .filter(|n| !graph.edges.iter().any(|e| e.target == n.id))
                .map(|n| n.id.as_str())
                .collect()
        } else {
            inputs
        }
    };

    for seed in seeds {
        visit(seed, &node_ids, &incoming, &mut visited, &mut order);
    }

    // Total coverage: any node unreachable from the seeds still executes.
    for node in &graph.nodes {
        visit(&node.id, &node_ids, &incoming, &mut visited, &mut order);
    }

    order
}

fn visit(
    id: &str,
    node_ids: &HashSet<&str>,
    incoming: &HashMap<&str, Vec<&str>>,
    visited: &mut HashSet<String>,
    order: &mut Vec<String>,
) {
    if !visited.insert(id.to_string()) {
        return;
    }

    if let Some(sources) = incoming.get(id) {
        for source in sources {
            visit(source, node_ids, incoming, visited, order);
        }
    }

    // A dangling edge source is visited but produces no entry.
    if node_ids.contains(id) {
        order.push(id.to_string());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn graph(nodes: Vec<(&str, &str)>, edges: Vec<(&str, &str)>) -> WorkflowGraph {
        serde_json::from_value(json!({
            "nodes": nodes
                .iter()
                .map(|(id, kind)| json!({ "id": id, "type": kind, "data": {} }))
                .collect::<Vec<_>>(),
            "edges": edges
                .iter()
                .enumerate()
                .map(|(i, (s, t))| json!({ "id": format!("e{}", i), "source": s, "target": t }))
                .collect::<Vec<_>>(),
        }))
        .unwrap()
    }

    fn position_of(order: &[String], id: &str) -> usize {
        order.iter().position(|n| n == id).unwrap()
    }

    #[test]
    fn test_linear_chain() {
        let g = graph(
            vec![("in", "input"), ("mid", "prompt"), ("out", "output")],
            vec![("in", "mid"), ("mid", "out")],
        );
        let order = execution_order(&g);
        assert_eq!(order, vec!["in", "mid", "out"]);
    }

    #[test]
    fn test_every_node_exactly_once() {
        let g = graph(
            vec![
                ("a", "input"),
                ("b", "prompt"),
                ("c", "condition"),
                ("d", "output"),
            ],
            vec![("a", "b"), ("a", "c"), ("b", "d"), ("c", "d")],
        );
        let order = execution_order(&g);
        assert_eq!(order.len(), 4);
        let unique: std::collections::HashSet<_> = order.iter().collect();
        assert_eq!(unique.len(), 4);
    }

    #[test]
    fn test_dependencies_before_dependents() {
        let g = graph(
            vec![
                ("a", "input"),
                ("b", "prompt"),
                ("c", "prompt"),
                ("d", "output"),
            ],
            vec![("a", "b"), ("a", "c"), ("b", "d"), ("c", "d")],
        );
        let order = execution_order(&g);
        assert!(position_of(&order, "a") < position_of(&order, "b"));
        assert!(position_of(&order, "a") < position_of(&order, "c"));
        assert!(position_of(&order, "b") < position_of(&order, "d"));
        assert!(position_of(&order, "c") < position_of(&order, "d"));
    }

    #[test]
    fn test_no_input_nodes_seeds_from_roots() {
        let g = graph(
            vec![("a", "prompt"), ("b", "data-transform"), ("c", "output")],
            vec![("a", "b"), ("b", "c")],
        );
        let order = execution_order(&g);
        assert_eq!(order, vec!["a", "b", "c"]);
    }

    #[test]
    fn test_disconnected_subgraph_is_covered() {
        let g = graph(
            vec![
                ("in", "input"),
                ("out", "output"),
                ("island-1", "prompt"),
                ("island-2", "prompt"),
            ],
            vec![("in", "out"), ("island-1", "island-2")],
        );
        let order = execution_order(&g);
        assert_eq!(order.len(), 4);
        assert!(position_of(&order, "island-1") < position_of(&order, "island-2"));
    }

    #[test]
    fn test_cycle_terminates_and_covers_all() {
        let g = graph(
            vec![("a", "prompt"), ("b", "prompt")],
            vec![("a", "b"), ("b", "a")],
        );
        let order = execution_order(&g);
        assert_eq!(order.len(), 2);
        let unique: std::collections::HashSet<_> = order.iter().collect();
        assert_eq!(unique.len(), 2);
    }

    #[test]
    fn test_self_edge_terminates() {
        let g = graph(vec![("a", "prompt")], vec![("a", "a")]);
        let order = execution_order(&g);
        assert_eq!(order, vec!["a"]);
    }

    #[test]
    fn test_dangling_edge_source_is_skipped() {
        let g = graph(
            vec![("in", "input"), ("out", "output")],
            vec![("ghost", "out"), ("in", "out")],
        );
        let order = execution_order(&g);
        assert_eq!(order.len(), 2);
        assert!(!order.iter().any(|id| id == "ghost"));
        assert!(position_of(&order, "in") < position_of(&order, "out"));
    }

    #[test]
    fn test_dangling_edge_target_is_ignored() {
        let g = graph(vec![("in", "input")], vec![("in", "ghost")]);
        let order = execution_order(&g);
        assert_eq!(order, vec!["in"]);
    }

    #[test]
    fn test_empty_graph() {
        let g = WorkflowGraph::default();
        assert!(execution_order(&g).is_empty());
    }

    #[test]
    fn test_multiple_input_seeds_in_declared_order() {
        let g = graph(
            vec![("in-2", "input"), ("in-1", "input"), ("join", "output")],
            vec![("in-1", "join"), ("in-2", "join")],
        );
        let order = execution_order(&g);
        // Seeds run in declared node order; "in-2" is declared first.
        assert_eq!(order[0], "in-2");
        assert_eq!(order.last().unwrap(), "join");
    }
}
