#[cfg(test)]
mod tests {
    use crate::graph::{canonical_edge, DynamicGraph, NodeId};
    use crate::error::SamplingError;
    use pretty_assertions::assert_eq;
    use rand::{Rng, SeedableRng};
    use rand_pcg::Pcg64;

    fn create_test_graph() -> DynamicGraph {
        // Triangle 1-2-3 plus a tail 3-4
        let mut graph = DynamicGraph::new();
        for &(u, v) in &[(1, 2), (2, 3), (1, 3), (3, 4)] {
            assert!(graph.add_edge(u, v).unwrap());
        }
        graph
    }

    fn sorted(mut nodes: Vec<NodeId>) -> Vec<NodeId> {
        nodes.sort_unstable();
        nodes
    }

    #[test]
    fn test_graph_creation() {
        let graph = create_test_graph();

        assert_eq!(graph.num_nodes(), 4);
        assert_eq!(graph.num_edges(), 4);
        assert_eq!(graph.degree(3), 3);
        assert_eq!(graph.degree(4), 1);
        assert_eq!(graph.degree(99), 0);
        assert_eq!(sorted(graph.nodes()), vec![1, 2, 3, 4]);
        assert_eq!(sorted(graph.neighbors(3)), vec![1, 2, 4]);
        assert!(graph.neighbors(99).is_empty());
    }

    #[test]
    fn test_edges_reported_in_both_directions() {
        let graph = create_test_graph();
        let mut edges = graph.edges();
        edges.sort_unstable();

        assert_eq!(edges.len(), 2 * graph.num_edges());
        assert!(edges.contains(&(1, 2)));
        assert!(edges.contains(&(2, 1)));
        assert!(edges.contains(&(4, 3)));
    }

    #[test]
    fn test_duplicate_add_is_noop() {
        let mut graph = create_test_graph();

        assert!(!graph.add_edge(1, 2).unwrap());
        assert!(!graph.add_edge(2, 1).unwrap());
        assert_eq!(graph.num_edges(), 4);
        assert_eq!(graph.degree(1), 2);
    }

    #[test]
    fn test_self_loop_rejected() {
        let mut graph = DynamicGraph::new();
        let err = graph.add_edge(7, 7).unwrap_err();

        assert!(matches!(err, SamplingError::SelfLoop(7)));
        assert!(graph.is_empty());
    }

    #[test]
    fn test_remove_edge() {
        let mut graph = create_test_graph();

        assert!(graph.remove_edge(4, 3));
        assert!(!graph.remove_edge(3, 4));
        assert!(!graph.remove_edge(10, 11));
        assert_eq!(graph.num_edges(), 3);
        // Node 4 vanishes once its last edge is gone
        assert_eq!(graph.degree(4), 0);
        assert_eq!(sorted(graph.nodes()), vec![1, 2, 3]);
    }

    #[test]
    fn test_clear() {
        let mut graph = create_test_graph();
        graph.clear();

        assert!(graph.is_empty());
        assert_eq!(graph.num_nodes(), 0);
        assert!(graph.edges().is_empty());
    }

    #[test]
    fn test_add_then_remove_restores_adjacency() {
        let mut rng = Pcg64::seed_from_u64(42);
        let mut graph = DynamicGraph::new();

        for _ in 0..200 {
            let u = rng.gen_range(0..30);
            let v = rng.gen_range(0..30);
            if u != v {
                graph.add_edge(u, v).unwrap();
            }
        }

        let mut before = graph.edges();
        before.sort_unstable();

        for _ in 0..500 {
            let u = rng.gen_range(0..40);
            let v = rng.gen_range(0..40);
            if u == v || graph.has_edge(u, v) {
                continue;
            }
            assert!(graph.add_edge(u, v).unwrap());
            assert!(graph.remove_edge(u, v));

            let mut after = graph.edges();
            after.sort_unstable();
            assert_eq!(after, before);
        }
    }

    #[test]
    fn test_adjacency_stays_symmetric() {
        let mut rng = Pcg64::seed_from_u64(7);
        let mut graph = DynamicGraph::new();

        for _ in 0..2000 {
            let u = rng.gen_range(0..25);
            let v = rng.gen_range(0..25);
            if u == v {
                continue;
            }
            if rng.gen_bool(0.6) {
                graph.add_edge(u, v).unwrap();
            } else {
                graph.remove_edge(u, v);
            }
        }

        for (u, v) in graph.edges() {
            assert!(graph.has_edge(v, u));
            let n = graph.neighbors(u);
            assert_eq!(n.iter().filter(|&&x| x == v).count(), 1);
        }
        let distinct: std::collections::HashSet<_> =
            graph.edges().into_iter().map(|(u, v)| canonical_edge(u, v)).collect();
        assert_eq!(distinct.len(), graph.num_edges());
    }
}
