#[cfg(test)]
mod tests {
    use crate::counting::TriangleCounter;
    use crate::error::SamplingError;
    use crate::graph::NodeId;
    use crate::streaming::EdgeUpdate;
    use petgraph::graphmap::UnGraphMap;
    use pretty_assertions::assert_eq;
    use rand::{Rng, SeedableRng};
    use rand_pcg::Pcg64;
    use std::collections::HashMap;

    /// Brute-force triangles of the reference graph, global and per node.
    fn brute_force_triangles(reference: &UnGraphMap<NodeId, ()>) -> (u64, HashMap<NodeId, u64>) {
        let mut total = 0;
        let mut local: HashMap<NodeId, u64> = HashMap::new();
        for a in reference.nodes() {
            for b in reference.neighbors(a).filter(|&b| b > a) {
                for c in reference.neighbors(a).filter(|&c| c > b) {
                    if reference.contains_edge(b, c) {
                        total += 1;
                        for node in [a, b, c] {
                            *local.entry(node).or_insert(0) += 1;
                        }
                    }
                }
            }
        }
        (total, local)
    }

    fn insert(counter: &mut TriangleCounter, u: NodeId, v: NodeId) {
        counter.new_update(&EdgeUpdate::add(u, v)).unwrap();
        assert!(counter.add_edge_sample(u, v).unwrap());
        counter.add_triangles(u, v, 1.0).unwrap();
    }

    fn delete(counter: &mut TriangleCounter, u: NodeId, v: NodeId) {
        counter.new_update(&EdgeUpdate::remove(u, v)).unwrap();
        assert!(counter.remove_edge_sample(u, v).unwrap());
        counter.remove_triangles(u, v, 1.0).unwrap();
    }

    #[test]
    fn test_single_triangle() {
        let mut counter = TriangleCounter::new(true);
        insert(&mut counter, 1, 2);
        insert(&mut counter, 2, 3);
        assert_eq!(counter.triangles(), 0);
        insert(&mut counter, 1, 3);

        assert_eq!(counter.triangles(), 1);
        assert_eq!(counter.triangles_weight(), 1.0);
        for node in [1, 2, 3] {
            assert_eq!(counter.triangles_local(node), 1);
            assert_eq!(counter.triangles_weight_local(node), 1.0);
        }
        assert_eq!(counter.triangles_local(42), 0);
        assert_eq!(counter.edges_present_original(), 3);
        assert_eq!(counter.size_sample(), 3);

        delete(&mut counter, 2, 3);
        assert_eq!(counter.triangles(), 0);
        assert_eq!(counter.triangles_local(1), 0);
        assert_eq!(counter.edges_present_original(), 2);
    }

    #[test]
    fn test_stream_size_is_independent_of_sample() {
        let mut counter = TriangleCounter::new(false);
        for i in 0..10 {
            counter.new_update(&EdgeUpdate::add(i, i + 1)).unwrap();
        }
        counter.add_edge_sample(0, 1).unwrap();
        counter.new_update(&EdgeUpdate::remove(4, 5)).unwrap();

        assert_eq!(counter.edges_present_original(), 9);
        assert_eq!(counter.size_sample(), 1);
    }

    #[test]
    fn test_removal_from_empty_stream_rejected() {
        let mut counter = TriangleCounter::new(false);
        let err = counter.new_update(&EdgeUpdate::remove(1, 2)).unwrap_err();
        assert!(matches!(err, SamplingError::EmptyStreamRemoval(1, 2)));
    }

    #[test]
    fn test_sample_ops_report_noops() {
        let mut counter = TriangleCounter::new(false);
        assert!(counter.add_edge_sample(1, 2).unwrap());
        assert!(!counter.add_edge_sample(2, 1).unwrap());
        assert!(counter.contains_edge(2, 1));
        assert!(counter.remove_edge_sample(1, 2).unwrap());
        assert!(!counter.remove_edge_sample(1, 2).unwrap());
        assert!(!counter.contains_edge(1, 2));
        assert!(counter.add_edge_sample(3, 3).is_err());
    }

    #[test]
    fn test_node_bound_enforced() {
        let mut counter = TriangleCounter::with_max_node_id(false, 100).unwrap();
        assert!(counter.add_edge_sample(5, 99).unwrap());
        assert!(matches!(
            counter.add_edge_sample(5, 100),
            Err(SamplingError::NodeIdOutOfRange { node: 100, max: 100 })
        ));
        assert_eq!(counter.size_sample(), 1);
    }

    #[test]
    fn test_weighted_triangles_use_edge_product() {
        let mut counter = TriangleCounter::new(true);
        counter.add_edge_weight(1, 2, 2.0).unwrap();
        counter.add_edge_weight(2, 3, 3.0).unwrap();
        counter.add_edge_weight(1, 3, 0.5).unwrap();

        counter.add_edge_sample(1, 2).unwrap();
        counter.add_edge_sample(2, 3).unwrap();
        counter.add_edge_sample(1, 3).unwrap();
        counter.add_triangles(1, 3, 1.0).unwrap();

        assert_eq!(counter.triangles(), 1);
        assert!((counter.triangles_weight() - 3.0).abs() < 1e-12);
        assert!((counter.triangles_weight_local(2) - 3.0).abs() < 1e-12);

        counter.remove_triangles(1, 3, 1.0).unwrap();
        assert_eq!(counter.triangles(), 0);
        assert_eq!(counter.triangles_weight_local(2), 0.0);
    }

    #[test]
    fn test_weighted_mode_requires_all_weights() {
        let mut counter = TriangleCounter::new(false);
        counter.add_edge_weight(1, 2, 2.0).unwrap();
        counter.add_edge_weight(2, 3, 3.0).unwrap();
        counter.add_edge_sample(1, 2).unwrap();
        counter.add_edge_sample(2, 3).unwrap();
        counter.add_edge_sample(1, 3).unwrap();

        let err = counter.add_triangles(1, 3, 1.0).unwrap_err();
        assert!(matches!(err, SamplingError::MissingEdgeWeight(_, _)));
        assert!(counter.add_edge_weight(4, 5, 0.0).is_err());
    }

    #[test]
    fn test_removing_all_weights_restores_unweighted_mode() {
        let mut counter = TriangleCounter::new(true);
        for &(u, v, w) in &[(1, 2, 2.0), (2, 3, 3.0), (1, 3, 0.5)] {
            counter.add_edge_weight(u, v, w).unwrap();
            counter.add_edge_sample(u, v).unwrap();
        }
        counter.add_triangles(1, 3, 1.0).unwrap();
        assert!((counter.triangles_weight() - 3.0).abs() < 1e-12);
        counter.remove_triangles(1, 3, 1.0).unwrap();

        // One weight left keeps the counter weighted
        counter.remove_edge_weight(1, 2).unwrap();
        counter.remove_edge_weight(3, 2).unwrap();
        assert!(matches!(
            counter.add_triangles(1, 3, 0.25),
            Err(SamplingError::MissingEdgeWeight(_, _))
        ));

        counter.remove_edge_weight(1, 3).unwrap();
        counter.add_triangles(1, 3, 0.25).unwrap();
        assert_eq!(counter.triangles(), 1);
        assert!((counter.triangles_weight() - 0.25).abs() < 1e-12);
        assert!((counter.triangles_weight_local(2) - 0.25).abs() < 1e-12);
    }

    #[test]
    fn test_common_neighbors() {
        let mut counter = TriangleCounter::new(false);
        for &(u, v) in &[(1, 2), (1, 3), (1, 4), (2, 3), (2, 4), (3, 5)] {
            counter.add_edge_sample(u, v).unwrap();
        }
        assert_eq!(counter.common_neighbors(1, 2), 2);
        assert_eq!(counter.common_neighbors(3, 4), 2);
        assert_eq!(counter.common_neighbors(5, 4), 0);
    }

    #[test]
    fn test_clear_resets_everything() {
        let mut counter = TriangleCounter::new(true);
        insert(&mut counter, 1, 2);
        insert(&mut counter, 2, 3);
        insert(&mut counter, 1, 3);
        counter.clear();

        assert_eq!(counter.triangles(), 0);
        assert_eq!(counter.triangles_weight(), 0.0);
        assert_eq!(counter.triangles_local(1), 0);
        assert_eq!(counter.edges_present_original(), 0);
        assert_eq!(counter.size_sample(), 0);
        assert!(counter.nodes().is_empty());
    }

    #[test]
    fn test_counts_match_brute_force_on_random_streams() {
        for seed in 0..5 {
            let mut rng = Pcg64::seed_from_u64(seed);
            let mut counter = TriangleCounter::new(true);
            let mut reference: UnGraphMap<NodeId, ()> = UnGraphMap::new();

            for _ in 0..600 {
                let u = rng.gen_range(0..50);
                let v = rng.gen_range(0..50);
                if u == v {
                    continue;
                }
                if reference.contains_edge(u, v) {
                    if rng.gen_bool(0.4) {
                        reference.remove_edge(u, v);
                        delete(&mut counter, u, v);
                    }
                } else {
                    reference.add_edge(u, v, ());
                    insert(&mut counter, u, v);
                }

                let (expected, expected_local) = brute_force_triangles(&reference);
                assert_eq!(counter.triangles(), expected);
                assert_eq!(counter.size_sample(), reference.edge_count());
                for node in reference.nodes() {
                    assert_eq!(
                        counter.triangles_local(node),
                        expected_local.get(&node).copied().unwrap_or(0)
                    );
                }
            }
        }
    }
}
