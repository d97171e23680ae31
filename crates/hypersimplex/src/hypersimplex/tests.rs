use super::*;

#[test]
fn rejects_degenerate_params() {
    for (d, k) in [(4, 0), (1, 1), (0, 0), (3, 3), (3, 5)] {
        let err = Hypersimplex::new(d, k).unwrap_err();
        assert!(
            matches!(err, HypersimplexError::InvalidParams { .. }),
            "({d},{k}) gave {err:?}"
        );
    }
}

#[test]
fn rejects_oversized() {
    assert!(matches!(
        Hypersimplex::new(40, 20),
        Err(HypersimplexError::InvalidParams { .. })
    ));
}

#[test]
fn triangle_is_complete_graph() {
    let hs = Hypersimplex::new(3, 1).unwrap();
    assert_eq!(hs.vertex_count(), 3);
    assert_eq!(hs.degree(), 2);
    assert!(!hs.is_symmetric());
    assert_eq!(
        hs.edges(),
        &[Edge::new(0, 1), Edge::new(0, 2), Edge::new(1, 2)]
    );
}

#[test]
fn octahedron_counts() {
    let hs = Hypersimplex::new(4, 2).unwrap();
    assert!(hs.is_symmetric());
    assert_eq!(hs.vertex_count(), 6);
    assert_eq!(hs.degree(), 4);
    assert_eq!(hs.edges().len(), 12);
    // antipodal pairs {0,1}/{2,3} etc. are the only non-edges
    assert!(!hs.has_edge(0, 5));
    assert!(!hs.has_edge(1, 4));
    assert!(!hs.has_edge(2, 3));
}

#[test]
fn edge_list_matches_combinatorial_adjacency() {
    for (d, k) in [(5, 2), (6, 3), (6, 2), (7, 3)] {
        let hs = Hypersimplex::new(d, k).unwrap();
        let v = hs.vertex_count();
        assert_eq!(hs.edges().len(), v * hs.degree() / 2);
        assert!(hs.edges().windows(2).all(|w| w[0] < w[1]));
        for a in 0..v {
            for b in 0..v {
                let expected = a != b && hs.have_edge(a, b);
                assert_eq!(hs.has_edge(a, b), expected, "Δ({d},{k}) pair ({a},{b})");
                // symmetric by construction
                assert_eq!(hs.has_edge(a, b), hs.has_edge(b, a));
            }
        }
    }
}

#[test]
fn every_vertex_has_full_degree() {
    let hs = Hypersimplex::new(6, 2).unwrap();
    for v in 0..hs.vertex_count() {
        assert_eq!(hs.edges_at(v).len(), hs.degree());
    }
}

#[test]
fn facet_pair_splits_vertices() {
    let hs = Hypersimplex::new(5, 2).unwrap();
    for index in 0..5 {
        let (ones, zeros) = hs.facet_pair(index).unwrap();
        assert_eq!(ones.len(), 4); // C(4,1)
        assert_eq!(zeros.len(), 6); // C(4,2)
        for &i in &ones {
            assert_eq!(hs.vertex(i).unwrap().comps()[index], 1);
        }
        for &i in &zeros {
            assert_eq!(hs.vertex(i).unwrap().comps()[index], 0);
        }
    }
    assert!(hs.facet_pair(5).is_none());
}

#[test]
fn vertices_iterate_in_rank_order() {
    let hs = Hypersimplex::new(4, 2).unwrap();
    let idx: Vec<_> = hs.vertices().map(|v| v.index().unwrap()).collect();
    assert_eq!(idx, (0..6).collect::<Vec<_>>());
}
