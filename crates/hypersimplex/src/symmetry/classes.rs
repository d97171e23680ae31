//! Edge-equivalence classes: the orbits of a subgroup acting on edges.

use std::collections::BTreeSet;

use rayon::prelude::*;
use serde::Serialize;
use tracing::debug;

use crate::hypersimplex::{Edge, Hypersimplex};

/// One edge orbit.
///
/// Invariants: `edges` is sorted by `(v, w)` and non-empty; `multiplicity` is
/// the number of class edges incident to `edges[0].v` (the same for every
/// vertex when the acting group is vertex-transitive).
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct EdgeClass {
    edges: Vec<Edge>,
    multiplicity: usize,
}

impl EdgeClass {
    fn from_set(set: BTreeSet<Edge>) -> Self {
        let edges: Vec<Edge> = set.into_iter().collect();
        let multiplicity = edges
            .first()
            .map(|first| edges.iter().filter(|e| e.has(first.v)).count())
            .unwrap_or(0);
        Self {
            edges,
            multiplicity,
        }
    }

    #[inline]
    pub fn edges(&self) -> &[Edge] {
        &self.edges
    }

    #[inline]
    pub fn multiplicity(&self) -> usize {
        self.multiplicity
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.edges.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.edges.is_empty()
    }

    pub fn contains(&self, e: &Edge) -> bool {
        self.edges.binary_search(e).is_ok()
    }
}

/// Partition the edges of `hs` into orbits under the group given by its
/// element images.
///
/// Vertices adjacent to an already processed vertex are skipped; skipped
/// vertices do not count as processed. Under a vertex-transitive group every
/// orbit meets vertex 0, so the result covers all edges.
pub fn classify(hs: &Hypersimplex, images: &[Vec<usize>]) -> Vec<EdgeClass> {
    let n = hs.vertex_count();
    let mut classes: Vec<BTreeSet<Edge>> = Vec::new();
    let mut processed = vec![false; n];

    for v in 0..n {
        let covered = hs
            .edges_at(v)
            .iter()
            .filter_map(|e| e.other(v))
            .any(|u| processed[u]);
        if covered {
            continue;
        }
        processed[v] = true;
        for e in hs.edges_at(v) {
            let fragment: BTreeSet<Edge> = images
                .iter()
                .map(|img| Edge::new(img[e.v], img[e.w]))
                .collect();
            let mut merged = false;
            for class in classes.iter_mut() {
                if !class.is_disjoint(&fragment) {
                    class.extend(fragment.iter().copied());
                    merged = true;
                }
            }
            if !merged {
                classes.push(fragment);
            }
        }
    }

    let out: Vec<EdgeClass> = classes.into_iter().map(EdgeClass::from_set).collect();
    debug!(
        classes = out.len(),
        sizes = ?out.iter().map(EdgeClass::len).collect::<Vec<_>>(),
        "edges classified"
    );
    out
}

/// [`classify`] for several subgroups at once, in parallel.
pub fn classify_all(hs: &Hypersimplex, images: &[Vec<Vec<usize>>]) -> Vec<Vec<EdgeClass>> {
    images.par_iter().map(|imgs| classify(hs, imgs)).collect()
}
