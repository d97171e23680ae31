//! The hypersimplex graph Δ(d,k).
//!
//! Vertices are the k-subsets of {0..d-1}, indexed by combinadic rank; two
//! vertices are adjacent iff their subsets share exactly k-1 elements, so every
//! vertex has degree k(d-k). The edge list is built once, kept sorted, and
//! searched by bisection.
//!
//! The generator tables for the automorphism group live on the same value
//! (`permuter()`), since they are a function of (d,k) only.

mod types;

pub use types::{Edge, Vertex};

use tracing::debug;

use crate::cfg::MAX_VERTICES;
use crate::combinadic;
use crate::error::HypersimplexError;
use crate::perm::Permuter;

#[derive(Clone, Debug)]
pub struct Hypersimplex {
    d: usize,
    k: usize,
    vertex_count: usize,
    edges: Vec<Edge>,
    permuter: Permuter,
}

impl Hypersimplex {
    /// Build Δ(d,k). Rejects `k == 0`, `d <= 1`, `d <= k`, and vertex counts
    /// too large for a dense invariant matrix.
    pub fn new(d: usize, k: usize) -> Result<Self, HypersimplexError> {
        if k == 0 {
            return Err(HypersimplexError::invalid(d, k, "k must be positive"));
        }
        if d <= 1 {
            return Err(HypersimplexError::invalid(d, k, "d must be at least 2"));
        }
        if d <= k {
            return Err(HypersimplexError::invalid(d, k, "k must be smaller than d"));
        }
        let vertex_count = combinadic::checked_binomial(d, k)
            .filter(|&v| v <= MAX_VERTICES)
            .ok_or_else(|| {
                HypersimplexError::invalid(d, k, format!("more than {MAX_VERTICES} vertices"))
            })?;

        let edges = build_edges(d, k, vertex_count);
        debug!(d, k, vertices = vertex_count, edges = edges.len(), "hypersimplex built");
        Ok(Self {
            d,
            k,
            vertex_count,
            edges,
            permuter: Permuter::new(d, k),
        })
    }

    #[inline]
    pub fn d(&self) -> usize {
        self.d
    }

    #[inline]
    pub fn k(&self) -> usize {
        self.k
    }

    #[inline]
    pub fn vertex_count(&self) -> usize {
        self.vertex_count
    }

    /// Common vertex degree k(d-k).
    #[inline]
    pub fn degree(&self) -> usize {
        self.k * (self.d - self.k)
    }

    /// `d == 2k`: the global complement is an extra automorphism.
    #[inline]
    pub fn is_symmetric(&self) -> bool {
        self.d == 2 * self.k
    }

    /// All edges, sorted by `(v, w)`.
    #[inline]
    pub fn edges(&self) -> &[Edge] {
        &self.edges
    }

    #[inline]
    pub fn permuter(&self) -> &Permuter {
        &self.permuter
    }

    pub fn vertex(&self, index: usize) -> Option<Vertex> {
        Vertex::from_index(self.d, self.k, index)
    }

    pub fn vertices(&self) -> impl Iterator<Item = Vertex> + '_ {
        (0..self.vertex_count).filter_map(move |i| self.vertex(i))
    }

    /// Membership test on the sorted edge list.
    pub fn has_edge(&self, v: usize, w: usize) -> bool {
        self.edges.binary_search(&Edge::new(v, w)).is_ok()
    }

    /// Adjacency decided from the subsets themselves: `|S_v ∩ S_w| == k-1`.
    pub fn have_edge(&self, v: usize, w: usize) -> bool {
        match (self.vertex(v), self.vertex(w)) {
            (Some(a), Some(b)) => a.dot(&b) as usize + 1 == self.k,
            _ => false,
        }
    }

    /// Edges incident to `v`, in sorted order.
    pub fn edges_at(&self, v: usize) -> Vec<Edge> {
        self.edges.iter().copied().filter(|e| e.has(v)).collect()
    }

    /// Opposite facets `x_index = 1` and `x_index = 0`, as vertex index lists.
    pub fn facet_pair(&self, index: usize) -> Option<(Vec<usize>, Vec<usize>)> {
        if index >= self.d {
            return None;
        }
        let mut bits = vec![0u8; self.d];
        let (mut ones, mut zeros) = (Vec::new(), Vec::new());
        for i in 0..self.vertex_count {
            bits.fill(0);
            combinadic::unrank_into(self.k, i, &mut bits);
            if bits[index] == 1 {
                ones.push(i);
            } else {
                zeros.push(i);
            }
        }
        Some((ones, zeros))
    }
}

/// Neighbours of a subset are obtained by exchanging one member for one non-member;
/// only pairs with `v < w` are kept so every edge appears once.
fn build_edges(d: usize, k: usize, vertex_count: usize) -> Vec<Edge> {
    let mut edges = Vec::with_capacity(vertex_count * k * (d - k) / 2);
    let mut bits = vec![0u8; d];
    for v in 0..vertex_count {
        bits.fill(0);
        combinadic::unrank_into(k, v, &mut bits);
        for out in 0..d {
            if bits[out] != 1 {
                continue;
            }
            for inn in 0..d {
                if bits[inn] != 0 {
                    continue;
                }
                bits[out] = 0;
                bits[inn] = 1;
                let w = combinadic::rank(&bits);
                bits[inn] = 0;
                bits[out] = 1;
                if v < w {
                    edges.push(Edge::new(v, w));
                }
            }
        }
    }
    edges.sort_unstable();
    edges
}

#[cfg(test)]
mod tests;
