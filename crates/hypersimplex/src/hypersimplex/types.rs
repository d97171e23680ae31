//! Vertices and edges of the hypersimplex graph.

use std::ops::{Add, Neg, Sub};

use serde::{Deserialize, Serialize};

use crate::combinadic;

/// Unordered vertex pair, stored with `v <= w`.
///
/// The derived ordering is lexicographic in `(v, w)`, which is what the
/// sorted edge list of a [`super::Hypersimplex`] is searched by.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Edge {
    pub v: usize,
    pub w: usize,
}

impl Edge {
    #[inline]
    pub fn new(a: usize, b: usize) -> Self {
        if a <= b {
            Self { v: a, w: b }
        } else {
            Self { v: b, w: a }
        }
    }

    #[inline]
    pub fn has(&self, vertex: usize) -> bool {
        self.v == vertex || self.w == vertex
    }

    /// The endpoint opposite to `vertex`, if `vertex` is an endpoint.
    #[inline]
    pub fn other(&self, vertex: usize) -> Option<usize> {
        if self.v == vertex {
            Some(self.w)
        } else if self.w == vertex {
            Some(self.v)
        } else {
            None
        }
    }
}

/// A point of Z^d carrying its combinadic index when it is a hypersimplex vertex.
///
/// Invariants:
/// - `index.is_some()` iff every component is 0/1 and the components sum to `k`.
/// - For valid vertices `index == combinadic::rank(comps)`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Vertex {
    index: Option<usize>,
    comps: Vec<i32>,
    k: usize,
}

impl Vertex {
    /// The `index`-th vertex of Δ(d,k); `None` if the index is out of range.
    pub fn from_index(d: usize, k: usize, index: usize) -> Option<Self> {
        let bits = combinadic::unrank(d, k, index)?;
        Some(Self {
            index: Some(index),
            comps: bits.into_iter().map(i32::from).collect(),
            k,
        })
    }

    /// Wrap arbitrary components; validity is checked against `k`.
    pub fn from_comps(comps: Vec<i32>, k: usize) -> Self {
        let is_membership = comps.iter().all(|&c| c == 0 || c == 1);
        let sum: i64 = comps.iter().map(|&c| i64::from(c)).sum();
        let index = if is_membership && sum == k as i64 {
            let bits: Vec<u8> = comps.iter().map(|&c| c as u8).collect();
            Some(combinadic::rank(&bits))
        } else {
            None
        };
        Self { index, comps, k }
    }

    #[inline]
    pub fn is_vertex(&self) -> bool {
        self.index.is_some()
    }

    #[inline]
    pub fn index(&self) -> Option<usize> {
        self.index
    }

    #[inline]
    pub fn comps(&self) -> &[i32] {
        &self.comps
    }

    #[inline]
    pub fn k(&self) -> usize {
        self.k
    }

    #[inline]
    pub fn dim(&self) -> usize {
        self.comps.len()
    }

    /// Euclidean inner product of the component vectors.
    pub fn dot(&self, other: &Vertex) -> i32 {
        self.comps
            .iter()
            .zip(&other.comps)
            .map(|(a, b)| a * b)
            .sum()
    }

    pub fn norm(&self) -> f64 {
        f64::from(self.dot(self)).sqrt()
    }

    fn zip_with(&self, other: &Vertex, f: impl Fn(i32, i32) -> i32) -> Vertex {
        debug_assert_eq!(self.dim(), other.dim());
        let comps = self
            .comps
            .iter()
            .zip(&other.comps)
            .map(|(&a, &b)| f(a, b))
            .collect();
        Vertex::from_comps(comps, self.k)
    }
}

impl Add for &Vertex {
    type Output = Vertex;
    fn add(self, rhs: &Vertex) -> Vertex {
        self.zip_with(rhs, |a, b| a + b)
    }
}

impl Sub for &Vertex {
    type Output = Vertex;
    fn sub(self, rhs: &Vertex) -> Vertex {
        self.zip_with(rhs, |a, b| a - b)
    }
}

impl Neg for &Vertex {
    type Output = Vertex;
    fn neg(self) -> Vertex {
        Vertex::from_comps(self.comps.iter().map(|&c| -c).collect(), self.k)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn edge_is_canonical() {
        assert_eq!(Edge::new(4, 1), Edge::new(1, 4));
        let e = Edge::new(7, 2);
        assert_eq!((e.v, e.w), (2, 7));
        assert_eq!(e.other(7), Some(2));
        assert_eq!(e.other(3), None);
    }

    #[test]
    fn edge_order_is_lexicographic() {
        let mut es = vec![Edge::new(1, 3), Edge::new(0, 5), Edge::new(1, 2)];
        es.sort();
        assert_eq!(es, vec![Edge::new(0, 5), Edge::new(1, 2), Edge::new(1, 3)]);
    }

    #[test]
    fn vertex_arithmetic_validates() {
        // d=4, k=2: {0,1} and {0,2}
        let a = Vertex::from_index(4, 2, 0).unwrap();
        let b = Vertex::from_index(4, 2, 1).unwrap();
        assert_eq!(a.dot(&b), 1);
        let diff = &a - &b;
        assert!(!diff.is_vertex());
        assert_eq!(diff.comps(), &[0, 1, -1, 0]);
        let sum = &a + &b;
        assert!(!sum.is_vertex());
        assert!(!(-&a).is_vertex());
        // ({0,1} - {0,2}) + {0,2} recovers {0,1}
        let back = &diff + &b;
        assert_eq!(back.index(), Some(0));
        assert!((a.norm() - 2f64.sqrt()).abs() < 1e-12);
    }

    #[test]
    fn from_comps_recovers_rank() {
        let v = Vertex::from_comps(vec![0, 1, 0, 1], 2);
        assert_eq!(v.index(), Some(4));
        let w = Vertex::from_comps(vec![1, 1, 1, 0], 2);
        assert_eq!(w.index(), None);
    }
}
