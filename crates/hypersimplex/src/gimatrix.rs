//! Group-invariant matrix: symmetric, zero diagonal, constant on edge classes.
//!
//! Weighting
//! - One parameter `p_c ∈ [0,1]` per class; the entry of every class-`c` edge
//!   is the multiplied weight `m_c = multiplicity_c · p_c`.
//! - Each vertex meets `multiplicity_c` edges of class `c`, so a row sums to
//!   `Σ_c multiplicity_c · m_c`; that sum must be 1.
//! - Default `p_c = 1/(multiplicity_c · degree)`, which gives row sum
//!   `Σ_c multiplicity_c / degree = 1`.

use nalgebra::DMatrix;
use thiserror::Error;
use tracing::{debug, warn};

use crate::cfg::ROW_SUM_EPS;
use crate::hypersimplex::Hypersimplex;
use crate::symmetry::EdgeClass;

#[derive(Clone, Debug, PartialEq, Error)]
pub enum WeightError {
    #[error("expected {expected} weights, got {got}")]
    WrongLength { expected: usize, got: usize },
    #[error("weight {index} = {value} outside [0, 1]")]
    OutOfRange { index: usize, value: f64 },
    #[error("rows sum to {sum}, expected 1")]
    RowSum { sum: f64 },
}

#[derive(Clone, Debug)]
pub struct GiMatrix {
    degree: usize,
    classes: Vec<EdgeClass>,
    /// `class_idx[(v, w)]`: class of edge `{v, w}`, `None` for non-edges.
    class_idx: DMatrix<Option<usize>>,
    weights: Vec<f64>,
    matrix: DMatrix<f64>,
}

impl GiMatrix {
    /// Index the classes and fill the matrix with the default weights.
    pub fn new(hs: &Hypersimplex, classes: Vec<EdgeClass>) -> Self {
        let n = hs.vertex_count();
        let mut class_idx = DMatrix::from_element(n, n, None);
        for (c, class) in classes.iter().enumerate() {
            for e in class.edges() {
                class_idx[(e.v, e.w)] = Some(c);
                class_idx[(e.w, e.v)] = Some(c);
            }
        }
        let degree = hs.degree();
        let weights = classes
            .iter()
            .map(|c| 1.0 / (c.multiplicity() * degree) as f64)
            .collect();
        let mut gi = Self {
            degree,
            classes,
            class_idx,
            weights,
            matrix: DMatrix::zeros(n, n),
        };
        gi.fill();
        debug!(vertices = n, classes = gi.classes.len(), "invariant matrix built");
        gi
    }

    /// Replace the class parameters. On error nothing changes.
    pub fn set_weights(&mut self, weights: &[f64]) -> Result<(), WeightError> {
        if let Err(err) = self.validate(weights) {
            warn!(%err, "weights rejected");
            return Err(err);
        }
        self.weights = weights.to_vec();
        self.fill();
        Ok(())
    }

    fn validate(&self, weights: &[f64]) -> Result<(), WeightError> {
        if weights.len() != self.classes.len() {
            return Err(WeightError::WrongLength {
                expected: self.classes.len(),
                got: weights.len(),
            });
        }
        if let Some((index, &value)) = weights
            .iter()
            .enumerate()
            .find(|(_, p)| !(p.is_finite() && (0.0..=1.0).contains(*p)))
        {
            return Err(WeightError::OutOfRange { index, value });
        }
        let sum: f64 = self
            .classes
            .iter()
            .zip(weights)
            .map(|(c, p)| {
                let m = c.multiplicity() as f64;
                m * m * p
            })
            .sum();
        if (sum - 1.0).abs() > ROW_SUM_EPS {
            return Err(WeightError::RowSum { sum });
        }
        Ok(())
    }

    fn fill(&mut self) {
        let mw = self.multiplied_weights();
        for (dst, idx) in self.matrix.iter_mut().zip(self.class_idx.iter()) {
            *dst = idx.map_or(0.0, |c| mw[c]);
        }
    }

    /// Defaults `1/(multiplicity_c · degree)`.
    pub fn default_weights(&self) -> Vec<f64> {
        self.classes
            .iter()
            .map(|c| 1.0 / (c.multiplicity() * self.degree) as f64)
            .collect()
    }

    #[inline]
    pub fn weights(&self) -> &[f64] {
        &self.weights
    }

    /// `m_c = multiplicity_c · p_c`, the matrix entry of class `c`.
    pub fn multiplied_weights(&self) -> Vec<f64> {
        self.classes
            .iter()
            .zip(&self.weights)
            .map(|(c, p)| c.multiplicity() as f64 * p)
            .collect()
    }

    #[inline]
    pub fn matrix(&self) -> &DMatrix<f64> {
        &self.matrix
    }

    #[inline]
    pub fn classes(&self) -> &[EdgeClass] {
        &self.classes
    }

    #[inline]
    pub fn vertex_count(&self) -> usize {
        self.matrix.nrows()
    }

    /// Class of the edge `{v, w}`; `None` for non-edges and out-of-range indices.
    pub fn class_of(&self, v: usize, w: usize) -> Option<usize> {
        self.class_idx.get((v, w)).copied().flatten()
    }

    pub fn row_sums(&self) -> Vec<f64> {
        self.matrix.row_iter().map(|r| r.sum()).collect()
    }
}
