//! Null-space embedding: vertex coordinates from an eigenspace of the
//! invariant matrix.
//!
//! The top eigenvalue of a row-stochastic invariant matrix belongs to the
//! constant vector and carries no geometry. The embedding reads coordinates
//! from eigenvectors just below it:
//! - `Clustered`: the highest window of d-1 consecutive eigenvalues (below the
//!   top) whose spread is within the strict tolerance, then the loose one.
//! - `Top`: the d-1 eigenvectors directly below the top, unconditionally.
//! - `DegenerateOnly`: the eigenvectors tied with the second-largest eigenvalue.

use nalgebra::{DMatrix, DVector, SymmetricEigen};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, warn};

use crate::cfg::{CLUSTER_TOL_LOOSE, CLUSTER_TOL_STRICT, EIGEN_MAX_ITER};
use crate::gimatrix::{GiMatrix, WeightError};

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum EmbedMode {
    #[default]
    Clustered,
    Top,
    DegenerateOnly,
}

#[derive(Clone, Copy, Debug)]
pub struct EmbedCfg {
    pub mode: EmbedMode,
    pub strict_tol: f64,
    pub loose_tol: f64,
    /// Tie threshold for `DegenerateOnly`; `None` means `f64::EPSILON · V`.
    pub tie_eps: Option<f64>,
    /// Passed to the eigen-solver; 0 means unbounded.
    pub max_iter: usize,
    /// Subtract the centroid from the output points.
    pub center: bool,
}

impl Default for EmbedCfg {
    fn default() -> Self {
        Self {
            mode: EmbedMode::Clustered,
            strict_tol: CLUSTER_TOL_STRICT,
            loose_tol: CLUSTER_TOL_LOOSE,
            tie_eps: None,
            max_iter: EIGEN_MAX_ITER,
            center: true,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Error)]
pub enum EmbedError {
    #[error("eigen-decomposition did not converge within {max_iter} iterations")]
    NoConvergence { max_iter: usize },
    #[error("no {width} consecutive eigenvalues within {tol}; request top mode explicitly")]
    NoCluster { width: usize, tol: f64 },
    #[error("need {need} eigenvalues below the top one, matrix has {have}")]
    TooSmall { need: usize, have: usize },
    #[error("invariant matrix must be square, got {rows}x{cols}")]
    NotSquare { rows: usize, cols: usize },
}

#[derive(Clone, Debug)]
pub struct Embedding {
    points: Vec<DVector<f64>>,
    selected: Vec<f64>,
    spectrum: Vec<f64>,
    mode: EmbedMode,
}

impl Embedding {
    /// One point per vertex, in vertex-index order.
    #[inline]
    pub fn points(&self) -> &[DVector<f64>] {
        &self.points
    }

    /// Eigenvalues of the selected eigenvectors, ascending.
    #[inline]
    pub fn eigenvalues(&self) -> &[f64] {
        &self.selected
    }

    /// Full spectrum, ascending.
    #[inline]
    pub fn spectrum(&self) -> &[f64] {
        &self.spectrum
    }

    #[inline]
    pub fn mode(&self) -> EmbedMode {
        self.mode
    }

    /// Coordinates per point.
    pub fn dim(&self) -> usize {
        self.selected.len()
    }
}

/// Decompose `matrix` and read a (d-1)-dimensional embedding off its spectrum.
pub fn embed(matrix: &DMatrix<f64>, d: usize, cfg: &EmbedCfg) -> Result<Embedding, EmbedError> {
    let (rows, cols) = matrix.shape();
    if rows != cols {
        return Err(EmbedError::NotSquare { rows, cols });
    }
    let n = rows;
    let width = d.saturating_sub(1).max(1);
    if n < width + 1 {
        return Err(EmbedError::TooSmall {
            need: width,
            have: n.saturating_sub(1),
        });
    }

    let eig = SymmetricEigen::try_new(matrix.clone(), f64::EPSILON, cfg.max_iter).ok_or(
        EmbedError::NoConvergence {
            max_iter: cfg.max_iter,
        },
    )?;
    let mut order: Vec<usize> = (0..n).collect();
    order.sort_by(|&a, &b| eig.eigenvalues[a].total_cmp(&eig.eigenvalues[b]));
    let spectrum: Vec<f64> = order.iter().map(|&i| eig.eigenvalues[i]).collect();

    let picked = match cfg.mode {
        EmbedMode::Clustered => clustered_window(&spectrum, width, cfg)?,
        EmbedMode::Top => (n - 1 - width..n - 1).collect(),
        EmbedMode::DegenerateOnly => {
            let eps = cfg.tie_eps.unwrap_or(f64::EPSILON * n as f64);
            let second = spectrum[n - 2];
            let mut lo = n - 2;
            while lo > 0 && (spectrum[lo - 1] - second).abs() <= eps {
                lo -= 1;
            }
            (lo..n - 1).collect::<Vec<_>>()
        }
    };
    debug!(
        mode = ?cfg.mode,
        window = ?(picked.first(), picked.last()),
        "eigenvectors selected"
    );

    let mut points: Vec<DVector<f64>> = (0..n)
        .map(|v| {
            DVector::from_iterator(
                picked.len(),
                picked.iter().map(|&j| eig.eigenvectors[(v, order[j])]),
            )
        })
        .collect();
    if cfg.center {
        center(&mut points);
    }
    Ok(Embedding {
        points,
        selected: picked.iter().map(|&j| spectrum[j]).collect(),
        spectrum,
        mode: cfg.mode,
    })
}

/// Highest window `[top-width+1, top]` with `top <= n-2` whose spread fits
/// the strict tolerance, else the loose one.
fn clustered_window(spectrum: &[f64], width: usize, cfg: &EmbedCfg) -> Result<Vec<usize>, EmbedError> {
    let n = spectrum.len();
    for tol in [cfg.strict_tol, cfg.loose_tol] {
        for top in (width - 1..=n - 2).rev() {
            let lo = top + 1 - width;
            // ascending, so the spread is last minus first
            if spectrum[top] - spectrum[lo] <= tol {
                return Ok((lo..=top).collect());
            }
        }
        debug!(tol, "no eigenvalue cluster at this tolerance");
    }
    warn!(width, tol = cfg.loose_tol, "no eigenvalue cluster found");
    Err(EmbedError::NoCluster {
        width,
        tol: cfg.loose_tol,
    })
}

fn center(points: &mut [DVector<f64>]) {
    let Some(first) = points.first() else { return };
    let mut mean = DVector::zeros(first.len());
    for p in points.iter() {
        mean += p;
    }
    mean /= points.len() as f64;
    for p in points.iter_mut() {
        *p -= &mean;
    }
}

/// A recomputable embedding bound to its own copy of an invariant matrix.
///
/// A failed recalculation clears the stored points, so callers never read an
/// embedding that belongs to earlier weights.
#[derive(Clone, Debug)]
pub struct NullSpaceRepr {
    gi: GiMatrix,
    d: usize,
    cfg: EmbedCfg,
    current: Option<Embedding>,
}

impl NullSpaceRepr {
    pub fn new(gi: GiMatrix, d: usize, cfg: EmbedCfg) -> Self {
        Self {
            gi,
            d,
            cfg,
            current: None,
        }
    }

    pub fn recalculate(&mut self) -> Result<&Embedding, EmbedError> {
        match embed(self.gi.matrix(), self.d, &self.cfg) {
            Ok(e) => Ok(&*self.current.insert(e)),
            Err(err) => {
                self.current = None;
                Err(err)
            }
        }
    }

    /// Re-weigh the matrix; stored points are dropped until the next recalculation.
    pub fn set_weights(&mut self, weights: &[f64]) -> Result<(), WeightError> {
        self.gi.set_weights(weights)?;
        self.current = None;
        Ok(())
    }

    pub fn set_cfg(&mut self, cfg: EmbedCfg) {
        self.cfg = cfg;
        self.current = None;
    }

    #[inline]
    pub fn gi_matrix(&self) -> &GiMatrix {
        &self.gi
    }

    #[inline]
    pub fn embedding(&self) -> Option<&Embedding> {
        self.current.as_ref()
    }

    /// Current points; empty before the first successful recalculation.
    pub fn points(&self) -> &[DVector<f64>] {
        self.current.as_ref().map(Embedding::points).unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::group::{AutGroup, NativeService};
    use crate::hypersimplex::Hypersimplex;
    use crate::symmetry::{classify, subgroup_images};
    use rand::rngs::StdRng;
    use rand::{Rng, SeedableRng};

    fn full_group_matrix(d: usize, k: usize) -> GiMatrix {
        let hs = Hypersimplex::new(d, k).unwrap();
        let mut aut = AutGroup::new(Box::new(NativeService::default()), d, k).unwrap();
        let whole = aut.subgroups().len() - 1;
        let images = subgroup_images(&mut aut, hs.permuter(), whole).unwrap();
        GiMatrix::new(&hs, classify(&hs, &images))
    }

    fn pairwise(points: &[DVector<f64>]) -> Vec<f64> {
        let mut out = Vec::new();
        for i in 0..points.len() {
            for j in i + 1..points.len() {
                out.push((&points[i] - &points[j]).norm());
            }
        }
        out
    }

    #[test]
    fn triangle_embeds_equilateral() {
        let gi = full_group_matrix(3, 1);
        let e = embed(gi.matrix(), 3, &EmbedCfg::default()).unwrap();
        let ev = e.spectrum();
        assert!((ev[0] + 0.5).abs() < 1e-12);
        assert!((ev[1] + 0.5).abs() < 1e-12);
        assert!((ev[2] - 1.0).abs() < 1e-12);
        assert_eq!(e.points().len(), 3);
        assert_eq!(e.dim(), 2);
        let dist = pairwise(e.points());
        assert!(dist[0] > 1e-6);
        assert!(dist.iter().all(|x| (x - dist[0]).abs() < 1e-9));
        // centred
        let sum = e
            .points()
            .iter()
            .fold(DVector::zeros(2), |acc, p| acc + p);
        assert!(sum.norm() < 1e-12);
    }

    #[test]
    fn johnson_5_2_embeds_in_four_dimensions() {
        let gi = full_group_matrix(5, 2);
        let e = embed(gi.matrix(), 5, &EmbedCfg::default()).unwrap();
        assert_eq!(e.points().len(), 10);
        assert!(e.points().iter().all(|p| p.len() == 4));
        for &l in e.eigenvalues() {
            assert!((l - 1.0 / 6.0).abs() < 1e-9, "selected {l}");
        }
        let ev = e.spectrum();
        assert!((ev[9] - 1.0).abs() < 1e-9);
        assert!(ev[..5].iter().all(|l| (l + 1.0 / 3.0).abs() < 1e-9));
        // vertices of a symmetric polytope are equidistant from the centre
        let r0 = e.points()[0].norm();
        assert!(e.points().iter().all(|p| (p.norm() - r0).abs() < 1e-9));
    }

    #[test]
    fn modes_on_a_spread_spectrum() {
        let m = DMatrix::from_diagonal(&DVector::from_vec(vec![0.0, 1.0, 2.0, 3.0, 4.0]));
        let err = embed(&m, 3, &EmbedCfg::default()).unwrap_err();
        assert_eq!(err, EmbedError::NoCluster { width: 2, tol: CLUSTER_TOL_LOOSE });

        let top = EmbedCfg {
            mode: EmbedMode::Top,
            ..EmbedCfg::default()
        };
        let e = embed(&m, 3, &top).unwrap();
        let l = e.eigenvalues();
        assert!((l[0] - 2.0).abs() < 1e-12 && (l[1] - 3.0).abs() < 1e-12);

        let degenerate = EmbedCfg {
            mode: EmbedMode::DegenerateOnly,
            ..EmbedCfg::default()
        };
        let e = embed(&m, 3, &degenerate).unwrap();
        assert!((e.eigenvalues()[0] - 3.0).abs() < 1e-12);
        assert_eq!(e.dim(), 1);
    }

    #[test]
    fn loose_tolerance_is_the_fallback() {
        let m = DMatrix::from_diagonal(&DVector::from_vec(vec![0.0, 0.95, 1.0, 2.0, 9.0]));
        // strict: nothing within 0.01; loose: [0.95, 1.0] wins over [1.0, 2.0]
        let e = embed(&m, 3, &EmbedCfg::default()).unwrap();
        let l = e.eigenvalues();
        assert!((l[0] - 0.95).abs() < 1e-12 && (l[1] - 1.0).abs() < 1e-12);
    }

    #[test]
    fn degenerate_mode_with_explicit_ties() {
        let gi = full_group_matrix(5, 2);
        let cfg = EmbedCfg {
            mode: EmbedMode::DegenerateOnly,
            tie_eps: Some(1e-9),
            ..EmbedCfg::default()
        };
        let e = embed(gi.matrix(), 5, &cfg).unwrap();
        assert_eq!(e.dim(), 4);
    }

    #[test]
    fn failed_recalculation_clears_points() {
        let mut rng = StdRng::seed_from_u64(11);
        let a = DMatrix::from_fn(12, 12, |_, _| rng.gen_range(-1.0..1.0));
        let sym = 0.5 * (&a + a.transpose());
        let strict = EmbedCfg {
            max_iter: 1,
            mode: EmbedMode::Top,
            ..EmbedCfg::default()
        };
        assert_eq!(
            embed(&sym, 4, &strict).unwrap_err(),
            EmbedError::NoConvergence { max_iter: 1 }
        );

        let mut repr = NullSpaceRepr::new(full_group_matrix(4, 2), 4, EmbedCfg::default());
        assert!(repr.points().is_empty());
        repr.recalculate().unwrap();
        assert_eq!(repr.points().len(), 6);
        repr.set_cfg(EmbedCfg {
            mode: EmbedMode::Top,
            max_iter: 1,
            ..EmbedCfg::default()
        });
        // the octahedron matrix is not diagonal, so one sweep cannot finish
        assert!(repr.recalculate().is_err());
        assert!(repr.points().is_empty());
        assert!(repr.embedding().is_none());
    }

    #[test]
    fn rejected_weights_keep_points() {
        let mut repr = NullSpaceRepr::new(full_group_matrix(3, 1), 3, EmbedCfg::default());
        repr.recalculate().unwrap();
        assert!(repr.set_weights(&[0.3]).is_err());
        assert_eq!(repr.points().len(), 3);
    }
}
