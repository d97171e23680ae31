//! Schlegel projection of an embedding through a facet pair.
//!
//! The embedding lives in R^D (D = d-1). One facet of the pair spans an affine
//! hyperplane, the image plane; the other facet is projected onto it along
//! rays through a centre sitting just off the plane, on the far side from the
//! projected facet. The result is expressed in an orthonormal basis of the
//! plane, one (D-1)-dimensional point per vertex.
//!
//! Steps
//! 1. Pick the image plane (larger facet when asked, or when a facet is a single point).
//! 2. Translate by the plane's first point; the translated plane must have rank D-1.
//! 3. Orthonormal basis by Gram–Schmidt; unit normal from the standard basis
//!    vector with the largest residual.
//! 4. Centre = plane centroid + offset · normal, normal oriented away from the other facet.
//! 5. Intersect each ray with the plane, drop the normal coordinate, recentre.

use nalgebra::{DMatrix, DVector};
use thiserror::Error;
use tracing::debug;

use crate::cfg::{PROJ_CENTER_OFFSET, RANK_EPS};

#[derive(Clone, Copy, Debug)]
pub struct SchlegelCfg {
    /// Project onto the larger facet of the pair (otherwise the smaller).
    pub project_to_larger: bool,
    /// Distance of the projection centre from the image plane.
    pub center_offset: f64,
    pub rank_eps: f64,
}

impl Default for SchlegelCfg {
    fn default() -> Self {
        Self {
            project_to_larger: true,
            center_offset: PROJ_CENTER_OFFSET,
            rank_eps: RANK_EPS,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Error)]
pub enum SchlegelError {
    /// The image-plane facet does not span a hyperplane.
    #[error("image facet spans rank {found}, expected {expected}")]
    NotCoplanar { expected: usize, found: usize },
    #[error("facet pair has an empty side")]
    EmptyFacet,
    #[error("vertex {index} out of range for {count} points")]
    BadVertex { index: usize, count: usize },
    /// The facet pair leaves a point without coordinates.
    #[error("vertex {index} is on neither side of the facet pair")]
    IncompletePair { index: usize },
    /// A projection ray runs parallel to the image plane.
    #[error("projection ray of vertex {index} misses the image plane")]
    ParallelRay { index: usize },
}

#[derive(Clone, Debug)]
pub struct SchlegelDiagram {
    points: Vec<DVector<f64>>,
    /// Vertex indices of the image-plane facet.
    plane: Vec<usize>,
}

impl SchlegelDiagram {
    /// One point per vertex, in vertex-index order.
    #[inline]
    pub fn points(&self) -> &[DVector<f64>] {
        &self.points
    }

    #[inline]
    pub fn image_facet(&self) -> &[usize] {
        &self.plane
    }

    pub fn dim(&self) -> usize {
        self.points.first().map_or(0, |p| p.len())
    }
}

/// Project `points` through the facet pair `(ones, zeros)`.
pub fn project(
    points: &[DVector<f64>],
    facets: (&[usize], &[usize]),
    cfg: &SchlegelCfg,
) -> Result<SchlegelDiagram, SchlegelError> {
    let (a, b) = facets;
    if a.is_empty() || b.is_empty() {
        return Err(SchlegelError::EmptyFacet);
    }
    let count = points.len();
    if let Some(&index) = a.iter().chain(b).find(|&&i| i >= count) {
        return Err(SchlegelError::BadVertex { index, count });
    }
    let (larger, smaller) = if a.len() >= b.len() { (a, b) } else { (b, a) };
    let (plane, other) = if cfg.project_to_larger || smaller.len() == 1 {
        (larger, smaller)
    } else {
        (smaller, larger)
    };

    let dim = points[plane[0]].len();
    let origin = points[plane[0]].clone();
    let q: Vec<DVector<f64>> = plane.iter().map(|&i| &points[i] - &origin).collect();

    let expected = dim.saturating_sub(1);
    let found = rank(&q, dim, cfg.rank_eps);
    if found != expected {
        return Err(SchlegelError::NotCoplanar { expected, found });
    }

    let basis = gram_schmidt(&q, cfg.rank_eps);
    let mut normal = complement_normal(&basis, dim);

    let o: Vec<DVector<f64>> = other.iter().map(|&i| &points[i] - &origin).collect();
    if normal.dot(&o[0]) > 0.0 {
        normal = -normal;
    }
    let centroid = q.iter().fold(DVector::zeros(dim), |acc, p| acc + p) / q.len() as f64;
    let centre = centroid + &normal * cfg.center_offset;

    let mut out: Vec<Option<DVector<f64>>> = vec![None; count];
    for (&i, p) in plane.iter().zip(&q) {
        out[i] = Some(coords(&basis, p));
    }
    for (&i, p) in other.iter().zip(&o) {
        let ray = &centre - p;
        let denom = normal.dot(&ray);
        if denom.abs() <= f64::EPSILON {
            return Err(SchlegelError::ParallelRay { index: i });
        }
        let t = -normal.dot(p) / denom;
        out[i] = Some(coords(&basis, &(p + ray * t)));
    }

    let mut points: Vec<DVector<f64>> = out
        .into_iter()
        .enumerate()
        .map(|(index, p)| p.ok_or(SchlegelError::IncompletePair { index }))
        .collect::<Result<_, _>>()?;
    let mean = points
        .iter()
        .fold(DVector::zeros(expected), |acc, p| acc + p)
        / points.len() as f64;
    for p in &mut points {
        *p -= &mean;
    }
    debug!(
        plane = plane.len(),
        projected = other.len(),
        dim = expected,
        "schlegel diagram"
    );
    Ok(SchlegelDiagram {
        points,
        plane: plane.to_vec(),
    })
}

/// Numerical rank of the span of `vectors` (singular values above `eps`).
fn rank(vectors: &[DVector<f64>], dim: usize, eps: f64) -> usize {
    if vectors.is_empty() || dim == 0 {
        return 0;
    }
    let m = DMatrix::from_columns(vectors);
    m.svd(false, false)
        .singular_values
        .iter()
        .filter(|&&s| s > eps)
        .count()
}

/// Orthonormal basis of `span(vectors)`, dropping vectors whose residual is below `eps`.
pub fn gram_schmidt(vectors: &[DVector<f64>], eps: f64) -> Vec<DVector<f64>> {
    let mut basis: Vec<DVector<f64>> = Vec::new();
    for v in vectors {
        let mut r = v.clone();
        for b in &basis {
            r -= b * b.dot(&r);
        }
        let n = r.norm();
        if n > eps {
            basis.push(r / n);
        }
    }
    basis
}

/// Unit vector orthogonal to `basis`, from the standard basis vector with the
/// largest residual.
fn complement_normal(basis: &[DVector<f64>], dim: usize) -> DVector<f64> {
    let mut best = DVector::zeros(dim);
    let mut best_norm = -1.0;
    for j in 0..dim {
        let mut r = DVector::zeros(dim);
        r[j] = 1.0;
        for b in basis {
            r -= b * b.dot(&r);
        }
        let n = r.norm();
        if n > best_norm {
            best_norm = n;
            best = r;
        }
    }
    if best_norm > 0.0 {
        best / best_norm
    } else {
        best
    }
}

fn coords(basis: &[DVector<f64>], p: &DVector<f64>) -> DVector<f64> {
    DVector::from_iterator(basis.len(), basis.iter().map(|b| b.dot(p)))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pt(xs: &[f64]) -> DVector<f64> {
        DVector::from_column_slice(xs)
    }

    #[test]
    fn gram_schmidt_orthonormalizes() {
        let basis = gram_schmidt(&[pt(&[1.0, 1.0, 0.0]), pt(&[2.0, 2.0, 0.0]), pt(&[0.0, 1.0, 1.0])], 1e-12);
        assert_eq!(basis.len(), 2);
        for (i, a) in basis.iter().enumerate() {
            assert!((a.norm() - 1.0).abs() < 1e-12);
            for b in &basis[i + 1..] {
                assert!(a.dot(b).abs() < 1e-12);
            }
        }
        let n = complement_normal(&basis, 3);
        assert!((n.norm() - 1.0).abs() < 1e-12);
        assert!(basis.iter().all(|b| b.dot(&n).abs() < 1e-12));
    }

    #[test]
    fn square_pyramid_flattens() {
        // base square in z = 0, apex above; project the apex onto the base
        let points = vec![
            pt(&[1.0, 1.0, 0.0]),
            pt(&[-1.0, 1.0, 0.0]),
            pt(&[-1.0, -1.0, 0.0]),
            pt(&[1.0, -1.0, 0.0]),
            pt(&[0.0, 0.0, 1.0]),
        ];
        let d = project(&points, (&[0, 1, 2, 3], &[4]), &SchlegelCfg::default()).unwrap();
        assert_eq!(d.dim(), 2);
        assert_eq!(d.image_facet(), &[0, 1, 2, 3]);
        // the apex lands on the base centre, which is also the centroid
        assert!(d.points()[4].norm() < 1e-9);
        let r = d.points()[0].norm();
        assert!(d.points()[..4].iter().all(|p| (p.norm() - r).abs() < 1e-9));
    }

    #[test]
    fn non_coplanar_facet_is_rejected() {
        let points = vec![
            pt(&[0.0, 0.0, 0.0]),
            pt(&[1.0, 0.0, 0.0]),
            pt(&[0.0, 1.0, 0.0]),
            pt(&[0.0, 0.0, 1.0]),
            pt(&[5.0, 5.0, 5.0]),
        ];
        let err = project(&points, (&[0, 1, 2, 3], &[4]), &SchlegelCfg::default()).unwrap_err();
        assert_eq!(err, SchlegelError::NotCoplanar { expected: 2, found: 3 });
    }

    #[test]
    fn singleton_side_forces_larger_plane() {
        let points = vec![pt(&[0.0, 1.0]), pt(&[-1.0, 0.0]), pt(&[1.0, 0.0])];
        let cfg = SchlegelCfg {
            project_to_larger: false,
            ..SchlegelCfg::default()
        };
        let d = project(&points, (&[0], &[1, 2]), &cfg).unwrap();
        assert_eq!(d.image_facet(), &[1, 2]);
        assert_eq!(d.dim(), 1);
    }

    #[test]
    fn uncovered_vertex_is_rejected() {
        let points = vec![
            pt(&[0.0, 1.0]),
            pt(&[-1.0, 0.0]),
            pt(&[1.0, 0.0]),
            pt(&[0.0, -5.0]),
        ];
        let err = project(&points, (&[0], &[1, 2]), &SchlegelCfg::default()).unwrap_err();
        assert_eq!(err, SchlegelError::IncompletePair { index: 3 });
    }

    #[test]
    fn bad_input() {
        let points = vec![pt(&[0.0, 1.0]), pt(&[1.0, 0.0])];
        let cfg = SchlegelCfg::default();
        assert_eq!(project(&points, (&[], &[0, 1]), &cfg).unwrap_err(), SchlegelError::EmptyFacet);
        assert_eq!(
            project(&points, (&[0], &[7]), &cfg).unwrap_err(),
            SchlegelError::BadVertex { index: 7, count: 2 }
        );
    }
}
