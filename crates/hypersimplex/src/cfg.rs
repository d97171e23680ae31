//! Tolerance defaults (internal).
//!
//! Policy
//! - Fixed constants for checks that are not meant to be tuned per call.
//!   Everything a caller may reasonably want to change lives in a config
//!   struct (`EmbedCfg`, `SchlegelCfg`, `PipelineCfg`) with these as defaults.

/// Row-sum constraint of the invariant matrix: `|row_sum - 1| <= ROW_SUM_EPS`.
pub(crate) const ROW_SUM_EPS: f64 = 1e-9;
/// Strict eigenvalue-cluster spread for the clustered embedding mode.
pub(crate) const CLUSTER_TOL_STRICT: f64 = 0.01;
/// Fallback spread used when no cluster is found at the strict tolerance.
pub(crate) const CLUSTER_TOL_LOOSE: f64 = 0.1;
/// Singular values at or below this count as zero when ranking a span.
pub(crate) const RANK_EPS: f64 = 1e-9;
/// Offset of the Schlegel projection centre from the image hyperplane.
pub(crate) const PROJ_CENTER_OFFSET: f64 = 0.001;
/// Iteration cap handed to the symmetric eigen-solver.
pub(crate) const EIGEN_MAX_ITER: usize = 10_000;
/// Largest vertex count `Hypersimplex::new` accepts; the invariant matrix is dense V×V.
pub(crate) const MAX_VERTICES: usize = 50_000;
