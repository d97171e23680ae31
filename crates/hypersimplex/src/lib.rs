//! Symmetric embeddings of hypersimplices.
//!
//! Δ(d,k) is the convex hull of the 0/1 vectors of length d with exactly k ones.
//! For every vertex-transitive subgroup of its automorphism group this crate
//! partitions the edges into orbits, builds the group-invariant adjacency
//! matrix, embeds the vertices in R^(d-1) via an eigenspace of that matrix and
//! draws Schlegel diagrams of the result.
//!
//! Pipeline
//! - [`hypersimplex`]: vertices by combinadic rank, sorted edge list.
//! - [`perm`]: generator words and their action on vertex indices.
//! - [`group`]: automorphism group and subgroup lattice, from a GAP process or
//!   the native enumerator.
//! - [`symmetry`]: vertex-transitivity and edge classes.
//! - [`gimatrix`], [`embedding`], [`schlegel`]: weights, eigenspace, projection.
//! - [`pipeline`]: all of the above behind one owned value.
//!
//! API Policy
//! - This crate is project-internal. There is no stable public API.
//! - Prefer clarity over compatibility; breaking changes are fine when they
//!   improve the design.

pub mod api;
mod cfg;
pub mod combinadic;
pub mod embedding;
pub mod error;
pub mod gimatrix;
pub mod group;
pub mod hypersimplex;
pub mod perm;
pub mod pipeline;
pub mod schlegel;
pub mod symmetry;

/// Library version string.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

pub use error::HypersimplexError;
pub use hypersimplex::Hypersimplex;
pub use pipeline::{BuildJob, BuildStatus, PipelineCfg, Representer};

/// Common exports for quick imports in callers.
pub mod prelude {
    pub use crate::embedding::{EmbedCfg, EmbedMode, Embedding};
    pub use crate::error::HypersimplexError;
    pub use crate::group::{GapCfg, GapService, GroupService, NativeCfg, NativeService};
    pub use crate::hypersimplex::{Edge, Hypersimplex, Vertex};
    pub use crate::pipeline::{BuildJob, BuildStatus, PipelineCfg, Representer};
    pub use crate::schlegel::{SchlegelCfg, SchlegelDiagram};
    pub use crate::symmetry::CancelToken;
    pub use nalgebra::{DMatrix, DVector};
}
