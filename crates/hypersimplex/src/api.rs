//! Curated internal API (UNSTABLE).
//!
//! Important
//! - This is not a public API. It is a convenience surface for the CLI and
//!   experiments. Breaking changes are allowed and expected.
//! - Prefer these re-exports for clarity and consistency across callers.

// Graph
pub use crate::combinadic::{binomial, checked_binomial, rank, unrank};
pub use crate::hypersimplex::{Edge, Hypersimplex, Vertex};
// Words and permutations
pub use crate::perm::{invert, parse_word, CompiledWord, Generator, Permuter, WordError};
// Groups
pub use crate::group::{
    AutGroup, GapCfg, GapService, GroupHandle, GroupService, NativeCfg, NativeService,
    ServiceError, SubgroupHandle,
};
// Symmetry
pub use crate::symmetry::{classify, classify_all, find_transitive, CancelToken, EdgeClass};
// Matrix, embedding, projection
pub use crate::embedding::{embed, EmbedCfg, EmbedError, EmbedMode, Embedding, NullSpaceRepr};
pub use crate::gimatrix::{GiMatrix, WeightError};
pub use crate::schlegel::{gram_schmidt, project, SchlegelCfg, SchlegelDiagram, SchlegelError};
// End to end
pub use crate::pipeline::{BuildJob, BuildStatus, PipelineCfg, Representer, SubgroupSummary};
