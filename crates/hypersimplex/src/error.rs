//! Umbrella error for the construction pipeline.
//!
//! Each stage keeps its own error enum next to the code that raises it
//! (`WordError`, `ServiceError`, `WeightError`, `EmbedError`, `SchlegelError`);
//! `HypersimplexError` collects them for callers that drive the whole pipeline.

use thiserror::Error;

use crate::embedding::EmbedError;
use crate::gimatrix::WeightError;
use crate::group::ServiceError;
use crate::perm::WordError;
use crate::schlegel::SchlegelError;

/// Errors surfaced while building or querying a hypersimplex representation.
#[derive(Debug, Error)]
pub enum HypersimplexError {
    /// Degenerate parameters; nothing was constructed.
    #[error("invalid hypersimplex parameters d={d}, k={k}: {reason}")]
    InvalidParams { d: usize, k: usize, reason: String },
    /// A factored word from the group service could not be parsed.
    #[error("malformed group element `{word}`: {source}")]
    Word {
        word: String,
        #[source]
        source: WordError,
    },
    #[error(transparent)]
    Service(#[from] ServiceError),
    #[error(transparent)]
    Weights(#[from] WeightError),
    #[error(transparent)]
    Embed(#[from] EmbedError),
    #[error(transparent)]
    Schlegel(#[from] SchlegelError),
    /// Subgroup index outside the list of vertex-transitive subgroups.
    #[error("no vertex-transitive subgroup with index {index} (have {count})")]
    NoSuchSubgroup { index: usize, count: usize },
    /// Facet pair index outside `0..d`.
    #[error("facet pair index {index} out of range for d={d}")]
    NoSuchFacet { index: usize, d: usize },
    #[error("computation cancelled")]
    Cancelled,
    /// The background build thread panicked.
    #[error("build worker panicked")]
    WorkerPanicked,
}

impl HypersimplexError {
    pub(crate) fn invalid(d: usize, k: usize, reason: impl Into<String>) -> Self {
        Self::InvalidParams {
            d,
            k,
            reason: reason.into(),
        }
    }
}
