//! Vertex-transitive subgroup search.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use rayon::prelude::*;
use tracing::{debug, info};

use crate::error::HypersimplexError;
use crate::group::AutGroup;
use crate::perm::{CompiledWord, Permuter};

/// Shared cancellation flag, checked between subgroup iterations.
#[derive(Clone, Debug, Default)]
pub struct CancelToken(Arc<AtomicBool>);

impl CancelToken {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.0.store(true, Ordering::Relaxed);
    }

    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::Relaxed)
    }

    pub fn check(&self) -> Result<(), HypersimplexError> {
        if self.is_cancelled() {
            Err(HypersimplexError::Cancelled)
        } else {
            Ok(())
        }
    }
}

/// Full image arrays of every element of one subgroup.
pub type Images = Vec<Vec<usize>>;

/// Parse and apply every word of subgroup `index` (fetched through the cache).
pub fn subgroup_images(
    aut: &mut AutGroup,
    permuter: &Permuter,
    index: usize,
) -> Result<Images, HypersimplexError> {
    let words = aut.subgroup_words(index)?;
    let compiled = compile_all(permuter, words)?;
    Ok(compiled.iter().map(|w| permuter.image(w)).collect())
}

fn compile_all(permuter: &Permuter, words: &[String]) -> Result<Vec<CompiledWord>, HypersimplexError> {
    words
        .iter()
        .map(|w| {
            permuter.compile(w).map_err(|source| HypersimplexError::Word {
                word: w.clone(),
                source,
            })
        })
        .collect()
}

/// `true` iff the images of vertex 0 cover every vertex.
pub fn is_transitive(images: &[Vec<usize>], vertex_count: usize) -> bool {
    let mut hits = vec![false; vertex_count];
    for img in images {
        hits[img[0]] = true;
    }
    hits.iter().all(|&h| h)
}

/// Indices of the vertex-transitive subgroups, in subgroup-list order.
///
/// Words are fetched sequentially; the checks then run in parallel. The result
/// is cached on `aut`, and the images of each transitive subgroup are returned
/// alongside its index.
pub fn find_transitive(
    aut: &mut AutGroup,
    permuter: &Permuter,
    cancel: &CancelToken,
) -> Result<Vec<(usize, Images)>, HypersimplexError> {
    let wanted: Option<Vec<usize>> = aut.transitive().map(<[usize]>::to_vec);
    let candidates: Vec<usize> = wanted
        .clone()
        .unwrap_or_else(|| (0..aut.subgroups().len()).collect());

    let mut fetched: Vec<(usize, Vec<CompiledWord>)> = Vec::with_capacity(candidates.len());
    for index in candidates {
        cancel.check()?;
        let words = aut.subgroup_words(index)?;
        fetched.push((index, compile_all(permuter, words)?));
    }

    let n = permuter.vertex_count();
    let checked: Vec<Option<(usize, Images)>> = fetched
        .into_par_iter()
        .map(|(index, words)| {
            cancel.check()?;
            let images: Images = words.iter().map(|w| permuter.image(w)).collect();
            Ok(is_transitive(&images, n).then_some((index, images)))
        })
        .collect::<Result<_, HypersimplexError>>()?;
    let found: Vec<(usize, Images)> = checked.into_iter().flatten().collect();

    if wanted.is_none() {
        let indices: Vec<usize> = found.iter().map(|(i, _)| *i).collect();
        info!(
            transitive = indices.len(),
            of = aut.subgroups().len(),
            "vertex-transitive subgroups"
        );
        aut.set_transitive(indices);
    } else {
        debug!(transitive = found.len(), "vertex-transitive subgroups (cached)");
    }
    Ok(found)
}
