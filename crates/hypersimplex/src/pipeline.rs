//! End-to-end construction: Δ(d,k) → automorphism group → vertex-transitive
//! subgroups → edge classes, with per-subgroup matrix, embedding and Schlegel
//! queries on the result.
//!
//! [`Representer`] is an owned value; nothing is global. [`BuildJob`] runs the
//! construction on a worker thread and is polled for `Pending | Ready | Failed`.

use std::thread::{self, JoinHandle};

use serde::Serialize;
use tracing::info;

use crate::embedding::{embed, EmbedCfg, Embedding};
use crate::error::HypersimplexError;
use crate::gimatrix::GiMatrix;
use crate::group::{AutGroup, GroupService};
use crate::hypersimplex::Hypersimplex;
use crate::schlegel::{project, SchlegelCfg, SchlegelDiagram};
use crate::symmetry::{classify_all, find_transitive, CancelToken, EdgeClass};

#[derive(Clone, Copy, Debug, Default)]
pub struct PipelineCfg {
    pub embed: EmbedCfg,
    pub schlegel: SchlegelCfg,
}

/// Report-facing summary of one vertex-transitive subgroup.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct SubgroupSummary {
    /// Position among the vertex-transitive subgroups.
    pub position: usize,
    /// Index in the service's full subgroup list.
    pub index: usize,
    pub name: String,
    pub order: usize,
    pub class_count: usize,
}

#[derive(Debug)]
pub struct Representer {
    hs: Hypersimplex,
    aut: AutGroup,
    cfg: PipelineCfg,
    /// Parallel to `aut.transitive()`.
    summaries: Vec<SubgroupSummary>,
    classes: Vec<Vec<EdgeClass>>,
}

impl Representer {
    pub fn build(
        d: usize,
        k: usize,
        service: Box<dyn GroupService>,
        cfg: PipelineCfg,
        cancel: &CancelToken,
    ) -> Result<Self, HypersimplexError> {
        let hs = Hypersimplex::new(d, k)?;
        cancel.check()?;
        let mut aut = AutGroup::new(service, d, k)?;
        cancel.check()?;
        let found = find_transitive(&mut aut, hs.permuter(), cancel)?;
        let (indices, images): (Vec<usize>, Vec<_>) = found.into_iter().unzip();
        cancel.check()?;
        let classes = classify_all(&hs, &images);

        let summaries = indices
            .iter()
            .zip(&images)
            .zip(&classes)
            .enumerate()
            .map(|(position, ((&index, imgs), cls))| SubgroupSummary {
                position,
                index,
                name: aut.subgroups()[index].name.clone(),
                order: imgs.len(),
                class_count: cls.len(),
            })
            .collect::<Vec<_>>();
        info!(
            d,
            k,
            group = %aut.handle().name,
            transitive = summaries.len(),
            "representer built"
        );
        Ok(Self {
            hs,
            aut,
            cfg,
            summaries,
            classes,
        })
    }

    #[inline]
    pub fn hypersimplex(&self) -> &Hypersimplex {
        &self.hs
    }

    #[inline]
    pub fn group(&self) -> &AutGroup {
        &self.aut
    }

    #[inline]
    pub fn cfg(&self) -> &PipelineCfg {
        &self.cfg
    }

    /// Vertex-transitive subgroups, in service order.
    #[inline]
    pub fn subgroups(&self) -> &[SubgroupSummary] {
        &self.summaries
    }

    /// Edge classes under the `position`-th vertex-transitive subgroup.
    pub fn classes(&self, position: usize) -> Result<&[EdgeClass], HypersimplexError> {
        self.classes
            .get(position)
            .map(Vec::as_slice)
            .ok_or(HypersimplexError::NoSuchSubgroup {
                index: position,
                count: self.classes.len(),
            })
    }

    /// Invariant matrix with default weights.
    pub fn gi_matrix(&self, position: usize) -> Result<GiMatrix, HypersimplexError> {
        Ok(GiMatrix::new(&self.hs, self.classes(position)?.to_vec()))
    }

    /// Embedding for the given weights (defaults when `None`), with the
    /// embedding settings this value was built with.
    pub fn null_space(
        &self,
        position: usize,
        weights: Option<&[f64]>,
    ) -> Result<Embedding, HypersimplexError> {
        self.null_space_with(position, weights, &self.cfg.embed)
    }

    pub fn null_space_with(
        &self,
        position: usize,
        weights: Option<&[f64]>,
        cfg: &EmbedCfg,
    ) -> Result<Embedding, HypersimplexError> {
        let mut gi = self.gi_matrix(position)?;
        if let Some(w) = weights {
            gi.set_weights(w)?;
        }
        Ok(embed(gi.matrix(), self.hs.d(), cfg)?)
    }

    /// Schlegel diagram of an embedding through facet pair `facet`, with the
    /// projection settings this value was built with.
    pub fn schlegel(
        &self,
        embedding: &Embedding,
        facet: usize,
    ) -> Result<SchlegelDiagram, HypersimplexError> {
        self.schlegel_with(embedding, facet, &self.cfg.schlegel)
    }

    pub fn schlegel_with(
        &self,
        embedding: &Embedding,
        facet: usize,
        cfg: &SchlegelCfg,
    ) -> Result<SchlegelDiagram, HypersimplexError> {
        let (ones, zeros) = self.hs.facet_pair(facet).ok_or(HypersimplexError::NoSuchFacet {
            index: facet,
            d: self.hs.d(),
        })?;
        Ok(project(embedding.points(), (&ones, &zeros), cfg)?)
    }
}

/// Poll result of a [`BuildJob`].
#[derive(Debug)]
pub enum BuildStatus<'a> {
    Pending,
    Ready(&'a Representer),
    Failed(&'a HypersimplexError),
}

/// [`Representer::build`] on a worker thread.
pub struct BuildJob {
    cancel: CancelToken,
    handle: Option<JoinHandle<Result<Representer, HypersimplexError>>>,
    outcome: Option<Result<Representer, HypersimplexError>>,
}

impl BuildJob {
    pub fn spawn(d: usize, k: usize, service: Box<dyn GroupService>, cfg: PipelineCfg) -> Self {
        let cancel = CancelToken::new();
        let token = cancel.clone();
        let handle = thread::spawn(move || Representer::build(d, k, service, cfg, &token));
        Self {
            cancel,
            handle: Some(handle),
            outcome: None,
        }
    }

    /// Non-blocking status check.
    pub fn poll(&mut self) -> BuildStatus<'_> {
        if self.outcome.is_none() {
            match self.handle.take() {
                Some(h) if h.is_finished() => self.outcome = Some(join(h)),
                other => self.handle = other,
            }
        }
        match &self.outcome {
            None => BuildStatus::Pending,
            Some(Ok(r)) => BuildStatus::Ready(r),
            Some(Err(e)) => BuildStatus::Failed(e),
        }
    }

    /// Ask the worker to stop at its next check.
    pub fn cancel(&self) {
        self.cancel.cancel();
    }

    /// Block until the worker finishes.
    pub fn wait(mut self) -> Result<Representer, HypersimplexError> {
        if let Some(outcome) = self.outcome.take() {
            return outcome;
        }
        match self.handle.take() {
            Some(h) => join(h),
            None => Err(HypersimplexError::WorkerPanicked),
        }
    }
}

fn join(h: JoinHandle<Result<Representer, HypersimplexError>>) -> Result<Representer, HypersimplexError> {
    h.join().unwrap_or(Err(HypersimplexError::WorkerPanicked))
}
