//! Automorphism groups of Δ(d,k) and the services that compute them.
//!
//! Purpose
//! - A [`GroupService`] answers a handful of group-theory queries in text:
//!   define the automorphism group, list its subgroups, and factor elements
//!   into words over the generator alphabet (`x1` cycle, `x2` transposition,
//!   `x3` complement when d = 2k).
//! - [`AutGroup`] wraps one service for one (d,k) and caches every answer, so
//!   each query is sent at most once.
//!
//! Services
//! - [`GapService`]: a `gap` subprocess driven over pipes.
//! - [`NativeService`]: an in-process enumeration for small groups, printing
//!   the same word syntax.
//!
//! Requests are strictly sequential (`&mut self`). Malformed or truncated
//! responses are hard errors and are never retried.

mod gap;
pub mod listing;
mod native;

pub use gap::{GapCfg, GapService};
pub use native::{NativeCfg, NativeService};

use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, info};

/// The automorphism group as defined on a service.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct GroupHandle {
    pub d: usize,
    pub k: usize,
    /// Structure description, e.g. `S4` or `C2 x S4`.
    pub name: String,
    pub order: usize,
}

/// A subgroup by position in the service's subgroup list.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubgroupHandle {
    pub index: usize,
    pub name: String,
}

#[derive(Debug, Error)]
pub enum ServiceError {
    #[error("failed to start group service `{program}`: {source}")]
    Spawn {
        program: String,
        #[source]
        source: std::io::Error,
    },
    #[error("group service i/o: {0}")]
    Io(#[from] std::io::Error),
    /// The service closed its output before finishing a response.
    #[error("group service response truncated (request `{request}`)")]
    Truncated { request: String },
    #[error("malformed group service response `{what}`: {reason}")]
    Malformed { what: String, reason: String },
    /// The service reported an error of its own.
    #[error("group service error: {0}")]
    Remote(String),
    /// A handle from an earlier `define_group` was used after redefinition.
    #[error("stale group handle for d={d}, k={k}")]
    StaleHandle { d: usize, k: usize },
    #[error("subgroup index {index} out of range (have {count})")]
    NoSuchSubgroup { index: usize, count: usize },
    #[error("group of order {order} exceeds the in-process limit {max}")]
    TooLarge { order: usize, max: usize },
}

/// Text-level contract of a group-theory backend.
///
/// Factorizations are words over the alphabet described in the module docs,
/// one per group element, in the service's element order.
pub trait GroupService: Send {
    fn define_group(&mut self, d: usize, k: usize) -> Result<GroupHandle, ServiceError>;
    fn enumerate_subgroups(
        &mut self,
        group: &GroupHandle,
    ) -> Result<Vec<SubgroupHandle>, ServiceError>;
    fn factor_group(&mut self, group: &GroupHandle) -> Result<Vec<String>, ServiceError>;
    fn factor_subgroup(
        &mut self,
        group: &GroupHandle,
        sub: &SubgroupHandle,
    ) -> Result<Vec<String>, ServiceError>;
    fn is_whole_group(
        &mut self,
        group: &GroupHandle,
        sub: &SubgroupHandle,
    ) -> Result<bool, ServiceError>;
}

/// Caching front for one automorphism group.
pub struct AutGroup {
    service: Box<dyn GroupService>,
    handle: GroupHandle,
    subgroups: Vec<SubgroupHandle>,
    elements: Option<Vec<String>>,
    sub_words: HashMap<usize, Vec<String>>,
    whole: HashMap<usize, bool>,
    transitive: Option<Vec<usize>>,
}

impl std::fmt::Debug for AutGroup {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AutGroup")
            .field("handle", &self.handle)
            .field("subgroups", &self.subgroups.len())
            .field("transitive", &self.transitive)
            .finish_non_exhaustive()
    }
}

impl AutGroup {
    /// Define Aut(Δ(d,k)) on `service` and fetch its subgroup list.
    pub fn new(mut service: Box<dyn GroupService>, d: usize, k: usize) -> Result<Self, ServiceError> {
        let handle = service.define_group(d, k)?;
        let subgroups = service.enumerate_subgroups(&handle)?;
        info!(
            d,
            k,
            group = %handle.name,
            order = handle.order,
            subgroups = subgroups.len(),
            "automorphism group defined"
        );
        Ok(Self {
            service,
            handle,
            subgroups,
            elements: None,
            sub_words: HashMap::new(),
            whole: HashMap::new(),
            transitive: None,
        })
    }

    #[inline]
    pub fn handle(&self) -> &GroupHandle {
        &self.handle
    }

    #[inline]
    pub fn subgroups(&self) -> &[SubgroupHandle] {
        &self.subgroups
    }

    pub fn subgroup(&self, index: usize) -> Result<&SubgroupHandle, ServiceError> {
        self.subgroups
            .get(index)
            .ok_or_else(|| ServiceError::NoSuchSubgroup {
                index,
                count: self.subgroups.len(),
            })
    }

    /// Factorizations of every element of the full group.
    pub fn elements(&mut self) -> Result<&[String], ServiceError> {
        if self.elements.is_none() {
            let words = self.service.factor_group(&self.handle)?;
            debug!(count = words.len(), "group factorized");
            self.elements = Some(words);
        }
        Ok(self.elements.as_deref().unwrap_or_default())
    }

    pub fn is_whole_group(&mut self, index: usize) -> Result<bool, ServiceError> {
        if let Some(&w) = self.whole.get(&index) {
            return Ok(w);
        }
        let sub = self.subgroup(index)?.clone();
        let w = self.service.is_whole_group(&self.handle, &sub)?;
        self.whole.insert(index, w);
        Ok(w)
    }

    /// Factorizations of the elements of subgroup `index`. The whole group
    /// reuses the full factorization verbatim.
    pub fn subgroup_words(&mut self, index: usize) -> Result<&[String], ServiceError> {
        if !self.sub_words.contains_key(&index) {
            let words = if self.is_whole_group(index)? {
                self.elements()?.to_vec()
            } else {
                let sub = self.subgroup(index)?.clone();
                self.service.factor_subgroup(&self.handle, &sub)?
            };
            debug!(subgroup = index, elements = words.len(), "subgroup factorized");
            self.sub_words.insert(index, words);
        }
        Ok(self
            .sub_words
            .get(&index)
            .map(Vec::as_slice)
            .unwrap_or_default())
    }

    /// Cached vertex-transitive subgroup indices, if already computed.
    #[inline]
    pub fn transitive(&self) -> Option<&[usize]> {
        self.transitive.as_deref()
    }

    pub(crate) fn set_transitive(&mut self, indices: Vec<usize>) {
        self.transitive = Some(indices);
    }
}
