//! In-process group service for small automorphism groups.
//!
//! The group is realized on the same points GAP would use (d points, or 2d when
//! d = 2k so the complement acts as a point permutation). Elements are found by
//! breadth-first closure from the identity, which yields a shortest word per
//! element. Subgroups are all iterated joins of cyclic subgroups; every subgroup
//! of a finite group arises this way.
//!
//! Words multiply left to right (left factor acts first), matching the
//! permutation engine.

use std::collections::{HashMap, HashSet, VecDeque};

use tracing::debug;

use super::{GroupHandle, GroupService, ServiceError, SubgroupHandle};

#[derive(Clone, Copy, Debug)]
pub struct NativeCfg {
    /// Largest group order enumerated in process.
    pub max_order: usize,
}

impl Default for NativeCfg {
    fn default() -> Self {
        Self { max_order: 720 }
    }
}

/// One letter of a word: generator number (1-based, as printed) and ±1.
type Step = (u8, i8);

struct Subgroup {
    /// Element indices, ascending.
    members: Vec<usize>,
    name: String,
}

struct NativeGroup {
    d: usize,
    k: usize,
    name: String,
    words: Vec<String>,
    /// `mul[a * n + b]`: index of "a then b".
    mul: Vec<u32>,
    elem_order: Vec<usize>,
    subgroups: Option<Vec<Subgroup>>,
}

#[derive(Default)]
pub struct NativeService {
    cfg: NativeCfg,
    group: Option<NativeGroup>,
}

impl NativeService {
    pub fn new(cfg: NativeCfg) -> Self {
        Self { cfg, group: None }
    }

    fn group(&self, handle: &GroupHandle) -> Result<&NativeGroup, ServiceError> {
        match &self.group {
            Some(g) if g.d == handle.d && g.k == handle.k => Ok(g),
            _ => Err(ServiceError::StaleHandle {
                d: handle.d,
                k: handle.k,
            }),
        }
    }

    fn subgroup(&self, handle: &GroupHandle, index: usize) -> Result<&Subgroup, ServiceError> {
        let g = self.group(handle)?;
        let subs = g.subgroups.as_deref().unwrap_or_default();
        subs.get(index).ok_or(ServiceError::NoSuchSubgroup {
            index,
            count: subs.len(),
        })
    }
}

fn factorial(n: usize) -> Option<usize> {
    (1..=n).try_fold(1usize, |acc, i| acc.checked_mul(i))
}

/// Point permutations for the generator alphabet, with the printed step of each.
fn generators(d: usize, k: usize) -> Vec<(Vec<usize>, Step)> {
    let symmetric = d == 2 * k;
    let points = if symmetric { 2 * d } else { d };
    let half = |p: usize| (p / d, p % d);
    let cycle: Vec<usize> = (0..points)
        .map(|p| {
            let (h, j) = half(p);
            h * d + (j + 1) % d
        })
        .collect();
    let mut cycle_inv = vec![0; points];
    for (p, &q) in cycle.iter().enumerate() {
        cycle_inv[q] = p;
    }
    let swap: Vec<usize> = (0..points)
        .map(|p| {
            let (h, j) = half(p);
            h * d + match j {
                0 => 1,
                1 => 0,
                j => j,
            }
        })
        .collect();
    let mut gens = vec![(cycle, (1, 1)), (cycle_inv, (1, -1)), (swap, (2, 1))];
    if symmetric {
        let complement = (0..points).map(|p| (p + d) % points).collect();
        gens.push((complement, (3, 1)));
    }
    gens
}

/// Print a step sequence with run-length exponents (`x1^2*x2^-1`).
fn format_word(steps: &[Step]) -> String {
    if steps.is_empty() {
        return "<identity ...>".to_owned();
    }
    let mut parts: Vec<String> = Vec::new();
    let mut i = 0;
    while i < steps.len() {
        let (letter, sign) = steps[i];
        let run = steps[i..].iter().take_while(|&&s| s == (letter, sign)).count();
        let exp = run as i64 * i64::from(sign);
        parts.push(if exp == 1 {
            format!("x{letter}")
        } else {
            format!("x{letter}^{exp}")
        });
        i += run;
    }
    parts.join("*")
}

impl NativeGroup {
    fn build(d: usize, k: usize, max_order: usize) -> Result<Self, ServiceError> {
        let symmetric = d == 2 * k;
        let order = factorial(d)
            .and_then(|f| if symmetric { f.checked_mul(2) } else { Some(f) })
            .unwrap_or(usize::MAX);
        if order > max_order {
            return Err(ServiceError::TooLarge {
                order,
                max: max_order,
            });
        }

        let gens = generators(d, k);
        let points = gens[0].0.len();
        let identity: Vec<usize> = (0..points).collect();
        let mut perms = vec![identity.clone()];
        let mut steps: Vec<Vec<Step>> = vec![Vec::new()];
        let mut index: HashMap<Vec<usize>, usize> = HashMap::from([(identity, 0)]);
        let mut queue = VecDeque::from([0usize]);
        while let Some(x) = queue.pop_front() {
            for (g, step) in &gens {
                let y: Vec<usize> = perms[x].iter().map(|&p| g[p]).collect();
                if index.contains_key(&y) {
                    continue;
                }
                let mut w = steps[x].clone();
                w.push(*step);
                index.insert(y.clone(), perms.len());
                queue.push_back(perms.len());
                perms.push(y);
                steps.push(w);
            }
        }
        let n = perms.len();

        let mut mul = vec![0u32; n * n];
        for a in 0..n {
            for b in 0..n {
                let ab: Vec<usize> = perms[a].iter().map(|&p| perms[b][p]).collect();
                // closed by construction
                mul[a * n + b] = index.get(&ab).copied().unwrap_or(0) as u32;
            }
        }
        let elem_order = (0..n)
            .map(|a| {
                let (mut x, mut m) = (a, 1);
                while x != 0 {
                    x = mul[x * n + a] as usize;
                    m += 1;
                }
                m
            })
            .collect();

        let name = if symmetric {
            format!("C2 x S{d}")
        } else {
            format!("S{d}")
        };
        debug!(d, k, order = n, %name, "native group closed");
        Ok(Self {
            d,
            k,
            name,
            words: steps.iter().map(Vec::as_slice).map(format_word).collect(),
            mul,
            elem_order,
            subgroups: None,
        })
    }

    #[inline]
    fn order(&self) -> usize {
        self.words.len()
    }

    /// Subgroup generated by `gens`, as a bitset over element indices.
    fn closure(&self, gens: &[usize]) -> Vec<u64> {
        let n = self.order();
        let mut bits = vec![0u64; n.div_ceil(64)];
        bits[0] |= 1;
        let mut queue = VecDeque::from([0usize]);
        while let Some(x) = queue.pop_front() {
            for &g in gens {
                let y = self.mul[x * n + g] as usize;
                if (bits[y / 64] & (1 << (y % 64))) == 0 {
                    bits[y / 64] |= 1 << (y % 64);
                    queue.push_back(y);
                }
            }
        }
        bits
    }

    fn subgroups(&mut self) -> &[Subgroup] {
        if self.subgroups.is_none() {
            let found = self.enumerate();
            self.subgroups = Some(found);
        }
        self.subgroups.as_deref().unwrap_or_default()
    }

    fn enumerate(&self) -> Vec<Subgroup> {
        let n = self.order();
        let has = |bits: &[u64], x: usize| (bits[x / 64] & (1 << (x % 64))) != 0;

        let mut seen: HashSet<Vec<u64>> = HashSet::new();
        let mut cyclic: Vec<usize> = Vec::new();
        for a in 0..n {
            if seen.insert(self.closure(&[a])) {
                cyclic.push(a);
            }
        }
        let mut all: Vec<(Vec<u64>, Vec<usize>)> =
            cyclic.iter().map(|&a| (self.closure(&[a]), vec![a])).collect();
        let mut frontier: Vec<usize> = (0..all.len()).collect();
        while !frontier.is_empty() {
            let mut next = Vec::new();
            for s in frontier {
                for &c in &cyclic {
                    if has(&all[s].0, c) {
                        continue;
                    }
                    let mut gens = all[s].1.clone();
                    gens.push(c);
                    let joined = self.closure(&gens);
                    if seen.insert(joined.clone()) {
                        next.push(all.len());
                        all.push((joined, gens));
                    }
                }
            }
            frontier = next;
        }

        let mut subs: Vec<Subgroup> = all
            .into_iter()
            .map(|(bits, _)| {
                let members: Vec<usize> = (0..n).filter(|&x| has(&bits, x)).collect();
                let name = self.subgroup_name(&members);
                Subgroup { members, name }
            })
            .collect();
        subs.sort_by(|a, b| {
            (a.members.len(), &a.members).cmp(&(b.members.len(), &b.members))
        });
        debug!(count = subs.len(), "native subgroups enumerated");
        subs
    }

    fn subgroup_name(&self, members: &[usize]) -> String {
        let m = members.len();
        if m == 1 {
            "1".to_owned()
        } else if m == self.order() {
            self.name.clone()
        } else if members.iter().any(|&x| self.elem_order[x] == m) {
            format!("C{m}")
        } else {
            format!("<order {m}>")
        }
    }
}

impl GroupService for NativeService {
    fn define_group(&mut self, d: usize, k: usize) -> Result<GroupHandle, ServiceError> {
        let g = NativeGroup::build(d, k, self.cfg.max_order)?;
        let handle = GroupHandle {
            d,
            k,
            name: g.name.clone(),
            order: g.order(),
        };
        self.group = Some(g);
        Ok(handle)
    }

    fn enumerate_subgroups(
        &mut self,
        group: &GroupHandle,
    ) -> Result<Vec<SubgroupHandle>, ServiceError> {
        self.group(group)?;
        let g = self
            .group
            .as_mut()
            .ok_or(ServiceError::StaleHandle { d: group.d, k: group.k })?;
        Ok(g.subgroups()
            .iter()
            .enumerate()
            .map(|(index, s)| SubgroupHandle {
                index,
                name: s.name.clone(),
            })
            .collect())
    }

    fn factor_group(&mut self, group: &GroupHandle) -> Result<Vec<String>, ServiceError> {
        Ok(self.group(group)?.words.clone())
    }

    fn factor_subgroup(
        &mut self,
        group: &GroupHandle,
        sub: &SubgroupHandle,
    ) -> Result<Vec<String>, ServiceError> {
        let members = self.subgroup(group, sub.index)?.members.clone();
        let g = self.group(group)?;
        Ok(members.iter().map(|&x| g.words[x].clone()).collect())
    }

    fn is_whole_group(
        &mut self,
        group: &GroupHandle,
        sub: &SubgroupHandle,
    ) -> Result<bool, ServiceError> {
        let m = self.subgroup(group, sub.index)?.members.len();
        Ok(m == self.group(group)?.order())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn defined(d: usize, k: usize) -> (NativeService, GroupHandle) {
        let mut svc = NativeService::default();
        let h = svc.define_group(d, k).unwrap();
        (svc, h)
    }

    #[test]
    fn group_orders_and_names() {
        let (_, h) = defined(3, 1);
        assert_eq!((h.order, h.name.as_str()), (6, "S3"));
        let (_, h) = defined(4, 2);
        assert_eq!((h.order, h.name.as_str()), (48, "C2 x S4"));
        let (_, h) = defined(5, 2);
        assert_eq!(h.order, 120);
    }

    #[test]
    fn too_large_is_refused() {
        let mut svc = NativeService::new(NativeCfg { max_order: 100 });
        assert!(matches!(
            svc.define_group(5, 2),
            Err(ServiceError::TooLarge { order: 120, max: 100 })
        ));
    }

    #[test]
    fn words_print_like_gap() {
        assert_eq!(format_word(&[]), "<identity ...>");
        assert_eq!(format_word(&[(1, 1), (1, 1), (2, 1)]), "x1^2*x2");
        assert_eq!(format_word(&[(1, -1), (2, 1), (1, -1)]), "x1^-1*x2*x1^-1");
    }

    #[test]
    fn s3_has_six_subgroups() {
        let (mut svc, h) = defined(3, 1);
        let subs = svc.enumerate_subgroups(&h).unwrap();
        let names: Vec<_> = subs.iter().map(|s| s.name.as_str()).collect();
        assert_eq!(names, vec!["1", "C2", "C2", "C2", "C3", "S3"]);
        let whole = subs.last().unwrap();
        assert!(svc.is_whole_group(&h, whole).unwrap());
        assert!(!svc.is_whole_group(&h, &subs[4]).unwrap());
        let words = svc.factor_subgroup(&h, whole).unwrap();
        assert_eq!(words, svc.factor_group(&h).unwrap());
        assert_eq!(words[0], "<identity ...>");
    }

    #[test]
    fn subgroup_counts_match_known_tables() {
        // S4 has 30 subgroups, S4 x C2 has 98
        let (mut svc, h) = defined(4, 1);
        assert_eq!(svc.enumerate_subgroups(&h).unwrap().len(), 30);
        let (mut svc, h) = defined(4, 2);
        assert_eq!(svc.enumerate_subgroups(&h).unwrap().len(), 98);
    }

    #[test]
    fn stale_handles_are_rejected() {
        let (mut svc, h) = defined(3, 1);
        svc.define_group(4, 1).unwrap();
        assert!(matches!(
            svc.factor_group(&h),
            Err(ServiceError::StaleHandle { d: 3, k: 1 })
        ));
    }

    #[test]
    fn subgroup_words_stay_inside_the_group() {
        let (mut svc, h) = defined(4, 2);
        let subs = svc.enumerate_subgroups(&h).unwrap();
        let all: HashSet<String> = svc.factor_group(&h).unwrap().into_iter().collect();
        for s in &subs {
            let words = svc.factor_subgroup(&h, s).unwrap();
            assert!(words.iter().all(|w| all.contains(w)));
            assert_eq!(words[0], "<identity ...>");
        }
    }
}
