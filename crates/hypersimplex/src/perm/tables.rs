//! Generator tables and word application.

use super::word::{self, Letter, Token, WordError, WordErrorKind};
use crate::combinadic;

/// Closed set of vertex permutations the group alphabet compiles to.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Generator {
    CyclicShift,
    CyclicShiftInverse,
    AdjacentSwap,
    GlobalComplement,
}

impl Generator {
    pub fn inverse(self) -> Self {
        match self {
            Self::CyclicShift => Self::CyclicShiftInverse,
            Self::CyclicShiftInverse => Self::CyclicShift,
            // involutions
            Self::AdjacentSwap => Self::AdjacentSwap,
            Self::GlobalComplement => Self::GlobalComplement,
        }
    }

    /// Action on a membership vector; `out` must be zeroed and of equal length.
    fn apply_bits(self, bits: &[u8], out: &mut [u8]) {
        let d = bits.len();
        match self {
            Self::CyclicShift => {
                for j in 0..d {
                    out[(j + 1) % d] = bits[j];
                }
            }
            Self::CyclicShiftInverse => {
                for j in 0..d {
                    out[(j + d - 1) % d] = bits[j];
                }
            }
            Self::AdjacentSwap => {
                out.copy_from_slice(bits);
                out.swap(0, 1);
            }
            Self::GlobalComplement => {
                for (o, &b) in out.iter_mut().zip(bits) {
                    *o = 1 - b;
                }
            }
        }
    }
}

/// A word lowered to a sequence of generator tables, in application order.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct CompiledWord {
    steps: Vec<Generator>,
}

impl CompiledWord {
    pub fn identity() -> Self {
        Self::default()
    }

    #[inline]
    pub fn steps(&self) -> &[Generator] {
        &self.steps
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.steps.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }

    /// Formal inverse: steps reversed, each replaced by its inverse.
    pub fn inverse(&self) -> Self {
        Self {
            steps: self.steps.iter().rev().map(|g| g.inverse()).collect(),
        }
    }

    /// `self` followed by `other`.
    pub fn then(&self, other: &CompiledWord) -> Self {
        let mut steps = self.steps.clone();
        steps.extend_from_slice(&other.steps);
        Self { steps }
    }
}

/// Precomputed generator tables for Δ(d,k): `table[i]` is the index vertex `i` maps to.
#[derive(Clone, Debug)]
pub struct Permuter {
    d: usize,
    k: usize,
    cycle: Vec<usize>,
    cycle_inv: Vec<usize>,
    swap: Vec<usize>,
    complement: Option<Vec<usize>>,
}

impl Permuter {
    /// Tables for Δ(d,k). Callers validate `0 < k < d` first.
    pub fn new(d: usize, k: usize) -> Self {
        let table = |g: Generator| build_table(d, k, g);
        Self {
            d,
            k,
            cycle: table(Generator::CyclicShift),
            cycle_inv: table(Generator::CyclicShiftInverse),
            swap: table(Generator::AdjacentSwap),
            complement: (d == 2 * k).then(|| table(Generator::GlobalComplement)),
        }
    }

    #[inline]
    pub fn vertex_count(&self) -> usize {
        self.cycle.len()
    }

    /// Table for `g`; `None` only for the complement when d != 2k.
    pub fn table(&self, g: Generator) -> Option<&[usize]> {
        match g {
            Generator::CyclicShift => Some(&self.cycle),
            Generator::CyclicShiftInverse => Some(&self.cycle_inv),
            Generator::AdjacentSwap => Some(&self.swap),
            Generator::GlobalComplement => self.complement.as_deref(),
        }
    }

    /// Parse and lower a factored word.
    pub fn compile(&self, src: &str) -> Result<CompiledWord, WordError> {
        self.compile_tokens(&word::parse_word(src)?)
    }

    /// Lower parsed tokens. Exponents are reduced modulo the generator order
    /// (d for the cycle, 2 for the involutions), which leaves the element unchanged.
    pub fn compile_tokens(&self, tokens: &[Token]) -> Result<CompiledWord, WordError> {
        let mut steps = Vec::new();
        for t in tokens {
            let (g, order) = match t.letter {
                Letter::Cycle => (Generator::CyclicShift, self.d as u64),
                Letter::Swap => (Generator::AdjacentSwap, 2),
                Letter::Complement => {
                    if self.complement.is_none() {
                        return Err(WordError {
                            pos: t.pos,
                            kind: WordErrorKind::NoComplement,
                        });
                    }
                    (Generator::GlobalComplement, 2)
                }
            };
            let g = if t.exp < 0 { g.inverse() } else { g };
            let reps = (t.exp.unsigned_abs() % order) as usize;
            steps.extend(std::iter::repeat(g).take(reps));
        }
        Ok(CompiledWord { steps })
    }

    /// Apply `word` to `arr` in place: for each table in word order,
    /// `new[table[i]] = old[i]`.
    pub fn permute(&self, word: &CompiledWord, arr: &mut Vec<usize>) {
        debug_assert_eq!(arr.len(), self.vertex_count());
        let mut scratch = vec![0usize; arr.len()];
        for &g in &word.steps {
            // compile_tokens never emits a step without a table
            let Some(table) = self.table(g) else { continue };
            for (i, &t) in table.iter().enumerate() {
                scratch[t] = arr[i];
            }
            std::mem::swap(arr, &mut scratch);
        }
    }

    /// The word applied to the identity array `[0, 1, .., V-1]`.
    pub fn image(&self, word: &CompiledWord) -> Vec<usize> {
        let mut arr: Vec<usize> = (0..self.vertex_count()).collect();
        self.permute(word, &mut arr);
        arr
    }

    /// Entry `v` of [`Permuter::image`].
    pub fn permute_vertex(&self, word: &CompiledWord, v: usize) -> usize {
        self.image(word)[v]
    }

    #[inline]
    pub fn d(&self) -> usize {
        self.d
    }

    #[inline]
    pub fn k(&self) -> usize {
        self.k
    }
}

fn build_table(d: usize, k: usize, g: Generator) -> Vec<usize> {
    let n = combinadic::binomial(d, k);
    let mut bits = vec![0u8; d];
    let mut out = vec![0u8; d];
    (0..n)
        .map(|i| {
            bits.fill(0);
            out.fill(0);
            combinadic::unrank_into(k, i, &mut bits);
            g.apply_bits(&bits, &mut out);
            combinadic::rank(&out)
        })
        .collect()
}
