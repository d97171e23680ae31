//! Combinatorial number system (combinadics) for k-subsets of {0..d-1}.
//!
//! A k-subset is a membership vector `bits[d]` with exactly `k` ones. Subsets
//! are ranked in lexicographic combinadic order:
//! `rank(bits) = Σ_j C(pos_j, j+1)` over the set positions `pos_0 < pos_1 < …`.
//! Unranking is the greedy inverse. Both run in O(d·k).
//!
//! Binomials are exact integers (multiplicative formula with integer division),
//! so the bijection never misrounds for large `d`.

/// Exact binomial coefficient `C(n, k)`; `0` when `k > n`.
///
/// Panics only on `usize` overflow, far beyond any vertex count that fits in memory.
pub fn binomial(n: usize, k: usize) -> usize {
    checked_binomial(n, k).unwrap_or_else(|| panic!("binomial C({n}, {k}) overflows usize"))
}

/// `C(n, k)`, or `None` if an intermediate product overflows `usize`.
pub fn checked_binomial(n: usize, k: usize) -> Option<usize> {
    if k > n {
        return Some(0);
    }
    let k = k.min(n - k);
    let mut acc: usize = 1;
    for i in 1..=k {
        // acc * (n - k + i) is divisible by i after the multiplication.
        acc = acc.checked_mul(n - k + i)? / i;
    }
    Some(acc)
}

/// Rank of the subset given by its membership vector.
pub fn rank(bits: &[u8]) -> usize {
    let mut n = 0;
    let mut j = 1;
    for (pos, &b) in bits.iter().enumerate() {
        if b != 0 {
            n += binomial(pos, j);
            j += 1;
        }
    }
    n
}

/// Membership vector of the `n`-th k-subset of {0..d-1}.
///
/// Returns `None` if `k > d` or `n >= C(d, k)`.
pub fn unrank(d: usize, k: usize, n: usize) -> Option<Vec<u8>> {
    if k > d || n >= binomial(d, k) {
        return None;
    }
    let mut bits = vec![0u8; d];
    unrank_into(k, n, &mut bits);
    Some(bits)
}

/// Greedy descent writing into a zeroed buffer. Caller guarantees `n < C(bits.len(), k)`.
pub(crate) fn unrank_into(k: usize, mut n: usize, bits: &mut [u8]) {
    for i in (1..=k).rev() {
        // largest c with C(c, i) <= n; C(i-1, i) = 0 so c >= i-1 always qualifies
        let mut c = i - 1;
        let mut taken = 0;
        loop {
            let next = binomial(c + 1, i);
            if next > n {
                break;
            }
            taken = next;
            c += 1;
        }
        bits[c] = 1;
        n -= taken;
    }
}
