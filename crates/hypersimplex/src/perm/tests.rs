use super::*;
use proptest::prelude::*;

fn identity(n: usize) -> Vec<usize> {
    (0..n).collect()
}

fn is_permutation(arr: &[usize]) -> bool {
    let mut seen = vec![false; arr.len()];
    arr.iter().all(|&i| i < arr.len() && !std::mem::replace(&mut seen[i], true))
}

#[test]
fn tables_are_permutations() {
    for (d, k) in [(3, 1), (4, 2), (5, 2), (6, 3)] {
        let p = Permuter::new(d, k);
        for g in [
            Generator::CyclicShift,
            Generator::CyclicShiftInverse,
            Generator::AdjacentSwap,
        ] {
            assert!(is_permutation(p.table(g).unwrap()), "{g:?} on Δ({d},{k})");
        }
        assert_eq!(p.table(Generator::GlobalComplement).is_some(), d == 2 * k);
    }
}

#[test]
fn cycle_cubed_is_identity_on_triangle() {
    let p = Permuter::new(3, 1);
    let w = p.compile("x1^3").unwrap();
    assert!(w.is_empty());
    // the unreduced product gives the same image
    let w = p.compile("x1*x1*x1").unwrap();
    assert_eq!(w.len(), 3);
    assert_eq!(p.image(&w), identity(3));
}

#[test]
fn single_cycle_on_triangle() {
    // vertices {0},{1},{2} at ranks 0,1,2; the shift sends rank i to i+1
    let p = Permuter::new(3, 1);
    assert_eq!(p.table(Generator::CyclicShift).unwrap(), &[1, 2, 0]);
    let w = p.compile("x1").unwrap();
    // new[table[i]] = old[i]
    assert_eq!(p.image(&w), vec![2, 0, 1]);
    assert_eq!(p.permute_vertex(&w, 0), 2);
}

#[test]
fn identity_word_changes_nothing() {
    let p = Permuter::new(4, 2);
    let w = p.compile("<identity ...>").unwrap();
    assert!(w.is_empty());
    let mut arr = vec![5, 4, 3, 2, 1, 0];
    p.permute(&w, &mut arr);
    assert_eq!(arr, vec![5, 4, 3, 2, 1, 0]);
}

#[test]
fn complement_swaps_antipodes() {
    let p = Permuter::new(4, 2);
    assert_eq!(
        p.table(Generator::GlobalComplement).unwrap(),
        &[5, 4, 3, 2, 1, 0]
    );
    assert_eq!(p.image(&p.compile("z").unwrap()), vec![5, 4, 3, 2, 1, 0]);
    assert_eq!(p.image(&p.compile("x3^2").unwrap()), identity(6));
}

#[test]
fn complement_rejected_when_asymmetric() {
    let p = Permuter::new(5, 2);
    let err = p.compile("x1*x3").unwrap_err();
    assert_eq!(err.kind, WordErrorKind::NoComplement);
    assert_eq!(err.pos, 3);
}

#[test]
fn words_apply_left_factor_first() {
    let p = Permuter::new(5, 2);
    let a = p.compile("x1").unwrap();
    let b = p.compile("x2").unwrap();
    let ab = p.compile("x1*x2").unwrap();
    let mut arr = identity(p.vertex_count());
    p.permute(&a, &mut arr);
    p.permute(&b, &mut arr);
    assert_eq!(p.image(&ab), arr);
    assert_eq!(p.image(&a.then(&b)), arr);
}

#[test]
fn negative_exponents_use_inverse_tables() {
    let p = Permuter::new(5, 2);
    let w = p.compile("x1^-1*x1").unwrap();
    assert_eq!(
        w.steps(),
        &[Generator::CyclicShiftInverse, Generator::CyclicShift]
    );
    assert_eq!(p.image(&w), identity(10));
    // involutions are their own inverse
    assert_eq!(p.compile("x2^-1").unwrap().steps(), &[Generator::AdjacentSwap]);
}

fn arb_word(symmetric: bool) -> impl Strategy<Value = String> {
    let max_letter = if symmetric { 3 } else { 2 };
    let factor = (1..=max_letter, -4i64..=4).prop_map(|(l, e)| format!("x{l}^{e}"));
    prop::collection::vec(factor, 1..6).prop_flat_map(|fs| {
        (Just(fs.clone()), 0..fs.len(), -2i64..=2).prop_map(|(fs, split, e)| {
            // bracket a tail of the product to exercise group expansion
            let head = fs[..split].join("*");
            let tail = fs[split..].join("*");
            if head.is_empty() {
                format!("({tail})^{e}")
            } else {
                format!("{head}*({tail})^{e}")
            }
        })
    })
}

proptest! {
    #[test]
    fn word_then_inverse_is_identity(src in arb_word(true)) {
        let p = Permuter::new(6, 3);
        let w = p.compile(&src).unwrap();
        let image = p.image(&w);
        prop_assert!(is_permutation(&image));
        prop_assert_eq!(p.image(&w.then(&w.inverse())), identity(p.vertex_count()));
        // formal inverse on tokens agrees with the compiled inverse
        let inv = p.compile_tokens(&invert(&parse_word(&src).unwrap())).unwrap();
        prop_assert_eq!(p.image(&inv), p.image(&w.inverse()));
    }

    #[test]
    fn composition_is_sequential_application(a in arb_word(false), b in arb_word(false)) {
        let p = Permuter::new(5, 2);
        let wa = p.compile(&a).unwrap();
        let wb = p.compile(&b).unwrap();
        let joined = p.compile(&format!("{a}*{b}")).unwrap();
        let mut arr = identity(p.vertex_count());
        p.permute(&wa, &mut arr);
        p.permute(&wb, &mut arr);
        prop_assert_eq!(p.image(&joined), arr);
    }
}
