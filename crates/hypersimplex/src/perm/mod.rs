//! Permutation engine: factored words → generator tables → vertex permutations.
//!
//! Words arrive as text from a group service (`x1^-1*(x1*x2)^2`). They are
//! parsed once into tokens, lowered to a [`CompiledWord`] over the closed
//! [`Generator`] set, and applied table by table, left factor first.
//!
//! Convention
//! - Applying a word to the identity array yields the array whose entry `i` is
//!   the vertex carried onto `i`. Orbits, transitivity and edge classes only
//!   depend on the set of images over a whole group, so callers never need the
//!   forward map separately.

mod tables;
mod word;

pub use tables::{CompiledWord, Generator, Permuter};
pub use word::{invert, parse_word, Letter, Token, WordError, WordErrorKind};

#[cfg(test)]
mod tests;
