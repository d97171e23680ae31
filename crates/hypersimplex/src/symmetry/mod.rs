//! Symmetry analysis: which subgroups act vertex-transitively, and how they
//! split the edges into orbits.

mod classes;
mod transitive;

pub use classes::{classify, classify_all, EdgeClass};
pub use transitive::{find_transitive, is_transitive, subgroup_images, CancelToken, Images};
