//! randsel core: constrained random selection primitives.
//!
//! This crate provides:
//! - Weighted sampling of indices without replacement ([`weighted`])
//! - Sampling of byte strings within a lexicographic range ([`bytes`])
//! - The randomness source abstraction both draw from ([`source`])
//! - A sum-tree draw structure with removal ([`tree`])
//! - Deterministic per-trial seeding ([`seed`])

pub mod bytes;
pub mod seed;
pub mod source;
pub mod tree;
pub mod weighted;

pub use bytes::{in_range, sample_between, to_hex};
pub use seed::SeedHierarchy;
pub use source::RandomSource;
pub use tree::{WeightedTree, WithoutReplacement};
pub use weighted::{sample_from, sample_weighted, SampleError};
