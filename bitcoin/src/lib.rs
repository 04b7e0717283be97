//! This crate implements Bitcoin-anchored proof chains: proofs of
//! transaction existence, single-use seals closed by spending an outpoint,
//! and globally unique prefix maps whose every node is bound by a seal.
//!
//! Chain inclusion is deliberately out of scope: witness verification
//! checks local transaction structure only, and talking to a node to
//! confirm a closing transaction is the caller's concern.

#![forbid(unsafe_code)]
#![warn(missing_docs)]
#![warn(unused_extern_crates)]

pub mod bridge;
pub mod gumap;
pub mod hashes;
pub mod seals;
pub mod txproof;
pub mod types;

/// Common re-exports
pub mod prelude;
