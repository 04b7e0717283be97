//! This crate provides the building blocks for prunable cryptographic
//! proofs: a canonical binary serialization layer, UUID-seeded
//! domain-separated hashing, arbitrary-length bit strings, and the
//! hash-committed proof value model itself.

#![forbid(unsafe_code)]
#![warn(missing_docs)]
#![warn(unused_extern_crates)]

pub mod bits;
pub mod hashes;
pub mod proof;
pub mod ser;

/// Common re-exports
pub mod prelude;
