//! Re-exports of the types needed to define and use proof classes.

pub use crate::bits::Bits;
pub use crate::hashes::{Digest, HashTag};
pub use crate::proof::{HashRepr, Proof, ProofContent, ProofError};
pub use crate::ser::{varuint_length, ByteFormat, SerError, SerResult};
