//! Prunable, hash-committed proof values.
//!
//! A proof is an immutable value committed to by a 32-byte digest. Any
//! sub-proof can be *pruned* — replaced by its digest — without changing the
//! commitment of anything above it, because parents hash their sub-proofs'
//! digests rather than their bytes. A pruned handle that still holds a
//! back-reference to the original value re-exposes its attributes on demand.
//!
//! Concrete proof classes implement [`ProofContent`], which fixes the
//! class's hash domain, its serialized attributes, and their order. The
//! [`Proof`] wrapper supplies pruning, the lazy hash, equality, and the
//! on-wire pruned/unpruned framing.

use std::fmt;
use std::hash::{Hash, Hasher};
use std::io::{Read, Write};
use std::sync::Arc;

use once_cell::sync::OnceCell;
use thiserror::Error;

use crate::hashes::{Digest, HashTag};
use crate::ser::{ByteFormat, SerError, SerResult};

/// An error raised by attribute access on proof values.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ProofError {
    /// Attribute access on a fully-pruned value with no back-reference.
    #[error("value is pruned and no backing instance is available")]
    Pruned,
}

/// The body of a concrete proof class.
///
/// `write_body`/`read_body` fix the canonical serialization order of the
/// class's attributes; `hash_preimage` walks the same attributes in the same
/// order, but contributes each attribute's [`HashRepr`] instead of its raw
/// encoding. Union classes prepend their varuint variant tag in both walks.
pub trait ProofContent: Sized {
    /// The tag fixing this class's hash domain.
    fn hashtag() -> HashTag;

    /// Write the serialized attributes, in declaration order.
    fn write_body<W: Write>(&self, writer: &mut W) -> SerResult<usize>;

    /// Read the serialized attributes, in declaration order.
    fn read_body<R: Read>(reader: &mut R) -> SerResult<Self>;

    /// The length of the serialized body in bytes.
    fn body_length(&self) -> usize;

    /// Append each attribute's hashing contribution, in declaration order.
    fn hash_preimage(&self, buf: &mut Vec<u8>);

    /// The commitment digest of this body.
    fn calc_hash(&self) -> Digest {
        let mut buf = Vec::new();
        self.hash_preimage(&mut buf);
        Self::hashtag().apply(&buf)
    }

    /// True if any serialized sub-proof attribute is pruned.
    fn body_is_pruned(&self) -> bool {
        false
    }
}

/// How a value contributes to an enclosing proof's hash preimage.
///
/// Hash-committed values contribute their 32-byte digest, so that pruned and
/// unpruned forms hash identically; plain values contribute their canonical
/// wire bytes.
pub trait HashRepr {
    /// Append this value's contribution to `buf`.
    fn hash_repr(&self, buf: &mut Vec<u8>);
}

enum Repr<T> {
    Full(Arc<T>),
    Pruned { orig: Option<Arc<T>> },
}

impl<T> Clone for Repr<T> {
    fn clone(&self) -> Self {
        match self {
            Repr::Full(content) => Repr::Full(Arc::clone(content)),
            Repr::Pruned { orig } => Repr::Pruned { orig: orig.clone() },
        }
    }
}

/// A prunable handle to a proof value of class `T`.
///
/// Holds either the full content or, when pruned, just the commitment digest
/// plus an optional back-reference to the original content. The digest is
/// byte-equal across both forms, so equality (defined over the digest) sees
/// through pruning.
pub struct Proof<T: ProofContent> {
    repr: Repr<T>,
    hash: OnceCell<Digest>,
}

impl<T: ProofContent> Proof<T> {
    /// Wrap freshly constructed content. The new value is not pruned.
    pub fn new(content: T) -> Self {
        Proof {
            repr: Repr::Full(Arc::new(content)),
            hash: OnceCell::new(),
        }
    }

    /// A fully-pruned proof carrying only its commitment digest.
    pub fn from_digest(digest: Digest) -> Self {
        Proof {
            repr: Repr::Pruned { orig: None },
            hash: OnceCell::with_value(digest),
        }
    }

    /// Access the content.
    ///
    /// On a pruned handle this consults the back-reference to the original
    /// instance; without one, fails with [`ProofError::Pruned`].
    pub fn content(&self) -> Result<&T, ProofError> {
        match &self.repr {
            Repr::Full(content) => Ok(content),
            Repr::Pruned { orig: Some(orig) } => Ok(orig),
            Repr::Pruned { orig: None } => Err(ProofError::Pruned),
        }
    }

    /// A fully-pruned sibling of this proof.
    ///
    /// The digest is carried over, never recomputed, and a back-reference to
    /// the content (when available) keeps attributes reachable.
    pub fn prune(&self) -> Self {
        let orig = match &self.repr {
            Repr::Full(content) => Some(Arc::clone(content)),
            Repr::Pruned { orig } => orig.clone(),
        };
        Proof {
            repr: Repr::Pruned { orig },
            hash: OnceCell::with_value(self.hash()),
        }
    }

    /// The commitment digest. Computed once, lazily.
    pub fn hash(&self) -> Digest {
        *self.hash.get_or_init(|| match self.content() {
            Ok(content) => content.calc_hash(),
            // from_digest and deserialization both seed the cell, so a
            // digest-only proof never reaches the init closure
            Err(_) => unreachable!("fully-pruned proof without cached digest"),
        })
    }

    /// True if this handle retains no attributes, only the digest.
    pub fn is_fully_pruned(&self) -> bool {
        matches!(self.repr, Repr::Pruned { .. })
    }

    /// True if this handle or any serialized sub-proof is pruned.
    pub fn is_pruned(&self) -> bool {
        match &self.repr {
            Repr::Pruned { .. } => true,
            Repr::Full(content) => content.body_is_pruned(),
        }
    }
}

impl<T: ProofContent> ByteFormat for Proof<T> {
    type Error = SerError;

    fn serialized_length(&self) -> usize {
        match &self.repr {
            Repr::Pruned { .. } => 1 + 32,
            Repr::Full(content) => 1 + content.body_length(),
        }
    }

    fn write_to<W: Write>(&self, writer: &mut W) -> SerResult<usize> {
        match &self.repr {
            Repr::Pruned { .. } => {
                let mut len = Self::write_bool(writer, true)?;
                len += self.hash().write_to(writer)?;
                Ok(len)
            }
            Repr::Full(content) => {
                let mut len = Self::write_bool(writer, false)?;
                len += content.write_body(writer)?;
                Ok(len)
            }
        }
    }

    fn read_from<R: Read>(reader: &mut R) -> SerResult<Self> {
        if Self::read_bool(reader)? {
            Ok(Self::from_digest(Digest::read_from(reader)?))
        } else {
            Ok(Self::new(T::read_body(reader)?))
        }
    }
}

impl<T: ProofContent> Clone for Proof<T> {
    fn clone(&self) -> Self {
        Proof {
            repr: self.repr.clone(),
            hash: self.hash.clone(),
        }
    }
}

impl<T: ProofContent> PartialEq for Proof<T> {
    fn eq(&self, other: &Self) -> bool {
        self.hash() == other.hash()
    }
}

impl<T: ProofContent> Eq for Proof<T> {}

impl<T: ProofContent> Hash for Proof<T> {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.hash().as_bytes().hash(state);
    }
}

impl<T: ProofContent> fmt::Debug for Proof<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let state = if self.is_fully_pruned() {
            "pruned"
        } else {
            "full"
        };
        write!(f, "Proof({}, {})", state, self.hash())
    }
}

impl<T: ProofContent> HashRepr for Proof<T> {
    fn hash_repr(&self, buf: &mut Vec<u8>) {
        buf.extend_from_slice(self.hash().as_bytes());
    }
}

impl HashRepr for u32 {
    fn hash_repr(&self, buf: &mut Vec<u8>) {
        buf.extend_from_slice(&self.to_le_bytes());
    }
}

impl HashRepr for u64 {
    fn hash_repr(&self, buf: &mut Vec<u8>) {
        buf.extend_from_slice(&self.to_le_bytes());
    }
}

impl HashRepr for Digest {
    fn hash_repr(&self, buf: &mut Vec<u8>) {
        buf.extend_from_slice(self.as_bytes());
    }
}
