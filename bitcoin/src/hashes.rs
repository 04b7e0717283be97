//! Transaction hashing: double-SHA-256, HASH160, and the marked TXID type.

use std::fmt;
use std::io::{Read, Result as IOResult, Write};

use ripemd::Ripemd160;
use sha2::{Digest as _, Sha256};

use proofmarshal::ser::{ByteFormat, SerError, SerResult};

/// A named wrapper around a raw 32-byte digest.
///
/// Marking digests by their function prevents type confusion between the
/// many different 32-byte hashes in circulation.
pub trait MarkedDigest: Sized {
    /// Wrap raw digest bytes in the marker.
    fn from_internal(digest: [u8; 32]) -> Self;

    /// The raw digest bytes.
    fn internal(&self) -> [u8; 32];

    /// A copy in reverse byte order.
    ///
    /// Bitcoin tools display txids in the byte order opposite to the one
    /// they are hashed and serialized in.
    fn reversed(&self) -> Self {
        let mut digest = self.internal();
        digest.reverse();
        Self::from_internal(digest)
    }
}

/// A Bitcoin transaction id, in internal (serialization) byte order.
#[derive(Copy, Clone, Default, PartialEq, Eq, Hash)]
pub struct TXID(pub [u8; 32]);

impl MarkedDigest for TXID {
    fn from_internal(digest: [u8; 32]) -> Self {
        TXID(digest)
    }

    fn internal(&self) -> [u8; 32] {
        self.0
    }
}

impl fmt::Display for TXID {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&hex::encode(self.reversed().0))
    }
}

impl fmt::Debug for TXID {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "TXID({})", self)
    }
}

impl ByteFormat for TXID {
    type Error = SerError;

    fn serialized_length(&self) -> usize {
        32
    }

    fn write_to<W: Write>(&self, writer: &mut W) -> SerResult<usize> {
        writer.write_all(&self.0).map_err(SerError::Io)?;
        Ok(32)
    }

    fn read_from<R: Read>(reader: &mut R) -> SerResult<Self> {
        let mut buf = [0u8; 32];
        reader.read_exact(&mut buf).map_err(SerError::Io)?;
        Ok(TXID(buf))
    }
}

#[cfg(feature = "serde")]
impl serde::Serialize for TXID {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&hex::encode(self.0))
    }
}

#[cfg(feature = "serde")]
impl<'de> serde::Deserialize<'de> for TXID {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let hex_str = <String as serde::Deserialize>::deserialize(deserializer)?;
        let bytes = hex::decode(&hex_str).map_err(serde::de::Error::custom)?;
        let arr: [u8; 32] = bytes
            .as_slice()
            .try_into()
            .map_err(|_| serde::de::Error::custom("expected 32 hex-encoded bytes"))?;
        Ok(TXID(arr))
    }
}

/// An incremental writer producing the double-SHA-256 of everything written.
#[derive(Default)]
pub struct Hash256Writer {
    internal: Sha256,
}

impl Write for Hash256Writer {
    fn write(&mut self, buf: &[u8]) -> IOResult<usize> {
        self.internal.update(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> IOResult<()> {
        Ok(())
    }
}

impl Hash256Writer {
    /// Consume the writer and produce the double-SHA-256 digest.
    pub fn finish(self) -> [u8; 32] {
        let first = self.internal.finalize();
        Sha256::digest(first).into()
    }

    /// Finish and wrap the digest in a marked type.
    pub fn finish_marked<M: MarkedDigest>(self) -> M {
        M::from_internal(self.finish())
    }
}

/// Double-SHA-256 of a byte string.
pub fn hash256(bytes: &[u8]) -> [u8; 32] {
    Sha256::digest(Sha256::digest(bytes)).into()
}

/// RIPEMD160 of the SHA-256 of a byte string.
pub fn hash160(bytes: &[u8]) -> [u8; 20] {
    Ripemd160::digest(Sha256::digest(bytes)).into()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn it_hashes_incrementally_and_all_at_once() {
        let mut w = Hash256Writer::default();
        w.write_all(b"hello ").unwrap();
        w.write_all(b"world").unwrap();
        assert_eq!(w.finish(), hash256(b"hello world"));
    }

    #[test]
    fn it_computes_known_hash_vectors() {
        // sha256d and hash160 of the empty string
        assert_eq!(
            hex::encode(hash256(b"")),
            "5df6e0e2761359d30a8275058e299fcc0381534545f55cf43e41983f5d4c9456"
        );
        assert_eq!(
            hex::encode(hash160(b"")),
            "b472a266d0bd89c13706a4132ccfb16f7c3b9fcb"
        );
    }

    #[test]
    fn it_reverses_display_order() {
        let txid = TXID::deserialize_hex(
            "03ee4f7a4e68f802303bc659f8f817964b4b74fe046facc3ae1be4679d622c45",
        )
        .unwrap();
        assert_eq!(
            txid.to_string(),
            "452c629d67e41baec3ac6f04fe744b4b9617f8f859c63b3002f8684e7a4fee03"
        );
        assert_eq!(txid.reversed().reversed(), txid);
    }
}
