//! Commitment digests and domain-separated hashing.
//!
//! Every distinct hash call site in the proof system hashes under its own
//! [`HashTag`]: a UUID-seeded HMAC-SHA256 key that can be derived into
//! further sub-domains. Two different proof classes hashing the same bytes
//! therefore produce unrelated digests.

use std::fmt;
use std::io::{Read, Write};

use hmac::{Hmac, Mac};
use sha2::Sha256;
use uuid::Uuid;

use crate::ser::{ByteFormat, SerError, SerResult};

type HmacSha256 = Hmac<Sha256>;

fn hmac_sha256(key: &[u8], msg: &[u8]) -> [u8; 32] {
    let mut mac =
        HmacSha256::new_from_slice(key).expect("HMAC-SHA256 accepts keys of any length");
    mac.update(msg);
    mac.finalize().into_bytes().into()
}

/// A 32-byte commitment digest.
///
/// This is the hash of a proof value, and the only state a fully-pruned
/// proof retains.
#[derive(Copy, Clone, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Digest(pub [u8; 32]);

impl Digest {
    /// The raw digest bytes.
    pub fn as_bytes(&self) -> &[u8; 32] {
        &self.0
    }
}

impl From<[u8; 32]> for Digest {
    fn from(bytes: [u8; 32]) -> Self {
        Digest(bytes)
    }
}

impl AsRef<[u8]> for Digest {
    fn as_ref(&self) -> &[u8] {
        &self.0
    }
}

impl fmt::Display for Digest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&hex::encode(self.0))
    }
}

impl fmt::Debug for Digest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Digest({})", self)
    }
}

impl ByteFormat for Digest {
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
        Ok(Digest(buf))
    }
}

#[cfg(feature = "serde")]
impl serde::Serialize for Digest {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&hex::encode(self.0))
    }
}

#[cfg(feature = "serde")]
impl<'de> serde::Deserialize<'de> for Digest {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let hex_str = <String as serde::Deserialize>::deserialize(deserializer)?;
        let bytes = hex::decode(&hex_str).map_err(serde::de::Error::custom)?;
        let arr: [u8; 32] = bytes
            .as_slice()
            .try_into()
            .map_err(|_| serde::de::Error::custom("expected 32 hex-encoded bytes"))?;
        Ok(Digest(arr))
    }
}

/// A UUID-seeded, derivable HMAC key identifying a hashing domain.
///
/// A fresh tag's key is its 16-byte UUID. Deriving a tag under a parent
/// replaces the key with `HMAC-SHA256(key = parent_key, msg = child_key)`,
/// so every step of a derivation chain lands in a distinct domain.
#[derive(Clone, PartialEq, Eq)]
pub struct HashTag {
    key: TagKey,
}

#[derive(Clone, PartialEq, Eq)]
enum TagKey {
    Seed([u8; 16]),
    Derived([u8; 32]),
}

impl HashTag {
    /// Tag seeded by a UUID.
    pub const fn from_uuid(tag: Uuid) -> Self {
        HashTag {
            key: TagKey::Seed(tag.into_bytes()),
        }
    }

    /// Tag seeded by raw 16-byte key material.
    pub const fn from_seed(seed: [u8; 16]) -> Self {
        HashTag {
            key: TagKey::Seed(seed),
        }
    }

    fn key_bytes(&self) -> &[u8] {
        match &self.key {
            TagKey::Seed(bytes) => bytes,
            TagKey::Derived(bytes) => bytes,
        }
    }

    /// Derive this tag under `parent`, producing the sub-domain tag whose
    /// key is `HMAC-SHA256(key = parent_key, msg = self_key)`.
    pub fn derive(&self, parent: &HashTag) -> HashTag {
        HashTag {
            key: TagKey::Derived(hmac_sha256(parent.key_bytes(), self.key_bytes())),
        }
    }

    /// Hash a message in this tag's domain.
    pub fn apply(&self, msg: &[u8]) -> Digest {
        Digest(hmac_sha256(self.key_bytes(), msg))
    }
}

impl fmt::Debug for HashTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.key {
            TagKey::Seed(bytes) => write!(f, "HashTag(seed {})", hex::encode(bytes)),
            TagKey::Derived(bytes) => write!(f, "HashTag(derived {})", hex::encode(bytes)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use uuid::uuid;

    const TAG_A: Uuid = uuid!("e5690d73-16e3-4f8f-bd4f-148c32d37baf");
    const TAG_B: Uuid = uuid!("a5092f56-3a31-476a-ac81-1b00211140eb");

    #[test]
    fn it_round_trips_digests() {
        let digest = Digest([0xab; 32]);
        let hex_str = digest.serialize_hex().unwrap();
        assert_eq!(hex_str, "ab".repeat(32));
        assert_eq!(Digest::deserialize_hex(&hex_str).unwrap(), digest);
        assert_eq!(digest.serialized_length(), 32);
    }

    #[test]
    fn it_separates_hash_domains() {
        let a = HashTag::from_uuid(TAG_A);
        let b = HashTag::from_uuid(TAG_B);
        let msg = b"same message";

        assert_eq!(a.apply(msg), a.apply(msg));
        assert_ne!(a.apply(msg), b.apply(msg));
        assert_ne!(a.apply(msg), a.apply(b"other message"));
    }

    #[test]
    fn it_derives_sub_domains() {
        let parent = HashTag::from_uuid(TAG_A);
        let child = HashTag::from_uuid(TAG_B);
        let derived = child.derive(&parent);
        let msg = b"contents";

        // the derived domain matches neither endpoint
        assert_ne!(derived.apply(msg), parent.apply(msg));
        assert_ne!(derived.apply(msg), child.apply(msg));

        // derivation is deterministic and order-sensitive
        assert_eq!(derived.apply(msg), child.derive(&parent).apply(msg));
        assert_ne!(derived.apply(msg), parent.derive(&child).apply(msg));
    }

    #[test]
    fn it_seeds_tags_from_raw_bytes() {
        let from_uuid = HashTag::from_uuid(TAG_A);
        let from_seed = HashTag::from_seed(*TAG_A.as_bytes());
        assert_eq!(from_uuid.apply(b"x"), from_seed.apply(b"x"));
    }
}
