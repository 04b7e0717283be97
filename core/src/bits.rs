//! Arbitrary-length bit strings.
//!
//! [`Bits`] values key the globally-unique prefix maps: every tree node is
//! addressed by the bit path from the root. The wire form is a varuint bit
//! length followed by the minimal MSB-first byte packing, with pad bits in
//! the final byte required to be zero.

use std::fmt;
use std::io::{Error as IOError, ErrorKind, Read, Write};

use bitvec::prelude::*;

use crate::proof::HashRepr;
use crate::ser::{varuint_length, ByteFormat, SerError, SerResult};

/// An immutable, finite sequence of bits.
#[derive(Clone, Default, PartialEq, Eq, Hash)]
pub struct Bits {
    bits: BitVec<u8, Msb0>,
}

impl Bits {
    /// The empty bit string.
    pub fn new() -> Self {
        Self::default()
    }

    /// Build from booleans, first bit first.
    pub fn from_bools<I: IntoIterator<Item = bool>>(bools: I) -> Self {
        bools.into_iter().collect()
    }

    /// Build from bytes, taking all `8 * bytes.len()` bits MSB first.
    pub fn from_bytes(bytes: &[u8]) -> Self {
        Bits {
            bits: BitVec::from_slice(bytes),
        }
    }

    /// Build from bytes truncated to `bit_len` bits.
    ///
    /// # Panics
    ///
    /// If `bit_len` exceeds `8 * bytes.len()`.
    pub fn from_bytes_truncated(bytes: &[u8], bit_len: usize) -> Self {
        assert!(bit_len <= bytes.len() * 8, "bit length exceeds input");
        let mut bits = BitVec::from_slice(bytes);
        bits.truncate(bit_len);
        Bits { bits }
    }

    /// The number of bits.
    pub fn len(&self) -> usize {
        self.bits.len()
    }

    /// True if there are no bits.
    pub fn is_empty(&self) -> bool {
        self.bits.is_empty()
    }

    /// The bit at `index`, or None past the end.
    pub fn get(&self, index: usize) -> Option<bool> {
        self.bits.get(index).map(|bit| *bit)
    }

    /// A copy with `bit` appended.
    pub fn push(&self, bit: bool) -> Bits {
        let mut bits = self.bits.clone();
        bits.push(bit);
        Bits { bits }
    }

    /// A copy with `other` appended.
    pub fn join(&self, other: &Bits) -> Bits {
        let mut bits = self.bits.clone();
        bits.extend_from_bitslice(&other.bits);
        Bits { bits }
    }

    /// The sub-string `[start, end)`.
    ///
    /// # Panics
    ///
    /// If the range is out of bounds.
    pub fn slice(&self, start: usize, end: usize) -> Bits {
        Bits {
            bits: self.bits[start..end].to_bitvec(),
        }
    }

    /// True if `prefix` is a (non-strict) prefix of this string.
    pub fn starts_with(&self, prefix: &Bits) -> bool {
        self.len() >= prefix.len() && self.bits[..prefix.len()] == prefix.bits[..]
    }

    /// Iterate over the bits, first bit first.
    pub fn iter(&self) -> impl Iterator<Item = bool> + '_ {
        self.bits.iter().by_vals()
    }

    /// The minimal MSB-first byte packing, pad bits zero.
    pub fn to_bytes(&self) -> Vec<u8> {
        let mut out = vec![0u8; (self.len() + 7) / 8];
        for (i, bit) in self.iter().enumerate() {
            if bit {
                out[i / 8] |= 0x80 >> (i % 8);
            }
        }
        out
    }
}

impl FromIterator<bool> for Bits {
    fn from_iter<I: IntoIterator<Item = bool>>(iter: I) -> Self {
        Bits {
            bits: iter.into_iter().collect(),
        }
    }
}

impl fmt::Debug for Bits {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Bits(")?;
        for bit in self.iter() {
            f.write_str(if bit { "1" } else { "0" })?;
        }
        write!(f, ")")
    }
}

impl ByteFormat for Bits {
    type Error = SerError;

    fn serialized_length(&self) -> usize {
        varuint_length(self.len() as u64) + (self.len() + 7) / 8
    }

    fn write_to<W: Write>(&self, writer: &mut W) -> SerResult<usize> {
        let mut len = Self::write_varuint(writer, self.len() as u64)?;
        let packed = self.to_bytes();
        writer.write_all(&packed).map_err(SerError::Io)?;
        len += packed.len();
        Ok(len)
    }

    fn read_from<R: Read>(reader: &mut R) -> SerResult<Self> {
        let bit_len = Self::read_varuint(reader)?;
        let byte_len = bit_len / 8 + u64::from(bit_len % 8 != 0);

        let mut packed = Vec::new();
        let got = reader
            .by_ref()
            .take(byte_len)
            .read_to_end(&mut packed)
            .map_err(SerError::Io)?;
        if (got as u64) < byte_len {
            return Err(SerError::Io(IOError::new(
                ErrorKind::UnexpectedEof,
                "truncated bit string",
            )));
        }

        if bit_len % 8 != 0 {
            let pad_mask = 0xffu8 >> (bit_len % 8);
            if packed[packed.len() - 1] & pad_mask != 0 {
                return Err(SerError::NonZeroPadding);
            }
        }

        Ok(Bits::from_bytes_truncated(&packed, bit_len as usize))
    }
}

impl HashRepr for Bits {
    fn hash_repr(&self, buf: &mut Vec<u8>) {
        buf.extend_from_slice(&self.serialize_vec().expect("writing to a Vec cannot fail"));
    }
}
