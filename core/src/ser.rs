//! Canonical binary serialization for proof objects.
//!
//! All multi-byte integers use fixed little-endian or varuint encodings;
//! there is no platform- or locale-dependent formatting. Encoding is
//! canonical: two equal values produce identical bytes, and the decoders
//! reject every non-canonical form they can observe (overlong varuints,
//! bad bool bytes, trailing garbage).

use std::io::{Error as IOError, ErrorKind, Read, Write};

use thiserror::Error;

/// An error in serialization or deserialization.
#[derive(Debug, Error)]
pub enum SerError {
    /// IOError bubbled up from a `Read` or `Write` passed to a `ByteFormat`
    /// implementation.
    #[error(transparent)]
    Io(#[from] IOError),

    /// Error decoding a hex string.
    #[error(transparent)]
    BadHex(#[from] hex::FromHexError),

    /// `read_bool` saw a byte that was neither 0x00 nor 0x01.
    #[error("Bad bool byte. Got {0:#04x}. Expected 0x00 or 0x01.")]
    BadBool(u8),

    /// A varuint used more bytes than its minimal encoding.
    #[error("Overlong varuint encoding")]
    OverlongVaruint,

    /// A varuint encoded a value wider than 64 bits.
    #[error("Varuint overflows u64")]
    VaruintOverflow,

    /// Trailing pad bits of a serialized bit string were not zero.
    #[error("Non-zero pad bits in final byte of bit string")]
    NonZeroPadding,

    /// Strict deserialization finished with input left over.
    #[error("{0} trailing bytes after deserialized value")]
    TrailingBytes(usize),

    /// A union tag did not name any declared variant.
    #[error("Unknown union variant tag {0}")]
    UnknownUnionTag(u64),
}

/// Type alias for a result with SerError.
pub type SerResult<T> = Result<T, SerError>;

/// The number of bytes the varuint encoding of `value` occupies.
pub fn varuint_length(value: u64) -> usize {
    let bits = (64 - value.leading_zeros()) as usize;
    std::cmp::max(1, (bits + 6) / 7)
}

/// Canonical binary encoding to and from `std::io` streams.
///
/// Implementors provide the three required methods; the provided statics
/// cover the primitive encodings every implementation is built from.
pub trait ByteFormat: Sized {
    /// The error type returned by serialization routines.
    type Error: From<SerError> + std::error::Error;

    /// The length of the value's serialized representation in bytes.
    fn serialized_length(&self) -> usize;

    /// Write the value to a writer. Returns the number of bytes written.
    fn write_to<W: Write>(&self, writer: &mut W) -> Result<usize, Self::Error>;

    /// Read a value from a reader.
    fn read_from<R: Read>(reader: &mut R) -> Result<Self, Self::Error>;

    /// Read a single byte.
    fn read_u8<R: Read>(reader: &mut R) -> Result<u8, Self::Error> {
        let mut buf = [0u8; 1];
        reader.read_exact(&mut buf).map_err(SerError::Io)?;
        Ok(buf[0])
    }

    /// Write a single byte. Returns the number of bytes written.
    fn write_u8<W: Write>(writer: &mut W, byte: u8) -> Result<usize, Self::Error> {
        writer.write_all(&[byte]).map_err(SerError::Io)?;
        Ok(1)
    }

    /// Read a little-endian u32.
    fn read_u32_le<R: Read>(reader: &mut R) -> Result<u32, Self::Error> {
        let mut buf = [0u8; 4];
        reader.read_exact(&mut buf).map_err(SerError::Io)?;
        Ok(u32::from_le_bytes(buf))
    }

    /// Write a little-endian u32. Returns the number of bytes written.
    fn write_u32_le<W: Write>(writer: &mut W, number: u32) -> Result<usize, Self::Error> {
        writer.write_all(&number.to_le_bytes()).map_err(SerError::Io)?;
        Ok(4)
    }

    /// Read a little-endian u64.
    fn read_u64_le<R: Read>(reader: &mut R) -> Result<u64, Self::Error> {
        let mut buf = [0u8; 8];
        reader.read_exact(&mut buf).map_err(SerError::Io)?;
        Ok(u64::from_le_bytes(buf))
    }

    /// Write a little-endian u64. Returns the number of bytes written.
    fn write_u64_le<W: Write>(writer: &mut W, number: u64) -> Result<usize, Self::Error> {
        writer.write_all(&number.to_le_bytes()).map_err(SerError::Io)?;
        Ok(8)
    }

    /// Read a strict bool: 0x00 is false, 0x01 is true, anything else is a
    /// format error.
    fn read_bool<R: Read>(reader: &mut R) -> Result<bool, Self::Error> {
        match Self::read_u8(reader)? {
            0x00 => Ok(false),
            0x01 => Ok(true),
            other => Err(SerError::BadBool(other).into()),
        }
    }

    /// Write a bool as a single 0x00/0x01 byte.
    fn write_bool<W: Write>(writer: &mut W, value: bool) -> Result<usize, Self::Error> {
        Self::write_u8(writer, u8::from(value))
    }

    /// Read a canonical base-128 little-endian varuint.
    ///
    /// Rejects overlong encodings and values wider than 64 bits.
    fn read_varuint<R: Read>(reader: &mut R) -> Result<u64, Self::Error> {
        let mut value = 0u64;
        let mut shift = 0u32;
        loop {
            let byte = Self::read_u8(reader)?;
            if shift == 63 && byte > 0x01 {
                return Err(SerError::VaruintOverflow.into());
            }
            value |= u64::from(byte & 0x7f) << shift;
            if byte & 0x80 == 0 {
                if byte == 0 && shift != 0 {
                    return Err(SerError::OverlongVaruint.into());
                }
                return Ok(value);
            }
            shift += 7;
            if shift > 63 {
                return Err(SerError::VaruintOverflow.into());
            }
        }
    }

    /// Write a varuint in its minimal encoding. Returns the number of bytes
    /// written.
    fn write_varuint<W: Write>(writer: &mut W, mut value: u64) -> Result<usize, Self::Error> {
        let mut len = 0;
        loop {
            let mut byte = (value & 0x7f) as u8;
            value >>= 7;
            if value != 0 {
                byte |= 0x80;
            }
            len += Self::write_u8(writer, byte)?;
            if value == 0 {
                return Ok(len);
            }
        }
    }

    /// Read varuint-length-prefixed bytes.
    fn read_prefixed_vec<R: Read>(reader: &mut R) -> Result<Vec<u8>, Self::Error> {
        let len = Self::read_varuint(reader)?;
        let mut buf = Vec::new();
        let got = reader
            .by_ref()
            .take(len)
            .read_to_end(&mut buf)
            .map_err(SerError::Io)?;
        if (got as u64) < len {
            return Err(SerError::Io(IOError::new(
                ErrorKind::UnexpectedEof,
                "truncated length-prefixed bytes",
            ))
            .into());
        }
        Ok(buf)
    }

    /// Write varuint-length-prefixed bytes. Returns the number of bytes
    /// written.
    fn write_prefixed_vec<W: Write>(writer: &mut W, bytes: &[u8]) -> Result<usize, Self::Error> {
        let len = Self::write_varuint(writer, bytes.len() as u64)?;
        writer.write_all(bytes).map_err(SerError::Io)?;
        Ok(len + bytes.len())
    }

    /// Serialize to a fresh byte vector.
    fn serialize_vec(&self) -> Result<Vec<u8>, Self::Error> {
        let mut buf = Vec::with_capacity(self.serialized_length());
        self.write_to(&mut buf)?;
        Ok(buf)
    }

    /// Serialize to a hex string.
    fn serialize_hex(&self) -> Result<String, Self::Error> {
        Ok(hex::encode(self.serialize_vec()?))
    }

    /// Deserialize from a byte slice, strictly: leftover bytes are an error.
    fn deserialize_vec(bytes: &[u8]) -> Result<Self, Self::Error> {
        let mut cursor = bytes;
        let value = Self::read_from(&mut cursor)?;
        if !cursor.is_empty() {
            return Err(SerError::TrailingBytes(cursor.len()).into());
        }
        Ok(value)
    }

    /// Deserialize from a hex string, strictly.
    fn deserialize_hex(hex_str: &str) -> Result<Self, Self::Error> {
        let bytes = hex::decode(hex_str).map_err(SerError::BadHex)?;
        Self::deserialize_vec(&bytes)
    }
}

impl ByteFormat for u32 {
    type Error = SerError;

    fn serialized_length(&self) -> usize {
        4
    }

    fn write_to<W: Write>(&self, writer: &mut W) -> SerResult<usize> {
        Self::write_u32_le(writer, *self)
    }

    fn read_from<R: Read>(reader: &mut R) -> SerResult<Self> {
        Self::read_u32_le(reader)
    }
}

impl ByteFormat for u64 {
    type Error = SerError;

    fn serialized_length(&self) -> usize {
        8
    }

    fn write_to<W: Write>(&self, writer: &mut W) -> SerResult<usize> {
        Self::write_u64_le(writer, *self)
    }

    fn read_from<R: Read>(reader: &mut R) -> SerResult<Self> {
        Self::read_u64_le(reader)
    }
}
