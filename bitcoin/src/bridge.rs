//! Embedding Bitcoin values in the proof wire format.
//!
//! Bitcoin types keep their consensus encoding; proof bodies wrap that
//! encoding as varuint-length-prefixed bytes. These embeddings are
//! non-hashing: an enclosing proof hashes the canonical bytes themselves
//! rather than a digest of them.

use std::io::{Read, Write};

use proofmarshal::ser::{varuint_length, ByteFormat, SerError, SerResult};

/// Write `value` as varuint-length-prefixed consensus bytes. Returns the
/// number of bytes written.
pub fn write_embedded<T, W>(writer: &mut W, value: &T) -> SerResult<usize>
where
    T: ByteFormat<Error = SerError>,
    W: Write,
{
    let bytes = value.serialize_vec()?;
    T::write_prefixed_vec(writer, &bytes)
}

/// Read a varuint-length-prefixed embedded value.
///
/// Strict: the embedded value must consume exactly the prefixed length.
pub fn read_embedded<T, R>(reader: &mut R) -> SerResult<T>
where
    T: ByteFormat<Error = SerError>,
    R: Read,
{
    let bytes = T::read_prefixed_vec(reader)?;
    T::deserialize_vec(&bytes)
}

/// The serialized length of the embedding of `value`.
pub fn embedded_length<T: ByteFormat>(value: &T) -> usize {
    let len = value.serialized_length();
    varuint_length(len as u64) + len
}

/// Append the embedding of `value` to a hash preimage buffer.
pub fn embedded_hash_repr<T>(value: &T, buf: &mut Vec<u8>)
where
    T: ByteFormat<Error = SerError>,
{
    write_embedded(buf, value).expect("writing to a Vec cannot fail");
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::hashes::TXID;
    use crate::types::BitcoinOutpoint;

    #[test]
    fn it_wraps_consensus_bytes_with_a_length_prefix() {
        let outpoint = BitcoinOutpoint::new(TXID([0x42; 32]), 7);

        let mut buf = vec![];
        let written = write_embedded(&mut buf, &outpoint).unwrap();
        assert_eq!(written, buf.len());
        assert_eq!(written, embedded_length(&outpoint));
        assert_eq!(buf[0], 36);
        assert_eq!(&buf[1..], outpoint.serialize_vec().unwrap().as_slice());

        let back: BitcoinOutpoint = read_embedded(&mut buf.as_slice()).unwrap();
        assert_eq!(back, outpoint);

        let mut repr = vec![];
        embedded_hash_repr(&outpoint, &mut repr);
        assert_eq!(repr, buf);
    }

    #[test]
    fn it_rejects_length_mismatches() {
        let outpoint = BitcoinOutpoint::new(TXID([0x42; 32]), 7);
        let mut buf = vec![];
        write_embedded(&mut buf, &outpoint).unwrap();

        // inflate the declared length so a trailing byte survives decoding
        buf[0] += 1;
        buf.push(0x00);
        let err = read_embedded::<BitcoinOutpoint, _>(&mut buf.as_slice()).unwrap_err();
        assert!(matches!(err, SerError::TrailingBytes(1)));
    }
}
