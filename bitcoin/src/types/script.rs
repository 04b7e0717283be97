//! Simple types for Bitcoin Script datastructures, each treated as an
//! opaque, wrapped `Vec<u8>` instance.
//!
//! We do not handle assembly, disassembly, or Script execution. The seal
//! protocol compares output scripts byte-for-byte against templates it
//! builds itself, so scripts stay opaque byte vectors with no semantics.

use std::io::{Error as IOError, ErrorKind, Read, Write};

use proofmarshal::hashes::Digest;
use proofmarshal::ser::{ByteFormat, SerError, SerResult};

use crate::hashes::hash160;
use crate::types::primitives::{compact_int_length, read_compact_int, write_compact_int};

macro_rules! wrap_prefixed_byte_vector {
    ($(#[$outer:meta])* $name:ident) => {
        $(#[$outer])*
        #[derive(Clone, Debug, Default, PartialEq, Eq, Hash)]
        pub struct $name(Vec<u8>);

        impl $name {
            /// Wrap raw script bytes.
            pub fn new(bytes: Vec<u8>) -> Self {
                Self(bytes)
            }

            /// The empty byte vector, which represents numerical 0, boolean
            /// `false`, or the null bytestring.
            pub fn null() -> Self {
                Self(vec![])
            }

            /// The wrapped bytes.
            pub fn items(&self) -> &[u8] {
                &self.0
            }

            /// The number of wrapped bytes, excluding the length prefix.
            pub fn len(&self) -> usize {
                self.0.len()
            }

            /// True if no bytes are wrapped.
            pub fn is_empty(&self) -> bool {
                self.0.is_empty()
            }
        }

        impl From<Vec<u8>> for $name {
            fn from(bytes: Vec<u8>) -> Self {
                Self(bytes)
            }
        }

        impl From<&[u8]> for $name {
            fn from(bytes: &[u8]) -> Self {
                Self(bytes.to_vec())
            }
        }

        impl AsRef<[u8]> for $name {
            fn as_ref(&self) -> &[u8] {
                &self.0
            }
        }

        impl ByteFormat for $name {
            type Error = SerError;

            fn serialized_length(&self) -> usize {
                compact_int_length(self.0.len() as u64) + self.0.len()
            }

            fn write_to<W: Write>(&self, writer: &mut W) -> SerResult<usize> {
                let len = write_compact_int(writer, self.0.len() as u64)?;
                writer.write_all(&self.0).map_err(SerError::Io)?;
                Ok(len + self.0.len())
            }

            fn read_from<R: Read>(reader: &mut R) -> SerResult<Self> {
                let len = read_compact_int(reader)?;
                let mut bytes = Vec::new();
                let got = reader
                    .by_ref()
                    .take(len)
                    .read_to_end(&mut bytes)
                    .map_err(SerError::Io)?;
                if (got as u64) < len {
                    return Err(SerError::Io(IOError::new(
                        ErrorKind::UnexpectedEof,
                        "truncated script",
                    )));
                }
                Ok(Self(bytes))
            }
        }
    };
}

wrap_prefixed_byte_vector!(
    /// A Script is a marked `Vec<u8>` holding an opaque script.
    Script
);
wrap_prefixed_byte_vector!(
    /// A ScriptSig is a marked `Vec<u8>` used as a transaction input's
    /// spend-authorization field.
    ScriptSig
);
wrap_prefixed_byte_vector!(
    /// A ScriptPubkey is a marked `Vec<u8>` which locks a transaction
    /// output.
    ScriptPubkey
);

impl ScriptPubkey {
    /// Instantiate the `OP_RETURN <digest>` commitment output script.
    pub fn op_return(digest: &Digest) -> Self {
        let mut v: Vec<u8> = vec![0x6a, 0x20]; // RETURN, PUSH_32
        v.extend(digest.as_bytes());
        v.into()
    }

    /// Instantiate the `OP_HASH160 <hash160(digest)> OP_EQUAL` commitment
    /// output script.
    pub fn p2sh_commitment(digest: &Digest) -> Self {
        let mut v: Vec<u8> = vec![0xa9, 0x14]; // HASH160, PUSH_20
        v.extend(&hash160(digest.as_bytes()));
        v.extend(&[0x87]); // EQUAL
        v.into()
    }

    /// Instantiate the `OP_DUP OP_HASH160 <hash160(digest)> OP_EQUALVERIFY
    /// OP_CHECKSIG` commitment output script.
    pub fn p2pkh_commitment(digest: &Digest) -> Self {
        let mut v: Vec<u8> = vec![0x76, 0xa9, 0x14]; // DUP, HASH160, PUSH_20
        v.extend(&hash160(digest.as_bytes()));
        v.extend(&[0x88, 0xac]); // EQUALVERIFY, CHECKSIG
        v.into()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn it_serializes_and_deserializes_scripts() {
        let cases = [
            (
                Script::new(hex::decode("0014758ce550380d964051086798d6546bebdca27a73").unwrap()),
                "160014758ce550380d964051086798d6546bebdca27a73",
                22,
            ),
            (Script::new(vec![]), "00", 0),
            (Script::null(), "00", 0),
        ];
        for case in cases.iter() {
            let script = Script::deserialize_hex(case.1).unwrap();
            assert_eq!(case.0.serialize_hex().unwrap(), case.1);
            assert_eq!(case.0.len(), case.2);
            assert_eq!(case.0.is_empty(), case.2 == 0);

            assert_eq!(script, case.0);
            assert_eq!(script.serialize_hex().unwrap(), case.1);
        }
    }

    #[test]
    fn it_builds_byte_exact_commitment_scripts() {
        let digest = Digest([0x00; 32]);
        let h160 = hex::encode(hash160(digest.as_bytes()));

        let op_return = ScriptPubkey::op_return(&digest);
        assert_eq!(
            hex::encode(op_return.items()),
            format!("6a20{}", "00".repeat(32))
        );

        let p2sh = ScriptPubkey::p2sh_commitment(&digest);
        assert_eq!(hex::encode(p2sh.items()), format!("a914{}87", h160));
        assert_eq!(p2sh.len(), 23);

        let p2pkh = ScriptPubkey::p2pkh_commitment(&digest);
        assert_eq!(hex::encode(p2pkh.items()), format!("76a914{}88ac", h160));
        assert_eq!(p2pkh.len(), 25);
    }
}
