//! Transaction inputs and their components.

use std::io::{Read, Write};

use proofmarshal::ser::{ByteFormat, SerError, SerResult};

use crate::hashes::TXID;
use crate::types::script::ScriptSig;

/// An Outpoint: the unique identifier of a UTXO, composed of a transaction
/// id and the index of the output within that transaction's output vector.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
pub struct BitcoinOutpoint {
    /// The id of the transaction that created the UTXO.
    pub txid: TXID,
    /// The index of the output within that transaction's vout.
    pub idx: u32,
}

impl BitcoinOutpoint {
    /// Instantiate a new outpoint from a txid and index.
    pub fn new(txid: TXID, idx: u32) -> Self {
        BitcoinOutpoint { txid, idx }
    }

    /// The null outpoint, used in coinbase inputs.
    pub fn null() -> Self {
        BitcoinOutpoint {
            txid: TXID::default(),
            idx: 0xffff_ffff,
        }
    }
}

impl ByteFormat for BitcoinOutpoint {
    type Error = SerError;

    fn serialized_length(&self) -> usize {
        36
    }

    fn write_to<W: Write>(&self, writer: &mut W) -> SerResult<usize> {
        let mut len = self.txid.write_to(writer)?;
        len += Self::write_u32_le(writer, self.idx)?;
        Ok(len)
    }

    fn read_from<R: Read>(reader: &mut R) -> SerResult<Self> {
        Ok(BitcoinOutpoint {
            txid: TXID::read_from(reader)?,
            idx: Self::read_u32_le(reader)?,
        })
    }
}

/// A transaction input spending an existing UTXO.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct BitcoinTxIn {
    /// The outpoint being spent.
    pub outpoint: BitcoinOutpoint,
    /// Spend-authorization information.
    pub script_sig: ScriptSig,
    /// The sequence number, which may encode relative locktime semantics.
    pub sequence: u32,
}

impl BitcoinTxIn {
    /// Instantiate a new input.
    pub fn new(outpoint: BitcoinOutpoint, script_sig: ScriptSig, sequence: u32) -> Self {
        BitcoinTxIn {
            outpoint,
            script_sig,
            sequence,
        }
    }
}

impl From<BitcoinOutpoint> for BitcoinTxIn {
    /// An input spending `outpoint` with an empty script sig and final
    /// sequence.
    fn from(outpoint: BitcoinOutpoint) -> Self {
        BitcoinTxIn {
            outpoint,
            script_sig: ScriptSig::null(),
            sequence: 0xffff_ffff,
        }
    }
}

impl ByteFormat for BitcoinTxIn {
    type Error = SerError;

    fn serialized_length(&self) -> usize {
        36 + self.script_sig.serialized_length() + 4
    }

    fn write_to<W: Write>(&self, writer: &mut W) -> SerResult<usize> {
        let mut len = self.outpoint.write_to(writer)?;
        len += self.script_sig.write_to(writer)?;
        len += Self::write_u32_le(writer, self.sequence)?;
        Ok(len)
    }

    fn read_from<R: Read>(reader: &mut R) -> SerResult<Self> {
        Ok(BitcoinTxIn {
            outpoint: BitcoinOutpoint::read_from(reader)?,
            script_sig: ScriptSig::read_from(reader)?,
            sequence: Self::read_u32_le(reader)?,
        })
    }
}

/// A transaction's vector of inputs.
pub type Vin = Vec<BitcoinTxIn>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn it_serializes_and_deserializes_outpoints() {
        let outpoint = BitcoinOutpoint::new(TXID([0xab; 32]), 3);
        let expected = format!("{}03000000", "ab".repeat(32));
        assert_eq!(outpoint.serialize_hex().unwrap(), expected);
        assert_eq!(outpoint.serialized_length(), 36);
        assert_eq!(
            BitcoinOutpoint::deserialize_hex(&expected).unwrap(),
            outpoint
        );

        let null = BitcoinOutpoint::null();
        assert_eq!(
            null.serialize_hex().unwrap(),
            format!("{}ffffffff", "00".repeat(32))
        );
    }

    #[test]
    fn it_serializes_and_deserializes_inputs() {
        let input = BitcoinTxIn::from(BitcoinOutpoint::new(TXID([0x11; 32]), 0));
        let expected = format!("{}0000000000ffffffff", "11".repeat(32));
        assert_eq!(input.serialize_hex().unwrap(), expected);
        assert_eq!(input.serialized_length() * 2, expected.len());
        assert_eq!(BitcoinTxIn::deserialize_hex(&expected).unwrap(), input);
    }
}
