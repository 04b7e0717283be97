//! The Bitcoin legacy transaction type.
//!
//! Seal-closing transactions are legacy-form (no witnesses), so this is the
//! only transaction shape the proof layer embeds.

use std::io::{Read, Write};

use proofmarshal::ser::{ByteFormat, SerError, SerResult};

use crate::hashes::{Hash256Writer, TXID};
use crate::types::primitives::{compact_int_length, read_compact_int, write_compact_int};
use crate::types::txin::{BitcoinTxIn, Vin};
use crate::types::txout::{TxOut, Vout};

/// A Legacy (non-witness) Transaction.
#[derive(Clone, Debug, Eq, PartialEq, Default)]
pub struct LegacyTx {
    /// The version number. Usually 1 or 2.
    version: u32,
    /// The vector of inputs.
    vin: Vin,
    /// The vector of outputs.
    vout: Vout,
    /// The nLocktime field.
    locktime: u32,
}

impl LegacyTx {
    /// Instantiate a new LegacyTx from the arguments.
    pub fn new<I, O>(version: u32, vin: I, vout: O, locktime: u32) -> Self
    where
        I: Into<Vin>,
        O: Into<Vout>,
    {
        Self {
            version,
            vin: vin.into(),
            vout: vout.into(),
            locktime,
        }
    }

    /// A reference to the transaction's inputs.
    pub fn inputs(&self) -> &[BitcoinTxIn] {
        &self.vin
    }

    /// A reference to the transaction's outputs.
    pub fn outputs(&self) -> &[TxOut] {
        &self.vout
    }

    /// The version number.
    pub fn version(&self) -> u32 {
        self.version
    }

    /// The nLocktime field.
    pub fn locktime(&self) -> u32 {
        self.locktime
    }

    /// Calculate the txid: the double-SHA-256 of the serialized transaction.
    pub fn txid(&self) -> TXID {
        let mut w = Hash256Writer::default();
        self.write_to(&mut w).expect("No IOError from SHA2");
        w.finish_marked()
    }
}

impl ByteFormat for LegacyTx {
    type Error = SerError;

    fn serialized_length(&self) -> usize {
        let mut len = 4; // version
        len += compact_int_length(self.vin.len() as u64);
        len += self.vin.iter().map(|i| i.serialized_length()).sum::<usize>();
        len += compact_int_length(self.vout.len() as u64);
        len += self.vout.iter().map(|o| o.serialized_length()).sum::<usize>();
        len += 4; // locktime
        len
    }

    fn write_to<W: Write>(&self, writer: &mut W) -> SerResult<usize> {
        let mut len = Self::write_u32_le(writer, self.version)?;
        len += write_compact_int(writer, self.vin.len() as u64)?;
        for input in self.vin.iter() {
            len += input.write_to(writer)?;
        }
        len += write_compact_int(writer, self.vout.len() as u64)?;
        for output in self.vout.iter() {
            len += output.write_to(writer)?;
        }
        len += Self::write_u32_le(writer, self.locktime)?;
        Ok(len)
    }

    fn read_from<R: Read>(reader: &mut R) -> SerResult<Self> {
        let version = Self::read_u32_le(reader)?;
        let vin_count = read_compact_int(reader)?;
        let mut vin = Vin::new();
        for _ in 0..vin_count {
            vin.push(BitcoinTxIn::read_from(reader)?);
        }
        let vout_count = read_compact_int(reader)?;
        let mut vout = Vout::new();
        for _ in 0..vout_count {
            vout.push(TxOut::read_from(reader)?);
        }
        let locktime = Self::read_u32_le(reader)?;
        Ok(Self {
            version,
            vin,
            vout,
            locktime,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::hashes::MarkedDigest;
    use crate::types::txin::BitcoinOutpoint;

    #[test]
    fn it_calculates_legacy_txids() {
        // mainnet transaction
        let tx_hex = "0100000001813f79011acb80925dfe69b3def355fe914bd1d96a3f5f71bf8303c6a989c7d1000000006b483045022100ed81ff192e75a3fd2304004dcadb746fa5e24c5031ccfcf21320b0277457c98f02207a986d955c6e0cb35d446a89d3f56100f4d7f67801c31967743a9c8e10615bed01210349fc4e631e3624a545de3f89f5d8684c7b8138bd94bdd531d2e213bf016b278afeffffff02a135ef01000000001976a914bc3b654dca7e56b04dca18f2566cdaf02e8d9ada88ac99c39800000000001976a9141c4bc762dd5423e332166702cb75f40df79fea1288ac19430600";
        let tx = LegacyTx::deserialize_hex(tx_hex).unwrap();

        let txid = TXID::deserialize_hex(
            "03ee4f7a4e68f802303bc659f8f817964b4b74fe046facc3ae1be4679d622c45",
        )
        .unwrap();
        assert_eq!(tx.txid(), txid);

        assert_eq!(tx.version(), 1);
        assert_eq!(tx.inputs().len(), 1);
        assert_eq!(tx.outputs().len(), 2);
        assert_eq!(tx.locktime(), 0x0006_4319);
        assert_eq!(tx.outputs()[0].value, 0x01ef_35a1);

        // canonical round trip
        assert_eq!(tx.serialize_hex().unwrap(), tx_hex);
        assert_eq!(tx.serialized_length() * 2, tx_hex.len());
    }

    #[test]
    fn it_builds_and_round_trips_transactions() {
        let outpoint = BitcoinOutpoint::new(TXID([0x22; 32]), 1);
        let tx = LegacyTx::new(
            1,
            vec![BitcoinTxIn::from(outpoint)],
            vec![TxOut::new(0, crate::types::script::ScriptPubkey::null())],
            0,
        );

        let bytes = tx.serialize_vec().unwrap();
        assert_eq!(bytes.len(), tx.serialized_length());
        let back = LegacyTx::deserialize_hex(&tx.serialize_hex().unwrap()).unwrap();
        assert_eq!(back, tx);
        assert_eq!(back.txid(), tx.txid());

        // txids differ with content
        let other = LegacyTx::new(
            2,
            vec![BitcoinTxIn::from(outpoint)],
            vec![TxOut::new(0, crate::types::script::ScriptPubkey::null())],
            0,
        );
        assert_ne!(other.txid(), tx.txid());
        assert_eq!(tx.txid(), tx.txid().reversed().reversed());
    }
}
