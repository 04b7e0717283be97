//! Transaction outputs.

use std::io::{Read, Write};

use proofmarshal::ser::{ByteFormat, SerError, SerResult};

use crate::types::script::ScriptPubkey;

/// An Output. This describes a new UTXO to be created. The value is encoded
/// as an LE u64. The script pubkey encodes the spending constraints.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct TxOut {
    /// The value of the output in satoshis.
    pub value: u64,
    /// The `ScriptPubkey` which locks the UTXO.
    pub script_pubkey: ScriptPubkey,
}

impl TxOut {
    /// Instantiate a new TxOut.
    pub fn new<T>(value: u64, script_pubkey: T) -> Self
    where
        T: Into<ScriptPubkey>,
    {
        TxOut {
            value,
            script_pubkey: script_pubkey.into(),
        }
    }
}

impl ByteFormat for TxOut {
    type Error = SerError;

    fn serialized_length(&self) -> usize {
        8 + self.script_pubkey.serialized_length()
    }

    fn write_to<W: Write>(&self, writer: &mut W) -> SerResult<usize> {
        let mut len = Self::write_u64_le(writer, self.value)?;
        len += self.script_pubkey.write_to(writer)?;
        Ok(len)
    }

    fn read_from<R: Read>(reader: &mut R) -> SerResult<Self> {
        Ok(TxOut {
            value: Self::read_u64_le(reader)?,
            script_pubkey: ScriptPubkey::read_from(reader)?,
        })
    }
}

/// A transaction's vector of outputs.
pub type Vout = Vec<TxOut>;
