//! Proofs of transaction, input, and output existence.
//!
//! A [`TxProof`] is a proof-of-existence shell around a transaction;
//! [`TxInProof`] and [`TxOutProof`] name one input or output within it.
//! None of these check chain inclusion, which is an external concern.

use std::io::{Read, Write};

use thiserror::Error;
use uuid::uuid;

use proofmarshal::hashes::{Digest, HashTag};
use proofmarshal::proof::{HashRepr, Proof, ProofContent, ProofError};
use proofmarshal::ser::{ByteFormat, SerResult};

use crate::bridge::{embedded_hash_repr, embedded_length, read_embedded, write_embedded};
use crate::hashes::{MarkedDigest, TXID};
use crate::types::{BitcoinTxIn, LegacyTx, TxOut};

/// An error in a transaction proof.
#[derive(Debug, Error)]
pub enum TxProofError {
    /// The referenced transaction data is pruned away.
    #[error(transparent)]
    Pruned(#[from] ProofError),

    /// The proof's index does not name an input or output.
    #[error("index {index} out of range for length {len}")]
    IndexOutOfRange {
        /// The index carried by the proof.
        index: u32,
        /// The length of the vector it indexes.
        len: usize,
    },
}

/// The fixed pad XORed with a txid to produce a [`TxProof`] hash.
///
/// Using `txid ⊕ pad` keeps proof hashes globally unique while making the
/// correspondence between proof-hash space and txid space trivially
/// invertible in both directions.
pub const TX_HASH_XOR_PAD: [u8; 32] = [
    0x4c, 0xf8, 0x10, 0xb7, 0x3d, 0xc6, 0x05, 0xfb, 0xe6, 0xc2, 0x15, 0x6a, 0x70, 0x41, 0xe3,
    0x70, 0xf4, 0x75, 0x0e, 0x39, 0xd2, 0xd1, 0x57, 0x31, 0x99, 0xc7, 0x72, 0xc7, 0x32, 0x4b,
    0xd0, 0x54,
];

fn xor_pad(bytes: [u8; 32]) -> [u8; 32] {
    let mut out = bytes;
    for (byte, pad) in out.iter_mut().zip(TX_HASH_XOR_PAD.iter()) {
        *byte ^= pad;
    }
    out
}

/// Proof that a transaction exists.
#[derive(Clone, Debug)]
pub struct TxProof {
    /// The transaction itself.
    pub tx: LegacyTx,
}

impl ProofContent for TxProof {
    fn hashtag() -> HashTag {
        HashTag::from_uuid(uuid!("7a3c5a66-89d8-4bb5-85b3-7d84f7e21f30"))
    }

    fn write_body<W: Write>(&self, writer: &mut W) -> SerResult<usize> {
        write_embedded(writer, &self.tx)
    }

    fn read_body<R: Read>(reader: &mut R) -> SerResult<Self> {
        Ok(TxProof {
            tx: read_embedded(reader)?,
        })
    }

    fn body_length(&self) -> usize {
        embedded_length(&self.tx)
    }

    fn hash_preimage(&self, buf: &mut Vec<u8>) {
        embedded_hash_repr(&self.tx, buf);
    }

    fn calc_hash(&self) -> Digest {
        // the txid XORed with a fixed pad: still globally unique, but
        // convertible to a Bitcoin hash and back
        Digest(xor_pad(self.tx.txid().internal()))
    }
}

/// Access to the Bitcoin transaction hash behind a transaction proof.
pub trait TxHash {
    /// The Bitcoin transaction hash.
    ///
    /// Available even if the TxProof is pruned, because the proof hash IS
    /// the txid under the pad.
    fn txhash(&self) -> TXID;
}

impl TxHash for Proof<TxProof> {
    fn txhash(&self) -> TXID {
        TXID::from_internal(xor_pad(self.hash().0))
    }
}

/// Proof that an input exists within a transaction.
#[derive(Clone, Debug)]
pub struct TxInProof {
    /// The input's index in the transaction's vin.
    pub i: u32,
    /// The transaction the input belongs to.
    pub txproof: Proof<TxProof>,
}

impl TxInProof {
    /// Build an input proof, checking the index against the transaction.
    pub fn new(i: u32, txproof: Proof<TxProof>) -> Result<Self, TxProofError> {
        let proof = TxInProof { i, txproof };
        proof.verify()?;
        Ok(proof)
    }

    /// Check that the index names an input of the transaction.
    pub fn verify(&self) -> Result<(), TxProofError> {
        self.txin().map(|_| ())
    }

    /// The input this proof names.
    pub fn txin(&self) -> Result<&BitcoinTxIn, TxProofError> {
        let tx = &self.txproof.content()?.tx;
        tx.inputs()
            .get(self.i as usize)
            .ok_or(TxProofError::IndexOutOfRange {
                index: self.i,
                len: tx.inputs().len(),
            })
    }
}

impl ProofContent for TxInProof {
    fn hashtag() -> HashTag {
        HashTag::from_uuid(uuid!("91e3bd65-8e21-4f4f-9c6e-40a3aee71f2b"))
    }

    fn write_body<W: Write>(&self, writer: &mut W) -> SerResult<usize> {
        let mut len = self.i.write_to(writer)?;
        len += self.txproof.write_to(writer)?;
        Ok(len)
    }

    fn read_body<R: Read>(reader: &mut R) -> SerResult<Self> {
        Ok(TxInProof {
            i: u32::read_from(reader)?,
            txproof: Proof::read_from(reader)?,
        })
    }

    fn body_length(&self) -> usize {
        4 + self.txproof.serialized_length()
    }

    fn hash_preimage(&self, buf: &mut Vec<u8>) {
        self.i.hash_repr(buf);
        self.txproof.hash_repr(buf);
    }

    fn body_is_pruned(&self) -> bool {
        self.txproof.is_pruned()
    }
}

/// Proof that an output exists within a transaction.
#[derive(Clone, Debug)]
pub struct TxOutProof {
    /// The output's index in the transaction's vout.
    pub i: u32,
    /// The transaction the output belongs to.
    pub txproof: Proof<TxProof>,
}

impl TxOutProof {
    /// Build an output proof, checking the index against the transaction.
    pub fn new(i: u32, txproof: Proof<TxProof>) -> Result<Self, TxProofError> {
        let proof = TxOutProof { i, txproof };
        proof.verify()?;
        Ok(proof)
    }

    /// Check that the index names an output of the transaction.
    pub fn verify(&self) -> Result<(), TxProofError> {
        self.txout().map(|_| ())
    }

    /// The output this proof names.
    pub fn txout(&self) -> Result<&TxOut, TxProofError> {
        let tx = &self.txproof.content()?.tx;
        tx.outputs()
            .get(self.i as usize)
            .ok_or(TxProofError::IndexOutOfRange {
                index: self.i,
                len: tx.outputs().len(),
            })
    }
}

impl ProofContent for TxOutProof {
    fn hashtag() -> HashTag {
        HashTag::from_uuid(uuid!("c4e81ff2-6e4a-40a5-ac1a-02a364b29d7e"))
    }

    fn write_body<W: Write>(&self, writer: &mut W) -> SerResult<usize> {
        let mut len = self.i.write_to(writer)?;
        len += self.txproof.write_to(writer)?;
        Ok(len)
    }

    fn read_body<R: Read>(reader: &mut R) -> SerResult<Self> {
        Ok(TxOutProof {
            i: u32::read_from(reader)?,
            txproof: Proof::read_from(reader)?,
        })
    }

    fn body_length(&self) -> usize {
        4 + self.txproof.serialized_length()
    }

    fn hash_preimage(&self, buf: &mut Vec<u8>) {
        self.i.hash_repr(buf);
        self.txproof.hash_repr(buf);
    }

    fn body_is_pruned(&self) -> bool {
        self.txproof.is_pruned()
    }
}
