//! Single-use seals.
//!
//! A single-use seal is a cryptographic resource that can be closed over a
//! 32-byte digest at most once, producing a witness to the closing. The
//! Bitcoin implementation binds a seal to an outpoint: spending that
//! outpoint in a transaction whose output commits to the digest closes the
//! seal, and the spend is the witness.

use std::io::{Read, Write};

use thiserror::Error;
use uuid::uuid;

use proofmarshal::hashes::{Digest, HashTag};
use proofmarshal::proof::{HashRepr, Proof, ProofContent, ProofError};
use proofmarshal::ser::{ByteFormat, SerResult};

use crate::bridge::{embedded_hash_repr, embedded_length, read_embedded, write_embedded};
use crate::txproof::{TxInProof, TxOutProof, TxProofError};
use crate::types::{BitcoinOutpoint, BitcoinTxIn, LegacyTx, ScriptPubkey, TxOut};

/// An error in seal witness verification.
#[derive(Debug, Error)]
pub enum SealError {
    /// Data needed for verification is pruned away.
    #[error(transparent)]
    Pruned(#[from] ProofError),

    /// A transaction proof inside the witness is inconsistent.
    #[error(transparent)]
    Tx(#[from] TxProofError),

    /// The witness transaction does not spend the sealed outpoint, or its
    /// input and output proofs name different transactions.
    #[error("witness does not match its seal")]
    WitnessMismatch,

    /// The closing output's scriptPubKey commits to some other digest.
    #[error("closing scriptPubKey does not commit to the digest")]
    DigestMismatch,
}

/// A specific single-use seal.
pub trait SingleUseSeal: ProofContent {}

/// Witness to the use of a single-use seal.
pub trait SealWitness: ProofContent {
    /// The seal class this witness closes.
    type Seal: SingleUseSeal;

    /// The seal that was closed.
    fn seal(&self) -> &Proof<Self::Seal>;

    /// Check the witness's own structural consistency.
    fn verify(&self) -> Result<(), SealError>;

    /// Check that the seal was closed over exactly `digest`.
    fn verify_digest(&self, digest: &Digest) -> Result<(), SealError>;
}

/// A fake seal that simply commits to the witnessed digest in advance.
///
/// Only useful for testing code that is generic over seals.
#[derive(Clone, Debug)]
pub struct FakeSingleUseSeal {
    /// The digest the seal will witness.
    pub committed_hash: Digest,
}

impl ProofContent for FakeSingleUseSeal {
    fn hashtag() -> HashTag {
        HashTag::from_uuid(uuid!("e5690d73-16e3-4f8f-bd4f-148c32d37baf"))
    }

    fn write_body<W: Write>(&self, writer: &mut W) -> SerResult<usize> {
        self.committed_hash.write_to(writer)
    }

    fn read_body<R: Read>(reader: &mut R) -> SerResult<Self> {
        Ok(FakeSingleUseSeal {
            committed_hash: Digest::read_from(reader)?,
        })
    }

    fn body_length(&self) -> usize {
        32
    }

    fn hash_preimage(&self, buf: &mut Vec<u8>) {
        self.committed_hash.hash_repr(buf);
    }
}

impl SingleUseSeal for FakeSingleUseSeal {}

/// Witness to a [`FakeSingleUseSeal`].
#[derive(Clone, Debug)]
pub struct FakeSealWitness {
    /// The seal that was closed.
    pub seal: Proof<FakeSingleUseSeal>,
}

impl FakeSealWitness {
    /// A witness over a fresh fake seal committing to `digest`.
    pub fn from_digest(digest: Digest) -> Self {
        FakeSealWitness {
            seal: Proof::new(FakeSingleUseSeal {
                committed_hash: digest,
            }),
        }
    }
}

impl ProofContent for FakeSealWitness {
    fn hashtag() -> HashTag {
        HashTag::from_uuid(uuid!("a5092f56-3a31-476a-ac81-1b00211140eb"))
    }

    fn write_body<W: Write>(&self, writer: &mut W) -> SerResult<usize> {
        self.seal.write_to(writer)
    }

    fn read_body<R: Read>(reader: &mut R) -> SerResult<Self> {
        Ok(FakeSealWitness {
            seal: Proof::read_from(reader)?,
        })
    }

    fn body_length(&self) -> usize {
        self.seal.serialized_length()
    }

    fn hash_preimage(&self, buf: &mut Vec<u8>) {
        self.seal.hash_repr(buf);
    }

    fn body_is_pruned(&self) -> bool {
        self.seal.is_pruned()
    }
}

impl SealWitness for FakeSealWitness {
    type Seal = FakeSingleUseSeal;

    fn seal(&self) -> &Proof<FakeSingleUseSeal> {
        &self.seal
    }

    fn verify(&self) -> Result<(), SealError> {
        Ok(())
    }

    fn verify_digest(&self, digest: &Digest) -> Result<(), SealError> {
        if self.seal.content()?.committed_hash == *digest {
            Ok(())
        } else {
            Err(SealError::DigestMismatch)
        }
    }
}

/// A single-use seal implemented via Bitcoin: an outpoint that is later
/// spent in a specific way.
#[derive(Clone, Debug)]
pub struct BitcoinSingleUseSeal {
    /// The outpoint whose spend closes the seal.
    pub outpoint: BitcoinOutpoint,
}

impl ProofContent for BitcoinSingleUseSeal {
    fn hashtag() -> HashTag {
        HashTag::from_uuid(uuid!("b59093bf-527f-4d2a-9a51-3c2e3d2f0c25"))
    }

    fn write_body<W: Write>(&self, writer: &mut W) -> SerResult<usize> {
        write_embedded(writer, &self.outpoint)
    }

    fn read_body<R: Read>(reader: &mut R) -> SerResult<Self> {
        Ok(BitcoinSingleUseSeal {
            outpoint: read_embedded(reader)?,
        })
    }

    fn body_length(&self) -> usize {
        embedded_length(&self.outpoint)
    }

    fn hash_preimage(&self, buf: &mut Vec<u8>) {
        embedded_hash_repr(&self.outpoint, buf);
    }
}

impl SingleUseSeal for BitcoinSingleUseSeal {}

/// Witness to the use of a [`BitcoinSingleUseSeal`].
#[derive(Clone, Debug)]
pub struct BitcoinSealWitness {
    /// The seal that was closed.
    pub seal: Proof<BitcoinSingleUseSeal>,
    /// The closing transaction's input spending the sealed outpoint.
    pub txinproof: Proof<TxInProof>,
    /// The closing transaction's output committing to the digest.
    pub txoutproof: Proof<TxOutProof>,
}

impl ProofContent for BitcoinSealWitness {
    fn hashtag() -> HashTag {
        HashTag::from_uuid(uuid!("2ca464a0-1b8c-4aa5-8e72-5d3aaa804cbd"))
    }

    fn write_body<W: Write>(&self, writer: &mut W) -> SerResult<usize> {
        let mut len = self.seal.write_to(writer)?;
        len += self.txinproof.write_to(writer)?;
        len += self.txoutproof.write_to(writer)?;
        Ok(len)
    }

    fn read_body<R: Read>(reader: &mut R) -> SerResult<Self> {
        Ok(BitcoinSealWitness {
            seal: Proof::read_from(reader)?,
            txinproof: Proof::read_from(reader)?,
            txoutproof: Proof::read_from(reader)?,
        })
    }

    fn body_length(&self) -> usize {
        self.seal.serialized_length()
            + self.txinproof.serialized_length()
            + self.txoutproof.serialized_length()
    }

    fn hash_preimage(&self, buf: &mut Vec<u8>) {
        self.seal.hash_repr(buf);
        self.txinproof.hash_repr(buf);
        self.txoutproof.hash_repr(buf);
    }

    fn body_is_pruned(&self) -> bool {
        self.seal.is_pruned() || self.txinproof.is_pruned() || self.txoutproof.is_pruned()
    }
}

impl SealWitness for BitcoinSealWitness {
    type Seal = BitcoinSingleUseSeal;

    fn seal(&self) -> &Proof<BitcoinSingleUseSeal> {
        &self.seal
    }

    fn verify(&self) -> Result<(), SealError> {
        let seal = self.seal.content()?;
        let txinproof = self.txinproof.content()?;
        let txoutproof = self.txoutproof.content()?;

        if txinproof.txin()?.outpoint != seal.outpoint {
            return Err(SealError::WitnessMismatch);
        }
        if txinproof.txproof != txoutproof.txproof {
            return Err(SealError::WitnessMismatch);
        }
        Ok(())
    }

    fn verify_digest(&self, digest: &Digest) -> Result<(), SealError> {
        // Avoid the consensus issues of parsing the scriptPubKey by
        // generating one ourselves, and then doing a byte-for-byte
        // comparison. P2SH and P2PKH are supported alongside OP_RETURN for
        // censorship resistance.
        let txoutproof = self.txoutproof.content()?;
        let actual = &txoutproof.txout()?.script_pubkey;

        if *actual == ScriptPubkey::op_return(digest)
            || *actual == ScriptPubkey::p2sh_commitment(digest)
            || *actual == ScriptPubkey::p2pkh_commitment(digest)
        {
            Ok(())
        } else {
            Err(SealError::DigestMismatch)
        }
    }
}

/// The default dust value for non-provable closing outputs.
pub const DEFAULT_DUST: u64 = 600;

/// How a seal-closing output commits to its digest.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum CloseMethod {
    /// `OP_RETURN <digest>`: provably unspendable, zero value.
    OpReturn,
    /// `OP_HASH160 <hash160(digest)> OP_EQUAL`: indistinguishable from an
    /// ordinary P2SH output.
    P2sh,
    /// `OP_DUP OP_HASH160 <hash160(digest)> OP_EQUALVERIFY OP_CHECKSIG`:
    /// indistinguishable from an ordinary P2PKH output.
    P2pkh,
}

fn close_txout(digest: &Digest, method: CloseMethod, dust: u64) -> TxOut {
    match method {
        CloseMethod::OpReturn => TxOut::new(0, ScriptPubkey::op_return(digest)),
        CloseMethod::P2sh => TxOut::new(dust, ScriptPubkey::p2sh_commitment(digest)),
        CloseMethod::P2pkh => TxOut::new(dust, ScriptPubkey::p2pkh_commitment(digest)),
    }
}

/// A transaction template that would close `seals` over `digest`.
///
/// The template spends every sealed outpoint and carries a single output
/// committing to the digest; fees and change are the caller's problem.
pub fn make_close_seal_tx_template(
    digest: &Digest,
    seals: &[&BitcoinSingleUseSeal],
    method: CloseMethod,
    dust: u64,
) -> LegacyTx {
    let vin: Vec<BitcoinTxIn> = seals
        .iter()
        .map(|seal| BitcoinTxIn::from(seal.outpoint))
        .collect();
    LegacyTx::new(1, vin, vec![close_txout(digest, method, dust)], 0)
}
