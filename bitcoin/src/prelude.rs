//! Re-exports of the types most users need.

pub use proofmarshal::prelude::*;

pub use crate::gumap::{GuMap, GuMapError, GuMapSchema, GuNode, InnerPrefix, LeafPrefix, UnusedPrefix};
pub use crate::hashes::{hash160, hash256, Hash256Writer, MarkedDigest, TXID};
pub use crate::seals::{
    make_close_seal_tx_template, BitcoinSealWitness, BitcoinSingleUseSeal, CloseMethod,
    FakeSealWitness, FakeSingleUseSeal, SealError, SealWitness, SingleUseSeal,
};
pub use crate::txproof::{TxHash, TxInProof, TxOutProof, TxProof, TxProofError, TX_HASH_XOR_PAD};
pub use crate::types::{
    BitcoinOutpoint, BitcoinTxIn, LegacyTx, Script, ScriptPubkey, ScriptSig, TxOut, Vin, Vout,
};
