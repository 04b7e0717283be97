//! Globally Unique Maps.
//!
//! A GuMap is a binary prefix tree keyed by bit strings in which every node
//! is bound to its own single-use seal. Because a seal can be closed at most
//! once, each prefix of the tree can be assigned at most one meaning: a
//! leaf's seal is closed over its key/value contents, an inner node's seal
//! over the seals of its two children, and an unused prefix's seal is still
//! open. The result is a map in which no prefix can ever be honestly bound
//! to two different values.
//!
//! Tree nodes form a closed proof union whose declaration order is
//! consensus-critical: `Unused = 0`, `Leaf = 1`, `Inner = 2`. New variants
//! may only ever be appended.

use std::io::{Read, Write};

use thiserror::Error;
use uuid::{uuid, Uuid};

use proofmarshal::bits::Bits;
use proofmarshal::hashes::{Digest, HashTag};
use proofmarshal::proof::{HashRepr, Proof, ProofContent, ProofError};
use proofmarshal::ser::{varuint_length, ByteFormat, SerError, SerResult};

use crate::seals::{SealError, SealWitness, SingleUseSeal};

const UNUSED_PREFIX_TAG: Uuid = uuid!("dae47bef-d9a3-4971-a6a4-1c67c5f02c11");
const LEAF_PREFIX_TAG: Uuid = uuid!("0c60f344-9109-4930-aec1-432c5750fcba");
const INNER_PREFIX_TAG: Uuid = uuid!("6893cac7-e834-49cd-8e95-77707b0499b5");

const LEAF_CONTENTS_TAG: Uuid = uuid!("59c17f37-7e26-4aea-8a5b-7c0db66af35b");
const INNER_CONTENTS_TAG: Uuid = uuid!("b925044d-320e-4c1f-9ef8-20614d260676");

/// An error in GuMap construction or verification.
#[derive(Debug, Error)]
pub enum GuMapError {
    /// Data needed for the operation is pruned away.
    #[error(transparent)]
    Pruned(#[from] ProofError),

    /// The node's witness failed verification.
    #[error(transparent)]
    Seal(#[from] SealError),

    /// A child or key prefix does not extend the parent prefix correctly.
    #[error("prefix {got:?} does not extend {expected:?}")]
    PrefixMismatch {
        /// The prefix the tree position requires.
        expected: Bits,
        /// The prefix actually supplied.
        got: Bits,
    },
}

/// The static configuration of one GuMap instantiation.
///
/// Implementors fix the key and value types, the seal and witness classes
/// binding each node, the map's hash domain, and the key-to-prefix mapping.
pub trait GuMapSchema: Sized + 'static {
    /// Map key type.
    type Key: ByteFormat<Error = SerError> + HashRepr + PartialEq;
    /// Map value type.
    type Value: ByteFormat<Error = SerError> + HashRepr;
    /// The seal class binding each prefix.
    type Seal: SingleUseSeal;
    /// The witness class closing those seals.
    type Witness: SealWitness<Seal = Self::Seal>;

    /// The map's hash domain. Every node and contents digest is derived
    /// under this tag, so two differently-tagged maps never share hashes.
    fn hashtag() -> HashTag;

    /// The full tree prefix a key lives at.
    fn key2prefix(key: &Self::Key) -> Bits;
}

/// A prefix whose seal has not been closed yet.
pub struct UnusedPrefix<S: GuMapSchema> {
    /// The tree position this seal reserves.
    pub prefix: Bits,
    /// The still-open seal.
    pub seal: Proof<S::Seal>,
}

impl<S: GuMapSchema> UnusedPrefix<S> {
    /// Instantiate an unused prefix.
    pub fn new(prefix: Bits, seal: Proof<S::Seal>) -> Self {
        UnusedPrefix { prefix, seal }
    }

    /// An unused prefix makes no claims and trivially verifies.
    pub fn verify(&self) -> Result<(), GuMapError> {
        Ok(())
    }
}

/// A prefix whose seal has been closed over a key/value pair.
#[derive(Debug)]
pub struct LeafPrefix<S: GuMapSchema> {
    /// Witness closing the seal over the contents digest.
    pub witness: Proof<S::Witness>,
    /// The key.
    pub key: S::Key,
    /// The value.
    pub value: S::Value,
}

impl<S: GuMapSchema> LeafPrefix<S> {
    fn sealed_hash(key: &S::Key, value: &S::Value) -> Digest {
        let mut msg = Vec::new();
        key.hash_repr(&mut msg);
        value.hash_repr(&mut msg);
        HashTag::from_uuid(LEAF_CONTENTS_TAG)
            .derive(&S::hashtag())
            .apply(&msg)
    }

    /// Close an unused prefix over a key/value pair.
    ///
    /// The key must live under the unused prefix; the witness is minted by
    /// the callback over the recomputable contents digest. In production
    /// minting a witness involves building, funding, and broadcasting a
    /// closing transaction.
    pub fn from_unused_prefix<F>(
        unused: &UnusedPrefix<S>,
        key: S::Key,
        value: S::Value,
        make_witness: F,
    ) -> Result<Self, GuMapError>
    where
        F: FnOnce(&Proof<S::Seal>, &Digest) -> Result<Proof<S::Witness>, SealError>,
    {
        let prefix = S::key2prefix(&key);
        if !prefix.starts_with(&unused.prefix) {
            return Err(GuMapError::PrefixMismatch {
                expected: unused.prefix.clone(),
                got: prefix,
            });
        }

        let sealed = Self::sealed_hash(&key, &value);
        let witness = make_witness(&unused.seal, &sealed)?;
        Ok(LeafPrefix {
            witness,
            key,
            value,
        })
    }

    /// The full tree prefix, derived from the key.
    pub fn prefix(&self) -> Bits {
        S::key2prefix(&self.key)
    }

    /// Check the witness against the recomputed contents digest.
    pub fn verify(&self) -> Result<(), GuMapError> {
        let sealed = Self::sealed_hash(&self.key, &self.value);
        self.witness.content()?.verify_digest(&sealed)?;
        Ok(())
    }
}

/// A prefix whose seal has been closed over two child subtrees.
#[derive(Debug)]
pub struct InnerPrefix<S: GuMapSchema> {
    /// The tree position.
    pub prefix: Bits,
    /// Witness closing the seal over the child seals.
    pub witness: Proof<S::Witness>,
    /// Subtree extending the prefix with bit 0.
    pub left: Proof<GuNode<S>>,
    /// Subtree extending the prefix with bit 1.
    pub right: Proof<GuNode<S>>,
}

impl<S: GuMapSchema> InnerPrefix<S> {
    fn sealed_hash(left: &GuNode<S>, right: &GuNode<S>) -> Result<Digest, GuMapError> {
        let mut msg = Vec::new();
        msg.extend_from_slice(left.seal_hash()?.as_bytes());
        msg.extend_from_slice(right.seal_hash()?.as_bytes());
        Ok(HashTag::from_uuid(INNER_CONTENTS_TAG)
            .derive(&S::hashtag())
            .apply(&msg))
    }

    /// Close an unused prefix over a pair of child subtrees.
    ///
    /// The children must extend the prefix with bits 0 and 1 respectively.
    pub fn from_unused_prefix<F>(
        unused: &UnusedPrefix<S>,
        left: GuNode<S>,
        right: GuNode<S>,
        make_witness: F,
    ) -> Result<Self, GuMapError>
    where
        F: FnOnce(&Proof<S::Seal>, &Digest) -> Result<Proof<S::Witness>, SealError>,
    {
        for (child, bit) in [(&left, false), (&right, true)] {
            let expected = unused.prefix.push(bit);
            let got = child.prefix();
            if !got.starts_with(&expected) {
                return Err(GuMapError::PrefixMismatch { expected, got });
            }
        }

        let sealed = Self::sealed_hash(&left, &right)?;
        let witness = make_witness(&unused.seal, &sealed)?;
        Ok(InnerPrefix {
            prefix: unused.prefix.clone(),
            witness,
            left: Proof::new(left),
            right: Proof::new(right),
        })
    }

    /// Check the witness against the recomputed contents digest.
    ///
    /// Requires both children's seals to be reachable; the children's own
    /// witnesses are verified separately, node by node.
    pub fn verify(&self) -> Result<(), GuMapError> {
        let sealed = Self::sealed_hash(self.left.content()?, self.right.content()?)?;
        self.witness.content()?.verify_digest(&sealed)?;
        Ok(())
    }
}

/// A GuMap tree node: the closed union of the three prefix states.
pub enum GuNode<S: GuMapSchema> {
    /// Variant tag 0.
    Unused(UnusedPrefix<S>),
    /// Variant tag 1.
    Leaf(LeafPrefix<S>),
    /// Variant tag 2.
    Inner(InnerPrefix<S>),
}

/// A handle to a (possibly pruned) GuMap tree.
pub type GuMap<S> = Proof<GuNode<S>>;

impl<S: GuMapSchema> GuNode<S> {
    fn tag(&self) -> u64 {
        match self {
            GuNode::Unused(_) => 0,
            GuNode::Leaf(_) => 1,
            GuNode::Inner(_) => 2,
        }
    }

    fn sub_hashtag(&self) -> HashTag {
        let seed = match self {
            GuNode::Unused(_) => UNUSED_PREFIX_TAG,
            GuNode::Leaf(_) => LEAF_PREFIX_TAG,
            GuNode::Inner(_) => INNER_PREFIX_TAG,
        };
        HashTag::from_uuid(seed).derive(&S::hashtag())
    }

    /// The tree position of this node.
    pub fn prefix(&self) -> Bits {
        match self {
            GuNode::Unused(unused) => unused.prefix.clone(),
            GuNode::Leaf(leaf) => leaf.prefix(),
            GuNode::Inner(inner) => inner.prefix.clone(),
        }
    }

    /// The digest of the seal binding this node.
    ///
    /// For an unused prefix that is the seal itself; for closed nodes it is
    /// the seal committed inside the witness.
    pub fn seal_hash(&self) -> Result<Digest, GuMapError> {
        match self {
            GuNode::Unused(unused) => Ok(unused.seal.hash()),
            GuNode::Leaf(leaf) => Ok(leaf.witness.content()?.seal().hash()),
            GuNode::Inner(inner) => Ok(inner.witness.content()?.seal().hash()),
        }
    }

    /// Verify this node's witness against its recomputed contents digest.
    pub fn verify(&self) -> Result<(), GuMapError> {
        match self {
            GuNode::Unused(unused) => unused.verify(),
            GuNode::Leaf(leaf) => leaf.verify(),
            GuNode::Inner(inner) => inner.verify(),
        }
    }

    /// Look up `key` in the subtree rooted at this node.
    ///
    /// At an inner node, the bit just past the node's prefix selects the
    /// left (0) or right (1) child; a leaf matches only on key equality; an
    /// unused prefix holds nothing. Pruned subtrees along the path surface
    /// as [`ProofError::Pruned`].
    pub fn lookup(&self, key: &S::Key) -> Result<Option<&S::Value>, GuMapError> {
        let path = S::key2prefix(key);
        let mut node = self;
        loop {
            match node {
                GuNode::Unused(_) => return Ok(None),
                GuNode::Leaf(leaf) => {
                    return Ok(if leaf.key == *key {
                        Some(&leaf.value)
                    } else {
                        None
                    });
                }
                GuNode::Inner(inner) => {
                    if !path.starts_with(&inner.prefix) {
                        return Ok(None);
                    }
                    let bit = match path.get(inner.prefix.len()) {
                        Some(bit) => bit,
                        None => return Ok(None),
                    };
                    let child = if bit { &inner.right } else { &inner.left };
                    node = child.content()?;
                }
            }
        }
    }
}

impl<S: GuMapSchema> ProofContent for GuNode<S> {
    fn hashtag() -> HashTag {
        S::hashtag()
    }

    fn write_body<W: Write>(&self, writer: &mut W) -> SerResult<usize> {
        let mut len = u64::write_varuint(writer, self.tag())?;
        match self {
            GuNode::Unused(unused) => {
                len += unused.prefix.write_to(writer)?;
                len += unused.seal.write_to(writer)?;
            }
            GuNode::Leaf(leaf) => {
                len += leaf.witness.write_to(writer)?;
                len += leaf.key.write_to(writer)?;
                len += leaf.value.write_to(writer)?;
            }
            GuNode::Inner(inner) => {
                len += inner.prefix.write_to(writer)?;
                len += inner.witness.write_to(writer)?;
                len += inner.left.write_to(writer)?;
                len += inner.right.write_to(writer)?;
            }
        }
        Ok(len)
    }

    fn read_body<R: Read>(reader: &mut R) -> SerResult<Self> {
        match u64::read_varuint(reader)? {
            0 => Ok(GuNode::Unused(UnusedPrefix {
                prefix: Bits::read_from(reader)?,
                seal: Proof::read_from(reader)?,
            })),
            1 => Ok(GuNode::Leaf(LeafPrefix {
                witness: Proof::read_from(reader)?,
                key: S::Key::read_from(reader)?,
                value: S::Value::read_from(reader)?,
            })),
            2 => Ok(GuNode::Inner(InnerPrefix {
                prefix: Bits::read_from(reader)?,
                witness: Proof::read_from(reader)?,
                left: Proof::read_from(reader)?,
                right: Proof::read_from(reader)?,
            })),
            tag => Err(SerError::UnknownUnionTag(tag)),
        }
    }

    fn body_length(&self) -> usize {
        varuint_length(self.tag())
            + match self {
                GuNode::Unused(unused) => {
                    unused.prefix.serialized_length() + unused.seal.serialized_length()
                }
                GuNode::Leaf(leaf) => {
                    leaf.witness.serialized_length()
                        + leaf.key.serialized_length()
                        + leaf.value.serialized_length()
                }
                GuNode::Inner(inner) => {
                    inner.prefix.serialized_length()
                        + inner.witness.serialized_length()
                        + inner.left.serialized_length()
                        + inner.right.serialized_length()
                }
            }
    }

    fn hash_preimage(&self, buf: &mut Vec<u8>) {
        u64::write_varuint(buf, self.tag()).expect("writing to a Vec cannot fail");
        match self {
            GuNode::Unused(unused) => {
                unused.prefix.hash_repr(buf);
                unused.seal.hash_repr(buf);
            }
            GuNode::Leaf(leaf) => {
                leaf.witness.hash_repr(buf);
                leaf.key.hash_repr(buf);
                leaf.value.hash_repr(buf);
            }
            GuNode::Inner(inner) => {
                inner.prefix.hash_repr(buf);
                inner.witness.hash_repr(buf);
                inner.left.hash_repr(buf);
                inner.right.hash_repr(buf);
            }
        }
    }

    fn calc_hash(&self) -> Digest {
        let mut buf = Vec::new();
        self.hash_preimage(&mut buf);
        self.sub_hashtag().apply(&buf)
    }

    fn body_is_pruned(&self) -> bool {
        match self {
            GuNode::Unused(unused) => unused.seal.is_pruned(),
            GuNode::Leaf(leaf) => leaf.witness.is_pruned(),
            GuNode::Inner(inner) => {
                inner.witness.is_pruned() || inner.left.is_pruned() || inner.right.is_pruned()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::hashes::TXID;
    use crate::seals::{
        make_close_seal_tx_template, BitcoinSealWitness, BitcoinSingleUseSeal, CloseMethod,
        DEFAULT_DUST,
    };
    use crate::txproof::{TxInProof, TxOutProof, TxProof};
    use crate::types::BitcoinOutpoint;

    #[derive(Debug)]
    struct IntGuMap;

    impl GuMapSchema for IntGuMap {
        type Key = u64;
        type Value = u64;
        type Seal = BitcoinSingleUseSeal;
        type Witness = BitcoinSealWitness;

        fn hashtag() -> HashTag {
            HashTag::from_seed([0u8; 16])
        }

        fn key2prefix(key: &u64) -> Bits {
            Bits::from_bytes(&(*key as u32).to_be_bytes())
        }
    }

    type Node = GuNode<IntGuMap>;

    fn make_seal(fill: u8) -> Proof<BitcoinSingleUseSeal> {
        Proof::new(BitcoinSingleUseSeal {
            outpoint: BitcoinOutpoint::new(TXID([fill; 32]), 0),
        })
    }

    fn make_witness(
        seal: &Proof<BitcoinSingleUseSeal>,
        digest: &Digest,
    ) -> Result<Proof<BitcoinSealWitness>, SealError> {
        let tx = make_close_seal_tx_template(
            digest,
            &[seal.content()?],
            CloseMethod::OpReturn,
            DEFAULT_DUST,
        );
        let txproof = Proof::new(TxProof { tx });
        Ok(Proof::new(BitcoinSealWitness {
            seal: seal.clone(),
            txinproof: Proof::new(TxInProof {
                i: 0,
                txproof: txproof.clone(),
            }),
            txoutproof: Proof::new(TxOutProof { i: 0, txproof }),
        }))
    }

    fn unused(prefix: Bits, fill: u8) -> UnusedPrefix<IntGuMap> {
        UnusedPrefix::new(prefix, make_seal(fill))
    }

    #[test]
    fn it_keeps_unused_prefix_seals_intact() {
        let seal = make_seal(0x11);
        let prefix = UnusedPrefix::<IntGuMap>::new(Bits::new(), seal.clone());

        assert_eq!(prefix.seal, seal);
        prefix.verify().unwrap();
    }

    #[test]
    fn it_fixes_the_unused_variant_wire_bytes() {
        let node = Proof::new(Node::Unused(unused(Bits::new(), 0x11)));

        // full flag, tag 0, empty prefix, full seal, 36-byte embedded outpoint
        let expected = format!("0000000024{}00000000", "11".repeat(32));
        assert_eq!(node.serialize_hex().unwrap(), expected);

        let back = GuMap::<IntGuMap>::deserialize_hex(&expected).unwrap();
        assert_eq!(back, node);
        assert_eq!(back.serialize_hex().unwrap(), expected);
    }

    #[test]
    fn it_verifies_leaves_built_from_unused_prefixes() {
        let unused_prefix = unused(Bits::new(), 0x21);
        let leaf =
            LeafPrefix::from_unused_prefix(&unused_prefix, 0, 0, make_witness).unwrap();

        assert_eq!(leaf.prefix(), IntGuMap::key2prefix(&0));
        leaf.verify().unwrap();
    }

    #[test]
    fn it_rejects_leaves_whose_key_leaves_the_prefix() {
        // key 0's prefix starts with bit 0, but the slot is under bit 1
        let unused_prefix = unused(Bits::from_bools([true]), 0x21);
        let err =
            LeafPrefix::from_unused_prefix(&unused_prefix, 0, 7, make_witness).unwrap_err();
        assert!(matches!(err, GuMapError::PrefixMismatch { .. }));
    }

    #[test]
    fn it_detects_tampered_leaf_values() {
        let unused_prefix = unused(Bits::new(), 0x21);
        let leaf =
            LeafPrefix::from_unused_prefix(&unused_prefix, 0, 0, make_witness).unwrap();

        let tampered = LeafPrefix::<IntGuMap> {
            witness: leaf.witness.clone(),
            key: leaf.key,
            value: 1,
        };
        assert!(matches!(
            tampered.verify().unwrap_err(),
            GuMapError::Seal(SealError::DigestMismatch)
        ));
    }

    #[test]
    fn it_verifies_inner_nodes_built_from_unused_prefixes() {
        let left = Node::Unused(unused(Bits::from_bools([false]), 0x01));
        let right = Node::Unused(unused(Bits::from_bools([true]), 0x02));
        let root_unused = unused(Bits::new(), 0x03);

        let inner =
            InnerPrefix::from_unused_prefix(&root_unused, left, right, make_witness).unwrap();

        assert_eq!(inner.prefix, Bits::new());
        inner.verify().unwrap();
    }

    #[test]
    fn it_rejects_children_on_the_wrong_side() {
        let left = Node::Unused(unused(Bits::from_bools([false]), 0x01));
        let misplaced = Node::Unused(unused(Bits::from_bools([false]), 0x02));
        let root_unused = unused(Bits::new(), 0x03);

        let err = InnerPrefix::from_unused_prefix(&root_unused, left, misplaced, make_witness)
            .unwrap_err();
        assert!(matches!(err, GuMapError::PrefixMismatch { .. }));
    }

    #[test]
    fn it_fixes_union_variant_tags() {
        let unused_node = Proof::new(Node::Unused(unused(Bits::new(), 0x11)));
        let leaf_node = Proof::new(Node::Leaf(
            LeafPrefix::from_unused_prefix(&unused(Bits::new(), 0x21), 0, 0, make_witness)
                .unwrap(),
        ));
        let inner_node = Proof::new(Node::Inner(
            InnerPrefix::from_unused_prefix(
                &unused(Bits::new(), 0x03),
                Node::Unused(unused(Bits::from_bools([false]), 0x01)),
                Node::Unused(unused(Bits::from_bools([true]), 0x02)),
                make_witness,
            )
            .unwrap(),
        ));

        // after the pruned flag, the varuint tag pins the declaration index
        for (node, tag) in [(&unused_node, 0u8), (&leaf_node, 1), (&inner_node, 2)] {
            let bytes = node.serialize_vec().unwrap();
            assert_eq!(bytes[0], 0x00);
            assert_eq!(bytes[1], tag);
        }

        // and the three variants land in distinct hash domains
        assert_ne!(unused_node.hash(), leaf_node.hash());
        assert_ne!(leaf_node.hash(), inner_node.hash());
    }

    #[test]
    fn it_round_trips_whole_trees() {
        let leaf =
            LeafPrefix::from_unused_prefix(&unused(Bits::from_bools([false]), 0x01), 0, 42, make_witness)
                .unwrap();
        let inner = InnerPrefix::from_unused_prefix(
            &unused(Bits::new(), 0x03),
            Node::Leaf(leaf),
            Node::Unused(unused(Bits::from_bools([true]), 0x02)),
            make_witness,
        )
        .unwrap();
        let root = Proof::new(Node::Inner(inner));

        let bytes = root.serialize_vec().unwrap();
        assert_eq!(bytes.len(), root.serialized_length());
        let back = GuMap::<IntGuMap>::deserialize_vec(&bytes).unwrap();
        assert_eq!(back, root);
        assert_eq!(back.serialize_vec().unwrap(), bytes);
        back.content().unwrap().verify().unwrap();
    }

    #[test]
    fn it_preserves_the_root_hash_across_subtree_pruning() {
        let inner = InnerPrefix::from_unused_prefix(
            &unused(Bits::new(), 0x03),
            Node::Unused(unused(Bits::from_bools([false]), 0x01)),
            Node::Unused(unused(Bits::from_bools([true]), 0x02)),
            make_witness,
        )
        .unwrap();

        let full = Proof::new(Node::Inner(InnerPrefix {
            prefix: inner.prefix.clone(),
            witness: inner.witness.clone(),
            left: inner.left.clone(),
            right: inner.right.clone(),
        }));
        let partial = Proof::new(Node::Inner(InnerPrefix {
            prefix: inner.prefix.clone(),
            witness: inner.witness.clone(),
            left: inner.left.prune(),
            right: inner.right.clone(),
        }));

        assert_eq!(partial.hash(), full.hash());
        assert!(partial.is_pruned());
        assert!(!full.is_pruned());

        // the pruned child round trips as a bare digest
        let back =
            GuMap::<IntGuMap>::deserialize_vec(&partial.serialize_vec().unwrap()).unwrap();
        assert_eq!(back.hash(), full.hash());
        match back.content().unwrap() {
            Node::Inner(node) => assert!(node.left.is_fully_pruned()),
            _ => panic!("expected an inner node"),
        }
    }

    #[test]
    fn it_rejects_unknown_union_tags() {
        let err = GuMap::<IntGuMap>::deserialize_hex("0003").unwrap_err();
        assert!(matches!(err, SerError::UnknownUnionTag(3)));
    }

    #[test]
    fn it_looks_up_keys_by_prefix_navigation() {
        // key 0 goes left from the root; keys with a high first bit go right
        let leaf =
            LeafPrefix::from_unused_prefix(&unused(Bits::from_bools([false]), 0x01), 0, 42, make_witness)
                .unwrap();
        let inner = InnerPrefix::from_unused_prefix(
            &unused(Bits::new(), 0x03),
            Node::Leaf(leaf),
            Node::Unused(unused(Bits::from_bools([true]), 0x02)),
            make_witness,
        )
        .unwrap();
        let root = Node::Inner(inner);

        assert_eq!(root.lookup(&0).unwrap(), Some(&42));
        // same side, different key
        assert_eq!(root.lookup(&1).unwrap(), None);
        // right side is unused
        assert_eq!(root.lookup(&0x8000_0000).unwrap(), None);

        // a pruned path surfaces as Pruned
        let pruned_root = Node::Inner(InnerPrefix {
            prefix: Bits::new(),
            witness: match &root {
                Node::Inner(node) => node.witness.clone(),
                _ => unreachable!(),
            },
            left: match &root {
                Node::Inner(node) => Proof::from_digest(node.left.hash()),
                _ => unreachable!(),
            },
            right: match &root {
                Node::Inner(node) => node.right.clone(),
                _ => unreachable!(),
            },
        });
        assert!(matches!(
            pruned_root.lookup(&0).unwrap_err(),
            GuMapError::Pruned(ProofError::Pruned)
        ));
    }

    #[test]
    fn it_separates_differently_tagged_maps() {
        struct OtherGuMap;

        impl GuMapSchema for OtherGuMap {
            type Key = u64;
            type Value = u64;
            type Seal = BitcoinSingleUseSeal;
            type Witness = BitcoinSealWitness;

            fn hashtag() -> HashTag {
                HashTag::from_seed([1u8; 16])
            }

            fn key2prefix(key: &u64) -> Bits {
                IntGuMap::key2prefix(key)
            }
        }

        let here = Proof::new(GuNode::<IntGuMap>::Unused(unused(Bits::new(), 0x11)));
        let there = Proof::new(GuNode::<OtherGuMap>::Unused(UnusedPrefix::new(
            Bits::new(),
            make_seal(0x11),
        )));

        // same bytes on the wire, different commitments
        assert_eq!(
            here.serialize_hex().unwrap(),
            there.serialize_hex().unwrap()
        );
        assert_ne!(here.hash(), there.hash());
    }
}
