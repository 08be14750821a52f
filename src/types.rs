//! Core types shared by tree construction, proving and verification.
use crate::constant::DOMAIN_TAG;
use banderwagon::{hash_to_scalar, CanonicalSerialize, Element, Fr};

/// Polynomial coefficients, lowest degree first.
pub type Polynomial = Vec<Fr>;

/// Public commitment to one internal node.
pub type Commitment = Element;

/// A node of the tree as seen by the hashing step: a raw data block at the bottom level, or the
/// commitment of an internal node above it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Node<'a> {
    Leaf(&'a [u8]),
    Internal(&'a Commitment),
}

impl Node<'_> {
    /// The value this node contributes to its parent's polynomial.
    pub fn hash_to_scalar(&self) -> Fr {
        match self {
            Node::Leaf(bytes) => hash_to_scalar(DOMAIN_TAG, bytes),
            Node::Internal(commitment) => hash_to_scalar(DOMAIN_TAG, &commitment.to_bytes()),
        }
    }
}

/// Little-endian 32-byte encoding of a scalar.
pub(crate) fn fr_to_le_bytes(fr: Fr) -> [u8; 32] {
    let mut bytes = [0u8; 32];
    fr.serialize_compressed(&mut bytes[..])
        .expect("a scalar always fits in 32 bytes");
    bytes
}
