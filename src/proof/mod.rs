//! Membership proofs: one opening per level, from the leaf's parent up to the root.
use crate::{
    constant::{default_crs, is_supported_exponent, OPENING_TRANSCRIPT_LABEL},
    types::{fr_to_le_bytes, Commitment},
};
use banderwagon::{CanonicalDeserialize, Element, Fr};
use ipa_multipoint::{crs::CRS, IPAProof, Transcript, VerifierQuery};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use thiserror::Error;

pub mod prover;
pub mod verifier;

pub use verifier::{verify, verify_strict, verify_with_crs};

/// Error type for proof requests.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum QueryError {
    /// The requested leaf does not exist.
    #[error("leaf index {index} is out of range for {len} data blocks")]
    IndexOutOfRange { index: usize, len: usize },
    /// An opening hit a zero Fiat-Shamir challenge.
    #[error("opening proof hit a zero challenge that cannot be inverted")]
    InversionFailure,
}

/// An opening of one node commitment: the committed polynomial evaluates to
/// `result` at `point`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LevelOpening {
    #[serde(serialize_with = "serialize_commitment")]
    #[serde(deserialize_with = "deserialize_commitment")]
    pub(crate) commitment: Commitment,
    #[serde(serialize_with = "serialize_scalar")]
    #[serde(deserialize_with = "deserialize_scalar")]
    pub(crate) point: Fr,
    #[serde(serialize_with = "serialize_scalar")]
    #[serde(deserialize_with = "deserialize_scalar")]
    pub(crate) result: Fr,
    #[serde(serialize_with = "serialize_ipa_proof")]
    #[serde(deserialize_with = "deserialize_ipa_proof")]
    pub(crate) proof: IPAProof,
}

impl LevelOpening {
    /// The node commitment being opened (`P`).
    pub fn commitment(&self) -> Commitment {
        self.commitment
    }

    /// The evaluation point (`x`), one more than the child's slot.
    pub fn point(&self) -> Fr {
        self.point
    }

    /// The claimed evaluation (`v`), the hash of the child.
    pub fn result(&self) -> Fr {
        self.result
    }

    pub fn query(&self) -> VerifierQuery {
        VerifierQuery {
            commitment: self.commitment,
            point: self.point,
            result: self.result,
        }
    }

    /// Branch factor of the tree this opening was made for.
    pub fn width(&self) -> usize {
        1 << self.proof.num_rounds()
    }

    /// Checks the opening proof alone; says nothing about how it links to its neighbours.
    pub fn verify_opening(&self, crs: &CRS) -> bool {
        let mut transcript = Transcript::new(OPENING_TRANSCRIPT_LABEL);
        self.proof.verify(&mut transcript, crs, &self.query())
    }
}

/// A data block together with the openings that tie it to the root, leaf-adjacent first.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LeafProof {
    pub datum: Vec<u8>,
    pub openings: Vec<LevelOpening>,
}

impl LeafProof {
    /// Shorthand for [`verify`] on this proof's own datum and openings.
    pub fn verify(&self, index: usize, root: Commitment) -> bool {
        verify(index, &self.datum, &self.openings, root)
    }

    /// Shorthand for [`verify_strict`] on this proof's own datum and openings.
    pub fn verify_strict(&self, index: usize, root: Commitment) -> bool {
        verify_strict(index, &self.datum, &self.openings, root)
    }
}

/// The shared setup matching the width of `openings`, or `None` if the chain is empty or its
/// width is unsupported.
pub(crate) fn crs_for_openings(openings: &[LevelOpening]) -> Option<&'static CRS> {
    let rounds = u32::try_from(openings.first()?.proof.num_rounds()).ok()?;
    is_supported_exponent(rounds).then(|| default_crs(rounds))
}

fn serialize_commitment<S>(commitment: &Commitment, serializer: S) -> Result<S::Ok, S::Error>
where
    S: Serializer,
{
    commitment.to_bytes().serialize(serializer)
}

fn deserialize_commitment<'de, D>(deserializer: D) -> Result<Commitment, D::Error>
where
    D: Deserializer<'de>,
{
    let bytes = <[u8; 32]>::deserialize(deserializer)?;
    Element::from_bytes(bytes)
        .ok_or_else(|| serde::de::Error::custom("bytes are not a banderwagon element"))
}

fn serialize_scalar<S>(scalar: &Fr, serializer: S) -> Result<S::Ok, S::Error>
where
    S: Serializer,
{
    fr_to_le_bytes(*scalar).serialize(serializer)
}

fn deserialize_scalar<'de, D>(deserializer: D) -> Result<Fr, D::Error>
where
    D: Deserializer<'de>,
{
    let bytes = <[u8; 32]>::deserialize(deserializer)?;
    Fr::deserialize_compressed(&bytes[..]).map_err(|e| serde::de::Error::custom(e.to_string()))
}

fn serialize_ipa_proof<S>(proof: &IPAProof, serializer: S) -> Result<S::Ok, S::Error>
where
    S: Serializer,
{
    let bytes = proof
        .to_bytes()
        .map_err(|e| serde::ser::Error::custom(e.to_string()))?;
    bytes.serialize(serializer)
}

fn deserialize_ipa_proof<'de, D>(deserializer: D) -> Result<IPAProof, D::Error>
where
    D: Deserializer<'de>,
{
    let bytes = Vec::<u8>::deserialize(deserializer)?;

    // (2·rounds + 1) points and two scalars, 32 bytes each
    let rounds = bytes
        .len()
        .checked_sub(3 * 32)
        .filter(|rest| rest % 64 == 0)
        .map(|rest| rest / 64)
        .filter(|rounds| u32::try_from(*rounds).is_ok_and(is_supported_exponent))
        .ok_or_else(|| serde::de::Error::custom("unexpected opening proof length"))?;

    IPAProof::from_bytes(&bytes, 1 << rounds).map_err(|e| serde::de::Error::custom(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tree::VerkleTree;
    use rand::{rngs::StdRng, SeedableRng};

    fn sample_proof() -> (LeafProof, Commitment) {
        let mut rng = StdRng::seed_from_u64(11);
        let tree = VerkleTree::build(["a", "b", "c", "d"], 1, &mut rng).unwrap();
        (tree.request_proof(2).unwrap(), tree.root())
    }

    #[test]
    fn serde_json_roundtrip() {
        let (proof, root) = sample_proof();

        let serialized = serde_json::to_string(&proof).unwrap();
        let deserialized: LeafProof = serde_json::from_str(&serialized).unwrap();

        assert_eq!(deserialized, proof);
        assert!(deserialized.verify(2, root));
    }

    #[test]
    fn bincode_roundtrip() {
        let (proof, root) = sample_proof();

        let serialized = bincode::serde::encode_to_vec(&proof, bincode::config::legacy()).unwrap();
        let (deserialized, _): (LeafProof, usize) =
            bincode::serde::decode_from_slice(&serialized, bincode::config::legacy()).unwrap();

        assert_eq!(deserialized, proof);
        assert!(deserialized.verify_strict(2, root));
    }

    #[test]
    fn malformed_ipa_bytes_are_rejected() {
        let (proof, _) = sample_proof();
        let mut value = serde_json::to_value(&proof).unwrap();

        // Drop one byte from the first opening's IPA proof
        value["openings"][0]["proof"]
            .as_array_mut()
            .unwrap()
            .pop();
        assert!(serde_json::from_value::<LeafProof>(value).is_err());
    }

    #[test]
    fn accessors_expose_the_statement() {
        let (proof, root) = sample_proof();
        let last = proof.openings.last().unwrap();

        assert_eq!(last.commitment(), root);
        assert_eq!(last.width(), 2);
        assert_eq!(last.query().commitment, root);
        // Leaf 2 is the left child of its parent, which is the right child of the root
        assert_eq!(proof.openings[0].point(), Fr::from(1u64));
        assert_eq!(last.point(), Fr::from(2u64));
    }
}
